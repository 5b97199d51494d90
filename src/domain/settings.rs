use serde::{Deserialize, Serialize};

/// Storage key for the serialized notification preferences.
pub const NOTIFICATION_PREFERENCES_KEY: &str = "notification_preferences";
pub const WHATSAPP_CONNECTED_KEY: &str = "whatsapp_connected";
pub const WHATSAPP_PHONE_KEY: &str = "whatsapp_phone";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationPreferences {
    pub daily_summary: bool,
    pub weekly_summary: bool,
    pub budget_alerts: bool,
    pub financial_tips: bool,
    pub expense_reminders: bool,
    /// Local time of day for summaries, "HH:MM"
    pub summary_time: String,
    /// Budget usage percentage that triggers an alert
    pub alert_threshold: u8,
}

impl Default for NotificationPreferences {
    fn default() -> Self {
        Self {
            daily_summary: true,
            weekly_summary: true,
            budget_alerts: true,
            financial_tips: false,
            expense_reminders: true,
            summary_time: "20:00".to_string(),
            alert_threshold: 80,
        }
    }
}

impl NotificationPreferences {
    /// Set a single preference by its key, as typed on the command line.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), String> {
        let parse_bool = |v: &str| match v.to_lowercase().as_str() {
            "true" | "on" | "yes" | "sim" => Ok(true),
            "false" | "off" | "no" | "não" | "nao" => Ok(false),
            _ => Err(format!("expected on/off, got '{}'", v)),
        };

        match key {
            "daily-summary" => self.daily_summary = parse_bool(value)?,
            "weekly-summary" => self.weekly_summary = parse_bool(value)?,
            "budget-alerts" => self.budget_alerts = parse_bool(value)?,
            "financial-tips" => self.financial_tips = parse_bool(value)?,
            "expense-reminders" => self.expense_reminders = parse_bool(value)?,
            "summary-time" => {
                chrono::NaiveTime::parse_from_str(value, "%H:%M")
                    .map_err(|_| format!("expected HH:MM, got '{}'", value))?;
                self.summary_time = value.to_string();
            }
            "alert-threshold" => {
                let threshold: u8 = value
                    .parse()
                    .map_err(|_| format!("expected a percentage, got '{}'", value))?;
                if threshold == 0 || threshold > 100 {
                    return Err(format!("threshold must be between 1 and 100, got {}", threshold));
                }
                self.alert_threshold = threshold;
            }
            _ => return Err(format!("unknown preference '{}'", key)),
        }
        Ok(())
    }
}

/// WhatsApp link state, stored as two loose keys.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WhatsAppConnection {
    pub connected: bool,
    pub phone: Option<String>,
}

/// Light validation for a phone number: digits with optional `+`, spaces,
/// dashes and parentheses, at least 10 digits.
pub fn is_valid_phone(phone: &str) -> bool {
    let allowed = phone
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '+' | ' ' | '-' | '(' | ')'));
    let digits = phone.chars().filter(|c| c.is_ascii_digit()).count();
    allowed && digits >= 10
}
