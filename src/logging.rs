use std::sync::Once;

use tracing_subscriber::EnvFilter;

static INIT_TRACING: Once = Once::new();

/// Initialize the global tracing subscriber. Logs go to stderr so that
/// exports written to stdout stay clean. `RUST_LOG` overrides the default
/// level; subsequent calls are no-ops.
pub fn init_tracing(verbose: bool) {
    INIT_TRACING.call_once(|| {
        let default_level = if verbose { "monefy=debug" } else { "monefy=warn" };
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(default_level));

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    });
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_twice_does_not_panic() {
        super::init_tracing(false);
        super::init_tracing(true);
    }
}
