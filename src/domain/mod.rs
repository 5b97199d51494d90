mod budget;
mod category;
mod goal;
mod ledger;
mod money;
mod settings;
mod stats;
mod transaction;

pub use budget::*;
pub use category::*;
pub use goal::*;
pub use ledger::*;
pub use money::*;
pub use settings::*;
pub use stats::*;
pub use transaction::*;
