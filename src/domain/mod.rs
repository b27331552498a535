mod ledger;
mod money;
mod sources;
mod transaction;

pub use ledger::*;
pub use money::*;
pub use sources::*;
pub use transaction::*;
