// Application layer - use cases on top of the ledger file.
// Clients (HTTP handlers, CLI) go through `LedgerService` only.

pub mod error;
pub mod service;

pub use error::*;
pub use service::*;
