// Application layer - use cases and orchestration.
// Clients (CLI, tests) go through SplitService rather than touching the
// ledger or the snapshot store directly.

pub mod error;
pub mod reporting;
pub mod service;

pub use error::*;
pub use reporting::*;
pub use service::*;
