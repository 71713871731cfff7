mod balance;
mod expense;
mod ledger;
mod money;
mod participants;
mod settlement;

pub use balance::*;
pub use expense::*;
pub use ledger::*;
pub use money::*;
pub use participants::*;
pub use settlement::*;
