pub use config::*;
pub use donation::*;
pub use donor_ledger::*;
pub use raffle::*;

pub mod config;
pub mod donation;
pub mod donor_ledger;
pub mod raffle;
