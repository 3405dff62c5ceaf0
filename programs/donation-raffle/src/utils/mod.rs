pub use entropy::*;
pub use fees::*;
pub use matching::*;
pub use selection::*;
pub use token_accounts::*;

pub mod entropy;
pub mod fees;
pub mod matching;
pub mod selection;
pub mod token_accounts;
