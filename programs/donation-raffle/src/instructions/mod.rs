pub use cancel_raffle::*;
pub use claim_rewards::*;
pub use claimable_rewards::*;
pub use create_raffle::*;
pub use curator_role::*;
pub use donate::*;
pub use enable_token_rewards::*;
pub use init_config::*;
pub use release_donations::*;
pub use set_prize_author::*;
pub use set_reward_token::*;
pub use settle_raffle::*;
pub use update_config::*;
pub use withdraw_rewards::*;

pub mod cancel_raffle;
pub mod claim_rewards;
pub mod claimable_rewards;
pub mod create_raffle;
pub mod curator_role;
pub mod donate;
pub mod enable_token_rewards;
pub mod init_config;
pub mod release_donations;
pub mod set_prize_author;
pub mod set_reward_token;
pub mod settle_raffle;
pub mod update_config;
pub mod withdraw_rewards;
