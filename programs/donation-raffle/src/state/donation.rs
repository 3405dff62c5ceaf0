use anchor_lang::prelude::*;

// 8 discriminator + 8 id + 32 raffle + 8 raffle_id + 32 donor
// + 8 amount + 8 net_amount + 8 timestamp
pub const DONATION_ACCOUNT_SIZE: usize = 8 + 8 + 32 + 8 + 32 + 8 + 8 + 8;

/// Receipt of a single donation. Never modified after creation.
#[account]
pub struct Donation {
    pub id: u64,
    pub raffle: Pubkey,
    pub raffle_id: u64,
    pub donor: Pubkey,
    /// Gross amount transferred by the donor
    pub amount: u64,
    /// Amount left for the treasury once fees are taken
    pub net_amount: u64,
    pub timestamp: i64,
}
