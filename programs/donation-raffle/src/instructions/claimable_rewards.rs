use anchor_lang::prelude::*;

use crate::state::{DonorLedger, Raffle};

/// Read-only view of the rewards `donor` could claim from a raffle. Zero for
/// non-donors, donors that already claimed, cancelled raffles and raffles
/// without token rewards.
pub fn claimable_rewards(ctx: Context<ClaimableRewards>, donor: Pubkey) -> Result<u64> {
    let raffle = &ctx.accounts.raffle;
    if raffle.cancelled || !raffle.rewards_enabled() {
        return Ok(0);
    }
    ctx.accounts
        .donor_ledger
        .claimable(&donor, raffle.reward_allocation)
}

#[derive(Accounts)]
pub struct ClaimableRewards<'info> {
    #[account(
        seeds = [
            b"raffle",
            raffle.id.to_le_bytes().as_ref(),
        ],
        bump = raffle.bump,
    )]
    pub raffle: Box<Account<'info, Raffle>>,

    #[account(
        seeds = [
            b"donor_ledger",
            raffle.key().as_ref(),
        ],
        bump = donor_ledger.bump,
    )]
    pub donor_ledger: Box<Account<'info, DonorLedger>>,
}
