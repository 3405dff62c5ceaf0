use anchor_lang::prelude::*;
use anchor_spl::token::{Token, TokenAccount};

use crate::{
    state::{DonorLedger, Raffle},
    utils::transfer_from_vault,
};

#[event]
pub struct RewardsClaimed {
    pub raffle: Pubkey,
    pub raffle_id: u64,
    pub donor: Pubkey,
    pub amount: u64,
}

/// Instruction for a donor to claim their share of the raffle's reward buffer
///
/// The share is `floor(allocation * sqrt(total) / sum of sqrt(totals))` over
/// every donor's gross total, so it does not depend on claim order. The
/// claimed flag and the raffle's reward counters are written before the
/// transfer.
///
/// # Errors
/// - `NoRewardsForRaffle` if token rewards are not enabled
/// - `RaffleCancelled` if the raffle was cancelled
/// - `RaffleHasNotEnded` before the end time
/// - `CannotClaimRewards` if the signer never donated or already claimed
pub fn claim_rewards(ctx: Context<ClaimRewards>) -> Result<()> {
    let current_time = Clock::get()?.unix_timestamp;
    let donor = ctx.accounts.donor.key();

    ctx.accounts.raffle.ensure_claimable(current_time)?;
    let allocation = ctx.accounts.raffle.reward_allocation;
    let amount = ctx.accounts.donor_ledger.claim(&donor, allocation)?;
    ctx.accounts.raffle.record_claim(amount)?;

    let raffle = &ctx.accounts.raffle;
    let raffle_id = raffle.id.to_le_bytes();
    let bump = [raffle.bump];
    let signer_seeds: &[&[u8]] = &[b"raffle", raffle_id.as_ref(), &bump];

    transfer_from_vault(
        &ctx.accounts.token_program.to_account_info(),
        &ctx.accounts.reward_vault.to_account_info(),
        &ctx.accounts.donor_reward_token.to_account_info(),
        &raffle.to_account_info(),
        signer_seeds,
        amount,
    )?;

    emit!(RewardsClaimed {
        raffle: raffle.key(),
        raffle_id: raffle.id,
        donor,
        amount,
    });

    Ok(())
}

#[derive(Accounts)]
pub struct ClaimRewards<'info> {
    #[account(
        mut,
        seeds = [
            b"raffle",
            raffle.id.to_le_bytes().as_ref(),
        ],
        bump = raffle.bump,
    )]
    pub raffle: Box<Account<'info, Raffle>>,

    #[account(
        mut,
        seeds = [
            b"donor_ledger",
            raffle.key().as_ref(),
        ],
        bump = donor_ledger.bump,
    )]
    pub donor_ledger: Box<Account<'info, DonorLedger>>,

    #[account(
        mut,
        seeds = [
            b"reward_vault",
            raffle.key().as_ref(),
        ],
        bump,
    )]
    pub reward_vault: Box<Account<'info, TokenAccount>>,

    #[account(
        mut,
        token::mint = raffle.reward_mint,
        token::authority = donor,
    )]
    pub donor_reward_token: Box<Account<'info, TokenAccount>>,

    pub donor: Signer<'info>,

    pub token_program: Program<'info, Token>,
}
