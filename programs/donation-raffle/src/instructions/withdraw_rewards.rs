use anchor_lang::prelude::*;
use anchor_spl::token::{Token, TokenAccount};

use crate::{
    error::RaffleError,
    state::{Config, DonorLedger, Raffle, Role},
    utils::transfer_from_vault,
};

/// Event emitted when unowed reward tokens are swept from a raffle
#[event]
pub struct TokensWithdrawn {
    pub raffle: Pubkey,
    pub raffle_id: u64,
    pub to: Pubkey,
    pub amount: u64,
}

/// Instruction to sweep reward tokens that no donor is owed
///
/// Only available once the raffle is settled. Shares of donors that have not
/// claimed yet stay in the reward vault. Before everyone has claimed only the
/// rounding dust can be taken.
///
/// # Errors
/// - `MissingRole` if the signer is not a curator
/// - `RaffleCancelled` if the raffle was cancelled
/// - `RaffleNotRewarded` before settlement
/// - `InsufficientAmount` if `amount` is 0 or exceeds the unowed balance
pub fn withdraw_rewards(ctx: Context<WithdrawRewards>, amount: u64) -> Result<()> {
    let outstanding = ctx
        .accounts
        .donor_ledger
        .outstanding_rewards(ctx.accounts.raffle.reward_allocation)?;
    ctx.accounts.raffle.withdraw_rewards(amount, outstanding)?;

    let raffle = &ctx.accounts.raffle;
    let raffle_id = raffle.id.to_le_bytes();
    let bump = [raffle.bump];
    let signer_seeds: &[&[u8]] = &[b"raffle", raffle_id.as_ref(), &bump];

    transfer_from_vault(
        &ctx.accounts.token_program.to_account_info(),
        &ctx.accounts.reward_vault.to_account_info(),
        &ctx.accounts.organisation_reward_token.to_account_info(),
        &raffle.to_account_info(),
        signer_seeds,
        amount,
    )?;

    emit!(TokensWithdrawn {
        raffle: raffle.key(),
        raffle_id: raffle.id,
        to: ctx.accounts.organisation_reward_token.key(),
        amount,
    });

    Ok(())
}

#[derive(Accounts)]
pub struct WithdrawRewards<'info> {
    #[account(
        seeds = [b"config"],
        bump = config.bump,
        constraint = config.has_role(&curator.key(), Role::Curator) @ RaffleError::MissingRole,
    )]
    pub config: Box<Account<'info, Config>>,

    pub curator: Signer<'info>,

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
        token::authority = config.organisation_wallet,
    )]
    pub organisation_reward_token: Box<Account<'info, TokenAccount>>,

    pub token_program: Program<'info, Token>,
}
