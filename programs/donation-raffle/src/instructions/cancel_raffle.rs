use anchor_lang::prelude::*;
use anchor_spl::token::{Token, TokenAccount};

use crate::{
    error::RaffleError,
    state::{Config, DonorLedger, Raffle, Role},
    utils::{load_token_account, transfer_from_vault},
};

/// Event emitted when a raffle is cancelled and unwound
#[event]
pub struct RaffleCancelled {
    pub raffle: Pubkey,
    pub raffle_id: u64,
    pub refunded_donors: u32,
    /// Gross donations returned to donors
    pub refunded_amount: u64,
    pub returned_prize: u64,
    pub returned_rewards: u64,
    pub timestamp: i64,
}

/// Instruction to cancel a raffle before it ends
///
/// Every donor is refunded their full gross total, the prize goes back to its
/// owner and the whole reward buffer goes back to the organisation. The
/// instruction either unwinds everything or fails as a whole.
///
/// Remaining accounts: one donation currency token account per donor, owned by
/// the donor, in the donor ledger's order.
///
/// # Errors
/// - `MissingRole` if the signer is not a curator
/// - `RaffleCancelled` if the raffle was already cancelled
/// - `RaffleHasEnded` once the end time is reached
/// - `DonorAccountsMismatch` if the remaining accounts do not cover every donor
/// - `InvalidMint` / `InvalidTokenAccount` for a refund account that does not
///   belong to its donor
pub fn cancel_raffle<'info>(ctx: Context<'_, '_, '_, 'info, CancelRaffle<'info>>) -> Result<()> {
    let current_time = Clock::get()?.unix_timestamp;
    let returned_rewards = ctx.accounts.raffle.cancel(current_time)?;

    let ledger = &ctx.accounts.donor_ledger;
    require!(
        ctx.remaining_accounts.len() == ledger.len(),
        RaffleError::DonorAccountsMismatch
    );

    let raffle_id = ctx.accounts.raffle.id.to_le_bytes();
    let bump = [ctx.accounts.raffle.bump];
    let signer_seeds: &[&[u8]] = &[b"raffle", raffle_id.as_ref(), &bump];

    let token_program = ctx.accounts.token_program.to_account_info();
    let raffle_info = ctx.accounts.raffle.to_account_info();
    let donation_vault = ctx.accounts.donation_vault.to_account_info();
    let donation_mint = ctx.accounts.donation_vault.mint;

    let refunds = ledger.refunds();
    for ((donor, amount), donor_token) in refunds.iter().zip(ctx.remaining_accounts.iter()) {
        load_token_account(donor_token, &donation_mint, donor)?;

        msg!("Refunding {} to donor {}", amount, donor);
        transfer_from_vault(
            &token_program,
            &donation_vault,
            donor_token,
            &raffle_info,
            signer_seeds,
            *amount,
        )?;
    }
    let refunded_amount = ledger.total_donated()?;

    let returned_prize = ctx.accounts.prize_vault.amount;
    transfer_from_vault(
        &token_program,
        &ctx.accounts.prize_vault.to_account_info(),
        &ctx.accounts.prize_owner_token.to_account_info(),
        &raffle_info,
        signer_seeds,
        returned_prize,
    )?;

    transfer_from_vault(
        &token_program,
        &ctx.accounts.reward_vault.to_account_info(),
        &ctx.accounts.organisation_reward_token.to_account_info(),
        &raffle_info,
        signer_seeds,
        returned_rewards,
    )?;

    emit!(RaffleCancelled {
        raffle: ctx.accounts.raffle.key(),
        raffle_id: ctx.accounts.raffle.id,
        refunded_donors: refunds.len() as u32,
        refunded_amount,
        returned_prize,
        returned_rewards,
        timestamp: current_time,
    });

    Ok(())
}

#[derive(Accounts)]
pub struct CancelRaffle<'info> {
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
            b"donation_vault",
            raffle.key().as_ref(),
        ],
        bump,
    )]
    pub donation_vault: Box<Account<'info, TokenAccount>>,

    #[account(
        mut,
        seeds = [
            b"prize_vault",
            raffle.key().as_ref(),
        ],
        bump,
    )]
    pub prize_vault: Box<Account<'info, TokenAccount>>,

    #[account(
        mut,
        token::mint = raffle.prize_mint,
        token::authority = raffle.prize_owner,
    )]
    pub prize_owner_token: Box<Account<'info, TokenAccount>>,

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
