use anchor_lang::prelude::*;
use anchor_spl::token::{transfer, Token, TokenAccount, Transfer};

use crate::{
    error::RaffleError,
    state::{Config, Donation, DonorLedger, Raffle, DONATION_ACCOUNT_SIZE},
    utils::{FeeSchedule, FeeSplit},
};

/// Event emitted for every accepted donation
#[event]
pub struct DonationPlaced {
    pub raffle: Pubkey,
    pub raffle_id: u64,
    pub donation_id: u64,
    pub donor: Pubkey,
    /// Gross amount
    pub amount: u64,
    pub timestamp: i64,
}

/// Instruction to donate to a raffle during its window
///
/// Donations are held at their gross amount in the raffle's donation vault.
/// The protocol and organisation fees are computed now and paid out by
/// `release_donations` once the raffle is settled, so a cancelled raffle can
/// refund every donor in full. Prize odds and reward shares are always
/// weighted by the gross amount.
///
/// A raffle takes at most `MAX_DONORS_PER_RAFFLE` (48) distinct donors, because
/// cancellation and settlement pay every donor in one transaction. Donors
/// already in the ledger can keep donating once it is full.
///
/// # Arguments
/// * `ctx` - The context object containing all required accounts
/// * `amount` - Gross amount in donation currency base units
///
/// # Errors
/// - `RaffleHasNotStarted` before the raffle's start time
/// - `RaffleHasEnded` at or after the end time, or once cancelled
/// - `DonationTooLow` if `amount` is below the raffle minimum
/// - `TooManyDonors` if a 49th distinct donor tries to donate
pub fn donate(ctx: Context<Donate>, amount: u64) -> Result<()> {
    let current_time = Clock::get()?.unix_timestamp;
    let donor = ctx.accounts.donor.key();

    let schedule = ctx.accounts.config.fee_schedule();
    let (donation_id, split) = apply_donation(
        &mut ctx.accounts.raffle,
        &mut ctx.accounts.donor_ledger,
        &schedule,
        donor,
        amount,
        current_time,
    )?;

    let raffle = &ctx.accounts.raffle;
    let donation = &mut ctx.accounts.donation;
    donation.id = donation_id;
    donation.raffle = raffle.key();
    donation.raffle_id = raffle.id;
    donation.donor = donor;
    donation.amount = amount;
    donation.net_amount = split.net;
    donation.timestamp = current_time;

    transfer(ctx.accounts.transfer_donation_ctx(), amount)?;

    emit!(DonationPlaced {
        raffle: ctx.accounts.raffle.key(),
        raffle_id: ctx.accounts.raffle.id,
        donation_id,
        donor,
        amount,
        timestamp: current_time,
    });

    Ok(())
}

/// Books a donation on the raffle and its ledger. Nothing is written when the
/// donation is rejected.
fn apply_donation(
    raffle: &mut Raffle,
    ledger: &mut DonorLedger,
    schedule: &FeeSchedule,
    donor: Pubkey,
    amount: u64,
    now: i64,
) -> Result<(u64, FeeSplit)> {
    raffle.ensure_accepts_donation(amount, now)?;

    let split = schedule.split(amount)?;
    let is_new_donor = ledger.record(donor, amount)?;
    let donation_id = raffle.record_donation(donor, amount, &split, is_new_donor)?;
    Ok((donation_id, split))
}

#[derive(Accounts)]
pub struct Donate<'info> {
    #[account(
        seeds = [b"config"],
        bump = config.bump,
    )]
    pub config: Box<Account<'info, Config>>,

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
        init,
        payer = donor,
        space = DONATION_ACCOUNT_SIZE,
        seeds = [
            b"donation",
            raffle.key().as_ref(),
            raffle.next_donation_id.to_le_bytes().as_ref(),
        ],
        bump
    )]
    pub donation: Box<Account<'info, Donation>>,

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
        token::authority = donor,
        constraint = donor_token.mint == donation_vault.mint @ RaffleError::InvalidMint,
    )]
    pub donor_token: Box<Account<'info, TokenAccount>>,

    #[account(mut)]
    pub donor: Signer<'info>,

    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,
}

impl<'info> Donate<'info> {
    pub fn transfer_donation_ctx(&self) -> CpiContext<'_, '_, '_, 'info, Transfer<'info>> {
        let cpi_accounts = Transfer {
            from: self.donor_token.to_account_info(),
            to: self.donation_vault.to_account_info(),
            authority: self.donor.to_account_info(),
        };
        CpiContext::new(self.token_program.to_account_info(), cpi_accounts)
    }
}
