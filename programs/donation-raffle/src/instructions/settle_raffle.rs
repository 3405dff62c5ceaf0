use anchor_lang::prelude::*;
use anchor_spl::token::{Token, TokenAccount};

use crate::{
    error::RaffleError,
    state::{Config, DonorLedger, Raffle, Role},
    utils::{load_token_account, transfer_from_vault, SettlementPlan, SlotHashesEntropy},
};

/// Event emitted for every donor that won at least one prize share
#[event]
pub struct PrizeSentToWinner {
    pub raffle: Pubkey,
    pub raffle_id: u64,
    pub donor: Pubkey,
    pub shares: u64,
}

/// Event emitted when a raffle's prize has been distributed
#[event]
pub struct RaffleSettled {
    pub raffle: Pubkey,
    pub raffle_id: u64,
    pub platform_shares: u64,
    pub author_shares: u64,
    pub donor_shares: u64,
    /// Donor shares sent back to the prize owner because nobody donated
    pub returned_shares: u64,
    pub donor_count: u32,
    pub timestamp: i64,
}

/// Instruction to distribute a raffle's prize after its end time
///
/// One share goes to the platform wallet and one to the prize author. The
/// remaining shares are drawn one at a time among donors, weighted by their
/// gross donation totals. A donor can win several shares. When nobody donated
/// the donor shares go back to the prize owner and the raffle is still marked
/// rewarded.
///
/// Randomness comes from the SlotHashes sysvar mixed with the clock. This is
/// not manipulation-proof: a block leader can influence the observed hash.
///
/// Remaining accounts: one prize token account per donor, owned by the donor,
/// in the donor ledger's order. Not needed when there are no donors.
///
/// # Errors
/// - `MissingRole` if the signer is not a curator
/// - `RaffleCancelled` if the raffle was cancelled
/// - `RaffleHasNotEnded` before the end time
/// - `RaffleAlreadyRewarded` on a second settlement
/// - `PrizeQuantityTooHigh` for a raffle created with more shares than a
///   settlement can draw
/// - `DonorAccountsMismatch` if the remaining accounts do not cover every donor
/// - `InvalidSlotHashesAccount` if the provided SlotHashes account is invalid
pub fn settle_raffle<'info>(ctx: Context<'_, '_, '_, 'info, SettleRaffle<'info>>) -> Result<()> {
    let current_time = Clock::get()?.unix_timestamp;
    ctx.accounts.raffle.settle(current_time)?;

    let raffle = &ctx.accounts.raffle;
    let ledger = &ctx.accounts.donor_ledger;
    if !ledger.is_empty() {
        require!(
            ctx.remaining_accounts.len() == ledger.len(),
            RaffleError::DonorAccountsMismatch
        );
    }

    let entropy = SlotHashesEntropy::new(&ctx.accounts.recent_slothashes, current_time)?;
    let plan = SettlementPlan::draw(raffle.prize_quantity, &ledger.weights(), &entropy)?;

    let raffle_id = raffle.id.to_le_bytes();
    let bump = [raffle.bump];
    let signer_seeds: &[&[u8]] = &[b"raffle", raffle_id.as_ref(), &bump];

    let token_program = ctx.accounts.token_program.to_account_info();
    let raffle_info = raffle.to_account_info();
    let prize_vault = ctx.accounts.prize_vault.to_account_info();

    transfer_from_vault(
        &token_program,
        &prize_vault,
        &ctx.accounts.platform_prize_token.to_account_info(),
        &raffle_info,
        signer_seeds,
        plan.platform,
    )?;
    transfer_from_vault(
        &token_program,
        &prize_vault,
        &ctx.accounts.author_prize_token.to_account_info(),
        &raffle_info,
        signer_seeds,
        plan.author,
    )?;

    if plan.returned_to_owner > 0 {
        msg!(
            "No donors, returning {} shares to the prize owner",
            plan.returned_to_owner
        );
        transfer_from_vault(
            &token_program,
            &prize_vault,
            &ctx.accounts.owner_prize_token.to_account_info(),
            &raffle_info,
            signer_seeds,
            plan.returned_to_owner,
        )?;
    }

    for ((entry, donor_token), won) in ledger
        .donors
        .iter()
        .zip(ctx.remaining_accounts.iter())
        .zip(plan.donor_shares.iter().copied())
    {
        load_token_account(donor_token, &raffle.prize_mint, &entry.donor)?;
        if won == 0 {
            continue;
        }

        msg!("Sending {} prize shares to donor {}", won, entry.donor);
        transfer_from_vault(
            &token_program,
            &prize_vault,
            donor_token,
            &raffle_info,
            signer_seeds,
            won,
        )?;

        emit!(PrizeSentToWinner {
            raffle: raffle.key(),
            raffle_id: raffle.id,
            donor: entry.donor,
            shares: won,
        });
    }

    emit!(RaffleSettled {
        raffle: raffle.key(),
        raffle_id: raffle.id,
        platform_shares: plan.platform,
        author_shares: plan.author,
        donor_shares: plan.donor_total(),
        returned_shares: plan.returned_to_owner,
        donor_count: raffle.donor_count,
        timestamp: current_time,
    });

    Ok(())
}

#[derive(Accounts)]
pub struct SettleRaffle<'info> {
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
            b"prize_vault",
            raffle.key().as_ref(),
        ],
        bump,
    )]
    pub prize_vault: Box<Account<'info, TokenAccount>>,

    #[account(
        mut,
        token::mint = raffle.prize_mint,
        token::authority = config.platform_wallet,
    )]
    pub platform_prize_token: Box<Account<'info, TokenAccount>>,

    #[account(
        mut,
        token::mint = raffle.prize_mint,
        token::authority = raffle.prize_author,
    )]
    pub author_prize_token: Box<Account<'info, TokenAccount>>,

    #[account(
        mut,
        token::mint = raffle.prize_mint,
        token::authority = raffle.prize_owner,
    )]
    pub owner_prize_token: Box<Account<'info, TokenAccount>>,

    /// The SlotHashes sysvar contains the most recent block hashes
    /// CHECK: Validated by key in `SlotHashesEntropy::new`, Anchor cannot
    /// deserialize the SlotHashes sysvar.
    pub recent_slothashes: UncheckedAccount<'info>,

    pub token_program: Program<'info, Token>,
}
