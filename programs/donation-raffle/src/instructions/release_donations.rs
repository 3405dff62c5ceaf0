use anchor_lang::prelude::*;
use anchor_spl::token::{Token, TokenAccount};

use crate::{
    error::RaffleError,
    state::{Config, Raffle, Role},
    utils::transfer_from_vault,
};

/// Event emitted when a settled raffle's donations are paid out
#[event]
pub struct DonationsReleased {
    pub raffle: Pubkey,
    pub raffle_id: u64,
    pub protocol_fee: u64,
    pub organisation_fee: u64,
    pub net_amount: u64,
}

/// Instruction to pay out a settled raffle's donation vault
///
/// The protocol fee goes to the platform wallet, the organisation fee to the
/// organisation wallet and the net amount to the treasury wallet. Fees were
/// fixed when each donation was made.
///
/// # Errors
/// - `MissingRole` if the signer is not a curator
/// - `RaffleCancelled` if the raffle was cancelled
/// - `RaffleNotRewarded` before settlement
/// - `DonationsAlreadyReleased` on a second call
pub fn release_donations(ctx: Context<ReleaseDonations>) -> Result<()> {
    let released = ctx.accounts.raffle.release_donations()?;

    let raffle = &ctx.accounts.raffle;
    let raffle_id = raffle.id.to_le_bytes();
    let bump = [raffle.bump];
    let signer_seeds: &[&[u8]] = &[b"raffle", raffle_id.as_ref(), &bump];

    let token_program = ctx.accounts.token_program.to_account_info();
    let raffle_info = raffle.to_account_info();
    let donation_vault = ctx.accounts.donation_vault.to_account_info();

    let payouts = [
        (&ctx.accounts.platform_token, released.protocol),
        (&ctx.accounts.organisation_token, released.organisation),
        (&ctx.accounts.treasury_token, released.net),
    ];
    for (destination, amount) in payouts {
        transfer_from_vault(
            &token_program,
            &donation_vault,
            &destination.to_account_info(),
            &raffle_info,
            signer_seeds,
            amount,
        )?;
    }

    emit!(DonationsReleased {
        raffle: raffle.key(),
        raffle_id: raffle.id,
        protocol_fee: released.protocol,
        organisation_fee: released.organisation,
        net_amount: released.net,
    });

    Ok(())
}

#[derive(Accounts)]
pub struct ReleaseDonations<'info> {
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
        token::mint = donation_vault.mint,
        token::authority = config.platform_wallet,
    )]
    pub platform_token: Box<Account<'info, TokenAccount>>,

    #[account(
        mut,
        token::mint = donation_vault.mint,
        token::authority = config.organisation_wallet,
    )]
    pub organisation_token: Box<Account<'info, TokenAccount>>,

    #[account(
        mut,
        token::mint = donation_vault.mint,
        token::authority = config.treasury_wallet,
    )]
    pub treasury_token: Box<Account<'info, TokenAccount>>,

    pub token_program: Program<'info, Token>,
}
