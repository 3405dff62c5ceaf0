use anchor_lang::prelude::*;
use anchor_spl::token::{transfer, Token, TokenAccount, Transfer};

use crate::{
    error::RaffleError,
    state::{Config, Raffle, Role},
};

#[event]
pub struct RewardsEnabled {
    pub raffle: Pubkey,
    pub raffle_id: u64,
    pub amount: u64,
}

/// Instruction to turn on token rewards for a raffle created without a buffer
///
/// # Errors
/// - `MissingRole` if the signer is not a curator
/// - `RaffleCancelled` / `RaffleHasEnded` once the raffle is closed
/// - `RewardsAlreadyEnabled` if the raffle already has a reward allocation
/// - `InsufficientAmount` if `amount` is 0
pub fn enable_token_rewards(ctx: Context<EnableTokenRewards>, amount: u64) -> Result<()> {
    let current_time = Clock::get()?.unix_timestamp;
    ctx.accounts.raffle.enable_rewards(amount, current_time)?;

    transfer(ctx.accounts.transfer_reward_ctx(), amount)?;

    emit!(RewardsEnabled {
        raffle: ctx.accounts.raffle.key(),
        raffle_id: ctx.accounts.raffle.id,
        amount,
    });

    Ok(())
}

#[derive(Accounts)]
pub struct EnableTokenRewards<'info> {
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
            b"reward_vault",
            raffle.key().as_ref(),
        ],
        bump,
    )]
    pub reward_vault: Box<Account<'info, TokenAccount>>,

    #[account(
        mut,
        token::mint = raffle.reward_mint,
        token::authority = curator,
    )]
    pub reward_source: Box<Account<'info, TokenAccount>>,

    pub token_program: Program<'info, Token>,
}

impl<'info> EnableTokenRewards<'info> {
    pub fn transfer_reward_ctx(&self) -> CpiContext<'_, '_, '_, 'info, Transfer<'info>> {
        let cpi_accounts = Transfer {
            from: self.reward_source.to_account_info(),
            to: self.reward_vault.to_account_info(),
            authority: self.curator.to_account_info(),
        };
        CpiContext::new(self.token_program.to_account_info(), cpi_accounts)
    }
}
