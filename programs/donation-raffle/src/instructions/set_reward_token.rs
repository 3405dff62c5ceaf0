use anchor_lang::prelude::*;
use anchor_spl::token::Mint;

use crate::{
    error::RaffleError,
    state::{Config, Role},
};

#[event]
pub struct RewardTokenAddressSet {
    pub reward_mint: Pubkey,
}

/// Changes the reward token used by raffles created afterwards. Existing
/// raffles keep paying out the mint their reward vault was created with.
pub fn set_reward_token(ctx: Context<SetRewardToken>) -> Result<()> {
    let reward_mint = ctx.accounts.reward_mint.key();
    ctx.accounts.config.reward_mint = reward_mint;

    emit!(RewardTokenAddressSet { reward_mint });

    Ok(())
}

#[derive(Accounts)]
pub struct SetRewardToken<'info> {
    #[account(
        mut,
        seeds = [b"config"],
        bump = config.bump,
        constraint = config.has_role(&admin.key(), Role::Admin) @ RaffleError::MissingRole,
    )]
    pub config: Account<'info, Config>,

    pub admin: Signer<'info>,

    pub reward_mint: Account<'info, Mint>,
}
