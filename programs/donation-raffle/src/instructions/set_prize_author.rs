use anchor_lang::prelude::*;

use crate::{
    error::RaffleError,
    state::{require_nonzero, Config, Role},
};

#[event]
pub struct PrizeAuthorSet {
    pub prize_author: Pubkey,
}

/// Sets the wallet receiving the author share of raffles created afterwards.
/// Existing raffles keep the author they were created with.
pub fn set_prize_author(ctx: Context<SetPrizeAuthor>, prize_author: Pubkey) -> Result<()> {
    require_nonzero(&prize_author)?;
    ctx.accounts.config.prize_author = prize_author;

    emit!(PrizeAuthorSet { prize_author });

    Ok(())
}

#[derive(Accounts)]
pub struct SetPrizeAuthor<'info> {
    #[account(
        mut,
        seeds = [b"config"],
        bump = config.bump,
        constraint = config.has_role(&curator.key(), Role::Curator) @ RaffleError::MissingRole,
    )]
    pub config: Account<'info, Config>,

    pub curator: Signer<'info>,
}
