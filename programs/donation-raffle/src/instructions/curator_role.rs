use anchor_lang::prelude::*;

use crate::{
    error::RaffleError,
    state::{Config, Role},
};

#[event]
pub struct CuratorRoleSet {
    pub curator: Pubkey,
}

#[event]
pub struct CuratorRoleRevoked {
    pub curator: Pubkey,
}

/// Grants the curator role. Granting it twice is a no-op.
pub fn set_curator_role(ctx: Context<ManageCurators>, curator: Pubkey) -> Result<()> {
    if ctx.accounts.config.grant_curator(curator)? {
        emit!(CuratorRoleSet { curator });
    }
    Ok(())
}

/// Revokes the curator role. Revoking a non-curator is a no-op.
pub fn revoke_curator_role(ctx: Context<ManageCurators>, curator: Pubkey) -> Result<()> {
    if ctx.accounts.config.revoke_curator(&curator) {
        emit!(CuratorRoleRevoked { curator });
    }
    Ok(())
}

#[derive(Accounts)]
pub struct ManageCurators<'info> {
    #[account(
        mut,
        seeds = [b"config"],
        bump = config.bump,
        constraint = config.has_role(&admin.key(), Role::Admin) @ RaffleError::MissingRole,
    )]
    pub config: Account<'info, Config>,

    pub admin: Signer<'info>,
}
