use anchor_lang::prelude::*;

use crate::{
    error::RaffleError,
    state::{require_nonzero, Config, Role},
};

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, Default)]
pub struct UpdateConfigParams {
    pub admin: Option<Pubkey>,
    pub platform_wallet: Option<Pubkey>,
    pub organisation_wallet: Option<Pubkey>,
    pub treasury_wallet: Option<Pubkey>,
    pub donation_mint: Option<Pubkey>,
    pub protocol_fee_percent: Option<u8>,
    pub organisation_fee_percent: Option<u8>,
}

#[event]
pub struct ConfigUpdated {
    pub admin: Pubkey,
    pub platform_wallet: Pubkey,
    pub organisation_wallet: Pubkey,
    pub treasury_wallet: Pubkey,
    pub donation_mint: Pubkey,
    pub protocol_fee_percent: u8,
    pub organisation_fee_percent: u8,
}

/// Instruction for the admin to change program settings. Fields left as
/// `None` keep their value. New fees and the donation mint only apply to
/// donations and raffles made afterwards.
pub fn update_config(ctx: Context<UpdateConfig>, params: UpdateConfigParams) -> Result<()> {
    let config = &mut ctx.accounts.config;
    apply_update(config, &params)?;

    emit!(ConfigUpdated {
        admin: config.admin,
        platform_wallet: config.platform_wallet,
        organisation_wallet: config.organisation_wallet,
        treasury_wallet: config.treasury_wallet,
        donation_mint: config.donation_mint,
        protocol_fee_percent: config.protocol_fee_percent,
        organisation_fee_percent: config.organisation_fee_percent,
    });

    Ok(())
}

fn apply_update(config: &mut Config, params: &UpdateConfigParams) -> Result<()> {
    for key in [
        params.admin,
        params.platform_wallet,
        params.organisation_wallet,
        params.treasury_wallet,
        params.donation_mint,
    ]
    .iter()
    .flatten()
    {
        require_nonzero(key)?;
    }

    config.set_fees(
        params
            .protocol_fee_percent
            .unwrap_or(config.protocol_fee_percent),
        params
            .organisation_fee_percent
            .unwrap_or(config.organisation_fee_percent),
    )?;

    if let Some(admin) = params.admin {
        config.admin = admin;
    }
    if let Some(platform_wallet) = params.platform_wallet {
        config.platform_wallet = platform_wallet;
    }
    if let Some(organisation_wallet) = params.organisation_wallet {
        config.organisation_wallet = organisation_wallet;
    }
    if let Some(treasury_wallet) = params.treasury_wallet {
        config.treasury_wallet = treasury_wallet;
    }
    if let Some(donation_mint) = params.donation_mint {
        config.donation_mint = donation_mint;
    }
    Ok(())
}

#[derive(Accounts)]
pub struct UpdateConfig<'info> {
    #[account(
        mut,
        seeds = [b"config"],
        bump = config.bump,
        constraint = config.has_role(&admin.key(), Role::Admin) @ RaffleError::MissingRole,
    )]
    pub config: Account<'info, Config>,

    pub admin: Signer<'info>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::config::tests::create_test_config;

    #[test]
    fn test_partial_update_keeps_other_fields() {
        let mut config = create_test_config();
        let treasury = Pubkey::new_unique();
        let platform = config.platform_wallet;
        let next_raffle_id = config.next_raffle_id;

        apply_update(
            &mut config,
            &UpdateConfigParams {
                treasury_wallet: Some(treasury),
                organisation_fee_percent: Some(10),
                ..Default::default()
            },
        )
        .unwrap();

        assert_eq!(config.treasury_wallet, treasury);
        assert_eq!(config.platform_wallet, platform);
        assert_eq!(config.protocol_fee_percent, 4);
        assert_eq!(config.organisation_fee_percent, 10);
        assert_eq!(config.next_raffle_id, next_raffle_id);
    }

    #[test]
    fn test_rejected_update_changes_nothing() {
        let mut config = create_test_config();
        let admin = config.admin;

        assert_eq!(
            apply_update(
                &mut config,
                &UpdateConfigParams {
                    admin: Some(Pubkey::new_unique()),
                    platform_wallet: Some(Pubkey::default()),
                    ..Default::default()
                },
            )
            .unwrap_err(),
            RaffleError::ZeroAddressNotAllowed.into()
        );
        assert_eq!(config.admin, admin);

        assert_eq!(
            apply_update(
                &mut config,
                &UpdateConfigParams {
                    admin: Some(Pubkey::new_unique()),
                    protocol_fee_percent: Some(95),
                    ..Default::default()
                },
            )
            .unwrap_err(),
            RaffleError::InvalidFee.into()
        );
        assert_eq!(config.admin, admin);
        assert_eq!(config.protocol_fee_percent, 4);
    }
}
