use anchor_lang::prelude::*;
use anchor_spl::token::Mint;

use crate::state::{require_nonzero, Config, CONFIG_ACCOUNT_SIZE};

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug)]
pub struct InitConfigParams {
    pub platform_wallet: Pubkey,
    pub prize_author: Pubkey,
    pub organisation_wallet: Pubkey,
    pub treasury_wallet: Pubkey,
    pub protocol_fee_percent: u8,
    pub organisation_fee_percent: u8,
}

/// Instruction to initialize the program configuration
/// This should be called once during program deployment
///
/// # Security Considerations
/// - Creates a PDA with seed "config"
/// - The signer becomes the admin, which holds every role
/// - Wallets must not be the zero address
/// - Fee percentages must each be within 0 and 100 and add up to at most 100
///
/// # Account Validations
/// * Config - New PDA initialized with proper space allocation
/// * Admin - Signer paying for the config account
/// * Donation mint - Currency donations are made in
/// * Reward mint - Token matched to donors as rewards
pub fn init_config(ctx: Context<InitConfig>, params: InitConfigParams) -> Result<()> {
    require_nonzero(&params.platform_wallet)?;
    require_nonzero(&params.prize_author)?;
    require_nonzero(&params.organisation_wallet)?;
    require_nonzero(&params.treasury_wallet)?;

    let config = &mut ctx.accounts.config;
    config.set_fees(params.protocol_fee_percent, params.organisation_fee_percent)?;
    config.admin = ctx.accounts.admin.key();
    config.curators = Vec::new();
    config.platform_wallet = params.platform_wallet;
    config.prize_author = params.prize_author;
    config.organisation_wallet = params.organisation_wallet;
    config.treasury_wallet = params.treasury_wallet;
    config.donation_mint = ctx.accounts.donation_mint.key();
    config.reward_mint = ctx.accounts.reward_mint.key();
    config.next_raffle_id = 1;
    config.bump = ctx.bumps.config;
    Ok(())
}

#[derive(Accounts)]
pub struct InitConfig<'info> {
    #[account(
        init,
        payer = admin,
        space = CONFIG_ACCOUNT_SIZE,
        seeds = [b"config"],
        bump
    )]
    pub config: Account<'info, Config>,

    #[account(mut)]
    pub admin: Signer<'info>,

    pub donation_mint: Account<'info, Mint>,
    pub reward_mint: Account<'info, Mint>,

    pub system_program: Program<'info, System>,
}
