use anchor_lang::prelude::*;
use instructions::*;

pub mod error;
pub mod instructions;
pub mod state;
pub mod utils;

declare_id!("68hfSun46SWac9Qswp2Tj7TNqZbt3Vm4Cb1F3KckAQPm");

#[program]
pub mod donation_raffle {
    use super::*;

    pub fn init_config(ctx: Context<InitConfig>, params: InitConfigParams) -> Result<()> {
        instructions::init_config::init_config(ctx, params)
    }

    pub fn update_config(ctx: Context<UpdateConfig>, params: UpdateConfigParams) -> Result<()> {
        instructions::update_config::update_config(ctx, params)
    }

    pub fn set_curator_role(ctx: Context<ManageCurators>, curator: Pubkey) -> Result<()> {
        instructions::curator_role::set_curator_role(ctx, curator)
    }

    pub fn revoke_curator_role(ctx: Context<ManageCurators>, curator: Pubkey) -> Result<()> {
        instructions::curator_role::revoke_curator_role(ctx, curator)
    }

    pub fn set_prize_author(ctx: Context<SetPrizeAuthor>, prize_author: Pubkey) -> Result<()> {
        instructions::set_prize_author::set_prize_author(ctx, prize_author)
    }

    pub fn set_reward_token(ctx: Context<SetRewardToken>) -> Result<()> {
        instructions::set_reward_token::set_reward_token(ctx)
    }

    pub fn create_raffle(
        ctx: Context<CreateRaffle>,
        raffle_id: u64,
        params: CreateRaffleParams,
    ) -> Result<()> {
        instructions::create_raffle::create_raffle(ctx, raffle_id, params)
    }

    pub fn donate(ctx: Context<Donate>, amount: u64) -> Result<()> {
        instructions::donate::donate(ctx, amount)
    }

    pub fn cancel_raffle<'info>(
        ctx: Context<'_, '_, '_, 'info, CancelRaffle<'info>>,
    ) -> Result<()> {
        instructions::cancel_raffle::cancel_raffle(ctx)
    }

    pub fn settle_raffle<'info>(
        ctx: Context<'_, '_, '_, 'info, SettleRaffle<'info>>,
    ) -> Result<()> {
        instructions::settle_raffle::settle_raffle(ctx)
    }

    pub fn enable_token_rewards(ctx: Context<EnableTokenRewards>, amount: u64) -> Result<()> {
        instructions::enable_token_rewards::enable_token_rewards(ctx, amount)
    }

    pub fn claim_rewards(ctx: Context<ClaimRewards>) -> Result<()> {
        instructions::claim_rewards::claim_rewards(ctx)
    }

    pub fn withdraw_rewards(ctx: Context<WithdrawRewards>, amount: u64) -> Result<()> {
        instructions::withdraw_rewards::withdraw_rewards(ctx, amount)
    }

    pub fn release_donations(ctx: Context<ReleaseDonations>) -> Result<()> {
        instructions::release_donations::release_donations(ctx)
    }

    pub fn claimable_rewards(ctx: Context<ClaimableRewards>, donor: Pubkey) -> Result<u64> {
        instructions::claimable_rewards::claimable_rewards(ctx, donor)
    }
}
