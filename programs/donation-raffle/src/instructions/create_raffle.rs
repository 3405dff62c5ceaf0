use anchor_lang::prelude::*;
use anchor_spl::token::{transfer, Mint, Token, TokenAccount, Transfer};

use crate::{
    error::RaffleError,
    state::{
        Config, DonorLedger, Raffle, Role, DONOR_LEDGER_ACCOUNT_SIZE, RAFFLE_ACCOUNT_SIZE,
    },
    utils::PrizeAllocation,
};

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug)]
pub struct CreateRaffleParams {
    pub start_time: i64,
    pub end_time: i64,
    pub minimum_donation: u64,
    /// Prize shares taken into custody. One goes to the platform, one to the
    /// author and the rest are drawn among donors.
    pub prize_quantity: u64,
    /// Reward tokens matched to donors, zero to leave rewards disabled
    pub reward_buffer: u64,
}

/// Event emitted when a raffle is created
#[event]
pub struct RaffleCreated {
    pub raffle: Pubkey,
    pub raffle_id: u64,
    /// Owner the prize is returned to on cancellation
    pub owner: Pubkey,
    pub curator: Pubkey,
    pub start_time: i64,
    pub end_time: i64,
    pub minimum_donation: u64,
    pub prize_quantity: u64,
    pub reward_buffer: u64,
}

/// Instruction to create a new raffle and take custody of its prize
///
/// # Arguments
/// * `ctx` - The context object containing all required accounts
/// * `raffle_id` - Must equal the config's next raffle id
/// * `params` - Window, minimum donation, prize quantity and reward buffer
///
/// # Security Considerations
/// 1. Caller must hold the curator role
/// 2. `start_time` must be strictly before `end_time`
/// 3. Minimum donation must be greater than 0
/// 4. Prize quantity must cover the platform and author shares and may not
///    exceed `MAX_PRIZE_QUANTITY` (256), the most shares settlement draws
/// 5. Prize owner signs the prize transfer into the raffle's prize vault
/// 6. Reward buffer is pulled from the curator's reward token account
///
/// # Account Validations
/// * Raffle - New PDA with seeds ["raffle", raffle_id]
/// * DonorLedger - New PDA with seeds ["donor_ledger", raffle]
/// * Vaults - New token accounts owned by the raffle PDA for the donation
///   currency, the prize and the reward token
/// * Donation and reward mints - Must match the config
pub fn create_raffle(
    ctx: Context<CreateRaffle>,
    raffle_id: u64,
    params: CreateRaffleParams,
) -> Result<()> {
    let current_time = Clock::get()?.unix_timestamp;

    require!(
        params.start_time < params.end_time,
        RaffleError::IncorrectTimesGiven
    );
    require!(
        params.minimum_donation > 0,
        RaffleError::MinimumDonationTooLow
    );
    PrizeAllocation::for_quantity(params.prize_quantity)?;

    transfer(ctx.accounts.transfer_prize_ctx(), params.prize_quantity)?;

    if params.reward_buffer > 0 {
        let cpi_ctx = ctx
            .accounts
            .transfer_reward_ctx()
            .ok_or(RaffleError::InvalidTokenAccount)?;
        transfer(cpi_ctx, params.reward_buffer)?;
    }

    let id = ctx.accounts.config.take_raffle_id()?;
    require!(id == raffle_id, RaffleError::InvalidRaffleId);

    let raffle = &mut ctx.accounts.raffle;
    raffle.id = id;
    raffle.curator = ctx.accounts.curator.key();
    raffle.prize_mint = ctx.accounts.prize_mint.key();
    raffle.prize_owner = ctx.accounts.prize_owner.key();
    raffle.prize_author = ctx.accounts.config.prize_author;
    raffle.prize_quantity = params.prize_quantity;
    raffle.start_time = params.start_time;
    raffle.end_time = params.end_time;
    raffle.minimum_donation = params.minimum_donation;
    raffle.top_donor = Pubkey::default();
    raffle.top_donated_amount = 0;
    raffle.total_donations = 0;
    raffle.protocol_fees = 0;
    raffle.organisation_fees = 0;
    raffle.next_donation_id = 1;
    raffle.donor_count = 0;
    raffle.reward_mint = ctx.accounts.reward_mint.key();
    raffle.reward_allocation = params.reward_buffer;
    raffle.reward_buffer = params.reward_buffer;
    raffle.rewards_claimed = 0;
    raffle.rewards_withdrawn = 0;
    raffle.rewards_refunded = 0;
    raffle.cancelled = false;
    raffle.rewarded = false;
    raffle.donations_released = false;
    raffle.created_at = current_time;
    raffle.bump = ctx.bumps.raffle;

    let donor_ledger = &mut ctx.accounts.donor_ledger;
    donor_ledger.raffle = raffle.key();
    donor_ledger.bump = ctx.bumps.donor_ledger;
    donor_ledger.donors = Vec::new();

    emit!(RaffleCreated {
        raffle: raffle.key(),
        raffle_id: id,
        owner: raffle.prize_owner,
        curator: raffle.curator,
        start_time: raffle.start_time,
        end_time: raffle.end_time,
        minimum_donation: raffle.minimum_donation,
        prize_quantity: raffle.prize_quantity,
        reward_buffer: raffle.reward_buffer,
    });

    Ok(())
}

#[derive(Accounts)]
#[instruction(raffle_id: u64)]
pub struct CreateRaffle<'info> {
    #[account(
        mut,
        seeds = [b"config"],
        bump = config.bump,
        constraint = config.has_role(&curator.key(), Role::Curator) @ RaffleError::MissingRole,
        constraint = config.next_raffle_id == raffle_id @ RaffleError::InvalidRaffleId,
    )]
    pub config: Box<Account<'info, Config>>,

    #[account(
        init,
        payer = curator,
        space = RAFFLE_ACCOUNT_SIZE,
        seeds = [
            b"raffle",
            raffle_id.to_le_bytes().as_ref(),
        ],
        bump
    )]
    pub raffle: Box<Account<'info, Raffle>>,

    #[account(
        init,
        payer = curator,
        space = DONOR_LEDGER_ACCOUNT_SIZE,
        seeds = [
            b"donor_ledger",
            raffle.key().as_ref(),
        ],
        bump
    )]
    pub donor_ledger: Box<Account<'info, DonorLedger>>,

    #[account(mut)]
    pub curator: Signer<'info>,

    pub prize_owner: Signer<'info>,

    pub prize_mint: Box<Account<'info, Mint>>,

    #[account(
        mut,
        token::mint = prize_mint,
        token::authority = prize_owner,
    )]
    pub prize_source: Box<Account<'info, TokenAccount>>,

    #[account(
        init,
        payer = curator,
        seeds = [
            b"prize_vault",
            raffle.key().as_ref(),
        ],
        bump,
        token::mint = prize_mint,
        token::authority = raffle,
    )]
    pub prize_vault: Box<Account<'info, TokenAccount>>,

    #[account(address = config.donation_mint @ RaffleError::InvalidMint)]
    pub donation_mint: Box<Account<'info, Mint>>,

    #[account(
        init,
        payer = curator,
        seeds = [
            b"donation_vault",
            raffle.key().as_ref(),
        ],
        bump,
        token::mint = donation_mint,
        token::authority = raffle,
    )]
    pub donation_vault: Box<Account<'info, TokenAccount>>,

    #[account(address = config.reward_mint @ RaffleError::InvalidMint)]
    pub reward_mint: Box<Account<'info, Mint>>,

    #[account(
        init,
        payer = curator,
        seeds = [
            b"reward_vault",
            raffle.key().as_ref(),
        ],
        bump,
        token::mint = reward_mint,
        token::authority = raffle,
    )]
    pub reward_vault: Box<Account<'info, TokenAccount>>,

    /// Only required when the raffle is created with a reward buffer
    #[account(
        mut,
        token::mint = reward_mint,
        token::authority = curator,
    )]
    pub reward_source: Option<Box<Account<'info, TokenAccount>>>,

    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,
}

impl<'info> CreateRaffle<'info> {
    pub fn transfer_prize_ctx(&self) -> CpiContext<'_, '_, '_, 'info, Transfer<'info>> {
        let cpi_accounts = Transfer {
            from: self.prize_source.to_account_info(),
            to: self.prize_vault.to_account_info(),
            authority: self.prize_owner.to_account_info(),
        };
        CpiContext::new(self.token_program.to_account_info(), cpi_accounts)
    }

    pub fn transfer_reward_ctx(&self) -> Option<CpiContext<'_, '_, '_, 'info, Transfer<'info>>> {
        let reward_source = self.reward_source.as_ref()?;
        let cpi_accounts = Transfer {
            from: reward_source.to_account_info(),
            to: self.reward_vault.to_account_info(),
            authority: self.curator.to_account_info(),
        };
        Some(CpiContext::new(
            self.token_program.to_account_info(),
            cpi_accounts,
        ))
    }
}
