use anchor_lang::prelude::*;

use crate::{error::RaffleError, utils::FeeSchedule};

pub const MAX_CURATORS: usize = 8;

// 8 discriminator + 32 admin + (4 + 8 * 32) curators + 4 * 32 wallets
// + 2 * 32 mints + 1 protocol fee + 1 organisation fee + 8 next_raffle_id + 1 bump
pub const CONFIG_ACCOUNT_SIZE: usize =
    8 + 32 + (4 + MAX_CURATORS * 32) + 4 * 32 + 2 * 32 + 1 + 1 + 8 + 1;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    /// Owner of the deployment. Holds every role.
    Admin,
    /// May create, cancel and settle raffles and move raffle funds.
    Curator,
}

#[account]
pub struct Config {
    pub admin: Pubkey,
    pub curators: Vec<Pubkey>,
    /// Receives the platform prize share and the protocol fee
    pub platform_wallet: Pubkey,
    /// Receives the author prize share of raffles created from now on
    pub prize_author: Pubkey,
    /// Receives the organisation fee and any swept reward tokens
    pub organisation_wallet: Pubkey,
    /// Receives net donations once a raffle is released
    pub treasury_wallet: Pubkey,
    pub donation_mint: Pubkey,
    pub reward_mint: Pubkey,
    pub protocol_fee_percent: u8,
    pub organisation_fee_percent: u8,
    pub next_raffle_id: u64,
    pub bump: u8,
}

impl Config {
    pub fn has_role(&self, who: &Pubkey, role: Role) -> bool {
        if *who == self.admin {
            return true;
        }
        match role {
            Role::Admin => false,
            Role::Curator => self.curators.contains(who),
        }
    }

    /// Returns false when `curator` already held the role.
    pub fn grant_curator(&mut self, curator: Pubkey) -> Result<bool> {
        require_nonzero(&curator)?;
        if self.curators.contains(&curator) {
            return Ok(false);
        }
        require!(
            self.curators.len() < MAX_CURATORS,
            RaffleError::CuratorListFull
        );
        self.curators.push(curator);
        Ok(true)
    }

    /// Returns false when `curator` did not hold the role.
    pub fn revoke_curator(&mut self, curator: &Pubkey) -> bool {
        let before = self.curators.len();
        self.curators.retain(|existing| existing != curator);
        self.curators.len() != before
    }

    pub fn fee_schedule(&self) -> FeeSchedule {
        FeeSchedule {
            protocol_fee_percent: self.protocol_fee_percent,
            organisation_fee_percent: self.organisation_fee_percent,
        }
    }

    pub fn set_fees(&mut self, protocol_fee_percent: u8, organisation_fee_percent: u8) -> Result<()> {
        FeeSchedule::new(protocol_fee_percent, organisation_fee_percent)?;
        self.protocol_fee_percent = protocol_fee_percent;
        self.organisation_fee_percent = organisation_fee_percent;
        Ok(())
    }

    /// Hands out the next raffle id.
    pub fn take_raffle_id(&mut self) -> Result<u64> {
        let id = self.next_raffle_id;
        self.next_raffle_id = id.checked_add(1).ok_or(RaffleError::Overflow)?;
        Ok(id)
    }
}

pub fn require_nonzero(key: &Pubkey) -> Result<()> {
    require!(*key != Pubkey::default(), RaffleError::ZeroAddressNotAllowed);
    Ok(())
}
