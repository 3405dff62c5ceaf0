use anchor_lang::prelude::*;

use crate::{error::RaffleError, utils::FeeSplit};

// Space calculation:
// 8 (discriminator) +
// 8 (id) +
// 4 * 32 (curator, prize_mint, prize_owner, prize_author) +
// 8 (prize_quantity) +
// 8 + 8 (start_time, end_time) +
// 8 (minimum_donation) +
// 32 + 8 (top_donor, top_donated_amount) +
// 8 + 8 + 8 (total_donations, protocol_fees, organisation_fees) +
// 8 (next_donation_id) +
// 4 (donor_count) +
// 32 (reward_mint) +
// 5 * 8 (reward_allocation, reward_buffer, rewards_claimed, rewards_withdrawn, rewards_refunded) +
// 3 (cancelled, rewarded, donations_released) +
// 8 (created_at) +
// 1 (bump)
pub const RAFFLE_ACCOUNT_SIZE: usize =
    8 + 8 + 4 * 32 + 8 + 8 + 8 + 8 + 32 + 8 + 8 + 8 + 8 + 8 + 4 + 32 + 5 * 8 + 3 + 8 + 1;

/// Derived from the raffle's flags and the current time, never stored.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RaffleStatus {
    Pending,
    Active,
    Ended,
    Rewarded,
    Cancelled,
}

#[account]
pub struct Raffle {
    pub id: u64,
    pub curator: Pubkey,
    pub prize_mint: Pubkey,
    /// Receives the prize back on cancellation
    pub prize_owner: Pubkey,
    pub prize_author: Pubkey,
    pub prize_quantity: u64,
    pub start_time: i64,
    pub end_time: i64,
    pub minimum_donation: u64,
    pub top_donor: Pubkey,
    /// Largest single donation so far
    pub top_donated_amount: u64,
    /// Gross, before fees
    pub total_donations: u64,
    pub protocol_fees: u64,
    pub organisation_fees: u64,
    pub next_donation_id: u64,
    pub donor_count: u32,
    pub reward_mint: Pubkey,
    /// Reward tokens allocated to the raffle, zero when rewards are disabled
    pub reward_allocation: u64,
    /// Reward tokens still held by the raffle
    pub reward_buffer: u64,
    pub rewards_claimed: u64,
    pub rewards_withdrawn: u64,
    pub rewards_refunded: u64,
    pub cancelled: bool,
    pub rewarded: bool,
    pub donations_released: bool,
    pub created_at: i64,
    pub bump: u8,
}

impl Raffle {
    pub fn status(&self, now: i64) -> RaffleStatus {
        if self.cancelled {
            RaffleStatus::Cancelled
        } else if self.rewarded {
            RaffleStatus::Rewarded
        } else if now >= self.end_time {
            RaffleStatus::Ended
        } else if now < self.start_time {
            RaffleStatus::Pending
        } else {
            RaffleStatus::Active
        }
    }

    pub fn rewards_enabled(&self) -> bool {
        self.reward_allocation > 0
    }

    pub fn ensure_accepts_donation(&self, amount: u64, now: i64) -> Result<()> {
        match self.status(now) {
            RaffleStatus::Active => {}
            RaffleStatus::Pending => return err!(RaffleError::RaffleHasNotStarted),
            _ => return err!(RaffleError::RaffleHasEnded),
        }
        require!(
            amount >= self.minimum_donation,
            RaffleError::DonationTooLow
        );
        Ok(())
    }

    /// Books a gross donation and returns its id. The top donor only changes
    /// on a strictly larger donation, so ties keep the earliest donor.
    pub fn record_donation(
        &mut self,
        donor: Pubkey,
        amount: u64,
        split: &FeeSplit,
        is_new_donor: bool,
    ) -> Result<u64> {
        self.total_donations = self
            .total_donations
            .checked_add(amount)
            .ok_or(RaffleError::Overflow)?;
        self.protocol_fees = self
            .protocol_fees
            .checked_add(split.protocol)
            .ok_or(RaffleError::Overflow)?;
        self.organisation_fees = self
            .organisation_fees
            .checked_add(split.organisation)
            .ok_or(RaffleError::Overflow)?;

        if amount > self.top_donated_amount {
            self.top_donor = donor;
            self.top_donated_amount = amount;
        }

        if is_new_donor {
            self.donor_count = self
                .donor_count
                .checked_add(1)
                .ok_or(RaffleError::Overflow)?;
        }

        let id = self.next_donation_id;
        self.next_donation_id = id.checked_add(1).ok_or(RaffleError::Overflow)?;
        Ok(id)
    }

    pub fn ensure_cancellable(&self, now: i64) -> Result<()> {
        match self.status(now) {
            RaffleStatus::Pending | RaffleStatus::Active => Ok(()),
            RaffleStatus::Cancelled => err!(RaffleError::RaffleCancelled),
            RaffleStatus::Ended | RaffleStatus::Rewarded => err!(RaffleError::RaffleHasEnded),
        }
    }

    /// Marks the raffle cancelled and returns the reward tokens to send back
    /// to the organisation.
    pub fn cancel(&mut self, now: i64) -> Result<u64> {
        self.ensure_cancellable(now)?;

        let refunded = self.reward_buffer;
        self.rewards_refunded = self
            .rewards_refunded
            .checked_add(refunded)
            .ok_or(RaffleError::Overflow)?;
        self.reward_buffer = 0;
        self.cancelled = true;
        Ok(refunded)
    }

    pub fn ensure_settleable(&self, now: i64) -> Result<()> {
        match self.status(now) {
            RaffleStatus::Ended => Ok(()),
            RaffleStatus::Cancelled => err!(RaffleError::RaffleCancelled),
            RaffleStatus::Rewarded => err!(RaffleError::RaffleAlreadyRewarded),
            RaffleStatus::Pending | RaffleStatus::Active => err!(RaffleError::RaffleHasNotEnded),
        }
    }

    pub fn settle(&mut self, now: i64) -> Result<()> {
        self.ensure_settleable(now)?;
        self.rewarded = true;
        Ok(())
    }

    pub fn enable_rewards(&mut self, amount: u64, now: i64) -> Result<()> {
        require!(!self.cancelled, RaffleError::RaffleCancelled);
        require!(now < self.end_time, RaffleError::RaffleHasEnded);
        require!(!self.rewards_enabled(), RaffleError::RewardsAlreadyEnabled);
        require!(amount > 0, RaffleError::InsufficientAmount);

        self.reward_allocation = amount;
        self.reward_buffer = amount;
        Ok(())
    }

    /// Claims are only open once the donor set is closed.
    pub fn ensure_claimable(&self, now: i64) -> Result<()> {
        require!(self.rewards_enabled(), RaffleError::NoRewardsForRaffle);
        match self.status(now) {
            RaffleStatus::Ended | RaffleStatus::Rewarded => Ok(()),
            RaffleStatus::Cancelled => err!(RaffleError::RaffleCancelled),
            RaffleStatus::Pending | RaffleStatus::Active => err!(RaffleError::RaffleHasNotEnded),
        }
    }

    pub fn record_claim(&mut self, amount: u64) -> Result<()> {
        self.reward_buffer = self
            .reward_buffer
            .checked_sub(amount)
            .ok_or(RaffleError::Overflow)?;
        self.rewards_claimed = self
            .rewards_claimed
            .checked_add(amount)
            .ok_or(RaffleError::Overflow)?;
        Ok(())
    }

    /// Reward tokens not owed to any donor that has yet to claim.
    pub fn withdrawable_rewards(&self, outstanding: u64) -> u64 {
        self.reward_buffer.saturating_sub(outstanding)
    }

    pub fn withdraw_rewards(&mut self, amount: u64, outstanding: u64) -> Result<()> {
        require!(!self.cancelled, RaffleError::RaffleCancelled);
        require!(self.rewarded, RaffleError::RaffleNotRewarded);
        require!(
            amount > 0 && amount <= self.withdrawable_rewards(outstanding),
            RaffleError::InsufficientAmount
        );

        self.reward_buffer -= amount;
        self.rewards_withdrawn = self
            .rewards_withdrawn
            .checked_add(amount)
            .ok_or(RaffleError::Overflow)?;
        Ok(())
    }

    /// Fee and net amounts owed out of the donation vault once the raffle is
    /// settled. Can only be taken once.
    pub fn release_donations(&mut self) -> Result<FeeSplit> {
        require!(!self.cancelled, RaffleError::RaffleCancelled);
        require!(self.rewarded, RaffleError::RaffleNotRewarded);
        require!(
            !self.donations_released,
            RaffleError::DonationsAlreadyReleased
        );

        self.donations_released = true;
        Ok(FeeSplit {
            protocol: self.protocol_fees,
            organisation: self.organisation_fees,
            net: self.net_donations()?,
        })
    }

    pub fn net_donations(&self) -> Result<u64> {
        self.total_donations
            .checked_sub(self.protocol_fees)
            .and_then(|rest| rest.checked_sub(self.organisation_fees))
            .ok_or_else(|| error!(RaffleError::Overflow))
    }

    pub fn reward_buffer_remaining(&self) -> u64 {
        self.reward_buffer
    }

    pub fn highest_donation(&self) -> u64 {
        self.top_donated_amount
    }

    /// claimed + remaining + withdrawn + refunded == allocation
    pub fn rewards_conserved(&self) -> bool {
        let accounted = self.rewards_claimed as u128
            + self.reward_buffer as u128
            + self.rewards_withdrawn as u128
            + self.rewards_refunded as u128;
        accounted == self.reward_allocation as u128
    }
}
