use anchor_lang::prelude::*;

use crate::{
    error::RaffleError,
    utils::{match_weight, reward_share, reward_shares, total_match_weight},
};

/// Cancellation and settlement pass one token account per donor, so the
/// donor set has to fit in a single transaction.
pub const MAX_DONORS_PER_RAFFLE: usize = 48;

// 32 donor + 8 total_donated + 4 donation_count + 1 claimed
pub const DONOR_ACCOUNT_SIZE: usize = 32 + 8 + 4 + 1;

// 8 discriminator + 32 raffle + 1 bump + 4 vec length + donors
pub const DONOR_LEDGER_ACCOUNT_SIZE: usize =
    8 + 32 + 1 + 4 + MAX_DONORS_PER_RAFFLE * DONOR_ACCOUNT_SIZE;

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct DonorAccount {
    pub donor: Pubkey,
    /// Gross, sum of every donation by this donor to the raffle
    pub total_donated: u64,
    pub donation_count: u32,
    pub claimed: bool,
}

/// Every donor of one raffle in order of their first donation.
#[account]
pub struct DonorLedger {
    pub raffle: Pubkey,
    pub bump: u8,
    pub donors: Vec<DonorAccount>,
}

impl DonorLedger {
    pub fn position(&self, donor: &Pubkey) -> Option<usize> {
        self.donors.iter().position(|entry| entry.donor == *donor)
    }

    pub fn get(&self, donor: &Pubkey) -> Option<&DonorAccount> {
        self.donors.iter().find(|entry| entry.donor == *donor)
    }

    pub fn total_for(&self, donor: &Pubkey) -> u64 {
        self.get(donor).map_or(0, |entry| entry.total_donated)
    }

    pub fn len(&self) -> usize {
        self.donors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.donors.is_empty()
    }

    pub fn donors(&self) -> impl Iterator<Item = &Pubkey> {
        self.donors.iter().map(|entry| &entry.donor)
    }

    /// Gross totals in registry order, used as draw weights.
    pub fn weights(&self) -> Vec<u64> {
        self.donors.iter().map(|entry| entry.total_donated).collect()
    }

    /// What a cancellation pays back: each donor's gross total, in registry
    /// order.
    pub fn refunds(&self) -> Vec<(Pubkey, u64)> {
        self.donors
            .iter()
            .map(|entry| (entry.donor, entry.total_donated))
            .collect()
    }

    pub fn total_donated(&self) -> Result<u64> {
        self.donors.iter().try_fold(0u64, |acc, entry| {
            acc.checked_add(entry.total_donated)
                .ok_or_else(|| error!(RaffleError::Overflow))
        })
    }

    /// Adds `amount` to the donor's running total. Returns true when this is
    /// the donor's first donation to the raffle.
    pub fn record(&mut self, donor: Pubkey, amount: u64) -> Result<bool> {
        if let Some(entry) = self.donors.iter_mut().find(|entry| entry.donor == donor) {
            entry.total_donated = entry
                .total_donated
                .checked_add(amount)
                .ok_or(RaffleError::Overflow)?;
            entry.donation_count = entry
                .donation_count
                .checked_add(1)
                .ok_or(RaffleError::Overflow)?;
            return Ok(false);
        }

        require!(
            self.donors.len() < MAX_DONORS_PER_RAFFLE,
            RaffleError::TooManyDonors
        );
        self.donors.push(DonorAccount {
            donor,
            total_donated: amount,
            donation_count: 1,
            claimed: false,
        });
        Ok(true)
    }

    pub fn total_match_weight(&self) -> Result<u128> {
        total_match_weight(self.donors.iter().map(|entry| entry.total_donated))
    }

    /// The donor's share of `allocation`, whether or not it was claimed.
    pub fn reward_for(&self, donor: &Pubkey, allocation: u64) -> Result<u64> {
        let Some(entry) = self.get(donor) else {
            return Ok(0);
        };
        reward_share(
            allocation,
            match_weight(entry.total_donated),
            self.total_match_weight()?,
        )
    }

    /// What the donor could claim right now.
    pub fn claimable(&self, donor: &Pubkey, allocation: u64) -> Result<u64> {
        match self.get(donor) {
            Some(entry) if !entry.claimed => self.reward_for(donor, allocation),
            _ => Ok(0),
        }
    }

    /// Marks the donor's reward as claimed and returns it.
    pub fn claim(&mut self, donor: &Pubkey, allocation: u64) -> Result<u64> {
        let index = self
            .position(donor)
            .ok_or(RaffleError::CannotClaimRewards)?;
        require!(
            !self.donors[index].claimed,
            RaffleError::CannotClaimRewards
        );

        let amount = self.reward_for(donor, allocation)?;
        self.donors[index].claimed = true;
        Ok(amount)
    }

    /// Rewards still owed to donors that have not claimed.
    pub fn outstanding_rewards(&self, allocation: u64) -> Result<u64> {
        let shares = reward_shares(allocation, &self.weights())?;
        self.donors
            .iter()
            .zip(shares)
            .filter(|(entry, _)| !entry.claimed)
            .try_fold(0u64, |acc, (_, share)| {
                acc.checked_add(share)
                    .ok_or_else(|| error!(RaffleError::Overflow))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        state::raffle::tests::{create_test_raffle, END, START},
        utils::FeeSchedule,
    };

    const USDC: u64 = 1_000_000;

    fn create_test_ledger() -> DonorLedger {
        DonorLedger {
            raffle: Pubkey::new_unique(),
            bump: 253,
            donors: vec![],
        }
    }

    #[test]
    fn test_record_dedups_and_keeps_first_donation_order() {
        let mut ledger = create_test_ledger();
        let alice = Pubkey::new_unique();
        let bob = Pubkey::new_unique();

        assert!(ledger.record(alice, 100).unwrap());
        assert!(ledger.record(bob, 50).unwrap());
        assert!(!ledger.record(alice, 25).unwrap());

        assert_eq!(ledger.len(), 2);
        assert_eq!(ledger.donors().collect::<Vec<_>>(), vec![&alice, &bob]);
        assert_eq!(ledger.position(&bob), Some(1));
        assert_eq!(ledger.total_for(&alice), 125);
        assert_eq!(ledger.get(&alice).unwrap().donation_count, 2);
        assert_eq!(ledger.weights(), vec![125, 50]);
        assert_eq!(ledger.total_donated().unwrap(), 175);
        assert_eq!(ledger.total_for(&Pubkey::new_unique()), 0);
    }

    #[test]
    fn test_ledger_capacity() {
        let mut ledger = create_test_ledger();
        for _ in 0..MAX_DONORS_PER_RAFFLE {
            ledger.record(Pubkey::new_unique(), 1).unwrap();
        }
        assert_eq!(
            ledger.record(Pubkey::new_unique(), 1).unwrap_err(),
            RaffleError::TooManyDonors.into()
        );

        // existing donors can still add to their total
        let first = ledger.donors[0].donor;
        assert!(!ledger.record(first, 1).unwrap());
        assert_eq!(ledger.total_for(&first), 2);
    }

    #[test]
    fn test_two_donors_claim_and_dust_stays() {
        let mut raffle = create_test_raffle();
        let mut ledger = create_test_ledger();
        let alice = Pubkey::new_unique();
        let bob = Pubkey::new_unique();

        ledger.record(alice, 150 * USDC).unwrap();
        ledger.record(bob, 370 * USDC).unwrap();
        raffle.settle(END).unwrap();

        assert_eq!(ledger.claimable(&alice, raffle.reward_allocation).unwrap(), 389);
        assert_eq!(ledger.outstanding_rewards(raffle.reward_allocation).unwrap(), 999);

        let amount = ledger.claim(&alice, raffle.reward_allocation).unwrap();
        raffle.record_claim(amount).unwrap();
        let amount = ledger.claim(&bob, raffle.reward_allocation).unwrap();
        raffle.record_claim(amount).unwrap();

        assert_eq!(raffle.rewards_claimed, 999);
        assert_eq!(raffle.reward_buffer_remaining(), 1);
        assert_eq!(ledger.outstanding_rewards(raffle.reward_allocation).unwrap(), 0);
        assert!(raffle.rewards_conserved());
    }

    #[test]
    fn test_claims_are_independent_of_order() {
        let totals = [150 * USDC, 370 * USDC, 260 * USDC];
        let donors: Vec<Pubkey> = totals.iter().map(|_| Pubkey::new_unique()).collect();

        let mut forward = create_test_ledger();
        let mut backward = create_test_ledger();
        for (donor, total) in donors.iter().zip(totals) {
            forward.record(*donor, total).unwrap();
            backward.record(*donor, total).unwrap();
        }

        let first: Vec<u64> = donors
            .iter()
            .map(|donor| forward.claim(donor, 1_000).unwrap())
            .collect();
        let mut second: Vec<u64> = donors
            .iter()
            .rev()
            .map(|donor| backward.claim(donor, 1_000).unwrap())
            .collect();
        second.reverse();

        assert_eq!(first, vec![257, 404, 338]);
        assert_eq!(first, second);
    }

    #[test]
    fn test_no_double_claim() {
        let mut ledger = create_test_ledger();
        let alice = Pubkey::new_unique();
        ledger.record(alice, 10 * USDC).unwrap();

        assert_eq!(ledger.claim(&alice, 500).unwrap(), 500);
        assert_eq!(
            ledger.claim(&alice, 500).unwrap_err(),
            RaffleError::CannotClaimRewards.into()
        );
        assert_eq!(ledger.claimable(&alice, 500).unwrap(), 0);
        // the share itself is still reported
        assert_eq!(ledger.reward_for(&alice, 500).unwrap(), 500);
    }

    #[test]
    fn test_non_donor_cannot_claim() {
        let mut ledger = create_test_ledger();
        ledger.record(Pubkey::new_unique(), 10 * USDC).unwrap();

        let stranger = Pubkey::new_unique();
        assert_eq!(ledger.claimable(&stranger, 1_000).unwrap(), 0);
        assert_eq!(
            ledger.claim(&stranger, 1_000).unwrap_err(),
            RaffleError::CannotClaimRewards.into()
        );
    }

    #[test]
    fn test_donation_totals_match_raffle() {
        let mut raffle = create_test_raffle();
        let mut ledger = create_test_ledger();
        let schedule = FeeSchedule::new(4, 6).unwrap();
        let donors = [Pubkey::new_unique(), Pubkey::new_unique()];
        let amounts = [(0usize, 200 * USDC), (1, 150 * USDC), (0, 300 * USDC)];

        for (index, amount) in amounts {
            let is_new = ledger.record(donors[index], amount).unwrap();
            let split = schedule.split(amount).unwrap();
            raffle
                .record_donation(donors[index], amount, &split, is_new)
                .unwrap();
        }

        assert_eq!(ledger.total_donated().unwrap(), raffle.total_donations);
        assert_eq!(raffle.donor_count as usize, ledger.len());
        assert_eq!(raffle.top_donor, donors[0]);
        assert_eq!(raffle.highest_donation(), 300 * USDC);
    }

    #[test]
    fn test_cancel_refunds_gross_totals() {
        let mut raffle = create_test_raffle();
        let mut ledger = create_test_ledger();
        let schedule = FeeSchedule::new(4, 6).unwrap();
        let d1 = Pubkey::new_unique();
        let d2 = Pubkey::new_unique();

        for (donor, amount) in [(d1, 200 * USDC), (d2, 300 * USDC)] {
            let is_new = ledger.record(donor, amount).unwrap();
            let split = schedule.split(amount).unwrap();
            raffle.record_donation(donor, amount, &split, is_new).unwrap();
        }
        // fees are recorded at deposit but still sit in the vault
        assert_eq!(raffle.protocol_fees, 20 * USDC);
        assert_eq!(raffle.organisation_fees, 30 * USDC);

        assert_eq!(raffle.cancel(START).unwrap(), 1_000);

        let refunds = ledger.refunds();
        assert_eq!(refunds, vec![(d1, 200 * USDC), (d2, 300 * USDC)]);
        let refunded: u64 = refunds.iter().map(|(_, amount)| amount).sum();
        assert_eq!(refunded, raffle.total_donations);
        assert_eq!(refunded, 500 * USDC);
        assert!(raffle.rewards_conserved());

        assert_eq!(
            raffle.release_donations().unwrap_err(),
            RaffleError::RaffleCancelled.into()
        );
    }

    #[test]
    fn test_no_refunds_without_donors() {
        let ledger = create_test_ledger();
        assert!(ledger.refunds().is_empty());
        assert_eq!(ledger.total_donated().unwrap(), 0);
    }
}
