use anchor_lang::prelude::*;

use crate::{
    error::RaffleError,
    utils::entropy::{unbiased_range, DrawSequence, EntropySource},
};

pub const PLATFORM_SHARES: u64 = 1;
pub const AUTHOR_SHARES: u64 = 1;

/// Upper bound on prize shares so settlement stays within one transaction's
/// compute budget.
pub const MAX_PRIZE_QUANTITY: u64 = 256;

/// How the prize shares held by a raffle are split at settlement.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PrizeAllocation {
    pub platform: u64,
    pub author: u64,
    pub donors: u64,
}

impl PrizeAllocation {
    pub fn for_quantity(quantity: u64) -> Result<Self> {
        require!(
            quantity <= MAX_PRIZE_QUANTITY,
            RaffleError::PrizeQuantityTooHigh
        );
        let donors = quantity
            .checked_sub(PLATFORM_SHARES + AUTHOR_SHARES)
            .ok_or(RaffleError::PrizeQuantityTooLow)?;

        Ok(Self {
            platform: PLATFORM_SHARES,
            author: AUTHOR_SHARES,
            donors,
        })
    }
}

/// Where every prize share of a raffle goes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SettlementPlan {
    pub platform: u64,
    pub author: u64,
    /// Donor shares sent back to the prize owner because nobody donated
    pub returned_to_owner: u64,
    /// Shares won by each donor, in registry order
    pub donor_shares: Vec<u64>,
}

impl SettlementPlan {
    /// `weights` are the donors' gross totals in registry order. An empty
    /// donor set never reads the entropy source.
    pub fn draw<E: EntropySource>(quantity: u64, weights: &[u64], entropy: &E) -> Result<Self> {
        let allocation = PrizeAllocation::for_quantity(quantity)?;

        if weights.is_empty() {
            return Ok(Self {
                platform: allocation.platform,
                author: allocation.author,
                returned_to_owner: allocation.donors,
                donor_shares: Vec::new(),
            });
        }

        let selector = WinnerSelector::new(weights)?;
        Ok(Self {
            platform: allocation.platform,
            author: allocation.author,
            returned_to_owner: 0,
            donor_shares: selector.draw_shares(allocation.donors, entropy)?,
        })
    }

    pub fn donor_total(&self) -> u64 {
        self.donor_shares.iter().sum()
    }
}

/// Weighted draw over a donor population. Weights are the donors' gross
/// totals, in registry order.
pub struct WinnerSelector {
    cumulative: Vec<u64>,
}

impl WinnerSelector {
    pub fn new(weights: &[u64]) -> Result<Self> {
        let mut running = 0u64;
        let cumulative = weights
            .iter()
            .map(|weight| -> Result<u64> {
                running = running
                    .checked_add(*weight)
                    .ok_or(RaffleError::Overflow)?;
                Ok(running)
            })
            .collect::<Result<Vec<u64>>>()?;

        require!(running > 0, RaffleError::NoEligibleDonors);

        Ok(Self { cumulative })
    }

    pub fn total_weight(&self) -> u64 {
        self.cumulative.last().copied().unwrap_or(0)
    }

    /// Index of the donor owning the ticket `draw` maps to. Zero-weight
    /// entries own no tickets and can never be returned.
    pub fn pick(&self, draw: u64) -> Result<usize> {
        let ticket = unbiased_range(draw, self.total_weight())?;
        Ok(self.cumulative.partition_point(|bound| *bound <= ticket))
    }

    /// Draws `shares` winners one at a time and returns how many shares each
    /// donor won, in registry order. A donor may win several times.
    pub fn draw_shares<E: EntropySource>(&self, shares: u64, entropy: &E) -> Result<Vec<u64>> {
        let mut counts = vec![0u64; self.cumulative.len()];
        for draw in DrawSequence::new(entropy.seed()?).take(shares as usize) {
            counts[self.pick(draw)?] += 1;
        }
        Ok(counts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::entropy::FixedEntropy;

    struct UnusedEntropy;

    impl EntropySource for UnusedEntropy {
        fn seed(&self) -> Result<u64> {
            err!(RaffleError::InvalidSlotHashesAccount)
        }
    }

    #[test]
    fn test_prize_allocation() {
        assert_eq!(
            PrizeAllocation::for_quantity(4).unwrap(),
            PrizeAllocation { platform: 1, author: 1, donors: 2 }
        );
        assert_eq!(PrizeAllocation::for_quantity(2).unwrap().donors, 0);
        assert_eq!(
            PrizeAllocation::for_quantity(1).unwrap_err(),
            RaffleError::PrizeQuantityTooLow.into()
        );
    }

    #[test]
    fn test_prize_quantity_is_bounded() {
        assert_eq!(
            PrizeAllocation::for_quantity(MAX_PRIZE_QUANTITY).unwrap().donors,
            MAX_PRIZE_QUANTITY - 2
        );
        assert_eq!(
            PrizeAllocation::for_quantity(MAX_PRIZE_QUANTITY + 1).unwrap_err(),
            RaffleError::PrizeQuantityTooHigh.into()
        );
        assert_eq!(
            PrizeAllocation::for_quantity(u64::MAX).unwrap_err(),
            RaffleError::PrizeQuantityTooHigh.into()
        );
    }

    #[test]
    fn test_pick_maps_tickets_to_owners() {
        let selector = WinnerSelector::new(&[3, 5, 2]).unwrap();
        assert_eq!(selector.total_weight(), 10);

        // a power-of-two total is masked, so tickets map directly
        let selector = WinnerSelector::new(&[4, 8, 4]).unwrap();
        assert_eq!(selector.pick(0).unwrap(), 0);
        assert_eq!(selector.pick(3).unwrap(), 0);
        assert_eq!(selector.pick(4).unwrap(), 1);
        assert_eq!(selector.pick(11).unwrap(), 1);
        assert_eq!(selector.pick(12).unwrap(), 2);
        assert_eq!(selector.pick(15).unwrap(), 2);
        assert_eq!(selector.pick(16).unwrap(), 0);
    }

    #[test]
    fn test_zero_weight_donor_never_wins() {
        let selector = WinnerSelector::new(&[4, 0, 4, 0]).unwrap();
        for ticket in 0..8 {
            let winner = selector.pick(ticket).unwrap();
            assert!(winner == 0 || winner == 2);
        }
        let counts = selector.draw_shares(200, &FixedEntropy(11)).unwrap();
        assert_eq!(counts[1], 0);
        assert_eq!(counts[3], 0);
        assert_eq!(counts[0] + counts[2], 200);
    }

    #[test]
    fn test_same_seed_same_winners() {
        let selector = WinnerSelector::new(&[200, 150, 75, 1]).unwrap();
        let first = selector.draw_shares(32, &FixedEntropy(2024)).unwrap();
        let second = selector.draw_shares(32, &FixedEntropy(2024)).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.iter().sum::<u64>(), 32);
    }

    #[test]
    fn test_single_donor_wins_every_share() {
        let selector = WinnerSelector::new(&[350_000_000]).unwrap();
        assert_eq!(selector.draw_shares(5, &FixedEntropy(1)).unwrap(), vec![5]);
    }

    #[test]
    fn test_no_donors_cannot_be_drawn() {
        assert_eq!(
            WinnerSelector::new(&[]).err().unwrap(),
            RaffleError::NoEligibleDonors.into()
        );
        assert_eq!(
            WinnerSelector::new(&[0, 0]).err().unwrap(),
            RaffleError::NoEligibleDonors.into()
        );
    }

    #[test]
    fn test_draws_follow_weights() {
        let selector = WinnerSelector::new(&[1, 99]).unwrap();
        let counts = selector.draw_shares(1_000, &FixedEntropy(77)).unwrap();

        assert_eq!(counts.iter().sum::<u64>(), 1_000);
        assert!(counts[1] > 900);
        assert!(counts[0] < 100);
    }

    #[test]
    fn test_two_donor_prize_bounds() {
        // 4 share prize: 2 go to donors weighted 200 and 150
        for seed in 0..50u64 {
            let plan =
                SettlementPlan::draw(4, &[200_000_000, 150_000_000], &FixedEntropy(seed)).unwrap();
            assert_eq!(plan.platform, 1);
            assert_eq!(plan.author, 1);
            assert_eq!(plan.returned_to_owner, 0);
            assert_eq!(plan.donor_total(), 2);
            assert!(plan.donor_shares.iter().all(|won| *won <= 2));
        }
    }

    #[test]
    fn test_settlement_without_donors_returns_shares_to_owner() {
        let plan = SettlementPlan::draw(10, &[], &UnusedEntropy).unwrap();
        assert_eq!(
            plan,
            SettlementPlan {
                platform: 1,
                author: 1,
                returned_to_owner: 8,
                donor_shares: vec![],
            }
        );
    }

    #[test]
    fn test_settlement_accounts_for_every_share() {
        let weights = [25_000_000, 400_000_000, 90_000_000];
        let plan = SettlementPlan::draw(MAX_PRIZE_QUANTITY, &weights, &FixedEntropy(5)).unwrap();

        assert_eq!(plan.donor_shares.len(), weights.len());
        assert_eq!(
            plan.platform + plan.author + plan.returned_to_owner + plan.donor_total(),
            MAX_PRIZE_QUANTITY
        );
    }

    #[test]
    fn test_settlement_rejects_oversized_prize() {
        assert_eq!(
            SettlementPlan::draw(MAX_PRIZE_QUANTITY + 1, &[1], &FixedEntropy(0))
                .err()
                .unwrap(),
            RaffleError::PrizeQuantityTooHigh.into()
        );
    }

    #[test]
    fn test_weight_overflow_is_rejected() {
        assert_eq!(
            WinnerSelector::new(&[u64::MAX, 1]).err().unwrap(),
            RaffleError::Overflow.into()
        );
    }
}
