use anchor_lang::prelude::*;

use crate::error::RaffleError;

pub const MAX_FEE_PERCENT: u8 = 100;

/// Protocol and organisation cut taken from every gross donation.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FeeSchedule {
    pub protocol_fee_percent: u8,
    pub organisation_fee_percent: u8,
}

/// Result of depositing a gross donation: what each party is owed once the
/// raffle's donations are released.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FeeSplit {
    pub protocol: u64,
    pub organisation: u64,
    pub net: u64,
}

impl FeeSchedule {
    pub fn new(protocol_fee_percent: u8, organisation_fee_percent: u8) -> Result<Self> {
        let schedule = Self {
            protocol_fee_percent,
            organisation_fee_percent,
        };
        schedule.validate()?;
        Ok(schedule)
    }

    pub fn validate(&self) -> Result<()> {
        require!(
            self.protocol_fee_percent <= MAX_FEE_PERCENT,
            RaffleError::InvalidFee
        );
        require!(
            self.organisation_fee_percent <= MAX_FEE_PERCENT,
            RaffleError::InvalidFee
        );
        let combined = self
            .protocol_fee_percent
            .checked_add(self.organisation_fee_percent)
            .ok_or(RaffleError::InvalidFee)?;
        require!(combined <= MAX_FEE_PERCENT, RaffleError::InvalidFee);
        Ok(())
    }

    /// Splits a gross amount. Each fee is floored, so any rounding dust stays
    /// with the net amount.
    pub fn split(&self, gross: u64) -> Result<FeeSplit> {
        let protocol = percent_of(gross, self.protocol_fee_percent)?;
        let organisation = percent_of(gross, self.organisation_fee_percent)?;
        let net = gross
            .checked_sub(protocol)
            .and_then(|rest| rest.checked_sub(organisation))
            .ok_or(RaffleError::Overflow)?;

        Ok(FeeSplit {
            protocol,
            organisation,
            net,
        })
    }
}

fn percent_of(amount: u64, percent: u8) -> Result<u64> {
    let value = (amount as u128)
        .checked_mul(percent as u128)
        .ok_or(RaffleError::Overflow)?
        / MAX_FEE_PERCENT as u128;
    u64::try_from(value).map_err(|_| error!(RaffleError::Overflow))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_with_combined_ten_percent() {
        let schedule = FeeSchedule::new(4, 6).unwrap();

        let split = schedule.split(200_000_000).unwrap();
        assert_eq!(split.protocol, 8_000_000);
        assert_eq!(split.organisation, 12_000_000);
        assert_eq!(split.net, 180_000_000);
    }

    #[test]
    fn test_rounding_dust_stays_in_net() {
        let schedule = FeeSchedule::new(3, 3).unwrap();

        let split = schedule.split(99).unwrap();
        assert_eq!(split.protocol, 2);
        assert_eq!(split.organisation, 2);
        assert_eq!(split.net, 95);
        assert_eq!(split.protocol + split.organisation + split.net, 99);
    }

    #[test]
    fn test_zero_fees_keep_gross() {
        let split = FeeSchedule::default().split(1_234).unwrap();
        assert_eq!(split, FeeSplit { protocol: 0, organisation: 0, net: 1_234 });
    }

    #[test]
    fn test_full_fee_is_allowed() {
        let split = FeeSchedule::new(100, 0).unwrap().split(500).unwrap();
        assert_eq!(split.protocol, 500);
        assert_eq!(split.net, 0);
    }

    #[test]
    fn test_rejects_fees_outside_range() {
        assert_eq!(
            FeeSchedule::new(101, 0).unwrap_err(),
            RaffleError::InvalidFee.into()
        );
        assert_eq!(
            FeeSchedule::new(60, 41).unwrap_err(),
            RaffleError::InvalidFee.into()
        );
        assert_eq!(
            FeeSchedule::new(200, 200).unwrap_err(),
            RaffleError::InvalidFee.into()
        );
    }

    #[test]
    fn test_split_large_amount_does_not_overflow() {
        let split = FeeSchedule::new(50, 50).unwrap().split(u64::MAX).unwrap();
        assert_eq!(split.protocol, u64::MAX / 2);
        assert_eq!(split.organisation, u64::MAX / 2);
        assert_eq!(split.net, 1);
    }
}
