use std::str::FromStr;

use anchor_lang::prelude::*;
use arrayref::array_ref;

use crate::error::RaffleError;

const SLOT_HASHES_SYSVAR: &str = "SysvarS1otHashes111111111111111111111111111";

/// splitmix64 increment
const GOLDEN_GAMMA: u64 = 0x9e3779b97f4a7c15;

/// Source of the seed used to draw prize winners.
///
/// Settlement only ever sees a `u64` seed, so the selection algorithm stays
/// deterministic for a given seed and donor set. Swapping in a verifiable
/// randomness provider only needs a new implementation of this trait.
pub trait EntropySource {
    fn seed(&self) -> Result<u64>;
}

/// Block-derived entropy from the SlotHashes sysvar mixed with the clock.
///
/// Not cryptographically secure: a leader that controls transaction ordering
/// can influence which hash is observed.
pub struct SlotHashesEntropy<'a, 'info> {
    slot_hashes: &'a AccountInfo<'info>,
    unix_timestamp: i64,
}

impl<'a, 'info> SlotHashesEntropy<'a, 'info> {
    pub fn new(slot_hashes: &'a AccountInfo<'info>, unix_timestamp: i64) -> Result<Self> {
        // Anchor refuses to deserialize SlotHashes, so the key is checked by hand
        let pubkey_matches = Pubkey::from_str(SLOT_HASHES_SYSVAR)
            .or(Err(RaffleError::InvalidSlotHashesAccount))?
            .eq(slot_hashes.key);
        require!(pubkey_matches, RaffleError::InvalidSlotHashesAccount);

        Ok(Self {
            slot_hashes,
            unix_timestamp,
        })
    }
}

impl EntropySource for SlotHashesEntropy<'_, '_> {
    fn seed(&self) -> Result<u64> {
        let data = self.slot_hashes.try_borrow_data()?;
        require!(data.len() >= 20, RaffleError::InvalidSlotHashesAccount);

        // Skip the 8 byte vec length and the 8 byte slot of the newest entry
        let chunk1 = array_ref![data, 12, 8];
        let chunk2 = if data.len() >= 28 {
            array_ref![data, 20, 8]
        } else {
            chunk1
        };

        let hash_value1 = u64::from_le_bytes(*chunk1);
        let hash_value2 = u64::from_le_bytes(*chunk2);

        let mixed = mix(hash_value1, self.unix_timestamp as u64);
        Ok(mix(mixed, hash_value2))
    }
}

/// Caller-supplied seed. Used by tests and by replays of a past settlement.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FixedEntropy(pub u64);

impl EntropySource for FixedEntropy {
    fn seed(&self) -> Result<u64> {
        Ok(self.0)
    }
}

/// Reproducible stream of draws expanded from one seed (splitmix64).
#[derive(Clone, Debug)]
pub struct DrawSequence {
    state: u64,
}

impl DrawSequence {
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }
}

impl Iterator for DrawSequence {
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        self.state = self.state.wrapping_add(GOLDEN_GAMMA);
        Some(mix(self.state, 0))
    }
}

/// splitmix64 finalizer over `a + b`.
pub fn mix(a: u64, b: u64) -> u64 {
    let mut z = a.wrapping_add(b);

    z = (z ^ (z >> 30)).wrapping_mul(0xbf58476d1ce4e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d049bb133111eb);
    z ^ (z >> 31)
}

/// Maps a random value into `[0, range)`, rejecting values from the biased
/// tail a bounded number of times.
pub fn unbiased_range(x: u64, range: u64) -> Result<u64> {
    require!(range > 0, RaffleError::NoEligibleDonors);

    if range.is_power_of_two() {
        return Ok(x & (range - 1));
    }

    let threshold = u64::MAX - (u64::MAX % range);
    let mut value = x;

    const MAX_ATTEMPTS: u8 = 3;

    for i in 0..MAX_ATTEMPTS {
        if value < threshold {
            return Ok(value % range);
        }
        value = mix(value, value.wrapping_add(i as u64 + 1));
    }

    // Fallback, the bias left after remixing is minimal
    Ok(value % range)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draw_sequence_is_reproducible() {
        let first: Vec<u64> = DrawSequence::new(42).take(16).collect();
        let second: Vec<u64> = DrawSequence::new(42).take(16).collect();
        assert_eq!(first, second);

        let other: Vec<u64> = DrawSequence::new(43).take(16).collect();
        assert_ne!(first, other);
    }

    #[test]
    fn test_draw_sequence_does_not_repeat_immediately() {
        let draws: Vec<u64> = DrawSequence::new(0).take(64).collect();
        for window in draws.windows(2) {
            assert_ne!(window[0], window[1]);
        }
    }

    #[test]
    fn test_unbiased_range_stays_in_range() {
        for (i, draw) in DrawSequence::new(7).take(500).enumerate() {
            let range = (i as u64 % 97) + 1;
            assert!(unbiased_range(draw, range).unwrap() < range);
        }
        assert!(unbiased_range(u64::MAX, 1_000_003).unwrap() < 1_000_003);
    }

    #[test]
    fn test_unbiased_range_power_of_two_masks() {
        assert_eq!(unbiased_range(0b1011_0110, 16).unwrap(), 0b0110);
        assert_eq!(unbiased_range(12345, 1).unwrap(), 0);
    }

    #[test]
    fn test_unbiased_range_rejects_empty_range() {
        assert_eq!(
            unbiased_range(5, 0).unwrap_err(),
            RaffleError::NoEligibleDonors.into()
        );
    }

    #[test]
    fn test_fixed_entropy_returns_seed() {
        assert_eq!(FixedEntropy(99).seed().unwrap(), 99);
    }

    #[test]
    fn test_slot_hashes_entropy_rejects_other_accounts() {
        let key = Pubkey::new_unique();
        let owner = Pubkey::new_unique();
        let mut lamports = 0u64;
        let mut data = vec![0u8; 40];
        let info = AccountInfo::new(
            &key,
            false,
            false,
            &mut lamports,
            &mut data,
            &owner,
            false,
            0,
        );

        assert!(SlotHashesEntropy::new(&info, 0).is_err());
    }

    #[test]
    fn test_slot_hashes_entropy_mixes_hash_and_clock() {
        let key = Pubkey::from_str(SLOT_HASHES_SYSVAR).unwrap();
        let owner = Pubkey::new_unique();
        let mut lamports = 0u64;
        let mut data: Vec<u8> = (0u8..40).collect();
        let info = AccountInfo::new(
            &key,
            false,
            false,
            &mut lamports,
            &mut data,
            &owner,
            false,
            0,
        );

        let early = SlotHashesEntropy::new(&info, 1_700_000_000).unwrap().seed().unwrap();
        let again = SlotHashesEntropy::new(&info, 1_700_000_000).unwrap().seed().unwrap();
        let later = SlotHashesEntropy::new(&info, 1_700_000_001).unwrap().seed().unwrap();
        assert_eq!(early, again);
        assert_ne!(early, later);
    }
}
