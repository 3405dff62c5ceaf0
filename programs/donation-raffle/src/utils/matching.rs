//! Square-root reward matching.
//!
//! A donor's share of a raffle's reward buffer is
//! `floor(buffer * sqrt(d_i) / sum_j sqrt(d_j))`. Square roots are taken over
//! integers with floor semantics so every validator computes the same value.
//! Donations are scaled by `MATCH_PRECISION` before the root so small raw
//! amounts keep enough significant digits.
use anchor_lang::prelude::*;

use crate::error::RaffleError;

/// 10^12, i.e. six decimal digits of precision on the square root.
pub const MATCH_PRECISION: u128 = 1_000_000_000_000;

/// Floor of the square root of `n`, computed with Newton's method.
pub fn isqrt(n: u128) -> u128 {
    if n < 2 {
        return n;
    }

    let bits = 128 - n.leading_zeros();
    // Start above the root so the iteration decreases monotonically
    let mut x = 1u128 << ((bits + 1) / 2);
    loop {
        let y = (x + n / x) / 2;
        if y >= x {
            return x;
        }
        x = y;
    }
}

/// Match weight of a donor's gross total donation.
pub fn match_weight(total_donated: u64) -> u128 {
    // u64::MAX * 10^12 < u128::MAX
    isqrt(total_donated as u128 * MATCH_PRECISION)
}

/// Sum of the match weights of every donor total.
pub fn total_match_weight<I>(totals: I) -> Result<u128>
where
    I: IntoIterator<Item = u64>,
{
    totals.into_iter().try_fold(0u128, |acc, total| {
        acc.checked_add(match_weight(total))
            .ok_or_else(|| error!(RaffleError::Overflow))
    })
}

/// `floor(buffer * weight / total_weight)`. Returns zero when nobody holds
/// any weight.
pub fn reward_share(buffer: u64, weight: u128, total_weight: u128) -> Result<u64> {
    if total_weight == 0 {
        return Ok(0);
    }
    require!(weight <= total_weight, RaffleError::Overflow);

    let share = (buffer as u128)
        .checked_mul(weight)
        .ok_or(RaffleError::Overflow)?
        / total_weight;
    u64::try_from(share).map_err(|_| error!(RaffleError::Overflow))
}

/// Every donor's reward for a buffer, in input order.
pub fn reward_shares(buffer: u64, totals: &[u64]) -> Result<Vec<u64>> {
    let total_weight = total_match_weight(totals.iter().copied())?;
    totals
        .iter()
        .map(|total| reward_share(buffer, match_weight(*total), total_weight))
        .collect()
}
