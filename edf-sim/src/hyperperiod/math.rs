/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! GCD and checked LCM over tick counts.

use super::HyperperiodError;
use crate::task::Tick;

/// Euclidean GCD.  `gcd(a, 0) == a`.
pub fn gcd(mut a: Tick, mut b: Tick) -> Tick {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

/// `lcm(a, b) = a / gcd(a, b) * b`, dividing first and checking the multiply.
///
/// Both inputs must be non-zero; the caller filters zero periods out before
/// folding, so a zero here is reported as [`HyperperiodError::NoValidPeriods`]
/// rather than dividing by zero.
pub fn lcm(a: Tick, b: Tick) -> Result<Tick, HyperperiodError> {
    if a == 0 || b == 0 {
        return Err(HyperperiodError::NoValidPeriods);
    }
    (a / gcd(a, b))
        .checked_mul(b)
        .ok_or(HyperperiodError::Overflow { a, b })
}

/// Left fold of [`lcm`] across `periods` in the order given.
///
/// An empty input has no hyperperiod.
pub fn lcm_fold<I>(periods: I) -> Result<Tick, HyperperiodError>
where
    I: IntoIterator<Item = Tick>,
{
    let mut iter = periods.into_iter();
    let first = iter.next().ok_or(HyperperiodError::NoValidPeriods)?;
    iter.try_fold(first, lcm)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gcd_examples() {
        assert_eq!(gcd(12, 9), 3);
        assert_eq!(gcd(20, 5), 5);
        assert_eq!(gcd(7, 4), 1);
        assert_eq!(gcd(6, 6), 6);
        assert_eq!(gcd(9, 0), 9);
    }

    #[test]
    fn lcm_examples() {
        assert_eq!(lcm(3, 6).unwrap(), 6);
        assert_eq!(lcm(12, 9).unwrap(), 36);
        assert_eq!(lcm(4, 5).unwrap(), 20);
    }

    #[test]
    fn lcm_rejects_zero() {
        assert_eq!(lcm(0, 4), Err(HyperperiodError::NoValidPeriods));
    }

    #[test]
    fn lcm_overflow_reports_operands() {
        let a = u64::MAX - 1; // even
        let b = u64::MAX - 2; // odd, coprime to a
        assert_eq!(lcm(a, b), Err(HyperperiodError::Overflow { a, b }));
    }

    #[test]
    fn fold_is_order_independent() {
        assert_eq!(lcm_fold([12, 9, 6]).unwrap(), 36);
        assert_eq!(lcm_fold([6, 9, 12]).unwrap(), 36);
        assert_eq!(lcm_fold([20, 5, 10]).unwrap(), 20);
    }

    #[test]
    fn fold_of_nothing_is_an_error() {
        assert_eq!(
            lcm_fold(std::iter::empty()),
            Err(HyperperiodError::NoValidPeriods)
        );
    }
}
