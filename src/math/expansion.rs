//! Error-free floating point transformations and expansion arithmetic.
//!
//! An expansion is a sum of `f64` components, stored least significant
//! first, whose exact value is the mathematical sum of its components.
//! The algorithms follow Shewchuk, "Adaptive Precision Floating-Point
//! Arithmetic and Fast Robust Geometric Predicates" (1997), and assume
//! round-to-nearest-even without overflow or underflow.

use std::cmp::Ordering;

/// Half of the machine epsilon: the relative rounding error bound of one
/// floating point operation.
pub const EPSILON: f64 = f64::EPSILON * 0.5;

/// Splits a 53-bit significand into two 26-bit halves in [`two_product_lo`].
pub const SPLITTER: f64 = 134_217_729.0; // 2^27 + 1

/// Returns the rounding error of `sum_hi = a + b`, so that
/// `a + b == sum_hi + lo` exactly.
#[inline]
#[must_use]
pub fn two_sum_lo(a: f64, b: f64, sum_hi: f64) -> f64 {
    let b_virtual = sum_hi - a;
    let a_virtual = sum_hi - b_virtual;
    (a - a_virtual) + (b - b_virtual)
}

/// Error-free sum: returns `(hi, lo)` with `hi = fl(a + b)` and
/// `a + b == hi + lo` exactly.
#[inline]
#[must_use]
pub fn two_sum(a: f64, b: f64) -> (f64, f64) {
    let hi = a + b;
    (hi, two_sum_lo(a, b, hi))
}

/// Returns the rounding error of `prod_hi = a * b`, so that
/// `a * b == prod_hi + lo` exactly.
#[inline]
#[must_use]
pub fn two_product_lo(a: f64, b: f64, prod_hi: f64) -> f64 {
    let (a_hi, a_lo) = split(a);
    let (b_hi, b_lo) = split(b);
    a_lo * b_lo - (prod_hi - a_hi * b_hi - a_lo * b_hi - a_hi * b_lo)
}

/// Error-free product: returns `(hi, lo)` with `hi = fl(a * b)` and
/// `a * b == hi + lo` exactly.
#[inline]
#[must_use]
pub fn two_product(a: f64, b: f64) -> (f64, f64) {
    let hi = a * b;
    (hi, two_product_lo(a, b, hi))
}

#[inline]
fn split(a: f64) -> (f64, f64) {
    let c = a * SPLITTER;
    let hi = c - (c - a);
    (hi, a - hi)
}

/// Exact sum of two two-component values `(a_hi + a_lo) + (b_hi + b_lo)`.
///
/// Returns a four-component nonoverlapping expansion, least significant
/// first. Some components may be zero.
#[must_use]
pub fn two_two_sum(a_hi: f64, a_lo: f64, b_hi: f64, b_lo: f64) -> [f64; 4] {
    // Two-One-Sum of (a_hi, a_lo) with b_lo.
    let (mid, x0) = two_sum(a_lo, b_lo);
    let (top, low) = two_sum(a_hi, mid);
    // Two-One-Sum of (top, low) with b_hi.
    let (mid, x1) = two_sum(low, b_hi);
    let (x3, x2) = two_sum(top, mid);
    [x0, x1, x2, x3]
}

/// Exact value of the 2x2 determinant `ax * by - ay * bx` as a
/// four-component expansion.
#[must_use]
pub fn cross_product(ax: f64, ay: f64, bx: f64, by: f64) -> [f64; 4] {
    let (axby_hi, axby_lo) = two_product(ax, by);
    let (aybx_hi, aybx_lo) = two_product(ay, bx);
    two_two_sum(axby_hi, axby_lo, -aybx_hi, -aybx_lo)
}

/// Sums two nonoverlapping expansions sorted by increasing magnitude.
///
/// The result is again nonoverlapping and sorted, with zero components
/// eliminated; an empty result means the sum is exactly zero. Its last
/// component carries the sign of the exact sum.
#[must_use]
pub fn expansion_sum(lhs: &[f64], rhs: &[f64]) -> Vec<f64> {
    let mut sum = Vec::with_capacity(lhs.len() + rhs.len());
    let mut merged = MergeByMagnitude::new(lhs, rhs);

    let Some(mut hi) = merged.next() else {
        return sum;
    };

    for next in merged {
        let prev = hi;
        hi = prev + next;
        let lo = two_sum_lo(prev, next, hi);
        if lo != 0.0 {
            sum.push(lo);
        }
    }

    if hi != 0.0 {
        sum.push(hi);
    }
    sum
}

/// Sign of an expansion produced by [`expansion_sum`]: its most
/// significant component, or zero for an empty expansion.
#[must_use]
pub fn expansion_sign(expansion: &[f64]) -> f64 {
    expansion.last().copied().unwrap_or(0.0)
}

/// Approximate value of an expansion, summed from least significant up.
#[must_use]
pub fn estimate(expansion: &[f64]) -> f64 {
    expansion.iter().sum()
}

/// Merges two magnitude-sorted component lists into one.
struct MergeByMagnitude<'a> {
    lhs: &'a [f64],
    rhs: &'a [f64],
}

impl<'a> MergeByMagnitude<'a> {
    fn new(lhs: &'a [f64], rhs: &'a [f64]) -> Self {
        Self { lhs, rhs }
    }
}

impl Iterator for MergeByMagnitude<'_> {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        let take_lhs = match (self.lhs.first(), self.rhs.first()) {
            (None, None) => return None,
            (Some(_), None) => true,
            (None, Some(_)) => false,
            (Some(a), Some(b)) => a.abs().partial_cmp(&b.abs()) != Some(Ordering::Greater),
        };

        let (head, rest) = if take_lhs {
            self.lhs.split_first()?
        } else {
            self.rhs.split_first()?
        };
        if take_lhs {
            self.lhs = rest;
        } else {
            self.rhs = rest;
        }
        Some(*head)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    /// Exact integer value of a dyadic expansion whose components are
    /// multiples of `2^-scale`.
    fn to_scaled_int(expansion: &[f64], scale: i32) -> i128 {
        expansion
            .iter()
            .map(|&c| {
                let scaled = c * 2f64.powi(scale);
                assert_eq!(scaled.fract(), 0.0, "component {c} is not a multiple of 2^-{scale}");
                #[allow(clippy::cast_possible_truncation)]
                let v = scaled as i128;
                v
            })
            .sum()
    }

    #[test]
    fn epsilon_and_splitter_constants() {
        assert_eq!(EPSILON, 2f64.powi(-53));
        assert_eq!(SPLITTER, 2f64.powi(27) + 1.0);
        assert_eq!(1.0 + EPSILON, 1.0);
        assert!(1.0 + 2.0 * EPSILON > 1.0);
    }

    #[test]
    fn two_sum_recovers_lost_bits() {
        let (hi, lo) = two_sum(1.0, 1e-20);
        assert_eq!(hi, 1.0);
        assert_eq!(lo, 1e-20);

        let (hi, lo) = two_sum(0.1, 0.2);
        assert_eq!(hi, 0.1 + 0.2);
        // 0.1 + 0.2 rounds up; the error term is the negative remainder.
        assert!(lo < 0.0);
        assert_eq!(two_sum_lo(0.1, 0.2, hi), lo);
    }

    #[test]
    fn two_product_is_exact_on_wide_integers() {
        let a = 2f64.powi(30) + 3.0;
        let b = 2f64.powi(31) - 7.0;
        let (hi, lo) = two_product(a, b);
        let exact = (2i128.pow(30) + 3) * (2i128.pow(31) - 7);
        assert_eq!(to_scaled_int(&[lo, hi], 0), exact);
        assert_ne!(lo, 0.0);
    }

    #[test]
    fn two_product_of_exact_values_has_no_error() {
        assert_eq!(two_product(1.5, 2.25), (3.375, 0.0));
        assert_eq!(two_product_lo(-4.0, 0.5, -2.0), 0.0);
    }

    #[test]
    fn two_two_sum_is_exact_and_sorted() {
        let a = two_product(2f64.powi(30) + 1.0, 2f64.powi(30) - 1.0);
        let b = two_product(-(2f64.powi(29) + 5.0), 2f64.powi(31) + 3.0);
        let sum = two_two_sum(a.0, a.1, b.0, b.1);

        let exact = (2i128.pow(30) + 1) * (2i128.pow(30) - 1)
            - (2i128.pow(29) + 5) * (2i128.pow(31) + 3);
        assert_eq!(to_scaled_int(&sum, 0), exact);

        let nonzero: Vec<f64> = sum.iter().copied().filter(|c| *c != 0.0).collect();
        assert!(nonzero.windows(2).all(|w| w[0].abs() <= w[1].abs()));
    }

    #[test]
    fn cross_product_matches_integer_determinant() {
        let (ax, ay, bx, by) = (123_456_789.0, 987_654_321.0, 555_555_557.0, 4_444_444_443.0);
        let exact: i128 = 123_456_789 * 4_444_444_443 - 987_654_321 * 555_555_557;
        assert_eq!(to_scaled_int(&cross_product(ax, ay, bx, by), 0), exact);
    }

    #[test]
    fn expansion_sum_cancels_to_empty() {
        let a = cross_product(3.0, 5.0, 7.0, 11.0);
        let b = cross_product(5.0, 3.0, 11.0, 7.0);
        let sum = expansion_sum(&a, &b);
        assert!(sum.is_empty());
        assert_eq!(expansion_sign(&sum), 0.0);
    }

    #[test]
    fn expansion_sum_keeps_tiny_residue() {
        let sum = expansion_sum(&[1e-30, 1.0], &[-1.0]);
        assert_eq!(sum, vec![1e-30]);
        assert!(expansion_sign(&sum) > 0.0);
    }

    #[test]
    fn expansion_sum_eliminates_zero_components() {
        let sum = expansion_sum(&[0.0, 0.0, 2.0], &[0.0, 3.0]);
        assert_eq!(sum, vec![5.0]);
        assert_eq!(estimate(&sum), 5.0);
    }

    #[test]
    fn expansion_sum_with_empty_side() {
        assert_eq!(expansion_sum(&[], &[1.0]), vec![1.0]);
        assert_eq!(expansion_sum(&[-2.0], &[]), vec![-2.0]);
        assert!(expansion_sum(&[], &[]).is_empty());
    }

    #[test]
    fn expansion_sum_is_exact_for_scaled_integers() {
        let a = cross_product(2f64.powi(40) + 1.0, 3.0, 5.0, 2f64.powi(41) - 1.0);
        let b = cross_product(-(2f64.powi(40) + 1.0), 7.0, 9.0, 2f64.powi(41) - 1.0);
        let sum = expansion_sum(&a, &b);
        let exact = ((2i128.pow(40) + 1) * (2i128.pow(41) - 1) - 15)
            + (-(2i128.pow(40) + 1) * (2i128.pow(41) - 1) - 63);
        assert_eq!(to_scaled_int(&sum, 0), exact);
        assert_eq!(exact, -78);
        assert!(expansion_sign(&sum) < 0.0);
    }
}
