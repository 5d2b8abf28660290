//! Mathematical utilities and decisions.

use core::cmp::Ordering;

mod polynomial;
pub use polynomial::*;
mod roots;
#[cfg(feature = "serde")]
mod serde_impls;

/// Slack used for every “equal”, “strictly greater”, and “strictly less” decision made
/// on times and roots.
///
/// All event comparisons must go through [`approx_cmp()`] with this value; mixing
/// tolerant and exact comparisons is how a just-resolved event gets rediscovered.
pub const EPSILON: f64 = 5e-6;

/// Compares two numbers, treating them as equal if they differ by no more than
/// [`EPSILON`].
///
/// Infinities compare as expected against finite values.
/// NaN is treated as equal to everything, so callers should not pass it.
#[inline]
pub fn approx_cmp(a: f64, b: f64) -> Ordering {
    if (a - b).abs() <= EPSILON || a == b {
        Ordering::Equal
    } else if a < b {
        Ordering::Less
    } else if a > b {
        Ordering::Greater
    } else {
        Ordering::Equal
    }
}

/// Returns whether `a` and `b` are equal within [`EPSILON`].
#[inline]
pub fn approx_eq(a: f64, b: f64) -> bool {
    approx_cmp(a, b) == Ordering::Equal
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn approx_cmp_tolerance_edges() {
        assert_eq!(approx_cmp(1.0, 1.0 + EPSILON * 0.5), Ordering::Equal);
        assert_eq!(approx_cmp(1.0, 1.0 + EPSILON * 2.0), Ordering::Less);
        assert_eq!(approx_cmp(1.0 + EPSILON * 2.0, 1.0), Ordering::Greater);
    }

    #[test]
    fn approx_cmp_infinities() {
        assert_eq!(approx_cmp(0.0, f64::NEG_INFINITY), Ordering::Greater);
        assert_eq!(approx_cmp(0.0, f64::INFINITY), Ordering::Less);
        assert_eq!(approx_cmp(f64::INFINITY, f64::INFINITY), Ordering::Equal);
    }
}
