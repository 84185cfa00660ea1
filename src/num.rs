//! Exact integer helpers: extended gcd, Euclidean division, CRT and friends.
//!
//! The generic functions only need [`Signed`] arithmetic, so they work both on
//! machine integers and on [`BigInt`].

use crate::error::{Error, Result};
use num_bigint::BigInt;
use num_traits::{PrimInt, Signed};

/// Extended Euclid. Returns `(g, x, y)` with `g = a*x + b*y` and `g >= 0`.
///
/// `gcd(0, 0)` is `(0, 0, 0)`; `gcd(a, 0)` is `(|a|, sgn(a), 0)`.
pub fn gcd<T: Clone + Signed>(a: T, b: T) -> (T, T, T) {
    if a.is_zero() && b.is_zero() {
        return (T::zero(), T::zero(), T::zero());
    }
    let (mut old_r, mut r) = (a, b);
    let (mut old_x, mut x) = (T::one(), T::zero());
    let (mut old_y, mut y) = (T::zero(), T::one());
    while !r.is_zero() {
        let q = old_r.clone() / r.clone();
        let next_r = old_r - q.clone() * r.clone();
        old_r = std::mem::replace(&mut r, next_r);
        let next_x = old_x - q.clone() * x.clone();
        old_x = std::mem::replace(&mut x, next_x);
        let next_y = old_y - q * y.clone();
        old_y = std::mem::replace(&mut y, next_y);
    }
    if old_r.is_negative() {
        (-old_r, -old_x, -old_y)
    } else {
        (old_r, old_x, old_y)
    }
}

/// Non-negative least common multiple; `lcm(0, 0) == 0`.
pub fn lcm<T: Clone + Signed>(a: T, b: T) -> T {
    let (g, _, _) = gcd(a.clone(), b.clone());
    if g.is_zero() {
        return g;
    }
    (a / g * b).abs()
}

/// Euclidean division: `a = b*q + r` with `0 <= r < |b|`.
pub fn div_mod<T: Clone + Signed + PartialOrd>(a: T, b: T) -> Result<(T, T)> {
    if b.is_zero() {
        return Err(Error::DivideByZero);
    }
    let mut q = a.clone() / b.clone();
    let mut r = a % b.clone();
    if r.is_negative() {
        if b.is_positive() {
            q = q - T::one();
            r = r + b;
        } else {
            q = q + T::one();
            r = r - b;
        }
    }
    Ok((q, r))
}

pub fn div<T: Clone + Signed + PartialOrd>(a: T, b: T) -> Result<T> {
    div_mod(a, b).map(|(q, _)| q)
}

pub fn modulo<T: Clone + Signed + PartialOrd>(a: T, b: T) -> Result<T> {
    div_mod(a, b).map(|(_, r)| r)
}

fn rem_euclid<T: Clone + Signed>(a: T, b: T) -> T {
    let r = a % b.clone();
    if r.is_negative() {
        r + b.abs()
    } else {
        r
    }
}

/// Inverse of `a` modulo `m`, or `None` when `a` and `m` are not coprime.
///
/// # Panics
///
/// Panics if `m` is zero.
pub fn mod_inverse<T: Clone + Signed>(a: T, m: T) -> Option<T> {
    assert!(!m.is_zero(), "mod_inverse with zero modulus");
    let m = m.abs();
    let (g, x, _) = gcd(rem_euclid(a, m.clone()), m.clone());
    g.is_one().then(|| rem_euclid(x, m))
}

fn crt<T: Clone + Signed>(a: T, m: T, b: T, n: T) -> Option<(T, T)> {
    assert!(!m.is_zero() && !n.is_zero(), "chinese remainder with zero modulus");
    let (m, n) = (m.abs(), n.abs());
    let (g, p, _) = gcd(m.clone(), n.clone());
    let diff = b - a.clone();
    if !(diff.clone() % g.clone()).is_zero() {
        return None;
    }
    let step = n / g.clone();
    let k = rem_euclid(rem_euclid(diff / g, step.clone()) * p, step.clone());
    let big_m = m.clone() * step;
    Some((rem_euclid(a + m * k, big_m.clone()), big_m))
}

/// Solves `x = a (mod m)`, `x = b (mod n)`.
///
/// Returns `(x, lcm(m, n))` with `0 <= x < lcm(m, n)`, or `None` if the residues
/// disagree modulo `gcd(m, n)` or the combined modulus does not fit in `i64`.
///
/// # Panics
///
/// Panics if either modulus is zero.
pub fn chinese_remainder(a: i64, m: i64, b: i64, n: i64) -> Option<(i64, i64)> {
    let (x, big_m) = crt(a as i128, m as i128, b as i128, n as i128)?;
    Some((i64::try_from(x).ok()?, i64::try_from(big_m).ok()?))
}

/// Arbitrary precision [`chinese_remainder`].
pub fn chinese_remainder_big(
    a: &BigInt,
    m: &BigInt,
    b: &BigInt,
    n: &BigInt,
) -> Option<(BigInt, BigInt)> {
    crt(a.clone(), m.clone(), b.clone(), n.clone())
}

pub fn sgn<T: Signed>(v: T) -> T {
    v.signum()
}

pub fn abs<T: Signed>(v: T) -> T {
    v.abs()
}

/// `floor(log10(n))`.
///
/// # Panics
///
/// Panics if `n` is zero.
pub fn log10(n: u64) -> u32 {
    n.ilog10()
}

pub fn pow10(d: u32) -> u64 {
    10u64.pow(d)
}

/// Number of decimal digits, counting `0` as one digit.
pub fn digits(n: u64) -> u32 {
    n.checked_ilog10().map_or(1, |l| l + 1)
}

/// Solves the integer system `a.0*x + b.0*y = c.0`, `a.1*x + b.1*y = c.1`.
///
/// Returns `None` when the determinant is zero or the solution is not integral.
pub fn cramer2<T: PrimInt + Signed>(a: (T, T), b: (T, T), c: (T, T)) -> Option<(T, T)> {
    let det = a.0 * b.1 - b.0 * a.1;
    if det.is_zero() {
        return None;
    }
    let nx = c.0 * b.1 - b.0 * c.1;
    let ny = a.0 * c.1 - c.0 * a.1;
    (nx % det == T::zero() && ny % det == T::zero()).then(|| (nx / det, ny / det))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn gcd_examples() {
        assert_eq!(gcd(30i64, 12), (6, 1, -2));
        assert_eq!(gcd(0i64, 0), (0, 0, 0));
        assert_eq!(gcd(-7i64, 0), (7, -1, 0));
        assert_eq!(gcd(0i64, -9), (9, 0, -1));
        assert_eq!(lcm(4i64, 6), 12);
        assert_eq!(lcm(0i64, 0), 0);
    }

    #[test]
    fn crt_examples() {
        assert_eq!(chinese_remainder(2, 3, 3, 5), Some((8, 15)));
        assert_eq!(chinese_remainder(1, 4, 2, 6), None);
        assert_eq!(chinese_remainder(3, 4, 5, 6), Some((11, 12)));

        let big = |v: i64| BigInt::from(v);
        assert_eq!(
            chinese_remainder_big(&big(2), &big(3), &big(3), &big(5)),
            Some((big(8), big(15)))
        );
    }

    #[test]
    #[should_panic(expected = "zero modulus")]
    fn crt_zero_modulus_panics() {
        chinese_remainder(1, 0, 1, 3);
    }

    #[test]
    fn euclidean_division() {
        assert_eq!(div_mod(-7i64, 3).unwrap(), (-3, 2));
        assert_eq!(div_mod(-7i64, -3).unwrap(), (3, 2));
        assert_eq!(div_mod(7i64, -3).unwrap(), (-2, 1));
        assert!(matches!(div_mod(1i64, 0), Err(Error::DivideByZero)));
        assert_eq!(modulo(-1i32, 5).unwrap(), 4);
        assert_eq!(div(-1i32, 5).unwrap(), -1);
    }

    #[test]
    fn inverse() {
        assert_eq!(mod_inverse(3i64, 7), Some(5));
        assert_eq!(mod_inverse(-3i64, 7), Some(2));
        assert_eq!(mod_inverse(4i64, 8), None);
    }

    #[test]
    fn decimal_helpers() {
        assert_eq!(log10(1), 0);
        assert_eq!(log10(999), 2);
        assert_eq!(log10(1000), 3);
        assert_eq!(pow10(3), 1000);
        assert_eq!(digits(0), 1);
        assert_eq!(digits(12345), 5);
        assert_eq!(sgn(-4i32), -1);
        assert_eq!(abs(-4i32), 4);
    }

    #[test]
    fn cramer() {
        // 94a + 22b = 8400, 34a + 67b = 5400
        assert_eq!(cramer2((94i64, 34), (22, 67), (8400, 5400)), Some((80, 40)));
        assert_eq!(cramer2((26i64, 66), (67, 21), (12748, 12176)), None);
        assert_eq!(cramer2((1i64, 2), (2, 4), (3, 6)), None);
    }

    proptest! {
        #[test]
        fn gcd_is_a_linear_combination(a in -1_000_000_000i64..1_000_000_000, b in -1_000_000_000i64..1_000_000_000) {
            let (g, x, y) = gcd(a, b);
            prop_assert!(g >= 0);
            prop_assert_eq!(g, a * x + b * y);
            if g != 0 {
                prop_assert_eq!(a % g, 0);
                prop_assert_eq!(b % g, 0);
            }
        }

        #[test]
        fn div_mod_is_euclidean(a in any::<i32>(), b in any::<i32>().prop_filter("non-zero", |b| *b != 0)) {
            let (a, b) = (a as i64, b as i64);
            let (q, r) = div_mod(a, b).unwrap();
            prop_assert_eq!(a, b * q + r);
            prop_assert!(0 <= r && r < b.abs());
        }

        #[test]
        fn crt_solutions_satisfy_both_congruences(a in -1000i64..1000, m in 1i64..500, b in -1000i64..1000, n in 1i64..500) {
            if let Some((x, big_m)) = chinese_remainder(a, m, b, n) {
                prop_assert_eq!(big_m, lcm(m, n));
                prop_assert!(0 <= x && x < big_m);
                prop_assert_eq!(x.rem_euclid(m), a.rem_euclid(m));
                prop_assert_eq!(x.rem_euclid(n), b.rem_euclid(n));
            } else {
                prop_assert_ne!((a - b) % gcd(m, n).0, 0);
            }
        }

        #[test]
        fn pow10_bounds(n in 1u64..u64::MAX / 10) {
            prop_assert!(pow10(log10(n) + 1) > n);
            prop_assert!(pow10(log10(n)) <= n);
        }
    }
}
