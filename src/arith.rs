//! 64-bit integer helpers.

/// Returns the full 128-bit product `lhs * rhs` as `(lo, hi)`.
#[inline(always)]
pub(crate) fn widening_mul(lhs: u64, rhs: u64) -> (u64, u64) {
    // The product of two 64-bit integers always fits in 128 bits.
    let wide = u128::from(lhs) * u128::from(rhs);
    (wide as u64, (wide >> 64) as u64)
}

/// Returns the minimum number of bits required to represent `x`.
///
/// It returns 0 for `x == 0`.
#[inline(always)]
pub(crate) const fn bitlen(x: u64) -> u32 {
    u64::BITS - x.leading_zeros()
}

#[cfg(test)]
mod tests {
    use rand::{thread_rng, Rng};
    use ruint::aliases::U128;

    use super::*;

    #[test]
    fn test_widening_mul() {
        let tests = [
            (0, 0, (0, 0)),
            (1, 1, (1, 0)),
            (u64::MAX, 1, (u64::MAX, 0)),
            (u64::MAX, 2, (u64::MAX - 1, 1)),
            (u64::MAX, u64::MAX, (1, u64::MAX - 1)),
            (1 << 63, 1 << 63, (0, 1 << 62)),
        ];
        for (i, (lhs, rhs, want)) in tests.into_iter().enumerate() {
            assert_eq!(widening_mul(lhs, rhs), want, "#{i}");
        }

        let mut rng = thread_rng();
        for i in 0..10_000 {
            let lhs: u64 = rng.gen();
            let rhs: u64 = rng.gen();
            let want = U128::from(lhs) * U128::from(rhs);
            let limbs = want.as_limbs();
            assert_eq!(
                widening_mul(lhs, rhs),
                (limbs[0], limbs[1]),
                "#{i}: {lhs} * {rhs}"
            );
        }
    }

    #[test]
    fn test_bitlen() {
        assert_eq!(bitlen(0), 0);
        assert_eq!(bitlen(1), 1);
        assert_eq!(bitlen(1 << 52), 53);
        assert_eq!(bitlen(u64::MAX), 64);
    }
}
