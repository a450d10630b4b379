//! The Eisel-Lemire algorithm.
//!
//! See <https://lemire.me/blog/2020/03/10/fast-float-parsing-in-practice/>
//! and <https://arxiv.org/abs/2101.11408>.

use crate::{
    arith::widening_mul,
    tables::{MAX_EXP10, MIN_EXP10, POWERS_OF_10},
};

/// Computes the `f64` closest to `man * 10^exp10`.
///
/// It returns the bits of the non-negative result, or `None` if
/// the result cannot be determined cheaply. Callers must then fall
/// back to a slower algorithm.
///
/// `man` must be non-zero and `exp10` must be in
/// `[MIN_EXP10, MAX_EXP10]`. Over that domain the result is always
/// a finite normal number: roughly `[1e-307, 1.85e307]`.
#[allow(
    clippy::cast_sign_loss,
    reason = "`ret_exp2` is checked to be in `(0, 0x7FF)` before packing"
)]
pub(crate) fn eisel_lemire(man: u64, exp10: i32) -> Option<u64> {
    if man == 0 || !(MIN_EXP10..=MAX_EXP10).contains(&exp10) {
        return None;
    }

    // The table is already normalized: the MSB of each `hi` is
    // set.
    let &[po10_lo, po10_hi] = POWERS_OF_10.get(exp10.abs_diff(MIN_EXP10) as usize)?;

    let clz = man.leading_zeros();
    let man = man << clz;

    // 217706 / 2^16 ≈ log2(10), which is exact enough over the
    // domain of `exp10`. 1087 = 1023 + 64: the f64 exponent bias
    // plus the width of the table's mantissas.
    let mut ret_exp2 = ((217706 * exp10) >> 16) + 1087 - clz as i32;

    // Both mantissas are at least 2^63, so the product is at least
    // 2^126 and `x_hi` has at most one leading zero.
    let (mut x_lo, mut x_hi) = widening_mul(man, po10_hi);

    // The table entry is truncated, so `x` is a lower bound.
    // The upper bound adds another `man` to the product, which
    // only matters if it carries into the 9 low bits of `x_hi`
    // that are all about to be shifted out.
    if x_hi & 0x1FF == 0x1FF && x_lo.overflowing_add(man).1 {
        // Refine with the next 64 bits of the power of 10.
        let (y_lo, y_hi) = widening_mul(man, po10_lo);
        let (merged_lo, carry) = x_lo.overflowing_add(y_hi);
        let merged_hi = x_hi.wrapping_add(u64::from(carry));

        // Still ambiguous. Give up.
        if merged_hi & 0x1FF == 0x1FF && merged_lo == u64::MAX && y_lo.overflowing_add(man).1 {
            return None;
        }
        x_hi = merged_hi;
        x_lo = merged_lo;
    }

    // Shifting right by 9 or 10 leaves a 54-bit mantissa.
    let msb = x_hi >> 63;
    let mut ret_mantissa = x_hi >> (msb + 9);
    ret_exp2 -= (1 ^ msb) as i32;

    // Exactly halfway between two f64s: let the slow path handle
    // the tie.
    if x_lo == 0 && x_hi & 0x1FF == 0 && ret_mantissa & 3 == 1 {
        return None;
    }

    // Round to nearest, then renormalize if rounding carried into
    // bit 53.
    ret_mantissa += ret_mantissa & 1;
    ret_mantissa >>= 1;
    if ret_mantissa >> 53 > 0 {
        ret_mantissa >>= 1;
        ret_exp2 += 1;
    }

    if !(1..0x7FF).contains(&ret_exp2) {
        return None;
    }
    ret_mantissa &= (1 << 52) - 1;
    Some(ret_mantissa | (ret_exp2 as u64) << 52)
}

#[cfg(test)]
mod tests {
    use rand::{thread_rng, Rng};

    use super::*;

    #[test]
    fn test_eisel_lemire() {
        let tests = [
            (1, 0, Some(1.0f64.to_bits())),
            (1, 22, Some(1e22f64.to_bits())),
            // 1e23 is too close to halfway between two f64s.
            (1, 23, None),
            (3, -1, Some(0.3f64.to_bits())),
            (17976931348623157, 292, None),
            (17976931348623157, 288, Some(1.7976931348623157e304f64.to_bits())),
            (1, -307, Some(1e-307f64.to_bits())),
            (1, -308, None),
            (0, 0, None),
            (u64::MAX, 0, Some(1.8446744073709552e19f64.to_bits())),
            // 2^53 + 1 is halfway between 2^53 and 2^53 + 2.
            (9007199254740993, 0, None),
            (9007199254740995, 0, Some(9007199254740996f64.to_bits())),
        ];
        for (i, (man, exp10, want)) in tests.into_iter().enumerate() {
            assert_eq!(eisel_lemire(man, exp10), want, "#{i}: {man}e{exp10}");
        }
    }

    #[test]
    fn test_eisel_lemire_random() {
        let mut rng = thread_rng();
        let mut inconclusive = 0;
        for i in 0..100_000 {
            let man: u64 = match i % 3 {
                0 => rng.gen_range(1..=u64::MAX),
                1 => rng.gen_range(1..1 << 53),
                _ => rng.gen_range(1..100_000),
            };
            let exp10 = rng.gen_range(MIN_EXP10..=MAX_EXP10);
            let Some(got) = eisel_lemire(man, exp10) else {
                inconclusive += 1;
                continue;
            };
            let want: f64 = format!("{man}e{exp10}").parse().unwrap();
            assert_eq!(got, want.to_bits(), "#{i}: {man}e{exp10}");
        }
        assert!(inconclusive < 1_000, "{inconclusive} inconclusive");
    }
}
