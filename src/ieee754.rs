//! IEEE 754 bit level helpers.

/// The sign bit of an `f64`.
pub(crate) const SIGN_BIT: u64 = 1 << 63;

/// The bits of positive infinity.
pub(crate) const INF_BITS: u64 = 0x7FF0_0000_0000_0000;

/// The bits of the quiet NaN produced by parsing `"nan"`.
pub(crate) const NAN_BITS: u64 = 0x7FFF_FFFF_FFFF_FFFF;

/// The explicit mantissa bits of an `f64`.
pub(crate) const MANTISSA_MASK: u64 = (1 << 52) - 1;

/// The exponent bias of an `f64`.
pub(crate) const EXP2_BIAS: i32 = 1023;

/// The biased exponent of infinities and NaNs.
pub(crate) const EXP2_MAX_BIASED: u64 = 0x7FF;

/// A value converted from a wider type and whether the
/// conversion lost information.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct LossyValue<T> {
    /// The converted value.
    pub value: T,
    /// Whether `value` differs from the original.
    pub lossy: bool,
}

impl<T> LossyValue<T> {
    const fn new(value: T, lossy: bool) -> Self {
        Self { value, lossy }
    }
}

/// Converts `x` to the bits of an IEEE 754 half precision
/// (binary16) number, rounding toward zero.
///
/// Finite values too large for an `f16` saturate to the largest
/// finite `f16`. Values too small flush to zero, keeping the sign.
/// Infinities are preserved. NaNs stay NaNs, keeping the quiet bit.
///
/// # Example
///
/// ```
/// use f64conv::f64_to_f16_bits_truncate;
///
/// let got = f64_to_f16_bits_truncate(1.5);
/// assert_eq!(got.value, 0x3E00);
/// assert!(!got.lossy);
///
/// let got = f64_to_f16_bits_truncate(1e6);
/// assert_eq!(got.value, 0x7BFF);
/// assert!(got.lossy);
/// ```
pub fn f64_to_f16_bits_truncate(x: f64) -> LossyValue<u16> {
    let u = x.to_bits();
    let neg = ((u >> 63) << 15) as u16;
    let u = u & !SIGN_BIT;
    let exp = u >> 52;
    let man = u & MANTISSA_MASK;

    match exp {
        EXP2_MAX_BIASED if man == 0 => LossyValue::new(neg | 0x7C00, false),
        // Keep the top mantissa bit (quiet vs signaling) and set the
        // low 9 bits so the 10-bit mantissa is non-zero.
        EXP2_MAX_BIASED => LossyValue::new(neg | 0x7DFF | (man >> 42) as u16, false),
        // Too large: the largest finite f16.
        0x40F.. => LossyValue::new(neg | 0x7BFF, true),
        // Too small: zero.
        ..=0x3E6 => LossyValue::new(neg, u != 0),
        // Subnormal f16. 1051 = 0x3F0 + 53 - 10.
        ..=0x3F0 => {
            let man = man | (1 << 52);
            let shift = 1051 - exp;
            let shifted = man >> shift;
            LossyValue::new(neg | shifted as u16, shifted << shift != man)
        }
        // Normal f16. Rebias from 1023 to 15 and keep the top 10
        // mantissa bits.
        _ => {
            let exp = (exp - 1008) << 10;
            LossyValue::new(neg | exp as u16 | (man >> 42) as u16, man << 22 != 0)
        }
    }
}

/// Converts `x` to the bits of an IEEE 754 single precision
/// (binary32) number, rounding toward zero.
///
/// Finite values too large for an `f32` saturate to
/// [`f32::MAX`]. Values too small flush to zero, keeping the sign.
/// Infinities are preserved. NaNs stay NaNs, keeping the quiet bit.
///
/// Unlike `x as f32`, which rounds to nearest, this never rounds
/// away from zero.
pub fn f64_to_f32_bits_truncate(x: f64) -> LossyValue<u32> {
    let u = x.to_bits();
    let neg = ((u >> 63) << 31) as u32;
    let u = u & !SIGN_BIT;
    let exp = u >> 52;
    let man = u & MANTISSA_MASK;

    match exp {
        EXP2_MAX_BIASED if man == 0 => LossyValue::new(neg | 0x7F80_0000, false),
        EXP2_MAX_BIASED => LossyValue::new(neg | 0x7FBF_FFFF | (man >> 29) as u32, false),
        0x47F.. => LossyValue::new(neg | 0x7F7F_FFFF, true),
        ..=0x369 => LossyValue::new(neg, u != 0),
        // Subnormal f32. 926 = 0x380 + 53 - 23.
        ..=0x380 => {
            let man = man | (1 << 52);
            let shift = 926 - exp;
            let shifted = man >> shift;
            LossyValue::new(neg | shifted as u32, shifted << shift != man)
        }
        // Normal f32. Rebias from 1023 to 127.
        _ => {
            let exp = (exp - 896) << 23;
            LossyValue::new(neg | exp as u32 | (man >> 29) as u32, man << 35 != 0)
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::{thread_rng, Rng};

    use super::*;

    #[test]
    fn test_f64_to_f16() {
        let tests = [
            (0.0, 0x0000, false),
            (-0.0, 0x8000, false),
            (1.0, 0x3C00, false),
            (-2.0, 0xC000, false),
            (0.1, 0x2E66, true),
            (65504.0, 0x7BFF, false),
            (65519.0, 0x7BFF, true),
            (1e6, 0x7BFF, true),
            (-1e300, 0xFBFF, true),
            (2.0f64.powi(-14), 0x0400, false),
            (2.0f64.powi(-24), 0x0001, false),
            (3.0 * 2.0f64.powi(-24), 0x0003, false),
            (2.0f64.powi(-25), 0x0000, true),
            (-1e-300, 0x8000, true),
            (f64::INFINITY, 0x7C00, false),
            (f64::NEG_INFINITY, 0xFC00, false),
            (f64::NAN, 0x7FFF, false),
            (f64::from_bits(0x7FF0_0000_0000_0001), 0x7DFF, false),
        ];
        for (i, (x, value, lossy)) in tests.into_iter().enumerate() {
            let got = f64_to_f16_bits_truncate(x);
            assert_eq!(got, LossyValue { value, lossy }, "#{i}: {x:e}");
        }
    }

    #[test]
    fn test_f64_to_f32() {
        let tests = [
            (0.0, 0x0000_0000, false),
            (-0.0, 0x8000_0000, false),
            (1.0, 0x3F80_0000, false),
            (0.1, 0x3DCC_CCCC, true),
            (f64::from(f32::MAX), 0x7F7F_FFFF, false),
            (1e39, 0x7F7F_FFFF, true),
            (f64::from(f32::MIN_POSITIVE), 0x0080_0000, false),
            (2.0f64.powi(-149), 0x0000_0001, false),
            (2.0f64.powi(-150), 0x0000_0000, true),
            (f64::INFINITY, 0x7F80_0000, false),
            (f64::NAN, 0x7FFF_FFFF, false),
        ];
        for (i, (x, value, lossy)) in tests.into_iter().enumerate() {
            let got = f64_to_f32_bits_truncate(x);
            assert_eq!(got, LossyValue { value, lossy }, "#{i}: {x:e}");
        }
    }

    #[test]
    fn test_f64_to_f32_random() {
        let mut rng = thread_rng();
        for i in 0..100_000 {
            let x = f64::from_bits(rng.gen_range(0..INF_BITS));
            let got = f64_to_f32_bits_truncate(x);
            let y = f32::from_bits(got.value);
            assert!(f64::from(y) <= x, "#{i}: {x:e} truncated to {y:e}");
            assert_eq!(got.lossy, f64::from(y) != x, "#{i}: {x:e}");
            if got.value < f32::MAX.to_bits() {
                let next = f32::from_bits(got.value + 1);
                assert!(f64::from(next) > x, "#{i}: {x:e} truncated to {y:e}");
            }

            // Exactly representable values round trip.
            let z = f32::from_bits(rng.gen_range(0..0x7F80_0000));
            let got = f64_to_f32_bits_truncate(f64::from(z));
            assert_eq!(got.value, z.to_bits(), "#{i}: {z:e}");
            assert!(!got.lossy, "#{i}: {z:e}");
        }
    }
}
