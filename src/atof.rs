//! Parsing decimal text as an `f64`.

use crate::{
    arith::bitlen,
    conv::ParseError,
    ctx::ParseOptions,
    eisel_lemire::eisel_lemire,
    hpd::{HighPrecDec, DECIMAL_POINT_RANGE, SHIFT_MAX_INCL},
    ieee754::{EXP2_BIAS, EXP2_MAX_BIASED, INF_BITS, MANTISSA_MASK, NAN_BITS, SIGN_BIT},
    tables::{DECIMAL_TO_BINARY_SHIFT, F64_POWERS_OF_10, MAX_EXP10, MIN_EXP10},
    util::equal_fold_ascii,
};

/// Inputs at least this long skip the fast path.
const FAST_PATH_MAX_LEN: usize = 256;

/// Parses the decimal number `s` as the closest `f64`, rounding
/// ties to even.
///
/// The accepted syntax is an optional sign, digits with an optional
/// decimal separator, and an optional exponent, for example
/// `"-12.5e+3"`. `"inf"`, `"infinity"` and `"nan"` (in any case,
/// optionally signed) are accepted unless
/// [`REJECT_INF_AND_NAN`][ParseOptions::REJECT_INF_AND_NAN] is set.
/// Leading or trailing whitespace is an error.
///
/// Underscores are only skipped with
/// [`ALLOW_UNDERSCORES`][ParseOptions::ALLOW_UNDERSCORES], and that
/// includes underscores around `"inf"` and `"nan"`: without it,
/// `"_inf"` is an error.
///
/// Numbers too large for an `f64` parse as infinity. Numbers too
/// small parse as zero.
///
/// # Example
///
/// ```
/// use f64conv::{parse_number_f64, ParseOptions};
///
/// let x = parse_number_f64(b"0.1", ParseOptions::empty()).unwrap();
/// assert_eq!(x, 0.1);
///
/// let x = parse_number_f64(b"1_000,5", ParseOptions::ALLOW_UNDERSCORES
///     | ParseOptions::DECIMAL_SEPARATOR_IS_A_COMMA).unwrap();
/// assert_eq!(x, 1000.5);
///
/// assert!(parse_number_f64(b"1e999", ParseOptions::REJECT_INF_AND_NAN).is_err());
/// ```
pub fn parse_number_f64(s: &[u8], options: ParseOptions) -> Result<f64, ParseError> {
    if let Some(x) = parse_fast(s, options) {
        return Ok(x);
    }
    parse_slow(s, options)
}

/// Parses `s` without the fast path.
#[cold]
fn parse_slow(s: &[u8], options: ParseOptions) -> Result<f64, ParseError> {
    match HighPrecDec::parse(s, options) {
        Ok(mut h) => h.to_f64(options),
        Err(_) => parse_special(s, options),
    }
}

/// Parses the common case: `s` is short, has no `'+'` sign or
/// underscores, and its significant digits fit in a `u64`.
///
/// It returns `None` if `s` needs the slow path, including when it
/// is invalid.
#[allow(
    clippy::indexing_slicing,
    clippy::cast_possible_wrap,
    reason = "the NUL byte at `z[s.len()]` stops every walk before the end of `z`"
)]
fn parse_fast(s: &[u8], options: ParseOptions) -> Option<f64> {
    if s.len() >= FAST_PATH_MAX_LEN {
        return None;
    }
    // NUL is never part of a valid number, so it can terminate
    // every loop without a separate bounds check.
    let mut z = [0u8; FAST_PATH_MAX_LEN];
    z[..s.len()].copy_from_slice(s);

    let digit = |c: u8| c.wrapping_sub(b'0');
    let is_digit = |c: u8| digit(c) < 10;

    let mut p = 0;
    let negative = z[p] == b'-';
    if negative {
        p += 1;
    }
    let start = p;

    // A leading '0' must be a lone '0'. It is fine if `man`
    // overflows here: `digit_count` catches that below.
    let mut man: u64;
    if z[p] == b'0' {
        man = 0;
        p += 1;
        if is_digit(z[p]) {
            return None;
        }
    } else if is_digit(z[p]) {
        man = u64::from(digit(z[p]));
        p += 1;
        while is_digit(z[p]) {
            man = man.wrapping_mul(10).wrapping_add(u64::from(digit(z[p])));
            p += 1;
        }
    } else {
        return None;
    }

    let mut exp10: i32 = 0;
    if z[p] == options.separator() {
        p += 1;
        let first = p;
        if !is_digit(z[p]) {
            return None;
        }
        while is_digit(z[p]) {
            man = man.wrapping_mul(10).wrapping_add(u64::from(digit(z[p])));
            p += 1;
        }
        exp10 = -((p - first) as i32);
    }

    // Off by one if there is a separator.
    let mut digit_count = p - start;

    if (z[p] | 0x20) == b'e' {
        p += 1;
        let mut exp_neg = false;
        if z[p] == b'-' {
            exp_neg = true;
            p += 1;
        } else if z[p] == b'+' {
            p += 1;
        }
        if !is_digit(z[p]) {
            return None;
        }
        let mut exp_num: i32 = 0;
        while is_digit(z[p]) {
            if exp_num > 0x100_0000 {
                return None;
            }
            exp_num = 10 * exp_num + i32::from(digit(z[p]));
            p += 1;
        }
        exp10 += if exp_neg { -exp_num } else { exp_num };
    }

    // Trailing data, or something only the slow path accepts.
    if p != s.len() {
        return None;
    }

    // 19 digits always fit in a u64. Leading zeros and the
    // separator do not count.
    if digit_count > 19 {
        digit_count -= z[start..p]
            .iter()
            .take_while(|&&c| c == b'0' || c == options.separator())
            .count();
        if digit_count > 19 {
            return None;
        }
    }

    if !(MIN_EXP10..=MAX_EXP10).contains(&exp10) {
        return None;
    }

    // Both `man` and `10^exp10` are exact, so a single operation
    // rounds correctly.
    if (-22..=22).contains(&exp10) && bitlen(man) <= 53 {
        #[allow(clippy::cast_precision_loss, reason = "`man` has at most 53 bits")]
        let mut d = man as f64;
        let pow = F64_POWERS_OF_10[exp10.unsigned_abs() as usize];
        if exp10 >= 0 {
            d *= pow;
        } else {
            d /= pow;
        }
        return Some(if negative { -d } else { d });
    }

    // "0e99" is zero, but not exactly.
    if man == 0 {
        return None;
    }

    let bits = eisel_lemire(man, exp10)?;
    Some(f64::from_bits(
        bits | if negative { SIGN_BIT } else { 0 },
    ))
}

/// Parses `"inf"`, `"infinity"` or `"nan"`, ignoring case, with an
/// optional sign.
fn parse_special(s: &[u8], options: ParseOptions) -> Result<f64, ParseError> {
    if options.contains(ParseOptions::REJECT_INF_AND_NAN) {
        return Err(ParseError::invalid("invalid number"));
    }

    fn skip_underscores(mut s: &[u8], underscores: bool) -> &[u8] {
        if underscores {
            while let Some((b'_', rest)) = s.split_first() {
                s = rest;
            }
        }
        s
    }

    let underscores = options.contains(ParseOptions::ALLOW_UNDERSCORES);
    let mut s = skip_underscores(s, underscores);
    let mut negative = false;
    if let Some((&c @ (b'+' | b'-'), rest)) = s.split_first() {
        negative = c == b'-';
        s = skip_underscores(rest, underscores);
    }
    if underscores {
        while let Some((b'_', rest)) = s.split_last() {
            s = rest;
        }
    }

    let bits = if equal_fold_ascii(s, b"inf") || equal_fold_ascii(s, b"infinity") {
        INF_BITS
    } else if equal_fold_ascii(s, b"nan") {
        NAN_BITS
    } else {
        return Err(ParseError::invalid("invalid number"));
    };
    Ok(f64::from_bits(bits | if negative { SIGN_BIT } else { 0 }))
}

impl HighPrecDec {
    /// Converts `self` to the closest `f64`, consuming its value.
    ///
    /// Overflow is infinity unless
    /// [`REJECT_INF_AND_NAN`][ParseOptions::REJECT_INF_AND_NAN] is
    /// set.
    pub fn to_f64(&mut self, options: ParseOptions) -> Result<f64, ParseError> {
        let sign = if self.negative { SIGN_BIT } else { 0 };
        match self.to_f64_bits() {
            Some(bits) => Ok(f64::from_bits(bits | sign)),
            None if options.contains(ParseOptions::REJECT_INF_AND_NAN) => {
                Err(ParseError::invalid("number out of range"))
            }
            None => Ok(f64::from_bits(INF_BITS | sign)),
        }
    }

    /// Returns the bits of `|self|` as an `f64`, or `None` if it
    /// overflows.
    #[allow(
        clippy::cast_possible_wrap,
        clippy::cast_sign_loss,
        reason = "shifts are at most 60 and exponents are within `±DECIMAL_POINT_RANGE`"
    )]
    fn to_f64_bits(&mut self) -> Option<u64> {
        // The largest and smallest positive finite f64s are about
        // 1.8e308 and 4.9e-324.
        if self.num_digits == 0 || self.decimal_point < -326 {
            return Some(0);
        }
        if self.decimal_point > 310 {
            return None;
        }

        // Try Eisel-Lemire again: the fast path in
        // `parse_number_f64` only handles the simplest syntax.
        if self.num_digits <= 19 {
            let man = self
                .digits()
                .iter()
                .fold(0u64, |man, &d| 10 * man + u64::from(d));
            let exp10 = self.decimal_point - self.num_digits as i32;
            if let Some(bits) = eisel_lemire(man, exp10) {
                return Some(bits);
            }
        }

        let shift_for = |n: u32| {
            DECIMAL_TO_BINARY_SHIFT
                .get(n as usize)
                .copied()
                .unwrap_or(SHIFT_MAX_INCL)
        };

        // Scale by powers of two into [1/2, 1). Shift right,
        // possibly too far...
        let mut exp2: i32 = 0;
        while self.decimal_point > 0 {
            let shift = shift_for(self.decimal_point.unsigned_abs());
            self.small_rshift(shift);
            if self.decimal_point < -DECIMAL_POINT_RANGE {
                return Some(0);
            }
            exp2 += shift as i32;
        }
        // ...then shift left.
        while self.decimal_point <= 0 {
            let shift = if self.decimal_point == 0 {
                match self.digit_at(0) {
                    5.. => break,
                    0 | 1 => 2,
                    _ => 1,
                }
            } else {
                shift_for(self.decimal_point.unsigned_abs())
            };
            self.small_lshift(shift);
            if self.decimal_point > DECIMAL_POINT_RANGE {
                return None;
            }
            exp2 -= shift as i32;
        }

        // f64 mantissas are in [1, 2), not [1/2, 1).
        exp2 -= 1;

        // Denormalize below the smallest normal exponent.
        while exp2 < 1 - EXP2_BIAS {
            let n = (1 - EXP2_BIAS - exp2).unsigned_abs().min(SHIFT_MAX_INCL);
            self.small_rshift(n);
            exp2 += n as i32;
        }

        if (exp2 + EXP2_BIAS) as u64 >= EXP2_MAX_BIASED {
            return None;
        }

        // Extract 53 mantissa bits.
        self.small_lshift(53);
        let mut man2 = self.rounded_integer();

        // Rounding may have carried into a 54th bit.
        if man2 >> 53 != 0 {
            man2 >>= 1;
            exp2 += 1;
            if (exp2 + EXP2_BIAS) as u64 >= EXP2_MAX_BIASED {
                return None;
            }
        }

        // Subnormal.
        if man2 >> 52 == 0 {
            exp2 = -EXP2_BIAS;
        }

        let exp2_bits = ((exp2 + EXP2_BIAS) as u64) & EXP2_MAX_BIASED;
        Some((man2 & MANTISSA_MASK) | exp2_bits << 52)
    }
}
