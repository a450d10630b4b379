//! High precision decimal numbers.
//!
//! [`HighPrecDec`] is the intermediate form shared by the slow
//! parsing path and by rendering. It holds a fixed number of decimal
//! digits, so every operation on it runs in bounded time and never
//! allocates.

#![allow(
    clippy::indexing_slicing,
    clippy::cast_possible_wrap,
    clippy::cast_sign_loss,
    reason = "digit counts and indices are bounded by `DIGITS_PRECISION`"
)]

use core::fmt;

mod parse;
mod round;
mod shift;

/// The maximum number of digits held by a [`HighPrecDec`].
///
/// 800 digits is enough to exactly represent every `f64`: the
/// smallest subnormal, `2^-1074`, has 751 significant digits once
/// leading zeros are dropped.
pub(crate) const DIGITS_PRECISION: usize = 800;

/// The largest magnitude of a meaningful decimal point.
///
/// Decimal points outside of `[-RANGE, +RANGE]` are clamped to
/// `-RANGE-1` (zero) or `+RANGE+1` (infinity): far beyond the
/// range of an `f64`.
pub(crate) const DECIMAL_POINT_RANGE: i32 = 2047;

/// The largest shift accepted by the small shift routines.
///
/// It is the largest `n` such that `(10 << n) < (1 << 64)`.
pub(crate) const SHIFT_MAX_INCL: u32 = 60;

/// A fixed precision, base 10 floating point number.
///
/// The value is `0.d0 d1 d2 ... × 10^decimal_point`. For example,
/// with `digits = [7, 8, 9]`:
///
/// | `decimal_point` | value       |
/// |-----------------|-------------|
/// | -2              | `.00789`    |
/// | 0               | `.789`      |
/// | 2               | `78.9`      |
/// | 5               | `78900`     |
///
/// Trailing zero digits are always trimmed, so
/// `digits[num_digits-1] != 0` whenever `num_digits > 0`.
#[derive(Clone)]
pub(crate) struct HighPrecDec {
    /// The number of meaningful entries in `digits`.
    pub num_digits: usize,
    /// The position of the decimal point relative to `digits[0]`.
    pub decimal_point: i32,
    /// The sign. Independent of the digits, so zero can be
    /// negative.
    pub negative: bool,
    /// Set when non-zero digits were dropped, either past
    /// [`DIGITS_PRECISION`] or by a right shift.
    pub truncated: bool,
    /// Big-endian digit values in `[0, 9]`, not ASCII.
    pub digits: [u8; DIGITS_PRECISION],
}

impl HighPrecDec {
    /// Creates a positive zero.
    pub const fn new() -> Self {
        Self {
            num_digits: 0,
            decimal_point: 0,
            negative: false,
            truncated: false,
            digits: [0; DIGITS_PRECISION],
        }
    }

    /// Creates a `HighPrecDec` holding the integer `x`.
    pub fn from_u64(x: u64, negative: bool) -> Self {
        let mut h = Self::new();
        h.assign(x, negative);
        h
    }

    /// Sets `self` to the integer `x`.
    pub fn assign(&mut self, mut x: u64, negative: bool) {
        // u64::MAX has 20 digits.
        let mut buf = [0u8; 20];
        let mut n = 0;
        while x > 0 {
            buf[n] = (x % 10) as u8;
            x /= 10;
            n += 1;
        }
        for (dst, src) in self.digits.iter_mut().zip(buf[..n].iter().rev()) {
            *dst = *src;
        }

        self.num_digits = n;
        self.decimal_point = n as i32;
        self.negative = negative;
        self.truncated = false;
        self.trim();
    }

    /// Drops trailing zero digits.
    pub fn trim(&mut self) {
        while self.num_digits > 0 && self.digits[self.num_digits - 1] == 0 {
            self.num_digits -= 1;
        }
    }

    /// Returns the meaningful digits.
    pub fn digits(&self) -> &[u8] {
        &self.digits[..self.num_digits]
    }

    /// Returns the `i`th digit, or 0 if `i` is out of range.
    ///
    /// Negative indices and indices past `num_digits` are implicit
    /// zeros.
    pub fn digit_at(&self, i: i32) -> u8 {
        usize::try_from(i)
            .ok()
            .and_then(|i| self.digits().get(i))
            .copied()
            .unwrap_or(0)
    }

    /// Reports whether the value is zero.
    pub const fn is_zero(&self) -> bool {
        self.num_digits == 0
    }

    /// Sets `self` to zero, keeping the sign.
    pub fn set_zero(&mut self) {
        self.num_digits = 0;
        self.decimal_point = 0;
        self.truncated = false;
    }
}

impl Default for HighPrecDec {
    fn default() -> Self {
        Self::new()
    }
}

/// Writes the debug form: a sign followed by `"0"`, `"inf"`,
/// `"eps"` or the digits with an explicit decimal point, plus a
/// trailing `'$'` when truncated.
///
/// For example, `"+.125"`, `"-.00002734375"` and `"+375."`.
impl fmt::Debug for HighPrecDec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use fmt::Write;

        f.write_char(if self.negative { '-' } else { '+' })?;

        let dp = self.decimal_point;
        if dp > DECIMAL_POINT_RANGE {
            return f.write_str("inf");
        }
        if dp < -DECIMAL_POINT_RANGE {
            return f.write_str("eps");
        }
        if self.num_digits == 0 {
            return f.write_char('0');
        }

        let write_digits = |f: &mut fmt::Formatter<'_>, digits: &[u8]| {
            digits
                .iter()
                .try_for_each(|&d| f.write_char(char::from(b'0' | d)))
        };
        let write_zeros = |f: &mut fmt::Formatter<'_>, n: usize| {
            (0..n).try_for_each(|_| f.write_char('0'))
        };

        let digits = self.digits();
        match usize::try_from(dp) {
            // ".00789"
            Err(_) => {
                f.write_char('.')?;
                write_zeros(f, dp.unsigned_abs() as usize)?;
                write_digits(f, digits)?;
            }
            // "78.9"
            Ok(dp) if dp <= digits.len() => {
                let (int, frac) = digits.split_at(dp);
                write_digits(f, int)?;
                f.write_char('.')?;
                write_digits(f, frac)?;
            }
            // "78900."
            Ok(dp) => {
                write_digits(f, digits)?;
                write_zeros(f, dp - digits.len())?;
                f.write_char('.')?;
            }
        }

        if self.truncated {
            f.write_char('$')?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Parses `s` with the default options.
    pub(super) fn hpd(s: &str) -> HighPrecDec {
        HighPrecDec::parse(s.as_bytes(), crate::ParseOptions::empty())
            .unwrap_or_else(|err| panic!("{s}: {err}"))
    }

    /// Asserts that trailing zeros are trimmed.
    #[track_caller]
    pub(super) fn assert_trimmed(h: &HighPrecDec) {
        assert!(
            h.num_digits == 0 || h.digits[h.num_digits - 1] != 0,
            "{h:?} is not trimmed"
        );
        assert!(h.digits().iter().all(|&d| d < 10), "{h:?}: bad digit");
    }

    #[test]
    fn test_assign() {
        let mut buf = itoa::Buffer::new();
        let mut tests = vec![0, 1, 9, 10, 100, 12345, 1 << 53, u64::MAX, u64::MAX - 1];
        tests.extend((0..64).map(|i| 1u64 << i));
        tests.extend((0..20).map(|i| 10u64.pow(i)));
        for (i, x) in tests.into_iter().enumerate() {
            let h = HighPrecDec::from_u64(x, false);
            assert_trimmed(&h);

            let want = buf.format(x);
            let want = want.trim_end_matches('0');
            let got: String = h.digits().iter().map(|&d| char::from(b'0' | d)).collect();
            assert_eq!(got, want, "#{i}: {x}");
            if x == 0 {
                assert_eq!(h.decimal_point, 0, "#{i}");
            } else {
                assert_eq!(h.decimal_point as usize, buf.format(x).len(), "#{i}: {x}");
            }
            assert!(!h.truncated, "#{i}");
        }
    }

    #[test]
    fn test_debug() {
        let tests = [
            (0, 0, false, "+0"),
            (125, -3, false, "+.125"),
            (125, -5, true, "-.00125"),
            (375, 0, false, "+375."),
            (789, -1, false, "+78.9"),
            (789, 2, false, "+78900."),
        ];
        for (i, (x, shift, negative, want)) in tests.into_iter().enumerate() {
            let mut h = HighPrecDec::from_u64(x, negative);
            h.decimal_point += shift;
            if x == 0 {
                h.decimal_point = 0;
            }
            assert_eq!(format!("{h:?}"), want, "#{i}");
        }

        let mut h = HighPrecDec::from_u64(1, false);
        h.decimal_point = DECIMAL_POINT_RANGE + 1;
        assert_eq!(format!("{h:?}"), "+inf");
        h.decimal_point = -DECIMAL_POINT_RANGE - 1;
        assert_eq!(format!("{h:?}"), "+eps");
        h.decimal_point = 1;
        h.truncated = true;
        assert_eq!(format!("{h:?}"), "+1.$");
    }

    #[test]
    fn test_digit_at() {
        let h = HighPrecDec::from_u64(789, false);
        assert_eq!(h.digit_at(-1), 0);
        assert_eq!(h.digit_at(0), 7);
        assert_eq!(h.digit_at(2), 9);
        assert_eq!(h.digit_at(3), 0);
        assert_eq!(h.digit_at(i32::MAX), 0);
    }
}
