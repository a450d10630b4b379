//! Rendering an `f64` as decimal text.

#![allow(
    clippy::cast_possible_wrap,
    clippy::cast_sign_loss,
    reason = "precisions are at most `MAX_PRECISION` and decimal points are within `±DECIMAL_POINT_RANGE`"
)]

use core::mem;

use crate::{
    ctx::{Notation, RenderOptions, MAX_PRECISION},
    hpd::HighPrecDec,
    ieee754::{EXP2_BIAS, EXP2_MAX_BIASED, MANTISSA_MASK, SIGN_BIT},
};

/// Writes `x` as decimal text to the start of `dst`, or to the end
/// if [`ALIGN_RIGHT`][RenderOptions::ALIGN_RIGHT] is set, and
/// returns the number of bytes written.
///
/// If the text does not fit, it returns zero and leaves `dst`
/// untouched.
///
/// The notation depends on the exponent bits of `options`:
///
/// - [`EXPONENT_ABSENT`][RenderOptions::EXPONENT_ABSENT] is like
///   C's `%f`: `precision` is the number of digits after the
///   decimal separator.
/// - [`EXPONENT_PRESENT`][RenderOptions::EXPONENT_PRESENT] is like
///   C's `%e`: `precision` is the number of digits after the
///   decimal separator, and the exponent has at least two digits.
/// - Neither, or both, is like C's `%g`: `precision` is the number
///   of significant digits and the notation is whichever of the
///   other two is shorter.
///
/// With [`JUST_ENOUGH_PRECISION`][RenderOptions::JUST_ENOUGH_PRECISION],
/// `precision` is ignored and `x` is written with the fewest digits
/// that parse back to `x`. Otherwise `precision` is clamped to
/// [`MAX_PRECISION`] and `x` is rounded half to even.
///
/// Infinities are written as `"Inf"` and `"-Inf"`. All NaNs are
/// written as `"NaN"`.
///
/// # Example
///
/// ```
/// use f64conv::{render_number_f64, RenderOptions};
///
/// let mut buf = [0u8; 32];
///
/// let n = render_number_f64(&mut buf, 0.1 + 0.2, 0, RenderOptions::JUST_ENOUGH_PRECISION);
/// assert_eq!(&buf[..n], b"0.30000000000000004");
///
/// let n = render_number_f64(&mut buf, 1234.5, 2, RenderOptions::EXPONENT_PRESENT);
/// assert_eq!(&buf[..n], b"1.23e+03");
///
/// let n = render_number_f64(&mut buf[..2], f64::INFINITY, 0, RenderOptions::empty());
/// assert_eq!(n, 0);
/// ```
pub fn render_number_f64(dst: &mut [u8], x: f64, precision: u32, options: RenderOptions) -> usize {
    let bits = x.to_bits();
    let negative = bits & SIGN_BIT != 0;
    let biased = (bits >> 52) & EXP2_MAX_BIASED;
    let mut man = bits & MANTISSA_MASK;

    // Apply the bias and set the implicit bit, unless `x` is
    // subnormal.
    let exp2 = match biased {
        EXP2_MAX_BIASED if man != 0 => return render_nan(dst, options),
        EXP2_MAX_BIASED => return render_inf(dst, negative, options),
        0 => 1 - EXP2_BIAS,
        _ => {
            man |= MANTISSA_MASK + 1;
            biased as i32 - EXP2_BIAS
        }
    };

    let mut precision = precision.min(MAX_PRECISION) as i32;
    let just_enough = options.contains(RenderOptions::JUST_ENOUGH_PRECISION);

    // `x` is exactly `man * 2^(exp2 - 52)`.
    let mut h = HighPrecDec::from_u64(man, negative);
    if !h.is_zero() {
        h.lshift(exp2 - 52);
    }

    match Notation::from(options) {
        Notation::Fixed => {
            if just_enough {
                h.round_just_enough(exp2, man);
                precision = (h.num_digits as i32 - h.decimal_point).max(0);
            } else {
                h.round_nearest(precision + h.decimal_point);
            }
            render_exponent_absent(dst, &h, precision, options)
        }
        Notation::Scientific => {
            if just_enough {
                h.round_just_enough(exp2, man);
                precision = (h.num_digits as i32 - 1).max(0);
            } else {
                h.round_nearest(precision + 1);
            }
            render_exponent_present(dst, &h, precision, options)
        }
        Notation::General => render_general(dst, &mut h, precision, options, exp2, man),
    }
}

/// Renders `h` like C's `%g`, where `precision` is the number of
/// significant digits.
fn render_general(
    dst: &mut [u8],
    h: &mut HighPrecDec,
    mut precision: i32,
    options: RenderOptions,
    exp2: i32,
    man: u64,
) -> usize {
    // Round first, then pick the notation.
    let e_threshold;
    if options.contains(RenderOptions::JUST_ENOUGH_PRECISION) {
        h.round_just_enough(exp2, man);
        precision = h.num_digits as i32;
        e_threshold = 6;
    } else {
        precision = precision.max(1);
        h.round_nearest(precision);
        let nd = h.num_digits as i32;
        e_threshold = if precision > nd && nd >= h.decimal_point {
            nd
        } else {
            precision
        };
    }

    let e = h.decimal_point - 1;
    if e < -4 || e_threshold <= e {
        let p = precision.min(h.num_digits as i32);
        return render_exponent_present(dst, h, (p - 1).max(0), options);
    }

    let p = if precision > h.decimal_point {
        h.num_digits as i32
    } else {
        precision
    };
    render_exponent_absent(dst, h, (p - h.decimal_point).max(0), options)
}

fn render_inf(dst: &mut [u8], negative: bool, options: RenderOptions) -> usize {
    let s: &[u8] = if negative {
        b"-Inf"
    } else if options.plus_sign() {
        b"+Inf"
    } else {
        b"Inf"
    };
    render_str(dst, s, options)
}

fn render_nan(dst: &mut [u8], options: RenderOptions) -> usize {
    render_str(dst, b"NaN", options)
}

/// Copies `s` to `dst`, if it fits.
fn render_str(dst: &mut [u8], s: &[u8], options: RenderOptions) -> usize {
    let Some(mut w) = Writer::new(dst, s.len(), options) else {
        return 0;
    };
    w.push_all(s);
    s.len()
}

/// Renders `h` with `precision` digits after the separator and no
/// exponent.
fn render_exponent_absent(
    dst: &mut [u8],
    h: &HighPrecDec,
    precision: i32,
    options: RenderOptions,
) -> usize {
    let sign = sign_byte(h, options);
    let dp = h.decimal_point;

    let mut n = usize::from(sign.is_some());
    n += if dp <= 0 { 1 } else { dp as usize };
    if precision > 0 {
        n += precision as usize + 1;
    }
    let Some(mut w) = Writer::new(dst, n, options) else {
        return 0;
    };

    if let Some(c) = sign {
        w.push(c);
    }

    // Integral digits, zero padded up to the decimal point.
    if dp <= 0 {
        w.push(b'0');
    } else {
        for i in 0..dp {
            w.push(b'0' | h.digit_at(i));
        }
    }

    if precision > 0 {
        w.push(options.separator());
        for i in 0..precision {
            w.push(b'0' | h.digit_at(dp + i));
        }
    }
    n
}

/// Renders `h` as one digit, then `precision` digits after the
/// separator, then an exponent.
fn render_exponent_present(
    dst: &mut [u8],
    h: &HighPrecDec,
    precision: i32,
    options: RenderOptions,
) -> usize {
    let sign = sign_byte(h, options);
    let exp = if h.is_zero() { 0 } else { h.decimal_point - 1 };
    let abs_exp = exp.unsigned_abs();

    // The first digit and "e±".
    let mut n = usize::from(sign.is_some()) + 3;
    if precision > 0 {
        n += precision as usize + 1;
    }
    n += if abs_exp < 100 { 2 } else { 3 };
    let Some(mut w) = Writer::new(dst, n, options) else {
        return 0;
    };

    if let Some(c) = sign {
        w.push(c);
    }

    // `digit_at` is zero past the last digit, which pads both
    // zero and short mantissas.
    w.push(b'0' | h.digit_at(0));
    if precision > 0 {
        w.push(options.separator());
        for i in 1..=precision {
            w.push(b'0' | h.digit_at(i));
        }
    }

    w.push(b'e');
    w.push(if exp < 0 { b'-' } else { b'+' });
    if abs_exp >= 100 {
        w.push(b'0' | (abs_exp / 100) as u8);
    }
    w.push(b'0' | (abs_exp / 10 % 10) as u8);
    w.push(b'0' | (abs_exp % 10) as u8);
    n
}

/// Returns the leading sign, if any.
fn sign_byte(h: &HighPrecDec, options: RenderOptions) -> Option<u8> {
    if h.negative {
        Some(b'-')
    } else if options.plus_sign() {
        Some(b'+')
    } else {
        None
    }
}

/// Writes bytes into a window of exactly the right size.
struct Writer<'a> {
    buf: &'a mut [u8],
}

impl<'a> Writer<'a> {
    /// Returns a writer over `n` bytes at the start of `dst`, or at
    /// the end if [`ALIGN_RIGHT`][RenderOptions::ALIGN_RIGHT] is
    /// set.
    fn new(dst: &'a mut [u8], n: usize, options: RenderOptions) -> Option<Self> {
        let start = if options.contains(RenderOptions::ALIGN_RIGHT) {
            dst.len().checked_sub(n)?
        } else {
            0
        };
        let buf = dst.get_mut(start..start.checked_add(n)?)?;
        Some(Self { buf })
    }

    fn push(&mut self, c: u8) {
        if let Some((first, rest)) = mem::take(&mut self.buf).split_first_mut() {
            *first = c;
            self.buf = rest;
        }
    }

    fn push_all(&mut self, s: &[u8]) {
        for &c in s {
            self.push(c);
        }
    }
}

impl Drop for Writer<'_> {
    fn drop(&mut self) {
        debug_assert!(self.buf.is_empty(), "mispredicted length");
    }
}
