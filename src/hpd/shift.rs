use super::{HighPrecDec, DECIMAL_POINT_RANGE, DIGITS_PRECISION, SHIFT_MAX_INCL};
use crate::tables::{LEFT_SHIFT, POWERS_OF_5};

// The shift routines require a decimal point within
// `±DECIMAL_POINT_RANGE`. The small shifts also require
// `0 < shift <= SHIFT_MAX_INCL`.
impl HighPrecDec {
    /// Multiplies `self` by `2^shift` if `shift` is positive or
    /// divides it by `2^-shift` if negative.
    pub fn lshift(&mut self, mut shift: i32) {
        const MAX: i32 = SHIFT_MAX_INCL as i32;

        if shift > 0 {
            while shift > MAX {
                self.small_lshift(SHIFT_MAX_INCL);
                shift -= MAX;
            }
            self.small_lshift(shift.unsigned_abs());
        } else if shift < 0 {
            while shift < -MAX {
                self.small_rshift(SHIFT_MAX_INCL);
                shift += MAX;
            }
            self.small_rshift(shift.unsigned_abs());
        }
    }

    /// Returns the number of digits added by left shifting
    /// `self` by `shift`.
    ///
    /// Multiplying by `2^shift` adds either `N` or `N-1` digits.
    /// It adds `N` when the digits of `self` are lexicographically
    /// greater than or equal to the digits of `5^shift`.
    fn lshift_num_new_digits(&self, shift: u32) -> usize {
        let shift = (shift & 63) as usize;

        let x_a = LEFT_SHIFT[shift];
        let x_b = LEFT_SHIFT[shift + 1];
        let num_new_digits = usize::from(x_a >> 11);
        let pow5_a = usize::from(x_a & 0x7FF);
        let pow5_b = usize::from(x_b & 0x7FF);

        let pow5 = &POWERS_OF_5[pow5_a..pow5_b];
        for (i, &p) in pow5.iter().enumerate() {
            match self.digits().get(i) {
                None => return num_new_digits - 1,
                Some(&d) if d == p => continue,
                Some(&d) if d < p => return num_new_digits - 1,
                Some(_) => return num_new_digits,
            }
        }
        num_new_digits
    }

    /// Multiplies `self` by `2^shift`.
    pub(crate) fn small_lshift(&mut self, shift: u32) {
        debug_assert!(shift <= SHIFT_MAX_INCL);

        if self.num_digits == 0 {
            return;
        }
        let num_new_digits = self.lshift_num_new_digits(shift);

        // Pick up a digit, put down a digit, right to left.
        let mut n: u64 = 0;
        for rx in (0..self.num_digits).rev() {
            n += u64::from(self.digits[rx]) << shift;
            let quo = n / 10;
            let rem = (n - 10 * quo) as u8;
            let wx = rx + num_new_digits;
            if wx < DIGITS_PRECISION {
                self.digits[wx] = rem;
            } else if rem > 0 {
                self.truncated = true;
            }
            n = quo;
        }

        // Put down the new leading digits.
        for wx in (0..num_new_digits).rev() {
            let quo = n / 10;
            let rem = (n - 10 * quo) as u8;
            if wx < DIGITS_PRECISION {
                self.digits[wx] = rem;
            } else if rem > 0 {
                self.truncated = true;
            }
            n = quo;
        }
        debug_assert_eq!(n, 0, "mispredicted digit count");

        self.num_digits = (self.num_digits + num_new_digits).min(DIGITS_PRECISION);
        self.decimal_point += num_new_digits as i32;
        self.trim();
    }

    /// Divides `self` by `2^shift`.
    ///
    /// If the result is too small to represent, `self` becomes zero
    /// and keeps its sign.
    pub(crate) fn small_rshift(&mut self, shift: u32) {
        debug_assert!(shift <= SHIFT_MAX_INCL);

        let mut rx = 0; // Read index.
        let mut wx = 0; // Write index.
        let mut n: u64 = 0;

        // Pick up enough leading digits to cover the first shift.
        while n >> shift == 0 {
            if let Some(&d) = self.digits().get(rx) {
                n = 10 * n + u64::from(d);
                rx += 1;
            } else if n == 0 {
                // Zero remains zero.
                return;
            } else {
                // Read implicit trailing zeros.
                while n >> shift == 0 {
                    n *= 10;
                    rx += 1;
                }
                break;
            }
        }

        self.decimal_point -= rx as i32 - 1;
        if self.decimal_point < -DECIMAL_POINT_RANGE {
            self.set_zero();
            return;
        }

        // Pick up a digit, put down a digit, left to right.
        let mask = (1u64 << shift) - 1;
        while rx < self.num_digits {
            let new_digit = (n >> shift) as u8;
            n = 10 * (n & mask) + u64::from(self.digits[rx]);
            rx += 1;
            self.digits[wx] = new_digit;
            wx += 1;
        }

        // Put down trailing digits, left to right.
        while n > 0 {
            let new_digit = (n >> shift) as u8;
            n = 10 * (n & mask);
            if wx < DIGITS_PRECISION {
                self.digits[wx] = new_digit;
                wx += 1;
            } else if new_digit > 0 {
                self.truncated = true;
            }
        }

        self.num_digits = wx;
        self.trim();
    }
}

#[cfg(test)]
mod tests {
    use rand::{thread_rng, Rng};
    use ruint::aliases::U256;

    use super::*;
    use crate::hpd::tests::{assert_trimmed, hpd};

    #[test]
    fn test_small_shift() {
        // Positive shifts are right shifts, negative are left.
        let tests = [
            ("0", 2, "+0"),
            ("1", 3, "+.125"),
            ("12e3", 5, "+375."),
            ("-0.007", 8, "-.00002734375"),
            (
                "3.14159E+26",
                60,
                "+272489496.244698869986677891574800014495849609375",
            ),
            ("0", -2, "+0"),
            (".125", -3, "+1."),
            ("3750e-1", -5, "+12000."),
            ("-2.734375e-5", -8, "-.007"),
            (
                "272489496.244698869986677891574800014495849609375",
                -60,
                "+314159000000000000000000000.",
            ),
        ];
        for (i, (input, shift, want)) in tests.into_iter().enumerate() {
            let mut h = hpd(input);
            let shift: i32 = shift;
            if shift > 0 {
                h.small_rshift(shift.unsigned_abs());
            } else {
                h.small_lshift(shift.unsigned_abs());
            }
            assert_trimmed(&h);
            assert_eq!(format!("{h:?}"), want, "#{i}: {input} by {shift}");
        }
    }

    #[test]
    fn test_lshift_num_new_digits() {
        let tests = [
            // 1 << 1 = 2, 5 << 1 = 10.
            ("1", 1, 0),
            ("5", 1, 1),
            // 5^3 = 125.
            ("124", 3, 0),
            ("125", 3, 1),
            ("126", 3, 1),
            ("12", 3, 0),
            // 5^10 = 9765625.
            ("9765624", 10, 3),
            ("9765625", 10, 4),
            ("1", 60, 18),
        ];
        for (i, (input, shift, want)) in tests.into_iter().enumerate() {
            let h = hpd(input);
            assert_eq!(h.lshift_num_new_digits(shift), want, "#{i}: {input} << {shift}");
        }
    }

    /// Splits a big integer into its digits, trailing zeros
    /// removed, and its digit count.
    fn trimmed_digits(x: U256) -> (String, usize) {
        let s = x.to_string();
        let n = s.len();
        (s.trim_end_matches('0').to_owned(), n)
    }

    fn digits_of(h: &HighPrecDec) -> String {
        h.digits().iter().map(|&d| char::from(b'0' | d)).collect()
    }

    #[test]
    fn test_lshift_random() {
        let mut rng = thread_rng();
        for i in 0..5_000 {
            let x: u64 = rng.gen_range(1..=u64::MAX);
            let shift: i32 = rng.gen_range(0..=150);

            let mut h = HighPrecDec::from_u64(x, false);
            h.lshift(shift);
            assert_trimmed(&h);

            let want = U256::from(x) << shift as usize;
            let (digits, dp) = trimmed_digits(want);
            assert_eq!(digits_of(&h), digits, "#{i}: {x} << {shift}");
            assert_eq!(h.decimal_point, dp as i32, "#{i}: {x} << {shift}");
            assert!(!h.truncated, "#{i}");
        }
    }

    #[test]
    fn test_rshift_random() {
        // x / 2^s = (x * 5^s) / 10^s, so the digits are those of
        // x * 5^s and the decimal point moves left by s.
        let mut rng = thread_rng();
        for i in 0..5_000 {
            let x: u64 = rng.gen_range(1..=u64::MAX);
            let shift: i32 = rng.gen_range(0..=80);

            let mut h = HighPrecDec::from_u64(x, true);
            h.lshift(-shift);
            assert_trimmed(&h);
            assert!(h.negative, "#{i}");

            let want = U256::from(x) * U256::from(5u8).pow(U256::from(shift));
            let (digits, n) = trimmed_digits(want);
            assert_eq!(digits_of(&h), digits, "#{i}: {x} >> {shift}");
            assert_eq!(h.decimal_point, n as i32 - shift, "#{i}: {x} >> {shift}");
            assert!(!h.truncated, "#{i}");
        }
    }

    #[test]
    fn test_shift_inverse() {
        let mut rng = thread_rng();
        for i in 0..1_000 {
            // Small enough for `rounded_integer`.
            let x: u64 = rng.gen_range(1..1_000_000_000_000_000_000);
            let shift: i32 = rng.gen_range(1..=1000);

            let mut h = HighPrecDec::from_u64(x, false);
            h.lshift(-shift);
            h.lshift(shift);
            assert_trimmed(&h);
            assert_eq!(h.rounded_integer(), x, "#{i}: {x} by {shift}");
        }
    }

    #[test]
    fn test_rshift_underflow() {
        let mut h = hpd("-1e-2040");
        h.lshift(-60);
        assert!(h.is_zero());
        assert!(h.negative, "sign should survive underflow");
        assert_eq!(h.decimal_point, 0);
        assert!(!h.truncated);
    }

    #[test]
    fn test_lshift_truncates() {
        // 2^-1074 has 751 significant digits. Doubling a number
        // with 800 digits a few more times overflows the buffer.
        let mut h = HighPrecDec::from_u64(1, false);
        h.lshift(-1074);
        assert_eq!(h.num_digits, 751);
        assert_eq!(h.decimal_point, -323);
        assert!(!h.truncated);

        let mut h = hpd(&"9".repeat(DIGITS_PRECISION));
        h.lshift(10);
        assert_trimmed(&h);
        assert!(h.num_digits <= DIGITS_PRECISION);
        assert!(h.truncated);
    }
}
