use super::HighPrecDec;

/// The exponent of the smallest normal `f64`.
const MIN_NORMAL_EXP2: i32 = -1022;

/// The mantissa of the smallest normal `f64`, including the
/// implicit bit.
const MIN_NORMAL_MANTISSA: u64 = 1 << 52;

// The rounding routines round to at most `n` digits, which is not
// necessarily `n` decimal places. A negative `n`, or one at least
// as large as the number of digits, is a no-op.
impl HighPrecDec {
    /// Truncates `self` to `n` digits.
    pub fn round_down(&mut self, n: i32) {
        let Ok(n) = usize::try_from(n) else {
            return;
        };
        if n >= self.num_digits {
            return;
        }
        self.num_digits = n;
        self.trim();
    }

    /// Truncates `self` to `n` digits and then increments the
    /// last one.
    pub fn round_up(&mut self, n: i32) {
        let Ok(n) = usize::try_from(n) else {
            return;
        };
        if n >= self.num_digits {
            return;
        }

        for i in (0..n).rev() {
            if self.digits[i] < 9 {
                self.digits[i] += 1;
                self.num_digits = i + 1;
                return;
            }
        }

        // All 9s: 999 becomes 1000.
        self.digits[0] = 1;
        self.num_digits = 1;
        self.decimal_point += 1;
    }

    /// Rounds `self` to `n` digits, breaking ties to even.
    pub fn round_nearest(&mut self, n: i32) {
        let Ok(i) = usize::try_from(n) else {
            return;
        };
        let Some(&d) = self.digits().get(i) else {
            return;
        };

        let up = if d == 5 && i + 1 == self.num_digits {
            // Exactly halfway, unless dropped digits say otherwise.
            self.truncated || (i > 0 && self.digits[i - 1] & 1 != 0)
        } else {
            d >= 5
        };
        if up {
            self.round_up(n);
        } else {
            self.round_down(n);
        }
    }

    /// Rounds `self`, which holds the `f64` value
    /// `mantissa * 2^(exp2 - 52)`, to the fewest digits that
    /// still parse back to the same `f64`.
    ///
    /// `mantissa` includes the implicit bit for normal numbers.
    pub fn round_just_enough(&mut self, exp2: i32, mantissa: u64) {
        // Zero and small integers are already as short as
        // possible.
        if mantissa == 0 || (exp2 < 53 && self.decimal_point >= self.num_digits as i32) {
            return;
        }

        // Any number strictly between `lower` and `upper` (or
        // inclusive, see below) rounds to `self`. Each bound is the
        // halfway point between `self` and a neighboring `f64`.
        //
        // The neighbor below has one fewer mantissa bit when
        // `mantissa` is a power of two, unless `self` is subnormal.
        let (l_exp2, l_mantissa) = if exp2 > MIN_NORMAL_EXP2 && mantissa <= MIN_NORMAL_MANTISSA {
            (exp2 - 1, 2 * mantissa - 1)
        } else {
            (exp2, mantissa - 1)
        };
        let mut lower = Self::from_u64(2 * l_mantissa + 1, false);
        lower.lshift(l_exp2 - 53);

        let mut upper = Self::from_u64(2 * mantissa + 1, false);
        upper.lshift(exp2 - 53);

        // Round-to-even parses the bounds back to `self` only if
        // `mantissa` is even.
        let inclusive = mantissa & 1 == 0;

        // Whether rounding up stays below `upper`.
        let mut upper_delta = Delta::Same;

        // `upper` has the most integer digits, so walk its digits
        // and line up `lower` and `self` against them.
        for ui in 0.. {
            let hi = ui - upper.decimal_point + self.decimal_point;
            if hi >= self.num_digits as i32 {
                break;
            }
            let hd = self.digit_at(hi);

            let li = ui - upper.decimal_point + lower.decimal_point;
            let ld = lower.digit_at(li);

            // Rounding down is fine once `self` differs from
            // `lower`, or if this is the last digit of an
            // inclusive `lower`.
            let can_round_down = ld != hd || (inclusive && li + 1 == lower.num_digits as i32);

            let ud = upper.digit_at(ui);
            upper_delta = match upper_delta {
                // self  = 12345???
                // upper = 12347???
                Delta::Same if hd + 1 < ud => Delta::Far,
                // self  = 12345???
                // upper = 12346???
                Delta::Same if hd != ud => Delta::Adjacent,
                // self  = 1234598?
                // upper = 1234600?
                Delta::Adjacent if hd != 9 || ud != 0 => Delta::Far,
                delta => delta,
            };

            let can_round_up = match upper_delta {
                Delta::Far => true,
                Delta::Adjacent => inclusive || ui + 1 < upper.num_digits as i32,
                Delta::Same => false,
            };

            match (can_round_down, can_round_up) {
                (true, true) => return self.round_nearest(hi + 1),
                (true, false) => return self.round_down(hi + 1),
                (false, true) => return self.round_up(hi + 1),
                (false, false) => {}
            }
        }
    }

    /// Returns the integral part of `self`, rounded half to even.
    ///
    /// The sign is ignored. Integral parts of 19 or more digits
    /// saturate to `u64::MAX`.
    pub fn rounded_integer(&self) -> u64 {
        if self.num_digits == 0 || self.decimal_point < 0 {
            return 0;
        }
        if self.decimal_point > 18 {
            return u64::MAX;
        }

        let dp = self.decimal_point as usize;
        let mut n = (0..dp).fold(0u64, |n, i| 10 * n + u64::from(self.digit_at(i as i32)));

        if let Some(&d) = self.digits().get(dp) {
            let up = if d == 5 && dp + 1 == self.num_digits {
                self.truncated || (dp > 0 && self.digits[dp - 1] & 1 != 0)
            } else {
                d >= 5
            };
            if up {
                n += 1;
            }
        }
        n
    }
}

/// How far rounding up is from the upper bound.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum Delta {
    /// The digits so far match.
    Same,
    /// The digits so far differ by exactly one unit in the last
    /// place, followed only by 9s against 0s.
    Adjacent,
    /// Rounding up is strictly below the upper bound.
    Far,
}

#[cfg(test)]
mod tests {
    use rand::{random, thread_rng, Rng};

    use super::*;
    use crate::hpd::tests::{assert_trimmed, hpd};

    #[test]
    fn test_rounded_integer() {
        let tests = [
            (4, "-3.9"),
            (3, "-3.14159"),
            (0, "+0"),
            (0, "0.0000000009"),
            (0, "0.1"),
            (1, "0.9"),
            (12, "1234e-2"),
            (57, "5678e-2"),
            (60, "60.0"),
            (60, "60.4999"),
            (60, "60.5"),
            (60, "60.5000"),
            (61, "60.5001"),
            (61, "60.6"),
            (61, "61.0"),
            (61, "61.4999"),
            (62, "61.5"),
            (62, "61.5000"),
            (62, "61.5001"),
            (62, "61.6"),
            (62, "62.0"),
            (62, "62.4999"),
            (62, "62.5"),
            (62, "62.5000"),
            (63, "62.5001"),
            (63, "62.6"),
            (1000, "999.999"),
            (4560000, "456e+4"),
            (0, "0.5"),
            (123456789012345679, "123456789012345678.9"),
            (1000000000000000000, "999999999999999999.9"),
            (u64::MAX, "1234567890123456789"),
        ];
        for (i, (want, input)) in tests.into_iter().enumerate() {
            assert_eq!(hpd(input).rounded_integer(), want, "#{i}: {input}");
        }

        // Just over one half, past the end of the digit buffer.
        let s = format!("0.5{}1", "0".repeat(1000));
        let h = hpd(&s);
        assert!(h.truncated);
        assert_eq!(h.rounded_integer(), 1);
    }

    #[test]
    fn test_round() {
        #[derive(Copy, Clone, Debug)]
        enum Op {
            Down,
            Up,
            Nearest,
        }
        let tests = [
            ("12345", Op::Down, 3, "+12300."),
            ("12345", Op::Up, 3, "+12400."),
            ("12345", Op::Nearest, 3, "+12300."),
            ("12355", Op::Nearest, 3, "+12400."),
            ("12355", Op::Nearest, 4, "+12360."),
            ("12345", Op::Nearest, 4, "+12340."),
            ("12346", Op::Nearest, 4, "+12350."),
            ("1.2345", Op::Nearest, 4, "+1.234"),
            ("2.5", Op::Nearest, 1, "+2."),
            ("3.5", Op::Nearest, 1, "+4."),
            ("0.5", Op::Nearest, 0, "+0"),
            ("0.6", Op::Nearest, 0, "+1."),
            ("999", Op::Up, 2, "+1000."),
            ("999", Op::Up, 0, "+1000."),
            ("999", Op::Nearest, 1, "+1000."),
            ("-0.0999", Op::Nearest, 2, "-.1"),
            ("123", Op::Down, 5, "+123."),
            ("123", Op::Up, -1, "+123."),
            ("123", Op::Nearest, 3, "+123."),
            ("1200", Op::Down, 1, "+1000."),
        ];
        for (i, (input, op, n, want)) in tests.into_iter().enumerate() {
            let mut h = hpd(input);
            match op {
                Op::Down => h.round_down(n),
                Op::Up => h.round_up(n),
                Op::Nearest => h.round_nearest(n),
            }
            assert_trimmed(&h);
            assert_eq!(format!("{h:?}"), want, "#{i}: {op:?}({input}, {n})");
        }
    }

    #[test]
    fn test_round_nearest_truncated() {
        // "25" followed by dropped non-zero digits is above the
        // halfway point.
        let mut h = hpd(&format!("2.5{}1", "0".repeat(1000)));
        h.round_nearest(1);
        assert_eq!(format!("{h:?}"), "+3.$");
        assert_eq!(h.digits(), [3]);
        assert_eq!(h.decimal_point, 1);
    }

    /// Returns the shortest round trip digits of `x` according to
    /// `round_just_enough`, plus the decimal point.
    fn just_enough(x: f64) -> (String, i32) {
        let bits = x.to_bits();
        let biased = ((bits >> 52) & 0x7FF) as i32;
        let mut mantissa = bits & ((1 << 52) - 1);
        let exp2 = if biased == 0 {
            -1022
        } else {
            mantissa |= 1 << 52;
            biased - 1023
        };
        let mut h = HighPrecDec::from_u64(mantissa, false);
        h.lshift(exp2 - 52);
        h.round_just_enough(exp2, mantissa);
        assert_trimmed(&h);
        let digits = h.digits().iter().map(|&d| char::from(b'0' | d)).collect();
        (digits, h.decimal_point)
    }

    /// Returns the digits of Rust's shortest round trip rendering
    /// plus the decimal point.
    fn shortest(x: f64) -> (String, i32) {
        // "1.2345e-7"
        let s = format!("{x:e}");
        let (mant, exp) = s.split_once('e').unwrap();
        let exp: i32 = exp.parse().unwrap();
        let digits: String = mant.chars().filter(char::is_ascii_digit).collect();
        (digits, exp + 1)
    }

    #[test]
    fn test_round_just_enough() {
        let tests = [
            (1.0, "1", 1),
            (0.1, "1", 0),
            (0.3, "3", 0),
            (0.1 + 0.2, "30000000000000004", 0),
            (1e23, "1", 24),
            (5e-324, "5", -323),
            (f64::MAX, "17976931348623157", 309),
            (f64::MIN_POSITIVE, "22250738585072014", -307),
            (123.456, "123456", 3),
            (2.0f64.powi(-1022) * 3.0, "6675221575521604", -307),
        ];
        for (i, (x, digits, dp)) in tests.into_iter().enumerate() {
            assert_eq!(just_enough(x), (digits.to_owned(), dp), "#{i}: {x:e}");
        }
    }

    #[test]
    fn test_round_just_enough_random() {
        let mut rng = thread_rng();
        for i in 0..20_000 {
            let x = if i % 2 == 0 {
                f64::from_bits(rng.gen_range(1..0x7FF0_0000_0000_0000))
            } else {
                random::<f64>() * 10f64.powi(rng.gen_range(-30..30))
            };
            if x == 0.0 {
                continue;
            }
            let (got_digits, got_dp) = just_enough(x);
            let (want_digits, want_dp) = shortest(x);
            // Both are shortest, but ties between two shortest
            // candidates may resolve differently.
            assert_eq!(got_digits.len(), want_digits.len(), "#{i}: {x:e}");

            let got: f64 = format!("0.{got_digits}e{got_dp}").parse().unwrap();
            assert_eq!(got.to_bits(), x.to_bits(), "#{i}: {x:e}");
            if got_digits == want_digits {
                assert_eq!(got_dp, want_dp, "#{i}: {x:e}");
            }
        }
    }
}
