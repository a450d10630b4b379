use super::{HighPrecDec, DECIMAL_POINT_RANGE, DIGITS_PRECISION};
use crate::{conv::ParseError, ctx::ParseOptions, util::debug_assert_all_digits};

/// Exponents are only accumulated up to this magnitude. Anything
/// larger clamps the decimal point regardless.
const EXP_LARGE: i32 = DECIMAL_POINT_RANGE + DIGITS_PRECISION as i32;

/// What follows the digits just consumed.
enum Next {
    End,
    Separator,
    Exponent,
}

impl HighPrecDec {
    /// Parses a decimal number like `"-12.34e+5"`.
    ///
    /// Digits past [`DIGITS_PRECISION`] are dropped, setting
    /// `truncated` if any of them are non-zero. Special values like
    /// `"inf"` are not accepted.
    pub fn parse(s: &[u8], options: ParseOptions) -> Result<Self, ParseError> {
        let mut h = Self::new();
        let underscores = options.contains(ParseOptions::ALLOW_UNDERSCORES);
        let sep = options.separator();

        let mut s = s;
        if underscores {
            s = skip_underscores(s)?;
        }

        if let Some((c @ (b'+' | b'-'), rest)) = s.split_first() {
            h.negative = *c == b'-';
            s = rest;
            if underscores {
                s = skip_underscores(s)?;
            }
        }

        let mut nd = 0;
        let mut dp: i32 = 0;
        let mut no_digits_before_separator = false;

        let next = match s.split_first() {
            Some((b'0', rest))
                if !options.contains(ParseOptions::ALLOW_MULTIPLE_LEADING_ZEROES) =>
            {
                // A lone leading zero.
                s = rest;
                loop {
                    match s.split_first() {
                        None => break Next::End,
                        Some((&c, rest)) => {
                            s = rest;
                            if c == sep {
                                break Next::Separator;
                            } else if c == b'E' || c == b'e' {
                                break Next::Exponent;
                            } else if c != b'_' || !underscores {
                                return Err(ParseError::invalid("leading zero"));
                            }
                        }
                    }
                }
            }
            Some((b'0'..=b'9', _)) => loop {
                match s.split_first() {
                    None => break Next::End,
                    Some((&c, rest)) => {
                        s = rest;
                        if c.is_ascii_digit() {
                            let d = c - b'0';
                            if nd == 0 && d == 0 {
                                // Leading zeros are implicit.
                            } else if nd < DIGITS_PRECISION {
                                h.digits[nd] = d;
                                nd += 1;
                                dp += 1;
                            } else {
                                if d != 0 {
                                    h.truncated = true;
                                }
                                dp = dp.saturating_add(1);
                            }
                        } else if c == sep {
                            break Next::Separator;
                        } else if c == b'E' || c == b'e' {
                            break Next::Exponent;
                        } else if c != b'_' || !underscores {
                            return Err(ParseError::invalid("expected digit"));
                        }
                    }
                }
            },
            Some((&c, rest)) if c == sep => {
                s = rest;
                no_digits_before_separator = true;
                Next::Separator
            }
            Some(_) => return Err(ParseError::invalid("expected digit or separator")),
            None => return Err(ParseError::invalid("unexpected end of input")),
        };

        let next = match next {
            Next::Separator => loop {
                match s.split_first() {
                    None => break Next::End,
                    Some((&c, rest)) => {
                        s = rest;
                        if c.is_ascii_digit() {
                            let d = c - b'0';
                            if nd == 0 && d == 0 {
                                dp = dp.saturating_sub(1);
                            } else if nd < DIGITS_PRECISION {
                                h.digits[nd] = d;
                                nd += 1;
                            } else if d != 0 {
                                h.truncated = true;
                            }
                        } else if c == b'E' || c == b'e' {
                            break Next::Exponent;
                        } else if c != b'_' || !underscores {
                            return Err(ParseError::invalid("expected digit"));
                        }
                    }
                }
            },
            next => next,
        };

        if let Next::Exponent = next {
            let (exp, rest) = parse_exp(s, underscores)?;
            dp = dp.saturating_add(exp);
            s = rest;
        }

        if !s.is_empty() {
            return Err(ParseError::invalid("trailing characters"));
        }

        h.num_digits = nd;
        if nd == 0 {
            if no_digits_before_separator {
                return Err(ParseError::invalid("no digits"));
            }
            h.decimal_point = 0;
        } else {
            h.decimal_point = dp.clamp(-DECIMAL_POINT_RANGE - 1, DECIMAL_POINT_RANGE + 1);
        }
        h.trim();
        debug_assert_all_digits(h.digits());
        Ok(h)
    }
}

/// Skips leading underscores, failing if nothing else remains.
fn skip_underscores(mut s: &[u8]) -> Result<&[u8], ParseError> {
    while let Some((b'_', rest)) = s.split_first() {
        s = rest;
    }
    if s.is_empty() {
        Err(ParseError::invalid("unexpected end of input"))
    } else {
        Ok(s)
    }
}

/// Parses the exponent after an `e` or `E`.
///
/// It returns the signed exponent, whose magnitude stops growing
/// once it reaches [`EXP_LARGE`], and the unparsed remainder of `s`.
fn parse_exp(mut s: &[u8], underscores: bool) -> Result<(i32, &[u8]), ParseError> {
    if underscores {
        s = skip_underscores(s)?;
    }

    let mut neg = false;
    if let Some((c @ (b'+' | b'-'), rest)) = s.split_first() {
        neg = *c == b'-';
        s = rest;
    }

    let mut exp: i32 = 0;
    let mut saw_digits = false;
    while let Some((&c, rest)) = s.split_first() {
        if c == b'_' && underscores {
            // Ignored.
        } else if c.is_ascii_digit() {
            saw_digits = true;
            if exp < EXP_LARGE {
                exp = 10 * exp + i32::from(c - b'0');
            }
        } else {
            break;
        }
        s = rest;
    }
    if !saw_digits {
        return Err(ParseError::invalid("expected exponent digits"));
    }
    Ok((if neg { -exp } else { exp }, s))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hpd::tests::{assert_trimmed, hpd};

    #[test]
    fn test_parse() {
        let tests = [
            ("0", "+0"),
            ("-0", "-0"),
            ("+0.000", "+0"),
            ("0.", "+0"),
            ("1", "+1."),
            ("-1", "-1."),
            ("12e3", "+12000."),
            ("3750e-1", "+375."),
            (".125", "+.125"),
            ("0.125", "+.125"),
            ("-0.007", "-.007"),
            ("-2.734375e-5", "-.00002734375"),
            ("3.14159E+26", "+314159000000000000000000000."),
            ("1.500", "+1.5"),
            ("100", "+100."),
            ("0e999999", "+0"),
            ("1e99999", "+inf"),
            ("1e-99999", "+eps"),
        ];
        for (i, (input, want)) in tests.iter().enumerate() {
            let h = hpd(input);
            assert_trimmed(&h);
            assert_eq!(format!("{h:?}"), *want, "#{i}: {input}");
        }

        let h = hpd("1e2046");
        assert_eq!(h.decimal_point, DECIMAL_POINT_RANGE);
        let h = hpd("1e2047");
        assert_eq!(h.decimal_point, DECIMAL_POINT_RANGE + 1);
        let h = hpd("1e-2048");
        assert_eq!(h.decimal_point, -DECIMAL_POINT_RANGE);
        let h = hpd("1e-2049");
        assert_eq!(h.decimal_point, -DECIMAL_POINT_RANGE - 1);
    }

    #[test]
    fn test_parse_errors() {
        let tests = [
            "", " 0", "0 ", "+", "-", ".", "..", "00", "001.2", "0644", "0x10", "1.2.3", "1e",
            "1e+", "7e-", "7e-+1", "1_000", "_1", "inf", "nan", "e5", ".e5", "1,5", "--1",
        ];
        for (i, input) in tests.iter().enumerate() {
            let got = HighPrecDec::parse(input.as_bytes(), ParseOptions::empty());
            assert!(got.is_err(), "#{i}: {input:?} should fail, got {got:?}");
        }
    }

    #[test]
    fn test_parse_options() {
        let under = ParseOptions::ALLOW_UNDERSCORES;
        let zeros = ParseOptions::ALLOW_MULTIPLE_LEADING_ZEROES;
        let comma = ParseOptions::DECIMAL_SEPARATOR_IS_A_COMMA;
        let tests = [
            (under, "_+__2_2__.", Some("+22.")),
            (under, "2400_00000_00000.00000_e-_1_2", Some("+24.")),
            (under, "1__000", Some("+1000.")),
            (under, "0_.5", Some("+.5")),
            (under, "_", None),
            (under, "-_", None),
            (under, "1e_", None),
            (zeros, "00", Some("+0")),
            (zeros, "0644", Some("+644.")),
            (zeros, "00.7", Some("+.7")),
            (zeros | under, "0_0_1", Some("+1.")),
            (comma, "1,75", Some("+1.75")),
            (comma, "1.75", None),
            (comma, ",5", Some("+.5")),
            (comma, ",", None),
        ];
        for (i, (options, input, want)) in tests.into_iter().enumerate() {
            let got = HighPrecDec::parse(input.as_bytes(), options);
            match (got, want) {
                (Ok(h), Some(want)) => {
                    assert_trimmed(&h);
                    assert_eq!(format!("{h:?}"), want, "#{i}: {input}");
                }
                (Err(_), None) => {}
                (got, want) => panic!("#{i}: {input}: got {got:?}, want {want:?}"),
            }
        }
    }

    #[test]
    fn test_parse_truncated() {
        // 800 ones fit. The rest are dropped.
        let s = "1".repeat(DIGITS_PRECISION + 5);
        let h = hpd(&s);
        assert_eq!(h.num_digits, DIGITS_PRECISION);
        assert_eq!(h.decimal_point, (DIGITS_PRECISION + 5) as i32);
        assert!(h.truncated);

        // Dropped zeros do not set the truncated bit.
        let s = format!("{}{}", "1".repeat(DIGITS_PRECISION), "0".repeat(10));
        let h = hpd(&s);
        assert_eq!(h.num_digits, DIGITS_PRECISION);
        assert_eq!(h.decimal_point, (DIGITS_PRECISION + 10) as i32);
        assert!(!h.truncated);

        let s = format!("0.{}{}", "0".repeat(5), "9".repeat(DIGITS_PRECISION + 1));
        let h = hpd(&s);
        assert_eq!(h.num_digits, DIGITS_PRECISION);
        assert_eq!(h.decimal_point, -5);
        assert!(h.truncated);
    }

    #[test]
    fn test_parse_leading_fraction_zeros() {
        // Leading zeros after the separator move the decimal point
        // past its range, which clamps to the "effectively zero"
        // sentinel.
        let s = format!("0.{}1", "0".repeat(100_000));
        let h = hpd(&s);
        assert_eq!(h.digits(), [1]);
        assert_eq!(h.decimal_point, -DECIMAL_POINT_RANGE - 1);
        assert!(!h.truncated);
    }
}
