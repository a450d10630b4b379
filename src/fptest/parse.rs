use anyhow::{anyhow, bail, Context, Result};

use super::{Case, Op};
use crate::ctx::{ParseOptions, RenderOptions};

/// Parses test cases.
///
/// Directives like `precision: 3` and `options: align_right` apply
/// to every case that follows them.
pub fn parse(s: &str) -> Result<Vec<Case<'_>>> {
    let mut precision: u32 = 0;
    let mut parse_options = ParseOptions::empty();
    let mut render_options = RenderOptions::empty();
    let mut cases = Vec::new();
    for (i, line) in s.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with("--") {
            continue;
        }
        // Line numbers are 1-based.
        let lineno = i + 1;

        if let Some(v) = line.strip_prefix("precision:") {
            precision = v
                .trim()
                .parse()
                .with_context(|| format!("line {lineno}: unable to parse precision: `{v}`"))?;
            continue;
        }

        if let Some(v) = line.strip_prefix("options:") {
            (parse_options, render_options) = parse_options_list(v.trim())
                .with_context(|| format!("line {lineno}: invalid options: `{v}`"))?;
            continue;
        }

        let (name, rest) = line
            .split_once(' ')
            .with_context(|| format!("line {lineno}: test case missing name: `{line}`"))?;
        let op = Op::parse(rest.trim())
            .with_context(|| format!("line {lineno}: unable to parse op: `{rest}`"))?;
        cases.push(Case {
            line: lineno,
            name,
            precision,
            parse_options,
            render_options,
            op,
        });
    }
    if cases.is_empty() {
        bail!("no test cases");
    }
    Ok(cases)
}

/// Parses a comma separated list of option names, or `-` for no
/// options.
fn parse_options_list(s: &str) -> Result<(ParseOptions, RenderOptions)> {
    let mut parse = ParseOptions::empty();
    let mut render = RenderOptions::empty();
    if s == "-" {
        return Ok((parse, render));
    }
    for name in s.split(',').map(str::trim) {
        match name {
            "allow_multiple_leading_zeroes" => parse |= ParseOptions::ALLOW_MULTIPLE_LEADING_ZEROES,
            "allow_underscores" => parse |= ParseOptions::ALLOW_UNDERSCORES,
            "reject_inf_and_nan" => parse |= ParseOptions::REJECT_INF_AND_NAN,
            "decimal_separator_is_a_comma" => {
                parse |= ParseOptions::DECIMAL_SEPARATOR_IS_A_COMMA;
                render |= RenderOptions::DECIMAL_SEPARATOR_IS_A_COMMA;
            }
            "align_right" => render |= RenderOptions::ALIGN_RIGHT,
            "leading_plus_sign" => render |= RenderOptions::LEADING_PLUS_SIGN,
            "exponent_absent" => render |= RenderOptions::EXPONENT_ABSENT,
            "exponent_present" => render |= RenderOptions::EXPONENT_PRESENT,
            "just_enough_precision" => render |= RenderOptions::JUST_ENOUGH_PRECISION,
            _ => bail!("unknown option: `{name}`"),
        }
    }
    Ok((parse, render))
}

/// Strips the quotes from a `"quoted"` string.
pub(super) fn unquote(s: &str) -> Result<&str> {
    s.strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .ok_or_else(|| anyhow!("expected a quoted string: `{s}`"))
}

/// Parses `0x`-prefixed hexadecimal bits.
pub(super) fn parse_bits(s: &str) -> Result<u64> {
    let hex = s
        .strip_prefix("0x")
        .with_context(|| format!("expected `0x` prefix: `{s}`"))?;
    u64::from_str_radix(hex, 16).with_context(|| format!("invalid hex: `{s}`"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_directives() {
        let s = r#"
-- A comment.
precision: 3
options: exponent_absent, align_right
r1 render 0x3FF8000000000000 -> "1.500"
options: -
p1 parse "1" -> 0x3FF0000000000000
"#;
        let cases = parse(s).unwrap();
        assert_eq!(cases.len(), 2);

        assert_eq!(cases[0].name, "r1");
        assert_eq!(cases[0].line, 5);
        assert_eq!(cases[0].precision, 3);
        assert_eq!(
            cases[0].render_options,
            RenderOptions::EXPONENT_ABSENT | RenderOptions::ALIGN_RIGHT
        );

        assert_eq!(cases[1].name, "p1");
        assert_eq!(cases[1].render_options, RenderOptions::empty());
        assert_eq!(cases[1].parse_options, ParseOptions::empty());
    }

    #[test]
    fn test_parse_invalid() {
        let tests = [
            "",
            "-- only a comment",
            "precision: x",
            "options: bogus",
            "p1",
            "p1 parse 1 -> 0x0",
            "p1 parse \"1\" -> 1",
            "p1 multiply \"1\" -> 0x0",
        ];
        for (i, s) in tests.into_iter().enumerate() {
            assert!(parse(s).is_err(), "#{i}: {s}");
        }
    }
}
