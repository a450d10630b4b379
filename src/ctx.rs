// Bitflags
#![allow(clippy::indexing_slicing)]

use bitflags::bitflags;

/// The largest precision accepted by
/// [`render_number_f64`][crate::render_number_f64].
///
/// Larger precisions are treated as `MAX_PRECISION`.
pub const MAX_PRECISION: u32 = 4095;

/// Options that control how
/// [`parse_number_f64`][crate::parse_number_f64] accepts its input.
///
/// The bit values are stable, so raw masks can be
/// passed through [`ParseOptions::from_bits_truncate`].
#[derive(Copy, Clone, Default, Debug, Eq, PartialEq, Hash)]
pub struct ParseOptions(u32);

bitflags! {
    impl ParseOptions: u32 {
        /// Accept inputs like `"00"`, `"0644"` and `"00.7"`. By
        /// default, they are rejected.
        const ALLOW_MULTIPLE_LEADING_ZEROES = 0x01;
        /// Accept inputs like `"1__2"` and `"_3.141_592"`. By
        /// default, they are rejected.
        const ALLOW_UNDERSCORES = 0x02;
        /// Accept `"1,5"` and not `"1.5"` as one-and-a-half.
        ///
        /// Callers that want to accept either are responsible for
        /// canonicalizing the input first.
        const DECIMAL_SEPARATOR_IS_A_COMMA = 0x10;
        /// Reject inputs that would produce infinite or NaN values.
        ///
        /// This affects the literals `"inf"` and `"nan"` as well as
        /// inputs like `"1e999"` that overflow.
        const REJECT_INF_AND_NAN = 0x20;
    }
}

impl ParseOptions {
    /// Returns the decimal separator selected by these options.
    pub(crate) const fn separator(self) -> u8 {
        if self.contains(Self::DECIMAL_SEPARATOR_IS_A_COMMA) {
            b','
        } else {
            b'.'
        }
    }
}

/// Options that control how
/// [`render_number_f64`][crate::render_number_f64] formats its output.
///
/// Setting both [`EXPONENT_ABSENT`][Self::EXPONENT_ABSENT] and
/// [`EXPONENT_PRESENT`][Self::EXPONENT_PRESENT] is the same as setting
/// neither: the notation then depends on the magnitude of the
/// exponent, like printf's `%g`.
#[derive(Copy, Clone, Default, Debug, Eq, PartialEq, Hash)]
pub struct RenderOptions(u32);

bitflags! {
    impl RenderOptions: u32 {
        /// Render to the right side of the destination, leaving any
        /// untouched bytes on the left.
        const ALIGN_RIGHT = 0x100;
        /// Render a leading `'+'` for non-negative numbers: `"+0"`
        /// and `"+12.3"` instead of `"0"` and `"12.3"`.
        const LEADING_PLUS_SIGN = 0x200;
        /// Render one-and-a-half as `"1,5"` instead of `"1.5"`.
        const DECIMAL_SEPARATOR_IS_A_COMMA = 0x1000;
        /// Never render an exponent, like printf's `%f`.
        const EXPONENT_ABSENT = 0x2000;
        /// Always render an exponent, like printf's `%e`.
        const EXPONENT_PRESENT = 0x4000;
        /// Render the fewest digits that parse back to exactly the
        /// same value. The numeric precision is ignored.
        const JUST_ENOUGH_PRECISION = 0x8000;
    }
}

impl RenderOptions {
    /// Returns the decimal separator selected by these options.
    pub(crate) const fn separator(self) -> u8 {
        if self.contains(Self::DECIMAL_SEPARATOR_IS_A_COMMA) {
            b','
        } else {
            b'.'
        }
    }

    /// Reports whether a sign byte precedes non-negative numbers.
    pub(crate) const fn plus_sign(self) -> bool {
        self.contains(Self::LEADING_PLUS_SIGN)
    }
}

/// The notation picked by the exponent bits of [`RenderOptions`].
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum Notation {
    /// `%f`.
    Fixed,
    /// `%e`.
    Scientific,
    /// `%g`.
    General,
}

impl From<RenderOptions> for Notation {
    fn from(options: RenderOptions) -> Self {
        let absent = options.contains(RenderOptions::EXPONENT_ABSENT);
        let present = options.contains(RenderOptions::EXPONENT_PRESENT);
        match (absent, present) {
            (true, false) => Self::Fixed,
            (false, true) => Self::Scientific,
            _ => Self::General,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notation() {
        let tests = [
            (RenderOptions::empty(), Notation::General),
            (RenderOptions::EXPONENT_ABSENT, Notation::Fixed),
            (RenderOptions::EXPONENT_PRESENT, Notation::Scientific),
            (
                RenderOptions::EXPONENT_ABSENT | RenderOptions::EXPONENT_PRESENT,
                Notation::General,
            ),
            (
                RenderOptions::EXPONENT_ABSENT | RenderOptions::ALIGN_RIGHT,
                Notation::Fixed,
            ),
        ];
        for (i, (options, want)) in tests.into_iter().enumerate() {
            assert_eq!(Notation::from(options), want, "#{i}");
        }
    }

    #[test]
    fn test_raw_bits() {
        assert_eq!(
            ParseOptions::from_bits_truncate(0x33),
            ParseOptions::all(),
            "unknown bits should be dropped"
        );
        assert_eq!(RenderOptions::all().bits(), 0xF300);
        assert_eq!(ParseOptions::default(), ParseOptions::empty());
    }

    #[test]
    fn test_separator() {
        assert_eq!(ParseOptions::empty().separator(), b'.');
        assert_eq!(
            ParseOptions::DECIMAL_SEPARATOR_IS_A_COMMA.separator(),
            b','
        );
        assert_eq!(RenderOptions::empty().separator(), b'.');
        assert_eq!(
            RenderOptions::DECIMAL_SEPARATOR_IS_A_COMMA.separator(),
            b','
        );
    }
}
