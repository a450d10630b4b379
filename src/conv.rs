use core::{fmt, str};

use crate::{
    ctx::{RenderOptions, MAX_PRECISION},
    ftoa::render_number_f64,
    util::const_assert,
};

/// A stack buffer for rendering `f64`s as text.
///
/// It is large enough for any rendering, so unlike
/// [`render_number_f64`] it never runs out of space.
///
/// # Example
///
/// ```
/// use f64conv::{Buffer, RenderOptions};
///
/// let mut buf = Buffer::new();
/// assert_eq!(buf.format(2.5, 3, RenderOptions::EXPONENT_ABSENT), "2.500");
/// assert_eq!(buf.format(-0.0, 0, RenderOptions::JUST_ENOUGH_PRECISION), "-0");
/// ```
#[derive(Clone, Debug)]
pub struct Buffer {
    buf: [u8; Self::MAX_STR_LEN],
}

impl Buffer {
    /// A sign, the 309 integral digits of `f64::MAX`, a separator
    /// and `MAX_PRECISION` fractional digits.
    const MAX_STR_LEN: usize = 1 + 309 + 1 + MAX_PRECISION as usize;

    /// Creates a `Buffer`.
    pub const fn new() -> Self {
        Self {
            buf: [0; Self::MAX_STR_LEN],
        }
    }

    /// Renders `x` the way [`render_number_f64`] does and returns
    /// the text.
    ///
    /// [`ALIGN_RIGHT`][RenderOptions::ALIGN_RIGHT] has no effect.
    pub fn format(&mut self, x: f64, precision: u32, options: RenderOptions) -> &str {
        let options = options.difference(RenderOptions::ALIGN_RIGHT);
        let n = render_number_f64(&mut self.buf, x, precision, options);
        // Renderings are always ASCII.
        self.buf
            .get(..n)
            .and_then(|s| str::from_utf8(s).ok())
            .unwrap_or_default()
    }
}

impl Default for Buffer {
    fn default() -> Self {
        Self::new()
    }
}

// "-Inf" and the longest "%e" rendering are both shorter.
const_assert!(Buffer::MAX_STR_LEN >= 1 + 1 + 1 + MAX_PRECISION as usize + 5);

/// An error returned when parsing an `f64` from text.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct ParseError {
    kind: ErrorKind,
    reason: &'static str,
}

impl ParseError {
    pub(crate) const fn invalid(reason: &'static str) -> Self {
        Self {
            kind: ErrorKind::BadArgument,
            reason,
        }
    }

    /// Returns the class of error.
    pub const fn kind(&self) -> ErrorKind {
        self.kind
    }
}

#[cfg(feature = "std")]
#[cfg_attr(docsrs, doc(cfg(feature = "std")))]
impl std::error::Error for ParseError {}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.reason)
    }
}

/// The class of a [`ParseError`].
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[non_exhaustive]
pub enum ErrorKind {
    /// The input is not a valid number.
    BadArgument,
    /// The receiver is in an invalid state.
    ///
    /// Conversions never return this. It exists so that
    /// [`Status`] can describe callers' own state errors.
    BadReceiver,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BadArgument => write!(f, "bad argument"),
            Self::BadReceiver => write!(f, "bad receiver"),
        }
    }
}

/// The outcome of an operation.
///
/// Conversions only ever produce [`Ok`][Status::Ok] and
/// [`Error`][Status::Error]. The other classes are for callers that
/// embed conversions in incremental work.
///
/// # Example
///
/// ```
/// use f64conv::{parse_number_f64, ErrorKind, ParseOptions, Status};
///
/// let status = Status::from(parse_number_f64(b"1e", ParseOptions::empty()));
/// assert!(status.is_error());
/// assert_eq!(status, Status::Error(ErrorKind::BadArgument));
/// assert_eq!(status.message(), Some("bad argument"));
/// ```
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum Status {
    /// Success.
    #[default]
    Ok,
    /// Success, with a note for the caller.
    Warning(&'static str),
    /// Not finished: call again once more input or output space
    /// is available.
    Suspension(&'static str),
    /// Failure.
    Error(ErrorKind),
}

impl Status {
    /// Reports whether the status is [`Ok`][Status::Ok].
    pub const fn is_ok(&self) -> bool {
        matches!(self, Self::Ok)
    }

    /// Reports whether the status is an [`Error`][Status::Error].
    pub const fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    /// Reports whether the status is a [`Warning`][Status::Warning].
    pub const fn is_warning(&self) -> bool {
        matches!(self, Self::Warning(_))
    }

    /// Reports whether the status is a
    /// [`Suspension`][Status::Suspension].
    pub const fn is_suspension(&self) -> bool {
        matches!(self, Self::Suspension(_))
    }

    /// Returns the status message, or `None` if the status is
    /// [`Ok`][Status::Ok].
    pub const fn message(&self) -> Option<&'static str> {
        match self {
            Self::Ok => None,
            Self::Warning(msg) | Self::Suspension(msg) => Some(*msg),
            Self::Error(ErrorKind::BadArgument) => Some("bad argument"),
            Self::Error(ErrorKind::BadReceiver) => Some("bad receiver"),
        }
    }
}

impl From<ParseError> for Status {
    fn from(err: ParseError) -> Self {
        Self::Error(err.kind)
    }
}

impl<T> From<Result<T, ParseError>> for Status {
    fn from(res: Result<T, ParseError>) -> Self {
        match res {
            Ok(_) => Self::Ok,
            Err(err) => err.into(),
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.message() {
            Some(msg) => write!(f, "{msg}"),
            None => write!(f, "ok"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{atof::parse_number_f64, ctx::ParseOptions};

    #[test]
    fn test_buffer() {
        let mut buf = Buffer::new();
        let tests = [
            (1.5, 1, RenderOptions::EXPONENT_ABSENT, "1.5"),
            (1.5, 1, RenderOptions::ALIGN_RIGHT, "2"),
            (f64::NEG_INFINITY, 0, RenderOptions::empty(), "-Inf"),
            (1e-10, 0, RenderOptions::JUST_ENOUGH_PRECISION, "1e-10"),
        ];
        for (i, (x, precision, options, want)) in tests.into_iter().enumerate() {
            assert_eq!(buf.format(x, precision, options), want, "#{i}");
        }

        // The longest possible rendering.
        let s = buf.format(-f64::MAX, u32::MAX, RenderOptions::EXPONENT_ABSENT);
        assert_eq!(s.len(), Buffer::MAX_STR_LEN);
        assert!(s.starts_with("-17976931348623157"));
        assert!(s.ends_with(&format!(".{}", "0".repeat(MAX_PRECISION as usize))));
    }

    #[test]
    fn test_parse_error() {
        let err = parse_number_f64(b"1e", ParseOptions::empty()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BadArgument);
        assert!(err.to_string().starts_with("bad argument: "), "{err}");
    }

    #[test]
    fn test_status() {
        let tests = [
            (Status::Ok, [true, false, false, false], None),
            (
                Status::Warning("end of data"),
                [false, false, true, false],
                Some("end of data"),
            ),
            (
                Status::Suspension("short read"),
                [false, false, false, true],
                Some("short read"),
            ),
            (
                Status::Error(ErrorKind::BadReceiver),
                [false, true, false, false],
                Some("bad receiver"),
            ),
        ];
        for (i, (status, [ok, error, warning, suspension], msg)) in tests.into_iter().enumerate() {
            assert_eq!(status.is_ok(), ok, "#{i}");
            assert_eq!(status.is_error(), error, "#{i}");
            assert_eq!(status.is_warning(), warning, "#{i}");
            assert_eq!(status.is_suspension(), suspension, "#{i}");
            assert_eq!(status.message(), msg, "#{i}");
        }

        assert_eq!(Status::from(parse_number_f64(b"1", ParseOptions::empty())), Status::Ok);
        assert_eq!(
            Status::from(parse_number_f64(b"inf", ParseOptions::REJECT_INF_AND_NAN)),
            Status::Error(ErrorKind::BadArgument),
        );
        assert_eq!(Status::default().to_string(), "ok");
    }
}
