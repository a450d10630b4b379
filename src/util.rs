macro_rules! const_assert {
    ($($tt:tt)*) => {
        const _: () = ::core::assert!($($tt)*);
    }
}
pub(crate) use const_assert;

/// Reports whether `s` equals `lower` ignoring ASCII case.
///
/// `lower` must be lowercase.
pub(crate) fn equal_fold_ascii(s: &[u8], lower: &[u8]) -> bool {
    debug_assert!(!lower.iter().any(u8::is_ascii_uppercase));

    s.len() == lower.len() && s.iter().zip(lower).all(|(&c, &l)| c.to_ascii_lowercase() == l)
}

/// Asserts that every byte in `s` is a decimal digit value, not an
/// ASCII digit.
#[track_caller]
pub(crate) fn debug_assert_all_digits(s: &[u8]) {
    if cfg!(debug_assertions) {
        debug_assert!(s.iter().all(|&d| d < 10), "non-digit in {s:?}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equal_fold_ascii() {
        let tests: [(&[u8], &[u8], bool); 8] = [
            (b"inf", b"inf", true),
            (b"INF", b"inf", true),
            (b"InFiNiTy", b"infinity", true),
            (b"nan", b"nan", true),
            (b"nan ", b"nan", false),
            (b"na", b"nan", false),
            (b"", b"", true),
            // 'I' | 0x20 is 'i', but 0xC9 | 0x20 is not.
            (b"\xC9nf", b"inf", false),
        ];
        for (i, (s, lower, want)) in tests.into_iter().enumerate() {
            assert_eq!(equal_fold_ascii(s, lower), want, "#{i}");
        }
    }
}
