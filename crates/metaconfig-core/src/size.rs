//! Human-readable size literals
//!
//! `"64K"`, `"1M"` and `"2G"` are powers-of-1024 byte counts. The magnitude
//! is the first run of decimal digits anywhere in the text. A unit marker
//! that is not the final character (`"10Kb"`, `"1KM"`) makes the literal
//! evaluate to 0 instead of failing; schemas rely on 0 being a legitimate
//! size, so that coercion is kept as is.

use thiserror::Error;

/// Errors converting a size literal
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SizeLiteralError {
    /// The digit run or the scaled result does not fit in 64 bits
    #[error("Size literal '{0}' is out of range")]
    Overflow(String),
}

/// Unit marker of a size literal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeUnit {
    Bytes,
    Kilo,
    Mega,
    Giga,
}

impl SizeUnit {
    /// Case-sensitive marker lookup
    pub fn from_marker(marker: char) -> Option<Self> {
        match marker {
            'K' => Some(SizeUnit::Kilo),
            'M' => Some(SizeUnit::Mega),
            'G' => Some(SizeUnit::Giga),
            _ => None,
        }
    }

    /// Number of bytes in one unit
    pub fn multiplier(self) -> i64 {
        match self {
            SizeUnit::Bytes => 1,
            SizeUnit::Kilo => 1 << 10,
            SizeUnit::Mega => 1 << 20,
            SizeUnit::Giga => 1 << 30,
        }
    }
}

/// Convert a size literal to a byte count
///
/// ```rust
/// use metaconfig_core::size::to_bytes;
///
/// assert_eq!(to_bytes("64K"), Ok(65_536));
/// assert_eq!(to_bytes("100"), Ok(100));
/// assert_eq!(to_bytes("10Kb"), Ok(0));
/// assert_eq!(to_bytes("abc"), Ok(0));
/// ```
pub fn to_bytes(text: &str) -> Result<i64, SizeLiteralError> {
    let magnitude = match first_digit_run(text) {
        Some(digits) => digits
            .parse::<i64>()
            .map_err(|_| SizeLiteralError::Overflow(text.to_string()))?,
        None => 0,
    };

    // Only the first marker counts; anything after it voids the literal.
    let unit = match text
        .char_indices()
        .find_map(|(pos, ch)| SizeUnit::from_marker(ch).map(|unit| (pos, ch, unit)))
    {
        Some((pos, ch, unit)) => {
            if pos + ch.len_utf8() != text.len() {
                return Ok(0);
            }
            unit
        }
        None => SizeUnit::Bytes,
    };

    magnitude
        .checked_mul(unit.multiplier())
        .ok_or_else(|| SizeLiteralError::Overflow(text.to_string()))
}

fn first_digit_run(text: &str) -> Option<&str> {
    let start = text.find(|ch: char| ch.is_ascii_digit())?;
    let rest = &text[start..];
    let len = rest
        .find(|ch: char| !ch.is_ascii_digit())
        .unwrap_or(rest.len());
    Some(&rest[..len])
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_units() {
        assert_eq!(to_bytes("64K"), Ok(65_536));
        assert_eq!(to_bytes("1M"), Ok(1_048_576));
        assert_eq!(to_bytes("2G"), Ok(2_147_483_648));
        assert_eq!(to_bytes("100"), Ok(100));
    }

    #[test]
    fn test_trailing_garbage_after_unit_is_zero() {
        assert_eq!(to_bytes("10Kb"), Ok(0));
        assert_eq!(to_bytes("64K "), Ok(0));
    }

    #[test]
    fn test_multiple_markers_are_zero() {
        assert_eq!(to_bytes("1KM"), Ok(0));
        assert_eq!(to_bytes("1MG"), Ok(0));
    }

    #[test]
    fn test_no_digits_is_zero() {
        assert_eq!(to_bytes("abc"), Ok(0));
        assert_eq!(to_bytes(""), Ok(0));
        assert_eq!(to_bytes("K"), Ok(0));
    }

    #[test]
    fn test_markers_are_case_sensitive() {
        assert_eq!(to_bytes("10k"), Ok(10));
        assert_eq!(to_bytes("10m"), Ok(10));
    }

    #[test]
    fn test_first_digit_run_only() {
        assert_eq!(to_bytes("size 12 of 34"), Ok(12));
        assert_eq!(to_bytes("-5"), Ok(5));
        assert_eq!(to_bytes(" 8M"), Ok(8 * 1024 * 1024));
    }

    #[test]
    fn test_overflow() {
        assert!(to_bytes("99999999999999999999").is_err());
        assert!(to_bytes("9999999999999G").is_err());
        // voided literals never overflow
        assert_eq!(to_bytes("9999999999999Gb"), Ok(0));
    }

    proptest! {
        #[test]
        fn prop_kilo_scales_by_1024(n in 0i64..1_000_000_000) {
            prop_assert_eq!(to_bytes(&format!("{}K", n)), Ok(n * 1024));
        }

        #[test]
        fn prop_plain_numbers_round_trip(n in 0i64..i64::MAX) {
            prop_assert_eq!(to_bytes(&n.to_string()), Ok(n));
        }

        #[test]
        fn prop_text_without_digits_is_zero(s in "[a-zA-Z ]{0,16}") {
            prop_assert_eq!(to_bytes(&s), Ok(0));
        }
    }
}
