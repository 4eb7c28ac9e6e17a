//! Numeric validation functions

/// Parses the leading integer of a string the way form fields are read:
/// leading whitespace is skipped, an optional sign is accepted, and digits
/// are consumed until the first non-digit. `"15"`, `" 15px"` and `"15.9"`
/// all read as `15`; a string without leading digits is not a number.
pub fn parse_int(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let digits: &str = {
        let end = digits
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(digits.len());
        &digits[..end]
    };
    if digits.is_empty() {
        return None;
    }

    let magnitude = digits.bytes().fold(0i64, |acc, b| {
        acc.saturating_mul(10).saturating_add(i64::from(b - b'0'))
    });
    Some(if negative { -magnitude } else { magnitude })
}

/// Which declared bound a number violates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundViolation {
    AboveMax,
    BelowMin,
}

/// Optional `min`/`max` bounds declared on a number control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NumberBounds {
    pub min: Option<i64>,
    pub max: Option<i64>,
}

impl NumberBounds {
    /// Reads bounds from raw attribute values; unparseable values are absent.
    pub fn from_attrs(min: Option<&str>, max: Option<&str>) -> Self {
        Self {
            min: min.and_then(parse_int),
            max: max.and_then(parse_int),
        }
    }

    /// Checks `value` against the bounds. `max` is checked before `min`.
    pub fn check(&self, value: i64) -> Option<BoundViolation> {
        if matches!(self.max, Some(max) if value > max) {
            return Some(BoundViolation::AboveMax);
        }
        if matches!(self.min, Some(min) if value < min) {
            return Some(BoundViolation::BelowMin);
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("15", Some(15))]
    #[case("  42", Some(42))]
    #[case("-7", Some(-7))]
    #[case("+3", Some(3))]
    #[case("12.9", Some(12))]
    #[case("10px", Some(10))]
    #[case("abc", None)]
    #[case("", None)]
    #[case("-", None)]
    #[case(".5", None)]
    fn test_parse_int(#[case] raw: &str, #[case] expected: Option<i64>) {
        assert_eq!(parse_int(raw), expected);
    }

    #[test]
    fn test_parse_int_saturates() {
        assert_eq!(parse_int("99999999999999999999999"), Some(i64::MAX));
    }

    #[test]
    fn test_bounds_check() {
        let bounds = NumberBounds { min: Some(1), max: Some(10) };
        assert_eq!(bounds.check(5), None);
        assert_eq!(bounds.check(1), None);
        assert_eq!(bounds.check(10), None);
        assert_eq!(bounds.check(15), Some(BoundViolation::AboveMax));
        assert_eq!(bounds.check(0), Some(BoundViolation::BelowMin));
    }

    #[test]
    fn test_bounds_from_attrs() {
        let bounds = NumberBounds::from_attrs(None, Some("10"));
        assert_eq!(bounds, NumberBounds { min: None, max: Some(10) });
        assert_eq!(bounds.check(-1000), None);

        let bounds = NumberBounds::from_attrs(Some("x"), Some(""));
        assert_eq!(bounds, NumberBounds::default());
    }
}
