//! Text conversions for the built-in value variants.
//!
//! Integer parsing follows the usual base-prefix rules (`0x`, `0o`, `0b`, a
//! bare leading `0` for octal) and reports overflow as
//! [`ConversionError::Range`] rather than a syntax error.

use crate::error::ConversionError;

/// Parse a boolean literal: `true/t/1/false/f/0`, ignoring case.
pub fn parse_bool(s: &str) -> Result<bool, ConversionError> {
    match s.to_ascii_lowercase().as_str() {
        "1" | "t" | "true" => Ok(true),
        "0" | "f" | "false" => Ok(false),
        _ => Err(ConversionError::Syntax),
    }
}

pub(crate) fn is_bool_literal(s: &str) -> bool {
    parse_bool(s).is_ok()
}

/// Parse a signed integer and check it against the width of `T`.
pub fn parse_signed<T: TryFrom<i128>>(s: &str) -> Result<T, ConversionError> {
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let magnitude = parse_magnitude(digits)?;
    let value = i128::try_from(magnitude).map_err(|_| ConversionError::Range)?;
    let value = if negative { -value } else { value };
    T::try_from(value).map_err(|_| ConversionError::Range)
}

/// Parse an unsigned integer and check it against the width of `T`.
///
/// Signs are rejected outright.
pub fn parse_unsigned<T: TryFrom<u128>>(s: &str) -> Result<T, ConversionError> {
    let magnitude = parse_magnitude(s)?;
    T::try_from(magnitude).map_err(|_| ConversionError::Range)
}

fn parse_magnitude(s: &str) -> Result<u128, ConversionError> {
    let (radix, digits) = split_radix(s);
    if digits.is_empty() {
        // A lone "0" was split into radix 8 with nothing left.
        return if s == "0" {
            Ok(0)
        } else {
            Err(ConversionError::Syntax)
        };
    }

    let mut value: u128 = 0;
    for c in digits.chars() {
        let digit = c.to_digit(radix).ok_or(ConversionError::Syntax)?;
        value = value
            .checked_mul(u128::from(radix))
            .and_then(|v| v.checked_add(u128::from(digit)))
            .ok_or(ConversionError::Range)?;
    }
    Ok(value)
}

fn split_radix(s: &str) -> (u32, &str) {
    let lower = s.get(..2).map(str::to_ascii_lowercase);
    match lower.as_deref() {
        Some("0x") => (16, &s[2..]),
        Some("0o") => (8, &s[2..]),
        Some("0b") => (2, &s[2..]),
        _ if s.starts_with('0') => (8, &s[1..]),
        _ => (10, s),
    }
}

/// Parse a float. A finite literal that overflows to infinity is a range error.
pub fn parse_float(s: &str) -> Result<f64, ConversionError> {
    let value: f64 = s.parse().map_err(|_| ConversionError::Syntax)?;
    if value.is_infinite() && !s.to_ascii_lowercase().contains("inf") {
        return Err(ConversionError::Range);
    }
    Ok(value)
}

/// Render a float in its shortest form, switching to exponent notation for
/// very small or very large magnitudes (`2.718e+31`).
pub fn format_float(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "+Inf" } else { "-Inf" }.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }

    let sci = format!("{value:e}");
    let Some((mantissa, exponent)) = sci.split_once('e') else {
        return value.to_string();
    };
    let exponent: i32 = exponent.parse().unwrap_or(0);
    if (-4..21).contains(&exponent) {
        value.to_string()
    } else {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{mantissa}e{sign}{:02}", exponent.abs())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bools_ignore_case() {
        assert!(parse_bool("TRUE").unwrap());
        assert!(parse_bool("t").unwrap());
        assert!(!parse_bool("F").unwrap());
        assert!(!parse_bool("0").unwrap());
        assert!(matches!(parse_bool("yes"), Err(ConversionError::Syntax)));
    }

    #[test]
    fn integers_honor_base_prefixes() {
        assert_eq!(parse_signed::<i64>("0x23").unwrap(), 35);
        assert_eq!(parse_signed::<i64>("-0x10").unwrap(), -16);
        assert_eq!(parse_signed::<i64>("017").unwrap(), 15);
        assert_eq!(parse_signed::<i64>("0b101").unwrap(), 5);
        assert_eq!(parse_signed::<i64>("0o17").unwrap(), 15);
        assert_eq!(parse_signed::<i64>("0").unwrap(), 0);
        assert_eq!(parse_signed::<i64>("+22").unwrap(), 22);
        assert_eq!(parse_unsigned::<u64>("25").unwrap(), 25);
    }

    #[test]
    fn integer_syntax_and_range_are_distinct() {
        assert!(matches!(parse_signed::<i64>("x"), Err(ConversionError::Syntax)));
        assert!(matches!(parse_signed::<i64>("08"), Err(ConversionError::Syntax)));
        assert!(matches!(parse_signed::<i64>("0x"), Err(ConversionError::Syntax)));
        assert!(matches!(parse_signed::<i64>(""), Err(ConversionError::Syntax)));
        assert!(matches!(parse_unsigned::<u64>("-1"), Err(ConversionError::Syntax)));
        assert!(matches!(
            parse_signed::<i32>("2147483648"),
            Err(ConversionError::Range)
        ));
        assert_eq!(parse_signed::<i32>("-2147483648").unwrap(), i32::MIN);
        assert!(matches!(
            parse_unsigned::<u32>("4294967296"),
            Err(ConversionError::Range)
        ));
        assert!(matches!(
            parse_signed::<i64>("123456789012345678901"),
            Err(ConversionError::Range)
        ));
        assert!(matches!(
            parse_unsigned::<u64>("123456789012345678901234567890123456789012"),
            Err(ConversionError::Range)
        ));
    }

    #[test]
    fn floats_overflow_to_range() {
        assert_eq!(parse_float("2718e28").unwrap(), 2718e28);
        assert!(matches!(parse_float("1e1000"), Err(ConversionError::Range)));
        assert!(matches!(parse_float("abc"), Err(ConversionError::Syntax)));
        assert!(parse_float("inf").unwrap().is_infinite());
    }

    #[test]
    fn floats_render_shortest() {
        assert_eq!(format_float(0.0), "0");
        assert_eq!(format_float(2.7), "2.7");
        assert_eq!(format_float(27.0), "27");
        assert_eq!(format_float(2718e28), "2.718e+31");
        assert_eq!(format_float(0.00001), "1e-05");
        assert_eq!(format_float(0.0001), "0.0001");
    }
}
