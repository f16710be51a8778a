//! Compound time spans such as `300ms`, `1.5h` or `2h45m`.

use std::time::Duration;

use crate::error::ConversionError;

const NANOS_PER_SEC: u128 = 1_000_000_000;

fn unit_scale(unit: &str) -> Option<u128> {
    Some(match unit {
        "ns" => 1,
        "us" | "µs" | "μs" => 1_000,
        "ms" => 1_000_000,
        "s" => NANOS_PER_SEC,
        "m" => 60 * NANOS_PER_SEC,
        "h" => 3600 * NANOS_PER_SEC,
        _ => return None,
    })
}

/// Parse a sequence of decimal numbers, each with an optional fraction and a
/// mandatory unit suffix. A bare `0` is accepted. Negative spans are rejected.
pub fn parse(s: &str) -> Result<Duration, ConversionError> {
    let mut rest = s.strip_prefix('+').unwrap_or(s);
    if rest == "0" {
        return Ok(Duration::ZERO);
    }
    if rest.is_empty() {
        return Err(ConversionError::Syntax);
    }

    let mut total: u128 = 0;
    while !rest.is_empty() {
        let int_len = rest.bytes().take_while(u8::is_ascii_digit).count();
        let (int_part, tail) = rest.split_at(int_len);
        rest = tail;

        let mut frac_part = "";
        if let Some(tail) = rest.strip_prefix('.') {
            let frac_len = tail.bytes().take_while(u8::is_ascii_digit).count();
            frac_part = &tail[..frac_len];
            rest = &tail[frac_len..];
        }
        if int_part.is_empty() && frac_part.is_empty() {
            return Err(ConversionError::Syntax);
        }

        let unit_len = rest
            .find(|c: char| c == '.' || c.is_ascii_digit())
            .unwrap_or(rest.len());
        let (unit, tail) = rest.split_at(unit_len);
        rest = tail;
        let scale = unit_scale(unit).ok_or(ConversionError::Syntax)?;

        let whole: u128 = if int_part.is_empty() {
            0
        } else {
            int_part.parse().map_err(|_| ConversionError::Range)?
        };
        let mut nanos = whole.checked_mul(scale).ok_or(ConversionError::Range)?;

        // Digits past 18 cannot change the result at nanosecond precision.
        let mut frac: u128 = 0;
        let mut denom: u128 = 1;
        for digit in frac_part.bytes().take(18) {
            frac = frac * 10 + u128::from(digit - b'0');
            denom *= 10;
        }
        nanos += frac * scale / denom;

        total = total.checked_add(nanos).ok_or(ConversionError::Range)?;
    }

    let secs = u64::try_from(total / NANOS_PER_SEC).map_err(|_| ConversionError::Range)?;
    Ok(Duration::new(secs, (total % NANOS_PER_SEC) as u32))
}

/// Render a span the way [`parse`] reads it back: `0s`, `12ns`, `1.5µs`,
/// `300ms`, `1.5s`, `2m0s`, `1h30m0s`.
pub fn format(d: Duration) -> String {
    let nanos = d.as_nanos();
    if nanos == 0 {
        return "0s".to_string();
    }
    if nanos < 1_000 {
        return format!("{nanos}ns");
    }
    if nanos < 1_000_000 {
        return format!("{}µs", with_fraction(nanos, 1_000));
    }
    if nanos < NANOS_PER_SEC {
        return format!("{}ms", with_fraction(nanos, 1_000_000));
    }

    let secs = nanos / NANOS_PER_SEC;
    let hours = secs / 3600;
    let minutes = (secs / 60) % 60;
    let seconds = nanos % (60 * NANOS_PER_SEC);

    let mut out = String::new();
    if hours > 0 {
        out.push_str(&format!("{hours}h"));
    }
    if hours > 0 || minutes > 0 {
        out.push_str(&format!("{minutes}m"));
    }
    out.push_str(&with_fraction(seconds, NANOS_PER_SEC));
    out.push('s');
    out
}

fn with_fraction(value: u128, unit: u128) -> String {
    let whole = value / unit;
    let frac = value % unit;
    if frac == 0 {
        return whole.to_string();
    }
    let width = unit.ilog10() as usize;
    let digits = format!("{frac:0width$}");
    format!("{whole}.{}", digits.trim_end_matches('0'))
}
