//! Byte-size conversion between human-readable text and canonical bytes.
//!
//! Every unit is 1024-based, including the decimal-looking `kB`/`MB`
//! suffixes printed by backup tools.

/// Binary prefixes tried in order by [`format_size`]; `Yi` is the fallback.
const BINARY_PREFIXES: [&str; 8] = ["", "Ki", "Mi", "Gi", "Ti", "Pi", "Ei", "Zi"];

const STEP: f64 = 1024.0;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UnitError {
    #[error("unknown size unit '{0}'")]
    UnknownUnit(String),

    #[error("invalid size magnitude '{0}'")]
    InvalidNumber(String),
}

/// Power of 1024 for a unit suffix, `None` when the suffix is unknown.
fn unit_exponent(unit: &str) -> Option<i32> {
    let exponent = match unit {
        "" | "B" => 0,
        "k" | "K" | "kB" | "KB" | "Ki" | "KiB" => 1,
        "m" | "M" | "MB" | "Mi" | "MiB" => 2,
        "g" | "G" | "GB" | "Gi" | "GiB" => 3,
        "t" | "T" | "TB" | "Ti" | "TiB" => 4,
        "p" | "P" | "PB" | "Pi" | "PiB" => 5,
        "EB" | "Ei" | "EiB" => 6,
        "ZB" | "Zi" | "ZiB" => 7,
        "YB" | "Yi" | "YiB" => 8,
        _ => return None,
    };
    Some(exponent)
}

/// Convert a magnitude and unit suffix into a byte count.
///
/// ```
/// use nagcheck_core::units::parse_size;
///
/// assert_eq!(parse_size("1.5", "kB").unwrap(), 1536.0);
/// assert_eq!(parse_size("2", "g").unwrap(), 2.0 * 1024.0 * 1024.0 * 1024.0);
/// assert!(parse_size("1", "furlong").is_err());
/// ```
pub fn parse_size(value: &str, unit: &str) -> Result<f64, UnitError> {
    let magnitude: f64 = value
        .trim()
        .parse()
        .ok()
        .filter(|v: &f64| v.is_finite())
        .ok_or_else(|| UnitError::InvalidNumber(value.to_string()))?;

    let exponent =
        unit_exponent(unit.trim()).ok_or_else(|| UnitError::UnknownUnit(unit.to_string()))?;

    Ok(magnitude * STEP.powi(exponent))
}

/// Parse a compact size such as `750m`, `1g` or `10.5MiB`.
pub fn parse_size_str(text: &str) -> Result<f64, UnitError> {
    let text = text.trim();
    let split = text
        .find(|c: char| !(c.is_ascii_digit() || matches!(c, '.' | '-' | '+')))
        .unwrap_or(text.len());
    let (value, unit) = text.split_at(split);
    parse_size(value, unit)
}

/// Render a byte count with binary scaling, e.g. `10.5MiB`.
///
/// The prefix is chosen from the one-decimal value that is actually
/// printed, so a value never shows up as `1024.0` of a smaller prefix.
pub fn format_size(bytes: f64) -> String {
    let mut num = bytes;
    for prefix in BINARY_PREFIXES {
        if printed_tenths(num).abs() < STEP {
            return format!("{num:3.1}{prefix}B");
        }
        num /= STEP;
    }
    format!("{num:.1}YiB")
}

fn printed_tenths(num: f64) -> f64 {
    format!("{num:.1}").parse().unwrap_or(num)
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use proptest::prelude::*;

    use super::*;

    const MIB: f64 = 1024.0 * 1024.0;

    #[test]
    fn backup_tool_units_are_binary() {
        assert_eq!(parse_size("10.5", "MB").unwrap(), 10.5 * MIB);
        assert_eq!(parse_size("1", "kB").unwrap(), 1024.0);
        assert_eq!(parse_size("1", "TB").unwrap(), 1024.0 * 1024.0 * MIB);
        assert_eq!(parse_size("552", "B").unwrap(), 552.0);
    }

    #[test]
    fn compact_thresholds() {
        assert_eq!(parse_size_str("750m").unwrap(), 750.0 * MIB);
        assert_eq!(parse_size_str("1g").unwrap(), 1024.0 * MIB);
        assert_eq!(parse_size_str("4096").unwrap(), 4096.0);
        assert_eq!(parse_size_str(" 2.5 t ").unwrap(), 2.5 * MIB * MIB);
    }

    #[test]
    fn unknown_suffix_is_an_error() {
        assert_matches!(parse_size("3", "XB"), Err(UnitError::UnknownUnit(u)) if u == "XB");
        assert_matches!(parse_size_str("12q"), Err(UnitError::UnknownUnit(_)));
    }

    #[test]
    fn bad_magnitude_is_an_error() {
        assert_matches!(parse_size("abc", "MB"), Err(UnitError::InvalidNumber(_)));
        assert_matches!(parse_size("inf", "MB"), Err(UnitError::InvalidNumber(_)));
        assert_matches!(parse_size_str("m"), Err(UnitError::InvalidNumber(_)));
    }

    #[test]
    fn formats_with_binary_prefixes() {
        assert_eq!(format_size(0.0), "0.0B");
        assert_eq!(format_size(512.0), "512.0B");
        assert_eq!(format_size(1536.0), "1.5KiB");
        assert_eq!(format_size(10.5 * MIB), "10.5MiB");
        assert_eq!(format_size(2.0 * 1024.0 * MIB), "2.0GiB");
    }

    #[test]
    fn rounding_up_to_1024_moves_to_next_prefix() {
        assert_eq!(format_size(1023.97 * 1024.0), "1.0MiB");
    }

    #[test]
    fn falls_back_to_yobibytes() {
        let huge = 2048.0 * STEP.powi(8);
        assert_eq!(format_size(huge), "2048.0YiB");
    }

    #[test]
    fn formatted_sizes_parse_back() {
        assert_eq!(parse_size_str("10.5MiB").unwrap(), 10.5 * MIB);
        assert_eq!(parse_size_str("512.0B").unwrap(), 512.0);
    }

    proptest! {
        #[test]
        fn format_parse_format_is_stable(n in any::<u64>()) {
            let first = format_size(n as f64);
            let reparsed = parse_size_str(&first).unwrap();
            prop_assert_eq!(format_size(reparsed), first);
        }
    }
}
