//! ISO-8601 rendering of ages and elapsed times.

use chrono::TimeDelta;

const MICROS_PER_SECOND: i128 = 1_000_000;
const MICROS_PER_MINUTE: i128 = 60 * MICROS_PER_SECOND;
const MICROS_PER_HOUR: i128 = 60 * MICROS_PER_MINUTE;
const MICROS_PER_DAY: i128 = 24 * MICROS_PER_HOUR;

/// Format a duration as `P[nD]T[HHH][MMM]SS[.ffffff]S`.
///
/// Seconds are always present. Hours and minutes only appear once a
/// larger unit is non-zero (or they are themselves non-zero).
///
/// ```
/// use chrono::TimeDelta;
/// use nagcheck_core::duration::iso8601;
///
/// assert_eq!(iso8601(TimeDelta::seconds(5)), "PT05S");
/// assert_eq!(iso8601(TimeDelta::hours(26)), "P1DT02H00M00S");
/// ```
pub fn iso8601(value: TimeDelta) -> String {
    let total = total_micros(value);
    if total < 0 {
        return format!("-{}", render(-total));
    }
    render(total)
}

/// Microseconds in `value`, rounded to the nearest microsecond.
fn total_micros(value: TimeDelta) -> i128 {
    let secs = i128::from(value.num_seconds());
    let nanos = i128::from(value.subsec_nanos());
    let rounded = if nanos >= 0 {
        (nanos + 500) / 1000
    } else {
        (nanos - 500) / 1000
    };
    secs * MICROS_PER_SECOND + rounded
}

fn render(micros: i128) -> String {
    let days = micros / MICROS_PER_DAY;
    let hours = (micros % MICROS_PER_DAY) / MICROS_PER_HOUR;
    let minutes = (micros % MICROS_PER_HOUR) / MICROS_PER_MINUTE;
    let second_micros = micros % MICROS_PER_MINUTE;

    let mut out = String::from("P");
    if days != 0 {
        out.push_str(&format!("{days}D"));
    }

    out.push('T');
    let mut bigger_exists = days != 0 || hours != 0;
    if bigger_exists {
        out.push_str(&format!("{hours:02}H"));
    }
    bigger_exists = bigger_exists || minutes != 0;
    if bigger_exists {
        out.push_str(&format!("{minutes:02}M"));
    }

    let whole = second_micros / MICROS_PER_SECOND;
    let fraction = second_micros % MICROS_PER_SECOND;
    if fraction == 0 {
        out.push_str(&format!("{whole:02}S"));
    } else {
        let digits = format!("{fraction:06}");
        out.push_str(&format!("{whole:02}.{}S", digits.trim_end_matches('0')));
    }
    out
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn zero_is_zero_seconds() {
        assert_eq!(iso8601(TimeDelta::zero()), "PT00S");
    }

    #[test]
    fn whole_seconds_keep_trailing_zero() {
        assert_eq!(iso8601(TimeDelta::seconds(10)), "PT10S");
        assert_eq!(iso8601(TimeDelta::seconds(30)), "PT30S");
    }

    #[test]
    fn minutes_without_hours() {
        assert_eq!(iso8601(TimeDelta::seconds(65)), "PT01M05S");
    }

    #[test]
    fn hours_force_minutes() {
        assert_eq!(iso8601(TimeDelta::hours(1)), "PT01H00M00S");
        assert_eq!(iso8601(TimeDelta::seconds(3600 + 7)), "PT01H00M07S");
    }

    #[test]
    fn days_force_everything_below() {
        assert_eq!(iso8601(TimeDelta::days(2)), "P2DT00H00M00S");
        assert_eq!(
            iso8601(TimeDelta::days(3) + TimeDelta::minutes(4)),
            "P3DT00H04M00S"
        );
    }

    #[test]
    fn fractional_seconds_are_trimmed() {
        assert_eq!(iso8601(TimeDelta::milliseconds(5500)), "PT05.5S");
        assert_eq!(iso8601(TimeDelta::microseconds(1_000_001)), "PT01.000001S");
        assert_eq!(iso8601(TimeDelta::nanoseconds(1_250_000_400)), "PT01.25S");
    }

    #[test]
    fn negative_durations_are_prefixed() {
        assert_eq!(iso8601(TimeDelta::seconds(-90)), "-PT01M30S");
    }

    proptest! {
        #[test]
        fn always_ends_with_seconds(secs in 0i64..10_000_000, micros in 0i64..1_000_000) {
            let value = TimeDelta::seconds(secs) + TimeDelta::microseconds(micros);
            let text = iso8601(value);
            prop_assert!(text.starts_with('P'));
            prop_assert!(text.ends_with('S'));
            prop_assert!(text.contains('T'));
        }

        #[test]
        fn never_leads_with_zero_unit(secs in 0i64..10_000_000) {
            let text = iso8601(TimeDelta::seconds(secs));
            prop_assert!(!text.starts_with("P0D"));
            prop_assert!(!text.starts_with("PT00H"));
            if secs >= 60 {
                prop_assert!(!text.starts_with("PT00M"));
            }
        }
    }
}
