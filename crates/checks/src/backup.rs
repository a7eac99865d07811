//! Backup freshness helpers shared by the backup checks.

use chrono::{NaiveDateTime, TimeDelta};
use clap::Args;
use nagcheck_core::{Threshold, ThresholdPair};

/// Timestamp layout used by borg and mysqldump output.
pub const BACKUP_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Output layout for backup dates in status lines.
pub const REPORT_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

pub const DEFAULT_DELAY_CRITICAL_HOURS: u32 = 48;
pub const DEFAULT_DELAY_WARNING_HOURS: u32 = 24;

#[derive(Debug, Clone, Args)]
pub struct AgeArgs {
    /// define delay hours for critical
    #[arg(long, default_value_t = DEFAULT_DELAY_CRITICAL_HOURS)]
    pub delayc: u32,

    /// define delay hours for warning
    #[arg(long, default_value_t = DEFAULT_DELAY_WARNING_HOURS)]
    pub delayw: u32,
}

impl AgeArgs {
    pub fn threshold(&self) -> Threshold<TimeDelta> {
        Threshold::Above(ThresholdPair::new(
            TimeDelta::hours(i64::from(self.delayw)),
            TimeDelta::hours(i64::from(self.delayc)),
        ))
    }
}

impl Default for AgeArgs {
    fn default() -> Self {
        Self {
            delayc: DEFAULT_DELAY_CRITICAL_HOURS,
            delayw: DEFAULT_DELAY_WARNING_HOURS,
        }
    }
}

/// Parse a `YYYY-MM-DD HH:MM:SS` timestamp.
///
/// Runs of whitespace are collapsed first: mysqldump pads single-digit
/// hours with a space.
pub fn parse_backup_date(text: &str) -> Option<NaiveDateTime> {
    let normalized = text.split_whitespace().collect::<Vec<_>>().join(" ");
    NaiveDateTime::parse_from_str(&normalized, BACKUP_DATE_FORMAT).ok()
}

pub fn report_date(date: NaiveDateTime) -> String {
    date.format(REPORT_DATE_FORMAT).to_string()
}

/// Keeps the most recent of a series of dated candidates.
///
/// Ties keep the first candidate offered.
#[derive(Debug, Clone)]
pub struct Newest<T> {
    best: Option<(NaiveDateTime, T)>,
}

impl<T> Default for Newest<T> {
    fn default() -> Self {
        Self { best: None }
    }
}

impl<T> Newest<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Offer a candidate; returns `true` when it became the newest.
    pub fn offer(&mut self, date: NaiveDateTime, item: T) -> bool {
        let newer = match &self.best {
            Some((best, _)) => date > *best,
            None => true,
        };
        if newer {
            self.best = Some((date, item));
        }
        newer
    }

    pub fn into_inner(self) -> Option<(NaiveDateTime, T)> {
        self.best
    }
}

#[cfg(test)]
mod tests {
    use nagcheck_core::Verdict;

    use super::*;

    fn date(text: &str) -> NaiveDateTime {
        parse_backup_date(text).expect("valid date")
    }

    #[test]
    fn parses_padded_hours() {
        assert_eq!(date("2017-03-01  3:00:01"), date("2017-03-01 03:00:01"));
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_backup_date("yesterday").is_none());
        assert!(parse_backup_date("2017-13-01 03:00:01").is_none());
    }

    #[test]
    fn report_date_is_iso() {
        assert_eq!(report_date(date("2017-03-01 03:00:01")), "2017-03-01T03:00:01");
    }

    #[test]
    fn newest_wins_and_ties_keep_first() {
        let mut newest = Newest::new();
        assert!(newest.offer(date("2024-01-01 00:00:00"), "a"));
        assert!(newest.offer(date("2024-01-03 00:00:00"), "c"));
        assert!(!newest.offer(date("2024-01-02 00:00:00"), "b"));
        assert!(!newest.offer(date("2024-01-03 00:00:00"), "d"));
        assert_eq!(newest.into_inner().map(|(_, item)| item), Some("c"));
    }

    #[test]
    fn default_delays() {
        let threshold = AgeArgs::default().threshold();
        assert_eq!(threshold.evaluate(&TimeDelta::hours(1)), Verdict::Ok);
        assert_eq!(threshold.evaluate(&TimeDelta::hours(25)), Verdict::Warning);
        assert_eq!(threshold.evaluate(&TimeDelta::hours(49)), Verdict::Critical);
    }
}
