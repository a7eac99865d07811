//! Freshness and sizes of the last `borg create --stats` run, read from
//! its log file.

use std::path::PathBuf;
use std::sync::LazyLock;

use chrono::NaiveDateTime;
use clap::Parser;
use nagcheck_core::duration::iso8601;
use nagcheck_core::metric_names::{
    METRIC_COMPRESSED_SIZE, METRIC_DEDUPLICATED_SIZE, METRIC_GLOBAL_COMPRESSED_SIZE,
    METRIC_GLOBAL_DEDUPLICATED_SIZE, METRIC_GLOBAL_ORIGINAL_SIZE, METRIC_ORIGINAL_SIZE,
};
use nagcheck_core::{OutputStyle, CheckError, StatusReport, Threshold, Verdict};
use regex::Regex;

use crate::backup::{parse_backup_date, AgeArgs};
use crate::checks::borg::{parse_sizes, size_perfdata, ArchiveSizes, SizeScope};
use crate::cli::CommonArgs;

static NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Archive name: (.*)").expect("valid regex"));

static START_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Time\s\(start\):\s*(\S*)\s*.*, (\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2})")
        .expect("valid regex")
});

static END_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Time\s\(end\):\s*(\S*)\s*.*, (\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2})")
        .expect("valid regex")
});

pub const STYLE: OutputStyle = OutputStyle::CRITICAL_TOKEN;

#[derive(Debug, Clone, Parser)]
#[command(
    version,
    about = "check Borg backups logs for Nagios with perfdatas for size"
)]
pub struct BorgLogArgs {
    /// Borg log file
    pub borglogfile: PathBuf,

    #[command(flatten)]
    pub age: AgeArgs,

    #[command(flatten)]
    pub common: CommonArgs,
}

/// Facts extracted from a borg log; `None` when the line is missing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BorgLogFacts {
    pub name: Option<String>,
    pub start: Option<NaiveDateTime>,
    pub end: Option<NaiveDateTime>,
    pub archive: Option<ArchiveSizes>,
    pub repository: Option<ArchiveSizes>,
}

fn find_date(re: &Regex, text: &str) -> Option<NaiveDateTime> {
    re.captures(text).and_then(|caps| parse_backup_date(&caps[2]))
}

fn find_sizes(text: &str, scope: SizeScope) -> Option<ArchiveSizes> {
    match parse_sizes(text, scope) {
        Ok(sizes) => {
            tracing::debug!(?scope, original = sizes.original, "sizes found");
            Some(sizes)
        }
        Err(e) => {
            tracing::debug!(?scope, error = %e, "sizes not found");
            None
        }
    }
}

pub fn parse_log(text: &str) -> BorgLogFacts {
    let facts = BorgLogFacts {
        name: NAME_RE
            .captures(text)
            .map(|caps| caps[1].trim_end().to_string()),
        start: find_date(&START_RE, text),
        end: find_date(&END_RE, text),
        archive: find_sizes(text, SizeScope::Archive),
        repository: find_sizes(text, SizeScope::Repository),
    };
    tracing::debug!(name = ?facts.name, start = ?facts.start, end = ?facts.end, "parsed borg log");
    facts
}

/// Classify the facts: the age of the end date decides unless any fact
/// is missing, which makes the whole report unknown.
pub fn evaluate(
    facts: &BorgLogFacts,
    threshold: &Threshold<chrono::TimeDelta>,
    now: NaiveDateTime,
) -> StatusReport {
    let age = facts.end.map(|end| now - end);

    let missing: Vec<&str> = [
        ("archive name", facts.name.is_none()),
        ("start date", facts.start.is_none()),
        ("end date", facts.end.is_none()),
        ("archive sizes", facts.archive.is_none()),
        ("global sizes", facts.repository.is_none()),
    ]
    .into_iter()
    .filter_map(|(what, absent)| absent.then_some(what))
    .collect();

    let mut parts = vec![facts
        .name
        .clone()
        .unwrap_or_else(|| "archive name not found".to_string())];
    if let Some(age) = age {
        parts.push(format!("age: {}", iso8601(age)));
    }
    if let (Some(start), Some(end)) = (facts.start, facts.end) {
        parts.push(format!("duration: {}", iso8601(end - start)));
    }
    if !missing.is_empty() {
        parts.push(format!("missing: {}", missing.join(", ")));
    }

    let mut report = StatusReport::new(threshold.evaluate_opt(age.as_ref()), parts.join(", "));
    if !missing.is_empty() {
        report.escalate(Verdict::Unknown);
    }

    report.perfdata.extend(size_perfdata(
        facts.archive.as_ref(),
        [
            METRIC_ORIGINAL_SIZE,
            METRIC_COMPRESSED_SIZE,
            METRIC_DEDUPLICATED_SIZE,
        ],
    ));
    report.perfdata.extend(size_perfdata(
        facts.repository.as_ref(),
        [
            METRIC_GLOBAL_ORIGINAL_SIZE,
            METRIC_GLOBAL_COMPRESSED_SIZE,
            METRIC_GLOBAL_DEDUPLICATED_SIZE,
        ],
    ));
    report
}

pub fn run(args: &BorgLogArgs, now: NaiveDateTime) -> Result<StatusReport, CheckError> {
    let text = std::fs::read_to_string(&args.borglogfile)
        .map_err(|e| CheckError::from_io(&args.borglogfile, e))?;
    Ok(evaluate(&parse_log(&text), &args.age.threshold(), now))
}
