//! Freshness and size of the newest archive in a Borg repository.
//!
//! Runs `borg list <repository>` to find the newest archive (optionally
//! filtered by an include pattern) and, with `--info`, `borg info` on
//! that archive for its original/compressed/deduplicated sizes.

use std::sync::LazyLock;

use chrono::{NaiveDateTime, Timelike};
use clap::Parser;
use nagcheck_core::duration::iso8601;
use nagcheck_core::metric_names::{
    METRIC_COMPRESSED_SIZE, METRIC_DEDUPLICATED_SIZE, METRIC_ORIGINAL_SIZE,
};
use nagcheck_core::units::{format_size, parse_size};
use nagcheck_core::{OutputStyle, PerfDatum, CheckError, StatusReport, Verdict};
use regex::Regex;

use crate::backup::{parse_backup_date, report_date, AgeArgs, Newest};
use crate::cli::{CommandArgs, CommonArgs};
use crate::command::ExternalCommand;

/// One archive line of `borg list`: name, free text, then `, <date>`.
/// Newer borg versions append the archive id in brackets.
static ARCHIVE_LINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\S*)\s*.*, (\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2})(?:\s+\[[0-9a-f]+\])?\s*$")
        .expect("valid regex")
});

static ARCHIVE_SIZES_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"This archive:\s*(\S+)\s+(\S+)\s+(\S+)\s+(\S+)\s+(\S+)\s+(\S+)")
        .expect("valid regex")
});

static REPOSITORY_SIZES_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"All archives:\s*(\S+)\s+(\S+)\s+(\S+)\s+(\S+)\s+(\S+)\s+(\S+)")
        .expect("valid regex")
});

/// Last hour (exclusive) of a lock window opened with `--mintime` only.
const END_OF_DAY_HOUR: u32 = 24;

#[derive(Debug, Clone, Parser)]
#[command(
    version,
    about = "check Borg backups for Nagios with perfdatas for size"
)]
pub struct BorgArgs {
    /// Borg backup repository
    pub repository: String,

    #[command(flatten)]
    pub age: AgeArgs,

    #[command(flatten)]
    pub common: CommonArgs,

    #[command(flatten)]
    pub command: CommandArgs,

    /// details backup flag (runs `borg info` on the newest archive)
    #[arg(long)]
    pub info: bool,

    /// global repository instead of archive volume flag
    #[arg(long)]
    pub globalsize: bool,

    /// status in perfdata flag
    #[arg(long)]
    pub status: bool,

    /// include regex, matched at the start of each `borg list` line
    #[arg(long, default_value = ".*")]
    pub include: String,

    /// setting home directory for sudo calls
    #[arg(long)]
    pub home: Option<String>,

    /// first hour of the daily borg lock window (check skipped inside)
    #[arg(long)]
    pub mintime: Option<u32>,

    /// end hour (exclusive) of the daily borg lock window
    #[arg(long)]
    pub maxtime: Option<u32>,

    /// borg executable
    #[arg(long, default_value = "borg", env = "BORG_COMMAND")]
    pub borg: String,
}

impl BorgArgs {
    pub fn style(&self) -> OutputStyle {
        OutputStyle::ERROR_TOKEN.with_status_perfdata(self.status)
    }

    /// Whether `hour` falls inside the configured lock window.
    fn in_lock_window(&self, hour: u32) -> bool {
        match self.mintime {
            // Hour 0 leaves the window closed.
            Some(min) if min > 0 => {
                (min..self.maxtime.unwrap_or(END_OF_DAY_HOUR)).contains(&hour)
            }
            _ => false,
        }
    }

    fn borg_command(&self) -> ExternalCommand {
        let cmd = ExternalCommand::new(&self.borg).timeout(self.command.timeout());
        match &self.home {
            Some(home) => cmd.env("HOME", home),
            None => cmd,
        }
    }
}

/// An archive from `borg list`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Archive {
    pub name: String,
    pub date: NaiveDateTime,
}

/// Which `borg` statistics line to read sizes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeScope {
    /// `This archive:` line.
    Archive,
    /// `All archives:` line.
    Repository,
}

impl SizeScope {
    fn regex(self) -> &'static Regex {
        match self {
            SizeScope::Archive => &ARCHIVE_SIZES_RE,
            SizeScope::Repository => &REPOSITORY_SIZES_RE,
        }
    }

    fn label(self) -> &'static str {
        match self {
            SizeScope::Archive => "archive sizes",
            SizeScope::Repository => "global sizes",
        }
    }
}

/// Original, compressed and deduplicated sizes in bytes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArchiveSizes {
    pub original: f64,
    pub compressed: f64,
    pub deduplicated: f64,
}

impl ArchiveSizes {
    pub fn summary(&self) -> String {
        format!(
            "osize: {} csize: {} dsize: {}",
            format_size(self.original),
            format_size(self.compressed),
            format_size(self.deduplicated)
        )
    }
}

/// Extract the sizes of `scope` from borg statistics output.
pub fn parse_sizes(text: &str, scope: SizeScope) -> Result<ArchiveSizes, CheckError> {
    let caps = scope
        .regex()
        .captures(text)
        .ok_or_else(|| CheckError::ParseFailure(format!("{} not found", scope.label())))?;

    Ok(ArchiveSizes {
        original: parse_size(&caps[1], &caps[2])?,
        compressed: parse_size(&caps[3], &caps[4])?,
        deduplicated: parse_size(&caps[5], &caps[6])?,
    })
}

/// Size perfdata for `sizes` under `labels`, `U` values when absent.
pub fn size_perfdata(sizes: Option<&ArchiveSizes>, labels: [&str; 3]) -> [PerfDatum; 3] {
    let [original, compressed, deduplicated] = labels;
    [
        PerfDatum::new(original, sizes.map(|s| s.original)),
        PerfDatum::new(compressed, sizes.map(|s| s.compressed)),
        PerfDatum::new(deduplicated, sizes.map(|s| s.deduplicated)),
    ]
}

/// Newest archive of a `borg list` listing whose line matches `include`.
pub fn newest_archive(listing: &str, include: &Regex) -> Option<Archive> {
    let mut newest = Newest::new();

    for line in listing.lines() {
        if !include.is_match(line) {
            tracing::debug!(line, "backup excluded");
            continue;
        }
        let Some(caps) = ARCHIVE_LINE_RE.captures(line) else {
            continue;
        };
        let Some(date) = parse_backup_date(&caps[2]) else {
            tracing::debug!(line, "unparseable backup date");
            continue;
        };

        let name = caps[1].to_string();
        tracing::debug!(backup = %name, "getting informations for backup");
        if !newest.offer(date, name.clone()) {
            tracing::debug!(backup = %name, "not newest backup");
        }
    }

    newest.into_inner().map(|(date, name)| Archive { name, date })
}

/// Compile an include pattern so that it must match at the line start.
pub fn compile_include(pattern: &str) -> Result<Regex, CheckError> {
    Regex::new(&format!("^(?:{pattern})"))
        .map_err(|e| CheckError::Config(format!("invalid include regex '{pattern}': {e}")))
}

/// Status report for an archive of age `now - archive.date`.
pub fn evaluate(
    archive: &Archive,
    sizes: Option<Result<ArchiveSizes, CheckError>>,
    args: &BorgArgs,
    now: NaiveDateTime,
) -> StatusReport {
    let age = now - archive.date;
    let mut summary = format!(
        "{} last backup date: {}, age: {}",
        archive.name,
        report_date(archive.date),
        iso8601(age)
    );
    let mut report = StatusReport::new(args.age.threshold().evaluate(&age), String::new());

    if let Some(sizes) = sizes {
        let sizes = match sizes {
            Ok(sizes) => {
                summary.push_str(&format!(", {}", sizes.summary()));
                Some(sizes)
            }
            Err(e) => {
                tracing::warn!(backup = %archive.name, error = %e, "No size information");
                summary.push_str(&format!(", {e}"));
                report.escalate(Verdict::Unknown);
                None
            }
        };
        report.perfdata.extend(size_perfdata(
            sizes.as_ref(),
            [
                METRIC_ORIGINAL_SIZE,
                METRIC_COMPRESSED_SIZE,
                METRIC_DEDUPLICATED_SIZE,
            ],
        ));
    }

    report.summary = summary;
    report
}

pub async fn run(args: &BorgArgs, now: NaiveDateTime) -> Result<StatusReport, CheckError> {
    if args.in_lock_window(now.hour()) {
        tracing::info!(hour = now.hour(), "Inside borg lock window, skipping check");
        return Ok(StatusReport::new(
            Verdict::Ok,
            format!("{} inside borg lock window, check skipped", args.repository),
        ));
    }

    let include = compile_include(&args.include)?;
    let listing = args
        .borg_command()
        .args(["list", args.repository.as_str()])
        .stdout()
        .await?;

    let Some(archive) = newest_archive(&listing, &include) else {
        return Ok(StatusReport::new(
            Verdict::Unknown,
            format!("{}: no matching backup found", args.repository),
        ));
    };

    let sizes = if args.info {
        let scope = if args.globalsize {
            SizeScope::Repository
        } else {
            SizeScope::Archive
        };
        let info = args
            .borg_command()
            .arg("info")
            .arg(format!("{}::{}", args.repository, archive.name))
            .stdout()
            .await?;
        Some(parse_sizes(&info, scope))
    } else {
        None
    };

    Ok(evaluate(&archive, sizes, args, now))
}
