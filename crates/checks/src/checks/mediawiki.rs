//! Freshness and volume of a MediaWiki page export (`*.wikitext` files).

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use chrono::{DateTime, Local, NaiveDateTime};
use clap::Parser;
use nagcheck_core::duration::iso8601;
use nagcheck_core::metric_names::{METRIC_PAGES, METRIC_SIZE};
use nagcheck_core::units::format_size;
use nagcheck_core::{OutputStyle, PerfDatum, CheckError, StatusReport, Threshold, Verdict};

use crate::backup::{report_date, AgeArgs, Newest};
use crate::cli::CommonArgs;

const PAGE_EXTENSION: &str = ".wikitext";

#[derive(Debug, Clone, Parser)]
#[command(
    version,
    about = "check MediaWiki exports for Nagios with perfdatas for size"
)]
pub struct MediawikiArgs {
    /// MediaWiki export directory
    pub directory: PathBuf,

    #[command(flatten)]
    pub age: AgeArgs,

    #[command(flatten)]
    pub common: CommonArgs,

    /// status in perfdata flag
    #[arg(long)]
    pub status: bool,
}

impl MediawikiArgs {
    pub fn style(&self) -> OutputStyle {
        OutputStyle::ERROR_TOKEN.with_status_perfdata(self.status)
    }
}

/// Totals of an export directory.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExportSummary {
    pub pages: u64,
    pub size: u64,
    /// Modification time of the most recently written page.
    pub last_export: Option<NaiveDateTime>,
}

fn local_time(time: SystemTime) -> NaiveDateTime {
    DateTime::<Local>::from(time).naive_local()
}

/// Count non-empty page files directly inside `directory`.
pub fn scan_export(directory: &Path) -> Result<ExportSummary, CheckError> {
    let entries = std::fs::read_dir(directory).map_err(|e| CheckError::from_io(directory, e))?;

    let mut summary = ExportSummary::default();
    let mut newest = Newest::new();

    for entry in entries.filter_map(Result::ok) {
        let path = entry.path();
        let Ok(metadata) = std::fs::metadata(&path) else {
            continue;
        };
        if !metadata.is_file() {
            continue;
        }
        if metadata.len() == 0 {
            tracing::debug!(file = %path.display(), "Empty file");
            continue;
        }
        if !entry.file_name().to_string_lossy().ends_with(PAGE_EXTENSION) {
            continue;
        }

        summary.pages += 1;
        summary.size += metadata.len();

        match metadata.modified() {
            Ok(modified) => {
                newest.offer(local_time(modified), ());
            }
            Err(e) => tracing::warn!(file = %path.display(), error = %e, "No modification time"),
        }
        tracing::debug!(file = %path.display(), size = metadata.len(), "Wikitext page file detected");
    }

    summary.last_export = newest.into_inner().map(|(date, ())| date);
    Ok(summary)
}

pub fn evaluate(
    directory: &Path,
    export: &ExportSummary,
    threshold: &Threshold<chrono::TimeDelta>,
    now: NaiveDateTime,
) -> StatusReport {
    let perfdata = [
        PerfDatum::new(METRIC_SIZE, Some(export.size as f64)),
        PerfDatum::new(METRIC_PAGES, Some(export.pages as f64)),
    ];

    let mut report = match export.last_export {
        Some(last) => {
            let age = now - last;
            StatusReport::new(
                threshold.evaluate(&age),
                format!(
                    "{} last export date: {}, age: {}, size: {}, pages: {}",
                    directory.display(),
                    report_date(last),
                    iso8601(age),
                    format_size(export.size as f64),
                    export.pages
                ),
            )
        }
        None => StatusReport::new(
            Verdict::Unknown,
            format!("{}: no MediaWiki export found", directory.display()),
        ),
    };
    report.perfdata.extend(perfdata);
    report
}

pub fn run(args: &MediawikiArgs, now: NaiveDateTime) -> Result<StatusReport, CheckError> {
    let export = scan_export(&args.directory)?;
    Ok(evaluate(&args.directory, &export, &args.age.threshold(), now))
}

#[cfg(test)]
mod tests {
    use crate::backup::parse_backup_date;

    use super::*;

    fn at(text: &str) -> NaiveDateTime {
        parse_backup_date(text).expect("valid date")
    }

    #[test]
    fn fresh_export_is_ok() {
        let export = ExportSummary {
            pages: 3,
            size: 3 * 1024,
            last_export: Some(at("2024-03-02 01:00:00")),
        };
        let args = MediawikiArgs {
            directory: PathBuf::from("/srv/wiki-export"),
            age: AgeArgs::default(),
            common: CommonArgs::default(),
            status: true,
        };
        let report = evaluate(
            &args.directory,
            &export,
            &args.age.threshold(),
            at("2024-03-02 01:30:00"),
        );
        assert_eq!(
            report.render(&args.style()),
            "OK /srv/wiki-export last export date: 2024-03-02T01:00:00, age: PT30M00S, \
             size: 3.0KiB, pages: 3 | size=3072 pages=3 status=0"
        );
    }

    #[test]
    fn empty_export_is_unknown() {
        let report = evaluate(
            Path::new("/srv/wiki-export"),
            &ExportSummary::default(),
            &AgeArgs::default().threshold(),
            at("2024-03-02 01:30:00"),
        );
        assert_eq!(report.verdict, Verdict::Unknown);
        assert_eq!(
            report.render(&OutputStyle::ERROR_TOKEN),
            "ERROR /srv/wiki-export: no MediaWiki export found | size=0 pages=0"
        );
    }
}
