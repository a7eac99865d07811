//! Freshness of mysqldump backups in a directory.
//!
//! A dump is complete when its last line reads
//! `-- Dump completed on <date>`; plain `.sql` and gzipped `.gz` dumps
//! are both read.

use std::fs::File;
use std::io::{BufRead, BufReader, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use chrono::NaiveDateTime;
use clap::Parser;
use flate2::read::GzDecoder;
use nagcheck_core::duration::iso8601;
use nagcheck_core::metric_names::METRIC_SIZE;
use nagcheck_core::units::format_size;
use nagcheck_core::{ExitCodes, OutputStyle, PerfDatum, CheckError, StatusReport, Verdict};
use regex::Regex;

use crate::backup::{parse_backup_date, report_date, AgeArgs, Newest};
use crate::checks::borg::compile_include;
use crate::cli::CommonArgs;

static DUMP_COMPLETED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-- Dump completed on (.*)$").expect("valid regex"));

/// Bytes read from the end of a plain dump to find its last line.
const TAIL_BYTES: u64 = 4096;

/// This check exits 2 for WARNING and 3 for CRITICAL.
pub const STYLE: OutputStyle = OutputStyle::ERROR_TOKEN.with_exit_codes(ExitCodes::SHIFTED);

#[derive(Debug, Clone, Parser)]
#[command(
    version,
    about = "check MySQL backups for Nagios with perfdatas for backup size"
)]
pub struct MysqldumpArgs {
    /// mysqldump backup directory
    pub directory: PathBuf,

    /// MySQL database name (regex searched in file names)
    pub database: String,

    #[command(flatten)]
    pub age: AgeArgs,

    #[command(flatten)]
    pub common: CommonArgs,

    /// include regex, matched at the start of file names
    #[arg(long, default_value = ".*")]
    pub include: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DumpFormat {
    Plain,
    Gzip,
}

impl DumpFormat {
    fn detect(file_name: &str) -> Option<Self> {
        if file_name.ends_with(".gz") {
            Some(DumpFormat::Gzip)
        } else if file_name.ends_with(".sql") {
            Some(DumpFormat::Plain)
        } else {
            None
        }
    }
}

/// The newest complete dump found.
#[derive(Debug, Clone, PartialEq)]
pub struct Dump {
    pub path: PathBuf,
    pub date: NaiveDateTime,
    pub size: u64,
}

fn last_line(text: &str) -> Option<&str> {
    text.trim_end_matches(['\n', '\r']).rsplit('\n').next()
}

/// Last line of a plain dump, read from its tail only.
fn plain_last_line(path: &Path) -> std::io::Result<Option<String>> {
    let mut file = File::open(path)?;
    let len = file.metadata()?.len();
    file.seek(SeekFrom::Start(len.saturating_sub(TAIL_BYTES)))?;

    let mut tail = Vec::new();
    file.read_to_end(&mut tail)?;
    let tail = String::from_utf8_lossy(&tail);
    Ok(last_line(&tail).map(str::to_string))
}

/// Last non-empty line of a gzipped dump; the stream is read to its end.
fn gzip_last_line(path: &Path) -> std::io::Result<Option<String>> {
    let reader = BufReader::new(GzDecoder::new(File::open(path)?));
    let mut last = None;
    for line in reader.split(b'\n') {
        let line = line?;
        if !line.is_empty() {
            last = Some(line);
        }
    }
    Ok(last.map(|bytes| String::from_utf8_lossy(&bytes).trim_end().to_string()))
}

/// Completion date written by mysqldump on the last line of a dump.
pub fn completion_date(last_line: &str) -> Option<NaiveDateTime> {
    DUMP_COMPLETED_RE
        .captures(last_line.trim_end())
        .and_then(|caps| parse_backup_date(&caps[1]))
}

/// Scan `directory` for the newest complete dump of `database`.
pub fn find_newest_dump(
    directory: &Path,
    database: &Regex,
    include: &Regex,
) -> Result<Option<Dump>, CheckError> {
    let mut entries: Vec<_> = std::fs::read_dir(directory)
        .map_err(|e| CheckError::from_io(directory, e))?
        .filter_map(Result::ok)
        .collect();
    entries.sort_by_key(|entry| entry.file_name());

    let mut newest = Newest::new();
    for entry in entries {
        let path = entry.path();
        let Ok(metadata) = std::fs::metadata(&path) else {
            continue;
        };
        if !metadata.is_file() {
            continue;
        }
        let file_name = entry.file_name().to_string_lossy().into_owned();

        if metadata.len() == 0 {
            tracing::debug!(file = %path.display(), "Empty file");
            continue;
        }
        if !include.is_match(&file_name) {
            tracing::debug!(file = %file_name, "File excluded");
            continue;
        }
        if !database.is_match(&file_name) {
            tracing::debug!(file = %file_name, "Not configured database");
            continue;
        }
        let Some(format) = DumpFormat::detect(&file_name) else {
            tracing::debug!(file = %file_name, "Not a dump file");
            continue;
        };

        let line = match format {
            DumpFormat::Plain => plain_last_line(&path),
            DumpFormat::Gzip => gzip_last_line(&path),
        };
        let line = match line {
            Ok(line) => line.unwrap_or_default(),
            Err(e) => {
                tracing::warn!(file = %path.display(), error = %e, "Unreadable dump");
                continue;
            }
        };

        match completion_date(&line) {
            Some(date) => {
                tracing::debug!(file = %file_name, size = %format_size(metadata.len() as f64), %date, "dump ok");
                newest.offer(
                    date,
                    Dump {
                        path,
                        date,
                        size: metadata.len(),
                    },
                );
            }
            None => tracing::debug!(file = %path.display(), "ERROR dump"),
        }
    }

    Ok(newest.into_inner().map(|(_, dump)| dump))
}

pub fn evaluate(
    dump: Option<&Dump>,
    threshold: &nagcheck_core::Threshold<chrono::TimeDelta>,
    now: NaiveDateTime,
) -> StatusReport {
    let Some(dump) = dump else {
        return StatusReport::new(Verdict::Unknown, "no MySQL backup found")
            .with_perfdata(PerfDatum::new(METRIC_SIZE, None));
    };

    let age = now - dump.date;
    StatusReport::new(
        threshold.evaluate(&age),
        format!(
            "last backup date: {}, age: {}, size: {}",
            report_date(dump.date),
            iso8601(age),
            format_size(dump.size as f64)
        ),
    )
    .with_perfdata(PerfDatum::new(METRIC_SIZE, Some(dump.size as f64)))
}

pub fn run(args: &MysqldumpArgs, now: NaiveDateTime) -> Result<StatusReport, CheckError> {
    let include = compile_include(&args.include)?;
    let database = Regex::new(&args.database)
        .map_err(|e| CheckError::Config(format!("invalid database regex '{}': {e}", args.database)))?;

    let dump = find_newest_dump(&args.directory, &database, &include)?;
    Ok(evaluate(dump.as_ref(), &args.age.threshold(), now))
}
