//! Total size of a directory tree against size thresholds.

use std::path::{Path, PathBuf};

use clap::Parser;
use nagcheck_core::metric_names::METRIC_SIZE;
use nagcheck_core::units::{format_size, parse_size_str};
use nagcheck_core::{OutputStyle, PerfDatum, CheckError, StatusReport, Threshold, ThresholdPair};

use crate::cli::CommonArgs;

/// `OK-size: ...`, `CRITICAL-size: ...`; errors print `CRITICAL: ...`.
pub const STYLE: OutputStyle = OutputStyle::CRITICAL_TOKEN.with_separator("-");

#[derive(Debug, Clone, Parser)]
#[command(version, about = "check directory size for Nagios with perfdatas")]
pub struct DirectoryArgs {
    /// directory to check
    pub directory: PathBuf,

    /// define critical size (k,m,g,t)
    #[arg(long, default_value = "750m")]
    pub critical: String,

    /// define warning size (k,m,g,t)
    #[arg(long, default_value = "1g")]
    pub warning: String,

    #[command(flatten)]
    pub common: CommonArgs,
}

impl DirectoryArgs {
    pub fn threshold(&self) -> Result<Threshold<f64>, CheckError> {
        Ok(Threshold::Above(ThresholdPair::new(
            parse_size_str(&self.warning)?,
            parse_size_str(&self.critical)?,
        )))
    }
}

/// Sum of the sizes of all regular files below `root`.
///
/// Symbolic links are neither followed nor counted. Unreadable
/// subdirectories are skipped; an unreadable root is an error.
pub fn tree_size(root: &Path) -> Result<u64, CheckError> {
    let mut total = 0;
    let mut pending = vec![root.to_path_buf()];

    while let Some(dir) = pending.pop() {
        let entries = match std::fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if dir == root => return Err(CheckError::from_io(root, e)),
            Err(e) => {
                tracing::warn!(dir = %dir.display(), error = %e, "Skipping unreadable directory");
                continue;
            }
        };

        for entry in entries.filter_map(Result::ok) {
            let Ok(file_type) = entry.file_type() else {
                continue;
            };
            if file_type.is_symlink() {
                continue;
            }
            if file_type.is_dir() {
                pending.push(entry.path());
            } else if let Ok(metadata) = entry.metadata() {
                total += metadata.len();
            }
        }
    }

    Ok(total)
}

pub fn evaluate(size: u64, threshold: &Threshold<f64>) -> StatusReport {
    let bytes = size as f64;
    StatusReport::new(
        threshold.evaluate(&bytes),
        format!("size: {}", format_size(bytes)),
    )
    .with_perfdata(
        PerfDatum::new(METRIC_SIZE, Some(bytes))
            .with_unit("B")
            .with_thresholds(*threshold.reported_pair()),
    )
}

pub fn run(args: &DirectoryArgs) -> Result<StatusReport, CheckError> {
    let threshold = args.threshold()?;
    let size = tree_size(&args.directory)?;
    tracing::debug!(directory = %args.directory.display(), size, "directory size");
    Ok(evaluate(size, &threshold))
}
