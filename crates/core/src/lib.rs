//! Shared evaluation core of the nagcheck monitoring checks.
//!
//! Checks extract measurements from files or command output and hand
//! them to this crate: [`units`] and [`duration`] convert them,
//! [`thresholds`] classifies them into a [`verdict::Verdict`], and
//! [`report`] renders the single status line a plugin prints.

pub mod duration;
pub mod error;
pub mod metric_names;
pub mod report;
pub mod thresholds;
pub mod units;
pub mod verdict;

pub use error::CheckError;
pub use report::{OutputStyle, PerfDatum, StatusReport};
pub use thresholds::{Threshold, ThresholdPair};
pub use verdict::{ExitCodes, Verdict};
