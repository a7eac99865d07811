//! Status line and performance-data rendering.
//!
//! A check prints exactly one line:
//! `<TOKEN><sep><summary> | label=value[unit][;warn;crit] ...`

use std::fmt;

use crate::error::CheckError;
use crate::thresholds::ThresholdPair;
use crate::verdict::{ExitCodes, Verdict};

/// One `label=value[unit][;warn;crit]` performance-data token.
///
/// A missing value renders as `U`, the plugin convention for a value
/// that could not be determined.
#[derive(Debug, Clone, PartialEq)]
pub struct PerfDatum {
    pub label: String,
    pub value: Option<f64>,
    pub unit: &'static str,
    /// Digits after the decimal point; `0` truncates to an integer.
    pub precision: usize,
    pub thresholds: Option<ThresholdPair<f64>>,
}

impl PerfDatum {
    pub fn new(label: impl Into<String>, value: Option<f64>) -> Self {
        Self {
            label: label.into(),
            value,
            unit: "",
            precision: 0,
            thresholds: None,
        }
    }

    pub fn with_unit(mut self, unit: &'static str) -> Self {
        self.unit = unit;
        self
    }

    pub fn with_precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self
    }

    pub fn with_thresholds(mut self, pair: ThresholdPair<f64>) -> Self {
        self.thresholds = Some(pair);
        self
    }

    fn number(&self, value: f64) -> String {
        if self.precision == 0 {
            format!("{:.0}", value.trunc())
        } else {
            format!("{value:.prec$}", prec = self.precision)
        }
    }
}

impl fmt::Display for PerfDatum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.value {
            Some(value) => write!(f, "{}={}{}", self.label, self.number(value), self.unit)?,
            None => write!(f, "{}=U", self.label)?,
        }
        if let Some(pair) = &self.thresholds {
            write!(
                f,
                ";{};{}",
                self.number(pair.warning),
                self.number(pair.critical)
            )?;
        }
        Ok(())
    }
}

/// How a check renders its verdict token and maps it to an exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputStyle {
    /// Token printed for Critical and Unknown verdicts.
    pub critical_token: &'static str,
    /// Text between the verdict token and the summary.
    pub separator: &'static str,
    /// Separator used when the check failed before measuring anything.
    pub error_separator: &'static str,
    pub exit_codes: ExitCodes,
    /// Append a `status=<exit code>` perfdata token.
    pub status_perfdata: bool,
}

impl OutputStyle {
    /// `OK ...`, `WARNING ...`, `ERROR ...` with 0/1/2 exit codes.
    pub const ERROR_TOKEN: OutputStyle = OutputStyle {
        critical_token: "ERROR",
        separator: " ",
        error_separator: " ",
        exit_codes: ExitCodes::STANDARD,
        status_perfdata: false,
    };

    /// `OK: ...`, `WARNING: ...`, `CRITICAL: ...` with 0/1/2 exit codes.
    pub const CRITICAL_TOKEN: OutputStyle = OutputStyle {
        critical_token: "CRITICAL",
        separator: ": ",
        error_separator: ": ",
        exit_codes: ExitCodes::STANDARD,
        status_perfdata: false,
    };

    pub const fn with_exit_codes(mut self, exit_codes: ExitCodes) -> Self {
        self.exit_codes = exit_codes;
        self
    }

    /// Separator for measured reports; error lines keep `error_separator`.
    pub const fn with_separator(mut self, separator: &'static str) -> Self {
        self.separator = separator;
        self
    }

    pub const fn with_status_perfdata(mut self, enabled: bool) -> Self {
        self.status_perfdata = enabled;
        self
    }

    pub fn token(&self, verdict: Verdict) -> &'static str {
        match verdict {
            Verdict::Ok => "OK",
            Verdict::Warning => "WARNING",
            Verdict::Critical | Verdict::Unknown => self.critical_token,
        }
    }
}

impl Default for OutputStyle {
    fn default() -> Self {
        Self::ERROR_TOKEN
    }
}

/// Verdict, summary and ordered performance data of one check run.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusReport {
    pub verdict: Verdict,
    pub summary: String,
    pub perfdata: Vec<PerfDatum>,
    /// Set when the report stands for an error instead of measurements.
    pub failed: bool,
}

impl StatusReport {
    pub fn new(verdict: Verdict, summary: impl Into<String>) -> Self {
        Self {
            verdict,
            summary: summary.into(),
            perfdata: Vec::new(),
            failed: false,
        }
    }

    /// Report for a check that failed before producing measurements.
    pub fn from_error(err: &CheckError) -> Self {
        Self {
            failed: true,
            ..Self::new(Verdict::Unknown, err.to_string())
        }
    }

    pub fn with_perfdata(mut self, datum: PerfDatum) -> Self {
        self.perfdata.push(datum);
        self
    }

    /// Raise the verdict to at least `verdict`.
    pub fn escalate(&mut self, verdict: Verdict) {
        self.verdict = self.verdict.max(verdict);
    }

    pub fn exit_code(&self, style: &OutputStyle) -> u8 {
        style.exit_codes.code(self.verdict)
    }

    /// The single stdout line for this report.
    pub fn render(&self, style: &OutputStyle) -> String {
        let mut tokens: Vec<String> = self.perfdata.iter().map(ToString::to_string).collect();
        if style.status_perfdata {
            tokens.push(format!("status={}", self.exit_code(style)));
        }

        let separator = if self.failed {
            style.error_separator
        } else {
            style.separator
        };
        let mut line = format!(
            "{}{}{} |",
            style.token(self.verdict),
            separator,
            self.summary
        );
        if !tokens.is_empty() {
            line.push(' ');
            line.push_str(&tokens.join(" "));
        }
        line
    }
}
