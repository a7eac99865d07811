//! Final step of every check: print the status line, return the exit code.

use std::process::ExitCode;

use nagcheck_core::{OutputStyle, CheckError, StatusReport};

/// Turn a check outcome into its status line and exit code.
///
/// Errors never escape: they become a critical line carrying the error
/// message as summary.
pub fn conclude(result: Result<StatusReport, CheckError>) -> StatusReport {
    match result {
        Ok(report) => report,
        Err(e) => {
            tracing::error!(error = %e, "Check failed");
            StatusReport::from_error(&e)
        }
    }
}

/// Print the report for `result` using `style` and return the exit code.
pub fn finish(result: Result<StatusReport, CheckError>, style: &OutputStyle) -> ExitCode {
    let report = conclude(result);
    tracing::debug!(verdict = %report.verdict, "Check finished");
    println!("{}", report.render(style));
    ExitCode::from(report.exit_code(style))
}

#[cfg(test)]
mod tests {
    use nagcheck_core::Verdict;

    use super::*;

    #[test]
    fn errors_are_converted() {
        let report = conclude(Err(CheckError::Config("section general not found".into())));
        assert_eq!(report.verdict, Verdict::Unknown);
        assert_eq!(
            report.render(&OutputStyle::ERROR_TOKEN),
            "ERROR configuration error: section general not found |"
        );
    }

    #[test]
    fn reports_pass_through() {
        let report = conclude(Ok(StatusReport::new(Verdict::Warning, "late")));
        assert_eq!(report.verdict, Verdict::Warning);
    }
}
