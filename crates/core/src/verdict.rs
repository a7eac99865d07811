//! Health verdicts and their mapping to plugin exit codes.

use std::fmt;

/// Outcome of a check, ordered by severity.
///
/// `Unknown` is the most severe: it means a measurement could not be
/// obtained at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Verdict {
    #[default]
    Ok,
    Warning,
    Critical,
    Unknown,
}

impl Verdict {
    /// Most severe verdict in `verdicts`, `Ok` when empty.
    pub fn worst<I>(verdicts: I) -> Verdict
    where
        I: IntoIterator<Item = Verdict>,
    {
        verdicts.into_iter().max().unwrap_or_default()
    }

    /// Whether this verdict is reported as critical (Critical or Unknown).
    pub fn is_critical(self) -> bool {
        self >= Verdict::Critical
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Verdict::Ok => "ok",
            Verdict::Warning => "warning",
            Verdict::Critical => "critical",
            Verdict::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

/// Exit-code convention of a check.
///
/// Unknown shares the critical code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCodes {
    pub ok: u8,
    pub warning: u8,
    pub critical: u8,
}

impl ExitCodes {
    /// Nagios plugin convention: 0, 1, 2.
    pub const STANDARD: ExitCodes = ExitCodes {
        ok: 0,
        warning: 1,
        critical: 2,
    };

    /// Convention of the MySQL dump check: 0, 2, 3.
    pub const SHIFTED: ExitCodes = ExitCodes {
        ok: 0,
        warning: 2,
        critical: 3,
    };

    pub fn code(&self, verdict: Verdict) -> u8 {
        match verdict {
            Verdict::Ok => self.ok,
            Verdict::Warning => self.warning,
            Verdict::Critical | Verdict::Unknown => self.critical,
        }
    }
}

impl Default for ExitCodes {
    fn default() -> Self {
        Self::STANDARD
    }
}
