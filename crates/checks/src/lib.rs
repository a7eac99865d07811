//! `nagcheck-checks` library crate.
//!
//! Each check lives in [`checks`] as a pure parse/evaluate pair plus an
//! entry point returning a [`nagcheck_core::StatusReport`]. The binaries
//! under `src/bin` only parse arguments and hand the result to
//! [`runner::finish`].

pub mod backup;
pub mod checks;
pub mod cli;
pub mod command;
pub mod logging;
pub mod runner;
