//! Disk temperatures read through `smartctl`, configured by an INI file.
//!
//! ```ini
//! [general]
//! command = /usr/sbin/smartctl
//! disks = sda,sdb
//!
//! [sda]
//! disktype = hdd
//! devicetype = sat
//! device = /dev/sda
//!
//! [hdd]
//! temperature_regex = Temperature_Celsius.*\s(\d+)(\s\(|$)
//! maxwarn = 45
//! maxcrit = 50
//! ```
//!
//! Backslashes in values are kept as written.

use std::path::{Path, PathBuf};

use clap::Parser;
use config::{Config, File, FileFormat};
use nagcheck_core::{
    OutputStyle, PerfDatum, CheckError, StatusReport, Threshold, ThresholdPair, Verdict,
};
use regex::Regex;
use serde::Deserialize;

use crate::cli::{CommandArgs, CommonArgs};
use crate::command::ExternalCommand;

pub const STYLE: OutputStyle = OutputStyle::ERROR_TOKEN;

#[derive(Debug, Clone, Parser)]
#[command(version, about = "check smartctl disk temperature for Nagios")]
pub struct DisktempArgs {
    /// configuration file
    pub configfile: PathBuf,

    #[command(flatten)]
    pub command: CommandArgs,

    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Debug, Deserialize)]
struct GeneralSection {
    command: String,
    disks: String,
}

#[derive(Debug, Deserialize)]
struct DiskSection {
    disktype: String,
    devicetype: String,
    device: String,
}

#[derive(Debug, Deserialize)]
struct DiskTypeSection {
    temperature_regex: String,
    maxwarn: i64,
    maxcrit: i64,
}

/// One disk to read, with the limits of its disk type.
#[derive(Debug, Clone)]
pub struct Disk {
    pub name: String,
    pub devicetype: String,
    pub device: String,
    pub temperature_regex: Regex,
    pub limits: ThresholdPair<i64>,
}

/// Resolved configuration file.
#[derive(Debug, Clone)]
pub struct DisktempConfig {
    pub command: String,
    pub disks: Vec<Disk>,
}

fn config_error(err: config::ConfigError) -> CheckError {
    CheckError::Config(err.to_string())
}

impl DisktempConfig {
    pub fn load(path: &Path) -> Result<Self, CheckError> {
        if !path.is_file() {
            return Err(CheckError::MissingInput(path.to_path_buf()));
        }
        let text = std::fs::read_to_string(path).map_err(|e| CheckError::from_io(path, e))?;
        Self::from_ini(&text)
    }

    /// Parse configuration text directly.
    pub fn from_ini(text: &str) -> Result<Self, CheckError> {
        // The INI reader unescapes backslashes; doubling them keeps regexes intact.
        let text = text.replace('\\', "\\\\");
        let settings = Config::builder()
            .add_source(File::from_str(&text, FileFormat::Ini))
            .build()
            .map_err(config_error)?;
        Self::from_settings(&settings)
    }

    fn from_settings(settings: &Config) -> Result<Self, CheckError> {
        let general: GeneralSection = settings.get("general").map_err(config_error)?;

        let disks = general
            .disks
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(|name| {
                let disk: DiskSection = settings.get(name).map_err(config_error)?;
                let disk_type: DiskTypeSection =
                    settings.get(&disk.disktype).map_err(config_error)?;
                let temperature_regex =
                    Regex::new(&disk_type.temperature_regex).map_err(|e| {
                        CheckError::Config(format!(
                            "invalid temperature_regex in section {}: {e}",
                            disk.disktype
                        ))
                    })?;
                Ok(Disk {
                    name: name.to_string(),
                    devicetype: disk.devicetype,
                    device: disk.device,
                    temperature_regex,
                    limits: ThresholdPair::new(disk_type.maxwarn, disk_type.maxcrit),
                })
            })
            .collect::<Result<Vec<_>, CheckError>>()?;

        if disks.is_empty() {
            return Err(CheckError::Config("no disk listed in general.disks".into()));
        }

        Ok(Self {
            command: general.command,
            disks,
        })
    }
}

/// First capture group of the disk type's regex, as whole degrees.
pub fn parse_temperature(output: &str, regex: &Regex) -> Result<i64, CheckError> {
    let caps = regex
        .captures(output)
        .ok_or_else(|| CheckError::ParseFailure(format!("no match for '{}'", regex.as_str())))?;
    let raw = caps
        .get(1)
        .ok_or_else(|| {
            CheckError::ParseFailure(format!("no capture group in '{}'", regex.as_str()))
        })?
        .as_str()
        .trim();
    raw.parse()
        .map_err(|_| CheckError::ParseFailure(format!("invalid temperature '{raw}'")))
}

/// Fold per-disk readings into one report; the worst disk decides.
pub fn evaluate(readings: &[(Disk, Result<i64, CheckError>)]) -> StatusReport {
    let mut parts = Vec::with_capacity(readings.len());
    let mut perfdata = Vec::with_capacity(readings.len());
    let mut verdicts = Vec::with_capacity(readings.len());

    for (disk, reading) in readings {
        let limits = ThresholdPair::new(disk.limits.warning as f64, disk.limits.critical as f64);
        match reading {
            Ok(temperature) => {
                verdicts.push(Threshold::Above(disk.limits).evaluate(temperature));
                parts.push(format!("{}:{}°C", disk.name, temperature));
                perfdata.push(
                    PerfDatum::new(disk.name.as_str(), Some(*temperature as f64))
                        .with_thresholds(limits),
                );
            }
            Err(e) => {
                verdicts.push(Verdict::Unknown);
                parts.push(format!("{}:unknown ({e})", disk.name));
                perfdata.push(PerfDatum::new(disk.name.as_str(), None).with_thresholds(limits));
            }
        }
    }

    let mut report = StatusReport::new(Verdict::worst(verdicts), parts.join(" "));
    report.perfdata = perfdata;
    report
}

async fn read_disk(
    config: &DisktempConfig,
    disk: &Disk,
    args: &DisktempArgs,
) -> Result<i64, CheckError> {
    let output = ExternalCommand::new(&config.command)
        .args(["-A", "-d", disk.devicetype.as_str(), disk.device.as_str()])
        .timeout(args.command.timeout())
        .stdout()
        .await?;
    let temperature = parse_temperature(&output, &disk.temperature_regex)?;
    tracing::debug!(disk = %disk.name, temperature, "disk temperature");
    Ok(temperature)
}

pub async fn run(args: &DisktempArgs) -> Result<StatusReport, CheckError> {
    let config = DisktempConfig::load(&args.configfile)?;

    let mut readings = Vec::with_capacity(config.disks.len());
    for disk in &config.disks {
        let reading = read_disk(&config, disk, args).await;
        if let Err(e) = &reading {
            tracing::warn!(disk = %disk.name, error = %e, "Disk temperature unavailable");
        }
        readings.push((disk.clone(), reading));
    }

    Ok(evaluate(&readings))
}
