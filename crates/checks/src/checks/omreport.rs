//! Dell OpenManage `omreport` chassis checks.
//!
//! `omreport` prints `Label : value unit` lines; the first occurrence of
//! each label is used.

use clap::{Args, Parser};
use nagcheck_core::metric_names::{METRIC_CHASSIS_TEMPERATURE, METRIC_POWER};
use nagcheck_core::{OutputStyle, PerfDatum, CheckError, StatusReport, Threshold, ThresholdPair};

use crate::cli::{CommandArgs, CommonArgs};
use crate::command::ExternalCommand;

pub const STYLE: OutputStyle = OutputStyle::ERROR_TOKEN;

const DEFAULT_OMREPORT: &str = "/opt/dell/srvadmin/bin/omreport";

#[derive(Debug, Clone, Args)]
pub struct OmreportArgs {
    /// omreport executable
    #[arg(long, default_value = DEFAULT_OMREPORT)]
    pub omreport: String,

    #[command(flatten)]
    pub command: CommandArgs,

    #[command(flatten)]
    pub common: CommonArgs,
}

impl OmreportArgs {
    async fn report(&self, object: &str) -> Result<String, CheckError> {
        ExternalCommand::new(&self.omreport)
            .args(["chassis", object])
            .timeout(self.command.timeout())
            .stdout()
            .await
    }
}

#[derive(Debug, Clone, Parser)]
#[command(
    version,
    about = "check chassis temperature with Dell omreport for Nagios with perfdatas"
)]
pub struct ChassisTempArgs {
    #[command(flatten)]
    pub omreport: OmreportArgs,
}

#[derive(Debug, Clone, Parser)]
#[command(
    version,
    about = "check chassis power consumption with Dell omreport for Nagios with perfdatas"
)]
pub struct PowerArgs {
    #[command(flatten)]
    pub omreport: OmreportArgs,
}

/// Value of the first `label : <number> <unit>` line.
pub fn labelled_value(output: &str, label: &str, unit: &str) -> Result<f64, CheckError> {
    let raw = output
        .lines()
        .find_map(|line| {
            line.trim_start()
                .strip_prefix(label)?
                .trim_start()
                .strip_prefix(':')
        })
        .ok_or_else(|| CheckError::ParseFailure(format!("'{label}' not found")))?
        .trim();

    raw.strip_suffix(unit)
        .map(str::trim_end)
        .and_then(|number| number.parse::<f64>().ok())
        .ok_or_else(|| CheckError::ParseFailure(format!("invalid {label} '{raw}'")))
}

/// Chassis temperature reading and its four limits, in °C.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChassisTemperature {
    pub reading: f64,
    pub range: Threshold<f64>,
}

pub fn parse_chassis_temperature(output: &str) -> Result<ChassisTemperature, CheckError> {
    let value = |label: &str| labelled_value(output, label, "C");
    Ok(ChassisTemperature {
        reading: value("Reading")?,
        range: Threshold::Outside {
            low: ThresholdPair::new(
                value("Minimum Warning Threshold")?,
                value("Minimum Failure Threshold")?,
            ),
            high: ThresholdPair::new(
                value("Maximum Warning Threshold")?,
                value("Maximum Failure Threshold")?,
            ),
        },
    })
}

pub fn evaluate_chassis_temperature(temperature: &ChassisTemperature) -> StatusReport {
    StatusReport::new(
        temperature.range.evaluate(&temperature.reading),
        format!("Chassis temperature: {:.1}°C", temperature.reading),
    )
    .with_perfdata(
        PerfDatum::new(METRIC_CHASSIS_TEMPERATURE, Some(temperature.reading))
            .with_precision(1)
            .with_thresholds(*temperature.range.reported_pair()),
    )
}

/// Chassis power consumption and its limits, in watts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PowerConsumption {
    pub reading: f64,
    pub limits: ThresholdPair<f64>,
}

pub fn parse_power(output: &str) -> Result<PowerConsumption, CheckError> {
    let value = |label: &str| labelled_value(output, label, "W");
    Ok(PowerConsumption {
        reading: value("Reading")?,
        limits: ThresholdPair::new(value("Warning Threshold")?, value("Failure Threshold")?),
    })
}

pub fn evaluate_power(power: &PowerConsumption) -> StatusReport {
    StatusReport::new(
        Threshold::Above(power.limits).evaluate(&power.reading),
        format!("Chassis Power: {:.0}W", power.reading.trunc()),
    )
    .with_perfdata(PerfDatum::new(METRIC_POWER, Some(power.reading)).with_thresholds(power.limits))
}

pub async fn run_chassis_temperature(args: &ChassisTempArgs) -> Result<StatusReport, CheckError> {
    let output = args.omreport.report("temps").await?;
    let temperature = parse_chassis_temperature(&output)?;
    tracing::debug!(reading = temperature.reading, "chassis temperature");
    Ok(evaluate_chassis_temperature(&temperature))
}

pub async fn run_power(args: &PowerArgs) -> Result<StatusReport, CheckError> {
    let output = args.omreport.report("pwrmonitoring").await?;
    let power = parse_power(&output)?;
    tracing::debug!(reading = power.reading, "chassis power");
    Ok(evaluate_power(&power))
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use nagcheck_core::Verdict;

    use super::*;

    const TEMPS: &str = "\
Temperature Probes Information
------------------------------------
Main System Chassis Temperatures: Ok
------------------------------------

Index                     : 0
Status                    : Ok
Probe Name                : System Board Inlet Temp
Reading                   : 23.0 C
Minimum Warning Threshold : 3.0 C
Maximum Warning Threshold : 42.0 C
Minimum Failure Threshold : -7.0 C
Maximum Failure Threshold : 47.0 C
";

    const POWER: &str = "\
Power Consumption Information

Index               : 1
Status              : Ok
Probe Name          : System Board Pwr Consumption
Reading             : 168 W
Warning Threshold   : 896 W
Failure Threshold   : 980 W
";

    #[test]
    fn reads_labelled_values() {
        assert_eq!(labelled_value(TEMPS, "Reading", "C").unwrap(), 23.0);
        assert_eq!(
            labelled_value(TEMPS, "Minimum Failure Threshold", "C").unwrap(),
            -7.0
        );
        assert_matches!(
            labelled_value(TEMPS, "Reading", "W"),
            Err(CheckError::ParseFailure(_))
        );
        assert_matches!(
            labelled_value(POWER, "Peak Reading", "W"),
            Err(CheckError::ParseFailure(_))
        );
    }

    #[test]
    fn chassis_temperature_ok() {
        let temperature = parse_chassis_temperature(TEMPS).unwrap();
        let report = evaluate_chassis_temperature(&temperature);
        assert_eq!(
            report.render(&STYLE),
            "OK Chassis temperature: 23.0°C | chassis=23.0;42.0;47.0"
        );
    }

    #[test]
    fn chassis_temperature_range() {
        let cold = TEMPS.replace("Reading                   : 23.0 C", "Reading : 1.0 C");
        let report = evaluate_chassis_temperature(&parse_chassis_temperature(&cold).unwrap());
        assert_eq!(report.verdict, Verdict::Warning);

        let hot = TEMPS.replace("23.0 C", "48.5 C");
        let report = evaluate_chassis_temperature(&parse_chassis_temperature(&hot).unwrap());
        assert_eq!(report.verdict, Verdict::Critical);
        assert_eq!(
            report.render(&STYLE),
            "ERROR Chassis temperature: 48.5°C | chassis=48.5;42.0;47.0"
        );
    }

    #[test]
    fn power_ok() {
        let report = evaluate_power(&parse_power(POWER).unwrap());
        assert_eq!(
            report.render(&STYLE),
            "OK Chassis Power: 168W | power=168;896;980"
        );
    }

    #[test]
    fn power_over_warning() {
        let report = evaluate_power(&parse_power(&POWER.replace("168 W", "900 W")).unwrap());
        assert_eq!(report.verdict, Verdict::Warning);
        assert_eq!(report.exit_code(&STYLE), 1);
    }

    #[test]
    fn missing_threshold_is_parse_failure() {
        let output = POWER.replace("Failure Threshold   : 980 W", "Failure Threshold   : [N/A]");
        assert_matches!(parse_power(&output), Err(CheckError::ParseFailure(_)));
    }
}
