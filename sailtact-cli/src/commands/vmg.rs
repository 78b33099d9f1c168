//! One-shot VMG calculator.

use clap::Args;

use sailtact::angle::{normalize_unsigned, parse_angle};
use sailtact::navigation::{knots_to_mps, mps_to_knots};
use sailtact::vmg::{predicted_alt_vmg, twa_magnitude, vmg, TackSide};

use crate::error::CliError;

/// Arguments for `sailtact vmg`.
#[derive(Debug, Args)]
pub struct VmgArgs {
    /// Speed over ground (m/s, or knots with --knots)
    #[arg(long)]
    pub sog: f64,

    /// Heading in degrees
    #[arg(long, allow_hyphen_values = true)]
    pub heading: String,

    /// True wind direction in degrees
    #[arg(long, allow_hyphen_values = true)]
    pub twd: String,

    /// Interpret --sog as knots
    #[arg(long)]
    pub knots: bool,
}

/// Result of a VMG calculation, in m/s.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VmgReport {
    pub heading_deg: f64,
    pub twd_deg: f64,
    pub twa_deg: f64,
    pub tack: TackSide,
    pub vmg_mps: f64,
    pub mirrored_heading_deg: f64,
    pub mirrored_vmg_mps: f64,
}

impl VmgArgs {
    pub fn report(&self) -> Result<VmgReport, CliError> {
        if !self.sog.is_finite() || self.sog < 0.0 {
            return Err(CliError::InvalidArgument(format!(
                "--sog must be a non-negative number, got {}",
                self.sog
            )));
        }
        let sog = if self.knots {
            knots_to_mps(self.sog)
        } else {
            self.sog
        };
        let heading = angle_arg("--heading", &self.heading)?;
        let twd = angle_arg("--twd", &self.twd)?;
        let (mirrored_heading, mirrored_vmg) = predicted_alt_vmg(sog, heading, twd);

        Ok(VmgReport {
            heading_deg: heading,
            twd_deg: twd,
            twa_deg: twa_magnitude(heading, twd),
            tack: TackSide::from_heading(heading, twd),
            vmg_mps: vmg(sog, heading, twd),
            mirrored_heading_deg: mirrored_heading,
            mirrored_vmg_mps: mirrored_vmg,
        })
    }
}

fn angle_arg(name: &str, text: &str) -> Result<f64, CliError> {
    parse_angle(text)
        .map(normalize_unsigned)
        .ok_or_else(|| CliError::InvalidArgument(format!("{} '{}' is not a valid angle", name, text)))
}

/// Run the vmg command.
pub fn run(args: VmgArgs) -> Result<(), CliError> {
    let report = args.report()?;

    println!("Heading:   {:>6.1}°", report.heading_deg);
    println!("TWD:       {:>6.1}°", report.twd_deg);
    println!("TWA:       {:>6.1}° ({} tack)", report.twa_deg, report.tack);
    println!(
        "VMG:       {:>6.2} m/s ({:.2} kn) {}",
        report.vmg_mps,
        mps_to_knots(report.vmg_mps),
        if report.vmg_mps >= 0.0 { "upwind" } else { "downwind" }
    );
    println!();
    println!("Mirrored across the wind (same speed):");
    println!("  Heading: {:>6.1}°", report.mirrored_heading_deg);
    println!(
        "  VMG:     {:>6.2} m/s ({:.2} kn)",
        report.mirrored_vmg_mps,
        mps_to_knots(report.mirrored_vmg_mps)
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(sog: f64, heading: &str, twd: &str) -> VmgArgs {
        VmgArgs {
            sog,
            heading: heading.to_string(),
            twd: twd.to_string(),
            knots: false,
        }
    }

    #[test]
    fn test_report_close_hauled() {
        let report = args(5.0, "45", "0").report().unwrap();

        assert_eq!(report.tack, TackSide::Starboard);
        assert!((report.twa_deg - 45.0).abs() < 1e-9);
        assert!((report.vmg_mps - 5.0 * 45f64.to_radians().cos()).abs() < 1e-9);
        assert!((report.mirrored_heading_deg - 315.0).abs() < 1e-9);
        assert!((report.mirrored_vmg_mps - report.vmg_mps).abs() < 1e-9);
    }

    #[test]
    fn test_knots_input() {
        let mut a = args(10.0, "0", "0");
        a.knots = true;
        let report = a.report().unwrap();
        assert!((report.vmg_mps - 5.14444).abs() < 1e-9);
    }

    #[test]
    fn test_negative_heading_is_normalized() {
        let report = args(5.0, "-90", "0").report().unwrap();
        assert!((report.heading_deg - 270.0).abs() < 1e-9);
    }

    #[test]
    fn test_invalid_arguments() {
        assert!(args(-1.0, "0", "0").report().is_err());
        assert!(args(5.0, "north", "0").report().is_err());
        assert!(args(5.0, "0", "").report().is_err());
    }
}
