//! Replay a recorded navigation log.
//!
//! Feeds JSON-lines records through an advisor on a simulated clock taken
//! from the record timestamps, evaluating every `eval_interval` of log
//! time. Records without a timestamp are ingested but do not advance the
//! clock.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::Args;
use console::style;
use tracing::info;

use sailtact::navigation::mps_to_knots;
use sailtact::{Advisor, ManeuverRecommendation};

use super::common::{NavigationRecord, TuningArgs, WindArgs};
use crate::error::CliError;

/// Arguments for `sailtact replay`.
#[derive(Debug, Args)]
pub struct ReplayArgs {
    /// JSON-lines navigation log
    pub file: PathBuf,

    #[command(flatten)]
    pub wind: WindArgs,

    #[command(flatten)]
    pub tuning: TuningArgs,

    /// Print the learned performance bins after the replay
    #[arg(long)]
    pub bins: bool,
}

/// Counters collected during a replay.
#[derive(Debug, Default)]
pub struct ReplaySummary {
    pub records: usize,
    pub skipped_lines: usize,
    pub dropped_fixes: usize,
    pub evaluations: usize,
    pub recommendations: Vec<ManeuverRecommendation>,
}

/// Run the replay command.
pub fn run(args: ReplayArgs) -> Result<(), CliError> {
    let settings = args.tuning.resolve()?;
    let advisor = Advisor::new(settings);
    advisor.set_wind(args.wind.to_wind_input()?);

    let path = args.file.display().to_string();
    let file = File::open(&args.file).map_err(|error| CliError::Input {
        path: path.clone(),
        error,
    })?;

    info!(file = %path, "Replaying navigation log");
    let summary = replay(BufReader::new(file), &advisor, |rec| {
        println!(
            "[{}] {}",
            rec.emitted_at.format("%H:%M:%S"),
            style(&rec.message).bold().green()
        );
    })
    .map_err(|error| CliError::Input { path, error })?;

    print_summary(&summary, &advisor);
    if args.bins {
        print_bins(&advisor);
    }
    Ok(())
}

/// Feed every record from `reader` through `advisor`.
///
/// `on_recommendation` is called for each recommendation in log order.
pub fn replay<R, F>(
    reader: R,
    advisor: &Advisor,
    mut on_recommendation: F,
) -> Result<ReplaySummary, std::io::Error>
where
    R: BufRead,
    F: FnMut(&ManeuverRecommendation),
{
    let interval = chrono::Duration::from_std(advisor.settings().eval_interval)
        .unwrap_or_else(|_| chrono::Duration::seconds(30));
    let mut summary = ReplaySummary::default();
    let mut next_eval: Option<DateTime<Utc>> = None;

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let Some(record) = NavigationRecord::parse_line(&line, index + 1) else {
            if !line.trim().is_empty() && !line.trim_start().starts_with('#') {
                summary.skipped_lines += 1;
            }
            continue;
        };
        summary.records += 1;

        if let Some(time) = record.time {
            let due = next_eval.get_or_insert(time + interval);
            while *due <= time {
                summary.evaluations += 1;
                if let Some(rec) = advisor.evaluate_now(*due) {
                    on_recommendation(&rec);
                    summary.recommendations.push(rec);
                }
                *due += interval;
            }
        }

        for update in record.updates() {
            if !advisor.ingest(update) {
                summary.dropped_fixes += 1;
            }
        }
    }

    info!(
        records = summary.records,
        evaluations = summary.evaluations,
        recommendations = summary.recommendations.len(),
        "Replay complete"
    );
    Ok(summary)
}

fn print_summary(summary: &ReplaySummary, advisor: &Advisor) {
    println!();
    println!("Replay Summary");
    println!("==============");
    println!("  Records:          {}", summary.records);
    if summary.skipped_lines > 0 {
        println!("  Skipped lines:    {}", summary.skipped_lines);
    }
    println!("  Fixes dropped:    {}", summary.dropped_fixes);
    println!("  Samples learned:  {}", advisor.model().total_samples());
    println!("  Evaluations:      {}", summary.evaluations);
    println!("  Recommendations:  {}", summary.recommendations.len());
}

fn print_bins(advisor: &Advisor) {
    let width = advisor.model().bin_width_deg();
    println!();
    println!("Learned Performance");
    println!("===================");
    println!("  {:<10} {:>12} {:>8} {:>10}", "tack", "TWA", "samples", "speed (kn)");
    for bin in advisor.model().bins() {
        println!(
            "  {:<10} {:>5.0}-{:<5.0}° {:>8} {:>10.2}",
            bin.key.tack,
            bin.twa_from_deg,
            bin.twa_from_deg + width,
            bin.samples,
            mps_to_knots(bin.mean_sog_mps)
        );
    }
}
