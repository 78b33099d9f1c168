//! Follow a live navigation feed on stdin.
//!
//! Reads JSON-lines records as they arrive, runs the real evaluation
//! ticker and prints recommendations until stdin closes or Ctrl-C.

use std::sync::Arc;

use chrono::Local;
use clap::Args;
use console::style;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::{broadcast, mpsc};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use sailtact::navigation::NavigationUpdate;
use sailtact::{Advisor, AdvisorEvent};

use super::common::{NavigationRecord, TuningArgs, WindArgs};
use crate::error::CliError;

/// Buffered navigation updates between stdin and the advisor.
const UPDATE_CHANNEL_CAPACITY: usize = 256;

/// Arguments for `sailtact follow`.
#[derive(Debug, Args)]
pub struct FollowArgs {
    #[command(flatten)]
    pub wind: WindArgs,

    #[command(flatten)]
    pub tuning: TuningArgs,
}

/// Run the follow command.
pub fn run(args: FollowArgs) -> Result<(), CliError> {
    let settings = args.tuning.resolve()?;
    let wind = args.wind.to_wind_input()?;
    if wind.is_none() {
        warn!("No wind given (--twd or --twa); nothing will be learned or recommended");
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(CliError::Runtime)?;

    let shutdown = CancellationToken::new();
    let signal_token = shutdown.clone();
    ctrlc::set_handler(move || {
        signal_token.cancel();
    })
    .map_err(CliError::Signal)?;

    let advisor = Arc::new(Advisor::new(settings));
    advisor.set_wind(wind);

    println!(
        "Following stdin (evaluating every {}s). Press Ctrl-C to stop.",
        advisor.settings().eval_interval.as_secs()
    );

    let result = runtime.block_on(async {
        let events = advisor.subscribe();
        advisor.start_alerts(&tokio::runtime::Handle::current());

        let printer = tokio::spawn(print_recommendations(events, shutdown.clone()));

        let (tx, rx) = mpsc::channel(UPDATE_CHANNEL_CAPACITY);
        let ingest = tokio::spawn({
            let advisor = Arc::clone(&advisor);
            let shutdown = shutdown.clone();
            async move { advisor.run(rx, shutdown).await }
        });

        let read_result = read_stdin(tx, shutdown.clone()).await;

        advisor.stop_alerts();
        shutdown.cancel();
        let _ = ingest.await;
        let _ = printer.await;
        read_result
    });
    // A pending stdin read would otherwise hold the runtime open
    runtime.shutdown_background();
    result?;

    info!(
        samples = advisor.model().total_samples(),
        "Follow session ended"
    );
    Ok(())
}

async fn read_stdin(
    tx: mpsc::Sender<NavigationUpdate>,
    shutdown: CancellationToken,
) -> Result<(), CliError> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut line_no = 0usize;

    loop {
        tokio::select! {
            biased;

            _ = shutdown.cancelled() => break,

            line = lines.next_line() => {
                let Some(line) = line.map_err(CliError::Runtime)? else {
                    debug!("stdin closed");
                    break;
                };
                line_no += 1;

                let Some(record) = NavigationRecord::parse_line(&line, line_no) else {
                    continue;
                };
                for update in record.updates() {
                    if tx.send(update).await.is_err() {
                        return Ok(());
                    }
                }
            }
        }
    }
    Ok(())
}

async fn print_recommendations(
    mut events: broadcast::Receiver<AdvisorEvent>,
    shutdown: CancellationToken,
) {
    loop {
        tokio::select! {
            biased;

            _ = shutdown.cancelled() => break,

            event = events.recv() => match event {
                Ok(AdvisorEvent::Recommendation(rec)) => {
                    println!(
                        "[{}] {}",
                        rec.emitted_at.with_timezone(&Local).format("%H:%M:%S"),
                        style(&rec.message).bold().green()
                    );
                }
                Ok(AdvisorEvent::StateChanged(_)) => {}
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    debug!(skipped = n, "Event printer lagged");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    }
}
