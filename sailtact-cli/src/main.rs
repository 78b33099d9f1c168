//! SailTact CLI - Command-line interface
//!
//! Replays or follows navigation logs through the tack/jibe advisor and
//! manages the advisor configuration.

mod commands;
mod error;

use clap::{Parser, Subcommand};
use sailtact::logging::{default_log_dir, default_log_file, init_logging, LoggingGuard};

use commands::config::ConfigCommands;
use commands::follow::FollowArgs;
use commands::replay::ReplayArgs;
use commands::vmg::VmgArgs;
use error::CliError;

#[derive(Parser)]
#[command(name = "sailtact")]
#[command(version, about = "Tack and jibe advice from learned per-tack boat speed", long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a JSON-lines navigation log on its own clock
    Replay(ReplayArgs),

    /// Read JSON-lines navigation records from stdin and advise live
    Follow(FollowArgs),

    /// Compute VMG and tack side for a single heading
    Vmg(VmgArgs),

    /// View or change configuration
    #[command(subcommand)]
    Config(ConfigCommands),
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        e.exit();
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Commands::Replay(args) => {
            let _guard = setup_logging(cli.verbose)?;
            commands::replay::run(args)
        }
        Commands::Follow(args) => {
            let _guard = setup_logging(cli.verbose)?;
            commands::follow::run(args)
        }
        Commands::Vmg(args) => commands::vmg::run(args),
        Commands::Config(command) => commands::config::run(command),
    }
}

fn setup_logging(verbose: bool) -> Result<LoggingGuard, CliError> {
    let level = if verbose { "sailtact=debug" } else { "sailtact=info" };
    init_logging(default_log_dir(), default_log_file(), level)
        .map_err(|e| CliError::LoggingInit(e.to_string()))
}
