mod commands;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};
use omtoggle_core::GameId;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "omtoggle")]
#[command(about = "Toggle the on_mission flag in the GTA Definitive Edition trilogy")]
struct Args {
    /// Directory holding additional_addresses.json and hotkey_config.json
    #[arg(short, long, default_value = ".")]
    config_dir: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Attach to a running game and toggle the flag with the global hotkey
    Run {
        /// Poll interval in milliseconds
        #[arg(long, default_value_t = 500)]
        interval_ms: u64,
    },
    /// Add a version→offset entry to the user table
    AddVersion {
        /// Game name (SanAndreas, ViceCity, or LibertyCity)
        #[arg(long)]
        game: GameId,
        /// Full four-part file version of the executable
        #[arg(long)]
        version: String,
        /// Offset from the module base, hex with an optional 0x prefix
        #[arg(long)]
        offset: String,
    },
    /// Show or change the toggle hotkey
    Hotkey {
        /// Key name: F1-F24, A-Z, 0-9, "Numpad 0".."Numpad 9", Space, or
        /// punctuation. Omit to show the current hotkey.
        #[arg(long)]
        key: Option<String>,
        #[arg(long)]
        ctrl: bool,
        #[arg(long)]
        alt: bool,
        #[arg(long)]
        shift: bool,
    },
    /// List supported games and the versions known for each
    Games,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("omtoggle=info".parse()?)
                .add_directive("omtoggle_core=info".parse()?),
        )
        .init();

    let args = Args::parse();
    let command = args.command.unwrap_or(Command::Run { interval_ms: 500 });

    match command {
        Command::Run { interval_ms } => {
            commands::run::run(&args.config_dir, Duration::from_millis(interval_ms))
        }
        Command::AddVersion {
            game,
            version,
            offset,
        } => commands::add_version::run(&args.config_dir, game, &version, &offset),
        Command::Hotkey {
            key,
            ctrl,
            alt,
            shift,
        } => commands::hotkey::run(&args.config_dir, key.as_deref(), ctrl, alt, shift),
        Command::Games => commands::games::run(&args.config_dir),
    }
}
