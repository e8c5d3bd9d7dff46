//! obslocate CLI - find obs-websocket connection settings.

mod commands;
mod ui;

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand};
use obslocate_core::Config;
use tracing_subscriber::EnvFilter;

use crate::commands::{Outcome, Strategy};

#[derive(Parser)]
#[command(name = "obslocate")]
#[command(about = "Find the address, port and password of a local obs-websocket server", long_about = None)]
struct Cli {
    /// OBS settings file to read instead of the per-user global.ini
    #[arg(long, global = true, value_name = "PATH")]
    ini: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Also print the connection URL as a QR code
    #[arg(long, global = true)]
    qr: bool,

    /// Give up on a strategy after this many seconds
    #[arg(long, global = true, value_name = "SECS")]
    timeout: Option<u64>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Try the settings file, then the connect info dialog (default)
    Auto,
    /// Read the settings file only
    File,
    /// Read the QR code of the open connect info dialog only
    Window,
    /// List local addresses in preference order
    Interfaces,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.verbose { "obslocate=debug" } else { "obslocate=info" };
    // "obslocate" also matches the obslocate_core targets
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let mut config = Config::default();
    if let Some(path) = cli.ini {
        config = config.with_settings_file(path);
    }
    let options = commands::LocateOptions {
        config,
        timeout: cli.timeout.map(Duration::from_secs),
        json: cli.json,
        qr: cli.qr,
    };

    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("\x1b[1;31m✗\x1b[0m Error: failed to start runtime: {}", e);
            return ExitCode::from(2);
        }
    };

    let command = cli.command.unwrap_or(Commands::Auto);
    let result = runtime.block_on(async {
        match command {
            Commands::Auto => commands::locate(&[Strategy::File, Strategy::Window], &options).await,
            Commands::File => commands::locate(&[Strategy::File], &options).await,
            Commands::Window => commands::locate(&[Strategy::Window], &options).await,
            Commands::Interfaces => commands::show_interfaces(&options),
        }
    });

    // A strategy abandoned by --timeout may still be blocking; don't wait for it
    runtime.shutdown_background();

    match result {
        Ok(Outcome::Found) => ExitCode::SUCCESS,
        Ok(Outcome::NotFound) => ExitCode::from(1),
        Err(e) => {
            eprintln!("\x1b[1;31m✗\x1b[0m Error: {:#}", e);
            ExitCode::from(2)
        }
    }
}
