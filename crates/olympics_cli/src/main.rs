//! `olympics` command-line entry point.
//!
//! # Responsibility
//! - Resolve configuration and logging once at startup.
//! - Open every repository, then hand stdin to the command loop.

mod commands;

use clap::Parser;
use log::info;
use olympics_core::{default_log_level, init_logging, AppConfig, Controller};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Olympics data manager with swappable storage backends.
#[derive(Debug, Parser)]
#[command(name = "olympics", version)]
struct Cli {
    /// TOML configuration selecting a backend per entity.
    #[arg(long, default_value = "olympics.toml")]
    config: PathBuf,

    /// Log level: trace, debug, info, warn or error.
    #[arg(long)]
    log_level: Option<String>,

    /// Directory for rotated log files; logging is off when neither this
    /// nor `[logging] dir` is set.
    #[arg(long)]
    log_dir: Option<PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), String> {
    let config = AppConfig::load(&cli.config).map_err(|err| err.to_string())?;

    let log_dir = cli.log_dir.as_ref().or(config.logging.dir.as_ref());
    if let Some(dir) = log_dir {
        let level = cli
            .log_level
            .as_deref()
            .or(config.logging.level.as_deref())
            .unwrap_or(default_log_level());
        init_logging(level, &absolute(dir)?)?;
    }
    info!(
        "event=cli_start module=cli status=ok config={} core_version={}",
        cli.config.display(),
        olympics_core::core_version()
    );

    let mut controller = Controller::from_config(&config).map_err(|err| err.to_string())?;
    println!("Type `help` for the list of commands.");

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    commands::run_loop(&mut controller, stdin.lock(), stdout.lock())
        .map_err(|err| format!("terminal error: {err}"))
}

fn absolute(path: &Path) -> Result<PathBuf, String> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    std::env::current_dir()
        .map(|cwd| cwd.join(path))
        .map_err(|err| format!("cannot resolve `{}`: {err}", path.display()))
}
