//! Scheduler CLI
//!
//! Command-line front end for the classroom scheduler

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use scheduler_core::logging_facility::{self, Profile};

mod commands;

#[derive(Debug, Parser)]
#[command(name = "scheduler")]
#[command(about = "Classroom scheduler - blocks, classrooms and sessions", long_about = None)]
struct Cli {
    /// SQLite database file
    #[arg(long, global = true, env = "SCHEDULER_DB", default_value = "scheduler.db")]
    db: PathBuf,

    /// Log output format
    #[arg(
        long,
        global = true,
        env = "SCHEDULER_LOG",
        value_enum,
        default_value_t = LogFormat::Pretty
    )]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    /// Human-readable lines
    Pretty,
    /// One JSON object per event
    Json,
}

impl From<LogFormat> for Profile {
    fn from(format: LogFormat) -> Self {
        match format {
            LogFormat::Pretty => Profile::Development,
            LogFormat::Json => Profile::Production,
        }
    }
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Print the whole schedule as JSON
    Show,
    /// Print one classroom and its sessions
    Classroom(commands::classroom::ClassroomArgs),
    /// Apply a block-layout form (key=value pairs)
    Blocks(commands::form::FormArgs),
    /// Apply a session-content form (key=value pairs)
    Sessions(commands::form::FormArgs),
    /// Update one setting
    Setting(commands::setting::SettingArgs),
}

fn main() {
    // A missing .env file is fine
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    logging_facility::init(cli.log_format.into());

    let result = commands::open(&cli.db).and_then(|scheduler| match cli.command {
        Commands::Show => commands::show::execute(&scheduler),
        Commands::Classroom(args) => commands::classroom::execute(&scheduler, args),
        Commands::Blocks(args) => commands::form::execute_blocks(&scheduler, args),
        Commands::Sessions(args) => commands::form::execute_sessions(&scheduler, args),
        Commands::Setting(args) => commands::setting::execute(&scheduler, args),
    });

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_maps_to_profile() {
        let cli = Cli::try_parse_from(["scheduler", "--log-format", "json", "show"]).unwrap();
        assert_eq!(cli.log_format, LogFormat::Json);
        assert_eq!(Profile::from(cli.log_format), Profile::Production);
        assert_eq!(Profile::from(LogFormat::Pretty), Profile::Development);
    }

    #[test]
    fn test_unknown_log_format_is_rejected() {
        let err = Cli::try_parse_from(["scheduler", "--log-format", "jsno", "show"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::InvalidValue);
    }
}
