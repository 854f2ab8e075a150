pub mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use closet_core::config::{AppConfig, LoadOptions, LogFormat};

#[derive(Debug, Parser)]
#[command(
    name = "closet",
    about = "Wardrobe outfit analysis CLI",
    long_about = "Analyze how a wardrobe item combines into outfits, estimate category needs from usage frequency, and inspect configuration.",
    after_help = "Examples:\n  closet analyze --input demos/dress-request.json\n  closet analyze --input request.json --assume-wardrobe-compatible\n  closet needs --frequency \"3 times per week\" --season summer\n  closet config"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(
        about = "Build, distribute and score outfits for one item described in a JSON request"
    )]
    Analyze {
        #[arg(long, help = "Path to the analysis request JSON")]
        input: PathBuf,
        #[arg(long, help = "Treat every wardrobe item as compatible, ignoring compatible_items")]
        assume_wardrobe_compatible: bool,
    },
    #[command(about = "Compute outfit and per-category item targets from a usage frequency")]
    Needs {
        #[arg(long, default_value = "", help = "Free-text usage frequency, e.g. \"twice a week\"")]
        frequency: String,
        #[arg(long, help = "Season tag, e.g. summer or spring/fall")]
        season: String,
        #[arg(long, help = "JSON list of scenarios; uses each scenario's own frequency")]
        scenarios: Option<PathBuf>,
    },
    #[command(about = "Inspect effective configuration values with source attribution")]
    Config,
}

/// Logs go to stderr so command payloads on stdout stay machine-readable.
fn init_logging(config: &AppConfig) {
    use tracing::Level;

    let log_level = config.logging.level.parse::<Level>().unwrap_or(Level::INFO);
    let builder = tracing_subscriber::fmt()
        .with_target(false)
        .with_max_level(log_level)
        .with_writer(std::io::stderr);

    // A subscriber may already be installed when embedded; keep that one.
    let _ = match config.logging.format {
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    if let Ok(config) = AppConfig::load(LoadOptions::default()) {
        init_logging(&config);
    }

    let result = match cli.command {
        Command::Analyze { input, assume_wardrobe_compatible } => {
            commands::analyze::run(&input, assume_wardrobe_compatible)
        }
        Command::Needs { frequency, season, scenarios } => {
            commands::needs::run(&frequency, &season, scenarios.as_deref())
        }
        Command::Config => commands::config::run(),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
