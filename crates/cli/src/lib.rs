pub mod commands;
pub mod logging;

use clap::{Parser, Subcommand};
use procura_core::config::{AppConfig, LoadOptions, LoggingConfig};
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "procura",
    about = "Procura procurement skills CLI",
    long_about = "Invoke the supplier lookup and negotiation strategy skills, inspect configuration, and run the smoke harness.",
    after_help = "Examples:\n  procura smoke\n  procura lookup 1000123\n  procura strategy 1000123 --trend Stable --objective \"Reduce price\"\n  procura config"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Run supplier lookup then strategy generation and report each check")]
    Smoke {
        #[arg(long, help = "Exit non-zero when any check fails")]
        strict: bool,
    },
    #[command(about = "Look up a supplier and print the response envelope")]
    Lookup {
        #[arg(help = "Supplier identifier, e.g. 1000123")]
        supplier_id: String,
    },
    #[command(about = "Look up a supplier and generate a negotiation strategy for it")]
    Strategy {
        #[arg(help = "Supplier identifier, e.g. 1000123")]
        supplier_id: String,
        #[arg(long, default_value = "Stable", help = "Market trend descriptor")]
        trend: String,
        #[arg(long = "objective", help = "Negotiation objective; repeat for several")]
        objectives: Vec<String>,
    },
    #[command(about = "List registered skills")]
    Skills,
    #[command(about = "Inspect effective configuration values with source attribution")]
    Config,
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let logging = AppConfig::load(LoadOptions::default())
        .map(|config| config.logging)
        .unwrap_or_else(|_| LoggingConfig::default());
    logging::init(&logging);

    let result = match cli.command {
        Command::Smoke { strict } => commands::smoke::run(strict),
        Command::Lookup { supplier_id } => commands::lookup::run(&supplier_id),
        Command::Strategy { supplier_id, trend, objectives } => {
            commands::strategy::run(&supplier_id, &trend, &objectives)
        }
        Command::Skills => commands::skills::run(),
        Command::Config => commands::config::run(),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
