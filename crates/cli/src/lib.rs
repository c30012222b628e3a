pub mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "shopmatch",
    about = "Shopping-comparison ranking CLI",
    long_about = "Rank a catalog snapshot for a user profile, or search it with a fuzzy \
                  multilingual query. Catalog and profile are JSON files; results are a JSON \
                  array on stdout.",
    after_help = "Examples:\n  shopmatch recommend --catalog catalog.json --profile profile.json\n  \
                  shopmatch search \"ايفون برو\" --catalog catalog.json --profile profile.json --sort-key price\n  \
                  shopmatch config"
)]
pub struct Cli {
    /// Path to a shopmatch.toml overriding the built-in ranking constants.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Rank the whole catalog by suitability for the profile")]
    Recommend {
        #[arg(long, help = "Catalog snapshot JSON file")]
        catalog: PathBuf,
        #[arg(long, help = "User profile JSON file")]
        profile: PathBuf,
        #[arg(long, help = "Keep only the top N results")]
        limit: Option<usize>,
    },
    #[command(about = "Search the catalog with a text query and rank the hits")]
    Search {
        query: String,
        #[arg(long, help = "Catalog snapshot JSON file")]
        catalog: PathBuf,
        #[arg(long, help = "User profile JSON file")]
        profile: PathBuf,
        #[arg(long, default_value = "combined", help = "Sort order: combined|price|rating")]
        sort_key: String,
        #[arg(long, help = "Keep only the top N results")]
        limit: Option<usize>,
    },
    #[command(about = "Print the effective ranking configuration as TOML")]
    Config,
}

pub fn run() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Recommend { catalog, profile, limit } => {
            commands::recommend::run(cli.config.as_deref(), &catalog, &profile, limit)
        }
        Command::Search { query, catalog, profile, sort_key, limit } => commands::search::run(
            cli.config.as_deref(),
            &query,
            &catalog,
            &profile,
            &sort_key,
            limit,
        ),
        Command::Config => commands::config::run(cli.config.as_deref()),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("SHOPMATCH_LOG")
        .unwrap_or_else(|_| EnvFilter::new("shopmatch_cli=warn,shopmatch_core=warn"));
    // Logs go to stderr so stdout stays parseable JSON.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
