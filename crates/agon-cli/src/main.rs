//! Agon CLI - Command-line interface for two-agent LLM debates
//!
//! # Usage
//!
//! ```bash
//! # Three rounds between the default OpenAI and Grok assistants
//! agon debate --topic "AI regulation"
//!
//! # Pick models and rounds
//! agon debate -t "Remote work" -r 5 --model-a gpt-4o --model-b grok-2-latest
//!
//! # Show the model routing table and configured credentials
//! agon routes
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;

mod commands;

use commands::{debate, routes};

/// Agon - structured debates between two LLM agents
#[derive(Parser)]
#[command(
    name = "agon",
    version,
    about = "Agon CLI - Two-Agent LLM Debates",
    long_about = "Agon runs a turn-based debate between two LLM agents.\n\n\
                  Each agent argues one side of a motion for a fixed number\n\
                  of rounds, rebutting the other's latest argument."
)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a debate and print the transcript
    #[command(name = "debate")]
    Debate(debate::DebateArgs),

    /// Show model routing and configured credentials
    #[command(name = "routes")]
    Routes(routes::RoutesArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose);

    match cli.command {
        Commands::Debate(args) => debate::run(args).await,
        Commands::Routes(args) => routes::run(args),
    }
}

/// Setup logging based on verbosity level
fn setup_logging(verbosity: u8) {
    use tracing_subscriber::EnvFilter;

    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();
}

/// Print a success message with a checkmark
pub fn print_success(msg: &str) {
    println!("{} {}", "✓".green().bold(), msg);
}

/// Print an error message with an X
pub fn print_error(msg: &str) {
    eprintln!("{} {}", "✗".red().bold(), msg);
}

/// Print a warning message
pub fn print_warning(msg: &str) {
    eprintln!("{} {}", "⚠".yellow().bold(), msg);
}
