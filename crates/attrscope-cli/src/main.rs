//! attrscope command-line interface.
//!
//! Runs the scope filter over JSON state records and inspects configuration.
//!
//! # Quick Start
//!
//! ```bash
//! # Filter a state record read from stdin
//! echo '{"Attributes": {...}, "Source": {"scope": ["example.com"]}}' | attrscope filter
//!
//! # Check values against scopes
//! attrscope check --scope example.com staff@example.com staff@evil.org
//!
//! # Show the resolved configuration
//! attrscope config --format toml
//! ```

mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::Level;

use commands::config::OutputFormat;

/// attrscope - scope validation for federated identity attributes.
#[derive(Parser)]
#[command(name = "attrscope")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Log at debug level.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Filter attributes of one JSON state record, or an array of them.
    Filter {
        /// Config file to use instead of attrscope.toml discovery.
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Project directory searched for attrscope.toml.
        #[arg(short, long, default_value = ".")]
        project: PathBuf,

        /// Input file (reads stdin if omitted).
        input: Option<PathBuf>,
    },

    /// Check values against a set of scopes.
    Check {
        /// A declared scope (repeatable).
        #[arg(short, long = "scope", required = true)]
        scopes: Vec<String>,

        /// Accept dotted subdomains of a scope.
        #[arg(long)]
        suffix: bool,

        /// Compare scopes ignoring ASCII case.
        #[arg(short, long)]
        ignore_case: bool,

        /// Values to check.
        #[arg(required = true)]
        values: Vec<String>,
    },

    /// Show the resolved filter configuration.
    Config {
        /// Config file to use instead of attrscope.toml discovery.
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Project directory searched for attrscope.toml.
        #[arg(short, long, default_value = ".")]
        project: PathBuf,

        /// Output format.
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    // Stdout carries command output; logs go to stderr.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .init();

    match cli.command {
        Commands::Filter {
            config,
            project,
            input,
        } => commands::filter::run(config.as_deref(), &project, input.as_deref()),
        Commands::Check {
            scopes,
            suffix,
            ignore_case,
            values,
        } => commands::check::run(&scopes, suffix, ignore_case, &values),
        Commands::Config {
            config,
            project,
            format,
        } => commands::config::show(config.as_deref(), &project, format),
    }
}
