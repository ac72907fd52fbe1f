//! Plotline CLI - run plot scripts through notebook sessions.

mod colors;
mod output;
mod run;

use clap::{Parser, Subcommand};
use plotline_core::ShowConfig;

#[derive(Parser)]
#[command(name = "plotline")]
#[command(about = "Run plot scripts through Plotline notebook sessions")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one or more scripts, one session per script
    Run {
        /// Paths to the scripts (one statement per line)
        #[arg(required = true)]
        scripts: Vec<String>,

        /// Context id (defaults to the script's file stem; single script only)
        #[arg(long)]
        context: Option<String>,

        /// Show automatically after every plot
        #[arg(long)]
        interactive: bool,

        /// Keep figures live after show
        #[arg(long)]
        no_close: bool,

        /// Publish figures to the live registry and emit ANGULAR output
        #[arg(long)]
        angular: bool,

        /// Print results as JSON lines
        #[arg(long)]
        json: bool,
    },

    /// Print the default show configuration as JSON
    Defaults,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        tracing_subscriber::EnvFilter::from_default_env()
            .add_directive(tracing::Level::DEBUG.into())
    } else {
        tracing_subscriber::EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into())
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // Helper to format plotline-core errors with recovery hints
    let format_error = |err: anyhow::Error| -> anyhow::Error {
        if let Some(core_err) = err.downcast_ref::<plotline_core::Error>() {
            anyhow::anyhow!("{}", core_err.with_hint())
        } else {
            err
        }
    };

    match cli.command {
        Commands::Run {
            scripts,
            context,
            interactive,
            no_close,
            angular,
            json,
        } => {
            let config = ShowConfig {
                interactive,
                close: !no_close,
                angular,
                ..ShowConfig::default()
            };
            let options = run::RunOptions {
                context,
                config,
                json,
            };
            run::execute(&scripts, &options).map_err(format_error)?;
        }

        Commands::Defaults => {
            println!("{}", serde_json::to_string_pretty(&ShowConfig::default())?);
        }
    }

    Ok(())
}
