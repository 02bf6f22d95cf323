//! # adpress CLI
//!
//! Command-line interface for the adpress AsciiDoc build companion.

mod commands;
mod prompt;

use clap::{Parser, Subcommand, ValueEnum};
use prompt::TerminalPrompter;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "adpress")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "adpress.yml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new document project from a template
    New {
        /// Template identifier (prompted when omitted)
        template: Option<String>,

        /// Project name (prompted when omitted)
        name: Option<String>,

        /// List available templates and exit
        #[arg(long)]
        list: bool,

        /// Open the entry document afterwards
        #[arg(long)]
        open: bool,
    },

    /// Convert a document to PDF or HTML
    Build {
        /// Source document (discovered when omitted)
        file: Option<PathBuf>,

        /// Output format (overrides the configured one)
        #[arg(long, value_enum)]
        format: Option<FormatArg>,

        /// Open the produced document afterwards
        #[arg(long)]
        open: bool,
    },

    /// Zip the build output into a timestamped archive
    Export,

    /// Report converter and backend availability
    Doctor {
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

#[derive(Copy, Clone, ValueEnum)]
pub enum FormatArg {
    Pdf,
    Html,
}

impl From<FormatArg> for adpress_core::OutputFormat {
    fn from(format: FormatArg) -> Self {
        match format {
            FormatArg::Pdf => adpress_core::OutputFormat::Pdf,
            FormatArg::Html => adpress_core::OutputFormat::Html,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(if cli.verbose {
                tracing::Level::DEBUG.into()
            } else {
                tracing::Level::INFO.into()
            }),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::New {
            template,
            name,
            list,
            open,
        } => {
            let mut prompter = TerminalPrompter;
            commands::new_project(&mut prompter, template.as_deref(), name.as_deref(), list, open)
        }
        Commands::Build { file, format, open } => {
            let mut prompter = TerminalPrompter;
            commands::build_document(
                &mut prompter,
                &cli.config,
                file.as_deref(),
                format.map(Into::into),
                open,
            )
            .await
        }
        Commands::Export => commands::export_output(&cli.config),
        Commands::Doctor { json } => commands::doctor(&cli.config, json).await,
    }
}
