//! CLI commands implementation.
//!
//! This module contains the CLI parser and dispatches to command-specific modules.

mod analyze;
mod export;
mod image;
mod recent;
mod serve;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::{load_settings_with_options, LoadOptions};
use crate::models::{KindFilter, SortOrder};

#[derive(Parser)]
#[command(name = "insight")]
#[command(about = "AI-assisted text and image analysis dashboard")]
#[command(version)]
pub struct Cli {
    /// Config file path (defaults to ./insightboard.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Check if verbose mode is enabled (for early logging setup).
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

#[derive(Subcommand)]
enum Commands {
    /// Start the dashboard API server
    Serve {
        /// Bind address (port, host, or host:port); defaults to the configured address
        #[arg(short, long)]
        bind: Option<String>,
    },

    /// Analyze text (argument, --file, or stdin)
    Analyze {
        /// Text to analyze
        text: Option<String>,
        /// Read the text from a file
        #[arg(short, long, conflicts_with = "text")]
        file: Option<PathBuf>,
        /// Stream a narrative analysis instead of structured insights
        #[arg(short, long)]
        stream: bool,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
        /// Also export the result (excel, word, markdown, text)
        #[arg(short, long)]
        export: Option<String>,
        /// Where to write the exported document
        #[arg(short, long, requires = "export")]
        output: Option<PathBuf>,
    },

    /// Analyze an image file
    Image {
        /// Image file
        path: PathBuf,
        /// Instructions steering the analysis
        #[arg(short, long)]
        instructions: Option<String>,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
        /// Also export the result (excel, word, markdown, text)
        #[arg(short, long)]
        export: Option<String>,
        /// Where to write the exported document
        #[arg(short, long, requires = "export")]
        output: Option<PathBuf>,
    },

    /// Convert an analysis result (text or JSON) into a document
    Export {
        /// Output format (excel, word, markdown, text)
        #[arg(short, long)]
        format: String,
        /// Read the analysis from a file instead of stdin
        #[arg(short, long)]
        input: Option<PathBuf>,
        /// Write the document here; prints the data URL otherwise
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List recent analyses
    Recent {
        /// Filter by analysis type
        #[arg(short = 't', long = "type", value_enum, default_value_t = KindFilter::All)]
        kind: KindFilter,
        /// Sort order by timestamp
        #[arg(short, long, value_enum, default_value_t = SortOrder::Newest)]
        sort: SortOrder,
    },
}

/// Run the CLI.
pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let options = LoadOptions {
        config_path: cli.config,
    };
    let settings = load_settings_with_options(options).await?;

    match cli.command {
        Commands::Serve { bind } => {
            let bind = bind.unwrap_or_else(|| settings.bind.clone());
            serve::cmd_serve(&settings, &bind).await
        }
        Commands::Analyze {
            text,
            file,
            stream,
            json,
            export,
            output,
        } => {
            let input = analyze::AnalyzeInput { text, file };
            let export = export.map(|format| export::ExportTarget { format, output });
            analyze::cmd_analyze(&settings, input, stream, json, export).await
        }
        Commands::Image {
            path,
            instructions,
            json,
            export,
            output,
        } => {
            let export = export.map(|format| export::ExportTarget { format, output });
            image::cmd_image(&settings, &path, instructions.as_deref(), json, export).await
        }
        Commands::Export {
            format,
            input,
            output,
        } => export::cmd_export(input.as_deref(), &format, output.as_deref()).await,
        Commands::Recent { kind, sort } => recent::cmd_recent(kind, sort),
    }
}
