//! Spotcut CLI — Command-line interface for script-driven video assembly.
//!
//! Usage:
//!   spotcut assemble <SCRIPT>   Assemble a script into the final video
//!   spotcut stitch <DIR>        Stitch leftover sub-unit clips
//!   spotcut validate <SCRIPT>   Validate a script file
//!   spotcut probe <MEDIA>       Show media duration and streams
//!   spotcut check               Check tools and configuration

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "spotcut",
    about = "Script-driven advert assembly from synthesized voice and stock footage",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Assemble a script into the final video
    Assemble {
        /// Path to the script JSON file
        script: PathBuf,

        /// Output directory for clips and the final video
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Maximum concurrent transcodes (defaults to the core count)
        #[arg(long)]
        jobs: Option<usize>,

        /// Fail a whole scene when any of its sub-units fails
        #[arg(long)]
        strict: bool,

        /// Write the run manifest to this path as JSON
        #[arg(long)]
        report: Option<PathBuf>,
    },

    /// Stitch previously produced sub-unit clips into a final video
    Stitch {
        /// Directory holding sceneNNN_subNNN_av.mp4 clips
        dir: PathBuf,

        /// Output file path (defaults to final_video.mp4 in the directory)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Validate a script file
    Validate {
        /// Path to the script JSON file
        script: PathBuf,
    },

    /// Show duration and stream layout of a media file
    Probe {
        /// Path to the media file
        path: PathBuf,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check tools, configuration, and credentials
    Check {
        /// Write a default config file
        #[arg(long)]
        write_default_config: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    spotcut_common::logging::init_logging(&spotcut_common::LoggingConfig {
        level: log_level.to_string(),
        json: false,
    });

    match cli.command {
        Commands::Assemble {
            script,
            output_dir,
            jobs,
            strict,
            report,
        } => commands::assemble::run(script, output_dir, jobs, strict, report).await,
        Commands::Stitch { dir, output } => commands::stitch::run(dir, output).await,
        Commands::Validate { script } => commands::validate::run(script),
        Commands::Probe { path, json } => commands::probe::run(path, json).await,
        Commands::Check {
            write_default_config,
        } => commands::check::run(write_default_config),
    }
}
