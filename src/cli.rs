//! CLI interface for the interviewer

use crate::config::OutputFormat;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "ats-interviewer")]
#[command(about = "Conversational candidate evaluation: CV analysis, job matching and interview")]
#[command(long_about = "Walk a candidate through CV analysis, job matching and a short personalised interview, then produce a scored report")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Chat with the assistant, one message per line
    Chat {
        /// Session identifier (a random one is generated when omitted)
        #[arg(short, long)]
        session: Option<String>,

        /// Output format: console, json
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Run a whole evaluation from files
    Evaluate {
        /// Path to CV file (PDF, TXT, MD)
        #[arg(long)]
        cv: PathBuf,

        /// Path to job description file (PDF, TXT, MD)
        #[arg(short, long)]
        job: PathBuf,

        /// Answers to the interview questions, one per line (prompted on stdin when omitted)
        #[arg(short, long)]
        answers: Option<PathBuf>,

        /// Also print the detailed report
        #[arg(short, long)]
        detailed: bool,

        /// Output format: console, json
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Show configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Reset configuration to defaults
    Reset,

    /// Print the configuration file location
    Path,
}

/// Parse and validate output format
pub fn parse_output_format(format: &str) -> Result<OutputFormat, String> {
    match format.to_lowercase().as_str() {
        "console" => Ok(OutputFormat::Console),
        "json" => Ok(OutputFormat::Json),
        _ => Err(format!("Invalid output format: {}. Supported: console, json", format)),
    }
}

/// Validate file extension
pub fn validate_file_extension(path: &Path, allowed_extensions: &[&str]) -> Result<(), String> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) => {
            if allowed_extensions.contains(&ext.to_lowercase().as_str()) {
                Ok(())
            } else {
                Err(format!(
                    "Unsupported file extension: .{}. Allowed: {}",
                    ext,
                    allowed_extensions.join(", ")
                ))
            }
        }
        None => Err("File has no extension".to_string()),
    }
}
