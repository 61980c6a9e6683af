//! ATS interviewer: conversational candidate evaluation from the terminal

use ats_interviewer::cli::{self, Cli, Commands, ConfigAction};
use ats_interviewer::config::{Config, OutputFormat};
use ats_interviewer::conversation::evaluation;
use ats_interviewer::conversation::{ChatResult, ConversationEngine, PromptingAnswers, Step};
use ats_interviewer::error::{InterviewerError, Result};
use ats_interviewer::input::message_assembler::BLOCK_TERMINATOR;
use ats_interviewer::input::{DocumentKind, DocumentLoader, MessageAssembler};
use ats_interviewer::output::ChatRenderer;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info, warn};
use std::path::{Path, PathBuf};
use std::process;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use uuid::Uuid;

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    // Load configuration
    let loaded = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    // Execute command
    if let Err(e) = run_command(cli.command, config, cli.config, cli.verbose).await {
        error!("Command failed: {}", e);
        process::exit(1);
    }
}

async fn run_command(
    command: Commands,
    config: Config,
    config_file: Option<PathBuf>,
    verbose: bool,
) -> Result<()> {
    match command {
        Commands::Chat { session, output } => {
            let format = output_format(output.as_deref(), &config)?;
            let session_id = session.unwrap_or_else(|| Uuid::new_v4().to_string());
            run_chat(config, &session_id, format, verbose).await
        }

        Commands::Evaluate {
            cv,
            job,
            answers,
            detailed,
            output,
        } => {
            let format = output_format(output.as_deref(), &config)?;
            run_evaluation(config, &cv, &job, answers.as_deref(), detailed, format).await
        }

        Commands::Config { action } => {
            let path = config_file.unwrap_or_else(Config::config_path);
            match action {
                Some(ConfigAction::Show) | None => {
                    println!("⚙️  Current Configuration ({})\n", path.display());
                    let content = toml::to_string_pretty(&config).map_err(|e| {
                        InterviewerError::Configuration(format!("Failed to serialize config: {}", e))
                    })?;
                    println!("{}", content);
                }

                Some(ConfigAction::Reset) => {
                    println!("🔄 Resetting configuration to defaults...");
                    Config::default().save_to(&path)?;
                    println!("✅ Configuration reset successfully!");
                }

                Some(ConfigAction::Path) => {
                    println!("{}", path.display());
                }
            }
            Ok(())
        }
    }
}

fn output_format(requested: Option<&str>, config: &Config) -> Result<OutputFormat> {
    match requested {
        Some(format) => cli::parse_output_format(format).map_err(InterviewerError::InvalidInput),
        None => Ok(config.output.format),
    }
}

async fn run_chat(config: Config, session_id: &str, format: OutputFormat, verbose: bool) -> Result<()> {
    let typing_delay = config.output.typing_delay_ms;
    let renderer = ChatRenderer::with_options(config.output.color_output, verbose, true);
    let engine = ConversationEngine::new(config)?;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut assembler = MessageAssembler::new();
    let mut last: Option<ChatResult> = None;

    info!("Chat session {}", session_id);
    if format == OutputFormat::Console {
        println!("💬 Session {} ('quit' pour quitter)", session_id);
        println!("👋 Dites 'Bonjour' pour commencer.\n");
    }

    loop {
        let message = match lines.next_line().await? {
            Some(line) => {
                let input = line.trim();
                let block_mode = last.as_ref().map_or(false, expects_document);

                if !assembler.is_collecting() {
                    if matches!(input, "quit" | "exit" | "/quit") {
                        break;
                    }
                    // Quick-reply numbers are answered immediately, even while a document is expected
                    if let Some(previous) = &last {
                        let resolved = ChatRenderer::resolve_quick_reply(previous, input);
                        if resolved != input {
                            Some(resolved.to_string())
                        } else {
                            assembler.push(&line, block_mode)
                        }
                    } else {
                        assembler.push(&line, block_mode)
                    }
                } else {
                    assembler.push(&line, block_mode)
                }
            }
            None => match assembler.flush() {
                Some(rest) => Some(rest),
                None => break,
            },
        };

        let Some(message) = message else {
            continue;
        };

        let result = match engine.send_message(session_id, &message).await {
            Ok(result) => result,
            Err(e) if e.is_client_error() => {
                warn!("Message rejected: {}", e);
                continue;
            }
            Err(e) => return Err(e),
        };

        if result.typing && format == OutputFormat::Console {
            simulate_typing(typing_delay).await;
        }
        println!("{}", renderer.render(&result, &format)?);
        if format == OutputFormat::Console && expects_document(&result) {
            println!("(Collez le texte puis terminez par une ligne vide ou '{}')", BLOCK_TERMINATOR);
        }
        last = Some(result);
    }

    engine.end_session(session_id).await
}

/// Steps where the next input is a pasted, possibly multi-line document
fn expects_document(result: &ChatResult) -> bool {
    matches!(result.step, Step::CollectingCv | Step::CollectingJob)
}

async fn run_evaluation(
    config: Config,
    cv: &Path,
    job: &Path,
    answers: Option<&Path>,
    detailed: bool,
    format: OutputFormat,
) -> Result<()> {
    cli::validate_file_extension(cv, &DocumentKind::EXTENSIONS)
        .map_err(|e| InterviewerError::InvalidInput(format!("CV file: {}", e)))?;
    cli::validate_file_extension(job, &DocumentKind::EXTENSIONS)
        .map_err(|e| InterviewerError::InvalidInput(format!("Job description file: {}", e)))?;

    let mut loader = DocumentLoader::new();
    let cv_text = loader.load(cv).await?;
    let job_text = loader.load(job).await?;

    let prepared = match answers {
        Some(path) => tokio::fs::read_to_string(path)
            .await?
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect::<Vec<_>>(),
        None => Vec::new(),
    };

    let use_colors = config.output.color_output;
    let engine = ConversationEngine::new(config)?;
    let session_id = Uuid::new_v4().to_string();

    // Prompts go to stderr so stdout carries only the transcript
    let mut prompter = PromptingAnswers::new(
        prepared,
        BufReader::new(tokio::io::stdin()),
        std::io::stderr(),
        ChatRenderer::with_options(use_colors, false, true),
    );
    let transcript = evaluation::run_evaluation(
        &engine,
        &session_id,
        &cv_text,
        &job_text,
        detailed,
        &mut prompter,
    )
    .await
    .map_err(|e| match e {
        InterviewerError::InvalidInput(reason) => InterviewerError::InvalidInput(format!(
            "{} ({} / {})",
            reason,
            cv.display(),
            job.display()
        )),
        other => other,
    })?;

    let renderer = ChatRenderer::with_options(use_colors, false, true);
    evaluation::write_transcript(&mut std::io::stdout().lock(), &transcript, &format, &renderer)?;

    engine.end_session(&session_id).await
}

async fn simulate_typing(delay_ms: u64) {
    if delay_ms == 0 {
        return;
    }

    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.blue} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message("ATS Assistant écrit...");
    spinner.enable_steady_tick(Duration::from_millis(80));
    tokio::time::sleep(Duration::from_millis(delay_ms)).await;
    spinner.finish_and_clear();
}
