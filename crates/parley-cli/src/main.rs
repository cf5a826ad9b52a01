//! Interactive reference client for the parley session engine.
//!
//! Drives a session against a canned response backend so the token
//! reveal, the quota gate, and the failure handling can be observed
//! from a terminal. This binary plays the role of the UI collaborator:
//! it only submits text and renders snapshots.

use std::io::Write as _;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use clap::Parser;
use colored::Colorize;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use parley_core::config::EngineConfig;
use parley_engine::{
    GenerationError, RegistrationGate, ResponseGenerator, SessionController, SubmitOutcome,
};

#[derive(Parser)]
#[command(name = "parley")]
#[command(about = "Interactive client for the parley session engine", long_about = None)]
struct Cli {
    /// Path to a TOML engine configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the free message limit
    #[arg(long)]
    limit: Option<u32>,
}

/// Demo backend: replays a canned summary after a short delay.
///
/// Submitting the literal word `fail` makes it reject, to exercise the
/// failure path.
struct CannedGenerator;

#[async_trait]
impl ResponseGenerator for CannedGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        tokio::time::sleep(Duration::from_millis(400)).await;
        if prompt.trim().eq_ignore_ascii_case("fail") {
            return Err(GenerationError::new("canned backend failure"));
        }
        Ok(format!(
            "Here's what I can tell you about \"{prompt}\": this demo backend replays \
             a canned summary so you can watch the incremental reveal, the quota gate, \
             and the failure handling in action."
        ))
    }
}

/// Demo registration gate: prints a banner instead of opening a modal.
struct ConsoleGate;

#[async_trait]
impl RegistrationGate for ConsoleGate {
    async fn open(&self) {
        println!();
        println!(
            "{}",
            "== Create a free account to keep chatting ==".yellow().bold()
        );
    }
}

fn load_config(cli: &Cli) -> Result<EngineConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("reading config file {}", path.display()))?;
            EngineConfig::from_toml_str(&raw)?
        }
        None => EngineConfig::default(),
    };
    if let Some(limit) = cli.limit {
        config.message_limit = limit;
    }
    Ok(config)
}

/// Polls snapshots until the stream settles, redrawing the assistant
/// line as the pending message grows.
async fn render_stream(controller: &SessionController) {
    let mut drawn = 0usize;
    loop {
        let snapshot = controller.snapshot().await;
        let line = if snapshot.is_requesting {
            "thinking...".dimmed().to_string()
        } else if let Some(pending) = snapshot.messages.last().filter(|m| m.pending) {
            pending.content.clone()
        } else if controller.is_idle().await {
            let content = snapshot
                .messages
                .iter()
                .rev()
                .find(|m| !m.pending && m.role == parley_core::session::MessageRole::Assistant)
                .map(|m| m.content.clone())
                .unwrap_or_default();
            redraw(&format!("{} {}", "assistant>".green(), content), &mut drawn);
            println!();
            return;
        } else {
            String::new()
        };
        redraw(&format!("{} {}", "assistant>".green(), line), &mut drawn);
        tokio::time::sleep(Duration::from_millis(30)).await;
    }
}

fn redraw(line: &str, drawn: &mut usize) {
    // Pad with spaces so a shorter line fully overwrites a longer one.
    let pad = drawn.saturating_sub(line.len());
    print!("\r{line}{}", " ".repeat(pad));
    let _ = std::io::stdout().flush();
    *drawn = line.len();
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;

    println!("{}", "parley demo session".bold());
    println!(
        "free messages: {}  (type '/new' to start over, '/quit' to exit, 'fail' to see the failure path)",
        config.message_limit
    );

    let controller = SessionController::new(config, Arc::new(CannedGenerator), Arc::new(ConsoleGate));
    let mut editor = DefaultEditor::new()?;

    loop {
        let line = match editor.readline("you> ") {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(err) => return Err(err.into()),
        };
        let _ = editor.add_history_entry(line.as_str());

        match line.trim() {
            "/quit" => break,
            "/new" => {
                controller.reset().await?;
                println!("{}", "started a new conversation".dimmed());
                continue;
            }
            _ => {}
        }

        match controller.submit(line).await? {
            SubmitOutcome::Ignored => continue,
            SubmitOutcome::Blocked => {
                let snapshot = controller.snapshot().await;
                if let Some(notice) = snapshot.messages.last() {
                    println!("{} {}", "assistant>".green(), notice.content.as_str().yellow());
                }
                controller.wait_for_registration_gate().await;
            }
            SubmitOutcome::Accepted => {
                render_stream(&controller).await;
            }
        }
    }

    Ok(())
}
