//! Turing CLI - Chat, spotlight and memory management
//!
//! Talks to a running `turingd`. Model settings are written to the daemon's
//! config file and take effect on its next start.

mod api;
mod config;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use dialoguer::{Confirm, Input};
use std::io::Write;

use api::TuringClient;
use config::Config;
use turing::models::TurnEvent;
use turing::{TuringConfig, TurnPhase};

#[derive(Parser)]
#[command(name = "turing")]
#[command(about = "Turing CLI - Local assistant with memory", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive chat (type 'exit' or 'quit' to leave)
    Chat {
        /// Session to use (overrides default)
        #[arg(short, long)]
        session: Option<String>,
        /// Never append file listings to messages
        #[arg(long)]
        no_injection: bool,
    },

    /// Send a single message and stream the reply
    Ask {
        message: String,
        #[arg(short, long)]
        session: Option<String>,
        #[arg(long)]
        no_injection: bool,
    },

    /// Quick memory-free question
    Spotlight {
        prompt: String,
        /// Wait for the full answer instead of streaming
        #[arg(long)]
        no_stream: bool,
    },

    /// Explain a file or folder
    Inspect {
        /// Path to a file or folder
        path: String,
    },

    /// Memory operations
    Memory {
        #[command(subcommand)]
        action: MemoryAction,
    },

    /// Daemon model settings
    Model {
        #[command(subcommand)]
        action: ModelAction,
    },

    /// Check that the daemon is up
    Status,

    /// Show or change CLI configuration
    Config {
        /// Daemon URL
        #[arg(long)]
        url: Option<String>,
        /// Default session
        #[arg(long)]
        session: Option<String>,
    },
}

#[derive(Subcommand)]
enum MemoryAction {
    /// Show session history, oldest first
    List {
        #[arg(short, long)]
        session: Option<String>,
        /// Max records (most recent kept)
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },
    /// Search memories
    Search {
        /// Search query
        query: String,
        /// Max results
        #[arg(short, long, default_value = "5")]
        limit: usize,
        #[arg(short, long)]
        session: Option<String>,
    },
    /// Destroy all memories in every session
    Wipe {
        /// Skip confirmation
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum ModelAction {
    /// Show the configured model
    Show,
    /// Change model and/or temperature
    Set {
        /// Model tag, e.g. "qwen2.5:1.5b" or "llama3"
        #[arg(short, long)]
        model: Option<String>,
        /// Sampling temperature (0.0-2.0)
        #[arg(short, long)]
        temperature: Option<f32>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Chat {
            session,
            no_injection,
        } => cmd_chat(session, no_injection).await,
        Commands::Ask {
            message,
            session,
            no_injection,
        } => cmd_ask(message, session, no_injection).await,
        Commands::Spotlight { prompt, no_stream } => cmd_spotlight(prompt, no_stream).await,
        Commands::Inspect { path } => cmd_inspect(path).await,
        Commands::Memory { action } => cmd_memory(action).await,
        Commands::Model { action } => cmd_model(action),
        Commands::Status => cmd_status().await,
        Commands::Config { url, session } => cmd_config(url, session),
    }
}

// ============================================
// Command Implementations
// ============================================

async fn cmd_chat(session: Option<String>, no_injection: bool) -> Result<()> {
    let config = Config::load()?;
    let session = config.session(session.as_deref());
    let client = TuringClient::new(&config.base_url);

    println!(
        "{} session {} {}",
        "Turing".cyan().bold(),
        session.cyan(),
        "(exit/quit to leave)".dimmed()
    );

    loop {
        let message: String = Input::new()
            .with_prompt("you".green().to_string())
            .interact_text()
            .context("Failed to read input")?;

        if is_exit(&message) {
            break;
        }

        print!("{} ", "turing:".cyan());
        flush();
        if let Err(e) = client
            .turn(&session, &message, no_injection, render_event)
            .await
        {
            eprintln!("\n{} {}", "✗".red(), e);
        }
    }

    Ok(())
}

async fn cmd_ask(message: String, session: Option<String>, no_injection: bool) -> Result<()> {
    let config = Config::load()?;
    let session = config.session(session.as_deref());
    let client = TuringClient::new(&config.base_url);

    client
        .turn(&session, &message, no_injection, render_event)
        .await
}

async fn cmd_spotlight(prompt: String, no_stream: bool) -> Result<()> {
    let config = Config::load()?;
    let client = TuringClient::new(&config.base_url);

    if no_stream {
        let resp = client.generate(&prompt).await?;
        println!("{}", resp.response);
        eprintln!("{}", format!("({})", resp.model).dimmed());
        return Ok(());
    }

    client.stream(&prompt, render_event).await
}

async fn cmd_inspect(path: String) -> Result<()> {
    let config = Config::load()?;
    let client = TuringClient::new(&config.base_url);

    // the daemon resolves paths from its own working directory
    let absolute = std::fs::canonicalize(&path)
        .with_context(|| format!("Cannot resolve path: {}", path))?;
    let absolute = absolute.to_string_lossy();

    eprintln!("{} {}", "Inspecting".dimmed(), absolute.cyan());
    client.inspect(&absolute, render_event).await
}

async fn cmd_memory(action: MemoryAction) -> Result<()> {
    let config = Config::load()?;
    let client = TuringClient::new(&config.base_url);

    match action {
        MemoryAction::List { session, limit } => {
            let session = config.session(session.as_deref());
            let records = client.history(&session, limit).await?;

            if records.is_empty() {
                println!("No memories in session '{}'", session);
                return Ok(());
            }

            println!("{} ({}):", "History".bold(), session.cyan());
            for record in records {
                println!(
                    "  {} {} {}",
                    record.timestamp.format("%Y-%m-%d %H:%M").to_string().dimmed(),
                    role_badge(record.role.label()),
                    truncate_string(&record.text, 70)
                );
            }
        }

        MemoryAction::Search {
            query,
            limit,
            session,
        } => {
            let session = config.session(session.as_deref());
            let memories = client
                .search_memories(&session, &query, Some(limit))
                .await?;

            if memories.is_empty() {
                println!("No memories found for '{}'", query);
                return Ok(());
            }

            println!(
                "{} results for '{}' ({}):",
                memories.len().to_string().green(),
                query,
                session.cyan()
            );

            for mem in memories {
                let distance = mem
                    .distance
                    .map(|d| format!("{:.3}", d))
                    .unwrap_or_else(|| "-".to_string());
                println!(
                    "  {} {} {}",
                    format!("[{}]", distance).dimmed(),
                    role_badge(mem.role.label()),
                    truncate_string(&mem.text, 60)
                );
            }
        }

        MemoryAction::Wipe { yes } => {
            let confirmed = yes
                || Confirm::new()
                    .with_prompt("Wipe ALL memories in every session? This cannot be undone")
                    .default(false)
                    .interact()
                    .context("Failed to read confirmation")?;

            if !confirmed {
                println!("Aborted.");
                return Ok(());
            }

            let resp = client.wipe().await?;
            println!("{} Memory wiped ({} records removed)", "✓".green(), resp.removed);
        }
    }

    Ok(())
}

fn cmd_model(action: ModelAction) -> Result<()> {
    let path = TuringConfig::config_path()?;
    let mut daemon = TuringConfig::read_file(&path)?;

    match action {
        ModelAction::Show => {
            println!("{}", "Model:".bold());
            println!("  Path: {:?}", path);
            println!("  Active LLM: {}", daemon.model.active_llm.cyan());
            println!("  Temperature: {}", daemon.model.temperature);
            println!("  Service: {}", daemon.service.base_url);
        }

        ModelAction::Set { model, temperature } => {
            if model.is_none() && temperature.is_none() {
                bail!("Nothing to change. Use --model and/or --temperature");
            }
            if let Some(model) = model {
                daemon.model.active_llm = model;
            }
            if let Some(temperature) = temperature {
                daemon.model.temperature = temperature;
            }
            daemon.validate()?;

            let saved = daemon.save(Some(&path))?;
            println!(
                "{} Model set to {} (temperature {}) in {:?}",
                "✓".green(),
                daemon.model.active_llm.cyan(),
                daemon.model.temperature,
                saved
            );
            println!("{}", "Restart turingd to apply.".yellow());
        }
    }

    Ok(())
}

async fn cmd_status() -> Result<()> {
    let config = Config::load()?;
    let client = TuringClient::new(&config.base_url);

    print!("Checking {}... ", config.base_url);
    flush();
    match client.health().await {
        Ok(true) => println!("{}", "OK".green()),
        _ => {
            println!("{}", "Failed".red());
            bail!("Turing daemon is not reachable. Start it with 'turingd'.");
        }
    }

    Ok(())
}

fn cmd_config(url: Option<String>, session: Option<String>) -> Result<()> {
    let mut config = Config::load()?;

    if url.is_some() || session.is_some() {
        if let Some(url) = url {
            config.base_url = url;
        }
        if let Some(session) = session {
            config.default_session = session;
        }
        config.save()?;
        println!("{} Configuration saved", "✓".green());
    }

    println!("{}", "Configuration:".bold());
    println!("  Path: {:?}", Config::config_path()?);
    println!("  Base URL: {}", config.base_url);
    println!("  Default Session: {}", config.default_session.cyan());

    Ok(())
}

// ============================================
// Rendering
// ============================================

fn render_event(event: TurnEvent) {
    match event {
        TurnEvent::Fragment { text } => {
            print!("{}", text);
            flush();
        }
        TurnEvent::Done { outcome } => {
            println!();
            if let Some(outcome) = outcome {
                if outcome.phase == TurnPhase::Failed {
                    eprintln!("{}", "Generation failed; reply stored as received.".red());
                }
                for warning in outcome.persistence_warnings {
                    eprintln!("{} {}", "⚠".yellow(), warning.dimmed());
                }
            }
        }
        TurnEvent::Error { message } => {
            eprintln!("\n{} {}", "✗".red(), message);
        }
    }
}

fn role_badge(label: &str) -> colored::ColoredString {
    match label {
        "USER" => label.green(),
        _ => label.cyan(),
    }
}

fn is_exit(input: &str) -> bool {
    matches!(input.trim().to_lowercase().as_str(), "exit" | "quit")
}

fn flush() {
    let _ = std::io::stdout().flush();
}

/// Truncate string safely for UTF-8 (by char count, not bytes)
fn truncate_string(s: &str, max_chars: usize) -> String {
    let chars: Vec<char> = s.chars().take(max_chars).collect();
    if s.chars().count() > max_chars {
        format!("{}...", chars.into_iter().collect::<String>())
    } else {
        s.to_string()
    }
}
