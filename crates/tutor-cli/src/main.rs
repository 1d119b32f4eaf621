//! REPL front end for the tutor.
//!
//! This is the presentation layer: it submits free text or an image path,
//! renders the role-tagged transcript, and offers the solution action only
//! while one is pending. It owns the single session for the process run.

use std::fs;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing_subscriber::EnvFilter;

use tutor_application::{SessionReply, TutorSession};
use tutor_core::config::TutorConfig;
use tutor_core::session::{ConversationEntry, EntryRole};
use tutor_interaction::GeminiGateway;

#[derive(Parser)]
#[command(name = "tutor")]
#[command(about = "AI Tutor - ask questions, get hints, learn better", long_about = None)]
struct Cli {
    /// Override the configured model name
    #[arg(long)]
    model: Option<String>,

    /// Override the gateway request timeout in seconds
    #[arg(long)]
    timeout_secs: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    // Missing or invalid configuration is startup-fatal.
    let mut config = TutorConfig::load().context("could not load configuration")?;
    if let Some(model) = cli.model {
        config.model = model;
    }
    if let Some(secs) = cli.timeout_secs {
        config.timeout_secs = secs;
    }

    let model = config.model.clone();
    let gateway = Arc::new(GeminiGateway::new(&config)?);
    let mut session = TutorSession::new(gateway);

    // ===== REPL Setup =====
    let mut rl = DefaultEditor::new()?;

    println!("{}", "=== AI Tutor ===".bright_magenta().bold());
    println!(
        "{}",
        format!(
            "Ask a question, or use '/image <path>' to upload a problem. Type 'quit' to exit. \
             (model: {model})"
        )
        .bright_black()
    );
    println!();
    println!(
        "{}",
        "Welcome! I'm here to help you learn. Ask a question to start.".bright_blue()
    );
    println!();

    // ===== Main REPL Loop =====
    loop {
        let readline = rl.readline(">> ");

        match readline {
            Ok(line) => {
                let trimmed = line.trim();

                if trimmed == "quit" || trimmed == "exit" {
                    println!("{}", "Goodbye!".bright_green());
                    break;
                }

                if trimmed.is_empty() {
                    continue;
                }

                let _ = rl.add_history_entry(&line);

                if let Err(err) = handle_input(&mut session, trimmed).await {
                    eprintln!("{}", format!("Error: {err}").red());
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type 'quit' to exit.".yellow());
            }
            Err(ReadlineError::Eof) => {
                println!("{}", "CTRL-D detected. Exiting...".bright_green());
                break;
            }
            Err(err) => {
                eprintln!("{}", format!("Error: {err:?}").red());
                break;
            }
        }
    }

    Ok(())
}

/// Dispatches one line of user input against the session.
async fn handle_input(session: &mut TutorSession, input: &str) -> Result<()> {
    let reply = if input == "/history" {
        render_transcript(session);
        return Ok(());
    } else if input == "/solution" {
        if !session.solution_available() {
            println!(
                "{}",
                "There is no solution pending. Ask a math question first.".bright_black()
            );
            return Ok(());
        }
        println!("{}", "Working on the solution...".bright_black());
        session.request_solution().await?
    } else if let Some(path) = input.strip_prefix("/image ") {
        let path = path.trim();
        let bytes = fs::read(path).with_context(|| format!("could not read image {path}"))?;
        println!("{}", "Reading the image...".bright_black());
        session.submit_image(bytes).await?
    } else {
        println!("{}", "Thinking...".bright_black());
        session.submit_question(input).await?
    };

    render_reply(&reply);
    Ok(())
}

/// Renders the outcome of one session action.
fn render_reply(reply: &SessionReply) {
    match reply {
        SessionReply::Exchange {
            student,
            tutor,
            solution_available,
            restarted,
            ..
        } => {
            if *restarted {
                println!("{}", "(previous exchange cleared)".bright_black());
            }
            render_entry(student);
            render_entry(tutor);
            if *solution_available {
                println!(
                    "{}",
                    "Need more help? Those were hints - type '/solution' for the complete \
                     step-by-step solution."
                        .bright_yellow()
                );
                println!();
            }
        }
        SessionReply::Solution(entry) => render_entry(entry),
    }
}

/// Re-renders the whole transcript.
fn render_transcript(session: &TutorSession) {
    if session.history().is_empty() {
        println!("{}", "Nothing here yet - ask a question to start.".bright_black());
        return;
    }
    for entry in session.history() {
        render_entry(entry);
    }
}

fn render_entry(entry: &ConversationEntry) {
    let label = format!("[{}]", entry.role);
    match entry.role {
        EntryRole::Student => println!("{}", label.green()),
        EntryRole::Tutor => println!("{}", label.bright_magenta()),
        EntryRole::TutorSolution => println!("{}", label.bright_yellow()),
    }
    for line in entry.text.lines() {
        println!("{}", line.bright_blue());
    }
    println!(); // Add spacing between entries
}
