//! Vitalis Health & Wellness Session Router: Demo CLI
//!
//! Runs the reference wellness conversations, or opens an interactive chat
//! against the same orchestrator. The language model is replaced by a
//! scripted runner and a keyword judge, so everything runs offline.
//!
//! Usage:
//!   cargo run -p demo -- run-all
//!   cargo run -p demo -- onboarding
//!   cargo run -p demo -- chat
//!   cargo run -p demo -- --config vitalis.toml chat

mod config;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use tracing_subscriber::EnvFilter;

use vitalis_contracts::{
    conversation::ConversationId,
    error::{VitalisError, VitalisResult},
};
use vitalis_ref_wellness::{
    scenarios::{self, injury_support, nutrition_handoff, off_topic, onboarding, session_start},
    wellness_orchestrator,
};

use crate::config::DemoConfig;

// ── CLI definition ────────────────────────────────────────────────────────────

/// Vitalis: multi-agent health and wellness session router demo.
#[derive(Parser)]
#[command(
    name = "demo",
    about = "Vitalis health and wellness session router demo",
    long_about = "Runs Vitalis wellness conversations showing guardrail refusals,\n\
                  agent handoffs, tool calls, and per-turn context updates."
)]
struct Cli {
    /// TOML file with optional [orchestrator] and [guardrails] tables.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run all five wellness scenarios in sequence.
    RunAll,
    /// Scenario 1: empty message opens a conversation.
    SessionStart,
    /// Scenario 2: greeting, name, and goal.
    Onboarding,
    /// Scenario 3: planner hands off to the Nutrition Expert and back.
    NutritionHandoff,
    /// Scenario 4: injury report routes to Injury Support.
    InjurySupport,
    /// Scenario 5: an off-topic question is refused.
    OffTopic,
    /// Chat with the planner on stdin. An empty line or EOF ends the session.
    Chat,
    /// Print the liveness probe as JSON.
    Health,
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() {
    // Initialize structured logging.  Set RUST_LOG=debug for verbose output.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    let result = match DemoConfig::load(cli.config.as_deref()) {
        Ok(config) => dispatch(cli.command, config).await,
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        eprintln!("Demo error: {}", e);
        std::process::exit(1);
    }
}

async fn dispatch(command: Command, config: DemoConfig) -> VitalisResult<()> {
    match command {
        Command::RunAll => {
            print_banner();
            run_all(&config).await?;
            println!("All selected scenarios completed successfully.");
            Ok(())
        }
        Command::SessionStart => {
            session_start::run_scenario(&config.orchestrator, &config.guardrails).await
        }
        Command::Onboarding => onboarding::run_scenario(&config.orchestrator, &config.guardrails).await,
        Command::NutritionHandoff => {
            nutrition_handoff::run_scenario(&config.orchestrator, &config.guardrails).await
        }
        Command::InjurySupport => {
            injury_support::run_scenario(&config.orchestrator, &config.guardrails).await
        }
        Command::OffTopic => off_topic::run_scenario(&config.orchestrator, &config.guardrails).await,
        Command::Chat => chat(config).await,
        Command::Health => {
            let orchestrator = wellness_orchestrator(config.orchestrator, config.guardrails)?;
            let body = serde_json::to_string_pretty(&orchestrator.health())
                .map_err(|e| VitalisError::ConfigError { reason: e.to_string() })?;
            println!("{}", body);
            Ok(())
        }
    }
}

// ── Scenario dispatch ─────────────────────────────────────────────────────────

async fn run_all(config: &DemoConfig) -> VitalisResult<()> {
    let DemoConfig { orchestrator, guardrails } = config;
    session_start::run_scenario(orchestrator, guardrails).await?;
    onboarding::run_scenario(orchestrator, guardrails).await?;
    nutrition_handoff::run_scenario(orchestrator, guardrails).await?;
    injury_support::run_scenario(orchestrator, guardrails).await?;
    off_topic::run_scenario(orchestrator, guardrails).await?;
    Ok(())
}

// ── Interactive chat ──────────────────────────────────────────────────────────

async fn chat(config: DemoConfig) -> VitalisResult<()> {
    let orchestrator = wellness_orchestrator(config.orchestrator, config.guardrails)?;

    let opened = orchestrator.submit_turn(None, "").await?;
    let mut conversation: ConversationId = opened.result().conversation_id.clone();
    info!(conversation_id = %conversation, "chat session opened");
    println!("Conversation {} with {}.", conversation, opened.result().current_agent);
    println!("Type a message; an empty line ends the session.");
    println!();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = lines.next_line().await.map_err(|source| VitalisError::Io {
            action: "reading stdin".to_string(),
            source,
        })?;
        let Some(line) = line else { break };
        if line.trim().is_empty() {
            break;
        }

        let outcome = orchestrator.submit_turn(Some(conversation.as_str()), &line).await?;
        scenarios::print_outcome(&line, &outcome);
        conversation = outcome.result().conversation_id.clone();
    }

    println!("Session {} closed.", conversation);
    Ok(())
}

// ── Banner ────────────────────────────────────────────────────────────────────

fn print_banner() {
    println!();
    println!("Vitalis — Health & Wellness Session Router");
    println!("Reference Wellness Demo");
    println!("==========================================");
    println!();
    println!("Per turn:");
    println!("  [1] Load the conversation (or open a new one on the root agent)");
    println!("  [2] Input guardrails of the active agent judge the message");
    println!("  [3] A refusal ends the turn; the agent never runs");
    println!("  [4] Agent runs: replies, tool calls, handoffs become the event trail");
    println!("  [5] Context changes are reported, then state is saved");
    println!();
}
