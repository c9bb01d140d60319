//! Debate command - Run a debate and stream its transcript
//!
//! Usage:
//! ```bash
//! agon debate --topic "AI regulation"
//! agon debate -t "AI regulation" -r 2 --model-b grok-2-latest --json
//! ```

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use tokio::sync::watch;

use agon_core::{
    AgentConfig, Credential, EntryKind, Persona, Stance, TranscriptEntry, DEFAULT_ROUNDS,
    MAX_ROUNDS, MIN_ROUNDS,
};
use agon_debate::prompt::effective_persona;
use agon_debate::{SessionController, SessionOptions, SessionSnapshot, StartOutcome};
use agon_llm::{LlmConfig, ProviderRoute};

use crate::{print_error, print_success, print_warning};

/// Arguments for the debate command
#[derive(Args, Debug)]
pub struct DebateArgs {
    /// Motion to debate
    #[arg(long, short = 't')]
    topic: String,

    /// Number of rounds; each round is one turn per agent
    #[arg(
        long,
        short = 'r',
        default_value_t = DEFAULT_ROUNDS,
        value_parser = clap::value_parser!(u32).range(MIN_ROUNDS as i64..=MAX_ROUNDS as i64)
    )]
    rounds: u32,

    /// Display name of the proposition agent
    #[arg(long, default_value = "OpenAI Assistant")]
    name_a: String,

    /// Model of the proposition agent
    #[arg(long, default_value = "gpt-4o-mini")]
    model_a: String,

    #[arg(long, default_value_t = 0.7)]
    temperature_a: f32,

    #[arg(long, default_value_t = 1000)]
    max_tokens_a: u32,

    /// standard | unrestrained (honoured for grok models only)
    #[arg(long, default_value = "standard")]
    persona_a: Persona,

    /// API key for agent A (defaults to the key of the model's route)
    #[arg(long, env = "AGON_KEY_A", hide_env_values = true)]
    key_a: Option<String>,

    /// Display name of the opposition agent
    #[arg(long, default_value = "Grok Assistant")]
    name_b: String,

    /// Model of the opposition agent
    #[arg(long, default_value = "grok-2-latest")]
    model_b: String,

    #[arg(long, default_value_t = 0.7)]
    temperature_b: f32,

    #[arg(long, default_value_t = 1000)]
    max_tokens_b: u32,

    /// standard | unrestrained (honoured for grok models only)
    #[arg(long, default_value = "unrestrained")]
    persona_b: Persona,

    /// API key for agent B (defaults to the key of the model's route)
    #[arg(long, env = "AGON_KEY_B", hide_env_values = true)]
    key_b: Option<String>,

    /// Pause between turns, in milliseconds
    #[arg(long, default_value_t = 0)]
    turn_delay_ms: u64,

    /// Print the final session snapshot as JSON instead of the live transcript
    #[arg(long)]
    json: bool,
}

impl DebateArgs {
    /// Build both agents, filling missing keys from `config`
    fn agents(&self, config: &LlmConfig) -> (AgentConfig, AgentConfig) {
        let mut agent_a = AgentConfig::new(&self.name_a, &self.model_a, Stance::Proposition)
            .with_temperature(self.temperature_a)
            .with_max_tokens(self.max_tokens_a)
            .with_credential(resolve_credential(self.key_a.as_deref(), &self.model_a, config));
        agent_a.persona = Some(self.persona_a);

        let mut agent_b = AgentConfig::new(&self.name_b, &self.model_b, Stance::Opposition)
            .with_temperature(self.temperature_b)
            .with_max_tokens(self.max_tokens_b)
            .with_credential(resolve_credential(self.key_b.as_deref(), &self.model_b, config));
        agent_b.persona = Some(self.persona_b);

        (agent_a, agent_b)
    }
}

/// Explicit key first, then the environment key of the model's route
fn resolve_credential(explicit: Option<&str>, model: &str, config: &LlmConfig) -> Credential {
    explicit
        .map(Credential::new)
        .filter(Credential::is_present)
        .or_else(|| config.api_key_for(model).cloned())
        .unwrap_or_default()
}

/// Run the debate command
pub async fn run(args: DebateArgs) -> Result<()> {
    let config = LlmConfig::from_env();
    let (agent_a, agent_b) = args.agents(&config);
    tracing::debug!(
        openai = config.is_configured(ProviderRoute::Default),
        xai = config.is_configured(ProviderRoute::Alternate),
        "loaded provider credentials"
    );

    let controller = Arc::new(SessionController::with_options(
        Arc::new(config.router()),
        SessionOptions {
            turn_delay: Duration::from_millis(args.turn_delay_ms),
        },
    ));

    let cancel = controller.cancel_handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            print_warning("Stopping after the current turn...");
            cancel.cancel();
        }
    });

    let printer = if args.json {
        None
    } else {
        print_header(&args.topic, &agent_a, &agent_b, args.rounds);
        Some(tokio::spawn(print_live(controller.watch())))
    };

    let outcome = match controller.start(&args.topic, agent_a, agent_b, args.rounds).await {
        Ok(outcome) => outcome,
        Err(err) => {
            if let Some(printer) = printer {
                printer.abort();
            }
            if err.is_configuration() {
                print_warning(&format!(
                    "Pass --key-a/--key-b or set {} / {}",
                    ProviderRoute::Default.api_key_env(),
                    ProviderRoute::Alternate.api_key_env()
                ));
            }
            return Err(err).context("Debate could not start");
        }
    };

    if let Some(printer) = printer {
        printer.await.context("Transcript printer failed")?;
    }

    let snapshot = controller.snapshot().await;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    }

    match outcome {
        StartOutcome::Concluded => {
            if !args.json {
                print_success(&format!("Debate concluded after {} rounds", snapshot.rounds_planned));
            }
            Ok(())
        }
        StartOutcome::Errored | StartOutcome::Cancelled => {
            print_error(snapshot.last_error.as_deref().unwrap_or("Debate halted"));
            std::process::exit(1);
        }
    }
}

fn print_header(topic: &str, agent_a: &AgentConfig, agent_b: &AgentConfig, rounds: u32) {
    println!("{}", "⚔ Agon Debate".bold().cyan());
    println!("{}", "═".repeat(50).cyan());
    println!("  {} {}", "Motion:".dimmed(), topic.bold());
    println!("  {} {}", "Rounds:".dimmed(), rounds);
    for agent in [agent_a, agent_b] {
        println!(
            "  {} {} ({}, {}, {:?})",
            format!("{}:", agent.stance).dimmed(),
            agent.identity.green(),
            agent.model,
            ProviderRoute::for_model(&agent.model),
            effective_persona(agent)
        );
    }
    println!();
}

/// Print transcript entries as the controller publishes them
async fn print_live(mut updates: watch::Receiver<SessionSnapshot>) {
    let mut printed = 0;
    while updates.changed().await.is_ok() {
        let snapshot = updates.borrow_and_update().clone();
        for entry in &snapshot.transcript {
            if entry.seq() <= printed {
                continue;
            }
            print_entry(entry);
            printed = entry.seq();
        }
        if snapshot.state.is_finished() {
            break;
        }
    }
}

fn print_entry(entry: &TranscriptEntry) {
    match entry.kind() {
        EntryKind::SystemNotice { text } => println!("{} {}", "»".cyan(), text.italic()),
        EntryKind::AgentTurn { speaker, text } => {
            println!("{}", speaker.bold().yellow());
            println!("  {}", text);
        }
    }
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        args: DebateArgs,
    }

    fn parse(argv: &[&str]) -> Result<DebateArgs, clap::Error> {
        let mut full = vec!["agon"];
        full.extend_from_slice(argv);
        TestCli::try_parse_from(full).map(|cli| cli.args)
    }

    #[test]
    fn test_defaults_match_standard_matchup() {
        let args = parse(&["--topic", "AI regulation"]).unwrap();
        let (a, b) = args.agents(&LlmConfig::default());

        assert_eq!(args.rounds, DEFAULT_ROUNDS);
        assert_eq!(a.identity, "OpenAI Assistant");
        assert_eq!(a.model, "gpt-4o-mini");
        assert_eq!(a.stance, Stance::Proposition);
        assert_eq!(b.identity, "Grok Assistant");
        assert_eq!(b.model, "grok-2-latest");
        assert_eq!(b.stance, Stance::Opposition);
        assert_eq!(b.persona, Some(Persona::Unrestrained));
        assert_eq!((a.temperature, a.max_tokens), (0.7, 1000));
    }

    #[test]
    fn test_rounds_outside_range_rejected() {
        assert!(parse(&["--topic", "t", "--rounds", "0"]).is_err());
        assert!(parse(&["--topic", "t", "--rounds", "11"]).is_err());
        assert_eq!(parse(&["--topic", "t", "-r", "10"]).unwrap().rounds, 10);
    }

    #[test]
    fn test_keys_fall_back_to_route_credentials() {
        let config = LlmConfig {
            openai_api_key: Some(Credential::new("sk-env")),
            xai_api_key: Some(Credential::new("xai-env")),
            ..LlmConfig::default()
        };
        let args = parse(&["--topic", "t"]).unwrap();
        let (a, b) = args.agents(&config);
        assert_eq!(a.credential.expose(), "sk-env");
        assert_eq!(b.credential.expose(), "xai-env");

        let args = parse(&["--topic", "t", "--key-a", "sk-flag"]).unwrap();
        let (a, _) = args.agents(&config);
        assert_eq!(a.credential.expose(), "sk-flag");
    }

    #[test]
    fn test_missing_keys_fail_validation() {
        let args = parse(&["--topic", "t"]).unwrap();
        let (a, b) = args.agents(&LlmConfig::default());
        assert!(a.validate().is_err());
        assert!(b.validate().is_err());
    }

    #[test]
    fn test_persona_flag_parses() {
        let args = parse(&["--topic", "t", "--persona-b", "standard", "--persona-a", "unhinged"]).unwrap();
        let (a, b) = args.agents(&LlmConfig::default());
        assert_eq!(a.persona, Some(Persona::Unrestrained));
        assert_eq!(b.persona, Some(Persona::Standard));
        // gpt models never get the unrestrained register
        assert_eq!(effective_persona(&a), Persona::Standard);
    }
}
