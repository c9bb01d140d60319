//! Routes command - Show which endpoint serves which models
//!
//! Usage:
//! ```bash
//! agon routes
//! agon routes --json
//! ```

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, Cell, Color, Table};
use serde_json::json;

use agon_llm::{LlmConfig, ProviderRoute, ROUTES};

/// Arguments for the routes command
#[derive(Args)]
pub struct RoutesArgs {
    /// Output JSON instead of a table
    #[arg(long)]
    json: bool,
}

/// Model prefixes served by `route`, or a catch-all label
fn prefixes(route: ProviderRoute) -> String {
    let listed: Vec<String> = ROUTES
        .iter()
        .filter(|(_, r)| *r == route)
        .map(|(prefix, _)| format!("{}*", prefix))
        .collect();

    if listed.is_empty() {
        "(any other model)".to_string()
    } else {
        listed.join(", ")
    }
}

/// Run the routes command
pub fn run(args: RoutesArgs) -> Result<()> {
    let config = LlmConfig::from_env();

    if args.json {
        let routes: Vec<_> = ProviderRoute::all()
            .into_iter()
            .map(|route| {
                json!({
                    "route": route,
                    "models": prefixes(route),
                    "base_url": config.base_url(route),
                    "api_key_env": route.api_key_env(),
                    "configured": config.is_configured(route),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&routes)?);
        return Ok(());
    }

    println!("{}", "🧭 Agon Model Routes".bold().cyan());
    println!();

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_header(vec![
            Cell::new("Route").fg(Color::Cyan),
            Cell::new("Models").fg(Color::Cyan),
            Cell::new("Endpoint").fg(Color::Cyan),
            Cell::new("Key").fg(Color::Cyan),
        ]);

    for route in ProviderRoute::all() {
        let key = if config.is_configured(route) {
            Cell::new(format!("✓ {}", route.api_key_env())).fg(Color::Green)
        } else {
            Cell::new(format!("✗ {}", route.api_key_env())).fg(Color::Red)
        };
        table.add_row(vec![
            Cell::new(route.to_string()).fg(Color::Green),
            Cell::new(prefixes(route)),
            Cell::new(config.base_url(route)),
            key,
        ]);
    }

    println!("{table}");
    println!();
    println!("Start a debate: {}", "agon debate --topic \"<motion>\"".green());

    Ok(())
}
