//! `relaybot init` and `relaybot status` — config management commands.

use anyhow::{Context, Result};
use colored::Colorize;

use relaybot_core::config::{get_config_path, load_config, save_config, Config};

/// Write a default config file if none exists.
pub fn init() -> Result<()> {
    let path = get_config_path();
    if path.exists() {
        println!("Config already exists at {}", path.display());
        return Ok(());
    }

    save_config(&Config::default(), None).context("failed to write config")?;
    println!("{} wrote default config to {}", "✓".green(), path.display());
    println!("Set {} to enable the model-backed agent.", "model.apiKey".bold());
    Ok(())
}

/// Show configuration status.
pub fn run() -> Result<()> {
    let config = load_config(None);
    let config_path = get_config_path();

    println!();
    println!("{}", "Relaybot Status".cyan().bold());
    println!();

    let config_exists = config_path.exists();
    println!(
        "  {:<14} {} {}",
        "Config:".bold(),
        config_path.display(),
        if config_exists {
            "✓".green().to_string()
        } else {
            "(not found)".red().to_string()
        }
    );

    println!(
        "  {:<14} ws://{}",
        "Gateway:".bold(),
        config.gateway.bind_addr()
    );

    println!("  {:<14} {}", "Model:".bold(), config.agents.defaults.model);
    println!(
        "  {:<14} {}",
        "API base:".bold(),
        config.model.api_base
    );
    println!(
        "  {:<14} {}",
        "API key:".bold(),
        if config.model.is_configured() {
            format!("{} (key set)", "✓".green())
        } else {
            format!("{}", "· not configured".dimmed())
        }
    );

    println!(
        "  {:<14} {} | temp: {} | max tokens: {}",
        "Loop:".bold(),
        format!("max iterations: {}", config.agents.defaults.max_iterations).dimmed(),
        format!("{}", config.agents.defaults.temperature).dimmed(),
        format!("{}", config.agents.defaults.max_tokens).dimmed(),
    );

    println!(
        "  {:<14} {}",
        "Knowledge:".bold(),
        if config.knowledge.enabled {
            format!("{} {}", "✓".green(), config.knowledge.base_url)
        } else {
            format!("{}", "· disabled".dimmed())
        }
    );

    println!();
    Ok(())
}
