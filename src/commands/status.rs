//! System status command
//!
//! Shows the effective prompt configuration after extensions are applied.

use colored::*;
use eyre::Result;
use serde::Serialize;

use crate::agent::prompt;
use crate::cli::OutputFormat;
use crate::config::Config;
use crate::extension::{ExtensionManager, ExtensionState};

#[derive(Serialize)]
struct Status {
    version: String,
    orbx_dir: String,
    extensions_dir: String,
    builtin_enabled: bool,
    agents: Vec<AgentStatus>,
    extensions: Vec<ExtensionStatus>,
}

#[derive(Serialize)]
struct AgentStatus {
    kind: String,
    source: String,
}

#[derive(Serialize)]
struct ExtensionStatus {
    name: String,
    version: String,
    target: String,
    builtin: bool,
    state: String,
}

pub fn run(format: OutputFormat, config: &Config) -> Result<()> {
    let orbx_dir = Config::orbx_dir();
    let extensions_dir = Config::expand_path(&config.paths.extensions);

    // Best-effort bootstrap: a failed override shows up as extension state
    // instead of aborting the report. doctor pinpoints the cause.
    let mut manager = ExtensionManager::new(extensions_dir.clone());
    if config.extensions.builtin_enabled {
        manager.register(Box::new(crate::extension::sonos_mux::SonosMuxExtension));
    }
    let _ = manager.discover();
    let _ = manager.load_all();

    let extensions: Vec<ExtensionStatus> = manager
        .list()
        .map(|managed| ExtensionStatus {
            name: managed.extension.name().to_string(),
            version: managed.extension.version().to_string(),
            target: managed.extension.target().to_string(),
            builtin: managed.builtin,
            state: match &managed.state {
                ExtensionState::Registered => "registered".to_string(),
                ExtensionState::Applied => "applied".to_string(),
                ExtensionState::Failed(msg) => format!("failed: {}", msg),
            },
        })
        .collect();

    let agents: Vec<AgentStatus> = prompt::kinds()
        .into_iter()
        .map(|kind| AgentStatus {
            source: prompt::prompt_source(&kind).map(|s| s.to_string()).unwrap_or_default(),
            kind,
        })
        .collect();

    let status = Status {
        version: env!("CARGO_PKG_VERSION").to_string(),
        orbx_dir: orbx_dir.display().to_string(),
        extensions_dir: extensions_dir.display().to_string(),
        builtin_enabled: config.extensions.builtin_enabled,
        agents,
        extensions,
    };

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&status)?),
        OutputFormat::Yaml => println!("{}", serde_yaml::to_string(&status)?),
        OutputFormat::Text => print_text_status(&status),
    }

    Ok(())
}

fn print_text_status(status: &Status) {
    println!("{}", "orbx Status".bold());
    println!();

    println!("  {:16} {}", "Version:".dimmed(), status.version);
    println!("  {:16} {}", "orbx Dir:".dimmed(), status.orbx_dir);
    println!("  {:16} {}", "Extensions Dir:".dimmed(), status.extensions_dir);
    println!();

    // Agents
    println!(
        "{} ({}):",
        "Agents".cyan(),
        format!("{} kinds", status.agents.len()).dimmed()
    );
    for agent in &status.agents {
        println!("  {} {} → {}", "✓".green(), agent.kind.green(), agent.source.cyan());
    }
    println!();

    // Extensions
    println!(
        "{} ({}):",
        "Extensions".cyan(),
        format!("{} registered", status.extensions.len()).dimmed()
    );
    if status.extensions.is_empty() {
        println!("  {}", "(none)".dimmed());
    } else {
        for extension in &status.extensions {
            let origin_badge = if extension.builtin {
                "[builtin]".yellow().to_string()
            } else {
                "[directory]".dimmed().to_string()
            };
            let marker = if extension.state == "applied" {
                "✓".green()
            } else {
                "✗".red()
            };
            println!(
                "  {} {} {} {} → {} ({})",
                marker,
                extension.name.green(),
                format!("v{}", extension.version).dimmed(),
                origin_badge,
                extension.target.cyan(),
                extension.state.dimmed()
            );
        }
    }
}
