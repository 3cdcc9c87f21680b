//! Agent inspection commands

use colored::*;
use eyre::Result;
use serde::Serialize;

use crate::agent::prompt;
use crate::cli::{AgentAction, OutputFormat};
use crate::config::Config;
use crate::extension::ExtensionManager;

pub fn run(action: AgentAction, config: &Config) -> Result<()> {
    match action {
        AgentAction::List { format } => list_agents(OutputFormat::resolve(format), config),
        AgentAction::Prompt { kind } => show_prompt(&kind, config),
    }
}

fn list_agents(format: OutputFormat, config: &Config) -> Result<()> {
    // Overrides must be in place before any slot is read.
    ExtensionManager::bootstrap(config)?;

    #[derive(Serialize)]
    struct AgentSummary {
        kind: String,
        source: String,
        prompt_len: usize,
    }

    let mut summaries = Vec::new();
    for kind in prompt::kinds() {
        summaries.push(AgentSummary {
            source: prompt::prompt_source(&kind)?.to_string(),
            prompt_len: prompt::default_prompt(&kind)?.len(),
            kind,
        });
    }

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summaries)?),
        OutputFormat::Yaml => println!("{}", serde_yaml::to_string(&summaries)?),
        OutputFormat::Text => {
            println!("{}", "Agent Kinds:".bold());
            println!();

            for summary in &summaries {
                println!("  {} {}", "●".green(), summary.kind.bold());
                println!("    Prompt: {}", summary.source.cyan());
                println!("    {}", format!("{} chars", summary.prompt_len).dimmed());
                println!();
            }
        }
    }

    Ok(())
}

fn show_prompt(kind: &str, config: &Config) -> Result<()> {
    ExtensionManager::bootstrap(config)?;

    let prompt = prompt::default_prompt(kind)?;
    println!("{}", prompt);

    Ok(())
}
