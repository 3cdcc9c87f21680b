//! Extension management commands

use colored::*;
use eyre::Result;
use serde::Serialize;

use crate::cli::{ExtensionAction, OutputFormat};
use crate::config::Config;
use crate::extension::{ExtensionManager, ExtensionState, ManagedExtension};

pub fn run(action: ExtensionAction, config: &Config) -> Result<()> {
    match action {
        ExtensionAction::List { format } => list_extensions(OutputFormat::resolve(format), config),
        ExtensionAction::Info { name } => show_extension(&name, config),
    }
}

#[derive(Serialize)]
struct ExtensionSummary {
    name: String,
    version: String,
    description: String,
    target: String,
    builtin: bool,
    state: String,
    applied_at: Option<String>,
}

fn summarize(managed: &ManagedExtension) -> ExtensionSummary {
    ExtensionSummary {
        name: managed.extension.name().to_string(),
        version: managed.extension.version().to_string(),
        description: managed.extension.description().to_string(),
        target: managed.extension.target().to_string(),
        builtin: managed.builtin,
        state: match &managed.state {
            ExtensionState::Registered => "registered".to_string(),
            ExtensionState::Applied => "applied".to_string(),
            ExtensionState::Failed(msg) => format!("failed: {}", msg),
        },
        applied_at: managed.applied_at.map(|at| at.format("%Y-%m-%d %H:%M").to_string()),
    }
}

fn list_extensions(format: OutputFormat, config: &Config) -> Result<()> {
    let manager = ExtensionManager::bootstrap(config)?;

    let summaries: Vec<ExtensionSummary> = manager.list().map(summarize).collect();

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summaries)?),
        OutputFormat::Yaml => println!("{}", serde_yaml::to_string(&summaries)?),
        OutputFormat::Text => {
            println!("{}", "Extensions (application order):".bold());
            println!();

            if summaries.is_empty() {
                println!("  {}", "(none)".dimmed());
            } else {
                for summary in &summaries {
                    let origin = if summary.builtin { "[builtin]" } else { "[directory]" };
                    println!(
                        "  {} {} {} {}",
                        "✓".green(),
                        summary.name.green(),
                        format!("v{}", summary.version).dimmed(),
                        origin.dimmed()
                    );
                    println!("    {}", summary.description.dimmed());
                    println!("    Target: {}", summary.target.cyan());
                    if let Some(ref at) = summary.applied_at {
                        println!("    Applied: {}", at.dimmed());
                    }
                    println!();
                }
            }
        }
    }

    Ok(())
}

fn show_extension(name: &str, config: &Config) -> Result<()> {
    let manager = ExtensionManager::bootstrap(config)?;

    let Some(managed) = manager.get(name) else {
        eprintln!("{} Extension '{}' not found", "✗".red(), name);
        return Ok(());
    };

    let summary = summarize(managed);

    println!("{} {}", "Extension:".bold(), summary.name.green().bold());
    println!();
    println!("{} {}", "Description:".bold(), summary.description);
    println!("{} {}", "Version:".bold(), summary.version);
    println!("{} {}", "Target:".bold(), summary.target.cyan());
    println!(
        "{} {}",
        "Origin:".bold(),
        if summary.builtin { "compiled-in" } else { "directory" }
    );
    println!("{} {}", "State:".bold(), summary.state);
    if let Some(ref at) = summary.applied_at {
        println!("{} {}", "Applied:".bold(), at);
    }

    Ok(())
}
