//! Diagnose orbx setup issues

use std::fs;

use colored::*;
use eyre::Result;

use crate::agent::prompt;
use crate::config::Config;
use crate::extension::{Extension, MANIFEST_FILE, ManifestExtension};

/// Lenient counterpart of the startup path: reports what would fail
/// instead of aborting, so a broken extension can be found and fixed.
pub fn run(config: &Config) -> Result<()> {
    println!("{}", "orbx Doctor".bold());
    println!("{}", "═".repeat(50));
    println!();

    let mut issues = 0;

    // Check orbx directory
    let orbx_dir = Config::orbx_dir();
    if orbx_dir.exists() {
        println!("{} orbx directory: {}", "✓".green(), orbx_dir.display());
    } else {
        println!("{} orbx directory missing: {}", "⚠".yellow(), orbx_dir.display());
    }

    // Check config file
    let config_file = orbx_dir.join("orbx.yaml");
    if config_file.exists() {
        println!("{} Config file: {}", "✓".green(), config_file.display());
    } else {
        println!("{} Config file missing: {} (using defaults)", "⚠".yellow(), config_file.display());
    }

    // Check extensions directory
    let extensions_dir = Config::expand_path(&config.paths.extensions);
    if extensions_dir.exists() {
        println!("{} Extensions directory: {}", "✓".green(), extensions_dir.display());
    } else {
        println!(
            "{} Extensions directory missing: {}",
            "⚠".yellow(),
            extensions_dir.display()
        );
    }

    println!();

    // Check the compiled-in extension
    println!("{}", "Compiled-in:".bold());
    if config.extensions.builtin_enabled {
        println!("  {} sonos-mux (enabled)", "✓".green());
    } else {
        println!("  {} sonos-mux {}", "○".dimmed(), "(disabled in config)".dimmed());
    }

    println!();

    // Check each directory extension the way startup would load it
    println!("{}", "Directory extensions:".bold());
    let kinds = prompt::kinds();
    let mut found = 0;

    if extensions_dir.exists() {
        let entries = fs::read_dir(&extensions_dir)?;
        for entry in entries.filter_map(|e| e.ok()) {
            let path = entry.path();
            if !path.is_dir() || !path.join(MANIFEST_FILE).exists() {
                continue;
            }
            found += 1;

            match ManifestExtension::load(&path) {
                Ok(extension) => {
                    if kinds.iter().any(|k| k == extension.target()) {
                        println!("  {} {} → {}", "✓".green(), extension.name(), extension.target().cyan());
                    } else {
                        println!(
                            "  {} {} targets unknown agent kind '{}'",
                            "✗".red(),
                            extension.name(),
                            extension.target()
                        );
                        issues += 1;
                    }
                }
                Err(e) => {
                    println!("  {} {}: {:#}", "✗".red(), path.display(), e);
                    issues += 1;
                }
            }
        }
    }

    if found == 0 {
        println!("  {}", "(none)".dimmed());
    }

    println!();

    // Summary
    println!("{}", "═".repeat(50));
    if issues == 0 {
        println!("{} All checks passed!", "✓".green().bold());
    } else {
        println!("{} {} issue(s) found", "⚠".yellow().bold(), issues);
    }

    Ok(())
}
