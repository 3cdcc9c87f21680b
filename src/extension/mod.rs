//! Extension discovery, loading, and prompt overrides
//!
//! Extensions customize the host before it serves a single request:
//! - compiled-in extensions are registered during startup
//! - directory extensions are discovered from the extensions directory
//!   (one subdirectory per extension, described by extension.yaml)
//! - the manager applies every override, in order, before the first agent
//!   is constructed
//!
//! A failed override aborts startup and propagates to the caller. Swallowing
//! it would leave the host quietly answering with its builtin prompt.

#![allow(dead_code)] // has - lookup used by manager consumers and tests

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use eyre::{Context, Result};
use indexmap::IndexMap;

pub mod manifest;
pub mod sonos_mux;

use crate::agent::prompt;
use crate::config::Config;
use manifest::ExtensionManifest;

/// Manifest file name expected in each extension directory.
pub const MANIFEST_FILE: &str = "extension.yaml";

/// A customization applied to the host at load time.
pub trait Extension {
    /// Unique extension name.
    fn name(&self) -> &str;

    fn version(&self) -> &str;

    fn description(&self) -> &str;

    /// Agent kind whose default prompt this extension replaces.
    fn target(&self) -> &str;

    /// Perform the override. Runs once per process, before the first agent
    /// of the target kind is constructed.
    fn on_load(&self) -> Result<()>;
}

/// An extension loaded from a directory with an extension.yaml manifest.
#[derive(Debug)]
pub struct ManifestExtension {
    manifest: ExtensionManifest,
    path: PathBuf,
}

impl ManifestExtension {
    /// Load a directory extension.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let manifest_path = path.join(MANIFEST_FILE);

        if !manifest_path.exists() {
            eyre::bail!("No {} found in {}", MANIFEST_FILE, path.display());
        }

        let manifest = ExtensionManifest::load(&manifest_path)?;

        Ok(Self {
            manifest,
            path: path.to_path_buf(),
        })
    }

    fn prompt_text(&self) -> Result<String> {
        match (&self.manifest.prompt.text, &self.manifest.prompt.file) {
            (Some(text), None) => Ok(text.clone()),
            (None, Some(file)) => {
                let prompt_path = self.path.join(file);
                fs::read_to_string(&prompt_path)
                    .with_context(|| format!("Failed to read prompt file: {}", prompt_path.display()))
            }
            // Manifest validation guarantees exactly one is set.
            _ => eyre::bail!("extension '{}' has no usable prompt", self.name()),
        }
    }
}

impl Extension for ManifestExtension {
    fn name(&self) -> &str {
        &self.manifest.extension.name
    }

    fn version(&self) -> &str {
        &self.manifest.extension.version
    }

    fn description(&self) -> &str {
        &self.manifest.extension.description
    }

    fn target(&self) -> &str {
        &self.manifest.prompt.agent
    }

    fn on_load(&self) -> Result<()> {
        let text = self.prompt_text()?;
        prompt::set_default_prompt(self.target(), &text, self.name())
    }
}

/// Extension lifecycle state.
#[derive(Debug, Clone, PartialEq)]
pub enum ExtensionState {
    Registered,
    Applied,
    Failed(String),
}

/// A managed extension plus its lifecycle state.
pub struct ManagedExtension {
    pub extension: Box<dyn Extension>,
    pub state: ExtensionState,
    pub applied_at: Option<DateTime<Local>>,
    pub builtin: bool,
}

/// Owns every extension in the process and applies their overrides in a
/// fixed order: compiled-in extensions first, then directory extensions
/// sorted by name. Later writes win. A directory extension sharing a
/// compiled-in extension's name shadows it.
pub struct ExtensionManager {
    extensions: IndexMap<String, ManagedExtension>,
    pub extensions_dir: PathBuf,
}

impl ExtensionManager {
    pub fn new(extensions_dir: PathBuf) -> Self {
        Self {
            extensions: IndexMap::new(),
            extensions_dir,
        }
    }

    /// Register a compiled-in extension.
    pub fn register(&mut self, extension: Box<dyn Extension>) {
        let name = extension.name().to_string();
        self.extensions.insert(
            name,
            ManagedExtension {
                extension,
                state: ExtensionState::Registered,
                applied_at: None,
                builtin: true,
            },
        );
    }

    /// Discover directory extensions. Returns how many were found.
    ///
    /// An unreadable manifest is fatal here, not a warning: skipping it
    /// would drop its override on the floor.
    pub fn discover(&mut self) -> Result<usize> {
        if !self.extensions_dir.exists() {
            return Ok(0);
        }

        let mut found = Vec::new();

        for entry in fs::read_dir(&self.extensions_dir).context("Failed to read extensions directory")? {
            let entry = entry?;
            let path = entry.path();

            if !path.is_dir() {
                continue;
            }

            if !path.join(MANIFEST_FILE).exists() {
                continue;
            }

            let extension = ManifestExtension::load(&path)
                .with_context(|| format!("Failed to load extension from {}", path.display()))?;
            found.push(extension);
        }

        // Sort by name so application order never depends on readdir order.
        found.sort_by(|a, b| a.name().cmp(b.name()));

        let count = found.len();
        for extension in found {
            if self.extensions.contains_key(extension.name()) {
                log::info!("Directory extension '{}' shadows a compiled-in extension", extension.name());
            }
            self.extensions.insert(
                extension.name().to_string(),
                ManagedExtension {
                    extension: Box::new(extension),
                    state: ExtensionState::Registered,
                    applied_at: None,
                    builtin: false,
                },
            );
        }

        Ok(count)
    }

    /// Apply every registered override, in order.
    ///
    /// The first failure aborts and propagates with the extension's name.
    /// Already-applied extensions are skipped, so a second call is a no-op.
    pub fn load_all(&mut self) -> Result<()> {
        for managed in self.extensions.values_mut() {
            if managed.state != ExtensionState::Registered {
                continue;
            }

            let name = managed.extension.name().to_string();
            match managed.extension.on_load() {
                Ok(()) => {
                    managed.state = ExtensionState::Applied;
                    managed.applied_at = Some(Local::now());
                    log::info!("Applied extension '{}' to agent kind '{}'", name, managed.extension.target());
                }
                Err(e) => {
                    managed.state = ExtensionState::Failed(e.to_string());
                    return Err(e).with_context(|| format!("Failed to apply extension '{}'", name));
                }
            }
        }

        Ok(())
    }

    /// Build the process's extension set from config and apply it.
    ///
    /// This is the host startup sequence: register the compiled-in
    /// customizer, discover directory extensions, apply every override.
    /// Callers construct agents only after this returns.
    pub fn bootstrap(config: &Config) -> Result<Self> {
        let extensions_dir = Config::expand_path(&config.paths.extensions);
        let mut manager = Self::new(extensions_dir);

        if config.extensions.builtin_enabled {
            manager.register(Box::new(sonos_mux::SonosMuxExtension));
        }

        manager.discover()?;
        manager.load_all()?;

        Ok(manager)
    }

    /// Get an extension by name.
    pub fn get(&self, name: &str) -> Option<&ManagedExtension> {
        self.extensions.get(name)
    }

    /// Check if an extension exists.
    pub fn has(&self, name: &str) -> bool {
        self.extensions.contains_key(name)
    }

    /// All extensions, in application order.
    pub fn list(&self) -> impl Iterator<Item = &ManagedExtension> {
        self.extensions.values()
    }
}
