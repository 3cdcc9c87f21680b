//! Shared default system prompts
//!
//! Every registered agent kind owns exactly one process-wide prompt slot.
//! Extensions replace a slot's value during startup, before the host
//! constructs the first agent of that kind; agents snapshot the slot at
//! construction and never re-read it. The write path is guarded so hosts
//! that load extensions from several threads stay race-free, with
//! last-writer-wins ordering.

#![allow(dead_code)] // register_kind - host-side registration for kinds beyond chat

use std::fmt;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use eyre::Result;
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use serde::Serialize;

use super::chat::ChatAgent;

/// Builtin prompt every kind starts with until an extension replaces it.
pub const GENERIC_ASSISTANT_PROMPT: &str = "You are a generic assistant.";

/// Where a slot's current value came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PromptSource {
    /// Host default, untouched since registration.
    Builtin,
    /// Replaced by the named extension.
    Extension(String),
}

impl fmt::Display for PromptSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PromptSource::Builtin => write!(f, "builtin"),
            PromptSource::Extension(name) => write!(f, "extension:{}", name),
        }
    }
}

#[derive(Debug, Clone)]
struct Slot {
    value: String,
    source: PromptSource,
}

static SLOTS: Lazy<RwLock<IndexMap<String, Slot>>> = Lazy::new(|| {
    let mut slots = IndexMap::new();
    slots.insert(
        ChatAgent::KIND.to_string(),
        Slot {
            value: GENERIC_ASSISTANT_PROMPT.to_string(),
            source: PromptSource::Builtin,
        },
    );
    RwLock::new(slots)
});

fn read_slots() -> RwLockReadGuard<'static, IndexMap<String, Slot>> {
    SLOTS.read().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn write_slots() -> RwLockWriteGuard<'static, IndexMap<String, Slot>> {
    SLOTS.write().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Register an agent kind with its builtin default prompt.
///
/// Registering a kind that already exists leaves its current value alone.
pub fn register_kind(kind: &str, default: &str) {
    let mut slots = write_slots();
    slots.entry(kind.to_string()).or_insert_with(|| Slot {
        value: default.to_string(),
        source: PromptSource::Builtin,
    });
}

/// Replace the shared default prompt for `kind`.
///
/// This is the extension point. Every agent of `kind` constructed after
/// this call observes `prompt`; agents constructed earlier keep the value
/// they snapshotted. Re-running with the same arguments produces the same
/// end state. Fails when `kind` was never registered, so a misspelled
/// target surfaces at load time instead of leaving the builtin default in
/// service.
pub fn set_default_prompt(kind: &str, prompt: &str, extension: &str) -> Result<()> {
    let mut slots = write_slots();
    match slots.get_mut(kind) {
        Some(slot) => {
            slot.value = prompt.to_string();
            slot.source = PromptSource::Extension(extension.to_string());
            Ok(())
        }
        None => eyre::bail!("unknown agent kind '{}': no default prompt slot to override", kind),
    }
}

/// Current default prompt for `kind`.
pub fn default_prompt(kind: &str) -> Result<String> {
    let slots = read_slots();
    match slots.get(kind) {
        Some(slot) => Ok(slot.value.clone()),
        None => eyre::bail!("unknown agent kind '{}'", kind),
    }
}

/// Provenance of the current default for `kind`.
pub fn prompt_source(kind: &str) -> Result<PromptSource> {
    let slots = read_slots();
    match slots.get(kind) {
        Some(slot) => Ok(slot.source.clone()),
        None => eyre::bail!("unknown agent kind '{}'", kind),
    }
}

/// Registered kinds, in registration order.
pub fn kinds() -> Vec<String> {
    read_slots().keys().cloned().collect()
}
