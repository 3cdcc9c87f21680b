//! The chat agent

#![allow(dead_code)] // with_prompt - explicit factory form for embedding hosts

use eyre::Result;

use super::prompt;

/// A conversational agent.
///
/// The system prompt is snapshotted from the shared default slot at
/// construction. A later override does not touch live instances; only
/// agents constructed afterwards observe the new value.
#[derive(Debug, Clone)]
pub struct ChatAgent {
    system_prompt: String,
}

impl ChatAgent {
    /// Slot name shared by every chat agent in the process.
    pub const KIND: &'static str = "chat";

    /// Construct an agent holding the current shared default prompt.
    pub fn new() -> Result<Self> {
        Ok(Self {
            system_prompt: prompt::default_prompt(Self::KIND)?,
        })
    }

    /// Construct an agent with an explicit prompt, bypassing the shared slot.
    pub fn with_prompt(prompt: impl Into<String>) -> Self {
        Self {
            system_prompt: prompt.into(),
        }
    }

    /// The operating instructions this agent was constructed with.
    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }
}
