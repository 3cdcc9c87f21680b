//! Compiled-in extension pointing the chat agent at the sonos-mux project

use eyre::Result;

use super::Extension;
use crate::agent::chat::ChatAgent;
use crate::agent::prompt;

/// Operating instructions for the sonos-mux assistant.
///
/// Opaque payload: the mechanism never parses or validates it.
pub const SYSTEM_PROMPT: &str = include_str!("sonos_mux_prompt.md");

/// Replaces the chat agent's default prompt with [`SYSTEM_PROMPT`] during
/// host startup.
pub struct SonosMuxExtension;

impl Extension for SonosMuxExtension {
    fn name(&self) -> &str {
        "sonos-mux"
    }

    fn version(&self) -> &str {
        env!("CARGO_PKG_VERSION")
    }

    fn description(&self) -> &str {
        "Chat agent instructions for the sonos-mux audio multiplexer"
    }

    fn target(&self) -> &str {
        ChatAgent::KIND
    }

    fn on_load(&self) -> Result<()> {
        prompt::set_default_prompt(ChatAgent::KIND, SYSTEM_PROMPT, self.name())
    }
}
