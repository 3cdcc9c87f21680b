//! Extension manifest parsing (extension.yaml)

use std::path::Path;

use eyre::{Context, Result};
use lazy_regex::regex_is_match;
use serde::{Deserialize, Serialize};

/// Extension manifest structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ExtensionManifest {
    pub extension: ExtensionInfo,
    pub prompt: PromptSpec,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ExtensionInfo {
    pub name: String,
    pub version: String,
    pub description: String,

    #[serde(default)]
    pub authors: Vec<String>,
}

/// Which slot to replace and what to put in it.
///
/// Exactly one of `text` or `file` must be set.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PromptSpec {
    /// Agent kind whose default prompt is replaced.
    pub agent: String,

    /// Inline prompt text.
    #[serde(default)]
    pub text: Option<String>,

    /// Prompt file path, relative to the extension directory.
    #[serde(default)]
    pub file: Option<String>,
}

impl ExtensionManifest {
    /// Load a manifest from a YAML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read manifest: {}", path.as_ref().display()))?;
        Self::from_str(&content)
    }

    /// Parse a manifest from YAML string
    pub fn from_str(content: &str) -> Result<Self> {
        let manifest: Self = serde_yaml::from_str(content).context("Failed to parse extension manifest")?;
        manifest.validate()?;
        Ok(manifest)
    }

    fn validate(&self) -> Result<()> {
        if !regex_is_match!(r"^[a-z][a-z0-9-]*$", &self.extension.name) {
            eyre::bail!(
                "invalid extension name '{}': use lowercase letters, digits, and dashes",
                self.extension.name
            );
        }

        match (&self.prompt.text, &self.prompt.file) {
            (Some(_), Some(_)) => {
                eyre::bail!("extension '{}' sets both prompt.text and prompt.file", self.extension.name)
            }
            (None, None) => {
                eyre::bail!(
                    "extension '{}' sets neither prompt.text nor prompt.file",
                    self.extension.name
                )
            }
            _ => Ok(()),
        }
    }
}
