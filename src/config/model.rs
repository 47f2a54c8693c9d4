// src/config/model.rs

use serde::Deserialize;

use crate::errors::Result;
use crate::shell::{ShellSettings, DEFAULT_PROMPT};

/// Configuration as read from an `Edi.toml` file, before validation.
///
/// ```toml
/// [shell]
/// prompt = "» "
///
/// [document]
/// queue_length = 256
///
/// [host]
/// print_on_exit = true
/// ```
///
/// All sections are optional and have reasonable defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawConfigFile {
    #[serde(default)]
    pub shell: ShellSection,

    #[serde(default)]
    pub document: DocumentSection,

    #[serde(default)]
    pub host: HostSection,
}

/// Validated configuration. Only obtainable through
/// `ConfigFile::try_from(RawConfigFile)` or [`ConfigFile::default`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigFile {
    pub shell: ShellSection,
    pub document: DocumentSection,
    pub host: HostSection,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(
        shell: ShellSection,
        document: DocumentSection,
        host: HostSection,
    ) -> Self {
        Self {
            shell,
            document,
            host,
        }
    }

    /// Same configuration with another prompt, validated again.
    pub fn with_prompt(self, prompt: impl Into<String>) -> Result<Self> {
        ConfigFile::try_from(RawConfigFile {
            shell: ShellSection {
                prompt: prompt.into(),
            },
            document: self.document,
            host: self.host,
        })
    }

    /// Settings handed to every new shell.
    pub fn shell_settings(&self) -> ShellSettings {
        ShellSettings {
            prompt: self.shell.prompt.clone(),
        }
    }
}

/// `[shell]` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ShellSection {
    /// Text written in front of every submitted command. Must be a single,
    /// non-empty line.
    #[serde(default = "default_prompt")]
    pub prompt: String,
}

fn default_prompt() -> String {
    DEFAULT_PROMPT.to_string()
}

impl Default for ShellSection {
    fn default() -> Self {
        Self {
            prompt: default_prompt(),
        }
    }
}

/// `[document]` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DocumentSection {
    /// Capacity of the document writer's request queue.
    #[serde(default = "default_queue_length")]
    pub queue_length: usize,
}

fn default_queue_length() -> usize {
    256
}

impl Default for DocumentSection {
    fn default() -> Self {
        Self {
            queue_length: default_queue_length(),
        }
    }
}

/// `[host]` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HostSection {
    /// Print every shell region to stdout when the host exits.
    #[serde(default = "default_print_on_exit")]
    pub print_on_exit: bool,
}

fn default_print_on_exit() -> bool {
    true
}

impl Default for HostSection {
    fn default() -> Self {
        Self {
            print_on_exit: default_print_on_exit(),
        }
    }
}
