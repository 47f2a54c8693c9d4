#![allow(dead_code)]

use edi::config::{ConfigFile, DocumentSection, HostSection, RawConfigFile, ShellSection};
use edi::errors::Result;

/// Builder for `ConfigFile` to simplify test setup.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        Self {
            config: RawConfigFile {
                shell: ShellSection::default(),
                document: DocumentSection::default(),
                host: HostSection::default(),
            },
        }
    }

    pub fn prompt(mut self, prompt: &str) -> Self {
        self.config.shell.prompt = prompt.to_string();
        self
    }

    pub fn queue_length(mut self, len: usize) -> Self {
        self.config.document.queue_length = len;
        self
    }

    pub fn print_on_exit(mut self, val: bool) -> Self {
        self.config.host.print_on_exit = val;
        self
    }

    /// Validate and build; panics on invalid settings.
    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }

    /// Validate and build, returning the validation error.
    pub fn try_build(self) -> Result<ConfigFile> {
        ConfigFile::try_from(self.config)
    }
}

impl Default for ConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}
