// src/config/validate.rs

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{EdiError, Result};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = EdiError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(ConfigFile::new_unchecked(raw.shell, raw.document, raw.host))
    }
}

fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    validate_prompt(&cfg.shell.prompt)?;
    validate_document(cfg)?;
    Ok(())
}

fn validate_prompt(prompt: &str) -> Result<()> {
    if prompt.is_empty() {
        return Err(EdiError::ConfigError(
            "[shell].prompt must not be empty".to_string(),
        ));
    }
    if prompt.contains(['\n', '\r']) {
        return Err(EdiError::ConfigError(format!(
            "[shell].prompt must be a single line (got {prompt:?})"
        )));
    }
    Ok(())
}

fn validate_document(cfg: &RawConfigFile) -> Result<()> {
    if cfg.document.queue_length == 0 {
        return Err(EdiError::ConfigError(
            "[document].queue_length must be >= 1 (got 0)".to_string(),
        ));
    }
    Ok(())
}
