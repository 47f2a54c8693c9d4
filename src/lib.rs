// src/lib.rs

pub mod cli;
pub mod command;
pub mod config;
pub mod document;
pub mod errors;
pub mod exec;
pub mod host;
pub mod logging;
pub mod shell;
pub mod types;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::load_or_default;
use crate::host::Host;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading (plus CLI overrides)
/// - the document writer, the command registry and the first shell
/// - either scripted (`-c`) or interactive (stdin) input
pub async fn run(args: CliArgs) -> Result<()> {
    let mut config = load_or_default(args.config.as_deref()).context("loading configuration")?;

    if let Some(prompt) = args.prompt {
        config = config
            .with_prompt(prompt)
            .context("applying --prompt override")?;
    }
    debug!(?config, "effective configuration");

    let mut host = Host::new(config).await?;

    if args.commands.is_empty() {
        info!("interactive mode; reading commands from stdin");
        host.run_interactive().await?;
    } else {
        info!(count = args.commands.len(), "scripted mode");
        let rendered = host.run_script(&args.commands).await?;
        print!("{rendered}");
    }

    Ok(())
}
