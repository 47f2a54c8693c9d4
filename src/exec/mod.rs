// src/exec/mod.rs

//! Process execution layer.
//!
//! This module runs the commands typed at shell prompts, using
//! `tokio::process::Command`, and streams their output into the document.
//!
//! - [`runner`] starts one process per command and hands out its pipes.
//! - [`streamer`] drains stdout and stderr concurrently into the command's
//!   output region.
//! - [`task_runner`] is the per-command background task tying both together
//!   and keeping the command's lifecycle state in the registry.

pub mod runner;
pub mod streamer;
pub mod task_runner;

pub use runner::{ProcessRunner, RunningProcess};
pub use streamer::{drain, stream_process, DrainReport, OutputTarget, StreamSummary};
pub use task_runner::{run_command, CommandJob};
