// src/errors.rs

//! Crate-wide error types.
//!
//! The four command-level failures each get their own type so callers can
//! react to them individually:
//! - [`ParseError`]: the submitted line had no tokens.
//! - [`SpawnError`]: the process could not be started.
//! - [`StreamError`]: reading stdout/stderr failed before end-of-stream.
//! - [`SinkError`]: the document rejected an operation.
//!
//! [`EdiError`] wraps all of them plus config/IO failures of the host.

use std::io;

use thiserror::Error;

use crate::types::StreamKind;

#[derive(Error, Debug)]
pub enum EdiError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Spawn(#[from] SpawnError),

    #[error(transparent)]
    Sink(#[from] SinkError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Tokenization produced nothing to run.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("command line contains no tokens")]
    Empty,
}

/// The process for a command could not be started.
#[derive(Error, Debug)]
pub enum SpawnError {
    #[error("cannot start a process from an empty argument vector")]
    EmptyArgv,

    #[error("failed to set up {0} pipe")]
    Pipe(StreamKind),

    #[error("failed to start '{program}': {source}")]
    Start {
        program: String,
        #[source]
        source: io::Error,
    },
}

/// A read from one of the child's output streams failed.
///
/// The failing stream is treated as finished; the other one keeps draining.
#[derive(Error, Debug)]
#[error("reading {kind} failed: {source}")]
pub struct StreamError {
    pub kind: StreamKind,
    #[source]
    pub source: io::Error,
}

/// The document refused an operation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SinkError {
    #[error("unknown region '{0}'")]
    UnknownRegion(String),

    #[error("region '{0}' already exists")]
    RegionExists(String),

    #[error("tag '{tag}' not found in region '{region}'")]
    UnknownTag { region: String, tag: String },

    #[error("document writer is closed")]
    Closed,

    #[error("document rejected the operation: {0}")]
    Rejected(String),
}

pub type Result<T> = std::result::Result<T, EdiError>;
