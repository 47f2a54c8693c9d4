// src/command/mod.rs

//! Commands: turning a submitted line into an argument vector, and issuing
//! the identity every command carries for the rest of its life.
//!
//! - [`tokenize`] splits a line into tokens (whitespace + simple quotes).
//! - [`registry`] issues command/shell ids and keeps each command's record.

pub mod registry;
pub mod tokenize;

pub use registry::{Command, CommandRegistry, IdCounter};
pub use tokenize::{parse_argv, tokenize};
