// src/document/tags.rs

use std::fmt;

use crate::types::CommandId;

/// Label attached to inserted text so it can later be found, hidden, or
/// clicked as a unit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Tag {
    /// Clickable prompt marker in front of a command.
    Prompt(CommandId),
    /// The echoed command line.
    Echo(CommandId),
    /// Everything the command's process printed.
    Output(CommandId),
    /// Free-form tag for host or user text.
    Named(String),
}

impl Tag {
    /// Command the tag belongs to, if any.
    pub fn command(&self) -> Option<CommandId> {
        match self {
            Tag::Prompt(id) | Tag::Echo(id) | Tag::Output(id) => Some(*id),
            Tag::Named(_) => None,
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tag::Prompt(id) => write!(f, "toggle{id}"),
            Tag::Echo(id) => write!(f, "cmd{id}"),
            Tag::Output(id) => write!(f, "out{id}"),
            Tag::Named(name) => f.write_str(name),
        }
    }
}

/// What happens when text carrying a bound tag is clicked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickAction {
    /// Collapse/expand the command's output region.
    ToggleOutput(CommandId),
}

/// One piece of text in a block written by
/// [`DocumentSink::insert_block`](crate::document::DocumentSink::insert_block).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Insertion {
    pub text: String,
    pub tag: Option<Tag>,
}

impl Insertion {
    pub fn tagged(text: impl Into<String>, tag: Tag) -> Self {
        Self {
            text: text.into(),
            tag: Some(tag),
        }
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tag: None,
        }
    }
}
