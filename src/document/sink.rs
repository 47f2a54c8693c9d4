// src/document/sink.rs

//! The narrow interface the engine uses to talk to the document view.
//!
//! The engine never holds the document itself. Shells and output streamers
//! only see a `DocumentSink`, so the real view, the in-process
//! [`DocumentHandle`](super::DocumentHandle), and test fakes are
//! interchangeable.

use std::future::Future;
use std::pin::Pin;

use crate::document::index::{Position, TextIndex};
use crate::document::tags::{ClickAction, Insertion, Tag};
use crate::errors::SinkError;
use crate::types::Visibility;

/// Boxed future returned by every sink operation.
pub type SinkFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, SinkError>> + Send + 'a>>;

/// Operations the engine needs from the document view.
///
/// Implementations must apply each call atomically with respect to every
/// other call, whatever task it comes from.
pub trait DocumentSink: Send + Sync {
    /// Create an empty text container.
    fn create_region(&self, region: &str) -> SinkFuture<'_, ()>;

    /// Insert literal text at `index`, optionally tagged.
    fn insert_text(
        &self,
        region: &str,
        index: TextIndex,
        text: String,
        tag: Option<Tag>,
    ) -> SinkFuture<'_, Position>;

    /// Atomically pick the anchor line (last line, after a line break if it
    /// is not empty) and write `block` there in order. Returns the anchor.
    fn insert_block(&self, region: &str, block: Vec<Insertion>) -> SinkFuture<'_, Position>;

    fn line_count(&self, region: &str) -> SinkFuture<'_, usize>;

    /// Text of a 1-based line, `None` past the end.
    fn line(&self, region: &str, line: usize) -> SinkFuture<'_, Option<String>>;

    /// Resolve an index to `line.column`.
    fn query_index(&self, region: &str, index: TextIndex) -> SinkFuture<'_, Position>;

    fn configure_tag_visibility(&self, region: &str, tag: Tag, hidden: bool) -> SinkFuture<'_, ()>;

    /// Register what a click on `tag` does.
    fn bind_click(&self, region: &str, tag: Tag, action: ClickAction) -> SinkFuture<'_, ()>;

    /// Deliver a click on `tag`, running its bound action.
    fn click(&self, region: &str, tag: Tag) -> SinkFuture<'_, Option<Visibility>>;
}
