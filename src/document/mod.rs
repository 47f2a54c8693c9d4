// src/document/mod.rs

//! Line-oriented document the engine writes into.
//!
//! - [`sink`] defines [`DocumentSink`], the only way the engine touches the
//!   document view.
//! - [`model`] is the pure text model: regions made of tagged spans.
//! - [`writer`] runs the model inside a single Tokio task and hands out
//!   [`DocumentHandle`]s that implement [`DocumentSink`].
//! - [`toggle`] holds per-command output visibility.
//! - [`index`] and [`tags`] are the addressing vocabulary shared by all of
//!   the above.

pub mod index;
pub mod model;
pub mod sink;
pub mod tags;
pub mod toggle;
pub mod writer;

pub use index::{Position, TextIndex};
pub use model::{Document, RegionName, TextBuffer};
pub use sink::{DocumentSink, SinkFuture};
pub use tags::{ClickAction, Insertion, Tag};
pub use toggle::ToggleController;
pub use writer::{spawn_document_writer, DocRequest, DocumentHandle};
