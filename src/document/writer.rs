// src/document/writer.rs

//! Single writer task owning the [`Document`].
//!
//! Every producer (shells, one output streamer per running command, the
//! host) talks to the document through a cloneable [`DocumentHandle`]. The
//! handle turns each call into a [`DocRequest`] and sends it over a bounded
//! mpsc channel; the writer loop applies requests one at a time and answers
//! on a oneshot channel. Partial writes from concurrent producers therefore
//! never interleave.

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, trace};

use crate::document::index::{Position, TextIndex};
use crate::document::model::{Document, RegionName};
use crate::document::sink::{DocumentSink, SinkFuture};
use crate::document::tags::{ClickAction, Insertion, Tag};
use crate::errors::SinkError;
use crate::types::Visibility;

type Reply<T> = oneshot::Sender<Result<T, SinkError>>;

/// Request applied by the writer loop.
#[derive(Debug)]
pub enum DocRequest {
    CreateRegion {
        region: RegionName,
        reply: Reply<()>,
    },
    InsertText {
        region: RegionName,
        index: TextIndex,
        text: String,
        tag: Option<Tag>,
        reply: Reply<Position>,
    },
    InsertBlock {
        region: RegionName,
        block: Vec<Insertion>,
        reply: Reply<Position>,
    },
    LineCount {
        region: RegionName,
        reply: Reply<usize>,
    },
    Line {
        region: RegionName,
        line: usize,
        reply: Reply<Option<String>>,
    },
    QueryIndex {
        region: RegionName,
        index: TextIndex,
        reply: Reply<Position>,
    },
    SetTagVisibility {
        region: RegionName,
        tag: Tag,
        hidden: bool,
        reply: Reply<()>,
    },
    BindClick {
        region: RegionName,
        tag: Tag,
        action: ClickAction,
        reply: Reply<()>,
    },
    Click {
        region: RegionName,
        tag: Tag,
        reply: Reply<Option<Visibility>>,
    },
    Render {
        region: RegionName,
        reply: Reply<String>,
    },
    Snapshot {
        reply: oneshot::Sender<Document>,
    },
}

/// Spawn the writer loop for `document`.
///
/// `queue_length` bounds the number of requests waiting to be applied;
/// producers wait when it is full. The loop ends once every handle is gone.
pub fn spawn_document_writer(document: Document, queue_length: usize) -> DocumentHandle {
    let (tx, mut rx) = mpsc::channel::<DocRequest>(queue_length.max(1));

    tokio::spawn(async move {
        info!("document writer started");

        let mut document = document;
        while let Some(request) = rx.recv().await {
            apply_request(&mut document, request);
        }

        info!("document writer finished (all handles dropped)");
    });

    DocumentHandle { tx }
}

fn apply_request(doc: &mut Document, request: DocRequest) {
    trace!(?request, "applying document request");

    // A dropped reply receiver only means the caller stopped waiting.
    match request {
        DocRequest::CreateRegion { region, reply } => {
            let _ = reply.send(doc.create_region(&region));
        }
        DocRequest::InsertText {
            region,
            index,
            text,
            tag,
            reply,
        } => {
            let _ = reply.send(doc.insert_text(&region, &index, text, tag));
        }
        DocRequest::InsertBlock {
            region,
            block,
            reply,
        } => {
            let result = doc.insert_block(&region, block);
            if let Ok(anchor) = &result {
                debug!(%region, %anchor, "reserved block");
            }
            let _ = reply.send(result);
        }
        DocRequest::LineCount { region, reply } => {
            let _ = reply.send(doc.line_count(&region));
        }
        DocRequest::Line {
            region,
            line,
            reply,
        } => {
            let _ = reply.send(doc.line(&region, line));
        }
        DocRequest::QueryIndex {
            region,
            index,
            reply,
        } => {
            let _ = reply.send(doc.query_index(&region, &index));
        }
        DocRequest::SetTagVisibility {
            region,
            tag,
            hidden,
            reply,
        } => {
            let _ = reply.send(doc.configure_tag_visibility(&region, tag, hidden));
        }
        DocRequest::BindClick {
            region,
            tag,
            action,
            reply,
        } => {
            let _ = reply.send(doc.bind_click(&region, tag, action));
        }
        DocRequest::Click { region, tag, reply } => {
            let _ = reply.send(doc.click(&region, &tag));
        }
        DocRequest::Render { region, reply } => {
            let _ = reply.send(doc.render(&region));
        }
        DocRequest::Snapshot { reply } => {
            let _ = reply.send(doc.clone());
        }
    }
}

/// Cloneable client of the writer task.
#[derive(Debug, Clone)]
pub struct DocumentHandle {
    tx: mpsc::Sender<DocRequest>,
}

impl DocumentHandle {
    async fn request<T>(
        &self,
        build: impl FnOnce(Reply<T>) -> DocRequest,
    ) -> Result<T, SinkError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(build(reply_tx))
            .await
            .map_err(|_| SinkError::Closed)?;
        reply_rx.await.map_err(|_| SinkError::Closed)?
    }

    /// Displayed text of `region` (hidden tags elided).
    pub async fn render(&self, region: &str) -> Result<String, SinkError> {
        let region = region.to_string();
        self.request(|reply| DocRequest::Render { region, reply })
            .await
    }

    /// Copy of the whole document as it is right now.
    pub async fn snapshot(&self) -> Result<Document, SinkError> {
        let (reply, reply_rx) = oneshot::channel();
        self.tx
            .send(DocRequest::Snapshot { reply })
            .await
            .map_err(|_| SinkError::Closed)?;
        reply_rx.await.map_err(|_| SinkError::Closed)
    }
}

impl DocumentSink for DocumentHandle {
    fn create_region(&self, region: &str) -> SinkFuture<'_, ()> {
        let region = region.to_string();
        Box::pin(self.request(|reply| DocRequest::CreateRegion { region, reply }))
    }

    fn insert_text(
        &self,
        region: &str,
        index: TextIndex,
        text: String,
        tag: Option<Tag>,
    ) -> SinkFuture<'_, Position> {
        let region = region.to_string();
        Box::pin(self.request(|reply| DocRequest::InsertText {
            region,
            index,
            text,
            tag,
            reply,
        }))
    }

    fn insert_block(&self, region: &str, block: Vec<Insertion>) -> SinkFuture<'_, Position> {
        let region = region.to_string();
        Box::pin(self.request(|reply| DocRequest::InsertBlock {
            region,
            block,
            reply,
        }))
    }

    fn line_count(&self, region: &str) -> SinkFuture<'_, usize> {
        let region = region.to_string();
        Box::pin(self.request(|reply| DocRequest::LineCount { region, reply }))
    }

    fn line(&self, region: &str, line: usize) -> SinkFuture<'_, Option<String>> {
        let region = region.to_string();
        Box::pin(self.request(move |reply| DocRequest::Line {
            region,
            line,
            reply,
        }))
    }

    fn query_index(&self, region: &str, index: TextIndex) -> SinkFuture<'_, Position> {
        let region = region.to_string();
        Box::pin(self.request(|reply| DocRequest::QueryIndex {
            region,
            index,
            reply,
        }))
    }

    fn configure_tag_visibility(
        &self,
        region: &str,
        tag: Tag,
        hidden: bool,
    ) -> SinkFuture<'_, ()> {
        let region = region.to_string();
        Box::pin(self.request(move |reply| DocRequest::SetTagVisibility {
            region,
            tag,
            hidden,
            reply,
        }))
    }

    fn bind_click(&self, region: &str, tag: Tag, action: ClickAction) -> SinkFuture<'_, ()> {
        let region = region.to_string();
        Box::pin(self.request(move |reply| DocRequest::BindClick {
            region,
            tag,
            action,
            reply,
        }))
    }

    fn click(&self, region: &str, tag: Tag) -> SinkFuture<'_, Option<Visibility>> {
        let region = region.to_string();
        Box::pin(self.request(|reply| DocRequest::Click { region, tag, reply }))
    }
}
