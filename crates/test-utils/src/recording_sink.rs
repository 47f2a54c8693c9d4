use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use edi::document::{
    ClickAction, Document, DocumentSink, Insertion, Position, SinkFuture, Tag, TextIndex,
};
use edi::errors::SinkError;
use edi::types::Visibility;

/// One call observed by [`RecordingSink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkCall {
    CreateRegion(String),
    InsertText {
        region: String,
        index: TextIndex,
        text: String,
        tag: Option<Tag>,
    },
    InsertBlock {
        region: String,
        block: Vec<Insertion>,
    },
    SetTagVisibility {
        region: String,
        tag: Tag,
        hidden: bool,
    },
    BindClick {
        region: String,
        tag: Tag,
        action: ClickAction,
    },
    Click {
        region: String,
        tag: Tag,
    },
}

/// A document sink for tests that:
/// - applies every call to an in-memory `Document` under a mutex
/// - records mutating calls in order
/// - can be told to refuse output appends (inserts at a tag end).
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    document: Arc<Mutex<Document>>,
    calls: Arc<Mutex<Vec<SinkCall>>>,
    reject_appends: Arc<AtomicBool>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sink whose inserts at `TextIndex::TagEnd` all fail.
    pub fn rejecting_appends() -> Self {
        let sink = Self::default();
        sink.reject_appends.store(true, Ordering::SeqCst);
        sink
    }

    pub fn calls(&self) -> Vec<SinkCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Copy of the document as it is right now.
    pub fn document(&self) -> Document {
        self.document.lock().unwrap().clone()
    }

    pub fn text(&self, region: &str) -> String {
        self.document.lock().unwrap().text(region).unwrap()
    }

    pub fn render(&self, region: &str) -> String {
        self.document.lock().unwrap().render(region).unwrap()
    }

    pub fn tag_text(&self, region: &str, tag: &Tag) -> Option<String> {
        self.document.lock().unwrap().tag_text(region, tag).unwrap()
    }

    fn record(&self, call: SinkCall) {
        self.calls.lock().unwrap().push(call);
    }

    fn with_doc<T>(&self, f: impl FnOnce(&mut Document) -> T) -> T {
        let mut doc = self.document.lock().unwrap();
        f(&mut doc)
    }
}

impl DocumentSink for RecordingSink {
    fn create_region(&self, region: &str) -> SinkFuture<'_, ()> {
        self.record(SinkCall::CreateRegion(region.to_string()));
        let result = self.with_doc(|doc| doc.create_region(region));
        Box::pin(async move { result })
    }

    fn insert_text(
        &self,
        region: &str,
        index: TextIndex,
        text: String,
        tag: Option<Tag>,
    ) -> SinkFuture<'_, Position> {
        self.record(SinkCall::InsertText {
            region: region.to_string(),
            index: index.clone(),
            text: text.clone(),
            tag: tag.clone(),
        });

        let result = if self.reject_appends.load(Ordering::SeqCst)
            && matches!(index, TextIndex::TagEnd(_))
        {
            Err(SinkError::Rejected("appends disabled".to_string()))
        } else {
            self.with_doc(|doc| doc.insert_text(region, &index, text, tag))
        };
        Box::pin(async move { result })
    }

    fn insert_block(&self, region: &str, block: Vec<Insertion>) -> SinkFuture<'_, Position> {
        self.record(SinkCall::InsertBlock {
            region: region.to_string(),
            block: block.clone(),
        });
        let result = self.with_doc(|doc| doc.insert_block(region, block));
        Box::pin(async move { result })
    }

    fn line_count(&self, region: &str) -> SinkFuture<'_, usize> {
        let result = self.with_doc(|doc| doc.line_count(region));
        Box::pin(async move { result })
    }

    fn line(&self, region: &str, line: usize) -> SinkFuture<'_, Option<String>> {
        let result = self.with_doc(|doc| doc.line(region, line));
        Box::pin(async move { result })
    }

    fn query_index(&self, region: &str, index: TextIndex) -> SinkFuture<'_, Position> {
        let result = self.with_doc(|doc| doc.query_index(region, &index));
        Box::pin(async move { result })
    }

    fn configure_tag_visibility(
        &self,
        region: &str,
        tag: Tag,
        hidden: bool,
    ) -> SinkFuture<'_, ()> {
        self.record(SinkCall::SetTagVisibility {
            region: region.to_string(),
            tag: tag.clone(),
            hidden,
        });
        let result = self.with_doc(|doc| doc.configure_tag_visibility(region, tag, hidden));
        Box::pin(async move { result })
    }

    fn bind_click(&self, region: &str, tag: Tag, action: ClickAction) -> SinkFuture<'_, ()> {
        self.record(SinkCall::BindClick {
            region: region.to_string(),
            tag: tag.clone(),
            action,
        });
        let result = self.with_doc(|doc| doc.bind_click(region, tag, action));
        Box::pin(async move { result })
    }

    fn click(&self, region: &str, tag: Tag) -> SinkFuture<'_, Option<Visibility>> {
        self.record(SinkCall::Click {
            region: region.to_string(),
            tag: tag.clone(),
        });
        let result = self.with_doc(|doc| doc.click(region, &tag));
        Box::pin(async move { result })
    }
}
