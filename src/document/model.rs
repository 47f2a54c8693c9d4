// src/document/model.rs

//! Pure, synchronous text model behind the document writer.
//!
//! A region's content is an ordered list of spans, each optionally carrying
//! one [`Tag`]. Commands find their output region by tag rather than by
//! line number, so text inserted elsewhere (another command's block, user
//! text) never shifts where an append lands.
//!
//! Nothing here touches Tokio or channels; the async side lives in
//! [`super::writer`].

use std::collections::{BTreeMap, HashMap, HashSet};

use tracing::debug;

use crate::document::index::{Position, TextIndex};
use crate::document::tags::{ClickAction, Insertion, Tag};
use crate::document::toggle::ToggleController;
use crate::errors::SinkError;
use crate::types::{CommandId, Visibility};

/// Name of a text container (one per shell).
pub type RegionName = String;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Span {
    text: String,
    tag: Option<Tag>,
    /// Line breaks in `text`.
    newlines: usize,
}

impl Span {
    fn new(text: String, tag: Option<Tag>) -> Self {
        let newlines = count_newlines(&text);
        Self {
            text,
            tag,
            newlines,
        }
    }

    fn push(&mut self, text: &str) {
        self.newlines += count_newlines(text);
        self.text.push_str(text);
    }
}

fn count_newlines(text: &str) -> usize {
    text.bytes().filter(|b| *b == b'\n').count()
}

/// Content of one region, plus its tag configuration.
///
/// Every span caches its line-break count, so locating a line or the
/// position of an append walks span headers instead of the region's text.
/// Appending to the end of a span never copies what is already there.
#[derive(Debug, Clone, Default)]
pub struct TextBuffer {
    spans: Vec<Span>,
    hidden: HashSet<Tag>,
    bindings: HashMap<Tag, ClickAction>,
}

impl TextBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Full text, hidden tags included.
    pub fn text(&self) -> String {
        self.spans.iter().map(|s| s.text.as_str()).collect()
    }

    /// Text as displayed: spans carrying a hidden tag are elided.
    pub fn render(&self) -> String {
        self.spans
            .iter()
            .filter(|s| !s.tag.as_ref().is_some_and(|t| self.hidden.contains(t)))
            .map(|s| s.text.as_str())
            .collect()
    }

    /// Length in bytes.
    pub fn len(&self) -> usize {
        self.spans.iter().map(|s| s.text.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    /// Number of lines; an empty buffer has one (empty) line.
    pub fn line_count(&self) -> usize {
        self.spans.iter().map(|s| s.newlines).sum::<usize>() + 1
    }

    /// Text of the 1-based `line`, without its line break.
    pub fn line(&self, line: usize) -> Option<String> {
        if line == 0 {
            return None;
        }
        let start = self.line_start(line)?;
        Some(
            self.chars_from(start)
                .map(|(_, c)| c)
                .take_while(|c| *c != '\n')
                .collect(),
        )
    }

    /// All text carrying `tag`, in document order.
    pub fn tag_text(&self, tag: &Tag) -> Option<String> {
        let mut found = false;
        let mut out = String::new();
        for span in self.spans.iter().filter(|s| s.tag.as_ref() == Some(tag)) {
            found = true;
            out.push_str(&span.text);
        }
        found.then_some(out)
    }

    pub fn has_tag(&self, tag: &Tag) -> bool {
        self.spans.iter().any(|s| s.tag.as_ref() == Some(tag))
    }

    /// Byte offset for `index`, or `None` if it names a tag with no text.
    pub fn resolve(&self, index: &TextIndex) -> Option<usize> {
        match index {
            TextIndex::At(pos) => Some(self.offset_of(*pos)),
            TextIndex::LineEnd(line) => Some(self.offset_of(Position::new(*line, usize::MAX))),
            TextIndex::End => Some(self.len()),
            TextIndex::TagEnd(tag) => {
                let last = self.spans.iter().rposition(|s| s.tag.as_ref() == Some(tag))?;
                Some(self.spans[..=last].iter().map(|s| s.text.len()).sum())
            }
        }
    }

    /// Position of a byte offset (clamped to the end of the buffer, and back
    /// to the previous character boundary).
    pub fn position_of(&self, offset: usize) -> Position {
        let offset = self.char_floor(offset);
        let mut line = 1;
        let mut line_start = 0;
        let mut start = 0;

        for span in &self.spans {
            if start >= offset {
                break;
            }
            let end = start + span.text.len();
            if end <= offset {
                line += span.newlines;
                if span.newlines > 0 {
                    line_start = start + span.text.rfind('\n').map_or(0, |i| i + 1);
                }
            } else {
                let head = &span.text[..offset - start];
                line += count_newlines(head);
                if let Some(i) = head.rfind('\n') {
                    line_start = start + i + 1;
                }
            }
            start = end;
        }

        let column = self
            .chars_from(line_start)
            .take_while(|(i, _)| *i < offset)
            .count();
        Position::new(line, column)
    }

    /// Insert `text` at byte `offset`, returning where it starts.
    pub fn insert(&mut self, offset: usize, text: String, tag: Option<Tag>) -> Position {
        let offset = self.char_floor(offset);
        let position = self.position_of(offset);
        if !text.is_empty() {
            let at = self.split_at(offset);
            if at > 0 && self.spans[at - 1].tag == tag {
                self.spans[at - 1].push(&text);
            } else {
                self.spans.insert(at, Span::new(text, tag));
            }
        }
        position
    }

    /// Write a block on a fresh line at the end of the buffer.
    ///
    /// The anchor is the last line. If it already holds text, a line break is
    /// inserted first and the anchor moves down one line. Returns the anchor.
    pub fn insert_block(&mut self, block: Vec<Insertion>) -> Position {
        let mut anchor = self.line_count();
        if self.spans.last().is_some_and(|s| !s.text.ends_with('\n')) {
            self.insert(self.len(), "\n".to_string(), None);
            anchor += 1;
        }
        for Insertion { text, tag } in block {
            self.insert(self.len(), text, tag);
        }
        Position::line_start(anchor)
    }

    pub fn set_hidden(&mut self, tag: Tag, hidden: bool) {
        if hidden {
            self.hidden.insert(tag);
        } else {
            self.hidden.remove(&tag);
        }
    }

    pub fn is_hidden(&self, tag: &Tag) -> bool {
        self.hidden.contains(tag)
    }

    pub fn bind(&mut self, tag: Tag, action: ClickAction) {
        self.bindings.insert(tag, action);
    }

    pub fn binding(&self, tag: &Tag) -> Option<ClickAction> {
        self.bindings.get(tag).copied()
    }

    /// Byte offset where the 1-based `line` begins, `None` past the last line.
    fn line_start(&self, line: usize) -> Option<usize> {
        let mut wanted = line.saturating_sub(1);
        if wanted == 0 {
            return Some(0);
        }
        let mut start = 0;
        for span in &self.spans {
            if span.newlines < wanted {
                wanted -= span.newlines;
                start += span.text.len();
                continue;
            }
            let (i, _) = span.text.match_indices('\n').nth(wanted - 1)?;
            return Some(start + i + 1);
        }
        None
    }

    /// Characters from byte `offset` to the end, with their byte offsets.
    fn chars_from(&self, offset: usize) -> impl Iterator<Item = (usize, char)> + '_ {
        let mut start = 0;
        self.spans.iter().flat_map(move |span| {
            let span_start = start;
            start += span.text.len();
            let skip = offset.saturating_sub(span_start).min(span.text.len());
            span.text[skip..]
                .char_indices()
                .map(move |(i, c)| (span_start + skip + i, c))
        })
    }

    fn offset_of(&self, pos: Position) -> usize {
        let Some(start) = self.line_start(pos.line.max(1)) else {
            return self.len();
        };
        for (column, (i, c)) in self.chars_from(start).enumerate() {
            if c == '\n' || column == pos.column {
                return i;
            }
        }
        self.len()
    }

    /// `offset` clamped to the buffer and moved back to a character boundary.
    fn char_floor(&self, offset: usize) -> usize {
        let mut start = 0;
        for span in &self.spans {
            let end = start + span.text.len();
            if offset < end {
                let mut local = offset - start;
                while !span.text.is_char_boundary(local) {
                    local -= 1;
                }
                return start + local;
            }
            start = end;
        }
        start
    }

    /// Make sure a span boundary exists at `offset` and return the index of
    /// the span that starts there (or `spans.len()` at the end).
    fn split_at(&mut self, offset: usize) -> usize {
        let mut start = 0;
        for i in 0..self.spans.len() {
            if offset == start {
                return i;
            }
            let len = self.spans[i].text.len();
            if offset < start + len {
                let tail = self.spans[i].text.split_off(offset - start);
                let tail = Span::new(tail, self.spans[i].tag.clone());
                self.spans[i].newlines -= tail.newlines;
                self.spans.insert(i + 1, tail);
                return i + 1;
            }
            start += len;
        }
        self.spans.len()
    }
}

/// All regions of the document plus the visibility state of every command.
#[derive(Debug, Clone, Default)]
pub struct Document {
    regions: BTreeMap<RegionName, TextBuffer>,
    toggles: ToggleController,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_region(&mut self, region: &str) -> Result<(), SinkError> {
        if self.regions.contains_key(region) {
            return Err(SinkError::RegionExists(region.to_string()));
        }
        debug!(region, "created document region");
        self.regions.insert(region.to_string(), TextBuffer::new());
        Ok(())
    }

    pub fn region_names(&self) -> impl Iterator<Item = &str> {
        self.regions.keys().map(String::as_str)
    }

    pub fn region(&self, region: &str) -> Result<&TextBuffer, SinkError> {
        self.regions
            .get(region)
            .ok_or_else(|| SinkError::UnknownRegion(region.to_string()))
    }

    fn region_mut(&mut self, region: &str) -> Result<&mut TextBuffer, SinkError> {
        self.regions
            .get_mut(region)
            .ok_or_else(|| SinkError::UnknownRegion(region.to_string()))
    }

    pub fn insert_text(
        &mut self,
        region: &str,
        index: &TextIndex,
        text: String,
        tag: Option<Tag>,
    ) -> Result<Position, SinkError> {
        let buffer = self.region_mut(region)?;
        let offset = resolve_in(buffer, region, index)?;
        Ok(buffer.insert(offset, text, tag))
    }

    pub fn insert_block(
        &mut self,
        region: &str,
        block: Vec<Insertion>,
    ) -> Result<Position, SinkError> {
        Ok(self.region_mut(region)?.insert_block(block))
    }

    pub fn line_count(&self, region: &str) -> Result<usize, SinkError> {
        Ok(self.region(region)?.line_count())
    }

    pub fn line(&self, region: &str, line: usize) -> Result<Option<String>, SinkError> {
        Ok(self.region(region)?.line(line))
    }

    pub fn query_index(&self, region: &str, index: &TextIndex) -> Result<Position, SinkError> {
        let buffer = self.region(region)?;
        let offset = resolve_in(buffer, region, index)?;
        Ok(buffer.position_of(offset))
    }

    /// Hide or show every span carrying `tag`.
    ///
    /// Output tags also update the toggle state, so a later click flips from
    /// whatever was configured here.
    pub fn configure_tag_visibility(
        &mut self,
        region: &str,
        tag: Tag,
        hidden: bool,
    ) -> Result<(), SinkError> {
        if let Tag::Output(id) = tag {
            self.toggles.set(id, Visibility::from_hidden(hidden));
        }
        self.region_mut(region)?.set_hidden(tag, hidden);
        Ok(())
    }

    pub fn bind_click(
        &mut self,
        region: &str,
        tag: Tag,
        action: ClickAction,
    ) -> Result<(), SinkError> {
        self.region_mut(region)?.bind(tag, action);
        Ok(())
    }

    /// Dispatch a click on `tag`. Returns the new visibility if the click
    /// toggled an output region, `None` if nothing is bound.
    pub fn click(&mut self, region: &str, tag: &Tag) -> Result<Option<Visibility>, SinkError> {
        let Some(action) = self.region(region)?.binding(tag) else {
            return Ok(None);
        };
        match action {
            ClickAction::ToggleOutput(id) => {
                let visibility = self.toggles.toggle(id);
                self.region_mut(region)?
                    .set_hidden(Tag::Output(id), visibility.is_hidden());
                Ok(Some(visibility))
            }
        }
    }

    pub fn visibility(&self, id: CommandId) -> Visibility {
        self.toggles.visibility(id)
    }

    pub fn render(&self, region: &str) -> Result<String, SinkError> {
        Ok(self.region(region)?.render())
    }

    pub fn text(&self, region: &str) -> Result<String, SinkError> {
        Ok(self.region(region)?.text())
    }

    pub fn tag_text(&self, region: &str, tag: &Tag) -> Result<Option<String>, SinkError> {
        Ok(self.region(region)?.tag_text(tag))
    }
}

fn resolve_in(buffer: &TextBuffer, region: &str, index: &TextIndex) -> Result<usize, SinkError> {
    buffer.resolve(index).ok_or_else(|| match index {
        TextIndex::TagEnd(tag) => SinkError::UnknownTag {
            region: region.to_string(),
            tag: tag.to_string(),
        },
        _ => SinkError::Rejected(format!("cannot resolve index {index:?}")),
    })
}
