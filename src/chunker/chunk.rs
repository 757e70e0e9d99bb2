use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::trace;

use super::window::{char_len, TextWindows};
use crate::element::{Element, ElementMetadata};

/// A chunk ready for embedding/indexing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Chunk {
    /// Text of one or more consecutive elements
    ///
    /// All chunks cut from the same pre-chunk share one metadata record.
    CompositeElement {
        text: String,
        metadata: Arc<ElementMetadata>,
    },
    /// A table that fit in the window, passed through unchanged
    Table {
        text: String,
        metadata: ElementMetadata,
    },
    /// One slice of a table too large for the window
    TableChunk {
        text: String,
        metadata: ElementMetadata,
    },
}

impl Chunk {
    pub fn text(&self) -> &str {
        match self {
            Chunk::CompositeElement { text, .. }
            | Chunk::Table { text, .. }
            | Chunk::TableChunk { text, .. } => text.as_str(),
        }
    }

    pub fn metadata(&self) -> &ElementMetadata {
        match self {
            Chunk::CompositeElement { metadata, .. } => metadata.as_ref(),
            Chunk::Table { metadata, .. } | Chunk::TableChunk { metadata, .. } => metadata,
        }
    }

    /// Length of the text in characters
    pub fn text_length(&self) -> usize {
        char_len(self.text())
    }
}

/// Chunks of a text pre-chunk
///
/// Yields one chunk when the text fits in the window, otherwise consecutive
/// windows of exactly `maxlen` characters (the last may be shorter).
#[derive(Debug, Clone)]
pub struct TextChunks {
    windows: TextWindows,
    metadata: Arc<ElementMetadata>,
}

impl TextChunks {
    pub(crate) fn new(text: String, maxlen: usize, metadata: Arc<ElementMetadata>) -> Self {
        let text_length = char_len(&text);
        if text_length > maxlen {
            trace!(text_length, maxlen, "splitting oversized text pre-chunk");
        }

        Self {
            windows: TextWindows::new(text, maxlen),
            metadata,
        }
    }
}

impl Iterator for TextChunks {
    type Item = Chunk;

    fn next(&mut self) -> Option<Chunk> {
        self.windows.next().map(|text| Chunk::CompositeElement {
            text,
            metadata: Arc::clone(&self.metadata),
        })
    }
}

/// Chunks of a table pre-chunk
///
/// Either the original table once, or table chunks cut from the text and the
/// HTML independently until both are used up. HTML is usually much longer
/// than the text, so trailing chunks commonly carry HTML with empty text.
#[derive(Debug, Clone)]
pub struct TableChunks {
    whole: Option<Element>,
    text: TextWindows,
    html: TextWindows,
    metadata: ElementMetadata,
}

impl TableChunks {
    pub(crate) fn new(table: &Element, maxlen: usize) -> Self {
        let html = table.metadata.text_as_html.as_deref().unwrap_or("");

        if table.text_length() <= maxlen && char_len(html) <= maxlen {
            return Self {
                whole: Some(table.clone()),
                text: TextWindows::new(String::new(), maxlen),
                html: TextWindows::new(String::new(), maxlen),
                metadata: ElementMetadata::default(),
            };
        }

        trace!(
            text_length = table.text_length(),
            html_length = char_len(html),
            maxlen,
            "splitting oversized table"
        );

        Self {
            whole: None,
            text: TextWindows::new(table.text.clone(), maxlen),
            html: TextWindows::new(html.to_string(), maxlen),
            metadata: table.metadata.clone(),
        }
    }
}

impl Iterator for TableChunks {
    type Item = Chunk;

    fn next(&mut self) -> Option<Chunk> {
        if let Some(table) = self.whole.take() {
            return Some(Chunk::Table {
                text: table.text,
                metadata: table.metadata,
            });
        }

        if self.text.is_exhausted() && self.html.is_exhausted() {
            return None;
        }

        let text = self.text.next_window();
        let html = self.html.next_window();

        let mut metadata = self.metadata.clone();
        metadata.text_as_html = (!html.is_empty()).then_some(html);

        Some(Chunk::TableChunk { text, metadata })
    }
}

/// Chunks of either kind of pre-chunk
#[derive(Debug, Clone)]
pub enum PreChunkChunks {
    Text(TextChunks),
    Table(TableChunks),
}

impl Iterator for PreChunkChunks {
    type Item = Chunk;

    fn next(&mut self) -> Option<Chunk> {
        match self {
            PreChunkChunks::Text(chunks) => chunks.next(),
            PreChunkChunks::Table(chunks) => chunks.next(),
        }
    }
}
