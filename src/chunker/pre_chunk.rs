use std::cell::OnceCell;
use std::sync::Arc;

use super::chunk::{PreChunkChunks, TableChunks, TextChunks};
use super::consolidation::{
    all_metadata_values, consolidate, consolidate_regex_metadata, MetadataValues,
};
use super::{TEXT_SEPARATOR, TEXT_SEPARATOR_LEN};
use crate::element::{Element, ElementKind, ElementMetadata, RegexMetadataMap};

/// A semantic unit of elements awaiting conversion into chunks
#[derive(Debug, Clone, PartialEq)]
pub enum PreChunk {
    Text(TextPreChunk),
    Table(TablePreChunk),
}

impl PreChunk {
    /// Length of the text this pre-chunk would produce before any splitting
    pub fn text_length(&self) -> usize {
        match self {
            PreChunk::Text(pre_chunk) => pre_chunk.text_length(),
            PreChunk::Table(pre_chunk) => pre_chunk.table().text_length(),
        }
    }

    /// Chunks of at most `maxlen` characters of text each
    pub fn iter_chunks(&self, maxlen: usize) -> PreChunkChunks {
        match self {
            PreChunk::Text(pre_chunk) => PreChunkChunks::Text(pre_chunk.iter_chunks(maxlen)),
            PreChunk::Table(pre_chunk) => PreChunkChunks::Table(pre_chunk.iter_chunks(maxlen)),
        }
    }
}

/// A single table, always chunked on its own
#[derive(Debug, Clone, PartialEq)]
pub struct TablePreChunk {
    table: Element,
}

impl TablePreChunk {
    pub(crate) fn new(table: Element) -> Self {
        debug_assert_eq!(table.kind, ElementKind::Table);
        Self { table }
    }

    pub fn table(&self) -> &Element {
        &self.table
    }

    /// The table itself when text and HTML both fit, otherwise table chunks
    pub fn iter_chunks(&self, maxlen: usize) -> TableChunks {
        TableChunks::new(&self.table, maxlen)
    }
}

/// A sequence of non-table elements belonging to one section
///
/// Immutable once built. The joined text and consolidated metadata are
/// computed on first use and then reused.
#[derive(Debug, Clone)]
pub struct TextPreChunk {
    elements: Vec<Element>,
    text_length: usize,
    joined_text: OnceCell<String>,
    consolidated_metadata: OnceCell<Arc<ElementMetadata>>,
}

impl PartialEq for TextPreChunk {
    fn eq(&self, other: &Self) -> bool {
        self.elements == other.elements
    }
}

impl TextPreChunk {
    pub(crate) fn new(elements: Vec<Element>) -> Self {
        debug_assert!(elements.iter().all(|e| e.kind != ElementKind::Table));

        let (total, segments) = elements
            .iter()
            .map(Element::text_length)
            .filter(|&len| len > 0)
            .fold((0usize, 0usize), |(total, segments), len| (total + len, segments + 1));

        Self {
            elements,
            text_length: total + TEXT_SEPARATOR_LEN * segments.saturating_sub(1),
            joined_text: OnceCell::new(),
            consolidated_metadata: OnceCell::new(),
        }
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn into_elements(self) -> Vec<Element> {
        self.elements
    }

    /// New pre-chunk with the elements of `other` appended to ours
    pub fn combine(&self, other: &TextPreChunk) -> TextPreChunk {
        let elements = self
            .elements
            .iter()
            .chain(other.elements.iter())
            .cloned()
            .collect();
        TextPreChunk::new(elements)
    }

    /// Length of the joined text, separators included
    pub fn text_length(&self) -> usize {
        self.text_length
    }

    /// Element texts joined by a blank line
    ///
    /// Elements without text contribute neither text nor a separator.
    pub fn joined_text(&self) -> &str {
        self.joined_text.get_or_init(|| {
            self.elements
                .iter()
                .map(|e| e.text.as_str())
                .filter(|text| !text.is_empty())
                .collect::<Vec<_>>()
                .join(TEXT_SEPARATOR)
        })
    }

    /// Values of every populated metadata field across the elements
    pub fn all_metadata_values(&self) -> MetadataValues {
        all_metadata_values(self.elements.iter().map(|e| &e.metadata))
    }

    /// Regex matches of all elements, offsets moved into the joined text
    pub fn consolidated_regex_metadata(&self) -> RegexMetadataMap {
        let mut entries = Vec::new();
        let mut running_length = 0;

        for element in &self.elements {
            let text_length = element.text_length();
            if text_length == 0 {
                continue;
            }
            if running_length > 0 {
                running_length += TEXT_SEPARATOR_LEN;
            }
            let offset = running_length;
            running_length += text_length;

            if let Some(regex_metadata) = &element.metadata.regex_metadata {
                entries.push((offset, regex_metadata));
            }
        }

        consolidate_regex_metadata(entries)
    }

    /// Metadata shared by every chunk this pre-chunk produces
    ///
    /// Built once; each call hands out the same record.
    pub fn consolidated_metadata(&self) -> Arc<ElementMetadata> {
        let metadata = self.consolidated_metadata.get_or_init(|| {
            let values = self.all_metadata_values();
            Arc::new(consolidate(&values, self.consolidated_regex_metadata()))
        });
        Arc::clone(metadata)
    }

    /// Composite-element chunks of at most `maxlen` characters each
    pub fn iter_chunks(&self, maxlen: usize) -> TextChunks {
        TextChunks::new(
            self.joined_text().to_string(),
            maxlen,
            self.consolidated_metadata(),
        )
    }
}
