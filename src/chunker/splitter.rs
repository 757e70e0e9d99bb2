use std::collections::VecDeque;
use std::iter::Fuse;
use tracing::debug;

use super::builder::TextPreChunkBuilder;
use super::options::ChunkingOptions;
use super::pre_chunk::{PreChunk, TablePreChunk};
use crate::element::{Element, ElementKind};

/// Section and page of the previous element, for boundary detection
#[derive(Debug, Clone, PartialEq)]
struct Position {
    section: Option<String>,
    page_number: Option<u32>,
}

impl Position {
    fn of(element: &Element) -> Self {
        Self {
            section: element.metadata.section.clone(),
            page_number: element.metadata.page_number,
        }
    }
}

/// Partitions an element stream into pre-chunks at semantic boundaries
///
/// A pre-chunk is closed when:
/// - a Title starts a new section
/// - the `section` metadata changes
/// - the page number changes and sections may not span pages
/// - the next element would not fit in `max_characters`
/// - the accumulated text reaches `new_after_n_chars`
///
/// Every table becomes its own pre-chunk. Elements are pulled from the input
/// lazily and pre-chunks come out in input order.
pub struct BoundarySplitter<I: Iterator<Item = Element>> {
    elements: Fuse<I>,
    builder: TextPreChunkBuilder,
    pending: VecDeque<PreChunk>,
    prior: Option<Position>,
    multipage_sections: bool,
    new_after_n_chars: usize,
}

impl<I: Iterator<Item = Element>> BoundarySplitter<I> {
    pub fn new<T>(
        elements: T,
        multipage_sections: bool,
        new_after_n_chars: usize,
        max_characters: usize,
    ) -> Self
    where
        T: IntoIterator<IntoIter = I>,
    {
        Self {
            elements: elements.into_iter().fuse(),
            builder: TextPreChunkBuilder::new(max_characters),
            pending: VecDeque::new(),
            prior: None,
            multipage_sections,
            new_after_n_chars,
        }
    }

    pub fn from_options<T>(elements: T, options: &ChunkingOptions) -> Self
    where
        T: IntoIterator<IntoIter = I>,
    {
        Self::new(
            elements,
            options.multipage_sections(),
            options.new_after_n_chars(),
            options.max_characters(),
        )
    }

    fn flush(&mut self, reason: &str) {
        if let Some(pre_chunk) = self.builder.flush() {
            debug!(
                reason,
                elements = pre_chunk.elements().len(),
                text_length = pre_chunk.text_length(),
                "closing text pre-chunk"
            );
            self.pending.push_back(PreChunk::Text(pre_chunk));
        }
    }

    fn metadata_differs(&self, position: &Position) -> bool {
        match &self.prior {
            None => false,
            Some(prior) => {
                prior.section != position.section
                    || (!self.multipage_sections && prior.page_number != position.page_number)
            }
        }
    }

    fn process(&mut self, element: Element) {
        let position = Position::of(&element);
        let metadata_differs = self.metadata_differs(&position);
        self.prior = Some(position);

        let starts_section = match element.kind {
            ElementKind::Table => {
                self.flush("table");
                self.pending
                    .push_back(PreChunk::Table(TablePreChunk::new(element)));
                return;
            }
            ElementKind::Title => true,
            ElementKind::NarrativeText
            | ElementKind::ListItem
            | ElementKind::CheckBox
            | ElementKind::UncategorizedText
            | ElementKind::Text
            | ElementKind::Header
            | ElementKind::Footer
            | ElementKind::FigureCaption
            | ElementKind::Address
            | ElementKind::EmailAddress
            | ElementKind::Formula
            | ElementKind::Image
            | ElementKind::PageBreak
            | ElementKind::PageNumber
            | ElementKind::CodeSnippet
            | ElementKind::Footnote
            | ElementKind::FormKeysValues
            | ElementKind::Unknown => false,
        };

        if starts_section {
            self.flush("title");
        } else if metadata_differs {
            self.flush("section or page change");
        } else if self.builder.remaining_space() < element.text_length() {
            self.flush("window full");
        }

        self.builder.add_element(element);

        if self.builder.text_length() >= self.new_after_n_chars {
            self.flush("soft limit reached");
        }
    }
}

impl<I: Iterator<Item = Element>> Iterator for BoundarySplitter<I> {
    type Item = PreChunk;

    fn next(&mut self) -> Option<PreChunk> {
        loop {
            if let Some(pre_chunk) = self.pending.pop_front() {
                return Some(pre_chunk);
            }

            match self.elements.next() {
                Some(element) => self.process(element),
                None => {
                    self.flush("end of input");
                    return self.pending.pop_front();
                }
            }
        }
    }
}
