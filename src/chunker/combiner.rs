use std::iter::Fuse;
use tracing::debug;

use super::options::ChunkingOptions;
use super::pre_chunk::{PreChunk, TextPreChunk};
use super::TEXT_SEPARATOR_LEN;

/// Accumulates whole text pre-chunks for combining into one
///
/// Each accumulated pre-chunk with text counts as one segment of the
/// combined text.
#[derive(Debug, Clone)]
pub struct TextPreChunkAccumulator {
    maxlen: usize,
    pre_chunks: Vec<TextPreChunk>,
    text_len: usize,
    segment_count: usize,
}

impl TextPreChunkAccumulator {
    pub fn new(maxlen: usize) -> Self {
        Self {
            maxlen,
            pre_chunks: Vec::new(),
            text_len: 0,
            segment_count: 0,
        }
    }

    pub fn add_pre_chunk(&mut self, pre_chunk: TextPreChunk) {
        let len = pre_chunk.text_length();
        if len > 0 {
            self.text_len += len;
            self.segment_count += 1;
        }
        self.pre_chunks.push(pre_chunk);
    }

    pub fn is_empty(&self) -> bool {
        self.pre_chunks.is_empty()
    }

    /// Length of the combined text, separators included
    pub fn text_length(&self) -> usize {
        self.text_len + TEXT_SEPARATOR_LEN * self.segment_count.saturating_sub(1)
    }

    /// Longest pre-chunk that could still be added without passing `maxlen`
    pub fn remaining_space(&self) -> usize {
        self.maxlen
            .saturating_sub(self.text_len)
            .saturating_sub(TEXT_SEPARATOR_LEN * self.segment_count)
    }

    /// Combine everything accumulated into one pre-chunk and start over
    pub fn flush(&mut self) -> Option<TextPreChunk> {
        if self.pre_chunks.is_empty() {
            return None;
        }

        let elements = std::mem::take(&mut self.pre_chunks)
            .into_iter()
            .flat_map(TextPreChunk::into_elements)
            .collect();
        self.text_len = 0;
        self.segment_count = 0;
        Some(TextPreChunk::new(elements))
    }
}

/// Fuses runs of small adjacent text pre-chunks
///
/// A text pre-chunk joins the ones before it while the accumulated length is
/// under `combine_text_under_n_chars` and the result stays within `maxlen`.
/// Table pre-chunks are never combined and pass through in place.
pub struct PreChunkCombiner<I: Iterator<Item = PreChunk>> {
    pre_chunks: Fuse<I>,
    accumulator: TextPreChunkAccumulator,
    combine_text_under_n_chars: usize,
    pending: Option<PreChunk>,
}

impl<I: Iterator<Item = PreChunk>> PreChunkCombiner<I> {
    pub fn new<T>(pre_chunks: T, maxlen: usize, combine_text_under_n_chars: usize) -> Self
    where
        T: IntoIterator<IntoIter = I>,
    {
        Self {
            pre_chunks: pre_chunks.into_iter().fuse(),
            accumulator: TextPreChunkAccumulator::new(maxlen),
            combine_text_under_n_chars,
            pending: None,
        }
    }

    pub fn from_options<T>(pre_chunks: T, options: &ChunkingOptions) -> Self
    where
        T: IntoIterator<IntoIter = I>,
    {
        Self::new(
            pre_chunks,
            options.max_characters(),
            options.combine_text_under_n_chars(),
        )
    }

    fn flush(&mut self) -> Option<PreChunk> {
        let combined = self.accumulator.flush()?;
        debug!(
            elements = combined.elements().len(),
            text_length = combined.text_length(),
            "emitting combined pre-chunk"
        );
        Some(PreChunk::Text(combined))
    }
}

impl<I: Iterator<Item = PreChunk>> Iterator for PreChunkCombiner<I> {
    type Item = PreChunk;

    fn next(&mut self) -> Option<PreChunk> {
        if let Some(pre_chunk) = self.pending.take() {
            return Some(pre_chunk);
        }

        loop {
            match self.pre_chunks.next() {
                Some(PreChunk::Table(table)) => {
                    let table = PreChunk::Table(table);
                    return match self.flush() {
                        Some(combined) => {
                            self.pending = Some(table);
                            Some(combined)
                        }
                        None => Some(table),
                    };
                }
                Some(PreChunk::Text(pre_chunk)) => {
                    let full = !self.accumulator.is_empty()
                        && (self.accumulator.remaining_space() < pre_chunk.text_length()
                            || self.accumulator.text_length() >= self.combine_text_under_n_chars);
                    let combined = if full { self.flush() } else { None };

                    self.accumulator.add_pre_chunk(pre_chunk);

                    if combined.is_some() {
                        return combined;
                    }
                }
                None => return self.flush(),
            }
        }
    }
}
