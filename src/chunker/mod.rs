mod builder;
mod chunk;
mod combiner;
mod consolidation;
mod error;
mod options;
mod pre_chunk;
mod splitter;
mod window;

#[cfg(test)]
mod tests;

pub use builder::TextPreChunkBuilder;
pub use chunk::{Chunk, PreChunkChunks, TableChunks, TextChunks};
pub use combiner::{PreChunkCombiner, TextPreChunkAccumulator};
pub use consolidation::{
    all_metadata_values, consolidate, consolidate_regex_metadata, ConsolidationStrategy,
    MetadataValues,
};
pub use error::{ChunkingError, Result};
pub use options::{ChunkingOptions, ChunkingOptionsBuilder, DEFAULT_MAX_CHARACTERS};
pub use pre_chunk::{PreChunk, TablePreChunk, TextPreChunk};
pub use splitter::BoundarySplitter;

use crate::element::Element;

/// Joins the texts of the elements in a chunk
pub const TEXT_SEPARATOR: &str = "\n\n";

/// Length of [`TEXT_SEPARATOR`] in characters
pub(crate) const TEXT_SEPARATOR_LEN: usize = 2;

/// Chunk elements, starting a new chunk at every section boundary
///
/// Titles, tables, section changes and (optionally) page changes close the
/// current chunk. Small neighbouring sections are then combined, and
/// anything longer than `max_characters` is split into windows.
pub fn chunk_by_title<T>(elements: T, options: &ChunkingOptions) -> Vec<Chunk>
where
    T: IntoIterator<Item = Element>,
{
    iter_chunks_by_title(elements, options).collect()
}

/// Lazy form of [`chunk_by_title`]
pub fn iter_chunks_by_title<T>(
    elements: T,
    options: &ChunkingOptions,
) -> impl Iterator<Item = Chunk>
where
    T: IntoIterator<Item = Element>,
{
    let maxlen = options.max_characters();
    let pre_chunks = BoundarySplitter::from_options(elements, options);

    PreChunkCombiner::from_options(pre_chunks, options)
        .flat_map(move |pre_chunk| pre_chunk.iter_chunks(maxlen))
}
