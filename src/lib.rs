// Public API exports
pub mod chunker;
pub mod element;

// Re-export main types for convenience
pub use element::{
    CoordinatesMetadata, Element, ElementKind, ElementMetadata, FieldValue, MetadataError,
    MetadataField, RegexMetadata, RegexMetadataMap,
};

pub use chunker::{
    chunk_by_title, iter_chunks_by_title, BoundarySplitter, Chunk, ChunkingError,
    ChunkingOptions, ChunkingOptionsBuilder, ConsolidationStrategy, PreChunk, PreChunkCombiner,
    TablePreChunk, TextPreChunk, TEXT_SEPARATOR,
};
