//! Document chunking strategies.
//!
//! This module provides the [`Chunker`] trait and two implementations:
//!
//! - [`FixedSizeChunker`] - splits by character count with configurable overlap
//! - [`RecursiveChunker`] - splits hierarchically by paragraphs, sentences, then words
//!
//! All sizes are measured in `char`s, never bytes, so multi-byte text
//! extracted from PDFs is never cut inside a code point.

use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::document::{CHUNK_INDEX_KEY, Chunk, Document};
use crate::error::RagError;

/// A strategy for splitting documents into chunks.
///
/// Implementations produce [`Chunk`]s with text and metadata but no embeddings.
/// Embeddings are attached later by the pipeline.
pub trait Chunker: Send + Sync {
    /// Split a document into chunks.
    ///
    /// Returns an empty `Vec` if the document has empty text.
    /// Each returned chunk has an empty embedding vector.
    fn chunk(&self, document: &Document) -> Vec<Chunk>;
}

/// Selects which [`Chunker`] the ingestion path uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChunkStrategy {
    /// Fixed-size character windows.
    #[default]
    Fixed,
    /// Paragraph / sentence / word aware splitting.
    Recursive,
}

impl ChunkStrategy {
    /// Build the chunker for this strategy.
    pub fn build(self, chunk_size: usize, chunk_overlap: usize) -> Arc<dyn Chunker> {
        match self {
            ChunkStrategy::Fixed => Arc::new(FixedSizeChunker::new(chunk_size, chunk_overlap)),
            ChunkStrategy::Recursive => Arc::new(RecursiveChunker::new(chunk_size, chunk_overlap)),
        }
    }

    /// Lowercase name used in configuration.
    pub fn as_str(self) -> &'static str {
        match self {
            ChunkStrategy::Fixed => "fixed",
            ChunkStrategy::Recursive => "recursive",
        }
    }
}

impl FromStr for ChunkStrategy {
    type Err = RagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fixed" => Ok(ChunkStrategy::Fixed),
            "recursive" => Ok(ChunkStrategy::Recursive),
            other => Err(RagError::ConfigError(format!(
                "unknown chunk strategy '{other}' (expected 'fixed' or 'recursive')"
            ))),
        }
    }
}

/// Splits text into fixed-size chunks by character count with configurable overlap.
///
/// Chunk IDs are generated as `{document_id}_{chunk_index}`. Each chunk inherits
/// the parent document's metadata plus a `chunk_index` field. With zero overlap a
/// text of `n` characters yields exactly `ceil(n / chunk_size)` chunks.
///
/// # Example
///
/// ```rust,ignore
/// use rfp_rag::FixedSizeChunker;
///
/// let chunker = FixedSizeChunker::new(500, 0);
/// let chunks = chunker.chunk(&document);
/// ```
#[derive(Debug, Clone)]
pub struct FixedSizeChunker {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl FixedSizeChunker {
    /// Create a new `FixedSizeChunker`.
    ///
    /// # Arguments
    ///
    /// * `chunk_size` - maximum number of characters per chunk
    /// * `chunk_overlap` - number of overlapping characters between consecutive chunks
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        Self { chunk_size, chunk_overlap }
    }
}

impl Chunker for FixedSizeChunker {
    fn chunk(&self, document: &Document) -> Vec<Chunk> {
        if document.text.is_empty() {
            return Vec::new();
        }

        split_by_size(&document.text, self.chunk_size, self.chunk_overlap)
            .into_iter()
            .enumerate()
            .map(|(i, text)| make_chunk(document, i, text))
            .collect()
    }
}

/// Splits text hierarchically: paragraphs → sentences → words.
///
/// First splits by paragraph separators (`\n\n`). If a paragraph exceeds
/// `chunk_size`, splits by sentence boundaries (`. `, `! `, `? `). If a
/// sentence still exceeds `chunk_size`, splits by word boundaries, and as a
/// last resort by characters. Overlap is applied only at that final
/// character-window level.
#[derive(Debug, Clone)]
pub struct RecursiveChunker {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl RecursiveChunker {
    /// Create a new `RecursiveChunker`.
    ///
    /// # Arguments
    ///
    /// * `chunk_size` - maximum number of characters per chunk
    /// * `chunk_overlap` - number of overlapping characters between consecutive chunks
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        Self { chunk_size, chunk_overlap }
    }
}

impl Chunker for RecursiveChunker {
    fn chunk(&self, document: &Document) -> Vec<Chunk> {
        if document.text.trim().is_empty() {
            return Vec::new();
        }

        let separators = ["\n\n", ". ", "! ", "? ", " "];
        split_and_merge(&document.text, self.chunk_size, self.chunk_overlap, &separators)
            .into_iter()
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())
            .enumerate()
            .map(|(i, text)| make_chunk(document, i, text))
            .collect()
    }
}

fn make_chunk(document: &Document, index: usize, text: String) -> Chunk {
    let mut metadata = document.metadata.clone();
    metadata.insert(CHUNK_INDEX_KEY.to_string(), index.to_string());
    Chunk {
        id: format!("{}_{index}", document.id),
        text,
        embedding: Vec::new(),
        metadata,
        document_id: document.id.clone(),
    }
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Split text by a separator, then merge segments into chunks that respect
/// `chunk_size`. If a segment exceeds `chunk_size`, it is split further
/// using the next-level separator.
fn split_and_merge(
    text: &str,
    chunk_size: usize,
    chunk_overlap: usize,
    separators: &[&str],
) -> Vec<String> {
    if char_len(text) <= chunk_size || separators.is_empty() {
        return split_by_size(text, chunk_size, chunk_overlap);
    }

    let separator = separators[0];
    let remaining_separators = &separators[1..];
    let segments = split_keeping_separator(text, separator);

    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for segment in segments {
        let segment_len = char_len(segment);
        if current.is_empty() {
            current = segment.to_string();
            current_len = segment_len;
        } else if current_len + segment_len <= chunk_size {
            current.push_str(segment);
            current_len += segment_len;
        } else {
            flush(&mut chunks, &current, current_len, chunk_size, chunk_overlap, remaining_separators);
            current = segment.to_string();
            current_len = segment_len;
        }
    }

    if !current.is_empty() {
        flush(&mut chunks, &current, current_len, chunk_size, chunk_overlap, remaining_separators);
    }

    chunks
}

fn flush(
    chunks: &mut Vec<String>,
    current: &str,
    current_len: usize,
    chunk_size: usize,
    chunk_overlap: usize,
    remaining_separators: &[&str],
) {
    if current_len > chunk_size {
        chunks.extend(split_and_merge(current, chunk_size, chunk_overlap, remaining_separators));
    } else {
        chunks.push(current.to_string());
    }
}

/// Split text at a separator while keeping the separator attached to the preceding segment.
fn split_keeping_separator<'a>(text: &'a str, separator: &str) -> Vec<&'a str> {
    let mut result = Vec::new();
    let mut start = 0;

    while let Some(pos) = text[start..].find(separator) {
        let end = start + pos + separator.len();
        result.push(&text[start..end]);
        start = end;
    }

    if start < text.len() {
        result.push(&text[start..]);
    }

    result
}

/// Character-window splitting with overlap.
fn split_by_size(text: &str, chunk_size: usize, chunk_overlap: usize) -> Vec<String> {
    if text.is_empty() || chunk_size == 0 {
        return Vec::new();
    }

    // Byte offset of every char boundary, plus the end of the string.
    let bounds: Vec<usize> =
        text.char_indices().map(|(i, _)| i).chain(std::iter::once(text.len())).collect();
    let total = bounds.len() - 1;

    let mut chunks = Vec::new();
    let mut start = 0;

    while start < total {
        let end = (start + chunk_size).min(total);
        chunks.push(text[bounds[start]..bounds[end]].to_string());
        if end == total {
            break;
        }
        let step = chunk_size.saturating_sub(chunk_overlap);
        if step == 0 {
            break;
        }
        start += step;
    }

    chunks
}
