//! Offline vectorization of the posting catalog.
//!
//! Embeds `title`, `description` and `requirements` of every posting, in catalog
//! order, so the resulting array stays row-aligned with the postings JSON.

use std::path::Path;
use std::time::Instant;

use tracing::info;

use super::error::CatalogResult;
use super::posting::Posting;
use super::vectors::{PostingEmbedding, PostingVectors};
use super::Catalog;
use crate::embedding::SentenceEmbedder;

/// Embeds every posting's three scored fields.
pub fn vectorize_postings(
    postings: &[Posting],
    embedder: &SentenceEmbedder,
) -> CatalogResult<PostingVectors> {
    if postings.is_empty() {
        return Ok(PostingVectors::empty(embedder.embedding_dim()));
    }

    let mut rows = Vec::with_capacity(postings.len());
    for posting in postings {
        let mut vectors = embedder.embed_batch(&posting.embedded_texts())?.into_iter();
        rows.push(PostingEmbedding::new(
            vectors.next().unwrap_or_default(),
            vectors.next().unwrap_or_default(),
            vectors.next().unwrap_or_default(),
        ));
    }

    PostingVectors::from_rows(rows)
}

/// Reads postings from `catalog_path`, embeds them and writes `vectors_path`.
///
/// Returns the number of postings written.
pub fn vectorize_catalog_file(
    catalog_path: &Path,
    vectors_path: &Path,
    embedder: &SentenceEmbedder,
) -> CatalogResult<usize> {
    let started = Instant::now();
    let postings = Catalog::load_postings(catalog_path)?;

    info!(
        catalog = %catalog_path.display(),
        postings = postings.len(),
        embedder_stub = embedder.is_stub(),
        "Vectorizing posting catalog"
    );

    let vectors = vectorize_postings(&postings, embedder)?;
    vectors.write_npy(vectors_path)?;

    info!(
        vectors = %vectors_path.display(),
        rows = vectors.len(),
        dim = vectors.dim(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Posting vectors written"
    );

    Ok(vectors.len())
}
