//! Posting catalog and its precomputed vectors.
//!
//! The catalog is loaded once at startup and shared read-only across requests.
//! Row `i` of the vector array must describe posting `i`; [`Catalog::from_parts`]
//! refuses to build a catalog that violates this.

pub mod error;
pub mod posting;
pub mod vectorize;
pub mod vectors;

#[cfg(test)]
mod tests;

pub use error::{CatalogError, CatalogResult};
pub use posting::{Posting, PostingField};
pub use vectorize::{vectorize_catalog_file, vectorize_postings};
pub use vectors::{PostingEmbedding, PostingVectors};

use std::path::Path;

use tracing::info;

/// Postings plus their index-aligned vectors.
#[derive(Debug, Clone)]
pub struct Catalog {
    postings: Vec<Posting>,
    vectors: PostingVectors,
}

impl Catalog {
    /// Pairs postings with vectors, failing if the row counts differ.
    pub fn from_parts(postings: Vec<Posting>, vectors: PostingVectors) -> CatalogResult<Self> {
        if postings.len() != vectors.len() {
            return Err(CatalogError::Misaligned {
                postings: postings.len(),
                vectors: vectors.len(),
            });
        }
        Ok(Self { postings, vectors })
    }

    /// Loads the postings JSON and the `.npy` vectors and checks alignment.
    pub fn load(catalog_path: &Path, vectors_path: &Path) -> CatalogResult<Self> {
        let postings = Self::load_postings(catalog_path)?;
        let vectors = PostingVectors::read_npy(vectors_path)?;
        let catalog = Self::from_parts(postings, vectors)?;

        info!(
            catalog = %catalog_path.display(),
            vectors = %vectors_path.display(),
            postings = catalog.len(),
            dim = catalog.dim(),
            "Posting catalog loaded"
        );

        Ok(catalog)
    }

    /// Reads a JSON array of postings.
    pub fn load_postings(path: &Path) -> CatalogResult<Vec<Posting>> {
        let content = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| CatalogError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn postings(&self) -> &[Posting] {
        &self.postings
    }

    pub fn vectors(&self) -> &PostingVectors {
        &self.vectors
    }

    pub fn len(&self) -> usize {
        self.postings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.postings.is_empty()
    }

    /// Embedding dimension of the stored vectors.
    pub fn dim(&self) -> usize {
        self.vectors.dim()
    }
}
