//! Precomputed posting vectors, persisted as an `[N, 3, D]` f32 `.npy` array.

use std::path::Path;

use candle_core::{DType, Device, Tensor};
use tracing::debug;

use super::error::{CatalogError, CatalogResult};
use super::posting::PostingField;
use crate::constants::POSTING_VECTOR_FIELDS;

/// The three vectors of one posting.
#[derive(Debug, Clone, PartialEq)]
pub struct PostingEmbedding {
    vectors: [Vec<f32>; POSTING_VECTOR_FIELDS],
}

impl PostingEmbedding {
    pub fn new(title: Vec<f32>, description: Vec<f32>, requirements: Vec<f32>) -> Self {
        Self {
            vectors: [title, description, requirements],
        }
    }

    pub fn field(&self, field: PostingField) -> &[f32] {
        &self.vectors[field.index()]
    }

    fn dims(&self) -> [usize; POSTING_VECTOR_FIELDS] {
        [
            self.vectors[0].len(),
            self.vectors[1].len(),
            self.vectors[2].len(),
        ]
    }
}

/// Row-aligned posting vectors: row `i` belongs to catalog entry `i`.
#[derive(Debug, Clone, PartialEq)]
pub struct PostingVectors {
    dim: usize,
    rows: Vec<PostingEmbedding>,
}

impl PostingVectors {
    /// An empty array of the given dimension.
    pub fn empty(dim: usize) -> Self {
        Self {
            dim,
            rows: Vec::new(),
        }
    }

    /// Builds from rows, requiring every vector to share one dimension.
    pub fn from_rows(rows: Vec<PostingEmbedding>) -> CatalogResult<Self> {
        let dim = rows.first().map(|r| r.vectors[0].len()).unwrap_or(0);
        for (row, embedding) in rows.iter().enumerate() {
            if let Some(&actual) = embedding.dims().iter().find(|&&d| d != dim) {
                return Err(CatalogError::Ragged {
                    row,
                    expected: dim,
                    actual,
                });
            }
        }
        Ok(Self { dim, rows })
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[PostingEmbedding] {
        &self.rows
    }

    /// Reads an `[N, 3, D]` array; any float dtype is converted to f32.
    pub fn read_npy(path: &Path) -> CatalogResult<Self> {
        let npy_err = |e: candle_core::Error| CatalogError::Npy {
            path: path.to_path_buf(),
            reason: e.to_string(),
        };

        let tensor = Tensor::read_npy(path).map_err(npy_err)?;
        let shape = tensor.dims().to_vec();
        let (n, dim) = match shape.as_slice() {
            [n, fields, dim] if *fields == POSTING_VECTOR_FIELDS => (*n, *dim),
            _ => return Err(CatalogError::BadShape { shape }),
        };

        let data = tensor
            .to_dtype(DType::F32)
            .and_then(|t| t.to_vec3::<f32>())
            .map_err(npy_err)?;

        let rows = data
            .into_iter()
            .map(|row| {
                let mut fields = row.into_iter();
                PostingEmbedding::new(
                    fields.next().unwrap_or_default(),
                    fields.next().unwrap_or_default(),
                    fields.next().unwrap_or_default(),
                )
            })
            .collect::<Vec<_>>();

        debug!(path = %path.display(), rows = n, dim, "Read posting vectors");

        if rows.is_empty() {
            return Ok(Self::empty(dim));
        }
        Self::from_rows(rows)
    }

    /// Writes the array as `[N, 3, D]` f32.
    pub fn write_npy(&self, path: &Path) -> CatalogResult<()> {
        let npy_err = |e: candle_core::Error| CatalogError::Npy {
            path: path.to_path_buf(),
            reason: e.to_string(),
        };

        let flat: Vec<f32> = self
            .rows
            .iter()
            .flat_map(|row| row.vectors.iter().flatten().copied())
            .collect();

        let tensor = Tensor::from_vec(
            flat,
            (self.rows.len(), POSTING_VECTOR_FIELDS, self.dim),
            &Device::Cpu,
        )
        .map_err(npy_err)?;
        tensor.write_npy(path).map_err(npy_err)?;

        debug!(path = %path.display(), rows = self.rows.len(), dim = self.dim, "Wrote posting vectors");
        Ok(())
    }
}
