//! Brute-force cosine search over a row-major F16 matrix.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

use async_trait::async_trait;
use half::f16;
use memmap2::Mmap;
use tracing::info;

use super::error::VectorDbError;
use super::similarity::{bytes_to_f16_slice, cosine_similarity_f16_f32, f32_to_f16_vec};
use super::{VectorHit, VectorIndex};

enum Backing {
    Mapped(Mmap),
    Owned(Vec<f16>),
}

/// Read-only index with one embedding row per catalog row.
///
/// Rows are matched to catalog entries by position; `ids[i]` labels row `i`.
/// Duplicate ids (merged catalog rows) keep the best-scoring row.
pub struct InMemoryVectorIndex {
    backing: Backing,
    ids: Vec<String>,
    dimension: usize,
}

impl std::fmt::Debug for InMemoryVectorIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryVectorIndex")
            .field("rows", &self.ids.len())
            .field("dimension", &self.dimension)
            .finish()
    }
}

impl InMemoryVectorIndex {
    /// Memory-maps a little-endian F16 matrix of `ids.len()` rows.
    pub fn open(path: &Path, dimension: usize, ids: Vec<String>) -> Result<Self, VectorDbError> {
        let io_err = |source| VectorDbError::Io {
            path: path.to_path_buf(),
            source,
        };
        let file = File::open(path).map_err(io_err)?;

        // SAFETY: The index file is written once by an offline job and never
        // modified while the service runs.
        let mmap = unsafe { Mmap::map(&file) }.map_err(io_err)?;

        let index = Self {
            backing: Backing::Mapped(mmap),
            ids,
            dimension,
        };
        index.check_shape()?;

        info!(
            path = %path.display(),
            rows = index.ids.len(),
            dimension,
            "Vector index mapped"
        );
        Ok(index)
    }

    /// Builds an index from in-memory vectors (stored as F16 like the on-disk form).
    pub fn from_vectors(ids: Vec<String>, vectors: &[Vec<f32>]) -> Result<Self, VectorDbError> {
        let dimension = vectors.first().map(|v| v.len()).unwrap_or(0);
        if ids.len() != vectors.len() {
            return Err(VectorDbError::RowCountMismatch {
                expected: ids.len(),
                actual: vectors.len(),
            });
        }

        let mut data = Vec::with_capacity(dimension * vectors.len());
        for v in vectors {
            if v.len() != dimension {
                return Err(VectorDbError::InvalidDimension {
                    expected: dimension,
                    actual: v.len(),
                });
            }
            data.extend(f32_to_f16_vec(v));
        }

        Ok(Self {
            backing: Backing::Owned(data),
            ids,
            dimension,
        })
    }

    fn rows(&self) -> &[f16] {
        match &self.backing {
            Backing::Mapped(m) => bytes_to_f16_slice(m).unwrap_or(&[]),
            Backing::Owned(v) => v,
        }
    }

    fn check_shape(&self) -> Result<(), VectorDbError> {
        if self.dimension == 0 {
            return Err(VectorDbError::InvalidDimension {
                expected: 1,
                actual: 0,
            });
        }

        if let Backing::Mapped(m) = &self.backing {
            let row_bytes = self.dimension * 2;
            if m.len() % row_bytes != 0 || bytes_to_f16_slice(m).is_none() {
                return Err(VectorDbError::InvalidEmbeddingBytesLength {
                    row_bytes,
                    actual: m.len(),
                });
            }
        }

        let rows = self.rows().len() / self.dimension;
        if rows != self.ids.len() {
            return Err(VectorDbError::RowCountMismatch {
                expected: self.ids.len(),
                actual: rows,
            });
        }
        Ok(())
    }

    /// Synchronous search; `limit` hits at most, best first, ties by id.
    pub fn nearest(&self, query: &[f32], limit: usize) -> Result<Vec<VectorHit>, VectorDbError> {
        if query.len() != self.dimension {
            return Err(VectorDbError::InvalidDimension {
                expected: self.dimension,
                actual: query.len(),
            });
        }

        let mut best: HashMap<&str, f32> = HashMap::with_capacity(self.ids.len());
        for (row, id) in self.rows().chunks_exact(self.dimension).zip(&self.ids) {
            if id.is_empty() {
                continue;
            }
            let score = cosine_similarity_f16_f32(row, query);
            best.entry(id.as_str())
                .and_modify(|s| *s = s.max(score))
                .or_insert(score);
        }

        let mut hits: Vec<VectorHit> = best
            .into_iter()
            .map(|(id, score)| VectorHit {
                id: id.to_string(),
                score,
            })
            .collect();
        hits.sort_by(|a, b| match b.score.total_cmp(&a.score) {
            Ordering::Equal => a.id.cmp(&b.id),
            other => other,
        });
        hits.truncate(limit);
        Ok(hits)
    }

    pub fn row_count(&self) -> usize {
        self.ids.len()
    }
}

#[async_trait]
impl VectorIndex for InMemoryVectorIndex {
    fn name(&self) -> &'static str {
        "in-memory"
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn search(&self, query: &[f32], limit: usize) -> Result<Vec<VectorHit>, VectorDbError> {
        self.nearest(query, limit)
    }
}
