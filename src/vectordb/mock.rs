use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;

use super::error::VectorDbError;
use super::memory::InMemoryVectorIndex;
use super::{VectorHit, VectorIndex};

/// In-memory index that can be switched into a failing state.
pub struct MockVectorIndex {
    inner: InMemoryVectorIndex,
    failing: AtomicBool,
    calls: AtomicUsize,
}

impl MockVectorIndex {
    pub fn new(inner: InMemoryVectorIndex) -> Self {
        Self {
            inner,
            failing: AtomicBool::new(false),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl VectorIndex for MockVectorIndex {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn dimension(&self) -> usize {
        self.inner.dimension()
    }

    async fn search(&self, query: &[f32], limit: usize) -> Result<Vec<VectorHit>, VectorDbError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(VectorDbError::SearchFailed {
                collection: "mock".to_string(),
                message: "simulated outage".to_string(),
            });
        }
        self.inner.nearest(query, limit)
    }
}
