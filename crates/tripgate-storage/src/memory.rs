use crate::error::Result;
use crate::visit::{VisitRecord, VisitStore};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;
use tripgate_core::NormalizedHost;

/// In-memory visit store. Clones share the same list.
#[derive(Debug, Clone, Default)]
pub struct InMemoryVisitStore {
    visits: Arc<Mutex<Vec<VisitRecord>>>,
}

impl InMemoryVisitStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of every recorded visit, oldest first.
    pub fn snapshot(&self) -> Vec<VisitRecord> {
        self.visits.lock().clone()
    }
}

#[async_trait]
impl VisitStore for InMemoryVisitStore {
    async fn record(&self, visit: &VisitRecord) -> Result<()> {
        self.visits.lock().push(visit.clone());
        Ok(())
    }

    async fn count_for(&self, host: &NormalizedHost) -> Result<u64> {
        let visits = self.visits.lock();
        Ok(visits.iter().filter(|v| &v.host == host).count() as u64)
    }

    async fn count(&self) -> Result<u64> {
        Ok(self.visits.lock().len() as u64)
    }
}
