use async_trait::async_trait;
use products_hr::{Fields, apply_patch, strip_identifier};
use tokio::sync::RwLock;

use crate::{EmployeeRecord, EmployeeStore, StoreError, StoreResult, new_document_id};

/// Process-local store; lists in insertion order.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<Vec<EmployeeRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EmployeeStore for MemoryStore {
    async fn create(&self, fields: Fields) -> StoreResult<String> {
        let id = new_document_id();
        self.records.write().await.push(EmployeeRecord {
            id: id.clone(),
            fields: strip_identifier(fields),
        });
        Ok(id)
    }

    async fn list(&self) -> StoreResult<Vec<EmployeeRecord>> {
        Ok(self.records.read().await.clone())
    }

    async fn delete(&self, id: &str) -> StoreResult<()> {
        let mut records = self.records.write().await;
        let position = records
            .iter()
            .position(|record| record.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        records.remove(position);
        Ok(())
    }

    async fn update(&self, id: &str, patch: Fields) -> StoreResult<()> {
        let mut records = self.records.write().await;
        let record = records
            .iter_mut()
            .find(|record| record.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        apply_patch(&mut record.fields, patch);
        Ok(())
    }
}
