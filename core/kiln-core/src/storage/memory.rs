//! In-memory batch storage using DashMap
//!
//! One entry per table; the shard write lock taken by `entry()` serializes
//! concurrent writers to the same table.

use super::{StorageEngine, StorageKind, conform_batch};
use crate::catalog::TableMetadata;
use crate::error::KilnResult;
use arrow::record_batch::RecordBatch;
use dashmap::DashMap;
use tracing::debug;

/// In-memory storage backend
pub struct MemoryStorage {
    tables: DashMap<String, Vec<RecordBatch>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self {
            tables: DashMap::new(),
        }
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl StorageEngine for MemoryStorage {
    fn kind(&self) -> StorageKind {
        StorageKind::Memory
    }

    fn write(&self, table: &TableMetadata, batch: &RecordBatch) -> KilnResult<()> {
        let batch = conform_batch(table, batch)?;
        if batch.num_rows() == 0 {
            return Ok(());
        }

        let rows = batch.num_rows();
        self.tables.entry(table.table_key()).or_default().push(batch);

        debug!(table = %table.qualified_name(), rows, "memory write");
        Ok(())
    }

    fn scan(&self, table: &TableMetadata) -> KilnResult<Vec<RecordBatch>> {
        Ok(self
            .tables
            .get(&table.table_key())
            .map(|batches| batches.value().clone())
            .unwrap_or_default())
    }
}
