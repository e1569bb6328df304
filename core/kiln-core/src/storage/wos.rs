//! WOS (Write-Optimized Store) — sled-backed durable batch storage.
//!
//! Each table maps to a separate sled `Tree`. A batch is one Arrow IPC stream
//! message stored under a monotonically increasing id, so a single `insert`
//! makes the whole batch visible at once and scans return batches in write order.

use super::arrow_ipc::{decode_batch, encode_batch};
use super::{StorageEngine, StorageKind, conform_batch};
use crate::catalog::TableMetadata;
use crate::error::KilnResult;
use arrow::record_batch::RecordBatch;
use tracing::debug;

/// sled-backed persistent batch storage.
pub struct WosStorage {
    db: sled::Db,
}

impl WosStorage {
    pub fn new(db: sled::Db) -> Self {
        Self { db }
    }

    /// Open a temporary WOS (for testing). Data is deleted on drop.
    pub fn open_temporary() -> KilnResult<Self> {
        let db = sled::Config::new().temporary(true).open()?;
        Ok(Self { db })
    }

    /// Get or create the sled Tree for the given table.
    fn tree(&self, table: &TableMetadata) -> KilnResult<sled::Tree> {
        Ok(self
            .db
            .open_tree(format!("__data__/{}", table.table_key()))?)
    }
}

impl StorageEngine for WosStorage {
    fn kind(&self) -> StorageKind {
        StorageKind::Wos
    }

    fn write(&self, table: &TableMetadata, batch: &RecordBatch) -> KilnResult<()> {
        let batch = conform_batch(table, batch)?;
        if batch.num_rows() == 0 {
            return Ok(());
        }

        // Encode before touching the tree; a failed encode writes nothing.
        let bytes = encode_batch(table, &batch)?;
        let id = self.db.generate_id()?;
        self.tree(table)?.insert(id.to_be_bytes(), bytes)?;

        debug!(table = %table.qualified_name(), rows = batch.num_rows(), id, "wos write");
        Ok(())
    }

    fn scan(&self, table: &TableMetadata) -> KilnResult<Vec<RecordBatch>> {
        let tree = self.tree(table)?;
        let mut batches = Vec::with_capacity(tree.len());
        for item in tree.iter() {
            let (_, value) = item?;
            batches.push(decode_batch(table, &value)?);
        }
        Ok(batches)
    }
}
