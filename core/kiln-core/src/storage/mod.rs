//! Storage module — backend resolution for table batches.
//!
//! Operators depend only on the [`StorageEngine`] trait; [`StorageFactory`]
//! maps a table's [`StorageKind`] to a concrete backend.

pub mod arrow_ipc;
pub mod memory;
pub mod wos;

use crate::catalog::TableMetadata;
use crate::error::{KilnError, KilnResult};
use arrow::array::Array;
use arrow::datatypes::Schema;
use arrow::record_batch::RecordBatch;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

pub use memory::MemoryStorage;
pub use wos::WosStorage;

/// Backend-selection data carried by [`TableMetadata`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    /// Process-local batches, lost on shutdown
    Memory,
    /// sled-backed durable batches (Arrow IPC encoded)
    Wos,
}

impl StorageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageKind::Memory => "memory",
            StorageKind::Wos => "wos",
        }
    }
}

impl fmt::Display for StorageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StorageKind {
    type Err = KilnError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "memory" => Ok(StorageKind::Memory),
            "wos" => Ok(StorageKind::Wos),
            _ => Err(KilnError::InvalidArguments(format!(
                "unknown storage kind '{s}'"
            ))),
        }
    }
}

/// Batch storage interface.
///
/// # Contract
///
/// - `write` is atomic per batch: either every row becomes visible to later
///   scans of the table or the call fails and none do.
/// - Concurrent writes to the same table are serialized at batch granularity.
/// - No cross-table transactions.
pub trait StorageEngine: Send + Sync {
    fn kind(&self) -> StorageKind;

    /// Append one batch to the table.
    fn write(&self, table: &TableMetadata, batch: &RecordBatch) -> KilnResult<()>;

    /// All batches of the table, in write order.
    fn scan(&self, table: &TableMetadata) -> KilnResult<Vec<RecordBatch>>;

    /// Number of visible rows.
    fn row_count(&self, table: &TableMetadata) -> KilnResult<usize> {
        Ok(self.scan(table)?.iter().map(|b| b.num_rows()).sum())
    }
}

/// Rejects a schema whose columns differ from the table's by name or type.
pub(crate) fn check_fields(table: &TableMetadata, schema: &Schema) -> KilnResult<()> {
    let expected = table.schema.fields();
    let actual = schema.fields();

    if expected.len() != actual.len() {
        return Err(KilnError::Schema(format!(
            "table {} has {} columns, got {}",
            table.qualified_name(),
            expected.len(),
            actual.len()
        )));
    }

    for (index, (want, got)) in expected.iter().zip(actual.iter()).enumerate() {
        if want.name() != got.name() || want.data_type() != got.data_type() {
            return Err(KilnError::Schema(format!(
                "column {index} of table {}: expected {} {}, got {} {}",
                table.qualified_name(),
                want.name(),
                want.data_type(),
                got.name(),
                got.data_type()
            )));
        }
    }
    Ok(())
}

/// Checks a batch against the table schema and relabels it with that schema.
///
/// Backends call this before touching any state so a mismatched batch leaves
/// the table unchanged. Nulls in a non-nullable table column are rejected even
/// when the batch's own field is declared nullable.
pub(crate) fn conform_batch(table: &TableMetadata, batch: &RecordBatch) -> KilnResult<RecordBatch> {
    check_fields(table, &batch.schema())?;

    for (field, column) in table.schema.fields().iter().zip(batch.columns()) {
        if !field.is_nullable() && column.null_count() > 0 {
            return Err(KilnError::Schema(format!(
                "column {} of table {} is not nullable, got {} nulls",
                field.name(),
                table.qualified_name(),
                column.null_count()
            )));
        }
    }

    Ok(RecordBatch::try_new(
        table.schema.clone(),
        batch.columns().to_vec(),
    )?)
}

/// Resolves table metadata to a storage backend.
///
/// Engines are registered at construction time only, so resolution is
/// deterministic for the lifetime of the factory.
pub struct StorageFactory {
    engines: HashMap<StorageKind, Arc<dyn StorageEngine>>,
}

impl StorageFactory {
    /// Factory with the built-in backends; WOS tables live in `db`.
    pub fn new(db: &sled::Db) -> Self {
        Self::empty()
            .with_engine(Arc::new(MemoryStorage::new()))
            .with_engine(Arc::new(WosStorage::new(db.clone())))
    }

    /// Factory with no engines registered.
    pub fn empty() -> Self {
        Self {
            engines: HashMap::new(),
        }
    }

    /// Register (or replace) the engine serving `engine.kind()`.
    pub fn with_engine(mut self, engine: Arc<dyn StorageEngine>) -> Self {
        self.engines.insert(engine.kind(), engine);
        self
    }

    /// Backend for the given table.
    pub fn resolve(&self, table: &TableMetadata) -> KilnResult<Arc<dyn StorageEngine>> {
        self.engines.get(&table.storage).cloned().ok_or_else(|| {
            KilnError::Storage(format!(
                "no storage engine registered for kind '{}' (table {})",
                table.storage,
                table.qualified_name()
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::{Int32Array, Int64Array};
    use arrow::datatypes::{DataType, Field, Schema};

    fn table(kind: StorageKind) -> TableMetadata {
        let schema = Arc::new(Schema::new(vec![Field::new("id", DataType::Int64, false)]));
        TableMetadata::new("main", "t", kind, schema)
    }

    #[test]
    fn test_conform_rejects_wrong_type() {
        let t = table(StorageKind::Memory);
        let schema = Arc::new(Schema::new(vec![Field::new("id", DataType::Int32, false)]));
        let batch = RecordBatch::try_new(schema, vec![Arc::new(Int32Array::from(vec![1]))]).unwrap();

        let err = conform_batch(&t, &batch).unwrap_err();
        assert!(matches!(err, KilnError::Schema(_)));
        assert!(err.to_string().contains("Int64"), "{err}");
    }

    #[test]
    fn test_conform_checks_nulls_against_table() {
        let t = table(StorageKind::Memory);
        let nullable = Arc::new(Schema::new(vec![Field::new("id", DataType::Int64, true)]));

        let clean = RecordBatch::try_new(
            nullable.clone(),
            vec![Arc::new(Int64Array::from(vec![Some(1), Some(2)]))],
        )
        .unwrap();
        let conformed = conform_batch(&t, &clean).unwrap();
        assert_eq!(conformed.schema(), t.schema);

        let with_null = RecordBatch::try_new(
            nullable,
            vec![Arc::new(Int64Array::from(vec![Some(1), None]))],
        )
        .unwrap();
        assert!(matches!(conform_batch(&t, &with_null), Err(KilnError::Schema(_))));
    }

    #[test]
    fn test_check_fields_column_count() {
        let t = table(StorageKind::Memory);
        let wider = Schema::new(vec![
            Field::new("id", DataType::Int64, false),
            Field::new("extra", DataType::Utf8, true),
        ]);
        assert!(check_fields(&t, &wider).is_err());
    }

    #[test]
    fn test_storage_kind_parse() {
        assert_eq!("memory".parse::<StorageKind>().unwrap(), StorageKind::Memory);
        assert_eq!("WOS".parse::<StorageKind>().unwrap(), StorageKind::Wos);
        assert!("parquet".parse::<StorageKind>().is_err());
    }

    #[test]
    fn test_resolve_is_deterministic() {
        let db = sled::Config::new().temporary(true).open().unwrap();
        let factory = StorageFactory::new(&db);

        let first = factory.resolve(&table(StorageKind::Wos)).unwrap();
        let second = factory.resolve(&table(StorageKind::Wos)).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.kind(), StorageKind::Wos);

        let memory = factory.resolve(&table(StorageKind::Memory)).unwrap();
        assert_eq!(memory.kind(), StorageKind::Memory);
    }

    #[test]
    fn test_resolve_unregistered_kind() {
        let factory = StorageFactory::empty().with_engine(Arc::new(MemoryStorage::new()));
        let result = factory.resolve(&table(StorageKind::Wos));
        assert!(matches!(result, Err(KilnError::Storage(_))));
    }
}
