//! Catalog — table metadata and recurring job entries.
//!
//! Every component that needs the catalog receives an explicit handle
//! (`Arc<dyn Catalog>`); there is no process-global instance.

pub mod metadata;
pub mod sled_catalog;

use crate::automation::scheduler::JobCatalogEntry;
use crate::error::KilnResult;
use crate::storage::StorageKind;
use arrow::datatypes::SchemaRef;
use std::sync::Arc;

pub use sled_catalog::SledCatalog;

/// Identifies a table and the backend that stores it.
///
/// Immutable once registered; operators hold an `Arc` for the duration of a query.
#[derive(Debug, Clone, PartialEq)]
pub struct TableMetadata {
    pub database: String,
    pub table: String,
    /// Backend-selection data, opaque to operators
    pub storage: StorageKind,
    pub schema: SchemaRef,
}

impl TableMetadata {
    pub fn new(
        database: impl Into<String>,
        table: impl Into<String>,
        storage: StorageKind,
        schema: SchemaRef,
    ) -> Self {
        Self {
            database: database.into(),
            table: table.into(),
            storage,
            schema,
        }
    }

    /// `database.table` (표시용. 키로 쓰지 않습니다)
    pub fn qualified_name(&self) -> String {
        qualified_name(&self.database, &self.table)
    }

    /// 카탈로그와 스토리지 백엔드가 공유하는 테이블 키
    pub fn table_key(&self) -> String {
        table_key(&self.database, &self.table)
    }
}

pub(crate) fn qualified_name(database: &str, table: &str) -> String {
    format!("{database}.{table}")
}

/// `{len(database)}:{database}.{table}`
///
/// 데이터베이스 이름 길이가 앞에 붙으므로 이름에 `.`이 들어 있어도
/// 서로 다른 (database, table) 쌍이 같은 키가 되지 않습니다.
pub(crate) fn table_key(database: &str, table: &str) -> String {
    format!("{}:{database}.{table}", database.len())
}

/// Catalog collaborator consumed by operators and the job subsystem.
///
/// # Contract
///
/// - `insert_job_entry` is an atomic create-if-absent: when two callers race on
///   the same name exactly one succeeds, the other gets `JobAlreadyExists`.
/// - `update_job_entry` never lets `next_schedule_run` move backwards.
/// - Entries are never deleted through this interface.
pub trait Catalog: Send + Sync {
    /// Register a table. Fails with `TableAlreadyExists` on a name collision.
    fn create_table(&self, metadata: TableMetadata) -> KilnResult<()>;

    /// Look up a table; `None` when it does not exist.
    fn get_table_metadata(
        &self,
        database: &str,
        table: &str,
    ) -> KilnResult<Option<Arc<TableMetadata>>>;

    /// Look up a job entry by name.
    fn get_job_entry(&self, name: &str) -> KilnResult<Option<JobCatalogEntry>>;

    /// Persist a new job entry.
    fn insert_job_entry(&self, entry: &JobCatalogEntry) -> KilnResult<()>;

    /// Replace an existing job entry (used by the firing loop).
    fn update_job_entry(&self, entry: &JobCatalogEntry) -> KilnResult<()>;

    /// All job entries, ordered by name.
    fn list_job_entries(&self) -> KilnResult<Vec<JobCatalogEntry>>;

    /// Flush buffered catalog writes to durable storage.
    fn flush(&self) -> KilnResult<()>;
}
