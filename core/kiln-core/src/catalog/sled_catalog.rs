//! sled-backed catalog.
//!
//! Tables and jobs live in dedicated sled trees as JSON records. Creation uses
//! sled's compare-and-swap so the existence check and the insert are one step.

use super::metadata::TableRecord;
use super::{Catalog, TableMetadata, table_key};
use crate::automation::scheduler::JobCatalogEntry;
use crate::error::{KilnError, KilnResult};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, instrument};

const TABLES_TREE: &str = "__catalog__/tables";
const JOBS_TREE: &str = "__catalog__/jobs";

/// Catalog persisted in a sled database.
pub struct SledCatalog {
    db: sled::Db,
    tables: sled::Tree,
    jobs: sled::Tree,
}

impl SledCatalog {
    /// Open the catalog on an already opened sled database.
    ///
    /// The same `sled::Db` can back the WOS storage engine.
    pub fn open_with_db(db: &sled::Db) -> KilnResult<Self> {
        let tables = db.open_tree(TABLES_TREE)?;
        let jobs = db.open_tree(JOBS_TREE)?;
        info!(
            tables = tables.len(),
            jobs = jobs.len(),
            "catalog opened"
        );
        Ok(Self {
            db: db.clone(),
            tables,
            jobs,
        })
    }

    /// Open (or create) a catalog at the given directory path.
    pub fn open(path: &Path) -> KilnResult<Self> {
        let db = sled::open(path)?;
        Self::open_with_db(&db)
    }

    /// Open a temporary catalog (for testing). Data is deleted on drop.
    pub fn open_temporary() -> KilnResult<Self> {
        let db = sled::Config::new().temporary(true).open()?;
        Self::open_with_db(&db)
    }

    fn decode_job(bytes: &[u8]) -> KilnResult<JobCatalogEntry> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

impl Catalog for SledCatalog {
    #[instrument(skip(self, metadata), fields(table = %metadata.qualified_name()))]
    fn create_table(&self, metadata: TableMetadata) -> KilnResult<()> {
        let key = metadata.table_key();
        let record = TableRecord::try_from(&metadata)?;
        let json_bytes = serde_json::to_vec(&record)?;

        self.tables
            .compare_and_swap(key.as_bytes(), None as Option<&[u8]>, Some(json_bytes))?
            .map_err(|_| KilnError::TableAlreadyExists(metadata.qualified_name()))?;

        debug!(storage = %metadata.storage, "table registered");
        Ok(())
    }

    fn get_table_metadata(
        &self,
        database: &str,
        table: &str,
    ) -> KilnResult<Option<Arc<TableMetadata>>> {
        let key = table_key(database, table);
        match self.tables.get(key.as_bytes())? {
            Some(json_bytes) => {
                let record: TableRecord = serde_json::from_slice(&json_bytes)?;
                Ok(Some(Arc::new(TableMetadata::try_from(record)?)))
            }
            None => Ok(None),
        }
    }

    fn get_job_entry(&self, name: &str) -> KilnResult<Option<JobCatalogEntry>> {
        self.jobs
            .get(name.as_bytes())?
            .map(|bytes| Self::decode_job(&bytes))
            .transpose()
    }

    #[instrument(skip(self, entry), fields(job = %entry.name))]
    fn insert_job_entry(&self, entry: &JobCatalogEntry) -> KilnResult<()> {
        let json_bytes = serde_json::to_vec(entry)?;

        self.jobs
            .compare_and_swap(entry.name.as_bytes(), None as Option<&[u8]>, Some(json_bytes))?
            .map_err(|_| KilnError::JobAlreadyExists(entry.name.clone()))?;

        debug!("job entry inserted");
        Ok(())
    }

    #[instrument(skip(self, entry), fields(job = %entry.name))]
    fn update_job_entry(&self, entry: &JobCatalogEntry) -> KilnResult<()> {
        let current_bytes = self
            .jobs
            .get(entry.name.as_bytes())?
            .ok_or_else(|| KilnError::JobNotFound(entry.name.clone()))?;
        let current = Self::decode_job(&current_bytes)?;

        if entry.next_schedule_run < current.next_schedule_run
            || entry.next_schedule_run < entry.start_time
        {
            return Err(KilnError::InvalidArguments(format!(
                "next_schedule_run of job {} cannot move from {} to {}",
                entry.name, current.next_schedule_run, entry.next_schedule_run
            )));
        }

        let json_bytes = serde_json::to_vec(entry)?;
        self.jobs
            .compare_and_swap(
                entry.name.as_bytes(),
                Some(current_bytes.as_ref()),
                Some(json_bytes),
            )?
            .map_err(|_| KilnError::InvalidOperation {
                message: format!("job {} was modified concurrently", entry.name),
                context: "update_job_entry".to_string(),
            })?;

        debug!(next_run = %entry.next_schedule_run, active = entry.active, "job entry updated");
        Ok(())
    }

    fn list_job_entries(&self) -> KilnResult<Vec<JobCatalogEntry>> {
        let mut entries = Vec::new();
        for item in self.jobs.iter() {
            let (_, value) = item?;
            entries.push(Self::decode_job(&value)?);
        }
        Ok(entries)
    }

    fn flush(&self) -> KilnResult<()> {
        self.db.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::automation::scheduler::RepeatPeriod;
    use crate::storage::StorageKind;
    use arrow::datatypes::{DataType, Field, Schema};
    use chrono::NaiveDate;

    fn sample_entry(name: &str) -> JobCatalogEntry {
        let start = NaiveDate::from_ymd_opt(2023, 4, 1)
            .unwrap()
            .and_hms_opt(1, 10, 0)
            .unwrap();
        JobCatalogEntry {
            name: name.to_string(),
            queries: vec!["SELECT 1;".to_string()],
            start_time: start,
            end_time: None,
            repeat_interval: 1,
            repeat_period: RepeatPeriod::Day,
            active: true,
            next_schedule_run: start,
        }
    }

    #[test]
    fn test_table_roundtrip() {
        let catalog = SledCatalog::open_temporary().unwrap();
        let schema = Arc::new(Schema::new(vec![Field::new("id", DataType::Int64, false)]));
        let metadata = TableMetadata::new("main", "users", StorageKind::Memory, schema);

        catalog.create_table(metadata.clone()).unwrap();

        let loaded = catalog.get_table_metadata("main", "users").unwrap().unwrap();
        assert_eq!(*loaded, metadata);
        assert!(catalog.get_table_metadata("main", "missing").unwrap().is_none());
    }

    #[test]
    fn test_duplicate_table() {
        let catalog = SledCatalog::open_temporary().unwrap();
        let schema = Arc::new(Schema::new(vec![Field::new("id", DataType::Int64, false)]));
        let metadata = TableMetadata::new("main", "users", StorageKind::Memory, schema);

        catalog.create_table(metadata.clone()).unwrap();
        let result = catalog.create_table(metadata);
        assert!(matches!(result, Err(KilnError::TableAlreadyExists(_))));
    }

    #[test]
    fn test_dotted_names_are_distinct_tables() {
        let catalog = SledCatalog::open_temporary().unwrap();
        let ints = Arc::new(Schema::new(vec![Field::new("id", DataType::Int64, false)]));
        let strings = Arc::new(Schema::new(vec![Field::new("name", DataType::Utf8, false)]));

        catalog
            .create_table(TableMetadata::new("a.b", "c", StorageKind::Memory, ints))
            .unwrap();
        catalog
            .create_table(TableMetadata::new("a", "b.c", StorageKind::Wos, strings))
            .unwrap();

        let first = catalog.get_table_metadata("a.b", "c").unwrap().unwrap();
        let second = catalog.get_table_metadata("a", "b.c").unwrap().unwrap();
        assert_eq!((first.database.as_str(), first.table.as_str()), ("a.b", "c"));
        assert_eq!((second.database.as_str(), second.table.as_str()), ("a", "b.c"));
        assert_eq!(second.storage, StorageKind::Wos);
        assert!(catalog.get_table_metadata("a.b.c", "").unwrap().is_none());
    }

    #[test]
    fn test_job_insert_is_create_if_absent() {
        let catalog = SledCatalog::open_temporary().unwrap();
        let entry = sample_entry("nightly");

        catalog.insert_job_entry(&entry).unwrap();

        let mut other = sample_entry("nightly");
        other.queries.push("SELECT 2;".to_string());
        let result = catalog.insert_job_entry(&other);
        assert!(matches!(result, Err(KilnError::JobAlreadyExists(_))));

        // 첫 번째 항목은 그대로
        let stored = catalog.get_job_entry("nightly").unwrap().unwrap();
        assert_eq!(stored, entry);
    }

    #[test]
    fn test_update_rejects_regressing_next_run() {
        let catalog = SledCatalog::open_temporary().unwrap();
        let mut entry = sample_entry("hourly");
        entry.repeat_period = RepeatPeriod::Hour;
        catalog.insert_job_entry(&entry).unwrap();

        entry.advance().unwrap();
        catalog.update_job_entry(&entry).unwrap();

        let mut stale = sample_entry("hourly");
        stale.repeat_period = RepeatPeriod::Hour;
        let result = catalog.update_job_entry(&stale);
        assert!(matches!(result, Err(KilnError::InvalidArguments(_))));

        let stored = catalog.get_job_entry("hourly").unwrap().unwrap();
        assert_eq!(stored.next_schedule_run, entry.next_schedule_run);
    }

    #[test]
    fn test_update_missing_job() {
        let catalog = SledCatalog::open_temporary().unwrap();
        let result = catalog.update_job_entry(&sample_entry("ghost"));
        assert!(matches!(result, Err(KilnError::JobNotFound(_))));
    }

    #[test]
    fn test_list_job_entries_sorted() {
        let catalog = SledCatalog::open_temporary().unwrap();
        catalog.insert_job_entry(&sample_entry("b")).unwrap();
        catalog.insert_job_entry(&sample_entry("a")).unwrap();

        let names: Vec<String> = catalog
            .list_job_entries()
            .unwrap()
            .into_iter()
            .map(|e| e.name)
            .collect();
        assert_eq!(names, vec!["a", "b"]);
    }
}
