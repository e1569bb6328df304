//! Engine query API — tables, inserts, scans, and job definitions

use crate::automation::scheduler::{CreateJobStatement, JobScheduler};
use crate::catalog::TableMetadata;
use crate::engine::Engine;
use crate::error::{KilnError, KilnResult};
use crate::sql::executor::{
    CreateJobOperator, InsertOperator, TableScanOperator, ValuesOperator, collect_batches,
};
use crate::storage::StorageKind;
use arrow::datatypes::SchemaRef;
use arrow::record_batch::RecordBatch;
use std::sync::Arc;
use tracing::{info, instrument};

impl Engine {
    /// 기본 스토리지(`default_storage`)로 테이블 생성
    pub fn create_table(&self, database: &str, table: &str, schema: SchemaRef) -> KilnResult<()> {
        self.create_table_with_storage(database, table, self.config.default_storage, schema)
    }

    #[instrument(skip(self, schema))]
    pub fn create_table_with_storage(
        &self,
        database: &str,
        table: &str,
        storage: StorageKind,
        schema: SchemaRef,
    ) -> KilnResult<()> {
        self.catalog
            .create_table(TableMetadata::new(database, table, storage, schema))?;
        info!("table created");
        Ok(())
    }

    /// 배치들을 INSERT 파이프라인으로 기록하고 기록된 행 수를 반환
    pub fn insert(&self, database: &str, table: &str, batches: Vec<RecordBatch>) -> KilnResult<usize> {
        let values = ValuesOperator::try_from_batches(batches)?;
        let mut insert = InsertOperator::new(
            Box::new(values),
            database,
            table,
            self.catalog(),
            self.storage(),
        );
        let written = collect_batches(&mut insert)?;
        Ok(written.iter().map(|b| b.num_rows()).sum())
    }

    /// 테이블 전체 스캔
    pub fn scan(&self, database: &str, table: &str) -> KilnResult<Vec<RecordBatch>> {
        let metadata = self
            .catalog
            .get_table_metadata(database, table)?
            .ok_or_else(|| {
                KilnError::TableNotFound(crate::catalog::qualified_name(database, table))
            })?;
        let mut scan = TableScanOperator::new(metadata, self.storage(), Vec::new())?;
        collect_batches(&mut scan)
    }

    /// 작업 정의 생성. 결과는 한 행짜리 `message` 배치입니다.
    pub fn create_job(&self, statement: &CreateJobStatement) -> KilnResult<RecordBatch> {
        let scheduler = JobScheduler::new(Arc::clone(&self.catalog))
            .with_flush_on_create(self.config.flush_on_job_create);
        let mut op = CreateJobOperator::new(statement.clone(), scheduler);
        collect_batches(&mut op)?
            .into_iter()
            .next()
            .ok_or_else(|| KilnError::InvalidOperation {
                message: "job creation produced no result".to_string(),
                context: statement.job_name.clone(),
            })
    }
}
