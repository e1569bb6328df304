//! Insert Operator — write-through sink that passes its input along

use crate::catalog::{Catalog, TableMetadata};
use crate::error::{KilnError, KilnResult};
use crate::sql::executor::operators::PhysicalOperator;
use crate::storage::{StorageEngine, StorageFactory, check_fields};
use arrow::datatypes::Schema;
use arrow::record_batch::RecordBatch;
use std::sync::Arc;
use tracing::{debug, info};

/// 대상 테이블에 입력 배치를 기록한 뒤 같은 배치를 그대로 내보내는 연산자
///
/// 대상 테이블과 백엔드는 첫 pull 시점에 한 번 결정됩니다. 쓰기 실패는
/// 실행 전체를 중단시키며, 이미 기록된 배치는 되돌리지 않습니다.
pub struct InsertOperator {
    input: Box<dyn PhysicalOperator>,
    database: String,
    table: String,
    catalog: Arc<dyn Catalog>,
    storage: Arc<StorageFactory>,
    target: Option<(Arc<TableMetadata>, Arc<dyn StorageEngine>)>,
    rows_written: usize,
    finished: bool,
}

impl InsertOperator {
    pub fn new(
        input: Box<dyn PhysicalOperator>,
        database: impl Into<String>,
        table: impl Into<String>,
        catalog: Arc<dyn Catalog>,
        storage: Arc<StorageFactory>,
    ) -> Self {
        Self {
            input,
            database: database.into(),
            table: table.into(),
            catalog,
            storage,
            target: None,
            rows_written: 0,
            finished: false,
        }
    }

    /// 이번 실행에서 기록된 행 수
    pub fn rows_written(&self) -> usize {
        self.rows_written
    }

    fn lookup_table(&self) -> KilnResult<Arc<TableMetadata>> {
        self.catalog
            .get_table_metadata(&self.database, &self.table)?
            .ok_or_else(|| {
                KilnError::TableNotFound(crate::catalog::qualified_name(&self.database, &self.table))
            })
    }

    fn resolve_target(&mut self) -> KilnResult<(Arc<TableMetadata>, Arc<dyn StorageEngine>)> {
        if let Some(target) = &self.target {
            return Ok(target.clone());
        }
        let table = self.lookup_table()?;
        let engine = self.storage.resolve(&table)?;
        debug!(
            table = %table.qualified_name(),
            backend = %engine.kind(),
            "insert target resolved"
        );
        self.target = Some((table.clone(), engine.clone()));
        Ok((table, engine))
    }
}

impl PhysicalOperator for InsertOperator {
    fn schema(&self) -> &Schema {
        self.input.schema()
    }

    fn validate(&mut self) -> KilnResult<()> {
        self.input.validate()?;

        let table = self.lookup_table()?;
        check_fields(&table, self.input.schema())
    }

    fn next(&mut self) -> KilnResult<Option<RecordBatch>> {
        if self.finished {
            return Ok(None);
        }
        let (table, engine) = self.resolve_target()?;

        match self.input.next()? {
            None => {
                self.finished = true;
                info!(
                    table = %table.qualified_name(),
                    rows = self.rows_written,
                    "insert finished"
                );
                Ok(None)
            }
            Some(batch) => {
                engine.write(&table, &batch)?;
                self.rows_written += batch.num_rows();
                Ok(Some(batch))
            }
        }
    }

    fn reset(&mut self) -> KilnResult<()> {
        self.target = None;
        self.rows_written = 0;
        self.finished = false;
        self.input.reset()
    }
}
