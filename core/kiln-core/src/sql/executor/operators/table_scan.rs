//! TableScan Operator — Sequential RecordBatch emission

use crate::catalog::TableMetadata;
use crate::error::KilnResult;
use crate::sql::executor::operators::PhysicalOperator;
use crate::storage::StorageFactory;
use arrow::array::ArrayRef;
use arrow::datatypes::{Schema, SchemaRef};
use arrow::record_batch::RecordBatch;
use std::sync::Arc;
use tracing::debug;

/// 테이블 스캔 연산자 — 스토리지 백엔드의 배치를 순차적으로 반환
pub struct TableScanOperator {
    table: Arc<TableMetadata>,
    storage: Arc<StorageFactory>,
    schema: SchemaRef,
    projection: Vec<usize>,
    /// 첫 pull 시점에 로드됨
    data: Option<Vec<RecordBatch>>,
    position: usize,
}

impl TableScanOperator {
    /// `projection`이 비어 있으면 전체 컬럼
    pub fn new(
        table: Arc<TableMetadata>,
        storage: Arc<StorageFactory>,
        projection: Vec<usize>,
    ) -> KilnResult<Self> {
        let schema = if projection.is_empty() {
            table.schema.clone()
        } else {
            Arc::new(table.schema.project(&projection)?)
        };
        Ok(Self {
            table,
            storage,
            schema,
            projection,
            data: None,
            position: 0,
        })
    }

    pub fn table_name(&self) -> &str {
        &self.table.table
    }

    fn load(&mut self) -> KilnResult<&[RecordBatch]> {
        if self.data.is_none() {
            let engine = self.storage.resolve(&self.table)?;
            let batches = engine.scan(&self.table)?;
            debug!(
                table = %self.table.qualified_name(),
                backend = %engine.kind(),
                batches = batches.len(),
                "table scan loaded"
            );
            self.data = Some(batches);
        }
        Ok(self.data.as_deref().unwrap_or_default())
    }
}

impl PhysicalOperator for TableScanOperator {
    fn schema(&self) -> &Schema {
        &self.schema
    }

    fn next(&mut self) -> KilnResult<Option<RecordBatch>> {
        let position = self.position;
        let Some(batch) = self.load()?.get(position).cloned() else {
            return Ok(None);
        };
        self.position += 1;

        if self.projection.is_empty() {
            return Ok(Some(batch));
        }
        let columns: Vec<ArrayRef> = self
            .projection
            .iter()
            .map(|&idx| Arc::clone(batch.column(idx)))
            .collect();
        Ok(Some(RecordBatch::try_new(self.schema.clone(), columns)?))
    }

    /// 다음 실행은 스토리지를 다시 읽습니다.
    fn reset(&mut self) -> KilnResult<()> {
        self.data = None;
        self.position = 0;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::StorageKind;
    use arrow::array::{Int32Array, StringArray};
    use arrow::datatypes::{DataType, Field};

    fn table() -> Arc<TableMetadata> {
        let schema = Arc::new(Schema::new(vec![
            Field::new("id", DataType::Int32, false),
            Field::new("name", DataType::Utf8, false),
        ]));
        Arc::new(TableMetadata::new("db", "users", StorageKind::Memory, schema))
    }

    fn batch(table: &TableMetadata, ids: Vec<i32>) -> RecordBatch {
        let names: Vec<String> = ids.iter().map(|i| format!("user{i}")).collect();
        RecordBatch::try_new(
            table.schema.clone(),
            vec![
                Arc::new(Int32Array::from(ids)),
                Arc::new(StringArray::from(names)),
            ],
        )
        .unwrap()
    }

    fn storage_with(table: &TableMetadata, batches: &[RecordBatch]) -> Arc<StorageFactory> {
        let db = sled::Config::new().temporary(true).open().unwrap();
        let storage = Arc::new(StorageFactory::new(&db));
        let engine = storage.resolve(table).unwrap();
        for b in batches {
            engine.write(table, b).unwrap();
        }
        storage
    }

    #[test]
    fn test_scan_all_columns() {
        let table = table();
        let storage = storage_with(&table, &[batch(&table, vec![1, 2]), batch(&table, vec![3])]);

        let mut scan = TableScanOperator::new(table.clone(), storage, vec![]).unwrap();
        assert_eq!(scan.table_name(), "users");
        assert_eq!(scan.next().unwrap().unwrap().num_rows(), 2);
        assert_eq!(scan.next().unwrap().unwrap().num_rows(), 1);
        assert!(scan.next().unwrap().is_none());
    }

    #[test]
    fn test_scan_projection() {
        let table = table();
        let storage = storage_with(&table, &[batch(&table, vec![7])]);

        let mut scan = TableScanOperator::new(table, storage, vec![1]).unwrap();
        assert_eq!(scan.schema().fields().len(), 1);
        let out = scan.next().unwrap().unwrap();
        assert_eq!(out.schema().field(0).name(), "name");
        let names = out.column(0).as_any().downcast_ref::<StringArray>().unwrap();
        assert_eq!(names.value(0), "user7");
    }

    #[test]
    fn test_reset_rereads_storage() {
        let table = table();
        let storage = storage_with(&table, &[batch(&table, vec![1])]);
        let mut scan = TableScanOperator::new(table.clone(), storage.clone(), vec![]).unwrap();
        assert!(scan.next().unwrap().is_some());
        assert!(scan.next().unwrap().is_none());

        storage
            .resolve(&table)
            .unwrap()
            .write(&table, &batch(&table, vec![2]))
            .unwrap();
        scan.reset().unwrap();
        assert!(scan.next().unwrap().is_some());
        assert!(scan.next().unwrap().is_some());
        assert!(scan.next().unwrap().is_none());
    }
}
