//! Values Operator — literal row source

use crate::error::{KilnError, KilnResult};
use crate::sql::executor::operators::PhysicalOperator;
use arrow::datatypes::{Schema, SchemaRef};
use arrow::record_batch::RecordBatch;

/// 미리 주어진 배치를 순서대로 내보내는 leaf 연산자
pub struct ValuesOperator {
    schema: SchemaRef,
    batches: Vec<RecordBatch>,
    position: usize,
}

impl ValuesOperator {
    pub fn new(schema: SchemaRef, batches: Vec<RecordBatch>) -> Self {
        Self {
            schema,
            batches,
            position: 0,
        }
    }

    /// 첫 배치의 스키마를 사용합니다. 빈 입력은 허용하지 않습니다.
    pub fn try_from_batches(batches: Vec<RecordBatch>) -> KilnResult<Self> {
        let schema = batches
            .first()
            .map(|b| b.schema())
            .ok_or_else(|| KilnError::InvalidArguments("VALUES requires at least one batch".to_string()))?;
        Ok(Self::new(schema, batches))
    }
}

impl PhysicalOperator for ValuesOperator {
    fn schema(&self) -> &Schema {
        &self.schema
    }

    fn validate(&mut self) -> KilnResult<()> {
        if let Some(batch) = self.batches.iter().find(|b| b.schema() != self.schema) {
            return Err(KilnError::Schema(format!(
                "VALUES batch schema {:?} differs from declared schema {:?}",
                batch.schema(),
                self.schema
            )));
        }
        Ok(())
    }

    fn next(&mut self) -> KilnResult<Option<RecordBatch>> {
        let batch = self.batches.get(self.position).cloned();
        if batch.is_some() {
            self.position += 1;
        }
        Ok(batch)
    }

    fn reset(&mut self) -> KilnResult<()> {
        self.position = 0;
        Ok(())
    }
}
