//! CreateJob Operator — persists a recurring job definition

use crate::automation::scheduler::{CreateJobStatement, JobScheduler};
use crate::error::KilnResult;
use crate::sql::executor::{message_batch, message_schema};
use crate::sql::executor::operators::PhysicalOperator;
use arrow::datatypes::{Schema, SchemaRef};
use arrow::record_batch::RecordBatch;

/// 작업 생성 연산자: 결과 메시지 한 행을 내보냅니다.
pub struct CreateJobOperator {
    statement: CreateJobStatement,
    scheduler: JobScheduler,
    schema: SchemaRef,
    done: bool,
}

impl CreateJobOperator {
    pub fn new(statement: CreateJobStatement, scheduler: JobScheduler) -> Self {
        Self {
            statement,
            scheduler,
            schema: message_schema(),
            done: false,
        }
    }
}

impl PhysicalOperator for CreateJobOperator {
    fn schema(&self) -> &Schema {
        &self.schema
    }

    /// 날짜와 반복 주기 검증 (카탈로그 접근 없음)
    fn validate(&mut self) -> KilnResult<()> {
        self.statement.to_entry().map(|_| ())
    }

    fn next(&mut self) -> KilnResult<Option<RecordBatch>> {
        if self.done {
            return Ok(None);
        }
        let outcome = self.scheduler.create_job(&self.statement)?;
        self.done = true;
        Ok(Some(message_batch(&outcome.message())?))
    }

    fn reset(&mut self) -> KilnResult<()> {
        self.done = false;
        Ok(())
    }
}
