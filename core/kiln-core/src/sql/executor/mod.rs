//! Query Executor Module
//!
//! 루트 연산자를 검증한 뒤, 배치를 요청 시점에 끌어오는 스트림으로 실행합니다.

use crate::error::KilnResult;
use arrow::array::{ArrayRef, RecordBatch, StringArray};
use arrow::datatypes::{DataType, Field, Schema, SchemaRef};
use std::sync::Arc;

pub mod operators;

pub use operators::{
    CreateJobOperator, InsertOperator, PhysicalOperator, TableScanOperator, ValuesOperator,
};

/// 메시지 결과 배치의 단일 컬럼 이름
pub const MESSAGE_COLUMN: &str = "message";

/// 실행 중인 파이프라인의 출력 스트림
///
/// 오류가 한 번 나오면 이후에는 `None`을 반환합니다.
pub struct BatchStream<'a> {
    root: &'a mut dyn PhysicalOperator,
    finished: bool,
}

impl Iterator for BatchStream<'_> {
    type Item = KilnResult<RecordBatch>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        match self.root.next() {
            Ok(Some(batch)) => Some(Ok(batch)),
            Ok(None) => {
                self.finished = true;
                None
            }
            Err(e) => {
                self.finished = true;
                Some(Err(e))
            }
        }
    }
}

/// 파이프라인 실행
///
/// `validate()`가 끝까지 성공해야 스트림이 만들어지며, 배치는 소비자가
/// 요청할 때마다 하나씩 생성됩니다.
pub fn execute(root: &mut dyn PhysicalOperator) -> KilnResult<BatchStream<'_>> {
    root.validate()?;
    Ok(BatchStream {
        root,
        finished: false,
    })
}

/// 파이프라인을 끝까지 실행하고 모든 배치를 수집
pub fn collect_batches(root: &mut dyn PhysicalOperator) -> KilnResult<Vec<RecordBatch>> {
    execute(root)?.collect()
}

pub fn message_schema() -> SchemaRef {
    Arc::new(Schema::new(vec![Field::new(
        MESSAGE_COLUMN,
        DataType::Utf8,
        false,
    )]))
}

/// 한 행, 한 컬럼(`message`)짜리 결과 배치
pub fn message_batch(message: &str) -> KilnResult<RecordBatch> {
    let column: ArrayRef = Arc::new(StringArray::from(vec![message]));
    Ok(RecordBatch::try_new(message_schema(), vec![column])?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::KilnError;
    use arrow::array::Int32Array;

    /// 정해진 횟수만큼 배치를 내고, 설정되면 그 뒤 실패하는 연산자
    struct Flaky {
        schema: SchemaRef,
        emitted: usize,
        ok_batches: usize,
        fail_after: bool,
        validated: bool,
    }

    impl Flaky {
        fn new(ok_batches: usize, fail_after: bool) -> Self {
            Self {
                schema: Arc::new(Schema::new(vec![Field::new("n", DataType::Int32, false)])),
                emitted: 0,
                ok_batches,
                fail_after,
                validated: false,
            }
        }
    }

    impl PhysicalOperator for Flaky {
        fn schema(&self) -> &Schema {
            &self.schema
        }

        fn validate(&mut self) -> KilnResult<()> {
            self.validated = true;
            Ok(())
        }

        fn next(&mut self) -> KilnResult<Option<RecordBatch>> {
            assert!(self.validated, "next() before validate()");
            if self.emitted < self.ok_batches {
                self.emitted += 1;
                let col = Arc::new(Int32Array::from(vec![self.emitted as i32]));
                return Ok(Some(RecordBatch::try_new(self.schema.clone(), vec![col])?));
            }
            if self.fail_after {
                return Err(KilnError::Storage("boom".to_string()));
            }
            Ok(None)
        }

        fn reset(&mut self) -> KilnResult<()> {
            self.emitted = 0;
            Ok(())
        }
    }

    #[test]
    fn test_execute_is_lazy() {
        let mut root = Flaky::new(3, false);
        let mut stream = execute(&mut root).unwrap();
        assert!(stream.next().unwrap().is_ok());
        drop(stream);
        assert_eq!(root.emitted, 1);
    }

    #[test]
    fn test_stream_stops_after_error() {
        let mut root = Flaky::new(1, true);
        let results: Vec<_> = execute(&mut root).unwrap().collect();
        assert_eq!(results.len(), 2);
        assert!(results[0].is_ok());
        assert!(results[1].is_err());
    }

    #[test]
    fn test_collect_batches() {
        let mut root = Flaky::new(2, false);
        assert_eq!(collect_batches(&mut root).unwrap().len(), 2);

        let mut failing = Flaky::new(2, true);
        assert!(collect_batches(&mut failing).is_err());
    }

    #[test]
    fn test_message_batch() {
        let batch = message_batch("hello").unwrap();
        assert_eq!(batch.num_rows(), 1);
        assert_eq!(batch.num_columns(), 1);
        assert_eq!(batch.schema().field(0).name(), MESSAGE_COLUMN);
    }
}
