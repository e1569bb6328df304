// 쿼리 실행 모듈 진입점
pub mod executor;

pub use executor::{
    BatchStream, CreateJobOperator, InsertOperator, PhysicalOperator, TableScanOperator,
    ValuesOperator, collect_batches, execute, message_batch,
};
