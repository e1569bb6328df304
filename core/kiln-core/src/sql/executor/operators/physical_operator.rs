//! Physical Operator Trait — Volcano Execution Model

use crate::error::KilnResult;
use arrow::array::RecordBatch;
use arrow::datatypes::Schema;

/// 물리 연산자 트레이트 — Volcano 실행 모델 (Pull 기반)
pub trait PhysicalOperator: Send {
    /// 출력 스키마 반환
    fn schema(&self) -> &Schema;

    /// 실행 전 검증 (1회). 부수 효과가 있기 전에 끝나야 합니다.
    fn validate(&mut self) -> KilnResult<()> {
        Ok(())
    }

    /// 다음 RecordBatch 반환 (None이면 끝)
    fn next(&mut self) -> KilnResult<Option<RecordBatch>>;

    /// 연산자 상태 초기화 (재실행용)
    fn reset(&mut self) -> KilnResult<()>;
}
