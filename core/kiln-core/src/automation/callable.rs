//! Callable trait and UDF values
//!
//! UDF 경계를 넘는 값(텐서, 테이블)과 모든 호출 가능 객체의 공통 인터페이스

use super::udf::ForwardTags;
use crate::error::{KilnError, KilnResult};
use arrow::datatypes::DataType;
use arrow::record_batch::RecordBatch;
use std::fmt;

/// UDF를 호출 가능한 객체로 노출하는 인터페이스
pub trait Callable: Send + Sync {
    /// 함수 실행 (계약 검사 포함)
    fn call(&self, args: &[Value]) -> KilnResult<Value>;

    /// 함수 이름
    fn name(&self) -> &str;

    /// 선언된 입력/출력 시그니처
    fn tags(&self) -> &ForwardTags;
}

/// 원소 타입 (닫힌 집합)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementType {
    Boolean,
    Int32,
    Int64,
    Float32,
    Float64,
    Utf8,
}

impl ElementType {
    /// Arrow 컬럼 타입 → 원소 타입 (지원하지 않으면 None)
    pub fn from_arrow(data_type: &DataType) -> Option<Self> {
        match data_type {
            DataType::Boolean => Some(ElementType::Boolean),
            DataType::Int32 => Some(ElementType::Int32),
            DataType::Int64 => Some(ElementType::Int64),
            DataType::Float32 => Some(ElementType::Float32),
            DataType::Float64 => Some(ElementType::Float64),
            DataType::Utf8 | DataType::LargeUtf8 => Some(ElementType::Utf8),
            _ => None,
        }
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// 텐서 원소 버퍼
#[derive(Debug, Clone, PartialEq)]
pub enum TensorData {
    Boolean(Vec<bool>),
    Int32(Vec<i32>),
    Int64(Vec<i64>),
    Float32(Vec<f32>),
    Float64(Vec<f64>),
    Utf8(Vec<String>),
}

impl TensorData {
    pub fn len(&self) -> usize {
        match self {
            TensorData::Boolean(v) => v.len(),
            TensorData::Int32(v) => v.len(),
            TensorData::Int64(v) => v.len(),
            TensorData::Float32(v) => v.len(),
            TensorData::Float64(v) => v.len(),
            TensorData::Utf8(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn element_type(&self) -> ElementType {
        match self {
            TensorData::Boolean(_) => ElementType::Boolean,
            TensorData::Int32(_) => ElementType::Int32,
            TensorData::Int64(_) => ElementType::Int64,
            TensorData::Float32(_) => ElementType::Float32,
            TensorData::Float64(_) => ElementType::Float64,
            TensorData::Utf8(_) => ElementType::Utf8,
        }
    }
}

/// Row-major n-dimensional array.
#[derive(Debug, Clone, PartialEq)]
pub struct Tensor {
    shape: Vec<usize>,
    data: TensorData,
}

impl Tensor {
    /// `shape`의 곱이 원소 수와 다르면 InvalidArguments
    pub fn new(shape: Vec<usize>, data: TensorData) -> KilnResult<Self> {
        let expected: usize = shape.iter().product();
        if expected != data.len() {
            return Err(KilnError::InvalidArguments(format!(
                "tensor shape {:?} needs {} elements, got {}",
                shape,
                expected,
                data.len()
            )));
        }
        Ok(Self { shape, data })
    }

    /// 1차원 텐서
    pub fn vector(data: TensorData) -> Self {
        Self {
            shape: vec![data.len()],
            data,
        }
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn data(&self) -> &TensorData {
        &self.data
    }

    pub fn element_type(&self) -> ElementType {
        self.data.element_type()
    }
}

/// UDF 인자/반환 값
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Tensor(Tensor),
    /// 테이블 결과 (컬럼 이름 포함)
    Frame(RecordBatch),
}

impl Value {
    /// Tensor: 선언된 shape, Frame: `[rows, columns]`
    pub fn shape(&self) -> Vec<usize> {
        match self {
            Value::Tensor(t) => t.shape().to_vec(),
            Value::Frame(batch) => vec![batch.num_rows(), batch.num_columns()],
        }
    }

    /// Frame은 모든 컬럼이 같은 원소 타입일 때만 Some
    pub fn element_type(&self) -> Option<ElementType> {
        match self {
            Value::Tensor(t) => Some(t.element_type()),
            Value::Frame(batch) => {
                let schema = batch.schema();
                let mut types = schema
                    .fields()
                    .iter()
                    .map(|f| ElementType::from_arrow(f.data_type()));
                let first = types.next()??;
                types.all(|t| t == Some(first)).then_some(first)
            }
        }
    }

    /// 컬럼 이름 (Frame만)
    pub fn column_names(&self) -> Option<Vec<String>> {
        match self {
            Value::Tensor(_) => None,
            Value::Frame(batch) => Some(
                batch
                    .schema()
                    .fields()
                    .iter()
                    .map(|f| f.name().clone())
                    .collect(),
            ),
        }
    }

    pub fn as_tensor(&self) -> KilnResult<&Tensor> {
        match self {
            Value::Tensor(t) => Ok(t),
            Value::Frame(_) => Err(KilnError::InvalidArguments(
                "expected tensor, got frame".to_string(),
            )),
        }
    }

    pub fn as_frame(&self) -> KilnResult<&RecordBatch> {
        match self {
            Value::Frame(batch) => Ok(batch),
            Value::Tensor(_) => Err(KilnError::InvalidArguments(
                "expected frame, got tensor".to_string(),
            )),
        }
    }
}

impl From<Tensor> for Value {
    fn from(tensor: Tensor) -> Self {
        Value::Tensor(tensor)
    }
}

impl From<RecordBatch> for Value {
    fn from(batch: RecordBatch) -> Self {
        Value::Frame(batch)
    }
}
