//! # Kiln — Embedded query execution core
//!
//! Kiln은 Apache Arrow 배치 위에서 동작하는 임베디드 실행 코어입니다.
//! 세 가지 기능을 제공합니다.
//!
//! - **INSERT 파이프라인**: Volcano(pull) 모델 연산자 트리. INSERT 연산자는
//!   입력 배치를 스토리지 백엔드에 기록한 뒤 그대로 다음 단계로 넘깁니다.
//! - **UDF 계약 검사**: setup/forward 래퍼. 입력과 출력의 shape, 원소 타입,
//!   컬럼 이름을 선언된 [`Signature`](automation::Signature)로 검사합니다.
//! - **작업 스케줄링**: 반복 작업 정의를 엄격한 날짜 파싱과 함께 카탈로그에 기록합니다.
//!
//! ## 빠른 시작
//!
//! ```rust
//! use kiln_core::Engine;
//! use arrow::array::Int64Array;
//! use arrow::datatypes::{DataType, Field, Schema};
//! use arrow::record_batch::RecordBatch;
//! use std::sync::Arc;
//!
//! # fn main() -> kiln_core::KilnResult<()> {
//! let engine = Engine::open_in_memory()?;
//! let schema = Arc::new(Schema::new(vec![Field::new("price", DataType::Int64, false)]));
//! engine.create_table("sales", "homes", schema.clone())?;
//!
//! let batch = RecordBatch::try_new(schema, vec![Arc::new(Int64Array::from(vec![100, 200]))])?;
//! assert_eq!(engine.insert("sales", "homes", vec![batch])?, 2);
//! assert_eq!(engine.scan("sales", "homes")?.len(), 1);
//! # Ok(())
//! # }
//! ```
//!
//! ## 아키텍처
//!
//! ```text
//! Engine ─┬─ Catalog (sled: tables, jobs)
//!         ├─ StorageFactory ─┬─ MemoryStorage (DashMap)
//!         │                  └─ WosStorage (sled + Arrow IPC)
//!         └─ UdfRegistry (ForwardWrapper)
//! ```
//!
//! ## 모듈 구조
//!
//! - [`engine`] — 엔진 ([`Engine`])
//! - [`sql`] — 물리 연산자와 실행기
//! - [`storage`] — 스토리지 백엔드
//! - [`catalog`] — 테이블 메타데이터와 작업 카탈로그
//! - [`automation`] — UDF 계약 검사, 작업 스케줄러

pub mod automation;
pub mod catalog;
pub mod config;
pub mod engine;
pub mod error;
pub mod sql;
pub mod storage;

// Logging utilities
pub mod logging;

// Re-export commonly used types
pub use config::EngineConfig;
pub use engine::Engine;
pub use error::{ErrorKind, KilnError, KilnResult};
