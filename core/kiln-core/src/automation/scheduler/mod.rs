//! Scheduler System
//!
//! 반복 작업 정의: 날짜 파싱, 반복 주기, 카탈로그 엔트리, 작업 생성.
//! 예정된 작업을 실제로 실행하는 firing loop는 이 크레이트 밖에 있으며
//! [`JobCatalogEntry::is_due`] / [`JobCatalogEntry::advance`]를 사용합니다.

pub mod core;
pub mod datetime;
pub mod job;
pub mod schedule;

pub use self::core::{CreateJobStatement, JobCreation, JobScheduler};
pub use datetime::parse_datetime;
pub use job::JobCatalogEntry;
pub use schedule::RepeatPeriod;
