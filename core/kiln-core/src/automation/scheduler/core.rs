//! Job creation
//!
//! 작업 정의 요청을 검증하고 카탈로그에 기록합니다. 쿼리를 실행하지는 않습니다.

use super::datetime::parse_datetime;
use super::job::JobCatalogEntry;
use super::schedule::RepeatPeriod;
use crate::catalog::Catalog;
use crate::error::{KilnError, KilnResult};
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// 상위 문장 객체에서 넘어오는 작업 생성 요청
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateJobStatement {
    pub job_name: String,
    pub queries: Vec<String>,
    pub start_time: String,
    pub end_time: Option<String>,
    pub repeat_interval: i64,
    pub repeat_period: String,
    pub if_not_exists: bool,
}

impl CreateJobStatement {
    /// 새 작업 엔트리로 변환 (카탈로그 접근 없음)
    ///
    /// `active = true`, `next_schedule_run = start_time`
    pub fn to_entry(&self) -> KilnResult<JobCatalogEntry> {
        if self.job_name.trim().is_empty() {
            return Err(KilnError::InvalidArguments(
                "job name must not be empty".to_string(),
            ));
        }

        let start_time = parse_datetime(&self.start_time)?;
        let end_time = self.end_time.as_deref().map(parse_datetime).transpose()?;

        if let Some(end) = end_time.filter(|end| *end < start_time) {
            return Err(KilnError::InvalidArguments(format!(
                "job {}: end time {end} is before start time {start_time}",
                self.job_name
            )));
        }

        let repeat_interval = u32::try_from(self.repeat_interval)
            .ok()
            .filter(|n| *n > 0)
            .ok_or_else(|| {
                KilnError::InvalidArguments(format!(
                    "job {}: repeat interval must be a positive integer, got {}",
                    self.job_name, self.repeat_interval
                ))
            })?;
        let repeat_period: RepeatPeriod = self.repeat_period.parse()?;

        Ok(JobCatalogEntry {
            name: self.job_name.clone(),
            queries: self.queries.clone(),
            start_time,
            end_time,
            repeat_interval,
            repeat_period,
            active: true,
            next_schedule_run: start_time,
        })
    }
}

/// 작업 생성 결과 (오류가 아닌 경우)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobCreation {
    Created(String),
    /// `IF NOT EXISTS`로 요청되었고 이미 존재함
    AlreadyExists(String),
}

impl JobCreation {
    pub fn message(&self) -> String {
        match self {
            JobCreation::Created(name) => {
                format!("The job {name} has been successfully created.")
            }
            JobCreation::AlreadyExists(name) => {
                format!("A job with name {name} already exists, nothing added.")
            }
        }
    }
}

/// 작업 스케줄러 (정의 전용)
pub struct JobScheduler {
    catalog: Arc<dyn Catalog>,
    flush_on_create: bool,
}

impl JobScheduler {
    pub fn new(catalog: Arc<dyn Catalog>) -> Self {
        Self {
            catalog,
            flush_on_create: false,
        }
    }

    /// 생성 직후 카탈로그 flush 여부
    pub fn with_flush_on_create(mut self, flush: bool) -> Self {
        self.flush_on_create = flush;
        self
    }

    /// 작업 생성
    ///
    /// 입력 검증이 카탈로그 접근보다 먼저 수행됩니다. 존재 확인과 삽입은
    /// 카탈로그의 원자적 create-if-absent에 의해 하나의 단계로 처리됩니다.
    #[instrument(skip(self, stmt), fields(job = %stmt.job_name))]
    pub fn create_job(&self, stmt: &CreateJobStatement) -> KilnResult<JobCreation> {
        let entry = stmt.to_entry()?;

        if self.catalog.get_job_entry(&entry.name)?.is_some() {
            return self.on_existing(stmt);
        }

        debug!(queries = entry.queries.len(), start = %entry.start_time, "creating job");
        match self.catalog.insert_job_entry(&entry) {
            Ok(()) => {}
            // 동시 생성 경쟁에서 진 경우
            Err(KilnError::JobAlreadyExists(_)) => return self.on_existing(stmt),
            Err(e) => return Err(e),
        }

        if self.flush_on_create {
            self.catalog.flush()?;
        }

        info!(
            period = %entry.repeat_period,
            interval = entry.repeat_interval,
            "job created"
        );
        Ok(JobCreation::Created(entry.name))
    }

    fn on_existing(&self, stmt: &CreateJobStatement) -> KilnResult<JobCreation> {
        if stmt.if_not_exists {
            info!("job already exists, nothing added");
            Ok(JobCreation::AlreadyExists(stmt.job_name.clone()))
        } else {
            Err(KilnError::JobAlreadyExists(stmt.job_name.clone()))
        }
    }
}
