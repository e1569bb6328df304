//! Job catalog entry
//!
//! 반복 작업의 영구 레코드. 생성은 [`JobScheduler`](super::JobScheduler)가,
//! 이후 갱신은 외부 firing loop가 담당합니다.

use super::schedule::RepeatPeriod;
use crate::error::{KilnError, KilnResult};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// 반복 작업 카탈로그 항목
///
/// `next_schedule_run`은 항상 `start_time` 이상이며 갱신될 때 감소하지 않습니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobCatalogEntry {
    /// 고유 키
    pub name: String,
    /// 실행 순서대로의 쿼리 문자열
    pub queries: Vec<String>,
    pub start_time: NaiveDateTime,
    /// None이면 종료 시각 없음
    pub end_time: Option<NaiveDateTime>,
    pub repeat_interval: u32,
    pub repeat_period: RepeatPeriod,
    pub active: bool,
    pub next_schedule_run: NaiveDateTime,
}

impl JobCatalogEntry {
    /// 실행 대상 여부: 활성 상태이고, 예정 시각이 지났고, 종료 시각 이내
    pub fn is_due(&self, now: NaiveDateTime) -> bool {
        self.active
            && self.next_schedule_run <= now
            && self.end_time.is_none_or(|end| self.next_schedule_run <= end)
    }

    /// 실행 완료 후 다음 실행 시각으로 이동
    ///
    /// 다음 시각이 `end_time`을 넘으면 재예약하지 않고 비활성화합니다.
    pub fn advance(&mut self) -> KilnResult<()> {
        let next = self
            .repeat_period
            .advance(self.next_schedule_run, self.repeat_interval)
            .ok_or_else(|| {
                KilnError::InvalidArguments(format!(
                    "job {}: next run after {} overflows",
                    self.name, self.next_schedule_run
                ))
            })?;

        match self.end_time {
            Some(end) if next > end => self.active = false,
            _ => self.next_schedule_run = next,
        }
        Ok(())
    }
}
