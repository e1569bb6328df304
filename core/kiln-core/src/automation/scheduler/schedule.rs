//! Repeat period definitions
//!
//! 반복 주기 단위와 다음 실행 시각 계산

use crate::error::{KilnError, KilnResult};
use chrono::{Months, NaiveDateTime, TimeDelta};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 반복 주기 단위
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepeatPeriod {
    Minute,
    Hour,
    Day,
    Week,
    Month,
}

impl RepeatPeriod {
    pub fn as_str(&self) -> &'static str {
        match self {
            RepeatPeriod::Minute => "minute",
            RepeatPeriod::Hour => "hour",
            RepeatPeriod::Day => "day",
            RepeatPeriod::Week => "week",
            RepeatPeriod::Month => "month",
        }
    }

    /// `from` + `interval` 단위. 월 단위는 달력 기준 (1/31 + 1 month = 2/28)
    pub fn advance(&self, from: NaiveDateTime, interval: u32) -> Option<NaiveDateTime> {
        let n = i64::from(interval);
        let delta = match self {
            RepeatPeriod::Minute => TimeDelta::try_minutes(n)?,
            RepeatPeriod::Hour => TimeDelta::try_hours(n)?,
            RepeatPeriod::Day => TimeDelta::try_days(n)?,
            RepeatPeriod::Week => TimeDelta::try_weeks(n)?,
            RepeatPeriod::Month => return from.checked_add_months(Months::new(interval)),
        };
        from.checked_add_signed(delta)
    }
}

impl fmt::Display for RepeatPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RepeatPeriod {
    type Err = KilnError;

    /// 대소문자 무시, 단수/복수 모두 허용
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim().to_lowercase();
        let singular = token.strip_suffix('s').unwrap_or(&token);
        match singular {
            "minute" => Ok(RepeatPeriod::Minute),
            "hour" => Ok(RepeatPeriod::Hour),
            "day" => Ok(RepeatPeriod::Day),
            "week" => Ok(RepeatPeriod::Week),
            "month" => Ok(RepeatPeriod::Month),
            _ => Err(KilnError::InvalidArguments(format!(
                "unknown repeat period '{s}', expected one of minute, hour, day, week, month"
            ))),
        }
    }
}

/// 반복 주기 파싱 (KilnResult 반환 헬퍼)
pub fn parse_repeat_period(token: &str) -> KilnResult<RepeatPeriod> {
    token.parse()
}
