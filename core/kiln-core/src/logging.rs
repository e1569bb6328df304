//! Logging setup
//!
//! 라이브러리는 `tracing` 이벤트만 내보냅니다. subscriber 설치는 호스트가
//! 결정하며, 이미 설치되어 있으면 아래 함수들은 아무것도 바꾸지 않고
//! `false`를 반환합니다. `logging` feature가 꺼져 있으면 모두 no-op입니다.

use crate::config::EngineConfig;

#[cfg(feature = "logging")]
use tracing_subscriber::{EnvFilter, fmt};

/// `RUST_LOG`, 없으면 `info`
pub fn init() -> bool {
    init_with_level("info")
}

/// `RUST_LOG`, 없으면 `level`
#[cfg(feature = "logging")]
pub fn init_with_level(level: &str) -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .try_init()
        .is_ok()
}

#[cfg(not(feature = "logging"))]
pub fn init_with_level(_level: &str) -> bool {
    false
}

/// 테스트 출력 캡처용 (debug 레벨)
#[cfg(feature = "logging")]
pub fn init_test() -> bool {
    fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init()
        .is_ok()
}

#[cfg(not(feature = "logging"))]
pub fn init_test() -> bool {
    false
}

/// `EngineConfig::log_level` 기준 (`KILN_LOG_LEVEL`)
pub fn init_from_config(config: &EngineConfig) -> bool {
    init_with_level(&config.log_level)
}
