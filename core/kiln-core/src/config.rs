//! Engine configuration
//!
//! 설정 로드 순서: 기본값 → JSON 파일 → 환경 변수 (`KILN_*`)

use crate::error::{KilnError, KilnResult};
use crate::storage::StorageKind;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// 데이터 디렉토리 환경 변수
pub const ENV_DATA_DIR: &str = "KILN_DATA_DIR";
/// 기본 스토리지 환경 변수
pub const ENV_DEFAULT_STORAGE: &str = "KILN_DEFAULT_STORAGE";
/// 로그 레벨 환경 변수
pub const ENV_LOG_LEVEL: &str = "KILN_LOG_LEVEL";
/// 작업 생성 후 flush 여부 환경 변수
pub const ENV_FLUSH_ON_JOB_CREATE: &str = "KILN_FLUSH_ON_JOB_CREATE";

/// 엔진 설정
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// sled 데이터 디렉토리 (None이면 임시 DB)
    pub data_dir: Option<PathBuf>,

    /// 테이블 생성 시 스토리지를 지정하지 않으면 사용할 백엔드
    pub default_storage: StorageKind,

    /// 작업 카탈로그 항목 기록 직후 디스크에 flush
    pub flush_on_job_create: bool,

    /// tracing 필터 레벨
    pub log_level: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            default_storage: StorageKind::Memory,
            flush_on_job_create: true,
            log_level: "info".to_string(),
        }
    }
}

impl EngineConfig {
    /// 임시(in-memory) 설정
    pub fn temporary() -> Self {
        Self::default()
    }

    /// 지정 경로에 영구 저장하는 설정
    pub fn with_data_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.data_dir = Some(path.into());
        self
    }

    pub fn with_default_storage(mut self, kind: StorageKind) -> Self {
        self.default_storage = kind;
        self
    }

    /// JSON 파일에서 로드 (누락된 필드는 기본값)
    pub fn load_from_file(path: &Path) -> KilnResult<Self> {
        let json = fs::read_to_string(path)?;
        let config: EngineConfig = serde_json::from_str(&json)?;
        Ok(config)
    }

    /// 기본값 + 환경 변수
    pub fn from_env() -> KilnResult<Self> {
        let mut config = Self::default();
        config.apply_env()?;
        Ok(config)
    }

    /// 환경 변수로 덮어쓰기
    pub fn apply_env(&mut self) -> KilnResult<()> {
        self.apply_overrides(|key| env::var(key).ok())
    }

    /// `lookup`이 돌려주는 값으로 덮어쓰기
    pub fn apply_overrides<F>(&mut self, lookup: F) -> KilnResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup(ENV_DATA_DIR).filter(|v| !v.is_empty()) {
            self.data_dir = Some(PathBuf::from(dir));
        }

        if let Some(kind) = lookup(ENV_DEFAULT_STORAGE) {
            self.default_storage = kind.parse().map_err(|_| {
                KilnError::Config(format!("{ENV_DEFAULT_STORAGE}: unknown storage kind '{kind}'"))
            })?;
        }

        if let Some(level) = lookup(ENV_LOG_LEVEL) {
            self.log_level = level;
        }

        if let Some(value) = lookup(ENV_FLUSH_ON_JOB_CREATE) {
            self.flush_on_job_create = match value.to_lowercase().as_str() {
                "true" | "1" => true,
                "false" | "0" => false,
                _ => {
                    return Err(KilnError::Config(format!(
                        "{ENV_FLUSH_ON_JOB_CREATE}: expected true/false, got '{value}'"
                    )));
                }
            };
        }

        Ok(())
    }
}
