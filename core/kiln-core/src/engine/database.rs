//! Engine struct definition — the core data structure

use crate::automation::UdfRegistry;
use crate::catalog::Catalog;
use crate::config::EngineConfig;
use crate::error::KilnResult;
use crate::storage::StorageFactory;
use std::sync::Arc;
use tracing::{info, instrument};

/// Kiln 엔진
///
/// 카탈로그, 스토리지 팩토리, UDF 레지스트리를 묶는 진입점입니다.
/// 카탈로그와 WOS 테이블은 하나의 sled 데이터베이스를 공유합니다.
///
/// # 예제
///
/// ```rust
/// use kiln_core::Engine;
/// use kiln_core::automation::CreateJobStatement;
///
/// # fn main() -> kiln_core::KilnResult<()> {
/// let engine = Engine::open_in_memory()?;
/// let message = engine.create_job(&CreateJobStatement {
///     job_name: "nightly".to_string(),
///     queries: vec!["SELECT 1;".to_string()],
///     start_time: "2023-04-01".to_string(),
///     end_time: None,
///     repeat_interval: 1,
///     repeat_period: "day".to_string(),
///     if_not_exists: false,
/// })?;
/// assert_eq!(message.num_rows(), 1);
/// engine.close()?;
/// # Ok(())
/// # }
/// ```
pub struct Engine {
    pub(crate) config: EngineConfig,

    /// sled handle shared by the catalog and the WOS backend
    pub(crate) db: sled::Db,

    pub(crate) catalog: Arc<dyn Catalog>,

    pub(crate) storage: Arc<StorageFactory>,

    pub(crate) udfs: Arc<UdfRegistry>,
}

impl Engine {
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn catalog(&self) -> Arc<dyn Catalog> {
        Arc::clone(&self.catalog)
    }

    pub fn storage(&self) -> Arc<StorageFactory> {
        Arc::clone(&self.storage)
    }

    pub fn udfs(&self) -> &UdfRegistry {
        &self.udfs
    }

    /// 카탈로그와 WOS 데이터를 디스크에 기록
    pub fn flush(&self) -> KilnResult<()> {
        self.catalog.flush()?;
        self.db.flush()?;
        Ok(())
    }

    /// 엔진 종료 (flush 후 해제)
    #[instrument(skip(self))]
    pub fn close(self) -> KilnResult<()> {
        self.flush()?;
        info!("engine closed");
        Ok(())
    }
}
