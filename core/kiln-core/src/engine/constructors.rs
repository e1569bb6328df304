//! Engine Constructors — factory methods for creating Engine instances

use crate::automation::UdfRegistry;
use crate::catalog::SledCatalog;
use crate::config::EngineConfig;
use crate::engine::Engine;
use crate::error::KilnResult;
use crate::storage::StorageFactory;
use std::sync::Arc;
use tracing::{info, instrument};

impl Engine {
    /// 설정에 따라 엔진을 엽니다.
    ///
    /// `data_dir`이 있으면 해당 디렉토리의 sled 데이터베이스를 열거나 생성하고,
    /// 없으면 임시 데이터베이스를 사용합니다.
    #[instrument(skip(config), fields(data_dir = ?config.data_dir))]
    pub fn open(config: EngineConfig) -> KilnResult<Self> {
        let db = match &config.data_dir {
            Some(path) => {
                std::fs::create_dir_all(path)?;
                info!("Opening engine at {:?}", path);
                sled::open(path)?
            }
            None => {
                info!("Opening temporary engine");
                sled::Config::new().temporary(true).open()?
            }
        };

        let catalog = Arc::new(SledCatalog::open_with_db(&db)?);
        let storage = Arc::new(StorageFactory::new(&db));

        Ok(Self {
            config,
            db,
            catalog,
            storage,
            udfs: Arc::new(UdfRegistry::new()),
        })
    }

    /// 임시 엔진 (테스트용). drop 시 데이터 삭제.
    pub fn open_in_memory() -> KilnResult<Self> {
        Self::open(EngineConfig::temporary())
    }
}
