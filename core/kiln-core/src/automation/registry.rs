//! UDF registry
//!
//! 등록된 UDF와 그 태그를 보관합니다. 플래너/카탈로그는 UDF를 호출하지 않고
//! 태그만 읽어 분류할 수 있습니다.

use super::callable::{Callable, Value};
use super::udf::{ForwardTags, SetupTags};
use crate::error::{KilnError, KilnResult};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

struct RegisteredUdf {
    callable: Arc<dyn Callable>,
    setup: Option<SetupTags>,
}

/// UDF 레지스트리
pub struct UdfRegistry {
    udfs: RwLock<HashMap<String, RegisteredUdf>>,
}

impl UdfRegistry {
    pub fn new() -> Self {
        Self {
            udfs: RwLock::new(HashMap::new()),
        }
    }

    /// UDF 등록
    pub fn register(&self, callable: Arc<dyn Callable>) -> KilnResult<()> {
        self.insert(callable, None)
    }

    /// setup 태그와 함께 등록
    pub fn register_with_setup(
        &self,
        callable: Arc<dyn Callable>,
        setup: SetupTags,
    ) -> KilnResult<()> {
        self.insert(callable, Some(setup))
    }

    fn insert(&self, callable: Arc<dyn Callable>, setup: Option<SetupTags>) -> KilnResult<()> {
        let name = callable.name().to_string();
        let mut udfs = self.udfs.write();

        if udfs.contains_key(&name) {
            return Err(KilnError::DuplicateCallable(name));
        }

        debug!(udf = %name, "udf registered");
        udfs.insert(name, RegisteredUdf { callable, setup });
        Ok(())
    }

    /// UDF 등록 해제
    pub fn unregister(&self, name: &str) -> KilnResult<()> {
        self.udfs
            .write()
            .remove(name)
            .ok_or_else(|| KilnError::CallableNotFound(name.to_string()))?;
        Ok(())
    }

    /// UDF 실행
    pub fn execute(&self, name: &str, args: &[Value]) -> KilnResult<Value> {
        let callable = self.get(name)?;
        // 락 해제 후 실행
        callable.call(args)
    }

    pub fn get(&self, name: &str) -> KilnResult<Arc<dyn Callable>> {
        self.udfs
            .read()
            .get(name)
            .map(|udf| Arc::clone(&udf.callable))
            .ok_or_else(|| KilnError::CallableNotFound(name.to_string()))
    }

    pub fn forward_tags(&self, name: &str) -> KilnResult<ForwardTags> {
        Ok(self.get(name)?.tags().clone())
    }

    pub fn setup_tags(&self, name: &str) -> KilnResult<Option<SetupTags>> {
        self.udfs
            .read()
            .get(name)
            .map(|udf| udf.setup.clone())
            .ok_or_else(|| KilnError::CallableNotFound(name.to_string()))
    }

    /// 등록된 UDF 이름 목록
    pub fn list(&self) -> Vec<String> {
        let mut names: Vec<String> = self.udfs.read().keys().cloned().collect();
        names.sort();
        names
    }
}

impl Default for UdfRegistry {
    fn default() -> Self {
        Self::new()
    }
}
