//! Setup wrapper
//!
//! UDF 정의 시점의 분류 태그를 기록하고, 원래 인자 그대로 setup을 호출합니다.
//! 태그는 실행 흐름에 영향을 주지 않습니다.

/// 카탈로그/플래너가 UDF를 실행하지 않고 분류할 때 쓰는 태그
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetupTags {
    pub cache: bool,
    pub udf_type: String,
    pub batching: bool,
}

/// setup 함수 래퍼
pub struct SetupWrapper<F> {
    tags: SetupTags,
    func: F,
}

impl<F> SetupWrapper<F> {
    pub fn new(cache: bool, udf_type: impl Into<String>, batching: bool, func: F) -> Self {
        Self {
            tags: SetupTags {
                cache,
                udf_type: udf_type.into(),
                batching,
            },
            func,
        }
    }

    pub fn tags(&self) -> &SetupTags {
        &self.tags
    }

    /// 항상 원래 setup을 그대로 호출
    pub fn call<A, R>(&mut self, args: A) -> R
    where
        F: FnMut(A) -> R,
    {
        (self.func)(args)
    }
}
