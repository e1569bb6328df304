//! UDF API for Engine
//!
//! UDF 등록 및 호출 API

use crate::automation::callable::Value;
use crate::automation::udf::{ForwardWrapper, SetupTags, Signature};
use crate::engine::Engine;
use crate::error::KilnResult;
use std::sync::Arc;

impl Engine {
    /// forward 계약을 가진 UDF 등록
    ///
    /// # 예제
    ///
    /// ```rust
    /// use kiln_core::Engine;
    /// use kiln_core::automation::{ElementType, Tensor, TensorData, Value};
    /// use kiln_core::automation::udf::{Dim, Signature};
    ///
    /// # fn main() -> kiln_core::KilnResult<()> {
    /// let engine = Engine::open_in_memory()?;
    /// let vector = Signature::any()
    ///     .with_shape(vec![Dim::Any])
    ///     .with_element_type(ElementType::Float64);
    ///
    /// engine.register_udf("identity", vec![vector.clone()], Some(vector), |args| {
    ///     Ok(args[0].clone())
    /// })?;
    ///
    /// let input = Value::from(Tensor::vector(TensorData::Float64(vec![1.0, 2.0])));
    /// let output = engine.call_udf("identity", &[input.clone()])?;
    /// assert_eq!(output, input);
    /// # Ok(())
    /// # }
    /// ```
    pub fn register_udf<F>(
        &self,
        name: impl Into<String>,
        input: Vec<Signature>,
        output: Option<Signature>,
        func: F,
    ) -> KilnResult<()>
    where
        F: Fn(&[Value]) -> KilnResult<Value> + Send + Sync + 'static,
    {
        self.udfs
            .register(Arc::new(ForwardWrapper::new(name, input, output, func)))
    }

    /// setup 태그와 함께 UDF 등록
    pub fn register_udf_with_setup<F>(
        &self,
        name: impl Into<String>,
        setup: SetupTags,
        input: Vec<Signature>,
        output: Option<Signature>,
        func: F,
    ) -> KilnResult<()>
    where
        F: Fn(&[Value]) -> KilnResult<Value> + Send + Sync + 'static,
    {
        self.udfs.register_with_setup(
            Arc::new(ForwardWrapper::new(name, input, output, func)),
            setup,
        )
    }

    /// UDF 호출 (계약 검사 포함)
    pub fn call_udf(&self, name: &str, args: &[Value]) -> KilnResult<Value> {
        self.udfs.execute(name, args)
    }
}
