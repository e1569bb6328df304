//! Forward wrapper — contract checks at the UDF invocation boundary.
//!
//! Inputs are checked in argument order (shape, then element type) before the
//! wrapped function runs; the first failure wins. The output is checked after
//! the function returns, so any side effect of the call has already happened
//! when an output violation is reported.

use super::signature::Signature;
use crate::automation::callable::{Callable, Value};
use crate::error::{KilnError, KilnResult};
use tracing::debug;

type ForwardFn = Box<dyn Fn(&[Value]) -> KilnResult<Value> + Send + Sync>;

/// Declared signatures, readable by the planner without invoking the UDF.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ForwardTags {
    /// One per positional argument
    pub input: Vec<Signature>,
    pub output: Option<Signature>,
}

/// forward 함수 래퍼
pub struct ForwardWrapper {
    name: String,
    tags: ForwardTags,
    func: ForwardFn,
}

impl ForwardWrapper {
    pub fn new<F>(
        name: impl Into<String>,
        input: Vec<Signature>,
        output: Option<Signature>,
        func: F,
    ) -> Self
    where
        F: Fn(&[Value]) -> KilnResult<Value> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            tags: ForwardTags { input, output },
            func: Box::new(func),
        }
    }

    fn check_inputs(&self, args: &[Value]) -> KilnResult<()> {
        for (index, signature) in self.tags.input.iter().enumerate() {
            let Some(arg) = args.get(index) else {
                return Err(KilnError::ContractViolation(format!(
                    "{}: missing input parameter {index}",
                    self.name
                )));
            };

            if !signature.check_shape(arg) {
                return Err(KilnError::ContractViolation(format!(
                    "{}: Shape mismatch of input parameter {index}. expected {}, got {:?}",
                    self.name,
                    display_opt(signature.shape()),
                    arg.shape()
                )));
            }

            if !signature.check_element_type(arg) {
                return Err(KilnError::ContractViolation(format!(
                    "{}: Datatype mismatch of input parameter {index}. expected {}, got {}",
                    self.name,
                    display_opt(signature.element_type()),
                    display_opt(arg.element_type())
                )));
            }
        }
        Ok(())
    }

    fn check_output(&self, output: &Value) -> KilnResult<()> {
        let Some(signature) = &self.tags.output else {
            return Ok(());
        };

        if !signature.check_shape(output) {
            return Err(KilnError::ContractViolation(format!(
                "{}: Shape mismatch of output. expected {}, got {:?}",
                self.name,
                display_opt(signature.shape()),
                output.shape()
            )));
        }

        if !signature.check_element_type(output) {
            return Err(KilnError::ContractViolation(format!(
                "{}: Datatype mismatch of output. expected {}, got {}",
                self.name,
                display_opt(signature.element_type()),
                display_opt(output.element_type())
            )));
        }

        if !signature.check_columns(output) {
            return Err(KilnError::ContractViolation(format!(
                "{}: Column header names are not matching. expected {:?}, got {:?}",
                self.name,
                signature.columns().unwrap_or_default(),
                output.column_names().unwrap_or_default()
            )));
        }

        Ok(())
    }
}

fn display_opt<T: std::fmt::Display>(value: Option<T>) -> String {
    value.map_or_else(|| "none".to_string(), |v| v.to_string())
}

impl Callable for ForwardWrapper {
    fn call(&self, args: &[Value]) -> KilnResult<Value> {
        self.check_inputs(args)?;

        let output = (self.func)(args)?;

        self.check_output(&output)?;
        debug!(udf = %self.name, "forward call passed contract checks");
        Ok(output)
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn tags(&self) -> &ForwardTags {
        &self.tags
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::automation::callable::{ElementType, Tensor, TensorData};
    use crate::automation::udf::Dim;
    use crate::error::ErrorKind;
    use arrow::array::{ArrayRef, Float64Array, StringArray};
    use arrow::datatypes::{DataType, Field, Schema};
    use arrow::record_batch::RecordBatch;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn tensor(shape: Vec<usize>) -> Value {
        let len = shape.iter().product();
        Value::Tensor(Tensor::new(shape, TensorData::Float32(vec![1.0; len])).unwrap())
    }

    fn int_tensor(shape: Vec<usize>) -> Value {
        let len = shape.iter().product();
        Value::Tensor(Tensor::new(shape, TensorData::Int64(vec![1; len])).unwrap())
    }

    fn labels_frame(columns: &[&str]) -> Value {
        let fields: Vec<Field> = columns
            .iter()
            .map(|c| Field::new(*c, DataType::Utf8, false))
            .collect();
        let arrays: Vec<ArrayRef> = columns
            .iter()
            .map(|_| Arc::new(StringArray::from(vec!["cat"])) as ArrayRef)
            .collect();
        Value::Frame(RecordBatch::try_new(Arc::new(Schema::new(fields)), arrays).unwrap())
    }

    /// Identity UDF that counts how often its body runs.
    fn counting_identity(
        input: Vec<Signature>,
        output: Option<Signature>,
    ) -> (ForwardWrapper, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let udf = ForwardWrapper::new("identity", input, output, move |args| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(args[0].clone())
        });
        (udf, calls)
    }

    #[test]
    fn test_unconstrained_never_rejects() {
        let (udf, calls) = counting_identity(vec![Signature::any()], Some(Signature::any()));
        let out = udf.call(&[tensor(vec![5, 7])]).unwrap();
        assert_eq!(out, tensor(vec![5, 7]));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_input_shape_violation_skips_body() {
        let sig = Signature::any().with_shape([Dim::Any, Dim::Fixed(3)]);
        let (udf, calls) = counting_identity(vec![sig], None);

        let err = udf.call(&[tensor(vec![2, 4])]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ContractViolation);
        assert!(err.to_string().contains("Shape mismatch of input parameter 0"));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_input_type_violation_skips_body() {
        let sig = Signature::any()
            .with_shape([Dim::Any])
            .with_element_type(ElementType::Float32);
        let (udf, calls) = counting_identity(vec![sig], None);

        let err = udf.call(&[int_tensor(vec![4])]).unwrap_err();
        assert!(err.to_string().contains("Datatype mismatch of input parameter 0"));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_first_failing_argument_wins() {
        let first = Signature::any().with_element_type(ElementType::Float32);
        let second = Signature::any().with_shape([Dim::Fixed(1)]);
        let (udf, calls) = counting_identity(vec![first, second], None);

        // 두 인자 모두 위반 → 첫 번째 인자의 타입 오류가 보고됨
        let err = udf
            .call(&[int_tensor(vec![2]), tensor(vec![9])])
            .unwrap_err();
        assert!(err.to_string().contains("input parameter 0"));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_missing_argument() {
        let (udf, calls) =
            counting_identity(vec![Signature::any(), Signature::any()], None);
        let err = udf.call(&[tensor(vec![1])]).unwrap_err();
        assert!(err.to_string().contains("missing input parameter 1"));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_output_violation_runs_body() {
        let output = Signature::any().with_shape([Dim::Fixed(1)]);
        let (udf, calls) = counting_identity(vec![Signature::any()], Some(output));

        let err = udf.call(&[tensor(vec![3])]).unwrap_err();
        assert!(err.to_string().contains("Shape mismatch of output"));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_output_type_violation() {
        let output = Signature::any().with_element_type(ElementType::Int64);
        let (udf, calls) = counting_identity(vec![Signature::any()], Some(output));

        let err = udf.call(&[tensor(vec![3])]).unwrap_err();
        assert!(err.to_string().contains("Datatype mismatch of output"));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_output_columns() {
        let output = Signature::any().with_columns(["labels", "bboxes"]);
        let (udf, calls) = counting_identity(vec![Signature::any()], Some(output));

        assert!(udf.call(&[labels_frame(&["bboxes", "labels"])]).is_ok());

        let err = udf.call(&[labels_frame(&["labels"])]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ContractViolation);
        assert!(err.to_string().contains("Column header names are not matching"));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_udf_error_propagates_unchanged() {
        let udf = ForwardWrapper::new("failing", vec![Signature::any()], None, |_| {
            Err(KilnError::Storage("model file unreadable".to_string()))
        });
        let err = udf.call(&[tensor(vec![1])]).unwrap_err();
        assert!(matches!(err, KilnError::Storage(_)));
    }

    #[test]
    fn test_frame_output_shape() {
        let output = Signature::any()
            .with_shape([Dim::Any, Dim::Fixed(1)])
            .with_element_type(ElementType::Float64);
        let udf = ForwardWrapper::new("score", vec![Signature::any()], Some(output), |args| {
            let n = args[0].shape()[0];
            let scores = Float64Array::from(vec![0.5; n]);
            let schema = Arc::new(Schema::new(vec![Field::new("score", DataType::Float64, false)]));
            Ok(Value::Frame(RecordBatch::try_new(schema, vec![Arc::new(scores)])?))
        });

        let out = udf.call(&[tensor(vec![4, 2])]).unwrap();
        assert_eq!(out.shape(), vec![4, 1]);
        assert_eq!(udf.tags().input.len(), 1);
    }
}
