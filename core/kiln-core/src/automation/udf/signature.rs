//! UDF I/O signatures
//!
//! A [`Signature`] constrains one UDF input position or the output: an
//! optional dimensional pattern, an optional element type and, for tabular
//! outputs, an optional set of column names. A signature with nothing set
//! accepts every value.

use crate::automation::callable::{ElementType, Value};
use std::collections::BTreeSet;
use std::fmt;

/// One dimension of a shape pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dim {
    Fixed(usize),
    /// Wildcard, matches any size
    Any,
}

impl Dim {
    fn matches(&self, size: usize) -> bool {
        match self {
            Dim::Fixed(expected) => *expected == size,
            Dim::Any => true,
        }
    }
}

impl fmt::Display for Dim {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dim::Fixed(n) => write!(f, "{n}"),
            Dim::Any => f.write_str("*"),
        }
    }
}

/// Dimensional pattern, e.g. `(*, 3, 224, 224)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShapePattern(pub Vec<Dim>);

impl ShapePattern {
    /// Rank must match and every fixed dimension must be equal.
    pub fn matches(&self, shape: &[usize]) -> bool {
        self.0.len() == shape.len() && self.0.iter().zip(shape).all(|(d, &n)| d.matches(n))
    }
}

impl fmt::Display for ShapePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for (i, dim) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{dim}")?;
        }
        f.write_str(")")
    }
}

/// Declared constraints for one UDF input or output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Signature {
    shape: Option<ShapePattern>,
    element_type: Option<ElementType>,
    columns: Option<Vec<String>>,
}

impl Signature {
    /// Signature with no constraints.
    pub fn any() -> Self {
        Self::default()
    }

    pub fn with_shape(mut self, dims: impl IntoIterator<Item = Dim>) -> Self {
        self.shape = Some(ShapePattern(dims.into_iter().collect()));
        self
    }

    pub fn with_element_type(mut self, element_type: ElementType) -> Self {
        self.element_type = Some(element_type);
        self
    }

    pub fn with_columns<S: Into<String>>(mut self, columns: impl IntoIterator<Item = S>) -> Self {
        self.columns = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    pub fn shape(&self) -> Option<&ShapePattern> {
        self.shape.as_ref()
    }

    pub fn element_type(&self) -> Option<ElementType> {
        self.element_type
    }

    pub fn columns(&self) -> Option<&[String]> {
        self.columns.as_deref()
    }

    pub fn is_shape_defined(&self) -> bool {
        self.shape.is_some()
    }

    pub fn is_element_type_defined(&self) -> bool {
        self.element_type.is_some()
    }

    /// An empty column list counts as unset.
    pub fn is_columns_defined(&self) -> bool {
        self.columns.as_ref().is_some_and(|c| !c.is_empty())
    }

    pub fn check_shape(&self, value: &Value) -> bool {
        match &self.shape {
            Some(pattern) => pattern.matches(&value.shape()),
            None => true,
        }
    }

    pub fn check_element_type(&self, value: &Value) -> bool {
        match self.element_type {
            Some(expected) => value.element_type() == Some(expected),
            None => true,
        }
    }

    /// Column names are compared as sets: order is ignored, and a tensor
    /// never satisfies a declared column list.
    pub fn check_columns(&self, value: &Value) -> bool {
        if !self.is_columns_defined() {
            return true;
        }
        let Some(actual) = value.column_names() else {
            return false;
        };
        let expected: BTreeSet<&str> = self
            .columns
            .iter()
            .flatten()
            .map(String::as_str)
            .collect();
        let actual: BTreeSet<&str> = actual.iter().map(String::as_str).collect();
        expected == actual
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::automation::callable::{Tensor, TensorData};
    use arrow::array::{ArrayRef, Float64Array};
    use arrow::datatypes::{DataType, Field, Schema};
    use arrow::record_batch::RecordBatch;
    use proptest::prelude::*;
    use std::sync::Arc;

    fn image(shape: Vec<usize>) -> Value {
        let len = shape.iter().product();
        Value::Tensor(Tensor::new(shape, TensorData::Float32(vec![0.0; len])).unwrap())
    }

    fn frame(columns: &[&str]) -> Value {
        let fields: Vec<Field> = columns
            .iter()
            .map(|c| Field::new(*c, DataType::Float64, false))
            .collect();
        let arrays: Vec<ArrayRef> = columns
            .iter()
            .map(|_| Arc::new(Float64Array::from(vec![1.0, 2.0])) as ArrayRef)
            .collect();
        Value::Frame(RecordBatch::try_new(Arc::new(Schema::new(fields)), arrays).unwrap())
    }

    #[test]
    fn test_shape_wildcards() {
        let sig = Signature::any().with_shape([Dim::Any, Dim::Fixed(3), Dim::Any]);
        assert!(sig.check_shape(&image(vec![8, 3, 32])));
        assert!(sig.check_shape(&image(vec![1, 3, 1])));
        assert!(!sig.check_shape(&image(vec![8, 4, 32])));
        assert!(!sig.check_shape(&image(vec![8, 3])));
    }

    #[test]
    fn test_shape_display() {
        let pattern = ShapePattern(vec![Dim::Any, Dim::Fixed(3), Dim::Fixed(224)]);
        assert_eq!(pattern.to_string(), "(*, 3, 224)");
    }

    #[test]
    fn test_element_type() {
        let sig = Signature::any().with_element_type(ElementType::Float32);
        assert!(sig.check_element_type(&image(vec![2, 2])));
        assert!(!sig.check_element_type(&frame(&["a"])));
    }

    #[test]
    fn test_columns_are_order_insensitive() {
        let sig = Signature::any().with_columns(["label", "score"]);
        assert!(sig.check_columns(&frame(&["score", "label"])));
        assert!(!sig.check_columns(&frame(&["label"])));
        assert!(!sig.check_columns(&frame(&["label", "score", "extra"])));
        assert!(!sig.check_columns(&image(vec![2])));
    }

    #[test]
    fn test_empty_columns_count_as_unset() {
        let sig = Signature::any().with_columns(Vec::<String>::new());
        assert!(!sig.is_columns_defined());
        assert!(sig.check_columns(&image(vec![2])));
    }

    proptest! {
        #[test]
        fn unconstrained_signature_accepts_any_tensor(shape in prop::collection::vec(0usize..5, 0..4)) {
            let value = image(shape);
            let sig = Signature::any();
            prop_assert!(sig.check_shape(&value));
            prop_assert!(sig.check_element_type(&value));
            prop_assert!(sig.check_columns(&value));
        }

        #[test]
        fn all_wildcard_pattern_matches_same_rank(shape in prop::collection::vec(0usize..5, 0..4)) {
            let sig = Signature::any().with_shape(shape.iter().map(|_| Dim::Any));
            prop_assert!(sig.check_shape(&image(shape)));
        }
    }
}
