//! Runtime description of a parsed graph node
//!
//! The graph parser (an external collaborator) hands each node over as a
//! [`RuntimeOperator`]: an instance name, an operator type name, a map of
//! typed hyperparameters, and a map of value blobs (weights, bias). The
//! registry materializes concrete layers from these.

use std::collections::HashMap;

/// A typed hyperparameter value attached to a graph node.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RuntimeParameter {
    Int(i64),
    Float(f32),
    Bool(bool),
    Str(String),
    IntArray(Vec<i64>),
    FloatArray(Vec<f32>),
}

/// A flat value blob with its declared shape, e.g. convolution weights.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RuntimeAttribute {
    /// Declared shape, outermost dimension first
    pub shape: Vec<usize>,
    /// Values in the declared order
    pub data: Vec<f32>,
}

impl RuntimeAttribute {
    /// Create an attribute from a shape and its flat values.
    pub fn new(shape: Vec<usize>, data: Vec<f32>) -> Self {
        Self { shape, data }
    }
}

/// One parsed graph node, ready for materialization.
///
/// # Examples
///
/// ```
/// use inferso_nn::{RuntimeOperator, RuntimeParameter};
///
/// let op = RuntimeOperator::new("up1", "nn.Upsample")
///     .with_param("scale_factor", RuntimeParameter::FloatArray(vec![2.0, 2.0]))
///     .with_param("mode", RuntimeParameter::Str("nearest".into()));
///
/// assert_eq!(op.float_array_param("scale_factor"), Some(&[2.0, 2.0][..]));
/// assert_eq!(op.str_param("mode"), Some("nearest"));
/// // Absent and mistyped fields look the same to accessors
/// assert_eq!(op.int_param("scale_factor"), None);
/// assert_eq!(op.int_param("missing"), None);
/// ```
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RuntimeOperator {
    /// Instance name, e.g. `conv1`
    pub name: String,
    /// Operator type name, e.g. `nn.Conv2d`
    pub type_name: String,
    /// Typed hyperparameters keyed by field name
    pub params: HashMap<String, RuntimeParameter>,
    /// Value blobs keyed by field name
    pub attributes: HashMap<String, RuntimeAttribute>,
}

impl RuntimeOperator {
    /// Create an operator description with empty maps.
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            params: HashMap::new(),
            attributes: HashMap::new(),
        }
    }

    /// Attach a parameter (builder style).
    pub fn with_param(mut self, key: impl Into<String>, value: RuntimeParameter) -> Self {
        self.params.insert(key.into(), value);
        self
    }

    /// Attach an attribute blob (builder style).
    pub fn with_attribute(mut self, key: impl Into<String>, attribute: RuntimeAttribute) -> Self {
        self.attributes.insert(key.into(), attribute);
        self
    }

    /// Integer parameter, `None` when absent or mistyped.
    pub fn int_param(&self, key: &str) -> Option<i64> {
        match self.params.get(key) {
            Some(RuntimeParameter::Int(value)) => Some(*value),
            _ => None,
        }
    }

    /// Float parameter, `None` when absent or mistyped.
    pub fn float_param(&self, key: &str) -> Option<f32> {
        match self.params.get(key) {
            Some(RuntimeParameter::Float(value)) => Some(*value),
            _ => None,
        }
    }

    /// Boolean parameter, `None` when absent or mistyped.
    pub fn bool_param(&self, key: &str) -> Option<bool> {
        match self.params.get(key) {
            Some(RuntimeParameter::Bool(value)) => Some(*value),
            _ => None,
        }
    }

    /// String parameter, `None` when absent or mistyped.
    pub fn str_param(&self, key: &str) -> Option<&str> {
        match self.params.get(key) {
            Some(RuntimeParameter::Str(value)) => Some(value.as_str()),
            _ => None,
        }
    }

    /// Integer-array parameter, `None` when absent or mistyped.
    pub fn int_array_param(&self, key: &str) -> Option<&[i64]> {
        match self.params.get(key) {
            Some(RuntimeParameter::IntArray(values)) => Some(values.as_slice()),
            _ => None,
        }
    }

    /// Float-array parameter, `None` when absent or mistyped.
    pub fn float_array_param(&self, key: &str) -> Option<&[f32]> {
        match self.params.get(key) {
            Some(RuntimeParameter::FloatArray(values)) => Some(values.as_slice()),
            _ => None,
        }
    }

    /// Attribute blob, `None` when absent.
    pub fn attribute(&self, key: &str) -> Option<&RuntimeAttribute> {
        self.attributes.get(key)
    }
}
