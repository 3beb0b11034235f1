//! Explicit operator-name to layer-factory registry
//!
//! Materialization is a plain lookup in a value you construct and own;
//! there is no global table and no registration at static-init time.
//! [`LayerRegistry::with_builtins`] seeds the four shipped operators, and
//! [`LayerRegistry::register`] adds or replaces factories at runtime.

use std::collections::HashMap;

use tracing::debug;

use crate::error::MaterializeError;
use crate::layer::Layer;
use crate::layers::{ConvolutionLayer, MaxPoolingLayer, ReluLayer, UpsampleLayer};
use crate::runtime::RuntimeOperator;

/// Builds a boxed layer from a parsed graph node.
pub type LayerFactory = fn(&RuntimeOperator) -> Result<Box<dyn Layer>, MaterializeError>;

/// Maps operator type names to layer factories.
///
/// # Examples
///
/// ```
/// use inferso_nn::{LayerRegistry, RuntimeOperator};
///
/// let registry = LayerRegistry::with_builtins();
/// let layer = registry
///     .materialize(&RuntimeOperator::new("relu1", "nn.ReLU"))
///     .unwrap();
/// assert_eq!(layer.layer_type(), "nn.ReLU");
///
/// // Unregistered type names are recoverable errors
/// let missing = registry.materialize(&RuntimeOperator::new("x", "nn.Sigmoid"));
/// assert!(missing.is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct LayerRegistry {
    factories: HashMap<String, LayerFactory>,
}

impl LayerRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry seeded with the built-in operators: `nn.Conv2d`,
    /// `nn.MaxPool2d`, `nn.ReLU` and `nn.Upsample`.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register("nn.Conv2d", ConvolutionLayer::materialize);
        registry.register("nn.MaxPool2d", MaxPoolingLayer::materialize);
        registry.register("nn.ReLU", ReluLayer::materialize);
        registry.register("nn.Upsample", UpsampleLayer::materialize);
        registry
    }

    /// Register a factory for an operator type name, replacing any
    /// previous one.
    pub fn register(&mut self, type_name: impl Into<String>, factory: LayerFactory) {
        let type_name = type_name.into();
        let replaced = self.factories.insert(type_name.clone(), factory).is_some();
        debug!(operator = type_name.as_str(), replaced, "registered layer factory");
    }

    /// Materialize a layer for a parsed graph node.
    ///
    /// # Errors
    ///
    /// Returns [`MaterializeError::UnknownOperator`] when no factory is
    /// registered for `op.type_name`, or the factory's own error when the
    /// node's fields are missing or mistyped.
    pub fn materialize(&self, op: &RuntimeOperator) -> Result<Box<dyn Layer>, MaterializeError> {
        let factory = self
            .factories
            .get(op.type_name.as_str())
            .ok_or_else(|| MaterializeError::UnknownOperator(op.type_name.clone()))?;
        factory(op)
    }

    /// Whether a factory is registered for this type name.
    pub fn contains(&self, type_name: &str) -> bool {
        self.factories.contains_key(type_name)
    }

    /// Registered type names, sorted for stable output.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Number of registered factories.
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    /// `true` when no factories are registered.
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ForwardError;
    use crate::runtime::RuntimeParameter;
    use inferso_core::Tensor;

    #[test]
    fn test_new_is_empty() {
        let registry = LayerRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.len(), 0);
        assert!(!registry.contains("nn.Conv2d"));
    }

    #[test]
    fn test_builtins_cover_the_shipped_operators() {
        let registry = LayerRegistry::with_builtins();
        assert_eq!(
            registry.names(),
            vec!["nn.Conv2d", "nn.MaxPool2d", "nn.ReLU", "nn.Upsample"]
        );
    }

    #[test]
    fn test_materialize_dispatches_on_type_name() {
        let registry = LayerRegistry::with_builtins();
        let layer = registry
            .materialize(&RuntimeOperator::new("relu1", "nn.ReLU"))
            .unwrap();
        assert_eq!(layer.name(), "relu1");
        assert_eq!(layer.layer_type(), "nn.ReLU");
    }

    #[test]
    fn test_unknown_operator_names_the_type() {
        let registry = LayerRegistry::with_builtins();
        let err = registry
            .materialize(&RuntimeOperator::new("x", "nn.BatchNorm2d"))
            .unwrap_err();
        assert_eq!(
            err,
            MaterializeError::UnknownOperator("nn.BatchNorm2d".into())
        );
    }

    #[test]
    fn test_factory_errors_pass_through() {
        // A conv node with no parameters fails in the factory, not the
        // lookup
        let registry = LayerRegistry::with_builtins();
        let err = registry
            .materialize(&RuntimeOperator::new("conv1", "nn.Conv2d"))
            .unwrap_err();
        assert_eq!(err, MaterializeError::MissingInChannels);
    }

    #[test]
    fn test_register_custom_factory() {
        fn always_relu(op: &RuntimeOperator) -> Result<Box<dyn Layer>, MaterializeError> {
            Ok(Box::new(ReluLayer::new().with_name(op.name.as_str())))
        }

        let mut registry = LayerRegistry::new();
        registry.register("custom.Activation", always_relu);
        assert!(registry.contains("custom.Activation"));

        let layer = registry
            .materialize(&RuntimeOperator::new("act", "custom.Activation"))
            .unwrap();
        assert_eq!(layer.name(), "act");
    }

    #[test]
    fn test_register_replaces_existing_factory() {
        fn upsample_instead(op: &RuntimeOperator) -> Result<Box<dyn Layer>, MaterializeError> {
            Ok(Box::new(UpsampleLayer::new((2, 2)).with_name(op.name.as_str())))
        }

        let mut registry = LayerRegistry::with_builtins();
        registry.register("nn.ReLU", upsample_instead);
        assert_eq!(registry.len(), 4);

        let layer = registry
            .materialize(&RuntimeOperator::new("r", "nn.ReLU"))
            .unwrap();
        assert_eq!(layer.layer_type(), "nn.Upsample");
    }

    #[test]
    fn test_materialized_layer_runs_forward() {
        let registry = LayerRegistry::with_builtins();
        let op = RuntimeOperator::new("up1", "nn.Upsample")
            .with_param("scale_factor", RuntimeParameter::FloatArray(vec![2.0, 2.0]))
            .with_param("mode", RuntimeParameter::Str("nearest".into()));
        let layer = registry.materialize(&op).unwrap();

        let inputs = vec![Tensor::ones((1, 2, 2))];
        let mut outputs = vec![Tensor::default()];
        assert_eq!(layer.forward(&inputs, &mut outputs), Ok(()));
        assert_eq!(outputs[0].shape(), (1, 4, 4));
    }

    #[test]
    fn test_recoverable_errors_do_not_panic() {
        // One registry, every recoverable failure mode in sequence
        let registry = LayerRegistry::with_builtins();
        let layer = registry
            .materialize(&RuntimeOperator::new("relu1", "nn.ReLU"))
            .unwrap();

        assert_eq!(layer.forward(&[], &mut []), Err(ForwardError::InputEmpty));

        let inputs = vec![Tensor::ones((1, 2, 2))];
        let mut outputs = vec![];
        assert!(matches!(
            layer.forward(&inputs, &mut outputs),
            Err(ForwardError::SizeMismatch { .. })
        ));
    }
}
