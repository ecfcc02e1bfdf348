//! Action Registry
//!
//! Factory-backed implementation of the `ActionRunner` port: the application
//! author registers a constructor per action identifier, and the orchestrator
//! materializes a fresh instance for each pipeline step.

use std::collections::HashMap;

use bootgate_core::ActionId;
use bootgate_ports::{ActionRunner, BootstrapAction, ConstructionError};

type ActionFactory = Box<dyn Fn() -> anyhow::Result<Box<dyn BootstrapAction>> + Send + Sync>;

/// Registry of startup action factories.
#[derive(Default)]
pub struct ActionRegistry {
    factories: HashMap<ActionId, ActionFactory>,
}

impl ActionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a factory for `id`, replacing any previous registration.
    ///
    /// Pipeline-level uniqueness is enforced by the pipeline builder, not
    /// here; registering more actions than a pipeline uses is fine.
    pub fn register<F>(&mut self, id: impl Into<ActionId>, factory: F) -> &mut Self
    where
        F: Fn() -> anyhow::Result<Box<dyn BootstrapAction>> + Send + Sync + 'static,
    {
        self.factories.insert(id.into(), Box::new(factory));
        self
    }

    pub fn contains(&self, id: &ActionId) -> bool {
        self.factories.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

impl ActionRunner for ActionRegistry {
    fn materialize(&self, id: &ActionId) -> Result<Box<dyn BootstrapAction>, ConstructionError> {
        let factory = self
            .factories
            .get(id)
            .ok_or_else(|| ConstructionError::UnknownAction(id.clone()))?;

        factory().map_err(|source| ConstructionError::Factory {
            id: id.clone(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use tokio_util::sync::CancellationToken;

    struct NoopAction;

    #[async_trait]
    impl BootstrapAction for NoopAction {
        fn name(&self) -> &str {
            "Noop"
        }

        async fn invoke(&self, _shutdown: CancellationToken) -> anyhow::Result<bool> {
            Ok(true)
        }
    }

    #[test]
    fn test_materialize_registered_action() {
        let mut registry = ActionRegistry::new();
        registry.register("noop", || Ok(Box::new(NoopAction)));

        let action = registry.materialize(&ActionId::new("noop")).unwrap();
        assert_eq!(action.name(), "Noop");
    }

    #[test]
    fn test_unknown_action_is_a_construction_error() {
        let registry = ActionRegistry::new();
        let result = registry.materialize(&ActionId::new("missing"));

        assert!(matches!(
            result.err().unwrap(),
            ConstructionError::UnknownAction(id) if id.as_str() == "missing"
        ));
    }

    #[test]
    fn test_factory_failure_is_a_construction_error() {
        let mut registry = ActionRegistry::new();
        registry.register("broken", || Err(anyhow::anyhow!("missing credentials")));

        let result = registry.materialize(&ActionId::new("broken"));
        assert!(matches!(
            result.err().unwrap(),
            ConstructionError::Factory { id, .. } if id.as_str() == "broken"
        ));
    }

    #[test]
    fn test_register_replaces_previous_factory() {
        let mut registry = ActionRegistry::new();
        registry.register("noop", || Err(anyhow::anyhow!("old factory")));
        registry.register("noop", || Ok(Box::new(NoopAction)));

        assert_eq!(registry.len(), 1);
        assert!(registry.materialize(&ActionId::new("noop")).is_ok());
    }
}
