//! Startup Pipeline Definition
//!
//! This module contains the action identifier value object, the pipeline
//! capability trait, and the builder that enforces identifier uniqueness.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Action identifier - Value Object
///
/// An opaque, comparable token naming one pipeline step. Uniqueness is
/// enforced when the pipeline is built, not when the action runs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActionId(String);

impl ActionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ActionId {
    fn from(s: &str) -> Self {
        ActionId::new(s)
    }
}

impl From<String> for ActionId {
    fn from(s: String) -> Self {
        ActionId::new(s)
    }
}

impl std::fmt::Display for ActionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Errors raised while assembling a pipeline.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum PipelineBuildError {
    #[error("startup action '{0}' is already added to the pipeline")]
    DuplicateAction(ActionId),
}

/// Capability trait producing the ordered action sequence to execute.
///
/// The default list-based pipeline covers most applications; implement this
/// trait directly to generate a different ordering per environment.
pub trait StartupPipeline: Send + Sync {
    fn actions(&self) -> Vec<ActionId>;
}

/// Default startup pipeline: executes exactly the actions it was built with,
/// in insertion order.
#[derive(Debug, Clone)]
pub struct DefaultPipeline {
    actions: Vec<ActionId>,
}

impl DefaultPipeline {
    /// Builds a pipeline from an identifier sequence, rejecting duplicates.
    pub fn from_actions(
        actions: impl IntoIterator<Item = ActionId>,
    ) -> Result<Self, PipelineBuildError> {
        let mut builder = PipelineBuilder::new();
        for id in actions {
            builder.use_action(id)?;
        }
        Ok(builder.build())
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

impl StartupPipeline for DefaultPipeline {
    fn actions(&self) -> Vec<ActionId> {
        self.actions.clone()
    }
}

/// Startup pipeline builder.
///
/// `build()` consumes the builder, so the sequence is frozen once built.
#[derive(Debug, Default)]
pub struct PipelineBuilder {
    actions: Vec<ActionId>,
}

impl PipelineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an action identifier to the pipeline.
    ///
    /// Fails if the identifier was already added; identifiers are compared by
    /// equality, not by the display name of the action they resolve to. A
    /// rejected identifier leaves the builder untouched.
    pub fn use_action(
        &mut self,
        id: impl Into<ActionId>,
    ) -> Result<&mut Self, PipelineBuildError> {
        let id = id.into();
        if self.actions.contains(&id) {
            return Err(PipelineBuildError::DuplicateAction(id));
        }
        self.actions.push(id);
        Ok(self)
    }

    /// Freezes the sequence into an immutable pipeline.
    pub fn build(self) -> DefaultPipeline {
        DefaultPipeline {
            actions: self.actions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_preserves_insertion_order() {
        let mut builder = PipelineBuilder::new();
        builder
            .use_action("migrate-database")
            .unwrap()
            .use_action("warm-caches")
            .unwrap()
            .use_action("register-webhooks")
            .unwrap();
        let pipeline = builder.build();

        let actions: Vec<String> = pipeline
            .actions()
            .iter()
            .map(|id| id.as_str().to_string())
            .collect();
        assert_eq!(
            actions,
            vec!["migrate-database", "warm-caches", "register-webhooks"]
        );
    }

    #[test]
    fn test_duplicate_action_is_rejected() {
        let mut builder = PipelineBuilder::new();
        builder.use_action("migrate-database").unwrap();

        let result = builder.use_action("migrate-database");
        assert_eq!(
            result.unwrap_err(),
            PipelineBuildError::DuplicateAction(ActionId::new("migrate-database"))
        );

        // The rejection leaves the builder with the first occurrence intact.
        builder.use_action("warm-caches").unwrap();
        let actions = builder.build().actions();
        assert_eq!(
            actions,
            vec![ActionId::new("migrate-database"), ActionId::new("warm-caches")]
        );
    }

    #[test]
    fn test_from_actions_rejects_duplicates() {
        let result = DefaultPipeline::from_actions([
            ActionId::new("a"),
            ActionId::new("b"),
            ActionId::new("a"),
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_pipeline_is_allowed() {
        let pipeline = PipelineBuilder::new().build();
        assert!(pipeline.is_empty());
        assert!(pipeline.actions().is_empty());
    }

    #[test]
    fn test_action_id_display() {
        let id = ActionId::new("warm-caches");
        assert_eq!(id.to_string(), "warm-caches");
        assert_eq!(id.as_str(), "warm-caches");
    }
}
