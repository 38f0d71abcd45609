//! Error types for the tree adapter.

use std::any::Any;

use crate::adapter::{Phase, TreeId};
use crate::event::NativeEventKind;
use crate::provider::ProviderError;

/// Errors returned by adapter operations.
#[derive(Debug, Clone, thiserror::Error)]
pub enum TreeError {
    /// A required value was absent.
    #[error("'{0}' must not be null")]
    NullArgument(&'static str),

    /// A required string was empty.
    #[error("'{0}' must not be empty")]
    EmptyArgument(&'static str),

    /// An input value is not one of the accepted values.
    #[error("'{value}' is not valid, it must be one of {valid}.")]
    InvalidConfiguration {
        /// The rejected value.
        value: String,
        /// The accepted values, comma separated.
        valid: String,
    },

    /// The operation needs a live tree control.
    #[error("tree is not attached")]
    NotAttached,

    /// A native event arrived without the node it refers to.
    #[error("{0} event carried no tree node")]
    InvalidEventPayload(NativeEventKind),

    /// A lifecycle transition was requested from the wrong state.
    #[error("cannot {operation} a tree in the {phase} state")]
    LifecycleViolation {
        /// State the adapter was in.
        phase: Phase,
        /// The rejected transition.
        operation: &'static str,
    },

    /// A data provider is configured but no tokio runtime is running.
    #[error("attaching a tree with a data provider requires a tokio runtime")]
    NoRuntime,

    /// The data provider failed.
    #[error("data provider failed: {0}")]
    Provider(#[from] ProviderError),
}

/// Error information passed to the adapter's error output.
///
/// These are failures that happen away from any caller, inside native
/// callbacks or spawned provider tasks, so they cannot be returned.
#[derive(Debug, Clone)]
pub struct AdapterError {
    /// The adapter that hit the error.
    pub tree_id: TreeId,
    /// Error details.
    pub kind: AdapterErrorKind,
}

/// The kind of adapter error that occurred.
#[derive(Debug, Clone)]
pub enum AdapterErrorKind {
    /// A provider request failed.
    ProviderFailure {
        /// Node whose children were requested; `None` for the root fetch.
        node_id: Option<String>,
        /// The provider's error.
        error: ProviderError,
    },
    /// A native event arrived without its node.
    InvalidPayload {
        /// The event that was malformed.
        event: NativeEventKind,
    },
    /// A spawned provider task panicked.
    TaskPanic {
        /// Panic message extracted from the panic payload.
        message: String,
    },
}

impl std::fmt::Display for AdapterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.kind {
            AdapterErrorKind::ProviderFailure {
                node_id: Some(node_id),
                error,
            } => write!(
                f,
                "Tree '{}' failed to load children of '{}': {}",
                self.tree_id, node_id, error
            ),
            AdapterErrorKind::ProviderFailure {
                node_id: None,
                error,
            } => write!(
                f,
                "Tree '{}' failed to load root nodes: {}",
                self.tree_id, error
            ),
            AdapterErrorKind::InvalidPayload { event } => write!(
                f,
                "Tree '{}' received a {} event with no tree node",
                self.tree_id, event
            ),
            AdapterErrorKind::TaskPanic { message } => {
                write!(f, "Tree '{}' task panicked: {}", self.tree_id, message)
            }
        }
    }
}

impl std::error::Error for AdapterError {}

/// Extract a human-readable message from a panic payload.
///
/// Panics can contain either `&str` or `String` payloads. This function
/// attempts to extract either, falling back to a generic message.
pub fn extract_panic_message(panic: &Box<dyn Any + Send>) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}
