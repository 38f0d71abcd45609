//! Data provider capability.
//!
//! A [`TreeDataProvider`] supplies root nodes when a tree is attached without
//! a dataset, and the children of a node when the control lazily loads it.

use async_trait::async_trait;
use thiserror::Error;

use crate::node::TreeNode;

/// Error returned by a data provider.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct ProviderError {
    /// Error message
    pub message: String,
}

impl ProviderError {
    /// Create a new provider error
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for ProviderError {
    fn from(err: std::io::Error) -> Self {
        Self::new(err.to_string())
    }
}

impl From<String> for ProviderError {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}

impl From<&str> for ProviderError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

/// Source of tree nodes.
///
/// Identifiers of the returned nodes must be unique within the tree.
/// Concurrent requests for the same node are not coalesced by the adapter;
/// implementations that care should deduplicate themselves.
///
/// # Example
///
/// ```ignore
/// struct Folders;
///
/// #[async_trait]
/// impl TreeDataProvider for Folders {
///     async fn root_tree_nodes(&self) -> Result<Vec<TreeNode>, ProviderError> {
///         Ok(vec![TreeNode::new("/", "root")])
///     }
///
///     async fn tree_nodes(&self, parent: &TreeNode) -> Result<Vec<TreeNode>, ProviderError> {
///         let entries = tokio::fs::read_dir(&parent.id).await?;
///         // ...
///     }
/// }
/// ```
#[async_trait]
pub trait TreeDataProvider: Send + Sync {
    /// Fetch the root nodes.
    async fn root_tree_nodes(&self) -> Result<Vec<TreeNode>, ProviderError>;

    /// Fetch the children of `parent`, in display order.
    async fn tree_nodes(&self, parent: &TreeNode) -> Result<Vec<TreeNode>, ProviderError>;
}
