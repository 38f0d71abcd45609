//! Adapter configuration.

use std::sync::{Arc, RwLock};

use tokio_util::task::TaskTracker;

use crate::error::TreeError;
use crate::kind::TreeKind;
use crate::node::TreeNode;
use crate::provider::TreeDataProvider;

use super::{AdapterInner, TreeAdapter, TreeId, TreeOutputs};

/// Builder for [`TreeAdapter`].
///
/// # Example
///
/// ```
/// use treebridge::{TreeAdapter, TreeKind, TreeNode};
///
/// let tree = TreeAdapter::builder()
///     .with_kind(TreeKind::ContentOnly)
///     .with_dataset(vec![TreeNode::leaf("a", "A")])
///     .build();
/// assert_eq!(tree.kind(), TreeKind::ContentOnly);
/// ```
#[derive(Default)]
pub struct TreeAdapterBuilder {
    kind: TreeKind,
    dataset: Option<Vec<TreeNode>>,
    provider: Option<Arc<dyn TreeDataProvider>>,
    disabled: bool,
}

impl TreeAdapterBuilder {
    /// Creates a builder with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the tree kind.
    pub fn with_kind(mut self, kind: TreeKind) -> Self {
        self.kind = kind;
        self
    }

    /// Sets the tree kind from its input spelling.
    ///
    /// An absent or empty value resolves to [`TreeKind::Auto`].
    pub fn with_kind_input(mut self, value: Option<&str>) -> Result<Self, TreeError> {
        self.kind = TreeKind::parse(value)?;
        Ok(self)
    }

    /// Sets the initial root nodes.
    pub fn with_dataset(mut self, dataset: Vec<TreeNode>) -> Self {
        self.dataset = Some(dataset);
        self
    }

    /// Sets the data provider.
    pub fn with_provider(self, provider: impl TreeDataProvider + 'static) -> Self {
        self.with_shared_provider(Arc::new(provider))
    }

    /// Sets a data provider shared with other owners.
    pub fn with_shared_provider(mut self, provider: Arc<dyn TreeDataProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Sets the initial host-level disabled flag.
    pub fn with_disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// Creates the adapter, unattached.
    pub fn build(self) -> TreeAdapter {
        TreeAdapter {
            id: TreeId::new(),
            inner: Arc::new(RwLock::new(AdapterInner::new(
                self.kind,
                self.dataset,
                self.disabled,
            ))),
            provider: self.provider,
            outputs: TreeOutputs::default(),
            tasks: TaskTracker::new(),
            settling: tokio::sync::Mutex::new(()),
        }
    }
}

/// Attributes a host element carries while it hosts a tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostBindings {
    /// CSS class of the host.
    pub class: &'static str,
    /// ARIA role of the host.
    pub role: &'static str,
    /// Whether the `is-disabled` class is set.
    pub disabled: bool,
}

impl HostBindings {
    pub(super) fn new(disabled: bool) -> Self {
        Self {
            class: "tree",
            role: "tree",
            disabled,
        }
    }

    /// Every class the host should carry.
    pub fn classes(&self) -> Vec<&'static str> {
        let mut classes = vec![self.class];
        if self.disabled {
            classes.push("is-disabled");
        }
        classes
    }
}
