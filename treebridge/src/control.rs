//! Capability interface of the wrapped tree control.
//!
//! The adapter never touches a control's internals. It creates the control
//! through a [`TreeControlFactory`], drives it through [`TreeControl`] and
//! observes it by subscribing native listeners. All methods take `&self`;
//! controls keep their state behind their own locks and must not hold them
//! while invoking listeners or the load source.

use std::sync::Arc;

use crate::event::{NativeEventKind, TreeEvent, TreeOptions};
use crate::node::{InsertLocation, NodeHandle, TreeNode};

/// Listener for native control events.
pub type NativeListener = Arc<dyn Fn(&TreeEvent) + Send + Sync>;

/// Identifies a native listener registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

impl ListenerId {
    /// Create an id from a raw control-specific value.
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }
}

/// The host element a tree is mounted on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostElement {
    selector: String,
}

impl HostElement {
    /// Wrap the element matched by `selector`.
    pub fn new(selector: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
        }
    }

    /// The selector the element was matched with.
    pub fn selector(&self) -> &str {
        &self.selector
    }
}

/// Imperative operations of a live tree control.
pub trait TreeControl: Send + Sync {
    /// Replace every root node.
    fn load_data(&self, nodes: Vec<TreeNode>);

    /// Insert a node at `location`.
    fn add_node(&self, node: &TreeNode, location: InsertLocation);

    /// Remove a node and its subtree.
    fn remove_node(&self, node: &TreeNode);

    /// Push the full state of a node.
    fn update_node(&self, node: &TreeNode);

    /// Move focus to a node.
    fn set_focus(&self, node: &TreeNode);

    /// Look up a loaded node by identifier.
    fn find_by_id(&self, id: &str) -> Option<TreeNode>;

    /// Open a closed node or close an open one.
    fn toggle_node(&self, handle: NodeHandle);

    /// Select a node, optionally focusing it.
    fn set_selected_node(&self, handle: NodeHandle, focus: bool);

    /// Open every loaded node that has children.
    fn expand_all(&self);

    /// Close every node.
    fn collapse_all(&self);

    /// Tear the control down.
    fn destroy(&self);

    /// Register a native event listener.
    fn subscribe(&self, kind: NativeEventKind, listener: NativeListener) -> ListenerId;

    /// Remove a native event listener.
    fn unsubscribe(&self, id: ListenerId);
}

/// Creates tree controls on host elements.
pub trait TreeControlFactory {
    /// Initialise a control on `host`.
    fn create(&self, host: &HostElement, options: TreeOptions) -> Arc<dyn TreeControl>;
}
