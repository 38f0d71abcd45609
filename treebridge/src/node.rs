//! Tree node data model.

use serde::{Deserialize, Serialize};

/// Opaque reference to a node owned by the tree control.
///
/// Handles are minted by the control when a node is loaded or added. The
/// adapter stores and passes them back but never owns what they point to;
/// a handle is only meaningful to the control that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeHandle(u64);

impl NodeHandle {
    /// Create a handle from a raw control-specific value.
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Get the raw control-specific value.
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for NodeHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One entry of a tree.
///
/// `children` distinguishes "not loaded yet" (`None`) from "loaded and
/// empty" (`Some(vec![])`). Only the former triggers a lazy load when the
/// node is opened.
///
/// Identifiers must be unique within a tree for [`find_by_id`] lookups to be
/// well defined. This is a contract on whoever supplies the nodes; it is not
/// checked.
///
/// [`find_by_id`]: crate::TreeAdapter::find_by_id
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TreeNode {
    /// Unique identifier within the tree.
    pub id: String,
    /// Display label.
    #[serde(default)]
    pub text: String,
    /// Link to the control's native node, if the node has been loaded.
    #[serde(skip)]
    pub node: Option<NodeHandle>,
    /// Whether the node is expanded.
    #[serde(default)]
    pub open: bool,
    /// Whether the node is disabled.
    #[serde(default)]
    pub disabled: bool,
    /// Whether the node is selected.
    #[serde(default)]
    pub selected: bool,
    /// Child nodes; `None` until loaded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<TreeNode>>,
}

impl TreeNode {
    /// Create a node with the given id and label.
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            ..Default::default()
        }
    }

    /// Create a loaded leaf (no children to fetch).
    pub fn leaf(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            children: Some(Vec::new()),
            ..Self::new(id, text)
        }
    }

    /// Set the children, marking them as loaded.
    pub fn with_children(mut self, children: Vec<TreeNode>) -> Self {
        self.children = Some(children);
        self
    }

    /// Set the open flag.
    pub fn with_open(mut self, open: bool) -> Self {
        self.open = open;
        self
    }

    /// Set the disabled flag.
    pub fn with_disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// Whether children have been loaded.
    pub fn is_loaded(&self) -> bool {
        self.children.is_some()
    }

    /// Whether the node has at least one loaded child.
    pub fn has_children(&self) -> bool {
        self.children.as_ref().is_some_and(|c| !c.is_empty())
    }
}

/// Where [`add_node`](crate::TreeAdapter::add_node) places a new node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InsertLocation {
    /// Before the first root node.
    Top,
    /// After the last root node.
    #[default]
    Bottom,
    /// As the last child of the given node.
    Under(NodeHandle),
}
