//! Imperative operations on the live control.
//!
//! Arguments are checked before anything else, then attachment. A call that
//! fails has not touched the control.

use crate::argument::{check_not_empty, check_present};
use crate::error::TreeError;
use crate::node::{InsertLocation, TreeNode};

use super::TreeAdapter;
use super::builder::HostBindings;

impl TreeAdapter {
    /// Move focus to `node`.
    pub fn set_focus(&self, node: &TreeNode) -> Result<(), TreeError> {
        self.control()?.set_focus(node);
        Ok(())
    }

    /// Mark `node` disabled and push it to the control.
    pub fn disable_node(&self, node: &mut TreeNode) -> Result<(), TreeError> {
        self.set_node_disabled(node, true)
    }

    /// Mark `node` enabled and push it to the control.
    pub fn enable_node(&self, node: &mut TreeNode) -> Result<(), TreeError> {
        self.set_node_disabled(node, false)
    }

    fn set_node_disabled(&self, node: &mut TreeNode, disabled: bool) -> Result<(), TreeError> {
        let control = self.control()?;
        node.disabled = disabled;
        control.update_node(node);
        Ok(())
    }

    /// Push the full state of `node` to the control.
    pub fn update_node(&self, node: &TreeNode) -> Result<(), TreeError> {
        self.control()?.update_node(node);
        Ok(())
    }

    /// Expands all the loaded tree nodes.
    ///
    /// Nodes whose children were never loaded stay closed; this does not
    /// trigger lazy loading.
    pub fn expand_all(&self) -> Result<(), TreeError> {
        self.control()?.expand_all();
        Ok(())
    }

    /// Collapse all the tree nodes.
    pub fn collapse_all(&self) -> Result<(), TreeError> {
        self.control()?.collapse_all();
        Ok(())
    }

    /// Remove `node` from the control. Does nothing when not attached.
    pub fn remove_node(&self, node: &TreeNode) {
        if let Ok(control) = self.control() {
            control.remove_node(node);
        }
    }

    /// Select the node with the given id.
    ///
    /// When `focus` is set and the node is closed, it is opened first. An
    /// unknown id is ignored.
    pub fn set_selected_node(&self, id: &str, focus: bool) -> Result<(), TreeError> {
        let id = check_not_empty("id", id)?;
        let control = self.control()?;

        let Some(found) = control.find_by_id(id) else {
            log::debug!("{}: no node '{}' to select", self.id, id);
            return Ok(());
        };
        let Some(handle) = found.node else {
            log::warn!("{}: node '{}' has no native handle", self.id, id);
            return Ok(());
        };
        if !found.open && focus {
            control.toggle_node(handle);
        }
        control.set_selected_node(handle, focus);
        Ok(())
    }

    /// Add `node` at `location`.
    pub fn add_node(&self, node: &TreeNode, location: InsertLocation) -> Result<(), TreeError> {
        self.control()?.add_node(node, location);
        Ok(())
    }

    /// Find the tree node for the given identifier.
    pub fn find_by_id(&self, id: &str) -> Result<Option<TreeNode>, TreeError> {
        let id = check_not_empty("id", id)?;
        Ok(self.control()?.find_by_id(id))
    }

    /// Toggles open/closed state of the given tree node.
    ///
    /// The node must carry its native handle, i.e. it must have come from
    /// the control (e.g. via [`find_by_id`](Self::find_by_id) or an output).
    pub fn toggle_node(&self, node: &TreeNode) -> Result<(), TreeError> {
        let handle = check_present("node.node", node.node)?;
        self.control()?.toggle_node(handle);
        Ok(())
    }

    /// Clear the host-level disabled flag.
    pub fn enable(&self) {
        self.write().disabled = false;
    }

    /// Set the host-level disabled flag.
    pub fn disable(&self) {
        self.write().disabled = true;
    }

    /// Whether the host-level disabled flag is set.
    pub fn is_disabled(&self) -> bool {
        self.read().disabled
    }

    /// Attributes the host element should carry.
    pub fn host_bindings(&self) -> HostBindings {
        HostBindings::new(self.is_disabled())
    }
}
