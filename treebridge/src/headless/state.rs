//! Node storage for the headless tree.

use std::collections::HashSet;

use crate::control::{ListenerId, NativeListener};
use crate::event::{LoadSource, NativeEventKind, TreeEvent};
use crate::node::{NodeHandle, TreeNode};

/// Internal state for the headless tree.
#[derive(Default)]
pub(super) struct HeadlessInner {
    /// Root nodes.
    pub roots: Vec<TreeNode>,
    /// Lazy-load callback from the creation options.
    pub source: Option<LoadSource>,
    /// Node with focus.
    pub focused: Option<NodeHandle>,
    /// Nodes with an unanswered load request.
    pub pending: HashSet<NodeHandle>,
    /// Registered native listeners.
    pub listeners: Vec<(ListenerId, NativeEventKind, NativeListener)>,
    /// Set once `destroy` ran; every operation is ignored afterwards.
    pub destroyed: bool,
    next_handle: u64,
    next_listener: u64,
}

/// What a toggle should do once the state lock is released.
pub(super) enum ToggleOutcome {
    /// Nothing to report.
    None,
    /// Raise this event.
    Event(NativeEventKind, TreeEvent),
    /// Ask the source for the children of this node.
    Load(LoadSource, TreeNode),
}

impl HeadlessInner {
    pub fn with_source(source: Option<LoadSource>) -> Self {
        Self {
            source,
            ..Default::default()
        }
    }

    pub fn next_listener_id(&mut self) -> ListenerId {
        self.next_listener += 1;
        ListenerId::from_raw(self.next_listener)
    }

    /// Give `node` and its subtree fresh handles.
    pub fn mint_handles(&mut self, node: &mut TreeNode) {
        self.next_handle += 1;
        node.node = Some(NodeHandle::from_raw(self.next_handle));
        if let Some(children) = node.children.as_mut() {
            for child in children {
                self.mint_handles(child);
            }
        }
    }

    /// Listeners registered for `kind`, in registration order.
    pub fn listeners_for(&self, kind: NativeEventKind) -> Vec<NativeListener> {
        self.listeners
            .iter()
            .filter(|(_, k, _)| *k == kind)
            .map(|(_, _, l)| l.clone())
            .collect()
    }

    /// Find a node by ID in the entire tree (including collapsed).
    pub fn find_by_id(&self, id: &str) -> Option<&TreeNode> {
        find_in_items(&self.roots, &|n| n.id == id)
    }

    pub fn find_by_handle(&self, handle: NodeHandle) -> Option<&TreeNode> {
        find_in_items(&self.roots, &|n| n.node == Some(handle))
    }

    pub fn find_by_handle_mut(&mut self, handle: NodeHandle) -> Option<&mut TreeNode> {
        find_in_items_mut(&mut self.roots, &|n| n.node == Some(handle))
    }

    /// Resolve the stored node `node` refers to, by handle or else by id.
    pub fn resolve_mut(&mut self, node: &TreeNode) -> Option<&mut TreeNode> {
        match node.node {
            Some(handle) => self.find_by_handle_mut(handle),
            None => find_in_items_mut(&mut self.roots, &|n| n.id == node.id),
        }
    }

    /// Remove the node `node` refers to, with its subtree.
    pub fn remove(&mut self, node: &TreeNode) -> bool {
        let removed = match node.node {
            Some(handle) => remove_from_items(&mut self.roots, &|n| n.node == Some(handle)),
            None => remove_from_items(&mut self.roots, &|n| n.id == node.id),
        };
        if let Some(removed) = &removed {
            let mut gone = Vec::new();
            collect_handles(std::slice::from_ref(removed), &mut gone);
            for handle in gone {
                self.pending.remove(&handle);
                if self.focused == Some(handle) {
                    self.focused = None;
                }
            }
        }
        removed.is_some()
    }

    /// Open or close a node.
    pub fn toggle(&mut self, handle: NodeHandle) -> ToggleOutcome {
        let source = self.source.clone();
        let already_pending = self.pending.contains(&handle);
        let Some(node) = self.find_by_handle_mut(handle) else {
            return ToggleOutcome::None;
        };

        if node.open {
            node.open = false;
            return ToggleOutcome::Event(NativeEventKind::Collapse, TreeEvent::new(node.clone()));
        }

        let loaded = node.children.is_some();
        match source {
            Some(source) if !loaded => {
                if already_pending {
                    return ToggleOutcome::None;
                }
                let request = node.clone();
                self.pending.insert(handle);
                ToggleOutcome::Load(source, request)
            }
            _ => {
                node.open = true;
                ToggleOutcome::Event(NativeEventKind::Expand, TreeEvent::new(node.clone()))
            }
        }
    }

    /// Store the children a load request was answered with and open the node.
    pub fn finish_load(&mut self, handle: NodeHandle, mut children: Vec<TreeNode>) -> Option<TreeEvent> {
        if !self.pending.remove(&handle) {
            return None;
        }
        for child in children.iter_mut() {
            self.mint_handles(child);
        }
        let node = self.find_by_handle_mut(handle)?;
        node.children = Some(children);
        node.open = true;
        Some(TreeEvent::new(node.clone()))
    }

    /// Forget a load request that will never be answered.
    pub fn abandon_load(&mut self, handle: NodeHandle) -> bool {
        self.pending.remove(&handle)
    }

    /// Select one node, clearing any previous selection.
    pub fn select(&mut self, handle: NodeHandle, focus: bool) -> Option<TreeEvent> {
        self.find_by_handle(handle)?;
        for_each_mut(&mut self.roots, &mut |n| n.selected = n.node == Some(handle));
        if focus {
            self.focused = Some(handle);
        }
        self.find_by_handle(handle).cloned().map(TreeEvent::new)
    }

    /// Open every loaded node with children.
    pub fn expand_all(&mut self) {
        for_each_mut(&mut self.roots, &mut |n| {
            if n.has_children() {
                n.open = true;
            }
        });
    }

    /// Close all nodes.
    pub fn collapse_all(&mut self) {
        for_each_mut(&mut self.roots, &mut |n| n.open = false);
    }
}

/// Recursively search for a node.
fn find_in_items<'a>(items: &'a [TreeNode], matches: &dyn Fn(&TreeNode) -> bool) -> Option<&'a TreeNode> {
    for item in items {
        if matches(item) {
            return Some(item);
        }
        if let Some(children) = &item.children
            && let Some(found) = find_in_items(children, matches)
        {
            return Some(found);
        }
    }
    None
}

fn find_in_items_mut<'a>(
    items: &'a mut [TreeNode],
    matches: &dyn Fn(&TreeNode) -> bool,
) -> Option<&'a mut TreeNode> {
    for item in items {
        if matches(item) {
            return Some(item);
        }
        if let Some(children) = item.children.as_mut()
            && let Some(found) = find_in_items_mut(children, matches)
        {
            return Some(found);
        }
    }
    None
}

fn remove_from_items(items: &mut Vec<TreeNode>, matches: &dyn Fn(&TreeNode) -> bool) -> Option<TreeNode> {
    if let Some(index) = items.iter().position(|n| matches(n)) {
        return Some(items.remove(index));
    }
    items
        .iter_mut()
        .filter_map(|item| item.children.as_mut())
        .find_map(|children| remove_from_items(children, matches))
}

fn for_each_mut(items: &mut [TreeNode], f: &mut dyn FnMut(&mut TreeNode)) {
    for item in items {
        f(item);
        if let Some(children) = item.children.as_mut() {
            for_each_mut(children, f);
        }
    }
}

fn collect_handles(items: &[TreeNode], out: &mut Vec<NodeHandle>) {
    for item in items {
        out.extend(item.node);
        if let Some(children) = &item.children {
            collect_handles(children, out);
        }
    }
}
