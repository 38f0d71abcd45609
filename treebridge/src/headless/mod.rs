//! In-memory tree control.
//!
//! [`HeadlessTree`] implements [`TreeControl`] without any rendering. It
//! keeps the node hierarchy, open/selected/focus state and pending load
//! requests, and raises the same native events a visual tree would. It is
//! useful for driving a [`TreeAdapter`](crate::TreeAdapter) in tests, tools
//! and servers that mirror a tree shown elsewhere.
//!
//! User interaction is simulated with [`HeadlessTree::click_toggle`] and
//! [`HeadlessTree::click_select`].
//!
//! # Example
//!
//! ```
//! use treebridge::headless::HeadlessTreeFactory;
//! use treebridge::{HostElement, TreeAdapter, TreeNode};
//!
//! let factory = HeadlessTreeFactory::new();
//! let tree = TreeAdapter::builder()
//!     .with_dataset(vec![TreeNode::new("r", "Root").with_children(vec![TreeNode::leaf("a", "A")])])
//!     .build();
//! tree.attach(HostElement::new("ul#tree"), &factory).unwrap();
//!
//! let control = factory.last_created().unwrap();
//! control.click_toggle("r");
//! assert!(tree.find_by_id("r").unwrap().unwrap().open);
//! ```

mod state;

use std::sync::{Arc, Mutex, PoisonError, RwLock, RwLockWriteGuard, Weak};

use crate::control::{HostElement, ListenerId, NativeListener, TreeControl, TreeControlFactory};
use crate::event::{LoadResponse, NativeEventKind, TreeEvent, TreeOptions};
use crate::node::{InsertLocation, NodeHandle, TreeNode};

use state::{HeadlessInner, ToggleOutcome};

/// A tree control that lives entirely in memory.
///
/// Clones share the same tree. State is only locked while it is read or
/// changed; listeners and the load source run with no lock held.
#[derive(Clone)]
pub struct HeadlessTree {
    inner: Arc<RwLock<HeadlessInner>>,
}

impl HeadlessTree {
    /// Create a tree from creation options.
    pub fn new(options: TreeOptions) -> Self {
        let tree = Self {
            inner: Arc::new(RwLock::new(HeadlessInner::with_source(options.source))),
        };
        if let Some(dataset) = options.dataset {
            tree.load_data(dataset);
        }
        tree
    }

    fn write(&self) -> RwLockWriteGuard<'_, HeadlessInner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn read<R>(&self, f: impl FnOnce(&HeadlessInner) -> R) -> R {
        let guard = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        f(&guard)
    }

    /// Current root nodes.
    pub fn roots(&self) -> Vec<TreeNode> {
        self.read(|g| g.roots.clone())
    }

    /// Identifiers of the root nodes, in order.
    pub fn root_ids(&self) -> Vec<String> {
        self.read(|g| g.roots.iter().map(|n| n.id.clone()).collect())
    }

    /// The node with focus.
    pub fn focused(&self) -> Option<TreeNode> {
        self.read(|g| g.focused.and_then(|h| g.find_by_handle(h).cloned()))
    }

    /// Number of load requests not yet answered.
    pub fn pending_loads(&self) -> usize {
        self.read(|g| g.pending.len())
    }

    /// Number of registered native listeners.
    pub fn listener_count(&self) -> usize {
        self.read(|g| g.listeners.len())
    }

    /// Whether [`destroy`](TreeControl::destroy) ran.
    pub fn is_destroyed(&self) -> bool {
        self.read(|g| g.destroyed)
    }

    /// Simulate the user clicking a node's expander.
    ///
    /// Returns `false` if no node has that id.
    pub fn click_toggle(&self, id: &str) -> bool {
        match self.handle_of(id) {
            Some(handle) => {
                self.toggle_node(handle);
                true
            }
            None => false,
        }
    }

    /// Simulate the user clicking a node's label.
    ///
    /// Returns `false` if no node has that id.
    pub fn click_select(&self, id: &str) -> bool {
        match self.handle_of(id) {
            Some(handle) => {
                self.set_selected_node(handle, true);
                true
            }
            None => false,
        }
    }

    fn handle_of(&self, id: &str) -> Option<NodeHandle> {
        self.read(|g| g.find_by_id(id).and_then(|n| n.node))
    }

    /// Deliver an event to every listener registered for `kind`.
    fn dispatch(&self, kind: NativeEventKind, event: TreeEvent) {
        let listeners = self.read(|g| g.listeners_for(kind));
        for listener in listeners {
            listener(&event);
        }
    }

    /// Response for a load request on `handle`.
    ///
    /// A response dropped unanswered clears the pending state, so the next
    /// toggle asks again.
    fn load_response(&self, handle: NodeHandle) -> LoadResponse {
        let weak: Weak<RwLock<HeadlessInner>> = Arc::downgrade(&self.inner);
        let abandoned = weak.clone();
        LoadResponse::new(move |children| {
            let Some(inner) = weak.upgrade() else {
                return;
            };
            let tree = HeadlessTree { inner };
            let event = {
                let mut guard = tree.write();
                if guard.destroyed {
                    return;
                }
                guard.finish_load(handle, children)
            };
            if let Some(event) = event {
                tree.dispatch(NativeEventKind::Expand, event);
            }
        })
        .on_unanswered(move || {
            if let Some(inner) = abandoned.upgrade() {
                let mut guard = inner.write().unwrap_or_else(PoisonError::into_inner);
                if guard.abandon_load(handle) {
                    log::debug!("load request for {} abandoned", handle);
                }
            }
        })
    }
}

impl std::fmt::Debug for HeadlessTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.read(|g| {
            f.debug_struct("HeadlessTree")
                .field("roots", &g.roots.len())
                .field("pending", &g.pending.len())
                .field("destroyed", &g.destroyed)
                .finish()
        })
    }
}

impl TreeControl for HeadlessTree {
    fn load_data(&self, nodes: Vec<TreeNode>) {
        let mut guard = self.write();
        if guard.destroyed {
            return;
        }
        let mut roots = nodes;
        for node in roots.iter_mut() {
            guard.mint_handles(node);
        }
        guard.roots = roots;
        guard.pending.clear();
        guard.focused = None;
    }

    fn add_node(&self, node: &TreeNode, location: InsertLocation) {
        let mut guard = self.write();
        if guard.destroyed {
            return;
        }
        let mut node = node.clone();
        guard.mint_handles(&mut node);
        match location {
            InsertLocation::Top => guard.roots.insert(0, node),
            InsertLocation::Bottom => guard.roots.push(node),
            InsertLocation::Under(parent) => match guard.find_by_handle_mut(parent) {
                Some(parent) => parent.children.get_or_insert_with(Vec::new).push(node),
                None => log::warn!("add_node: no parent {}", parent),
            },
        }
    }

    fn remove_node(&self, node: &TreeNode) {
        let mut guard = self.write();
        if !guard.destroyed && !guard.remove(node) {
            log::debug!("remove_node: '{}' not found", node.id);
        }
    }

    /// Copies label and flags; children are left as loaded.
    fn update_node(&self, node: &TreeNode) {
        let mut guard = self.write();
        if guard.destroyed {
            return;
        }
        match guard.resolve_mut(node) {
            Some(stored) => {
                stored.text = node.text.clone();
                stored.open = node.open;
                stored.disabled = node.disabled;
                stored.selected = node.selected;
            }
            None => log::debug!("update_node: '{}' not found", node.id),
        }
    }

    fn set_focus(&self, node: &TreeNode) {
        let mut guard = self.write();
        if guard.destroyed {
            return;
        }
        let handle = guard.resolve_mut(node).and_then(|n| n.node);
        if handle.is_some() {
            guard.focused = handle;
        }
    }

    fn find_by_id(&self, id: &str) -> Option<TreeNode> {
        self.read(|g| g.find_by_id(id).cloned())
    }

    fn toggle_node(&self, handle: NodeHandle) {
        let outcome = {
            let mut guard = self.write();
            if guard.destroyed {
                return;
            }
            guard.toggle(handle)
        };
        match outcome {
            ToggleOutcome::None => {}
            ToggleOutcome::Event(kind, event) => self.dispatch(kind, event),
            ToggleOutcome::Load(source, node) => {
                source.request(TreeEvent::new(node), self.load_response(handle));
            }
        }
    }

    fn set_selected_node(&self, handle: NodeHandle, focus: bool) {
        let event = {
            let mut guard = self.write();
            if guard.destroyed {
                return;
            }
            guard.select(handle, focus)
        };
        if let Some(event) = event {
            self.dispatch(NativeEventKind::Selected, event);
        }
    }

    fn expand_all(&self) {
        let mut guard = self.write();
        if !guard.destroyed {
            guard.expand_all();
        }
    }

    fn collapse_all(&self) {
        let mut guard = self.write();
        if !guard.destroyed {
            guard.collapse_all();
        }
    }

    fn destroy(&self) {
        let mut guard = self.write();
        guard.destroyed = true;
        guard.roots.clear();
        guard.pending.clear();
        guard.listeners.clear();
        guard.source = None;
        guard.focused = None;
    }

    fn subscribe(&self, kind: NativeEventKind, listener: NativeListener) -> ListenerId {
        let mut guard = self.write();
        let id = guard.next_listener_id();
        if !guard.destroyed {
            guard.listeners.push((id, kind, listener));
        }
        id
    }

    fn unsubscribe(&self, id: ListenerId) {
        self.write().listeners.retain(|(l, _, _)| *l != id);
    }
}

/// Creates [`HeadlessTree`]s and remembers the last one.
#[derive(Debug, Clone, Default)]
pub struct HeadlessTreeFactory {
    last: Arc<Mutex<Option<HeadlessTree>>>,
}

impl HeadlessTreeFactory {
    /// Create a factory.
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recently created tree.
    pub fn last_created(&self) -> Option<HeadlessTree> {
        self.last
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl TreeControlFactory for HeadlessTreeFactory {
    fn create(&self, host: &HostElement, options: TreeOptions) -> Arc<dyn TreeControl> {
        log::debug!("creating headless tree on '{}'", host.selector());
        let tree = HeadlessTree::new(options);
        *self.last.lock().unwrap_or_else(PoisonError::into_inner) = Some(tree.clone());
        Arc::new(tree)
    }
}
