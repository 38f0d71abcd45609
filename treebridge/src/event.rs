//! Protocol types exchanged with the tree control.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::node::TreeNode;

/// Native events a tree control raises.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NativeEventKind {
    /// A node was selected.
    Selected,
    /// A node was expanded.
    Expand,
    /// A node was collapsed.
    Collapse,
    /// The control needs the children of a node.
    LoadRequest,
}

impl std::fmt::Display for NativeEventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            NativeEventKind::Selected => "selected",
            NativeEventKind::Expand => "expand",
            NativeEventKind::Collapse => "collapse",
            NativeEventKind::LoadRequest => "load-request",
        };
        f.write_str(name)
    }
}

/// Envelope for a native event.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TreeEvent {
    /// The node the event is about.
    pub data: Option<TreeNode>,
}

impl TreeEvent {
    /// Create an event about `node`.
    pub fn new(node: TreeNode) -> Self {
        Self { data: Some(node) }
    }

    /// Create an event with no node attached.
    pub fn empty() -> Self {
        Self { data: None }
    }
}

/// Identifies one load request, for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LoadRequestId(u64);

impl LoadRequestId {
    fn next() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        Self(COUNTER.fetch_add(1, Ordering::SeqCst))
    }
}

impl std::fmt::Display for LoadRequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "load-{}", self.0)
    }
}

/// Single-use reply channel for a load request.
///
/// `respond` consumes the value, so a request can be answered at most once.
/// Dropping it without responding leaves the request unanswered and runs the
/// hook set with [`LoadResponse::on_unanswered`], if any.
pub struct LoadResponse {
    id: LoadRequestId,
    callback: Option<Box<dyn FnOnce(Vec<TreeNode>) + Send>>,
    unanswered: Option<Box<dyn FnOnce() + Send>>,
}

impl LoadResponse {
    /// Wrap the control's callback for one request.
    pub fn new(callback: impl FnOnce(Vec<TreeNode>) + Send + 'static) -> Self {
        Self {
            id: LoadRequestId::next(),
            callback: Some(Box::new(callback)),
            unanswered: None,
        }
    }

    /// Run `hook` if this response is dropped without being answered.
    pub fn on_unanswered(mut self, hook: impl FnOnce() + Send + 'static) -> Self {
        self.unanswered = Some(Box::new(hook));
        self
    }

    /// The request this response belongs to.
    pub fn id(&self) -> LoadRequestId {
        self.id
    }

    /// Deliver the children to the control.
    pub fn respond(mut self, children: Vec<TreeNode>) {
        self.unanswered = None;
        if let Some(callback) = self.callback.take() {
            callback(children);
        }
    }
}

impl Drop for LoadResponse {
    fn drop(&mut self) {
        if let Some(hook) = self.unanswered.take() {
            hook();
        }
    }
}

impl std::fmt::Debug for LoadResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadResponse").field("id", &self.id).finish()
    }
}

/// Callback a control invokes when it needs a node's children.
#[derive(Clone)]
pub struct LoadSource(Arc<dyn Fn(TreeEvent, LoadResponse) + Send + Sync>);

impl LoadSource {
    /// Wrap a load handler.
    pub fn new(handler: impl Fn(TreeEvent, LoadResponse) + Send + Sync + 'static) -> Self {
        Self(Arc::new(handler))
    }

    /// Raise a load request.
    pub fn request(&self, event: TreeEvent, response: LoadResponse) {
        (self.0)(event, response)
    }
}

impl std::fmt::Debug for LoadSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("LoadSource")
    }
}

/// Options a tree control is created with.
#[derive(Debug, Clone, Default)]
pub struct TreeOptions {
    /// Initial root nodes.
    pub dataset: Option<Vec<TreeNode>>,
    /// Lazy-load callback; `None` disables lazy loading.
    pub source: Option<LoadSource>,
}
