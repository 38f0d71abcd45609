//! Tree adapter: binds a declaratively configured tree to an imperative
//! tree control.
//!
//! The adapter owns the lifecycle of the control (see [`Phase`]), answers
//! the control's lazy-load requests from a [`TreeDataProvider`], republishes
//! native events on typed [`Output`]s and offers an imperative façade over
//! the live control.
//!
//! # Example
//!
//! ```ignore
//! use treebridge::prelude::*;
//!
//! let tree = TreeAdapter::builder()
//!     .with_kind_input(Some("auto"))?
//!     .with_provider(FolderProvider::new("/srv"))
//!     .build();
//!
//! tree.on_expand().subscribe(|node| log::info!("expanded {}", node.id));
//! tree.attach(HostElement::new("ul#files"), &HeadlessTreeFactory::new())?;
//!
//! tree.set_selected_node("/srv/www", true)?;
//! // ...
//! tree.detach();
//! ```

mod builder;
mod facade;
mod lazy;
mod lifecycle;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tokio_util::task::TaskTracker;

use crate::control::{HostElement, ListenerId, TreeControl};
use crate::error::{AdapterError, TreeError};
use crate::kind::TreeKind;
use crate::node::TreeNode;
use crate::output::Output;
use crate::provider::TreeDataProvider;

pub use builder::{HostBindings, TreeAdapterBuilder};
pub use lifecycle::Phase;

/// Unique identifier for a tree adapter instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TreeId(usize);

impl TreeId {
    fn new() -> Self {
        static COUNTER: AtomicUsize = AtomicUsize::new(0);
        Self(COUNTER.fetch_add(1, Ordering::SeqCst))
    }
}

impl std::fmt::Display for TreeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "__tree_{}", self.0)
    }
}

/// Typed outputs of a tree adapter.
#[derive(Debug, Clone, Default)]
pub(crate) struct TreeOutputs {
    pub expand: Output<TreeNode>,
    pub collapse: Output<TreeNode>,
    pub selected: Output<TreeNode>,
    pub error: Output<AdapterError>,
}

impl TreeOutputs {
    fn clear(&self) {
        self.expand.clear();
        self.collapse.clear();
        self.selected.clear();
        self.error.clear();
    }
}

/// Mutable adapter state.
pub(crate) struct AdapterInner {
    pub phase: Phase,
    pub kind: TreeKind,
    /// Root nodes, either supplied or fetched from the provider.
    pub dataset: Option<Vec<TreeNode>>,
    /// The live control, present only while attached.
    pub control: Option<Arc<dyn TreeControl>>,
    pub host: Option<HostElement>,
    pub listeners: Vec<ListenerId>,
    pub disabled: bool,
    /// Node carried by the most recent selected event.
    pub last_selected: Option<TreeNode>,
}

/// Adapter between a declarative tree and an imperative tree control.
///
/// Create one with [`TreeAdapter::builder`], subscribe to its outputs, then
/// [`attach`](TreeAdapter::attach) it once the host element exists and
/// [`detach`](TreeAdapter::detach) it when the host goes away.
///
/// No internal lock is held while the control or an output handler runs, so
/// handlers may call back into the adapter.
pub struct TreeAdapter {
    id: TreeId,
    inner: Arc<RwLock<AdapterInner>>,
    provider: Option<Arc<dyn TreeDataProvider>>,
    outputs: TreeOutputs,
    tasks: TaskTracker,
    /// Serializes `settle`, which closes and reopens `tasks`.
    settling: tokio::sync::Mutex<()>,
}

impl TreeAdapter {
    /// Create an adapter with default settings and no data provider.
    pub fn new() -> Self {
        TreeAdapterBuilder::new().build()
    }

    /// Start configuring an adapter.
    pub fn builder() -> TreeAdapterBuilder {
        TreeAdapterBuilder::new()
    }

    /// Get the unique ID.
    pub fn id(&self) -> TreeId {
        self.id
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> Phase {
        self.read().phase
    }

    /// Whether a live control is bound.
    pub fn is_attached(&self) -> bool {
        self.phase() == Phase::Attached
    }

    /// The configured tree kind.
    pub fn kind(&self) -> TreeKind {
        self.read().kind
    }

    /// Assign the kind input.
    ///
    /// An absent or empty value resolves to [`TreeKind::Auto`]. The lazy-load
    /// wiring is decided at attach time, so changing the kind afterwards only
    /// affects what [`kind`](Self::kind) reports.
    pub fn set_kind(&self, value: Option<&str>) -> Result<(), TreeError> {
        let kind = TreeKind::parse(value)?;
        self.write().kind = kind;
        Ok(())
    }

    /// Current root nodes, if any were supplied or fetched.
    pub fn dataset(&self) -> Option<Vec<TreeNode>> {
        self.read().dataset.clone()
    }

    /// Replace the root nodes.
    ///
    /// When attached the control reloads everything from the new dataset;
    /// no attempt is made to merge it with what the control already shows.
    pub fn set_dataset(&self, dataset: Vec<TreeNode>) {
        let control = {
            let mut guard = self.write();
            guard.dataset = Some(dataset.clone());
            guard.live_control()
        };
        if let Some(control) = control {
            log::debug!("{}: reloading {} root nodes", self.id, dataset.len());
            control.load_data(dataset);
        }
    }

    /// Emits the node each time the control expands one.
    pub fn on_expand(&self) -> &Output<TreeNode> {
        &self.outputs.expand
    }

    /// Emits the node each time the control collapses one.
    pub fn on_collapse(&self) -> &Output<TreeNode> {
        &self.outputs.collapse
    }

    /// Emits the node each time the control selects one.
    pub fn on_selected(&self) -> &Output<TreeNode> {
        &self.outputs.selected
    }

    /// Emits failures from provider tasks and malformed native events.
    pub fn on_error(&self) -> &Output<AdapterError> {
        &self.outputs.error
    }

    /// The node carried by the most recent selected event.
    ///
    /// This is a snapshot of what the control reported; it is not refreshed
    /// if the node changes afterwards.
    pub fn selected_node(&self) -> Option<TreeNode> {
        self.read().last_selected.clone()
    }

    /// Wait until every provider request started by this adapter finished.
    ///
    /// Concurrent calls take turns.
    pub async fn settle(&self) {
        let _turn = self.settling.lock().await;
        self.tasks.close();
        self.tasks.wait().await;
        self.tasks.reopen();
    }

    fn read(&self) -> RwLockReadGuard<'_, AdapterInner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, AdapterInner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// The live control, or `NotAttached`.
    fn control(&self) -> Result<Arc<dyn TreeControl>, TreeError> {
        self.read().live_control().ok_or(TreeError::NotAttached)
    }
}

impl Default for TreeAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TreeAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let guard = self.read();
        f.debug_struct("TreeAdapter")
            .field("id", &self.id)
            .field("phase", &guard.phase)
            .field("kind", &guard.kind)
            .field("has_provider", &self.provider.is_some())
            .finish()
    }
}

impl Drop for TreeAdapter {
    fn drop(&mut self) {
        self.detach();
    }
}

impl AdapterInner {
    fn new(kind: TreeKind, dataset: Option<Vec<TreeNode>>, disabled: bool) -> Self {
        Self {
            phase: Phase::Unattached,
            kind,
            dataset,
            control: None,
            host: None,
            listeners: Vec::new(),
            disabled,
            last_selected: None,
        }
    }

    pub(crate) fn live_control(&self) -> Option<Arc<dyn TreeControl>> {
        match self.phase {
            Phase::Attached => self.control.clone(),
            _ => None,
        }
    }
}
