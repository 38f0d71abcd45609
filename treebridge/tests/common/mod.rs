//! Shared test doubles.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::Notify;
use treebridge::prelude::*;
use treebridge::{ListenerId, LoadSource, NativeListener};

/// A call made into the control.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    LoadData(Vec<String>),
    AddNode(String, InsertLocation),
    RemoveNode(String),
    UpdateNode(String, bool),
    SetFocus(String),
    FindById(String),
    ToggleNode(NodeHandle),
    SetSelectedNode(NodeHandle, bool),
    ExpandAll,
    CollapseAll,
    Destroy,
    Subscribe(NativeEventKind),
    Unsubscribe,
}

#[derive(Default)]
struct RecordingState {
    calls: Vec<Call>,
    options: Option<TreeOptions>,
    nodes: HashMap<String, TreeNode>,
    listeners: Vec<(ListenerId, NativeEventKind, NativeListener)>,
    next_listener: u64,
}

/// Control double that records every call.
#[derive(Clone, Default)]
pub struct RecordingControl {
    state: Arc<Mutex<RecordingState>>,
}

impl RecordingControl {
    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state.lock().unwrap().calls.clear();
    }

    /// Make `node` findable by id.
    pub fn insert_node(&self, node: TreeNode) {
        self.state
            .lock()
            .unwrap()
            .nodes
            .insert(node.id.clone(), node);
    }

    pub fn options_dataset(&self) -> Option<Vec<TreeNode>> {
        self.state
            .lock()
            .unwrap()
            .options
            .as_ref()
            .and_then(|o| o.dataset.clone())
    }

    pub fn source(&self) -> Option<LoadSource> {
        self.state
            .lock()
            .unwrap()
            .options
            .as_ref()
            .and_then(|o| o.source.clone())
    }

    pub fn listener_count(&self) -> usize {
        self.state.lock().unwrap().listeners.len()
    }

    /// Raise a native event as the real widget would.
    pub fn fire(&self, kind: NativeEventKind, event: TreeEvent) {
        let listeners: Vec<NativeListener> = self
            .state
            .lock()
            .unwrap()
            .listeners
            .iter()
            .filter(|(_, k, _)| *k == kind)
            .map(|(_, _, l)| l.clone())
            .collect();
        for listener in listeners {
            listener(&event);
        }
    }

    /// Raise a load request and collect what the response receives.
    pub fn request_load(&self, event: TreeEvent) -> Arc<Mutex<Vec<Vec<TreeNode>>>> {
        let received = Arc::new(Mutex::new(Vec::new()));
        let sink = received.clone();
        let source = self.source().expect("no load source");
        source.request(
            event,
            LoadResponse::new(move |children| sink.lock().unwrap().push(children)),
        );
        received
    }

    fn record(&self, call: Call) {
        self.state.lock().unwrap().calls.push(call);
    }
}

impl TreeControl for RecordingControl {
    fn load_data(&self, nodes: Vec<TreeNode>) {
        self.record(Call::LoadData(nodes.iter().map(|n| n.id.clone()).collect()));
    }

    fn add_node(&self, node: &TreeNode, location: InsertLocation) {
        self.record(Call::AddNode(node.id.clone(), location));
    }

    fn remove_node(&self, node: &TreeNode) {
        self.record(Call::RemoveNode(node.id.clone()));
    }

    fn update_node(&self, node: &TreeNode) {
        self.record(Call::UpdateNode(node.id.clone(), node.disabled));
    }

    fn set_focus(&self, node: &TreeNode) {
        self.record(Call::SetFocus(node.id.clone()));
    }

    fn find_by_id(&self, id: &str) -> Option<TreeNode> {
        self.record(Call::FindById(id.to_string()));
        self.state.lock().unwrap().nodes.get(id).cloned()
    }

    fn toggle_node(&self, handle: NodeHandle) {
        self.record(Call::ToggleNode(handle));
    }

    fn set_selected_node(&self, handle: NodeHandle, focus: bool) {
        self.record(Call::SetSelectedNode(handle, focus));
    }

    fn expand_all(&self) {
        self.record(Call::ExpandAll);
    }

    fn collapse_all(&self) {
        self.record(Call::CollapseAll);
    }

    fn destroy(&self) {
        self.record(Call::Destroy);
    }

    fn subscribe(&self, kind: NativeEventKind, listener: NativeListener) -> ListenerId {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::Subscribe(kind));
        state.next_listener += 1;
        let id = ListenerId::from_raw(state.next_listener);
        state.listeners.push((id, kind, listener));
        id
    }

    fn unsubscribe(&self, id: ListenerId) {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::Unsubscribe);
        state.listeners.retain(|(l, _, _)| *l != id);
    }
}

/// Factory handing out one shared [`RecordingControl`].
#[derive(Clone, Default)]
pub struct RecordingFactory {
    pub control: RecordingControl,
    created: Arc<Mutex<usize>>,
}

impl RecordingFactory {
    pub fn created(&self) -> usize {
        *self.created.lock().unwrap()
    }
}

impl TreeControlFactory for RecordingFactory {
    fn create(&self, _host: &HostElement, options: TreeOptions) -> Arc<dyn TreeControl> {
        *self.created.lock().unwrap() += 1;
        self.control.state.lock().unwrap().options = Some(options);
        Arc::new(self.control.clone())
    }
}

/// Provider with canned answers.
///
/// Children requests for a gated node wait until [`StubProvider::release`]
/// is called for it.
#[derive(Clone, Default)]
pub struct StubProvider {
    roots: Option<Result<Vec<TreeNode>, ProviderError>>,
    children: Arc<Mutex<HashMap<String, Result<Vec<TreeNode>, ProviderError>>>>,
    gates: HashMap<String, Arc<Notify>>,
    roots_gate: Option<Arc<Notify>>,
    panics_for: Option<String>,
    requests: Arc<Mutex<Vec<String>>>,
}

impl StubProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_roots(mut self, roots: Vec<TreeNode>) -> Self {
        self.roots = Some(Ok(roots));
        self
    }

    pub fn with_failing_roots(mut self, message: &str) -> Self {
        self.roots = Some(Err(ProviderError::new(message)));
        self
    }

    pub fn with_children(self, id: &str, children: Vec<TreeNode>) -> Self {
        self.set_children(id, children);
        self
    }

    pub fn with_failure(self, id: &str, message: &str) -> Self {
        self.children
            .lock()
            .unwrap()
            .insert(id.to_string(), Err(ProviderError::new(message)));
        self
    }

    /// Change the answer for `id`; visible to every clone.
    pub fn set_children(&self, id: &str, children: Vec<TreeNode>) {
        self.children
            .lock()
            .unwrap()
            .insert(id.to_string(), Ok(children));
    }

    /// Hold the root fetch until [`StubProvider::release_roots`].
    pub fn with_roots_gate(mut self) -> Self {
        self.roots_gate = Some(Arc::new(Notify::new()));
        self
    }

    pub fn release_roots(&self) {
        if let Some(gate) = &self.roots_gate {
            gate.notify_one();
        }
    }

    pub fn with_gate(mut self, id: &str) -> Self {
        self.gates.insert(id.to_string(), Arc::new(Notify::new()));
        self
    }

    pub fn with_panic(mut self, id: &str) -> Self {
        self.panics_for = Some(id.to_string());
        self
    }

    /// Let the gated request for `id` finish.
    pub fn release(&self, id: &str) {
        self.gates[id].notify_one();
    }

    /// Ids whose children were requested, in order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl TreeDataProvider for StubProvider {
    async fn root_tree_nodes(&self) -> Result<Vec<TreeNode>, ProviderError> {
        if let Some(gate) = &self.roots_gate {
            gate.notified().await;
        }
        self.roots.clone().unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn tree_nodes(&self, parent: &TreeNode) -> Result<Vec<TreeNode>, ProviderError> {
        self.requests.lock().unwrap().push(parent.id.clone());
        if let Some(gate) = self.gates.get(&parent.id) {
            gate.notified().await;
        }
        if self.panics_for.as_deref() == Some(parent.id.as_str()) {
            panic!("provider exploded on {}", parent.id);
        }
        self.children
            .lock()
            .unwrap()
            .get(&parent.id)
            .cloned()
            .unwrap_or_else(|| Ok(Vec::new()))
    }
}

/// Node as the control would report it, with a native handle.
pub fn native_node(id: &str, raw: u64) -> TreeNode {
    TreeNode {
        node: Some(NodeHandle::from_raw(raw)),
        ..TreeNode::new(id, id.to_uppercase())
    }
}

/// Collect every value an output emits.
pub fn record<T: Clone + Send + 'static>(output: &Output<T>) -> Arc<Mutex<Vec<T>>> {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    output.subscribe(move |value: &T| sink.lock().unwrap().push(value.clone()));
    seen
}
