//! Lazy loading from the data provider.
//!
//! Each load request the control raises is answered by its own task. The
//! task owns the request's [`LoadResponse`], so responses are routed to the
//! right request whatever order the provider finishes in. A failed fetch
//! never answers its request and is reported on the error output instead.
//! Results that arrive after the adapter detached are dropped.

use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::{Arc, PoisonError, RwLock, Weak};

use futures::FutureExt;
use tokio::runtime::Handle;
use tokio_util::task::TaskTracker;

use crate::control::TreeControl;
use crate::error::{AdapterError, AdapterErrorKind, TreeError, extract_panic_message};
use crate::event::{LoadResponse, LoadSource, NativeEventKind, TreeEvent};
use crate::node::TreeNode;
use crate::output::Output;
use crate::provider::{ProviderError, TreeDataProvider};

use super::{AdapterInner, TreeId};

/// Everything a provider task needs, without keeping the adapter alive.
#[derive(Clone)]
pub(super) struct LoadContext {
    pub tree_id: TreeId,
    pub inner: Weak<RwLock<AdapterInner>>,
    pub provider: Arc<dyn TreeDataProvider>,
    pub errors: Output<AdapterError>,
    pub tasks: TaskTracker,
    pub runtime: Handle,
}

impl LoadContext {
    /// Load source handed to the control.
    pub fn source(&self) -> LoadSource {
        let context = self.clone();
        LoadSource::new(move |event, response| {
            if let Err(err) = context.handle_load_request(event, response) {
                log::warn!("{}: rejected load request: {}", context.tree_id, err);
                context.report(AdapterErrorKind::InvalidPayload {
                    event: NativeEventKind::LoadRequest,
                });
            }
        })
    }

    /// Answer one load request from the provider.
    fn handle_load_request(
        &self,
        event: TreeEvent,
        response: LoadResponse,
    ) -> Result<(), TreeError> {
        let node = event
            .data
            .ok_or(TreeError::InvalidEventPayload(NativeEventKind::LoadRequest))?;
        let request = response.id();
        log::debug!("{}: {} for '{}'", self.tree_id, request, node.id);

        let context = self.clone();
        self.spawn(async move {
            let result = context.provider.tree_nodes(&node).await;
            match result {
                Ok(children) => {
                    if context.live_control().is_some() {
                        log::debug!(
                            "{}: {} resolved with {} children",
                            context.tree_id,
                            request,
                            children.len()
                        );
                        response.respond(children);
                    } else {
                        log::debug!("{}: {} resolved after detach", context.tree_id, request);
                    }
                }
                Err(error) => context.report_provider_failure(Some(node.id), error),
            }
        });
        Ok(())
    }

    /// Fetch root nodes and load them into the control.
    ///
    /// The result is discarded if the adapter detached or a dataset was
    /// assigned while the fetch was running.
    pub fn fetch_roots(&self) {
        log::debug!("{}: fetching root nodes", self.tree_id);
        let context = self.clone();
        self.spawn(async move {
            match context.provider.root_tree_nodes().await {
                Ok(roots) => context.install_roots(roots),
                Err(error) => context.report_provider_failure(None, error),
            }
        });
    }

    fn install_roots(&self, roots: Vec<TreeNode>) {
        let Some(inner) = self.inner.upgrade() else {
            return;
        };
        let control = {
            let mut guard = inner.write().unwrap_or_else(PoisonError::into_inner);
            let Some(control) = guard.live_control() else {
                log::debug!("{}: root nodes arrived after detach", self.tree_id);
                return;
            };
            if guard.dataset.is_some() {
                log::debug!("{}: root nodes superseded by an assigned dataset", self.tree_id);
                return;
            }
            guard.dataset = Some(roots.clone());
            control
        };
        control.load_data(roots);
    }

    fn live_control(&self) -> Option<Arc<dyn TreeControl>> {
        let inner = self.inner.upgrade()?;
        let guard = inner.read().unwrap_or_else(PoisonError::into_inner);
        guard.live_control()
    }

    /// Spawn a tracked task; panics are reported instead of propagated.
    fn spawn<F>(&self, future: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let context = self.clone();
        self.tasks.spawn_on(
            async move {
                if let Err(panic) = AssertUnwindSafe(future).catch_unwind().await {
                    let message = extract_panic_message(&panic);
                    log::error!("{}: provider task panicked: {}", context.tree_id, message);
                    context.report(AdapterErrorKind::TaskPanic { message });
                }
            },
            &self.runtime,
        );
    }

    fn report_provider_failure(&self, node_id: Option<String>, error: ProviderError) {
        match &node_id {
            Some(id) => log::warn!("{}: loading children of '{}' failed: {}", self.tree_id, id, error),
            None => log::warn!("{}: loading root nodes failed: {}", self.tree_id, error),
        }
        self.report(AdapterErrorKind::ProviderFailure { node_id, error });
    }

    fn report(&self, kind: AdapterErrorKind) {
        self.errors.emit(&AdapterError {
            tree_id: self.tree_id,
            kind,
        });
    }
}
