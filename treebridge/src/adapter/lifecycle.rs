//! Attach and detach.

use std::sync::{Arc, PoisonError, RwLock, Weak};

use tokio::runtime::Handle;

use crate::control::{HostElement, NativeListener, TreeControlFactory};
use crate::error::{AdapterError, AdapterErrorKind, TreeError};
use crate::event::{NativeEventKind, TreeEvent, TreeOptions};
use crate::node::TreeNode;
use crate::output::Output;

use super::lazy::LoadContext;
use super::{AdapterInner, TreeAdapter, TreeId};

/// Lifecycle phase of a [`TreeAdapter`].
///
/// Phases only move forward: `Unattached`, `Attaching`, `Attached`,
/// `Detached`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Constructed, no control yet.
    Unattached,
    /// The control is being created.
    Attaching,
    /// The control is live and listeners are bound.
    Attached,
    /// Torn down. Terminal.
    Detached,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Phase::Unattached => "unattached",
            Phase::Attaching => "attaching",
            Phase::Attached => "attached",
            Phase::Detached => "detached",
        };
        f.write_str(name)
    }
}

/// Native events republished on outputs.
const REPUBLISHED: [NativeEventKind; 3] = [
    NativeEventKind::Selected,
    NativeEventKind::Expand,
    NativeEventKind::Collapse,
];

impl TreeAdapter {
    /// Create the tree control on `host` and start driving it.
    ///
    /// In order: the control is created with the current dataset and, when a
    /// provider is configured and the kind allows it, a lazy-load source; the
    /// control is retained; root nodes are fetched from the provider if no
    /// dataset was supplied; native listeners are bound.
    ///
    /// Must be called from within a tokio runtime when a provider is in use.
    /// An adapter attaches at most once: calling this again, or after
    /// [`detach`](Self::detach), fails with `LifecycleViolation` and changes
    /// nothing.
    pub fn attach(
        &self,
        host: HostElement,
        factory: &dyn TreeControlFactory,
    ) -> Result<(), TreeError> {
        let (dataset, load_context) = {
            let mut guard = self.write();
            if guard.phase != Phase::Unattached {
                log::error!(
                    "{}: attach called in the {} state",
                    self.id,
                    guard.phase
                );
                return Err(TreeError::LifecycleViolation {
                    phase: guard.phase,
                    operation: "attach",
                });
            }
            let load_context = match &self.provider {
                Some(provider) if guard.kind.uses_provider() => Some(LoadContext {
                    tree_id: self.id,
                    inner: Arc::downgrade(&self.inner),
                    provider: Arc::clone(provider),
                    errors: self.outputs.error.clone(),
                    tasks: self.tasks.clone(),
                    runtime: Handle::try_current().map_err(|_| TreeError::NoRuntime)?,
                }),
                _ => None,
            };
            guard.phase = Phase::Attaching;
            (guard.dataset.clone(), load_context)
        };
        log::debug!("{}: attaching to '{}'", self.id, host.selector());

        let options = TreeOptions {
            dataset: dataset.clone(),
            source: load_context.as_ref().map(LoadContext::source),
        };
        let control = factory.create(&host, options);

        {
            let mut guard = self.write();
            if guard.phase != Phase::Attaching {
                // Detached while the control was being created.
                drop(guard);
                control.destroy();
                return Err(TreeError::LifecycleViolation {
                    phase: Phase::Detached,
                    operation: "attach",
                });
            }
            guard.control = Some(Arc::clone(&control));
            guard.host = Some(host);
            guard.phase = Phase::Attached;
        }

        if dataset.is_none()
            && let Some(context) = &load_context
        {
            context.fetch_roots();
        }

        let listeners = REPUBLISHED
            .into_iter()
            .map(|kind| control.subscribe(kind, self.republisher(kind)))
            .collect::<Vec<_>>();
        let mut guard = self.write();
        if guard.phase == Phase::Attached {
            guard.listeners = listeners;
        } else {
            drop(guard);
            for id in listeners {
                control.unsubscribe(id);
            }
        }

        log::debug!("{}: attached", self.id);
        Ok(())
    }

    /// Tear the control down and release everything bound to it.
    ///
    /// Unsubscribes native listeners, destroys the control, drops the
    /// control and host references and removes every output subscription.
    /// Calling it again is a no-op.
    pub fn detach(&self) {
        let (control, listeners) = {
            let mut guard = self.write();
            match guard.phase {
                Phase::Detached => return,
                Phase::Unattached | Phase::Attaching => {
                    guard.phase = Phase::Detached;
                    return;
                }
                Phase::Attached => {}
            }
            guard.phase = Phase::Detached;
            guard.host = None;
            guard.last_selected = None;
            (guard.control.take(), std::mem::take(&mut guard.listeners))
        };

        if let Some(control) = control {
            for id in listeners {
                control.unsubscribe(id);
            }
            control.destroy();
        }
        self.outputs.clear();
        log::debug!("{}: detached", self.id);
    }

    /// Listener forwarding one native event kind to its output.
    fn republisher(&self, kind: NativeEventKind) -> NativeListener {
        let output = match kind {
            NativeEventKind::Expand => self.outputs.expand.clone(),
            NativeEventKind::Collapse => self.outputs.collapse.clone(),
            _ => self.outputs.selected.clone(),
        };
        let republisher = Republisher {
            tree_id: self.id,
            kind,
            inner: Arc::downgrade(&self.inner),
            output,
            errors: self.outputs.error.clone(),
        };
        Arc::new(move |event: &TreeEvent| republisher.forward(event))
    }
}

struct Republisher {
    tree_id: TreeId,
    kind: NativeEventKind,
    inner: Weak<RwLock<AdapterInner>>,
    output: Output<TreeNode>,
    errors: Output<AdapterError>,
}

impl Republisher {
    fn forward(&self, event: &TreeEvent) {
        let Some(node) = &event.data else {
            log::warn!("{}: {} event without a node", self.tree_id, self.kind);
            self.errors.emit(&AdapterError {
                tree_id: self.tree_id,
                kind: AdapterErrorKind::InvalidPayload { event: self.kind },
            });
            return;
        };
        if self.kind == NativeEventKind::Selected
            && let Some(inner) = self.inner.upgrade()
        {
            let mut guard = inner.write().unwrap_or_else(PoisonError::into_inner);
            guard.last_selected = Some(node.clone());
        }
        self.output.emit(node);
    }
}
