//! Declarative adapter for imperative tree controls.
//!
//! A [`TreeAdapter`] drives a stateful tree control (anything implementing
//! [`TreeControl`]) from declarative inputs: a dataset and a [`TreeKind`].
//! It lazily loads children from a [`TreeDataProvider`] when the control
//! asks for them, republishes the control's native events on typed
//! [`Output`]s and exposes an imperative façade over the live control.

pub mod adapter;
pub mod argument;
pub mod control;
pub mod error;
pub mod event;
pub mod headless;
pub mod kind;
pub mod logging;
pub mod node;
pub mod output;
pub mod provider;

pub use adapter::{HostBindings, Phase, TreeAdapter, TreeAdapterBuilder, TreeId};
pub use control::{HostElement, ListenerId, NativeListener, TreeControl, TreeControlFactory};
pub use error::{AdapterError, AdapterErrorKind, TreeError};
pub use event::{LoadRequestId, LoadResponse, LoadSource, NativeEventKind, TreeEvent, TreeOptions};
pub use kind::TreeKind;
pub use node::{InsertLocation, NodeHandle, TreeNode};
pub use output::{Output, Subscription};
pub use provider::{ProviderError, TreeDataProvider};

pub mod prelude {
    pub use crate::adapter::{Phase, TreeAdapter};
    pub use crate::control::{HostElement, TreeControl, TreeControlFactory};
    pub use crate::error::{AdapterError, AdapterErrorKind, TreeError};
    pub use crate::event::{LoadResponse, NativeEventKind, TreeEvent, TreeOptions};
    pub use crate::headless::{HeadlessTree, HeadlessTreeFactory};
    pub use crate::kind::TreeKind;
    pub use crate::node::{InsertLocation, NodeHandle, TreeNode};
    pub use crate::output::Output;
    pub use crate::provider::{ProviderError, TreeDataProvider};

    pub use async_trait::async_trait;
}
