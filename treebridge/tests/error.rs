//! Tests for error types.

use std::any::Any;

use treebridge::error::extract_panic_message;
use treebridge::{AdapterError, AdapterErrorKind, NativeEventKind, ProviderError, TreeAdapter, TreeError};

#[test]
fn test_extract_panic_message_str() {
    let panic: Box<dyn Any + Send> = Box::new("test panic message");
    assert_eq!(extract_panic_message(&panic), "test panic message");
}

#[test]
fn test_extract_panic_message_string() {
    let panic: Box<dyn Any + Send> = Box::new(String::from("test panic message"));
    assert_eq!(extract_panic_message(&panic), "test panic message");
}

#[test]
fn test_extract_panic_message_unknown() {
    let panic: Box<dyn Any + Send> = Box::new(42i32);
    assert_eq!(extract_panic_message(&panic), "Unknown panic");
}

#[test]
fn test_adapter_error_display() {
    let tree = TreeAdapter::new();
    let error = AdapterError {
        tree_id: tree.id(),
        kind: AdapterErrorKind::ProviderFailure {
            node_id: Some("docs".to_string()),
            error: ProviderError::new("permission denied"),
        },
    };
    let display = error.to_string();
    assert!(display.contains(&tree.id().to_string()));
    assert!(display.contains("docs"));
    assert!(display.contains("permission denied"));
}

#[test]
fn test_invalid_payload_display() {
    let tree = TreeAdapter::new();
    let error = AdapterError {
        tree_id: tree.id(),
        kind: AdapterErrorKind::InvalidPayload {
            event: NativeEventKind::Collapse,
        },
    };
    assert!(error.to_string().contains("collapse event"));
}

#[test]
fn test_tree_error_messages() {
    assert_eq!(
        TreeError::NullArgument("node").to_string(),
        "'node' must not be null"
    );
    assert_eq!(
        TreeError::EmptyArgument("id").to_string(),
        "'id' must not be empty"
    );
    assert_eq!(TreeError::NotAttached.to_string(), "tree is not attached");
    assert_eq!(
        TreeError::InvalidEventPayload(NativeEventKind::LoadRequest).to_string(),
        "load-request event carried no tree node"
    );
}

#[test]
fn test_provider_error_conversions() {
    let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
    assert_eq!(ProviderError::from(io).message, "missing");
    assert_eq!(ProviderError::from("bad").to_string(), "bad");

    let err: TreeError = ProviderError::new("down").into();
    assert_eq!(err.to_string(), "data provider failed: down");
}
