//! Tests for republishing native events on outputs.

mod common;

use std::sync::{Arc, Mutex};

use common::{RecordingFactory, native_node, record};
use treebridge::prelude::*;

fn attached() -> (TreeAdapter, RecordingFactory) {
    let factory = RecordingFactory::default();
    let tree = TreeAdapter::new();
    tree.attach(HostElement::new("ul#tree"), &factory).unwrap();
    (tree, factory)
}

#[test]
fn test_events_keep_native_order() {
    let (tree, factory) = attached();
    let log = Arc::new(Mutex::new(Vec::new()));
    let sink = log.clone();
    tree.on_selected()
        .subscribe(move |n: &TreeNode| sink.lock().unwrap().push(format!("selected {}", n.id)));
    let sink = log.clone();
    tree.on_expand()
        .subscribe(move |n: &TreeNode| sink.lock().unwrap().push(format!("expand {}", n.id)));
    let sink = log.clone();
    tree.on_collapse()
        .subscribe(move |n: &TreeNode| sink.lock().unwrap().push(format!("collapse {}", n.id)));

    factory
        .control
        .fire(NativeEventKind::Selected, TreeEvent::new(native_node("x", 1)));
    factory
        .control
        .fire(NativeEventKind::Expand, TreeEvent::new(native_node("y", 2)));
    factory
        .control
        .fire(NativeEventKind::Collapse, TreeEvent::new(native_node("y", 2)));

    assert_eq!(
        *log.lock().unwrap(),
        vec!["selected x", "expand y", "collapse y"]
    );
}

#[test]
fn test_event_carries_native_handle() {
    let (tree, factory) = attached();
    let expanded = record(tree.on_expand());

    factory
        .control
        .fire(NativeEventKind::Expand, TreeEvent::new(native_node("y", 7)));

    let expanded = expanded.lock().unwrap();
    assert_eq!(expanded.len(), 1);
    assert_eq!(expanded[0].node, Some(NodeHandle::from_raw(7)));
}

#[test]
fn test_event_without_node_goes_to_error_output() {
    let (tree, factory) = attached();
    let selected = record(tree.on_selected());
    let errors = record(tree.on_error());

    factory
        .control
        .fire(NativeEventKind::Selected, TreeEvent::empty());

    assert!(selected.lock().unwrap().is_empty());
    let errors = errors.lock().unwrap();
    assert_eq!(errors.len(), 1);
    assert!(matches!(
        errors[0].kind,
        AdapterErrorKind::InvalidPayload {
            event: NativeEventKind::Selected
        }
    ));
    assert!(tree.selected_node().is_none());
}

#[test]
fn test_selected_node_tracks_last_selection() {
    let (tree, factory) = attached();
    assert!(tree.selected_node().is_none());

    factory
        .control
        .fire(NativeEventKind::Selected, TreeEvent::new(native_node("a", 1)));
    factory
        .control
        .fire(NativeEventKind::Selected, TreeEvent::new(native_node("b", 2)));

    assert_eq!(tree.selected_node().unwrap().id, "b");

    tree.detach();
    assert!(tree.selected_node().is_none());
}

#[test]
fn test_handler_may_call_back_into_adapter() {
    let (tree, factory) = attached();
    let tree = Arc::new(tree);
    let seen = Arc::new(Mutex::new(None));

    let weak = Arc::downgrade(&tree);
    let sink = seen.clone();
    tree.on_selected().subscribe(move |_: &TreeNode| {
        if let Some(tree) = weak.upgrade() {
            *sink.lock().unwrap() = tree.selected_node().map(|n| n.id);
        }
    });

    factory
        .control
        .fire(NativeEventKind::Selected, TreeEvent::new(native_node("a", 1)));

    assert_eq!(seen.lock().unwrap().as_deref(), Some("a"));
}

#[test]
fn test_unsubscribed_handler_is_not_called() {
    let (tree, factory) = attached();
    let expanded = Arc::new(Mutex::new(0));
    let sink = expanded.clone();
    let subscription = tree
        .on_expand()
        .subscribe(move |_: &TreeNode| *sink.lock().unwrap() += 1);

    factory
        .control
        .fire(NativeEventKind::Expand, TreeEvent::new(native_node("y", 2)));
    assert!(tree.on_expand().unsubscribe(subscription));
    factory
        .control
        .fire(NativeEventKind::Expand, TreeEvent::new(native_node("y", 2)));

    assert_eq!(*expanded.lock().unwrap(), 1);
}
