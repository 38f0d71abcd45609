//! Tests for file logging.

use log::LevelFilter;
use treebridge::logging::{LoggingError, init_file_logger};
use treebridge::{HostElement, TreeAdapter, headless::HeadlessTreeFactory};

#[test]
fn test_file_logger_records_adapter_activity() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tree.log");

    init_file_logger(&path, LevelFilter::Debug).unwrap();
    let tree = TreeAdapter::new();
    tree.attach(HostElement::new("ul#files"), &HeadlessTreeFactory::new())
        .unwrap();
    tree.detach();
    log::logger().flush();

    let contents = std::fs::read_to_string(&path).unwrap();
    assert!(contents.contains(&format!("{}: attaching to 'ul#files'", tree.id())));
    assert!(contents.contains(&format!("{}: detached", tree.id())));

    let again = init_file_logger(dir.path().join("other.log"), LevelFilter::Info);
    assert!(matches!(again, Err(LoggingError::AlreadyInstalled(_))));
}

#[test]
fn test_file_logger_reports_bad_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("tree.log");

    let result = init_file_logger(&path, LevelFilter::Info);

    assert!(matches!(result, Err(LoggingError::Io(_))));
}
