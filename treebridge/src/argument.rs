//! Precondition checks for public operations.

use crate::error::TreeError;

/// Return the value, or `NullArgument` naming `name` when it is absent.
pub fn check_present<T>(name: &'static str, value: Option<T>) -> Result<T, TreeError> {
    value.ok_or(TreeError::NullArgument(name))
}

/// Fail with `EmptyArgument` naming `name` when `value` is empty.
pub fn check_not_empty<'a>(name: &'static str, value: &'a str) -> Result<&'a str, TreeError> {
    if value.is_empty() {
        Err(TreeError::EmptyArgument(name))
    } else {
        Ok(value)
    }
}
