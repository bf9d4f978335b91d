use thiserror::Error;

/// Errors reported by form operations.
///
/// The table-style API is total over well-formed input; these variants cover
/// the cases where the caller handed us something out of range or the form
/// is missing the chrome an operation needs.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// A row id outside `0..count`.
    #[error("no field at index {index} (form has {count} fields)")]
    InvalidIndex { index: usize, count: usize },

    /// Title/button-bar operations require the form to be embedded in a
    /// navigation bar.
    #[error("form must be embedded in a navigation bar to {operation}")]
    NotEmbeddedInNavigation { operation: &'static str },

    /// A date default that does not parse as `%Y-%m-%d %H:%M:%S %z`.
    #[error("invalid date default {value:?}, expected e.g. \"2018-08-06 11:00:00 +0000\"")]
    InvalidDateFormat { value: String },

    /// Two fields registered under the same title. Later registrations would
    /// silently shadow the earlier submission key, so they are rejected.
    #[error("a field titled {title:?} is already registered")]
    DuplicateTitle { title: String },
}
