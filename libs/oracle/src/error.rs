//! Error types for the oracle.

use std::time::Duration;

use thiserror::Error;

/// Errors raised when building or parsing a process identity.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IdentityError {
    /// The token does not start with `<app>-v`.
    #[error("identity '{token}' does not belong to app '{app}'")]
    ForeignApp { app: String, token: String },

    /// The token does not have the `v<release>-<role>-<suffix>` shape.
    #[error("malformed process identity '{0}'")]
    Malformed(String),
}

/// Errors raised when process list output cannot be interpreted.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ScrapeError {
    /// The `=== <app> Processes` header never appeared.
    #[error("no '=== {app} Processes' header in output:\n{output}")]
    MissingHeader { app: String, output: String },
}

/// Errors raised by the polling combinator.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PollError {
    /// The condition did not hold before the deadline.
    #[error("timeout after {elapsed:?} waiting for {what}")]
    Timeout { what: String, elapsed: Duration },
}

impl PollError {
    /// Returns true if this error is a deadline miss.
    pub fn is_timeout(&self) -> bool {
        matches!(self, PollError::Timeout { .. })
    }
}
