//! Driver errors.
//!
//! Every assertion failure carries the output captured up to that point so
//! the report shows what the command actually printed.

use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DriverError {
    /// The process could not be spawned (missing executable, bad working directory).
    #[error("failed to spawn `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },

    /// An assertion pattern did not compile.
    #[error("invalid pattern /{pattern}/: {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// The expected output or exit did not appear before the deadline.
    #[error("`{command}`: timed out waiting for {what}\n--- stdout ---\n{stdout}\n--- stderr ---\n{stderr}")]
    Timeout {
        command: String,
        what: String,
        stdout: String,
        stderr: String,
    },

    /// The process exited and the expected output never appeared.
    #[error("`{command}` exited with {exit_code} before {what}\n--- stdout ---\n{stdout}\n--- stderr ---\n{stderr}")]
    NoMatch {
        command: String,
        what: String,
        exit_code: i32,
        stdout: String,
        stderr: String,
    },

    /// The process exited with a different code than expected.
    #[error("`{command}` exited with {actual}, expected {expected}\n--- stdout ---\n{stdout}\n--- stderr ---\n{stderr}")]
    UnexpectedExit {
        command: String,
        expected: i32,
        actual: i32,
        stdout: String,
        stderr: String,
    },

    /// The task supervising the child went away without reporting an exit.
    #[error("lost track of `{command}`")]
    Lost { command: String },
}

impl DriverError {
    /// Returns true if this error is a deadline miss.
    pub fn is_timeout(&self) -> bool {
        matches!(self, DriverError::Timeout { .. })
    }

    /// Returns true if the process could not be started at all.
    pub fn is_spawn(&self) -> bool {
        matches!(self, DriverError::Spawn { .. })
    }

    /// Captured stdout, when the error carries it.
    pub fn stdout(&self) -> Option<&str> {
        match self {
            DriverError::Timeout { stdout, .. }
            | DriverError::NoMatch { stdout, .. }
            | DriverError::UnexpectedExit { stdout, .. } => Some(stdout),
            _ => None,
        }
    }

    /// Captured stderr, when the error carries it.
    pub fn stderr(&self) -> Option<&str> {
        match self {
            DriverError::Timeout { stderr, .. }
            | DriverError::NoMatch { stderr, .. }
            | DriverError::UnexpectedExit { stderr, .. } => Some(stderr),
            _ => None,
        }
    }
}
