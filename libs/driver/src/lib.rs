//! # wfe-driver
//!
//! Runs commands as child processes without blocking the caller, either as
//! shell lines or as a program executed directly.
//!
//! A [`Session`] exposes the live stdout and stderr of its process as
//! append-only buffers plus the eventual exit code. Assertions on a session
//! are bounded waits:
//!
//! - [`Session::say`] waits for a pattern in the unread part of a stream and
//!   moves that stream's cursor past the match, so successive calls assert
//!   output order.
//! - [`Session::exit`] waits for the process to exit with a given code.
//!
//! A non-zero exit code is an observable outcome, not an error. Only a
//! failure to spawn is reported by [`Session::start`].

mod buffer;
mod error;
mod session;

pub use buffer::OutputBuffer;
pub use error::DriverError;
pub use session::{find_executable, shell_quote, CommandSpec, Session, Stream};
