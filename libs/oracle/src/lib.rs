//! # wfe-oracle
//!
//! The test oracle for process-lifecycle scenarios.
//!
//! ## Concepts
//!
//! - **Process identity**: one running instance of an application's process,
//!   rendered by the CLI as `<app>-v<release>-<role>-<suffix>`.
//! - **Snapshot**: the set of identities observed for one app at one point.
//! - **Diff**: what changed between two snapshots of the same app.
//!
//! ## Invariants
//!
//! - Snapshots are order-independent and displayed in lexicographic order
//! - Every member of a snapshot belongs to the snapshot's app
//! - Scraping never fails on partial output; zero matches is a valid result
//! - Every wait has a deadline

mod diff;
mod error;
mod identity;
pub mod poll;
pub mod scrape;
mod snapshot;

pub use diff::SnapshotDiff;
pub use error::{IdentityError, PollError, ScrapeError};
pub use identity::ProcessIdentity;
pub use poll::{eventually, Backoff, PollPolicy};
pub use scrape::{extract_process_identities, parse_process_list};
pub use snapshot::ProcessSnapshot;
