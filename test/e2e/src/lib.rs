//! # wfe-e2e
//!
//! Process scale/restart integration suite for a Workflow-style control
//! plane. The control plane is driven through its CLI as a black box; the
//! oracle is the CLI's process listing plus the HTTP status of the deployed
//! app.
//!
//! ## Flow
//!
//! 1. [`suite::run_suite`] provisions the suite fixtures once: an isolated
//!    HOME, the admin and standard accounts, an SSH key and a git-ssh wrapper.
//! 2. Each [`scenario::Scenario`] runs as its own context on a parallel task,
//!    with a freshly deployed, uniquely named app.
//! 3. Every case scales or restarts the app, scrapes the process identities,
//!    diffs them and probes the app's endpoint.
//! 4. Teardown always runs and never fails the suite.
//!
//! ## Configuration
//!
//! `DEIS_ROUTER_SERVICE_HOST` is required. See [`config`] for the rest.

pub mod contract;

pub use config::Config;
pub use error::{ConfigError, ProbeError, ProvisionError};
pub use fixtures::{AccountFixture, AppFixture, KeyFixture, Provisioner, SuiteFixtures};
pub use naming::NameAllocator;
pub use probe::{HttpProber, StatusProbe};
pub use report::{ContextReport, OutputFormat, SuiteReport};
pub use scenario::{
    restart_scenario, scale_scenario, CaseOutcome, RestartCase, RestartScope, ScaleCase, Scenario,
    ScenarioCase, ScenarioRunner, Verdict,
};
pub use suite::run_suite;
