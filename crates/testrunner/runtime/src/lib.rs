//! Test Runner Runtime
//!
//! This crate turns the registry and policy into something that runs tests:
//! - Execution primitive running every test method of a class on fresh instances
//! - Dispatcher resolving run requests into test classes and fanning out execution
//! - Startup scheduler for the one-shot automatic run
//! - Service facade owning registry, policy and dispatcher
//! - Run tracking and declarative per-class registration

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]

pub mod config;
pub mod dispatcher;
pub mod error;
pub mod executor;
pub mod logging;
pub mod registration;
pub mod scheduler;
pub mod service;
pub mod tracker;

pub use config::{ExecutionConfig, LoggingConfig, TestRunnerConfig};
pub use dispatcher::Dispatcher;
pub use error::{ExecutionError, Result, TestRunnerError};
pub use executor::{SuiteExecutor, TestExecutor};
pub use logging::init_tracing;
pub use registration::{Activation, TestRegistration};
pub use scheduler::{StartupRun, StartupScheduler};
pub use service::{TestRunnerService, TestRunnerServiceBuilder};
pub use tracker::{RunTracker, TrackedRun};
