//! # Test Runner Policy
//!
//! Decides whether tests may run at all, and whether a given test type may
//! run right now.
//!
//! ## Overview
//!
//! The policy is four independent switches plus the automatic run delay:
//!
//! - **enabled**: global switch; when off nothing runs and every type
//!   parameter reads as `false`
//! - **integration / load / validation**: one switch per [`TestsType`]
//! - **automatic delay**: seconds to wait before the startup run
//!   (negative = never, zero = immediately)
//!
//! ## Example
//!
//! ```rust
//! use testrunner_policy::{FlagPolicyGate, PolicyConfig, PolicyGate};
//! use testrunner_types::TestsType;
//!
//! let gate = FlagPolicyGate::new(PolicyConfig::default());
//! assert!(gate.param(TestsType::Integration));
//! assert!(!gate.param(TestsType::Load));
//!
//! gate.set_param("testrunner.load", true).unwrap();
//! assert!(gate.param(TestsType::Load));
//!
//! gate.set_enabled(false);
//! assert_eq!(gate.get_param("testrunner.load"), Ok(false));
//! assert!(gate.get_param("testrunner.bogus").is_err());
//! ```
//!
//! [`TestsType`]: testrunner_types::TestsType

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]

pub mod config;
pub mod gate;

// Re-exports
pub use config::PolicyConfig;
pub use gate::{FlagPolicyGate, PolicyGate};
