//! Test Runner Registry - which test classes belong to which tests id,
//! and which type each tests id has
//!
//! The registry keeps two indices:
//!
//! - **tests id → test classes**: the group of classes registered under an id
//! - **tests type → tests ids**: the ids currently owning each type
//!
//! Every registered id has exactly one type at a time, and groups are never
//! empty: an id without classes is removed rather than kept around.
//!
//! All lookups take optional id/type filters. `None` means "any".

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]

pub mod error;
pub mod memory;
pub mod registry;
pub mod snapshot;

// Re-exports
pub use error::{RegistryError, Result};
pub use memory::InMemoryTestRegistry;
pub use registry::TestRegistry;
pub use snapshot::RegistrySnapshot;
