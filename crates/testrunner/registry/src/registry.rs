//! Test registry trait
//!
//! Registration happens at startup from many independent collaborators while
//! lookups come from admin tooling and scheduled runs, so implementations
//! must be safe to share between threads without external locking.

use crate::error::Result;
use crate::snapshot::RegistrySnapshot;
use testrunner_types::{TestClassRef, TestsId, TestsType};

/// Registry of test groups
pub trait TestRegistry: Send + Sync {
    /// Register test classes under a tests id.
    ///
    /// Classes are merged into an existing group of the same type. If the id
    /// is currently registered under a different type it is unregistered
    /// first, so the group afterwards holds only `classes`.
    fn register_tests(
        &self,
        tests_id: &TestsId,
        tests_type: TestsType,
        classes: Vec<TestClassRef>,
    ) -> Result<()>;

    /// Remove registrations.
    ///
    /// - neither set: remove everything
    /// - id only: remove the id from every type and drop its group
    /// - type only: remove every id of that type and drop their groups
    /// - both: remove the id only if it currently has exactly that type
    ///
    /// Unknown ids and types are a no-op.
    fn unregister_tests(&self, tests_id: Option<&TestsId>, tests_type: Option<TestsType>);

    /// Registered test classes matching the filters.
    ///
    /// Never fails; unknown ids or an id registered under another type than
    /// requested give an empty list.
    fn registered_tests(
        &self,
        tests_id: Option<&TestsId>,
        tests_type: Option<TestsType>,
    ) -> Vec<TestClassRef>;

    /// Registered tests ids, sorted, optionally restricted to a type
    fn tests_ids(&self, tests_type: Option<TestsType>) -> Vec<TestsId>;

    /// The type owning a tests id, `None` when the id is not registered
    fn tests_type_for(&self, tests_id: &TestsId) -> Option<TestsType>;

    /// Types that currently have at least one registered tests id
    fn tests_types(&self) -> Vec<TestsType>;

    /// All groups and their types as one consistent view
    fn snapshot(&self) -> RegistrySnapshot;

    /// Number of distinct registered test classes
    fn class_count(&self) -> usize {
        self.registered_tests(None, None).len()
    }
}
