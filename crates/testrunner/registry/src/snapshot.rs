//! Point-in-time view of the registry

use std::collections::{BTreeMap, BTreeSet};
use testrunner_types::{TestClassRef, TestsId, TestsType};

/// Every registered group with its type, taken in one consistent read.
///
/// Callers that need to combine several lookups (all classes minus the
/// classes of some types) work on a snapshot so concurrent registrations
/// cannot slip in between the lookups.
#[derive(Debug, Clone, Default)]
pub struct RegistrySnapshot {
    groups: BTreeMap<TestsId, (TestsType, Vec<TestClassRef>)>,
}

impl RegistrySnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(
        &mut self,
        tests_id: TestsId,
        tests_type: TestsType,
        classes: Vec<TestClassRef>,
    ) {
        self.groups.insert(tests_id, (tests_type, classes));
    }

    /// Distinct classes, optionally limited to one type, sorted by name
    pub fn classes(&self, tests_type: Option<TestsType>) -> Vec<TestClassRef> {
        let classes: BTreeSet<TestClassRef> = self
            .groups
            .values()
            .filter(|(ty, _)| tests_type.map_or(true, |wanted| *ty == wanted))
            .flat_map(|(_, classes)| classes.iter().cloned())
            .collect();
        classes.into_iter().collect()
    }

    /// Types owning at least one group, sorted
    pub fn tests_types(&self) -> Vec<TestsType> {
        let types: BTreeSet<TestsType> = self.groups.values().map(|(ty, _)| *ty).collect();
        types.into_iter().collect()
    }

    pub fn tests_type_for(&self, tests_id: &TestsId) -> Option<TestsType> {
        self.groups.get(tests_id).map(|(ty, _)| *ty)
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}
