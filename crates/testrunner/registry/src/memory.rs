//! In-memory implementation of the test registry
//!
//! Both `DashMap` indices sit behind one `RwLock`: mutations take it for
//! writing so the cross-index rule (one type per tests id) holds even when two
//! callers register the same id under different types at the same time, and
//! every read that combines the indices takes it for reading so it never sees
//! a group whose type bucket is not written yet. Single-index reads stay
//! lock-free. No shard guard of one index is held while the other index is
//! touched.

use crate::error::{RegistryError, Result};
use crate::registry::TestRegistry;
use crate::snapshot::RegistrySnapshot;
use dashmap::DashMap;
use parking_lot::RwLock;
use std::collections::HashSet;
use testrunner_types::{TestClassRef, TestsId, TestsType};

/// In-memory test registry
pub struct InMemoryTestRegistry {
    groups: DashMap<TestsId, HashSet<TestClassRef>>,
    by_type: DashMap<TestsType, HashSet<TestsId>>,
    lock: RwLock<()>,
}

impl InMemoryTestRegistry {
    pub fn new() -> Self {
        Self {
            groups: DashMap::new(),
            by_type: DashMap::new(),
            lock: RwLock::new(()),
        }
    }

    fn type_of(&self, tests_id: &TestsId) -> Option<TestsType> {
        self.by_type
            .iter()
            .find(|entry| entry.value().contains(tests_id))
            .map(|entry| *entry.key())
    }

    fn ids_of_type(&self, tests_type: TestsType) -> Vec<TestsId> {
        self.by_type
            .get(&tests_type)
            .map(|ids| ids.iter().cloned().collect())
            .unwrap_or_default()
    }

    fn classes_of(&self, tests_id: &TestsId) -> Vec<TestClassRef> {
        self.groups
            .get(tests_id)
            .map(|classes| classes.iter().cloned().collect())
            .unwrap_or_default()
    }

    fn remove_id_everywhere(&self, tests_id: &TestsId) {
        self.groups.remove(tests_id);
        for mut ids in self.by_type.iter_mut() {
            ids.remove(tests_id);
        }
        self.by_type.retain(|_, ids| !ids.is_empty());
    }

    fn remove_type(&self, tests_type: TestsType) {
        if let Some((_, ids)) = self.by_type.remove(&tests_type) {
            for id in &ids {
                self.groups.remove(id);
            }
        }
    }

    fn remove_id_of_type(&self, tests_id: &TestsId, tests_type: TestsType) {
        let removed = self
            .by_type
            .get_mut(&tests_type)
            .map(|mut ids| ids.remove(tests_id))
            .unwrap_or(false);

        if removed {
            self.groups.remove(tests_id);
            self.by_type.remove_if(&tests_type, |_, ids| ids.is_empty());
        }
    }
}

impl Default for InMemoryTestRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl TestRegistry for InMemoryTestRegistry {
    fn register_tests(
        &self,
        tests_id: &TestsId,
        tests_type: TestsType,
        classes: Vec<TestClassRef>,
    ) -> Result<()> {
        if classes.is_empty() {
            return Err(RegistryError::EmptyRegistration(tests_id.clone()));
        }

        let _guard = self.lock.write();

        if let Some(current) = self.type_of(tests_id) {
            if current != tests_type {
                tracing::debug!(
                    tests_id = %tests_id,
                    from = %current,
                    to = %tests_type,
                    "Changing tests type, dropping previous registration"
                );
                self.remove_id_everywhere(tests_id);
            }
        }

        let count = classes.len();
        self.groups
            .entry(tests_id.clone())
            .or_default()
            .extend(classes);

        self.by_type
            .entry(tests_type)
            .or_default()
            .insert(tests_id.clone());

        tracing::debug!(
            tests_id = %tests_id,
            tests_type = %tests_type,
            count = count,
            "Registered tests"
        );

        Ok(())
    }

    fn unregister_tests(&self, tests_id: Option<&TestsId>, tests_type: Option<TestsType>) {
        let _guard = self.lock.write();

        match (tests_id, tests_type) {
            (None, None) => {
                self.groups.clear();
                self.by_type.clear();
                tracing::debug!("Unregistered all tests");
            }
            (Some(id), None) => {
                self.remove_id_everywhere(id);
                tracing::debug!(tests_id = %id, "Unregistered tests");
            }
            (None, Some(ty)) => {
                self.remove_type(ty);
                tracing::debug!(tests_type = %ty, "Unregistered all tests of type");
            }
            (Some(id), Some(ty)) => {
                self.remove_id_of_type(id, ty);
                tracing::debug!(tests_id = %id, tests_type = %ty, "Unregistered tests");
            }
        }
    }

    fn registered_tests(
        &self,
        tests_id: Option<&TestsId>,
        tests_type: Option<TestsType>,
    ) -> Vec<TestClassRef> {
        match (tests_id, tests_type) {
            (None, None) => {
                let all: HashSet<TestClassRef> = self
                    .groups
                    .iter()
                    .flat_map(|group| group.value().iter().cloned().collect::<Vec<_>>())
                    .collect();
                all.into_iter().collect()
            }
            (None, Some(ty)) => {
                let _guard = self.lock.read();
                let all: HashSet<TestClassRef> = self
                    .ids_of_type(ty)
                    .iter()
                    .flat_map(|id| self.classes_of(id))
                    .collect();
                all.into_iter().collect()
            }
            (Some(id), None) => self.classes_of(id),
            (Some(id), Some(ty)) => {
                let _guard = self.lock.read();
                let has_type = self
                    .by_type
                    .get(&ty)
                    .map(|ids| ids.contains(id))
                    .unwrap_or(false);
                if has_type {
                    self.classes_of(id)
                } else {
                    Vec::new()
                }
            }
        }
    }

    fn tests_ids(&self, tests_type: Option<TestsType>) -> Vec<TestsId> {
        let mut ids: Vec<TestsId> = match tests_type {
            None => self.groups.iter().map(|group| group.key().clone()).collect(),
            Some(ty) => self.ids_of_type(ty),
        };
        ids.sort();
        ids
    }

    fn tests_type_for(&self, tests_id: &TestsId) -> Option<TestsType> {
        let _guard = self.lock.read();
        if !self.groups.contains_key(tests_id) {
            return None;
        }
        self.type_of(tests_id)
    }

    fn tests_types(&self) -> Vec<TestsType> {
        let mut types: Vec<TestsType> = self.by_type.iter().map(|entry| *entry.key()).collect();
        types.sort();
        types
    }

    fn snapshot(&self) -> RegistrySnapshot {
        let _guard = self.lock.read();

        let typed_ids: Vec<(TestsType, Vec<TestsId>)> = self
            .by_type
            .iter()
            .map(|entry| (*entry.key(), entry.value().iter().cloned().collect()))
            .collect();

        let mut snapshot = RegistrySnapshot::new();
        for (tests_type, ids) in typed_ids {
            for tests_id in ids {
                let classes = self.classes_of(&tests_id);
                if !classes.is_empty() {
                    snapshot.insert(tests_id, tests_type, classes);
                }
            }
        }
        snapshot
    }
}
