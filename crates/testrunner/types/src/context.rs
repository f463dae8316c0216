//! Ambient execution context handed to test instances
//!
//! The context replaces container-based dependency injection: the host puts
//! named services into the context once, and every fresh test instance pulls
//! what it needs by name before a test method runs.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

type Shared = Arc<dyn Any + Send + Sync>;

/// Named, type-erased values available to test instances
#[derive(Clone, Default)]
pub struct ExecutionContext {
    display_name: String,
    values: Arc<HashMap<String, Shared>>,
}

impl ExecutionContext {
    /// Create an empty context
    pub fn new(display_name: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            values: Arc::new(HashMap::new()),
        }
    }

    /// Add a named value to the context
    pub fn with<T: Any + Send + Sync>(mut self, name: impl Into<String>, value: T) -> Self {
        self.insert_shared(name.into(), Arc::new(value));
        self
    }

    /// Add an already shared value to the context
    pub fn with_shared(mut self, name: impl Into<String>, value: Shared) -> Self {
        self.insert_shared(name.into(), value);
        self
    }

    fn insert_shared(&mut self, name: String, value: Shared) {
        Arc::make_mut(&mut self.values).insert(name, value);
    }

    /// Look up a value by name and type.
    ///
    /// Returns `None` when nothing is registered under `name` or when the
    /// registered value is of a different type.
    pub fn get<T: Any + Send + Sync>(&self, name: &str) -> Option<Arc<T>> {
        self.values
            .get(name)
            .and_then(|value| Arc::clone(value).downcast::<T>().ok())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Names of all values, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.values.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl fmt::Debug for ExecutionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExecutionContext")
            .field("display_name", &self.display_name)
            .field("values", &self.names())
            .finish()
    }
}
