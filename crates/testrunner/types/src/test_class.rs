//! Runnable test units
//!
//! A [`TestClass`] is the capability the runner needs from a unit of test
//! logic: a stable name, the list of test methods it exposes and a way to
//! build a fresh instance to run one method on. The registry and dispatcher
//! only ever hold [`TestClassRef`] handles and never look inside.

use crate::context::ExecutionContext;
use serde::{Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Deref;
use std::sync::Arc;

/// Error returned when a test instance cannot be constructed
pub type InstantiationError = Box<dyn std::error::Error + Send + Sync>;

/// Outcome of running a single test method
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TestOutcome {
    /// The method completed and all its checks held
    Passed,

    /// A check inside the method did not hold
    Failed { message: String },

    /// The method broke unexpectedly (not a failed check)
    Errored { kind: String, message: String },
}

impl TestOutcome {
    pub fn failed(message: impl Into<String>) -> Self {
        TestOutcome::Failed {
            message: message.into(),
        }
    }

    pub fn errored(kind: impl Into<String>, message: impl Into<String>) -> Self {
        TestOutcome::Errored {
            kind: kind.into(),
            message: message.into(),
        }
    }

    pub fn is_passed(&self) -> bool {
        matches!(self, TestOutcome::Passed)
    }
}

impl From<Result<(), String>> for TestOutcome {
    fn from(result: Result<(), String>) -> Self {
        match result {
            Ok(()) => TestOutcome::Passed,
            Err(message) => TestOutcome::Failed { message },
        }
    }
}

/// One fresh instance of a test class, used for exactly one test method
pub trait TestInstance: Send {
    /// Pull dependencies out of the ambient context before the method runs
    fn inject(&mut self, _context: &ExecutionContext) {}

    /// Run the named test method
    fn run_test(&mut self, method: &str) -> TestOutcome;
}

/// A runnable unit of test logic
pub trait TestClass: Send + Sync + fmt::Debug {
    /// Fully qualified, unique name
    fn name(&self) -> &str;

    /// Name without its module path
    fn simple_name(&self) -> &str {
        let name = self.name();
        name.rsplit(['.', ':']).next().unwrap_or(name)
    }

    /// Names of the test methods to run, in execution order
    fn test_methods(&self) -> Vec<String>;

    /// Build a fresh instance
    fn instantiate(&self) -> Result<Box<dyn TestInstance>, InstantiationError>;
}

/// Shared handle to a registered test class.
///
/// Identity, equality and ordering all follow [`TestClass::name`].
#[derive(Clone)]
pub struct TestClassRef(Arc<dyn TestClass>);

impl TestClassRef {
    pub fn new<C: TestClass + 'static>(class: C) -> Self {
        Self(Arc::new(class))
    }

    pub fn from_arc(class: Arc<dyn TestClass>) -> Self {
        Self(class)
    }
}

impl Deref for TestClassRef {
    type Target = dyn TestClass;

    fn deref(&self) -> &Self::Target {
        self.0.as_ref()
    }
}

impl PartialEq for TestClassRef {
    fn eq(&self, other: &Self) -> bool {
        self.name() == other.name()
    }
}

impl Eq for TestClassRef {}

impl Hash for TestClassRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name().hash(state);
    }
}

impl PartialOrd for TestClassRef {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TestClassRef {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name().cmp(other.name())
    }
}

impl fmt::Debug for TestClassRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TestClassRef({})", self.name())
    }
}

impl fmt::Display for TestClassRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for TestClassRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

type TestFn = Arc<dyn Fn(&ExecutionContext) -> TestOutcome + Send + Sync>;

/// Test class assembled from closures.
///
/// Each closure is one test method; it receives the context injected into
/// its fresh instance.
#[derive(Clone)]
pub struct FnTestClass {
    name: String,
    methods: Vec<(String, TestFn)>,
}

impl FnTestClass {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            methods: Vec::new(),
        }
    }

    /// Add a test method
    pub fn with_test<F>(mut self, method: impl Into<String>, test: F) -> Self
    where
        F: Fn(&ExecutionContext) -> TestOutcome + Send + Sync + 'static,
    {
        self.methods.push((method.into(), Arc::new(test)));
        self
    }

    pub fn into_ref(self) -> TestClassRef {
        TestClassRef::new(self)
    }
}

impl fmt::Debug for FnTestClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnTestClass")
            .field("name", &self.name)
            .field("methods", &self.test_methods())
            .finish()
    }
}

impl TestClass for FnTestClass {
    fn name(&self) -> &str {
        &self.name
    }

    fn test_methods(&self) -> Vec<String> {
        self.methods.iter().map(|(name, _)| name.clone()).collect()
    }

    fn instantiate(&self) -> Result<Box<dyn TestInstance>, InstantiationError> {
        Ok(Box::new(FnTestInstance {
            methods: self.methods.clone(),
            context: ExecutionContext::default(),
        }))
    }
}

struct FnTestInstance {
    methods: Vec<(String, TestFn)>,
    context: ExecutionContext,
}

impl TestInstance for FnTestInstance {
    fn inject(&mut self, context: &ExecutionContext) {
        self.context = context.clone();
    }

    fn run_test(&mut self, method: &str) -> TestOutcome {
        match self.methods.iter().find(|(name, _)| name == method) {
            Some((_, test)) => test(&self.context),
            None => TestOutcome::errored("NoSuchMethod", format!("no test method named {method}")),
        }
    }
}
