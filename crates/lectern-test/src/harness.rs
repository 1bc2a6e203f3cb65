//! Pre-wired gate for tests.

use std::ops::Deref;
use std::sync::{Arc, Once};

use lectern_policy::{Gate, PolicyBinding, PolicyShape, PolicyTable, PolicyTableResult};
use lectern_sessions::InMemorySessionStore;
use tracing_subscriber::EnvFilter;

use crate::mocks::ScriptedTokenSource;

static TRACING: Once = Once::new();

/// Install a test-writer subscriber once per process.
///
/// Honours `RUST_LOG`; defaults to `warn`. Safe to call from every test.
pub fn init_test_tracing() {
    TRACING.call_once(|| {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}

/// The operations every [`TestGate`] registers.
///
/// | Operation | Shape | Resource argument |
/// |---|---|---|
/// | `list_courses` | authenticated | - |
/// | `view_course` | teacher_or_student | - |
/// | `view_grades` | student_self | `student_id` |
/// | `create_course` | teacher_only | - |
/// | `grade_submission` | teacher_on_resource | `course_id` |
///
/// # Errors
///
/// Never in practice; the table is statically valid.
pub fn school_table() -> PolicyTableResult<PolicyTable> {
    PolicyTable::new()
        .with("list_courses", PolicyBinding::new(PolicyShape::Authenticated))?
        .with("view_course", PolicyBinding::new(PolicyShape::TeacherOrStudent))?
        .with(
            "view_grades",
            PolicyBinding::new(PolicyShape::StudentSelf).with_resource_arg("student_id"),
        )?
        .with("create_course", PolicyBinding::new(PolicyShape::TeacherOnly))?
        .with(
            "grade_submission",
            PolicyBinding::new(PolicyShape::TeacherOnResource).with_resource_arg("course_id"),
        )
}

/// A [`Gate`] over an in-memory store whose tokens come from a
/// [`ScriptedTokenSource`], with [`school_table`] registered.
#[derive(Debug, Clone)]
pub struct TestGate {
    gate: Gate,
    source: Arc<ScriptedTokenSource>,
    store: Arc<InMemorySessionStore>,
}

impl TestGate {
    /// A harness whose token source yields only fallback values.
    ///
    /// # Panics
    ///
    /// If [`school_table`] fails to build.
    #[must_use]
    pub fn new() -> Self {
        Self::with_source(ScriptedTokenSource::default())
    }

    /// A harness whose token source yields `values` first.
    #[must_use]
    pub fn with_script<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_source(ScriptedTokenSource::new(values))
    }

    fn with_source(source: ScriptedTokenSource) -> Self {
        init_test_tracing();
        let source = Arc::new(source);
        let store = Arc::new(InMemorySessionStore::with_source(source.clone()));
        let table = school_table().expect("school table is statically valid");
        tracing::debug!(
            operations = table.len(),
            scripted = source.remaining(),
            "test gate ready"
        );
        let gate = Gate::new(store.clone(), table);
        Self {
            gate,
            source,
            store,
        }
    }

    /// The scripted token source, for queueing more values.
    #[must_use]
    pub fn source(&self) -> &ScriptedTokenSource {
        &self.source
    }

    /// The concrete session store.
    #[must_use]
    pub fn sessions(&self) -> &InMemorySessionStore {
        &self.store
    }
}

impl Default for TestGate {
    fn default() -> Self {
        Self::new()
    }
}

impl Deref for TestGate {
    type Target = Gate;

    fn deref(&self) -> &Gate {
        &self.gate
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{bearer, teacher};
    use lectern_policy::OperationArgs;
    use lectern_sessions::SessionStore;

    #[test]
    fn test_school_table_registers_every_shape() {
        let table = school_table().unwrap();
        assert_eq!(table.len(), 5);
    }

    #[test]
    fn test_harness_registers_school_table() {
        let harness = TestGate::new();
        let ops: Vec<&str> = harness.table().operations().collect();
        assert_eq!(
            ops,
            vec!["create_course", "grade_submission", "list_courses", "view_course", "view_grades"]
        );
    }

    #[test]
    fn test_harness_uses_script() {
        let harness = TestGate::with_script(["T1"]);
        let token = harness.sign_in(teacher()).unwrap();
        assert_eq!(token.value(), "T1");
        assert!(
            harness
                .authorize("create_course", &bearer(&token), &OperationArgs::new())
                .is_ok()
        );
        assert_eq!(harness.sessions().len(), 1);
    }
}
