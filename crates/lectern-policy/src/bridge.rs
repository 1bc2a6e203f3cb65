//! Conversion from `lectern-config` types into policy types.

use std::sync::Arc;

use lectern_config::{Config, OperationPolicyConfig};
use lectern_sessions::InMemorySessionStore;

use crate::gate::Gate;
use crate::guard::PolicyBinding;
use crate::shape::PolicyShape;
use crate::table::{PolicyTable, PolicyTableError, PolicyTableResult};

impl PolicyBinding {
    /// Build a binding from one `[[operations]]` entry.
    ///
    /// # Errors
    ///
    /// Returns [`PolicyTableError::UnknownShape`] for an unrecognised shape name.
    pub fn from_config(entry: &OperationPolicyConfig) -> PolicyTableResult<Self> {
        let shape: PolicyShape = entry.shape.parse().map_err(|_| PolicyTableError::UnknownShape {
            operation: entry.name.clone(),
            shape: entry.shape.clone(),
        })?;
        let binding = Self::new(shape);
        Ok(match entry.resource_arg.as_deref() {
            Some(arg) if !arg.is_empty() => binding.with_resource_arg(arg),
            _ => binding,
        })
    }
}

impl PolicyTable {
    /// Build a table from configured operation entries.
    ///
    /// # Errors
    ///
    /// Fails on unknown shapes, duplicate names, and `student_self`
    /// entries without a resource argument.
    pub fn from_config(entries: &[OperationPolicyConfig]) -> PolicyTableResult<Self> {
        let mut table = Self::new();
        for entry in entries {
            table.register(entry.name.clone(), PolicyBinding::from_config(entry)?)?;
        }
        Ok(table)
    }
}

impl Gate {
    /// Build a gate over a fresh in-memory store from a loaded configuration.
    ///
    /// # Errors
    ///
    /// As for [`PolicyTable::from_config`].
    pub fn from_config(config: &Config) -> PolicyTableResult<Self> {
        let table = PolicyTable::from_config(&config.operations)?;
        let store = InMemorySessionStore::new()
            .with_max_issue_attempts(config.sessions.max_issue_attempts);
        Ok(Self::new(Arc::new(store), table).with_cookie_name(config.sessions.cookie_name.clone()))
    }
}
