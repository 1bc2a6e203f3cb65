//! Registry of protected operations and their policies.

use std::collections::BTreeMap;

use lectern_core::{AccessError, Identity, RawCredential};

use crate::engine::PolicyEngine;
use crate::guard::{OperationArgs, PolicyBinding};

/// Errors raised while building or consulting a [`PolicyTable`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PolicyTableError {
    /// The operation was never registered. Such calls are refused.
    #[error("unknown operation '{0}'")]
    UnknownOperation(String),

    /// The operation name is already registered.
    #[error("operation '{0}' is registered twice")]
    DuplicateOperation(String),

    /// The operation name is empty.
    #[error("operation name must not be empty")]
    EmptyOperationName,

    /// A shape that needs a resource reference was bound without one.
    #[error("operation '{operation}' uses student_self but names no resource argument")]
    MissingResourceArg {
        /// The offending operation.
        operation: String,
    },

    /// A configured shape name is not one of the five known shapes.
    #[error("operation '{operation}' uses unknown policy shape '{shape}'")]
    UnknownShape {
        /// The offending operation.
        operation: String,
        /// The unrecognised shape name.
        shape: String,
    },

    /// The access check itself denied the caller.
    #[error(transparent)]
    Access(#[from] AccessError),
}

impl PolicyTableError {
    /// The access denial, if this error is one.
    #[must_use]
    pub fn as_access(&self) -> Option<&AccessError> {
        match self {
            Self::Access(err) => Some(err),
            _ => None,
        }
    }
}

/// Result type for policy table operations.
pub type PolicyTableResult<T> = Result<T, PolicyTableError>;

/// Maps operation names to the policy each one runs under.
#[derive(Debug, Clone, Default)]
pub struct PolicyTable {
    bindings: BTreeMap<String, PolicyBinding>,
}

impl PolicyTable {
    /// An empty table. Every lookup fails closed until operations are registered.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `operation` under `binding`.
    ///
    /// # Errors
    ///
    /// Refuses empty or duplicate names, and shapes that need a resource
    /// argument the binding does not name.
    pub fn register(
        &mut self,
        operation: impl Into<String>,
        binding: PolicyBinding,
    ) -> PolicyTableResult<()> {
        let operation = operation.into();
        if operation.trim().is_empty() {
            return Err(PolicyTableError::EmptyOperationName);
        }
        if binding.shape().requires_resource() && binding.resource_arg().is_none() {
            return Err(PolicyTableError::MissingResourceArg { operation });
        }
        if self.bindings.contains_key(&operation) {
            return Err(PolicyTableError::DuplicateOperation(operation));
        }
        self.bindings.insert(operation, binding);
        Ok(())
    }

    /// Builder form of [`register`](Self::register).
    ///
    /// # Errors
    ///
    /// As for `register`.
    pub fn with(
        mut self,
        operation: impl Into<String>,
        binding: PolicyBinding,
    ) -> PolicyTableResult<Self> {
        self.register(operation, binding)?;
        Ok(self)
    }

    /// The binding registered for `operation`.
    #[must_use]
    pub fn binding(&self, operation: &str) -> Option<&PolicyBinding> {
        self.bindings.get(operation)
    }

    /// Registered operation names, sorted.
    pub fn operations(&self) -> impl Iterator<Item = &str> {
        self.bindings.keys().map(String::as_str)
    }

    /// Number of registered operations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Whether no operations are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Check the caller of `operation` against its registered policy.
    ///
    /// # Errors
    ///
    /// Returns [`PolicyTableError::UnknownOperation`] for unregistered
    /// operations, or [`PolicyTableError::Access`] carrying the denial.
    pub fn authorize(
        &self,
        engine: &PolicyEngine,
        operation: &str,
        credential: &RawCredential,
        args: &OperationArgs,
    ) -> PolicyTableResult<Identity> {
        let binding = self
            .binding(operation)
            .ok_or_else(|| PolicyTableError::UnknownOperation(operation.to_owned()))?;
        let resource = args.resource_for(binding);
        Ok(engine.authorize_credential(credential, binding.shape(), resource.as_ref())?)
    }
}
