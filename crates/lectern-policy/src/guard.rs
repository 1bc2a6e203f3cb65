//! Guarded operations: an operation composed with its policy at registration time.

use std::collections::BTreeMap;

use lectern_core::{AccessResult, Identity, RawCredential, ResourceRef};
use tracing::debug;

use crate::engine::PolicyEngine;
use crate::shape::PolicyShape;

/// The policy attached to one protected operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyBinding {
    shape: PolicyShape,
    resource_arg: Option<String>,
}

impl PolicyBinding {
    /// Bind `shape` with no resource reference.
    #[must_use]
    pub fn new(shape: PolicyShape) -> Self {
        Self {
            shape,
            resource_arg: None,
        }
    }

    /// Name the caller argument that carries the resource reference.
    #[must_use]
    pub fn with_resource_arg(mut self, name: impl Into<String>) -> Self {
        self.resource_arg = Some(name.into());
        self
    }

    /// The policy shape.
    #[must_use]
    pub fn shape(&self) -> PolicyShape {
        self.shape
    }

    /// The name of the resource argument, if any.
    #[must_use]
    pub fn resource_arg(&self) -> Option<&str> {
        self.resource_arg.as_deref()
    }

    /// Pick the resource reference out of the caller's arguments.
    #[must_use]
    pub fn resource_in(&self, args: &OperationArgs) -> Option<ResourceRef> {
        self.resource_arg
            .as_deref()
            .and_then(|name| args.get(name))
            .map(ResourceRef::from)
    }
}

/// Named string arguments a caller passes to a protected operation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OperationArgs(BTreeMap<String, String>);

impl OperationArgs {
    /// No arguments.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an argument (builder form).
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    /// Add or replace an argument.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    /// Look up an argument by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// The resource reference `binding` names, if the caller supplied it.
    #[must_use]
    pub fn resource_for(&self, binding: &PolicyBinding) -> Option<ResourceRef> {
        binding.resource_in(self)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for OperationArgs {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// An operation that only runs once its policy allows the caller.
///
/// The wrapped closure receives the resolved identity, so it never has to
/// look the caller up again.
pub struct Guarded<F> {
    name: String,
    binding: PolicyBinding,
    operation: F,
}

impl<F, R> Guarded<F>
where
    F: Fn(&Identity, &OperationArgs) -> R,
{
    /// Compose `operation` with `binding`.
    pub fn new(name: impl Into<String>, binding: PolicyBinding, operation: F) -> Self {
        Self {
            name: name.into(),
            binding,
            operation,
        }
    }

    /// The operation's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The operation's policy.
    #[must_use]
    pub fn binding(&self) -> &PolicyBinding {
        &self.binding
    }

    /// Check the caller against the policy, then run the operation.
    ///
    /// # Errors
    ///
    /// Returns the deny error if the check fails; the operation is not invoked.
    pub fn call(
        &self,
        engine: &PolicyEngine,
        credential: &RawCredential,
        args: &OperationArgs,
    ) -> AccessResult<R> {
        let resource = args.resource_for(&self.binding);
        match engine.authorize_credential(credential, self.binding.shape(), resource.as_ref()) {
            Ok(identity) => Ok((self.operation)(&identity, args)),
            Err(err) => {
                debug!(
                    operation = %self.name,
                    shape = %self.binding.shape(),
                    reason = err.kind(),
                    "protected operation denied"
                );
                Err(err)
            },
        }
    }
}

impl<F> std::fmt::Debug for Guarded<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Guarded")
            .field("name", &self.name)
            .field("binding", &self.binding)
            .finish_non_exhaustive()
    }
}
