//! Request correlation.

use chrono::{DateTime, Utc};
use tracing::span::EnteredSpan;
use tracing::{Span, debug, info_span};
use uuid::Uuid;

/// Identifies one protected call so every event it emits can be tied together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    request_id: Uuid,
    component: String,
    operation: Option<String>,
    started_at: DateTime<Utc>,
}

impl RequestContext {
    /// A fresh context for `component`, with a random request id.
    #[must_use]
    pub fn new(component: impl Into<String>) -> Self {
        Self {
            request_id: Uuid::new_v4(),
            component: component.into(),
            operation: None,
            started_at: Utc::now(),
        }
    }

    /// Name the operation being performed.
    #[must_use]
    pub fn with_operation(mut self, operation: impl Into<String>) -> Self {
        self.operation = Some(operation.into());
        self
    }

    /// Reuse a request id received from upstream.
    #[must_use]
    pub fn with_request_id(mut self, request_id: Uuid) -> Self {
        self.request_id = request_id;
        self
    }

    /// The request id.
    #[must_use]
    pub fn request_id(&self) -> Uuid {
        self.request_id
    }

    /// The component handling the request.
    #[must_use]
    pub fn component(&self) -> &str {
        &self.component
    }

    /// The operation, if named.
    #[must_use]
    pub fn operation(&self) -> Option<&str> {
        self.operation.as_deref()
    }

    /// When the context was created.
    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Milliseconds since the context was created.
    #[must_use]
    pub fn elapsed_ms(&self) -> i64 {
        Utc::now()
            .signed_duration_since(self.started_at)
            .num_milliseconds()
    }

    /// An `info`-level span carrying the request id, component and operation.
    #[must_use]
    pub fn span(&self) -> Span {
        info_span!(
            "request",
            request_id = %self.request_id,
            component = %self.component,
            operation = self.operation.as_deref().unwrap_or("-"),
        )
    }

    /// Enter this context's span until the returned guard is dropped.
    #[must_use]
    pub fn enter(&self) -> RequestGuard {
        RequestGuard {
            context: self.clone(),
            _span: self.span().entered(),
        }
    }
}

/// Keeps a request span entered; logs the elapsed time when dropped.
#[derive(Debug)]
pub struct RequestGuard {
    context: RequestContext,
    _span: EnteredSpan,
}

impl RequestGuard {
    /// The context this guard belongs to.
    #[must_use]
    pub fn context(&self) -> &RequestContext {
        &self.context
    }
}

impl Drop for RequestGuard {
    fn drop(&mut self) {
        debug!(elapsed_ms = self.context.elapsed_ms(), "request finished");
    }
}
