//! Operation Context
//!
//! Per-request metadata (acting user, locale, correlation id) passed as an
//! explicit parameter into every operation. The core never reads this from
//! process-wide state, so it stays thread-safe and testable without request
//! scaffolding.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Locale;

/// Context for an operation, used for audit stamping, message localization
/// and tracing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationContext {
    /// Username stamped into `created_by`/`last_modified_by` audit columns.
    pub actor: String,

    /// Language for localized names and error messages.
    pub locale: Locale,

    /// Correlation ID for request tracing
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<Uuid>,
}

impl OperationContext {
    pub fn new(actor: impl Into<String>) -> Self {
        Self {
            actor: actor.into(),
            locale: Locale::default(),
            correlation_id: None,
        }
    }

    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    pub fn with_correlation_id(mut self, correlation_id: Uuid) -> Self {
        self.correlation_id = Some(correlation_id);
        self
    }

    /// Generate a new correlation ID if not present
    pub fn ensure_correlation_id(&mut self) -> Uuid {
        *self.correlation_id.get_or_insert_with(Uuid::new_v4)
    }
}

impl Default for OperationContext {
    fn default() -> Self {
        Self::new("anonymous")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_builder() {
        let correlation_id = Uuid::new_v4();
        let context = OperationContext::new("admin")
            .with_locale(Locale::Ru)
            .with_correlation_id(correlation_id);

        assert_eq!(context.actor, "admin");
        assert_eq!(context.locale, Locale::Ru);
        assert_eq!(context.correlation_id, Some(correlation_id));
    }

    #[test]
    fn test_default_context() {
        let context = OperationContext::default();
        assert_eq!(context.actor, "anonymous");
        assert_eq!(context.locale, Locale::Uz);
        assert!(context.correlation_id.is_none());
    }

    #[test]
    fn test_ensure_correlation_id() {
        let mut context = OperationContext::new("admin");
        let id = context.ensure_correlation_id();
        assert_eq!(context.correlation_id, Some(id));
        assert_eq!(context.ensure_correlation_id(), id);
    }
}
