//! Audit trail for state-changing actions.
//!
//! Events go to the `audit` tracing target so they can be routed apart from
//! request logs (`RUST_LOG=warn,audit=info`).
//!
//! ```ignore
//! use axum_helpers::audit::{AuditEvent, AuditOutcome};
//!
//! AuditEvent::new(Some(claims.email.clone()), "item.delete", AuditOutcome::Success)
//!     .with_resource(format!("item:{}", id))
//!     .with_request(&headers)
//!     .log();
//! ```

use axum::http::HeaderMap;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Outcome of an audited action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditOutcome {
    Success,
    /// Action attempted but failed (storage error, bad credentials)
    Failure,
    /// Caller was authenticated but not allowed
    Denied,
}

/// One audit record. Build it, then call [`AuditEvent::log`].
#[derive(Debug, Serialize)]
pub struct AuditEvent {
    /// Email of the signed-in caller, `None` for anonymous attempts
    pub actor: Option<String>,
    /// Dotted action name such as `item.create` or `auth.sign_in`
    pub action: String,
    /// `kind:id` of the affected record
    pub resource: Option<String>,
    pub outcome: AuditOutcome,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub timestamp: DateTime<Utc>,
    pub details: Option<serde_json::Value>,
}

impl AuditEvent {
    pub fn new(actor: Option<String>, action: impl Into<String>, outcome: AuditOutcome) -> Self {
        Self {
            actor,
            action: action.into(),
            resource: None,
            outcome,
            ip_address: None,
            user_agent: None,
            timestamp: Utc::now(),
            details: None,
        }
    }

    pub fn with_resource(mut self, resource: impl Into<String>) -> Self {
        self.resource = Some(resource.into());
        self
    }

    /// Copies client IP and user agent from the request headers.
    pub fn with_request(mut self, headers: &HeaderMap) -> Self {
        self.ip_address = extract_ip_from_headers(headers);
        self.user_agent = extract_user_agent(headers);
        self
    }

    pub fn with_details(mut self, details: impl Serialize) -> Self {
        self.details = serde_json::to_value(details).ok();
        self
    }

    /// Emit on the `audit` target. Denied and failed outcomes log at warn.
    pub fn log(self) {
        let payload = serde_json::to_string(&self)
            .unwrap_or_else(|_| "Failed to serialize audit event".to_string());

        match self.outcome {
            AuditOutcome::Success => tracing::info!(
                target: "audit",
                actor = self.actor,
                action = %self.action,
                resource = self.resource,
                outcome = ?self.outcome,
                ip = self.ip_address,
                "{}",
                payload
            ),
            AuditOutcome::Failure | AuditOutcome::Denied => tracing::warn!(
                target: "audit",
                actor = self.actor,
                action = %self.action,
                resource = self.resource,
                outcome = ?self.outcome,
                ip = self.ip_address,
                "{}",
                payload
            ),
        }
    }
}

/// Client IP from `X-Forwarded-For` (first hop) or `X-Real-IP`.
pub fn extract_ip_from_headers(headers: &HeaderMap) -> Option<String> {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.split(',').next())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .or_else(|| {
            headers
                .get("x-real-ip")
                .and_then(|v| v.to_str().ok())
                .map(|s| s.trim().to_string())
        })
}

pub fn extract_user_agent(headers: &HeaderMap) -> Option<String> {
    headers
        .get(axum::http::header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_forwarded_for_takes_first_hop() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static("10.0.0.7, 172.16.0.1"));
        headers.insert("x-real-ip", HeaderValue::from_static("192.168.1.1"));
        assert_eq!(extract_ip_from_headers(&headers).as_deref(), Some("10.0.0.7"));
    }

    #[test]
    fn test_real_ip_fallback() {
        let mut headers = HeaderMap::new();
        headers.insert("x-real-ip", HeaderValue::from_static("192.168.1.1"));
        assert_eq!(extract_ip_from_headers(&headers).as_deref(), Some("192.168.1.1"));
        assert_eq!(extract_ip_from_headers(&HeaderMap::new()), None);
    }

    #[test]
    fn test_event_serializes_outcome_lowercase() {
        let mut headers = HeaderMap::new();
        headers.insert("user-agent", HeaderValue::from_static("curl/8.5"));

        let event = AuditEvent::new(Some("ana@campus.edu".into()), "item.delete", AuditOutcome::Denied)
            .with_resource("item:42")
            .with_request(&headers)
            .with_details(serde_json::json!({"reason": "not_owner"}));

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["outcome"], "denied");
        assert_eq!(json["resource"], "item:42");
        assert_eq!(json["user_agent"], "curl/8.5");
        assert_eq!(json["details"]["reason"], "not_owner");

        event.log();
    }
}
