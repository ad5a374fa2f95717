use serde::{Deserialize, Serialize};
use std::fmt;

/// Per-request metadata attached to every rendered email.
///
/// Supplied by the caller and read-only to the engine. The `time` field is
/// an already-formatted ISO 8601 string; the engine never parses it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestContext {
    /// ISO 8601 receipt timestamp.
    pub time: String,
    /// Client IP address.
    pub ip: String,
    /// User-Agent header of the submitting client.
    pub user_agent: String,
    /// Server domain used by mailer implementations for the `From:` header.
    pub from_domain: String,
}

impl RequestContext {
    pub fn new(
        time: impl Into<String>,
        ip: impl Into<String>,
        user_agent: impl Into<String>,
    ) -> Self {
        Self {
            time: time.into(),
            ip: ip.into(),
            user_agent: user_agent.into(),
            from_domain: "localhost".to_string(),
        }
    }

    pub fn with_from_domain(mut self, from_domain: impl Into<String>) -> Self {
        self.from_domain = from_domain.into();
        self
    }
}

/// A scalar value carried alongside the primary text in a JSON payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Bool(v) => write!(f, "{v}"),
            Scalar::Int(v) => write!(f, "{v}"),
            Scalar::Float(v) => write!(f, "{v}"),
            Scalar::Text(v) => write!(f, "{v}"),
        }
    }
}

/// Extra key/value fields from a JSON payload, excluding the primary text
/// field. Order is preserved as supplied by the caller.
pub type ExtraFields = Vec<(String, Scalar)>;

/// The result of one render pass: a subject line and a full HTML document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedEmail {
    pub subject: String,
    pub html: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_context_defaults_from_domain() {
        let ctx = RequestContext::new("2024-01-01T00:00:00+00:00", "10.0.0.1", "curl/8.0");
        assert_eq!(ctx.from_domain, "localhost");
    }

    #[test]
    fn request_context_with_from_domain() {
        let ctx = RequestContext::new("t", "ip", "ua").with_from_domain("example.org");
        assert_eq!(ctx.from_domain, "example.org");
    }

    #[test]
    fn scalar_display() {
        assert_eq!(Scalar::Bool(true).to_string(), "true");
        assert_eq!(Scalar::Int(-3).to_string(), "-3");
        assert_eq!(Scalar::Float(1.5).to_string(), "1.5");
        assert_eq!(Scalar::Text("hi".to_string()).to_string(), "hi");
    }
}
