use std::fmt;

use thiserror::Error;

/// Which upstream service a record or failure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Storefront,
    ContentManagement,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceKind::Storefront => f.write_str("storefront"),
            SourceKind::ContentManagement => f.write_str("content-management"),
        }
    }
}

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("{source_kind} orders request failed with status {status}: {body}")]
    UpstreamStatus {
        source_kind: SourceKind,
        status: u16,
        body: String,
    },
    #[error("{source_kind} orders request failed: {message}")]
    UpstreamTransport {
        source_kind: SourceKind,
        message: String,
    },
    #[error("{source_kind} orders response is not valid JSON: {message}")]
    UpstreamDecode {
        source_kind: SourceKind,
        message: String,
    },
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Session not found or expired")]
    SessionNotFound,
    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    /// Short variant name, reported as `details.name` in error envelopes.
    pub fn name(&self) -> &'static str {
        match self {
            DomainError::UpstreamStatus { .. } => "UpstreamStatus",
            DomainError::UpstreamTransport { .. } => "UpstreamTransport",
            DomainError::UpstreamDecode { .. } => "UpstreamDecode",
            DomainError::InvalidCredentials => "InvalidCredentials",
            DomainError::SessionNotFound => "SessionNotFound",
            DomainError::Internal(_) => "Internal",
        }
    }

    /// The upstream involved in the failure, if any.
    pub fn source_kind(&self) -> Option<SourceKind> {
        match self {
            DomainError::UpstreamStatus { source_kind, .. }
            | DomainError::UpstreamTransport { source_kind, .. }
            | DomainError::UpstreamDecode { source_kind, .. } => Some(*source_kind),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_status_embeds_status_and_body() {
        let err = DomainError::UpstreamStatus {
            source_kind: SourceKind::Storefront,
            status: 502,
            body: "Bad Gateway".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "storefront orders request failed with status 502: Bad Gateway"
        );
        assert_eq!(err.name(), "UpstreamStatus");
        assert_eq!(err.source_kind(), Some(SourceKind::Storefront));
    }

    #[test]
    fn internal_has_no_source_kind() {
        let err = DomainError::Internal("boom".to_string());
        assert_eq!(err.source_kind(), None);
        assert_eq!(err.to_string(), "Internal error: boom");
    }
}
