use thiserror::Error;

/// Errors surfaced by scan, crush, and counter operations.
///
/// Every variant is recoverable at the operation boundary: enumeration
/// failures leave the session view at its previous state, removal failures
/// never abort a bulk crush, and persistence failures degrade to an
/// in-memory counter. Nothing here is fatal to the hosting process.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CrushError {
    /// The cookie store failed to enumerate cookies for a domain filter.
    #[error("cookie enumeration failed for {domain}: {message}")]
    Enumeration { domain: String, message: String },

    /// The cookie store reported a removal as failed or declined it
    /// without raising an error of its own.
    #[error("cookie removal failed for {name} at {host}")]
    Removal { name: String, host: String },

    /// The key-value store backing the kill counter failed.
    #[error("kill counter persistence failed: {message}")]
    Persistence { message: String },
}

impl CrushError {
    /// Create an enumeration error for a domain query.
    pub fn enumeration(domain: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Enumeration {
            domain: domain.into(),
            message: message.into(),
        }
    }

    /// Create a removal error for a single cookie.
    pub fn removal(name: impl Into<String>, host: impl Into<String>) -> Self {
        Self::Removal {
            name: name.into(),
            host: host.into(),
        }
    }

    /// Create a persistence error for the kill counter store.
    pub fn persistence(message: impl Into<String>) -> Self {
        Self::Persistence {
            message: message.into(),
        }
    }
}

/// Result type alias for crush operations.
pub type CrushResult<T> = Result<T, CrushError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CrushError::enumeration("example.com", "store unavailable");
        assert_eq!(
            err.to_string(),
            "cookie enumeration failed for example.com: store unavailable"
        );

        let err = CrushError::removal("_ga", "example.com");
        assert_eq!(err.to_string(), "cookie removal failed for _ga at example.com");
    }

    #[test]
    fn test_errors_are_comparable() {
        assert_eq!(
            CrushError::persistence("disk full"),
            CrushError::persistence("disk full")
        );
        assert_ne!(
            CrushError::persistence("disk full"),
            CrushError::persistence("read-only")
        );
    }
}
