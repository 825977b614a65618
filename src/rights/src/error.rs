//! Error types for the rights engine

use thiserror::Error;

/// Rights engine errors
#[derive(Debug, Error)]
pub enum RightsError {
    /// Malformed rule, invalid custom scope binding or invalid config
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// No handler applied to the resolved scope, or an explicit reject
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Role is not defined in the registry
    #[error("Role not found: {0}")]
    RoleNotFound(String),

    /// Same scope kind registered twice in one handler set
    #[error("Handler already registered for scope '{0}'")]
    DuplicateHandler(String),

    /// No authorization decision was attempted on the context
    #[error("Authorization was never checked for this context")]
    Unchecked,

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl RightsError {
    /// Unauthorized error for an (action, resource) pair
    pub fn unauthorized(action: &str, resource: &str) -> Self {
        Self::Unauthorized(format!("cannot {} {}", action, resource))
    }

    /// Whether this error is an access denial
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized(_))
    }

    /// Whether this error comes from invalid rights configuration
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }
}

/// Result type for rights operations
pub type Result<T> = std::result::Result<T, RightsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unauthorized_display() {
        let err = RightsError::unauthorized("read", "users");
        assert_eq!(err.to_string(), "Unauthorized: cannot read users");
        assert!(err.is_unauthorized());
        assert!(!err.is_configuration());
    }

    #[test]
    fn test_configuration_kind() {
        let err = RightsError::Configuration("bad rule".to_string());
        assert!(err.is_configuration());
        assert!(!err.is_unauthorized());
    }
}
