use thiserror::Error;

/// Errors from conversation history storage.
///
/// An absent record is not an error: stores return an empty history instead.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to decode conversation '{session_id}': {message}")]
    Decode { session_id: String, message: String },

    #[error("failed to encode conversation: {0}")]
    Encode(String),

    #[error("object storage error: {0}")]
    Backend(String),
}

/// Rejection reasons for a client-supplied session id.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionIdError {
    #[error("session id must not be empty")]
    Empty,

    #[error("session id is {0} bytes long (max 128)")]
    TooLong(usize),

    #[error("session id contains invalid character '{0}'")]
    InvalidChar(char),
}

/// Errors raised while building configuration at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required setting: {0}")]
    Missing(&'static str),

    #[error("invalid value for {key}: {message}")]
    Invalid { key: &'static str, message: String },

    #[error("failed to read config file {path}: {message}")]
    File { path: String, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_display() {
        let err = StoreError::Decode {
            session_id: "abc".to_string(),
            message: "expected value".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "failed to decode conversation 'abc': expected value"
        );
    }

    #[test]
    fn test_store_error_from_io() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: StoreError = io.into();
        assert!(matches!(err, StoreError::Io(_)));
        assert!(err.to_string().contains("denied"));
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::Missing("OPENAI_API_KEY");
        assert_eq!(err.to_string(), "missing required setting: OPENAI_API_KEY");
    }
}
