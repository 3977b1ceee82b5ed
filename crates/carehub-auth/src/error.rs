//! Authentication and authorization error types.
//!
//! Login failures collapse into [`AuthError::InvalidCredentials`]. Token
//! failures keep three distinct kinds for logging, although callers see a
//! single unauthorized outcome for all of them.

use std::fmt;

use carehub_storage::StorageError;

/// Errors that can occur during authentication and authorization operations.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Unknown username, wrong secret, or hospital mismatch at login.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// No bearer credential was presented.
    #[error("Missing token")]
    MissingToken,

    /// The presented credential is not a parseable signed token.
    #[error("Malformed token: {message}")]
    MalformedToken {
        /// Description of why the token could not be parsed.
        message: String,
    },

    /// The token signature does not verify or the token has expired.
    #[error("Invalid or expired token: {message}")]
    InvalidOrExpiredToken {
        /// Description of why the token was rejected.
        message: String,
    },

    /// The caller attempted a write outside its own hospital.
    #[error("Forbidden: {message}")]
    Forbidden {
        /// Description of why access is forbidden.
        message: String,
    },

    /// The record is absent or belongs to another hospital.
    #[error("Not found: {kind}/{id}")]
    NotFound {
        /// The kind of record requested.
        kind: String,
        /// The requested identifier.
        id: String,
    },

    /// The request payload or parameters are invalid.
    #[error("Invalid request: {message}")]
    InvalidRequest {
        /// Description of why the request is invalid.
        message: String,
    },

    /// The record conflicts with an existing one.
    #[error("Conflict: {message}")]
    Conflict {
        /// Description of the conflict.
        message: String,
    },

    /// The record store failed.
    #[error("Storage error: {message}")]
    Storage {
        /// Description of the storage error.
        message: String,
    },

    /// The auth configuration is invalid.
    #[error("Configuration error: {message}")]
    Configuration {
        /// Description of the configuration error.
        message: String,
    },

    /// An unexpected internal error occurred.
    #[error("Internal error: {message}")]
    Internal {
        /// Description of the internal error.
        message: String,
    },
}

impl AuthError {
    /// Creates a new `MalformedToken` error.
    #[must_use]
    pub fn malformed_token(message: impl Into<String>) -> Self {
        Self::MalformedToken {
            message: message.into(),
        }
    }

    /// Creates a new `InvalidOrExpiredToken` error.
    #[must_use]
    pub fn invalid_or_expired(message: impl Into<String>) -> Self {
        Self::InvalidOrExpiredToken {
            message: message.into(),
        }
    }

    /// Creates a new `Forbidden` error.
    #[must_use]
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden {
            message: message.into(),
        }
    }

    /// Creates a new `NotFound` error.
    #[must_use]
    pub fn not_found(kind: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            kind: kind.into(),
            id: id.into(),
        }
    }

    /// Creates a new `InvalidRequest` error.
    #[must_use]
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    /// Creates a new `Conflict` error.
    #[must_use]
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    /// Creates a new `Storage` error.
    #[must_use]
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Creates a new `Configuration` error.
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Creates a new `Internal` error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Returns `true` if this error rejects the caller's identity.
    ///
    /// These all map to 401 Unauthorized.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(
            self,
            Self::InvalidCredentials
                | Self::MissingToken
                | Self::MalformedToken { .. }
                | Self::InvalidOrExpiredToken { .. }
        )
    }

    /// Returns `true` if this is a token verification failure.
    #[must_use]
    pub fn is_token_error(&self) -> bool {
        matches!(
            self,
            Self::MissingToken | Self::MalformedToken { .. } | Self::InvalidOrExpiredToken { .. }
        )
    }

    /// Returns `true` if this is a server-side error.
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        matches!(
            self,
            Self::Storage { .. } | Self::Configuration { .. } | Self::Internal { .. }
        )
    }

    /// Returns the error category for logging/monitoring purposes.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidCredentials => ErrorCategory::Authentication,
            Self::MissingToken | Self::MalformedToken { .. } | Self::InvalidOrExpiredToken { .. } => {
                ErrorCategory::Token
            }
            Self::Forbidden { .. } => ErrorCategory::Authorization,
            Self::NotFound { .. } => ErrorCategory::NotFound,
            Self::InvalidRequest { .. } | Self::Conflict { .. } => ErrorCategory::Request,
            Self::Storage { .. } | Self::Configuration { .. } | Self::Internal { .. } => {
                ErrorCategory::Server
            }
        }
    }

    /// Short machine-readable name of the error kind, used as a log field.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidCredentials => "invalid_credentials",
            Self::MissingToken => "missing_token",
            Self::MalformedToken { .. } => "malformed_token",
            Self::InvalidOrExpiredToken { .. } => "invalid_or_expired_token",
            Self::Forbidden { .. } => "forbidden",
            Self::NotFound { .. } => "not_found",
            Self::InvalidRequest { .. } => "invalid_request",
            Self::Conflict { .. } => "conflict",
            Self::Storage { .. } => "storage_unavailable",
            Self::Configuration { .. } => "configuration",
            Self::Internal { .. } => "internal",
        }
    }
}

impl From<StorageError> for AuthError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::AlreadyExists { kind, id } => {
                Self::conflict(format!("{kind} '{id}' already exists"))
            }
            StorageError::InvalidResource { message } => Self::invalid_request(message),
            err @ StorageError::ConnectionError { .. } => Self::storage(err.to_string()),
        }
    }
}

/// Categories of authentication errors for logging and monitoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Login rejected.
    Authentication,
    /// Token missing or rejected.
    Token,
    /// Authenticated but not permitted.
    Authorization,
    /// Record absent or concealed.
    NotFound,
    /// Invalid or conflicting request.
    Request,
    /// Server-side failure.
    Server,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Authentication => write!(f, "authentication"),
            Self::Token => write!(f, "token"),
            Self::Authorization => write!(f, "authorization"),
            Self::NotFound => write!(f, "not_found"),
            Self::Request => write!(f, "request"),
            Self::Server => write!(f, "server"),
        }
    }
}
