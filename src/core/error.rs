//! Normalized error taxonomy for tool dispatch
//!
//! Every failure in the dispatch pipeline is represented as a [`ToolError`]
//! carrying a machine-checkable [`ErrorKind`], a human-readable message, and
//! (for upstream failures) the original status code and a body snippet.
//! Registry construction failures are a separate [`RegistryError`] because
//! they are fatal at startup, not runtime conditions.

use std::fmt;

use thiserror::Error;

/// Result type for tool dispatch operations
pub type ToolResult<T> = Result<T, ToolError>;

/// Machine-checkable classification of a [`ToolError`]
///
/// Hosts branch on this to decide whether to retry, surface the failure to a
/// user, or treat it as fatal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Bad, missing, or unknown argument; also upstream 400/422 rejections
    Validation,
    /// Credential rejected by the upstream (401/403)
    Authentication,
    /// Unregistered tool name or upstream 404
    NotFound,
    /// Upstream throttling (429); retryable with backoff
    RateLimit,
    /// Upstream 5xx; not locally recoverable
    UpstreamFailure,
    /// Connection-level failure (timeout, DNS, reset); retryable
    Transport,
    /// Contract violation inside the engine; indicates a bug, not user error
    Internal,
}

impl ErrorKind {
    /// Stable string form used in logs and host-facing payloads
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::Authentication => "authentication",
            Self::NotFound => "not-found",
            Self::RateLimit => "rate-limit",
            Self::UpstreamFailure => "upstream-failure",
            Self::Transport => "transport",
            Self::Internal => "internal",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalized failure value returned from every dispatch stage
#[derive(Error, Debug)]
pub enum ToolError {
    // ─────────────────────────────────────────────────────────────────────────
    // Argument validation (local, never sent upstream)
    // ─────────────────────────────────────────────────────────────────────────
    /// Required parameter absent from the argument map
    #[error("Missing required parameter '{parameter}' for tool '{tool}'")]
    MissingParameter { tool: String, parameter: String },

    /// Argument key with no corresponding parameter spec
    #[error("Unknown parameter '{parameter}' for tool '{tool}'")]
    UnknownParameter { tool: String, parameter: String },

    /// Argument present but not coercible to the declared kind
    #[error("Invalid value for parameter '{parameter}': {reason}")]
    InvalidParameter { parameter: String, reason: String },

    /// File-typed parameter whose content could not be read
    #[error("Failed to read file for parameter '{parameter}': {reason}")]
    FileRead { parameter: String, reason: String },

    // ─────────────────────────────────────────────────────────────────────────
    // Lookup
    // ─────────────────────────────────────────────────────────────────────────
    /// Tool name absent from the schema registry
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    // ─────────────────────────────────────────────────────────────────────────
    // Upstream responses
    // ─────────────────────────────────────────────────────────────────────────
    /// Credential rejected (401/403)
    #[error("Authentication rejected by upstream ({status} on {path}): {snippet}")]
    Authentication {
        status: u16,
        path: String,
        snippet: String,
    },

    /// Upstream resource absent (404)
    #[error("Resource not found ({status} on {path}): {snippet}")]
    NotFound {
        status: u16,
        path: String,
        snippet: String,
    },

    /// Request rejected by the upstream validator (400/422 and other 4xx)
    #[error("Upstream rejected request ({status} on {path}): {snippet}")]
    UpstreamRejected {
        status: u16,
        path: String,
        snippet: String,
    },

    /// Upstream throttling (429), with the Retry-After hint when one was sent
    #[error("Rate limited by upstream on {path}: {snippet}")]
    RateLimited {
        path: String,
        retry_after: Option<u64>,
        snippet: String,
    },

    /// Upstream 5xx
    #[error("Upstream failure ({status} on {path}): {snippet}")]
    UpstreamFailure {
        status: u16,
        path: String,
        snippet: String,
    },

    /// Upstream body declared JSON but not decodable as JSON
    #[error("Failed to decode upstream JSON from {path}: {reason}")]
    DecodeFailure { path: String, reason: String },

    // ─────────────────────────────────────────────────────────────────────────
    // Transport
    // ─────────────────────────────────────────────────────────────────────────
    /// Connection-level failure (DNS, reset, refused connection)
    #[error("Transport failure on {url}: {reason}")]
    Transport { url: String, reason: String },

    /// Request exceeded the configured deadline
    #[error("Request to {url} timed out after {seconds}s")]
    Timeout { url: String, seconds: u64 },

    /// Streaming body failed after the response headers arrived
    #[error("Stream from {url} interrupted: {reason}")]
    StreamInterrupted { url: String, reason: String },

    // ─────────────────────────────────────────────────────────────────────────
    // Internal
    // ─────────────────────────────────────────────────────────────────────────
    /// Registry/binder contract violation; a bug in this crate, not user error
    #[error("Internal dispatch error: {0}")]
    Internal(String),
}

impl ToolError {
    /// Create a missing-parameter validation error
    pub fn missing_parameter(tool: impl Into<String>, parameter: impl Into<String>) -> Self {
        Self::MissingParameter {
            tool: tool.into(),
            parameter: parameter.into(),
        }
    }

    /// Create an unknown-parameter validation error
    pub fn unknown_parameter(tool: impl Into<String>, parameter: impl Into<String>) -> Self {
        Self::UnknownParameter {
            tool: tool.into(),
            parameter: parameter.into(),
        }
    }

    /// Create an invalid-value validation error
    pub fn invalid_parameter(parameter: impl Into<String>, reason: impl fmt::Display) -> Self {
        Self::InvalidParameter {
            parameter: parameter.into(),
            reason: reason.to_string(),
        }
    }

    /// Create a file-read validation error
    pub fn file_read(parameter: impl Into<String>, reason: impl fmt::Display) -> Self {
        Self::FileRead {
            parameter: parameter.into(),
            reason: reason.to_string(),
        }
    }

    /// Create a connection-level transport error
    pub fn transport(url: impl Into<String>, reason: impl fmt::Display) -> Self {
        Self::Transport {
            url: url.into(),
            reason: reason.to_string(),
        }
    }

    /// Create a mid-stream transport error
    pub fn stream_interrupted(url: impl Into<String>, reason: impl fmt::Display) -> Self {
        Self::StreamInterrupted {
            url: url.into(),
            reason: reason.to_string(),
        }
    }

    /// Create an internal contract-violation error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Map a non-success upstream status to its normalized variant
    ///
    /// The mapping is total: 401/403 → authentication, 404 → not-found,
    /// 429 → rate-limit, 5xx → upstream-failure, every other rejection
    /// (400, 422, remaining 4xx) → validation. The original status and a
    /// body snippet are always preserved.
    pub fn from_status(
        status: u16,
        path: impl Into<String>,
        snippet: impl Into<String>,
        retry_after: Option<u64>,
    ) -> Self {
        let path = path.into();
        let snippet = snippet.into();
        match status {
            401 | 403 => Self::Authentication {
                status,
                path,
                snippet,
            },
            404 => Self::NotFound {
                status,
                path,
                snippet,
            },
            429 => Self::RateLimited {
                path,
                retry_after,
                snippet,
            },
            s if s >= 500 => Self::UpstreamFailure {
                status: s,
                path,
                snippet,
            },
            s => Self::UpstreamRejected {
                status: s,
                path,
                snippet,
            },
        }
    }

    /// Machine-checkable kind of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingParameter { .. }
            | Self::UnknownParameter { .. }
            | Self::InvalidParameter { .. }
            | Self::FileRead { .. }
            | Self::UpstreamRejected { .. } => ErrorKind::Validation,
            Self::UnknownTool(_) | Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Authentication { .. } => ErrorKind::Authentication,
            Self::RateLimited { .. } => ErrorKind::RateLimit,
            Self::UpstreamFailure { .. } | Self::DecodeFailure { .. } => ErrorKind::UpstreamFailure,
            Self::Transport { .. } | Self::Timeout { .. } | Self::StreamInterrupted { .. } => {
                ErrorKind::Transport
            }
            Self::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Upstream status code, when this error carries one
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Authentication { status, .. }
            | Self::NotFound { status, .. }
            | Self::UpstreamRejected { status, .. }
            | Self::UpstreamFailure { status, .. } => Some(*status),
            Self::RateLimited { .. } => Some(429),
            _ => None,
        }
    }

    /// Upstream Retry-After hint in seconds, when one was sent on a 429
    pub fn retry_after(&self) -> Option<u64> {
        match self {
            Self::RateLimited { retry_after, .. } => *retry_after,
            _ => None,
        }
    }

    /// Whether a caller may reasonably retry this failure
    ///
    /// Only throttling and connection-level failures qualify; the core never
    /// retries on its own.
    pub fn is_retryable(&self) -> bool {
        matches!(self.kind(), ErrorKind::RateLimit | ErrorKind::Transport)
    }

    /// Whether this failure was produced locally, before any network call
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            Self::MissingParameter { .. }
                | Self::UnknownParameter { .. }
                | Self::InvalidParameter { .. }
                | Self::FileRead { .. }
                | Self::UnknownTool(_)
                | Self::Internal(_)
        )
    }
}

/// Fatal schema registry construction error
///
/// Raised once at process start when the declarative tool table is
/// malformed; never produced at invocation time.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum RegistryError {
    /// Two tools registered under the same name
    #[error("Duplicate tool name: {0}")]
    DuplicateTool(String),

    /// One tool declaring the same parameter twice
    #[error("Tool '{tool}' declares duplicate parameter '{parameter}'")]
    DuplicateParameter { tool: String, parameter: String },

    /// URL template placeholder with no path-located parameter spec
    #[error("Tool '{tool}' has URL placeholder '{{{placeholder}}}' with no path parameter")]
    UnboundPlaceholder { tool: String, placeholder: String },

    /// Path-located parameter spec with no URL template placeholder
    #[error("Tool '{tool}' declares path parameter '{parameter}' with no matching URL placeholder")]
    OrphanPathParameter { tool: String, parameter: String },

    /// Path parameters must be required and carry no default
    #[error("Tool '{tool}' path parameter '{parameter}' must be required with no default")]
    OptionalPathParameter { tool: String, parameter: String },

    /// URL template that cannot be parsed (unbalanced or empty braces)
    #[error("Tool '{tool}' has a malformed URL template: {reason}")]
    MalformedTemplate { tool: String, reason: String },
}
