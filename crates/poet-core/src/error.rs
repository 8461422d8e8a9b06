//! Error types module
//!
//! All errors surfaced by the service are unified under `AppError`. Each
//! variant self-describes how it should be presented over HTTP through the
//! `ErrorMetadata` trait, so the transport layer never has to guess.

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for recoverable issues
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata for error responses - defines how an error should be presented
pub trait ErrorMetadata {
    /// HTTP status code to return
    fn http_status_code(&self) -> u16;

    /// Machine-readable error code (e.g., "resource-not-found")
    fn error_code(&self) -> &'static str;

    /// Whether this error is recoverable (can be retried)
    fn is_recoverable(&self) -> bool;

    /// Suggested action for the client
    fn suggested_action(&self) -> Option<&'static str>;

    /// Client-facing message (may differ from internal error message)
    fn client_message(&self) -> String;

    /// Whether details should be hidden in production
    fn is_sensitive(&self) -> bool;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("No file was sent")]
    FileNotSent,

    #[error("A submitted file must have a name")]
    FileNameRequired,

    #[error("Unsupported media type: {0}")]
    UnsupportedMediaType(String),

    #[error("An empty file was sent")]
    EmptyFile,

    #[error("File too large: {0}")]
    PayloadTooLarge(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Link unsupported: {0}")]
    LinkUnsupported(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Internal error with source")]
    InternalWithSource {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        }
    }
}

/// Static metadata for each variant: (http_status, error_code, recoverable, suggested_action, sensitive, log_level).
fn app_error_static_metadata(
    err: &AppError,
) -> (
    u16,
    &'static str,
    bool,
    Option<&'static str>,
    bool,
    LogLevel,
) {
    match err {
        AppError::InvalidInput(_) => (
            400,
            "invalid-input",
            false,
            Some("Check request parameters and try again"),
            false,
            LogLevel::Debug,
        ),
        AppError::FileNotSent => (
            400,
            "file-not-sent",
            false,
            Some("Send the file in a multipart field named 'file'"),
            false,
            LogLevel::Debug,
        ),
        AppError::FileNameRequired => (
            400,
            "file-name-required",
            false,
            Some("Give the submitted file a name"),
            false,
            LogLevel::Debug,
        ),
        AppError::UnsupportedMediaType(_) => (
            415,
            "image-type-not-supported",
            false,
            Some("Upload an image with a supported extension"),
            false,
            LogLevel::Debug,
        ),
        AppError::EmptyFile => (
            422,
            "file-required",
            false,
            Some("Send a non-empty file"),
            false,
            LogLevel::Debug,
        ),
        AppError::PayloadTooLarge(_) => (
            413,
            "file-too-large",
            false,
            Some("Send a smaller file"),
            false,
            LogLevel::Debug,
        ),
        AppError::NotFound(_) => (
            404,
            "resource-not-found",
            false,
            Some("Verify the resource ID exists"),
            false,
            LogLevel::Debug,
        ),
        AppError::FileNotFound(_) => (
            404,
            "file-not-found",
            false,
            Some("Contact an administrator if the problem persists"),
            false,
            LogLevel::Warn,
        ),
        AppError::LinkUnsupported(_) => (
            409,
            "link-unsupported",
            false,
            Some("Download the file through the API instead"),
            false,
            LogLevel::Debug,
        ),
        AppError::Unauthorized(_) => (
            401,
            "unauthorized",
            false,
            Some("Provide a valid bearer token"),
            false,
            LogLevel::Debug,
        ),
        AppError::Forbidden(_) => (
            403,
            "forbidden",
            false,
            None,
            false,
            LogLevel::Debug,
        ),
        AppError::Storage(_) => (
            500,
            "storage-error",
            true,
            Some("Retry after a short delay"),
            true,
            LogLevel::Error,
        ),
        AppError::Internal(_) | AppError::InternalWithSource { .. } => (
            500,
            "unknown-error",
            false,
            Some("Contact an administrator if the problem persists"),
            true,
            LogLevel::Error,
        ),
    }
}

impl AppError {
    /// Get the error type name for detailed error responses
    pub fn error_type(&self) -> &str {
        match self {
            AppError::InvalidInput(_) => "InvalidInput",
            AppError::FileNotSent => "FileNotSent",
            AppError::FileNameRequired => "FileNameRequired",
            AppError::UnsupportedMediaType(_) => "UnsupportedMediaType",
            AppError::EmptyFile => "EmptyFile",
            AppError::PayloadTooLarge(_) => "PayloadTooLarge",
            AppError::NotFound(_) => "NotFound",
            AppError::FileNotFound(_) => "FileNotFound",
            AppError::LinkUnsupported(_) => "LinkUnsupported",
            AppError::Unauthorized(_) => "Unauthorized",
            AppError::Forbidden(_) => "Forbidden",
            AppError::Storage(_) => "Storage",
            AppError::Internal(_) => "Internal",
            AppError::InternalWithSource { .. } => "Internal",
        }
    }

    /// Get detailed error information including error chain
    pub fn detailed_message(&self) -> String {
        use std::error::Error;

        let mut details = self.to_string();

        let mut source = self.source();
        let mut depth = 0;
        while let Some(err) = source {
            depth += 1;
            if depth > 5 {
                details.push_str("\n  ... (truncated)");
                break;
            }
            details.push_str(&format!("\n  Caused by: {}", err));
            source = err.source();
        }

        details
    }
}

impl ErrorMetadata for AppError {
    fn http_status_code(&self) -> u16 {
        app_error_static_metadata(self).0
    }

    fn error_code(&self) -> &'static str {
        app_error_static_metadata(self).1
    }

    fn is_recoverable(&self) -> bool {
        app_error_static_metadata(self).2
    }

    fn suggested_action(&self) -> Option<&'static str> {
        app_error_static_metadata(self).3
    }

    fn is_sensitive(&self) -> bool {
        app_error_static_metadata(self).4
    }

    fn log_level(&self) -> LogLevel {
        app_error_static_metadata(self).5
    }

    fn client_message(&self) -> String {
        match self {
            AppError::InvalidInput(ref msg) => msg.clone(),
            AppError::FileNotSent => "No file was sent.".to_string(),
            AppError::FileNameRequired => "A submitted file must have a name.".to_string(),
            AppError::UnsupportedMediaType(_) => {
                "We don't allow images with that extension".to_string()
            }
            AppError::EmptyFile => "An empty file was sent.".to_string(),
            AppError::PayloadTooLarge(ref msg) => msg.clone(),
            AppError::NotFound(_) => "We couldn't find that resource".to_string(),
            AppError::FileNotFound(_) => "We couldn't find the file for that resource".to_string(),
            AppError::LinkUnsupported(ref msg) => msg.clone(),
            AppError::Unauthorized(ref msg) => msg.clone(),
            AppError::Forbidden(ref msg) => msg.clone(),
            AppError::Storage(_) => "Failed to access storage".to_string(),
            AppError::Internal(_) | AppError::InternalWithSource { .. } => {
                "An unknown error occurred. Contact an administrator if the problem persists."
                    .to_string()
            }
        }
    }
}
