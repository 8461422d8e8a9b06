//! API-wide constants

/// API version segment used in every resource path.
pub const API_VERSION: &str = "v1";

/// Prefix all versioned resources are nested under.
pub const API_PREFIX: &str = "/api/v1";

/// Name of the multipart field carrying the uploaded file.
pub const UPLOAD_FIELD: &str = "file";
