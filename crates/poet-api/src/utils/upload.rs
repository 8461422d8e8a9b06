use axum::extract::multipart::{Multipart, MultipartError};
use axum::http::StatusCode;
use bytes::Bytes;
use poet_core::AppError;

use crate::constants::UPLOAD_FIELD;

const MAX_FILENAME_LENGTH: usize = 255;

/// A file taken from a multipart form, not yet validated.
#[derive(Debug)]
pub struct SubmittedFile {
    /// Client-supplied name; `None` when the part carried no filename.
    pub filename: Option<String>,
    pub data: Bytes,
}

fn multipart_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(format!("Request body too large: {}", e.body_text()))
    } else {
        AppError::InvalidInput(format!("Failed to read multipart: {}", e.body_text()))
    }
}

/// Extract the `file` field from a multipart form.
///
/// Only one field named "file" is accepted; other fields are drained and ignored.
pub async fn extract_multipart_file(mut multipart: Multipart) -> Result<SubmittedFile, AppError> {
    let mut submitted: Option<SubmittedFile> = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let field_name = field.name().map(|s| s.to_string()).unwrap_or_default();

        if field_name != UPLOAD_FIELD {
            continue;
        }
        if submitted.is_some() {
            return Err(AppError::InvalidInput(
                "Multiple file fields are not allowed; send exactly one field named 'file'"
                    .to_string(),
            ));
        }

        let filename = field.file_name().map(|s: &str| s.to_string());
        let data = field.bytes().await.map_err(multipart_error)?;

        submitted = Some(SubmittedFile { filename, data });
    }

    submitted.ok_or(AppError::FileNotSent)
}

/// Check the submitted file in the order clients are told about problems:
/// missing name, disallowed extension, then empty content.
///
/// Returns the sanitized filename to store under.
pub fn validate_submitted_file(
    file: &SubmittedFile,
    allowed_extensions: &[String],
    max_size: usize,
) -> Result<String, AppError> {
    let filename = match file.filename.as_deref().map(str::trim) {
        Some(name) if !name.is_empty() => name,
        _ => return Err(AppError::FileNameRequired),
    };

    if !allowed_file(filename, allowed_extensions) {
        return Err(AppError::UnsupportedMediaType(filename.to_string()));
    }

    if file.data.is_empty() {
        return Err(AppError::EmptyFile);
    }

    validate_file_size(file.data.len(), max_size)?;

    Ok(sanitize_filename(filename))
}

/// Validate file size
pub fn validate_file_size(file_size: usize, max_size: usize) -> Result<(), AppError> {
    if file_size > max_size {
        return Err(AppError::PayloadTooLarge(format!(
            "File size exceeds maximum allowed size of {} MB",
            max_size / 1024 / 1024
        )));
    }
    Ok(())
}

/// Whether the text after the last `.` is an allowed extension (case-insensitive).
pub fn allowed_file(filename: &str, allowed_extensions: &[String]) -> bool {
    match filename.rsplit_once('.') {
        Some((_, extension)) => {
            let extension = extension.to_lowercase();
            allowed_extensions.iter().any(|allowed| *allowed == extension)
        }
        None => false,
    }
}

/// Reduce a client-supplied filename to a safe single path component.
///
/// Keeps the final component, replaces anything outside `[A-Za-z0-9._-]`
/// with `_` and strips leading dots. Falls back to `file`.
pub fn sanitize_filename(filename: &str) -> String {
    let filename_only = filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(filename);

    let sanitized: String = filename_only
        .chars()
        .take(MAX_FILENAME_LENGTH)
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    let sanitized = sanitized.trim_start_matches('.');
    if sanitized.is_empty() {
        return "file".to_string();
    }

    sanitized.to_string()
}

/// Content type sent with a downloaded file, guessed from its extension.
pub fn content_type_for(filename: &str) -> &'static str {
    let extension = filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "jpg" | "jpe" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "bmp" => "image/bmp",
        _ => "application/octet-stream",
    }
}
