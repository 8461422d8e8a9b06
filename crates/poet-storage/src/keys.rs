//! Storage-unique object names.
//!
//! Key format: `{uuid}_{filename}`. The random component keeps two uploads
//! that share a display name from colliding; the display name keeps the key
//! readable. Both backends use the same format.

use uuid::Uuid;

/// Longest display-name component kept in a key, in bytes.
///
/// A key is `{uuid}_` (37 bytes) plus this component, and local writes stage
/// under `{key}.{hex}.partial` (41 more bytes); all of it has to fit a
/// 255-byte file name.
pub const MAX_KEY_NAME_LEN: usize = 170;

/// Generate a fresh storage key for an upload called `filename`.
///
/// Only the final path component of `filename` is used, so a display name
/// can never steer the key into another directory.
pub fn generate_storage_key(filename: &str) -> String {
    let name = filename
        .rsplit(['/', '\\'])
        .next()
        .filter(|s| !s.is_empty() && *s != "." && *s != "..")
        .unwrap_or("file");
    format!("{}_{}", Uuid::new_v4(), truncate_name(name, MAX_KEY_NAME_LEN))
}

/// Shorten `name` to at most `max_len` bytes, keeping a short extension.
fn truncate_name(name: &str, max_len: usize) -> String {
    if name.len() <= max_len {
        return name.to_string();
    }

    let (stem, extension) = match name.rsplit_once('.') {
        Some((stem, ext)) if ext.len() < max_len / 2 => (stem, Some(ext)),
        _ => (name, None),
    };
    let stem_budget = match extension {
        Some(ext) => max_len - ext.len() - 1,
        None => max_len,
    };

    let mut cut = stem_budget.min(stem.len());
    while !stem.is_char_boundary(cut) {
        cut -= 1;
    }

    match extension {
        Some(ext) => format!("{}.{}", &stem[..cut], ext),
        None => stem[..cut].to_string(),
    }
}

/// Keys must be relative and must not climb out of their root.
pub fn is_valid_key(storage_key: &str) -> bool {
    !storage_key.is_empty()
        && !storage_key.starts_with('/')
        && !storage_key.starts_with('\\')
        && !storage_key.split(['/', '\\']).any(|segment| segment == "..")
}
