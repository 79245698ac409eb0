use super::error::StorageError;

/// Validate a single storage path segment.
///
/// Segments become directory or file names in the filesystem backend and
/// object path components in S3, so anything that could escape the namespace
/// is rejected.
pub fn validate_segment(segment: &str) -> Result<&str, StorageError> {
    if segment.is_empty() {
        return Err(StorageError::InvalidKey("empty path segment".into()));
    }

    if segment.contains('\0') {
        return Err(StorageError::InvalidKey(
            "null bytes are not allowed".into(),
        ));
    }

    if segment.chars().any(|c| c.is_control()) {
        return Err(StorageError::InvalidKey(
            "control characters are not allowed".into(),
        ));
    }

    if segment.contains('/') || segment.contains('\\') {
        return Err(StorageError::InvalidKey(format!(
            "'{segment}' contains a path separator"
        )));
    }

    if segment.starts_with('.') {
        return Err(StorageError::InvalidKey(format!(
            "'{segment}' must not start with '.'"
        )));
    }

    if segment.trim() != segment {
        return Err(StorageError::InvalidKey(format!(
            "'{segment}' has leading or trailing whitespace"
        )));
    }

    Ok(segment)
}

/// Split and validate a full object location into its path segments.
///
/// `key` may contain `/` separators; each piece is validated on its own.
pub fn object_segments<'a>(
    namespace: &'a str,
    bucket: &'a str,
    key: &'a str,
) -> Result<Vec<&'a str>, StorageError> {
    let mut segments = vec![validate_segment(namespace)?, validate_segment(bucket)?];
    for part in key.split('/') {
        segments.push(validate_segment(part)?);
    }
    Ok(segments)
}
