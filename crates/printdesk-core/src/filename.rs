//! Filename normalization and sanitization.
//!
//! Multipart `filename` parameters are not guaranteed to be transmitted as
//! UTF-8. Some clients send raw UTF-8 bytes that the transport layer exposes
//! one-byte-per-character (Latin-1 style), which mangles non-ASCII names.
//! Normalization happens once at ingestion; every later comparison and the
//! attachment names in the outbound notification use the normalized form.

/// Repair a filename whose UTF-8 bytes were mis-decoded as a single-byte
/// encoding.
///
/// If every character fits in one byte, the string is re-packed into bytes
/// and re-read as UTF-8; when that succeeds, the re-decoded form wins.
/// Anything else is passed through unchanged.
pub fn normalize_filename(raw: &str) -> String {
    if raw.is_ascii() {
        return raw.to_string();
    }

    if raw.chars().all(|c| (c as u32) < 0x100) {
        let bytes: Vec<u8> = raw.chars().map(|c| c as u8).collect();
        if let Ok(decoded) = String::from_utf8(bytes) {
            return decoded;
        }
    }

    raw.to_string()
}

/// Strip path components and characters that would break storage keys or
/// mail headers. Returns `"file"` when nothing usable remains.
pub fn sanitize_filename(filename: &str) -> String {
    const MAX_FILENAME_LENGTH: usize = 255;

    let filename_only = filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(filename);

    let sanitized: String = filename_only
        .chars()
        .filter(|c| !c.is_control())
        .map(|c| match c {
            ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            _ => c,
        })
        .take(MAX_FILENAME_LENGTH)
        .collect();

    let trimmed = sanitized.trim().trim_matches('.');
    if trimmed.is_empty() {
        return "file".to_string();
    }

    trimmed.to_string()
}
