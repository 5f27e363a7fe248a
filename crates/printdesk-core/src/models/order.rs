//! Order form and uploaded-file models.

use std::fmt;

use bytes::Bytes;
use tempfile::TempPath;

use crate::constants::{DECLARED_FILES_FIELD, ORDER_NUMBER_FIELD, UNSPECIFIED_SENTINEL};
use crate::filename::normalize_filename;

/// Textual fields of one order submission, in the order they were received.
///
/// The insertion order is preserved deliberately: the notification body
/// serializes the form verbatim for audit purposes, and a stable field order
/// keeps those bodies comparable across submissions.
#[derive(Debug, Clone, Default)]
pub struct OrderForm {
    fields: Vec<(String, String)>,
}

impl OrderForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a form from known pairs; used by tests and by callers that
    /// already collected the fields.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            fields: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.push((name.into(), value.into()));
    }

    /// First value submitted under `name`, if any.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Order number for the notification subject, when present and non-empty.
    pub fn order_number(&self) -> Option<&str> {
        self.get(ORDER_NUMBER_FIELD)
            .map(str::trim)
            .filter(|value| !value.is_empty())
    }

    /// Filenames the client declared it was sending.
    ///
    /// The declared list arrives as one `", "`-separated field; empty entries
    /// and the "unspecified" sentinel are dropped, and each name goes through
    /// the same charset normalization as received filenames so the two sides
    /// compare cleanly.
    pub fn declared_files(&self) -> Vec<String> {
        self.get(DECLARED_FILES_FIELD)
            .map(|value| {
                value
                    .split(',')
                    .map(str::trim)
                    .filter(|name| !name.is_empty() && *name != UNSPECIFIED_SENTINEL)
                    .map(normalize_filename)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Serialize the form for the JSON response echo. The first value wins
    /// for duplicate field names.
    pub fn to_json(&self) -> serde_json::Value {
        let mut map = serde_json::Map::new();
        for (name, value) in &self.fields {
            map.entry(name.clone())
                .or_insert_with(|| serde_json::Value::String(value.clone()));
        }
        serde_json::Value::Object(map)
    }
}

/// Content of one uploaded file.
///
/// Small files stay in memory; anything over the inline limit is spooled to
/// a temp file whose `TempPath` deletes it on drop, on every exit path.
pub enum FileContent {
    Memory(Bytes),
    Spooled(TempPath),
}

impl fmt::Debug for FileContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileContent::Memory(bytes) => f
                .debug_tuple("Memory")
                .field(&format_args!("{} bytes", bytes.len()))
                .finish(),
            FileContent::Spooled(path) => {
                let path: &std::path::Path = path;
                f.debug_tuple("Spooled").field(&path).finish()
            }
        }
    }
}

/// One received attachment, exclusively owned by the intake pipeline for the
/// duration of the request.
#[derive(Debug)]
pub struct UploadedFile {
    /// Multipart field the file arrived under.
    pub field: String,
    /// Normalized original filename.
    pub filename: String,
    pub content_type: String,
    pub size: u64,
    pub content: FileContent,
}

impl UploadedFile {
    pub fn in_memory(
        field: impl Into<String>,
        filename: impl Into<String>,
        content_type: impl Into<String>,
        content: Bytes,
    ) -> Self {
        let size = content.len() as u64;
        Self {
            field: field.into(),
            filename: filename.into(),
            content_type: content_type.into(),
            size,
            content: FileContent::Memory(content),
        }
    }

    pub fn spooled(
        field: impl Into<String>,
        filename: impl Into<String>,
        content_type: impl Into<String>,
        size: u64,
        path: TempPath,
    ) -> Self {
        Self {
            field: field.into(),
            filename: filename.into(),
            content_type: content_type.into(),
            size,
            content: FileContent::Spooled(path),
        }
    }

    pub fn is_spooled(&self) -> bool {
        matches!(self.content, FileContent::Spooled(_))
    }
}
