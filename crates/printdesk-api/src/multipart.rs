//! Multipart ingestion for order submissions.
//!
//! Splits the request into textual order fields and uploaded files. File
//! content is buffered in memory up to the inline limit and spooled to a
//! temp file beyond it, so inline-routed files are ready for the composer
//! while remote-routed files can stream from disk. Filenames are normalized
//! here, once, before anything compares or displays them.

use axum::extract::multipart::{Field, Multipart};
use bytes::Bytes;
use tokio::io::AsyncWriteExt;

use printdesk_core::{
    filename::{normalize_filename, sanitize_filename},
    AppError, OrderForm, UploadedFile,
};

/// One parsed order submission.
pub struct OrderSubmission {
    pub form: OrderForm,
    pub files: Vec<UploadedFile>,
}

/// Drain the multipart stream into form fields and files.
///
/// `spool_limit_bytes` is the same configured limit the classifier uses, so
/// memory-backed content and inline routing coincide.
pub async fn read_order_submission(
    mut multipart: Multipart,
    spool_limit_bytes: u64,
) -> Result<OrderSubmission, AppError> {
    let mut form = OrderForm::new();
    let mut files = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::ParseFailure(format!("Failed to read multipart field: {}", e)))?
    {
        let field_name = field.name().unwrap_or_default().to_string();

        if field.file_name().is_some() {
            files.push(read_file_field(field, &field_name, spool_limit_bytes).await?);
        } else {
            let value = field.text().await.map_err(|e| {
                AppError::ParseFailure(format!("Failed to read field '{}': {}", field_name, e))
            })?;
            form.push(field_name, value);
        }
    }

    Ok(OrderSubmission { form, files })
}

async fn read_file_field(
    mut field: Field<'_>,
    field_name: &str,
    spool_limit_bytes: u64,
) -> Result<UploadedFile, AppError> {
    let raw_name = field.file_name().unwrap_or("unknown").to_string();
    let filename = sanitize_filename(&normalize_filename(&raw_name));
    let content_type = field
        .content_type()
        .unwrap_or("application/octet-stream")
        .to_string();

    let mut buffer: Vec<u8> = Vec::new();
    let mut spool: Option<(tokio::fs::File, tempfile::TempPath)> = None;
    let mut size: u64 = 0;

    while let Some(chunk) = field.chunk().await.map_err(|e| {
        AppError::ParseFailure(format!("Failed to read content of '{}': {}", filename, e))
    })? {
        size += chunk.len() as u64;

        if spool.is_none() && size > spool_limit_bytes {
            // Crossed the inline limit: move what we have to disk and keep
            // streaming there. The TempPath deletes the file on drop.
            let tmp = tempfile::NamedTempFile::new()?;
            let reopened = tmp.reopen()?;
            let mut file = tokio::fs::File::from_std(reopened);
            file.write_all(&buffer).await?;
            buffer = Vec::new();
            spool = Some((file, tmp.into_temp_path()));
        }

        match &mut spool {
            Some((file, _)) => file.write_all(&chunk).await?,
            None => buffer.extend_from_slice(&chunk),
        }
    }

    match spool {
        Some((mut file, path)) => {
            file.flush().await?;
            drop(file);
            tracing::debug!(
                filename = %filename,
                size_bytes = size,
                "Spooled oversized upload to temp file"
            );
            Ok(UploadedFile::spooled(
                field_name, filename, content_type, size, path,
            ))
        }
        None => Ok(UploadedFile::in_memory(
            field_name,
            filename,
            content_type,
            Bytes::from(buffer),
        )),
    }
}
