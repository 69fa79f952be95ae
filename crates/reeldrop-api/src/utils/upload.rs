//! Multipart decoding for direct chunk ingest

use crate::state::UploadLimits;
use axum::extract::multipart::{Field, MultipartError};
use axum::extract::Multipart;
use axum::http::{header, HeaderMap, StatusCode};
use bytes::{Bytes, BytesMut};
use reeldrop_core::AppError;

const FILE_FIELD: &str = "file";

/// Fields of an ingest form. Unknown text fields are counted against the limit but dropped.
#[derive(Debug, Default)]
pub struct ChunkForm {
    pub session_id: Option<String>,
    pub idx: Option<String>,
    pub file: Option<FilePart>,
}

#[derive(Debug)]
pub struct FilePart {
    pub data: Bytes,
    pub content_type: Option<String>,
}

/// Reject requests whose Content-Type is absent or not `multipart/form-data`.
pub fn require_multipart(headers: &HeaderMap) -> Result<(), AppError> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    let mime = content_type.split(';').next().unwrap_or_default().trim();

    if mime.eq_ignore_ascii_case("multipart/form-data") {
        Ok(())
    } else {
        Err(AppError::MissingContentType)
    }
}

fn map_multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(format!("Request body too large: {}", err.body_text()))
    } else {
        AppError::InvalidInput(format!("Failed to read multipart: {}", err.body_text()))
    }
}

/// Drain a field, failing as soon as more than `cap` bytes have arrived.
async fn read_capped<F>(field: &mut Field<'_>, cap: usize, too_large: F) -> Result<Bytes, AppError>
where
    F: FnOnce() -> AppError,
{
    let mut buf = BytesMut::new();
    while let Some(chunk) = field.chunk().await.map_err(map_multipart_error)? {
        if buf.len() + chunk.len() > cap {
            return Err(too_large());
        }
        buf.extend_from_slice(&chunk);
    }
    Ok(buf.freeze())
}

/// Decode an ingest form: `sessionId` and `idx` text fields plus exactly one file part.
///
/// A part counts as the file when it carries a filename or is named `file`. Nothing is
/// buffered past the configured limits.
pub async fn extract_chunk_form(
    mut multipart: Multipart,
    limits: &UploadLimits,
) -> Result<ChunkForm, AppError> {
    let mut form = ChunkForm::default();
    let mut text_fields = 0usize;

    while let Some(mut field) = multipart.next_field().await.map_err(map_multipart_error)? {
        let name = field.name().map(str::to_string).unwrap_or_default();

        if field.file_name().is_some() || name == FILE_FIELD {
            if form.file.is_some() {
                return Err(AppError::TooManyParts(
                    "Only one file part is allowed per chunk".to_string(),
                ));
            }
            // Raw header: codec lists such as `video/webm;codecs=vp8,opus` do not parse as a MIME.
            let content_type = field
                .headers()
                .get(header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .map(|v| v.trim().to_string());
            let data = read_capped(&mut field, limits.max_chunk_size_bytes, || {
                AppError::PayloadTooLarge(format!(
                    "Chunk exceeds maximum allowed size of {} MB",
                    limits.max_chunk_size_bytes / 1024 / 1024
                ))
            })
            .await?;
            form.file = Some(FilePart { data, content_type });
            continue;
        }

        text_fields += 1;
        if text_fields > limits.max_form_fields {
            return Err(AppError::TooManyParts(format!(
                "At most {} form fields are allowed",
                limits.max_form_fields
            )));
        }

        let raw = read_capped(&mut field, limits.max_field_bytes, || {
            AppError::PayloadTooLarge(format!(
                "Form field '{}' exceeds {} bytes",
                name, limits.max_field_bytes
            ))
        })
        .await?;
        let value = String::from_utf8(raw.to_vec()).map_err(|_| {
            AppError::InvalidInput(format!("Form field '{}' is not valid UTF-8", name))
        })?;

        match name.as_str() {
            "sessionId" => form.session_id = Some(value),
            "idx" | "index" => form.idx = Some(value),
            _ => tracing::debug!(field = %name, "Ignoring unknown form field"),
        }
    }

    Ok(form)
}
