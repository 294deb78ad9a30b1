use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{header, HeaderValue};
use axum::response::Response;
use tokio_util::io::ReaderStream;

use crate::api::response::ApiError;
use crate::api::AppState;
use crate::error::{DeskError, Result};

/// `GET /download/{filename}`
///
/// Streams a generated artifact as an attachment.
#[utoipa::path(
    get,
    path = "/download/{filename}",
    tag = "files",
    params(("filename" = String, Path, description = "Name returned by a generator")),
    responses(
        (status = 200, description = "File contents with an attachment disposition"),
        (status = 400, description = "Path-like filename", body = ApiError),
        (status = 404, description = "No such file", body = ApiError),
    )
)]
pub async fn download(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<Response> {
    let (file, size) = state.artifacts.open(&filename).await?;
    tracing::debug!(
        filename = filename.as_str(),
        bytes = size,
        "Serving artifact"
    );

    let mime = mime_guess::from_path(&filename).first_or_octet_stream();
    let disposition = format!("attachment; filename=\"{filename}\"");

    let mut response = Response::new(Body::from_stream(ReaderStream::new(file)));
    let headers = response.headers_mut();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_str(mime.as_ref())
            .map_err(|e| DeskError::Internal(format!("Invalid content type: {e}")))?,
    );
    headers.insert(header::CONTENT_LENGTH, HeaderValue::from(size));
    headers.insert(
        header::CONTENT_DISPOSITION,
        HeaderValue::from_str(&disposition)
            .map_err(|_| DeskError::Validation(format!("Invalid artifact filename: {filename}")))?,
    );

    Ok(response)
}
