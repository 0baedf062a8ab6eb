use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    routing::post,
    Router,
};
use tracing::{error, info, instrument};

use crate::state::AppState;

const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/upload_profile_picture", post(upload_profile_picture))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
}

/// POST /upload_profile_picture: single multipart part named `file`,
/// written to the picture directory. Parts under any other name are
/// skipped; a request without a `file` part is a 400.
#[instrument(skip(state, multipart))]
pub async fn upload_profile_picture(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, &'static str), StatusCode> {
    while let Some(field) = multipart.next_field().await.map_err(|e| e.status())? {
        if field.name() != Some("file") {
            continue;
        }

        let original = field.file_name().unwrap_or_default().to_string();
        let body = field.bytes().await.map_err(|e| e.status())?;

        let stored = state.uploads.save(&original, body).await.map_err(|e| {
            error!(error = %e, "storing upload failed");
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

        info!(file = %stored, "profile picture stored");
        return Ok((StatusCode::OK, "Profile picture uploaded successfully"));
    }

    Err(StatusCode::BAD_REQUEST)
}
