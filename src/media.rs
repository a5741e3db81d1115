//! Persistence for uploaded post images.

use std::path::Path;

use uuid::Uuid;

use crate::error::AppError;

/// Directory under the media root that post images land in; the same
/// prefix is stored on the post row.
pub const POST_UPLOAD_PREFIX: &str = "posts";

/// Strips client-supplied directory components and anything that does
/// not belong in a file name.
fn sanitize_file_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or_default();
    let cleaned: String = base
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'))
        .collect();
    if cleaned.trim_matches('.').is_empty() {
        "upload".to_string()
    } else {
        cleaned
    }
}

/// Writes an uploaded image under `{media_root}/posts/` and returns the
/// relative path stored on the post row.
pub async fn save_post_image(
    media_root: &Path,
    file_name: &str,
    data: &[u8],
) -> Result<String, AppError> {
    let name = format!("{}_{}", Uuid::new_v4(), sanitize_file_name(file_name));
    let dir = media_root.join(POST_UPLOAD_PREFIX);

    tokio::fs::create_dir_all(&dir).await.map_err(|e| {
        tracing::error!("failed to create media directory: {e}");
        AppError::InternalServerError
    })?;
    tokio::fs::write(dir.join(&name), data).await.map_err(|e| {
        tracing::error!("failed to store uploaded image: {e}");
        AppError::InternalServerError
    })?;

    Ok(format!("{POST_UPLOAD_PREFIX}/{name}"))
}
