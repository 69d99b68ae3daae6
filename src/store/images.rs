use std::path::Path;

use chrono::Utc;

use crate::error::Result;
use crate::models::ImageUpload;

const URL_PREFIX: &str = "/uploads/";

/// Writes an uploaded image into the uploads directory and returns its
/// root-relative URL.
///
/// The file is named `<epoch-millis>-<sanitized-name>`; the stamp is bumped
/// while the target name is already taken, so several uploads of the same
/// file in one millisecond land in separate files. Write failures propagate:
/// a product must not silently lose an image the admin attached.
pub async fn save_upload(uploads_dir: &Path, upload: &ImageUpload) -> Result<String> {
    tokio::fs::create_dir_all(uploads_dir).await?;

    let name = sanitize_file_name(&upload.file_name);
    let mut stamp = Utc::now().timestamp_millis();
    let mut file_name = format!("{}-{}", stamp, name);
    while tokio::fs::try_exists(uploads_dir.join(&file_name)).await? {
        stamp += 1;
        file_name = format!("{}-{}", stamp, name);
    }

    tokio::fs::write(uploads_dir.join(&file_name), &upload.data).await?;

    Ok(format!("{}{}", URL_PREFIX, file_name))
}

/// Best-effort removal of a previously saved image. A failed unlink is
/// logged and swallowed: an orphaned file must not block the record
/// operation that triggered the cleanup.
pub async fn delete_upload(uploads_dir: &Path, public_path: &str) {
    let Some(file_name) = public_path.strip_prefix(URL_PREFIX) else {
        tracing::warn!("Not deleting image outside the uploads directory: {}", public_path);
        return;
    };
    if file_name.is_empty() || file_name.contains('/') || file_name.contains("..") {
        tracing::warn!("Not deleting image with unexpected name: {}", public_path);
        return;
    }

    if let Err(e) = tokio::fs::remove_file(uploads_dir.join(file_name)).await {
        tracing::warn!("Failed to delete image {}: {}", public_path, e);
    }
}

/// Strips any client-supplied directory components and replaces whitespace
/// with underscores, keeping the URL path clean.
fn sanitize_file_name(original: &str) -> String {
    let base = original
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(original)
        .trim();
    let cleaned: String = base
        .chars()
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .collect();

    if cleaned.is_empty() {
        "image".to_string()
    } else {
        cleaned
    }
}
