//! Artifact persistence for the terminal stage output.
use std::path::{Path, PathBuf};

use uuid::Uuid;

/// Write `contents` to `dir/file_name`, replacing any previous file.
///
/// The text goes to a sibling temp file first and is renamed into place,
/// so readers never see a half-written or appended artifact.
pub async fn write_artifact(dir: &Path, file_name: &str, contents: &str) -> std::io::Result<PathBuf> {
    tokio::fs::create_dir_all(dir).await?;

    let target = dir.join(file_name);
    let staging = dir.join(format!(".{}.{}.tmp", file_name, Uuid::new_v4().simple()));

    let written = match tokio::fs::write(&staging, contents).await {
        Ok(()) => tokio::fs::rename(&staging, &target).await,
        Err(err) => Err(err),
    };
    if let Err(err) = written {
        let _ = tokio::fs::remove_file(&staging).await;
        return Err(err);
    }

    tracing::debug!(path = %target.display(), bytes = contents.len(), "artifact written");
    Ok(target)
}
