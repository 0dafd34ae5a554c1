//! Persists verbose, unsanitized error detail to disk so a 422 response can
//! reference it by path without ever showing it to the end user.

use std::path::PathBuf;

use crate::config::AppConfig;

pub async fn persist(config: &AppConfig, raw_error: &str) -> Option<String> {
    let dir = config.results_dir.join("debug");
    if tokio::fs::create_dir_all(&dir).await.is_err() {
        return None;
    }

    let file_name = format!("{}.txt", uuid::Uuid::new_v4());
    let path: PathBuf = dir.join(file_name);
    match tokio::fs::write(&path, raw_error).await {
        Ok(()) => Some(path.display().to_string()),
        Err(e) => {
            tracing::warn!(error = %e, "failed to write debug file");
            None
        }
    }
}
