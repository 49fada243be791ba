use crate::error::{Result, ShotError};
use crate::logw;
use std::path::Path;
use tokio::fs;

/// Lists the top-level entry names under `footage_root`, sorted by name.
/// Every entry is a shot, files included.
pub async fn list_shots(footage_root: &Path) -> Result<Vec<String>> {
    let mut entries = fs::read_dir(footage_root)
        .await
        .map_err(|e| ShotError::fs(footage_root, e))?;

    let mut shots = Vec::new();
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| ShotError::fs(footage_root, e))?
    {
        match entry.file_name().into_string() {
            Ok(name) => shots.push(name),
            Err(raw) => logw(format!("Skipping non UTF-8 footage entry: {:?}", raw)),
        }
    }

    if shots.is_empty() {
        return Err(ShotError::EmptySource(footage_root.to_path_buf()));
    }

    shots.sort();
    Ok(shots)
}

/// Treats [`ShotError::EmptySource`] as an empty batch.
pub async fn list_shots_or_empty(footage_root: &Path) -> Result<Vec<String>> {
    match list_shots(footage_root).await {
        Err(ShotError::EmptySource(path)) => {
            logw(format!("Footage folder is empty: {}", path.display()));
            Ok(Vec::new())
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn lists_files_and_directories_alike() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("sh020")).unwrap();
        std::fs::create_dir(dir.path().join("sh010")).unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"x").unwrap();

        let shots = list_shots(dir.path()).await.unwrap();
        assert_eq!(shots, vec!["notes.txt", "sh010", "sh020"]);
    }

    #[tokio::test]
    async fn empty_folder_is_empty_source() {
        let dir = TempDir::new().unwrap();
        let err = list_shots(dir.path()).await.unwrap_err();
        assert!(matches!(err, ShotError::EmptySource(p) if p == dir.path()));

        assert!(list_shots_or_empty(dir.path()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn missing_folder_is_a_filesystem_error() {
        let dir = TempDir::new().unwrap();
        let err = list_shots(&dir.path().join("nope")).await.unwrap_err();
        assert!(matches!(err, ShotError::Filesystem { .. }));
    }
}
