use crate::error::{CopyFailure, ShotError};
use crate::layout;
use crate::{logok, logw};
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;
use walkdir::WalkDir;

#[derive(Debug, Clone)]
pub struct CopyReport {
    pub shot: String,
    pub destination: PathBuf,
    pub files: usize,
    pub bytes: u64,
}

fn failure(shot: &str, failure: CopyFailure) -> ShotError {
    ShotError::Copy {
        shot: shot.to_string(),
        failure,
    }
}

fn io_failure(shot: &str, path: &Path, source: io::Error) -> ShotError {
    failure(
        shot,
        CopyFailure::Io {
            path: path.to_path_buf(),
            source,
        },
    )
}

/// Recursively copies `<source_root>/<shot>` to
/// `<project>/<shot>/input_footage/<shot>`.
///
/// The destination must not exist. Anything copied before a mid-copy
/// failure stays on disk.
pub async fn copy_shot(
    source_root: &Path,
    project: &Path,
    shot: &str,
) -> Result<CopyReport, ShotError> {
    let src = source_root.join(shot);
    let dest = layout::shot_footage_dir(project, shot);

    match fs::metadata(&src).await {
        Ok(meta) if meta.is_dir() => {}
        Ok(_) => return Err(failure(shot, CopyFailure::SourceNotDirectory(src))),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(failure(shot, CopyFailure::SourceMissing(src)));
        }
        Err(e) => return Err(io_failure(shot, &src, e)),
    }

    if fs::symlink_metadata(&dest).await.is_ok() {
        return Err(failure(shot, CopyFailure::DestinationExists(dest)));
    }
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)
            .await
            .map_err(|e| io_failure(shot, parent, e))?;
    }
    // Fails if the destination appeared after the check.
    fs::create_dir(&dest).await.map_err(|e| {
        if e.kind() == io::ErrorKind::AlreadyExists {
            failure(shot, CopyFailure::DestinationExists(dest.clone()))
        } else {
            io_failure(shot, &dest, e)
        }
    })?;

    let mut report = CopyReport {
        shot: shot.to_string(),
        destination: dest.clone(),
        files: 0,
        bytes: 0,
    };

    for entry in WalkDir::new(&src)
        .min_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(&src).to_path_buf();
            io_failure(shot, &path, io::Error::other(e))
        })?;
        let Some(rel) = pathdiff::diff_paths(entry.path(), &src) else {
            continue;
        };
        let target = dest.join(rel);

        if entry.file_type().is_dir() {
            fs::create_dir(&target)
                .await
                .map_err(|e| io_failure(shot, &target, e))?;
        } else {
            let bytes = fs::copy(entry.path(), &target)
                .await
                .map_err(|e| io_failure(shot, entry.path(), e))?;
            report.files += 1;
            report.bytes += bytes;
        }
    }

    tracing::debug!(
        shot,
        files = report.files,
        bytes = report.bytes,
        "copied footage"
    );
    Ok(report)
}

/// Copies every shot in turn. A failing shot is reported and the batch moves on.
pub async fn copy_all(
    source_root: &Path,
    project: &Path,
    shots: &[String],
) -> Vec<Result<CopyReport, ShotError>> {
    let mut results = Vec::with_capacity(shots.len());
    for shot in shots {
        let result = copy_shot(source_root, project, shot).await;
        match &result {
            Ok(report) => logok(format!(
                "Copied {} ({} files) to {}",
                shot,
                report.files,
                report.destination.display()
            )),
            Err(err) => logw(format!("Error: {}", err)),
        }
        results.push(result);
    }
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn seed_shot(root: &Path, shot: &str) {
        let plates = root.join(shot).join("plate");
        std::fs::create_dir_all(&plates).unwrap();
        std::fs::write(plates.join("plate.1001.exr"), b"frame-1001").unwrap();
        std::fs::write(plates.join("plate.1002.exr"), b"frame-1002").unwrap();
        std::fs::write(root.join(shot).join("notes.txt"), b"slate").unwrap();
    }

    #[tokio::test]
    async fn copies_the_whole_tree() {
        let src = TempDir::new().unwrap();
        let project = TempDir::new().unwrap();
        seed_shot(src.path(), "sh010");

        let report = copy_shot(src.path(), project.path(), "sh010").await.unwrap();
        assert_eq!(report.files, 3);
        assert_eq!(report.bytes, 10 + 10 + 5);

        let dest = project.path().join("sh010/input_footage/sh010");
        assert_eq!(dest, report.destination);
        assert_eq!(
            std::fs::read(dest.join("plate/plate.1002.exr")).unwrap(),
            b"frame-1002"
        );
        assert_eq!(std::fs::read(dest.join("notes.txt")).unwrap(), b"slate");
    }

    #[tokio::test]
    async fn existing_destination_is_left_alone() {
        let src = TempDir::new().unwrap();
        let project = TempDir::new().unwrap();
        seed_shot(src.path(), "sh010");
        let dest = project.path().join("sh010/input_footage/sh010");
        std::fs::create_dir_all(&dest).unwrap();
        std::fs::write(dest.join("old.exr"), b"old").unwrap();

        let err = copy_shot(src.path(), project.path(), "sh010")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ShotError::Copy {
                ref shot,
                failure: CopyFailure::DestinationExists(_),
            } if shot == "sh010"
        ));
        assert_eq!(std::fs::read(dest.join("old.exr")).unwrap(), b"old");
        assert!(!dest.join("notes.txt").exists());
    }

    #[tokio::test]
    async fn file_and_missing_sources_are_refused() {
        let src = TempDir::new().unwrap();
        let project = TempDir::new().unwrap();
        std::fs::write(src.path().join("readme.txt"), b"x").unwrap();

        let err = copy_shot(src.path(), project.path(), "readme.txt")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ShotError::Copy { failure: CopyFailure::SourceNotDirectory(_), .. }
        ));

        let err = copy_shot(src.path(), project.path(), "sh999")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ShotError::Copy { failure: CopyFailure::SourceMissing(_), .. }
        ));
    }

    #[tokio::test]
    async fn batch_continues_past_a_failure() {
        let src = TempDir::new().unwrap();
        let project = TempDir::new().unwrap();
        seed_shot(src.path(), "sh010");
        seed_shot(src.path(), "sh030");
        std::fs::create_dir_all(project.path().join("sh010/input_footage/sh010")).unwrap();

        let shots = vec!["sh010".to_string(), "sh020".to_string(), "sh030".to_string()];
        let results = copy_all(src.path(), project.path(), &shots).await;

        assert_eq!(results.len(), 3);
        assert!(results[0].is_err());
        assert!(results[1].is_err());
        assert!(results[2].is_ok());
        assert!(project
            .path()
            .join("sh030/input_footage/sh030/notes.txt")
            .is_file());
    }

    #[tokio::test]
    async fn empty_batch_is_a_no_op() {
        let src = TempDir::new().unwrap();
        let project = TempDir::new().unwrap();
        assert!(copy_all(src.path(), project.path(), &[]).await.is_empty());
    }
}
