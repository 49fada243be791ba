//! On-disk layout of a project:
//!
//! ```text
//! <project>/<shot>/
//!   input_footage/<shot>/...
//!   renders/lighting/...
//!   scripts/<shot>_v###.<ext>
//! ```

use crate::error::{Result, ShotError};
use crate::{logi, logok};
use std::path::{Path, PathBuf};
use tokio::fs;

pub const INPUT_FOOTAGE_DIR: &str = "input_footage";
pub const RENDERS_DIR: &str = "renders";
pub const LIGHTING_DIR: &str = "renders/lighting";
pub const SCRIPTS_DIR: &str = "scripts";

/// Created under every shot folder, parents before children.
pub const SHOT_DIRS: &[&str] = &[INPUT_FOOTAGE_DIR, RENDERS_DIR, LIGHTING_DIR, SCRIPTS_DIR];

/// `<project>/<shot>/`
pub fn shot_dir(project: &Path, shot: &str) -> PathBuf {
    project.join(shot)
}

/// `<project>/<shot>/input_footage/`
pub fn input_footage_dir(project: &Path, shot: &str) -> PathBuf {
    shot_dir(project, shot).join(INPUT_FOOTAGE_DIR)
}

/// `<project>/<shot>/input_footage/<shot>/`, the copy destination.
pub fn shot_footage_dir(project: &Path, shot: &str) -> PathBuf {
    input_footage_dir(project, shot).join(shot)
}

/// `<project>/<shot>/renders/`
pub fn renders_dir(project: &Path, shot: &str) -> PathBuf {
    shot_dir(project, shot).join(RENDERS_DIR)
}

/// `<project>/<shot>/scripts/`
pub fn scripts_dir(project: &Path, shot: &str) -> PathBuf {
    shot_dir(project, shot).join(SCRIPTS_DIR)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScaffoldOutcome {
    Created,
    /// Shot folder and all children were already present; nothing was touched.
    AlreadyExists,
    /// Shot folder was present but some children were missing.
    Repaired { created: Vec<&'static str> },
}

async fn dir_exists(path: &Path) -> bool {
    fs::metadata(path).await.map(|m| m.is_dir()).unwrap_or(false)
}

/// Creates `<project>` if needed. Returns `false` when it was already there.
pub async fn ensure_project_dir(project: &Path) -> Result<bool> {
    if dir_exists(project).await {
        logi(format!("{} already exists.", project.display()));
        return Ok(false);
    }
    fs::create_dir_all(project)
        .await
        .map_err(|e| ShotError::fs(project, e))?;
    logok(format!("Created project folder: {}", project.display()));
    Ok(true)
}

/// Ensures every directory in [`SHOT_DIRS`] exists under `<project>/<shot>`.
///
/// Each child is checked on its own, so a shot folder missing some of its
/// children gets them back. A failed attempt leaves whatever was created.
pub async fn scaffold_shot(project: &Path, shot: &str) -> Result<ScaffoldOutcome> {
    let root = shot_dir(project, shot);
    let shot_existed = dir_exists(&root).await;

    let mut created = Vec::new();
    for dir in SHOT_DIRS {
        let path = root.join(dir);
        if dir_exists(&path).await {
            continue;
        }
        fs::create_dir_all(&path)
            .await
            .map_err(|e| ShotError::fs(&path, e))?;
        created.push(*dir);
    }

    let outcome = match (shot_existed, created.is_empty()) {
        (false, _) => ScaffoldOutcome::Created,
        (true, true) => ScaffoldOutcome::AlreadyExists,
        (true, false) => ScaffoldOutcome::Repaired { created },
    };
    tracing::debug!(shot, ?outcome, "scaffolded shot");
    Ok(outcome)
}
