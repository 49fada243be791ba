use crate::error::{Result, ShotError};
use crate::logok;
use crate::version::{Resolution, script_file_name};
use std::path::{Path, PathBuf};
use tokio::fs::{self, OpenOptions};

/// What to do when a script already exists for the shot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadChoice {
    OpenExisting,
    CreateNew,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadAction {
    /// No script yet: copy the template to version 1.
    SeedFromTemplate { template: PathBuf, target: PathBuf },
    OpenExisting { path: PathBuf },
    /// Copy the highest version to the next one.
    Increment { from: PathBuf, target: PathBuf },
}

impl LoadAction {
    /// The script the tool should be launched on once the action has run.
    pub fn script_path(&self) -> &Path {
        match self {
            LoadAction::SeedFromTemplate { target, .. } => target.as_path(),
            LoadAction::OpenExisting { path } => path.as_path(),
            LoadAction::Increment { target, .. } => target.as_path(),
        }
    }
}

/// Picks the action for a resolver outcome. `choice` only matters when a
/// script was found.
pub fn plan(
    resolution: Resolution,
    choice: LoadChoice,
    scripts_dir: &Path,
    shot: &str,
    extension: &str,
    template: &Path,
) -> LoadAction {
    match (resolution, choice) {
        (Resolution::NoExistingScript, _) => LoadAction::SeedFromTemplate {
            template: template.to_path_buf(),
            target: scripts_dir.join(script_file_name(shot, extension, 1)),
        },
        (Resolution::Found { path, .. }, LoadChoice::OpenExisting) => {
            LoadAction::OpenExisting { path }
        }
        (Resolution::Found { version, path }, LoadChoice::CreateNew) => LoadAction::Increment {
            target: scripts_dir.join(script_file_name(
                shot,
                extension,
                version.saturating_add(1),
            )),
            from: path,
        },
    }
}

/// Runs the copy part of `action` and returns the script to open.
/// Never overwrites an existing script.
pub async fn execute(action: &LoadAction) -> Result<PathBuf> {
    match action {
        LoadAction::SeedFromTemplate { template, target } => copy_new(template, target).await?,
        LoadAction::Increment { from, target } => copy_new(from, target).await?,
        LoadAction::OpenExisting { .. } => {}
    }
    Ok(action.script_path().to_path_buf())
}

async fn copy_new(from: &Path, to: &Path) -> Result<()> {
    let mut src = fs::File::open(from)
        .await
        .map_err(|e| ShotError::fs(from, e))?;
    let mut dst = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(to)
        .await
        .map_err(|e| ShotError::fs(to, e))?;
    tokio::io::copy(&mut src, &mut dst)
        .await
        .map_err(|e| ShotError::fs(to, e))?;
    dst.sync_all().await.map_err(|e| ShotError::fs(to, e))?;

    logok(format!("Created script: {}", to.display()));
    Ok(())
}
