use crate::error::{Result, ShotError};
use crate::logi;
use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaunchRequest {
    /// Open a script as-is.
    OpenScript { script: PathBuf },
    /// Hand a shot to the setup script that runs inside the host application.
    SetupShot {
        setup_script: PathBuf,
        template: PathBuf,
        input_footage: PathBuf,
        scripts: PathBuf,
        shot: String,
        renders: PathBuf,
    },
}

impl LaunchRequest {
    pub fn args(&self) -> Vec<OsString> {
        match self {
            LaunchRequest::OpenScript { script } => vec![script.into()],
            LaunchRequest::SetupShot {
                setup_script,
                template,
                input_footage,
                scripts,
                shot,
                renders,
            } => vec![
                setup_script.into(),
                template.into(),
                input_footage.into(),
                scripts.into(),
                shot.into(),
                renders.into(),
            ],
        }
    }
}

/// Starts the external compositing application. Fire and forget: the child is
/// neither waited on nor has its output captured.
#[derive(Debug, Clone)]
pub struct ToolLauncher {
    program: PathBuf,
}

impl ToolLauncher {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Whether the program exists. A bare name is looked up on `PATH`.
    pub fn is_available(&self) -> bool {
        self.resolve().is_some()
    }

    /// The file that would be run, if any.
    pub fn resolve(&self) -> Option<PathBuf> {
        let is_bare = self.program.components().count() == 1 && !self.program.has_root();
        if !is_bare {
            return is_file(&self.program).then(|| self.program.clone());
        }

        let search = std::env::var_os("PATH")?;
        std::env::split_paths(&search).find_map(|dir| {
            let candidate = dir.join(&self.program);
            if is_file(&candidate) {
                return Some(candidate);
            }
            #[cfg(windows)]
            {
                let exe = candidate.with_extension("exe");
                if is_file(&exe) {
                    return Some(exe);
                }
            }
            None
        })
    }

    pub fn command(&self, request: &LaunchRequest) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(request.args());
        cmd
    }

    /// Spawns the tool and returns the child's process id.
    pub fn launch(&self, request: &LaunchRequest) -> Result<u32> {
        let child = self.command(request).spawn().map_err(|e| {
            if e.kind() == io::ErrorKind::NotFound {
                ShotError::ToolNotFound(self.program.clone())
            } else {
                ShotError::Launch {
                    program: self.program.clone(),
                    source: e,
                }
            }
        })?;

        let pid = child.id();
        tracing::debug!(pid, program = %self.program.display(), "spawned tool");
        logi(format!("Launched {} (pid {})", self.program.display(), pid));
        Ok(pid)
    }
}

fn is_file(path: &Path) -> bool {
    std::fs::metadata(path).map(|m| m.is_file()).unwrap_or(false)
}
