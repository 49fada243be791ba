use crate::config::Config;
use crate::error::{Result, ShotError};
use std::path::{Path, PathBuf};

/// Command-line values that take precedence over the config file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub footage_root: Option<PathBuf>,
    pub project_base: Option<PathBuf>,
    pub project_name: Option<String>,
    pub tool_path: Option<PathBuf>,
    pub template_path: Option<PathBuf>,
    pub setup_script: Option<PathBuf>,
}

/// The paths and names one action works against. Built once, never mutated.
#[derive(Debug, Clone)]
pub struct Session {
    footage_root: Option<PathBuf>,
    project_base: Option<PathBuf>,
    project_name: Option<String>,
    tool_path: PathBuf,
    template_path: Option<PathBuf>,
    setup_script: Option<PathBuf>,
    script_extension: String,
}

impl Session {
    pub fn new(config: Config, overrides: Overrides) -> Self {
        Self {
            footage_root: overrides.footage_root.or(config.footage_root),
            project_base: overrides.project_base.or(config.project_base),
            project_name: overrides
                .project_name
                .or(config.project_name)
                .filter(|name| !name.trim().is_empty()),
            tool_path: overrides.tool_path.unwrap_or(config.tool_path),
            template_path: overrides.template_path.or(config.template_path),
            setup_script: overrides.setup_script.or(config.setup_script),
            script_extension: config.script_extension,
        }
    }

    pub fn footage_root(&self) -> Result<&Path> {
        non_empty(self.footage_root.as_deref()).ok_or(ShotError::NotConfigured("footage path"))
    }

    pub fn project_name(&self) -> Result<&str> {
        self.project_name
            .as_deref()
            .ok_or(ShotError::NotConfigured("project name"))
    }

    /// `<project_base>/<project_name>`
    pub fn project_dir(&self) -> Result<PathBuf> {
        let base = non_empty(self.project_base.as_deref())
            .ok_or(ShotError::NotConfigured("project folder"))?;
        Ok(base.join(self.project_name()?))
    }

    pub fn tool_path(&self) -> &Path {
        &self.tool_path
    }

    pub fn template_path(&self) -> Result<&Path> {
        non_empty(self.template_path.as_deref()).ok_or(ShotError::NotConfigured("template path"))
    }

    pub fn setup_script(&self) -> Result<&Path> {
        non_empty(self.setup_script.as_deref()).ok_or(ShotError::NotConfigured("setup script"))
    }

    pub fn script_extension(&self) -> &str {
        &self.script_extension
    }
}

fn non_empty(path: Option<&Path>) -> Option<&Path> {
    path.filter(|p| !p.as_os_str().is_empty())
}
