use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

pub const DEFAULT_CONFIG_FILE: &str = "shot-manager.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Folder whose top-level entries are the shots.
    #[serde(default)]
    pub footage_root: Option<PathBuf>,
    /// Folder the project folder is created in.
    #[serde(default)]
    pub project_base: Option<PathBuf>,
    #[serde(default)]
    pub project_name: Option<String>,
    #[serde(rename = "nuke_path")]
    #[serde(default = "default_tool_path")]
    pub tool_path: PathBuf,
    #[serde(default)]
    pub template_path: Option<PathBuf>,
    #[serde(default)]
    pub setup_script: Option<PathBuf>,
    #[serde(default = "default_script_extension")]
    pub script_extension: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            footage_root: None,
            project_base: None,
            project_name: None,
            tool_path: default_tool_path(),
            template_path: None,
            setup_script: None,
            script_extension: default_script_extension(),
        }
    }
}

fn default_script_extension() -> String {
    "nk".to_string()
}

pub fn default_tool_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        PathBuf::from(r"C:\Program Files\Nuke15.0v1\Nuke15.0.exe")
    }

    #[cfg(target_os = "macos")]
    {
        PathBuf::from("/Applications/Nuke15.0v1/Nuke15.0v1.app/Contents/MacOS/Nuke15.0")
    }

    #[cfg(all(unix, not(target_os = "macos")))]
    {
        PathBuf::from("/usr/local/Nuke15.0v1/Nuke15.0")
    }
}

impl Config {
    pub async fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)
            .await
            .with_context(|| format!("Failed to read config: {}", path.as_ref().display()))?;
        let config: Config = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config: {}", path.as_ref().display()))?;

        if config.script_extension.is_empty() {
            anyhow::bail!("{}: script_extension is empty", path.as_ref().display());
        }
        if config.script_extension.starts_with('.') {
            anyhow::bail!(
                "{}: script_extension must not start with '.'",
                path.as_ref().display()
            );
        }

        Ok(config)
    }

    /// Like [`Config::load`], but a missing file yields the defaults.
    pub async fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        match fs::metadata(&path).await {
            Ok(_) => Self::load(path).await,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("no config at {}, using defaults", path.as_ref().display());
                Ok(Self::default())
            }
            Err(err) => Err(err)
                .with_context(|| format!("Failed to stat config: {}", path.as_ref().display())),
        }
    }
}
