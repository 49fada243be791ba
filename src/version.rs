use crate::error::{Result, ShotError};
use regex::{Regex, RegexBuilder};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Width new version numbers are zero-padded to. Reads accept any width.
pub const VERSION_WIDTH: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    NoExistingScript,
    Found { version: u32, path: PathBuf },
}

/// Matches `<shot>_v<digits>.<ext>`, ignoring case.
#[derive(Debug, Clone)]
pub struct ScriptPattern {
    re: Regex,
}

impl ScriptPattern {
    pub fn new(shot: &str, extension: &str) -> Result<Self> {
        let pattern = format!(
            r"^{}_v(\d+)\.{}$",
            regex::escape(shot),
            regex::escape(extension)
        );
        let re = RegexBuilder::new(&pattern)
            .case_insensitive(true)
            .build()?;
        Ok(Self { re })
    }

    /// The version number in `file_name`, if it names a script of this shot.
    pub fn version_of(&self, file_name: &str) -> Option<u32> {
        self.re.captures(file_name)?.get(1)?.as_str().parse().ok()
    }
}

/// `<shot>_v<NNN>.<ext>`
pub fn script_file_name(shot: &str, extension: &str, version: u32) -> String {
    format!(
        "{}_v{:0width$}.{}",
        shot,
        version,
        extension,
        width = VERSION_WIDTH
    )
}

/// Finds the numerically highest version script for `shot` in `scripts_dir`.
pub async fn resolve(scripts_dir: &Path, shot: &str, extension: &str) -> Result<Resolution> {
    let pattern = ScriptPattern::new(shot, extension)?;
    let mut entries = fs::read_dir(scripts_dir)
        .await
        .map_err(|e| ShotError::fs(scripts_dir, e))?;

    let mut best: Option<(u32, PathBuf)> = None;
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| ShotError::fs(scripts_dir, e))?
    {
        let Some(version) = entry.file_name().to_str().and_then(|n| pattern.version_of(n)) else {
            continue;
        };
        let path = entry.path();
        let is_file = fs::metadata(&path).await.map(|m| m.is_file()).unwrap_or(false);
        if !is_file {
            continue;
        }
        if best.as_ref().is_none_or(|(v, _)| version > *v) {
            best = Some((version, path));
        }
    }

    Ok(match best {
        Some((version, path)) => Resolution::Found { version, path },
        None => Resolution::NoExistingScript,
    })
}
