//! The actions a user triggers: each takes the session it runs against and
//! fails on its own without affecting the next one.

use crate::copier::{self, CopyReport};
use crate::error::{Result, ShotError};
use crate::footage;
use crate::launcher::{LaunchRequest, ToolLauncher};
use crate::layout::{self, ScaffoldOutcome};
use crate::loader::{self, LoadAction, LoadChoice};
use crate::session::Session;
use crate::version;
use crate::{logi, logok, logw};
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub struct CreateReport {
    pub project_dir: PathBuf,
    pub project_created: bool,
    pub shots: Vec<(String, ScaffoldOutcome)>,
}

pub async fn list_shots(session: &Session) -> Result<Vec<String>> {
    footage::list_shots(session.footage_root()?).await
}

/// Creates the project folder and the layout of every shot found in the
/// footage folder. Stops at the first shot that fails.
pub async fn create_project(session: &Session) -> Result<CreateReport> {
    let project_dir = session.project_dir()?;
    let footage_root = session.footage_root()?;

    let project_created = layout::ensure_project_dir(&project_dir).await?;
    let shots = footage::list_shots_or_empty(footage_root).await?;

    let mut report = CreateReport {
        project_dir,
        project_created,
        shots: Vec::with_capacity(shots.len()),
    };
    for shot in shots {
        let outcome = layout::scaffold_shot(&report.project_dir, &shot).await?;
        match &outcome {
            ScaffoldOutcome::Created => logok(format!("Created shot folders: {shot}")),
            ScaffoldOutcome::AlreadyExists => logi(format!("{shot} already exists.")),
            ScaffoldOutcome::Repaired { created } => {
                logw(format!("{shot} was missing {}", created.join(", ")))
            }
        }
        report.shots.push((shot, outcome));
    }

    logok("Folders created successfully.");
    Ok(report)
}

/// Copies every shot's footage into the project. Per-shot failures are in
/// the returned list; only configuration and enumeration errors abort.
pub async fn copy_footage(session: &Session) -> Result<Vec<Result<CopyReport>>> {
    let project_dir = session.project_dir()?;
    let footage_root = session.footage_root()?;
    let shots = footage::list_shots_or_empty(footage_root).await?;

    let results = copier::copy_all(footage_root, &project_dir, &shots).await;
    if results.iter().all(|r| r.is_ok()) {
        logok("Footage copied successfully.");
    }
    Ok(results)
}

#[derive(Debug)]
pub struct LoadOutcome {
    pub action: LoadAction,
    pub script: PathBuf,
    pub pid: u32,
}

/// Resolves the shot's latest script, creates a new one when needed and
/// opens it. `choose` is only asked when a script already exists.
pub async fn load_script<F>(
    session: &Session,
    launcher: &ToolLauncher,
    shot: &str,
    choose: F,
) -> Result<LoadOutcome>
where
    F: FnOnce(&Path) -> LoadChoice,
{
    if shot.is_empty() {
        return Err(ShotError::NotConfigured("shot"));
    }
    let project_dir = session.project_dir()?;
    let scripts_dir = layout::scripts_dir(&project_dir, shot);
    let extension = session.script_extension();

    let resolution = version::resolve(&scripts_dir, shot, extension).await?;
    // The template is only read when there is no script to start from.
    let (choice, template) = match &resolution {
        version::Resolution::Found { path, .. } => (choose(path), PathBuf::new()),
        version::Resolution::NoExistingScript => (
            LoadChoice::CreateNew,
            session.template_path()?.to_path_buf(),
        ),
    };

    let action = loader::plan(resolution, choice, &scripts_dir, shot, extension, &template);
    let script = loader::execute(&action).await?;
    let pid = launcher.launch(&LaunchRequest::OpenScript {
        script: script.clone(),
    })?;

    logi(format!("Opening {shot} shot: {}", script.display()));
    Ok(LoadOutcome {
        action,
        script,
        pid,
    })
}

/// Builds the request that hands `shot` to the in-host setup script.
pub fn setup_request(session: &Session, shot: &str) -> Result<LaunchRequest> {
    if shot.is_empty() {
        return Err(ShotError::NotConfigured("shot"));
    }
    let project_dir = session.project_dir()?;
    Ok(LaunchRequest::SetupShot {
        setup_script: session.setup_script()?.to_path_buf(),
        template: session.template_path()?.to_path_buf(),
        input_footage: layout::shot_footage_dir(&project_dir, shot),
        scripts: layout::scripts_dir(&project_dir, shot),
        shot: shot.to_string(),
        renders: layout::renders_dir(&project_dir, shot),
    })
}

pub fn setup_shot(session: &Session, launcher: &ToolLauncher, shot: &str) -> Result<u32> {
    let request = setup_request(session, shot)?;
    let pid = launcher.launch(&request)?;
    logi(format!("Setting up {shot} in {}", launcher.program().display()));
    Ok(pid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::session::Overrides;
    use tempfile::TempDir;

    struct Fixture {
        _root: TempDir,
        footage: PathBuf,
        base: PathBuf,
        template: PathBuf,
    }

    impl Fixture {
        fn new(shots: &[&str]) -> Self {
            let root = TempDir::new().unwrap();
            let footage = root.path().join("footage");
            let base = root.path().join("projects");
            std::fs::create_dir_all(&footage).unwrap();
            std::fs::create_dir_all(&base).unwrap();
            for shot in shots {
                let dir = footage.join(shot);
                std::fs::create_dir_all(&dir).unwrap();
                std::fs::write(dir.join(format!("{shot}.1001.exr")), b"px").unwrap();
            }
            let template = root.path().join("template.nk");
            std::fs::write(&template, b"Root { template }").unwrap();
            Self {
                _root: root,
                footage,
                base,
                template,
            }
        }

        fn session(&self) -> Session {
            Session::new(
                Config::default(),
                Overrides {
                    footage_root: Some(self.footage.clone()),
                    project_base: Some(self.base.clone()),
                    project_name: Some("heist".into()),
                    template_path: Some(self.template.clone()),
                    setup_script: Some("/tools/setup_shot.py".into()),
                    ..Overrides::default()
                },
            )
        }

        fn project(&self) -> PathBuf {
            self.base.join("heist")
        }
    }

    #[tokio::test]
    async fn create_then_create_again() {
        let fx = Fixture::new(&["sh010", "sh020"]);
        let session = fx.session();

        let first = create_project(&session).await.unwrap();
        assert!(first.project_created);
        assert_eq!(
            first.shots,
            vec![
                ("sh010".to_string(), ScaffoldOutcome::Created),
                ("sh020".to_string(), ScaffoldOutcome::Created),
            ]
        );

        let second = create_project(&session).await.unwrap();
        assert!(!second.project_created);
        assert!(second
            .shots
            .iter()
            .all(|(_, o)| *o == ScaffoldOutcome::AlreadyExists));
    }

    #[tokio::test]
    async fn empty_footage_is_a_no_op_batch() {
        let fx = Fixture::new(&[]);
        let session = fx.session();

        let report = create_project(&session).await.unwrap();
        assert!(report.shots.is_empty());
        assert!(copy_footage(&session).await.unwrap().is_empty());
        assert!(matches!(
            list_shots(&session).await,
            Err(ShotError::EmptySource(_))
        ));
    }

    #[tokio::test]
    async fn unconfigured_session_fails_early() {
        let session = Session::new(Config::default(), Overrides::default());
        assert!(matches!(
            create_project(&session).await,
            Err(ShotError::NotConfigured(_))
        ));
        assert!(matches!(
            copy_footage(&session).await,
            Err(ShotError::NotConfigured(_))
        ));
    }

    #[tokio::test]
    async fn copy_after_create() {
        let fx = Fixture::new(&["sh010"]);
        let session = fx.session();
        create_project(&session).await.unwrap();

        let results = copy_footage(&session).await.unwrap();
        assert_eq!(results.len(), 1);
        assert!(fx
            .project()
            .join("sh010/input_footage/sh010/sh010.1001.exr")
            .is_file());

        let again = copy_footage(&session).await.unwrap();
        assert!(matches!(again[0], Err(ShotError::Copy { .. })));
    }

    #[tokio::test]
    async fn load_without_tool_still_reports_tool_not_found() {
        let fx = Fixture::new(&["sh010"]);
        let session = fx.session();
        create_project(&session).await.unwrap();
        let launcher = ToolLauncher::new(fx.base.join("no-such-nuke"));

        let err = load_script(&session, &launcher, "sh010", |_| LoadChoice::OpenExisting)
            .await
            .unwrap_err();
        assert!(matches!(err, ShotError::ToolNotFound(_)));
        // The script is created before the launch is attempted.
        assert!(fx.project().join("sh010/scripts/sh010_v001.nk").is_file());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn load_asks_only_when_a_script_exists() {
        let fx = Fixture::new(&["sh010"]);
        let session = fx.session();
        create_project(&session).await.unwrap();
        let launcher = ToolLauncher::new("/bin/true");

        let first = load_script(&session, &launcher, "sh010", |_| {
            panic!("nothing to choose between yet")
        })
        .await
        .unwrap();
        assert!(first.script.ends_with("sh010_v001.nk"));

        let mut asked = None;
        let second = load_script(&session, &launcher, "sh010", |existing| {
            asked = Some(existing.to_path_buf());
            LoadChoice::CreateNew
        })
        .await
        .unwrap();
        assert_eq!(asked, Some(first.script.clone()));
        assert!(second.script.ends_with("sh010_v002.nk"));
        assert_eq!(
            std::fs::read(&second.script).unwrap(),
            b"Root { template }"
        );
    }

    #[test]
    fn setup_request_points_into_the_shot() {
        let fx = Fixture::new(&["sh010"]);
        let request = setup_request(&fx.session(), "sh010").unwrap();
        let project = fx.project();

        assert_eq!(
            request,
            LaunchRequest::SetupShot {
                setup_script: "/tools/setup_shot.py".into(),
                template: fx.template.clone(),
                input_footage: project.join("sh010/input_footage/sh010"),
                scripts: project.join("sh010/scripts"),
                shot: "sh010".into(),
                renders: project.join("sh010/renders"),
            }
        );
    }

    #[test]
    fn empty_shot_is_rejected() {
        let fx = Fixture::new(&["sh010"]);
        assert!(matches!(
            setup_request(&fx.session(), ""),
            Err(ShotError::NotConfigured("shot"))
        ));
    }
}
