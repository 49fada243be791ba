use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use shot_manager::config::{Config, DEFAULT_CONFIG_FILE};
use shot_manager::launcher::ToolLauncher;
use shot_manager::loader::LoadChoice;
use shot_manager::project;
use shot_manager::session::{Overrides, Session};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "shot-manager",
    version,
    about = "Create VFX project folders, copy shot footage and open versioned Nuke scripts"
)]
struct Cli {
    /// JSON config file. Missing file means defaults.
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    #[command(flatten)]
    paths: PathArgs,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Args)]
struct PathArgs {
    /// Folder whose entries are the shots
    #[arg(long, global = true)]
    footage: Option<PathBuf>,

    /// Folder the project is created in
    #[arg(long, global = true)]
    project_base: Option<PathBuf>,

    #[arg(long, global = true)]
    project_name: Option<String>,

    /// Path to the Nuke executable
    #[arg(long, global = true)]
    nuke: Option<PathBuf>,

    /// Script copied to version 1 of a new shot
    #[arg(long, global = true)]
    template: Option<PathBuf>,

    /// Setup script run inside Nuke by `setup`
    #[arg(long, global = true)]
    setup_script: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// List the shots in the footage folder
    Shots,

    /// Create the project folder and every shot's folders
    Create,

    /// Copy each shot's footage into its input_footage folder
    Copy,

    /// Open the latest script of a shot, creating one if needed
    Load {
        shot: String,

        /// Open the latest version without asking
        #[arg(long, conflicts_with = "new_version")]
        open_existing: bool,

        /// Create the next version without asking
        #[arg(long)]
        new_version: bool,
    },

    /// Build the shot's script from the template inside Nuke
    Setup { shot: String },

    /// Check that the Nuke executable exists
    Check,
}

fn ask_open_existing(existing: &Path) -> LoadChoice {
    println!("The script already exists in the following path:");
    println!("{}", existing.display());
    print!("Open it? [Y/n] (n creates a new version) ");
    let _ = io::stdout().flush();

    let mut answer = String::new();
    if io::stdin().lock().read_line(&mut answer).is_err() {
        return LoadChoice::OpenExisting;
    }
    match answer.trim().to_ascii_lowercase().as_str() {
        "n" | "no" => LoadChoice::CreateNew,
        _ => LoadChoice::OpenExisting,
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let config = Config::load_or_default(&cli.config).await?;
    let session = Session::new(
        config,
        Overrides {
            footage_root: cli.paths.footage,
            project_base: cli.paths.project_base,
            project_name: cli.paths.project_name,
            tool_path: cli.paths.nuke,
            template_path: cli.paths.template,
            setup_script: cli.paths.setup_script,
        },
    );
    let launcher = ToolLauncher::new(session.tool_path());

    match cli.cmd {
        Commands::Shots => {
            for shot in project::list_shots(&session).await? {
                println!("{shot}");
            }
        }
        Commands::Create => {
            let report = project::create_project(&session).await?;
            println!(
                "{} ({} shots)",
                report.project_dir.display(),
                report.shots.len()
            );
        }
        Commands::Copy => {
            let results = project::copy_footage(&session).await?;
            let failed: Vec<_> = results.iter().filter_map(|r| r.as_ref().err()).collect();
            if !failed.is_empty() {
                for err in &failed {
                    eprintln!("Error: {err}");
                }
                bail!("{} of {} shots failed to copy", failed.len(), results.len());
            }
            println!("Footage copied successfully.");
        }
        Commands::Load {
            shot,
            open_existing,
            new_version,
        } => {
            let outcome = project::load_script(&session, &launcher, &shot, |existing| {
                if open_existing {
                    LoadChoice::OpenExisting
                } else if new_version {
                    LoadChoice::CreateNew
                } else {
                    ask_open_existing(existing)
                }
            })
            .await
            .with_context(|| format!("Failed to load script for {shot}"))?;
            println!("Opening script in Nuke: {}", outcome.script.display());
        }
        Commands::Setup { shot } => {
            project::setup_shot(&session, &launcher, &shot)
                .with_context(|| format!("Failed to set up {shot}"))?;
            println!("Opening {shot} shot in Nuke....");
        }
        Commands::Check => {
            if !launcher.is_available() {
                bail!(
                    "Nuke executable not found at {}. Please provide the correct path.",
                    launcher.program().display()
                );
            }
            println!("Nuke found: {}", launcher.program().display());
        }
    }

    Ok(())
}
