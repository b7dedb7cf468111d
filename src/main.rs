// Sheet Diff
// Interactive loop: pick a checkpoint, report changed cells, record a new checkpoint

// IMPORTS ------------------>> 

use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, BufRead, IsTerminal, Write};
use std::path::{Path, PathBuf};

use sheet_diff::constants::{CHECKPOINT_PROMPT, NO_CHANGES, PROJECT_CONFIG_NAME};
use sheet_diff::core::{AppConfig, CycleOutcome, InputHandler, ProjectConfig, PromptCommand, Session};
use sheet_diff::operations::{CompareMode, GitOps, Vcs};
use sheet_diff::render::{render_checkpoints, render_report, RenderOptions};
use sheet_diff::SheetDiffError;

//--------------------------------------------------------<<
// CLI ---------------------->> 

/// Diff a version-controlled spreadsheet against its saved checkpoints
#[derive(Parser, Debug)]
#[command(name = "sheet-diff", version)]
#[command(about = "Report which spreadsheet cells changed since a saved checkpoint")]
struct Cli {
    /// The spreadsheet file to track (defaults to test.xlsx)
    #[arg(short, long)]
    file: Option<String>,

    /// Create a local git repository if none exists
    #[arg(short = 'g', long = "make-git")]
    make_git: bool,

    /// Repository root
    #[arg(short = 'C', long = "repo", default_value = ".")]
    repo: PathBuf,

    /// Project configuration file (defaults to sheet-diff.yaml in the repository root)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Treat cells of different types as changed even when they print the same
    #[arg(long)]
    typed: bool,

    /// Run a single diff cycle and exit
    #[arg(long)]
    once: bool,

    /// Verbose logging to stderr
    #[arg(short, long)]
    verbose: bool,
}

//--------------------------------------------------------<<

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(io::stderr)
        .init();

    let repo_root = cli
        .repo
        .canonicalize()
        .with_context(|| format!("Repository directory not found: {}", cli.repo.display()))?;

    let config = load_config(&repo_root, cli.config.as_deref(), cli.typed)?;
    let git = open_repository(&repo_root, &cli, &config)?;

    let file = match &cli.file {
        Some(file) => {
            println!("requested to run on file : {}", file);
            file.clone()
        }
        None => {
            println!("Using default file : {}", config.tracking.default_file);
            config.tracking.default_file.clone()
        }
    };

    let options = RenderOptions {
        empty_marker: config.diff.empty_marker.clone(),
        styled: io::stdout().is_terminal(),
    };

    let mut session = Session::new(&git, config, &file);
    run(&mut session, &options, cli.once)
}

/// Merge compiled defaults, the project file and command-line switches
fn load_config(repo_root: &Path, explicit: Option<&Path>, typed: bool) -> Result<AppConfig> {
    let project = match explicit {
        Some(path) => Some(ProjectConfig::load(path).map_err(|e| SheetDiffError::Config {
            path: path.to_path_buf(),
            reason: format!("{:#}", e),
        })?),
        None => ProjectConfig::load_from_workspace(repo_root, PROJECT_CONFIG_NAME).map_err(|e| {
            SheetDiffError::Config {
                path: repo_root.join(PROJECT_CONFIG_NAME),
                reason: format!("{:#}", e),
            }
        })?,
    };

    let mut config = match project {
        Some(project) => AppConfig::default().with_project(&project),
        None => AppConfig::default(),
    };

    if typed {
        config.diff.compare_mode = CompareMode::Typed;
    }

    tracing::debug!(?config, "configuration loaded");
    Ok(config)
}

/// Open the repository, creating it first when --make-git was passed
fn open_repository(repo_root: &Path, cli: &Cli, config: &AppConfig) -> Result<GitOps> {
    if !cli.make_git {
        return GitOps::open(repo_root);
    }

    if GitOps::is_repo(repo_root) {
        println!("Git repo creation requested through flags, but repo already exists in current directory.");
        return GitOps::open(repo_root);
    }

    let git = GitOps::init(repo_root)?;
    match &cli.file {
        Some(file) => {
            git.record(Path::new(file), &config.checkpoints.initial_commit_message)?;
            println!("Git repo created in current directory and added file: {}.", file);
        }
        None => println!("Created git repo in current directory."),
    }

    Ok(git)
}

/// Prompt for checkpoints until the user quits or a fatal error occurs
fn run<V: Vcs>(session: &mut Session<'_, V>, options: &RenderOptions, once: bool) -> Result<()> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        let checkpoints = session.checkpoints()?;
        print!("{}", render_checkpoints(&checkpoints));
        println!();
        print!("{}", CHECKPOINT_PROMPT);
        io::stdout().flush()?;

        let line = lines.next().transpose()?;
        let index = match InputHandler::handle(line.as_deref()) {
            PromptCommand::Quit => break,
            PromptCommand::Invalid(text) => {
                println!("'{}' is not a checkpoint number", text);
                continue;
            }
            PromptCommand::Select(index) => index,
        };

        match session.run_cycle(index) {
            Ok(CycleOutcome::NoChanges { .. }) => println!("{}", NO_CHANGES),
            Ok(CycleOutcome::Compared {
                report, reconcile, ..
            }) => {
                if !report.is_empty() {
                    println!("Changes detected.");
                }
                print!("{}", render_report(&report, options));
                if reconcile.committed {
                    println!("Recorded checkpoint: {}", reconcile.message);
                }
                if let Some(leftover) = &reconcile.leftover {
                    println!(
                        "Warning: could not delete {}; remove it before the next diff",
                        leftover.display()
                    );
                }
            }
            Err(err) if !err.is_fatal() => {
                println!("{}", err);
                session.acknowledge()?;
            }
            Err(err) => return Err(err.into()),
        }

        if once {
            break;
        }
    }

    Ok(())
}
