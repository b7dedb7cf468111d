// Git Operations
// Git integration for checkpoint history, single-file checkout and commits

use anyhow::{bail, Context, Result};
use chrono::{DateTime, FixedOffset};
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

/// Field separator used in `git log` output
const LOG_FIELD_SEP: char = '\u{1f}';

/// A saved state of the repository, as listed by `git log`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Checkpoint {
    /// Full commit hash
    pub id: String,
    /// Author name
    pub author: String,
    /// Author timestamp
    pub timestamp: DateTime<FixedOffset>,
    /// First line of the commit message
    pub summary: String,
    /// Position in history, 0 is the most recent
    pub position: usize,
}

impl fmt::Display for Checkpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.id, self.timestamp)
    }
}

/// Version control operations a diff cycle depends on
pub trait Vcs {
    /// Repository root that relative paths are resolved against
    fn root(&self) -> &Path;

    /// Checkpoints, newest first
    fn checkpoints(&self) -> Result<Vec<Checkpoint>>;

    /// Whether `path` in the working tree differs from its content at `checkpoint`
    fn has_changed_since(&self, checkpoint: &Checkpoint, path: &Path) -> Result<bool>;

    /// Replace `path` in the working tree with its content at `checkpoint`
    fn checkout_file(&self, checkpoint: &Checkpoint, path: &Path) -> Result<()>;

    /// Stage and commit `path`. Returns false when there was nothing to commit.
    fn record(&self, path: &Path, message: &str) -> Result<bool>;
}

/// Git operations handler bound to one repository
#[derive(Debug, Clone)]
pub struct GitOps {
    repo_path: PathBuf,
}

impl GitOps {
    /// Check if a path is inside a git work tree
    pub fn is_repo(path: &Path) -> bool {
        Command::new("git")
            .args(["rev-parse", "--is-inside-work-tree"])
            .current_dir(path)
            .output()
            .map(|output| output.status.success())
            .unwrap_or(false)
    }

    /// Open an existing repository
    pub fn open(repo_path: &Path) -> Result<Self> {
        if !Self::is_repo(repo_path) {
            bail!(
                "{} is not a git repository (run with --make-git to create one)",
                repo_path.display()
            );
        }

        Ok(Self {
            repo_path: repo_path.to_path_buf(),
        })
    }

    /// Initialize a new repository
    pub fn init(repo_path: &Path) -> Result<Self> {
        let output = Command::new("git")
            .args(["init"])
            .current_dir(repo_path)
            .output()
            .with_context(|| format!("Failed to run git init in {}", repo_path.display()))?;

        if !output.status.success() {
            bail!("Git init failed: {}", String::from_utf8_lossy(&output.stderr));
        }

        Ok(Self {
            repo_path: repo_path.to_path_buf(),
        })
    }

    /// Git command rooted at the repository
    fn git(&self) -> Command {
        let mut command = Command::new("git");
        command.current_dir(&self.repo_path);
        command
    }

    /// Run a prepared git command
    fn run(command: &mut Command) -> Result<Output> {
        command.output().context("Failed to run git")
    }

    /// Whether HEAD points at a commit yet
    fn has_head(&self) -> Result<bool> {
        let output = Self::run(self.git().args(["rev-parse", "--verify", "--quiet", "HEAD"]))?;
        Ok(output.status.success())
    }

    /// Stage a file
    pub fn add(&self, file_path: &Path) -> Result<()> {
        let output = Self::run(self.git().args(["add", "--"]).arg(file_path))?;

        if !output.status.success() {
            bail!("Git add failed: {}", String::from_utf8_lossy(&output.stderr));
        }

        Ok(())
    }

    /// Commit the staged content of a single path
    pub fn commit(&self, file_path: &Path, message: &str) -> Result<()> {
        let output = Self::run(
            self.git()
                .args(["commit", "-m", message, "--"])
                .arg(file_path),
        )?;

        if !output.status.success() {
            bail!("Git commit failed: {}", String::from_utf8_lossy(&output.stderr));
        }

        Ok(())
    }

    /// Whether the index holds changes to `file_path` that HEAD does not
    fn has_staged_changes(&self, file_path: &Path) -> Result<bool> {
        if !self.has_head()? {
            return Ok(true);
        }

        let output = Self::run(
            self.git()
                .args(["diff", "--cached", "--quiet", "--"])
                .arg(file_path),
        )?;

        match output.status.code() {
            Some(0) => Ok(false),
            Some(1) => Ok(true),
            _ => bail!("Git diff failed: {}", String::from_utf8_lossy(&output.stderr)),
        }
    }
}

impl Vcs for GitOps {
    fn root(&self) -> &Path {
        &self.repo_path
    }

    fn checkpoints(&self) -> Result<Vec<Checkpoint>> {
        if !self.has_head()? {
            return Ok(Vec::new());
        }

        let output = Self::run(self.git().args(["log", "--format=%H%x1f%an%x1f%aI%x1f%s"]))?;
        if !output.status.success() {
            bail!("Git log failed: {}", String::from_utf8_lossy(&output.stderr));
        }

        let text = String::from_utf8(output.stdout)?;
        parse_log(&text)
    }

    fn has_changed_since(&self, checkpoint: &Checkpoint, path: &Path) -> Result<bool> {
        let output = Self::run(
            self.git()
                .args(["diff", "--name-only", checkpoint.id.as_str(), "--"])
                .arg(path),
        )?;

        if !output.status.success() {
            bail!("Git diff failed: {}", String::from_utf8_lossy(&output.stderr));
        }

        Ok(!String::from_utf8_lossy(&output.stdout).trim().is_empty())
    }

    fn checkout_file(&self, checkpoint: &Checkpoint, path: &Path) -> Result<()> {
        let output = Self::run(
            self.git()
                .args(["checkout", checkpoint.id.as_str(), "--"])
                .arg(path),
        )?;

        if !output.status.success() {
            bail!("Git checkout failed: {}", String::from_utf8_lossy(&output.stderr).trim());
        }

        Ok(())
    }

    fn record(&self, path: &Path, message: &str) -> Result<bool> {
        self.add(path)?;

        if !self.has_staged_changes(path)? {
            return Ok(false);
        }

        self.commit(path, message)?;
        Ok(true)
    }
}

/// Parse `git log --format=%H%x1f%an%x1f%aI%x1f%s` output
fn parse_log(text: &str) -> Result<Vec<Checkpoint>> {
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .enumerate()
        .map(|(position, line)| {
            let mut fields = line.splitn(4, LOG_FIELD_SEP);
            let id = fields.next().unwrap_or_default().to_string();
            let author = fields.next().unwrap_or_default().to_string();
            let raw_time = fields.next().unwrap_or_default();
            let summary = fields.next().unwrap_or_default().to_string();

            let timestamp = DateTime::parse_from_rfc3339(raw_time)
                .with_context(|| format!("Bad author timestamp for {}: {}", id, raw_time))?;

            Ok(Checkpoint {
                id,
                author,
                timestamp,
                summary,
                position,
            })
        })
        .collect()
}
