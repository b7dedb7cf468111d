// Shared fixtures for integration tests
#![allow(dead_code)]

use anyhow::{bail, Result};
use chrono::DateTime;
use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use sheet_diff::operations::{Checkpoint, Vcs};

/// A cell written into a generated workbook
pub enum Val {
    N(f64),
    S(&'static str),
}

/// Write an .xlsx file with the given sheets and cells
pub fn write_book(path: &Path, sheets: &[(&str, Vec<(u32, u16, Val)>)]) {
    let mut workbook = rust_xlsxwriter::Workbook::new();
    for (name, cells) in sheets {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(*name).unwrap();
        for (row, col, value) in cells {
            match value {
                Val::N(n) => {
                    worksheet.write_number(*row, *col, *n).unwrap();
                }
                Val::S(s) => {
                    worksheet.write_string(*row, *col, *s).unwrap();
                }
            }
        }
    }
    workbook.save(path).unwrap();
}

/// Cells of a size x size block whose values depend on position
pub fn block(size: u32) -> Vec<(u32, u16, Val)> {
    let mut cells = Vec::new();
    for row in 0..size {
        for col in 0..size as u16 {
            cells.push((row, col, Val::N((row * 100 + col as u32) as f64)));
        }
    }
    cells
}

pub fn checkpoint(id: &str, position: usize) -> Checkpoint {
    Checkpoint {
        id: id.to_string(),
        author: "tester".to_string(),
        timestamp: DateTime::parse_from_rfc3339("2024-05-01T12:00:00+00:00").unwrap(),
        summary: format!("checkpoint {}", id),
        position,
    }
}

/// In-memory version control holding one tracked file's history
pub struct FakeVcs {
    pub root: PathBuf,
    /// Newest first: (checkpoint, file content)
    pub history: Vec<(Checkpoint, Vec<u8>)>,
    pub fail_checkout: bool,
    pub fail_record: bool,
    pub recorded: RefCell<Vec<String>>,
}

impl FakeVcs {
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
            history: Vec::new(),
            fail_checkout: false,
            fail_record: false,
            recorded: RefCell::new(Vec::new()),
        }
    }

    /// Push content as the newest checkpoint
    pub fn commit_bytes(&mut self, id: &str, content: Vec<u8>) {
        self.history.insert(0, (checkpoint(id, 0), content));
        for (position, (cp, _)) in self.history.iter_mut().enumerate() {
            cp.position = position;
        }
    }

    fn content_at(&self, checkpoint: &Checkpoint) -> Option<&[u8]> {
        self.history
            .iter()
            .find(|(cp, _)| cp.id == checkpoint.id)
            .map(|(_, bytes)| bytes.as_slice())
    }
}

impl Vcs for FakeVcs {
    fn root(&self) -> &Path {
        &self.root
    }

    fn checkpoints(&self) -> Result<Vec<Checkpoint>> {
        Ok(self.history.iter().map(|(cp, _)| cp.clone()).collect())
    }

    fn has_changed_since(&self, checkpoint: &Checkpoint, path: &Path) -> Result<bool> {
        let working = fs::read(self.root.join(path))?;
        Ok(self.content_at(checkpoint) != Some(working.as_slice()))
    }

    fn checkout_file(&self, checkpoint: &Checkpoint, path: &Path) -> Result<()> {
        let target = self.root.join(path);
        if self.fail_checkout {
            // Leave a half-written file behind like an interrupted checkout would
            fs::write(&target, b"partial")?;
            bail!("simulated checkout failure");
        }
        match self.content_at(checkpoint) {
            Some(bytes) => {
                fs::write(target, bytes)?;
                Ok(())
            }
            None => bail!("unknown checkpoint {}", checkpoint.id),
        }
    }

    fn record(&self, _path: &Path, message: &str) -> Result<bool> {
        if self.fail_record {
            bail!("simulated commit failure");
        }
        self.recorded.borrow_mut().push(message.to_string());
        Ok(true)
    }
}

/// Whether a git binary is available for repository tests
pub fn git_available() -> bool {
    Command::new("git")
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

/// Run git in `dir`, panicking on failure
pub fn git(dir: &Path, args: &[&str]) {
    let output = Command::new("git").args(args).current_dir(dir).output().unwrap();
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
}

/// Initialize a throwaway repository with a local identity
pub fn init_repo(dir: &Path) {
    git(dir, &["init", "--quiet"]);
    git(dir, &["config", "user.name", "Sheet Tester"]);
    git(dir, &["config", "user.email", "tester@example.com"]);
    git(dir, &["config", "commit.gpgsign", "false"]);
}

/// Scratch files left next to the tracked file
pub fn leftover_scratch(dir: &Path) -> Vec<PathBuf> {
    fs::read_dir(dir)
        .unwrap()
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| {
            p.file_name()
                .and_then(|n| n.to_str())
                .map(|n| n.contains("_tmp"))
                .unwrap_or(false)
        })
        .collect()
}
