//! Textual `go.mod` editor.
//!
//! Only the three edits modules need: add a requirement, upsert a replace
//! directive, and a tidy step that is left to the post hook.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use regex::{NoExpand, Regex};
use tracing::{debug, instrument};

use modcraft_core::{
    application::{ApplicationError, ports::ManifestEditor},
    error::CraftResult,
};

use super::atomic_write;

#[derive(Debug, Clone)]
pub struct GoModEditor {
    path: PathBuf,
}

impl GoModEditor {
    /// Editor for `<project_root>/go.mod`.
    pub fn new(project_root: impl AsRef<Path>) -> Self {
        Self {
            path: project_root.as_ref().join("go.mod"),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> CraftResult<String> {
        fs::read_to_string(&self.path).map_err(|e| {
            let reason = match e.kind() {
                io::ErrorKind::NotFound => "go.mod not found".to_string(),
                _ => e.to_string(),
            };
            ApplicationError::ManifestError {
                path: self.path.clone(),
                reason,
            }
            .into()
        })
    }
}

impl ManifestEditor for GoModEditor {
    #[instrument(skip(self), fields(path = %self.path.display()))]
    fn add(&self, module: &str, version: &str) -> CraftResult<()> {
        if module.trim().is_empty() || version.trim().is_empty() {
            return Err(ApplicationError::invalid_argument(
                "go.mod requirement needs a module path and a version",
            )
            .into());
        }

        let content = self.read()?;
        if has_requirement(&content, module) {
            debug!("requirement already present");
            return Ok(());
        }

        let updated = insert_requirement(&content, &format!("{module} {version}"));
        atomic_write(&self.path, &updated)
    }

    #[instrument(skip(self), fields(path = %self.path.display()))]
    fn replace(&self, old_path: &str, new_path: &str) -> CraftResult<()> {
        if old_path.trim().is_empty() || new_path.trim().is_empty() {
            return Err(ApplicationError::invalid_argument(
                "go.mod replace needs both an old and a new path",
            )
            .into());
        }

        let content = self.read()?;
        let directive = format!("replace {old_path} => {new_path}");
        let existing = Regex::new(&format!(r"(?m)^replace\s+{}\s*=>.*$", regex::escape(old_path)))
            .map_err(|e| ApplicationError::invalid_argument(e.to_string()))?;

        let updated = if existing.is_match(&content) {
            existing
                .replace(&content, NoExpand(&directive))
                .into_owned()
        } else {
            let mut out = content.clone();
            if !out.is_empty() && !out.ends_with('\n') {
                out.push('\n');
            }
            out.push('\n');
            out.push_str(&directive);
            out.push('\n');
            out
        };

        if updated == content {
            return Ok(());
        }
        atomic_write(&self.path, &updated)
    }

    fn tidy(&self) -> CraftResult<()> {
        debug!("tidy deferred to the post-generation hook");
        Ok(())
    }
}

/// Whether `module` is required, either on a `require x v` line or inside a
/// `require ( ... )` block.
fn has_requirement(content: &str, module: &str) -> bool {
    let mut in_block = false;
    for line in content.lines() {
        let line = strip_comment(line).trim();
        if in_block {
            if line.starts_with(')') {
                in_block = false;
            } else if line.split_whitespace().next() == Some(module) {
                return true;
            }
            continue;
        }

        let Some(rest) = line.strip_prefix("require") else {
            continue;
        };
        let rest = rest.trim_start();
        if rest.starts_with('(') {
            in_block = true;
        } else if rest.split_whitespace().next() == Some(module) {
            return true;
        }
    }
    false
}

fn strip_comment(line: &str) -> &str {
    line.split_once("//").map_or(line, |(code, _)| code)
}

/// Append `requirement` to the first `require (` block, or add a new block.
fn insert_requirement(content: &str, requirement: &str) -> String {
    let mut lines: Vec<&str> = content.lines().collect();

    let block_start = lines
        .iter()
        .position(|l| {
            let l = l.trim();
            l.strip_prefix("require")
                .is_some_and(|rest| rest.trim_start().starts_with('('))
        });
    let entry = format!("\t{requirement}");

    if let Some(start) = block_start {
        if let Some(offset) = lines[start + 1..]
            .iter()
            .position(|l| l.trim_start().starts_with(')'))
        {
            lines.insert(start + 1 + offset, &entry);
            return join_lines(&lines);
        }
    }

    let mut out = join_lines(&lines);
    if !out.is_empty() {
        out.push('\n');
    }
    out.push_str(&format!("require (\n{entry}\n)\n"));
    out
}

fn join_lines(lines: &[&str]) -> String {
    let mut out = lines.join("\n");
    if !out.is_empty() {
        out.push('\n');
    }
    out
}
