//! Repository bootstrap after `new`.

use std::path::Path;
use std::process::{Command, Stdio};

use tracing::{debug, instrument, warn};

use modcraft_core::{application::ports::PostHook, error::CraftResult};

/// Runs `git init`, an initial commit and `go mod tidy` in the new project.
///
/// Every step is best effort: a missing tool or a failing command is logged
/// and the remaining steps still run.
#[derive(Debug, Clone)]
pub struct GitInitHook {
    commit_message: String,
    tidy: bool,
}

impl GitInitHook {
    pub fn new() -> Self {
        Self {
            commit_message: "chore: initial commit".to_string(),
            tidy: true,
        }
    }

    pub fn with_commit_message(mut self, message: impl Into<String>) -> Self {
        self.commit_message = message.into();
        self
    }

    /// Skip `go mod tidy`.
    pub fn without_tidy(mut self) -> Self {
        self.tidy = false;
        self
    }

    fn steps(&self) -> Vec<(&'static str, Vec<&str>)> {
        let mut steps = vec![
            ("git", vec!["init"]),
            ("git", vec!["add", "."]),
            ("git", vec!["commit", "-m", self.commit_message.as_str()]),
        ];
        if self.tidy {
            steps.push(("go", vec!["mod", "tidy"]));
        }
        steps
    }
}

impl Default for GitInitHook {
    fn default() -> Self {
        Self::new()
    }
}

impl PostHook for GitInitHook {
    #[instrument(skip(self), fields(dir = %project_dir.display()))]
    fn run(&self, project_dir: &Path) -> CraftResult<()> {
        for (program, args) in self.steps() {
            let status = Command::new(program)
                .args(&args)
                .current_dir(project_dir)
                .stdin(Stdio::null())
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .status();
            match status {
                Ok(s) if s.success() => debug!(program, ?args, "ok"),
                Ok(s) => warn!(program, ?args, code = ?s.code(), "command failed"),
                Err(e) => warn!(program, ?args, error = %e, "command could not start"),
            }
        }
        Ok(())
    }
}
