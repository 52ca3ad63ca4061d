use std::{
    ffi::{OsStr, OsString},
    path::{Path, PathBuf},
    process::{Command, Output},
};

use tracing::{debug, info};

use crate::error::SnapshotError;

pub const DEFAULT_COMMIT_MESSAGE: &str = "Added processed logs to CSV";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotOutcome {
    Committed,
    Unchanged,
}

/// Versioned storage for the exported file, invoked once the export has succeeded.
pub trait Snapshot {
    fn snapshot(&self, path: &Path) -> Result<SnapshotOutcome, SnapshotError>;
}

/// Records exported files in a git working tree, creating the repository if needed.
#[derive(Debug, Clone)]
pub struct GitSnapshot {
    repo_dir: PathBuf,
    message: String,
}

impl GitSnapshot {
    pub fn new(repo_dir: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self {
            repo_dir: repo_dir.into(),
            message: message.into(),
        }
    }

    fn git<I, S>(&self, args: I) -> Result<Output, SnapshotError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let args: Vec<OsString> = args.into_iter().map(|a| a.as_ref().to_owned()).collect();
        debug!(args = %describe(&args), "running git");
        Command::new("git")
            .arg("-C")
            .arg(&self.repo_dir)
            .args(&args)
            .output()
            .map_err(|source| SnapshotError::Unavailable {
                args: describe(&args),
                source,
            })
    }

    fn git_ok<I, S>(&self, args: I) -> Result<Output, SnapshotError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let args: Vec<OsString> = args.into_iter().map(|a| a.as_ref().to_owned()).collect();
        let output = self.git(&args)?;
        if output.status.success() {
            Ok(output)
        } else {
            Err(failed(&args, &output))
        }
    }

    fn ensure_repo(&self) -> Result<(), SnapshotError> {
        let probe = self.git(["rev-parse", "--is-inside-work-tree"])?;
        if probe.status.success() {
            return Ok(());
        }
        info!(dir = %self.repo_dir.display(), "initializing git repository");
        self.git_ok(["init"])?;
        // unborn branch, so pointing HEAD at it is a rename
        self.git_ok(["symbolic-ref", "HEAD", "refs/heads/main"])?;
        Ok(())
    }

    fn has_staged_changes(&self, path: &Path) -> Result<bool, SnapshotError> {
        let args = [
            OsStr::new("diff"),
            OsStr::new("--cached"),
            OsStr::new("--quiet"),
            OsStr::new("--"),
            path.as_os_str(),
        ];
        let output = self.git(args)?;
        match output.status.code() {
            Some(0) => Ok(false),
            Some(1) => Ok(true),
            _ => Err(failed(&args, &output)),
        }
    }
}

impl Snapshot for GitSnapshot {
    fn snapshot(&self, path: &Path) -> Result<SnapshotOutcome, SnapshotError> {
        // git resolves relative paths against the repo dir, not our cwd
        let path = std::fs::canonicalize(path).map_err(|source| SnapshotError::Resolve {
            path: path.to_path_buf(),
            source,
        })?;
        self.ensure_repo()?;
        self.git_ok([OsStr::new("add"), OsStr::new("--"), path.as_os_str()])?;
        if !self.has_staged_changes(&path)? {
            return Ok(SnapshotOutcome::Unchanged);
        }
        self.git_ok([
            OsStr::new("commit"),
            OsStr::new("-m"),
            OsStr::new(&self.message),
            OsStr::new("--"),
            path.as_os_str(),
        ])?;
        Ok(SnapshotOutcome::Committed)
    }
}

fn describe<S: AsRef<OsStr>>(args: &[S]) -> String {
    args.iter()
        .map(|a| a.as_ref().to_string_lossy())
        .collect::<Vec<_>>()
        .join(" ")
}

fn failed<S: AsRef<OsStr>>(args: &[S], output: &Output) -> SnapshotError {
    SnapshotError::Command {
        args: describe(args),
        status: output.status,
        stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use asserting::prelude::*;

    fn git_available() -> bool {
        Command::new("git")
            .arg("--version")
            .output()
            .is_ok_and(|o| o.status.success())
    }

    #[test]
    fn describe_joins_arguments() {
        assert_that!(describe(&["commit", "-m", "msg"])).is_equal_to("commit -m msg".to_string());
    }

    #[test]
    fn missing_output_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let git = GitSnapshot::new(dir.path(), DEFAULT_COMMIT_MESSAGE);
        let err = git.snapshot(&dir.path().join("absent.csv")).unwrap_err();
        assert!(matches!(err, SnapshotError::Resolve { .. }));
    }

    #[test]
    fn initializes_repository_when_absent() {
        if !git_available() {
            return;
        }
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out.csv");
        std::fs::write(&out, "ip\r\n").unwrap();

        let git = GitSnapshot::new(dir.path(), DEFAULT_COMMIT_MESSAGE);
        git.ensure_repo().unwrap();
        assert_that!(dir.path().join(".git").exists()).is_true();

        git.git_ok([OsStr::new("add"), OsStr::new("--"), out.as_os_str()])
            .unwrap();
        assert_that!(git.has_staged_changes(&out).unwrap()).is_true();
    }

    #[test]
    fn unstaged_file_has_no_staged_changes() {
        if !git_available() {
            return;
        }
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out.csv");
        std::fs::write(&out, "ip\r\n").unwrap();

        let git = GitSnapshot::new(dir.path(), DEFAULT_COMMIT_MESSAGE);
        git.ensure_repo().unwrap();
        assert_that!(git.has_staged_changes(&out).unwrap()).is_false();
    }

    #[test]
    fn commits_only_when_output_changes() {
        if !git_available() {
            return;
        }
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out.csv");
        std::fs::write(&out, "ip\r\n").unwrap();

        let git = GitSnapshot::new(dir.path(), DEFAULT_COMMIT_MESSAGE);
        git.ensure_repo().unwrap();
        // repo-local identity so the commit does not depend on the host config
        git.git_ok(["config", "user.name", "Access Log Analyzer"]).unwrap();
        git.git_ok(["config", "user.email", "analyzer@example.com"]).unwrap();
        git.git_ok(["config", "commit.gpgsign", "false"]).unwrap();

        assert_that!(git.snapshot(&out).unwrap()).is_equal_to(SnapshotOutcome::Committed);
        assert_that!(git.snapshot(&out).unwrap()).is_equal_to(SnapshotOutcome::Unchanged);

        std::fs::write(&out, "ip\r\n10.0.0.1\r\n").unwrap();
        assert_that!(git.snapshot(&out).unwrap()).is_equal_to(SnapshotOutcome::Committed);

        let log = git.git_ok(["log", "--format=%s"]).unwrap();
        let subjects = String::from_utf8(log.stdout).unwrap();
        assert_that!(subjects.lines().collect::<Vec<_>>())
            .is_equal_to(vec![DEFAULT_COMMIT_MESSAGE, DEFAULT_COMMIT_MESSAGE]);
    }
}
