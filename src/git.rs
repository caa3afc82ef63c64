//! `git` subprocess calls that feed the scan.

use error_set::error_set;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;

/// Author git reports for lines that only exist in the working tree
const UNCOMMITTED_AUTHOR: &str = "Not Committed Yet";

error_set! {
    /// Errors from git command execution
    GitCommandError := {
        #[display("Failed to run git {command}: {message}")]
        SpawnFailed { command: String, message: String },
        #[display("git {command} failed: {stderr}")]
        ExitError { command: String, stderr: String },
        #[display("Invalid UTF-8 in git {command} output: {message}")]
        InvalidUtf8 { command: String, message: String },
        #[display("No author in git blame output for {path}:{line}")]
        MissingAuthor { path: String, line: u32 },
    }
}

/// A git work tree, addressed with `git -C <path>`.
#[derive(Debug, Clone)]
pub struct GitRepo {
    path: PathBuf,
}

impl GitRepo {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Open the repository containing `path`, rooted at its top-level
    /// directory so that diff paths resolve against [`GitRepo::path`].
    pub fn discover(path: impl AsRef<Path>) -> Result<Self, GitCommandError> {
        let toplevel = Self::new(path.as_ref()).run(&["rev-parse", "--show-toplevel"])?;
        Ok(Self::new(toplevel.trim_end()))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Zero-context diff of the work tree against `against`.
    pub fn diff(&self, against: &str) -> Result<String, GitCommandError> {
        self.run(&[
            "diff",
            "--no-ext-diff",
            "--no-color",
            "--src-prefix=a/",
            "--dst-prefix=b/",
            "-U0",
            against,
        ])
    }

    /// Author of `line` (1-based) in `path`.
    ///
    /// Lines that are not committed yet are attributed to the configured
    /// `user.name`.
    pub fn blame_author(&self, path: &str, line: u32) -> Result<String, GitCommandError> {
        let range = format!("{line},{line}");
        let output = self.run(&["blame", "--porcelain", "-L", &range, "--", path])?;

        match porcelain_author(&output) {
            Some(UNCOMMITTED_AUTHOR) => self.user_name(),
            Some(author) => Ok(author.to_string()),
            None => Err(GitCommandError::MissingAuthor {
                path: path.to_string(),
                line,
            }),
        }
    }

    /// The configured `user.name`.
    pub fn user_name(&self) -> Result<String, GitCommandError> {
        Ok(self.run(&["config", "user.name"])?.trim().to_string())
    }

    fn run(&self, args: &[&str]) -> Result<String, GitCommandError> {
        let command = args.first().copied().unwrap_or_default().to_string();
        debug!(repo = %self.path.display(), ?args, "running git");

        // Non-ASCII paths verbatim; `"`, `\` and control characters stay quoted
        let output = Command::new("git")
            .arg("-C")
            .arg(&self.path)
            .args(["-c", "core.quotePath=false"])
            .args(args)
            .output()
            .map_err(|e| GitCommandError::SpawnFailed {
                command: command.clone(),
                message: e.to_string(),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(GitCommandError::ExitError {
                command,
                stderr: stderr.trim().to_string(),
            });
        }

        String::from_utf8(output.stdout).map_err(|e| GitCommandError::InvalidUtf8 {
            command,
            message: e.to_string(),
        })
    }
}

/// The `author` header of `git blame --porcelain` output.
fn porcelain_author(output: &str) -> Option<&str> {
    output
        .lines()
        .find_map(|line| line.strip_prefix("author "))
        .map(str::trim)
        .filter(|author| !author.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn author_from_porcelain() {
        let output = "\
4a1b2c3d4e5f60718293a4b5c6d7e8f901234567 12 12 1
author Ada Lovelace
author-mail <ada@example.com>
author-time 1700000000
author-tz +0000
committer Ada Lovelace
committer-mail <ada@example.com>
committer-time 1700000000
committer-tz +0000
summary Add engine notes
filename notes.md
\t// TODO: note G
";
        assert_eq!(porcelain_author(output), Some("Ada Lovelace"));
    }

    #[test]
    fn author_of_uncommitted_line() {
        let output = "\
0000000000000000000000000000000000000000 3 3 1
author Not Committed Yet
author-mail <not.committed.yet>
author-time 1700000000
author-tz +0000
filename src/lib.rs
\t// TODO
";
        assert_eq!(porcelain_author(output), Some(UNCOMMITTED_AUTHOR));
    }

    #[test]
    fn author_mail_is_not_the_author() {
        assert_eq!(porcelain_author("author-mail <x@example.com>\n"), None);
    }

    #[test]
    fn no_author_header() {
        assert_eq!(porcelain_author(""), None);
        assert_eq!(porcelain_author("author \n"), None);
    }
}
