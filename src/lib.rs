//! Find TODO-style markers that a change set adds inside comments.
//!
//! The pipeline is: `git diff` text → [`diff::parse`] (post-image positions of
//! added lines) → [`matcher::find_markers`] (pattern hit inside a
//! [`comments::CommentSource`] region) → optional `git blame` → [`Report`].

use error_set::error_set;
use regex::Regex;
use tracing::{debug, warn};

pub mod comments;
pub mod diff;
pub mod git;
pub mod matcher;
pub mod position;
mod report;

pub use comments::{CommentSource, LineRegions, RegionError};
pub use git::{GitCommandError, GitRepo};
pub use report::{Finding, Report};

/// Marker pattern used when none is given: "TODO" in any case
pub const DEFAULT_PATTERN: &str = "(?i)TODO";

error_set! {
    /// Top-level error for marker scans
    MarkerError := {
        #[display("Invalid marker pattern: {message}")]
        InvalidPattern { message: String },
        GitCommandError(GitCommandError),
    }
}

/// Main interface for marker scans
pub struct GitMarkers {
    repo: GitRepo,
    pattern: Regex,
    blame: bool,
}

impl GitMarkers {
    /// Open the repository containing `repo_path`, looking for
    /// [`DEFAULT_PATTERN`] without blame.
    pub fn open(repo_path: &str) -> Result<Self, MarkerError> {
        Ok(Self {
            repo: GitRepo::discover(repo_path)?,
            pattern: compile(DEFAULT_PATTERN)?,
            blame: false,
        })
    }

    /// Look for `pattern` (a regular expression) instead of the default.
    pub fn with_pattern(mut self, pattern: &str) -> Result<Self, MarkerError> {
        self.pattern = compile(pattern)?;
        Ok(self)
    }

    /// Attribute every finding with `git blame`.
    pub fn with_blame(mut self, blame: bool) -> Self {
        self.blame = blame;
        self
    }

    /// Find markers added since `against` (any revision `git diff` accepts),
    /// including uncommitted work.
    ///
    /// # Examples
    /// ```no_run
    /// # use git_markers::GitMarkers;
    /// let markers = GitMarkers::open(".").unwrap().with_blame(true);
    /// let report = markers.scan("origin/main").unwrap();
    /// print!("{report}");
    /// ```
    pub fn scan(&self, against: &str) -> Result<Report, MarkerError> {
        let additions = diff::parse(&self.repo.diff(against)?);
        debug!(against, files = additions.len(), "files with additions");

        let source = LineRegions::new(self.repo.path());
        let scan = matcher::find_markers(&self.pattern, additions, &source);

        let mut findings = Vec::new();
        for (path, hits) in scan.markers {
            for addition in hits {
                let author = if self.blame {
                    self.author(&path, addition.position.row.saturating_add(1))
                } else {
                    None
                };
                findings.push(Finding {
                    path: path.clone(),
                    position: addition.position,
                    content: addition.content,
                    author,
                });
            }
        }

        Ok(Report {
            findings,
            failures: scan.failures,
        })
    }

    fn author(&self, path: &str, line: u32) -> Option<String> {
        match self.repo.blame_author(path, line) {
            Ok(author) => Some(author),
            Err(err) => {
                warn!(path, line, error = %err, "blame failed");
                None
            }
        }
    }
}

fn compile(pattern: &str) -> Result<Regex, MarkerError> {
    Regex::new(pattern).map_err(|e| MarkerError::InvalidPattern {
        message: e.to_string(),
    })
}
