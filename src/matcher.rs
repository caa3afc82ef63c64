//! Marker matching: keep added lines whose marker sits inside a comment.

use crate::comments::{CommentSource, RegionError};
use crate::diff::DiffResult;
use regex::Regex;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Outcome of [`find_markers`].
#[derive(Debug, Default)]
pub struct MarkerScan {
    /// Additions whose marker is inside a comment region, per file, with
    /// `position.column` set to the marker's byte offset
    pub markers: DiffResult,
    /// Files whose comment regions could not be produced
    pub failures: BTreeMap<String, RegionError>,
}

/// Filter `diff` down to additions where `pattern` matches inside a comment.
///
/// For every addition the first match of `pattern` in its content decides
/// the column; additions without a match are dropped. The addition survives
/// only if some region from `source` contains that position. Files left with
/// no survivors are dropped, and `source` is not consulted for files without
/// any match.
///
/// A file whose regions cannot be read is recorded in
/// [`MarkerScan::failures`] and does not affect the other files.
///
/// # Examples
///
/// ```
/// use git_markers::comments::{RegionError, line_regions};
/// use git_markers::diff::parse;
/// use git_markers::matcher::find_markers;
/// use regex::Regex;
///
/// let diff = "+++ b/main.rs\n@@ -0,0 +1 @@\n+let x = 1; // TODO: rename\n";
/// let source = |_: &str| -> Result<_, RegionError> {
///     Ok(line_regions(b"let x = 1; // TODO: rename\n"))
/// };
/// let pattern = Regex::new("(?i)todo").unwrap();
///
/// let scan = find_markers(&pattern, parse(diff), &source);
/// assert_eq!(scan.markers["main.rs"][0].position.column, 14);
/// ```
pub fn find_markers<S>(pattern: &Regex, diff: DiffResult, source: &S) -> MarkerScan
where
    S: CommentSource + ?Sized,
{
    let mut scan = MarkerScan::default();

    for (path, additions) in diff {
        let hits: Vec<_> = additions
            .into_iter()
            .filter_map(|mut addition| {
                let found = pattern.find(&addition.content)?;
                addition.position.column = found.start() as u32;
                Some(addition)
            })
            .collect();

        if hits.is_empty() {
            continue;
        }

        let regions = match source.regions(&path) {
            Ok(regions) => regions,
            Err(err) => {
                warn!(path = %path, error = %err, "could not read comment regions");
                scan.failures.insert(path, err);
                continue;
            }
        };

        let kept: Vec<_> = hits
            .into_iter()
            .filter(|addition| {
                regions
                    .iter()
                    .any(|region| region.contains(addition.position))
            })
            .collect();

        debug!(path = %path, kept = kept.len(), "markers in comments");
        if !kept.is_empty() {
            scan.markers.insert(path, kept);
        }
    }

    scan
}
