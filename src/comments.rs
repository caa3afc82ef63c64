//! Where comments live in a file.
//!
//! [`CommentSource`] is the seam between marker matching and whatever knows a
//! language's comment syntax. [`LineRegions`] is the coarse reference source:
//! every line of the file counts as one comment region.

use crate::position::Range;
use error_set::error_set;
use std::fs;
use std::path::PathBuf;
use tracing::debug;

error_set! {
    /// Errors from producing comment regions
    RegionError := {
        /// The file could not be read
        #[display("Failed to read {path}: {message}")]
        ReadFailed { path: String, message: String },
    }
}

/// Produces the comment regions of a file, in file order.
pub trait CommentSource {
    fn regions(&self, path: &str) -> Result<Vec<Range>, RegionError>;
}

impl<F> CommentSource for F
where
    F: Fn(&str) -> Result<Vec<Range>, RegionError>,
{
    fn regions(&self, path: &str) -> Result<Vec<Range>, RegionError> {
        self(path)
    }
}

/// Treats every line of a file as a comment region.
///
/// Paths are resolved against `root`, so diff paths (relative to the
/// repository top-level) can be passed straight through.
#[derive(Debug, Clone)]
pub struct LineRegions {
    root: PathBuf,
}

impl LineRegions {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl CommentSource for LineRegions {
    fn regions(&self, path: &str) -> Result<Vec<Range>, RegionError> {
        let full = self.root.join(path);
        let text = fs::read(&full).map_err(|e| RegionError::ReadFailed {
            path: path.to_string(),
            message: e.to_string(),
        })?;

        let regions = line_regions(&text);
        debug!(path, lines = regions.len(), "line regions");
        Ok(regions)
    }
}

/// One [`Range`] per line of `text`, spanning column 0 through the line's
/// byte length.
///
/// Lines end at `\n`; a `\r` before it is not counted. A final newline does not
/// start another line.
pub fn line_regions(text: &[u8]) -> Vec<Range> {
    if text.is_empty() {
        return Vec::new();
    }

    let body = text.strip_suffix(b"\n").unwrap_or(text);
    body.split(|&b| b == b'\n')
        .enumerate()
        .map(|(row, line)| {
            let line = line.strip_suffix(b"\r").unwrap_or(line);
            Range::line(row as u32, line.len() as u32)
        })
        .collect()
}
