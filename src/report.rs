use crate::comments::RegionError;
use crate::position::Position;
use std::collections::BTreeMap;
use std::fmt;

/// A marker introduced by the change set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    pub path: String,
    /// Row of the line and byte column of the marker, both 0-based
    pub position: Position,
    /// The added line
    pub content: String,
    /// Who wrote the line, when blame was requested and succeeded
    pub author: Option<String>,
}

/// Renders as `[@author] path:line content`, with 1-based line numbers.
impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(author) = &self.author {
            write!(f, "[@{author}] ")?;
        }
        write!(
            f,
            "{}:{} {}",
            self.path,
            self.position.row.saturating_add(1),
            self.content
        )
    }
}

/// Everything a scan turned up.
#[derive(Debug, Default)]
pub struct Report {
    /// Findings ordered by path, then by line
    pub findings: Vec<Finding>,
    /// Files whose comment regions could not be read
    pub failures: BTreeMap<String, RegionError>,
}

impl Report {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// One finding per line.
impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for finding in &self.findings {
            writeln!(f, "{finding}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn finding(path: &str, row: u32, content: &str, author: Option<&str>) -> Finding {
        Finding {
            path: path.to_string(),
            position: Position::new(row, 0),
            content: content.to_string(),
            author: author.map(str::to_string),
        }
    }

    #[test]
    fn render_without_author() {
        let f = finding("src/lib.rs", 3, "    // TODO: handle overflow", None);
        insta::assert_snapshot!(f.to_string(), @"src/lib.rs:4     // TODO: handle overflow");
    }

    #[test]
    fn render_with_author() {
        let f = finding("main.py", 0, "# todo drop py2", Some("Ada Lovelace"));
        insta::assert_snapshot!(f.to_string(), @"[@Ada Lovelace] main.py:1 # todo drop py2");
    }

    #[test]
    fn render_last_representable_row() {
        let f = finding("huge.txt", u32::MAX, "// TODO", None);
        insta::assert_snapshot!(f.to_string(), @"huge.txt:4294967295 // TODO");
    }

    #[test]
    fn render_report() {
        let report = Report {
            findings: vec![
                finding("a.rs", 9, "// TODO one", None),
                finding("b/c.sh", 41, "# TODO two", Some("grace")),
            ],
            failures: BTreeMap::new(),
        };
        insta::assert_snapshot!(report.to_string(), @r"
        a.rs:10 // TODO one
        [@grace] b/c.sh:42 # TODO two
        ");
        assert!(report.is_clean());
    }

    #[test]
    fn failures_make_a_report_unclean() {
        let mut report = Report::default();
        report.failures.insert(
            "gone.rs".to_string(),
            RegionError::ReadFailed {
                path: "gone.rs".to_string(),
                message: "No such file or directory".to_string(),
            },
        );
        assert!(!report.is_clean());
        assert_eq!(report.to_string(), "");
    }
}
