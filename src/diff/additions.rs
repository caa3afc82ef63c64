use super::{hunk, quoted};
use crate::position::Position;
use std::borrow::Cow;
use std::collections::BTreeMap;
use tracing::{trace, warn};

/// New path used by git for deleted files
const DEV_NULL: &str = "/dev/null";

/// A line added by a diff, located in the new version of its file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Addition {
    /// Row in the post-image; column starts at 0 and is moved to the marker
    /// by [`crate::matcher::find_markers`]
    pub position: Position,
    /// Line text without the leading `+`
    pub content: String,
}

impl Addition {
    pub fn new(position: Position, content: impl Into<String>) -> Self {
        Self {
            position,
            content: content.into(),
        }
    }
}

/// Added lines per file path, in file order.
///
/// Only files with at least one addition have an entry.
pub type DiffResult = BTreeMap<String, Vec<Addition>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum HunkState {
    #[default]
    Outside,
    Inside,
}

/// Everything the scan carries from one line to the next.
#[derive(Debug, Default)]
struct ScanState {
    hunk: HunkState,
    /// Path from the latest `+++ ` header
    current_file: String,
    /// 1-based post-image line number of the next body line
    cursor: u32,
}

impl ScanState {
    fn step(&mut self, line: &str, result: &mut DiffResult) {
        // File header: "+++ b/path/to/file"
        if let Some(path) = line.strip_prefix("+++ ") {
            self.current_file = header_path(path).into_owned();
            trace!(file = %self.current_file, "file header");
            return;
        }

        // Hunk header: "@@ -oldStart,oldCount +newStart,newCount @@"
        if line.starts_with("@@ ") {
            self.hunk = HunkState::Inside;
            match hunk::new_start(line) {
                Some(start) => self.cursor = start,
                None => warn!(
                    header = line,
                    cursor = self.cursor,
                    "malformed hunk header, keeping previous line cursor"
                ),
            }
            return;
        }

        if self.hunk == HunkState::Outside || self.current_file.is_empty() {
            return;
        }

        match line.as_bytes().first() {
            Some(b'+') => {
                if self.current_file != DEV_NULL {
                    let row = self.cursor.saturating_sub(1);
                    result
                        .entry(self.current_file.clone())
                        .or_default()
                        .push(Addition::new(Position::new(row, 0), &line[1..]));
                }
                self.cursor = self.cursor.saturating_add(1);
            }
            // Removed line: exists only in the old version
            Some(b'-') if !line.starts_with("--- ") => {}
            // "\ No newline at end of file" annotates the previous line
            Some(b'\\') => {}
            _ => self.cursor = self.cursor.saturating_add(1),
        }
    }
}

/// Path from a `+++ ` header, unquoted, with git's `a/`/`b/` prefix removed.
fn header_path(path: &str) -> Cow<'_, str> {
    // git appends a tab to names containing spaces
    let path = path.strip_suffix('\t').unwrap_or(path);
    match quoted::unquote(path) {
        Some(unquoted) => Cow::Owned(without_side_prefix(&unquoted).to_string()),
        None => Cow::Borrowed(without_side_prefix(path)),
    }
}

fn without_side_prefix(path: &str) -> &str {
    if path.len() > 2 && (path.starts_with("a/") || path.starts_with("b/")) {
        &path[2..]
    } else {
        path
    }
}

/// Parse a unified diff into the positions of every added line, per file.
///
/// The scan is a single pass over the lines. Malformed hunk headers and
/// unexpected line shapes never abort it: a bad header keeps the previous
/// cursor (0 if none was ever set) and anything unrecognised inside a hunk is
/// counted as context.
///
/// # Examples
///
/// ```
/// use git_markers::diff::parse;
/// use git_markers::position::Position;
///
/// let diff = "\
/// --- a/file.txt
/// +++ b/file.txt
/// @@ -0,0 +1,1 @@
/// +hello world
/// ";
/// let additions = parse(diff);
/// assert_eq!(additions["file.txt"][0].position, Position::new(0, 0));
/// assert_eq!(additions["file.txt"][0].content, "hello world");
/// ```
pub fn parse(diff: &str) -> DiffResult {
    let mut result = DiffResult::new();
    let mut state = ScanState::default();

    for line in diff.lines() {
        state.step(line, &mut result);
    }

    result
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    #[derive(Debug, Clone)]
    enum BodyLine {
        Context(String),
        Added(String),
        Removed(String),
    }

    fn arb_text() -> impl Strategy<Value = String> {
        prop::collection::vec(prop::char::range('a', 'z'), 0..12)
            .prop_map(|chars| chars.into_iter().collect())
    }

    fn arb_body_line() -> impl Strategy<Value = BodyLine> {
        prop_oneof![
            arb_text().prop_map(BodyLine::Context),
            arb_text().prop_map(BodyLine::Added),
            arb_text().prop_map(BodyLine::Removed),
        ]
    }

    /// (new start, body) for one hunk
    fn arb_hunk() -> impl Strategy<Value = (u32, Vec<BodyLine>)> {
        (1..5000u32, prop::collection::vec(arb_body_line(), 0..30))
    }

    fn render(path: &str, start: u32, body: &[BodyLine]) -> String {
        let mut text = format!("diff --git a/{path} b/{path}\n--- a/{path}\n+++ b/{path}\n");
        text.push_str(&format!("@@ -1,{} +{},{} @@\n", body.len(), start, body.len()));
        for line in body {
            match line {
                BodyLine::Context(s) => text.push_str(&format!(" {s}\n")),
                BodyLine::Added(s) => text.push_str(&format!("+{s}\n")),
                BodyLine::Removed(s) => text.push_str(&format!("-{s}\n")),
            }
        }
        text
    }

    /// Additions expected from walking the body by hand
    fn walk(start: u32, body: &[BodyLine]) -> Vec<Addition> {
        let mut cursor = start;
        let mut out = Vec::new();
        for line in body {
            match line {
                BodyLine::Context(_) => cursor += 1,
                BodyLine::Added(s) => {
                    out.push(Addition::new(Position::new(cursor - 1, 0), s.as_str()));
                    cursor += 1;
                }
                BodyLine::Removed(_) => {}
            }
        }
        out
    }

    proptest! {
        /// Each added line lands on the row given by the hunk start plus the
        /// context and added lines before it
        #[test]
        fn rows_follow_the_hunk_body((start, body) in arb_hunk()) {
            let result = parse(&render("f.txt", start, &body));
            let want = walk(start, &body);

            if want.is_empty() {
                prop_assert!(result.is_empty());
            } else {
                prop_assert_eq!(result.len(), 1);
                prop_assert_eq!(&result["f.txt"], &want);
            }
        }

        /// One addition per `+` body line, per file
        #[test]
        fn counts_match_across_files(
            (start_a, body_a) in arb_hunk(),
            (start_b, body_b) in arb_hunk()
        ) {
            let text = render("a.txt", start_a, &body_a) + &render("b.txt", start_b, &body_b);
            let result = parse(&text);

            for (path, body) in [("a.txt", &body_a), ("b.txt", &body_b)] {
                let added = body.iter().filter(|l| matches!(l, BodyLine::Added(_))).count();
                let got = result.get(path).map_or(0, Vec::len);
                prop_assert_eq!(got, added);
                if added == 0 {
                    prop_assert!(!result.contains_key(path));
                }
            }
        }

        /// Parsing the same text twice gives the same answer
        #[test]
        fn parse_is_idempotent((start, body) in arb_hunk()) {
            let text = render("f.txt", start, &body);
            prop_assert_eq!(parse(&text), parse(&text));
        }
    }
}
