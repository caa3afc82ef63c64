//! Unified diff scanning.
//!
//! Turns `git diff` output into the post-image positions of every added line.
//! Only the standard `diff --git` / `---` / `+++` / `@@ -a,b +c,d @@` dialect is
//! understood; combined (merge) diffs are not.

pub mod additions;
pub mod hunk;
mod quoted;

pub use additions::{Addition, DiffResult, parse};
