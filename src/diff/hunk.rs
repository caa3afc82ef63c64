//! Hunk header reading.
//!
//! Only the start of the new-file range matters to the addition scan: it seeds
//! the line cursor for the hunk body that follows.

use nom::{
    IResult, Parser,
    character::complete::{self, char},
    combinator::{all_consuming, opt, rest},
    sequence::terminated,
};

/// Extract the new-file start line from a hunk header.
///
/// The header is split on spaces and the first token starting with `+` is
/// read as `start` or `start,count`. Returns `None` when there is no such
/// token or its start is not a plain non-negative integer.
///
/// ```text
/// @@ -136,0 +137 @@         -> Some(137)
/// @@ -1,2 +1,4 @@ fn main  -> Some(1)
/// @@ -1,2 +x,4 @@          -> None
/// ```
pub fn new_start(header: &str) -> Option<u32> {
    let range = header.split(' ').find_map(|part| part.strip_prefix('+'))?;
    range_start(range).ok().map(|(_, start)| start)
}

/// Parse `start` or `start,<anything>` into `start`.
fn range_start(range: &str) -> IResult<&str, u32> {
    all_consuming(terminated(complete::u32, opt((char(','), rest)))).parse(range)
}
