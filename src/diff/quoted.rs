//! C-style quoted paths in diff headers.
//!
//! git wraps a path in double quotes when it contains `"`, `\` or a control
//! character (and any byte above 0x7f unless `core.quotePath` is off), writing
//! those bytes as backslash escapes.

use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{is_not, take_while_m_n},
    character::complete::char,
    combinator::{all_consuming, map, map_opt},
    multi::fold_many0,
    number::complete::u8 as byte,
    sequence::{delimited, preceded},
};

enum Piece<'a> {
    Run(&'a [u8]),
    Byte(u8),
}

/// Decode a quoted path such as `"b/caf\303\251.rs"`.
///
/// Returns `None` when `path` is not a well-formed quoted string. Escaped
/// bytes that do not form UTF-8 are replaced with U+FFFD.
pub fn unquote(path: &str) -> Option<String> {
    let (_, bytes) = quoted(path.as_bytes()).ok()?;
    Some(String::from_utf8_lossy(&bytes).into_owned())
}

fn quoted(input: &[u8]) -> IResult<&[u8], Vec<u8>> {
    let piece = alt((
        map(preceded(char('\\'), alt((octal, named))), Piece::Byte),
        map(is_not("\\\""), Piece::Run),
    ));
    let body = fold_many0(piece, Vec::new, |mut bytes: Vec<u8>, next| {
        match next {
            Piece::Run(run) => bytes.extend_from_slice(run),
            Piece::Byte(b) => bytes.push(b),
        }
        bytes
    });
    all_consuming(delimited(char('"'), body, char('"'))).parse(input)
}

/// `\ooo`, one raw byte
fn octal(input: &[u8]) -> IResult<&[u8], u8> {
    map_opt(
        take_while_m_n(3, 3, |b: u8| (b'0'..=b'7').contains(&b)),
        |digits: &[u8]| {
            let value = digits
                .iter()
                .fold(0u32, |acc, d| acc * 8 + u32::from(d - b'0'));
            u8::try_from(value).ok()
        },
    )
    .parse(input)
}

fn named(input: &[u8]) -> IResult<&[u8], u8> {
    map_opt(byte, |c| match c {
        b'a' => Some(0x07),
        b'b' => Some(0x08),
        b't' => Some(b'\t'),
        b'n' => Some(b'\n'),
        b'v' => Some(0x0b),
        b'f' => Some(0x0c),
        b'r' => Some(b'\r'),
        b'"' => Some(b'"'),
        b'\\' => Some(b'\\'),
        _ => None,
    })
    .parse(input)
}
