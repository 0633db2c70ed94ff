use std::cmp::Ordering;

use memchr::{memchr, memchr3};

/// Index of the closing quote of a string body that starts at `start`, or
/// the end of input when the string is unterminated. Escaped bytes are
/// skipped, and a NUL byte ends the input.
pub fn scan_string_end(bytes: &[u8], start: usize) -> usize {
    let mut pos = start;
    while pos < bytes.len() {
        match memchr3(b'"', b'\\', 0, &bytes[pos..]) {
            Some(rel) => {
                let idx = pos + rel;
                match bytes[idx] {
                    b'\\' => pos = (idx + 2).min(bytes.len()),
                    _ => return idx,
                }
            }
            None => return bytes.len(),
        }
    }
    bytes.len()
}

/// Decodes the escaped string body `bytes[start..end]` into `out`, which must
/// hold at least `end - start` bytes. Returns the number of bytes written.
///
/// `\uXXXX` escapes are transcoded from UTF-16 to UTF-8. A lone or invalid
/// surrogate, `\u0000` and a malformed escape emit nothing.
pub fn unescape_into(bytes: &[u8], start: usize, end: usize, out: &mut [u8]) -> usize {
    let mut src = start;
    let mut dst = 0;
    while src < end {
        let run = memchr(b'\\', &bytes[src..end]).unwrap_or(end - src);
        out[dst..dst + run].copy_from_slice(&bytes[src..src + run]);
        dst += run;
        src += run + 1;
        if src >= end {
            break;
        }
        let escaped = bytes[src];
        src += 1;
        let decoded = match escaped {
            b'b' => 0x08,
            b'f' => 0x0c,
            b'n' => b'\n',
            b'r' => b'\r',
            b't' => b'\t',
            b'u' => {
                let (code_point, next) = decode_unicode_escape(bytes, src, end);
                src = next;
                if let Some(ch) = code_point.and_then(char::from_u32) {
                    dst += ch.encode_utf8(&mut out[dst..]).len();
                }
                continue;
            }
            other => other,
        };
        out[dst] = decoded;
        dst += 1;
    }
    dst
}

/// Reads the hex digits following `\u` at `at`. Returns the combined code
/// point (if any) and the position after everything consumed.
fn decode_unicode_escape(bytes: &[u8], at: usize, end: usize) -> (Option<u32>, usize) {
    let (unit, next) = match read_hex4(bytes, at, end) {
        Ok(unit) => (unit, at + 4),
        Err(next) => return (None, next),
    };
    match unit {
        0 | 0xDC00..=0xDFFF => (None, next),
        0xD800..=0xDBFF => {
            if next + 1 >= end || bytes[next] != b'\\' || bytes[next + 1] != b'u' {
                return (None, next);
            }
            match read_hex4(bytes, next + 2, end) {
                Ok(low @ 0xDC00..=0xDFFF) => {
                    let combined = 0x10000 + (((unit & 0x3FF) << 10) | (low & 0x3FF));
                    (Some(combined), next + 6)
                }
                Ok(_) => (None, next + 6),
                Err(after) => (None, after),
            }
        }
        unit => (Some(unit), next),
    }
}

/// Parses four hex digits at `at`. A malformed escape is skipped up to four
/// bytes, stopping before any non-ASCII byte so no character is split.
fn read_hex4(bytes: &[u8], at: usize, end: usize) -> Result<u32, usize> {
    let window = &bytes[at..(at + 4).min(end)];
    let parsed = (window.len() == 4)
        .then(|| {
            window.iter().try_fold(0u32, |acc, &byte| {
                let digit = (byte as char).to_digit(16)?;
                Some((acc << 4) | digit)
            })
        })
        .flatten();
    parsed.ok_or_else(|| at + window.iter().take_while(|byte| byte.is_ascii()).count())
}

/// ASCII case-insensitive ordering of two optional names. A missing name
/// sorts before any present one; two missing names are equal.
pub fn compare_names(a: Option<&str>, b: Option<&str>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a
            .bytes()
            .map(|byte| byte.to_ascii_lowercase())
            .cmp(b.bytes().map(|byte| byte.to_ascii_lowercase())),
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
