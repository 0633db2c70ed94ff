/// The three numeric readings of one lexeme, computed together.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct NumberViews {
    pub int: i32,
    pub long: i64,
    pub float: f32,
}

impl NumberViews {
    pub fn from_bool(value: bool) -> Self {
        Self {
            int: value as i32,
            ..Self::default()
        }
    }
}

/// Numeric cache of a node. `Pending` marks a string payload that has not
/// been coerced yet, so a parsed zero stays distinguishable from "unparsed".
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Numeric {
    Pending,
    Parsed(NumberViews),
    #[default]
    NotNumeric,
}

impl Numeric {
    pub fn views(self) -> NumberViews {
        match self {
            Numeric::Parsed(views) => views,
            Numeric::Pending | Numeric::NotNumeric => NumberViews::default(),
        }
    }
}

/// Parses the longest numeric prefix of `bytes`. Returns the views and the
/// number of bytes the floating-point reading consumed, or `None` when not a
/// single byte could be read as a float.
pub fn parse_number_prefix(bytes: &[u8]) -> Option<(NumberViews, usize)> {
    let start = skip_leading_space(bytes);
    let end = scan_float(bytes, start)?;
    let lexeme = std::str::from_utf8(&bytes[start..end]).ok()?;
    let float = lexeme.parse::<f32>().unwrap_or(0.0);
    let views = NumberViews {
        int: float as i32,
        long: parse_long_prefix(&bytes[start..]),
        float,
    };
    Some((views, end))
}

fn skip_leading_space(bytes: &[u8]) -> usize {
    bytes
        .iter()
        .position(|byte| !matches!(byte, b' ' | b'\t' | b'\n' | b'\r' | 0x0b | 0x0c))
        .unwrap_or(bytes.len())
}

fn scan_float(bytes: &[u8], start: usize) -> Option<usize> {
    let mut idx = start;
    if matches!(bytes.get(idx), Some(b'-' | b'+')) {
        idx += 1;
    }
    let int_digits = count_digits(bytes, idx);
    idx += int_digits;
    let mut frac_digits = 0;
    if bytes.get(idx) == Some(&b'.') {
        frac_digits = count_digits(bytes, idx + 1);
        if int_digits > 0 || frac_digits > 0 {
            idx += 1 + frac_digits;
        }
    }
    if int_digits == 0 && frac_digits == 0 {
        return None;
    }
    if matches!(bytes.get(idx), Some(b'e' | b'E')) {
        let mut exp = idx + 1;
        if matches!(bytes.get(exp), Some(b'-' | b'+')) {
            exp += 1;
        }
        let exp_digits = count_digits(bytes, exp);
        if exp_digits > 0 {
            idx = exp + exp_digits;
        }
    }
    Some(idx)
}

fn count_digits(bytes: &[u8], start: usize) -> usize {
    bytes
        .get(start..)
        .map(|rest| rest.iter().take_while(|byte| byte.is_ascii_digit()).count())
        .unwrap_or(0)
}

/// Base-10 integer prefix with `strtol` saturation.
fn parse_long_prefix(bytes: &[u8]) -> i64 {
    let mut idx = 0;
    let negative = match bytes.first() {
        Some(b'-') => {
            idx = 1;
            true
        }
        Some(b'+') => {
            idx = 1;
            false
        }
        _ => false,
    };
    let mut value: i64 = 0;
    for &byte in bytes[idx..].iter().take_while(|byte| byte.is_ascii_digit()) {
        let digit = i64::from(byte - b'0');
        value = if negative {
            value.saturating_mul(10).saturating_sub(digit)
        } else {
            value.saturating_mul(10).saturating_add(digit)
        };
    }
    value
}
