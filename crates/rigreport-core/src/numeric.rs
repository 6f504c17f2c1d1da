//! Lenient number parsing for form cells.

/// Parse a counter cell to an integer, returning 0 when it is not a number.
///
/// Surrounding whitespace, inner spaces and thousands separators are removed.
/// Digits may be ASCII, Persian (`۰`–`۹`) or Arabic-Indic (`٠`–`٩`), with an
/// optional sign and single underscores between digits. Values outside the
/// `i64` range also give 0.
pub fn to_int(value: &str) -> i64 {
    let cleaned: String = value.trim().chars().filter(|&c| c != ' ' && c != ',').collect();
    parse_int(&cleaned).unwrap_or(0)
}

fn parse_int(s: &str) -> Option<i64> {
    let (negative, digits) = match s.chars().next()? {
        '-' => (true, &s[1..]),
        '+' => (false, &s[1..]),
        _ => (false, s),
    };
    if digits.is_empty() || digits.starts_with('_') || digits.ends_with('_') || digits.contains("__") {
        return None;
    }
    let mut acc: i64 = 0;
    for c in digits.chars().filter(|&c| c != '_') {
        let d = decimal_digit(c)?;
        acc = acc.checked_mul(10)?;
        acc = if negative {
            acc.checked_sub(d)?
        } else {
            acc.checked_add(d)?
        };
    }
    Some(acc)
}

/// Value of a decimal digit in any of the scripts found on the forms.
pub fn decimal_digit(c: char) -> Option<i64> {
    let base = match c {
        '0'..='9' => '0',
        '\u{06F0}'..='\u{06F9}' => '\u{06F0}',
        '\u{0660}'..='\u{0669}' => '\u{0660}',
        _ => return None,
    };
    Some(i64::from(c as u32 - base as u32))
}

/// Whether a cell reads as a number once `,`, spaces, `-` and `+` are removed.
///
/// Decimal points and exponents are accepted, as are non-ASCII digits.
pub fn looks_numeric(value: &str) -> bool {
    let stripped: String = value
        .chars()
        .filter(|c| !matches!(c, ',' | ' ' | '-' | '+'))
        .map(|c| match decimal_digit(c) {
            Some(d) if !c.is_ascii_digit() => char::from(b'0' + d as u8),
            _ => c,
        })
        .collect();
    let stripped = stripped.trim();
    if stripped.is_empty() {
        return false;
    }
    let underscores_ok = !stripped.starts_with('_') && !stripped.ends_with('_') && !stripped.contains("__");
    underscores_ok && stripped.replace('_', "").parse::<f64>().is_ok()
}
