//! Single-byte encodings of simple fonts.
//!
//! Appearance streams generated for text fields typically use Helvetica with
//! `WinAnsiEncoding`; the decoding tables come from `encoding_rs`.

use std::collections::HashMap;

use encoding_rs::Encoding;

/// Base encoding named by a font's `/Encoding` entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BaseEncoding {
    /// `StandardEncoding`, also used when the font names none.
    #[default]
    Standard,
    WinAnsi,
    MacRoman,
}

impl BaseEncoding {
    pub fn from_name(name: &[u8]) -> Option<Self> {
        match name {
            b"StandardEncoding" => Some(BaseEncoding::Standard),
            b"WinAnsiEncoding" => Some(BaseEncoding::WinAnsi),
            b"MacRomanEncoding" => Some(BaseEncoding::MacRoman),
            _ => None,
        }
    }

    fn table(self) -> Option<&'static Encoding> {
        match self {
            BaseEncoding::Standard => None,
            BaseEncoding::WinAnsi => Some(encoding_rs::WINDOWS_1252),
            BaseEncoding::MacRoman => Some(encoding_rs::MACINTOSH),
        }
    }

    fn decode(self, code: u8) -> Option<char> {
        match self.table() {
            Some(table) => {
                let bytes = [code];
                let (text, had_errors) = table.decode_without_bom_handling(&bytes);
                if had_errors {
                    return None;
                }
                text.chars().next()
            }
            None => standard_char(code),
        }
    }
}

/// A simple font encoding: a base table plus `/Differences` overrides.
#[derive(Debug, Clone, Default)]
pub struct SimpleEncoding {
    base: BaseEncoding,
    differences: HashMap<u8, char>,
}

impl SimpleEncoding {
    pub fn new(base: BaseEncoding) -> Self {
        Self {
            base,
            differences: HashMap::new(),
        }
    }

    /// Apply a `/Differences` array: a code followed by the glyph names it starts at.
    pub fn apply_differences(&mut self, differences: &[lopdf::Object]) {
        let mut code: Option<u32> = None;
        for item in differences {
            match item {
                lopdf::Object::Integer(start) => code = u32::try_from(*start).ok(),
                lopdf::Object::Name(name) => {
                    if let Some(current) = code {
                        if let (Ok(byte), Some(c)) = (u8::try_from(current), glyph_to_char(name)) {
                            self.differences.insert(byte, c);
                        }
                        code = Some(current + 1);
                    }
                }
                _ => {}
            }
        }
    }

    pub fn decode(&self, code: u8) -> Option<char> {
        self.differences
            .get(&code)
            .copied()
            .or_else(|| self.base.decode(code))
    }
}

/// StandardEncoding agrees with ASCII except for the two quote glyphs.
fn standard_char(code: u8) -> Option<char> {
    match code {
        0x27 => Some('\u{2019}'),
        0x60 => Some('\u{2018}'),
        0x20..=0x7E => Some(char::from(code)),
        _ => None,
    }
}

/// Glyph names with no algorithmic form, sorted for binary search.
const GLYPH_NAMES: &[(&[u8], char)] = &[
    (b"ampersand", '&'),
    (b"asterisk", '*'),
    (b"at", '@'),
    (b"colon", ':'),
    (b"comma", ','),
    (b"eight", '8'),
    (b"equal", '='),
    (b"exclam", '!'),
    (b"five", '5'),
    (b"four", '4'),
    (b"hyphen", '-'),
    (b"nine", '9'),
    (b"numbersign", '#'),
    (b"one", '1'),
    (b"parenleft", '('),
    (b"parenright", ')'),
    (b"percent", '%'),
    (b"period", '.'),
    (b"plus", '+'),
    (b"question", '?'),
    (b"quotedbl", '"'),
    (b"quoteleft", '\u{2018}'),
    (b"quoteright", '\u{2019}'),
    (b"semicolon", ';'),
    (b"seven", '7'),
    (b"six", '6'),
    (b"slash", '/'),
    (b"space", ' '),
    (b"three", '3'),
    (b"two", '2'),
    (b"underscore", '_'),
    (b"zero", '0'),
];

/// Resolve a glyph name: `uniXXXX`, `uXXXX[XX]`, single letters and common punctuation.
pub fn glyph_to_char(name: &[u8]) -> Option<char> {
    if let [c] = name {
        if c.is_ascii_alphabetic() {
            return Some(char::from(*c));
        }
    }
    if let Some(hex) = name.strip_prefix(b"uni") {
        if hex.len() == 4 {
            return hex_scalar(hex);
        }
    }
    if let Some(hex) = name.strip_prefix(b"u") {
        if (4..=6).contains(&hex.len()) {
            return hex_scalar(hex);
        }
    }
    GLYPH_NAMES
        .binary_search_by(|(glyph, _)| glyph.cmp(&name))
        .ok()
        .map(|i| GLYPH_NAMES[i].1)
}

fn hex_scalar(hex: &[u8]) -> Option<char> {
    let text = std::str::from_utf8(hex).ok()?;
    u32::from_str_radix(text, 16).ok().and_then(char::from_u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn glyph_table_is_sorted() {
        assert!(GLYPH_NAMES.windows(2).all(|w| w[0].0 < w[1].0));
    }

    #[test]
    fn win_ansi_decodes_windows_1252() {
        let enc = SimpleEncoding::new(BaseEncoding::WinAnsi);
        assert_eq!(enc.decode(b'A'), Some('A'));
        assert_eq!(enc.decode(0x80), Some('€'));
        assert_eq!(enc.decode(0xE9), Some('é'));
    }

    #[test]
    fn standard_quotes() {
        let enc = SimpleEncoding::default();
        assert_eq!(enc.decode(0x27), Some('\u{2019}'));
        assert_eq!(enc.decode(b'7'), Some('7'));
        assert_eq!(enc.decode(0xC1), None);
    }

    #[test]
    fn every_win_ansi_byte_decodes_without_panicking() {
        let enc = SimpleEncoding::new(BaseEncoding::WinAnsi);
        let decoded = (0..=u8::MAX).filter_map(|b| enc.decode(b)).count();
        assert!(decoded > 200);
    }

    #[test]
    fn mac_roman_high_byte() {
        assert_eq!(SimpleEncoding::new(BaseEncoding::MacRoman).decode(0x8E), Some('é'));
    }

    #[test]
    fn differences_override_base() {
        let mut enc = SimpleEncoding::new(BaseEncoding::WinAnsi);
        enc.apply_differences(&[
            lopdf::Object::Integer(65),
            lopdf::Object::Name(b"uni0627".to_vec()),
            lopdf::Object::Name(b"space".to_vec()),
            lopdf::Object::Integer(200),
            lopdf::Object::Name(b"u1F600".to_vec()),
        ]);
        assert_eq!(enc.decode(65), Some('ا'));
        assert_eq!(enc.decode(66), Some(' '));
        assert_eq!(enc.decode(67), Some('C'));
        assert_eq!(enc.decode(200), Some('\u{1F600}'));
    }

    #[test]
    fn base_encoding_names() {
        assert_eq!(BaseEncoding::from_name(b"WinAnsiEncoding"), Some(BaseEncoding::WinAnsi));
        assert_eq!(BaseEncoding::from_name(b"Identity-H"), None);
    }

    #[test]
    fn unknown_glyph_name() {
        assert_eq!(glyph_to_char(b"g123"), None);
        assert_eq!(glyph_to_char(b"x"), Some('x'));
    }
}
