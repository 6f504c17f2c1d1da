//! ToUnicode CMap parser.
//!
//! Form fields filled with Persian text are usually drawn with a composite
//! font whose glyph codes only become text through the font's `/ToUnicode`
//! stream. This module reads the `bfchar`/`bfrange` mappings of such a stream
//! together with its `codespacerange`, which tells how many bytes make up one
//! character code.

use std::collections::HashMap;

use crate::error::BackendError;

/// Longest `bfrange` expanded into individual mappings.
const MAX_RANGE_LEN: u32 = 0x1_0000;

/// A code space range: codes of `len` bytes between `low` and `high`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CodeSpace {
    len: usize,
    low: u32,
    high: u32,
}

/// A parsed ToUnicode CMap.
#[derive(Debug, Clone, Default)]
pub struct CMap {
    mappings: HashMap<u32, String>,
    code_spaces: Vec<CodeSpace>,
}

impl CMap {
    /// Parse a ToUnicode CMap from its decoded stream content.
    pub fn parse(data: &[u8]) -> Result<Self, BackendError> {
        let text = String::from_utf8_lossy(data);
        let mut cmap = CMap::default();

        for section in sections(&text, "begincodespacerange", "endcodespacerange") {
            let tokens = tokenize(section)?;
            for pair in tokens.chunks_exact(2) {
                if let [Token::Hex(low), Token::Hex(high)] = pair {
                    cmap.code_spaces.push(CodeSpace {
                        len: low.len().clamp(1, 4),
                        low: code_value(low),
                        high: code_value(high),
                    });
                }
            }
        }

        for section in sections(&text, "beginbfchar", "endbfchar") {
            let tokens = tokenize(section)?;
            for pair in tokens.chunks_exact(2) {
                if let [Token::Hex(src), Token::Hex(dst)] = pair {
                    cmap.mappings.insert(code_value(src), utf16_text(dst));
                }
            }
        }

        for section in sections(&text, "beginbfrange", "endbfrange") {
            parse_bfrange(&tokenize(section)?, &mut cmap.mappings);
        }

        Ok(cmap)
    }

    /// Look up the text for a character code.
    pub fn lookup(&self, code: u32) -> Option<&str> {
        self.mappings.get(&code).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }

    /// Whether the CMap declares its own code space ranges.
    pub fn has_code_spaces(&self) -> bool {
        !self.code_spaces.is_empty()
    }

    /// Read the next character code from `bytes` using the code space ranges.
    ///
    /// Returns the code and the number of bytes it occupies, or `None` when no
    /// range matches the input.
    pub fn next_code(&self, bytes: &[u8]) -> Option<(u32, usize)> {
        (1..=4usize).filter(|len| *len <= bytes.len()).find_map(|len| {
            let code = code_value(&bytes[..len]);
            self.code_spaces
                .iter()
                .any(|space| space.len == len && (space.low..=space.high).contains(&code))
                .then_some((code, len))
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Hex(Vec<u8>),
    Open,
    Close,
}

/// Slices of `text` between each `begin` keyword and the following `end`.
fn sections<'a>(text: &'a str, begin: &'a str, end: &'a str) -> impl Iterator<Item = &'a str> + 'a {
    let mut rest = text;
    std::iter::from_fn(move || {
        let start = rest.find(begin)? + begin.len();
        let len = rest[start..].find(end)?;
        let section = &rest[start..start + len];
        rest = &rest[start + len + end.len()..];
        Some(section)
    })
}

/// Hex strings and array brackets of a CMap section; everything else is skipped.
fn tokenize(section: &str) -> Result<Vec<Token>, BackendError> {
    let mut tokens = Vec::new();
    let mut chars = section.chars();
    while let Some(c) = chars.next() {
        match c {
            '<' => {
                let mut digits = Vec::new();
                loop {
                    match chars.next() {
                        Some('>') => break,
                        Some(d) if d.is_ascii_hexdigit() => digits.push(d as u8),
                        Some(d) if d.is_whitespace() => {}
                        Some(d) => {
                            return Err(BackendError::Font(format!(
                                "invalid character {d:?} in CMap hex string"
                            )));
                        }
                        None => {
                            return Err(BackendError::Font(
                                "unterminated hex string in CMap".to_string(),
                            ));
                        }
                    }
                }
                tokens.push(Token::Hex(hex_bytes(&digits)));
            }
            '[' => tokens.push(Token::Open),
            ']' => tokens.push(Token::Close),
            _ => {}
        }
    }
    Ok(tokens)
}

fn parse_bfrange(tokens: &[Token], mappings: &mut HashMap<u32, String>) {
    let mut i = 0;
    while i + 2 < tokens.len() {
        let (Token::Hex(low), Token::Hex(high)) = (&tokens[i], &tokens[i + 1]) else {
            i += 1;
            continue;
        };
        let low = code_value(low);
        let high = code_value(high);
        let count = high.saturating_sub(low).min(MAX_RANGE_LEN - 1);

        match &tokens[i + 2] {
            Token::Hex(dst) => {
                let units = utf16_units(dst);
                for offset in 0..=count {
                    mappings.insert(low + offset, offset_text(&units, offset));
                }
                i += 3;
            }
            Token::Open => {
                let mut j = i + 3;
                let mut offset = 0;
                while let Some(Token::Hex(dst)) = tokens.get(j) {
                    if offset <= count {
                        mappings.insert(low + offset, utf16_text(dst));
                    }
                    offset += 1;
                    j += 1;
                }
                // skip the closing bracket
                i = if matches!(tokens.get(j), Some(Token::Close)) { j + 1 } else { j };
            }
            Token::Close => i += 3,
        }
    }
}

fn hex_bytes(digits: &[u8]) -> Vec<u8> {
    // an odd final digit is padded with 0
    digits
        .chunks(2)
        .map(|pair| {
            let hi = hex_value(pair[0]);
            let lo = pair.get(1).copied().map_or(0, hex_value);
            (hi << 4) | lo
        })
        .collect()
}

fn hex_value(digit: u8) -> u8 {
    match digit {
        b'0'..=b'9' => digit - b'0',
        b'a'..=b'f' => digit - b'a' + 10,
        b'A'..=b'F' => digit - b'A' + 10,
        _ => 0,
    }
}

/// Big-endian value of up to four code bytes.
fn code_value(bytes: &[u8]) -> u32 {
    bytes
        .iter()
        .take(4)
        .fold(0u32, |acc, b| (acc << 8) | u32::from(*b))
}

fn utf16_units(bytes: &[u8]) -> Vec<u16> {
    bytes
        .chunks(2)
        .map(|pair| match pair {
            [hi, lo] => u16::from_be_bytes([*hi, *lo]),
            [single] => u16::from(*single),
            _ => 0,
        })
        .collect()
}

fn utf16_text(bytes: &[u8]) -> String {
    let (text, _) = encoding_rs::UTF_16BE.decode_without_bom_handling(bytes);
    text.into_owned()
}

/// Destination of a `bfrange` entry: the last UTF-16 unit is incremented.
fn offset_text(units: &[u16], offset: u32) -> String {
    let mut units = units.to_vec();
    if let Some(last) = units.last_mut() {
        *last = last.wrapping_add(offset as u16);
    }
    String::from_utf16_lossy(&units)
}
