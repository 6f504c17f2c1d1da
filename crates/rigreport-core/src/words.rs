use crate::geometry::BBox;
use crate::text::Char;

/// Options for grouping chars into words and lines.
#[derive(Debug, Clone)]
pub struct WordOptions {
    /// Maximum horizontal gap between characters of one word.
    pub x_tolerance: f64,
    /// Maximum difference in `top` between characters of one line.
    pub y_tolerance: f64,
}

impl Default for WordOptions {
    fn default() -> Self {
        Self {
            x_tolerance: 3.0,
            y_tolerance: 3.0,
        }
    }
}

/// A run of adjacent non-blank characters on one line.
#[derive(Debug, Clone, PartialEq)]
pub struct Word {
    pub text: String,
    /// Union of the constituent character boxes.
    pub bbox: BBox,
}

/// Groups characters into words based on spatial proximity.
pub struct WordExtractor;

impl WordExtractor {
    /// Extract words line by line.
    ///
    /// Characters are clustered into lines by `top`, each line is read left to
    /// right, and a word ends at a blank character or where the horizontal gap
    /// exceeds `x_tolerance`. Right-to-left scripts therefore come out in
    /// visual order; display reordering happens later in the normalizer.
    pub fn extract_lines(chars: &[Char], options: &WordOptions) -> Vec<Vec<Word>> {
        cluster_lines(chars, options.y_tolerance)
            .into_iter()
            .map(|line| Self::split_words(&line, options))
            .filter(|words| !words.is_empty())
            .collect()
    }

    /// Extract words from all lines, flattened in reading order.
    pub fn extract(chars: &[Char], options: &WordOptions) -> Vec<Word> {
        Self::extract_lines(chars, options)
            .into_iter()
            .flatten()
            .collect()
    }

    fn split_words(line: &[&Char], options: &WordOptions) -> Vec<Word> {
        let mut words = Vec::new();
        let mut current: Vec<&Char> = Vec::new();

        for &ch in line {
            if ch.is_blank() {
                if !current.is_empty() {
                    words.push(make_word(&current));
                    current.clear();
                }
                continue;
            }
            if let Some(last) = current.last() {
                let gap = (last.bbox.x0.max(ch.bbox.x0) - last.bbox.x1.min(ch.bbox.x1)).max(0.0);
                if gap > options.x_tolerance {
                    words.push(make_word(&current));
                    current.clear();
                }
            }
            current.push(ch);
        }
        if !current.is_empty() {
            words.push(make_word(&current));
        }
        words
    }
}

/// Join chars into text: words separated by a space, lines by `\n`.
pub fn extract_text(chars: &[Char], options: &WordOptions) -> String {
    WordExtractor::extract_lines(chars, options)
        .iter()
        .map(|line| {
            line.iter()
                .map(|w| w.text.as_str())
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn make_word(chars: &[&Char]) -> Word {
    let text: String = chars.iter().map(|c| c.text.as_str()).collect();
    let mut bbox = chars[0].bbox;
    for ch in &chars[1..] {
        bbox = bbox.union(&ch.bbox);
    }
    Word { text, bbox }
}

/// Cluster chars into lines: sort by `top`, start a new line when the gap to the
/// previous char's `top` exceeds the tolerance, then order each line by `x0`.
fn cluster_lines(chars: &[Char], y_tolerance: f64) -> Vec<Vec<&Char>> {
    let mut sorted: Vec<&Char> = chars.iter().collect();
    sorted.sort_by(|a, b| a.bbox.top.total_cmp(&b.bbox.top));

    let mut lines: Vec<Vec<&Char>> = Vec::new();
    let mut last_top = f64::NEG_INFINITY;
    for ch in sorted {
        match lines.last_mut() {
            Some(line) if ch.bbox.top - last_top <= y_tolerance => line.push(ch),
            _ => lines.push(vec![ch]),
        }
        last_top = ch.bbox.top;
    }
    for line in &mut lines {
        line.sort_by(|a, b| a.bbox.x0.total_cmp(&b.bbox.x0));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_char(text: &str, x0: f64, top: f64, x1: f64, bottom: f64) -> Char {
        Char {
            text: text.to_string(),
            bbox: BBox::new(x0, top, x1, bottom),
            fontname: "Helvetica".to_string(),
            size: 10.0,
            upright: true,
        }
    }

    fn row(text: &str, x0: f64, top: f64) -> Vec<Char> {
        text.chars()
            .enumerate()
            .map(|(i, c)| {
                let x = x0 + i as f64 * 6.0;
                make_char(&c.to_string(), x, top, x + 6.0, top + 10.0)
            })
            .collect()
    }

    #[test]
    fn empty_chars() {
        assert!(WordExtractor::extract(&[], &WordOptions::default()).is_empty());
        assert_eq!(extract_text(&[], &WordOptions::default()), "");
    }

    #[test]
    fn splits_on_space_char() {
        let words = WordExtractor::extract(&row("ab cd", 0.0, 0.0), &WordOptions::default());
        let texts: Vec<&str> = words.iter().map(|w| w.text.as_str()).collect();
        assert_eq!(texts, vec!["ab", "cd"]);
        assert_eq!(words[1].bbox.x0, 18.0);
    }

    #[test]
    fn splits_on_large_gap() {
        let mut chars = row("ab", 0.0, 0.0);
        chars.extend(row("cd", 40.0, 0.0));
        let words = WordExtractor::extract(&chars, &WordOptions::default());
        assert_eq!(words.len(), 2);
    }

    #[test]
    fn unsorted_chars_are_sorted_spatially() {
        let mut chars = row("xyz", 0.0, 0.0);
        chars.reverse();
        assert_eq!(extract_text(&chars, &WordOptions::default()), "xyz");
    }

    #[test]
    fn lines_are_joined_with_newline() {
        let mut chars = row("12", 0.0, 30.0);
        chars.extend(row("ab", 0.0, 0.0));
        // slightly misaligned glyph stays on its line
        chars.push(make_char("c", 12.0, 1.5, 18.0, 11.5));
        assert_eq!(extract_text(&chars, &WordOptions::default()), "abc\n12");
    }
}
