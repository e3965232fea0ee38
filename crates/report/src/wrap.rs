//! Greedy line wrapping against measured text width.

use crate::metrics::{text_width, Face};

/// Wrap `text` into lines no wider than `max_width` points.
///
/// Explicit line breaks are kept, so blank lines survive as empty strings.
/// Runs of spaces collapse to one. A word wider than the line is broken
/// between characters. Empty input yields no lines.
pub fn wrap_text(text: &str, max_width: f32, size: f32, face: Face) -> Vec<String> {
    let mut lines = Vec::new();
    if text.trim().is_empty() {
        return lines;
    }

    let space = text_width(" ", size, face);

    for paragraph in text.trim_end().lines() {
        let paragraph = paragraph.trim_end_matches('\r');
        let mut current = String::new();
        let mut current_width = 0.0;

        for word in paragraph.split_whitespace() {
            let word_width = text_width(word, size, face);

            if current.is_empty() {
                if word_width <= max_width {
                    current.push_str(word);
                    current_width = word_width;
                } else {
                    current_width = break_word(word, max_width, size, face, &mut lines, &mut current);
                }
                continue;
            }

            if current_width + space + word_width <= max_width {
                current.push(' ');
                current.push_str(word);
                current_width += space + word_width;
            } else {
                lines.push(std::mem::take(&mut current));
                if word_width <= max_width {
                    current.push_str(word);
                    current_width = word_width;
                } else {
                    current_width = break_word(word, max_width, size, face, &mut lines, &mut current);
                }
            }
        }

        lines.push(current);
    }

    lines
}

/// Split an over-long word, pushing full chunks to `lines` and leaving the
/// remainder in `current`. Returns the remainder's width.
fn break_word(
    word: &str,
    max_width: f32,
    size: f32,
    face: Face,
    lines: &mut Vec<String>,
    current: &mut String,
) -> f32 {
    let mut width = 0.0;
    for c in word.chars() {
        let w = text_width(c.encode_utf8(&mut [0; 4]), size, face);
        if width + w > max_width && !current.is_empty() {
            lines.push(std::mem::take(current));
            width = 0.0;
        }
        current.push(c);
        width += w;
    }
    width
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIZE: f32 = 10.0;

    fn fits(lines: &[String], max_width: f32) -> bool {
        lines.iter().all(|l| text_width(l, SIZE, Face::Regular) <= max_width + 0.001)
    }

    #[test]
    fn test_empty_input_has_no_lines() {
        assert!(wrap_text("", 100.0, SIZE, Face::Regular).is_empty());
        assert!(wrap_text("  \n \t ", 100.0, SIZE, Face::Regular).is_empty());
    }

    #[test]
    fn test_short_text_is_one_line() {
        let lines = wrap_text("Follow up next week", 500.0, SIZE, Face::Regular);
        assert_eq!(lines, vec!["Follow up next week"]);
    }

    #[test]
    fn test_wraps_at_word_boundaries() {
        let text = "the quick brown fox jumps over the lazy dog ".repeat(10);
        let max = 150.0;
        let lines = wrap_text(&text, max, SIZE, Face::Regular);

        assert!(lines.len() > 1);
        assert!(fits(&lines, max));
        assert_eq!(lines.join(" "), text.split_whitespace().collect::<Vec<_>>().join(" "));
    }

    #[test]
    fn test_keeps_explicit_breaks() {
        let lines = wrap_text("first\n\nthird\r\nfourth", 500.0, SIZE, Face::Regular);
        assert_eq!(lines, vec!["first", "", "third", "fourth"]);
    }

    #[test]
    fn test_breaks_long_words() {
        let word = "x".repeat(200);
        let max = 100.0;
        let lines = wrap_text(&format!("see {}", word), max, SIZE, Face::Regular);

        assert_eq!(lines[0], "see");
        assert!(lines.len() > 2);
        assert!(fits(&lines, max));
        assert_eq!(lines[1..].concat(), word);
    }
}
