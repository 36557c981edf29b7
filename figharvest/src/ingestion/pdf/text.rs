//! Word tokens from positioned page characters.

use crate::config::TextConfig;
use crate::extraction::geometry::BoundingBox;
use crate::ingestion::source::TextToken;

/// Group characters (in content-stream order, top-left coordinates) into words.
///
/// A word ends at whitespace, at a horizontal gap wider than
/// `word_x_tolerance`, at a backward jump, or when the top edge moves by more
/// than `word_y_tolerance`.
pub fn assemble_words<I>(chars: I, config: &TextConfig) -> Vec<TextToken>
where
    I: IntoIterator<Item = (char, BoundingBox)>,
{
    let mut words = Vec::new();
    let mut text = String::new();
    let mut bounds: Option<BoundingBox> = None;
    let mut last: Option<BoundingBox> = None;

    for (c, b) in chars {
        if c.is_whitespace() || c.is_control() {
            flush(&mut words, &mut text, &mut bounds);
            last = None;
            continue;
        }

        if let Some(prev) = last {
            let gap = b.x0 - prev.x1;
            let backward = b.x0 < prev.x0 - config.word_x_tolerance;
            let shifted = (b.y0 - prev.y0).abs() > config.word_y_tolerance;
            if gap > config.word_x_tolerance || backward || shifted {
                flush(&mut words, &mut text, &mut bounds);
            }
        }

        text.push(c);
        bounds = Some(match bounds {
            Some(word) => word.union(&b),
            None => b,
        });
        last = Some(b);
    }
    flush(&mut words, &mut text, &mut bounds);

    words
}

fn flush(words: &mut Vec<TextToken>, text: &mut String, bounds: &mut Option<BoundingBox>) {
    if let Some(b) = bounds.take()
        && !text.is_empty()
    {
        words.push(TextToken::new(std::mem::take(text), b));
    }
    text.clear();
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Characters of `s` laid out left to right, 5 points wide, no spacing.
    fn layout(s: &str, x: f64, y: f64) -> Vec<(char, BoundingBox)> {
        s.chars()
            .enumerate()
            .map(|(i, c)| {
                let x0 = x + 5.0 * i as f64;
                (c, BoundingBox::new(x0, y, x0 + 5.0, y + 10.0))
            })
            .collect()
    }

    fn texts(tokens: &[TextToken]) -> Vec<&str> {
        tokens.iter().map(|t| t.text.as_str()).collect()
    }

    #[test]
    fn test_whitespace_splits_words() {
        let tokens = assemble_words(layout("Figure 1. Overview", 100.0, 50.0), &TextConfig::default());
        assert_eq!(texts(&tokens), vec!["Figure", "1.", "Overview"]);
        assert_eq!(tokens[0].bounds, BoundingBox::new(100.0, 50.0, 130.0, 60.0));
    }

    #[test]
    fn test_horizontal_gap_splits_words() {
        let mut chars = layout("ab", 0.0, 0.0);
        chars.extend(layout("cd", 12.0, 0.0)); // 2 point gap after "b"
        chars.extend(layout("ef", 22.5, 0.0)); // 0.5 point gap after "d"
        let tokens = assemble_words(chars, &TextConfig::default());
        assert_eq!(texts(&tokens), vec!["ab", "cdef"]);
    }

    #[test]
    fn test_line_change_splits_words() {
        let mut chars = layout("end", 100.0, 50.0);
        chars.extend(layout("next", 0.0, 62.0));
        chars.extend(layout("sub", 20.0, 63.5)); // within y tolerance, touching "next"
        let tokens = assemble_words(chars, &TextConfig::default());
        assert_eq!(texts(&tokens), vec!["end", "nextsub"]);
    }

    #[test]
    fn test_control_characters_and_empty_input() {
        let mut chars = layout("a", 0.0, 0.0);
        chars.push(('\r', BoundingBox::new(5.0, 0.0, 5.0, 10.0)));
        chars.extend(layout("b", 5.0, 0.0));
        let tokens = assemble_words(chars, &TextConfig::default());
        assert_eq!(texts(&tokens), vec!["a", "b"]);

        assert!(assemble_words(Vec::new(), &TextConfig::default()).is_empty());
    }
}
