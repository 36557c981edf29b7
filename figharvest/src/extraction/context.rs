//! Body-text references to figures and tables.
//!
//! The document text is split into sentences once; each figure then collects
//! windows of sentences around every sentence that mentions its label number.

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

use crate::config::ContextConfig;

static NUMBER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+(?:\.\d+)*").unwrap());

static SYNTHETIC_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^FIG_P\d+_\d+$").unwrap());

/// Split text into sentences.
///
/// A sentence ends at `.`, `?` or `!` followed by whitespace, unless the next
/// non-space character is a digit ("see Fig. 3" stays one sentence).
/// Empty pieces are dropped and every sentence is trimmed.
pub fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        if !matches!(c, '.' | '?' | '!') {
            continue;
        }
        let end = i + c.len_utf8();
        let rest = &text[end..];
        let trimmed = rest.trim_start();
        if trimmed.len() == rest.len() {
            continue;
        }
        if let Some(next) = trimmed.chars().next()
            && !next.is_ascii_digit()
        {
            push_sentence(&mut sentences, &text[start..end]);
            start = end;
        }
    }
    push_sentence(&mut sentences, &text[start..]);

    sentences
}

fn push_sentence(sentences: &mut Vec<String>, piece: &str) {
    let piece = piece.trim();
    if !piece.is_empty() {
        sentences.push(piece.to_string());
    }
}

/// The number body text would use to refer to a figure.
///
/// Taken from the origin id first, then the caption. Synthetic ids carry a
/// page number rather than a label number and are skipped.
pub fn reference_number(origin_id: &str, caption: &str) -> Option<String> {
    let id = if SYNTHETIC_ID_RE.is_match(origin_id) {
        ""
    } else {
        origin_id
    };
    let haystack = format!("{} {}", id, caption);
    NUMBER_RE.find(&haystack).map(|m| m.as_str().to_string())
}

/// Matches "Figure N" / "Fig. N" / "Table N" / CJK equivalents for one number.
///
/// Latin prefixes must start a word ("stable 2" is not "Table 2"); CJK
/// prefixes attach directly to the preceding text.
struct ReferenceMatcher {
    pattern: Regex,
}

impl ReferenceMatcher {
    fn new(number: &str) -> Option<Self> {
        let pattern = Regex::new(&format!(
            r"(?i)(?:\b(?:Figure|Fig\.?|Table|Tab\.?)|图表|图|表)\s*{}",
            regex::escape(number)
        ))
        .ok()?;
        Some(Self { pattern })
    }

    /// Whether `sentence` mentions the number as a whole ("Figure 1" does not
    /// match "Figure 10" or "Figure 1.2").
    fn matches(&self, sentence: &str) -> bool {
        self.pattern.find_iter(sentence).any(|m| {
            let mut after = sentence[m.end()..].chars();
            match after.next() {
                Some(c) if c.is_ascii_digit() => false,
                Some('.') => !after.next().is_some_and(|c| c.is_ascii_digit()),
                _ => true,
            }
        })
    }
}

/// Sentence window around index `i`, widened to `min_window` near the edges.
pub fn sentence_window(i: usize, total: usize, config: &ContextConfig) -> Range<usize> {
    let mut start = i.saturating_sub(config.window_before);
    let mut end = (i + config.window_after).min(total);

    let short = config.min_window.saturating_sub(end - start);
    if short > 0 {
        let forward = short.min(total - end);
        end += forward;
        start = start.saturating_sub(short - forward);
    }

    start..end
}

/// Merge overlapping or touching ranges into disjoint ones sorted by start.
pub fn merge_windows(mut windows: Vec<Range<usize>>) -> Vec<Range<usize>> {
    windows.sort_by_key(|w| (w.start, w.end));

    let mut merged: Vec<Range<usize>> = Vec::new();
    for window in windows {
        match merged.last_mut() {
            Some(last) if window.start <= last.end => last.end = last.end.max(window.end),
            _ => merged.push(window),
        }
    }
    merged
}

/// Sentence index over a document's full text
pub struct ContextIndex {
    sentences: Vec<String>,
}

impl ContextIndex {
    pub fn new(full_text: &str) -> Self {
        Self {
            sentences: split_sentences(full_text),
        }
    }

    pub fn sentence_count(&self) -> usize {
        self.sentences.len()
    }

    /// Context strings for one figure, in document order.
    ///
    /// Sentences that are just a piece of the figure's own caption are not
    /// counted as references.
    pub fn contexts_for(&self, origin_id: &str, caption: &str, config: &ContextConfig) -> Vec<String> {
        let Some(matcher) = reference_number(origin_id, caption)
            .as_deref()
            .and_then(ReferenceMatcher::new)
        else {
            return Vec::new();
        };

        let caption = collapse_whitespace(caption);
        let total = self.sentences.len();
        let windows = self
            .sentences
            .iter()
            .enumerate()
            .filter(|(_, sentence)| matcher.matches(sentence))
            .filter(|(_, sentence)| {
                caption.is_empty() || !caption.contains(&collapse_whitespace(sentence))
            })
            .map(|(i, _)| sentence_window(i, total, config))
            .collect();

        merge_windows(windows)
            .into_iter()
            .map(|w| self.sentences[w].join(" "))
            .collect()
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
