//! Figure and table labels ("Figure 2.1", "Tab. 3", "图 4", "表 3.4").

use std::sync::LazyLock;

use regex::Regex;

/// Label prefix followed by a number that may be dotted or hyphenated.
static LABEL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^\s*(Fig(?:\.|ure)?|Figs?|Table|Tab\.?|图表|图|表)\s*([0-9]+(?:[.\-][0-9A-Za-z]+)*)",
    )
    .unwrap()
});

/// Looser figure prefix used when no full label is present ("Fig-3").
static LOOSE_FIGURE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(Fig(?:ure)?s?[\s\-]*\d+(?:\.\d+)*)").unwrap());

/// Characters not allowed in output filenames
static UNSAFE_FILENAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[\\/*?:"<>|]"#).unwrap());

/// English prefixes that are normalized; anything else (CJK) is kept verbatim.
static ENGLISH_PREFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(Fig(?:\.|ure)?|Figs?|Table|Tab\.?)$").unwrap());

/// A label found at the start of a caption
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptionLabel {
    /// Prefix exactly as written ("Fig.", "Table", "图")
    pub prefix: String,
    /// Number as written ("2.1", "3-4a")
    pub number: String,
    /// Byte offset in the caption where the label ends
    pub end: usize,
}

impl CaptionLabel {
    /// "Prefix Number" as written, e.g. "Fig. 3".
    pub fn raw(&self) -> String {
        format!("{} {}", self.prefix, self.number)
    }

    /// Identifier for cross-referencing: uppercase, e.g. "FIG. 3", "图 4".
    pub fn origin_id(&self) -> String {
        self.raw().to_uppercase()
    }

    /// Canonical form used in filenames: "FIGURE 2.1", "TABLE 4.3", "表 3.4".
    pub fn normalized(&self) -> String {
        if !ENGLISH_PREFIX_RE.is_match(&self.prefix) {
            return self.raw();
        }
        let mut prefix = self
            .prefix
            .to_uppercase()
            .replace("FIG.", "FIG")
            .replace("TAB.", "TABLE");
        if prefix == "FIGS" {
            prefix = "FIGURES".to_string();
        }
        format!("{} {}", prefix, self.number)
    }
}

/// Parse a label at the start of `text`.
pub fn parse_label(text: &str) -> Option<CaptionLabel> {
    let captures = LABEL_RE.captures(text)?;
    let prefix = captures.get(1)?;
    let number = captures.get(2)?;
    Some(CaptionLabel {
        prefix: prefix.as_str().to_string(),
        number: number.as_str().to_string(),
        end: number.end(),
    })
}

/// Whether `text` starts with a recognized label.
pub fn has_label(text: &str) -> bool {
    LABEL_RE.is_match(text)
}

/// Figure id for a record: the raw label, else a loose "Fig-N" prefix, else
/// a synthetic `fig_p{page}_{index}`.
pub fn figure_id(caption: &str, label: Option<&CaptionLabel>, page: usize, index: usize) -> String {
    if let Some(label) = label {
        return label.raw();
    }
    LOOSE_FIGURE_RE
        .captures(caption)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| format!("fig_p{}_{}", page, index))
}

/// Fallback origin id for a figure without a label.
pub fn synthetic_origin_id(page: usize, index: usize) -> String {
    format!("FIG_P{}_{}", page, index)
}

/// Replace characters that are unsafe in filenames with `_`.
pub fn sanitize_for_filename(name: &str) -> String {
    UNSAFE_FILENAME_RE.replace_all(name, "_").into_owned()
}

/// Cut a caption after its first sentence.
///
/// Sentence ends are `。．.!?;；` followed by whitespace. Punctuation that
/// belongs to the leading label ("Figure 1." / "Fig. 2") does not count.
pub fn truncate_caption(text: &str) -> String {
    let text = text.trim();
    let skip_until = parse_label(text)
        .map(|label| label_terminator_end(text, label.end))
        .unwrap_or(0);

    let mut chars = text.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        if i < skip_until || !is_caption_terminator(c) {
            continue;
        }
        if let Some(&(_, next)) = chars.peek()
            && next.is_whitespace()
        {
            return text[..i + c.len_utf8()].trim().to_string();
        }
    }
    text.to_string()
}

/// End of the label plus one trailing terminator, if there is one.
fn label_terminator_end(text: &str, label_end: usize) -> usize {
    match text[label_end..].chars().next() {
        Some(c) if is_caption_terminator(c) || c == ':' || c == '：' => label_end + c.len_utf8(),
        _ => label_end,
    }
}

fn is_caption_terminator(c: char) -> bool {
    matches!(c, '。' | '．' | '.' | '!' | '?' | ';' | '；')
}
