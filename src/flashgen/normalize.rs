//! # Text Normalizer
//!
//! Turns raw pasted or extracted text into clean, length-capped segments.
//!
//! Extracted text (especially from PDFs) arrives hard-wrapped, with ragged
//! indentation and runs of blank lines. Normalizing does three things:
//!
//! 1. Every line is trimmed and inner whitespace runs collapse to one space.
//!    Blank lines and stray control characters disappear.
//! 2. Lines are re-joined. A line that ends a sentence, or is short enough to
//!    be a heading, starts a new paragraph when the next line opens with an
//!    uppercase letter. Everything else is joined with a single space.
//! 3. The result is cut into segments of at most `max_chars` characters,
//!    preferring paragraph boundaries, then sentence boundaries, then a hard cut.
//!
//! A generation request sends only the [`NormalizedText::primary`] segment.

use crate::error::{FlashError, Result};

/// Lines shorter than this are treated as possible headings.
const HEADING_MAX_CHARS: usize = 50;
const WORDS_PER_MINUTE: usize = 200;
const PARAGRAPH_BREAK: &str = "\n\n";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedText {
    segments: Vec<String>,
}

impl NormalizedText {
    /// The segment a single generation request works from.
    pub fn primary(&self) -> &str {
        // normalize() never builds an empty segment list
        self.segments.first().map(String::as_str).unwrap_or_default()
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// True when text beyond the first segment was cut off.
    pub fn truncated(&self) -> bool {
        self.segments.len() > 1
    }

    pub fn total_chars(&self) -> usize {
        self.segments.iter().map(|s| s.chars().count()).sum()
    }
}

/// Cleans `raw` and splits it into segments of at most `max_chars` characters.
///
/// Fails with [`FlashError::EmptyInput`] if no text survives cleaning.
pub fn normalize(raw: &str, max_chars: usize) -> Result<NormalizedText> {
    let cleaned = clean(raw);
    if cleaned.is_empty() {
        return Err(FlashError::EmptyInput);
    }
    let segments = split_segments(&cleaned, max_chars.max(1));
    Ok(NormalizedText { segments })
}

/// Collapses whitespace and rebuilds paragraphs from hard-wrapped lines.
pub fn clean(raw: &str) -> String {
    let lines: Vec<String> = raw
        .lines()
        .map(collapse_line)
        .filter(|line| !line.is_empty())
        .collect();

    let mut out = String::new();
    for (i, line) in lines.iter().enumerate() {
        out.push_str(line);
        let Some(next) = lines.get(i + 1) else {
            break;
        };
        let closes_block =
            line.ends_with(['.', '!', '?']) || line.chars().count() < HEADING_MAX_CHARS;
        let next_opens = next.chars().next().is_some_and(char::is_uppercase);
        if closes_block && next_opens {
            out.push_str(PARAGRAPH_BREAK);
        } else {
            out.push(' ');
        }
    }
    out
}

fn collapse_line(line: &str) -> String {
    line.chars()
        .filter(|c| !c.is_control() || c.is_whitespace())
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn split_segments(text: &str, max_chars: usize) -> Vec<String> {
    let mut segments = Vec::new();
    let mut current = String::new();

    for paragraph in text.split(PARAGRAPH_BREAK) {
        if char_len(paragraph) <= max_chars {
            append_unit(&mut segments, &mut current, paragraph, PARAGRAPH_BREAK, max_chars);
            continue;
        }
        for sentence in sentences(paragraph) {
            for piece in hard_chunks(sentence, max_chars) {
                append_unit(&mut segments, &mut current, &piece, " ", max_chars);
            }
        }
    }

    if !current.is_empty() {
        segments.push(current);
    }
    segments
}

fn append_unit(
    segments: &mut Vec<String>,
    current: &mut String,
    unit: &str,
    separator: &str,
    max_chars: usize,
) {
    if current.is_empty() {
        current.push_str(unit);
        return;
    }
    if char_len(current) + separator.len() + char_len(unit) <= max_chars {
        current.push_str(separator);
        current.push_str(unit);
    } else {
        segments.push(std::mem::take(current));
        current.push_str(unit);
    }
}

/// Splits after `.`, `!` or `?` when followed by a space.
fn sentences(paragraph: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut start = 0;
    let mut chars = paragraph.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        if matches!(c, '.' | '!' | '?') && matches!(chars.peek(), Some((_, ' '))) {
            let end = i + c.len_utf8();
            out.push(paragraph[start..end].trim());
            start = end;
        }
    }
    let rest = paragraph[start..].trim();
    if !rest.is_empty() {
        out.push(rest);
    }
    out
}

fn hard_chunks(s: &str, max_chars: usize) -> Vec<String> {
    let chars: Vec<char> = s.chars().collect();
    chars
        .chunks(max_chars)
        .map(|chunk| chunk.iter().collect())
        .collect()
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Basic size figures for a piece of text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContentStats {
    pub characters: usize,
    pub words: usize,
    pub paragraphs: usize,
    pub reading_minutes: usize,
}

impl ContentStats {
    pub fn of(text: &str) -> Self {
        if text.trim().is_empty() {
            return Self::default();
        }
        let words = text.split_whitespace().count();
        let reading_minutes = ((words as f64 / WORDS_PER_MINUTE as f64).round() as usize).max(1);
        Self {
            characters: text.chars().count(),
            words,
            paragraphs: text
                .split(PARAGRAPH_BREAK)
                .filter(|p| !p.trim().is_empty())
                .count(),
            reading_minutes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapses_inner_whitespace() {
        assert_eq!(clean("  one   two\tthree  "), "one two three");
    }

    #[test]
    fn joins_wrapped_lines_with_a_space() {
        let raw = "Photosynthesis converts light energy into chemical energy stored\nin glucose molecules.";
        assert_eq!(
            clean(raw),
            "Photosynthesis converts light energy into chemical energy stored in glucose molecules."
        );
    }

    #[test]
    fn keeps_paragraph_after_sentence_end() {
        let raw = "Plants need light.\n\n\nChlorophyll absorbs it.";
        assert_eq!(clean(raw), "Plants need light.\n\nChlorophyll absorbs it.");
    }

    #[test]
    fn short_heading_starts_paragraph() {
        let raw = "Cell Biology\nMitochondria produce ATP.";
        assert_eq!(clean(raw), "Cell Biology\n\nMitochondria produce ATP.");
    }

    #[test]
    fn drops_control_characters() {
        assert_eq!(clean("abc\u{0}def\u{c}ghi"), "abcdef ghi");
    }

    #[test]
    fn empty_input_is_an_error() {
        assert!(matches!(normalize("", 100), Err(FlashError::EmptyInput)));
        assert!(matches!(
            normalize(" \n\t \n", 100),
            Err(FlashError::EmptyInput)
        ));
    }

    #[test]
    fn short_text_is_one_segment() {
        let text = normalize("Water boils at 100 degrees Celsius.", 1000).unwrap();
        assert_eq!(text.segments().len(), 1);
        assert!(!text.truncated());
        assert_eq!(text.primary(), "Water boils at 100 degrees Celsius.");
    }

    #[test]
    fn segments_respect_the_cap() {
        let raw = (0..20)
            .map(|i| format!("Paragraph number {} talks about a topic.", i))
            .collect::<Vec<_>>()
            .join("\n\n");
        let text = normalize(&raw, 120).unwrap();
        assert!(text.truncated());
        for segment in text.segments() {
            assert!(segment.chars().count() <= 120, "segment too long: {segment}");
        }
    }

    #[test]
    fn long_paragraph_breaks_at_sentences() {
        let raw = "First sentence here. Second sentence here. Third sentence here.";
        let text = normalize(raw, 25).unwrap();
        assert_eq!(
            text.segments(),
            &[
                "First sentence here.".to_string(),
                "Second sentence here.".to_string(),
                "Third sentence here.".to_string(),
            ]
        );
    }

    #[test]
    fn unbroken_text_is_hard_cut() {
        let raw = "x".repeat(25);
        let text = normalize(&raw, 10).unwrap();
        let lens: Vec<usize> = text.segments().iter().map(|s| s.len()).collect();
        assert_eq!(lens, vec![10, 10, 5]);
        assert_eq!(text.total_chars(), 25);
    }

    #[test]
    fn content_stats() {
        let stats = ContentStats::of("One two three.\n\nFour five.");
        assert_eq!(stats.words, 5);
        assert_eq!(stats.paragraphs, 2);
        assert_eq!(stats.reading_minutes, 1);
        assert_eq!(ContentStats::of("   "), ContentStats::default());
    }
}
