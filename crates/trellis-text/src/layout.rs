//! Line breaking and aligned text bounds

use trellis_core::{HorizontalAlign, VerticalAlign};

use crate::Shaper;

/// Combined text alignment mode of a drawing context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextAlign {
    pub horizontal: HorizontalAlign,
    pub vertical: VerticalAlign,
}

impl TextAlign {
    pub const fn new(horizontal: HorizontalAlign, vertical: VerticalAlign) -> Self {
        Self { horizontal, vertical }
    }
}

impl Default for TextAlign {
    fn default() -> Self {
        Self::new(HorizontalAlign::Left, VerticalAlign::Baseline)
    }
}

/// One row produced by line breaking (byte offsets into the source text)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextRow {
    pub start: usize,
    /// End of the visible text, trailing whitespace excluded
    pub end: usize,
    /// Where the following row starts
    pub next: usize,
    pub width: f32,
}

/// Line break opportunity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakOpportunity {
    /// Break allowed (soft break)
    AllowBreak,
    /// Must break (hard break - newline)
    MustBreak,
}

/// Find break opportunities in text (simplified UAX #14).
///
/// Offsets point just past the character that allows the break.
pub fn break_opportunities(text: &str) -> Vec<(usize, BreakOpportunity)> {
    let mut breaks = Vec::new();
    let mut chars = text.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        let opp = match c {
            // Hard breaks
            '\n' => Some(BreakOpportunity::MustBreak),
            '\r' => {
                // CRLF
                if chars.peek().map(|(_, c)| *c) == Some('\n') {
                    let (j, _) = chars.next().unwrap_or((i, '\r'));
                    breaks.push((j + 1, BreakOpportunity::MustBreak));
                    continue;
                }
                Some(BreakOpportunity::MustBreak)
            }
            // Soft breaks after whitespace and hyphens
            ' ' | '\t' | '-' => Some(BreakOpportunity::AllowBreak),
            c if is_cjk(c) => Some(BreakOpportunity::AllowBreak),
            _ => None,
        };

        if let Some(opp) = opp {
            breaks.push((i + c.len_utf8(), opp));
        }
    }

    breaks
}

/// Check if character is CJK (simplified check)
fn is_cjk(c: char) -> bool {
    let code = c as u32;
    // CJK Unified Ideographs
    (0x4E00..=0x9FFF).contains(&code) ||
    // Hiragana
    (0x3040..=0x309F).contains(&code) ||
    // Katakana
    (0x30A0..=0x30FF).contains(&code) ||
    // Hangul Syllables
    (0xAC00..=0xD7AF).contains(&code)
}

fn is_space(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n')
}

/// End offset of `text[start..end]` without trailing whitespace
fn trim_end(text: &str, start: usize, end: usize) -> usize {
    start + text[start..end].trim_end_matches(is_space).len()
}

/// Split text into at most `max_rows` rows no wider than `max_width`.
///
/// Rows break at newlines and after spaces, hyphens and CJK characters. A
/// word that does not fit on its own is broken between characters; every
/// row holds at least one character so breaking always makes progress.
pub fn break_lines(
    shaper: &dyn Shaper,
    font: &str,
    size: f32,
    text: &str,
    max_width: f32,
    max_rows: usize,
) -> Vec<TextRow> {
    let mut rows = Vec::new();
    let opportunities = break_opportunities(text);
    let measure = |start: usize, end: usize| shaper.advance(font, size, &text[start..end]);

    let mut pos = 0;
    while pos < text.len() && rows.len() < max_rows {
        // Hard line containing `pos`
        let (line_end, after_line) = opportunities
            .iter()
            .find(|(at, opp)| *at > pos && *opp == BreakOpportunity::MustBreak)
            .map(|(at, _)| (trim_end(text, pos, *at), *at))
            .unwrap_or((text.len(), text.len()));

        let full_end = trim_end(text, pos, line_end);
        let full_width = measure(pos, full_end);
        if full_width <= max_width {
            rows.push(TextRow { start: pos, end: full_end, next: after_line, width: full_width });
            pos = after_line;
            continue;
        }

        // Last soft break that still fits
        let soft_fit = opportunities
            .iter()
            .filter(|(at, opp)| *at > pos && *at <= line_end && *opp == BreakOpportunity::AllowBreak)
            .map(|(at, _)| (trim_end(text, pos, *at), *at))
            .filter(|(end, _)| *end > pos)
            .take_while(|(end, _)| measure(pos, *end) <= max_width)
            .last();

        let row = match soft_fit {
            Some((end, at)) => {
                let next = skip_spaces(text, at, line_end);
                TextRow { start: pos, end, next, width: measure(pos, end) }
            }
            None => {
                let end = char_fit(text, pos, line_end, |end| measure(pos, end) <= max_width);
                TextRow { start: pos, end, next: end, width: measure(pos, end) }
            }
        };
        // A row ending at the hard break continues after the newline
        pos = if row.next >= line_end { after_line } else { row.next };
        rows.push(TextRow { next: pos, ..row });
    }

    rows
}

/// Skip whitespace starting a continuation row
fn skip_spaces(text: &str, from: usize, limit: usize) -> usize {
    let skipped = text[from..limit].len() - text[from..limit].trim_start_matches([' ', '\t']).len();
    from + skipped
}

/// Longest prefix of `text[start..limit]` accepted by `fits`, at least one char
fn char_fit(text: &str, start: usize, limit: usize, fits: impl Fn(usize) -> bool) -> usize {
    let mut boundaries = text[start..limit].char_indices().map(|(i, c)| start + i + c.len_utf8());
    let first = boundaries.next().unwrap_or(limit);
    boundaries.take_while(|end| fits(*end)).last().unwrap_or(first)
}

/// Bounds `[xmin, ymin, xmax, ymax]` of one line of text drawn at (x, y)
/// with the given alignment
pub fn text_bounds(
    shaper: &dyn Shaper,
    font: &str,
    size: f32,
    align: TextAlign,
    x: f32,
    y: f32,
    text: &str,
) -> [f32; 4] {
    let width = shaper.advance(font, size, text);
    let metrics = shaper.metrics(font, size);

    let x = x - width * align.horizontal.index() as f32 / 2.0;
    let baseline = y + baseline_offset(align.vertical, metrics.ascender, metrics.descender);

    [x, baseline - metrics.ascender, x + width, baseline - metrics.descender]
}

/// Offset from the requested y to the baseline for a vertical alignment
pub fn baseline_offset(vertical: VerticalAlign, ascender: f32, descender: f32) -> f32 {
    match vertical {
        VerticalAlign::Top => ascender,
        VerticalAlign::Middle => (ascender + descender) / 2.0,
        VerticalAlign::Bottom => descender,
        VerticalAlign::Baseline => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MonospaceShaper;

    // 10px font, 5px per character
    const SHAPER: MonospaceShaper = MonospaceShaper {
        advance_ratio: 0.5,
        ascender_ratio: 0.8,
        descender_ratio: -0.2,
    };

    fn rows(text: &str, max_width: f32, max_rows: usize) -> Vec<&str> {
        break_lines(&SHAPER, "any", 10.0, text, max_width, max_rows)
            .iter()
            .map(|r| &text[r.start..r.end])
            .collect()
    }

    #[test]
    fn test_break_opportunities() {
        let breaks = break_opportunities("hello world");
        assert_eq!(breaks, vec![(6, BreakOpportunity::AllowBreak)]);

        let breaks = break_opportunities("line1\r\nline2");
        assert_eq!(breaks, vec![(7, BreakOpportunity::MustBreak)]);
    }

    #[test]
    fn test_text_that_fits_is_one_row() {
        let r = break_lines(&SHAPER, "any", 10.0, "Hello", 100.0, 1);
        assert_eq!(r, vec![TextRow { start: 0, end: 5, next: 5, width: 25.0 }]);
    }

    #[test]
    fn test_breaks_at_last_fitting_space() {
        assert_eq!(rows("Hello World", 30.0, 10), vec!["Hello", "World"]);
        assert_eq!(rows("aa bb cc dd", 35.0, 10), vec!["aa bb", "cc dd"]);
        // Exactly the available width still fits
        assert_eq!(rows("aa bb cc dd", 40.0, 10), vec!["aa bb cc", "dd"]);
    }

    #[test]
    fn test_max_rows_limits_output() {
        assert_eq!(rows("aa bb cc dd", 10.0, 1), vec!["aa"]);
        assert!(break_lines(&SHAPER, "any", 10.0, "aa", 10.0, 0).is_empty());
    }

    #[test]
    fn test_long_word_breaks_between_chars() {
        assert_eq!(rows("abcdefgh", 20.0, 10), vec!["abcd", "efgh"]);
        // Narrower than one character still makes progress
        assert_eq!(rows("abc", 1.0, 10), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_hard_breaks() {
        assert_eq!(rows("one\ntwo", 100.0, 10), vec!["one", "two"]);
        assert_eq!(rows("one\r\ntwo", 100.0, 10), vec!["one", "two"]);
        assert_eq!(rows("\n", 100.0, 10), vec![""]);
    }

    #[test]
    fn test_trailing_spaces_are_not_part_of_row() {
        let r = break_lines(&SHAPER, "any", 10.0, "ab   cd", 20.0, 10);
        assert_eq!(r[0], TextRow { start: 0, end: 2, next: 5, width: 10.0 });
        assert_eq!(&"ab   cd"[r[1].start..r[1].end], "cd");
    }

    #[test]
    fn test_hyphen_break_keeps_hyphen() {
        assert_eq!(rows("well-known", 30.0, 10), vec!["well-", "known"]);
    }

    #[test]
    fn test_empty_text_has_no_rows() {
        assert!(break_lines(&SHAPER, "any", 10.0, "", 10.0, 1).is_empty());
    }

    #[test]
    fn test_text_bounds_alignment() {
        let top_left = TextAlign::new(HorizontalAlign::Left, VerticalAlign::Top);
        assert_eq!(text_bounds(&SHAPER, "any", 10.0, top_left, 10.0, 20.0, "abcd"), [10.0, 20.0, 30.0, 30.0]);

        let center_base = TextAlign::new(HorizontalAlign::Center, VerticalAlign::Baseline);
        assert_eq!(text_bounds(&SHAPER, "any", 10.0, center_base, 10.0, 20.0, "abcd"), [0.0, 12.0, 20.0, 22.0]);

        let right_bottom = TextAlign::new(HorizontalAlign::Right, VerticalAlign::Bottom);
        assert_eq!(text_bounds(&SHAPER, "any", 10.0, right_bottom, 10.0, 20.0, "abcd"), [-10.0, 10.0, 10.0, 20.0]);
    }
}
