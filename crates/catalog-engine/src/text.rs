//! Text measuring, truncation and line wrapping
//!
//! Widths come from the standard Helvetica metrics (1/1000 em units), the
//! same way glyph advances are summed for embedded fonts. Characters outside
//! the printable ASCII range use an average advance.

use crate::constants::{ELLIPSIS, pt_to_mm};
use std::borrow::Cow;

/// Helvetica advances for code points 32..=126
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '../
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // 0..9
    278, 278, 584, 584, 584, 556, 1015, // :..@
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, // A..M
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // N..Z
    278, 278, 278, 469, 556, 333, // [..`
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, // a..m
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, // n..z
    334, 260, 334, 584, // {..~
];

/// Helvetica-Bold advances for code points 32..=126
const HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278, // ' '../
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // 0..9
    333, 333, 584, 584, 584, 611, 975, // :..@
    722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, // A..M
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // N..Z
    333, 278, 333, 584, 556, 333, // [..`
    556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, // a..m
    611, 611, 611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, // n..z
    389, 280, 389, 584, // {..~
];

const FALLBACK_WIDTH: u16 = 556;

fn char_width(ch: char, bold: bool) -> u16 {
    let table = if bold {
        &HELVETICA_BOLD_WIDTHS
    } else {
        &HELVETICA_WIDTHS
    };
    match ch as u32 {
        code @ 32..=126 => table[(code - 32) as usize],
        _ => FALLBACK_WIDTH,
    }
}

/// Width of `text` in millimetres when set in Helvetica at `size_pt`
pub fn text_width_mm(text: &str, size_pt: f32, bold: bool) -> f32 {
    let units: u32 = text.chars().map(|ch| char_width(ch, bold) as u32).sum();
    pt_to_mm(units as f32 / 1000.0 * size_pt)
}

/// Cut `text` to at most `limit` characters, appending "..." when cut.
///
/// Strings that already fit are returned unchanged.
pub fn truncate(text: &str, limit: usize) -> Cow<'_, str> {
    match text.char_indices().nth(limit) {
        None => Cow::Borrowed(text),
        Some((byte_idx, _)) => Cow::Owned(format!("{}{}", &text[..byte_idx], ELLIPSIS)),
    }
}

/// Shorten `text` until it fits `max_width_mm`, appending "..." when cut
pub fn fit_to_width(text: &str, max_width_mm: f32, size_pt: f32, bold: bool) -> String {
    if text_width_mm(text, size_pt, bold) <= max_width_mm {
        return text.to_string();
    }

    let chars: Vec<char> = text.chars().collect();
    for keep in (0..chars.len()).rev() {
        let candidate: String = chars[..keep].iter().collect::<String>() + ELLIPSIS;
        if text_width_mm(&candidate, size_pt, bold) <= max_width_mm {
            return candidate;
        }
    }
    String::new()
}

/// Greedy word wrap of `text` into lines no wider than `max_width_mm`.
///
/// Words wider than a whole line are broken between characters.
pub fn wrap_text(text: &str, max_width_mm: f32, size_pt: f32, bold: bool) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{} {}", current, word)
        };

        if text_width_mm(&candidate, size_pt, bold) <= max_width_mm {
            current = candidate;
            continue;
        }

        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }

        if text_width_mm(word, size_pt, bold) <= max_width_mm {
            current = word.to_string();
        } else {
            for ch in word.chars() {
                current.push(ch);
                if current.chars().count() > 1
                    && text_width_mm(&current, size_pt, bold) > max_width_mm
                {
                    current.pop();
                    lines.push(std::mem::take(&mut current));
                    current.push(ch);
                }
            }
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Wrap `text` and keep at most `max_lines` lines
pub fn wrap_lines(
    text: &str,
    max_width_mm: f32,
    size_pt: f32,
    bold: bool,
    max_lines: usize,
) -> Vec<String> {
    let mut lines = wrap_text(text, max_width_mm, size_pt, bold);
    lines.truncate(max_lines);
    lines
}
