//! Label wrapping and centering.
//!
//! All width decisions use a constant-width approximation instead of real glyph metrics:
//! a label "fits" when `bytes * font_size <= width`, a wrapped line may hold
//! `width / font_size` characters, and a line is centered as if every character advanced
//! `font_size / 4` pixels. Rendered output depends on these exact formulas; switching to
//! measured glyph widths would move line breaks and positions.

use crate::foundation::core::CanvasSize;

/// Fixed offset added to both coordinates of every wrapped line.
pub const WRAPPED_LINE_NUDGE: i64 = 50;

/// One positioned line of the label. `(x, y)` is the pen origin on the baseline.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct LayoutLine {
    /// Line text.
    pub text: String,
    /// Pen origin x in canvas pixels; may be negative.
    pub x: i64,
    /// Baseline y in canvas pixels; may be negative.
    pub y: i64,
}

/// Positioned label lines plus which formula produced them.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct TextLayout {
    /// `true` when the label overflowed and went through [`wrap`].
    pub wrapped: bool,
    /// Lines in reading order.
    pub lines: Vec<LayoutLine>,
}

/// Whether `label` fits on one line: `len(label) * font_size <= available_width`.
///
/// `len` is the UTF-8 byte length.
pub fn measure_fits(label: &str, font_size: u32, available_width: u32) -> bool {
    (label.len() as u64).saturating_mul(u64::from(font_size)) <= u64::from(available_width)
}

/// Greedy word wrap against a character budget of `available_width / font_size`.
///
/// A word is appended while the current line (words joined by single spaces) is shorter than
/// the budget; otherwise the line is closed and the word starts the next one. The line holding
/// the last word is always emitted, even if that word pushed it past the budget. An empty or
/// all-whitespace label yields a single empty line.
pub fn wrap(label: &str, font_size: u32, available_width: u32) -> Vec<String> {
    let words: Vec<&str> = label.split_whitespace().map(str::trim).collect();
    if words.is_empty() {
        return vec![String::new()];
    }

    let max_chars = available_width.checked_div(font_size).unwrap_or(u32::MAX) as usize;

    let mut lines = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    for word in words {
        if joined_len(&current) < max_chars {
            current.push(word);
        } else {
            lines.push(current.join(" "));
            current = vec![word];
        }
    }
    lines.push(current.join(" "));
    lines
}

fn joined_len(words: &[&str]) -> usize {
    let chars: usize = words.iter().map(|w| w.len()).sum();
    chars + words.len().saturating_sub(1)
}

/// Position already-wrapped lines.
///
/// `y = h/2 - font_size*count/2 + i*font_size + 50` and `x = w/2 - len*font_size/4 + 50`,
/// all in integer arithmetic.
pub fn layout_wrapped(lines: &[String], canvas: CanvasSize, font_size: u32) -> Vec<LayoutLine> {
    let w = i64::from(canvas.width);
    let h = i64::from(canvas.height);
    let fs = i64::from(font_size);
    let count = lines.len() as i64;

    lines
        .iter()
        .enumerate()
        .map(|(i, line)| LayoutLine {
            text: line.clone(),
            x: w / 2 - (line.len() as i64 * fs / 4) + WRAPPED_LINE_NUDGE,
            y: h / 2 - (fs * count / 2) + (i as i64 * fs) + WRAPPED_LINE_NUDGE,
        })
        .collect()
}

/// Position a label that fits on one line: `x = w/2 - len*font_size/4`, `y = h/2 - font_size/2`.
///
/// Unlike [`layout_wrapped`] there is no fixed nudge.
pub fn layout_single(label: &str, canvas: CanvasSize, font_size: u32) -> LayoutLine {
    let w = i64::from(canvas.width);
    let h = i64::from(canvas.height);
    let fs = i64::from(font_size);
    LayoutLine {
        text: label.to_string(),
        x: w / 2 - (label.len() as i64 * fs / 4),
        y: h / 2 - fs / 2,
    }
}

/// Lay out `label` on `canvas`, wrapping only when it does not fit the canvas width.
pub fn layout_label(label: &str, canvas: CanvasSize, font_size: u32) -> TextLayout {
    if measure_fits(label, font_size, canvas.width) {
        return TextLayout {
            wrapped: false,
            lines: vec![layout_single(label, canvas, font_size)],
        };
    }

    let lines = wrap(label, font_size, canvas.width);
    tracing::debug!(line_count = lines.len(), font_size, "label wrapped");
    TextLayout {
        wrapped: true,
        lines: layout_wrapped(&lines, canvas, font_size),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/text.rs"]
mod tests;
