//! Visual line layout for the composer.
//!
//! The buffer is split on `\n`, then each logical line is hard-wrapped at
//! the inner width by display columns. Every visual line is a byte range
//! into the buffer, so cursor placement never has to re-derive offsets
//! from wrapped copies of the text.

use std::ops::Range;

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Border (2) + padding (2) consumed horizontally
pub(super) const HORIZONTAL_OVERHEAD: u16 = 4;
/// Top + bottom borders
pub(super) const VERTICAL_OVERHEAD: u16 = 2;
/// Content lines shown before the composer scrolls internally
pub(super) const MAX_VISIBLE_LINES: u16 = 6;

pub(super) fn inner_width(area_width: u16) -> u16 {
    area_width.saturating_sub(HORIZONTAL_OVERHEAD)
}

/// Byte ranges of the visual lines of `text` at `width` columns.
/// Always returns at least one (possibly empty) line.
pub(super) fn visual_lines(text: &str, width: u16) -> Vec<Range<usize>> {
    let width = usize::from(width.max(1));
    let mut lines = Vec::new();
    let mut line_start = 0;

    for logical in text.split('\n') {
        let mut start = line_start;
        let mut used = 0;
        for (offset, c) in logical.char_indices() {
            let w = c.width().unwrap_or(0);
            if used + w > width && used > 0 {
                lines.push(start..line_start + offset);
                start = line_start + offset;
                used = 0;
            }
            used += w;
        }
        lines.push(start..line_start + logical.len());
        line_start += logical.len() + 1;
    }
    lines
}

/// Visual line index and display column of the byte offset `cursor`.
///
/// At a soft wrap the end of one line and the start of the next are the
/// same offset; the cursor is placed at the start of the next line.
pub(super) fn cursor_position(text: &str, lines: &[Range<usize>], cursor: usize) -> (usize, u16) {
    let mut row = lines.len().saturating_sub(1);
    for (i, line) in lines.iter().enumerate() {
        if cursor < line.start || cursor > line.end {
            continue;
        }
        let wraps_into_next = cursor == line.end
            && lines.get(i + 1).is_some_and(|next| next.start == line.end);
        if !wraps_into_next {
            row = i;
            break;
        }
    }
    let start = lines.get(row).map_or(0, |l| l.start);
    let column = text[start..cursor.max(start)].width() as u16;
    (row, column)
}

/// Byte offset in `line` closest to display column `column`, never past the
/// end of the line.
pub(super) fn offset_at_column(text: &str, line: &Range<usize>, column: u16) -> usize {
    let mut used = 0u16;
    for (offset, c) in text[line.clone()].char_indices() {
        let w = c.width().unwrap_or(0) as u16;
        if used + w > column {
            return line.start + offset;
        }
        used += w;
    }
    line.end
}

pub(super) fn prev_char_boundary(text: &str, pos: usize) -> usize {
    text[..pos]
        .char_indices()
        .next_back()
        .map(|(i, _)| i)
        .unwrap_or(0)
}

pub(super) fn next_char_boundary(text: &str, pos: usize) -> usize {
    text[pos..]
        .chars()
        .next()
        .map(|c| pos + c.len_utf8())
        .unwrap_or(text.len())
}
