//! Grapheme-cluster- and East-Asian-width-aware column counting.
//!
//! The teacher's `tui::text::visible_width` counted `chars()`, which is
//! wrong for both combining marks (over-counts) and wide CJK glyphs
//! (under-counts). This module is the corrected replacement used
//! throughout the box renderer's width-exact layout.

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Visible terminal column width of `s`, ignoring any ANSI escape
/// sequences it contains.
pub fn visible_width(s: &str) -> usize {
    strip_ansi(s).graphemes(true).map(|g| g.width()).sum()
}

/// Remove ANSI CSI escape sequences (`\x1b[...letter`) from `s`.
pub fn strip_ansi(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\x1b' && chars.peek() == Some(&'[') {
            chars.next();
            for next in chars.by_ref() {
                if next.is_ascii_alphabetic() {
                    break;
                }
            }
            continue;
        }
        out.push(c);
    }
    out
}

/// Clip `s` to at most `max_width` visible columns, reattaching a reset
/// sequence if any ANSI codes were present, so clipping a colored line
/// never lets its color bleed into subsequent box content.
pub fn clip_to_width(s: &str, max_width: usize) -> String {
    let had_ansi = s.contains('\x1b');
    let mut out = String::new();
    let mut used = 0usize;
    let mut in_escape = false;
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '\x1b' {
            in_escape = true;
            out.push(c);
            continue;
        }
        if in_escape {
            out.push(c);
            if c.is_ascii_alphabetic() {
                in_escape = false;
            }
            continue;
        }

        let grapheme_width = c.to_string().width();
        if used + grapheme_width > max_width {
            break;
        }
        used += grapheme_width;
        out.push(c);
    }

    if had_ansi && !out.ends_with("\x1b[0m") {
        out.push_str("\x1b[0m");
    }
    out
}

/// Pad `s` on the right with spaces until it occupies exactly `width`
/// visible columns. If `s` is already wider, it is returned unchanged
/// (callers should clip first).
pub fn pad_to_width(s: &str, width: usize) -> String {
    let current = visible_width(s);
    if current >= width {
        return s.to_string();
    }
    let mut out = s.to_string();
    out.push_str(&" ".repeat(width - current));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_width_matches_length() {
        assert_eq!(visible_width("hello"), 5);
    }

    #[test]
    fn ansi_codes_do_not_count_toward_width() {
        assert_eq!(visible_width("\x1b[31mhello\x1b[0m"), 5);
    }

    #[test]
    fn wide_cjk_glyphs_count_as_two_columns() {
        assert_eq!(visible_width("你好"), 4);
    }

    #[test]
    fn combining_marks_do_not_inflate_width() {
        // "e\u{0301}" is a single grapheme cluster (e + combining acute).
        assert_eq!(visible_width("e\u{0301}"), 1);
    }

    #[test]
    fn clip_reattaches_reset_after_truncating_colored_text() {
        let clipped = clip_to_width("\x1b[31mabcdef\x1b[0m", 3);
        assert!(clipped.ends_with("\x1b[0m"));
        assert_eq!(visible_width(&clipped), 3);
    }

    #[test]
    fn pad_extends_to_requested_width() {
        let padded = pad_to_width("ab", 5);
        assert_eq!(visible_width(&padded), 5);
    }
}
