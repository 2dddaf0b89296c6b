//! Box Renderer: width-exact, theme-driven box-drawn output.
//!
//! Grounded in the teacher's `tui::renderer`/`tui::text` block-drawing
//! approach, generalized to arbitrary terminal widths and upgraded to
//! grapheme/East-Asian-width-aware column counting via [`width`].

pub mod width;

use crate::theme::ThemeConfig;

/// Columns trimmed off the reported terminal width to leave right-margin
/// room before a box's `totalWidth` is derived (§4.F).
const TERMINAL_MARGIN: usize = 3;

/// Per-line overhead outside `contentWidth`: left border (1) + left
/// padding (2) + right padding (1) + right border (1).
const LEFT_PADDING: usize = 2;
const RIGHT_PADDING: usize = 1;
const BORDER_COLUMNS: usize = 2;
const CONTENT_OVERHEAD: usize = BORDER_COLUMNS + LEFT_PADDING + RIGHT_PADDING;

/// Smallest sane total width: overhead plus one column of content.
const MIN_TOTAL_WIDTH: usize = CONTENT_OVERHEAD + 1;

/// Derived layout for one rendered box: how wide the terminal border is
/// and how many columns are available for content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoxLayout {
    pub total_width: usize,
    pub content_width: usize,
}

impl BoxLayout {
    /// Derive a layout from a terminal width, clamped to the theme's
    /// configured header width and never collapsing content to zero.
    pub fn derive(terminal_width: usize, theme: &ThemeConfig) -> Self {
        let trimmed = terminal_width.saturating_sub(TERMINAL_MARGIN).max(MIN_TOTAL_WIDTH);
        let total_width = trimmed.min(theme.numeric.header_width).max(MIN_TOTAL_WIDTH);
        let content_width = total_width - CONTENT_OVERHEAD;
        Self {
            total_width,
            content_width,
        }
    }
}

/// Render `title` and `body` (already theme-colored, newline-separated
/// content lines) inside a box whose borders come from `theme`.
pub fn render_box(title: &str, body: &str, layout: BoxLayout, theme: &ThemeConfig) -> String {
    if !theme.flags.use_boxes {
        return render_plain(title, body);
    }

    let (top_right, bottom_right) = theme.borders.corners();
    let horizontal_run: String = theme
        .borders
        .horizontal
        .to_string()
        .repeat(layout.total_width.saturating_sub(2));

    let mut out = String::new();
    out.push(theme.borders.top_left);
    out.push_str(&horizontal_run);
    out.push(top_right);
    out.push('\n');

    out.push_str(&render_content_line(&title.to_uppercase(), layout, theme));

    for line in body.lines() {
        out.push_str(&render_content_line(line, layout, theme));
    }

    out.push(theme.borders.bottom_left);
    out.push_str(&horizontal_run);
    out.push(bottom_right);
    out.push('\n');
    out.push('\n');

    out
}

fn render_content_line(content: &str, layout: BoxLayout, theme: &ThemeConfig) -> String {
    let clipped = width::clip_to_width(content, layout.content_width);
    let padded = width::pad_to_width(&clipped, layout.content_width);
    format!(
        "{v}{lpad}{padded}{rpad}{v}\n",
        v = theme.borders.vertical,
        lpad = " ".repeat(LEFT_PADDING),
        padded = padded,
        rpad = " ".repeat(RIGHT_PADDING),
    )
}

fn render_plain(title: &str, body: &str) -> String {
    let mut out = String::new();
    out.push_str(title);
    out.push('\n');
    out.push_str(body);
    out
}

/// Column width every icon glyph is padded to so icon+text rows align
/// vertically regardless of which icon a given row uses (§4.F structured
/// content: "icon is rendered at a fixed column ... regardless of text").
pub fn icon_column_width(theme: &ThemeConfig) -> usize {
    [
        &theme.icons.success,
        &theme.icons.error,
        &theme.icons.warning,
        &theme.icons.info,
    ]
    .iter()
    .map(|s| width::visible_width(s))
    .max()
    .unwrap_or(0)
}

/// Render one "icon + text" structured content row with the icon padded
/// to a fixed column, so repeated rows in the same block align even when
/// individual icon glyphs differ in width (e.g. `[OK]` vs `[ERR]`).
pub fn structured_row(icon: &str, color: &str, reset: &str, text: &str, theme: &ThemeConfig) -> String {
    let column = icon_column_width(theme);
    let icon_padded = width::pad_to_width(icon, column);
    format!("{color}{icon_padded}{reset} {text}")
}
