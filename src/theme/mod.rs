//! Theme / Style Resolver.
//!
//! Resolves the effective styling configuration (colors, icons, border
//! glyphs, widths, flags) from a named theme plus monochrome/CI overrides.
//! YAML theme *file* loading is an external collaborator — this module only
//! knows the built-in registry and the override parameters below.

mod registry;

use crate::error::ThemeError;

/// Semantic color slots. Values are pre-rendered ANSI escape prefixes (or
/// empty strings in monochrome mode) so callers can splice them directly
/// into output without re-deriving a color per line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorTable {
    pub success: String,
    pub error: String,
    pub warning: String,
    pub info: String,
    pub muted: String,
    pub process: String,
    pub blue_fg: String,
    pub green_fg: String,
    pub white: String,
    pub bold: String,
    pub reset: String,
}

impl ColorTable {
    /// Every color replaced with the empty string, as monochrome requires.
    fn blank() -> Self {
        Self {
            success: String::new(),
            error: String::new(),
            warning: String::new(),
            info: String::new(),
            muted: String::new(),
            process: String::new(),
            blue_fg: String::new(),
            green_fg: String::new(),
            white: String::new(),
            bold: String::new(),
            reset: String::new(),
        }
    }
}

/// Icon glyphs used by the renderer's structured content lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconTable {
    pub success: String,
    pub error: String,
    pub warning: String,
    pub info: String,
    pub bullet: String,
}

impl IconTable {
    fn ascii() -> Self {
        Self {
            success: "[OK]".to_string(),
            error: "[ERR]".to_string(),
            warning: "[WARN]".to_string(),
            info: "[i]".to_string(),
            bullet: "*".to_string(),
        }
    }
}

/// Box-drawing glyphs. Only the left-hand corners and edge characters are
/// stored; the right-hand corners are derived by [`BorderGlyphs::corners`]
/// from a small lookup table, matching common box-drawing font families.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BorderGlyphs {
    pub top_left: char,
    pub bottom_left: char,
    pub horizontal: char,
    pub vertical: char,
}

impl BorderGlyphs {
    /// Resolve `(top_right, bottom_right)` for this glyph family.
    pub fn corners(&self) -> (char, char) {
        (
            right_counterpart(self.top_left),
            right_counterpart(self.bottom_left),
        )
    }

    fn ascii() -> Self {
        Self {
            top_left: '+',
            bottom_left: '+',
            horizontal: '-',
            vertical: '|',
        }
    }
}

/// Map a left-hand box-drawing corner to its right-hand counterpart.
fn right_counterpart(left: char) -> char {
    match left {
        '\u{2554}' => '\u{2557}', // ╔ -> ╗
        '\u{255a}' => '\u{255d}', // ╚ -> ╝
        '\u{256d}' => '\u{256e}', // ╭ -> ╮
        '\u{2570}' => '\u{256f}', // ╰ -> ╯
        '\u{2552}' => '\u{256e}', // ╒ -> ╮ (mixed family, per spec lookup table)
        _ => left,
    }
}

/// Boolean feature toggles resolved from theme + CLI overrides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyleFlags {
    pub use_boxes: bool,
    pub use_inline_progress: bool,
    pub no_timer: bool,
    pub no_spinner: bool,
    pub is_monochrome: bool,
}

/// Numeric layout/reporting parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumericParams {
    pub header_width: usize,
    pub sparkbar_length: usize,
    pub coverage_good_min: u8,
    pub coverage_warning_min: u8,
}

/// Fully resolved, immutable theme configuration.
///
/// Produced by [`resolve`] and handed by value (deep copy, via `Clone`) to
/// each [`crate::task::Task`] and renderer so per-task overrides can never
/// mutate a shared source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeConfig {
    pub name: String,
    pub colors: ColorTable,
    pub icons: IconTable,
    pub borders: BorderGlyphs,
    pub flags: StyleFlags,
    pub numeric: NumericParams,
}

/// Name of the theme used when the requested name is unknown.
pub const DEFAULT_THEME_NAME: &str = "ascii_minimal";

/// Resolve the effective theme configuration.
///
/// Unknown `requested_name`s fall back to [`DEFAULT_THEME_NAME`] and print a
/// single warning to stderr. `monochrome` replaces all colors with empty
/// strings, swaps the icon set to ASCII, and disables box borders
/// regardless of `use_boxes`.
pub fn resolve(
    requested_name: &str,
    monochrome: bool,
    show_timer: bool,
    inline_progress: bool,
    use_boxes: bool,
) -> ThemeConfig {
    let mut theme = registry::lookup(requested_name).unwrap_or_else(|| {
        eprintln!(
            "fo: warning: unknown theme `{requested_name}`, falling back to `{DEFAULT_THEME_NAME}`"
        );
        registry::lookup(DEFAULT_THEME_NAME).expect("default theme must exist in registry")
    });

    theme.flags = StyleFlags {
        use_boxes: use_boxes && !monochrome,
        use_inline_progress: inline_progress,
        no_timer: !show_timer,
        no_spinner: monochrome,
        is_monochrome: monochrome,
    };

    if monochrome {
        theme.colors = ColorTable::blank();
        theme.icons = IconTable::ascii();
        theme.borders = BorderGlyphs::ascii();
    }

    theme
}

/// Convenience options bundle for [`resolve_options`].
#[derive(Debug, Clone, Copy)]
pub struct ResolveOptions<'a> {
    pub requested_name: &'a str,
    pub monochrome: bool,
    pub ci: bool,
    pub show_timer: bool,
    pub inline_progress: bool,
    pub use_boxes: bool,
}

/// Resolve a theme, translating the CLI-level `ci` flag into the
/// monochrome + no-timer combination `resolve` understands.
///
/// This is the module's answer to the open question in the design notes:
/// CI mode is equivalent to monochrome + no-timer and nothing more — it
/// does not additionally force `use_boxes` off beyond what monochrome
/// already does.
pub fn resolve_options(opts: ResolveOptions<'_>) -> ThemeConfig {
    let monochrome = opts.monochrome || opts.ci;
    let show_timer = opts.show_timer && !opts.ci;
    resolve(
        opts.requested_name,
        monochrome,
        show_timer,
        opts.inline_progress,
        opts.use_boxes,
    )
}

/// Names of every built-in theme, for `--help` and error messages.
pub fn available_theme_names() -> Vec<&'static str> {
    registry::names()
}

/// Parse a `#RRGGBB` literal into a raw 24-bit ANSI foreground escape.
///
/// Exposed for custom-color override plumbing in a future external config
/// loader; not used by the built-in registry itself.
pub fn ansi_fg_from_hex(hex: &str) -> Result<String, ThemeError> {
    let hex = hex.strip_prefix('#').unwrap_or(hex);
    if hex.len() != 6 {
        return Err(ThemeError::InvalidColor(format!(
            "expected #RRGGBB, got `{hex}`"
        )));
    }
    let parse = |s: &str| {
        u8::from_str_radix(s, 16)
            .map_err(|_| ThemeError::InvalidColor(format!("invalid hex digits in `{hex}`")))
    };
    let r = parse(&hex[0..2])?;
    let g = parse(&hex[2..4])?;
    let b = parse(&hex[4..6])?;
    Ok(format!("\x1b[38;2;{r};{g};{b}m"))
}
