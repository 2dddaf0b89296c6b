//! Built-in theme definitions.

use super::{BorderGlyphs, ColorTable, IconTable, NumericParams, StyleFlags, ThemeConfig};

const NAMES: [&str; 3] = ["ascii_minimal", "unicode_vibrant", "orca"];

/// Look up a built-in theme by name. Style flags are left at a neutral
/// default; [`super::resolve`] overwrites them from the caller's overrides.
pub(super) fn lookup(name: &str) -> Option<ThemeConfig> {
    match name {
        "ascii_minimal" => Some(ascii_minimal()),
        "unicode_vibrant" => Some(unicode_vibrant()),
        "orca" => Some(orca()),
        _ => None,
    }
}

pub(super) fn names() -> Vec<&'static str> {
    NAMES.to_vec()
}

fn neutral_flags() -> StyleFlags {
    StyleFlags {
        use_boxes: true,
        use_inline_progress: true,
        no_timer: false,
        no_spinner: false,
        is_monochrome: false,
    }
}

fn default_numeric() -> NumericParams {
    NumericParams {
        header_width: 80,
        sparkbar_length: 20,
        coverage_good_min: 80,
        coverage_warning_min: 50,
    }
}

fn ascii_minimal() -> ThemeConfig {
    ThemeConfig {
        name: "ascii_minimal".to_string(),
        colors: ColorTable {
            success: "\x1b[32m".to_string(),
            error: "\x1b[31m".to_string(),
            warning: "\x1b[33m".to_string(),
            info: "\x1b[36m".to_string(),
            muted: "\x1b[2m".to_string(),
            process: "\x1b[35m".to_string(),
            blue_fg: "\x1b[34m".to_string(),
            green_fg: "\x1b[32m".to_string(),
            white: "\x1b[37m".to_string(),
            bold: "\x1b[1m".to_string(),
            reset: "\x1b[0m".to_string(),
        },
        icons: IconTable {
            success: "[OK]".to_string(),
            error: "[ERR]".to_string(),
            warning: "[WARN]".to_string(),
            info: "[i]".to_string(),
            bullet: "*".to_string(),
        },
        borders: BorderGlyphs {
            top_left: '+',
            bottom_left: '+',
            horizontal: '-',
            vertical: '|',
        },
        flags: neutral_flags(),
        numeric: default_numeric(),
    }
}

fn unicode_vibrant() -> ThemeConfig {
    ThemeConfig {
        name: "unicode_vibrant".to_string(),
        colors: ColorTable {
            success: "\x1b[38;2;133;153;0m".to_string(),
            error: "\x1b[38;2;220;50;47m".to_string(),
            warning: "\x1b[38;2;181;137;0m".to_string(),
            info: "\x1b[38;2;38;139;210m".to_string(),
            muted: "\x1b[2m".to_string(),
            process: "\x1b[38;2;211;54;130m".to_string(),
            blue_fg: "\x1b[38;2;38;139;210m".to_string(),
            green_fg: "\x1b[38;2;133;153;0m".to_string(),
            white: "\x1b[37m".to_string(),
            bold: "\x1b[1m".to_string(),
            reset: "\x1b[0m".to_string(),
        },
        icons: IconTable {
            success: "\u{2713}".to_string(),
            error: "\u{2717}".to_string(),
            warning: "\u{26a0}".to_string(),
            info: "\u{2139}".to_string(),
            bullet: "\u{2022}".to_string(),
        },
        borders: BorderGlyphs {
            top_left: '\u{2554}',
            bottom_left: '\u{255a}',
            horizontal: '\u{2550}',
            vertical: '\u{2551}',
        },
        flags: neutral_flags(),
        numeric: default_numeric(),
    }
}

fn orca() -> ThemeConfig {
    ThemeConfig {
        name: "orca".to_string(),
        colors: ColorTable {
            success: "\x1b[38;2;0;201;167m".to_string(),
            error: "\x1b[38;2;237;67;91m".to_string(),
            warning: "\x1b[38;2;247;202;24m".to_string(),
            info: "\x1b[38;2;72;149;239m".to_string(),
            muted: "\x1b[38;2;120;120;130m".to_string(),
            process: "\x1b[38;2;147;112;219m".to_string(),
            blue_fg: "\x1b[38;2;72;149;239m".to_string(),
            green_fg: "\x1b[38;2;0;201;167m".to_string(),
            white: "\x1b[97m".to_string(),
            bold: "\x1b[1m".to_string(),
            reset: "\x1b[0m".to_string(),
        },
        icons: IconTable {
            success: "\u{25cf}".to_string(),
            error: "\u{25cf}".to_string(),
            warning: "\u{25b2}".to_string(),
            info: "\u{25c6}".to_string(),
            bullet: "\u{2023}".to_string(),
        },
        borders: BorderGlyphs {
            top_left: '\u{256d}',
            bottom_left: '\u{2570}',
            horizontal: '\u{2500}',
            vertical: '\u{2502}',
        },
        flags: neutral_flags(),
        numeric: default_numeric(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_builtin_names_resolve() {
        for name in names() {
            assert!(lookup(name).is_some(), "missing theme {name}");
        }
    }

    #[test]
    fn unknown_name_is_none() {
        assert!(lookup("nope").is_none());
    }
}
