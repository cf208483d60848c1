//! ANSI styling for the route renderer.
//!
//! Colour is on unless `NO_COLOR` is set or `TERM` is `dumb`; box-drawing
//! glyphs are used only under a UTF-8 locale.

use std::env;

/// Escape sequences used by [`ColorPalette::colored`].
pub mod colors {
    pub const RESET: &str = "\x1b[0m";

    // Endpoint badges: bold, reverse video.
    pub const TAG_START: &str = "\x1b[1;7;32m";
    pub const TAG_VIA: &str = "\x1b[1;7;36m";
    pub const TAG_GOAL: &str = "\x1b[1;7;35m";

    /// Place names.
    pub const WHITE_BOLD: &str = "\x1b[1;97m";
    /// Coordinates and the footer rule.
    pub const GRAY: &str = "\x1b[90m";
    /// Distance label.
    pub const CYAN: &str = "\x1b[36m";
    /// Travel-time label.
    pub const GREEN: &str = "\x1b[32m";
    /// Far-snap warnings (256-colour orange).
    pub const ORANGE: &str = "\x1b[38;5;208m";
}

/// Escape sequences for each role in route output. Every field is empty in
/// the plain palette, so renderers can interpolate unconditionally.
#[derive(Debug, Clone, Copy)]
pub struct ColorPalette {
    pub reset: &'static str,
    pub tag_start: &'static str,
    pub tag_via: &'static str,
    pub tag_goal: &'static str,
    pub white_bold: &'static str,
    pub gray: &'static str,
    pub cyan: &'static str,
    pub green: &'static str,
    pub orange: &'static str,
}

impl ColorPalette {
    #[must_use]
    pub const fn colored() -> Self {
        Self {
            reset: colors::RESET,
            tag_start: colors::TAG_START,
            tag_via: colors::TAG_VIA,
            tag_goal: colors::TAG_GOAL,
            white_bold: colors::WHITE_BOLD,
            gray: colors::GRAY,
            cyan: colors::CYAN,
            green: colors::GREEN,
            orange: colors::ORANGE,
        }
    }

    #[must_use]
    pub const fn plain() -> Self {
        Self {
            reset: "",
            tag_start: "",
            tag_via: "",
            tag_goal: "",
            white_bold: "",
            gray: "",
            cyan: "",
            green: "",
            orange: "",
        }
    }

    /// Colored or plain depending on [`supports_color`].
    #[must_use]
    pub fn detect() -> Self {
        if supports_color() {
            Self::colored()
        } else {
            Self::plain()
        }
    }
}

impl Default for ColorPalette {
    fn default() -> Self {
        Self::detect()
    }
}

/// False when `NO_COLOR` is present (any value) or `TERM=dumb`.
#[must_use]
pub fn supports_color() -> bool {
    let no_color = env::var_os("NO_COLOR").is_some();
    let dumb = env::var("TERM").is_ok_and(|term| term.eq_ignore_ascii_case("dumb"));
    !(no_color || dumb)
}

/// True when `LC_ALL` or `LANG` names a UTF-8 locale. Windows consoles are
/// assumed capable unless `TERM=dumb`.
#[must_use]
pub fn supports_unicode() -> bool {
    let utf8_locale = ["LC_ALL", "LANG"].iter().any(|key| {
        env::var(key).is_ok_and(|value| value.to_ascii_uppercase().contains("UTF"))
    });
    if utf8_locale {
        return true;
    }
    cfg!(windows) && !env::var("TERM").is_ok_and(|term| term.eq_ignore_ascii_case("dumb"))
}

/// Horizontal rule `width` glyphs wide.
#[must_use]
pub fn divider(width: usize) -> String {
    let glyph = if supports_unicode() { "─" } else { "-" };
    glyph.repeat(width)
}
