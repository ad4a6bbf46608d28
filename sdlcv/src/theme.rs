//! Color theme system for sdlcv.
//!
//! A `Theme` holds named `ratatui::style::Color` fields covering every UI surface
//! sdlcv renders. Two built-in themes are provided:
//!
//! - `dark` uses ANSI 16 colors (`Color::Reset`, `Color::DarkGray`, etc.) so it
//!   works on any terminal including 256-color SSH sessions with no truecolor support.
//! - `catppuccin_mocha` is the Catppuccin Mocha palette in RGB; requires truecolor.
//!
//! Phase accent colors live outside the theme in [`phase_visual`]: they come
//! from the analysis product's fixed palette and do not vary by theme.

use ratatui::style::Color;

/// All color values used across sdlcv's UI surfaces.
///
/// Every field is a `ratatui::style::Color`. Callers use `theme.field` directly
/// inside `Style::default().fg(theme.border_active)`.
#[derive(Debug, Clone)]
pub struct Theme {
    // Panel borders
    /// Border color for the currently focused panel.
    pub border_active: Color,
    /// Border color for unfocused panels.
    pub border_inactive: Color,

    // Status line feedback
    /// Informational status messages (operation in progress).
    pub status_info: Color,
    /// Success status messages.
    pub status_success: Color,
    /// Error status messages.
    pub status_error: Color,

    // Text
    /// Primary body text.
    pub text: Color,
    /// Dimmed secondary text (hints, timestamps, placeholders).
    pub text_dim: Color,
    /// Highlighted text (selected list rows, active form field).
    pub highlight: Color,

    // Chat
    /// Label color for assistant messages.
    pub chat_ai: Color,
    /// Label color for user messages.
    pub chat_user: Color,

    // Review queue badges
    /// Badge color for bundles awaiting review.
    pub badge_pending: Color,
    /// Badge color for already-reviewed bundles.
    pub badge_reviewed: Color,

    // Status bar
    /// Status bar background.
    pub status_bar_bg: Color,
    /// Status bar foreground (general text).
    pub status_bar_fg: Color,
    /// Mode indicator color when in NORMAL mode.
    pub status_mode_normal: Color,
    /// Mode indicator color when in INSERT mode.
    pub status_mode_insert: Color,

    // General
    /// Application background (used for clearing areas).
    pub background: Color,
}

impl Theme {
    /// Returns the built-in dark theme using ANSI 16 colors.
    ///
    /// Works on all terminals: 16-color, 256-color, and truecolor. Suitable
    /// as the default when no config is present or color capability is unknown.
    pub fn dark() -> Self {
        Self {
            border_active: Color::Cyan,
            border_inactive: Color::DarkGray,

            status_info: Color::Cyan,
            status_success: Color::Green,
            status_error: Color::Red,

            text: Color::Reset,
            text_dim: Color::DarkGray,
            highlight: Color::Yellow,

            chat_ai: Color::Cyan,
            chat_user: Color::Green,

            badge_pending: Color::Yellow,
            badge_reviewed: Color::Green,

            status_bar_bg: Color::DarkGray,
            status_bar_fg: Color::White,
            status_mode_normal: Color::Cyan,
            status_mode_insert: Color::Green,

            background: Color::Reset,
        }
    }

    /// Returns the Catppuccin Mocha theme using RGB truecolor values.
    ///
    /// Requires a truecolor terminal. Falls back gracefully in ratatui: colors
    /// degrade to the nearest ANSI 256-color approximation on non-truecolor terms,
    /// but visual fidelity is reduced. Use `dark()` on SSH or 256-color terminals.
    ///
    /// Palette source: <https://github.com/catppuccin/catppuccin> Mocha variant.
    pub fn catppuccin_mocha() -> Self {
        // Catppuccin Mocha palette (selected subset)
        let green = Color::Rgb(166, 227, 161);    // #a6e3a1
        let red = Color::Rgb(243, 139, 168);      // #f38ba8
        let yellow = Color::Rgb(249, 226, 175);   // #f9e2af
        let teal = Color::Rgb(148, 226, 213);     // #94e2d5
        let lavender = Color::Rgb(180, 190, 254); // #b4befe
        let overlay1 = Color::Rgb(127, 132, 156); // #7f849c
        let surface1 = Color::Rgb(69, 71, 90);    // #45475a
        let base = Color::Rgb(30, 30, 46);        // #1e1e2e
        let text = Color::Rgb(205, 214, 244);     // #cdd6f4
        let peach = Color::Rgb(250, 179, 135);    // #fab387

        Self {
            border_active: lavender,
            border_inactive: overlay1,

            status_info: teal,
            status_success: green,
            status_error: red,

            text,
            text_dim: overlay1,
            highlight: yellow,

            chat_ai: teal,
            chat_user: green,

            badge_pending: peach,
            badge_reviewed: green,

            status_bar_bg: surface1,
            status_bar_fg: text,
            status_mode_normal: lavender,
            status_mode_insert: green,

            background: base,
        }
    }

    /// Resolves a theme name string to the corresponding built-in theme.
    ///
    /// Unknown names fall back to `dark()` so a typo in config never prevents
    /// startup.
    ///
    /// # Arguments
    ///
    /// * `name` - theme name from config, e.g. `"dark"` or `"catppuccin-mocha"`.
    pub fn from_name(name: &str) -> Self {
        match name {
            "catppuccin-mocha" | "catppuccin_mocha" => Self::catppuccin_mocha(),
            "dark" => Self::dark(),
            other => {
                eprintln!("sdlcv: unknown theme '{}', falling back to 'dark'", other);
                Self::dark()
            }
        }
    }
}

/// Fixed accent color and icon for one lifecycle phase card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseVisual {
    pub color: Color,
    pub icon: &'static str,
}

/// Returns the accent color and icon for a phase key.
///
/// The phase-key set is open: the backend may return phases beyond the six
/// well-known ones, and unknown keys get the requirements visual rather than
/// failing or rendering unstyled.
pub fn phase_visual(key: &str) -> PhaseVisual {
    match key {
        "requirements" => PhaseVisual { color: Color::Rgb(168, 199, 250), icon: "▤" },
        "design" => PhaseVisual { color: Color::Rgb(197, 179, 230), icon: "◈" },
        "implementation" => PhaseVisual { color: Color::Rgb(168, 230, 207), icon: "‹›" },
        "testing" => PhaseVisual { color: Color::Rgb(255, 168, 212), icon: "✓" },
        "deployment" => PhaseVisual { color: Color::Rgb(255, 212, 168), icon: "➤" },
        "maintenance" => PhaseVisual { color: Color::Rgb(168, 225, 250), icon: "⚙" },
        _ => PhaseVisual { color: Color::Rgb(168, 199, 250), icon: "▤" },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_phase_falls_back_to_requirements_visual() {
        assert_eq!(phase_visual("security"), phase_visual("requirements"));
    }

    #[test]
    fn known_phases_have_distinct_colors() {
        let keys = ["requirements", "design", "implementation", "testing", "deployment", "maintenance"];
        for (i, a) in keys.iter().enumerate() {
            for b in &keys[i + 1..] {
                assert_ne!(phase_visual(a).color, phase_visual(b).color);
            }
        }
    }
}
