//! Styling tokens for the terminal report.

use std::io::IsTerminal;

use anstyle::{AnsiColor, Color, Style};

/// The kinds of text the report distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StyleToken {
    /// Section titles ("Details", "Source", ...).
    Heading,
    /// Right-aligned field labels.
    Label,
    /// Values that deserve attention (non-zero spam scores).
    Alert,
}

/// When to emit ANSI escape codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ColorMode {
    /// Only when stdout is a terminal and `NO_COLOR` is unset.
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorMode {
    /// Parse the `display.color` config value; unknown values mean `Auto`.
    pub fn from_config(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "always" => Self::Always,
            "never" => Self::Never,
            _ => Self::Auto,
        }
    }

    /// Resolve to a yes/no answer for the current process.
    pub fn enabled(self) -> bool {
        match self {
            Self::Always => true,
            Self::Never => false,
            Self::Auto => std::io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none(),
        }
    }
}

/// Maps [`StyleToken`]s to terminal styles.
#[derive(Debug, Clone)]
pub struct Palette {
    heading: Style,
    label: Style,
    alert: Style,
    enabled: bool,
}

impl Palette {
    /// Yellow headings, cyan labels, red alerts.
    pub fn ansi() -> Self {
        Self {
            heading: Style::new()
                .bold()
                .fg_color(Some(Color::Ansi(AnsiColor::Yellow))),
            label: Style::new()
                .bold()
                .fg_color(Some(Color::Ansi(AnsiColor::Cyan))),
            alert: Style::new()
                .bold()
                .fg_color(Some(Color::Ansi(AnsiColor::Red))),
            enabled: true,
        }
    }

    /// No escape codes at all.
    pub fn plain() -> Self {
        Self {
            enabled: false,
            ..Self::ansi()
        }
    }

    pub fn for_mode(mode: ColorMode) -> Self {
        if mode.enabled() {
            Self::ansi()
        } else {
            Self::plain()
        }
    }

    fn style(&self, token: StyleToken) -> Style {
        match token {
            StyleToken::Heading => self.heading,
            StyleToken::Label => self.label,
            StyleToken::Alert => self.alert,
        }
    }

    /// Wrap `text` in the escape codes for `token` (or return it unchanged).
    pub fn paint(&self, token: StyleToken, text: &str) -> String {
        if !self.enabled {
            return text.to_string();
        }
        let style = self.style(token);
        format!("{}{}{}", style.render(), text, style.render_reset())
    }
}
