use owo_colors::Style;
use std::sync::OnceLock;

use crate::coverage::CoverageStatus;

static THEME: OnceLock<Theme> = OnceLock::new();

/// Terminal styles, keyed by coverage status where one applies
#[derive(Debug, Clone)]
pub struct Theme {
    pub header: Style,
    pub ok: Style,
    pub partial: Style,
    pub void: Style,
    pub dim: Style,
    pub muted: Style,
}

impl Theme {
    /// Plain output when stdout is not a terminal or `NO_COLOR` is set
    pub fn detect() -> Self {
        let no_color = std::env::var_os("NO_COLOR").is_some_and(|v| !v.is_empty());
        if no_color || !console::Term::stdout().is_term() || !console::colors_enabled() {
            return Self::plain();
        }
        Self::colored()
    }

    pub fn colored() -> Self {
        Self {
            header: Style::new().cyan().bold(),
            ok: Style::new().green().bold(),
            partial: Style::new().yellow().bold(),
            void: Style::new().red().bold(),
            dim: Style::new().white().dimmed(),
            muted: Style::new().bright_black(),
        }
    }

    pub fn plain() -> Self {
        let style = Style::new();
        Self {
            header: style,
            ok: style,
            partial: style,
            void: style,
            dim: style,
            muted: style,
        }
    }

    pub fn status(&self, status: CoverageStatus) -> Style {
        match status {
            CoverageStatus::Ok => self.ok,
            CoverageStatus::Partial => self.partial,
            CoverageStatus::Void => self.void,
        }
    }
}

pub fn theme() -> &'static Theme {
    THEME.get_or_init(Theme::detect)
}
