use owo_colors::Style;
use std::sync::OnceLock;

static OUT_THEME: OnceLock<Theme> = OnceLock::new();
static ERR_THEME: OnceLock<Theme> = OnceLock::new();

#[derive(Debug, Clone)]
pub struct Theme {
    pub header: Style,
    pub success: Style,
    pub error: Style,
    pub warn: Style,
    pub dim: Style,
}

impl Theme {
    /// Pick colors for one output stream; `NO_COLOR` disables them everywhere
    pub fn for_stream(is_term: bool, no_color: bool) -> Self {
        if no_color || !is_term {
            return Self::plain();
        }
        Self::colored()
    }

    fn detect(term: console::Term) -> Self {
        Self::for_stream(term.is_term(), std::env::var_os("NO_COLOR").is_some())
    }

    pub fn colored() -> Self {
        Self {
            header: Style::new().cyan().bold(),
            success: Style::new().green().bold(),
            error: Style::new().red().bold(),
            warn: Style::new().yellow().bold(),
            dim: Style::new().white().dimmed(),
        }
    }

    pub fn plain() -> Self {
        Self {
            header: Style::new(),
            success: Style::new(),
            error: Style::new(),
            warn: Style::new(),
            dim: Style::new(),
        }
    }
}

/// Theme for lines written to stdout
pub fn theme() -> &'static Theme {
    OUT_THEME.get_or_init(|| Theme::detect(console::Term::stdout()))
}

/// Theme for errors, warnings and hints, which go to stderr
///
/// Piping stdout (e.g. `status --format json | jq`) keeps stderr colored.
pub fn err_theme() -> &'static Theme {
    ERR_THEME.get_or_init(|| Theme::detect(console::Term::stderr()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use owo_colors::OwoColorize;

    #[test]
    fn test_plain_when_not_a_terminal_or_no_color() {
        let plain = "ok".style(Theme::plain().success).to_string();
        assert_eq!("ok".style(Theme::for_stream(false, false).success).to_string(), plain);
        assert_eq!("ok".style(Theme::for_stream(true, true).success).to_string(), plain);
    }

    #[test]
    fn test_colored_on_terminal() {
        let styled = "ok".style(Theme::for_stream(true, false).success).to_string();
        assert_ne!(styled, "ok".style(Theme::plain().success).to_string());
        assert!(styled.contains("ok"));
    }
}
