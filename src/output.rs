use std::sync::OnceLock;
use std::sync::atomic::{AtomicBool, Ordering};

static QUIET_FLAG: AtomicBool = AtomicBool::new(false);
static QUIET_ENV: OnceLock<bool> = OnceLock::new();

/// Silence human-oriented stdout lines for the rest of the process
pub fn set_quiet(quiet: bool) {
    QUIET_FLAG.store(quiet, Ordering::Relaxed);
}

/// True after `--quiet`, or when `BOOKMARKS_QUIET` is set to a truthy value
pub fn is_quiet() -> bool {
    QUIET_FLAG.load(Ordering::Relaxed)
        || *QUIET_ENV.get_or_init(|| {
            std::env::var("BOOKMARKS_QUIET")
                .map(|v| is_truthy(&v))
                .unwrap_or(false)
        })
}

fn is_truthy(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

/// Output format for reporting commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl OutputFormat {
    pub fn is_human(self) -> bool {
        self == OutputFormat::Text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truthy_values() {
        for v in ["1", "true", "TRUE", " yes ", "on"] {
            assert!(is_truthy(v), "{v}");
        }
        for v in ["", "0", "false", "off", "quiet"] {
            assert!(!is_truthy(v), "{v}");
        }
    }

    #[test]
    fn test_json_is_not_human() {
        assert!(OutputFormat::Text.is_human());
        assert!(!OutputFormat::Json.is_human());
    }
}
