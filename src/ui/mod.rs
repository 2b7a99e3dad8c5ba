pub mod icons;
pub mod output;
pub mod theme;

pub use icons::Icons;
pub use output::{error, header, hint, status, success, summary_row, warn};
pub use theme::{err_theme, theme, Theme};
