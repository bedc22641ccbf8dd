//! Terminal styles, by meaning rather than by color.
//!
//! Code picks a semantic style (`count`, `goal_met`, `muted`); this file is the
//! only place that decides what those look like.

use console::Style;
use once_cell::sync::Lazy;

pub struct Styles {
    pub count: Style,
    pub goal_met: Style,
    pub goal_missed: Style,
    pub label: Style,
    pub muted: Style,
    pub success: Style,
    pub warning: Style,
    pub error: Style,
}

pub static STYLES: Lazy<Styles> = Lazy::new(|| Styles {
    count: Style::new().bold(),
    goal_met: Style::new().green().bold(),
    goal_missed: Style::new().yellow(),
    label: Style::new().cyan(),
    muted: Style::new().dim(),
    success: Style::new().green(),
    warning: Style::new().yellow(),
    error: Style::new().red(),
});
