use ratatui::style::{Color, Style};

/// Default theme text color.
pub fn default_text() -> Style {
    Style::default()
}

/// Color of the ref currently being diffed against; overrides every other
/// name-coloring rule.
pub fn diff_highlight() -> Style {
    Style::default().fg(Color::Magenta)
}

pub fn accent() -> Style {
    Style::default().fg(Color::Yellow)
}

/// Branch names are colored by the first path segment of the branch name.
pub fn branch_name_style(name: &str) -> Style {
    match name.split('/').next().unwrap_or("") {
        "feature" => Style::default().fg(Color::Green),
        "bugfix" => Style::default().fg(Color::Yellow),
        "hotfix" => Style::default().fg(Color::Red),
        _ => default_text(),
    }
}
