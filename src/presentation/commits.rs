use chrono::DateTime;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

use super::style;
use crate::domain::Commit;

pub fn commit_list_display_lines(
    commits: &[Commit],
    diff_name: Option<&str>,
) -> Vec<Vec<Line<'static>>> {
    commits
        .iter()
        .map(|commit| {
            let diffed = diff_name == Some(commit.sha.as_str());
            commit_display_lines(commit, diffed)
        })
        .collect()
}

pub fn commit_display_lines(commit: &Commit, diffed: bool) -> Vec<Line<'static>> {
    let subject_style = if diffed {
        style::diff_highlight()
    } else {
        style::default_text()
    };
    vec![
        Line::from(Span::styled(
            commit.short_sha().to_string(),
            Style::default().fg(Color::Yellow),
        )),
        Line::from(Span::styled(
            commit_date(commit.unix_timestamp),
            Style::default().fg(Color::Blue),
        )),
        Line::from(Span::styled(
            commit.author.clone(),
            Style::default().fg(Color::Green),
        )),
        Line::from(Span::styled(commit.subject.clone(), subject_style)),
    ]
}

fn commit_date(unix_timestamp: i64) -> String {
    DateTime::from_timestamp(unix_timestamp, 0)
        .map(|date| date.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}
