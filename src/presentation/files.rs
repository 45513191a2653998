use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

use super::style;
use crate::domain::{CommitFile, StatusFile};

pub fn status_file_display_lines(files: &[StatusFile]) -> Vec<Vec<Line<'static>>> {
    files.iter().map(status_file_display_line).collect()
}

fn status_file_display_line(file: &StatusFile) -> Vec<Line<'static>> {
    let status = Line::from(vec![
        Span::styled(
            file.staged_char.to_string(),
            Style::default().fg(Color::Green),
        ),
        Span::styled(
            file.unstaged_char.to_string(),
            Style::default().fg(Color::Red),
        ),
    ]);
    vec![status, Line::from(Span::raw(file.path.clone()))]
}

pub fn commit_file_display_lines(files: &[CommitFile]) -> Vec<Vec<Line<'static>>> {
    files
        .iter()
        .map(|file| {
            let color = match file.change_status {
                'A' => Color::Green,
                'D' => Color::Red,
                'M' => Color::Yellow,
                _ => Color::Cyan,
            };
            vec![
                Line::from(Span::styled(
                    file.change_status.to_string(),
                    Style::default().fg(color),
                )),
                Line::from(Span::styled(file.path.clone(), style::default_text())),
            ]
        })
        .collect()
}
