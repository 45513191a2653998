use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

use super::style;
use crate::domain::{Remote, RemoteBranch, StashEntry, Submodule, Tag};
use crate::state::MenuItem;

pub fn stash_display_lines(entries: &[StashEntry]) -> Vec<Vec<Line<'static>>> {
    entries
        .iter()
        .map(|entry| {
            vec![
                Line::from(Span::styled(
                    entry.ref_name(),
                    Style::default().fg(Color::Cyan),
                )),
                Line::from(Span::styled(entry.message.clone(), style::default_text())),
            ]
        })
        .collect()
}

pub fn remote_display_lines(remotes: &[Remote]) -> Vec<Vec<Line<'static>>> {
    remotes
        .iter()
        .map(|remote| {
            vec![
                Line::from(Span::styled(
                    remote.name.clone(),
                    Style::default().fg(Color::Green),
                )),
                Line::from(Span::styled(remote.url.clone(), style::default_text())),
            ]
        })
        .collect()
}

pub fn remote_branch_display_lines(branches: &[RemoteBranch]) -> Vec<Vec<Line<'static>>> {
    branches
        .iter()
        .map(|branch| vec![Line::from(Span::raw(branch.full_name()))])
        .collect()
}

pub fn tag_display_lines(tags: &[Tag]) -> Vec<Vec<Line<'static>>> {
    tags.iter()
        .map(|tag| vec![Line::from(Span::raw(tag.name.clone()))])
        .collect()
}

pub fn submodule_display_lines(submodules: &[Submodule]) -> Vec<Vec<Line<'static>>> {
    submodules
        .iter()
        .map(|submodule| vec![Line::from(Span::raw(submodule.path.clone()))])
        .collect()
}

pub fn menu_display_lines(items: &[MenuItem]) -> Vec<Vec<Line<'static>>> {
    items
        .iter()
        .map(|item| vec![Line::from(Span::styled(item.label.clone(), style::default_text()))])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stash_rows_lead_with_the_selector() {
        let rows = stash_display_lines(&[StashEntry {
            index: 3,
            message: "experiment".to_string(),
        }]);
        assert_eq!(rows[0][0].spans[0].content.as_ref(), "stash@{3}");
        assert_eq!(rows[0][1].spans[0].content.as_ref(), "experiment");
    }

    #[test]
    fn remote_branch_rows_use_the_full_name() {
        let rows = remote_branch_display_lines(&[RemoteBranch {
            remote_name: "origin".to_string(),
            name: "main".to_string(),
        }]);
        assert_eq!(rows[0][0].spans[0].content.as_ref(), "origin/main");
    }
}
