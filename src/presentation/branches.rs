use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

use super::style;
use crate::domain::Branch;

/// Marker a branch carries in its recency column when it is checked out.
pub const CURRENT_BRANCH_RECENCY: &str = "  *";

pub fn branch_list_display_lines(
    branches: &[Branch],
    full_description: bool,
    diff_name: Option<&str>,
    show_pull_requests: bool,
) -> Vec<Vec<Line<'static>>> {
    branches
        .iter()
        .map(|branch| {
            let diffed = diff_name == Some(branch.name.as_str());
            branch_display_lines(branch, full_description, diffed, show_pull_requests)
        })
        .collect()
}

/// Styled display columns of one branch row. Pure: identical inputs always
/// produce identical output, and missing optional data degrades to empty
/// columns.
pub fn branch_display_lines(
    branch: &Branch,
    full_description: bool,
    diffed: bool,
    show_pull_requests: bool,
) -> Vec<Line<'static>> {
    let shown_name = branch
        .display_name
        .clone()
        .unwrap_or_else(|| branch.name.clone());
    let name_style = if diffed {
        style::diff_highlight()
    } else {
        style::branch_name_style(&branch.name)
    };
    let mut name_spans = vec![Span::styled(shown_name, name_style)];
    if branch.is_tracking_remote() {
        name_spans.push(Span::raw(" "));
        name_spans.push(colored_branch_status(branch));
    }

    let recency_color = if branch.recency == CURRENT_BRANCH_RECENCY {
        Color::Green
    } else {
        Color::Cyan
    };
    let mut row = vec![Line::from(Span::styled(
        branch.recency.clone(),
        Style::default().fg(recency_color),
    ))];

    if show_pull_requests {
        row.push(Line::from(pull_request_span(branch)));
    }

    row.push(Line::from(name_spans));

    if full_description {
        row.push(Line::from(Span::styled(
            branch.upstream_name.clone().unwrap_or_default(),
            style::accent(),
        )));
    }
    row
}

pub fn branch_status(branch: &Branch) -> String {
    format!("↑{}↓{}", branch.pushables, branch.pullables)
}

/// Tracking-status suffix: green when the branch exactly matches its
/// upstream, red when it is not tracking at all (unreachable from the caller,
/// which gates on tracking), otherwise yellow, including "tracking but
/// status unknown".
pub fn colored_branch_status(branch: &Branch) -> Span<'static> {
    let color = if branch.matches_upstream() {
        Color::Green
    } else if !branch.is_tracking_remote() {
        Color::Red
    } else {
        Color::Yellow
    };
    Span::styled(branch_status(branch), Style::default().fg(color))
}

fn pull_request_span(branch: &Branch) -> Span<'static> {
    match &branch.pr {
        Some(pr) => {
            let color = match pr.state.as_str() {
                "OPEN" => Color::Green,
                "CLOSED" => Color::Red,
                _ => Color::Magenta,
            };
            Span::styled(format!("#{}", pr.number), Style::default().fg(color))
        }
        None => Span::raw(""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{PullRequest, UpstreamState};

    fn branch(name: &str) -> Branch {
        Branch {
            name: name.to_string(),
            recency: "2d".to_string(),
            ..Branch::default()
        }
    }

    fn name_line<'a>(row: &'a [Line<'static>], show_pull_requests: bool) -> &'a Line<'static> {
        &row[if show_pull_requests { 2 } else { 1 }]
    }

    #[test]
    fn formatting_is_pure() {
        let mut branch = branch("feature/login");
        branch.upstream_name = Some("origin/feature/login".to_string());
        branch.upstream_state = UpstreamState::Diverged;
        branch.pushables = "1".to_string();
        branch.pullables = "2".to_string();
        let first = branch_display_lines(&branch, true, false, true);
        let second = branch_display_lines(&branch, true, false, true);
        assert_eq!(first, second);
    }

    #[test]
    fn feature_branch_without_upstream_is_green_with_no_suffix() {
        let branch = branch("feature/login");
        let row = branch_display_lines(&branch, false, false, false);
        assert_eq!(row.len(), 2);
        let name = name_line(&row, false);
        assert_eq!(name.spans.len(), 1);
        assert_eq!(name.spans[0].content.as_ref(), "feature/login");
        assert_eq!(name.spans[0].style, Style::default().fg(Color::Green));
    }

    #[test]
    fn diffed_name_overrides_the_hotfix_color() {
        let branch = branch("hotfix/x");
        let row = branch_display_lines(&branch, false, true, false);
        let name = name_line(&row, false);
        assert_eq!(name.spans[0].style, style::diff_highlight());
    }

    #[test]
    fn diff_name_only_matches_the_named_branch() {
        let branches = vec![branch("hotfix/x"), branch("main")];
        let rows = branch_list_display_lines(&branches, false, Some("hotfix/x"), false);
        assert_eq!(rows[0][1].spans[0].style, style::diff_highlight());
        assert_eq!(rows[1][1].spans[0].style, style::default_text());
    }

    #[test]
    fn closed_pull_request_column_is_red() {
        let mut branch = branch("feature/login");
        branch.pr = Some(PullRequest {
            number: 42,
            state: "CLOSED".to_string(),
            head_ref_name: "feature/login".to_string(),
        });
        let row = branch_display_lines(&branch, false, false, true);
        assert_eq!(row.len(), 3);
        let pr = &row[1];
        assert_eq!(pr.spans[0].content.as_ref(), "#42");
        assert_eq!(pr.spans[0].style, Style::default().fg(Color::Red));
    }

    #[test]
    fn merged_pull_request_column_is_magenta_and_missing_pr_is_empty() {
        let mut with_pr = branch("a");
        with_pr.pr = Some(PullRequest {
            number: 9,
            state: "MERGED".to_string(),
            head_ref_name: "a".to_string(),
        });
        let row = branch_display_lines(&with_pr, false, false, true);
        assert_eq!(row[1].spans[0].style, Style::default().fg(Color::Magenta));

        let without_pr = branch("b");
        let row = branch_display_lines(&without_pr, false, false, true);
        assert_eq!(row[1].spans[0].content.as_ref(), "");
    }

    #[test]
    fn matching_upstream_suffix_is_green_even_with_nonzero_counts() {
        let mut branch = branch("main");
        branch.upstream_name = Some("origin/main".to_string());
        branch.upstream_state = UpstreamState::InSync;
        branch.pushables = "3".to_string();
        branch.pullables = "0".to_string();
        let row = branch_display_lines(&branch, false, false, false);
        let name = name_line(&row, false);
        assert_eq!(name.spans.len(), 3);
        assert_eq!(name.spans[2].content.as_ref(), "↑3↓0");
        assert_eq!(name.spans[2].style, Style::default().fg(Color::Green));
    }

    #[test]
    fn tracking_with_unknown_status_renders_yellow() {
        let mut branch = branch("main");
        branch.upstream_name = Some("origin/main".to_string());
        branch.upstream_state = UpstreamState::Unknown;
        branch.pushables = "?".to_string();
        branch.pullables = "?".to_string();
        let row = branch_display_lines(&branch, false, false, false);
        let name = name_line(&row, false);
        assert_eq!(name.spans[2].style, Style::default().fg(Color::Yellow));
    }

    #[test]
    fn recency_marker_is_green_only_for_the_current_branch() {
        let mut current = branch("main");
        current.recency = CURRENT_BRANCH_RECENCY.to_string();
        let row = branch_display_lines(&current, false, false, false);
        assert_eq!(row[0].spans[0].style, Style::default().fg(Color::Green));

        let other = branch("dev");
        let row = branch_display_lines(&other, false, false, false);
        assert_eq!(row[0].spans[0].style, Style::default().fg(Color::Cyan));
    }

    #[test]
    fn full_description_appends_the_upstream_column() {
        let mut main_branch = branch("main");
        main_branch.upstream_name = Some("origin/main".to_string());
        main_branch.upstream_state = UpstreamState::InSync;
        let row = branch_display_lines(&main_branch, true, false, false);
        assert_eq!(row.len(), 3);
        assert_eq!(row[2].spans[0].content.as_ref(), "origin/main");
        assert_eq!(row[2].spans[0].style, style::accent());

        let bare = branch("scratch");
        let row = branch_display_lines(&bare, true, false, false);
        assert_eq!(row[2].spans[0].content.as_ref(), "");
    }

    #[test]
    fn display_name_wins_but_coloring_follows_the_real_name() {
        let mut branch = branch("feature/login");
        branch.display_name = Some("login work".to_string());
        let row = branch_display_lines(&branch, false, false, false);
        let name = name_line(&row, false);
        assert_eq!(name.spans[0].content.as_ref(), "login work");
        assert_eq!(name.spans[0].style, Style::default().fg(Color::Green));
    }
}
