use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Text};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Row, Table, TableState, Wrap};

use crate::app::App;
use crate::controllers::context::{ContextKey, ListContext};
use crate::presentation;
use crate::state::AppState;

const FILES_GROUP: &[ContextKey] = &[ContextKey::Files, ContextKey::Submodules];
const BRANCHES_GROUP: &[ContextKey] = &[
    ContextKey::Branches,
    ContextKey::Remotes,
    ContextKey::RemoteBranches,
    ContextKey::Tags,
];
const COMMITS_GROUP: &[ContextKey] = &[
    ContextKey::LocalCommits,
    ContextKey::ReflogCommits,
    ContextKey::SubCommits,
    ContextKey::CommitFiles,
];

#[derive(Debug, Clone, Copy)]
pub struct UiRects {
    pub header: Rect,
    pub footer: Rect,
    pub files: Rect,
    pub branches: Rect,
    pub commits: Rect,
    pub stash: Rect,
    pub details: Rect,
    pub log: Rect,
}

pub fn compute_ui_rects(root: Rect) -> UiRects {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(root);
    let body = rows[1];

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(42), Constraint::Percentage(58)])
        .split(body);
    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(30),
            Constraint::Percentage(30),
            Constraint::Percentage(25),
            Constraint::Percentage(15),
        ])
        .split(cols[0]);
    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(72), Constraint::Percentage(28)])
        .split(cols[1]);

    UiRects {
        header: rows[0],
        footer: rows[2],
        files: left[0],
        branches: left[1],
        commits: left[2],
        stash: left[3],
        details: right[0],
        log: right[1],
    }
}

pub fn render(frame: &mut Frame<'_>, app: &App) {
    let root = frame.area();
    let rects = compute_ui_rects(root);

    render_header(frame, rects.header, app);
    render_files_panel(frame, rects.files, app);
    render_branches_panel(frame, rects.branches, app);
    render_commits_panel(frame, rects.commits, app);
    render_stash_panel(frame, rects.stash, app);
    render_details(frame, rects.details, app);
    render_log(frame, rects.log, app);
    render_footer(frame, rects.footer, app);

    render_menu_modal(frame, root, app);
    render_commit_message_modal(frame, root, app);
    render_input_modal(frame, root, app);
    render_confirmation_modal(frame, root, app);
}

fn active_in_group(state: &AppState, group: &[ContextKey], default: ContextKey) -> ContextKey {
    state
        .context_stack()
        .iter()
        .rev()
        .find(|key| group.contains(key))
        .copied()
        .unwrap_or(default)
}

fn render_header(frame: &mut Frame<'_>, area: Rect, app: &App) {
    let state = app.state.borrow();
    let repo = if state.model.repo_root.is_empty() {
        "(not in a git repository)".to_string()
    } else {
        short_path(&state.model.repo_root)
    };
    let branch = state
        .model
        .branches
        .iter()
        .find(|branch| branch.recency == presentation::branches::CURRENT_BRANCH_RECENCY)
        .map(|branch| branch.name.clone())
        .unwrap_or_else(|| "(no branch)".to_string());
    let mut title = format!("easygit | {repo} | branch: {branch}");
    if let Some(diffing) = state.diff_name() {
        title.push_str(&format!(" | diffing {diffing}"));
    }

    let text = Text::from(vec![Line::from(title), Line::from(state.status_line.clone())]);
    let block = Paragraph::new(text).block(Block::default().borders(Borders::ALL));
    frame.render_widget(block, area);
}

fn render_files_panel(frame: &mut Frame<'_>, area: Rect, app: &App) {
    let state = app.state.borrow();
    let active = active_in_group(&state, FILES_GROUP, ContextKey::Files);
    let focused = state.current_context() == active;
    match active {
        ContextKey::Submodules => {
            let rows = presentation::submodule_display_lines(&state.model.submodules);
            let selected = selection(rows.len(), app.contexts.submodules.selected_index());
            render_table(
                frame,
                area,
                "Submodules",
                focused,
                rows,
                &[Constraint::Min(10)],
                selected,
                "(no submodules)",
            );
        }
        _ => {
            let rows = presentation::status_file_display_lines(&state.model.files);
            let selected = selection(rows.len(), app.contexts.files.selected_index());
            render_table(
                frame,
                area,
                "Files",
                focused,
                rows,
                &[Constraint::Length(2), Constraint::Min(10)],
                selected,
                "(clean working tree)",
            );
        }
    }
}

fn render_branches_panel(frame: &mut Frame<'_>, area: Rect, app: &App) {
    let state = app.state.borrow();
    let active = active_in_group(&state, BRANCHES_GROUP, ContextKey::Branches);
    let focused = state.current_context() == active;
    match active {
        ContextKey::Remotes => {
            let rows = presentation::remote_display_lines(&state.model.remotes);
            let selected = selection(rows.len(), app.contexts.remotes.selected_index());
            render_table(
                frame,
                area,
                "Remotes",
                focused,
                rows,
                &[Constraint::Length(12), Constraint::Min(10)],
                selected,
                "(no remotes)",
            );
        }
        ContextKey::RemoteBranches => {
            let rows = presentation::remote_branch_display_lines(&state.model.remote_branches);
            let selected = selection(rows.len(), app.contexts.remote_branches.selected_index());
            render_table(
                frame,
                area,
                "Remote Branches",
                focused,
                rows,
                &[Constraint::Min(10)],
                selected,
                "(no remote branches)",
            );
        }
        ContextKey::Tags => {
            let rows = presentation::tag_display_lines(&state.model.tags);
            let selected = selection(rows.len(), app.contexts.tags.selected_index());
            render_table(
                frame,
                area,
                "Tags",
                focused,
                rows,
                &[Constraint::Min(10)],
                selected,
                "(no tags)",
            );
        }
        _ => {
            let rows = presentation::branch_list_display_lines(
                &state.model.branches,
                app.config.full_description,
                state.diff_name(),
                app.config.show_pull_requests,
            );
            let mut widths = vec![Constraint::Length(4)];
            if app.config.show_pull_requests {
                widths.push(Constraint::Length(7));
            }
            widths.push(Constraint::Min(20));
            if app.config.full_description {
                widths.push(Constraint::Min(12));
            }
            let selected = selection(rows.len(), app.contexts.branches.selected_index());
            render_table(
                frame,
                area,
                "Branches",
                focused,
                rows,
                &widths,
                selected,
                "(no branches)",
            );
        }
    }
}

fn render_commits_panel(frame: &mut Frame<'_>, area: Rect, app: &App) {
    let state = app.state.borrow();
    let active = active_in_group(&state, COMMITS_GROUP, ContextKey::LocalCommits);
    let focused = state.current_context() == active;
    let commit_widths = [
        Constraint::Length(8),
        Constraint::Length(10),
        Constraint::Length(12),
        Constraint::Min(16),
    ];
    match active {
        ContextKey::ReflogCommits => {
            let rows = presentation::commit_list_display_lines(
                &state.model.reflog_commits,
                state.diff_name(),
            );
            let selected = selection(rows.len(), app.contexts.reflog_commits.selected_index());
            render_table(
                frame,
                area,
                "Reflog",
                focused,
                rows,
                &commit_widths,
                selected,
                "(no reflog entries)",
            );
        }
        ContextKey::SubCommits => {
            let rows = presentation::commit_list_display_lines(
                &state.model.sub_commits,
                state.diff_name(),
            );
            let selected = selection(rows.len(), app.contexts.sub_commits.selected_index());
            render_table(
                frame,
                area,
                "Commits (ref)",
                focused,
                rows,
                &commit_widths,
                selected,
                "(no commits loaded)",
            );
        }
        ContextKey::CommitFiles => {
            let rows = presentation::commit_file_display_lines(&state.model.commit_files);
            let selected = selection(rows.len(), app.contexts.commit_files.selected_index());
            let title = match &state.model.commit_files_ref {
                Some(ref_name) => format!("Files of {ref_name}"),
                None => "Commit Files".to_string(),
            };
            render_table(
                frame,
                area,
                &title,
                focused,
                rows,
                &[Constraint::Length(1), Constraint::Min(10)],
                selected,
                "(no changed files)",
            );
        }
        _ => {
            let rows =
                presentation::commit_list_display_lines(&state.model.commits, state.diff_name());
            let selected = selection(rows.len(), app.contexts.local_commits.selected_index());
            render_table(
                frame,
                area,
                "Commits",
                focused,
                rows,
                &commit_widths,
                selected,
                "(no commits)",
            );
        }
    }
}

fn render_stash_panel(frame: &mut Frame<'_>, area: Rect, app: &App) {
    let state = app.state.borrow();
    let focused = state.current_context() == ContextKey::Stash;
    let rows = presentation::stash_display_lines(&state.model.stash);
    let selected = selection(rows.len(), app.contexts.stash.selected_index());
    render_table(
        frame,
        area,
        "Stash",
        focused,
        rows,
        &[Constraint::Length(10), Constraint::Min(10)],
        selected,
        "(no stash entries)",
    );
}

fn render_details(frame: &mut Frame<'_>, area: Rect, app: &App) {
    let state = app.state.borrow();
    let body_rows = area.height.saturating_sub(2) as usize;
    let line_count = state.detail_text.split('\n').count();
    let max_scroll = line_count.saturating_sub(body_rows.max(1));
    let scroll = state.details_scroll.min(max_scroll);
    let detail = Paragraph::new(state.detail_text.as_str())
        .block(panel_block("Details", false))
        .wrap(Wrap { trim: false })
        .scroll((scroll as u16, 0));
    frame.render_widget(detail, area);
}

fn render_log(frame: &mut Frame<'_>, area: Rect, app: &App) {
    let state = app.state.borrow();
    let body_rows = area.height.saturating_sub(2) as usize;
    let text = if state.log_lines.is_empty() {
        "(command log is empty)".to_string()
    } else {
        let start = state.log_lines.len().saturating_sub(body_rows.max(1));
        state.log_lines[start..].join("\n")
    };
    let paragraph = Paragraph::new(text)
        .block(panel_block("Command Log", false))
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

fn render_footer(frame: &mut Frame<'_>, area: Rect, app: &App) {
    let current = app.state.borrow().current_context();
    let mut hints = app.registry.bindings_for(current);
    if current != ContextKey::Global {
        for (key, description) in app.registry.bindings_for(ContextKey::Global) {
            if !hints.iter().any(|(existing, _)| *existing == key) {
                hints.push((key, description));
            }
        }
    }
    hints.truncate(11);
    let line = hints
        .iter()
        .map(|(key, description)| format!("{key} {description}"))
        .collect::<Vec<_>>()
        .join(" | ");
    frame.render_widget(Paragraph::new(line), area);
}

fn render_menu_modal(frame: &mut Frame<'_>, root: Rect, app: &App) {
    let state = app.state.borrow();
    let Some(menu) = &state.menu else { return };
    let area = centered_rect(60, 50, root);
    frame.render_widget(Clear, area);
    let rows = presentation::menu_display_lines(&menu.items);
    let selected = selection(rows.len(), app.contexts.menu.selected_index());
    let table_rows: Vec<Row<'_>> = rows.into_iter().map(Row::new).collect();
    let mut table_state = TableState::default();
    table_state.select(selected);
    let table = Table::new(table_rows, [Constraint::Min(10)])
        .block(
            Block::default()
                .title(menu.title.as_str())
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .row_highlight_style(
            Style::default()
                .bg(Color::Blue)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        );
    frame.render_stateful_widget(table, area, &mut table_state);
}

fn render_commit_message_modal(frame: &mut Frame<'_>, root: Rect, app: &App) {
    let state = app.state.borrow();
    if state.current_context() != ContextKey::CommitMessage {
        return;
    }
    let area = centered_rect(70, 25, root);
    frame.render_widget(Clear, area);
    let text = Text::from(vec![
        Line::from(format!("> {}", state.commit_message.buffer)),
        Line::from(""),
        Line::from("Enter to commit, Esc to cancel (draft is kept)."),
    ]);
    let modal = Paragraph::new(text).block(
        Block::default()
            .title("Commit Message")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Green)),
    );
    frame.render_widget(modal, area);
}

fn render_input_modal(frame: &mut Frame<'_>, root: Rect, app: &App) {
    let state = app.state.borrow();
    let Some(input) = &state.input else { return };
    let area = centered_rect(70, 25, root);
    frame.render_widget(Clear, area);
    let mut lines = vec![
        Line::from(input.title.clone()),
        Line::from(""),
        Line::from(format!("> {}", input.value)),
    ];
    if input.purpose == crate::state::InputPurpose::NewBranch && !input.value.is_empty() {
        let similar = app.helpers.suggestions.branch_suggestions(&input.value);
        if !similar.is_empty() {
            lines.push(Line::from(format!("Similar: {}", similar.join(", "))));
        }
    }
    lines.push(Line::from(""));
    lines.push(Line::from("Enter to submit, Esc to cancel."));
    let modal = Paragraph::new(Text::from(lines)).block(
        Block::default()
            .title("Input")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );
    frame.render_widget(modal, area);
}

fn render_confirmation_modal(frame: &mut Frame<'_>, root: Rect, app: &App) {
    let state = app.state.borrow();
    let Some(confirm) = &state.confirmation else { return };
    let area = centered_rect(70, 25, root);
    frame.render_widget(Clear, area);
    let text = Text::from(vec![
        Line::from(confirm.message.clone()),
        Line::from(""),
        Line::from(format!("Command: {}", confirm.action.command_preview())),
        Line::from(""),
        Line::from("Press y/Enter to confirm, n/Esc to cancel."),
    ]);
    let modal = Paragraph::new(text).block(
        Block::default()
            .title("Confirm Action")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow)),
    );
    frame.render_widget(modal, area);
}

#[allow(clippy::too_many_arguments)]
fn render_table(
    frame: &mut Frame<'_>,
    area: Rect,
    title: &str,
    focused: bool,
    rows: Vec<Vec<Line<'static>>>,
    widths: &[Constraint],
    selected: Option<usize>,
    empty_hint: &str,
) {
    if rows.is_empty() {
        let hint = Paragraph::new(empty_hint).block(panel_block(title, focused));
        frame.render_widget(hint, area);
        return;
    }
    let table_rows: Vec<Row<'_>> = rows.into_iter().map(Row::new).collect();
    let mut state = TableState::default();
    state.select(selected);
    let table = Table::new(table_rows, widths.to_vec())
        .block(panel_block(title, focused))
        .row_highlight_style(
            Style::default()
                .bg(Color::Blue)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        );
    frame.render_stateful_widget(table, area, &mut state);
}

fn selection(len: usize, index: usize) -> Option<usize> {
    if len == 0 { None } else { Some(index.min(len - 1)) }
}

fn panel_block(title: &str, focused: bool) -> Block<'_> {
    let mut block = Block::default().title(title.to_string()).borders(Borders::ALL);
    if focused {
        block = block.border_style(Style::default().fg(Color::LightCyan));
    }
    block
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

fn short_path(path: &str) -> String {
    let max = 42usize;
    if path.chars().count() <= max {
        return path.to_string();
    }
    let tail = path
        .chars()
        .rev()
        .take(max.saturating_sub(3))
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect::<String>();
    format!("...{tail}")
}
