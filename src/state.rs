use std::collections::HashMap;

use chrono::Local;

use crate::controllers::context::ContextKey;
use crate::domain::{
    Branch, Commit, CommitFile, PullRequest, Remote, RemoteBranch, StashEntry, StatusFile,
    Submodule, Tag,
};
use crate::git::GitAction;

const MAX_LOG_LINES: usize = 300;

/// Everything loaded from the repository. Replaced wholesale on snapshot
/// refresh; the derived lists (sub-commits, commit files, remote branches)
/// are replaced individually as the user drills in.
#[derive(Debug, Default)]
pub struct Model {
    pub repo_root: String,
    pub files: Vec<StatusFile>,
    pub branches: Vec<Branch>,
    pub remotes: Vec<Remote>,
    pub remote_branches: Vec<RemoteBranch>,
    pub tags: Vec<Tag>,
    pub commits: Vec<Commit>,
    pub reflog_commits: Vec<Commit>,
    pub sub_commits: Vec<Commit>,
    pub commit_files: Vec<CommitFile>,
    /// The ref whose changed files are currently shown in the commit-files
    /// view.
    pub commit_files_ref: Option<String>,
    pub stash: Vec<StashEntry>,
    pub submodules: Vec<Submodule>,
    pub pull_requests: HashMap<String, PullRequest>,
}

impl Model {
    /// Joins the fetched pull requests onto branches by head branch name.
    pub fn apply_pull_requests(&mut self) {
        for branch in &mut self.branches {
            branch.pr = self.pull_requests.get(&branch.name).cloned();
        }
    }
}

#[derive(Debug, Default)]
pub struct Modes {
    /// Name of the ref currently being diffed against, if any.
    pub diffing: Option<String>,
}

#[derive(Debug, Clone)]
pub enum MenuAction {
    /// Re-dispatch a key binding against the context it was collected from.
    DispatchKey { context: ContextKey, key: String },
    Git(GitAction),
}

#[derive(Debug, Clone)]
pub struct MenuItem {
    pub label: String,
    pub action: MenuAction,
}

#[derive(Debug, Clone)]
pub struct MenuState {
    pub title: String,
    pub items: Vec<MenuItem>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputPurpose {
    NewBranch,
    NewTag { ref_name: String },
    StashMessage,
}

#[derive(Debug, Clone)]
pub struct InputState {
    pub title: String,
    pub value: String,
    pub purpose: InputPurpose,
}

#[derive(Debug, Clone)]
pub struct PendingConfirmation {
    pub message: String,
    pub action: GitAction,
}

#[derive(Debug, Default)]
pub struct CommitMessageState {
    pub buffer: String,
    /// Draft preserved across an aborted commit attempt.
    pub saved: String,
}

#[derive(Debug)]
pub struct AppState {
    pub model: Model,
    pub modes: Modes,
    context_stack: Vec<ContextKey>,
    pub menu: Option<MenuState>,
    pub input: Option<InputState>,
    pub confirmation: Option<PendingConfirmation>,
    pub commit_message: CommitMessageState,
    pub status_line: String,
    pub log_lines: Vec<String>,
    pub detail_text: String,
    pub details_scroll: usize,
    pub pending_edit: Option<String>,
    pub should_quit: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            model: Model::default(),
            modes: Modes::default(),
            context_stack: vec![ContextKey::Files],
            menu: None,
            input: None,
            confirmation: None,
            commit_message: CommitMessageState::default(),
            status_line: String::new(),
            log_lines: Vec::new(),
            detail_text: "Loading…".to_string(),
            details_scroll: 0,
            pending_edit: None,
            should_quit: false,
        }
    }

    pub fn current_context(&self) -> ContextKey {
        *self
            .context_stack
            .last()
            .expect("context stack is never empty")
    }

    pub fn push_context(&mut self, key: ContextKey) {
        if self.current_context() != key {
            self.context_stack.push(key);
        }
    }

    /// Jumps straight to a side panel, dropping any drill-down history.
    pub fn reset_context(&mut self, key: ContextKey) {
        self.context_stack = vec![key];
    }

    /// Pops back to the previous context; the root entry stays put.
    pub fn pop_context(&mut self) -> bool {
        if self.context_stack.len() > 1 {
            self.context_stack.pop();
            true
        } else {
            false
        }
    }

    pub fn context_stack(&self) -> &[ContextKey] {
        &self.context_stack
    }

    pub fn diff_name(&self) -> Option<&str> {
        self.modes.diffing.as_deref()
    }

    pub fn append_log(&mut self, line: impl Into<String>) {
        let now = Local::now().format("%H:%M:%S");
        self.log_lines.push(format!("[{now}] {}", line.into()));
        if self.log_lines.len() > MAX_LOG_LINES {
            let extra = self.log_lines.len() - MAX_LOG_LINES;
            self.log_lines.drain(0..extra);
        }
    }

    pub fn set_status(&mut self, line: impl Into<String>) {
        self.status_line = line.into();
    }

    pub fn set_detail_text(&mut self, text: impl Into<String>) {
        self.detail_text = text.into();
        self.details_scroll = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_stack_push_pop() {
        let mut state = AppState::new();
        assert_eq!(state.current_context(), ContextKey::Files);

        state.push_context(ContextKey::Branches);
        state.push_context(ContextKey::SubCommits);
        assert_eq!(state.current_context(), ContextKey::SubCommits);

        assert!(state.pop_context());
        assert_eq!(state.current_context(), ContextKey::Branches);
        assert!(state.pop_context());
        assert!(!state.pop_context());
        assert_eq!(state.current_context(), ContextKey::Files);
    }

    #[test]
    fn pushing_current_context_does_not_stack() {
        let mut state = AppState::new();
        state.push_context(ContextKey::Branches);
        state.push_context(ContextKey::Branches);
        assert_eq!(state.context_stack().len(), 2);
    }

    #[test]
    fn log_is_capped() {
        let mut state = AppState::new();
        for i in 0..(MAX_LOG_LINES + 20) {
            state.append_log(format!("line {i}"));
        }
        assert_eq!(state.log_lines.len(), MAX_LOG_LINES);
        assert!(state.log_lines.last().expect("has lines").contains("line"));
    }

    #[test]
    fn pull_requests_join_onto_branches() {
        let mut state = AppState::new();
        state.model.branches = vec![Branch {
            name: "feature/login".to_string(),
            ..Branch::default()
        }];
        state.model.pull_requests.insert(
            "feature/login".to_string(),
            PullRequest {
                number: 7,
                state: "OPEN".to_string(),
                head_ref_name: "feature/login".to_string(),
            },
        );
        state.model.apply_pull_requests();
        assert_eq!(
            state.model.branches[0].pr.as_ref().map(|pr| pr.number),
            Some(7)
        );
    }
}
