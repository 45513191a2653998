use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::domain::Commit;
use crate::state::AppState;

/// Stable identity of a context. The set is fixed at startup; the registry
/// refuses attachments to keys it was not initialized with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContextKey {
    Files,
    Branches,
    Remotes,
    RemoteBranches,
    Tags,
    LocalCommits,
    ReflogCommits,
    SubCommits,
    CommitFiles,
    Stash,
    Submodules,
    Menu,
    CommitMessage,
    Global,
}

impl ContextKey {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Files => "files",
            Self::Branches => "branches",
            Self::Remotes => "remotes",
            Self::RemoteBranches => "remote_branches",
            Self::Tags => "tags",
            Self::LocalCommits => "local_commits",
            Self::ReflogCommits => "reflog_commits",
            Self::SubCommits => "sub_commits",
            Self::CommitFiles => "commit_files",
            Self::Stash => "stash",
            Self::Submodules => "submodules",
            Self::Menu => "menu",
            Self::CommitMessage => "commit_message",
            Self::Global => "global",
        }
    }

    pub fn all() -> &'static [ContextKey] {
        &[
            Self::Files,
            Self::Branches,
            Self::Remotes,
            Self::RemoteBranches,
            Self::Tags,
            Self::LocalCommits,
            Self::ReflogCommits,
            Self::SubCommits,
            Self::CommitFiles,
            Self::Stash,
            Self::Submodules,
            Self::Menu,
            Self::CommitMessage,
            Self::Global,
        ]
    }
}

pub trait Context {
    fn key(&self) -> ContextKey;
}

/// Cursor bookkeeping shared by every list context. Interior mutability keeps
/// the contexts shareable behind plain `Rc` handles.
#[derive(Debug, Default)]
pub struct ListCursor {
    selected: Cell<usize>,
    anchor: Cell<Option<usize>>,
}

impl ListCursor {
    pub fn clamped(&self, len: usize) -> usize {
        if len == 0 { 0 } else { self.selected.get().min(len - 1) }
    }

    pub fn set(&self, index: usize, len: usize) {
        let clamped = if len == 0 { 0 } else { index.min(len - 1) };
        self.selected.set(clamped);
    }

    pub fn anchor(&self) -> Option<usize> {
        self.anchor.get()
    }

    pub fn set_anchor(&self, anchor: Option<usize>) {
        self.anchor.set(anchor);
    }
}

/// List semantics a context may expose: item count plus get/set of the
/// selection and the optional range-selection anchor.
pub trait ListContext: Context {
    fn len(&self) -> usize;
    fn cursor(&self) -> &ListCursor;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn selected_index(&self) -> usize {
        self.cursor().clamped(self.len())
    }

    fn set_selected_index(&self, index: usize) {
        self.cursor().set(index, self.len());
    }

    fn range_anchor(&self) -> Option<usize> {
        self.cursor().anchor()
    }

    fn set_range_anchor(&self, anchor: Option<usize>) {
        self.cursor().set_anchor(anchor);
    }
}

/// The context can name a ref whose commit history should open as a derived
/// sub-commit list.
pub trait CanSwitchToSubCommits: ListContext {
    fn selected_ref_name(&self) -> Option<String>;
}

/// The context can name a ref whose changed files should open as a derived
/// diff-files list.
pub trait CanSwitchToDiffFiles: ListContext {
    fn selected_diff_ref(&self) -> Option<String>;
}

/// The context holds a navigable list of commits.
pub trait ContainsCommits: ListContext {
    fn selected_commit(&self) -> Option<Commit>;
}

macro_rules! shared_state_context {
    ($name:ident, $key:expr, |$model:ident| $len:expr) => {
        pub struct $name {
            state: Rc<RefCell<AppState>>,
            cursor: ListCursor,
        }

        impl $name {
            pub fn new(state: Rc<RefCell<AppState>>) -> Self {
                Self {
                    state,
                    cursor: ListCursor::default(),
                }
            }
        }

        impl Context for $name {
            fn key(&self) -> ContextKey {
                $key
            }
        }

        impl ListContext for $name {
            fn len(&self) -> usize {
                let state = self.state.borrow();
                let $model = &state.model;
                $len
            }

            fn cursor(&self) -> &ListCursor {
                &self.cursor
            }
        }
    };
}

shared_state_context!(FilesContext, ContextKey::Files, |model| model.files.len());
shared_state_context!(BranchesContext, ContextKey::Branches, |model| model
    .branches
    .len());
shared_state_context!(RemotesContext, ContextKey::Remotes, |model| model
    .remotes
    .len());
shared_state_context!(
    RemoteBranchesContext,
    ContextKey::RemoteBranches,
    |model| model.remote_branches.len()
);
shared_state_context!(TagsContext, ContextKey::Tags, |model| model.tags.len());
shared_state_context!(LocalCommitsContext, ContextKey::LocalCommits, |model| model
    .commits
    .len());
shared_state_context!(
    ReflogCommitsContext,
    ContextKey::ReflogCommits,
    |model| model.reflog_commits.len()
);
shared_state_context!(SubCommitsContext, ContextKey::SubCommits, |model| model
    .sub_commits
    .len());
shared_state_context!(CommitFilesContext, ContextKey::CommitFiles, |model| model
    .commit_files
    .len());
shared_state_context!(StashContext, ContextKey::Stash, |model| model.stash.len());
shared_state_context!(SubmodulesContext, ContextKey::Submodules, |model| model
    .submodules
    .len());

impl FilesContext {
    pub fn selected_file_path(&self) -> Option<String> {
        let state = self.state.borrow();
        state
            .model
            .files
            .get(self.selected_index())
            .map(|file| file.path.clone())
    }
}

impl BranchesContext {
    pub fn selected_branch_name(&self) -> Option<String> {
        let state = self.state.borrow();
        state
            .model
            .branches
            .get(self.selected_index())
            .map(|branch| branch.name.clone())
    }
}

impl RemotesContext {
    pub fn selected_remote(&self) -> Option<crate::domain::Remote> {
        let state = self.state.borrow();
        state.model.remotes.get(self.selected_index()).cloned()
    }
}

impl RemoteBranchesContext {
    pub fn selected_remote_branch(&self) -> Option<crate::domain::RemoteBranch> {
        let state = self.state.borrow();
        state
            .model
            .remote_branches
            .get(self.selected_index())
            .cloned()
    }
}

impl TagsContext {
    pub fn selected_tag_name(&self) -> Option<String> {
        let state = self.state.borrow();
        state
            .model
            .tags
            .get(self.selected_index())
            .map(|tag| tag.name.clone())
    }
}

impl CommitFilesContext {
    pub fn selected_commit_file(&self) -> Option<crate::domain::CommitFile> {
        let state = self.state.borrow();
        state
            .model
            .commit_files
            .get(self.selected_index())
            .cloned()
    }
}

impl StashContext {
    pub fn selected_entry(&self) -> Option<crate::domain::StashEntry> {
        let state = self.state.borrow();
        state.model.stash.get(self.selected_index()).cloned()
    }
}

impl SubmodulesContext {
    pub fn selected_submodule_path(&self) -> Option<String> {
        let state = self.state.borrow();
        state
            .model
            .submodules
            .get(self.selected_index())
            .map(|submodule| submodule.path.clone())
    }
}

impl CanSwitchToSubCommits for BranchesContext {
    fn selected_ref_name(&self) -> Option<String> {
        self.selected_branch_name()
    }
}

impl CanSwitchToSubCommits for RemoteBranchesContext {
    fn selected_ref_name(&self) -> Option<String> {
        self.selected_remote_branch().map(|branch| branch.full_name())
    }
}

impl CanSwitchToSubCommits for TagsContext {
    fn selected_ref_name(&self) -> Option<String> {
        self.selected_tag_name()
    }
}

impl CanSwitchToSubCommits for ReflogCommitsContext {
    fn selected_ref_name(&self) -> Option<String> {
        self.selected_commit().map(|commit| commit.sha)
    }
}

impl CanSwitchToDiffFiles for LocalCommitsContext {
    fn selected_diff_ref(&self) -> Option<String> {
        self.selected_commit().map(|commit| commit.sha)
    }
}

impl CanSwitchToDiffFiles for SubCommitsContext {
    fn selected_diff_ref(&self) -> Option<String> {
        self.selected_commit().map(|commit| commit.sha)
    }
}

impl CanSwitchToDiffFiles for StashContext {
    fn selected_diff_ref(&self) -> Option<String> {
        self.selected_entry().map(|entry| entry.ref_name())
    }
}

impl ContainsCommits for LocalCommitsContext {
    fn selected_commit(&self) -> Option<Commit> {
        let state = self.state.borrow();
        state.model.commits.get(self.selected_index()).cloned()
    }
}

impl ContainsCommits for ReflogCommitsContext {
    fn selected_commit(&self) -> Option<Commit> {
        let state = self.state.borrow();
        state
            .model
            .reflog_commits
            .get(self.selected_index())
            .cloned()
    }
}

impl ContainsCommits for SubCommitsContext {
    fn selected_commit(&self) -> Option<Commit> {
        let state = self.state.borrow();
        state.model.sub_commits.get(self.selected_index()).cloned()
    }
}

/// The keybindings/action menu. Its item list lives in the shared state.
pub struct MenuContext {
    state: Rc<RefCell<AppState>>,
    cursor: ListCursor,
}

impl MenuContext {
    pub fn new(state: Rc<RefCell<AppState>>) -> Self {
        Self {
            state,
            cursor: ListCursor::default(),
        }
    }

    pub fn selected_item(&self) -> Option<crate::state::MenuItem> {
        let state = self.state.borrow();
        let menu = state.menu.as_ref()?;
        menu.items.get(self.selected_index()).cloned()
    }
}

impl Context for MenuContext {
    fn key(&self) -> ContextKey {
        ContextKey::Menu
    }
}

impl ListContext for MenuContext {
    fn len(&self) -> usize {
        self.state
            .borrow()
            .menu
            .as_ref()
            .map(|menu| menu.items.len())
            .unwrap_or(0)
    }

    fn cursor(&self) -> &ListCursor {
        &self.cursor
    }
}

pub struct CommitMessageContext;

impl Context for CommitMessageContext {
    fn key(&self) -> ContextKey {
        ContextKey::CommitMessage
    }
}

pub struct GlobalContext;

impl Context for GlobalContext {
    fn key(&self) -> ContextKey {
        ContextKey::Global
    }
}

/// All contexts, constructed once at startup and shared behind `Rc`.
pub struct Contexts {
    pub files: Rc<FilesContext>,
    pub branches: Rc<BranchesContext>,
    pub remotes: Rc<RemotesContext>,
    pub remote_branches: Rc<RemoteBranchesContext>,
    pub tags: Rc<TagsContext>,
    pub local_commits: Rc<LocalCommitsContext>,
    pub reflog_commits: Rc<ReflogCommitsContext>,
    pub sub_commits: Rc<SubCommitsContext>,
    pub commit_files: Rc<CommitFilesContext>,
    pub stash: Rc<StashContext>,
    pub submodules: Rc<SubmodulesContext>,
    pub menu: Rc<MenuContext>,
    pub commit_message: Rc<CommitMessageContext>,
    pub global: Rc<GlobalContext>,
}

impl Contexts {
    pub fn new(state: &Rc<RefCell<AppState>>) -> Self {
        Self {
            files: Rc::new(FilesContext::new(Rc::clone(state))),
            branches: Rc::new(BranchesContext::new(Rc::clone(state))),
            remotes: Rc::new(RemotesContext::new(Rc::clone(state))),
            remote_branches: Rc::new(RemoteBranchesContext::new(Rc::clone(state))),
            tags: Rc::new(TagsContext::new(Rc::clone(state))),
            local_commits: Rc::new(LocalCommitsContext::new(Rc::clone(state))),
            reflog_commits: Rc::new(ReflogCommitsContext::new(Rc::clone(state))),
            sub_commits: Rc::new(SubCommitsContext::new(Rc::clone(state))),
            commit_files: Rc::new(CommitFilesContext::new(Rc::clone(state))),
            stash: Rc::new(StashContext::new(Rc::clone(state))),
            submodules: Rc::new(SubmodulesContext::new(Rc::clone(state))),
            menu: Rc::new(MenuContext::new(Rc::clone(state))),
            commit_message: Rc::new(CommitMessageContext),
            global: Rc::new(GlobalContext),
        }
    }

    /// Every context exposing list semantics, in panel order. The list
    /// controller factory attaches its navigation defaults to each of these.
    pub fn list_contexts(&self) -> Vec<Rc<dyn ListContext>> {
        vec![
            Rc::clone(&self.files) as Rc<dyn ListContext>,
            Rc::clone(&self.branches) as Rc<dyn ListContext>,
            Rc::clone(&self.remotes) as Rc<dyn ListContext>,
            Rc::clone(&self.remote_branches) as Rc<dyn ListContext>,
            Rc::clone(&self.tags) as Rc<dyn ListContext>,
            Rc::clone(&self.local_commits) as Rc<dyn ListContext>,
            Rc::clone(&self.reflog_commits) as Rc<dyn ListContext>,
            Rc::clone(&self.sub_commits) as Rc<dyn ListContext>,
            Rc::clone(&self.commit_files) as Rc<dyn ListContext>,
            Rc::clone(&self.stash) as Rc<dyn ListContext>,
            Rc::clone(&self.submodules) as Rc<dyn ListContext>,
            Rc::clone(&self.menu) as Rc<dyn ListContext>,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Branch, Commit, StashEntry};

    fn shared_state() -> Rc<RefCell<AppState>> {
        Rc::new(RefCell::new(AppState::new()))
    }

    fn commit(sha: &str) -> Commit {
        Commit {
            sha: sha.to_string(),
            author: "a".to_string(),
            unix_timestamp: 0,
            subject: "s".to_string(),
        }
    }

    #[test]
    fn selection_clamps_to_list_length() {
        let state = shared_state();
        let context = BranchesContext::new(Rc::clone(&state));
        assert_eq!(context.selected_index(), 0);
        assert!(context.is_empty());

        state.borrow_mut().model.branches = vec![
            Branch {
                name: "main".to_string(),
                ..Branch::default()
            },
            Branch {
                name: "dev".to_string(),
                ..Branch::default()
            },
        ];
        context.set_selected_index(5);
        assert_eq!(context.selected_index(), 1);

        // Shrinking the list clamps a stale cursor on read.
        state.borrow_mut().model.branches.pop();
        assert_eq!(context.selected_index(), 0);
    }

    #[test]
    fn empty_list_selection_is_inert() {
        let state = shared_state();
        let context = TagsContext::new(state);
        context.set_selected_index(3);
        assert_eq!(context.selected_index(), 0);
        assert_eq!(context.selected_tag_name(), None);
    }

    #[test]
    fn capability_accessors_read_the_selection() {
        let state = shared_state();
        state.borrow_mut().model.commits = vec![commit("aaa"), commit("bbb")];
        state.borrow_mut().model.stash = vec![StashEntry {
            index: 0,
            message: "WIP".to_string(),
        }];

        let commits = LocalCommitsContext::new(Rc::clone(&state));
        commits.set_selected_index(1);
        assert_eq!(commits.selected_diff_ref(), Some("bbb".to_string()));
        assert_eq!(
            commits.selected_commit().map(|c| c.sha),
            Some("bbb".to_string())
        );

        let stash = StashContext::new(state);
        assert_eq!(stash.selected_diff_ref(), Some("stash@{0}".to_string()));
    }

    #[test]
    fn range_anchor_round_trips() {
        let state = shared_state();
        let context = FilesContext::new(state);
        assert_eq!(context.range_anchor(), None);
        context.set_range_anchor(Some(2));
        assert_eq!(context.range_anchor(), Some(2));
        context.set_range_anchor(None);
        assert_eq!(context.range_anchor(), None);
    }
}
