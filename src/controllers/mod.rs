use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use anyhow::Result;
use tokio::sync::mpsc;

pub mod context;
pub mod generic;
pub mod helpers;
pub mod list_controller;
pub mod registry;

mod branches;
mod commit_message;
mod commits;
mod files;
mod global;
mod menu;
mod remotes;
mod stash;
mod submodules;
mod tags;

pub use branches::{BranchesController, GitFlowController};
pub use commit_message::CommitMessageController;
pub use commits::{BisectController, CommitFilesController, LocalCommitsController};
pub use files::{FilesController, FilesRemoveController};
pub use global::{GlobalController, SyncController, UndoController};
pub use menu::MenuController;
pub use remotes::{RemoteBranchesController, RemotesController};
pub use stash::StashController;
pub use submodules::SubmodulesController;
pub use tags::TagsController;

use context::{
    CanSwitchToDiffFiles, CanSwitchToSubCommits, ContainsCommits, Context, ContextKey, Contexts,
};
use generic::{BasicCommitsController, SwitchToDiffFilesController, SwitchToSubCommitsController};
use helpers::Helpers;
use list_controller::ListControllerFactory;
use registry::ControllerRegistry;

use crate::app::AppEvent;
use crate::config::AppConfig;
use crate::git::{GitAction, GitClient};
use crate::os::OsCommand;
use crate::state::{AppState, InputPurpose, InputState, MenuItem, MenuState, PendingConfirmation};

pub type Handler = Box<dyn Fn() -> Result<()>>;

/// One key binding of a controller: canonical key, human-readable
/// description, and the handler closure.
pub struct Binding {
    pub key: &'static str,
    pub description: &'static str,
    pub handler: Handler,
}

pub trait Controller {
    /// Binding table in declaration order.
    fn bindings(&self) -> &[Binding];

    /// Called when the context this controller is attached to gains focus.
    fn on_focus(&self) {}

    /// Fallback controllers (navigation defaults) resolve only after every
    /// ordinary controller had its chance.
    fn is_fallback(&self) -> bool {
        false
    }
}

/// Shared services injected into every controller and helper. Built once
/// before attachment; read-mostly for the whole session.
pub struct ControllerCommon {
    pub git: Arc<dyn GitClient>,
    pub os: OsCommand,
    pub config: Rc<AppConfig>,
    pub state: Rc<RefCell<AppState>>,
    pub event_tx: mpsc::UnboundedSender<AppEvent>,
}

impl ControllerCommon {
    pub fn new(
        git: Arc<dyn GitClient>,
        os: OsCommand,
        config: Rc<AppConfig>,
        state: Rc<RefCell<AppState>>,
        event_tx: mpsc::UnboundedSender<AppEvent>,
    ) -> Rc<Self> {
        Rc::new(Self {
            git,
            os,
            config,
            state,
            event_tx,
        })
    }

    pub fn set_status(&self, line: impl Into<String>) {
        self.state.borrow_mut().set_status(line);
    }

    /// Runs a git action on the runtime; completion comes back as an
    /// `ActionFinished` event on the loop.
    pub fn run_action(&self, action: GitAction) {
        let preview = action.command_preview();
        let was_commit = matches!(
            action,
            GitAction::Commit { .. } | GitAction::AmendHead
        );
        self.set_status(format!("Running: {preview}"));
        let git = Arc::clone(&self.git);
        let tx = self.event_tx.clone();
        tokio::spawn(async move {
            let result = git.run_action(&action).await.map_err(|err| err.to_string());
            let _ = tx.send(AppEvent::ActionFinished {
                preview,
                was_commit,
                result,
            });
        });
    }

    pub fn confirm(&self, message: impl Into<String>, action: GitAction) {
        self.state.borrow_mut().confirmation = Some(PendingConfirmation {
            message: message.into(),
            action,
        });
    }

    pub fn open_input(&self, purpose: InputPurpose, title: impl Into<String>) {
        self.state.borrow_mut().input = Some(InputState {
            title: title.into(),
            value: String::new(),
            purpose,
        });
    }

    pub fn open_menu(&self, title: impl Into<String>, items: Vec<MenuItem>) {
        let mut state = self.state.borrow_mut();
        state.menu = Some(MenuState {
            title: title.into(),
            items,
        });
        state.push_context(ContextKey::Menu);
    }

    pub fn request_refresh(&self) {
        let _ = self.event_tx.send(AppEvent::RefreshRequested);
    }
}

/// Builds the helpers, constructs every controller and binds them to their
/// contexts. Generic capability-driven controllers go first, then the domain
/// controllers, then the list navigation defaults, so that resolution order
/// matches specificity. Fails fast on any configuration error; a partially
/// attached registry never reaches the event loop.
pub fn attach_controllers(
    registry: &mut ControllerRegistry,
    common: &Rc<ControllerCommon>,
    contexts: &Contexts,
) -> Result<Rc<Helpers>> {
    let helpers = Rc::new(Helpers::new(Rc::clone(common)));
    attach_generic_controllers(registry, common, &helpers, contexts)?;
    attach_domain_controllers(registry, common, &helpers, contexts)?;
    attach_list_defaults(registry, contexts)?;
    registry.ensure_fully_attached()?;
    Ok(helpers)
}

/// One generic controller instance per (capability, qualifying context)
/// pair. Each capability's context list is enumerated explicitly here;
/// adding a qualifying context means adding it to the list, nothing is
/// discovered.
fn attach_generic_controllers(
    registry: &mut ControllerRegistry,
    common: &Rc<ControllerCommon>,
    helpers: &Rc<Helpers>,
    contexts: &Contexts,
) -> Result<()> {
    let sub_commit_capable: Vec<Rc<dyn CanSwitchToSubCommits>> = vec![
        Rc::clone(&contexts.branches) as Rc<dyn CanSwitchToSubCommits>,
        Rc::clone(&contexts.remote_branches) as Rc<dyn CanSwitchToSubCommits>,
        Rc::clone(&contexts.tags) as Rc<dyn CanSwitchToSubCommits>,
        Rc::clone(&contexts.reflog_commits) as Rc<dyn CanSwitchToSubCommits>,
    ];
    for context in sub_commit_capable {
        let key = context.key();
        registry.attach(
            key,
            vec![
                Rc::new(SwitchToSubCommitsController::new(Rc::clone(common), context))
                    as Rc<dyn Controller>,
            ],
        )?;
    }

    let diff_files_capable: Vec<Rc<dyn CanSwitchToDiffFiles>> = vec![
        Rc::clone(&contexts.local_commits) as Rc<dyn CanSwitchToDiffFiles>,
        Rc::clone(&contexts.sub_commits) as Rc<dyn CanSwitchToDiffFiles>,
        Rc::clone(&contexts.stash) as Rc<dyn CanSwitchToDiffFiles>,
    ];
    for context in diff_files_capable {
        let key = context.key();
        registry.attach(
            key,
            vec![
                Rc::new(SwitchToDiffFilesController::new(Rc::clone(common), context))
                    as Rc<dyn Controller>,
            ],
        )?;
    }

    let commit_lists: Vec<Rc<dyn ContainsCommits>> = vec![
        Rc::clone(&contexts.local_commits) as Rc<dyn ContainsCommits>,
        Rc::clone(&contexts.reflog_commits) as Rc<dyn ContainsCommits>,
        Rc::clone(&contexts.sub_commits) as Rc<dyn ContainsCommits>,
    ];
    for context in commit_lists {
        let key = context.key();
        registry.attach(
            key,
            vec![
                Rc::new(BasicCommitsController::new(
                    Rc::clone(common),
                    Rc::clone(helpers),
                    context,
                )) as Rc<dyn Controller>,
            ],
        )?;
    }

    Ok(())
}

fn attach_domain_controllers(
    registry: &mut ControllerRegistry,
    common: &Rc<ControllerCommon>,
    helpers: &Rc<Helpers>,
    contexts: &Contexts,
) -> Result<()> {
    let sync_controller = Rc::new(SyncController::new(Rc::clone(common)));
    let submodules_controller = Rc::new(SubmodulesController::new(
        Rc::clone(common),
        Rc::clone(&contexts.submodules),
    ));
    let bisect_controller = Rc::new(BisectController::new(
        Rc::clone(helpers),
        Rc::clone(&contexts.local_commits),
    ));
    let commit_message_controller = Rc::new(CommitMessageController::new(
        Rc::clone(common),
        Rc::clone(helpers),
    ));
    let remote_branches_controller = Rc::new(RemoteBranchesController::new(
        Rc::clone(helpers),
        Rc::clone(&contexts.remote_branches),
    ));
    let menu_controller = Rc::new(MenuController::new(
        Rc::clone(common),
        Rc::clone(&contexts.menu),
    ));
    let local_commits_controller = Rc::new(LocalCommitsController::new(
        Rc::clone(common),
        Rc::clone(&contexts.local_commits),
    ));
    let tags_controller = Rc::new(TagsController::new(
        Rc::clone(helpers),
        Rc::clone(&contexts.tags),
    ));
    let files_controller = Rc::new(FilesController::new(
        Rc::clone(common),
        Rc::clone(&contexts.files),
    ));
    let set_remote_branches = {
        let state = Rc::clone(&common.state);
        Box::new(move |branches| {
            state.borrow_mut().model.remote_branches = branches;
        })
    };
    let remotes_controller = Rc::new(RemotesController::new(
        Rc::clone(common),
        Rc::clone(&contexts.remotes),
        set_remote_branches,
    ));
    let undo_controller = Rc::new(UndoController::new(Rc::clone(common)));
    let global_controller = Rc::new(GlobalController::new(Rc::clone(common)));
    let branches_controller = Rc::new(BranchesController::new(
        Rc::clone(common),
        Rc::clone(helpers),
        Rc::clone(&contexts.branches),
    ));
    let git_flow_controller = Rc::new(GitFlowController::new(
        Rc::clone(common),
        Rc::clone(&contexts.branches),
    ));
    let files_remove_controller = Rc::new(FilesRemoveController::new(
        Rc::clone(common),
        Rc::clone(&contexts.files),
    ));
    let stash_controller = Rc::new(StashController::new(
        Rc::clone(common),
        Rc::clone(&contexts.stash),
    ));
    let commit_files_controller = Rc::new(CommitFilesController::new(
        Rc::clone(common),
        Rc::clone(helpers),
        Rc::clone(&contexts.commit_files),
    ));

    registry.attach(
        ContextKey::Files,
        vec![
            Rc::clone(&files_controller) as Rc<dyn Controller>,
            Rc::clone(&files_remove_controller) as Rc<dyn Controller>,
        ],
    )?;
    registry.attach(
        ContextKey::Tags,
        vec![tags_controller as Rc<dyn Controller>],
    )?;
    registry.attach(
        ContextKey::Submodules,
        vec![submodules_controller as Rc<dyn Controller>],
    )?;
    registry.attach(
        ContextKey::LocalCommits,
        vec![
            Rc::clone(&local_commits_controller) as Rc<dyn Controller>,
            Rc::clone(&bisect_controller) as Rc<dyn Controller>,
        ],
    )?;
    registry.attach(
        ContextKey::Branches,
        vec![
            branches_controller as Rc<dyn Controller>,
            git_flow_controller as Rc<dyn Controller>,
        ],
    )?;
    // The local-commits pair is attached a second time; attachment is
    // additive and both copies carry the same binding tables, so resolution
    // is unaffected.
    registry.attach(
        ContextKey::LocalCommits,
        vec![
            local_commits_controller as Rc<dyn Controller>,
            bisect_controller as Rc<dyn Controller>,
        ],
    )?;
    registry.attach(
        ContextKey::CommitFiles,
        vec![commit_files_controller as Rc<dyn Controller>],
    )?;
    registry.attach(
        ContextKey::Remotes,
        vec![remotes_controller as Rc<dyn Controller>],
    )?;
    registry.attach(
        ContextKey::Stash,
        vec![stash_controller as Rc<dyn Controller>],
    )?;
    registry.attach(
        ContextKey::Menu,
        vec![menu_controller as Rc<dyn Controller>],
    )?;
    registry.attach(
        contexts.commit_message.key(),
        vec![commit_message_controller as Rc<dyn Controller>],
    )?;
    registry.attach(
        ContextKey::RemoteBranches,
        vec![remote_branches_controller as Rc<dyn Controller>],
    )?;
    registry.attach(
        contexts.global.key(),
        vec![
            sync_controller as Rc<dyn Controller>,
            undo_controller as Rc<dyn Controller>,
            global_controller as Rc<dyn Controller>,
        ],
    )?;

    Ok(())
}

/// Navigation defaults come last for every list-capable context so that any
/// identically-keyed binding above them wins.
fn attach_list_defaults(registry: &mut ControllerRegistry, contexts: &Contexts) -> Result<()> {
    let factory = ListControllerFactory::new();
    for context in contexts.list_contexts() {
        let key = context.key();
        registry.attach(key, vec![factory.create(context) as Rc<dyn Controller>])?;
    }
    Ok(())
}


#[cfg(test)]
mod tests {
    use super::context::ListContext;
    use super::testing::TestHarness;
    use super::*;

    struct Setup {
        _harness: TestHarness,
        contexts: Contexts,
        registry: ControllerRegistry,
    }

    fn generic_only_setup() -> Setup {
        let harness = TestHarness::new();
        let contexts = Contexts::new(&harness.state);
        let mut registry = ControllerRegistry::new(ContextKey::all());
        let helpers = Rc::new(Helpers::new(Rc::clone(&harness.common)));
        attach_generic_controllers(&mut registry, &harness.common, &helpers, &contexts)
            .expect("generic attachment succeeds");
        Setup {
            _harness: harness,
            contexts,
            registry,
        }
    }

    fn full_setup() -> Setup {
        let harness = TestHarness::new();
        let contexts = Contexts::new(&harness.state);
        let mut registry = ControllerRegistry::new(ContextKey::all());
        attach_controllers(&mut registry, &harness.common, &contexts)
            .expect("full attachment succeeds");
        Setup {
            _harness: harness,
            contexts,
            registry,
        }
    }

    #[test]
    fn commit_list_contexts_resolve_generic_keys_before_domain_attachment() {
        let setup = generic_only_setup();
        for context in [
            ContextKey::LocalCommits,
            ContextKey::ReflogCommits,
            ContextKey::SubCommits,
        ] {
            for key in ["y", "o", "space", "T", "ctrl+e"] {
                assert!(
                    setup.registry.resolve(context, key).is_some(),
                    "{key} should resolve on {}",
                    context.as_str()
                );
            }
        }
    }

    #[test]
    fn capability_categories_are_additive() {
        let setup = generic_only_setup();
        // Reflog commits qualifies for both the sub-commits switch and the
        // commit-list actions.
        assert!(
            setup
                .registry
                .resolve(ContextKey::ReflogCommits, "enter")
                .is_some()
        );
        assert!(
            setup
                .registry
                .resolve(ContextKey::ReflogCommits, "y")
                .is_some()
        );
    }

    #[test]
    fn every_context_has_a_controller_after_full_setup() {
        let setup = full_setup();
        for key in ContextKey::all() {
            assert!(
                setup.registry.attached_count(*key) > 0,
                "{} left unattached",
                key.as_str()
            );
        }
    }

    #[test]
    fn local_commits_pair_is_attached_twice() {
        let setup = full_setup();
        // switch-to-diff-files + basic-commits + the pair twice + navigation.
        assert_eq!(setup.registry.attached_count(ContextKey::LocalCommits), 7);
        assert!(setup.registry.resolve(ContextKey::LocalCommits, "b").is_some());
    }

    #[test]
    fn navigation_defaults_resolve_on_every_list_context() {
        let setup = full_setup();
        for context in setup.contexts.list_contexts() {
            let binding = setup
                .registry
                .resolve(context.key(), "down")
                .unwrap_or_else(|| panic!("down unresolved on {}", context.key().as_str()));
            assert_eq!(binding.description, "next item");
        }
    }

    #[test]
    fn domain_enter_shadows_nothing_but_wins_over_navigation() {
        let setup = full_setup();
        // "d" on files belongs to the remove controller, not a navigation
        // default or the primary files controller.
        let binding = setup
            .registry
            .resolve(ContextKey::Files, "d")
            .expect("d resolves");
        assert_eq!(binding.description, "discard file changes");
    }

    #[test]
    fn global_context_carries_the_session_bindings() {
        let setup = full_setup();
        for key in ["p", "P", "f", "z", "q", "R", "x"] {
            assert!(setup.registry.resolve(ContextKey::Global, key).is_some());
        }
    }

    #[test]
    fn zero_item_lists_navigate_without_errors_after_full_setup() {
        let setup = full_setup();
        for context in setup.contexts.list_contexts() {
            let binding = setup
                .registry
                .resolve(context.key(), "down")
                .expect("navigation binding");
            (binding.handler)().expect("empty navigation is a no-op");
            assert_eq!(context.selected_index(), 0);
        }
    }

    #[test]
    fn keybinding_listing_prefers_the_resolution_winner() {
        let setup = full_setup();
        let listing = setup.registry.bindings_for(ContextKey::Files);
        let first_key = listing.first().map(|(key, _)| *key);
        assert_eq!(first_key, Some("d"));
        assert!(listing.iter().any(|(key, _)| *key == "space"));
        assert!(listing.iter().any(|(key, _)| *key == "down"));
    }
}
