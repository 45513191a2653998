use std::rc::Rc;

use super::context::{ContextKey, FilesContext, ListContext};
use super::{Binding, Controller, ControllerCommon};
use crate::git::GitAction;
use crate::state::InputPurpose;

/// Primary behavior of the working-tree files panel: staging, committing,
/// stashing, editing.
pub struct FilesController {
    bindings: Vec<Binding>,
}

impl FilesController {
    pub fn new(common: Rc<ControllerCommon>, context: Rc<FilesContext>) -> Self {
        let stage_common = Rc::clone(&common);
        let stage_context = Rc::clone(&context);
        let all_common = Rc::clone(&common);
        let commit_common = Rc::clone(&common);
        let edit_common = Rc::clone(&common);
        let edit_context = Rc::clone(&context);
        let stash_common = common;
        let stash_context = context;

        let bindings = vec![
            Binding {
                key: "space",
                description: "stage / unstage file",
                handler: Box::new(move || {
                    let index = stage_context.selected_index();
                    let file = {
                        let state = stage_common.state.borrow();
                        state.model.files.get(index).cloned()
                    };
                    let Some(file) = file else { return Ok(()) };
                    let action = if file.has_staged_changes() {
                        GitAction::UnstageFile { path: file.path }
                    } else {
                        GitAction::StageFile { path: file.path }
                    };
                    stage_common.run_action(action);
                    Ok(())
                }),
            },
            Binding {
                key: "a",
                description: "stage / unstage all",
                handler: Box::new(move || {
                    let any_unstaged = {
                        let state = all_common.state.borrow();
                        state
                            .model
                            .files
                            .iter()
                            .any(|file| file.has_unstaged_changes())
                    };
                    let action = if any_unstaged {
                        GitAction::StageAll
                    } else {
                        GitAction::UnstageAll
                    };
                    all_common.run_action(action);
                    Ok(())
                }),
            },
            Binding {
                key: "c",
                description: "commit staged changes",
                handler: Box::new(move || {
                    let mut state = commit_common.state.borrow_mut();
                    if state.commit_message.buffer.is_empty() {
                        let saved = state.commit_message.saved.clone();
                        state.commit_message.buffer = saved;
                    }
                    state.push_context(ContextKey::CommitMessage);
                    Ok(())
                }),
            },
            Binding {
                key: "e",
                description: "edit file",
                handler: Box::new(move || {
                    if let Some(path) = edit_context.selected_file_path() {
                        edit_common.state.borrow_mut().pending_edit = Some(path);
                    }
                    Ok(())
                }),
            },
            Binding {
                key: "s",
                description: "stash changes",
                handler: Box::new(move || {
                    if stash_context.is_empty() {
                        stash_common.set_status("Nothing to stash");
                        return Ok(());
                    }
                    stash_common.open_input(InputPurpose::StashMessage, "Stash message");
                    Ok(())
                }),
            },
        ];
        Self { bindings }
    }
}

impl Controller for FilesController {
    fn bindings(&self) -> &[Binding] {
        &self.bindings
    }
}

/// Destructive working-tree operations, kept apart from the primary files
/// controller.
pub struct FilesRemoveController {
    bindings: Vec<Binding>,
}

impl FilesRemoveController {
    pub fn new(common: Rc<ControllerCommon>, context: Rc<FilesContext>) -> Self {
        let discard_common = Rc::clone(&common);
        let discard_context = context;
        let nuke_common = common;

        let bindings = vec![
            Binding {
                key: "d",
                description: "discard file changes",
                handler: Box::new(move || {
                    if let Some(path) = discard_context.selected_file_path() {
                        discard_common.confirm(
                            format!("Discard changes to '{path}'?"),
                            GitAction::DiscardFile { path },
                        );
                    }
                    Ok(())
                }),
            },
            Binding {
                key: "D",
                description: "discard all changes",
                handler: Box::new(move || {
                    nuke_common.confirm(
                        "Discard ALL working tree changes?",
                        GitAction::DiscardAll,
                    );
                    Ok(())
                }),
            },
        ];
        Self { bindings }
    }
}

impl Controller for FilesRemoveController {
    fn bindings(&self) -> &[Binding] {
        &self.bindings
    }
}
