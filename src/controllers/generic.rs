use std::rc::Rc;
use std::sync::Arc;

use anyhow::Context as _;

use super::context::{CanSwitchToDiffFiles, CanSwitchToSubCommits, ContainsCommits};
use super::helpers::Helpers;
use super::{Binding, Controller, ControllerCommon};
use crate::app::AppEvent;

/// Opens the commit history of the selected ref as the sub-commits view.
/// One instance per qualifying context; the context supplies the ref.
pub struct SwitchToSubCommitsController {
    bindings: Vec<Binding>,
}

impl SwitchToSubCommitsController {
    pub fn new(common: Rc<ControllerCommon>, context: Rc<dyn CanSwitchToSubCommits>) -> Self {
        let limit = common.config.commit_limit;
        let bindings = vec![Binding {
            key: "enter",
            description: "view commits",
            handler: Box::new(move || {
                let Some(ref_name) = context.selected_ref_name() else {
                    return Ok(());
                };
                let git = Arc::clone(&common.git);
                let tx = common.event_tx.clone();
                common.set_status(format!("Loading commits of {ref_name}…"));
                tokio::spawn(async move {
                    let result = git
                        .commits_for_ref(&ref_name, limit)
                        .await
                        .map_err(|err| err.to_string());
                    let _ = tx.send(AppEvent::SubCommitsLoaded { ref_name, result });
                });
                Ok(())
            }),
        }];
        Self { bindings }
    }
}

impl Controller for SwitchToSubCommitsController {
    fn bindings(&self) -> &[Binding] {
        &self.bindings
    }
}

/// Opens the changed files of the selected ref as the commit-files view.
pub struct SwitchToDiffFilesController {
    bindings: Vec<Binding>,
}

impl SwitchToDiffFilesController {
    pub fn new(common: Rc<ControllerCommon>, context: Rc<dyn CanSwitchToDiffFiles>) -> Self {
        let bindings = vec![Binding {
            key: "enter",
            description: "view changed files",
            handler: Box::new(move || {
                let Some(ref_name) = context.selected_diff_ref() else {
                    return Ok(());
                };
                let git = Arc::clone(&common.git);
                let tx = common.event_tx.clone();
                common.set_status(format!("Loading files of {ref_name}…"));
                tokio::spawn(async move {
                    let result = git
                        .files_for_ref(&ref_name)
                        .await
                        .map_err(|err| err.to_string());
                    let _ = tx.send(AppEvent::CommitFilesLoaded { ref_name, result });
                });
                Ok(())
            }),
        }];
        Self { bindings }
    }
}

impl Controller for SwitchToDiffFilesController {
    fn bindings(&self) -> &[Binding] {
        &self.bindings
    }
}

/// Actions available on any commit list: copy, open in browser, check out,
/// tag, diff against.
pub struct BasicCommitsController {
    bindings: Vec<Binding>,
}

impl BasicCommitsController {
    pub fn new(
        common: Rc<ControllerCommon>,
        helpers: Rc<Helpers>,
        context: Rc<dyn ContainsCommits>,
    ) -> Self {
        let copy_common = Rc::clone(&common);
        let copy_context = Rc::clone(&context);
        let browse_helpers = Rc::clone(&helpers);
        let browse_context = Rc::clone(&context);
        let checkout_helpers = Rc::clone(&helpers);
        let checkout_context = Rc::clone(&context);
        let tag_helpers = Rc::clone(&helpers);
        let tag_context = Rc::clone(&context);
        let diff_common = Rc::clone(&common);
        let diff_context = context;

        let bindings = vec![
            Binding {
                key: "y",
                description: "copy commit sha",
                handler: Box::new(move || {
                    let Some(commit) = copy_context.selected_commit() else {
                        return Ok(());
                    };
                    copy_common
                        .os
                        .copy_to_clipboard(&commit.sha)
                        .context("failed copying commit sha")?;
                    copy_common.set_status(format!("Copied {}", commit.short_sha()));
                    Ok(())
                }),
            },
            Binding {
                key: "o",
                description: "open commit in browser",
                handler: Box::new(move || {
                    let Some(commit) = browse_context.selected_commit() else {
                        return Ok(());
                    };
                    browse_helpers.host.open_commit_in_browser(&commit.sha)
                }),
            },
            Binding {
                key: "space",
                description: "check out commit",
                handler: Box::new(move || {
                    if let Some(commit) = checkout_context.selected_commit() {
                        checkout_helpers.refs.checkout_commit(&commit.sha);
                    }
                    Ok(())
                }),
            },
            Binding {
                key: "T",
                description: "tag commit",
                handler: Box::new(move || {
                    if let Some(commit) = tag_context.selected_commit() {
                        tag_helpers.tags.open_create_tag_input(&commit.sha);
                    }
                    Ok(())
                }),
            },
            Binding {
                key: "ctrl+e",
                description: "toggle diff against commit",
                handler: Box::new(move || {
                    let Some(commit) = diff_context.selected_commit() else {
                        return Ok(());
                    };
                    let mut state = diff_common.state.borrow_mut();
                    if state.modes.diffing.as_deref() == Some(commit.sha.as_str()) {
                        state.modes.diffing = None;
                        state.set_status("Stopped diffing");
                    } else {
                        state.set_status(format!("Diffing against {}", commit.short_sha()));
                        state.modes.diffing = Some(commit.sha);
                    }
                    Ok(())
                }),
            },
        ];
        Self { bindings }
    }
}

impl Controller for BasicCommitsController {
    fn bindings(&self) -> &[Binding] {
        &self.bindings
    }
}
