use std::rc::Rc;

use anyhow::Context as _;

use super::context::{CommitFilesContext, ContainsCommits, LocalCommitsContext};
use super::helpers::Helpers;
use super::{Binding, Controller, ControllerCommon};
use crate::git::GitAction;
use crate::state::{MenuAction, MenuItem};

pub struct LocalCommitsController {
    bindings: Vec<Binding>,
}

impl LocalCommitsController {
    pub fn new(common: Rc<ControllerCommon>, context: Rc<LocalCommitsContext>) -> Self {
        let reset_common = Rc::clone(&common);
        let reset_context = Rc::clone(&context);
        let amend_common = common;

        let bindings = vec![
            Binding {
                key: "g",
                description: "reset to commit",
                handler: Box::new(move || {
                    let Some(commit) = reset_context.selected_commit() else {
                        return Ok(());
                    };
                    let items = vec![
                        MenuItem {
                            label: format!("Soft reset to {}", commit.short_sha()),
                            action: MenuAction::Git(GitAction::ResetSoft {
                                ref_name: commit.sha.clone(),
                            }),
                        },
                        MenuItem {
                            label: format!("Hard reset to {}", commit.short_sha()),
                            action: MenuAction::Git(GitAction::ResetHard {
                                ref_name: commit.sha,
                            }),
                        },
                    ];
                    reset_common.open_menu("Reset", items);
                    Ok(())
                }),
            },
            Binding {
                key: "A",
                description: "amend head commit with staged changes",
                handler: Box::new(move || {
                    amend_common.confirm(
                        "Amend the head commit with staged changes?",
                        GitAction::AmendHead,
                    );
                    Ok(())
                }),
            },
        ];
        Self { bindings }
    }
}

impl Controller for LocalCommitsController {
    fn bindings(&self) -> &[Binding] {
        &self.bindings
    }
}

pub struct BisectController {
    bindings: Vec<Binding>,
}

impl BisectController {
    pub fn new(helpers: Rc<Helpers>, context: Rc<LocalCommitsContext>) -> Self {
        let bindings = vec![Binding {
            key: "b",
            description: "bisect from commit",
            handler: Box::new(move || {
                if let Some(commit) = context.selected_commit() {
                    helpers.bisect.open_bisect_menu(&commit.sha);
                }
                Ok(())
            }),
        }];
        Self { bindings }
    }
}

impl Controller for BisectController {
    fn bindings(&self) -> &[Binding] {
        &self.bindings
    }
}

pub struct CommitFilesController {
    bindings: Vec<Binding>,
}

impl CommitFilesController {
    pub fn new(
        common: Rc<ControllerCommon>,
        helpers: Rc<Helpers>,
        context: Rc<CommitFilesContext>,
    ) -> Self {
        let checkout_common = Rc::clone(&common);
        let checkout_context = Rc::clone(&context);
        let copy_common = common;
        let copy_context = context;

        let bindings = vec![
            Binding {
                key: "c",
                description: "check out file from commit",
                handler: Box::new(move || {
                    let Some(file) = checkout_context.selected_commit_file() else {
                        return Ok(());
                    };
                    let ref_name = {
                        let state = checkout_common.state.borrow();
                        state.model.commit_files_ref.clone()
                    };
                    let Some(ref_name) = ref_name else { return Ok(()) };
                    helpers.patch_building.checkout_file_from(&ref_name, &file.path);
                    Ok(())
                }),
            },
            Binding {
                key: "y",
                description: "copy file path",
                handler: Box::new(move || {
                    let Some(file) = copy_context.selected_commit_file() else {
                        return Ok(());
                    };
                    copy_common
                        .os
                        .copy_to_clipboard(&file.path)
                        .context("failed copying file path")?;
                    copy_common.set_status(format!("Copied {}", file.path));
                    Ok(())
                }),
            },
        ];
        Self { bindings }
    }
}

impl Controller for CommitFilesController {
    fn bindings(&self) -> &[Binding] {
        &self.bindings
    }
}
