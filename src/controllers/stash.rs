use std::rc::Rc;

use super::context::StashContext;
use super::{Binding, Controller, ControllerCommon};
use crate::git::GitAction;

pub struct StashController {
    bindings: Vec<Binding>,
}

impl StashController {
    pub fn new(common: Rc<ControllerCommon>, context: Rc<StashContext>) -> Self {
        let apply_common = Rc::clone(&common);
        let apply_context = Rc::clone(&context);
        let pop_common = Rc::clone(&common);
        let pop_context = Rc::clone(&context);
        let drop_common = common;
        let drop_context = context;

        let bindings = vec![
            Binding {
                key: "space",
                description: "apply stash entry",
                handler: Box::new(move || {
                    if let Some(entry) = apply_context.selected_entry() {
                        apply_common.run_action(GitAction::StashApply { index: entry.index });
                    }
                    Ok(())
                }),
            },
            Binding {
                key: "g",
                description: "pop stash entry",
                handler: Box::new(move || {
                    if let Some(entry) = pop_context.selected_entry() {
                        pop_common.run_action(GitAction::StashPop { index: entry.index });
                    }
                    Ok(())
                }),
            },
            Binding {
                key: "d",
                description: "drop stash entry",
                handler: Box::new(move || {
                    if let Some(entry) = drop_context.selected_entry() {
                        drop_common.confirm(
                            format!("Drop {} ({})?", entry.ref_name(), entry.message),
                            GitAction::StashDrop { index: entry.index },
                        );
                    }
                    Ok(())
                }),
            },
        ];
        Self { bindings }
    }
}

impl Controller for StashController {
    fn bindings(&self) -> &[Binding] {
        &self.bindings
    }
}
