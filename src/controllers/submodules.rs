use std::rc::Rc;

use super::context::SubmodulesContext;
use super::{Binding, Controller, ControllerCommon};
use crate::git::GitAction;

pub struct SubmodulesController {
    bindings: Vec<Binding>,
}

impl SubmodulesController {
    pub fn new(common: Rc<ControllerCommon>, context: Rc<SubmodulesContext>) -> Self {
        let update_common = Rc::clone(&common);
        let update_context = Rc::clone(&context);
        let sync_common = common;
        let sync_context = context;

        let bindings = vec![
            Binding {
                key: "u",
                description: "update submodule",
                handler: Box::new(move || {
                    if let Some(path) = update_context.selected_submodule_path() {
                        update_common.run_action(GitAction::SubmoduleUpdate { path });
                    }
                    Ok(())
                }),
            },
            Binding {
                key: "s",
                description: "sync submodule url",
                handler: Box::new(move || {
                    if let Some(path) = sync_context.selected_submodule_path() {
                        sync_common.run_action(GitAction::SubmoduleSync { path });
                    }
                    Ok(())
                }),
            },
        ];
        Self { bindings }
    }
}

impl Controller for SubmodulesController {
    fn bindings(&self) -> &[Binding] {
        &self.bindings
    }
}
