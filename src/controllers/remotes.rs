use std::rc::Rc;

use super::context::{ContextKey, RemoteBranchesContext, RemotesContext};
use super::helpers::Helpers;
use super::{Binding, Controller, ControllerCommon};
use crate::domain::RemoteBranch;
use crate::git::GitAction;

pub struct RemotesController {
    bindings: Vec<Binding>,
}

impl RemotesController {
    /// `set_remote_branches` replaces the derived remote-branches list when
    /// the user drills into a remote.
    pub fn new(
        common: Rc<ControllerCommon>,
        context: Rc<RemotesContext>,
        set_remote_branches: Box<dyn Fn(Vec<RemoteBranch>)>,
    ) -> Self {
        let enter_common = Rc::clone(&common);
        let enter_context = Rc::clone(&context);
        let fetch_common = Rc::clone(&common);
        let fetch_context = Rc::clone(&context);
        let remove_common = common;
        let remove_context = context;

        let bindings = vec![
            Binding {
                key: "enter",
                description: "view remote branches",
                handler: Box::new(move || {
                    let Some(remote) = enter_context.selected_remote() else {
                        return Ok(());
                    };
                    set_remote_branches(remote.branches);
                    enter_common
                        .state
                        .borrow_mut()
                        .push_context(ContextKey::RemoteBranches);
                    Ok(())
                }),
            },
            Binding {
                key: "f",
                description: "fetch remote",
                handler: Box::new(move || {
                    if let Some(remote) = fetch_context.selected_remote() {
                        fetch_common.run_action(GitAction::FetchRemote { name: remote.name });
                    }
                    Ok(())
                }),
            },
            Binding {
                key: "d",
                description: "remove remote",
                handler: Box::new(move || {
                    if let Some(remote) = remove_context.selected_remote() {
                        remove_common.confirm(
                            format!("Remove remote '{}'?", remote.name),
                            GitAction::DeleteRemote { name: remote.name },
                        );
                    }
                    Ok(())
                }),
            },
        ];
        Self { bindings }
    }
}

impl Controller for RemotesController {
    fn bindings(&self) -> &[Binding] {
        &self.bindings
    }
}

pub struct RemoteBranchesController {
    bindings: Vec<Binding>,
}

impl RemoteBranchesController {
    pub fn new(helpers: Rc<Helpers>, context: Rc<RemoteBranchesContext>) -> Self {
        let checkout_helpers = Rc::clone(&helpers);
        let checkout_context = Rc::clone(&context);
        let merge_helpers = helpers;
        let merge_context = context;

        let bindings = vec![
            Binding {
                key: "space",
                description: "check out remote branch",
                handler: Box::new(move || {
                    if let Some(branch) = checkout_context.selected_remote_branch() {
                        checkout_helpers.refs.checkout_ref(&branch.full_name());
                    }
                    Ok(())
                }),
            },
            Binding {
                key: "M",
                description: "merge into checked-out branch",
                handler: Box::new(move || {
                    if let Some(branch) = merge_context.selected_remote_branch() {
                        merge_helpers.merge_and_rebase.merge_ref(&branch.full_name());
                    }
                    Ok(())
                }),
            },
        ];
        Self { bindings }
    }
}

impl Controller for RemoteBranchesController {
    fn bindings(&self) -> &[Binding] {
        &self.bindings
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::controllers::context::ListContext;
    use crate::controllers::testing::TestHarness;
    use crate::domain::Remote;

    #[test]
    fn entering_a_remote_replaces_the_derived_list_and_switches_context() {
        let harness = TestHarness::new();
        harness.state.borrow_mut().model.remotes = vec![Remote {
            name: "origin".to_string(),
            url: "git@github.com:a/b.git".to_string(),
            branches: vec![RemoteBranch {
                remote_name: "origin".to_string(),
                name: "main".to_string(),
            }],
        }];
        let context = Rc::new(RemotesContext::new(Rc::clone(&harness.state)));
        context.set_selected_index(0);

        let replaced: Rc<RefCell<Vec<RemoteBranch>>> = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&replaced);
        let controller = RemotesController::new(
            Rc::clone(&harness.common),
            context,
            Box::new(move |branches| {
                *sink.borrow_mut() = branches;
            }),
        );
        let enter = controller
            .bindings()
            .iter()
            .find(|binding| binding.key == "enter")
            .expect("binding exists");
        (enter.handler)().expect("enter runs");

        assert_eq!(replaced.borrow().len(), 1);
        assert_eq!(
            harness.state.borrow().current_context(),
            ContextKey::RemoteBranches
        );
    }
}
