use std::rc::Rc;

use super::context::BranchesContext;
use super::helpers::Helpers;
use super::{Binding, Controller, ControllerCommon};
use crate::git::GitAction;
use crate::state::InputPurpose;

pub struct BranchesController {
    bindings: Vec<Binding>,
}

impl BranchesController {
    pub fn new(
        common: Rc<ControllerCommon>,
        helpers: Rc<Helpers>,
        context: Rc<BranchesContext>,
    ) -> Self {
        let checkout_helpers = Rc::clone(&helpers);
        let checkout_context = Rc::clone(&context);
        let new_common = Rc::clone(&common);
        let delete_common = Rc::clone(&common);
        let delete_context = Rc::clone(&context);
        let merge_helpers = Rc::clone(&helpers);
        let merge_context = Rc::clone(&context);
        let rebase_helpers = helpers;
        let rebase_context = Rc::clone(&context);
        let diff_common = common;
        let diff_context = context;

        let bindings = vec![
            Binding {
                key: "space",
                description: "check out branch",
                handler: Box::new(move || {
                    if let Some(name) = checkout_context.selected_branch_name() {
                        checkout_helpers.refs.checkout_ref(&name);
                    }
                    Ok(())
                }),
            },
            Binding {
                key: "n",
                description: "new branch",
                handler: Box::new(move || {
                    new_common.open_input(InputPurpose::NewBranch, "New branch name");
                    Ok(())
                }),
            },
            Binding {
                key: "d",
                description: "delete branch",
                handler: Box::new(move || {
                    if let Some(name) = delete_context.selected_branch_name() {
                        delete_common.confirm(
                            format!("Delete branch '{name}'?"),
                            GitAction::DeleteBranch { name },
                        );
                    }
                    Ok(())
                }),
            },
            Binding {
                key: "M",
                description: "merge into checked-out branch",
                handler: Box::new(move || {
                    if let Some(name) = merge_context.selected_branch_name() {
                        merge_helpers.merge_and_rebase.merge_ref(&name);
                    }
                    Ok(())
                }),
            },
            Binding {
                key: "r",
                description: "rebase checked-out branch onto branch",
                handler: Box::new(move || {
                    if let Some(name) = rebase_context.selected_branch_name() {
                        rebase_helpers.merge_and_rebase.rebase_onto(&name);
                    }
                    Ok(())
                }),
            },
            Binding {
                key: "ctrl+e",
                description: "toggle diff against branch",
                handler: Box::new(move || {
                    let Some(name) = diff_context.selected_branch_name() else {
                        return Ok(());
                    };
                    let mut state = diff_common.state.borrow_mut();
                    if state.modes.diffing.as_deref() == Some(name.as_str()) {
                        state.modes.diffing = None;
                        state.set_status("Stopped diffing");
                    } else {
                        state.set_status(format!("Diffing against {name}"));
                        state.modes.diffing = Some(name);
                    }
                    Ok(())
                }),
            },
        ];
        Self { bindings }
    }
}

impl Controller for BranchesController {
    fn bindings(&self) -> &[Binding] {
        &self.bindings
    }
}

/// Finishes a git-flow style branch (`feature/x`, `hotfix/y`, …).
pub struct GitFlowController {
    bindings: Vec<Binding>,
}

impl GitFlowController {
    pub fn new(common: Rc<ControllerCommon>, context: Rc<BranchesContext>) -> Self {
        let bindings = vec![Binding {
            key: "i",
            description: "git flow finish branch",
            handler: Box::new(move || {
                let Some(name) = context.selected_branch_name() else {
                    return Ok(());
                };
                if !name.contains('/') {
                    common.set_status(format!("'{name}' is not a git-flow branch"));
                    return Ok(());
                }
                common.confirm(
                    format!("Finish git-flow branch '{name}'?"),
                    GitAction::GitFlowFinish { name },
                );
                Ok(())
            }),
        }];
        Self { bindings }
    }
}

impl Controller for GitFlowController {
    fn bindings(&self) -> &[Binding] {
        &self.bindings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controllers::context::ListContext;
    use crate::controllers::testing::TestHarness;
    use crate::domain::Branch;

    fn branch(name: &str) -> Branch {
        Branch {
            name: name.to_string(),
            ..Branch::default()
        }
    }

    #[test]
    fn checkout_confirms_with_the_selected_branch() {
        let harness = TestHarness::new();
        harness.state.borrow_mut().model.branches = vec![branch("main"), branch("dev")];
        let context = Rc::new(BranchesContext::new(Rc::clone(&harness.state)));
        context.set_selected_index(1);
        let controller = BranchesController::new(
            Rc::clone(&harness.common),
            Rc::clone(&harness.helpers),
            context,
        );
        let checkout = controller
            .bindings()
            .iter()
            .find(|binding| binding.key == "space")
            .expect("binding exists");
        (checkout.handler)().expect("checkout runs");

        let state = harness.state.borrow();
        let confirmation = state.confirmation.as_ref().expect("confirmation pending");
        assert_eq!(confirmation.action, GitAction::Checkout {
            ref_name: "dev".to_string()
        });
    }

    #[test]
    fn git_flow_finish_rejects_unprefixed_branches() {
        let harness = TestHarness::new();
        harness.state.borrow_mut().model.branches = vec![branch("main")];
        let context = Rc::new(BranchesContext::new(Rc::clone(&harness.state)));
        let controller = GitFlowController::new(Rc::clone(&harness.common), context);
        (controller.bindings()[0].handler)().expect("handler runs");

        let state = harness.state.borrow();
        assert!(state.confirmation.is_none());
        assert!(state.status_line.contains("not a git-flow branch"));
    }
}
