use std::rc::Rc;

use super::helpers::Helpers;
use super::{Binding, Controller, ControllerCommon};

/// Commit-message entry. Plain character input is fed into the buffer by the
/// event loop; this controller owns the confirm/cancel bindings.
pub struct CommitMessageController {
    bindings: Vec<Binding>,
}

impl CommitMessageController {
    pub fn new(common: Rc<ControllerCommon>, helpers: Rc<Helpers>) -> Self {
        let confirm_common = Rc::clone(&common);
        let cancel_common = common;

        let bindings = vec![
            Binding {
                key: "enter",
                description: "commit",
                handler: Box::new(move || {
                    let message = {
                        let mut state = confirm_common.state.borrow_mut();
                        let message = state.commit_message.buffer.trim().to_string();
                        if message.is_empty() {
                            state.set_status("Commit message is empty");
                            return Ok(());
                        }
                        // Keep the draft until the commit is known to have
                        // succeeded.
                        state.commit_message.saved = message.clone();
                        state.commit_message.buffer.clear();
                        state.pop_context();
                        message
                    };
                    helpers.gpg.commit(message);
                    Ok(())
                }),
            },
            Binding {
                key: "esc",
                description: "cancel commit",
                handler: Box::new(move || {
                    let mut state = cancel_common.state.borrow_mut();
                    let draft = std::mem::take(&mut state.commit_message.buffer);
                    if !draft.is_empty() {
                        state.commit_message.saved = draft;
                    }
                    state.pop_context();
                    Ok(())
                }),
            },
        ];
        Self { bindings }
    }
}

impl Controller for CommitMessageController {
    fn bindings(&self) -> &[Binding] {
        &self.bindings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controllers::context::ContextKey;
    use crate::controllers::testing::TestHarness;

    fn controller(harness: &TestHarness) -> CommitMessageController {
        CommitMessageController::new(Rc::clone(&harness.common), Rc::clone(&harness.helpers))
    }

    #[tokio::test]
    async fn enter_commits_and_saves_the_draft() {
        let harness = TestHarness::new();
        {
            let mut state = harness.state.borrow_mut();
            state.push_context(ContextKey::CommitMessage);
            state.commit_message.buffer = "  fix parser  ".to_string();
        }
        let controller = controller(&harness);
        let enter = controller
            .bindings()
            .iter()
            .find(|binding| binding.key == "enter")
            .expect("binding exists");
        (enter.handler)().expect("commit runs");

        let state = harness.state.borrow();
        assert_eq!(state.commit_message.saved, "fix parser");
        assert!(state.commit_message.buffer.is_empty());
        assert_ne!(state.current_context(), ContextKey::CommitMessage);
        assert!(state.status_line.contains("git commit -m <message>"));
    }

    #[test]
    fn enter_with_empty_buffer_stays_put() {
        let harness = TestHarness::new();
        harness
            .state
            .borrow_mut()
            .push_context(ContextKey::CommitMessage);
        let controller = controller(&harness);
        let enter = controller
            .bindings()
            .iter()
            .find(|binding| binding.key == "enter")
            .expect("binding exists");
        (enter.handler)().expect("empty message is a no-op");

        let state = harness.state.borrow();
        assert_eq!(state.current_context(), ContextKey::CommitMessage);
        assert!(state.status_line.contains("empty"));
    }

    #[test]
    fn escape_preserves_the_draft() {
        let harness = TestHarness::new();
        {
            let mut state = harness.state.borrow_mut();
            state.push_context(ContextKey::CommitMessage);
            state.commit_message.buffer = "wip".to_string();
        }
        let controller = controller(&harness);
        let escape = controller
            .bindings()
            .iter()
            .find(|binding| binding.key == "esc")
            .expect("binding exists");
        (escape.handler)().expect("cancel runs");

        let state = harness.state.borrow();
        assert_eq!(state.commit_message.saved, "wip");
        assert_ne!(state.current_context(), ContextKey::CommitMessage);
    }
}
