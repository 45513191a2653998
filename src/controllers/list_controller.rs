use std::rc::Rc;

use super::context::ListContext;
use super::{Binding, Controller};

const PAGE_JUMP: usize = 10;

/// Produces the default navigation/selection controller for any list-capable
/// context. Created once and invoked per context during setup; the result is
/// attached after everything else and resolves in the fallback tier so that
/// identically-keyed domain bindings shadow it.
pub struct ListControllerFactory;

impl ListControllerFactory {
    pub fn new() -> Self {
        Self
    }

    pub fn create(&self, context: Rc<dyn ListContext>) -> Rc<ListController> {
        Rc::new(ListController::new(context))
    }
}

pub struct ListController {
    context: Rc<dyn ListContext>,
    bindings: Vec<Binding>,
}

impl ListController {
    fn new(context: Rc<dyn ListContext>) -> Self {
        let moves: &[(&'static str, &'static str, isize, bool)] = &[
            ("up", "previous item", -1, false),
            ("k", "previous item", -1, false),
            ("down", "next item", 1, false),
            ("j", "next item", 1, false),
            ("pageup", "page up", -(PAGE_JUMP as isize), false),
            ("pagedown", "page down", PAGE_JUMP as isize, false),
            ("shift+up", "range select up", -1, true),
            ("shift+down", "range select down", 1, true),
        ];

        let mut bindings = Vec::new();
        for (key, description, delta, range) in moves.iter().copied() {
            let context = Rc::clone(&context);
            bindings.push(Binding {
                key,
                description,
                handler: Box::new(move || {
                    move_selection(context.as_ref(), delta, range);
                    Ok(())
                }),
            });
        }

        let top_context = Rc::clone(&context);
        bindings.push(Binding {
            key: "home",
            description: "jump to top",
            handler: Box::new(move || {
                if !top_context.is_empty() {
                    top_context.set_selected_index(0);
                    top_context.set_range_anchor(None);
                }
                Ok(())
            }),
        });

        let bottom_context = Rc::clone(&context);
        bindings.push(Binding {
            key: "end",
            description: "jump to bottom",
            handler: Box::new(move || {
                let len = bottom_context.len();
                if len > 0 {
                    bottom_context.set_selected_index(len - 1);
                    bottom_context.set_range_anchor(None);
                }
                Ok(())
            }),
        });

        Self { context, bindings }
    }
}

fn move_selection(context: &dyn ListContext, delta: isize, range: bool) {
    let len = context.len();
    if len == 0 {
        return;
    }
    let current = context.selected_index();
    if range && context.range_anchor().is_none() {
        context.set_range_anchor(Some(current));
    }
    if !range {
        context.set_range_anchor(None);
    }
    let next = if delta < 0 {
        current.saturating_sub(delta.unsigned_abs())
    } else {
        (current + delta.unsigned_abs()).min(len - 1)
    };
    context.set_selected_index(next);
}

impl Controller for ListController {
    fn bindings(&self) -> &[Binding] {
        &self.bindings
    }

    fn on_focus(&self) {
        // Re-clamps a selection left stale by a model refresh.
        self.context.set_selected_index(self.context.selected_index());
    }

    fn is_fallback(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::controllers::context::FilesContext;
    use crate::domain::StatusFile;
    use crate::state::AppState;

    fn file(path: &str) -> StatusFile {
        StatusFile {
            path: path.to_string(),
            staged_char: ' ',
            unstaged_char: 'M',
        }
    }

    fn populated_controller(count: usize) -> (Rc<RefCell<AppState>>, Rc<ListController>) {
        let state = Rc::new(RefCell::new(AppState::new()));
        state.borrow_mut().model.files = (0..count).map(|i| file(&format!("f{i}"))).collect();
        let context = Rc::new(FilesContext::new(Rc::clone(&state)));
        let controller = ListControllerFactory::new().create(context);
        (state, controller)
    }

    fn run(controller: &ListController, key: &str) {
        let binding = controller
            .bindings()
            .iter()
            .find(|binding| binding.key == key)
            .expect("binding exists");
        (binding.handler)().expect("navigation never fails");
    }

    fn selected(controller: &ListController) -> usize {
        controller.context.selected_index()
    }

    #[test]
    fn cursor_moves_and_clamps_at_the_edges() {
        let (_state, controller) = populated_controller(3);
        run(&controller, "down");
        run(&controller, "j");
        assert_eq!(selected(&controller), 2);
        run(&controller, "down");
        assert_eq!(selected(&controller), 2);
        run(&controller, "up");
        run(&controller, "k");
        run(&controller, "up");
        assert_eq!(selected(&controller), 0);
    }

    #[test]
    fn paging_and_jumps() {
        let (_state, controller) = populated_controller(25);
        run(&controller, "pagedown");
        assert_eq!(selected(&controller), 10);
        run(&controller, "end");
        assert_eq!(selected(&controller), 24);
        run(&controller, "pageup");
        assert_eq!(selected(&controller), 14);
        run(&controller, "home");
        assert_eq!(selected(&controller), 0);
    }

    #[test]
    fn range_selection_sets_an_anchor_and_plain_moves_clear_it() {
        let (_state, controller) = populated_controller(5);
        run(&controller, "down");
        run(&controller, "shift+down");
        run(&controller, "shift+down");
        assert_eq!(controller.context.range_anchor(), Some(1));
        assert_eq!(selected(&controller), 3);
        run(&controller, "up");
        assert_eq!(controller.context.range_anchor(), None);
    }

    #[test]
    fn empty_list_bindings_are_noops_not_errors() {
        let (_state, controller) = populated_controller(0);
        for key in ["up", "down", "pageup", "pagedown", "home", "end", "shift+down"] {
            run(&controller, key);
            assert_eq!(selected(&controller), 0);
        }
    }

    #[test]
    fn list_controller_is_a_fallback() {
        let (_state, controller) = populated_controller(1);
        assert!(controller.is_fallback());
    }
}
