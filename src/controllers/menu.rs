use std::rc::Rc;

use super::context::{ContextKey, ListContext, MenuContext};
use super::{Binding, Controller, ControllerCommon};
use crate::app::AppEvent;
use crate::state::MenuAction;

pub struct MenuController {
    context: Rc<MenuContext>,
    bindings: Vec<Binding>,
}

impl MenuController {
    pub fn new(common: Rc<ControllerCommon>, context: Rc<MenuContext>) -> Self {
        let execute_common = Rc::clone(&common);
        let execute_context = Rc::clone(&context);
        let close_common = common;

        let bindings = vec![
            Binding {
                key: "enter",
                description: "execute menu item",
                handler: Box::new(move || {
                    let Some(item) = execute_context.selected_item() else {
                        return Ok(());
                    };
                    close_menu(&execute_common);
                    match item.action {
                        MenuAction::Git(action) => execute_common.run_action(action),
                        MenuAction::DispatchKey { context, key } => {
                            let _ = execute_common
                                .event_tx
                                .send(AppEvent::DispatchKey { context, key });
                        }
                    }
                    Ok(())
                }),
            },
            Binding {
                key: "esc",
                description: "close menu",
                handler: Box::new(move || {
                    close_menu(&close_common);
                    Ok(())
                }),
            },
        ];
        Self { context, bindings }
    }
}

fn close_menu(common: &ControllerCommon) {
    let mut state = common.state.borrow_mut();
    state.menu = None;
    if state.current_context() == ContextKey::Menu {
        state.pop_context();
    }
}

impl Controller for MenuController {
    fn bindings(&self) -> &[Binding] {
        &self.bindings
    }

    fn on_focus(&self) {
        self.context.set_selected_index(0);
        self.context.set_range_anchor(None);
    }
}
