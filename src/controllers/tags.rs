use std::rc::Rc;

use super::context::TagsContext;
use super::helpers::Helpers;
use super::{Binding, Controller};

pub struct TagsController {
    bindings: Vec<Binding>,
}

impl TagsController {
    pub fn new(helpers: Rc<Helpers>, context: Rc<TagsContext>) -> Self {
        let checkout_helpers = Rc::clone(&helpers);
        let checkout_context = Rc::clone(&context);
        let new_helpers = Rc::clone(&helpers);
        let delete_helpers = Rc::clone(&helpers);
        let delete_context = Rc::clone(&context);
        let push_helpers = helpers;
        let push_context = context;

        let bindings = vec![
            Binding {
                key: "space",
                description: "check out tag",
                handler: Box::new(move || {
                    if let Some(name) = checkout_context.selected_tag_name() {
                        checkout_helpers.refs.checkout_ref(&name);
                    }
                    Ok(())
                }),
            },
            Binding {
                key: "n",
                description: "new tag at HEAD",
                handler: Box::new(move || {
                    new_helpers.tags.open_create_tag_input("HEAD");
                    Ok(())
                }),
            },
            Binding {
                key: "d",
                description: "delete tag",
                handler: Box::new(move || {
                    if let Some(name) = delete_context.selected_tag_name() {
                        delete_helpers.tags.delete_tag(&name);
                    }
                    Ok(())
                }),
            },
            Binding {
                key: "P",
                description: "push tag to origin",
                handler: Box::new(move || {
                    if let Some(name) = push_context.selected_tag_name() {
                        push_helpers.tags.push_tag(&name);
                    }
                    Ok(())
                }),
            },
        ];
        Self { bindings }
    }
}

impl Controller for TagsController {
    fn bindings(&self) -> &[Binding] {
        &self.bindings
    }
}
