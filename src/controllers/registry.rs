use std::collections::HashMap;
use std::rc::Rc;

use anyhow::{Result, bail};

use super::context::ContextKey;
use super::{Binding, Controller};

/// Binds contexts to ordered controller lists. Attachment happens during
/// setup only; after the event loop starts the registry is read-only.
pub struct ControllerRegistry {
    attached: HashMap<ContextKey, Vec<Rc<dyn Controller>>>,
}

impl ControllerRegistry {
    pub fn new(known_contexts: &[ContextKey]) -> Self {
        Self {
            attached: known_contexts
                .iter()
                .map(|key| (*key, Vec::new()))
                .collect(),
        }
    }

    /// Appends controllers in argument order. Repeated calls for the same
    /// context accumulate; nothing is deduplicated.
    pub fn attach(
        &mut self,
        context: ContextKey,
        controllers: Vec<Rc<dyn Controller>>,
    ) -> Result<()> {
        let Some(list) = self.attached.get_mut(&context) else {
            bail!("cannot attach controllers to unknown context '{}'", context.as_str());
        };
        list.extend(controllers);
        Ok(())
    }

    /// Finds the binding for `key` on `context`. Controllers are scanned in
    /// reverse attachment order so the most recently attached binding wins;
    /// fallback controllers (navigation defaults) are only consulted once no
    /// ordinary controller matched.
    pub fn resolve(&self, context: ContextKey, key: &str) -> Option<&Binding> {
        let controllers = self.attached.get(&context)?;
        for fallback_pass in [false, true] {
            for controller in controllers.iter().rev() {
                if controller.is_fallback() != fallback_pass {
                    continue;
                }
                if let Some(binding) = controller
                    .bindings()
                    .iter()
                    .find(|binding| binding.key == key)
                {
                    return Some(binding);
                }
            }
        }
        None
    }

    /// The `(key, description)` pairs visible on `context`, one entry per
    /// key, in resolution-priority order. Used by the keybindings menu and
    /// the footer.
    pub fn bindings_for(&self, context: ContextKey) -> Vec<(&'static str, &'static str)> {
        let mut seen = Vec::new();
        let mut result = Vec::new();
        let Some(controllers) = self.attached.get(&context) else {
            return result;
        };
        for fallback_pass in [false, true] {
            for controller in controllers.iter().rev() {
                if controller.is_fallback() != fallback_pass {
                    continue;
                }
                for binding in controller.bindings() {
                    if seen.contains(&binding.key) {
                        continue;
                    }
                    seen.push(binding.key);
                    result.push((binding.key, binding.description));
                }
            }
        }
        result
    }

    /// Fires the focus hook of every controller attached to `context`, in
    /// attachment order.
    pub fn notify_focus(&self, context: ContextKey) {
        if let Some(controllers) = self.attached.get(&context) {
            for controller in controllers {
                controller.on_focus();
            }
        }
    }

    #[allow(dead_code)]
    pub fn attached_count(&self, context: ContextKey) -> usize {
        self.attached
            .get(&context)
            .map(|controllers| controllers.len())
            .unwrap_or(0)
    }

    /// Every context must end setup with at least one controller; an
    /// unattached context is a configuration error.
    pub fn ensure_fully_attached(&self) -> Result<()> {
        let mut unattached = self
            .attached
            .iter()
            .filter(|(_, controllers)| controllers.is_empty())
            .map(|(key, _)| key.as_str())
            .collect::<Vec<_>>();
        if !unattached.is_empty() {
            unattached.sort_unstable();
            bail!(
                "contexts left without controllers after setup: {}",
                unattached.join(", ")
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    struct TestController {
        bindings: Vec<Binding>,
        fallback: bool,
        focused: Rc<Cell<u32>>,
    }

    impl TestController {
        fn new(keys: &[(&'static str, &'static str)], marker: Rc<Cell<&'static str>>) -> Self {
            Self::with_fallback(keys, marker, false)
        }

        fn with_fallback(
            keys: &[(&'static str, &'static str)],
            marker: Rc<Cell<&'static str>>,
            fallback: bool,
        ) -> Self {
            let bindings = keys
                .iter()
                .map(|(key, description)| {
                    let marker = Rc::clone(&marker);
                    let description = *description;
                    Binding {
                        key,
                        description,
                        handler: Box::new(move || {
                            marker.set(description);
                            Ok(())
                        }),
                    }
                })
                .collect();
            Self {
                bindings,
                fallback,
                focused: Rc::new(Cell::new(0)),
            }
        }
    }

    impl Controller for TestController {
        fn bindings(&self) -> &[Binding] {
            &self.bindings
        }

        fn on_focus(&self) {
            self.focused.set(self.focused.get() + 1);
        }

        fn is_fallback(&self) -> bool {
            self.fallback
        }
    }

    fn registry() -> ControllerRegistry {
        ControllerRegistry::new(ContextKey::all())
    }

    #[test]
    fn attaching_to_unknown_context_fails() {
        let mut registry = ControllerRegistry::new(&[ContextKey::Files]);
        let marker = Rc::new(Cell::new(""));
        let controller: Rc<dyn Controller> =
            Rc::new(TestController::new(&[("q", "quit")], marker));
        let err = registry
            .attach(ContextKey::Branches, vec![controller])
            .expect_err("unknown context rejected");
        assert!(err.to_string().contains("unknown context 'branches'"));
    }

    #[test]
    fn last_attached_controller_wins_key_conflicts() {
        let mut registry = registry();
        let marker = Rc::new(Cell::new(""));
        let first: Rc<dyn Controller> = Rc::new(TestController::new(
            &[("x", "first")],
            Rc::clone(&marker),
        ));
        let second: Rc<dyn Controller> = Rc::new(TestController::new(
            &[("x", "second")],
            Rc::clone(&marker),
        ));
        registry.attach(ContextKey::Files, vec![first]).expect("attach");
        registry.attach(ContextKey::Files, vec![second]).expect("attach");

        let binding = registry.resolve(ContextKey::Files, "x").expect("resolves");
        (binding.handler)().expect("handler runs");
        assert_eq!(marker.get(), "second");
    }

    #[test]
    fn last_argument_wins_within_one_attach_call() {
        let mut registry = registry();
        let marker = Rc::new(Cell::new(""));
        let primary: Rc<dyn Controller> = Rc::new(TestController::new(
            &[("d", "primary")],
            Rc::clone(&marker),
        ));
        let secondary: Rc<dyn Controller> = Rc::new(TestController::new(
            &[("d", "secondary")],
            Rc::clone(&marker),
        ));
        registry
            .attach(ContextKey::Files, vec![primary, secondary])
            .expect("attach");

        let binding = registry.resolve(ContextKey::Files, "d").expect("resolves");
        (binding.handler)().expect("handler runs");
        assert_eq!(marker.get(), "secondary");
    }

    #[test]
    fn fallback_controllers_yield_to_ordinary_bindings() {
        let mut registry = registry();
        let marker = Rc::new(Cell::new(""));
        let domain: Rc<dyn Controller> = Rc::new(TestController::new(
            &[("down", "domain")],
            Rc::clone(&marker),
        ));
        let navigation: Rc<dyn Controller> = Rc::new(TestController::with_fallback(
            &[("down", "navigation"), ("up", "navigation")],
            Rc::clone(&marker),
            true,
        ));
        registry.attach(ContextKey::Files, vec![domain]).expect("attach");
        registry
            .attach(ContextKey::Files, vec![navigation])
            .expect("attach");

        let binding = registry
            .resolve(ContextKey::Files, "down")
            .expect("resolves");
        (binding.handler)().expect("handler runs");
        assert_eq!(marker.get(), "domain");

        // Keys only the fallback binds still resolve.
        let binding = registry.resolve(ContextKey::Files, "up").expect("resolves");
        (binding.handler)().expect("handler runs");
        assert_eq!(marker.get(), "navigation");
    }

    #[test]
    fn duplicate_attachment_is_additive_not_deduplicated() {
        let mut registry = registry();
        let marker = Rc::new(Cell::new(""));
        let controller = Rc::new(TestController::new(&[("b", "bisect")], marker));
        registry
            .attach(
                ContextKey::LocalCommits,
                vec![Rc::clone(&controller) as Rc<dyn Controller>],
            )
            .expect("attach");
        registry
            .attach(
                ContextKey::LocalCommits,
                vec![Rc::clone(&controller) as Rc<dyn Controller>],
            )
            .expect("attach");

        assert_eq!(registry.attached_count(ContextKey::LocalCommits), 2);
        assert!(registry.resolve(ContextKey::LocalCommits, "b").is_some());
    }

    #[test]
    fn unresolved_key_returns_none() {
        let registry = registry();
        assert!(registry.resolve(ContextKey::Files, "q").is_none());
    }

    #[test]
    fn ensure_fully_attached_names_empty_contexts() {
        let mut registry = ControllerRegistry::new(&[ContextKey::Files, ContextKey::Menu]);
        let marker = Rc::new(Cell::new(""));
        let controller: Rc<dyn Controller> =
            Rc::new(TestController::new(&[("q", "quit")], marker));
        registry.attach(ContextKey::Files, vec![controller]).expect("attach");

        let err = registry
            .ensure_fully_attached()
            .expect_err("menu unattached");
        assert!(err.to_string().contains("menu"));
        assert!(!err.to_string().contains("files"));
    }

    #[test]
    fn bindings_listing_matches_resolution_order() {
        let mut registry = registry();
        let marker = Rc::new(Cell::new(""));
        let first: Rc<dyn Controller> = Rc::new(TestController::new(
            &[("x", "old"), ("y", "only")],
            Rc::clone(&marker),
        ));
        let second: Rc<dyn Controller> =
            Rc::new(TestController::new(&[("x", "new")], Rc::clone(&marker)));
        registry.attach(ContextKey::Files, vec![first]).expect("attach");
        registry.attach(ContextKey::Files, vec![second]).expect("attach");

        let listed = registry.bindings_for(ContextKey::Files);
        assert_eq!(listed, vec![("x", "new"), ("y", "only")]);
    }
}
