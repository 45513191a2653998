use std::rc::Rc;

use super::context::ContextKey;
use super::{Binding, Controller, ControllerCommon};
use crate::app::AppEvent;
use crate::git::GitAction;

const FILE_TABS: &[ContextKey] = &[ContextKey::Files, ContextKey::Submodules];
const BRANCH_TABS: &[ContextKey] = &[
    ContextKey::Branches,
    ContextKey::Remotes,
    ContextKey::Tags,
];
const COMMIT_TABS: &[ContextKey] = &[ContextKey::LocalCommits, ContextKey::ReflogCommits];

/// Push/pull/fetch, available from every context via the global fallback.
pub struct SyncController {
    bindings: Vec<Binding>,
}

impl SyncController {
    pub fn new(common: Rc<ControllerCommon>) -> Self {
        let pull_common = Rc::clone(&common);
        let push_common = Rc::clone(&common);
        let fetch_common = common;

        let bindings = vec![
            Binding {
                key: "p",
                description: "pull",
                handler: Box::new(move || {
                    pull_common.run_action(GitAction::Pull);
                    Ok(())
                }),
            },
            Binding {
                key: "P",
                description: "push",
                handler: Box::new(move || {
                    push_common.run_action(GitAction::Push);
                    Ok(())
                }),
            },
            Binding {
                key: "f",
                description: "fetch all remotes",
                handler: Box::new(move || {
                    fetch_common.run_action(GitAction::Fetch);
                    Ok(())
                }),
            },
        ];
        Self { bindings }
    }
}

impl Controller for SyncController {
    fn bindings(&self) -> &[Binding] {
        &self.bindings
    }
}

pub struct UndoController {
    bindings: Vec<Binding>,
}

impl UndoController {
    pub fn new(common: Rc<ControllerCommon>) -> Self {
        let bindings = vec![Binding {
            key: "z",
            description: "undo last ref change",
            handler: Box::new(move || {
                common.confirm(
                    "Undo the last ref change (reset to HEAD@{1})?",
                    GitAction::Undo,
                );
                Ok(())
            }),
        }];
        Self { bindings }
    }
}

impl Controller for UndoController {
    fn bindings(&self) -> &[Binding] {
        &self.bindings
    }
}

/// Session-level keys: quit, refresh, panel switching, the keybindings menu,
/// detail scrolling.
pub struct GlobalController {
    bindings: Vec<Binding>,
}

impl GlobalController {
    pub fn new(common: Rc<ControllerCommon>) -> Self {
        let quit_common = Rc::clone(&common);
        let refresh_common = Rc::clone(&common);
        let menu_common = Rc::clone(&common);
        let back_common = Rc::clone(&common);
        let next_tab_common = Rc::clone(&common);
        let prev_tab_common = Rc::clone(&common);
        let scroll_down_common = Rc::clone(&common);
        let scroll_up_common = Rc::clone(&common);

        let mut bindings = vec![
            Binding {
                key: "q",
                description: "quit",
                handler: Box::new(move || {
                    quit_common.state.borrow_mut().should_quit = true;
                    Ok(())
                }),
            },
            Binding {
                key: "R",
                description: "refresh repository state",
                handler: Box::new(move || {
                    refresh_common.request_refresh();
                    Ok(())
                }),
            },
            Binding {
                key: "x",
                description: "keybindings menu",
                handler: Box::new(move || {
                    let _ = menu_common.event_tx.send(AppEvent::OpenKeybindingsMenu);
                    Ok(())
                }),
            },
            Binding {
                key: "esc",
                description: "back",
                handler: Box::new(move || {
                    let mut state = back_common.state.borrow_mut();
                    if state.current_context() == ContextKey::Menu {
                        state.menu = None;
                    }
                    state.pop_context();
                    Ok(())
                }),
            },
            Binding {
                key: "]",
                description: "next panel tab",
                handler: Box::new(move || {
                    cycle_tab(&next_tab_common, 1);
                    Ok(())
                }),
            },
            Binding {
                key: "[",
                description: "previous panel tab",
                handler: Box::new(move || {
                    cycle_tab(&prev_tab_common, -1);
                    Ok(())
                }),
            },
            Binding {
                key: "ctrl+d",
                description: "scroll details down",
                handler: Box::new(move || {
                    let mut state = scroll_down_common.state.borrow_mut();
                    state.details_scroll = state.details_scroll.saturating_add(5);
                    Ok(())
                }),
            },
            Binding {
                key: "ctrl+u",
                description: "scroll details up",
                handler: Box::new(move || {
                    let mut state = scroll_up_common.state.borrow_mut();
                    state.details_scroll = state.details_scroll.saturating_sub(5);
                    Ok(())
                }),
            },
        ];

        let panels: &[(&'static str, &'static str, ContextKey)] = &[
            ("1", "files panel", ContextKey::Files),
            ("2", "branches panel", ContextKey::Branches),
            ("3", "commits panel", ContextKey::LocalCommits),
            ("4", "stash panel", ContextKey::Stash),
        ];
        for (key, description, target) in panels {
            let common = Rc::clone(&common);
            let target = *target;
            bindings.push(Binding {
                key,
                description,
                handler: Box::new(move || {
                    let mut state = common.state.borrow_mut();
                    state.menu = None;
                    state.reset_context(target);
                    Ok(())
                }),
            });
        }

        Self { bindings }
    }
}

fn cycle_tab(common: &ControllerCommon, step: isize) {
    let mut state = common.state.borrow_mut();
    let current = state.current_context();
    for group in [FILE_TABS, BRANCH_TABS, COMMIT_TABS] {
        if let Some(position) = group.iter().position(|key| *key == current) {
            let len = group.len() as isize;
            let next = (position as isize + step).rem_euclid(len) as usize;
            state.reset_context(group[next]);
            return;
        }
    }
}

impl Controller for GlobalController {
    fn bindings(&self) -> &[Binding] {
        &self.bindings
    }
}
