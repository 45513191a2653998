use std::rc::Rc;
use std::sync::Arc;

use anyhow::{Result, anyhow};

use super::ControllerCommon;
use crate::app::AppEvent;
use crate::git::GitAction;
use crate::state::{InputPurpose, MenuAction, MenuItem};

const MAX_SUGGESTIONS: usize = 5;

/// Cross-cutting operations shared by multiple controllers. Stateless facades
/// over the container; one bundle constructed at setup.
pub struct Helpers {
    pub refs: RefsHelper,
    pub merge_and_rebase: MergeAndRebaseHelper,
    pub bisect: BisectHelper,
    pub patch_building: PatchBuildingHelper,
    pub tags: TagsHelper,
    pub gpg: GpgHelper,
    pub suggestions: SuggestionsHelper,
    pub host: HostHelper,
}

impl Helpers {
    pub fn new(common: Rc<ControllerCommon>) -> Self {
        Self {
            refs: RefsHelper {
                common: Rc::clone(&common),
            },
            merge_and_rebase: MergeAndRebaseHelper {
                common: Rc::clone(&common),
            },
            bisect: BisectHelper {
                common: Rc::clone(&common),
            },
            patch_building: PatchBuildingHelper {
                common: Rc::clone(&common),
            },
            tags: TagsHelper {
                common: Rc::clone(&common),
            },
            gpg: GpgHelper {
                common: Rc::clone(&common),
            },
            suggestions: SuggestionsHelper {
                common: Rc::clone(&common),
            },
            host: HostHelper { common },
        }
    }
}

pub struct RefsHelper {
    common: Rc<ControllerCommon>,
}

impl RefsHelper {
    pub fn checkout_ref(&self, ref_name: &str) {
        self.common.confirm(
            format!("Check out '{ref_name}'?"),
            GitAction::Checkout {
                ref_name: ref_name.to_string(),
            },
        );
    }

    pub fn checkout_commit(&self, sha: &str) {
        self.common.confirm(
            format!("Check out commit {sha}? This detaches HEAD."),
            GitAction::Checkout {
                ref_name: sha.to_string(),
            },
        );
    }
}

pub struct MergeAndRebaseHelper {
    common: Rc<ControllerCommon>,
}

impl MergeAndRebaseHelper {
    pub fn merge_ref(&self, ref_name: &str) {
        self.common.confirm(
            format!("Merge '{ref_name}' into the checked-out branch?"),
            GitAction::Merge {
                ref_name: ref_name.to_string(),
            },
        );
    }

    pub fn rebase_onto(&self, ref_name: &str) {
        self.common.confirm(
            format!("Rebase the checked-out branch onto '{ref_name}'?"),
            GitAction::RebaseOnto {
                ref_name: ref_name.to_string(),
            },
        );
    }
}

pub struct BisectHelper {
    common: Rc<ControllerCommon>,
}

impl BisectHelper {
    pub fn open_bisect_menu(&self, sha: &str) {
        let items = vec![
            MenuItem {
                label: format!("Mark {sha} as good"),
                action: MenuAction::Git(GitAction::BisectMarkGood {
                    sha: sha.to_string(),
                }),
            },
            MenuItem {
                label: format!("Mark {sha} as bad"),
                action: MenuAction::Git(GitAction::BisectMarkBad {
                    sha: sha.to_string(),
                }),
            },
            MenuItem {
                label: "Reset bisect".to_string(),
                action: MenuAction::Git(GitAction::BisectReset),
            },
        ];
        self.common.open_menu("Bisect", items);
    }
}

pub struct PatchBuildingHelper {
    common: Rc<ControllerCommon>,
}

impl PatchBuildingHelper {
    /// Restores one file to its state in the given commit.
    pub fn checkout_file_from(&self, ref_name: &str, path: &str) {
        self.common.confirm(
            format!("Check out '{path}' from {ref_name}?"),
            GitAction::CheckoutFile {
                ref_name: ref_name.to_string(),
                path: path.to_string(),
            },
        );
    }
}

pub struct TagsHelper {
    common: Rc<ControllerCommon>,
}

impl TagsHelper {
    pub fn open_create_tag_input(&self, ref_name: &str) {
        self.common.open_input(
            InputPurpose::NewTag {
                ref_name: ref_name.to_string(),
            },
            format!("New tag at {ref_name}"),
        );
    }

    pub fn delete_tag(&self, name: &str) {
        self.common.confirm(
            format!("Delete tag '{name}'?"),
            GitAction::DeleteTag {
                name: name.to_string(),
            },
        );
    }

    pub fn push_tag(&self, name: &str) {
        self.common.run_action(GitAction::PushTag {
            name: name.to_string(),
        });
    }
}

pub struct GpgHelper {
    common: Rc<ControllerCommon>,
}

impl GpgHelper {
    /// Commits with the sign flag taken from configuration.
    pub fn commit(&self, message: String) {
        self.common.run_action(GitAction::Commit {
            message,
            sign: self.common.config.gpg_sign,
        });
    }
}

pub struct SuggestionsHelper {
    common: Rc<ControllerCommon>,
}

impl SuggestionsHelper {
    pub fn branch_suggestions(&self, needle: &str) -> Vec<String> {
        let needle = needle.to_lowercase();
        let state = self.common.state.borrow();
        state
            .model
            .branches
            .iter()
            .filter(|branch| branch.name.to_lowercase().contains(&needle))
            .map(|branch| branch.name.clone())
            .take(MAX_SUGGESTIONS)
            .collect()
    }
}

pub struct HostHelper {
    common: Rc<ControllerCommon>,
}

impl HostHelper {
    pub fn refresh_pull_requests(&self) {
        let git = Arc::clone(&self.common.git);
        let tx = self.common.event_tx.clone();
        tokio::spawn(async move {
            let result = git
                .list_pull_requests()
                .await
                .map_err(|err| err.to_string());
            let _ = tx.send(AppEvent::PullRequestsLoaded { result });
        });
    }

    pub fn open_commit_in_browser(&self, sha: &str) -> Result<()> {
        let remote_url = {
            let state = self.common.state.borrow();
            state
                .model
                .remotes
                .first()
                .map(|remote| remote.url.clone())
        };
        let remote_url = remote_url.ok_or_else(|| anyhow!("no remote configured"))?;
        let url = commit_url(&remote_url, sha)
            .ok_or_else(|| anyhow!("cannot derive a web URL from '{remote_url}'"))?;
        self.common.os.open_link(&url)
    }
}

/// Derives the web URL of a commit from a remote URL in either scp-like or
/// https form.
pub fn commit_url(remote_url: &str, sha: &str) -> Option<String> {
    let trimmed = remote_url.trim().trim_end_matches(".git");
    if let Some(rest) = trimmed.strip_prefix("git@") {
        let (host, path) = rest.split_once(':')?;
        if host.is_empty() || path.is_empty() {
            return None;
        }
        return Some(format!("https://{host}/{path}/commit/{sha}"));
    }
    for scheme in ["https://", "http://"] {
        if let Some(rest) = trimmed.strip_prefix(scheme) {
            let (host, path) = rest.split_once('/')?;
            if host.is_empty() || path.is_empty() {
                return None;
            }
            return Some(format!("https://{host}/{path}/commit/{sha}"));
        }
    }
    None
}
