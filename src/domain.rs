use std::fmt;

use serde::Deserialize;

/// Sync state of a local branch relative to its upstream. Explicit data
/// rather than something derived from the pushable/pullable counts, because
/// the counts can be stale while the state is known (or the reverse).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UpstreamState {
    InSync,
    Diverged,
    #[default]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PullRequest {
    pub number: u64,
    pub state: String,
    pub head_ref_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Branch {
    pub name: String,
    /// Shown instead of `name` when set (e.g. a detached-head description).
    pub display_name: Option<String>,
    /// Recency marker column: `"  *"` for the checked-out branch, otherwise a
    /// short age like `"2d"`.
    pub recency: String,
    pub upstream_name: Option<String>,
    pub upstream_state: UpstreamState,
    pub pushables: String,
    pub pullables: String,
    pub pr: Option<PullRequest>,
}

impl Branch {
    pub fn is_tracking_remote(&self) -> bool {
        self.upstream_name.is_some()
    }

    pub fn matches_upstream(&self) -> bool {
        self.upstream_state == UpstreamState::InSync
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    pub sha: String,
    pub author: String,
    pub unix_timestamp: i64,
    pub subject: String,
}

impl Commit {
    pub fn short_sha(&self) -> &str {
        let end = self
            .sha
            .char_indices()
            .nth(8)
            .map(|(i, _)| i)
            .unwrap_or(self.sha.len());
        &self.sha[..end]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitFile {
    pub path: String,
    pub change_status: char,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusFile {
    pub path: String,
    pub staged_char: char,
    pub unstaged_char: char,
}

impl StatusFile {
    pub fn has_staged_changes(&self) -> bool {
        self.staged_char != ' ' && self.staged_char != '?'
    }

    pub fn has_unstaged_changes(&self) -> bool {
        self.unstaged_char != ' '
    }
}

impl fmt::Display for StatusFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{} {}", self.staged_char, self.unstaged_char, self.path)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Remote {
    pub name: String,
    pub url: String,
    pub branches: Vec<RemoteBranch>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteBranch {
    pub remote_name: String,
    pub name: String,
}

impl RemoteBranch {
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.remote_name, self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StashEntry {
    pub index: usize,
    pub message: String,
}

impl StashEntry {
    pub fn ref_name(&self) -> String {
        format!("stash@{{{}}}", self.index)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submodule {
    pub path: String,
}
