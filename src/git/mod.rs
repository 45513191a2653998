use std::path::PathBuf;
use std::process::Stdio;

use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use tokio::process::Command;

use crate::domain::{
    Branch, Commit, CommitFile, PullRequest, Remote, RemoteBranch, StashEntry, StatusFile,
    Submodule, Tag, UpstreamState,
};

const FIELD_SEP: char = '\u{1f}';

#[derive(Debug, Clone)]
pub struct CommandResult {
    pub command_preview: String,
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

/// A mutating git operation dispatched by a controller handler. Kept as data
/// so the pending command can be previewed in the confirmation modal before
/// anything runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GitAction {
    Pull,
    Push,
    Fetch,
    FetchRemote { name: String },
    Checkout { ref_name: String },
    CreateBranch { name: String },
    DeleteBranch { name: String },
    Merge { ref_name: String },
    RebaseOnto { ref_name: String },
    StageFile { path: String },
    UnstageFile { path: String },
    StageAll,
    UnstageAll,
    DiscardFile { path: String },
    DiscardAll,
    Commit { message: String, sign: bool },
    AmendHead,
    StashPush { message: Option<String> },
    StashApply { index: usize },
    StashPop { index: usize },
    StashDrop { index: usize },
    CreateTag { name: String, ref_name: String },
    DeleteTag { name: String },
    PushTag { name: String },
    DeleteRemote { name: String },
    CheckoutFile { ref_name: String, path: String },
    SubmoduleUpdate { path: String },
    SubmoduleSync { path: String },
    ResetSoft { ref_name: String },
    ResetHard { ref_name: String },
    BisectMarkGood { sha: String },
    BisectMarkBad { sha: String },
    BisectReset,
    Undo,
    GitFlowFinish { name: String },
}

impl GitAction {
    pub fn args(&self) -> Vec<String> {
        let owned = |parts: &[&str]| parts.iter().map(|part| part.to_string()).collect();
        match self {
            Self::Pull => owned(&["pull"]),
            Self::Push => owned(&["push"]),
            Self::Fetch => owned(&["fetch", "--all"]),
            Self::FetchRemote { name } => owned(&["fetch", name]),
            Self::Checkout { ref_name } => owned(&["checkout", ref_name]),
            Self::CreateBranch { name } => owned(&["checkout", "-b", name]),
            Self::DeleteBranch { name } => owned(&["branch", "-D", name]),
            Self::Merge { ref_name } => owned(&["merge", "--no-edit", ref_name]),
            Self::RebaseOnto { ref_name } => owned(&["rebase", ref_name]),
            Self::StageFile { path } => owned(&["add", "--", path]),
            Self::UnstageFile { path } => owned(&["restore", "--staged", "--", path]),
            Self::StageAll => owned(&["add", "-A"]),
            Self::UnstageAll => owned(&["reset"]),
            Self::DiscardFile { path } => owned(&["checkout", "--", path]),
            Self::DiscardAll => owned(&["reset", "--hard", "HEAD"]),
            Self::Commit { message, sign } => {
                let mut args = vec!["commit".to_string()];
                if *sign {
                    args.push("-S".to_string());
                }
                args.push("-m".to_string());
                args.push(message.clone());
                args
            }
            Self::AmendHead => owned(&["commit", "--amend", "--no-edit"]),
            Self::StashPush { message } => match message {
                Some(message) => owned(&["stash", "push", "-m", message]),
                None => owned(&["stash", "push"]),
            },
            Self::StashApply { index } => {
                owned(&["stash", "apply", &format!("stash@{{{index}}}")])
            }
            Self::StashPop { index } => owned(&["stash", "pop", &format!("stash@{{{index}}}")]),
            Self::StashDrop { index } => owned(&["stash", "drop", &format!("stash@{{{index}}}")]),
            Self::CreateTag { name, ref_name } => owned(&["tag", name, ref_name]),
            Self::DeleteTag { name } => owned(&["tag", "-d", name]),
            Self::PushTag { name } => owned(&["push", "origin", name]),
            Self::DeleteRemote { name } => owned(&["remote", "remove", name]),
            Self::CheckoutFile { ref_name, path } => owned(&["checkout", ref_name, "--", path]),
            Self::SubmoduleUpdate { path } => {
                owned(&["submodule", "update", "--init", "--", path])
            }
            Self::SubmoduleSync { path } => owned(&["submodule", "sync", "--", path]),
            Self::ResetSoft { ref_name } => owned(&["reset", "--soft", ref_name]),
            Self::ResetHard { ref_name } => owned(&["reset", "--hard", ref_name]),
            Self::BisectMarkGood { sha } => owned(&["bisect", "good", sha]),
            Self::BisectMarkBad { sha } => owned(&["bisect", "bad", sha]),
            Self::BisectReset => owned(&["bisect", "reset"]),
            Self::Undo => owned(&["reset", "--hard", "HEAD@{1}"]),
            Self::GitFlowFinish { name } => match name.split_once('/') {
                Some((branch_type, short_name)) => {
                    owned(&["flow", branch_type, "finish", short_name])
                }
                None => owned(&["flow", "finish", name]),
            },
        }
    }

    pub fn command_preview(&self) -> String {
        match self {
            Self::Commit { sign, .. } => {
                if *sign {
                    "git commit -S -m <message>".to_string()
                } else {
                    "git commit -m <message>".to_string()
                }
            }
            Self::StashPush {
                message: Some(_), ..
            } => "git stash push -m <message>".to_string(),
            other => format!("git {}", other.args().join(" ")),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SnapshotOptions {
    pub commit_limit: usize,
}

#[derive(Debug, Clone, Default)]
pub struct GitSnapshot {
    pub repo_root: String,
    pub files: Vec<StatusFile>,
    pub branches: Vec<Branch>,
    pub commits: Vec<Commit>,
    pub reflog_commits: Vec<Commit>,
    pub remotes: Vec<Remote>,
    pub remote_branches: Vec<RemoteBranch>,
    pub tags: Vec<Tag>,
    pub stash: Vec<StashEntry>,
    pub submodules: Vec<Submodule>,
}

#[async_trait]
pub trait GitClient: Send + Sync {
    async fn load_snapshot(&self, options: SnapshotOptions) -> Result<GitSnapshot>;
    async fn commits_for_ref(&self, ref_name: &str, limit: usize) -> Result<Vec<Commit>>;
    async fn files_for_ref(&self, ref_name: &str) -> Result<Vec<CommitFile>>;
    async fn diff_for_file(&self, path: &str) -> Result<String>;
    async fn patch_for_ref(&self, ref_name: &str) -> Result<String>;
    async fn list_pull_requests(&self) -> Result<Vec<PullRequest>>;
    async fn run_action(&self, action: &GitAction) -> Result<CommandResult>;
}

#[derive(Debug, Clone)]
pub struct CliGitClient {
    cwd: PathBuf,
}

impl CliGitClient {
    pub fn new(cwd: PathBuf) -> Self {
        Self { cwd }
    }

    async fn run_git<S: AsRef<str>>(&self, args: &[S]) -> Result<CommandResult> {
        let preview = format!(
            "git {}",
            args.iter()
                .map(|part| part.as_ref().to_string())
                .collect::<Vec<_>>()
                .join(" ")
        );

        let mut command = Command::new("git");
        command
            .current_dir(&self.cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        for arg in args {
            command.arg(arg.as_ref());
        }

        let output = command
            .output()
            .await
            .with_context(|| format!("failed to spawn git command: {preview}"))?;
        Ok(CommandResult {
            command_preview: preview,
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

#[async_trait]
impl GitClient for CliGitClient {
    async fn load_snapshot(&self, options: SnapshotOptions) -> Result<GitSnapshot> {
        let root = self.run_git(&["rev-parse", "--show-toplevel"]).await?;
        if !root.success {
            return Err(anyhow!("{}\n{}", root.stdout.trim(), root.stderr.trim()));
        }
        let repo_root = root.stdout.trim().to_string();

        let status = self.run_git(&["status", "--porcelain"]).await?;
        let files = if status.success {
            parse_porcelain_status(&status.stdout)
        } else {
            Vec::new()
        };

        let branch_format = format!(
            "--format=%(HEAD){sep}%(refname:short){sep}%(upstream:short){sep}%(upstream:track){sep}%(committerdate:unix)",
            sep = "%1f"
        );
        let branches_out = self
            .run_git(&[
                "for-each-ref",
                "refs/heads",
                "--sort=-committerdate",
                &branch_format,
            ])
            .await?;
        let branches = if branches_out.success {
            parse_branches(&branches_out.stdout, chrono::Utc::now().timestamp())
        } else {
            Vec::new()
        };

        let limit = options.commit_limit.to_string();
        let log_format = "--format=%H%x1f%an%x1f%at%x1f%s";
        let commits_out = self.run_git(&["log", log_format, "-n", &limit]).await?;
        let commits = if commits_out.success {
            parse_commits(&commits_out.stdout)
        } else {
            Vec::new()
        };

        let reflog_out = self
            .run_git(&["log", "-g", log_format, "-n", &limit])
            .await?;
        let reflog_commits = if reflog_out.success {
            parse_commits(&reflog_out.stdout)
        } else {
            Vec::new()
        };

        let remotes_out = self.run_git(&["remote", "-v"]).await?;
        let remote_refs_out = self
            .run_git(&["for-each-ref", "refs/remotes", "--format=%(refname:short)"])
            .await?;
        let remote_branches = if remote_refs_out.success {
            parse_remote_branches(&remote_refs_out.stdout)
        } else {
            Vec::new()
        };
        let remotes = if remotes_out.success {
            parse_remotes(&remotes_out.stdout, &remote_branches)
        } else {
            Vec::new()
        };

        let tags_out = self.run_git(&["tag", "--sort=-creatordate"]).await?;
        let tags = if tags_out.success {
            parse_tags(&tags_out.stdout)
        } else {
            Vec::new()
        };

        let stash_out = self
            .run_git(&["stash", "list", "--format=%gd%x1f%gs"])
            .await?;
        let stash = if stash_out.success {
            parse_stash_list(&stash_out.stdout)
        } else {
            Vec::new()
        };

        let submodules_out = self.run_git(&["submodule", "status"]).await?;
        let submodules = if submodules_out.success {
            parse_submodule_status(&submodules_out.stdout)
        } else {
            Vec::new()
        };

        Ok(GitSnapshot {
            repo_root,
            files,
            branches,
            commits,
            reflog_commits,
            remotes,
            remote_branches,
            tags,
            stash,
            submodules,
        })
    }

    async fn commits_for_ref(&self, ref_name: &str, limit: usize) -> Result<Vec<Commit>> {
        let limit = limit.to_string();
        let out = self
            .run_git(&[
                "log",
                "--format=%H%x1f%an%x1f%at%x1f%s",
                "-n",
                &limit,
                ref_name,
            ])
            .await?;
        if !out.success {
            return Err(anyhow!("{}", out.stderr.trim()));
        }
        Ok(parse_commits(&out.stdout))
    }

    async fn files_for_ref(&self, ref_name: &str) -> Result<Vec<CommitFile>> {
        let out = self
            .run_git(&[
                "diff-tree",
                "--no-commit-id",
                "--name-status",
                "-r",
                ref_name,
            ])
            .await?;
        if !out.success {
            return Err(anyhow!("{}", out.stderr.trim()));
        }
        Ok(parse_name_status(&out.stdout))
    }

    async fn diff_for_file(&self, path: &str) -> Result<String> {
        let out = self.run_git(&["diff", "HEAD", "--", path]).await?;
        if !out.success && !out.stderr.trim().is_empty() {
            return Err(anyhow!("{}", out.stderr.trim()));
        }
        Ok(out.stdout)
    }

    async fn patch_for_ref(&self, ref_name: &str) -> Result<String> {
        let out = self.run_git(&["show", ref_name]).await?;
        if !out.success {
            return Err(anyhow!("{}", out.stderr.trim()));
        }
        Ok(out.stdout)
    }

    async fn list_pull_requests(&self) -> Result<Vec<PullRequest>> {
        let mut command = Command::new("gh");
        command
            .current_dir(&self.cwd)
            .args(["pr", "list", "--json", "number,state,headRefName", "--limit", "100"])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        let output = command
            .output()
            .await
            .context("failed to spawn gh pr list")?;
        if !output.status.success() {
            return Err(anyhow!(
                "{}",
                String::from_utf8_lossy(&output.stderr).trim()
            ));
        }
        parse_pull_requests(&String::from_utf8_lossy(&output.stdout))
    }

    async fn run_action(&self, action: &GitAction) -> Result<CommandResult> {
        self.run_git(&action.args()).await
    }
}

fn parse_branches(raw: &str, now_unix: i64) -> Vec<Branch> {
    raw.lines()
        .filter_map(|line| {
            let fields = line.split(FIELD_SEP).collect::<Vec<_>>();
            if fields.len() < 5 {
                return None;
            }
            let is_head = fields[0] == "*";
            let name = fields[1].to_string();
            if name.is_empty() {
                return None;
            }
            let upstream = fields[2].trim();
            let track = fields[3].trim();
            let committer_date = fields[4].trim().parse::<i64>().unwrap_or(now_unix);

            let recency = if is_head {
                "  *".to_string()
            } else {
                short_age(now_unix.saturating_sub(committer_date))
            };

            let (upstream_name, upstream_state, pushables, pullables) = if upstream.is_empty() {
                (None, UpstreamState::Unknown, "?".to_string(), "?".to_string())
            } else if track.is_empty() {
                (
                    Some(upstream.to_string()),
                    UpstreamState::InSync,
                    "0".to_string(),
                    "0".to_string(),
                )
            } else if track == "[gone]" {
                (
                    Some(upstream.to_string()),
                    UpstreamState::Unknown,
                    "?".to_string(),
                    "?".to_string(),
                )
            } else {
                let (ahead, behind) = parse_ahead_behind(track);
                (
                    Some(upstream.to_string()),
                    UpstreamState::Diverged,
                    ahead,
                    behind,
                )
            };

            Some(Branch {
                name,
                display_name: None,
                recency,
                upstream_name,
                upstream_state,
                pushables,
                pullables,
                pr: None,
            })
        })
        .collect()
}

fn parse_ahead_behind(track: &str) -> (String, String) {
    let inner = track.trim_start_matches('[').trim_end_matches(']');
    let mut ahead = "0".to_string();
    let mut behind = "0".to_string();
    for part in inner.split(',') {
        let part = part.trim();
        if let Some(count) = part.strip_prefix("ahead ") {
            ahead = count.trim().to_string();
        } else if let Some(count) = part.strip_prefix("behind ") {
            behind = count.trim().to_string();
        }
    }
    (ahead, behind)
}

fn short_age(elapsed_secs: i64) -> String {
    let elapsed = elapsed_secs.max(0);
    if elapsed < 60 {
        format!("{elapsed}s")
    } else if elapsed < 3600 {
        format!("{}m", elapsed / 60)
    } else if elapsed < 86_400 {
        format!("{}h", elapsed / 3600)
    } else if elapsed < 7 * 86_400 {
        format!("{}d", elapsed / 86_400)
    } else if elapsed < 365 * 86_400 {
        format!("{}w", elapsed / (7 * 86_400))
    } else {
        format!("{}y", elapsed / (365 * 86_400))
    }
}

fn parse_commits(raw: &str) -> Vec<Commit> {
    raw.lines()
        .filter_map(|line| {
            let fields = line.split(FIELD_SEP).collect::<Vec<_>>();
            if fields.len() < 4 {
                return None;
            }
            Some(Commit {
                sha: fields[0].to_string(),
                author: fields[1].to_string(),
                unix_timestamp: fields[2].trim().parse().unwrap_or(0),
                subject: fields[3].to_string(),
            })
        })
        .collect()
}

fn parse_porcelain_status(raw: &str) -> Vec<StatusFile> {
    raw.lines()
        .filter_map(|line| {
            if line.len() < 4 {
                return None;
            }
            let mut chars = line.chars();
            let staged_char = chars.next()?;
            let unstaged_char = chars.next()?;
            let path = line[3..].trim().to_string();
            if path.is_empty() {
                return None;
            }
            Some(StatusFile {
                path,
                staged_char,
                unstaged_char,
            })
        })
        .collect()
}

fn parse_name_status(raw: &str) -> Vec<CommitFile> {
    raw.lines()
        .filter_map(|line| {
            let (status, path) = line.split_once('\t')?;
            let change_status = status.chars().next()?;
            Some(CommitFile {
                path: path.trim().to_string(),
                change_status,
            })
        })
        .collect()
}

fn parse_remote_branches(raw: &str) -> Vec<RemoteBranch> {
    raw.lines()
        .filter_map(|line| {
            let full = line.trim();
            let (remote_name, name) = full.split_once('/')?;
            if name == "HEAD" || name.is_empty() {
                return None;
            }
            Some(RemoteBranch {
                remote_name: remote_name.to_string(),
                name: name.to_string(),
            })
        })
        .collect()
}

fn parse_remotes(raw: &str, remote_branches: &[RemoteBranch]) -> Vec<Remote> {
    let mut remotes: Vec<Remote> = Vec::new();
    for line in raw.lines() {
        let mut parts = line.split_whitespace();
        let (Some(name), Some(url)) = (parts.next(), parts.next()) else {
            continue;
        };
        if remotes.iter().any(|remote| remote.name == name) {
            continue;
        }
        let branches = remote_branches
            .iter()
            .filter(|branch| branch.remote_name == name)
            .cloned()
            .collect();
        remotes.push(Remote {
            name: name.to_string(),
            url: url.to_string(),
            branches,
        });
    }
    remotes
}

fn parse_tags(raw: &str) -> Vec<Tag> {
    raw.lines()
        .filter_map(|line| {
            let name = line.trim();
            if name.is_empty() {
                return None;
            }
            Some(Tag {
                name: name.to_string(),
            })
        })
        .collect()
}

fn parse_stash_list(raw: &str) -> Vec<StashEntry> {
    raw.lines()
        .filter_map(|line| {
            let (selector, message) = line.split_once(FIELD_SEP)?;
            let index = selector
                .trim()
                .strip_prefix("stash@{")?
                .strip_suffix('}')?
                .parse()
                .ok()?;
            Some(StashEntry {
                index,
                message: message.trim().to_string(),
            })
        })
        .collect()
}

fn parse_submodule_status(raw: &str) -> Vec<Submodule> {
    raw.lines()
        .filter_map(|line| {
            let mut parts = line.split_whitespace();
            let _sha = parts.next()?;
            let path = parts.next()?;
            Some(Submodule {
                path: path.to_string(),
            })
        })
        .collect()
}

fn parse_pull_requests(raw: &str) -> Result<Vec<PullRequest>> {
    serde_json::from_str::<Vec<PullRequest>>(raw).context("failed parsing gh pr list json")
}
