use std::cell::RefCell;
use std::collections::HashMap;
use std::io;
use std::rc::Rc;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result, anyhow};
use crossterm::event::{Event as CEvent, EventStream, KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::{ExecutableCommand, execute, terminal};
use futures_util::StreamExt;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tokio::sync::mpsc;

use crate::config::AppConfig;
use crate::controllers::context::{ContainsCommits, ContextKey, Contexts};
use crate::controllers::helpers::Helpers;
use crate::controllers::registry::ControllerRegistry;
use crate::controllers::{ControllerCommon, attach_controllers};
use crate::domain::{Commit, CommitFile, PullRequest};
use crate::git::{CliGitClient, CommandResult, GitAction, GitClient, GitSnapshot, SnapshotOptions};
use crate::keys;
use crate::os::OsCommand;
use crate::state::{AppState, InputPurpose, InputState, MenuAction, MenuItem, MenuState};
use crate::ui;

const REFRESH_INTERVAL: Duration = Duration::from_secs(7);

/// Completion events posted back onto the UI loop by spawned work.
#[derive(Debug)]
pub enum AppEvent {
    SnapshotLoaded {
        result: Result<GitSnapshot, String>,
    },
    SubCommitsLoaded {
        ref_name: String,
        result: Result<Vec<Commit>, String>,
    },
    CommitFilesLoaded {
        ref_name: String,
        result: Result<Vec<CommitFile>, String>,
    },
    PullRequestsLoaded {
        result: Result<Vec<PullRequest>, String>,
    },
    DetailLoaded {
        request_id: u64,
        result: Result<String, String>,
    },
    ActionFinished {
        preview: String,
        was_commit: bool,
        result: Result<CommandResult, String>,
    },
    OpenKeybindingsMenu,
    DispatchKey {
        context: ContextKey,
        key: String,
    },
    RefreshRequested,
}

enum DetailRequest {
    FileDiff(String),
    RefPatch(String),
}

pub struct App {
    pub config: Rc<AppConfig>,
    pub state: Rc<RefCell<AppState>>,
    pub contexts: Contexts,
    pub registry: ControllerRegistry,
    pub helpers: Rc<Helpers>,
    common: Rc<ControllerCommon>,
    git: Arc<dyn GitClient>,
    event_tx: mpsc::UnboundedSender<AppEvent>,
    event_rx: mpsc::UnboundedReceiver<AppEvent>,
    last_refresh: Instant,
    last_context: ContextKey,
    detail_request_id: u64,
}

impl App {
    #[allow(dead_code)]
    pub fn new(config: AppConfig) -> Result<Self> {
        Self::new_with_startup_issues(config, Vec::new())
    }

    pub fn new_with_startup_issues(config: AppConfig, startup_issues: Vec<String>) -> Result<Self> {
        let cwd = std::env::current_dir().context("failed reading current directory")?;
        let git = Arc::new(CliGitClient::new(cwd)) as Arc<dyn GitClient>;
        let app = Self::with_client(config, git)?;
        for issue in startup_issues {
            app.state
                .borrow_mut()
                .append_log(format!("Config warning: {issue}"));
        }
        Ok(app)
    }

    /// Setup happens here, before the loop: container, contexts, registry,
    /// attachments. Any configuration error aborts startup.
    pub fn with_client(config: AppConfig, git: Arc<dyn GitClient>) -> Result<Self> {
        let config = Rc::new(config);
        let state = Rc::new(RefCell::new(AppState::new()));
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let common = ControllerCommon::new(
            Arc::clone(&git),
            OsCommand::new(),
            Rc::clone(&config),
            Rc::clone(&state),
            event_tx.clone(),
        );
        let contexts = Contexts::new(&state);
        let mut registry = ControllerRegistry::new(ContextKey::all());
        let helpers = attach_controllers(&mut registry, &common, &contexts)?;

        state
            .borrow_mut()
            .set_status("q to quit, x for keybindings.");

        Ok(Self {
            config,
            state,
            contexts,
            registry,
            helpers,
            common,
            git,
            event_tx,
            event_rx,
            last_refresh: Instant::now() - Duration::from_secs(10),
            last_context: ContextKey::Files,
            detail_request_id: 0,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        enable_raw_mode().context("failed enabling raw mode")?;
        let mut stdout = io::stdout();
        execute!(stdout, terminal::EnterAlternateScreen)
            .context("failed entering alternate screen")?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).context("failed creating terminal")?;
        terminal.clear().ok();

        self.request_snapshot();
        if self.config.show_pull_requests {
            self.helpers.host.refresh_pull_requests();
        }
        self.refresh_detail();

        let mut event_stream = EventStream::new();
        let mut tick = tokio::time::interval(Duration::from_millis(250));
        tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        let run_result = loop {
            let pending_edit = self.state.borrow_mut().pending_edit.take();
            if let Some(path) = pending_edit {
                if let Err(err) = self.edit_file(&mut terminal, &path) {
                    self.state
                        .borrow_mut()
                        .append_log(format!("Editor error: {err:#}"));
                    let _ = self.resume_terminal(&mut terminal);
                } else {
                    self.request_snapshot();
                }
            }

            if let Err(err) = terminal.draw(|f| ui::render(f, self)) {
                break Err(anyhow!("terminal draw failed: {err}"));
            }
            if self.state.borrow().should_quit {
                break Ok(());
            }

            tokio::select! {
                _ = tick.tick() => {
                    if self.last_refresh.elapsed() >= REFRESH_INTERVAL {
                        self.request_snapshot();
                    }
                }
                maybe_ui_event = event_stream.next() => {
                    if let Some(Ok(CEvent::Key(key))) = maybe_ui_event {
                        self.handle_key(key);
                    }
                }
                maybe_app_event = self.event_rx.recv() => {
                    if let Some(app_event) = maybe_app_event {
                        self.handle_app_event(app_event);
                    }
                }
            }
        };

        self.restore_terminal(terminal)?;
        run_result
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if self.state.borrow().confirmation.is_some() {
            self.handle_confirmation_key(key);
            return;
        }
        if self.state.borrow().input.is_some() {
            self.handle_input_key(key);
            return;
        }

        let current = self.state.borrow().current_context();
        if current == ContextKey::CommitMessage {
            let plain = !key
                .modifiers
                .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT);
            match key.code {
                KeyCode::Char(c) if plain => {
                    self.state.borrow_mut().commit_message.buffer.push(c);
                    return;
                }
                KeyCode::Backspace => {
                    self.state.borrow_mut().commit_message.buffer.pop();
                    return;
                }
                _ => {}
            }
        }

        let Some(canonical) = keys::canonicalize_key_event(key) else {
            return;
        };
        self.dispatch_key(current, &canonical);
    }

    fn handle_confirmation_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('y') | KeyCode::Enter => {
                let confirmation = self.state.borrow_mut().confirmation.take();
                if let Some(confirmation) = confirmation {
                    self.common.run_action(confirmation.action);
                }
            }
            KeyCode::Char('n') | KeyCode::Esc => {
                let mut state = self.state.borrow_mut();
                state.confirmation = None;
                state.set_status("Cancelled.");
            }
            _ => {}
        }
    }

    fn handle_input_key(&mut self, key: KeyEvent) {
        let plain = !key
            .modifiers
            .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT);
        match key.code {
            KeyCode::Char(c) if plain => {
                if let Some(input) = self.state.borrow_mut().input.as_mut() {
                    input.value.push(c);
                }
            }
            KeyCode::Backspace => {
                if let Some(input) = self.state.borrow_mut().input.as_mut() {
                    input.value.pop();
                }
            }
            KeyCode::Esc => {
                let mut state = self.state.borrow_mut();
                state.input = None;
                state.set_status("Cancelled.");
            }
            KeyCode::Enter => {
                let input = self.state.borrow_mut().input.take();
                if let Some(input) = input {
                    self.submit_input(input);
                }
            }
            _ => {}
        }
    }

    fn submit_input(&mut self, input: InputState) {
        let value = input.value.trim().to_string();
        match input.purpose {
            InputPurpose::NewBranch => {
                if value.is_empty() {
                    self.state.borrow_mut().set_status("Branch name is empty.");
                } else {
                    self.common.run_action(GitAction::CreateBranch { name: value });
                }
            }
            InputPurpose::NewTag { ref_name } => {
                if value.is_empty() {
                    self.state.borrow_mut().set_status("Tag name is empty.");
                } else {
                    self.common
                        .run_action(GitAction::CreateTag { name: value, ref_name });
                }
            }
            InputPurpose::StashMessage => {
                let message = if value.is_empty() { None } else { Some(value) };
                self.common.run_action(GitAction::StashPush { message });
            }
        }
    }

    /// Resolves a key against the given context, falling back to the global
    /// context. Unresolved keys are ignored; handler errors are surfaced and
    /// the loop continues.
    fn dispatch_key(&mut self, context: ContextKey, key: &str) {
        let outcome = {
            let binding = self.registry.resolve(context, key).or_else(|| {
                if context == ContextKey::Global {
                    None
                } else {
                    self.registry.resolve(ContextKey::Global, key)
                }
            });
            binding.map(|binding| (binding.handler)())
        };
        match outcome {
            Some(Ok(())) => {
                self.sync_focus();
                self.refresh_detail();
            }
            Some(Err(err)) => {
                let mut state = self.state.borrow_mut();
                state.set_status("Action failed (see log).");
                state.append_log(format!("Handler error: {err:#}"));
            }
            None => {}
        }
    }

    /// Fires focus hooks when the top of the context stack changed since the
    /// last dispatch.
    fn sync_focus(&mut self) {
        let current = self.state.borrow().current_context();
        if current != self.last_context {
            self.last_context = current;
            self.registry.notify_focus(current);
        }
    }

    pub fn handle_app_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::SnapshotLoaded { result } => match result {
                Ok(snapshot) => {
                    {
                        let mut state = self.state.borrow_mut();
                        let model = &mut state.model;
                        model.repo_root = snapshot.repo_root;
                        model.files = snapshot.files;
                        model.branches = snapshot.branches;
                        model.commits = snapshot.commits;
                        model.reflog_commits = snapshot.reflog_commits;
                        model.remotes = snapshot.remotes;
                        model.remote_branches = snapshot.remote_branches;
                        model.tags = snapshot.tags;
                        model.stash = snapshot.stash;
                        model.submodules = snapshot.submodules;
                        model.apply_pull_requests();
                        state.set_status("Repository state refreshed.");
                    }
                    self.refresh_detail();
                }
                Err(err) => {
                    let mut state = self.state.borrow_mut();
                    state.set_status("Refresh failed (see log).");
                    state.append_log(format!("Refresh error: {err}"));
                }
            },
            AppEvent::SubCommitsLoaded { ref_name, result } => match result {
                Ok(commits) => {
                    {
                        let mut state = self.state.borrow_mut();
                        state.model.sub_commits = commits;
                        state.set_status(format!("Showing commits of {ref_name}."));
                        state.push_context(ContextKey::SubCommits);
                    }
                    self.sync_focus();
                    self.refresh_detail();
                }
                Err(err) => {
                    let mut state = self.state.borrow_mut();
                    state.set_status("Loading commits failed (see log).");
                    state.append_log(format!("Loading commits of {ref_name} failed: {err}"));
                }
            },
            AppEvent::CommitFilesLoaded { ref_name, result } => match result {
                Ok(files) => {
                    {
                        let mut state = self.state.borrow_mut();
                        state.model.commit_files = files;
                        state.model.commit_files_ref = Some(ref_name.clone());
                        state.set_status(format!("Showing files of {ref_name}."));
                        state.push_context(ContextKey::CommitFiles);
                    }
                    self.sync_focus();
                }
                Err(err) => {
                    let mut state = self.state.borrow_mut();
                    state.set_status("Loading files failed (see log).");
                    state.append_log(format!("Loading files of {ref_name} failed: {err}"));
                }
            },
            AppEvent::PullRequestsLoaded { result } => match result {
                Ok(pull_requests) => {
                    let mut state = self.state.borrow_mut();
                    let count = pull_requests.len();
                    state.model.pull_requests = pull_requests
                        .into_iter()
                        .map(|pr| (pr.head_ref_name.clone(), pr))
                        .collect::<HashMap<_, _>>();
                    state.model.apply_pull_requests();
                    state.append_log(format!("Loaded {count} pull requests."));
                }
                Err(err) => {
                    self.state
                        .borrow_mut()
                        .append_log(format!("Pull request refresh failed: {err}"));
                }
            },
            AppEvent::DetailLoaded { request_id, result } => {
                if request_id != self.detail_request_id {
                    return;
                }
                let mut state = self.state.borrow_mut();
                match result {
                    Ok(text) if text.trim().is_empty() => {
                        state.set_detail_text("(no changes)");
                    }
                    Ok(text) => state.set_detail_text(text),
                    Err(err) => state.set_detail_text(format!("Failed loading details:\n{err}")),
                }
            }
            AppEvent::ActionFinished {
                preview,
                was_commit,
                result,
            } => {
                {
                    let mut state = self.state.borrow_mut();
                    match result {
                        Ok(output) if output.success => {
                            state.append_log(format!("OK: {}", output.command_preview));
                            state.set_status(format!("Done: {preview}"));
                            if was_commit {
                                state.commit_message.saved.clear();
                            }
                        }
                        Ok(output) => {
                            let detail = if output.stderr.trim().is_empty() {
                                output.stdout.trim().to_string()
                            } else {
                                output.stderr.trim().to_string()
                            };
                            state.append_log(format!("FAILED: {preview}: {detail}"));
                            state.set_status("Command failed (see log).");
                        }
                        Err(err) => {
                            state.append_log(format!("FAILED: {preview}: {err}"));
                            state.set_status("Command failed (see log).");
                        }
                    }
                }
                self.request_snapshot();
            }
            AppEvent::OpenKeybindingsMenu => self.open_keybindings_menu(),
            AppEvent::DispatchKey { context, key } => self.dispatch_key(context, &key),
            AppEvent::RefreshRequested => self.request_snapshot(),
        }
    }

    fn open_keybindings_menu(&mut self) {
        let origin = self.state.borrow().current_context();
        if origin == ContextKey::Menu {
            return;
        }
        let mut seen = Vec::new();
        let mut items = Vec::new();
        for (key, description) in self.registry.bindings_for(origin) {
            seen.push(key);
            items.push(MenuItem {
                label: format!("{key:>10}  {description}"),
                action: MenuAction::DispatchKey {
                    context: origin,
                    key: key.to_string(),
                },
            });
        }
        if origin != ContextKey::Global {
            for (key, description) in self.registry.bindings_for(ContextKey::Global) {
                if seen.contains(&key) {
                    continue;
                }
                items.push(MenuItem {
                    label: format!("{key:>10}  {description}"),
                    action: MenuAction::DispatchKey {
                        context: ContextKey::Global,
                        key: key.to_string(),
                    },
                });
            }
        }
        {
            let mut state = self.state.borrow_mut();
            state.menu = Some(MenuState {
                title: "Keybindings".to_string(),
                items,
            });
            state.push_context(ContextKey::Menu);
        }
        self.sync_focus();
    }

    fn request_snapshot(&mut self) {
        self.last_refresh = Instant::now();
        self.state
            .borrow_mut()
            .set_status("Refreshing repository state…");
        let git = Arc::clone(&self.git);
        let tx = self.event_tx.clone();
        let options = SnapshotOptions {
            commit_limit: self.config.commit_limit,
        };
        tokio::spawn(async move {
            let result = git
                .load_snapshot(options)
                .await
                .map_err(|err| err.to_string());
            let _ = tx.send(AppEvent::SnapshotLoaded { result });
        });
    }

    fn refresh_detail(&mut self) {
        let current = self.state.borrow().current_context();
        let request = match current {
            ContextKey::Files => self
                .contexts
                .files
                .selected_file_path()
                .map(DetailRequest::FileDiff),
            ContextKey::LocalCommits => self
                .contexts
                .local_commits
                .selected_commit()
                .map(|commit| DetailRequest::RefPatch(commit.sha)),
            ContextKey::ReflogCommits => self
                .contexts
                .reflog_commits
                .selected_commit()
                .map(|commit| DetailRequest::RefPatch(commit.sha)),
            ContextKey::SubCommits => self
                .contexts
                .sub_commits
                .selected_commit()
                .map(|commit| DetailRequest::RefPatch(commit.sha)),
            ContextKey::Stash => self
                .contexts
                .stash
                .selected_entry()
                .map(|entry| DetailRequest::RefPatch(entry.ref_name())),
            ContextKey::Menu | ContextKey::CommitMessage => return,
            _ => None,
        };

        let request_id = self.detail_request_id.wrapping_add(1);
        self.detail_request_id = request_id;

        let Some(request) = request else {
            self.state
                .borrow_mut()
                .set_detail_text("Select a file, commit, or stash entry to view details.");
            return;
        };

        let git = Arc::clone(&self.git);
        let tx = self.event_tx.clone();
        tokio::spawn(async move {
            let result = match request {
                DetailRequest::FileDiff(path) => git.diff_for_file(&path).await,
                DetailRequest::RefPatch(ref_name) => git.patch_for_ref(&ref_name).await,
            }
            .map_err(|err| err.to_string());
            let _ = tx.send(AppEvent::DetailLoaded { request_id, result });
        });
    }

    fn suspend_terminal(&self, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
        disable_raw_mode().context("failed disabling raw mode")?;
        terminal
            .backend_mut()
            .execute(terminal::LeaveAlternateScreen)
            .context("failed leaving alternate screen")?;
        terminal.show_cursor().context("failed showing cursor")?;
        Ok(())
    }

    fn resume_terminal(&self, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
        enable_raw_mode().context("failed enabling raw mode")?;
        terminal
            .backend_mut()
            .execute(terminal::EnterAlternateScreen)
            .context("failed entering alternate screen")?;
        terminal.clear().context("failed clearing terminal")?;
        Ok(())
    }

    /// Drops out of the TUI, runs the user's editor on the file, and resumes.
    fn edit_file(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
        path: &str,
    ) -> Result<()> {
        self.suspend_terminal(terminal)?;
        let editor = self.common.os.editor();
        self.state
            .borrow_mut()
            .append_log(format!("Editing {path} with {editor}"));

        let mut parts = editor.split_whitespace();
        let program = parts.next().unwrap_or("vi").to_string();
        let mut command = std::process::Command::new(&program);
        command.args(parts).arg(path);
        let status = command
            .status()
            .with_context(|| format!("failed to launch editor '{program}'"))?;

        self.resume_terminal(terminal)?;
        if !status.success() {
            self.state
                .borrow_mut()
                .append_log(format!("Editor exited with {status}"));
        }
        Ok(())
    }

    fn restore_terminal(&self, mut terminal: Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
        disable_raw_mode().ok();
        terminal
            .backend_mut()
            .execute(terminal::LeaveAlternateScreen)
            .ok();
        terminal.show_cursor().ok();
        Ok(())
    }
}

pub async fn run_app(config: AppConfig, startup_issues: Vec<String>) -> Result<()> {
    let mut app = App::new_with_startup_issues(config, startup_issues)?;
    app.run().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controllers::testing::StubGit;
    use crate::state::PendingConfirmation;
    use crossterm::event::{KeyEventKind, KeyEventState};

    fn test_app() -> App {
        App::with_client(AppConfig::default(), Arc::new(StubGit) as Arc<dyn GitClient>)
            .expect("setup succeeds")
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    #[test]
    fn quit_key_falls_through_to_the_global_context() {
        let mut app = test_app();
        app.handle_key(key(KeyCode::Char('q')));
        assert!(app.state.borrow().should_quit);
    }

    #[test]
    fn unbound_keys_are_ignored() {
        let mut app = test_app();
        app.handle_key(key(KeyCode::Char('!')));
        assert!(!app.state.borrow().should_quit);
        assert!(app.state.borrow().confirmation.is_none());
    }

    #[tokio::test]
    async fn confirmation_yes_runs_the_pending_action() {
        let mut app = test_app();
        app.state.borrow_mut().confirmation = Some(PendingConfirmation {
            message: "Pull?".to_string(),
            action: GitAction::Pull,
        });
        app.handle_key(key(KeyCode::Char('y')));
        let state = app.state.borrow();
        assert!(state.confirmation.is_none());
        assert!(state.status_line.contains("git pull"));
    }

    #[test]
    fn confirmation_no_cancels() {
        let mut app = test_app();
        app.state.borrow_mut().confirmation = Some(PendingConfirmation {
            message: "Pull?".to_string(),
            action: GitAction::Pull,
        });
        app.handle_key(key(KeyCode::Esc));
        let state = app.state.borrow();
        assert!(state.confirmation.is_none());
        assert_eq!(state.status_line, "Cancelled.");
    }

    #[test]
    fn commit_message_context_captures_plain_characters() {
        let mut app = test_app();
        app.state
            .borrow_mut()
            .push_context(ContextKey::CommitMessage);
        for c in ['f', 'i', 'x'] {
            app.handle_key(key(KeyCode::Char(c)));
        }
        app.handle_key(key(KeyCode::Backspace));
        assert_eq!(app.state.borrow().commit_message.buffer, "fi");
    }

    #[test]
    fn keybindings_menu_collects_context_and_global_bindings() {
        let mut app = test_app();
        app.handle_app_event(AppEvent::OpenKeybindingsMenu);
        let state = app.state.borrow();
        assert_eq!(state.current_context(), ContextKey::Menu);
        let menu = state.menu.as_ref().expect("menu open");
        assert!(menu.items.iter().any(|item| item.label.contains("quit")));
        assert!(
            menu.items
                .iter()
                .any(|item| item.label.contains("stage / unstage file"))
        );
    }

    #[test]
    fn dispatch_key_event_resolves_against_the_named_context() {
        let mut app = test_app();
        app.handle_app_event(AppEvent::DispatchKey {
            context: ContextKey::Global,
            key: "q".to_string(),
        });
        assert!(app.state.borrow().should_quit);
    }

    #[tokio::test]
    async fn successful_commit_clears_the_saved_draft() {
        let mut app = test_app();
        app.state.borrow_mut().commit_message.saved = "draft".to_string();
        app.handle_app_event(AppEvent::ActionFinished {
            preview: "git commit -m <message>".to_string(),
            was_commit: true,
            result: Ok(CommandResult {
                command_preview: "git commit -m <message>".to_string(),
                success: true,
                stdout: String::new(),
                stderr: String::new(),
            }),
        });
        assert!(app.state.borrow().commit_message.saved.is_empty());
    }

    #[tokio::test]
    async fn failed_action_is_logged_and_the_loop_survives() {
        let mut app = test_app();
        app.handle_app_event(AppEvent::ActionFinished {
            preview: "git push".to_string(),
            was_commit: false,
            result: Ok(CommandResult {
                command_preview: "git push".to_string(),
                success: false,
                stdout: String::new(),
                stderr: "rejected".to_string(),
            }),
        });
        let state = app.state.borrow();
        assert!(state.log_lines.iter().any(|line| line.contains("rejected")));
        assert!(!state.should_quit);
    }

    #[tokio::test]
    async fn sub_commits_event_replaces_the_list_and_switches_context() {
        let mut app = test_app();
        app.handle_app_event(AppEvent::SubCommitsLoaded {
            ref_name: "feature/login".to_string(),
            result: Ok(vec![Commit {
                sha: "abc".to_string(),
                author: "a".to_string(),
                unix_timestamp: 0,
                subject: "s".to_string(),
            }]),
        });
        let state = app.state.borrow();
        assert_eq!(state.model.sub_commits.len(), 1);
        assert_eq!(state.current_context(), ContextKey::SubCommits);
    }
}
