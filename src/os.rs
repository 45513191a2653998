use std::io::Write;
use std::process::{Command, Stdio};

use anyhow::{Context, Result, anyhow};

/// Thin facade over non-git OS commands: clipboard, browser, editor lookup.
/// These are short-lived local processes, run blocking on the loop thread.
#[derive(Debug, Clone, Default)]
pub struct OsCommand;

impl OsCommand {
    pub fn new() -> Self {
        Self
    }

    pub fn copy_to_clipboard(&self, text: &str) -> Result<()> {
        let candidates: &[(&str, &[&str])] = &[
            ("wl-copy", &[]),
            ("xclip", &["-selection", "clipboard"]),
            ("pbcopy", &[]),
        ];
        for (program, args) in candidates {
            let spawned = Command::new(program)
                .args(*args)
                .stdin(Stdio::piped())
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .spawn();
            let Ok(mut child) = spawned else { continue };
            if let Some(stdin) = child.stdin.as_mut() {
                stdin
                    .write_all(text.as_bytes())
                    .context("failed writing to clipboard command")?;
            }
            let status = child.wait().context("failed waiting for clipboard command")?;
            if status.success() {
                return Ok(());
            }
        }
        Err(anyhow!("no working clipboard command found"))
    }

    pub fn open_link(&self, url: &str) -> Result<()> {
        for program in ["xdg-open", "open"] {
            let spawned = Command::new(program)
                .arg(url)
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .spawn();
            if spawned.is_ok() {
                return Ok(());
            }
        }
        Err(anyhow!("no working browser-opening command found"))
    }

    pub fn editor(&self) -> String {
        editor_from(std::env::var("EDITOR").ok())
    }
}

fn editor_from(env_editor: Option<String>) -> String {
    match env_editor {
        Some(editor) if !editor.trim().is_empty() => editor,
        _ => "vi".to_string(),
    }
}
