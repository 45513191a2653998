mod app;
mod config;
mod controllers;
mod domain;
mod git;
mod keys;
mod os;
mod presentation;
mod state;
mod ui;

use anyhow::{Result, bail};

const APP_NAME: &str = env!("CARGO_PKG_NAME");
const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
const HELP_TEXT: &str = "\
easygit - lazygit-style terminal UI for Git

USAGE:
  easygit [OPTIONS]

OPTIONS:
  -h, --help         Print help and exit
  -V, --version      Print version and exit
      --check-config Validate the config file and exit (status 2 on issues)
";

#[derive(Debug)]
enum CliMode {
    RunTui,
    PrintHelp,
    PrintVersion,
    CheckConfig,
}

fn parse_cli_mode<I, S>(args: I) -> Result<CliMode>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut mode = CliMode::RunTui;
    for arg in args.into_iter().skip(1).map(Into::into) {
        match arg.as_str() {
            "-h" | "--help" => mode = CliMode::PrintHelp,
            "-V" | "--version" => mode = CliMode::PrintVersion,
            "--check-config" => mode = CliMode::CheckConfig,
            other => bail!("unknown option: {other}\n\n{HELP_TEXT}"),
        }
    }
    Ok(mode)
}

fn check_config() -> i32 {
    let report = config::load_config_with_report();
    let ok = report.issues.is_empty();
    let output = serde_json::json!({
        "ok": ok,
        "path": report.path.map(|path| path.display().to_string()),
        "issues": report.issues,
    });
    println!("{output}");
    if ok { 0 } else { 2 }
}

#[tokio::main]
async fn main() -> Result<()> {
    match parse_cli_mode(std::env::args())? {
        CliMode::PrintHelp => {
            println!("{HELP_TEXT}");
            Ok(())
        }
        CliMode::PrintVersion => {
            println!("{APP_NAME} {APP_VERSION}");
            Ok(())
        }
        CliMode::CheckConfig => {
            std::process::exit(check_config());
        }
        CliMode::RunTui => {
            let report = config::load_config_with_report();
            app::run_app(report.config, report.issues).await
        }
    }
}
