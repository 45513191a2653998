use std::fs;
use std::path::PathBuf;
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

fn temp_dir(prefix: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    std::env::temp_dir().join(format!("{prefix}-{}-{nanos}", std::process::id()))
}

fn easygit_bin() -> String {
    if let Ok(path) = std::env::var("CARGO_BIN_EXE_easygit") {
        return path;
    }
    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    manifest_dir
        .join("target")
        .join("debug")
        .join("easygit")
        .display()
        .to_string()
}

#[test]
fn help_prints_usage() {
    let output = Command::new(easygit_bin())
        .arg("--help")
        .output()
        .expect("run easygit --help");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("USAGE"));
    assert!(stdout.contains("--check-config"));
}

#[test]
fn version_prints_name_and_version() {
    let output = Command::new(easygit_bin())
        .arg("-V")
        .output()
        .expect("run easygit -V");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("easygit"));
}

#[test]
fn unknown_option_is_rejected() {
    let output = Command::new(easygit_bin())
        .arg("--bogus")
        .output()
        .expect("run easygit --bogus");
    assert!(!output.status.success());
}

#[test]
fn check_config_returns_non_zero_for_invalid_config() {
    let home = temp_dir("easygit-cli-config");
    let mac_path = home
        .join("Library")
        .join("Application Support")
        .join("easygit");
    let xdg_path = home.join(".config").join("easygit");
    fs::create_dir_all(&mac_path).expect("create mac config path");
    fs::create_dir_all(&xdg_path).expect("create xdg config path");

    let raw = r#"
theme = "neon"
commit_limit = 0
"#;
    fs::write(mac_path.join("config.toml"), raw).expect("write mac config");
    fs::write(xdg_path.join("config.toml"), raw).expect("write xdg config");

    let output = Command::new(easygit_bin())
        .arg("--check-config")
        .env("HOME", &home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .output()
        .expect("run easygit --check-config");

    assert_eq!(output.status.code(), Some(2));
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).expect("parse json");
    assert_eq!(json["ok"], false);
    let issues = json["issues"].as_array().expect("issues array");
    assert!(!issues.is_empty());
    assert!(
        issues
            .iter()
            .any(|issue| issue.as_str().unwrap_or_default().contains("invalid theme"))
    );

    fs::remove_dir_all(&home).ok();
}

#[test]
fn check_config_accepts_a_valid_config() {
    let home = temp_dir("easygit-cli-config-ok");
    let mac_path = home
        .join("Library")
        .join("Application Support")
        .join("easygit");
    let xdg_path = home.join(".config").join("easygit");
    fs::create_dir_all(&mac_path).expect("create mac config path");
    fs::create_dir_all(&xdg_path).expect("create xdg config path");

    let raw = r#"
theme = "dark"
show_pull_requests = true
"#;
    fs::write(mac_path.join("config.toml"), raw).expect("write mac config");
    fs::write(xdg_path.join("config.toml"), raw).expect("write xdg config");

    let output = Command::new(easygit_bin())
        .arg("--check-config")
        .env("HOME", &home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .output()
        .expect("run easygit --check-config");

    assert_eq!(output.status.code(), Some(0));
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).expect("parse json");
    assert_eq!(json["ok"], true);

    fs::remove_dir_all(&home).ok();
}
