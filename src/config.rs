use std::fs;
use std::path::PathBuf;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_theme")]
    pub theme: String,
    /// Insert a pull-request column into the branches panel, populated from
    /// the `gh` CLI.
    #[serde(default)]
    pub show_pull_requests: bool,
    /// Append the upstream name as a trailing branches column.
    #[serde(default)]
    pub full_description: bool,
    #[serde(default)]
    pub gpg_sign: bool,
    #[serde(default = "default_commit_limit")]
    pub commit_limit: usize,
}

fn default_theme() -> String {
    "auto".to_string()
}

fn default_commit_limit() -> usize {
    300
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            theme: default_theme(),
            show_pull_requests: false,
            full_description: false,
            gpg_sign: false,
            commit_limit: default_commit_limit(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConfigLoadReport {
    pub config: AppConfig,
    pub path: Option<PathBuf>,
    pub issues: Vec<String>,
}

pub fn load_config_with_report() -> ConfigLoadReport {
    let path = default_config_path();
    let mut issues = Vec::new();
    let config = match path.clone() {
        Some(path) => match read_config(&path) {
            Ok(Some(config)) => config,
            Ok(None) => AppConfig::default(),
            Err(err) => {
                issues.push(err);
                AppConfig::default()
            }
        },
        None => {
            issues.push("failed to locate user config directory".to_string());
            AppConfig::default()
        }
    };

    issues.extend(validate_config(&config));

    ConfigLoadReport {
        config,
        path,
        issues,
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    let mut base = dirs::config_dir()?;
    base.push("easygit");
    base.push("config.toml");
    Some(base)
}

fn read_config(path: &PathBuf) -> Result<Option<AppConfig>, String> {
    if !path.exists() {
        return Ok(None);
    }
    let raw = fs::read_to_string(path).map_err(|err| format!("failed reading {path:?}: {err}"))?;
    let config = toml::from_str::<AppConfig>(&raw)
        .map_err(|err| format!("failed parsing {path:?} as TOML: {err}"))?;
    Ok(Some(config))
}

pub fn validate_config(config: &AppConfig) -> Vec<String> {
    let mut issues = Vec::new();
    match config.theme.trim() {
        "auto" | "light" | "dark" => {}
        other => issues.push(format!(
            "invalid theme '{other}' (expected: auto, light, dark)"
        )),
    }
    if config.commit_limit == 0 {
        issues.push("commit_limit must be at least 1".to_string());
    }
    issues
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_config() {
        let raw = r#"
theme = "dark"
show_pull_requests = true
full_description = true
gpg_sign = true
commit_limit = 50
"#;
        let config = toml::from_str::<AppConfig>(raw).expect("config parses");
        assert_eq!(config.theme, "dark");
        assert!(config.show_pull_requests);
        assert!(config.full_description);
        assert!(config.gpg_sign);
        assert_eq!(config.commit_limit, 50);
    }

    #[test]
    fn defaults_apply_for_missing_fields() {
        let config = toml::from_str::<AppConfig>("").expect("empty config parses");
        assert_eq!(config.theme, "auto");
        assert!(!config.show_pull_requests);
        assert!(!config.full_description);
        assert_eq!(config.commit_limit, 300);
    }

    #[test]
    fn validate_config_reports_errors() {
        let mut config = AppConfig::default();
        config.theme = "neon".to_string();
        config.commit_limit = 0;

        let issues = validate_config(&config);
        assert!(issues.iter().any(|line| line.contains("invalid theme")));
        assert!(issues.iter().any(|line| line.contains("commit_limit")));
    }
}
