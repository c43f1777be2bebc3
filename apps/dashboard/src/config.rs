use std::{collections::HashMap, fs, io, path::Path, path::PathBuf, time::Duration};

use serde::Serialize;

pub const SETTINGS_FILE: &str = "dashboard.toml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Settings {
    pub fixtures_path: Option<PathBuf>,
    pub auto_dismiss_ms: u64,
    pub current_user: String,
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            fixtures_path: None,
            auto_dismiss_ms: 2000,
            current_user: "Carlos Méndez".into(),
            log_filter: "info".into(),
        }
    }
}

impl Settings {
    pub fn auto_dismiss_after(&self) -> Duration {
        Duration::from_millis(self.auto_dismiss_ms)
    }
}

/// Effective settings, plus a description of a settings file that exists but
/// could not be used.
pub fn load_settings() -> (Settings, Option<String>) {
    load_settings_from(Path::new(SETTINGS_FILE), |key| std::env::var(key).ok())
}

/// Defaults, then the settings file, then `DASHBOARD_*` and finally `APP__*`
/// environment variables.
pub fn load_settings_from<F>(path: &Path, env: F) -> (Settings, Option<String>)
where
    F: Fn(&str) -> Option<String>,
{
    let mut settings = Settings::default();

    let problem = match fs::read_to_string(path) {
        Ok(raw) => apply_file(&mut settings, &raw)
            .err()
            .map(|err| format!("ignoring malformed {}: {err}", path.display())),
        Err(err) if err.kind() == io::ErrorKind::NotFound => None,
        Err(err) => Some(format!("ignoring unreadable {}: {err}", path.display())),
    };
    apply_env(&mut settings, env);

    (settings, problem)
}

fn apply_file(settings: &mut Settings, raw: &str) -> Result<(), toml::de::Error> {
    let file_cfg = toml::from_str::<HashMap<String, toml::Value>>(raw)?;

    if let Some(v) = file_cfg.get("fixtures_path").and_then(toml::Value::as_str) {
        settings.fixtures_path = Some(PathBuf::from(v));
    }
    if let Some(v) = file_cfg.get("auto_dismiss_ms") {
        if let Some(ms) = v.as_integer().and_then(|ms| u64::try_from(ms).ok()) {
            settings.auto_dismiss_ms = ms;
        } else if let Some(ms) = v.as_str().and_then(|ms| ms.parse().ok()) {
            settings.auto_dismiss_ms = ms;
        }
    }
    if let Some(v) = file_cfg.get("current_user").and_then(toml::Value::as_str) {
        settings.current_user = v.to_string();
    }
    if let Some(v) = file_cfg.get("log_filter").and_then(toml::Value::as_str) {
        settings.log_filter = v.to_string();
    }
    Ok(())
}

fn apply_env<F>(settings: &mut Settings, env: F)
where
    F: Fn(&str) -> Option<String>,
{
    for prefix in ["DASHBOARD_", "APP__"] {
        if let Some(v) = env(&format!("{prefix}FIXTURES_PATH")) {
            settings.fixtures_path = Some(PathBuf::from(v));
        }
        if let Some(v) = env(&format!("{prefix}AUTO_DISMISS_MS")) {
            if let Ok(parsed) = v.trim().parse::<u64>() {
                settings.auto_dismiss_ms = parsed;
            }
        }
        if let Some(v) = env(&format!("{prefix}CURRENT_USER")) {
            settings.current_user = v;
        }
        if let Some(v) = env(&format!("{prefix}LOG_FILTER")) {
            settings.log_filter = v;
        }
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
