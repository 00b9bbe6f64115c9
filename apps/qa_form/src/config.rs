use std::{collections::HashMap, fs, path::Path, time::Duration};

use anyhow::{bail, Context};
use url::Url;

pub const DEFAULT_CONFIG_FILE: &str = "qa_form.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub backend_url: String,
    pub request_timeout_secs: Option<u64>,
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            backend_url: "http://localhost:8000".into(),
            request_timeout_secs: None,
            log_filter: "info".into(),
        }
    }
}

impl Settings {
    /// Zero means no deadline, same as leaving it unset.
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }
}

/// Defaults, then the config file, then the environment.
pub fn load_settings(config_path: Option<&Path>) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    match config_path {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("failed to read config file '{}'", path.display()))?;
            apply_file_config(&mut settings, &raw)
                .with_context(|| format!("invalid config file '{}'", path.display()))?;
        }
        None => {
            if let Ok(raw) = fs::read_to_string(DEFAULT_CONFIG_FILE) {
                apply_file_config(&mut settings, &raw)
                    .with_context(|| format!("invalid config file '{DEFAULT_CONFIG_FILE}'"))?;
            }
        }
    }

    apply_env_overrides(&mut settings, |key| std::env::var(key).ok());
    Ok(settings)
}

fn apply_file_config(settings: &mut Settings, raw: &str) -> anyhow::Result<()> {
    let file_cfg: HashMap<String, toml::Value> = toml::from_str(raw)?;

    if let Some(v) = file_cfg.get("backend_url") {
        let Some(url) = v.as_str() else {
            bail!("backend_url must be a string");
        };
        settings.backend_url = url.to_string();
    }
    if let Some(v) = file_cfg.get("request_timeout_secs") {
        settings.request_timeout_secs = Some(match v {
            toml::Value::Integer(secs) => u64::try_from(*secs)
                .context("request_timeout_secs must not be negative")?,
            toml::Value::String(secs) => secs
                .trim()
                .parse()
                .context("request_timeout_secs must be a number")?,
            _ => bail!("request_timeout_secs must be a number"),
        });
    }
    if let Some(v) = file_cfg.get("log_filter").and_then(toml::Value::as_str) {
        settings.log_filter = v.to_string();
    }

    Ok(())
}

fn apply_env_overrides(settings: &mut Settings, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(v) = lookup("QA_BACKEND_URL") {
        settings.backend_url = v;
    }
    if let Some(v) = lookup("APP__BACKEND_URL") {
        settings.backend_url = v;
    }

    if let Some(v) = lookup("APP__REQUEST_TIMEOUT_SECS") {
        if let Ok(parsed) = v.trim().parse::<u64>() {
            settings.request_timeout_secs = Some(parsed);
        }
    }

    if let Some(v) = lookup("APP__LOG_FILTER") {
        settings.log_filter = v;
    }
}

pub fn validate_backend_url(raw_backend_url: &str) -> anyhow::Result<String> {
    let backend_url = normalize_backend_url(raw_backend_url);
    let parsed = Url::parse(&backend_url)
        .with_context(|| format!("invalid backend url '{backend_url}'"))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        bail!(
            "backend url '{backend_url}' must use http or https, not '{}'",
            parsed.scheme()
        );
    }
    if parsed.host_str().is_none() {
        bail!("backend url '{backend_url}' has no host");
    }
    Ok(backend_url)
}

fn normalize_backend_url(raw_backend_url: &str) -> String {
    let raw_backend_url = raw_backend_url.trim();

    if raw_backend_url.is_empty() {
        return Settings::default().backend_url;
    }

    let with_scheme = if raw_backend_url.contains("://") {
        raw_backend_url.to_string()
    } else {
        format!("http://{raw_backend_url}")
    };

    with_scheme.trim_end_matches('/').to_string()
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
