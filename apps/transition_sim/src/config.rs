use std::{fs, path::Path};

use clap::ValueEnum;
use serde::Deserialize;
use tracing::warn;
use transition_core::{routes::DEFAULT_ARTICLE_PREFIX, ArticleEntry, TimingSettings};

/// How the simulated animated-swap primitive behaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum SwapMode {
    #[default]
    Resolve,
    RejectReady,
    RejectFinished,
    Stall,
    FailToStart,
    Unsupported,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub swap: SwapMode,
    pub animation_ms: u64,
    pub home: String,
    pub article_prefix: String,
    pub timings: TimingSettings,
    pub articles: Vec<ArticleEntry>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            swap: SwapMode::Resolve,
            animation_ms: 300,
            home: "/".into(),
            article_prefix: DEFAULT_ARTICLE_PREFIX.into(),
            timings: TimingSettings::default(),
            articles: vec![
                ArticleEntry::new("sean-kenary", "Sean Kenary"),
                ArticleEntry::new("mitchel-wu", "Mitchel Wu"),
                ArticleEntry::new("kristina-alegro", "Kristina Alegro"),
            ],
        }
    }
}

pub fn load_settings(path: &Path) -> Settings {
    let mut settings = match fs::read_to_string(path) {
        Ok(raw) => toml::from_str::<Settings>(&raw).unwrap_or_else(|error| {
            warn!(path = %path.display(), %error, "config: unparsable settings file; using defaults");
            Settings::default()
        }),
        Err(_) => Settings::default(),
    };

    apply_env_overrides(&mut settings, |key| std::env::var(key).ok());
    settings
}

pub fn apply_env_overrides(settings: &mut Settings, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(v) = lookup("APP__SWAP") {
        match SwapMode::from_str(&v, true) {
            Ok(mode) => settings.swap = mode,
            Err(error) => warn!(value = %v, %error, "config: ignoring APP__SWAP"),
        }
    }
    if let Some(v) = lookup("APP__HOME") {
        settings.home = v;
    }
    if let Some(v) = lookup("APP__ARTICLE_PREFIX") {
        settings.article_prefix = v;
    }

    let millis = |key: &str| lookup(key).and_then(|v| v.trim().parse::<u64>().ok());
    if let Some(v) = millis("APP__ANIMATION_MS") {
        settings.animation_ms = v;
    }
    if let Some(v) = millis("APP__PRELOAD_SETTLE_MS") {
        settings.timings.preload_settle_ms = v;
    }
    if let Some(v) = millis("APP__COMMIT_DELAY_MS") {
        settings.timings.commit_delay_ms = v;
    }
    if let Some(v) = millis("APP__ANIMATION_TIMEOUT_MS") {
        settings.timings.animation_timeout_ms = v;
    }
    if let Some(v) = millis("APP__SAFETY_MARGIN_MS") {
        settings.timings.safety_margin_ms = Some(v);
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn parses_full_settings_file() {
        let raw = r#"
            swap = "stall"
            animation_ms = 120
            article_prefix = "/articles/"

            [timings]
            animation_timeout_ms = 800

            [[articles]]
            slug = "one"
            title = "One"
        "#;
        let settings: Settings = toml::from_str(raw).expect("parse");
        assert_eq!(settings.swap, SwapMode::Stall);
        assert_eq!(settings.animation_ms, 120);
        assert_eq!(settings.home, "/");
        assert_eq!(settings.timings.animation_timeout_ms, 800);
        assert_eq!(settings.timings.preload_settle_ms, 100);
        assert_eq!(settings.articles, vec![ArticleEntry::new("one", "One")]);
    }

    #[test]
    fn env_overrides_win_over_file_values() {
        let mut settings = Settings::default();
        apply_env_overrides(
            &mut settings,
            lookup_from(&[
                ("APP__SWAP", "reject-finished"),
                ("APP__ANIMATION_TIMEOUT_MS", "1500"),
                ("APP__SAFETY_MARGIN_MS", " 40 "),
            ]),
        );
        assert_eq!(settings.swap, SwapMode::RejectFinished);
        assert_eq!(settings.timings.animation_timeout_ms, 1500);
        assert_eq!(settings.timings.safety_margin_ms, Some(40));
    }

    #[test]
    fn unparsable_env_values_are_ignored() {
        let mut settings = Settings::default();
        apply_env_overrides(
            &mut settings,
            lookup_from(&[("APP__SWAP", "explode"), ("APP__COMMIT_DELAY_MS", "soon")]),
        );
        assert_eq!(settings.swap, SwapMode::Resolve);
        assert_eq!(settings.timings.commit_delay_ms, 20);
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let settings = load_settings(Path::new("./definitely/not/here/transition.toml"));
        assert_eq!(settings.articles.len(), 3);
        assert_eq!(settings.article_prefix, "/interviews/");
    }
}
