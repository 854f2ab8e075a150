use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use closet_core::config::{AppConfig, LoadOptions, DEFAULT_CONFIG_FILE};
use toml::Value;

use crate::commands::{CommandResult, EXIT_CONFIG};

/// Resolved file, if any, and its raw document for source attribution.
struct FileSource {
    path: Option<PathBuf>,
    doc: Option<Value>,
}

impl FileSource {
    fn detect() -> Self {
        let candidates =
            [PathBuf::from(DEFAULT_CONFIG_FILE), Path::new("config").join(DEFAULT_CONFIG_FILE)];
        let path = candidates.into_iter().find(|path| path.exists());
        let doc = path
            .as_deref()
            .and_then(|path| fs::read_to_string(path).ok())
            .and_then(|raw| raw.parse::<Value>().ok());
        Self { path, doc }
    }

    fn source_of(&self, key_path: &str, env_keys: &[&str]) -> String {
        if let Some(env_key) = env_keys.iter().find(|key| env::var_os(key).is_some()) {
            return format!("env ({env_key})");
        }

        if let Some(doc) = &self.doc {
            if contains_path(doc, key_path) {
                let file_path = self
                    .path
                    .as_ref()
                    .map(|path| path.display().to_string())
                    .unwrap_or_else(|| "config file".to_string());
                return format!("file ({file_path})");
            }
        }

        "default".to_string()
    }
}

pub fn run() -> CommandResult {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure(
                "config",
                "config_validation",
                format!("configuration issue: {error}"),
                EXIT_CONFIG,
            );
        }
    };

    CommandResult::success("config", render(&config, &FileSource::detect()))
}

fn render(config: &AppConfig, file: &FileSource) -> String {
    let fields: [(&str, String, &[&str]); 11] = [
        (
            "outfits.max_outfits_per_build",
            config.outfits.max_outfits_per_build.to_string(),
            &["CLOSET_OUTFITS_MAX_PER_BUILD"],
        ),
        (
            "outfits.max_outfits_per_scenario",
            config.outfits.max_outfits_per_scenario.to_string(),
            &["CLOSET_OUTFITS_MAX_PER_SCENARIO"],
        ),
        (
            "needs.default_seasonal_uses",
            config.needs.default_seasonal_uses.to_string(),
            &["CLOSET_NEEDS_DEFAULT_SEASONAL_USES"],
        ),
        (
            "needs.wears_per_outfit",
            config.needs.wears_per_outfit.to_string(),
            &["CLOSET_NEEDS_WEARS_PER_OUTFIT"],
        ),
        (
            "scoring.outfit_bonus",
            config.scoring.outfit_bonus.to_string(),
            &["CLOSET_SCORING_OUTFIT_BONUS"],
        ),
        (
            "scoring.max_outfit_bonus",
            config.scoring.max_outfit_bonus.to_string(),
            &["CLOSET_SCORING_MAX_OUTFIT_BONUS"],
        ),
        (
            "scoring.no_outfit_penalty",
            config.scoring.no_outfit_penalty.to_string(),
            &["CLOSET_SCORING_NO_OUTFIT_PENALTY"],
        ),
        (
            "scoring.critical_gap_penalty",
            config.scoring.critical_gap_penalty.to_string(),
            &["CLOSET_SCORING_CRITICAL_GAP_PENALTY"],
        ),
        (
            "scoring.improvement_gap_penalty",
            config.scoring.improvement_gap_penalty.to_string(),
            &["CLOSET_SCORING_IMPROVEMENT_GAP_PENALTY"],
        ),
        (
            "logging.level",
            config.logging.level.clone(),
            &["CLOSET_LOGGING_LEVEL", "CLOSET_LOG_LEVEL"],
        ),
        (
            "logging.format",
            format!("{:?}", config.logging.format).to_ascii_lowercase(),
            &["CLOSET_LOGGING_FORMAT", "CLOSET_LOG_FORMAT"],
        ),
    ];

    let mut lines = vec!["effective config (source precedence: env > file > default):".to_string()];
    for (key, value, env_keys) in fields {
        lines.push(format!("- {key} = {value} (source: {})", file.source_of(key, env_keys)));
    }

    lines.join("\n")
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}
