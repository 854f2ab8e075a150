use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::outfits::{DEFAULT_MAX_OUTFITS_PER_BUILD, DEFAULT_MAX_OUTFITS_PER_SCENARIO};
use crate::scoring::MAX_SCORE;

pub const DEFAULT_CONFIG_FILE: &str = "closet.toml";

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct AppConfig {
    pub outfits: OutfitSettings,
    pub needs: NeedsSettings,
    pub scoring: ScoringSettings,
    pub logging: LoggingConfig,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct OutfitSettings {
    pub max_outfits_per_build: usize,
    pub max_outfits_per_scenario: usize,
}

impl Default for OutfitSettings {
    fn default() -> Self {
        Self {
            max_outfits_per_build: DEFAULT_MAX_OUTFITS_PER_BUILD,
            max_outfits_per_scenario: DEFAULT_MAX_OUTFITS_PER_SCENARIO,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct NeedsSettings {
    /// Seasonal uses assumed when the frequency text says nothing useful
    pub default_seasonal_uses: u32,
    /// How many times one outfit is worn per season before it counts as used up
    pub wears_per_outfit: u32,
}

impl Default for NeedsSettings {
    fn default() -> Self {
        Self { default_seasonal_uses: 5, wears_per_outfit: 4 }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ScoringSettings {
    pub outfit_bonus: f64,
    pub max_outfit_bonus: f64,
    pub no_outfit_penalty: f64,
    pub critical_gap_penalty: f64,
    pub improvement_gap_penalty: f64,
}

impl Default for ScoringSettings {
    fn default() -> Self {
        Self {
            outfit_bonus: 0.5,
            max_outfit_bonus: 2.0,
            no_outfit_penalty: 1.5,
            critical_gap_penalty: 0.5,
            improvement_gap_penalty: 0.25,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_string(), format: LogFormat::Compact }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub log_level: Option<String>,
    pub log_format: Option<LogFormat>,
    pub max_outfits_per_build: Option<usize>,
    pub max_outfits_per_scenario: Option<usize>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("environment variable interpolation failed for `{var}`")]
    MissingEnvInterpolation { var: String },
    #[error("unterminated environment interpolation expression")]
    UnterminatedInterpolation,
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

impl AppConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch);
        } else if options.require_file {
            let expected =
                options.config_path.unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(outfits) = patch.outfits {
            if let Some(value) = outfits.max_outfits_per_build {
                self.outfits.max_outfits_per_build = value;
            }
            if let Some(value) = outfits.max_outfits_per_scenario {
                self.outfits.max_outfits_per_scenario = value;
            }
        }

        if let Some(needs) = patch.needs {
            if let Some(value) = needs.default_seasonal_uses {
                self.needs.default_seasonal_uses = value;
            }
            if let Some(value) = needs.wears_per_outfit {
                self.needs.wears_per_outfit = value;
            }
        }

        if let Some(scoring) = patch.scoring {
            if let Some(value) = scoring.outfit_bonus {
                self.scoring.outfit_bonus = value;
            }
            if let Some(value) = scoring.max_outfit_bonus {
                self.scoring.max_outfit_bonus = value;
            }
            if let Some(value) = scoring.no_outfit_penalty {
                self.scoring.no_outfit_penalty = value;
            }
            if let Some(value) = scoring.critical_gap_penalty {
                self.scoring.critical_gap_penalty = value;
            }
            if let Some(value) = scoring.improvement_gap_penalty {
                self.scoring.improvement_gap_penalty = value;
            }
        }

        if let Some(logging) = patch.logging {
            if let Some(level) = logging.level {
                self.logging.level = level;
            }
            if let Some(format) = logging.format {
                self.logging.format = format;
            }
        }
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(value) = read_env("CLOSET_OUTFITS_MAX_PER_BUILD") {
            self.outfits.max_outfits_per_build =
                parse_usize("CLOSET_OUTFITS_MAX_PER_BUILD", &value)?;
        }
        if let Some(value) = read_env("CLOSET_OUTFITS_MAX_PER_SCENARIO") {
            self.outfits.max_outfits_per_scenario =
                parse_usize("CLOSET_OUTFITS_MAX_PER_SCENARIO", &value)?;
        }

        if let Some(value) = read_env("CLOSET_NEEDS_DEFAULT_SEASONAL_USES") {
            self.needs.default_seasonal_uses =
                parse_u32("CLOSET_NEEDS_DEFAULT_SEASONAL_USES", &value)?;
        }
        if let Some(value) = read_env("CLOSET_NEEDS_WEARS_PER_OUTFIT") {
            self.needs.wears_per_outfit = parse_u32("CLOSET_NEEDS_WEARS_PER_OUTFIT", &value)?;
        }

        if let Some(value) = read_env("CLOSET_SCORING_OUTFIT_BONUS") {
            self.scoring.outfit_bonus = parse_f64("CLOSET_SCORING_OUTFIT_BONUS", &value)?;
        }
        if let Some(value) = read_env("CLOSET_SCORING_MAX_OUTFIT_BONUS") {
            self.scoring.max_outfit_bonus = parse_f64("CLOSET_SCORING_MAX_OUTFIT_BONUS", &value)?;
        }
        if let Some(value) = read_env("CLOSET_SCORING_NO_OUTFIT_PENALTY") {
            self.scoring.no_outfit_penalty =
                parse_f64("CLOSET_SCORING_NO_OUTFIT_PENALTY", &value)?;
        }
        if let Some(value) = read_env("CLOSET_SCORING_CRITICAL_GAP_PENALTY") {
            self.scoring.critical_gap_penalty =
                parse_f64("CLOSET_SCORING_CRITICAL_GAP_PENALTY", &value)?;
        }
        if let Some(value) = read_env("CLOSET_SCORING_IMPROVEMENT_GAP_PENALTY") {
            self.scoring.improvement_gap_penalty =
                parse_f64("CLOSET_SCORING_IMPROVEMENT_GAP_PENALTY", &value)?;
        }

        let log_level = read_env("CLOSET_LOGGING_LEVEL").or_else(|| read_env("CLOSET_LOG_LEVEL"));
        if let Some(value) = log_level {
            self.logging.level = value;
        }
        let log_format =
            read_env("CLOSET_LOGGING_FORMAT").or_else(|| read_env("CLOSET_LOG_FORMAT"));
        if let Some(value) = log_format {
            self.logging.format = value.parse()?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
        if let Some(log_format) = overrides.log_format {
            self.logging.format = log_format;
        }
        if let Some(max) = overrides.max_outfits_per_build {
            self.outfits.max_outfits_per_build = max;
        }
        if let Some(max) = overrides.max_outfits_per_scenario {
            self.outfits.max_outfits_per_scenario = max;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_outfits(&self.outfits)?;
        validate_needs(&self.needs)?;
        validate_scoring(&self.scoring)?;
        validate_logging(&self.logging)?;
        Ok(())
    }
}

fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    [PathBuf::from(DEFAULT_CONFIG_FILE), Path::new("config").join(DEFAULT_CONFIG_FILE)]
        .into_iter()
        .find(|path| path.exists())
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;

    let interpolated = interpolate_env_vars(&raw)?;
    toml::from_str::<ConfigPatch>(&interpolated)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

/// Expand `${VAR}` references. A missing variable is an error, not an empty string.
fn interpolate_env_vars(input: &str) -> Result<String, ConfigError> {
    let mut output = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find("${") {
        output.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let end = after.find('}').ok_or(ConfigError::UnterminatedInterpolation)?;
        let var = &after[..end];
        let value = env::var(var)
            .map_err(|_| ConfigError::MissingEnvInterpolation { var: var.to_string() })?;
        output.push_str(&value);
        rest = &after[end + 1..];
    }

    output.push_str(rest);
    Ok(output)
}

fn validate_outfits(outfits: &OutfitSettings) -> Result<(), ConfigError> {
    if outfits.max_outfits_per_build == 0 || outfits.max_outfits_per_build > 50 {
        return Err(ConfigError::Validation(
            "outfits.max_outfits_per_build must be in range 1..=50".to_string(),
        ));
    }

    if outfits.max_outfits_per_scenario == 0 || outfits.max_outfits_per_scenario > 100 {
        return Err(ConfigError::Validation(
            "outfits.max_outfits_per_scenario must be in range 1..=100".to_string(),
        ));
    }

    Ok(())
}

fn validate_needs(needs: &NeedsSettings) -> Result<(), ConfigError> {
    if needs.default_seasonal_uses == 0 {
        return Err(ConfigError::Validation(
            "needs.default_seasonal_uses must be greater than zero".to_string(),
        ));
    }

    if needs.wears_per_outfit == 0 {
        return Err(ConfigError::Validation(
            "needs.wears_per_outfit must be greater than zero".to_string(),
        ));
    }

    Ok(())
}

fn validate_scoring(scoring: &ScoringSettings) -> Result<(), ConfigError> {
    let weights = [
        ("scoring.outfit_bonus", scoring.outfit_bonus),
        ("scoring.max_outfit_bonus", scoring.max_outfit_bonus),
        ("scoring.no_outfit_penalty", scoring.no_outfit_penalty),
        ("scoring.critical_gap_penalty", scoring.critical_gap_penalty),
        ("scoring.improvement_gap_penalty", scoring.improvement_gap_penalty),
    ];

    for (key, value) in weights {
        if !value.is_finite() || !(0.0..=MAX_SCORE).contains(&value) {
            return Err(ConfigError::Validation(format!(
                "{key} must be a number in range 0..={MAX_SCORE}"
            )));
        }
    }

    Ok(())
}

fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
    let level = logging.level.trim().to_ascii_lowercase();
    match level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(ConfigError::Validation(
            "logging.level must be one of trace|debug|info|warn|error".to_string(),
        )),
    }
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn invalid_override(key: &str, value: &str) -> ConfigError {
    ConfigError::InvalidEnvOverride { key: key.to_string(), value: value.to_string() }
}

fn parse_usize(key: &str, value: &str) -> Result<usize, ConfigError> {
    value.trim().parse::<usize>().map_err(|_| invalid_override(key, value))
}

fn parse_u32(key: &str, value: &str) -> Result<u32, ConfigError> {
    value.trim().parse::<u32>().map_err(|_| invalid_override(key, value))
}

fn parse_f64(key: &str, value: &str) -> Result<f64, ConfigError> {
    value.trim().parse::<f64>().map_err(|_| invalid_override(key, value))
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigPatch {
    outfits: Option<OutfitsPatch>,
    needs: Option<NeedsPatch>,
    scoring: Option<ScoringPatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct OutfitsPatch {
    max_outfits_per_build: Option<usize>,
    max_outfits_per_scenario: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
struct NeedsPatch {
    default_seasonal_uses: Option<u32>,
    wears_per_outfit: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
struct ScoringPatch {
    outfit_bonus: Option<f64>,
    max_outfit_bonus: Option<f64>,
    no_outfit_penalty: Option<f64>,
    critical_gap_penalty: Option<f64>,
    improvement_gap_penalty: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}
