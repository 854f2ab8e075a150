use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use closet_core::config::{AppConfig, LoadOptions};
use closet_core::domain::scenario::Scenario;
use closet_core::needs::FrequencyNeedsCalculator;

use crate::commands::{CommandResult, EXIT_CONFIG, EXIT_INPUT};

fn read_scenarios(path: &Path) -> Result<Vec<Scenario>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("could not read scenarios file `{}`", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("could not parse scenarios file `{}`", path.display()))
}

/// Category targets for one frequency, or for every scenario in a file.
pub fn run(frequency: &str, season: &str, scenarios: Option<&Path>) -> CommandResult {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure(
                "needs",
                "config_validation",
                format!("configuration issue: {error}"),
                EXIT_CONFIG,
            );
        }
    };
    let calculator = FrequencyNeedsCalculator::with_settings(config.needs);

    match scenarios {
        Some(path) => match read_scenarios(path) {
            Ok(scenarios) => {
                let needs = calculator.needs_for_scenarios(&scenarios, season);
                let message = format!("needs for {} scenario(s) in {season}", needs.len());
                CommandResult::success_with_data("needs", message, &needs)
            }
            Err(error) => {
                CommandResult::failure("needs", "input", format!("{error:#}"), EXIT_INPUT)
            }
        },
        None => {
            let needs = calculator.needs(frequency, season);
            let message = format!(
                "{} seasonal use(s) need {} outfit(s) in {season}",
                needs.seasonal_uses, needs.outfits_needed
            );
            CommandResult::success_with_data("needs", message, &needs)
        }
    }
}
