use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use closet_core::analysis::{AnalysisRequest, OutfitAnalyzer, PrecomputedCompatibility};
use closet_core::config::{AppConfig, LoadOptions};
use closet_core::errors::ApplicationError;
use closet_core::outfits::CategoryPool;
use serde::Deserialize;

use crate::commands::{
    CommandResult, EXIT_ANALYSIS, EXIT_CONFIG, EXIT_INPUT, EXIT_INVALID_REQUEST, EXIT_RUNTIME,
};

/// Request file: an analysis request plus the compatible items already chosen
/// by a classifier. An absent or null `compatible_items` is an empty pool.
#[derive(Debug, Deserialize)]
struct AnalyzeInput {
    #[serde(flatten)]
    request: AnalysisRequest,
    #[serde(default)]
    compatible_items: Option<CategoryPool>,
}

fn read_input(path: &Path) -> Result<AnalyzeInput> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("could not read request file `{}`", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("could not parse request file `{}`", path.display()))
}

/// With `assume_wardrobe_compatible`, every wardrobe item counts as compatible
/// and `compatible_items` is ignored.
pub fn run(input: &Path, assume_wardrobe_compatible: bool) -> CommandResult {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure(
                "analyze",
                "config_validation",
                format!("configuration issue: {error}"),
                EXIT_CONFIG,
            );
        }
    };

    let AnalyzeInput { request, compatible_items } = match read_input(input) {
        Ok(input) => input,
        Err(error) => {
            return CommandResult::failure("analyze", "input", format!("{error:#}"), EXIT_INPUT);
        }
    };

    let classifier = if assume_wardrobe_compatible {
        PrecomputedCompatibility::from_wardrobe(&request.wardrobe_items)
    } else {
        PrecomputedCompatibility::new(compatible_items.unwrap_or_default())
    };
    let analyzer = OutfitAnalyzer::with_config(classifier, &config);

    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(error) => {
            return CommandResult::failure(
                "analyze",
                "runtime_init",
                format!("failed to initialize async runtime: {error}"),
                EXIT_RUNTIME,
            );
        }
    };

    match runtime.block_on(analyzer.analyze(&request)) {
        Ok(report) => {
            let message = format!(
                "{} outfit(s) across {} scenario combination(s); score {:.2}",
                report.total_outfits(),
                report.outfit_combinations.len(),
                report.score.score
            );
            CommandResult::success_with_data("analyze", message, &report)
        }
        Err(error) => {
            let (error_class, exit_code) = match error {
                ApplicationError::Domain(_) => ("invalid_request", EXIT_INVALID_REQUEST),
                ApplicationError::Integration(_) | ApplicationError::Configuration(_) => {
                    ("analysis", EXIT_ANALYSIS)
                }
            };
            let interface = error.into_interface(request.correlation_id.clone());
            CommandResult::failure(
                "analyze",
                error_class,
                format!("{} ({interface})", interface.user_message()),
                exit_code,
            )
        }
    }
}
