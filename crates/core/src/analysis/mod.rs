//! Outfit analysis for a single wardrobe item.
//!
//! Runs the whole pipeline: essentials evaluation, compatibility lookup,
//! outfit building, distribution across scenarios, gap cross-reference and
//! score integration.

pub mod compatibility;

pub use compatibility::{CompatibilityCheck, CompatibilityClassifier, PrecomputedCompatibility};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::AppConfig;
use crate::coverage::{CoverageCrossReferencer, CoverageGap};
use crate::domain::item::{Item, ItemId};
use crate::domain::scenario::Scenario;
use crate::errors::{ApplicationError, DomainError};
use crate::essentials::{EssentialCoverageEvaluator, SeasonScenarioCombination};
use crate::outfits::{
    dedup_outfits, CategoryPool, IntelligentDistributionAllocator, OutfitCombinationBuilder,
    ScenarioOutfitBucket,
};
use crate::scoring::{
    OutfitScoreIntegrator, ScoreAdjustment, ScoreIntegrator, ScoringInput, MAX_SCORE, MIN_SCORE,
};

pub const DEFAULT_BASE_SCORE: f64 = 5.0;

fn default_base_score() -> f64 {
    DEFAULT_BASE_SCORE
}

fn default_correlation_id() -> String {
    Uuid::new_v4().to_string()
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    #[serde(default = "default_correlation_id")]
    pub correlation_id: String,
    pub analyzed_item: Item,
    #[serde(default)]
    pub wardrobe_items: Vec<Item>,
    #[serde(default)]
    pub scenarios: Vec<Scenario>,
    #[serde(default)]
    pub scenario_coverage: Vec<CoverageGap>,
    #[serde(default = "default_base_score")]
    pub base_score: f64,
}

impl AnalysisRequest {
    pub fn new(analyzed_item: Item) -> Self {
        Self {
            correlation_id: default_correlation_id(),
            analyzed_item,
            wardrobe_items: Vec::new(),
            scenarios: Vec::new(),
            scenario_coverage: Vec::new(),
            base_score: DEFAULT_BASE_SCORE,
        }
    }

    pub fn with_wardrobe(mut self, items: Vec<Item>) -> Self {
        self.wardrobe_items = items;
        self
    }

    pub fn with_scenarios(mut self, scenarios: Vec<Scenario>) -> Self {
        self.scenarios = scenarios;
        self
    }

    pub fn with_coverage(mut self, gaps: Vec<CoverageGap>) -> Self {
        self.scenario_coverage = gaps;
        self
    }

    /// Caller contract checks. Everything else degrades to empty results.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.analyzed_item.id.0.trim().is_empty() {
            return Err(DomainError::InvariantViolation(
                "analyzed item id is required".to_string(),
            ));
        }

        if self.analyzed_item.name.trim().is_empty() {
            return Err(DomainError::InvariantViolation(format!(
                "analyzed item `{}` has no name",
                self.analyzed_item.id
            )));
        }

        if !self.base_score.is_finite() || !(MIN_SCORE..=MAX_SCORE).contains(&self.base_score) {
            return Err(DomainError::InvariantViolation(format!(
                "base score must be in range {MIN_SCORE}..={MAX_SCORE}"
            )));
        }

        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub analysis_id: Uuid,
    pub correlation_id: String,
    pub generated_at: DateTime<Utc>,
    pub item_id: ItemId,
    pub season_scenario_combinations: Vec<SeasonScenarioCombination>,
    pub outfit_combinations: Vec<ScenarioOutfitBucket>,
    pub coverage_gaps_with_no_outfits: Vec<CoverageGap>,
    pub scoring_input: ScoringInput,
    pub score: ScoreAdjustment,
}

impl AnalysisReport {
    pub fn total_outfits(&self) -> usize {
        self.outfit_combinations.iter().map(|bucket| bucket.outfits.len()).sum()
    }
}

pub struct OutfitAnalyzer<C, S = OutfitScoreIntegrator> {
    classifier: C,
    integrator: S,
    evaluator: EssentialCoverageEvaluator,
    builder: OutfitCombinationBuilder,
    allocator: IntelligentDistributionAllocator,
    cross_referencer: CoverageCrossReferencer,
}

impl<C> OutfitAnalyzer<C, OutfitScoreIntegrator> {
    pub fn new(classifier: C) -> Self {
        Self {
            classifier,
            integrator: OutfitScoreIntegrator::new(),
            evaluator: EssentialCoverageEvaluator,
            builder: OutfitCombinationBuilder::new(),
            allocator: IntelligentDistributionAllocator::new(),
            cross_referencer: CoverageCrossReferencer,
        }
    }

    pub fn with_config(classifier: C, config: &AppConfig) -> Self {
        Self {
            classifier,
            integrator: OutfitScoreIntegrator::with_settings(config.scoring),
            evaluator: EssentialCoverageEvaluator,
            builder: OutfitCombinationBuilder::with_max_outfits(
                config.outfits.max_outfits_per_build,
            ),
            allocator: IntelligentDistributionAllocator::with_cap(
                config.outfits.max_outfits_per_scenario,
            ),
            cross_referencer: CoverageCrossReferencer,
        }
    }
}

impl<C, S> OutfitAnalyzer<C, S> {
    pub fn with_integrator<T>(self, integrator: T) -> OutfitAnalyzer<C, T> {
        OutfitAnalyzer {
            classifier: self.classifier,
            integrator,
            evaluator: self.evaluator,
            builder: self.builder,
            allocator: self.allocator,
            cross_referencer: self.cross_referencer,
        }
    }
}

impl<C, S> OutfitAnalyzer<C, S>
where
    C: CompatibilityClassifier,
    S: ScoreIntegrator,
{
    pub async fn analyze(
        &self,
        request: &AnalysisRequest,
    ) -> Result<AnalysisReport, ApplicationError> {
        request.validate()?;

        let analyzed = &request.analyzed_item;
        info!(
            event_name = "outfits.analysis.started",
            correlation_id = %request.correlation_id,
            item_id = %analyzed.id,
            category = %analyzed.category,
            scenario_count = request.scenarios.len(),
            "outfit analysis started"
        );

        let combinations =
            self.evaluator.evaluate_all(analyzed, &request.wardrobe_items, &request.scenarios);

        let (outfit_combinations, coverage_gaps, scoring_input) =
            if analyzed.category.skips_outfit_generation() {
                (Vec::new(), Vec::new(), ScoringInput::not_applicable())
            } else {
                let buckets = self.outfit_buckets(request, &combinations).await;
                let gaps = self
                    .cross_referencer
                    .gaps_without_outfits(&request.scenario_coverage, &buckets);
                let total: usize = buckets.iter().map(|bucket| bucket.outfits.len()).sum();
                let input = ScoringInput::with_outfits(total, gaps.clone());
                (buckets, gaps, input)
            };

        let score = self.integrator.integrate(request.base_score, &scoring_input);

        info!(
            event_name = "outfits.analysis.completed",
            correlation_id = %request.correlation_id,
            item_id = %analyzed.id,
            combination_count = combinations.len(),
            outfit_count = ?scoring_input.outfits.count(),
            unresolved_gaps = coverage_gaps.len(),
            score = score.score,
            "outfit analysis completed"
        );

        Ok(AnalysisReport {
            analysis_id: Uuid::new_v4(),
            correlation_id: request.correlation_id.clone(),
            generated_at: Utc::now(),
            item_id: analyzed.id.clone(),
            season_scenario_combinations: combinations,
            outfit_combinations,
            coverage_gaps_with_no_outfits: coverage_gaps,
            scoring_input,
            score,
        })
    }

    async fn outfit_buckets(
        &self,
        request: &AnalysisRequest,
        combinations: &[SeasonScenarioCombination],
    ) -> Vec<ScenarioOutfitBucket> {
        let complete: Vec<SeasonScenarioCombination> =
            combinations.iter().filter(|c| c.has_all_essentials()).cloned().collect();
        if complete.is_empty() {
            return Vec::new();
        }

        let pool = self.compatible_pool(request).await;
        let buckets = complete
            .iter()
            .map(|combination| {
                let seasonal = pool.filter_by_season(combination.season());
                let outfits = self.builder.build(
                    &request.analyzed_item,
                    &seasonal,
                    combination.season(),
                    combination.scenario(),
                );
                ScenarioOutfitBucket::for_combination(combination, dedup_outfits(outfits))
            })
            .collect();

        self.allocator.distribute(buckets, &complete)
    }

    /// Merge the three checks in order. A failed check contributes nothing.
    async fn compatible_pool(&self, request: &AnalysisRequest) -> CategoryPool {
        let analyzed = &request.analyzed_item;
        let mut pool = CategoryPool::new();

        for check in CompatibilityCheck::ALL {
            match self.classifier.classify(check, analyzed, &request.wardrobe_items).await {
                Ok(found) => {
                    for (category, items) in found.non_empty() {
                        if check.owns(category) {
                            pool.insert(
                                category,
                                items.iter().filter(|item| item.id != analyzed.id).cloned(),
                            );
                        }
                    }
                }
                Err(error) => {
                    warn!(
                        event_name = "outfits.compatibility.failed",
                        correlation_id = %request.correlation_id,
                        item_id = %analyzed.id,
                        check = %check,
                        error = %error,
                        "compatibility check failed; continuing without its categories"
                    );
                }
            }
        }

        pool
    }
}
