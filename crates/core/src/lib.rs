pub mod analysis;
pub mod config;
pub mod coverage;
pub mod domain;
pub mod errors;
pub mod essentials;
pub mod needs;
pub mod outfits;
pub mod scoring;
pub mod season;

pub use analysis::{
    AnalysisReport, AnalysisRequest, CompatibilityCheck, CompatibilityClassifier, OutfitAnalyzer,
    PrecomputedCompatibility,
};
pub use config::{AppConfig, ConfigError, LoadOptions};
pub use coverage::{CoverageCrossReferencer, CoverageGap, GapType};
pub use domain::item::{Category, Item, ItemId};
pub use domain::scenario::{Scenario, ScenarioId};
pub use errors::{ApplicationError, DomainError, InterfaceError};
pub use essentials::{EssentialCoverageEvaluator, SeasonScenarioCombination};
pub use needs::{FrequencyNeedsCalculator, SeasonalNeeds, UsageFrequency};
pub use outfits::{
    CategoryPool, IntelligentDistributionAllocator, Outfit, OutfitCombinationBuilder, OutfitKind,
    OutfitSignature, ScenarioOutfitBucket,
};
pub use scoring::{OutfitAvailability, OutfitScoreIntegrator, ScoreIntegrator, ScoringInput};
