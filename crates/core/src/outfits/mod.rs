//! Outfit generation
//!
//! Builds candidate outfits around an analyzed item, deduplicates them by
//! signature and spreads the result across the scenarios that can use them.

pub mod builder;
pub mod distribution;
pub mod signature;
pub mod types;

pub use builder::{BuildStrategy, OutfitCombinationBuilder};
pub use distribution::IntelligentDistributionAllocator;
pub use signature::{dedup_outfits, OutfitSignature};
pub use types::{CategoryPool, Outfit, OutfitKind, ScenarioOutfitBucket};

/// Outfits returned by a single builder call
pub const DEFAULT_MAX_OUTFITS_PER_BUILD: usize = 3;

/// Outfits kept per scenario bucket after distribution
pub const DEFAULT_MAX_OUTFITS_PER_SCENARIO: usize = 10;
