//! Cross-reference of wardrobe coverage gaps against generated outfits.

use serde::{Deserialize, Serialize};

use crate::domain::item::Category;
use crate::outfits::ScenarioOutfitBucket;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GapType {
    Critical,
    Improvement,
    Expansion,
}

impl GapType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::Improvement => "improvement",
            Self::Expansion => "expansion",
        }
    }
}

/// A shortfall reported by the coverage tracker for one category in one
/// season and scenario. Read-only here.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CoverageGap {
    pub category: Category,
    pub season: String,
    pub scenario_name: String,
    pub gap_type: GapType,
    #[serde(default)]
    pub gap_count: u32,
    #[serde(default)]
    pub coverage_percent: f64,
}

impl CoverageGap {
    fn concerns(&self, bucket: &ScenarioOutfitBucket) -> bool {
        self.season.eq_ignore_ascii_case(&bucket.season)
            && self.scenario_name.eq_ignore_ascii_case(&bucket.scenario.name)
    }
}

/// A gap together with the number of outfits generated for its season and
/// scenario.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AnnotatedGap {
    pub gap: CoverageGap,
    pub matching_outfits: usize,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct CoverageCrossReferencer;

impl CoverageCrossReferencer {
    pub fn annotate(
        &self,
        gaps: &[CoverageGap],
        buckets: &[ScenarioOutfitBucket],
    ) -> Vec<AnnotatedGap> {
        gaps.iter()
            .map(|gap| AnnotatedGap {
                gap: gap.clone(),
                matching_outfits: buckets
                    .iter()
                    .filter(|bucket| gap.concerns(bucket))
                    .map(|bucket| bucket.outfits.len())
                    .sum(),
            })
            .collect()
    }

    /// Gaps with no supporting outfit at all, in input order.
    pub fn gaps_without_outfits(
        &self,
        gaps: &[CoverageGap],
        buckets: &[ScenarioOutfitBucket],
    ) -> Vec<CoverageGap> {
        self.annotate(gaps, buckets)
            .into_iter()
            .filter(|annotated| annotated.matching_outfits == 0)
            .map(|annotated| annotated.gap)
            .collect()
    }
}
