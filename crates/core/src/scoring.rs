//! Folding outfit availability into an item's recommendation score.

use serde::{Deserialize, Serialize};

use crate::config::ScoringSettings;
use crate::coverage::{CoverageGap, GapType};

pub const MIN_SCORE: f64 = 0.0;
pub const MAX_SCORE: f64 = 10.0;

/// How many outfits the analyzed item takes part in.
///
/// Accessories and outerwear are not analyzed at all, which is distinct from
/// analyzing and finding nothing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "count", rename_all = "snake_case")]
pub enum OutfitAvailability {
    NotApplicable,
    Count(usize),
}

impl OutfitAvailability {
    pub fn count(&self) -> Option<usize> {
        match self {
            Self::NotApplicable => None,
            Self::Count(count) => Some(*count),
        }
    }

    pub fn is_applicable(&self) -> bool {
        matches!(self, Self::Count(_))
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScoringInput {
    pub outfits: OutfitAvailability,
    pub coverage_gaps_with_no_outfits: Vec<CoverageGap>,
}

impl ScoringInput {
    pub fn not_applicable() -> Self {
        Self {
            outfits: OutfitAvailability::NotApplicable,
            coverage_gaps_with_no_outfits: Vec::new(),
        }
    }

    pub fn with_outfits(total_outfits: usize, gaps: Vec<CoverageGap>) -> Self {
        Self {
            outfits: OutfitAvailability::Count(total_outfits),
            coverage_gaps_with_no_outfits: gaps,
        }
    }

    fn gaps_of(&self, gap_type: GapType) -> usize {
        self.coverage_gaps_with_no_outfits.iter().filter(|gap| gap.gap_type == gap_type).count()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScoreAdjustment {
    pub base_score: f64,
    pub score: f64,
    pub outfit_delta: f64,
    pub gap_delta: f64,
    pub reasons: Vec<String>,
}

/// Consumer of the outfit analysis. Produces the final score for an item.
pub trait ScoreIntegrator {
    fn integrate(&self, base_score: f64, input: &ScoringInput) -> ScoreAdjustment;
}

#[derive(Clone, Debug, Default)]
pub struct OutfitScoreIntegrator {
    settings: ScoringSettings,
}

impl OutfitScoreIntegrator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: ScoringSettings) -> Self {
        Self { settings }
    }

    fn outfit_delta(&self, outfits: OutfitAvailability) -> f64 {
        match outfits {
            OutfitAvailability::NotApplicable => 0.0,
            OutfitAvailability::Count(0) => -self.settings.no_outfit_penalty,
            OutfitAvailability::Count(count) => {
                (count as f64 * self.settings.outfit_bonus).min(self.settings.max_outfit_bonus)
            }
        }
    }

    fn gap_delta(&self, input: &ScoringInput) -> f64 {
        let critical = input.gaps_of(GapType::Critical) as f64;
        let improvement = input.gaps_of(GapType::Improvement) as f64;

        -(critical * self.settings.critical_gap_penalty
            + improvement * self.settings.improvement_gap_penalty)
    }

    fn reasoning(&self, input: &ScoringInput) -> Vec<String> {
        let mut reasons = Vec::new();

        reasons.push(match input.outfits {
            OutfitAvailability::NotApplicable => {
                "Outfit analysis does not apply to accessories or outerwear".to_string()
            }
            OutfitAvailability::Count(0) => {
                "No complete outfits can be formed with the current wardrobe".to_string()
            }
            OutfitAvailability::Count(1) => "Forms 1 outfit with items already owned".to_string(),
            OutfitAvailability::Count(count) => {
                format!("Forms {count} outfits with items already owned")
            }
        });

        let critical = input.gaps_of(GapType::Critical);
        if critical > 0 {
            reasons.push(format!("{critical} critical coverage gap(s) have no supporting outfit"));
        }

        let improvement = input.gaps_of(GapType::Improvement);
        if improvement > 0 {
            reasons.push(format!("{improvement} improvement gap(s) have no supporting outfit"));
        }

        reasons
    }
}

impl ScoreIntegrator for OutfitScoreIntegrator {
    fn integrate(&self, base_score: f64, input: &ScoringInput) -> ScoreAdjustment {
        let outfit_delta = self.outfit_delta(input.outfits);
        let gap_delta = self.gap_delta(input);
        let score = (base_score + outfit_delta + gap_delta).clamp(MIN_SCORE, MAX_SCORE);

        let reasons = self.reasoning(input);

        ScoreAdjustment { base_score, score, outfit_delta, gap_delta, reasons }
    }
}
