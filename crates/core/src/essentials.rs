//! Essential-category completeness.
//!
//! Decides, for each season and scenario an analyzed item is used in, whether
//! the rest of the wardrobe has every complementary category needed to form
//! at least one outfit.

use std::collections::HashSet;

use serde::Serialize;

use crate::domain::item::{Category, Item};
use crate::domain::scenario::Scenario;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SeasonScenarioCombination {
    season: String,
    scenario: Scenario,
    has_all_essentials: bool,
    missing_categories: Vec<Category>,
    available_categories: Vec<Category>,
}

impl SeasonScenarioCombination {
    pub fn new(
        season: impl Into<String>,
        scenario: Scenario,
        available_categories: Vec<Category>,
        missing_categories: Vec<Category>,
    ) -> Self {
        Self {
            season: season.into(),
            scenario,
            has_all_essentials: missing_categories.is_empty(),
            missing_categories,
            available_categories,
        }
    }

    pub fn season(&self) -> &str {
        &self.season
    }

    pub fn scenario(&self) -> &Scenario {
        &self.scenario
    }

    pub fn has_all_essentials(&self) -> bool {
        self.has_all_essentials
    }

    pub fn missing_categories(&self) -> &[Category] {
        &self.missing_categories
    }

    pub fn available_categories(&self) -> &[Category] {
        &self.available_categories
    }

    pub fn label(&self) -> String {
        combination_label(&self.season, &self.scenario.name)
    }
}

pub fn combination_label(season: &str, scenario_name: &str) -> String {
    format!("{season} - {scenario_name}")
}

#[derive(Clone, Copy, Debug, Default)]
pub struct EssentialCoverageEvaluator;

impl EssentialCoverageEvaluator {
    /// Evaluate one (season, scenario) pairing for `analyzed`.
    ///
    /// `pool` is the wardrobe; the analyzed item itself is ignored if present.
    pub fn evaluate(
        &self,
        analyzed: &Item,
        pool: &[Item],
        season: &str,
        scenario: &Scenario,
    ) -> SeasonScenarioCombination {
        let in_season: HashSet<Category> = pool
            .iter()
            .filter(|item| item.id != analyzed.id && item.available_in(season))
            .map(|item| item.category)
            .collect();

        let (available, missing): (Vec<Category>, Vec<Category>) = analyzed
            .category
            .essentials()
            .iter()
            .copied()
            .partition(|category| in_season.contains(category));

        SeasonScenarioCombination::new(season, scenario.clone(), available, missing)
    }

    /// One record per season of the analyzed item and scenario it applies to,
    /// seasons outermost. An item without scenario ids applies to every
    /// scenario.
    pub fn evaluate_all(
        &self,
        analyzed: &Item,
        pool: &[Item],
        scenarios: &[Scenario],
    ) -> Vec<SeasonScenarioCombination> {
        let applicable = applicable_scenarios(analyzed, scenarios);

        let mut seen = HashSet::new();
        analyzed
            .seasons
            .iter()
            .map(|season| season.trim())
            .filter(|season| !season.is_empty() && seen.insert(*season))
            .flat_map(|season| {
                applicable
                    .iter()
                    .map(move |scenario| self.evaluate(analyzed, pool, season, scenario))
            })
            .collect()
    }
}

fn applicable_scenarios<'a>(analyzed: &Item, scenarios: &'a [Scenario]) -> Vec<&'a Scenario> {
    if analyzed.scenario_ids.is_empty() {
        return scenarios.iter().collect();
    }

    scenarios.iter().filter(|scenario| analyzed.belongs_to(&scenario.id)).collect()
}
