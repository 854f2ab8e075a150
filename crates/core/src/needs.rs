//! Frequency-driven category needs.
//!
//! Turns a scenario's free-text usage frequency into the number of distinct
//! outfits a season calls for, and from there into min/ideal/max item targets
//! per category.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::config::NeedsSettings;
use crate::domain::item::Category;
use crate::domain::scenario::Scenario;

const DAYS_PER_MONTH: u32 = 30;
const DAYS_PER_WEEK: u32 = 7;
const RARELY_USES: u32 = 2;
const OFTEN_USES: u32 = 30;
const COUNT_MULTIPLIER: u32 = 4;
const COUNT_CAP: u32 = 90;

/// How long a season tag lasts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeasonSpan {
    Standard,
    Transitional,
}

impl SeasonSpan {
    pub fn of(season: &str) -> Self {
        let normalized = season.to_ascii_lowercase();
        let combined_word = normalized
            .split(|c: char| !c.is_ascii_alphanumeric())
            .any(|word| word == "all" || word == "transitional");
        if normalized.contains('/') || combined_word {
            Self::Transitional
        } else {
            Self::Standard
        }
    }

    pub fn months(&self) -> u32 {
        match self {
            Self::Standard => 3,
            Self::Transitional => 6,
        }
    }

    pub fn days(&self) -> u32 {
        self.months() * DAYS_PER_MONTH
    }
}

/// Parsed form of a free-text frequency.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "pattern", content = "count", rename_all = "snake_case")]
pub enum UsageFrequency {
    Daily,
    PerWeek(u32),
    PerMonth(u32),
    Rarely,
    Often,
    Count(u32),
    Unspecified,
}

struct FrequencyPatterns {
    daily: Regex,
    per_week: Regex,
    per_week_word: Regex,
    weekly: Regex,
    per_month: Regex,
    per_month_word: Regex,
    monthly: Regex,
    rarely: Regex,
    often: Regex,
    number: Regex,
}

fn patterns() -> &'static FrequencyPatterns {
    static PATTERNS: OnceLock<FrequencyPatterns> = OnceLock::new();
    PATTERNS.get_or_init(|| FrequencyPatterns {
        daily: compile(r"\b(daily|every\s*day|each\s*day)\b"),
        per_week: compile(r"([0-9]+)\s*(?:times?|x)\s*(?:per|a|an|each|every|/)\s*week"),
        per_week_word: compile(r"\b(once|twice)\s*(?:per|a|an|each|every)\s*week"),
        weekly: compile(r"\bweekly\b"),
        per_month: compile(r"([0-9]+)\s*(?:times?|x)\s*(?:per|a|an|each|every|/)\s*month"),
        per_month_word: compile(r"\b(once|twice)\s*(?:per|a|an|each|every)\s*month"),
        monthly: compile(r"\bmonthly\b"),
        rarely: compile(r"\b(rarely|seldom)\b"),
        often: compile(r"\b(often|frequently)\b"),
        number: compile(r"[0-9]+"),
    })
}

fn compile(pattern: &str) -> Regex {
    match Regex::new(pattern) {
        Ok(regex) => regex,
        Err(error) => unreachable!("frequency pattern `{pattern}` is invalid: {error}"),
    }
}

fn word_count(word: &str) -> u32 {
    if word == "twice" {
        2
    } else {
        1
    }
}

/// ASCII digit runs only; values beyond `u32` saturate.
fn saturating_number(digits: &str) -> u32 {
    digits.parse().unwrap_or(u32::MAX)
}

fn captured_number(regex: &Regex, text: &str) -> Option<u32> {
    regex.captures(text).and_then(|captures| captures.get(1)).map(|m| saturating_number(m.as_str()))
}

fn captured_word(regex: &Regex, text: &str) -> Option<u32> {
    regex.captures(text).and_then(|captures| captures.get(1)).map(|m| word_count(m.as_str()))
}

impl UsageFrequency {
    /// First matching rule wins; text matching nothing is `Unspecified`.
    pub fn parse(text: &str) -> Self {
        let normalized = text.trim().to_ascii_lowercase();
        if normalized.is_empty() {
            return Self::Unspecified;
        }

        let patterns = patterns();
        if patterns.daily.is_match(&normalized) {
            return Self::Daily;
        }
        if let Some(count) = captured_number(&patterns.per_week, &normalized)
            .or_else(|| captured_word(&patterns.per_week_word, &normalized))
        {
            return Self::PerWeek(count);
        }
        if patterns.weekly.is_match(&normalized) {
            return Self::PerWeek(1);
        }
        if let Some(count) = captured_number(&patterns.per_month, &normalized)
            .or_else(|| captured_word(&patterns.per_month_word, &normalized))
        {
            return Self::PerMonth(count);
        }
        if patterns.monthly.is_match(&normalized) {
            return Self::PerMonth(1);
        }
        if patterns.rarely.is_match(&normalized) {
            return Self::Rarely;
        }
        if patterns.often.is_match(&normalized) {
            return Self::Often;
        }

        patterns
            .number
            .find(&normalized)
            .map(|m| Self::Count(saturating_number(m.as_str())))
            .unwrap_or(Self::Unspecified)
    }

    /// Number of wears over a season of the given span.
    pub fn seasonal_uses(&self, span: SeasonSpan, default_uses: u32) -> u32 {
        match *self {
            Self::Daily => span.days(),
            // count * weeks, rounded half up
            Self::PerWeek(count) => {
                count.saturating_mul(span.days()).saturating_mul(2).saturating_add(DAYS_PER_WEEK)
                    / (2 * DAYS_PER_WEEK)
            }
            Self::PerMonth(count) => count.saturating_mul(span.months()),
            Self::Rarely => RARELY_USES,
            Self::Often => OFTEN_USES,
            Self::Count(count) => count.saturating_mul(COUNT_MULTIPLIER).min(COUNT_CAP),
            Self::Unspecified => default_uses,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryNeed {
    pub min: u32,
    pub ideal: u32,
    pub max: u32,
}

/// Category targets as tenths of the outfit count.
struct NeedFraction {
    category: Category,
    min: u32,
    ideal: u32,
    max: u32,
    floor: u32,
}

const NEED_FRACTIONS: &[NeedFraction] = &[
    NeedFraction { category: Category::Top, min: 5, ideal: 8, max: 12, floor: 0 },
    NeedFraction { category: Category::Bottom, min: 3, ideal: 6, max: 9, floor: 0 },
    NeedFraction { category: Category::OnePiece, min: 0, ideal: 3, max: 7, floor: 0 },
    NeedFraction { category: Category::Outerwear, min: 1, ideal: 2, max: 4, floor: 0 },
    NeedFraction { category: Category::Footwear, min: 2, ideal: 4, max: 6, floor: 1 },
    NeedFraction { category: Category::Accessory, min: 0, ideal: 3, max: 5, floor: 0 },
];

fn ceil_tenths(count: u32, tenths: u32) -> u32 {
    count.saturating_mul(tenths).saturating_add(9) / 10
}

fn ceil_div(numerator: u32, denominator: u32) -> u32 {
    numerator.div_ceil(denominator.max(1))
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeasonalNeeds {
    pub season: String,
    pub span: SeasonSpan,
    pub frequency: UsageFrequency,
    pub seasonal_uses: u32,
    pub outfits_needed: u32,
    pub category_needs: BTreeMap<Category, CategoryNeed>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioNeeds {
    pub scenario: Scenario,
    pub needs: SeasonalNeeds,
}

#[derive(Clone, Debug, Default)]
pub struct FrequencyNeedsCalculator {
    settings: NeedsSettings,
}

impl FrequencyNeedsCalculator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: NeedsSettings) -> Self {
        Self { settings }
    }

    pub fn needs(&self, frequency_text: &str, season: &str) -> SeasonalNeeds {
        let span = SeasonSpan::of(season);
        let frequency = UsageFrequency::parse(frequency_text);
        let seasonal_uses = frequency.seasonal_uses(span, self.settings.default_seasonal_uses);
        let outfits_needed = self.outfits_needed(seasonal_uses, span);

        SeasonalNeeds {
            season: season.to_owned(),
            span,
            frequency,
            seasonal_uses,
            outfits_needed,
            category_needs: category_needs(outfits_needed),
        }
    }

    /// Up to one wear a week, an outfit may repeat every `wears_per_outfit`
    /// wears. More often than that, no outfit repeats within a week.
    pub fn outfits_needed(&self, seasonal_uses: u32, span: SeasonSpan) -> u32 {
        let days = span.days();
        if seasonal_uses.saturating_mul(DAYS_PER_WEEK) <= days {
            ceil_div(seasonal_uses, self.settings.wears_per_outfit).max(1)
        } else {
            // ceil(uses_per_week * 2) with uses_per_week = uses * 7 / days
            ceil_div(seasonal_uses.saturating_mul(2 * DAYS_PER_WEEK), days)
        }
    }

    pub fn needs_for_scenarios(&self, scenarios: &[Scenario], season: &str) -> Vec<ScenarioNeeds> {
        scenarios
            .iter()
            .map(|scenario| ScenarioNeeds {
                scenario: scenario.clone(),
                needs: self.needs(&scenario.frequency, season),
            })
            .collect()
    }
}

pub fn category_needs(outfits_needed: u32) -> BTreeMap<Category, CategoryNeed> {
    NEED_FRACTIONS
        .iter()
        .map(|fraction| {
            let min = ceil_tenths(outfits_needed, fraction.min).max(fraction.floor);
            let ideal = ceil_tenths(outfits_needed, fraction.ideal).max(min);
            let max = ceil_tenths(outfits_needed, fraction.max).max(ideal);
            (fraction.category, CategoryNeed { min, ideal, max })
        })
        .collect()
}
