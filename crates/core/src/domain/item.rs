use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::scenario::ScenarioId;
use crate::season;

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ItemId(pub String);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Wardrobe category of an item.
///
/// Unknown category strings map to [`Category::Other`], which requires no
/// essentials and builds through the general strategy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Category {
    Top,
    Bottom,
    OnePiece,
    Dress,
    Outerwear,
    Footwear,
    Accessory,
    Other,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Category::Top,
        Category::Bottom,
        Category::OnePiece,
        Category::Dress,
        Category::Outerwear,
        Category::Footwear,
        Category::Accessory,
        Category::Other,
    ];

    pub fn parse(value: &str) -> Self {
        let normalized = value.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "top" | "tops" => Self::Top,
            "bottom" | "bottoms" => Self::Bottom,
            "one_piece" | "onepiece" | "one_pieces" => Self::OnePiece,
            "dress" | "dresses" => Self::Dress,
            "outerwear" => Self::Outerwear,
            "footwear" | "shoes" => Self::Footwear,
            "accessory" | "accessories" => Self::Accessory,
            _ => Self::Other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Bottom => "bottom",
            Self::OnePiece => "one_piece",
            Self::Dress => "dress",
            Self::Outerwear => "outerwear",
            Self::Footwear => "footwear",
            Self::Accessory => "accessory",
            Self::Other => "other",
        }
    }

    /// Complementary categories that must be present before an outfit built
    /// around this category can be completed, in check order.
    pub fn essentials(&self) -> &'static [Category] {
        match self {
            Self::Dress | Self::OnePiece => &[Category::Footwear],
            Self::Top => &[Category::Bottom, Category::Footwear],
            Self::Bottom => &[Category::Top, Category::Footwear],
            Self::Footwear => &[Category::Top, Category::Bottom],
            Self::Outerwear | Self::Accessory | Self::Other => &[],
        }
    }

    /// Accessories and outerwear complete someone else's outfit; analysis of
    /// outfits built around them is not applicable.
    pub fn skips_outfit_generation(&self) -> bool {
        matches!(self, Self::Outerwear | Self::Accessory)
    }
}

impl From<String> for Category {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<&str> for Category {
    fn from(value: &str) -> Self {
        Self::parse(value)
    }
}

impl From<Category> for String {
    fn from(value: Category) -> Self {
        value.as_str().to_owned()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Caller-owned snapshot of a wardrobe item. Never mutated by the engine.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub category: Category,
    #[serde(default)]
    pub seasons: Vec<String>,
    #[serde(default)]
    pub scenario_ids: Vec<ScenarioId>,
}

impl Item {
    pub fn new(id: impl Into<String>, name: impl Into<String>, category: Category) -> Self {
        Self {
            id: ItemId(id.into()),
            name: name.into(),
            category,
            seasons: Vec::new(),
            scenario_ids: Vec::new(),
        }
    }

    pub fn with_seasons<I, S>(mut self, seasons: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.seasons = seasons.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_scenarios<I, S>(mut self, scenario_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.scenario_ids = scenario_ids.into_iter().map(|id| ScenarioId(id.into())).collect();
        self
    }

    /// True when any of the item's season tags matches `season`.
    pub fn available_in(&self, season: &str) -> bool {
        season::matches_any(&self.seasons, season)
    }

    pub fn belongs_to(&self, scenario_id: &ScenarioId) -> bool {
        self.scenario_ids.iter().any(|id| id == scenario_id)
    }
}
