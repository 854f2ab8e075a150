//! Types for outfit generation and distribution

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::domain::item::{Category, Item};
use crate::domain::scenario::Scenario;
use crate::essentials::{combination_label, SeasonScenarioCombination};

use super::signature::OutfitSignature;

/// How an outfit was put together
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutfitKind {
    /// Dress or one-piece with footwear, optionally an accessory
    DressBased,
    /// Dress or one-piece with footwear and outerwear
    DressBasedLayered,
    /// Top with bottom and footwear
    TopBased,
    /// Top with bottom, footwear and outerwear
    TopBasedLayered,
    /// Bottom with top and footwear
    BottomBased,
    /// Footwear with top and bottom
    FootwearBased,
    /// One item from each of a few available categories
    General,
}

impl OutfitKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DressBased => "dress-based",
            Self::DressBasedLayered => "dress-based-layered",
            Self::TopBased => "top-based",
            Self::TopBasedLayered => "top-based-layered",
            Self::BottomBased => "bottom-based",
            Self::FootwearBased => "footwear-based",
            Self::General => "general",
        }
    }
}

impl fmt::Display for OutfitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A candidate outfit. The first item is always the analyzed item.
///
/// Identity is the [`OutfitSignature`], not the kind or the item order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outfit {
    pub kind: OutfitKind,
    pub items: Vec<Item>,
}

impl Outfit {
    pub fn new(kind: OutfitKind, items: Vec<Item>) -> Self {
        Self { kind, items }
    }

    pub fn analyzed_item(&self) -> Option<&Item> {
        self.items.first()
    }

    pub fn signature(&self) -> OutfitSignature {
        OutfitSignature::of(self)
    }

    pub fn item_names(&self) -> Vec<&str> {
        self.items.iter().map(|item| item.name.as_str()).collect()
    }
}

/// Compatible items grouped by category, in the order the categories were
/// first supplied. That order drives enumeration and the general strategy.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CategoryPool {
    groups: Vec<(Category, Vec<Item>)>,
}

impl CategoryPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append items to a category, keeping the category's original position.
    pub fn insert(&mut self, category: Category, items: impl IntoIterator<Item = Item>) {
        match self.groups.iter_mut().find(|(existing, _)| *existing == category) {
            Some((_, group)) => group.extend(items),
            None => self.groups.push((category, items.into_iter().collect())),
        }
    }

    pub fn items(&self, category: Category) -> &[Item] {
        self.groups
            .iter()
            .find(|(existing, _)| *existing == category)
            .map(|(_, items)| items.as_slice())
            .unwrap_or(&[])
    }

    pub fn categories(&self) -> impl Iterator<Item = Category> + '_ {
        self.groups.iter().map(|(category, _)| *category)
    }

    /// Categories holding at least one item, in pool order.
    pub fn non_empty(&self) -> impl Iterator<Item = (Category, &[Item])> + '_ {
        self.groups
            .iter()
            .filter(|(_, items)| !items.is_empty())
            .map(|(category, items)| (*category, items.as_slice()))
    }

    pub fn is_empty(&self) -> bool {
        self.non_empty().next().is_none()
    }

    pub fn total_items(&self) -> usize {
        self.groups.iter().map(|(_, items)| items.len()).sum()
    }

    /// Same shape, keeping only items available in `season`.
    pub fn filter_by_season(&self, season: &str) -> CategoryPool {
        self.filtered(|item| item.available_in(season))
    }

    pub fn filtered(&self, mut keep: impl FnMut(&Item) -> bool) -> CategoryPool {
        CategoryPool {
            groups: self
                .groups
                .iter()
                .map(|(category, items)| {
                    (*category, items.iter().filter(|item| keep(item)).cloned().collect())
                })
                .collect(),
        }
    }
}

impl FromIterator<(Category, Vec<Item>)> for CategoryPool {
    fn from_iter<T: IntoIterator<Item = (Category, Vec<Item>)>>(iter: T) -> Self {
        let mut pool = CategoryPool::new();
        for (category, items) in iter {
            pool.insert(category, items);
        }
        pool
    }
}

impl Serialize for CategoryPool {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.groups.len()))?;
        for (category, items) in &self.groups {
            map.serialize_entry(category.as_str(), items)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for CategoryPool {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct PoolVisitor;

        impl<'de> Visitor<'de> for PoolVisitor {
            type Value = CategoryPool;

            fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                formatter.write_str("a map of category name to a list of items")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut pool = CategoryPool::new();
                while let Some((category, items)) =
                    access.next_entry::<String, Option<Vec<Item>>>()?
                {
                    pool.insert(Category::parse(&category), items.unwrap_or_default());
                }
                Ok(pool)
            }

            fn visit_unit<E: serde::de::Error>(self) -> Result<Self::Value, E> {
                Ok(CategoryPool::new())
            }
        }

        deserializer.deserialize_any(PoolVisitor)
    }
}

/// Outfits generated for one complete season and scenario pairing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioOutfitBucket {
    pub label: String,
    pub season: String,
    pub scenario: Scenario,
    pub outfits: Vec<Outfit>,
}

impl ScenarioOutfitBucket {
    pub fn new(season: impl Into<String>, scenario: Scenario, outfits: Vec<Outfit>) -> Self {
        let season = season.into();
        Self { label: combination_label(&season, &scenario.name), season, scenario, outfits }
    }

    pub fn for_combination(combination: &SeasonScenarioCombination, outfits: Vec<Outfit>) -> Self {
        Self::new(combination.season(), combination.scenario().clone(), outfits)
    }

    pub fn matches(&self, combination: &SeasonScenarioCombination) -> bool {
        self.season == combination.season() && self.scenario.id == combination.scenario().id
    }
}
