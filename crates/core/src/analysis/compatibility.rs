//! Compatibility classification seam.
//!
//! Deciding which wardrobe items go with the analyzed item is delegated to an
//! external classifier (typically model-backed). The analyzer asks it three
//! independent questions and merges whatever comes back.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::item::{Category, Item};
use crate::errors::ApplicationError;
use crate::outfits::CategoryPool;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompatibilityCheck {
    /// Pieces worn together with the item: tops, bottoms, one-pieces, footwear
    Complementing,
    /// Accessories layered over an outfit
    Layering,
    /// Jackets and coats
    Outerwear,
}

impl CompatibilityCheck {
    /// Run order used by the analyzer.
    pub const ALL: [CompatibilityCheck; 3] = [Self::Complementing, Self::Layering, Self::Outerwear];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Complementing => "complementing",
            Self::Layering => "layering",
            Self::Outerwear => "outerwear",
        }
    }

    /// Whether results of this check are trusted for `category`.
    pub fn owns(&self, category: Category) -> bool {
        match self {
            Self::Complementing => !matches!(category, Category::Accessory | Category::Outerwear),
            Self::Layering => category == Category::Accessory,
            Self::Outerwear => category == Category::Outerwear,
        }
    }
}

impl fmt::Display for CompatibilityCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[async_trait]
pub trait CompatibilityClassifier: Send + Sync {
    /// Items from `wardrobe` compatible with `analyzed` for one check, grouped
    /// by category.
    async fn classify(
        &self,
        check: CompatibilityCheck,
        analyzed: &Item,
        wardrobe: &[Item],
    ) -> Result<CategoryPool, ApplicationError>;
}

/// Classifier over an already-known compatible pool, e.g. results cached from
/// an earlier model run or supplied with a request.
#[derive(Clone, Debug, Default)]
pub struct PrecomputedCompatibility {
    pool: CategoryPool,
}

impl PrecomputedCompatibility {
    pub fn new(pool: CategoryPool) -> Self {
        Self { pool }
    }

    /// Treat every wardrobe item as compatible, grouped in wardrobe order.
    pub fn from_wardrobe(items: &[Item]) -> Self {
        let mut pool = CategoryPool::new();
        for item in items {
            pool.insert(item.category, [item.clone()]);
        }
        Self { pool }
    }

    pub fn pool(&self) -> &CategoryPool {
        &self.pool
    }
}

#[async_trait]
impl CompatibilityClassifier for PrecomputedCompatibility {
    async fn classify(
        &self,
        check: CompatibilityCheck,
        analyzed: &Item,
        _wardrobe: &[Item],
    ) -> Result<CategoryPool, ApplicationError> {
        Ok(self
            .pool
            .non_empty()
            .filter(|(category, _)| check.owns(*category))
            .map(|(category, items)| {
                let items = items.iter().filter(|item| item.id != analyzed.id).cloned().collect();
                (category, items)
            })
            .collect())
    }
}
