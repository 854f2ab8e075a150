//! Outfit signatures and deduplication.
//!
//! Two outfits with the same item names are the same outfit, whatever their
//! kind or item order. The first occurrence wins.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::types::Outfit;

pub const SIGNATURE_SEPARATOR: &str = " + ";

/// Order- and kind-independent identity of an outfit: item names sorted
/// lexicographically and joined with `" + "`. Case and whitespace are kept.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OutfitSignature(pub String);

impl OutfitSignature {
    pub fn of(outfit: &Outfit) -> Self {
        Self::from_names(outfit.items.iter().map(|item| item.name.as_str()))
    }

    pub fn from_names<'a>(names: impl IntoIterator<Item = &'a str>) -> Self {
        let mut names: Vec<&str> = names.into_iter().collect();
        names.sort_unstable();
        Self(names.join(SIGNATURE_SEPARATOR))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OutfitSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Keep the first outfit for each signature, preserving order.
pub fn dedup_outfits(outfits: impl IntoIterator<Item = Outfit>) -> Vec<Outfit> {
    let mut seen = HashSet::new();
    outfits.into_iter().filter(|outfit| seen.insert(outfit.signature())).collect()
}
