//! Outfit combination builder
//!
//! Enumerates candidate outfits around an analyzed item from a season-filtered
//! pool of compatible items. The analyzed item's category selects the
//! strategy; every strategy enumerates lazily and stops at the per-call cap.

use tracing::debug;

use crate::domain::item::{Category, Item};
use crate::domain::scenario::Scenario;
use crate::season::is_layering_season;

use super::types::{CategoryPool, Outfit, OutfitKind};
use super::DEFAULT_MAX_OUTFITS_PER_BUILD;

/// Maximum number of categories the general strategy combines
pub const GENERAL_CATEGORY_LIMIT: usize = 3;

/// Construction rule selected by the analyzed item's category
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BuildStrategy {
    /// Dress or one-piece plus footwear, layered when the season calls for it
    Dress,
    /// Top across bottoms and footwear
    Top,
    /// Bottom across tops and footwear
    Bottom,
    /// Footwear across tops and bottoms
    Footwear,
    /// First item from up to three available categories
    General,
    /// Accessories and outerwear do not anchor outfits
    NotApplicable,
}

impl From<Category> for BuildStrategy {
    fn from(category: Category) -> Self {
        match category {
            Category::Dress | Category::OnePiece => Self::Dress,
            Category::Top => Self::Top,
            Category::Bottom => Self::Bottom,
            Category::Footwear => Self::Footwear,
            Category::Outerwear | Category::Accessory => Self::NotApplicable,
            Category::Other => Self::General,
        }
    }
}

/// Round-robin pick: `candidates[index % len]`, none for an empty slice.
fn rotate(candidates: &[Item], index: usize) -> Option<&Item> {
    if candidates.is_empty() {
        None
    } else {
        candidates.get(index % candidates.len())
    }
}

/// Every (a, b) pair with its 0-based enumeration index.
fn pairs<'a>(
    first: &'a [Item],
    second: &'a [Item],
) -> impl Iterator<Item = (usize, &'a Item, &'a Item)> + 'a {
    first
        .iter()
        .flat_map(move |a| second.iter().map(move |b| (a, b)))
        .enumerate()
        .map(|(index, (a, b))| (index, a, b))
}

fn outfit_of(kind: OutfitKind, analyzed: &Item, parts: &[&Item]) -> Outfit {
    let mut items = Vec::with_capacity(parts.len() + 1);
    items.push(analyzed.clone());
    items.extend(parts.iter().map(|item| (*item).clone()));
    Outfit::new(kind, items)
}

#[derive(Clone, Debug)]
pub struct OutfitCombinationBuilder {
    max_outfits: usize,
}

impl Default for OutfitCombinationBuilder {
    fn default() -> Self {
        Self { max_outfits: DEFAULT_MAX_OUTFITS_PER_BUILD }
    }
}

impl OutfitCombinationBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_outfits(max_outfits: usize) -> Self {
        Self { max_outfits }
    }

    pub fn max_outfits(&self) -> usize {
        self.max_outfits
    }

    /// Build up to `max_outfits` outfits for one season and scenario.
    ///
    /// Missing categories in `pool` just produce nothing for that branch.
    pub fn build(
        &self,
        analyzed: &Item,
        pool: &CategoryPool,
        season: &str,
        scenario: &Scenario,
    ) -> Vec<Outfit> {
        let strategy = BuildStrategy::from(analyzed.category);
        let outfits = match strategy {
            BuildStrategy::Dress => self.dress_outfits(analyzed, pool, season),
            BuildStrategy::Top => self.top_outfits(analyzed, pool),
            BuildStrategy::Bottom => self.paired_outfits(
                analyzed,
                pool.items(Category::Top),
                pool.items(Category::Footwear),
                OutfitKind::BottomBased,
            ),
            BuildStrategy::Footwear => self.paired_outfits(
                analyzed,
                pool.items(Category::Top),
                pool.items(Category::Bottom),
                OutfitKind::FootwearBased,
            ),
            BuildStrategy::General => self.general_outfit(analyzed, pool),
            BuildStrategy::NotApplicable => Vec::new(),
        };

        debug!(
            event_name = "outfits.builder.built",
            item_id = %analyzed.id,
            season,
            scenario = %scenario.name,
            strategy = ?strategy,
            outfit_count = outfits.len(),
            "built outfit combinations"
        );

        outfits
    }

    fn dress_outfits(&self, analyzed: &Item, pool: &CategoryPool, season: &str) -> Vec<Outfit> {
        let outerwear = pool.items(Category::Outerwear);
        let accessories = pool.items(Category::Accessory);
        let layered = !outerwear.is_empty() && is_layering_season(season);

        pool.items(Category::Footwear)
            .iter()
            .enumerate()
            .take(self.max_outfits)
            .map(|(index, footwear)| {
                if layered {
                    let layer = rotate(outerwear, index);
                    let parts: Vec<&Item> = [Some(footwear), layer].into_iter().flatten().collect();
                    outfit_of(OutfitKind::DressBasedLayered, analyzed, &parts)
                } else {
                    let accessory = rotate(accessories, index);
                    let parts: Vec<&Item> =
                        [Some(footwear), accessory].into_iter().flatten().collect();
                    outfit_of(OutfitKind::DressBased, analyzed, &parts)
                }
            })
            .collect()
    }

    fn top_outfits(&self, analyzed: &Item, pool: &CategoryPool) -> Vec<Outfit> {
        let outerwear = pool.items(Category::Outerwear);

        pairs(pool.items(Category::Bottom), pool.items(Category::Footwear))
            .take(self.max_outfits)
            .map(|(index, bottom, footwear)| match rotate(outerwear, index) {
                Some(layer) => {
                    outfit_of(OutfitKind::TopBasedLayered, analyzed, &[bottom, footwear, layer])
                }
                None => outfit_of(OutfitKind::TopBased, analyzed, &[bottom, footwear]),
            })
            .collect()
    }

    fn paired_outfits(
        &self,
        analyzed: &Item,
        first: &[Item],
        second: &[Item],
        kind: OutfitKind,
    ) -> Vec<Outfit> {
        pairs(first, second)
            .take(self.max_outfits)
            .map(|(_, a, b)| outfit_of(kind, analyzed, &[a, b]))
            .collect()
    }

    fn general_outfit(&self, analyzed: &Item, pool: &CategoryPool) -> Vec<Outfit> {
        if self.max_outfits == 0 {
            return Vec::new();
        }

        let parts: Vec<&Item> = pool
            .non_empty()
            .take(GENERAL_CATEGORY_LIMIT)
            .filter_map(|(_, items)| items.first())
            .collect();

        if parts.is_empty() {
            return Vec::new();
        }

        vec![outfit_of(OutfitKind::General, analyzed, &parts)]
    }
}

#[cfg(test)]
mod tests {
    use super::{BuildStrategy, OutfitCombinationBuilder};
    use crate::domain::item::{Category, Item};
    use crate::domain::scenario::Scenario;
    use crate::outfits::types::{CategoryPool, OutfitKind};

    fn item(id: &str, name: &str, category: Category) -> Item {
        Item::new(id, name, category).with_seasons(["summer", "fall"])
    }

    fn scenario() -> Scenario {
        Scenario::new("s-social", "Social Outings")
    }

    fn names(outfit: &crate::outfits::types::Outfit) -> Vec<&str> {
        outfit.item_names()
    }

    #[test]
    fn dress_with_single_sandal_builds_one_base_outfit() {
        let dress = Item::new("d-1", "Dress", Category::Dress).with_seasons(["summer"]);
        let pool: CategoryPool = vec![(
            Category::Footwear,
            vec![Item::new("f-1", "Sandals", Category::Footwear).with_seasons(["summer"])],
        )]
        .into_iter()
        .collect();

        let outfits = OutfitCombinationBuilder::new().build(&dress, &pool, "summer", &scenario());

        assert_eq!(outfits.len(), 1);
        assert_eq!(outfits[0].kind, OutfitKind::DressBased);
        assert_eq!(names(&outfits[0]), vec!["Dress", "Sandals"]);
    }

    #[test]
    fn dress_layers_outerwear_in_fall_and_rotates_candidates() {
        let dress = item("d-1", "Wrap Dress", Category::OnePiece);
        let pool: CategoryPool = vec![
            (
                Category::Footwear,
                vec![
                    item("f-1", "Boots", Category::Footwear),
                    item("f-2", "Loafers", Category::Footwear),
                    item("f-3", "Flats", Category::Footwear),
                ],
            ),
            (
                Category::Outerwear,
                vec![
                    item("o-1", "Trench", Category::Outerwear),
                    item("o-2", "Blazer", Category::Outerwear),
                ],
            ),
            (Category::Accessory, vec![item("a-1", "Scarf", Category::Accessory)]),
        ]
        .into_iter()
        .collect();

        let outfits = OutfitCombinationBuilder::new().build(&dress, &pool, "fall", &scenario());

        assert_eq!(outfits.len(), 3);
        assert!(outfits.iter().all(|outfit| outfit.kind == OutfitKind::DressBasedLayered));
        assert_eq!(names(&outfits[0]), vec!["Wrap Dress", "Boots", "Trench"]);
        assert_eq!(names(&outfits[1]), vec!["Wrap Dress", "Loafers", "Blazer"]);
        assert_eq!(names(&outfits[2]), vec!["Wrap Dress", "Flats", "Trench"]);
        assert!(outfits.iter().all(|outfit| !outfit.item_names().contains(&"Scarf")));
    }

    #[test]
    fn dress_takes_accessory_instead_of_outerwear_in_summer() {
        let dress = item("d-1", "Sundress", Category::Dress);
        let pool: CategoryPool = vec![
            (Category::Footwear, vec![item("f-1", "Sandals", Category::Footwear)]),
            (Category::Outerwear, vec![item("o-1", "Denim Jacket", Category::Outerwear)]),
            (Category::Accessory, vec![item("a-1", "Straw Hat", Category::Accessory)]),
        ]
        .into_iter()
        .collect();

        let outfits = OutfitCombinationBuilder::new().build(&dress, &pool, "summer", &scenario());

        assert_eq!(outfits.len(), 1);
        assert_eq!(outfits[0].kind, OutfitKind::DressBased);
        assert_eq!(names(&outfits[0]), vec!["Sundress", "Sandals", "Straw Hat"]);
    }

    #[test]
    fn dress_rotates_accessories_across_footwear() {
        let dress = item("d-1", "Sundress", Category::Dress);
        let pool: CategoryPool = vec![
            (
                Category::Footwear,
                vec![
                    item("f-1", "Sandals", Category::Footwear),
                    item("f-2", "Espadrilles", Category::Footwear),
                    item("f-3", "Mules", Category::Footwear),
                ],
            ),
            (
                Category::Accessory,
                vec![
                    item("a-1", "Straw Hat", Category::Accessory),
                    item("a-2", "Beaded Bag", Category::Accessory),
                ],
            ),
        ]
        .into_iter()
        .collect();

        let outfits = OutfitCombinationBuilder::new().build(&dress, &pool, "summer", &scenario());

        assert_eq!(outfits.len(), 3);
        assert!(outfits.iter().all(|outfit| outfit.kind == OutfitKind::DressBased));
        assert_eq!(names(&outfits[0]), vec!["Sundress", "Sandals", "Straw Hat"]);
        assert_eq!(names(&outfits[1]), vec!["Sundress", "Espadrilles", "Beaded Bag"]);
        assert_eq!(names(&outfits[2]), vec!["Sundress", "Mules", "Straw Hat"]);
    }

    #[test]
    fn top_rotates_outerwear_by_pair_index() {
        let top = item("t-1", "Turtleneck", Category::Top);
        let bottoms = vec![
            item("b-1", "Cords", Category::Bottom),
            item("b-2", "Wool Skirt", Category::Bottom),
        ];
        let footwear = vec![
            item("f-1", "Boots", Category::Footwear),
            item("f-2", "Loafers", Category::Footwear),
        ];
        let outerwear = vec![
            item("o-1", "Peacoat", Category::Outerwear),
            item("o-2", "Cardigan", Category::Outerwear),
            item("o-3", "Parka", Category::Outerwear),
        ];
        let pool: CategoryPool = vec![
            (Category::Bottom, bottoms.clone()),
            (Category::Footwear, footwear.clone()),
            (Category::Outerwear, outerwear.clone()),
        ]
        .into_iter()
        .collect();

        let outfits =
            OutfitCombinationBuilder::with_max_outfits(4).build(&top, &pool, "fall", &scenario());

        assert_eq!(outfits.len(), 4);
        for (b, bottom) in bottoms.iter().enumerate() {
            for (f, shoe) in footwear.iter().enumerate() {
                let index = b * footwear.len() + f;
                let layer = &outerwear[index % outerwear.len()];
                let outfit = names(&outfits[index]);
                assert_eq!(outfit.len(), 4);
                assert_eq!(outfit[0], "Turtleneck");
                assert_eq!(outfit[1], bottom.name);
                assert_eq!(outfit[2], shoe.name);
                assert_eq!(outfit[3], layer.name);
            }
        }
    }

    #[test]
    fn top_emits_exactly_one_variant_per_pair() {
        let top = item("t-1", "Oxford Shirt", Category::Top);
        let pool: CategoryPool = vec![
            (Category::Bottom, vec![item("b-1", "Chinos", Category::Bottom)]),
            (
                Category::Footwear,
                vec![
                    item("f-1", "Derbies", Category::Footwear),
                    item("f-2", "Sneakers", Category::Footwear),
                ],
            ),
            (Category::Outerwear, vec![item("o-1", "Blazer", Category::Outerwear)]),
        ]
        .into_iter()
        .collect();

        let outfits = OutfitCombinationBuilder::new().build(&top, &pool, "summer", &scenario());

        assert_eq!(outfits.len(), 2);
        assert!(outfits.iter().all(|outfit| outfit.kind == OutfitKind::TopBasedLayered));
        assert_eq!(names(&outfits[0]), vec!["Oxford Shirt", "Chinos", "Derbies", "Blazer"]);
        assert_eq!(names(&outfits[1]), vec!["Oxford Shirt", "Chinos", "Sneakers", "Blazer"]);
    }

    #[test]
    fn top_without_outerwear_is_plain_and_capped_at_three() {
        let top = item("t-1", "Tee", Category::Top);
        let pool: CategoryPool = vec![
            (
                Category::Bottom,
                vec![
                    item("b-1", "Jeans", Category::Bottom),
                    item("b-2", "Shorts", Category::Bottom),
                ],
            ),
            (
                Category::Footwear,
                vec![
                    item("f-1", "Sneakers", Category::Footwear),
                    item("f-2", "Sandals", Category::Footwear),
                ],
            ),
        ]
        .into_iter()
        .collect();

        let outfits = OutfitCombinationBuilder::new().build(&top, &pool, "summer", &scenario());

        assert_eq!(outfits.len(), 3);
        assert!(outfits.iter().all(|outfit| outfit.kind == OutfitKind::TopBased));
        assert_eq!(names(&outfits[2]), vec!["Tee", "Shorts", "Sneakers"]);
    }

    #[test]
    fn bottom_and_footwear_use_cartesian_products() {
        let pool: CategoryPool = vec![
            (Category::Top, vec![item("t-1", "Tee", Category::Top)]),
            (Category::Bottom, vec![item("b-1", "Jeans", Category::Bottom)]),
            (Category::Footwear, vec![item("f-1", "Sneakers", Category::Footwear)]),
            (Category::Outerwear, vec![item("o-1", "Parka", Category::Outerwear)]),
        ]
        .into_iter()
        .collect();
        let builder = OutfitCombinationBuilder::new();

        let bottom =
            builder.build(&item("b-9", "Skirt", Category::Bottom), &pool, "fall", &scenario());
        assert_eq!(bottom.len(), 1);
        assert_eq!(bottom[0].kind, OutfitKind::BottomBased);
        assert_eq!(names(&bottom[0]), vec!["Skirt", "Tee", "Sneakers"]);

        let shoes =
            builder.build(&item("f-9", "Boots", Category::Footwear), &pool, "fall", &scenario());
        assert_eq!(shoes.len(), 1);
        assert_eq!(shoes[0].kind, OutfitKind::FootwearBased);
        assert_eq!(names(&shoes[0]), vec!["Boots", "Tee", "Jeans"]);
    }

    #[test]
    fn general_takes_first_item_of_up_to_three_categories() {
        let other = item("x-1", "Kimono", Category::Other);
        let pool: CategoryPool = vec![
            (Category::Footwear, vec![]),
            (
                Category::Top,
                vec![item("t-1", "Tank", Category::Top), item("t-2", "Tee", Category::Top)],
            ),
            (Category::Bottom, vec![item("b-1", "Jeans", Category::Bottom)]),
            (Category::Accessory, vec![item("a-1", "Belt", Category::Accessory)]),
            (Category::Outerwear, vec![item("o-1", "Coat", Category::Outerwear)]),
        ]
        .into_iter()
        .collect();

        let outfits = OutfitCombinationBuilder::new().build(&other, &pool, "summer", &scenario());

        assert_eq!(outfits.len(), 1);
        assert_eq!(outfits[0].kind, OutfitKind::General);
        assert_eq!(names(&outfits[0]), vec!["Kimono", "Tank", "Jeans", "Belt"]);
    }

    #[test]
    fn empty_pools_build_nothing() {
        let builder = OutfitCombinationBuilder::new();
        let pool = CategoryPool::new();

        for category in Category::ALL {
            let outfits =
                builder.build(&item("x-1", "Thing", category), &pool, "summer", &scenario());
            assert!(outfits.is_empty(), "{category} should build nothing from an empty pool");
        }
    }

    #[test]
    fn accessories_and_outerwear_are_not_applicable() {
        assert_eq!(BuildStrategy::from(Category::Accessory), BuildStrategy::NotApplicable);
        assert_eq!(BuildStrategy::from(Category::Outerwear), BuildStrategy::NotApplicable);

        let pool: CategoryPool =
            vec![(Category::Top, vec![item("t-1", "Tee", Category::Top)])].into_iter().collect();
        let outfits = OutfitCombinationBuilder::new().build(
            &item("a-1", "Belt", Category::Accessory),
            &pool,
            "summer",
            &scenario(),
        );
        assert!(outfits.is_empty());
    }

    #[test]
    fn every_outfit_has_the_analyzed_item_first_and_a_partner() {
        let pool: CategoryPool = vec![
            (Category::Top, vec![item("t-1", "Tee", Category::Top)]),
            (Category::Bottom, vec![item("b-1", "Jeans", Category::Bottom)]),
            (Category::Footwear, vec![item("f-1", "Sneakers", Category::Footwear)]),
        ]
        .into_iter()
        .collect();
        let builder = OutfitCombinationBuilder::with_max_outfits(10);

        for category in Category::ALL {
            let analyzed = item("x-1", "Anchor", category);
            for outfit in builder.build(&analyzed, &pool, "summer", &scenario()) {
                assert!(outfit.items.len() >= 2);
                assert_eq!(outfit.analyzed_item(), Some(&analyzed));
            }
        }
    }
}
