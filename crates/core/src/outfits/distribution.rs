//! Fair distribution of deduplicated outfits across scenario buckets.
//!
//! Signatures that only one bucket can use are always kept there; signatures
//! shared by several buckets go to exactly one of them, preferring the bucket
//! with the fewest outfits so far.

use std::collections::HashMap;

use tracing::{debug, info};

use crate::essentials::SeasonScenarioCombination;

use super::signature::OutfitSignature;
use super::types::{Outfit, ScenarioOutfitBucket};
use super::DEFAULT_MAX_OUTFITS_PER_SCENARIO;

/// A signature, its first-seen outfit, and every bucket that produced it.
#[derive(Debug)]
struct SignatureEntry {
    outfit: Outfit,
    buckets: Vec<usize>,
}

impl SignatureEntry {
    fn is_exclusive(&self) -> bool {
        self.buckets.len() == 1
    }
}

fn index_signatures(buckets: &[ScenarioOutfitBucket]) -> Vec<SignatureEntry> {
    let mut positions: HashMap<OutfitSignature, usize> = HashMap::new();
    let mut entries: Vec<SignatureEntry> = Vec::new();

    for (bucket_index, bucket) in buckets.iter().enumerate() {
        for outfit in &bucket.outfits {
            let signature = outfit.signature();
            match positions.get(&signature) {
                Some(&position) => {
                    let entry = &mut entries[position];
                    if !entry.buckets.contains(&bucket_index) {
                        entry.buckets.push(bucket_index);
                    }
                }
                None => {
                    positions.insert(signature, entries.len());
                    entries.push(SignatureEntry {
                        outfit: outfit.clone(),
                        buckets: vec![bucket_index],
                    });
                }
            }
        }
    }

    entries
}

#[derive(Clone, Debug)]
pub struct IntelligentDistributionAllocator {
    max_per_scenario: usize,
}

impl Default for IntelligentDistributionAllocator {
    fn default() -> Self {
        Self { max_per_scenario: DEFAULT_MAX_OUTFITS_PER_SCENARIO }
    }
}

impl IntelligentDistributionAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cap(max_per_scenario: usize) -> Self {
        Self { max_per_scenario }
    }

    pub fn max_per_scenario(&self) -> usize {
        self.max_per_scenario
    }

    /// Re-spread the outfits of `buckets` so that each signature lands in at
    /// most one bucket and no bucket holds more than the cap.
    ///
    /// Every complete combination without a bucket gets an empty one. Empty
    /// buckets are kept.
    pub fn distribute(
        &self,
        mut buckets: Vec<ScenarioOutfitBucket>,
        complete: &[SeasonScenarioCombination],
    ) -> Vec<ScenarioOutfitBucket> {
        for combination in complete.iter().filter(|c| c.has_all_essentials()) {
            if !buckets.iter().any(|bucket| bucket.matches(combination)) {
                buckets.push(ScenarioOutfitBucket::for_combination(combination, Vec::new()));
            }
        }

        let bucket_count = buckets.len();
        if bucket_count == 0 {
            return buckets;
        }

        let entries = index_signatures(&buckets);
        let mut assigned: Vec<Vec<Outfit>> = vec![Vec::new(); bucket_count];

        let (exclusive, shared): (Vec<SignatureEntry>, Vec<SignatureEntry>) =
            entries.into_iter().partition(SignatureEntry::is_exclusive);

        for entry in exclusive {
            assigned[entry.buckets[0]].push(entry.outfit);
        }

        let mut cursor = 0usize;
        for entry in shared {
            let chosen = entry
                .buckets
                .iter()
                .copied()
                .min_by_key(|&index| {
                    (assigned[index].len(), (index + bucket_count - cursor) % bucket_count)
                })
                .unwrap_or(entry.buckets[0]);
            assigned[chosen].push(entry.outfit);
            cursor = (chosen + 1) % bucket_count;
        }

        buckets
            .into_iter()
            .zip(assigned)
            .map(|(mut bucket, mut outfits)| {
                if outfits.len() > self.max_per_scenario {
                    info!(
                        event_name = "outfits.distribution.capped",
                        combination = %bucket.label,
                        assigned = outfits.len(),
                        cap = self.max_per_scenario,
                        "truncated scenario outfits to cap"
                    );
                    outfits.truncate(self.max_per_scenario);
                }
                debug!(
                    event_name = "outfits.distribution.assigned",
                    combination = %bucket.label,
                    outfit_count = outfits.len(),
                    "assigned outfits to scenario"
                );
                bucket.outfits = outfits;
                bucket
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use proptest::prelude::*;

    use super::IntelligentDistributionAllocator;
    use crate::domain::item::{Category, Item};
    use crate::domain::scenario::Scenario;
    use crate::essentials::SeasonScenarioCombination;
    use crate::outfits::signature::OutfitSignature;
    use crate::outfits::types::{Outfit, OutfitKind, ScenarioOutfitBucket};

    fn outfit(names: &[&str]) -> Outfit {
        Outfit::new(
            OutfitKind::General,
            names
                .iter()
                .map(|name| Item::new(format!("id-{name}"), *name, Category::Other))
                .collect(),
        )
    }

    fn bucket(season: &str, scenario: &str, outfits: Vec<Outfit>) -> ScenarioOutfitBucket {
        ScenarioOutfitBucket::new(season, Scenario::new(format!("s-{scenario}"), scenario), outfits)
    }

    fn signatures(bucket: &ScenarioOutfitBucket) -> Vec<String> {
        bucket.outfits.iter().map(|outfit| outfit.signature().0).collect()
    }

    #[test]
    fn exclusive_outfits_stay_with_their_scenario() {
        let buckets = vec![
            bucket("summer", "Office", vec![outfit(&["Tee", "Jeans"])]),
            bucket("summer", "Gym", vec![outfit(&["Tank", "Shorts"])]),
        ];

        let result = IntelligentDistributionAllocator::new().distribute(buckets, &[]);

        assert_eq!(signatures(&result[0]), vec!["Jeans + Tee"]);
        assert_eq!(signatures(&result[1]), vec!["Shorts + Tank"]);
    }

    #[test]
    fn shared_outfits_are_spread_to_the_lightest_bucket() {
        let shared_a = outfit(&["Tee", "Jeans"]);
        let shared_b = outfit(&["Tee", "Chinos"]);
        let buckets = vec![
            bucket(
                "summer",
                "Office",
                vec![shared_a.clone(), shared_b.clone(), outfit(&["Tee", "Slacks"])],
            ),
            bucket("summer", "Social", vec![shared_b, shared_a]),
        ];

        let result = IntelligentDistributionAllocator::new().distribute(buckets, &[]);

        assert_eq!(signatures(&result[0]), vec!["Slacks + Tee", "Chinos + Tee"]);
        assert_eq!(signatures(&result[1]), vec!["Jeans + Tee"]);
    }

    #[test]
    fn ties_rotate_between_candidates() {
        let buckets = vec![
            bucket("fall", "Office", vec![outfit(&["A", "B"]), outfit(&["C", "D"])]),
            bucket("fall", "Social", vec![outfit(&["A", "B"]), outfit(&["C", "D"])]),
        ];

        let result = IntelligentDistributionAllocator::new().distribute(buckets, &[]);

        assert_eq!(signatures(&result[0]), vec!["A + B"]);
        assert_eq!(signatures(&result[1]), vec!["C + D"]);
    }

    #[test]
    fn duplicates_inside_one_bucket_collapse_to_first_occurrence() {
        let first = Outfit::new(
            OutfitKind::TopBased,
            vec![Item::new("t", "Tee", Category::Top), Item::new("b", "Jeans", Category::Bottom)],
        );
        let second = Outfit::new(
            OutfitKind::BottomBased,
            vec![Item::new("b", "Jeans", Category::Bottom), Item::new("t", "Tee", Category::Top)],
        );
        let buckets = vec![bucket("summer", "Office", vec![first.clone(), second])];

        let result = IntelligentDistributionAllocator::new().distribute(buckets, &[]);

        assert_eq!(result[0].outfits, vec![first]);
    }

    #[test]
    fn complete_combinations_without_outfits_get_empty_buckets() {
        let office = Scenario::new("s-office", "Office");
        let gym = Scenario::new("s-gym", "Gym");
        let complete = vec![
            SeasonScenarioCombination::new(
                "summer",
                office.clone(),
                vec![Category::Footwear],
                vec![],
            ),
            SeasonScenarioCombination::new("summer", gym, vec![Category::Footwear], vec![]),
        ];
        let buckets =
            vec![ScenarioOutfitBucket::new("summer", office, vec![outfit(&["Dress", "Flats"])])];

        let result = IntelligentDistributionAllocator::new().distribute(buckets, &complete);

        assert_eq!(result.len(), 2);
        assert_eq!(result[1].label, "summer - Gym");
        assert!(result[1].outfits.is_empty());
    }

    #[test]
    fn incomplete_combinations_do_not_add_buckets() {
        let incomplete = vec![SeasonScenarioCombination::new(
            "winter",
            Scenario::new("s-office", "Office"),
            vec![],
            vec![Category::Footwear],
        )];

        let result = IntelligentDistributionAllocator::new().distribute(Vec::new(), &incomplete);

        assert!(result.is_empty());
    }

    #[test]
    fn buckets_are_truncated_to_the_cap_exclusive_first() {
        let exclusive: Vec<Outfit> =
            (0..4).map(|n| outfit(&["Solo", format!("E{n}").as_str()])).collect();
        let shared = outfit(&["Both", "Shared"]);
        let mut first = vec![shared.clone()];
        first.extend(exclusive.iter().cloned());
        let buckets = vec![
            bucket("summer", "Office", first),
            bucket("summer", "Gym", vec![shared.clone()]),
        ];

        let result = IntelligentDistributionAllocator::with_cap(3).distribute(buckets, &[]);

        assert_eq!(result[0].outfits, exclusive[..3].to_vec());
        assert_eq!(result[1].outfits, vec![shared]);
    }

    proptest! {
        #[test]
        fn allocation_respects_cap_uniqueness_and_exclusivity(
            layout in prop::collection::vec(prop::collection::vec(0usize..30, 0..25), 1..5),
            cap in 1usize..12,
        ) {
            let buckets: Vec<ScenarioOutfitBucket> = layout
                .iter()
                .enumerate()
                .map(|(index, ids)| {
                    let outfits = ids
                        .iter()
                        .map(|id| outfit(&["Anchor", format!("Piece {id}").as_str()]))
                        .collect();
                    bucket("summer", format!("Scenario {index}").as_str(), outfits)
                })
                .collect();

            let mut owners: std::collections::HashMap<OutfitSignature, HashSet<usize>> =
                std::collections::HashMap::new();
            for (index, bucket) in buckets.iter().enumerate() {
                for outfit in &bucket.outfits {
                    owners.entry(outfit.signature()).or_default().insert(index);
                }
            }

            let result = IntelligentDistributionAllocator::with_cap(cap).distribute(buckets, &[]);
            prop_assert_eq!(result.len(), layout.len());

            let mut placed = HashSet::new();
            for (index, bucket) in result.iter().enumerate() {
                prop_assert!(bucket.outfits.len() <= cap);
                for outfit in &bucket.outfits {
                    let signature = outfit.signature();
                    prop_assert!(placed.insert(signature.clone()), "signature placed twice");
                    prop_assert!(owners[&signature].contains(&index));
                }
            }

            for (index, bucket) in result.iter().enumerate() {
                let exclusives: Vec<&OutfitSignature> = owners
                    .iter()
                    .filter(|(_, holders)| holders.len() == 1 && holders.contains(&index))
                    .map(|(signature, _)| signature)
                    .collect();
                if exclusives.len() <= cap {
                    let present: HashSet<OutfitSignature> =
                        bucket.outfits.iter().map(Outfit::signature).collect();
                    for signature in exclusives {
                        prop_assert!(present.contains(signature));
                    }
                }
            }
        }
    }
}
