//! Fallback synthesis: the terminal, non-failing recommendation tier.
//!
//! Fabricates a plausible substitute from category-conditioned vocabularies,
//! perturbing the base's price and popularity. Uniqueness against `used` is
//! enforced by bounded regeneration with a deterministic terminal step, so
//! this path always succeeds.

use rand::Rng;
use rand::seq::SliceRandom;
use tracing::debug;

use super::RecommendationSession;
use crate::catalog::{Candidate, ReasonCode, Recommendation, RecommendationSource};

const BABY_BRANDS: &[&str] = &["BabyLove", "TinyTots", "LittleAngel", "PureBaby", "SweetDreams"];

const BABY_NAMES: &[&str] = &[
    "Gentle Baby Lotion",
    "Soft Baby Wipes",
    "Baby Moisturizer",
    "Baby Shampoo",
    "Baby Oil",
    "Diaper Cream",
    "Baby Powder",
];

const GENERIC_BRANDS: &[&str] = &[
    "QualityBrand",
    "TrustedChoice",
    "PremiumSelect",
    "ReliableGoods",
    "BestValue",
];

const GENERIC_NAME_TEMPLATES: &[&str] = &["Premium {} Product", "Quality {} Item", "Trusted {} Solution", "Reliable {} Choice"];

/// Regeneration attempts before switching to the deterministic suffix.
const MAX_ID_REGENS: u32 = 8;

impl RecommendationSession {
    /// Fabricates a recommendation anchored on `base`. Always succeeds.
    pub(crate) fn synthesize(&mut self, base: &Candidate) -> Recommendation {
        let id = self.fresh_fallback_id();

        let (name, brand) = self.pick_name_and_brand(&base.category);

        let price = (base.price.max(0.01)) * self.rng.gen_range(0.8..1.2);
        let brand_popularity =
            (base.brand_popularity * self.rng.gen_range(0.8..1.2)).clamp(0.0, 10.0);
        let reason_code = *ReasonCode::ALL
            .choose(&mut self.rng)
            .unwrap_or(&ReasonCode::Popularity);

        self.record_emission(&id, &brand);
        debug!(id = %id, name = %name, brand = %brand, "Synthesized fallback recommendation");

        Recommendation {
            replacement_id: id,
            name,
            brand,
            category: base.category.clone(),
            price,
            reason_code,
            brand_popularity,
            source: RecommendationSource::Fallback,
        }
    }

    /// Picks an id not yet in `used`: a few random draws, then a suffix
    /// derived from the emission count, which is unique by construction.
    fn fresh_fallback_id(&mut self) -> String {
        for _ in 0..MAX_ID_REGENS {
            let id = format!("fallback_{}", self.rng.gen_range(1000..10000));
            if !self.used.contains(&id) {
                return id;
            }
        }

        let mut id = format!("fallback_{}_{}", self.rng.gen_range(1000..10000), self.used.len());
        while self.used.contains(&id) {
            id.push('x');
        }
        id
    }

    fn pick_name_and_brand(&mut self, category: &str) -> (String, String) {
        let (names, brands): (Vec<String>, &[&str]) =
            if category.to_lowercase().contains("baby") {
                (BABY_NAMES.iter().map(|s| s.to_string()).collect(), BABY_BRANDS)
            } else {
                (
                    GENERIC_NAME_TEMPLATES
                        .iter()
                        .map(|t| t.replace("{}", category))
                        .collect(),
                    GENERIC_BRANDS,
                )
            };

        let name = names
            .choose(&mut self.rng)
            .cloned()
            .unwrap_or_else(|| format!("Substitute {category} Product"));

        let mut brand = brands
            .choose(&mut self.rng)
            .map(|s| s.to_string())
            .unwrap_or_else(|| "Substitute".to_string());

        // Nudge the brand rather than fight the diversity cap.
        if self.used_brands.contains_key(&brand) {
            brand = format!("{}_{}", brand, self.rng.gen_range(1..100));
            while self.used_brands.contains_key(&brand) {
                brand.push('x');
            }
        }

        (name, brand)
    }
}
