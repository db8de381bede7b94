//! Ranks catalog foods against a pet's open deficiencies.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use super::calculator;
use super::config::NutritionConfig;
use super::gap_analyzer::{GapSeverity, NutritionalGap};
use super::normalizer::DryMatterProfile;
use super::types::{CatalogFood, LifeStage, Nutrient, Species};

pub const DEFAULT_TOP_K: usize = 3;

/// What the recommender needs to know about the pet and its current intake.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecommendationContext {
    pub species: Species,
    pub life_stage: LifeStage,
    /// The daily calorie target a suggestion must not push intake above.
    pub calorie_target: f64,
    pub current_daily_calories: f64,
    pub top_k: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodRecommendation {
    pub food_id: Uuid,
    pub food_name: String,
    pub score: f64,
    /// Open deficiencies this food supplies, in gap order.
    pub addresses: Vec<Nutrient>,
    /// The gap the suggested portion is sized for.
    pub portion_target: Nutrient,
    pub suggested_portion_grams: f64,
    pub portion_calories: f64,
    pub projected_daily_calories: f64,
    /// The calorie budget ran out before the gap closed.
    pub partial: bool,
    pub price_per_kg: Option<f64>,
    pub rationale: Vec<String>,
}

struct Scored<'a> {
    food: &'a CatalogFood,
    dm: DryMatterProfile,
    score: f64,
    addresses: Vec<Nutrient>,
}

/// Returns up to `ctx.top_k` foods, best first.
///
/// Only deficiencies are considered. An empty catalog, no deficiencies or a
/// zero `top_k` yield an empty list.
pub fn recommend(
    gaps: &[NutritionalGap],
    catalog: &[CatalogFood],
    ctx: &RecommendationContext,
    config: &NutritionConfig,
) -> Vec<FoodRecommendation> {
    let open: Vec<&NutritionalGap> = gaps
        .iter()
        .filter(|g| g.severity == GapSeverity::Deficiency && g.delta > 0.0)
        .collect();
    if open.is_empty() || catalog.is_empty() || ctx.top_k == 0 {
        return Vec::new();
    }

    let mut scored: Vec<Scored<'_>> = catalog
        .iter()
        .filter(|food| food.is_suitable_for(ctx.species, ctx.life_stage))
        .filter_map(|food| match DryMatterProfile::from_food(&food.nutrients, config) {
            Ok(dm) => Some((food, dm)),
            Err(e) => {
                debug!(food_id = %food.id, error = %e, "food excluded from ranking");
                None
            }
        })
        .filter_map(|(food, dm)| {
            let (score, addresses) = score_food(&dm, &open, config);
            (score > 0.0).then_some(Scored {
                food,
                dm,
                score,
                addresses,
            })
        })
        .collect();

    scored.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then_with(|| compare_price(a.food.price_per_kg, b.food.price_per_kg))
    });

    scored
        .into_iter()
        .take(ctx.top_k)
        .filter_map(|s| build_recommendation(s, &open, ctx, config))
        .collect()
}

fn score_food(
    dm: &DryMatterProfile,
    open: &[&NutritionalGap],
    config: &NutritionConfig,
) -> (f64, Vec<Nutrient>) {
    let mut score = 0.0;
    let mut addresses = Vec::new();
    for gap in open {
        let cap = config.score_caps.for_nutrient(gap.nutrient);
        let value = dm.value(gap.nutrient).clamp(0.0, cap);
        if value > 0.0 && cap > 0.0 {
            score += value / cap * gap.relative_delta;
            addresses.push(gap.nutrient);
        }
    }
    (score, addresses)
}

/// Priced foods first, cheaper first; unpriced foods keep catalog order.
fn compare_price(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.total_cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn build_recommendation(
    scored: Scored<'_>,
    open: &[&NutritionalGap],
    ctx: &RecommendationContext,
    config: &NutritionConfig,
) -> Option<FoodRecommendation> {
    let nutrients = &scored.food.nutrients;
    let gap = open
        .iter()
        .find(|g| calculator::per_gram(nutrients, g.nutrient, config) > 0.0)?;

    let per_gram = calculator::per_gram(nutrients, gap.nutrient, config);
    let kcal_per_gram = calculator::per_gram(nutrients, Nutrient::Calories, config);
    let closing_portion = gap.delta / per_gram;

    let budget = (ctx.calorie_target - ctx.current_daily_calories).max(0.0);
    let (portion, partial) = if kcal_per_gram > 0.0 && closing_portion * kcal_per_gram > budget {
        (budget / kcal_per_gram, true)
    } else {
        (closing_portion, false)
    };
    let portion_calories = portion * kcal_per_gram;

    let mut rationale = vec![format!(
        "{portion:.0} g adds {supplied:.1} {unit} {nutrient} toward a {delta:.1} {unit} shortfall",
        supplied = portion * per_gram,
        unit = gap.nutrient.unit(),
        nutrient = gap.nutrient,
        delta = gap.delta,
    )];
    for nutrient in &scored.addresses {
        let unit = match nutrient {
            Nutrient::Calories => " kcal/100 g",
            _ => "%",
        };
        rationale.push(format!(
            "{nutrient}: {:.1}{unit} on a dry-matter basis",
            scored.dm.value(*nutrient)
        ));
    }
    if partial {
        rationale.push(format!(
            "portion limited by the remaining {budget:.0} kcal of the daily target"
        ));
    }
    if scored.dm.calories_estimated {
        rationale.push("calories estimated from macros".to_owned());
    }

    Some(FoodRecommendation {
        food_id: scored.food.id,
        food_name: scored.food.name.clone(),
        score: scored.score,
        addresses: scored.addresses,
        portion_target: gap.nutrient,
        suggested_portion_grams: portion,
        portion_calories,
        projected_daily_calories: ctx.current_daily_calories + portion_calories,
        partial,
        price_per_kg: scored.food.price_per_kg,
        rationale,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nutrition::requirements::TargetRange;
    use crate::nutrition::types::{FoodNutrients, FoodType};

    fn food(name: &str, protein_pct: f64, kcal: f64, price: Option<f64>) -> CatalogFood {
        CatalogFood {
            id: Uuid::new_v4(),
            name: name.into(),
            nutrients: FoodNutrients {
                food_type: FoodType::Dry,
                moisture_pct: 10.0,
                protein_pct,
                fat_pct: 10.0,
                fiber_pct: 3.0,
                carbohydrate_pct: Some(40.0),
                ash_pct: None,
                serving_size_grams: None,
                calories_per_100g: Some(kcal),
            },
            price_per_kg: price,
            species: vec![],
            life_stages: vec![],
        }
    }

    fn protein_gap(delta: f64, relative: f64) -> NutritionalGap {
        NutritionalGap {
            nutrient: Nutrient::Protein,
            actual: 50.0 - delta,
            target: TargetRange::new(50.0, 70.0),
            severity: GapSeverity::Deficiency,
            delta,
            relative_delta: relative,
        }
    }

    fn ctx(current: f64) -> RecommendationContext {
        RecommendationContext {
            species: Species::Dog,
            life_stage: LifeStage::Adult,
            calorie_target: 630.0,
            current_daily_calories: current,
            top_k: DEFAULT_TOP_K,
        }
    }

    #[test]
    fn empty_catalog_yields_nothing() {
        let recs = recommend(
            &[protein_gap(10.0, 0.5)],
            &[],
            &ctx(400.0),
            &NutritionConfig::default(),
        );
        assert!(recs.is_empty());
    }

    #[test]
    fn excess_gaps_are_not_remediated() {
        let excess = NutritionalGap {
            severity: GapSeverity::Excess,
            ..protein_gap(10.0, 0.5)
        };
        let recs = recommend(
            &[excess],
            &[food("A", 25.0, 350.0, None)],
            &ctx(400.0),
            &NutritionConfig::default(),
        );
        assert!(recs.is_empty());
    }

    #[test]
    fn rex_portion_closes_protein_gap() {
        // 22.5 % as-fed at 10 % moisture is 25 % protein on a dry-matter basis.
        let catalog = vec![food("Lean", 22.5, 350.0, None)];
        let recs = recommend(
            &[protein_gap(10.0, 0.5)],
            &catalog,
            &ctx(450.0),
            &NutritionConfig::default(),
        );
        assert_eq!(recs.len(), 1);
        let rec = &recs[0];
        assert_eq!(rec.portion_target, Nutrient::Protein);
        assert!(!rec.partial);
        let protein_added = rec.suggested_portion_grams * 0.225;
        assert!((protein_added - 10.0).abs() < 1e-6);
        assert!(rec.projected_daily_calories <= 630.0);
    }

    #[test]
    fn calorie_budget_caps_portion() {
        let catalog = vec![food("Dense", 22.5, 450.0, None)];
        let recs = recommend(
            &[protein_gap(10.0, 0.5)],
            &catalog,
            &ctx(600.0),
            &NutritionConfig::default(),
        );
        let rec = &recs[0];
        assert!(rec.partial);
        assert!(rec.projected_daily_calories <= 630.0 + 1e-9);
        assert!((rec.suggested_portion_grams - 30.0 / 4.5).abs() < 1e-9);
    }

    #[test]
    fn exhausted_budget_returns_zero_partial_portion() {
        let recs = recommend(
            &[protein_gap(10.0, 0.5)],
            &[food("A", 22.5, 350.0, None)],
            &ctx(700.0),
            &NutritionConfig::default(),
        );
        assert!(recs[0].partial);
        assert_eq!(recs[0].suggested_portion_grams, 0.0);
        assert_eq!(recs[0].projected_daily_calories, 700.0);
    }

    #[test]
    fn higher_protein_ranks_first_and_price_breaks_ties() {
        let catalog = vec![
            food("Pricey", 22.5, 350.0, Some(12.0)),
            food("Unpriced", 22.5, 350.0, None),
            food("Cheap", 22.5, 350.0, Some(6.0)),
            food("Rich", 36.0, 380.0, Some(20.0)),
        ];
        let config = NutritionConfig::default();
        let mut c = ctx(400.0);
        c.top_k = 4;
        let recs = recommend(&[protein_gap(10.0, 0.5)], &catalog, &c, &config);
        let names: Vec<&str> = recs.iter().map(|r| r.food_name.as_str()).collect();
        assert_eq!(names, ["Rich", "Cheap", "Pricey", "Unpriced"]);
    }

    #[test]
    fn protein_extreme_food_is_clipped() {
        let mut extreme = food("Extreme", 85.0, 380.0, None);
        extreme.nutrients.fat_pct = 2.0;
        extreme.nutrients.carbohydrate_pct = Some(0.0);
        let mut capped = food("Capped", 54.0, 380.0, None);
        capped.nutrients.carbohydrate_pct = Some(20.0);
        let recs = recommend(
            &[protein_gap(10.0, 0.5)],
            &[extreme, capped],
            &ctx(400.0),
            &NutritionConfig::default(),
        );
        // Both exceed the 60 % cap on a dry-matter basis and score the same.
        assert_eq!(recs.len(), 2);
        assert!((recs[0].score - recs[1].score).abs() < 1e-12);
        assert_eq!(recs[0].food_name, "Extreme");
    }

    #[test]
    fn unsuitable_and_invalid_foods_are_filtered() {
        let mut cat_only = food("Cat only", 30.0, 380.0, None);
        cat_only.species = vec![Species::Cat];
        let mut invalid = food("Too wet", 30.0, 100.0, None);
        invalid.nutrients.moisture_pct = 75.0;
        let ok = food("Dog food", 25.0, 360.0, None);
        let recs = recommend(
            &[protein_gap(10.0, 0.5)],
            &[cat_only, invalid, ok],
            &ctx(400.0),
            &NutritionConfig::default(),
        );
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].food_name, "Dog food");
    }

    #[test]
    fn top_k_limits_results() {
        let catalog: Vec<CatalogFood> = (0..6)
            .map(|i| food(&format!("F{i}"), 20.0 + i as f64, 350.0, None))
            .collect();
        let recs = recommend(
            &[protein_gap(10.0, 0.5)],
            &catalog,
            &ctx(400.0),
            &NutritionConfig::default(),
        );
        assert_eq!(recs.len(), DEFAULT_TOP_K);
        assert_eq!(recs[0].food_name, "F5");
    }
}
