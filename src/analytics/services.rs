use std::collections::{BTreeSet, HashMap};

use time::{Date, OffsetDateTime};
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::dto::RecommendationsResponse;
use crate::{
    config::AnalysisConfig,
    error::AppError,
    feedings::{self, repo_types::FeedingRow},
    foods,
    nutrition::{
        gap_analyzer, meal_balance, recommender, requirements, AnalysisWindow, CatalogFood,
        FeedingRecord, FoodNutrients, GapSeverity, MealBalance, NutritionAnalysis,
        NutritionConfig, NutritionalGap, Nutrient, PetProfile, RecommendationContext,
    },
    pets::{self, repo_types::PetRow},
    state::AppState,
};

fn today() -> Date {
    OffsetDateTime::now_utc().date()
}

struct PetContext {
    pet: PetRow,
    profile: PetProfile,
}

async fn pet_context(state: &AppState, household_id: Uuid, pet_id: Uuid) -> Result<PetContext, AppError> {
    let pet = pets::services::load_pet(state, household_id, pet_id).await?;
    let profile = pet.profile()?;
    Ok(PetContext { pet, profile })
}

/// Nutrients of every food the feedings reference, keyed by id.
async fn referenced_foods(
    state: &AppState,
    household_id: Uuid,
    feedings: &[FeedingRow],
) -> Result<HashMap<Uuid, FoodNutrients>, AppError> {
    let ids: Vec<Uuid> = feedings
        .iter()
        .map(|f| f.food_id)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    let rows = foods::repo::find_many(&state.db, household_id, &ids).await?;
    let mut map = HashMap::with_capacity(rows.len());
    for row in rows {
        match row.nutrients() {
            Ok(n) => {
                map.insert(row.id, n);
            }
            Err(e) => warn!(food_id = %row.id, error = %e, "stored food unreadable; its feedings are excluded"),
        }
    }
    Ok(map)
}

async fn load_catalog(state: &AppState, household_id: Uuid) -> Result<Vec<CatalogFood>, AppError> {
    let rows = foods::repo::list_by_household(&state.db, household_id).await?;
    Ok(rows
        .iter()
        .filter_map(|row| match row.catalog_food() {
            Ok(food) => Some(food),
            Err(e) => {
                warn!(food_id = %row.id, error = %e, "stored food unreadable; left out of catalog");
                None
            }
        })
        .collect())
}

fn analysis_window(
    config: &AnalysisConfig,
    window_days: Option<u32>,
    end: Option<Date>,
) -> Result<AnalysisWindow, AppError> {
    let days = config.window_days(window_days);
    AnalysisWindow::ending_on(end.unwrap_or_else(today), days)
        .ok_or_else(|| AppError::validation("end is out of range"))
}

async fn run_analysis(
    state: &AppState,
    household_id: Uuid,
    ctx: &PetContext,
    window_days: Option<u32>,
    end: Option<Date>,
) -> Result<NutritionAnalysis, AppError> {
    let config = state.nutrition();
    let requirement = requirements::resolve(&ctx.profile, config)?;

    let window = analysis_window(state.analysis(), window_days, end)?;

    let rows = feedings::repo::for_pet_between(&state.db, ctx.pet.id, window.start, window.end).await?;
    let foods = referenced_foods(state, household_id, &rows).await?;
    let records: Vec<FeedingRecord> = rows.iter().map(FeedingRecord::from).collect();

    let analysis = gap_analyzer::analyze(&records, &foods, &requirement, window, config);
    debug!(
        pet_id = %ctx.pet.id,
        window_days = analysis.window.days(),
        days_with_data = analysis.days_with_data,
        counted = analysis.feedings_counted,
        excluded = analysis.feedings_excluded,
        gaps = analysis.gaps.len(),
        "nutrition analysed"
    );
    Ok(analysis)
}

/// `GET /pets/:id/nutrition`.
pub async fn analyze_nutrition(
    state: &AppState,
    household_id: Uuid,
    pet_id: Uuid,
    window_days: Option<u32>,
    end: Option<Date>,
) -> Result<(PetRow, NutritionAnalysis), AppError> {
    let ctx = pet_context(state, household_id, pet_id).await?;
    let analysis = run_analysis(state, household_id, &ctx, window_days, end).await?;
    Ok((ctx.pet, analysis))
}

pub struct RecommendationInput {
    pub window_days: Option<u32>,
    pub end: Option<Date>,
    pub top_k: Option<usize>,
    /// Replaces the computed gaps when present.
    pub gaps: Option<Vec<NutritionalGap>>,
}

/// `GET|POST /pets/:id/recommendations`.
pub async fn recommend_foods(
    state: &AppState,
    household_id: Uuid,
    pet_id: Uuid,
    input: RecommendationInput,
) -> Result<RecommendationsResponse, AppError> {
    if let Some(gaps) = &input.gaps {
        validate_gaps(gaps).map_err(AppError::Validation)?;
    }
    let ctx = pet_context(state, household_id, pet_id).await?;
    let analysis = run_analysis(state, household_id, &ctx, input.window_days, input.end).await?;
    let catalog = load_catalog(state, household_id).await?;
    let top_k = input.top_k.unwrap_or(state.analysis().default_top_k);

    let response = plan_recommendations(
        ctx.pet.id,
        &ctx.profile,
        &analysis,
        input.gaps,
        &catalog,
        top_k,
        state.nutrition(),
    );
    info!(
        %pet_id,
        candidates = catalog.len(),
        returned = response.recommendations.len(),
        "recommendations computed"
    );
    Ok(response)
}

/// Caller-supplied gaps must be well-formed before they drive scoring.
pub fn validate_gaps(gaps: &[NutritionalGap]) -> Result<(), Vec<String>> {
    let problems: Vec<String> = gaps
        .iter()
        .filter(|g| {
            !g.delta.is_finite()
                || g.delta < 0.0
                || !g.relative_delta.is_finite()
                || g.relative_delta < 0.0
        })
        .map(|g| format!("{} gap needs finite, non-negative delta and relative_delta", g.nutrient))
        .collect();
    if problems.is_empty() {
        Ok(())
    } else {
        Err(problems)
    }
}

/// Pure assembly step behind [`recommend_foods`].
pub fn plan_recommendations(
    pet_id: Uuid,
    profile: &PetProfile,
    analysis: &NutritionAnalysis,
    supplied_gaps: Option<Vec<NutritionalGap>>,
    catalog: &[CatalogFood],
    top_k: usize,
    config: &NutritionConfig,
) -> RecommendationsResponse {
    let current_daily_calories = supplied_gaps
        .as_ref()
        .and_then(|gaps| gaps.iter().find(|g| g.nutrient == Nutrient::Calories))
        .map(|g| g.actual)
        .unwrap_or(analysis.daily_averages.calories_kcal);

    let gaps = match supplied_gaps {
        Some(gaps) => gap_analyzer::rank_gaps(&gaps),
        None => analysis.gaps.clone(),
    };

    let ctx = RecommendationContext {
        species: profile.species,
        life_stage: profile.life_stage,
        calorie_target: analysis.requirement.daily_calorie_target,
        current_daily_calories,
        top_k,
    };
    let recommendations = recommender::recommend(&gaps, catalog, &ctx, config);

    if recommendations.is_empty() && gaps.iter().any(|g| g.severity == GapSeverity::Deficiency) {
        debug!(%pet_id, "no suitable food addresses the open deficiencies");
    }

    RecommendationsResponse {
        pet_id,
        data_sufficient: analysis.data_sufficient,
        approximate: analysis.approximate,
        calorie_target: analysis.requirement.daily_calorie_target,
        current_daily_calories,
        gaps,
        recommendations,
    }
}

/// `GET /pets/:id/meal-balance`.
pub async fn calculate_meal_balances(
    state: &AppState,
    household_id: Uuid,
    pet_id: Uuid,
    date: Option<Date>,
) -> Result<(Date, Vec<MealBalance>), AppError> {
    let pet = pets::services::load_pet(state, household_id, pet_id).await?;
    let date = date.unwrap_or_else(today);

    let schedule = pets::repo::schedule(&state.db, pet.id).await?;
    let rows = feedings::repo::for_pet_between(&state.db, pet.id, date, date).await?;
    let records: Vec<FeedingRecord> = rows.iter().map(FeedingRecord::from).collect();

    let balances = meal_balance::calculate(&schedule, &records, date, state.nutrition().meal_tolerance);
    Ok((date, balances))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nutrition::{
        requirements::TargetRange, types::FoodType, ActivityLevel, GoalOverrides, LifeStage,
        Species,
    };
    use time::macros::date;

    fn rex() -> PetProfile {
        PetProfile {
            species: Species::Dog,
            life_stage: LifeStage::Adult,
            weight_kg: 10.0,
            activity_level: ActivityLevel::Moderate,
            goals: GoalOverrides::default(),
        }
    }

    fn kibble(id: Uuid, protein: f64) -> CatalogFood {
        CatalogFood {
            id,
            name: format!("kibble {protein}"),
            nutrients: FoodNutrients {
                food_type: FoodType::Dry,
                moisture_pct: 10.0,
                protein_pct: protein,
                fat_pct: 12.0,
                fiber_pct: 3.0,
                carbohydrate_pct: None,
                ash_pct: None,
                serving_size_grams: None,
                calories_per_100g: Some(350.0),
            },
            price_per_kg: None,
            species: vec![Species::Dog],
            life_stages: Vec::new(),
        }
    }

    fn analysis_for(profile: &PetProfile, feedings: &[FeedingRecord], foods: &[CatalogFood]) -> NutritionAnalysis {
        let config = NutritionConfig::default();
        let requirement = requirements::resolve(profile, &config).unwrap();
        let map: HashMap<Uuid, FoodNutrients> =
            foods.iter().map(|f| (f.id, f.nutrients.clone())).collect();
        let window = AnalysisWindow::ending_on(date!(2024 - 06 - 07), 7).unwrap();
        gap_analyzer::analyze(feedings, &map, &requirement, window, &config)
    }

    #[test]
    fn low_protein_diet_gets_a_protein_rich_suggestion() {
        let lean = kibble(Uuid::new_v4(), 12.0);
        let rich = kibble(Uuid::new_v4(), 34.0);
        let feedings: Vec<FeedingRecord> = (1..=7)
            .map(|day| FeedingRecord {
                food_id: lean.id,
                feeding_date: date!(2024 - 06 - 01).replace_day(day).unwrap(),
                meal_number: 1,
                amount_served_grams: 100.0,
                amount_eaten_grams: None,
            })
            .collect();
        let profile = rex();
        let analysis = analysis_for(&profile, &feedings, &[lean.clone()]);
        assert!(analysis.data_sufficient);
        assert!(analysis
            .gaps
            .iter()
            .any(|g| g.nutrient == Nutrient::Protein && g.severity == GapSeverity::Deficiency));

        let plan = plan_recommendations(
            Uuid::new_v4(),
            &profile,
            &analysis,
            None,
            &[lean, rich.clone()],
            3,
            &NutritionConfig::default(),
        );
        assert_eq!(plan.recommendations[0].food_id, rich.id);
        assert!((plan.current_daily_calories - 350.0).abs() < 1e-9);
        for rec in &plan.recommendations {
            assert!(rec.projected_daily_calories <= plan.calorie_target + 1e-9);
        }
    }

    #[test]
    fn no_feedings_means_no_gaps_and_no_suggestions() {
        let profile = rex();
        let analysis = analysis_for(&profile, &[], &[]);
        let plan = plan_recommendations(
            Uuid::new_v4(),
            &profile,
            &analysis,
            None,
            &[kibble(Uuid::new_v4(), 30.0)],
            3,
            &NutritionConfig::default(),
        );
        assert!(!plan.data_sufficient);
        assert!(plan.gaps.is_empty());
        assert!(plan.recommendations.is_empty());
    }

    #[test]
    fn supplied_gaps_override_the_analysis() {
        let profile = rex();
        let analysis = analysis_for(&profile, &[], &[]);
        let gaps = vec![
            NutritionalGap::measure(Nutrient::Fat, 30.0, TargetRange::new(10.0, 50.0)),
            NutritionalGap::measure(Nutrient::Protein, 20.0, TargetRange::new(40.0, 60.0)),
            NutritionalGap::measure(Nutrient::Calories, 300.0, TargetRange::new(600.0, 700.0)),
        ];
        let food = kibble(Uuid::new_v4(), 30.0);
        let plan = plan_recommendations(
            Uuid::new_v4(),
            &profile,
            &analysis,
            Some(gaps),
            &[food.clone()],
            3,
            &NutritionConfig::default(),
        );
        assert_eq!(plan.current_daily_calories, 300.0);
        // Only open gaps survive ranking, largest relative delta first.
        let order: Vec<Nutrient> = plan.gaps.iter().map(|g| g.nutrient).collect();
        assert_eq!(order, [Nutrient::Calories, Nutrient::Protein]);
        assert_eq!(plan.recommendations[0].food_id, food.id);
    }

    #[test]
    fn malformed_supplied_gaps_are_rejected() {
        let mut gap = NutritionalGap::measure(Nutrient::Protein, 20.0, TargetRange::new(40.0, 60.0));
        assert!(validate_gaps(std::slice::from_ref(&gap)).is_ok());
        gap.relative_delta = f64::NAN;
        assert!(validate_gaps(&[gap]).is_err());
    }

    #[test]
    fn window_end_before_representable_range_is_a_validation_error() {
        let config = AnalysisConfig::default();
        let end = Date::from_calendar_date(-9999, time::Month::January, 5).unwrap();
        let err = analysis_window(&config, Some(90), Some(end)).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        let window = analysis_window(&config, Some(500), Some(date!(2024 - 06 - 30))).unwrap();
        assert_eq!(window.days(), i64::from(config.max_window_days));
        assert_eq!(window.end, date!(2024 - 06 - 30));
    }
}
