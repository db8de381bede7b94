//! Averages a pet's recent intake and compares it with the requirement profile.

use std::collections::{BTreeMap, HashMap};
use std::ops::AddAssign;

use serde::{Deserialize, Serialize};
use time::{Date, Duration};
use tracing::debug;
use uuid::Uuid;

use super::calculator::{self, ServingNutrition};
use super::config::NutritionConfig;
use super::normalizer::DryMatterProfile;
use super::requirements::{RequirementProfile, TargetRange};
use super::types::{FeedingRecord, FoodNutrients, Nutrient};

/// Inclusive range of calendar days under analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisWindow {
    pub start: Date,
    pub end: Date,
}

impl AnalysisWindow {
    /// The `days` calendar days ending on `end`. Zero is treated as one day.
    /// `None` when the start would fall before the earliest representable date.
    pub fn ending_on(end: Date, days: u32) -> Option<Self> {
        let span = i64::from(days.max(1)) - 1;
        let start = end.checked_sub(Duration::days(span))?;
        Some(Self { start, end })
    }

    pub fn contains(&self, date: Date) -> bool {
        self.start <= date && date <= self.end
    }

    pub fn days(&self) -> i64 {
        (self.end - self.start).whole_days() + 1
    }
}

/// Intake totals (or averages) over some period.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Intake {
    pub calories_kcal: f64,
    pub protein_g: f64,
    pub fat_g: f64,
    pub carbohydrate_g: f64,
    pub fiber_g: f64,
    pub food_grams: f64,
}

impl Intake {
    pub fn value(&self, nutrient: Nutrient) -> f64 {
        match nutrient {
            Nutrient::Calories => self.calories_kcal,
            Nutrient::Protein => self.protein_g,
            Nutrient::Fat => self.fat_g,
            Nutrient::Carbohydrate => self.carbohydrate_g,
            Nutrient::Fiber => self.fiber_g,
        }
    }

    fn scale(&self, factor: f64) -> Self {
        Self {
            calories_kcal: self.calories_kcal * factor,
            protein_g: self.protein_g * factor,
            fat_g: self.fat_g * factor,
            carbohydrate_g: self.carbohydrate_g * factor,
            fiber_g: self.fiber_g * factor,
            food_grams: self.food_grams * factor,
        }
    }
}

impl AddAssign<&ServingNutrition> for Intake {
    fn add_assign(&mut self, serving: &ServingNutrition) {
        self.calories_kcal += serving.calories_kcal;
        self.protein_g += serving.protein_g;
        self.fat_g += serving.fat_g;
        self.carbohydrate_g += serving.carbohydrate_g;
        self.fiber_g += serving.fiber_g;
        self.food_grams += serving.grams;
    }
}

impl AddAssign<&Intake> for Intake {
    fn add_assign(&mut self, other: &Intake) {
        self.calories_kcal += other.calories_kcal;
        self.protein_g += other.protein_g;
        self.fat_g += other.fat_g;
        self.carbohydrate_g += other.carbohydrate_g;
        self.fiber_g += other.fiber_g;
        self.food_grams += other.food_grams;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayIntake {
    pub date: Date,
    pub feedings: usize,
    pub intake: Intake,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GapSeverity {
    Deficiency,
    Excess,
    Ok,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NutritionalGap {
    pub nutrient: Nutrient,
    pub actual: f64,
    pub target: TargetRange,
    pub severity: GapSeverity,
    /// Distance to the nearest bound; zero when within range.
    pub delta: f64,
    /// `delta` relative to the range width, used for ranking and weighting.
    pub relative_delta: f64,
}

impl NutritionalGap {
    pub fn measure(nutrient: Nutrient, actual: f64, target: TargetRange) -> Self {
        let (severity, delta) = if actual < target.low {
            (GapSeverity::Deficiency, target.low - actual)
        } else if actual > target.high {
            (GapSeverity::Excess, actual - target.high)
        } else {
            (GapSeverity::Ok, 0.0)
        };
        Self {
            nutrient,
            actual,
            target,
            severity,
            delta,
            relative_delta: delta / reference_width(target),
        }
    }

    pub fn is_open(&self) -> bool {
        self.severity != GapSeverity::Ok
    }
}

fn reference_width(target: TargetRange) -> f64 {
    let width = target.width();
    if width > 0.0 {
        width
    } else if target.low > 0.0 {
        target.low
    } else {
        1.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NutritionAnalysis {
    pub window: AnalysisWindow,
    pub days_with_data: usize,
    pub feedings_counted: usize,
    pub feedings_excluded: usize,
    /// Average per day that had at least one counted feeding.
    pub daily_averages: Intake,
    pub daily_totals: Vec<DayIntake>,
    /// Open gaps, most significant first.
    pub gaps: Vec<NutritionalGap>,
    /// Every targeted nutrient, including those within range.
    pub report: Vec<NutritionalGap>,
    pub requirement: RequirementProfile,
    pub data_sufficient: bool,
    pub approximate: bool,
    pub calories_estimated: bool,
}

/// Replays the window's feedings, averages per fed day and ranks the gaps.
///
/// Feedings outside `window`, feedings whose food is missing from `foods`, and
/// feedings of foods that fail dry-matter normalization do not count toward
/// intake. The latter two are reported in `feedings_excluded`.
pub fn analyze(
    feedings: &[FeedingRecord],
    foods: &HashMap<Uuid, FoodNutrients>,
    requirement: &RequirementProfile,
    window: AnalysisWindow,
    config: &NutritionConfig,
) -> NutritionAnalysis {
    let mut by_day: BTreeMap<Date, DayIntake> = BTreeMap::new();
    let mut counted = 0;
    let mut excluded = 0;
    let mut calories_estimated = false;

    for feeding in feedings.iter().filter(|f| window.contains(f.feeding_date)) {
        let Some(food) = foods.get(&feeding.food_id) else {
            debug!(food_id = %feeding.food_id, "feeding references unknown food; skipped");
            excluded += 1;
            continue;
        };
        if let Err(e) = DryMatterProfile::from_food(food, config) {
            debug!(food_id = %feeding.food_id, error = %e, "food not comparable; feeding skipped");
            excluded += 1;
            continue;
        }
        let serving = match calculator::for_serving(food, feeding.intake_grams(), config) {
            Ok(s) => s,
            Err(e) => {
                debug!(food_id = %feeding.food_id, error = %e, "feeding skipped");
                excluded += 1;
                continue;
            }
        };

        calories_estimated |= serving.calories_estimated;
        counted += 1;
        let day = by_day.entry(feeding.feeding_date).or_insert_with(|| DayIntake {
            date: feeding.feeding_date,
            feedings: 0,
            intake: Intake::default(),
        });
        day.feedings += 1;
        day.intake += &serving;
    }

    let daily_totals: Vec<DayIntake> = by_day.into_values().collect();
    let days_with_data = daily_totals.len();

    if days_with_data == 0 {
        return NutritionAnalysis {
            window,
            days_with_data,
            feedings_counted: counted,
            feedings_excluded: excluded,
            daily_averages: Intake::default(),
            daily_totals,
            gaps: Vec::new(),
            report: Vec::new(),
            requirement: requirement.clone(),
            data_sufficient: false,
            approximate: requirement.approximate,
            calories_estimated: false,
        };
    }

    let mut total = Intake::default();
    for day in &daily_totals {
        total += &day.intake;
    }
    let daily_averages = total.scale(1.0 / days_with_data as f64);

    let report: Vec<NutritionalGap> = Nutrient::TARGETED
        .iter()
        .filter_map(|&nutrient| {
            requirement
                .range(nutrient)
                .map(|range| NutritionalGap::measure(nutrient, daily_averages.value(nutrient), range))
        })
        .collect();
    let gaps = rank_gaps(&report);

    NutritionAnalysis {
        window,
        days_with_data,
        feedings_counted: counted,
        feedings_excluded: excluded,
        daily_averages,
        daily_totals,
        gaps,
        report,
        requirement: requirement.clone(),
        data_sufficient: true,
        approximate: requirement.approximate || calories_estimated,
        calories_estimated,
    }
}

/// Open gaps by relative delta, largest first. Ties keep their input order.
pub fn rank_gaps(gaps: &[NutritionalGap]) -> Vec<NutritionalGap> {
    let mut open: Vec<NutritionalGap> = gaps.iter().filter(|g| g.is_open()).cloned().collect();
    open.sort_by(|a, b| b.relative_delta.total_cmp(&a.relative_delta));
    open
}
