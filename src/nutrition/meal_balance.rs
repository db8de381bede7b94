//! Same-day schedule adherence per meal slot.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use time::Date;

use super::types::{FeedingRecord, MealSlot};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MealStatus {
    NotYetFed,
    OnTarget,
    UnderFed,
    OverFed,
    /// Fed under a meal number that has no slot in the schedule.
    Unscheduled,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealBalance {
    pub meal_number: i32,
    pub label: Option<String>,
    pub expected_grams: f64,
    pub served_grams: f64,
    /// served / expected; absent when nothing was expected.
    pub progress: Option<f64>,
    pub status: MealStatus,
}

/// Compares what was served on `date` against each scheduled slot.
///
/// `tolerance` is the on-target band as a fraction of the expected amount.
pub fn calculate(
    schedule: &[MealSlot],
    feedings: &[FeedingRecord],
    date: Date,
    tolerance: f64,
) -> Vec<MealBalance> {
    let mut served: BTreeMap<i32, f64> = BTreeMap::new();
    for feeding in feedings.iter().filter(|f| f.feeding_date == date) {
        *served.entry(feeding.meal_number).or_default() += feeding.amount_served_grams;
    }

    let mut balances: Vec<MealBalance> = schedule
        .iter()
        .map(|slot| {
            let fed = served.remove(&slot.meal_number);
            slot_balance(slot, fed, tolerance)
        })
        .collect();

    balances.extend(served.into_iter().map(|(meal_number, grams)| MealBalance {
        meal_number,
        label: None,
        expected_grams: 0.0,
        served_grams: grams,
        progress: None,
        status: MealStatus::Unscheduled,
    }));

    balances.sort_by_key(|b| b.meal_number);
    balances
}

/// Slack for float rounding at the band edges, as a fraction of the expected amount.
const BAND_EPSILON: f64 = 1e-9;

fn slot_balance(slot: &MealSlot, fed: Option<f64>, tolerance: f64) -> MealBalance {
    let served_grams = fed.unwrap_or(0.0);
    let expected = slot.expected_grams;
    let progress = (expected > 0.0).then(|| served_grams / expected);
    let slack = expected * BAND_EPSILON;

    let status = match (fed, progress) {
        (None, _) => MealStatus::NotYetFed,
        (Some(grams), Some(_)) if grams < expected * (1.0 - tolerance) - slack => {
            MealStatus::UnderFed
        }
        (Some(grams), Some(_)) if grams > expected * (1.0 + tolerance) + slack => {
            MealStatus::OverFed
        }
        (Some(_), Some(_)) => MealStatus::OnTarget,
        (Some(grams), None) if grams > 0.0 => MealStatus::OverFed,
        (Some(_), None) => MealStatus::OnTarget,
    };

    MealBalance {
        meal_number: slot.meal_number,
        label: slot.label.clone(),
        expected_grams: slot.expected_grams,
        served_grams,
        progress,
        status,
    }
}
