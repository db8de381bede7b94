use anyhow::anyhow;
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::nutrition::{GoalOverrides, MealSlot, PetProfile, Species};

#[derive(Debug, Clone, FromRow)]
pub struct PetRow {
    pub id: Uuid,
    pub household_id: Uuid,
    pub name: String,
    pub species: String,
    pub life_stage: String,
    pub weight_kg: f64,
    pub activity_level: String,
    pub goal_calories_kcal: Option<f64>,
    pub goal_protein_g: Option<f64>,
    pub goal_fat_g: Option<f64>,
    pub goal_fiber_g: Option<f64>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl PetRow {
    pub fn goals(&self) -> GoalOverrides {
        GoalOverrides {
            calories_kcal: self.goal_calories_kcal,
            protein_g: self.goal_protein_g,
            fat_g: self.goal_fat_g,
            fiber_g: self.goal_fiber_g,
        }
    }

    pub fn species(&self) -> Species {
        // Infallible: unknown species become `Other`.
        self.species.parse().unwrap_or(Species::Other)
    }

    /// Domain view consumed by the nutrition engine.
    pub fn profile(&self) -> anyhow::Result<PetProfile> {
        Ok(PetProfile {
            species: self.species(),
            life_stage: self
                .life_stage
                .parse()
                .map_err(|e: String| anyhow!("pet {}: {e}", self.id))?,
            weight_kg: self.weight_kg,
            activity_level: self
                .activity_level
                .parse()
                .map_err(|e: String| anyhow!("pet {}: {e}", self.id))?,
            goals: self.goals(),
        })
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct ScheduleSlotRow {
    pub meal_number: i32,
    pub label: Option<String>,
    pub expected_grams: f64,
}

impl From<ScheduleSlotRow> for MealSlot {
    fn from(r: ScheduleSlotRow) -> Self {
        Self {
            meal_number: r.meal_number,
            label: r.label,
            expected_grams: r.expected_grams,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nutrition::{ActivityLevel, LifeStage};

    fn row(species: &str, life_stage: &str) -> PetRow {
        PetRow {
            id: Uuid::new_v4(),
            household_id: Uuid::new_v4(),
            name: "Rex".into(),
            species: species.into(),
            life_stage: life_stage.into(),
            weight_kg: 10.0,
            activity_level: "sedentary".into(),
            goal_calories_kcal: None,
            goal_protein_g: Some(50.0),
            goal_fat_g: None,
            goal_fiber_g: None,
            created_at: OffsetDateTime::UNIX_EPOCH,
            updated_at: OffsetDateTime::UNIX_EPOCH,
        }
    }

    #[test]
    fn stored_text_maps_to_enums() {
        let profile = row("dog", "puppy").profile().unwrap();
        assert_eq!(profile.species, Species::Dog);
        assert_eq!(profile.life_stage, LifeStage::Young);
        assert_eq!(profile.activity_level, ActivityLevel::Low);
        assert_eq!(profile.goals.protein_g, Some(50.0));
    }

    #[test]
    fn unknown_species_is_other_but_unknown_stage_is_an_error() {
        assert_eq!(row("axolotl", "adult").profile().unwrap().species, Species::Other);
        assert!(row("dog", "teenager").profile().is_err());
    }
}
