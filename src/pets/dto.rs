use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use super::repo_types::PetRow;
use crate::nutrition::{ActivityLevel, GoalOverrides, LifeStage, MealSlot, Species};

#[derive(Debug, Deserialize)]
pub struct PetRequest {
    pub name: String,
    pub species: Species,
    pub life_stage: LifeStage,
    pub weight_kg: f64,
    #[serde(default = "default_activity")]
    pub activity_level: ActivityLevel,
    #[serde(default)]
    pub goals: GoalOverrides,
}

fn default_activity() -> ActivityLevel {
    ActivityLevel::Moderate
}

#[derive(Debug, Serialize)]
pub struct PetResponse {
    pub id: Uuid,
    pub name: String,
    pub species: Species,
    pub life_stage: String,
    pub weight_kg: f64,
    pub activity_level: String,
    pub goals: GoalOverrides,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<PetRow> for PetResponse {
    fn from(r: PetRow) -> Self {
        Self {
            id: r.id,
            species: r.species(),
            goals: r.goals(),
            name: r.name,
            life_stage: r.life_stage,
            weight_kg: r.weight_kg,
            activity_level: r.activity_level,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ScheduleRequest {
    pub slots: Vec<MealSlot>,
}

#[derive(Debug, Serialize)]
pub struct ScheduleResponse {
    pub pet_id: Uuid,
    pub slots: Vec<MealSlot>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_accepts_aliases_and_defaults() {
        let req: PetRequest = serde_json::from_str(
            r#"{"name":"Mia","species":"cat","life_stage":"kitten","weight_kg":2.5}"#,
        )
        .unwrap();
        assert_eq!(req.life_stage, LifeStage::Young);
        assert_eq!(req.activity_level, ActivityLevel::Moderate);
        assert_eq!(req.goals, GoalOverrides::default());
    }

    #[test]
    fn capitalised_species_is_not_downgraded() {
        for species in ["Dog", "canine"] {
            let req: PetRequest = serde_json::from_str(&format!(
                r#"{{"name":"Rex","species":"{species}","life_stage":"adult","weight_kg":20}}"#
            ))
            .unwrap();
            assert_eq!(req.species, Species::Dog);
        }
    }
}
