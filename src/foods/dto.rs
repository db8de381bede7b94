use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use super::repo_types::FoodRow;
use crate::nutrition::{
    calculator::{self, ServingNutrition},
    normalizer::DryMatterProfile,
    FoodNutrients, LifeStage, NutritionConfig, Species,
};

/// Create/update body. Nutrient fields sit at the top level.
#[derive(Debug, Deserialize)]
pub struct FoodRequest {
    pub name: String,
    pub brand: Option<String>,
    #[serde(flatten)]
    pub nutrients: FoodNutrients,
    pub package_size_grams: Option<f64>,
    pub price: Option<f64>,
    #[serde(default)]
    pub species: Vec<Species>,
    #[serde(default)]
    pub life_stages: Vec<LifeStage>,
}

#[derive(Debug, Serialize)]
pub struct FoodResponse {
    pub id: Uuid,
    pub name: String,
    pub brand: Option<String>,
    #[serde(flatten)]
    pub nutrients: FoodNutrients,
    pub package_size_grams: Option<f64>,
    pub price: Option<f64>,
    pub price_per_kg: Option<f64>,
    pub species: Vec<Species>,
    pub life_stages: Vec<LifeStage>,
    /// Absent when the stored analysis cannot be put on a dry-matter basis.
    pub dry_matter: Option<DryMatterProfile>,
    pub per_serving: Option<ServingNutrition>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl FoodResponse {
    pub fn from_row(row: FoodRow, config: &NutritionConfig) -> anyhow::Result<Self> {
        let nutrients = row.nutrients()?;
        let dry_matter = DryMatterProfile::from_food(&nutrients, config).ok();
        let per_serving = calculator::for_default_serving(&nutrients, config).and_then(Result::ok);
        Ok(Self {
            id: row.id,
            price_per_kg: row.price_per_kg(),
            species: row.species(),
            life_stages: row.life_stages()?,
            name: row.name,
            brand: row.brand,
            nutrients,
            package_size_grams: row.package_size_grams,
            price: row.price,
            dry_matter,
            per_serving,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nutrition::types::FoodType;

    #[test]
    fn request_reads_flat_nutrients() {
        let req: FoodRequest = serde_json::from_str(
            r#"{
                "name": "Salmon Kibble",
                "food_type": "dry",
                "moisture_pct": 10,
                "protein_pct": 28,
                "fat_pct": 15,
                "fiber_pct": 3,
                "carbohydrate_pct": null,
                "ash_pct": null,
                "serving_size_grams": 80,
                "calories_per_100g": null,
                "price": 40,
                "package_size_grams": 10000,
                "species": ["dog"]
            }"#,
        )
        .unwrap();
        assert_eq!(req.nutrients.food_type, FoodType::Dry);
        assert_eq!(req.nutrients.protein_pct, 28.0);
        assert_eq!(req.species, [Species::Dog]);
        assert!(req.life_stages.is_empty());
    }
}
