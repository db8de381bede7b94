use anyhow::anyhow;
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::nutrition::{CatalogFood, FoodNutrients, LifeStage, Species};

#[derive(Debug, Clone, FromRow)]
pub struct FoodRow {
    pub id: Uuid,
    pub household_id: Uuid,
    pub name: String,
    pub brand: Option<String>,
    pub food_type: String,
    pub moisture_pct: f64,
    pub protein_pct: f64,
    pub fat_pct: f64,
    pub fiber_pct: f64,
    pub carbohydrate_pct: Option<f64>,
    pub ash_pct: Option<f64>,
    pub serving_size_grams: Option<f64>,
    pub calories_per_100g: Option<f64>,
    pub package_size_grams: Option<f64>,
    pub price: Option<f64>,
    pub species_tags: Vec<String>,
    pub life_stage_tags: Vec<String>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl FoodRow {
    pub fn nutrients(&self) -> anyhow::Result<FoodNutrients> {
        Ok(FoodNutrients {
            food_type: self
                .food_type
                .parse()
                .map_err(|e: String| anyhow!("food {}: {e}", self.id))?,
            moisture_pct: self.moisture_pct,
            protein_pct: self.protein_pct,
            fat_pct: self.fat_pct,
            fiber_pct: self.fiber_pct,
            carbohydrate_pct: self.carbohydrate_pct,
            ash_pct: self.ash_pct,
            serving_size_grams: self.serving_size_grams,
            calories_per_100g: self.calories_per_100g,
        })
    }

    pub fn price_per_kg(&self) -> Option<f64> {
        price_per_kg(self.price, self.package_size_grams)
    }

    pub fn species(&self) -> Vec<Species> {
        self.species_tags
            .iter()
            .map(|t| t.parse().unwrap_or(Species::Other))
            .collect()
    }

    /// Errors on any tag that is not a known life stage.
    pub fn life_stages(&self) -> anyhow::Result<Vec<LifeStage>> {
        self.life_stage_tags
            .iter()
            .map(|t| t.parse().map_err(|e: String| anyhow!("food {}: {e}", self.id)))
            .collect()
    }

    pub fn catalog_food(&self) -> anyhow::Result<CatalogFood> {
        Ok(CatalogFood {
            id: self.id,
            name: self.name.clone(),
            nutrients: self.nutrients()?,
            price_per_kg: self.price_per_kg(),
            species: self.species(),
            life_stages: self.life_stages()?,
        })
    }
}

pub fn price_per_kg(price: Option<f64>, package_size_grams: Option<f64>) -> Option<f64> {
    match (price, package_size_grams) {
        (Some(price), Some(grams)) if grams > 0.0 => Some(price / grams * 1000.0),
        _ => None,
    }
}
