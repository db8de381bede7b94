use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum NutritionError {
    /// No dry matter left to compare against.
    #[error("food with {moisture_pct}% moisture has no dry matter")]
    Uncomparable { moisture_pct: f64 },

    #[error("invalid nutrient data: {0}")]
    InvalidNutrientData(String),

    #[error("invalid pet data: {0}")]
    InvalidPetData(String),
}
