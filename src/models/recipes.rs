// src/models/recipes.rs

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

// ---
// 1. Enums do catálogo
// ---
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum RecipeType {
    #[serde(rename = "Producción", alias = "Produccion")]
    Produccion,
    Servicio,
}

// Unidades de medida aceitas nos ingredientes
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema)]
pub enum MeasureUnit {
    #[serde(rename = "g")]
    Grams,
    #[serde(rename = "kg")]
    Kilograms,
    #[serde(rename = "L")]
    Liters,
    #[serde(rename = "pzas")]
    Pieces,
    #[serde(rename = "ord")]
    Portions,
}

// ---
// 2. Receita
// ---
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Ingredient {
    #[schema(example = "ing-1")]
    pub ingredient_id: String,
    #[schema(example = "Tomate")]
    pub ingredient_name: String,
    #[schema(value_type = f64, example = 1.0)]
    pub quantity: Decimal,
    pub unit: MeasureUnit,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RecipeStep {
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    #[schema(example = "salsa-roja")]
    pub id: String,
    #[schema(example = "Salsa Roja Clásica")]
    pub name: String,
    #[schema(example = "Salsas")]
    pub category: String,
    #[serde(rename = "type")]
    pub recipe_type: RecipeType,
    pub ingredients: Vec<Ingredient>,
    pub steps: Vec<RecipeStep>,
    pub prep_time_minutes: u32,
    #[schema(value_type = f64, example = 1.0)]
    pub expected_yield: Decimal,
    #[schema(example = "L")]
    pub yield_unit: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    pub shelf_life_days: u32,
}

// ---
// 3. Ingredientes mestres e categorias
// ---
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MasterIngredient {
    #[schema(example = "ing-1")]
    pub id: String,
    #[schema(example = "Tomate")]
    pub name: String,
    #[schema(example = "Vegetales")]
    pub category: String,
    #[schema(example = "kg")]
    pub unit: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct CategorySummary {
    pub name: String,
    pub count: usize,
}

// ---
// 4. Validações customizadas
// ---

/// Teto para quantidades vindas do cliente (rendimentos, pesos, mermas).
pub const MAX_QUANTITY: Decimal = Decimal::from_parts(1_000_000, 0, 0, false, 0);

/// Teto de vida útil, em dias.
pub const MAX_SHELF_LIFE_DAYS: u32 = 3650;

pub(crate) fn validate_positive(val: &Decimal) -> Result<(), ValidationError> {
    if *val <= Decimal::ZERO {
        let mut err = ValidationError::new("range");
        err.message = Some("El valor debe ser mayor que cero.".into());
        return Err(err);
    }
    validate_max_quantity(val)
}

pub(crate) fn validate_not_negative(val: &Decimal) -> Result<(), ValidationError> {
    if val.is_sign_negative() && !val.is_zero() {
        let mut err = ValidationError::new("range");
        err.message = Some("El valor no puede ser negativo.".into());
        return Err(err);
    }
    validate_max_quantity(val)
}

pub(crate) fn validate_max_quantity(val: &Decimal) -> Result<(), ValidationError> {
    if *val > MAX_QUANTITY {
        let mut err = ValidationError::new("range");
        err.message = Some("El valor excede el máximo permitido.".into());
        return Err(err);
    }
    Ok(())
}

fn validate_not_blank(val: &str) -> Result<(), ValidationError> {
    if val.trim().is_empty() {
        let mut err = ValidationError::new("length");
        err.message = Some("El campo no puede estar vacío.".into());
        return Err(err);
    }
    Ok(())
}

// ---
// 5. Payloads
// ---
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IngredientPayload {
    #[validate(length(min = 1, message = "El ingrediente es obligatorio."))]
    pub ingredient_id: String,

    #[validate(custom(function = "validate_not_blank"))]
    pub ingredient_name: String,

    #[validate(custom(function = "validate_not_negative"))]
    #[schema(value_type = f64)]
    pub quantity: Decimal,

    pub unit: MeasureUnit,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecipePayload {
    #[validate(custom(function = "validate_not_blank"))]
    pub name: String,

    #[validate(custom(function = "validate_not_blank"))]
    pub category: String,

    #[serde(rename = "type")]
    pub recipe_type: RecipeType,

    #[validate(nested)]
    #[serde(default)]
    pub ingredients: Vec<IngredientPayload>,

    #[serde(default)]
    pub steps: Vec<RecipeStep>,

    #[validate(required(message = "El tiempo de preparación es obligatorio."))]
    pub prep_time_minutes: Option<u32>,

    #[validate(custom(function = "validate_positive"))]
    #[schema(value_type = f64)]
    pub expected_yield: Decimal,

    #[validate(custom(function = "validate_not_blank"))]
    pub yield_unit: String,

    pub photo_url: Option<String>,
    pub video_url: Option<String>,

    /// Obrigatório para receitas de produção; ignorado (0) para as de serviço.
    #[validate(range(max = MAX_SHELF_LIFE_DAYS, message = "La vida útil excede el máximo permitido."))]
    pub shelf_life_days: Option<u32>,
}

impl RecipePayload {
    // Regra: receita de produção precisa de vida útil
    pub fn validate_consistency(&self) -> Result<(), ValidationError> {
        if self.recipe_type == RecipeType::Produccion && self.shelf_life_days.is_none() {
            let mut err = ValidationError::new("required");
            err.message = Some("La vida útil es obligatoria para recetas de producción.".into());
            return Err(err);
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScaleRecipePayload {
    // Zero ou negativo é aceito: a calculadora cai no fator 1
    #[validate(custom(function = "validate_max_quantity"))]
    #[schema(value_type = f64, example = 20.0)]
    pub desired_yield: Decimal,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScaledRecipe {
    pub recipe_id: String,
    pub recipe_name: String,
    #[schema(value_type = f64)]
    pub multiplier: Decimal,
    #[schema(value_type = f64)]
    pub yield_quantity: Decimal,
    pub yield_unit: String,
    pub ingredients: Vec<Ingredient>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MasterIngredientPayload {
    #[validate(custom(function = "validate_not_blank"))]
    pub name: String,
    #[validate(custom(function = "validate_not_blank"))]
    pub category: String,
    #[validate(custom(function = "validate_not_blank"))]
    pub unit: String,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RenameCategoryPayload {
    #[schema(example = "Verduras")]
    pub new_name: String,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeleteCategoryPayload {
    /// Categoria que recebe os ingredientes da categoria removida.
    #[schema(example = "Condimentos")]
    pub reassign_to: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(recipe_type: RecipeType, shelf_life_days: Option<u32>) -> RecipePayload {
        RecipePayload {
            name: "Salsa Verde".into(),
            category: "Salsas".into(),
            recipe_type,
            ingredients: vec![],
            steps: vec![],
            prep_time_minutes: Some(20),
            expected_yield: Decimal::new(15, 1),
            yield_unit: "L".into(),
            photo_url: None,
            video_url: None,
            shelf_life_days,
        }
    }

    #[test]
    fn production_recipe_requires_shelf_life() {
        assert!(payload(RecipeType::Produccion, None).validate_consistency().is_err());
        assert!(payload(RecipeType::Produccion, Some(4)).validate_consistency().is_ok());
        assert!(payload(RecipeType::Servicio, None).validate_consistency().is_ok());
    }

    #[test]
    fn blank_name_and_zero_yield_fail_validation() {
        let mut bad = payload(RecipeType::Servicio, None);
        bad.name = "   ".into();
        bad.expected_yield = Decimal::ZERO;
        let errors = bad.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("name"));
        assert!(fields.contains_key("expected_yield"));
    }

    #[test]
    fn oversized_quantities_and_shelf_life_are_rejected() {
        let mut bad = payload(RecipeType::Produccion, Some(u32::MAX));
        bad.expected_yield = Decimal::MAX;
        let errors = bad.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("shelf_life_days"));
        assert!(fields.contains_key("expected_yield"));

        assert!(payload(RecipeType::Produccion, Some(MAX_SHELF_LIFE_DAYS)).validate().is_ok());

        let scale = ScaleRecipePayload { desired_yield: Decimal::from(70_000_000) };
        assert!(scale.validate().is_err());
        let fallback = ScaleRecipePayload { desired_yield: Decimal::NEGATIVE_ONE };
        assert!(fallback.validate().is_ok());
    }

    #[test]
    fn measure_units_keep_short_labels() {
        assert_eq!(serde_json::to_string(&MeasureUnit::Pieces).unwrap(), r#""pzas""#);
        let unit: MeasureUnit = serde_json::from_str(r#""L""#).unwrap();
        assert_eq!(unit, MeasureUnit::Liters);
    }
}
