// src/services/recipe_service.rs

use rust_decimal::Decimal;
use validator::Validate;

use crate::{
    common::error::AppError,
    db::{new_record_id, CatalogRepository, Store},
    models::{
        rbac::{AppModule, RequiredLevel},
        recipes::{
            CategorySummary, Ingredient, MasterIngredient, MasterIngredientPayload, Recipe,
            RecipePayload, RecipeType, ScaleRecipePayload, ScaledRecipe,
        },
        session::Actor,
    },
    services::rbac_service::ensure_permission,
};

/// Fator de escala da calculadora. Valores não positivos caem em 1.
/// `None` quando a divisão estoura o `Decimal`.
pub fn scale_multiplier(desired_yield: Decimal, expected_yield: Decimal) -> Option<Decimal> {
    if desired_yield <= Decimal::ZERO || expected_yield <= Decimal::ZERO {
        return Some(Decimal::ONE);
    }
    desired_yield.checked_div(expected_yield)
}

pub fn scale_recipe(recipe: &Recipe, desired_yield: Decimal) -> Result<ScaledRecipe, AppError> {
    let overflow = || {
        AppError::invalid_field("desiredYield", "El rendimiento deseado excede el máximo permitido.")
    };

    let multiplier = scale_multiplier(desired_yield, recipe.expected_yield).ok_or_else(overflow)?;
    let yield_quantity = recipe.expected_yield.checked_mul(multiplier).ok_or_else(overflow)?;
    let ingredients = recipe
        .ingredients
        .iter()
        .map(|ing| {
            let quantity = ing.quantity.checked_mul(multiplier).ok_or_else(overflow)?;
            Ok(Ingredient {
                quantity: quantity.round_dp(2),
                ..ing.clone()
            })
        })
        .collect::<Result<Vec<_>, AppError>>()?;

    Ok(ScaledRecipe {
        recipe_id: recipe.id.clone(),
        recipe_name: recipe.name.clone(),
        multiplier: multiplier.round_dp(4),
        yield_quantity: yield_quantity.round_dp(2),
        yield_unit: recipe.yield_unit.clone(),
        ingredients,
    })
}

#[derive(Clone)]
pub struct RecipeService {
    catalog_repo: CatalogRepository,
    store: Store,
}

impl RecipeService {
    pub fn new(catalog_repo: CatalogRepository, store: Store) -> Self {
        Self { catalog_repo, store }
    }

    // ---
    // Receitas
    // ---

    pub async fn list_recipes(&self, actor: &Actor) -> Result<Vec<Recipe>, AppError> {
        let tx = self.store.read().await;
        ensure_permission(&tx, actor, AppModule::Recipes, RequiredLevel::View)?;
        Ok(self.catalog_repo.list_recipes(&tx))
    }

    pub async fn get_recipe(&self, actor: &Actor, id: &str) -> Result<Recipe, AppError> {
        let tx = self.store.read().await;
        ensure_permission(&tx, actor, AppModule::Recipes, RequiredLevel::View)?;
        self.catalog_repo
            .find_recipe(&tx, id)
            .cloned()
            .ok_or_else(|| AppError::RecipeNotFound(id.to_string()))
    }

    pub async fn create_recipe(&self, actor: &Actor, payload: RecipePayload) -> Result<Recipe, AppError> {
        validate_recipe(&payload)?;

        let mut tx = self.store.begin().await;
        let (user, _) = ensure_permission(&tx, actor, AppModule::Recipes, RequiredLevel::Edit)?;

        let recipe = self
            .catalog_repo
            .insert_recipe(&mut tx, build_recipe(new_record_id("recipe-"), payload));

        tracing::info!("📖 Receita '{}' criada por {}", recipe.name, user.email);
        Ok(recipe)
    }

    pub async fn update_recipe(
        &self,
        actor: &Actor,
        id: &str,
        payload: RecipePayload,
    ) -> Result<Recipe, AppError> {
        validate_recipe(&payload)?;

        let mut tx = self.store.begin().await;
        let (user, _) = ensure_permission(&tx, actor, AppModule::Recipes, RequiredLevel::Edit)?;

        let recipe = self
            .catalog_repo
            .update_recipe(&mut tx, build_recipe(id.to_string(), payload))?;

        tracing::info!("📖 Receita '{}' atualizada por {}", recipe.name, user.email);
        Ok(recipe)
    }

    /// Calculadora: escala a receita para o rendimento desejado.
    pub async fn scale(&self, actor: &Actor, id: &str, payload: ScaleRecipePayload) -> Result<ScaledRecipe, AppError> {
        payload.validate()?;

        let tx = self.store.read().await;
        ensure_permission(&tx, actor, AppModule::Calculator, RequiredLevel::View)?;

        let recipe = self
            .catalog_repo
            .find_recipe(&tx, id)
            .ok_or_else(|| AppError::RecipeNotFound(id.to_string()))?;

        scale_recipe(recipe, payload.desired_yield)
    }

    // ---
    // Ingredientes mestre
    // ---

    pub async fn list_ingredients(&self, actor: &Actor) -> Result<Vec<MasterIngredient>, AppError> {
        let tx = self.store.read().await;
        ensure_permission(&tx, actor, AppModule::AdminIngredients, RequiredLevel::View)?;
        Ok(self.catalog_repo.list_ingredients(&tx))
    }

    pub async fn create_ingredient(
        &self,
        actor: &Actor,
        payload: MasterIngredientPayload,
    ) -> Result<MasterIngredient, AppError> {
        payload.validate()?;

        let mut tx = self.store.begin().await;
        ensure_permission(&tx, actor, AppModule::AdminIngredients, RequiredLevel::Edit)?;

        let ingredient = MasterIngredient {
            id: new_record_id("ing-"),
            name: payload.name.trim().to_string(),
            category: payload.category.trim().to_string(),
            unit: payload.unit.trim().to_string(),
        };
        Ok(self.catalog_repo.insert_ingredient(&mut tx, ingredient))
    }

    pub async fn update_ingredient(
        &self,
        actor: &Actor,
        id: &str,
        payload: MasterIngredientPayload,
    ) -> Result<MasterIngredient, AppError> {
        payload.validate()?;

        let mut tx = self.store.begin().await;
        ensure_permission(&tx, actor, AppModule::AdminIngredients, RequiredLevel::Edit)?;

        let ingredient = MasterIngredient {
            id: id.to_string(),
            name: payload.name.trim().to_string(),
            category: payload.category.trim().to_string(),
            unit: payload.unit.trim().to_string(),
        };
        self.catalog_repo.update_ingredient(&mut tx, ingredient)
    }

    // ---
    // Categorias
    // ---

    pub async fn list_categories(&self, actor: &Actor) -> Result<Vec<CategorySummary>, AppError> {
        let tx = self.store.read().await;
        ensure_permission(&tx, actor, AppModule::AdminIngredients, RequiredLevel::View)?;
        Ok(self.catalog_repo.category_summaries(&tx))
    }

    /// Nome vazio ou igual ao atual não muda nada.
    pub async fn rename_category(
        &self,
        actor: &Actor,
        name: &str,
        new_name: &str,
    ) -> Result<Vec<CategorySummary>, AppError> {
        let mut tx = self.store.begin().await;
        ensure_permission(&tx, actor, AppModule::AdminIngredients, RequiredLevel::Edit)?;

        if !self.catalog_repo.category_exists(&tx, name) {
            return Err(AppError::CategoryNotFound(name.to_string()));
        }

        let new_name = new_name.trim();
        if !new_name.is_empty() && new_name != name {
            let moved = self.catalog_repo.move_category(&mut tx, name, new_name);
            tracing::info!("🏷️ Categoria '{}' renomeada para '{}' ({} ingredientes)", name, new_name, moved);
        }

        Ok(self.catalog_repo.category_summaries(&tx))
    }

    /// Remove a categoria movendo os ingredientes para outra categoria.
    pub async fn delete_category(
        &self,
        actor: &Actor,
        name: &str,
        reassign_to: &str,
    ) -> Result<Vec<CategorySummary>, AppError> {
        let mut tx = self.store.begin().await;
        ensure_permission(&tx, actor, AppModule::AdminIngredients, RequiredLevel::Edit)?;

        if !self.catalog_repo.category_exists(&tx, name) {
            return Err(AppError::CategoryNotFound(name.to_string()));
        }

        let target = reassign_to.trim();
        if target.is_empty() || target == name {
            return Err(AppError::InvalidCategoryTarget);
        }

        let moved = self.catalog_repo.move_category(&mut tx, name, target);
        tracing::info!("🏷️ Categoria '{}' removida, {} ingredientes movidos para '{}'", name, moved, target);

        Ok(self.catalog_repo.category_summaries(&tx))
    }
}

fn validate_recipe(payload: &RecipePayload) -> Result<(), AppError> {
    payload.validate()?;
    if let Err(e) = payload.validate_consistency() {
        let mut errors = validator::ValidationErrors::new();
        errors.add("shelfLifeDays", e);
        return Err(AppError::ValidationError(errors));
    }
    Ok(())
}

// Receitas de serviço não têm vida útil
fn build_recipe(id: String, payload: RecipePayload) -> Recipe {
    let shelf_life_days = match payload.recipe_type {
        RecipeType::Produccion => payload.shelf_life_days.unwrap_or_default(),
        RecipeType::Servicio => 0,
    };

    Recipe {
        id,
        name: payload.name.trim().to_string(),
        category: payload.category.trim().to_string(),
        recipe_type: payload.recipe_type,
        ingredients: payload
            .ingredients
            .into_iter()
            .map(|ing| Ingredient {
                ingredient_id: ing.ingredient_id,
                ingredient_name: ing.ingredient_name,
                quantity: ing.quantity,
                unit: ing.unit,
            })
            .collect(),
        steps: payload.steps,
        prep_time_minutes: payload.prep_time_minutes.unwrap_or_default(),
        expected_yield: payload.expected_yield,
        yield_unit: payload.yield_unit.trim().to_string(),
        photo_url: payload.photo_url.filter(|url| !url.trim().is_empty()),
        video_url: payload.video_url.filter(|url| !url.trim().is_empty()),
        shelf_life_days,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{seed::demo_tables, SessionRepository};
    use crate::models::{session::Session, tenancy::ActiveSelection};

    async fn service_with_session(user_id: i64) -> (RecipeService, Actor) {
        let store = Store::new(demo_tables());
        let actor = {
            let mut tx = store.begin().await;
            SessionRepository::new()
                .insert(&mut tx, Session::new(user_id, ActiveSelection::Global))
                .actor()
        };
        (RecipeService::new(CatalogRepository::new(), store), actor)
    }

    fn recipe_payload(recipe_type: RecipeType, shelf_life_days: Option<u32>) -> RecipePayload {
        RecipePayload {
            name: "Salsa Verde".into(),
            category: "Salsas".into(),
            recipe_type,
            ingredients: vec![],
            steps: vec![],
            prep_time_minutes: Some(20),
            expected_yield: Decimal::ONE,
            yield_unit: "L".into(),
            photo_url: Some("".into()),
            video_url: None,
            shelf_life_days,
        }
    }

    #[test]
    fn multiplier_falls_back_to_one() {
        assert_eq!(scale_multiplier(Decimal::TEN, Decimal::TWO), Some(Decimal::new(5, 0)));
        assert_eq!(scale_multiplier(Decimal::ZERO, Decimal::TWO), Some(Decimal::ONE));
        assert_eq!(scale_multiplier(Decimal::TEN, Decimal::ZERO), Some(Decimal::ONE));
        assert_eq!(scale_multiplier(Decimal::NEGATIVE_ONE, Decimal::TWO), Some(Decimal::ONE));
    }

    #[test]
    fn overflowing_scale_is_a_validation_error() {
        let tables = demo_tables();
        let mut recipe = tables
            .recipes
            .iter()
            .find(|r| r.id == "salsa-roja")
            .cloned()
            .unwrap();
        recipe.expected_yield = Decimal::new(1, 1);

        let huge = Decimal::from_i128_with_scale(70_000_000_000_000_000_000_000_000_000, 0);
        assert!(matches!(
            scale_recipe(&recipe, huge),
            Err(AppError::ValidationError(_))
        ));

        recipe.expected_yield = Decimal::new(1, 20);
        assert!(scale_multiplier(Decimal::MAX, recipe.expected_yield).is_none());
    }

    #[tokio::test]
    async fn shelf_life_beyond_limit_is_rejected() {
        let (service, admin) = service_with_session(1).await;
        let result = service
            .create_recipe(&admin, recipe_payload(RecipeType::Produccion, Some(u32::MAX)))
            .await;
        assert!(matches!(result, Err(AppError::ValidationError(_))));
    }

    #[tokio::test]
    async fn oversized_desired_yield_is_rejected() {
        let (service, actor) = service_with_session(5).await;
        let payload = ScaleRecipePayload { desired_yield: Decimal::from(70_000_000) };
        assert!(matches!(
            service.scale(&actor, "salsa-roja", payload).await,
            Err(AppError::ValidationError(_))
        ));
    }

    #[tokio::test]
    async fn scales_every_ingredient() {
        let (service, actor) = service_with_session(5).await;
        // Pollo: rende 0.8 kg, pedimos 2 kg -> x2.5
        let scaled = service
            .scale(&actor, "pollo-parrilla", ScaleRecipePayload { desired_yield: Decimal::TWO })
            .await
            .unwrap();
        assert_eq!(scaled.multiplier, Decimal::new(25, 1));
        assert_eq!(scaled.yield_quantity, Decimal::TWO);
        let pechuga = scaled
            .ingredients
            .iter()
            .find(|i| i.ingredient_id == "ing-10")
            .unwrap();
        assert_eq!(pechuga.quantity, Decimal::new(25, 1));
    }

    #[tokio::test]
    async fn servicio_cannot_use_calculator() {
        let (service, actor) = service_with_session(3).await;
        assert!(matches!(
            service
                .scale(&actor, "salsa-roja", ScaleRecipePayload { desired_yield: Decimal::TEN })
                .await,
            Err(AppError::PermissionDenied { .. })
        ));
    }

    #[tokio::test]
    async fn service_recipe_has_no_shelf_life() {
        let (service, actor) = service_with_session(4).await;
        let recipe = service
            .create_recipe(&actor, recipe_payload(RecipeType::Servicio, Some(9)))
            .await
            .unwrap();
        assert_eq!(recipe.shelf_life_days, 0);
        assert_eq!(recipe.photo_url, None);
        assert_eq!(service.list_recipes(&actor).await.unwrap()[0].id, recipe.id);
    }

    #[tokio::test]
    async fn production_recipe_without_shelf_life_is_invalid() {
        let (service, actor) = service_with_session(4).await;
        let result = service
            .create_recipe(&actor, recipe_payload(RecipeType::Produccion, None))
            .await;
        match result {
            Err(AppError::ValidationError(errors)) => {
                assert!(errors.field_errors().contains_key("shelfLifeDays"))
            }
            other => panic!("esperava erro de validação, veio {other:?}"),
        }
    }

    #[tokio::test]
    async fn produccion_role_only_reads_recipes() {
        let (service, actor) = service_with_session(5).await;
        assert!(service.get_recipe(&actor, "salsa-roja").await.is_ok());
        assert!(matches!(
            service
                .update_recipe(&actor, "salsa-roja", recipe_payload(RecipeType::Produccion, Some(5)))
                .await,
            Err(AppError::PermissionDenied { .. })
        ));
    }

    #[tokio::test]
    async fn rename_category_ignores_blank_or_same_name() {
        let (service, actor) = service_with_session(1).await;
        let before = service.list_categories(&actor).await.unwrap();

        assert_eq!(service.rename_category(&actor, "Chiles", "  ").await.unwrap(), before);
        assert_eq!(service.rename_category(&actor, "Chiles", "Chiles").await.unwrap(), before);

        let after = service.rename_category(&actor, "Chiles", "Picantes").await.unwrap();
        assert!(after.iter().any(|c| c.name == "Picantes" && c.count == 1));
        assert!(after.iter().all(|c| c.name != "Chiles"));
    }

    #[tokio::test]
    async fn delete_category_requires_a_different_target() {
        let (service, actor) = service_with_session(1).await;
        for bad in ["", "Hierbas"] {
            assert!(matches!(
                service.delete_category(&actor, "Hierbas", bad).await,
                Err(AppError::InvalidCategoryTarget)
            ));
        }

        let after = service.delete_category(&actor, "Hierbas", "Condimentos").await.unwrap();
        let condimentos = after.iter().find(|c| c.name == "Condimentos").unwrap();
        assert_eq!(condimentos.count, 3);
        assert!(after.iter().all(|c| c.name != "Hierbas"));
    }
}
