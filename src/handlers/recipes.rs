// src/handlers/recipes.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::{
    common::error::ApiError,
    config::AppState,
    middleware::{
        auth::AuthenticatedUser,
        i18n::Locale,
        rbac::{
            PermCalculatorRead, PermIngredientsRead, PermIngredientsWrite, PermRecipesRead, PermRecipesWrite,
            RequirePermission,
        },
    },
    models::recipes::{
        CategorySummary, DeleteCategoryPayload, MasterIngredient, MasterIngredientPayload, Recipe, RecipePayload,
        RenameCategoryPayload, ScaleRecipePayload, ScaledRecipe,
    },
};

// =============================================================================
//  1. RECEITAS
// =============================================================================

// GET /api/recipes
#[utoipa::path(
    get,
    path = "/api/recipes",
    tag = "Recipes",
    responses((status = 200, description = "Catálogo de receitas", body = Vec<Recipe>)),
    security(("api_jwt" = []))
)]
pub async fn list_recipes(
    State(app_state): State<AppState>,
    locale: Locale,
    auth: AuthenticatedUser,
    _perm: RequirePermission<PermRecipesRead>,
) -> Result<Json<Vec<Recipe>>, ApiError> {
    let recipes = app_state
        .recipe_service
        .list_recipes(&auth.actor())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(recipes))
}

// GET /api/recipes/{recipe_id}
#[utoipa::path(
    get,
    path = "/api/recipes/{recipe_id}",
    tag = "Recipes",
    responses(
        (status = 200, description = "Receita", body = Recipe),
        (status = 404, description = "Receita não encontrada")
    ),
    params(("recipe_id" = String, Path, description = "ID da receita")),
    security(("api_jwt" = []))
)]
pub async fn get_recipe(
    State(app_state): State<AppState>,
    locale: Locale,
    auth: AuthenticatedUser,
    _perm: RequirePermission<PermRecipesRead>,
    Path(recipe_id): Path<String>,
) -> Result<Json<Recipe>, ApiError> {
    let recipe = app_state
        .recipe_service
        .get_recipe(&auth.actor(), &recipe_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(recipe))
}

// POST /api/recipes
#[utoipa::path(
    post,
    path = "/api/recipes",
    tag = "Recipes",
    request_body = RecipePayload,
    responses(
        (status = 201, description = "Receita criada", body = Recipe),
        (status = 400, description = "Dados inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_recipe(
    State(app_state): State<AppState>,
    locale: Locale,
    auth: AuthenticatedUser,
    _perm: RequirePermission<PermRecipesWrite>,
    Json(payload): Json<RecipePayload>,
) -> Result<impl IntoResponse, ApiError> {
    let recipe = app_state
        .recipe_service
        .create_recipe(&auth.actor(), payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(recipe)))
}

// PUT /api/recipes/{recipe_id}
#[utoipa::path(
    put,
    path = "/api/recipes/{recipe_id}",
    tag = "Recipes",
    request_body = RecipePayload,
    responses((status = 200, description = "Receita atualizada", body = Recipe)),
    params(("recipe_id" = String, Path, description = "ID da receita")),
    security(("api_jwt" = []))
)]
pub async fn update_recipe(
    State(app_state): State<AppState>,
    locale: Locale,
    auth: AuthenticatedUser,
    _perm: RequirePermission<PermRecipesWrite>,
    Path(recipe_id): Path<String>,
    Json(payload): Json<RecipePayload>,
) -> Result<Json<Recipe>, ApiError> {
    let recipe = app_state
        .recipe_service
        .update_recipe(&auth.actor(), &recipe_id, payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(recipe))
}

// POST /api/recipes/{recipe_id}/scale
#[utoipa::path(
    post,
    path = "/api/recipes/{recipe_id}/scale",
    tag = "Calculator",
    request_body = ScaleRecipePayload,
    responses((status = 200, description = "Receita escalada para o rendimento pedido", body = ScaledRecipe)),
    params(("recipe_id" = String, Path, description = "ID da receita")),
    security(("api_jwt" = []))
)]
pub async fn scale_recipe(
    State(app_state): State<AppState>,
    locale: Locale,
    auth: AuthenticatedUser,
    _perm: RequirePermission<PermCalculatorRead>,
    Path(recipe_id): Path<String>,
    Json(payload): Json<ScaleRecipePayload>,
) -> Result<Json<ScaledRecipe>, ApiError> {
    let scaled = app_state
        .recipe_service
        .scale(&auth.actor(), &recipe_id, payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(scaled))
}

// =============================================================================
//  2. INGREDIENTES MESTRE
// =============================================================================

// GET /api/ingredients
#[utoipa::path(
    get,
    path = "/api/ingredients",
    tag = "Ingredients",
    responses((status = 200, description = "Ingredientes por nome", body = Vec<MasterIngredient>)),
    security(("api_jwt" = []))
)]
pub async fn list_ingredients(
    State(app_state): State<AppState>,
    locale: Locale,
    auth: AuthenticatedUser,
    _perm: RequirePermission<PermIngredientsRead>,
) -> Result<Json<Vec<MasterIngredient>>, ApiError> {
    let ingredients = app_state
        .recipe_service
        .list_ingredients(&auth.actor())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(ingredients))
}

// POST /api/ingredients
#[utoipa::path(
    post,
    path = "/api/ingredients",
    tag = "Ingredients",
    request_body = MasterIngredientPayload,
    responses((status = 201, description = "Ingrediente criado", body = MasterIngredient)),
    security(("api_jwt" = []))
)]
pub async fn create_ingredient(
    State(app_state): State<AppState>,
    locale: Locale,
    auth: AuthenticatedUser,
    _perm: RequirePermission<PermIngredientsWrite>,
    Json(payload): Json<MasterIngredientPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let ingredient = app_state
        .recipe_service
        .create_ingredient(&auth.actor(), payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(ingredient)))
}

// PUT /api/ingredients/{ingredient_id}
#[utoipa::path(
    put,
    path = "/api/ingredients/{ingredient_id}",
    tag = "Ingredients",
    request_body = MasterIngredientPayload,
    responses((status = 200, description = "Ingrediente atualizado", body = MasterIngredient)),
    params(("ingredient_id" = String, Path, description = "ID do ingrediente")),
    security(("api_jwt" = []))
)]
pub async fn update_ingredient(
    State(app_state): State<AppState>,
    locale: Locale,
    auth: AuthenticatedUser,
    _perm: RequirePermission<PermIngredientsWrite>,
    Path(ingredient_id): Path<String>,
    Json(payload): Json<MasterIngredientPayload>,
) -> Result<Json<MasterIngredient>, ApiError> {
    let ingredient = app_state
        .recipe_service
        .update_ingredient(&auth.actor(), &ingredient_id, payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(ingredient))
}

// =============================================================================
//  3. CATEGORIAS
// =============================================================================

// GET /api/categories
#[utoipa::path(
    get,
    path = "/api/categories",
    tag = "Ingredients",
    responses((status = 200, description = "Categorias com contagem de ingredientes", body = Vec<CategorySummary>)),
    security(("api_jwt" = []))
)]
pub async fn list_categories(
    State(app_state): State<AppState>,
    locale: Locale,
    auth: AuthenticatedUser,
    _perm: RequirePermission<PermIngredientsRead>,
) -> Result<Json<Vec<CategorySummary>>, ApiError> {
    let categories = app_state
        .recipe_service
        .list_categories(&auth.actor())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(categories))
}

// PUT /api/categories/{name}
#[utoipa::path(
    put,
    path = "/api/categories/{name}",
    tag = "Ingredients",
    request_body = RenameCategoryPayload,
    responses((status = 200, description = "Categoria renomeada", body = Vec<CategorySummary>)),
    params(("name" = String, Path, description = "Nome atual da categoria")),
    security(("api_jwt" = []))
)]
pub async fn rename_category(
    State(app_state): State<AppState>,
    locale: Locale,
    auth: AuthenticatedUser,
    _perm: RequirePermission<PermIngredientsWrite>,
    Path(name): Path<String>,
    Json(payload): Json<RenameCategoryPayload>,
) -> Result<Json<Vec<CategorySummary>>, ApiError> {
    let categories = app_state
        .recipe_service
        .rename_category(&auth.actor(), &name, &payload.new_name)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(categories))
}

// DELETE /api/categories/{name}
#[utoipa::path(
    delete,
    path = "/api/categories/{name}",
    tag = "Ingredients",
    request_body = DeleteCategoryPayload,
    responses(
        (status = 200, description = "Categoria removida, ingredientes reatribuídos", body = Vec<CategorySummary>),
        (status = 400, description = "Categoria de destino inválida")
    ),
    params(("name" = String, Path, description = "Categoria a remover")),
    security(("api_jwt" = []))
)]
pub async fn delete_category(
    State(app_state): State<AppState>,
    locale: Locale,
    auth: AuthenticatedUser,
    _perm: RequirePermission<PermIngredientsWrite>,
    Path(name): Path<String>,
    Json(payload): Json<DeleteCategoryPayload>,
) -> Result<Json<Vec<CategorySummary>>, ApiError> {
    let categories = app_state
        .recipe_service
        .delete_category(&auth.actor(), &name, &payload.reassign_to)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(categories))
}
