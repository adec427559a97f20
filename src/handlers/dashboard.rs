// src/handlers/dashboard.rs

use axum::{
    extract::{Query, State},
    Json,
};

use crate::{
    common::error::ApiError,
    config::AppState,
    middleware::{
        auth::AuthenticatedUser,
        i18n::Locale,
        rbac::{PermReportsRead, PermWeeklySummaryRead, RequirePermission},
    },
    models::reports::{ProductionByRecipe, SummaryQuery, WeeklySummary},
};

// GET /api/summary?period=this_week
#[utoipa::path(
    get,
    path = "/api/summary",
    tag = "Dashboard",
    params(SummaryQuery),
    responses((status = 200, description = "Lotes do período, mais recentes primeiro", body = WeeklySummary)),
    security(("api_jwt" = []))
)]
pub async fn get_weekly_summary(
    State(app_state): State<AppState>,
    locale: Locale,
    auth: AuthenticatedUser,
    _perm: RequirePermission<PermWeeklySummaryRead>,
    Query(query): Query<SummaryQuery>,
) -> Result<Json<WeeklySummary>, ApiError> {
    let summary = app_state
        .dashboard_service
        .weekly_summary(&auth.actor(), query.period)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(summary))
}

// GET /api/reports/production
#[utoipa::path(
    get,
    path = "/api/reports/production",
    tag = "Dashboard",
    responses((status = 200, description = "Quantidade total produzida por receita", body = Vec<ProductionByRecipe>)),
    security(("api_jwt" = []))
)]
pub async fn get_production_report(
    State(app_state): State<AppState>,
    locale: Locale,
    auth: AuthenticatedUser,
    _perm: RequirePermission<PermReportsRead>,
) -> Result<Json<Vec<ProductionByRecipe>>, ApiError> {
    let report = app_state
        .dashboard_service
        .production_report(&auth.actor())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(report))
}
