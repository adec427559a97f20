// src/handlers/waste.rs

use axum::{
    extract::{Query, State},
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
        rbac::{PermWasteRead, PermWasteWrite, RequirePermission},
    },
    models::waste::{LogWastePayload, Waste, WasteReport, WasteReportQuery},
};

// GET /api/waste
#[utoipa::path(
    get,
    path = "/api/waste",
    tag = "Waste",
    responses((status = 200, description = "Mermas da unidade ativa, mais recentes primeiro", body = Vec<Waste>)),
    security(("api_jwt" = []))
)]
pub async fn list_waste(
    State(app_state): State<AppState>,
    locale: Locale,
    auth: AuthenticatedUser,
    _perm: RequirePermission<PermWasteRead>,
) -> Result<Json<Vec<Waste>>, ApiError> {
    let records = app_state
        .waste_service
        .list_waste(&auth.actor())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(records))
}

// POST /api/waste
#[utoipa::path(
    post,
    path = "/api/waste",
    tag = "Waste",
    request_body = LogWastePayload,
    responses(
        (status = 201, description = "Merma registrada", body = Waste),
        (status = 403, description = "Unidade fora do escopo do usuário")
    ),
    security(("api_jwt" = []))
)]
pub async fn log_waste(
    State(app_state): State<AppState>,
    locale: Locale,
    auth: AuthenticatedUser,
    _perm: RequirePermission<PermWasteWrite>,
    Json(payload): Json<LogWastePayload>,
) -> Result<impl IntoResponse, ApiError> {
    let record = app_state
        .waste_service
        .log_waste(&auth.actor(), payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(record)))
}

// GET /api/waste/report?weekOffset=-1
#[utoipa::path(
    get,
    path = "/api/waste/report",
    tag = "Waste",
    params(WasteReportQuery),
    responses((status = 200, description = "Relatório semanal de mermas", body = WasteReport)),
    security(("api_jwt" = []))
)]
pub async fn weekly_report(
    State(app_state): State<AppState>,
    locale: Locale,
    auth: AuthenticatedUser,
    _perm: RequirePermission<PermWasteRead>,
    Query(query): Query<WasteReportQuery>,
) -> Result<Json<WasteReport>, ApiError> {
    let report = app_state
        .waste_service
        .weekly_report(&auth.actor(), query.week_offset)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(report))
}
