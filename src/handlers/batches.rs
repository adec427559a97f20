// src/handlers/batches.rs

use axum::{
    extract::{Path, State},
    Json,
};

use crate::{
    common::error::ApiError,
    config::AppState,
    middleware::{
        auth::AuthenticatedUser,
        i18n::Locale,
        rbac::{PermBatchesRead, PermBatchesWrite, RequirePermission},
    },
    models::batches::{Batch, BatchDetail, BatchNotePayload},
};

// GET /api/batches
#[utoipa::path(
    get,
    path = "/api/batches",
    tag = "Batches",
    responses((status = 200, description = "Lotes da unidade ativa, mais recentes primeiro", body = Vec<Batch>)),
    security(("api_jwt" = []))
)]
pub async fn list_batches(
    State(app_state): State<AppState>,
    locale: Locale,
    auth: AuthenticatedUser,
    _perm: RequirePermission<PermBatchesRead>,
) -> Result<Json<Vec<Batch>>, ApiError> {
    let batches = app_state
        .batch_service
        .list_batches(&auth.actor())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(batches))
}

// GET /api/batches/{batch_id}
#[utoipa::path(
    get,
    path = "/api/batches/{batch_id}",
    tag = "Batches",
    responses(
        (status = 200, description = "Rastreabilidade do lote", body = BatchDetail),
        (status = 404, description = "Lote não encontrado")
    ),
    params(("batch_id" = String, Path, description = "ID do lote")),
    security(("api_jwt" = []))
)]
pub async fn get_batch(
    State(app_state): State<AppState>,
    locale: Locale,
    auth: AuthenticatedUser,
    _perm: RequirePermission<PermBatchesRead>,
    Path(batch_id): Path<String>,
) -> Result<Json<BatchDetail>, ApiError> {
    let detail = app_state
        .batch_service
        .get_batch(&auth.actor(), &batch_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(detail))
}

// PUT /api/batches/{batch_id}/note
#[utoipa::path(
    put,
    path = "/api/batches/{batch_id}/note",
    tag = "Batches",
    request_body = BatchNotePayload,
    responses((status = 200, description = "Nota salva", body = Batch)),
    params(("batch_id" = String, Path, description = "ID do lote")),
    security(("api_jwt" = []))
)]
pub async fn save_note(
    State(app_state): State<AppState>,
    locale: Locale,
    auth: AuthenticatedUser,
    _perm: RequirePermission<PermBatchesWrite>,
    Path(batch_id): Path<String>,
    Json(payload): Json<BatchNotePayload>,
) -> Result<Json<Batch>, ApiError> {
    let batch = app_state
        .batch_service
        .save_note(&auth.actor(), &batch_id, &payload.note)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(batch))
}
