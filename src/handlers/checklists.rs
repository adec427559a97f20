// src/handlers/checklists.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;

use crate::{
    common::error::ApiError,
    config::AppState,
    middleware::{
        auth::AuthenticatedUser,
        i18n::Locale,
        rbac::{PermTemplatesRead, PermTemplatesWrite, RequirePermission},
    },
    models::{
        checklist::{ChecklistKind, ChecklistStatusPayload, OperationalTask, OperationalTaskTemplate, TemplatePayload},
        production::ReorderPayload,
    },
};

// Os quadros decidem o módulo pela tarefa, então a checagem fica toda no serviço.

// GET /api/checklists/board/{kind}
#[utoipa::path(
    get,
    path = "/api/checklists/board/{kind}",
    tag = "Checklists",
    responses((status = 200, description = "Tarefas operacionais do quadro", body = Vec<OperationalTask>)),
    params(("kind" = ChecklistKind, Path, description = "produccion | servicio")),
    security(("api_jwt" = []))
)]
pub async fn list_board(
    State(app_state): State<AppState>,
    locale: Locale,
    auth: AuthenticatedUser,
    Path(kind): Path<ChecklistKind>,
) -> Result<Json<Vec<OperationalTask>>, ApiError> {
    let tasks = app_state
        .checklist_service
        .list_board(&auth.actor(), kind)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(tasks))
}

// GET /api/checklists/mine
#[utoipa::path(
    get,
    path = "/api/checklists/mine",
    tag = "Checklists",
    responses((status = 200, description = "Tarefas operacionais do cargo do usuário", body = Vec<OperationalTask>)),
    security(("api_jwt" = []))
)]
pub async fn list_my_tasks(
    State(app_state): State<AppState>,
    locale: Locale,
    auth: AuthenticatedUser,
) -> Result<Json<Vec<OperationalTask>>, ApiError> {
    let tasks = app_state
        .checklist_service
        .list_my_tasks(&auth.actor())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(tasks))
}

// PUT /api/checklists/tasks/{task_id}/status
#[utoipa::path(
    put,
    path = "/api/checklists/tasks/{task_id}/status",
    tag = "Checklists",
    request_body = ChecklistStatusPayload,
    responses((status = 200, description = "Status atualizado", body = OperationalTask)),
    params(("task_id" = String, Path, description = "ID da tarefa operacional")),
    security(("api_jwt" = []))
)]
pub async fn update_status(
    State(app_state): State<AppState>,
    locale: Locale,
    auth: AuthenticatedUser,
    Path(task_id): Path<String>,
    Json(payload): Json<ChecklistStatusPayload>,
) -> Result<Json<OperationalTask>, ApiError> {
    let task = app_state
        .checklist_service
        .update_status(&auth.actor(), &task_id, payload.status)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(task))
}

// POST /api/checklists/reorder
#[utoipa::path(
    post,
    path = "/api/checklists/reorder",
    tag = "Checklists",
    request_body = ReorderPayload,
    responses((status = 200, description = "`{ moved }`: falso quando algum id é desconhecido")),
    security(("api_jwt" = []))
)]
pub async fn reorder(
    State(app_state): State<AppState>,
    locale: Locale,
    auth: AuthenticatedUser,
    Json(payload): Json<ReorderPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let moved = app_state
        .checklist_service
        .reorder(&auth.actor(), &payload.dragged_id, &payload.target_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(json!({ "moved": moved })))
}

// =============================================================================
//  PLANTILLAS (admin)
// =============================================================================

// GET /api/templates
#[utoipa::path(
    get,
    path = "/api/templates",
    tag = "Checklists",
    responses((status = 200, description = "Plantillas de tarefas operacionais", body = Vec<OperationalTaskTemplate>)),
    security(("api_jwt" = []))
)]
pub async fn list_templates(
    State(app_state): State<AppState>,
    locale: Locale,
    auth: AuthenticatedUser,
    _perm: RequirePermission<PermTemplatesRead>,
) -> Result<Json<Vec<OperationalTaskTemplate>>, ApiError> {
    let templates = app_state
        .checklist_service
        .list_templates(&auth.actor())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(templates))
}

// POST /api/templates
#[utoipa::path(
    post,
    path = "/api/templates",
    tag = "Checklists",
    request_body = TemplatePayload,
    responses((status = 201, description = "Plantilla criada", body = OperationalTaskTemplate)),
    security(("api_jwt" = []))
)]
pub async fn create_template(
    State(app_state): State<AppState>,
    locale: Locale,
    auth: AuthenticatedUser,
    _perm: RequirePermission<PermTemplatesWrite>,
    Json(payload): Json<TemplatePayload>,
) -> Result<impl IntoResponse, ApiError> {
    let template = app_state
        .checklist_service
        .create_template(&auth.actor(), payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(template)))
}
