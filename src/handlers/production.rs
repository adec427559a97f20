// src/handlers/production.rs

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
        rbac::{PermProductionRead, PermProductionWrite, RequirePermission},
    },
    models::{
        auth::User,
        batches::Batch,
        production::{AssignTaskPayload, CompleteTaskPayload, CreateTaskPayload, ProductionTask, ReorderPayload, TimerView},
    },
};

// =============================================================================
//  1. PLANO DE PRODUÇÃO
// =============================================================================

// GET /api/production/tasks
#[utoipa::path(
    get,
    path = "/api/production/tasks",
    tag = "Production",
    responses((status = 200, description = "Tarefas da unidade ativa por prioridade", body = Vec<ProductionTask>)),
    security(("api_jwt" = []))
)]
pub async fn list_tasks(
    State(app_state): State<AppState>,
    locale: Locale,
    auth: AuthenticatedUser,
    _perm: RequirePermission<PermProductionRead>,
) -> Result<Json<Vec<ProductionTask>>, ApiError> {
    let tasks = app_state
        .production_service
        .list_tasks(&auth.actor())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(tasks))
}

// GET /api/production/assignees
#[utoipa::path(
    get,
    path = "/api/production/assignees",
    tag = "Production",
    responses((status = 200, description = "Usuários que podem receber tarefas", body = Vec<User>)),
    security(("api_jwt" = []))
)]
pub async fn list_assignees(
    State(app_state): State<AppState>,
    locale: Locale,
    auth: AuthenticatedUser,
    _perm: RequirePermission<PermProductionRead>,
) -> Result<Json<Vec<User>>, ApiError> {
    let users = app_state
        .production_service
        .assignable_users(&auth.actor())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(users))
}

// POST /api/production/tasks
#[utoipa::path(
    post,
    path = "/api/production/tasks",
    tag = "Production",
    request_body = CreateTaskPayload,
    responses(
        (status = 201, description = "Tarefa adicionada ao plano", body = ProductionTask),
        (status = 409, description = "Visão global: escolha uma unidade")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_task(
    State(app_state): State<AppState>,
    locale: Locale,
    auth: AuthenticatedUser,
    _perm: RequirePermission<PermProductionWrite>,
    Json(payload): Json<CreateTaskPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let task = app_state
        .production_service
        .create_task(&auth.actor(), payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(task)))
}

// PUT /api/production/tasks/{task_id}/assignee
#[utoipa::path(
    put,
    path = "/api/production/tasks/{task_id}/assignee",
    tag = "Production",
    request_body = AssignTaskPayload,
    responses((status = 200, description = "Responsável atualizado", body = ProductionTask)),
    params(("task_id" = String, Path, description = "ID da tarefa")),
    security(("api_jwt" = []))
)]
pub async fn assign_task(
    State(app_state): State<AppState>,
    locale: Locale,
    auth: AuthenticatedUser,
    _perm: RequirePermission<PermProductionWrite>,
    Path(task_id): Path<String>,
    Json(payload): Json<AssignTaskPayload>,
) -> Result<Json<ProductionTask>, ApiError> {
    let task = app_state
        .production_service
        .assign_task(&auth.actor(), &task_id, payload.user_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(task))
}

// POST /api/production/tasks/reorder
#[utoipa::path(
    post,
    path = "/api/production/tasks/reorder",
    tag = "Production",
    request_body = ReorderPayload,
    responses((status = 200, description = "Plano reordenado", body = Vec<ProductionTask>)),
    security(("api_jwt" = []))
)]
pub async fn reorder_tasks(
    State(app_state): State<AppState>,
    locale: Locale,
    auth: AuthenticatedUser,
    _perm: RequirePermission<PermProductionWrite>,
    Json(payload): Json<ReorderPayload>,
) -> Result<Json<Vec<ProductionTask>>, ApiError> {
    let tasks = app_state
        .production_service
        .reorder_tasks(&auth.actor(), payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(tasks))
}

// POST /api/production/tasks/{task_id}/complete
#[utoipa::path(
    post,
    path = "/api/production/tasks/{task_id}/complete",
    tag = "Production",
    request_body = CompleteTaskPayload,
    responses(
        (status = 201, description = "Tarefa concluída, lote gerado", body = Batch),
        (status = 409, description = "Tarefa já concluída")
    ),
    params(("task_id" = String, Path, description = "ID da tarefa")),
    security(("api_jwt" = []))
)]
pub async fn complete_task(
    State(app_state): State<AppState>,
    locale: Locale,
    auth: AuthenticatedUser,
    _perm: RequirePermission<PermProductionWrite>,
    Path(task_id): Path<String>,
    Json(payload): Json<CompleteTaskPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let batch = app_state
        .production_service
        .complete_task(&auth.actor(), &task_id, payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(batch)))
}

// =============================================================================
//  2. CRONÔMETROS
// =============================================================================

// GET /api/production/timers
#[utoipa::path(
    get,
    path = "/api/production/timers",
    tag = "Production",
    responses((status = 200, description = "Cronômetros das tarefas visíveis", body = Vec<TimerView>)),
    security(("api_jwt" = []))
)]
pub async fn list_timers(
    State(app_state): State<AppState>,
    locale: Locale,
    auth: AuthenticatedUser,
    _perm: RequirePermission<PermProductionRead>,
) -> Result<Json<Vec<TimerView>>, ApiError> {
    let timers = app_state
        .production_service
        .list_timers(&auth.actor())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(timers))
}

// POST /api/production/tasks/{task_id}/timer/start
#[utoipa::path(
    post,
    path = "/api/production/tasks/{task_id}/timer/start",
    tag = "Production",
    responses((status = 200, description = "Cronômetro iniciado ou retomado", body = TimerView)),
    params(("task_id" = String, Path, description = "ID da tarefa")),
    security(("api_jwt" = []))
)]
pub async fn start_timer(
    State(app_state): State<AppState>,
    locale: Locale,
    auth: AuthenticatedUser,
    _perm: RequirePermission<PermProductionWrite>,
    Path(task_id): Path<String>,
) -> Result<Json<TimerView>, ApiError> {
    let timer = app_state
        .production_service
        .start_timer(&auth.actor(), &task_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(timer))
}

// POST /api/production/tasks/{task_id}/timer/pause
#[utoipa::path(
    post,
    path = "/api/production/tasks/{task_id}/timer/pause",
    tag = "Production",
    responses((status = 200, description = "Cronômetro pausado", body = TimerView)),
    params(("task_id" = String, Path, description = "ID da tarefa")),
    security(("api_jwt" = []))
)]
pub async fn pause_timer(
    State(app_state): State<AppState>,
    locale: Locale,
    auth: AuthenticatedUser,
    _perm: RequirePermission<PermProductionWrite>,
    Path(task_id): Path<String>,
) -> Result<Json<TimerView>, ApiError> {
    let timer = app_state
        .production_service
        .pause_timer(&auth.actor(), &task_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(timer))
}
