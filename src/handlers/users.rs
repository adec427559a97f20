// src/handlers/users.rs

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
        rbac::{PermUsersRead, PermUsersWrite, RequirePermission},
    },
    models::auth::{User, UserId, UserPayload},
};

// GET /api/users
#[utoipa::path(
    get,
    path = "/api/users",
    tag = "Users",
    responses((status = 200, description = "Usuários cadastrados", body = Vec<User>)),
    security(("api_jwt" = []))
)]
pub async fn list_users(
    State(app_state): State<AppState>,
    locale: Locale,
    auth: AuthenticatedUser,
    _perm: RequirePermission<PermUsersRead>,
) -> Result<Json<Vec<User>>, ApiError> {
    let users = app_state
        .user_service
        .list_users(&auth.actor())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(users))
}

// POST /api/users
#[utoipa::path(
    post,
    path = "/api/users",
    tag = "Users",
    request_body = UserPayload,
    responses(
        (status = 201, description = "Usuário criado", body = User),
        (status = 409, description = "E-mail já cadastrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_user(
    State(app_state): State<AppState>,
    locale: Locale,
    auth: AuthenticatedUser,
    _perm: RequirePermission<PermUsersWrite>,
    Json(payload): Json<UserPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let user = app_state
        .user_service
        .create_user(&auth.actor(), payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(user)))
}

// PUT /api/users/{user_id}
#[utoipa::path(
    put,
    path = "/api/users/{user_id}",
    tag = "Users",
    request_body = UserPayload,
    responses((status = 200, description = "Usuário atualizado", body = User)),
    params(("user_id" = i64, Path, description = "ID do usuário")),
    security(("api_jwt" = []))
)]
pub async fn update_user(
    State(app_state): State<AppState>,
    locale: Locale,
    auth: AuthenticatedUser,
    _perm: RequirePermission<PermUsersWrite>,
    Path(user_id): Path<UserId>,
    Json(payload): Json<UserPayload>,
) -> Result<Json<User>, ApiError> {
    let user = app_state
        .user_service
        .update_user(&auth.actor(), user_id, payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(user))
}

// DELETE /api/users/{user_id}
#[utoipa::path(
    delete,
    path = "/api/users/{user_id}",
    tag = "Users",
    responses(
        (status = 204, description = "Usuário removido"),
        (status = 400, description = "Não é possível remover a si mesmo")
    ),
    params(("user_id" = i64, Path, description = "ID do usuário")),
    security(("api_jwt" = []))
)]
pub async fn delete_user(
    State(app_state): State<AppState>,
    locale: Locale,
    auth: AuthenticatedUser,
    _perm: RequirePermission<PermUsersWrite>,
    Path(user_id): Path<UserId>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .user_service
        .delete_user(&auth.actor(), user_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}
