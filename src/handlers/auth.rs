// src/handlers/auth.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{auth::AuthenticatedUser, i18n::Locale},
    models::{
        auth::{AuthResponse, LoginUserPayload},
        session::{FilteredData, SelectUnitPayload, SessionView},
    },
};

// POST /api/auth/login
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Auth",
    request_body = LoginUserPayload,
    responses(
        (status = 200, description = "Sessão criada", body = AuthResponse),
        (status = 401, description = "Credenciais inválidas")
    )
)]
pub async fn login(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<LoginUserPayload>,
) -> Result<Json<AuthResponse>, ApiError> {
    // E-mail malformado cai no mesmo 401 de um e-mail desconhecido
    payload
        .validate()
        .map_err(|_| AppError::InvalidCredentials.to_api_error(&locale, &app_state.i18n_store))?;

    let response = app_state
        .auth_service
        .login_user(&payload.email)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(response))
}

// POST /api/auth/logout
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    tag = "Auth",
    responses((status = 204, description = "Sessão encerrada")),
    security(("api_jwt" = []))
)]
pub async fn logout(
    State(app_state): State<AppState>,
    locale: Locale,
    auth: AuthenticatedUser,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .auth_service
        .logout_user(&auth.actor())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}

// GET /api/session
#[utoipa::path(
    get,
    path = "/api/session",
    tag = "Session",
    responses((status = 200, description = "Estado da sessão", body = SessionView)),
    security(("api_jwt" = []))
)]
pub async fn get_session(
    State(app_state): State<AppState>,
    locale: Locale,
    auth: AuthenticatedUser,
) -> Result<Json<SessionView>, ApiError> {
    let view = app_state
        .auth_service
        .session_view(&auth.actor())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(view))
}

// PUT /api/session/unit
#[utoipa::path(
    put,
    path = "/api/session/unit",
    tag = "Session",
    request_body = SelectUnitPayload,
    responses(
        (status = 200, description = "Unidade ativa atualizada", body = SessionView),
        (status = 403, description = "Unidade fora do escopo do usuário")
    ),
    security(("api_jwt" = []))
)]
pub async fn select_unit(
    State(app_state): State<AppState>,
    locale: Locale,
    auth: AuthenticatedUser,
    Json(payload): Json<SelectUnitPayload>,
) -> Result<Json<SessionView>, ApiError> {
    let view = app_state
        .auth_service
        .select_unit(&auth.actor(), &payload.unit_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(view))
}

// GET /api/session/data
#[utoipa::path(
    get,
    path = "/api/session/data",
    tag = "Session",
    responses(
        (status = 200, description = "Coleções recortadas pela unidade ativa", body = FilteredData),
        (status = 409, description = "Nenhuma unidade selecionada")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_filtered_data(
    State(app_state): State<AppState>,
    locale: Locale,
    auth: AuthenticatedUser,
) -> Result<Json<FilteredData>, ApiError> {
    let data = app_state
        .auth_service
        .filtered_data(&auth.actor())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(data))
}
