// src/handlers/rbac.rs

use axum::{extract::State, Json};

use crate::{
    common::error::ApiError,
    config::AppState,
    middleware::{auth::AuthenticatedUser, i18n::Locale, rbac::RequireSuperAdmin},
    models::rbac::{RolePermissions, RolePermissionsResponse, UpdateRolePermissionPayload},
};

// GET /api/permissions
#[utoipa::path(
    get,
    path = "/api/permissions",
    tag = "RBAC",
    responses(
        (status = 200, description = "Tabela de permissões por cargo", body = RolePermissionsResponse),
        (status = 403, description = "Apenas o super admin")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_role_permissions(
    State(app_state): State<AppState>,
    locale: Locale,
    auth: AuthenticatedUser,
    _guard: RequireSuperAdmin,
) -> Result<Json<RolePermissionsResponse>, ApiError> {
    let response = app_state
        .rbac_service
        .get_role_permissions(&auth.actor())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(response))
}

// PUT /api/permissions
#[utoipa::path(
    put,
    path = "/api/permissions",
    tag = "RBAC",
    request_body = UpdateRolePermissionPayload,
    responses(
        (status = 200, description = "Tabela atualizada", body = RolePermissions),
        (status = 400, description = "Módulo protegido")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_role_permission(
    State(app_state): State<AppState>,
    locale: Locale,
    auth: AuthenticatedUser,
    _guard: RequireSuperAdmin,
    Json(payload): Json<UpdateRolePermissionPayload>,
) -> Result<Json<RolePermissions>, ApiError> {
    let table = app_state
        .rbac_service
        .update_role_permission(&auth.actor(), payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(table))
}
