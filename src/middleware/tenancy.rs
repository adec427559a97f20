// src/middleware/tenancy.rs

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{auth::AuthenticatedUser, i18n::Locale},
    models::session::SessionPhase,
};

// Rotas com dados por unidade só respondem com uma seleção ativa (unidade ou visão global).
// Roda depois do `auth_guard`.
pub async fn unit_guard(
    State(app_state): State<AppState>,
    locale: Locale,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let phase = request
        .extensions()
        .get::<AuthenticatedUser>()
        .map(|auth| auth.session.phase());

    match phase {
        Some(SessionPhase::Active) => Ok(next.run(request).await),
        Some(SessionPhase::AwaitingUnitSelection) => {
            Err(AppError::UnitSelectionRequired.to_api_error(&locale, &app_state.i18n_store))
        }
        None => Err(AppError::InvalidToken.to_api_error(&locale, &app_state.i18n_store)),
    }
}
