// src/middleware/auth.rs

use axum::{
    extract::{FromRef, FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    typed_header::TypedHeaderRejection,
    TypedHeader,
};

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::i18n::Locale,
    models::{
        auth::User,
        session::{Actor, Session},
    },
};

/// Usuário e sessão relidos do store a cada request.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user: User,
    pub session: Session,
}

impl AuthenticatedUser {
    pub fn actor(&self) -> Actor {
        self.session.actor()
    }
}

// O middleware em si
pub async fn auth_guard(
    State(app_state): State<AppState>,
    locale: Locale,
    bearer: Result<TypedHeader<Authorization<Bearer>>, TypedHeaderRejection>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let to_api = |e: AppError| e.to_api_error(&locale, &app_state.i18n_store);

    let TypedHeader(Authorization(bearer)) = bearer.map_err(|_| to_api(AppError::InvalidToken))?;

    let (user, session) = app_state
        .auth_service
        .validate_token(bearer.token())
        .await
        .map_err(to_api)?;

    // Insere o usuário nos "extensions" da requisição
    request
        .extensions_mut()
        .insert(AuthenticatedUser { user, session });
    Ok(next.run(request).await)
}

// Extrator para obter o usuário autenticado diretamente nos handlers
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<AuthenticatedUser>() {
            return Ok(user.clone());
        }

        let app_state = AppState::from_ref(state);
        let locale = Locale::from_request_parts(parts, state).await.unwrap_or_default();
        Err(AppError::InvalidToken.to_api_error(&locale, &app_state.i18n_store))
    }
}
