// src/middleware/rbac.rs

use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use std::marker::PhantomData;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{auth::AuthenticatedUser, i18n::Locale},
    models::rbac::{AppModule, RequiredLevel},
    services::{rbac_service::has_permission, tenancy_service::is_super_admin},
};

/// 1. O Trait que define o que é uma Permissão
pub trait PermissionDef: Send + Sync + 'static {
    fn module() -> AppModule;
    fn level() -> RequiredLevel;
}

/// 2. O Extractor (Guardião)
///
/// Barra o request antes do handler. Os serviços conferem de novo dentro da transação.
pub struct RequirePermission<T>(pub PhantomData<T>);

impl<T, S> FromRequestParts<S> for RequirePermission<T>
where
    T: PermissionDef,
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);
        let locale = Locale::from_request_parts(parts, state).await.unwrap_or_default();

        // A. Extrai Usuário
        let auth = AuthenticatedUser::from_request_parts(parts, state).await?;

        // B. Verifica contra a tabela de cargos atual
        let (module, required) = (T::module(), T::level());
        let allowed = {
            let tx = app_state.store.read().await;
            has_permission(Some(&auth.user), module, required, &tx.role_permissions)
        };

        if !allowed {
            return Err(AppError::PermissionDenied { module, required }
                .to_api_error(&locale, &app_state.i18n_store));
        }

        Ok(RequirePermission(PhantomData))
    }
}

/// Só para o super admin (tela de permissões).
pub struct RequireSuperAdmin;

impl<S> FromRequestParts<S> for RequireSuperAdmin
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);
        let locale = Locale::from_request_parts(parts, state).await.unwrap_or_default();
        let auth = AuthenticatedUser::from_request_parts(parts, state).await?;

        if !is_super_admin(&auth.user) {
            return Err(AppError::SuperAdminRequired.to_api_error(&locale, &app_state.i18n_store));
        }
        Ok(RequireSuperAdmin)
    }
}

// ---
// DEFINIÇÃO DAS PERMISSÕES (TIPOS)
// ---
macro_rules! permission {
    ($name:ident, $module:ident, $level:ident) => {
        pub struct $name;
        impl PermissionDef for $name {
            fn module() -> AppModule {
                AppModule::$module
            }
            fn level() -> RequiredLevel {
                RequiredLevel::$level
            }
        }
    };
}

permission!(PermRecipesRead, Recipes, View);
permission!(PermRecipesWrite, Recipes, Edit);
permission!(PermCalculatorRead, Calculator, View);
permission!(PermProductionRead, Production, View);
permission!(PermProductionWrite, Production, Edit);
permission!(PermWeeklySummaryRead, WeeklySummary, View);
permission!(PermBatchesRead, Batches, View);
permission!(PermBatchesWrite, Batches, Edit);
permission!(PermWasteRead, Waste, View);
permission!(PermWasteWrite, Waste, Edit);
permission!(PermUsersRead, AdminUsers, View);
permission!(PermUsersWrite, AdminUsers, Edit);
permission!(PermIngredientsRead, AdminIngredients, View);
permission!(PermIngredientsWrite, AdminIngredients, Edit);
permission!(PermTemplatesRead, AdminTaskTemplates, View);
permission!(PermTemplatesWrite, AdminTaskTemplates, Edit);
permission!(PermReportsRead, AdminReports, View);
