// src/common/error.rs

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::{json, Value};
use thiserror::Error;

use crate::{
    common::i18n::I18nStore,
    middleware::i18n::Locale,
    models::rbac::{AppModule, RequiredLevel},
};

// Erros de domínio. A mensagem do `thiserror` vai para o log;
// o cliente recebe a versão traduzida via `to_api_error`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Usuário não encontrado")]
    UserNotFound,

    #[error("E-mail já existe")]
    EmailAlreadyExists,

    #[error("Sem permissão '{required}' no módulo '{module}'")]
    PermissionDenied {
        module: AppModule,
        required: RequiredLevel,
    },

    #[error("Ação exclusiva do super administrador")]
    SuperAdminRequired,

    #[error("Sessão sem unidade ativa")]
    UnitSelectionRequired,

    #[error("Ação exige uma unidade concreta")]
    ConcreteUnitRequired,

    #[error("Unidade '{0}' fora do alcance do usuário")]
    UnitNotAccessible(String),

    #[error("Visão global reservada a administradores")]
    GlobalViewNotAllowed,

    #[error("Unidade desconhecida: {0}")]
    UnknownUnit(String),

    #[error("Usuário sem unidades atribuídas")]
    EmptyUnitScope,

    #[error("Módulo protegido: {0}")]
    ProtectedModule(AppModule),

    #[error("Tentativa de excluir o próprio usuário")]
    CannotDeleteSelf,

    #[error("Receita não encontrada: {0}")]
    RecipeNotFound(String),

    #[error("Ingrediente não encontrado: {0}")]
    IngredientNotFound(String),

    #[error("Categoria não encontrada: {0}")]
    CategoryNotFound(String),

    #[error("Categoria de destino inválida")]
    InvalidCategoryTarget,

    #[error("Tarefa não encontrada: {0}")]
    TaskNotFound(String),

    #[error("Tarefa já concluída: {0}")]
    TaskAlreadyCompleted(String),

    #[error("Usuário {0} não pode receber tarefas de produção")]
    InvalidAssignee(i64),

    #[error("Lote não encontrado: {0}")]
    BatchNotFound(String),

    #[error("Tarefa operacional não encontrada: {0}")]
    OperationalTaskNotFound(String),

    #[error("Fonte não encontrada: {0}")]
    FontNotFound(String),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno do servidor: {0}")]
    InternalServerError(#[from] anyhow::Error),
}

// ---
// ApiError: o corpo de erro que vai para o cliente
// ---
#[derive(Debug, Serialize)]
pub struct ApiError {
    #[serde(skip)]
    pub status: StatusCode,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status;
        (status, Json(self)).into_response()
    }
}

impl AppError {
    /// Falha de validação de um único campo, para regras checadas fora do `validator`.
    pub fn invalid_field(field: &'static str, message: &'static str) -> Self {
        let mut error = validator::ValidationError::new("range");
        error.message = Some(message.into());
        let mut errors = validator::ValidationErrors::new();
        errors.add(field, error);
        AppError::ValidationError(errors)
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_)
            | AppError::EmptyUnitScope
            | AppError::UnknownUnit(_)
            | AppError::ProtectedModule(_)
            | AppError::InvalidCategoryTarget
            | AppError::InvalidAssignee(_)
            | AppError::CannotDeleteSelf => StatusCode::BAD_REQUEST,

            AppError::InvalidCredentials | AppError::InvalidToken | AppError::JwtError(_) => {
                StatusCode::UNAUTHORIZED
            }

            AppError::PermissionDenied { .. }
            | AppError::SuperAdminRequired
            | AppError::UnitNotAccessible(_)
            | AppError::GlobalViewNotAllowed => StatusCode::FORBIDDEN,

            AppError::UserNotFound
            | AppError::RecipeNotFound(_)
            | AppError::IngredientNotFound(_)
            | AppError::CategoryNotFound(_)
            | AppError::TaskNotFound(_)
            | AppError::BatchNotFound(_)
            | AppError::OperationalTaskNotFound(_) => StatusCode::NOT_FOUND,

            AppError::EmailAlreadyExists
            | AppError::UnitSelectionRequired
            | AppError::ConcreteUnitRequired
            | AppError::TaskAlreadyCompleted(_) => StatusCode::CONFLICT,

            AppError::FontNotFound(_) | AppError::InternalServerError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    // Chave do catálogo + argumentos para interpolação
    fn message_key(&self) -> (&'static str, Vec<(&'static str, String)>) {
        match self {
            AppError::ValidationError(_) => ("validation_failed", vec![]),
            AppError::InvalidCredentials => ("invalid_credentials", vec![]),
            AppError::InvalidToken | AppError::JwtError(_) => ("invalid_token", vec![]),
            AppError::UserNotFound => ("user_not_found", vec![]),
            AppError::EmailAlreadyExists => ("email_already_exists", vec![]),
            AppError::PermissionDenied { module, required } => (
                "permission_denied",
                vec![("module", module.to_string()), ("level", required.to_string())],
            ),
            AppError::SuperAdminRequired => ("super_admin_required", vec![]),
            AppError::UnitSelectionRequired => ("unit_selection_required", vec![]),
            AppError::ConcreteUnitRequired => ("concrete_unit_required", vec![]),
            AppError::UnitNotAccessible(id) => ("unit_not_accessible", vec![("unit", id.clone())]),
            AppError::GlobalViewNotAllowed => ("global_view_not_allowed", vec![]),
            AppError::UnknownUnit(id) => ("unknown_unit", vec![("unit", id.clone())]),
            AppError::EmptyUnitScope => ("empty_unit_scope", vec![]),
            AppError::ProtectedModule(module) => {
                ("protected_module", vec![("module", module.to_string())])
            }
            AppError::CannotDeleteSelf => ("cannot_delete_self", vec![]),
            AppError::RecipeNotFound(id) => ("recipe_not_found", vec![("id", id.clone())]),
            AppError::IngredientNotFound(id) => ("ingredient_not_found", vec![("id", id.clone())]),
            AppError::CategoryNotFound(name) => ("category_not_found", vec![("name", name.clone())]),
            AppError::InvalidCategoryTarget => ("invalid_category_target", vec![]),
            AppError::TaskNotFound(id) => ("task_not_found", vec![("id", id.clone())]),
            AppError::TaskAlreadyCompleted(id) => ("task_already_completed", vec![("id", id.clone())]),
            AppError::InvalidAssignee(id) => ("invalid_assignee", vec![("id", id.to_string())]),
            AppError::BatchNotFound(id) => ("batch_not_found", vec![("id", id.clone())]),
            AppError::OperationalTaskNotFound(id) => {
                ("operational_task_not_found", vec![("id", id.clone())])
            }
            AppError::FontNotFound(_) | AppError::InternalServerError(_) => ("internal_error", vec![]),
        }
    }

    /// Converte o erro de domínio na resposta HTTP, no idioma do cliente.
    pub fn to_api_error(&self, locale: &Locale, i18n: &I18nStore) -> ApiError {
        let status = self.status();

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            // O detalhe fica só no log
            tracing::error!("Erro Interno do Servidor: {}", self);
        }

        let (key, args) = self.message_key();
        let error = i18n.translate(&locale.0, key, &args);

        let details = match self {
            AppError::ValidationError(errors) => Some(validation_details(errors)),
            _ => None,
        };

        ApiError {
            status,
            error,
            details,
        }
    }
}

// { "campo": ["mensagem", ...] }
fn validation_details(errors: &validator::ValidationErrors) -> Value {
    let mut details = serde_json::Map::new();
    for (field, field_errors) in errors.field_errors() {
        let messages: Vec<String> = field_errors
            .iter()
            .map(|e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string())
            })
            .collect();
        details.insert(field.to_string(), json!(messages));
    }
    Value::Object(details)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_follow_error_kind() {
        assert_eq!(AppError::InvalidCredentials.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::GlobalViewNotAllowed.status(), StatusCode::FORBIDDEN);
        assert_eq!(AppError::UnitSelectionRequired.status(), StatusCode::CONFLICT);
        assert_eq!(
            AppError::BatchNotFound("B1".into()).status(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn messages_are_localized() {
        let i18n = I18nStore::new();
        let err = AppError::PermissionDenied {
            module: AppModule::Batches,
            required: RequiredLevel::Edit,
        };

        let es = err.to_api_error(&Locale("es".into()), &i18n);
        assert_eq!(es.status, StatusCode::FORBIDDEN);
        assert!(es.error.contains("lotes"));

        let en = err.to_api_error(&Locale("en".into()), &i18n);
        assert_ne!(es.error, en.error);
        assert!(en.error.contains("edit"));
    }

    #[test]
    fn single_field_errors_carry_details() {
        let i18n = I18nStore::new();
        let api = AppError::invalid_field("weekOffset", "Fuera de rango.")
            .to_api_error(&Locale("es".into()), &i18n);
        assert_eq!(api.status, StatusCode::BAD_REQUEST);
        assert_eq!(api.details, Some(json!({ "weekOffset": ["Fuera de rango."] })));
    }

    #[test]
    fn internal_errors_hide_details() {
        let i18n = I18nStore::new();
        let err = AppError::InternalServerError(anyhow::anyhow!("lock poisoned at line 42"));
        let api = err.to_api_error(&Locale("en".into()), &i18n);
        assert!(!api.error.contains("line 42"));
    }
}
