// src/models/auth.rs

use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::rbac::{AppModule, ModulePermissions, PermissionLevel};
use crate::models::session::SessionView;
use crate::models::tenancy::UnitScope;

pub type UserId = i64;

// ---
// 1. Role (Cargo fixo do sistema)
// ---
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema)]
pub enum Role {
    Admin,
    #[serde(rename = "Producción", alias = "Produccion")]
    Produccion,
    Servicio,
    Cocina,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::Admin, Role::Produccion, Role::Servicio, Role::Cocina];
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Role::Admin => "Admin",
            Role::Produccion => "Producción",
            Role::Servicio => "Servicio",
            Role::Cocina => "Cocina",
        };
        f.write_str(name)
    }
}

// ---
// 2. User
// ---
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[schema(example = 5)]
    pub id: UserId,
    #[schema(example = "Ana (Producción)")]
    pub name: String,
    #[schema(example = "ana@kitchen.com")]
    pub email: String,
    pub role: Role,
    #[schema(value_type = Vec<String>)]
    pub accessible_unit_ids: UnitScope,
    // Esparso: módulos ausentes caem no padrão do cargo
    #[serde(default, skip_serializing_if = "ModulePermissions::is_empty")]
    #[schema(value_type = Object)]
    pub permission_overrides: ModulePermissions,
}

impl User {
    pub fn new(id: UserId, name: &str, email: &str, role: Role, scope: UnitScope) -> Self {
        Self {
            id,
            name: name.to_string(),
            email: email.to_string(),
            role,
            accessible_unit_ids: scope,
            permission_overrides: ModulePermissions::new(),
        }
    }

    pub fn with_override(mut self, module: AppModule, level: PermissionLevel) -> Self {
        self.permission_overrides.insert(module, level);
        self
    }
}

// ---
// 3. Payloads
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginUserPayload {
    #[validate(email(message = "El correo proporcionado no es válido."))]
    #[schema(example = "ana@kitchen.com")]
    pub email: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserPayload {
    #[validate(length(min = 1, message = "El nombre no puede estar vacío."))]
    pub name: String,

    #[validate(email(message = "El correo proporcionado no es válido."))]
    pub email: String,

    pub role: Role,

    #[schema(value_type = Vec<String>)]
    pub accessible_unit_ids: UnitScope,

    #[serde(default)]
    #[schema(value_type = Object)]
    pub permission_overrides: ModulePermissions,
}

// Resposta de autenticação com o token
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub token: String,
    pub session: SessionView,
}

// Estrutura de dados ("claims") dentro do JWT
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: UserId, // Subject (ID do usuário)
    pub sid: Uuid,   // ID da sessão em memória
    pub exp: usize,
    pub iat: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_uses_spanish_labels_on_the_wire() {
        assert_eq!(serde_json::to_string(&Role::Produccion).unwrap(), r#""Producción""#);
        let role: Role = serde_json::from_str(r#""Produccion""#).unwrap();
        assert_eq!(role, Role::Produccion);
    }

    #[test]
    fn user_without_overrides_deserializes() {
        let user: User = serde_json::from_str(
            r#"{"id":3,"name":"Servicio Polanco","email":"servicio.polanco@kitchen.com","role":"Servicio","accessibleUnitIds":["polanco"]}"#,
        )
        .unwrap();
        assert!(user.permission_overrides.is_empty());
        assert_eq!(user.accessible_unit_ids, UnitScope::units(["polanco"]));
    }
}
