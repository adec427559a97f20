// src/models/rbac.rs

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use utoipa::ToSchema;

use crate::models::auth::Role;

// ---
// 1. AppModule: as áreas do sistema que recebem permissão
// ---
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema)]
pub enum AppModule {
    #[serde(rename = "recetas")]
    Recipes,
    #[serde(rename = "calculadora")]
    Calculator,
    #[serde(rename = "produccion")]
    Production,
    #[serde(rename = "resumen-semanal")]
    WeeklySummary,
    #[serde(rename = "lotes")]
    Batches,
    #[serde(rename = "mermas")]
    Waste,
    #[serde(rename = "checklist_produccion")]
    ProductionChecklist,
    #[serde(rename = "checklist_servicio")]
    ServiceChecklist,
    #[serde(rename = "admin_usuarios")]
    AdminUsers,
    #[serde(rename = "admin_ingredientes_y_categorias")]
    AdminIngredients,
    #[serde(rename = "admin_tareas_operativas")]
    AdminTaskTemplates,
    #[serde(rename = "admin_reportes")]
    AdminReports,
    #[serde(rename = "admin_permisos")]
    AdminPermissions,
}

impl AppModule {
    pub const ALL: [AppModule; 13] = [
        AppModule::Recipes,
        AppModule::Calculator,
        AppModule::Production,
        AppModule::WeeklySummary,
        AppModule::Batches,
        AppModule::Waste,
        AppModule::ProductionChecklist,
        AppModule::ServiceChecklist,
        AppModule::AdminUsers,
        AppModule::AdminIngredients,
        AppModule::AdminTaskTemplates,
        AppModule::AdminReports,
        AppModule::AdminPermissions,
    ];

    pub fn slug(self) -> &'static str {
        match self {
            AppModule::Recipes => "recetas",
            AppModule::Calculator => "calculadora",
            AppModule::Production => "produccion",
            AppModule::WeeklySummary => "resumen-semanal",
            AppModule::Batches => "lotes",
            AppModule::Waste => "mermas",
            AppModule::ProductionChecklist => "checklist_produccion",
            AppModule::ServiceChecklist => "checklist_servicio",
            AppModule::AdminUsers => "admin_usuarios",
            AppModule::AdminIngredients => "admin_ingredientes_y_categorias",
            AppModule::AdminTaskTemplates => "admin_tareas_operativas",
            AppModule::AdminReports => "admin_reportes",
            AppModule::AdminPermissions => "admin_permisos",
        }
    }

    /// Nome exibido na tela de gestão de permissões.
    pub fn display_name(self) -> &'static str {
        match self {
            AppModule::Recipes => "Recetario",
            AppModule::Calculator => "Calculadora de Recetas",
            AppModule::Production => "Plan de Producción (Mi Día)",
            AppModule::WeeklySummary => "Resumen Semanal",
            AppModule::Batches => "Lotes",
            AppModule::Waste => "Registro y Reporte de Mermas",
            AppModule::ProductionChecklist => "Checklist (Producción)",
            AppModule::ServiceChecklist => "Checklist (Servicio)",
            AppModule::AdminUsers => "Gestión de Usuarios",
            AppModule::AdminIngredients => "Ingredientes y Categorías",
            AppModule::AdminTaskTemplates => "Tareas Operativas (Admin)",
            AppModule::AdminReports => "Reportes",
            AppModule::AdminPermissions => "Gestión de Permisos",
        }
    }

    /// A própria tela de permissões nunca é oferecida como alvo editável.
    pub fn is_editable_target(self) -> bool {
        self != AppModule::AdminPermissions
    }
}

impl fmt::Display for AppModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

// ---
// 2. PermissionLevel: none < view < edit
// ---
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PermissionLevel {
    #[default]
    None,
    View,
    Edit,
}

/// O nível exigido por uma rota ou ação. Só existem duas exigências possíveis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum RequiredLevel {
    View,
    Edit,
}

impl PermissionLevel {
    pub fn allows(self, required: RequiredLevel) -> bool {
        match required {
            RequiredLevel::View => matches!(self, PermissionLevel::View | PermissionLevel::Edit),
            RequiredLevel::Edit => self == PermissionLevel::Edit,
        }
    }
}

impl fmt::Display for RequiredLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequiredLevel::View => f.write_str("view"),
            RequiredLevel::Edit => f.write_str("edit"),
        }
    }
}

pub type ModulePermissions = BTreeMap<AppModule, PermissionLevel>;

// ---
// 3. RolePermissions: a tabela de permissões padrão de cada cargo
// ---
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
#[schema(value_type = Object)]
pub struct RolePermissions(BTreeMap<Role, ModulePermissions>);

impl RolePermissions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Entradas ausentes valem `none`.
    pub fn level(&self, role: Role, module: AppModule) -> PermissionLevel {
        self.0
            .get(&role)
            .and_then(|modules| modules.get(&module))
            .copied()
            .unwrap_or_default()
    }

    pub fn set(&mut self, role: Role, module: AppModule, level: PermissionLevel) {
        self.0.entry(role).or_default().insert(module, level);
    }

    pub fn with(mut self, role: Role, entries: &[(AppModule, PermissionLevel)]) -> Self {
        for (module, level) in entries {
            self.set(role, *module, *level);
        }
        self
    }
}

// ---
// 4. Payloads e respostas
// ---
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRolePermissionPayload {
    pub role: Role,
    pub module: AppModule,
    pub level: PermissionLevel,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ModuleInfo {
    pub module: AppModule,
    #[schema(example = "Lotes")]
    pub name: String,
}

impl From<AppModule> for ModuleInfo {
    fn from(module: AppModule) -> Self {
        Self {
            module,
            name: module.display_name().to_string(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RolePermissionsResponse {
    pub roles: RolePermissions,
    pub editable_modules: Vec<ModuleInfo>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_are_ordered() {
        assert!(PermissionLevel::None < PermissionLevel::View);
        assert!(PermissionLevel::View < PermissionLevel::Edit);
    }

    #[test]
    fn edit_implies_view() {
        for level in [PermissionLevel::None, PermissionLevel::View, PermissionLevel::Edit] {
            if level.allows(RequiredLevel::Edit) {
                assert!(level.allows(RequiredLevel::View));
            }
        }
        assert!(!PermissionLevel::None.allows(RequiredLevel::View));
        assert!(!PermissionLevel::View.allows(RequiredLevel::Edit));
    }

    #[test]
    fn missing_entries_default_to_none() {
        let table = RolePermissions::new().with(Role::Servicio, &[(AppModule::Waste, PermissionLevel::Edit)]);
        assert_eq!(table.level(Role::Servicio, AppModule::Waste), PermissionLevel::Edit);
        assert_eq!(table.level(Role::Servicio, AppModule::Batches), PermissionLevel::None);
        assert_eq!(table.level(Role::Cocina, AppModule::Waste), PermissionLevel::None);
    }

    #[test]
    fn modules_use_slugs_on_the_wire() {
        assert_eq!(
            serde_json::to_string(&AppModule::WeeklySummary).unwrap(),
            r#""resumen-semanal""#
        );
        let module: AppModule = serde_json::from_str(r#""admin_permisos""#).unwrap();
        assert!(!module.is_editable_target());
        assert!(serde_json::from_str::<PermissionLevel>(r#""admin""#).is_err());
    }
}
