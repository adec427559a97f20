// src/models/checklist.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::models::{auth::Role, rbac::AppModule, tenancy::UnitId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum TaskFrequency {
    Diaria,
    Semanal,
    Mensual,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum ChecklistStatus {
    Pendiente,
    #[serde(rename = "En Progreso")]
    EnProgreso,
    Completado,
}

// ---
// Plantilla (admin) e tarefa operacional (instância por unidade)
// ---
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OperationalTaskTemplate {
    #[schema(example = "opt1")]
    pub id: String,
    pub name: String,
    pub description: String,
    pub frequency: TaskFrequency,
    pub assigned_role: Role,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OperationalTask {
    #[schema(example = "ot1")]
    pub id: String,
    pub template_id: String,
    pub name: String,
    pub description: String,
    pub date: DateTime<Utc>,
    pub status: ChecklistStatus,
    pub assigned_role: Role,
    pub unit_id: UnitId,
}

/// Os dois quadros de checklist: cada um mostra as tarefas de um cargo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ChecklistKind {
    Produccion,
    Servicio,
}

impl ChecklistKind {
    pub fn module(self) -> AppModule {
        match self {
            ChecklistKind::Produccion => AppModule::ProductionChecklist,
            ChecklistKind::Servicio => AppModule::ServiceChecklist,
        }
    }

    pub fn role(self) -> Role {
        match self {
            ChecklistKind::Produccion => Role::Produccion,
            ChecklistKind::Servicio => Role::Servicio,
        }
    }

    /// Quadro que exibe tarefas do cargo, se houver.
    pub fn for_role(role: Role) -> Option<Self> {
        match role {
            Role::Produccion => Some(ChecklistKind::Produccion),
            Role::Servicio => Some(ChecklistKind::Servicio),
            _ => None,
        }
    }
}

// ---
// Payloads
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TemplatePayload {
    #[validate(length(min = 1, message = "El nombre es obligatorio."))]
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub frequency: TaskFrequency,
    pub assigned_role: Role,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ChecklistStatusPayload {
    pub status: ChecklistStatus,
}
