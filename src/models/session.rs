// src/models/session.rs

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{
    auth::{User, UserId},
    batches::Batch,
    checklist::OperationalTask,
    production::ProductionTask,
    rbac::ModulePermissions,
    tenancy::{ActiveSelection, BusinessUnit},
    waste::Waste,
};

/// Estado efêmero de uma sessão autenticada.
///
/// "Deslogado" é simplesmente a ausência do registro; a fase é derivada da seleção.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub id: Uuid,
    pub user_id: UserId,
    pub selection: ActiveSelection,
    pub created_at: DateTime<Utc>,
}

impl Session {
    pub fn new(user_id: UserId, selection: ActiveSelection) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            selection,
            created_at: Utc::now(),
        }
    }

    /// Sessões vivem o mesmo tempo que o token emitido para elas.
    pub fn is_expired(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        self.created_at
            .checked_add_signed(ttl)
            .is_some_and(|deadline| now > deadline)
    }

    pub fn actor(&self) -> Actor {
        Actor {
            user_id: self.user_id,
            session_id: self.id,
        }
    }

    pub fn phase(&self) -> SessionPhase {
        if self.selection.is_unset() {
            SessionPhase::AwaitingUnitSelection
        } else {
            SessionPhase::Active
        }
    }
}

/// Quem está agindo: os serviços relêem usuário e sessão a partir daqui dentro da transação.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub user_id: UserId,
    pub session_id: Uuid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionPhase {
    AwaitingUnitSelection,
    Active,
}

// O que a camada de apresentação precisa para montar menus e guardas de rota
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub user: User,
    pub phase: SessionPhase,
    #[schema(value_type = Option<String>, example = "polanco")]
    pub active_unit_id: ActiveSelection,
    pub is_super_admin: bool,
    pub can_switch_units: bool,
    pub accessible_units: Vec<BusinessUnit>,
    #[schema(value_type = Object)]
    pub permissions: ModulePermissions,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SelectUnitPayload {
    /// Id da unidade ou `"all"` para a visão global.
    #[schema(example = "prod-central")]
    pub unit_id: String,
}

/// As quatro coleções recortadas pela unidade ativa.
#[derive(Debug, Default, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FilteredData {
    pub tasks: Vec<ProductionTask>,
    pub batches: Vec<Batch>,
    pub waste_records: Vec<Waste>,
    pub operational_tasks: Vec<OperationalTask>,
}

impl FilteredData {
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
            && self.batches.is_empty()
            && self.waste_records.is_empty()
            && self.operational_tasks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::tenancy::UnitId;

    #[test]
    fn phase_follows_selection() {
        let mut session = Session::new(1, ActiveSelection::Unset);
        assert_eq!(session.phase(), SessionPhase::AwaitingUnitSelection);

        session.selection = ActiveSelection::Specific(UnitId::from("polanco"));
        assert_eq!(session.phase(), SessionPhase::Active);

        session.selection = ActiveSelection::Global;
        assert_eq!(session.phase(), SessionPhase::Active);
    }
}
