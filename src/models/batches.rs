// src/models/batches.rs

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{production::ProductionTask, recipes::Recipe, tenancy::UnitId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum BatchStatus {
    Activo,
    Caducado,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Batch {
    #[schema(example = "B1721249501")]
    pub id: String,
    pub recipe_id: String,
    pub recipe_name: String,
    pub production_date: DateTime<Utc>,
    pub responsible_user: String,
    pub shelf_life_days: u32,
    #[schema(value_type = f64, example = 10.0)]
    pub quantity: Decimal,
    pub unit: String,
    pub status: BatchStatus,
    pub duration_seconds: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_task_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub unit_id: UnitId,
}

impl Batch {
    /// Satura no fim do calendário em vez de estourar.
    pub fn expiry_date(&self) -> DateTime<Utc> {
        self.production_date
            .checked_add_signed(Duration::days(i64::from(self.shelf_life_days)))
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }

    /// Vencido após a data de validade; "perto de vencer" com menos de 24h restantes.
    pub fn expiry_state(&self, now: DateTime<Utc>) -> ExpiryState {
        let expiry = self.expiry_date();
        if now > expiry {
            ExpiryState::Expired
        } else if expiry - now < Duration::hours(24) {
            ExpiryState::NearingExpiry
        } else {
            ExpiryState::Fresh
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum ExpiryState {
    Fresh,
    NearingExpiry,
    Expired,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BatchDetail {
    pub batch: Batch,
    pub expiry_date: DateTime<Utc>,
    pub expiry_state: ExpiryState,
    pub source_task: Option<ProductionTask>,
    pub recipe: Option<Recipe>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct BatchNotePayload {
    #[schema(example = "Revisar tiempo en parrilla.")]
    pub note: String,
}
