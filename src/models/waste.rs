// src/models/waste.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::models::{recipes::validate_positive, tenancy::UnitId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema)]
pub enum WasteType {
    #[serde(rename = "Preparación", alias = "Preparacion")]
    Preparacion,
    Porcionado,
    Caducidad,
    #[serde(rename = "Sobreproducción", alias = "Sobreproduccion")]
    Sobreproduccion,
    Otro,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Waste {
    #[schema(example = "W1721310001")]
    pub id: String,
    pub date: DateTime<Utc>,
    pub unit_id: UnitId,
    #[serde(rename = "type")]
    pub waste_type: WasteType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub related_recipe_or_batch_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub related_recipe_or_batch_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[schema(value_type = f64, example = 1.5)]
    pub quantity: Decimal,
    pub unit: String,
    pub responsible_user: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LogWastePayload {
    /// Se ausente, a unidade ativa da sessão.
    #[schema(value_type = Option<String>)]
    pub unit_id: Option<UnitId>,

    #[serde(rename = "type")]
    pub waste_type: WasteType,

    pub related_recipe_or_batch_id: Option<String>,
    pub related_recipe_or_batch_name: Option<String>,
    pub description: Option<String>,

    #[validate(custom(function = "validate_positive"))]
    #[schema(value_type = f64, example = 1.5)]
    pub quantity: Decimal,

    #[validate(length(min = 1, message = "La unidad de medida es obligatoria."))]
    pub unit: String,
}

// ---
// Relatório semanal
// ---
#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct WasteReportQuery {
    /// 0 = semana atual, -1 = anterior, ...
    #[serde(default)]
    pub week_offset: i64,
}

/// Contagem de registros e totais por unidade de medida.
#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WasteSummary {
    pub count: usize,
    #[schema(value_type = Object)]
    pub quantities: BTreeMap<String, Decimal>,
}

impl WasteSummary {
    pub fn add(&mut self, record: &Waste) {
        self.count += 1;
        let total = self.quantities.entry(record.unit.clone()).or_default();
        *total = total.saturating_add(record.quantity);
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UnitWasteSummary {
    pub unit_id: UnitId,
    pub unit_name: String,
    #[serde(flatten)]
    pub summary: WasteSummary,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WasteReport {
    pub week_start: NaiveDate,
    pub week_end: NaiveDate,
    pub records: Vec<Waste>,
    #[schema(value_type = Object)]
    pub by_type: BTreeMap<WasteType, WasteSummary>,
    pub by_unit: Vec<UnitWasteSummary>,
    #[schema(value_type = Object)]
    pub totals: BTreeMap<String, Decimal>,
}
