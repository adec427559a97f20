// src/models/reports.rs

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::models::batches::Batch;

// Período do resumo semanal de produção
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SummaryPeriod {
    #[default]
    ThisWeek,
    LastMonth,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SummaryQuery {
    #[serde(default)]
    #[param(value_type = Option<String>, example = "this_week")]
    pub period: SummaryPeriod,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WeeklySummary {
    pub period: SummaryPeriod,
    pub batches: Vec<Batch>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductionByRecipe {
    #[schema(example = "Salsa Roja Clásica")]
    pub recipe_name: String,
    #[schema(value_type = f64)]
    pub total_quantity: Decimal,
}
