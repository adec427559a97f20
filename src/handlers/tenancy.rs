// src/handlers/tenancy.rs

use axum::{extract::State, Json};

use crate::{config::AppState, models::tenancy::BusinessUnit};

// GET /api/units
#[utoipa::path(
    get,
    path = "/api/units",
    tag = "Tenancy",
    responses((status = 200, description = "Unidades de negócio", body = Vec<BusinessUnit>))
)]
pub async fn list_units(State(app_state): State<AppState>) -> Json<Vec<BusinessUnit>> {
    Json(app_state.tenant_service.list_units().await)
}
