// src/handlers/documents.rs

use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
};

use crate::{
    common::error::ApiError,
    config::AppState,
    middleware::{
        auth::AuthenticatedUser,
        i18n::Locale,
        rbac::{PermBatchesRead, RequirePermission},
    },
};

// GET /api/batches/{batch_id}/qr.png
#[utoipa::path(
    get,
    path = "/api/batches/{batch_id}/qr.png",
    tag = "Batches",
    responses((status = 200, description = "QR code de rastreabilidade", content_type = "image/png", body = Vec<u8>)),
    params(("batch_id" = String, Path, description = "ID do lote")),
    security(("api_jwt" = []))
)]
pub async fn batch_qr(
    State(app_state): State<AppState>,
    locale: Locale,
    auth: AuthenticatedUser,
    _perm: RequirePermission<PermBatchesRead>,
    Path(batch_id): Path<String>,
) -> Result<Response, ApiError> {
    let png = app_state
        .document_service
        .batch_qr_png(&auth.actor(), &batch_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(([(header::CONTENT_TYPE, "image/png")], png).into_response())
}

// GET /api/batches/{batch_id}/label.pdf
#[utoipa::path(
    get,
    path = "/api/batches/{batch_id}/label.pdf",
    tag = "Batches",
    responses((status = 200, description = "Etiqueta do lote em PDF", content_type = "application/pdf", body = Vec<u8>)),
    params(("batch_id" = String, Path, description = "ID do lote")),
    security(("api_jwt" = []))
)]
pub async fn batch_label(
    State(app_state): State<AppState>,
    locale: Locale,
    auth: AuthenticatedUser,
    _perm: RequirePermission<PermBatchesRead>,
    Path(batch_id): Path<String>,
) -> Result<Response, ApiError> {
    let pdf_bytes = app_state
        .document_service
        .batch_label_pdf(&auth.actor(), &batch_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    // Configura os Headers para o navegador baixar ou mostrar o PDF
    let headers = [
        (header::CONTENT_TYPE, "application/pdf".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("inline; filename=\"lote_{}.pdf\"", batch_id),
        ),
    ];

    Ok((headers, pdf_bytes).into_response())
}
