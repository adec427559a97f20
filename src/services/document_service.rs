// src/services/document_service.rs

use genpdf::{elements, style, Element};
use image::{DynamicImage, ImageOutputFormat, Luma};
use qrcode::QrCode;
use serde_json::json;

use crate::{
    common::error::AppError,
    models::{batches::Batch, session::Actor},
    services::batch_service::BatchService,
};

// Família carregada de `<fonts_dir>/Roboto-{Regular,Bold,Italic,BoldItalic}.ttf`
const LABEL_FONT_FAMILY: &str = "Roboto";

/// Conteúdo do QR da etiqueta: o suficiente para rastrear o lote sem consultar o sistema.
pub fn traceability_payload(batch: &Batch) -> String {
    json!({
        "batchId": batch.id,
        "recipeId": batch.recipe_id,
        "recipeName": batch.recipe_name,
        "unitId": batch.unit_id,
        "productionDate": batch.production_date.to_rfc3339(),
        "expiryDate": batch.expiry_date().to_rfc3339(),
        "quantity": format!("{} {}", batch.quantity, batch.unit),
    })
    .to_string()
}

fn qr_image(batch: &Batch) -> Result<DynamicImage, AppError> {
    let code = QrCode::new(traceability_payload(batch).as_bytes())
        .map_err(|e| AppError::InternalServerError(anyhow::Error::msg(e.to_string())))?;

    let image_buffer = code.render::<Luma<u8>>().min_dimensions(240, 240).build();
    Ok(DynamicImage::ImageLuma8(image_buffer))
}

#[derive(Clone)]
pub struct DocumentService {
    batch_service: BatchService,
    fonts_dir: String,
}

impl DocumentService {
    pub fn new(batch_service: BatchService, fonts_dir: String) -> Self {
        Self {
            batch_service,
            fonts_dir,
        }
    }

    /// QR code do lote em PNG.
    pub async fn batch_qr_png(&self, actor: &Actor, batch_id: &str) -> Result<Vec<u8>, AppError> {
        let batch = self.batch_service.label_batch(actor, batch_id).await?;

        let mut buffer = Vec::new();
        qr_image(&batch)?
            .write_to(&mut buffer, ImageOutputFormat::Png)
            .map_err(|e| AppError::InternalServerError(anyhow::Error::msg(e.to_string())))?;
        Ok(buffer)
    }

    /// Etiqueta imprimível do lote em PDF.
    pub async fn batch_label_pdf(&self, actor: &Actor, batch_id: &str) -> Result<Vec<u8>, AppError> {
        let batch = self.batch_service.label_batch(actor, batch_id).await?;

        let font_family = genpdf::fonts::from_files(&self.fonts_dir, LABEL_FONT_FAMILY, None)
            .map_err(|_| AppError::FontNotFound(format!("Fonte não encontrada na pasta {}", self.fonts_dir)))?;

        let mut doc = genpdf::Document::new(font_family);
        doc.set_title(format!("Lote {}", batch.id));
        let mut decorator = genpdf::SimplePageDecorator::new();
        decorator.set_margins(10);
        doc.set_page_decorator(decorator);

        doc.push(
            elements::Paragraph::new(batch.recipe_name.clone())
                .styled(style::Style::new().bold().with_font_size(18)),
        );
        doc.push(
            elements::Paragraph::new(format!("LOTE {}", batch.id))
                .styled(style::Style::new().bold().with_font_size(12)),
        );
        doc.push(elements::Break::new(1.5));

        let mut table = elements::TableLayout::new(vec![2, 3]);
        table.set_cell_decorator(elements::FrameCellDecorator::new(true, true, false));

        let style_bold = style::Style::new().bold();
        let rows = [
            ("Producido", batch.production_date.format("%d/%m/%Y %H:%M").to_string()),
            ("Caduca", batch.expiry_date().format("%d/%m/%Y %H:%M").to_string()),
            ("Cantidad", format!("{:.2} {}", batch.quantity, batch.unit)),
            ("Responsable", batch.responsible_user.clone()),
            ("Unidad", batch.unit_id.to_string()),
        ];
        for (label, value) in rows {
            table
                .row()
                .element(elements::Paragraph::new(label).styled(style_bold))
                .element(elements::Paragraph::new(value))
                .push()
                .map_err(|e| AppError::InternalServerError(anyhow::Error::msg(e.to_string())))?;
        }
        doc.push(table);
        doc.push(elements::Break::new(1.5));

        let pdf_image = elements::Image::from_dynamic_image(qr_image(&batch)?)
            .map_err(|e| AppError::InternalServerError(anyhow::Error::msg(e.to_string())))?
            .with_scale(genpdf::Scale::new(0.5, 0.5));
        doc.push(pdf_image);

        if let Some(notes) = &batch.notes {
            doc.push(elements::Break::new(1));
            doc.push(elements::Paragraph::new(notes.clone()).styled(style::Style::new().italic().with_font_size(8)));
        }

        let mut buffer = Vec::new();
        doc.render(&mut buffer)
            .map_err(|e| AppError::InternalServerError(anyhow::Error::msg(e.to_string())))?;

        tracing::info!("🏷️ Etiqueta do lote {} gerada", batch.id);
        Ok(buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{seed::demo_tables, CatalogRepository, ProductionRepository, SessionRepository, Store};
    use crate::models::{session::Session, tenancy::ActiveSelection};

    async fn setup(fonts_dir: &str) -> (DocumentService, Actor) {
        let store = Store::new(demo_tables());
        let actor = {
            let mut tx = store.begin().await;
            SessionRepository::new()
                .insert(&mut tx, Session::new(1, ActiveSelection::Global))
                .actor()
        };
        let batches = BatchService::new(ProductionRepository::new(), CatalogRepository::new(), store);
        (DocumentService::new(batches, fonts_dir.into()), actor)
    }

    #[test]
    fn payload_carries_batch_identity() {
        let batch = demo_tables().batches.remove(0);
        let payload: serde_json::Value = serde_json::from_str(&traceability_payload(&batch)).unwrap();
        assert_eq!(payload["batchId"], "B1721249501");
        assert_eq!(payload["unitId"], "prod-central");
    }

    #[tokio::test]
    async fn qr_is_a_png() {
        let (service, actor) = setup("./fonts").await;
        let png = service.batch_qr_png(&actor, "B1721249501").await.unwrap();
        assert_eq!(&png[..4], b"\x89PNG");
    }

    #[tokio::test]
    async fn missing_fonts_are_reported() {
        let (service, actor) = setup("/nonexistent/fonts").await;
        assert!(matches!(
            service.batch_label_pdf(&actor, "B1721249501").await,
            Err(AppError::FontNotFound(_))
        ));
    }
}
