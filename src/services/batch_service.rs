// src/services/batch_service.rs

use chrono::Utc;

use crate::{
    common::error::AppError,
    db::{CatalogRepository, ProductionRepository, Store, Tables},
    models::{
        auth::User,
        batches::{Batch, BatchDetail},
        rbac::{AppModule, RequiredLevel},
        session::{Actor, Session},
    },
    services::{rbac_service::ensure_permission, scope_service},
};

#[derive(Clone)]
pub struct BatchService {
    production_repo: ProductionRepository,
    catalog_repo: CatalogRepository,
    store: Store,
}

impl BatchService {
    pub fn new(production_repo: ProductionRepository, catalog_repo: CatalogRepository, store: Store) -> Self {
        Self {
            production_repo,
            catalog_repo,
            store,
        }
    }

    /// Lotes da unidade ativa, mais recentes primeiro.
    pub async fn list_batches(&self, actor: &Actor) -> Result<Vec<Batch>, AppError> {
        let tx = self.store.read().await;
        let (user, session) = ensure_permission(&tx, actor, AppModule::Batches, RequiredLevel::View)?;

        let mut batches = scope_service::scope(
            self.production_repo.list_batches(&tx),
            Some(&user),
            &session.selection,
        );
        batches.sort_by(|a, b| b.production_date.cmp(&a.production_date));
        Ok(batches)
    }

    pub async fn get_batch(&self, actor: &Actor, id: &str) -> Result<BatchDetail, AppError> {
        let tx = self.store.read().await;
        let (user, session) = ensure_permission(&tx, actor, AppModule::Batches, RequiredLevel::View)?;
        let batch = scoped_batch(&tx, &user, &session, id)?.clone();

        let source_task = batch
            .source_task_id
            .as_deref()
            .and_then(|task_id| self.production_repo.find_task(&tx, task_id))
            .cloned();
        let recipe = self.catalog_repo.find_recipe(&tx, &batch.recipe_id).cloned();

        Ok(BatchDetail {
            expiry_date: batch.expiry_date(),
            expiry_state: batch.expiry_state(Utc::now()),
            batch,
            source_task,
            recipe,
        })
    }

    /// Nota vazia apaga a nota existente.
    pub async fn save_note(&self, actor: &Actor, id: &str, note: &str) -> Result<Batch, AppError> {
        let mut tx = self.store.begin().await;
        let (user, session) = ensure_permission(&tx, actor, AppModule::Batches, RequiredLevel::Edit)?;
        scoped_batch(&tx, &user, &session, id)?;

        let batch = self.production_repo.find_batch_mut(&mut tx, id)?;
        let note = note.trim();
        batch.notes = (!note.is_empty()).then(|| note.to_string());

        tracing::info!("📝 Nota do lote {} atualizada por {}", batch.id, user.email);
        Ok(batch.clone())
    }

    /// Lote visível para a etiqueta (QR / PDF).
    pub async fn label_batch(&self, actor: &Actor, id: &str) -> Result<Batch, AppError> {
        let tx = self.store.read().await;
        let (user, session) = ensure_permission(&tx, actor, AppModule::Batches, RequiredLevel::View)?;
        Ok(scoped_batch(&tx, &user, &session, id)?.clone())
    }
}

fn scoped_batch<'t>(tx: &'t Tables, user: &User, session: &Session, id: &str) -> Result<&'t Batch, AppError> {
    tx.batches
        .iter()
        .find(|b| b.id == id)
        .filter(|b| scope_service::in_scope(*b, Some(user), &session.selection))
        .ok_or_else(|| AppError::BatchNotFound(id.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{seed::demo_tables, SessionRepository};
    use crate::models::{
        batches::ExpiryState,
        tenancy::{ActiveSelection, UnitId},
    };

    async fn setup(user_id: i64, selection: ActiveSelection) -> (BatchService, Actor) {
        let store = Store::new(demo_tables());
        let actor = {
            let mut tx = store.begin().await;
            SessionRepository::new()
                .insert(&mut tx, Session::new(user_id, selection))
                .actor()
        };
        let service = BatchService::new(ProductionRepository::new(), CatalogRepository::new(), store);
        (service, actor)
    }

    #[tokio::test]
    async fn lists_scoped_batches_newest_first() {
        let (service, root) = setup(1, ActiveSelection::Global).await;
        let batches = service.list_batches(&root).await.unwrap();
        assert_eq!(batches.len(), 3);
        assert!(batches
            .windows(2)
            .all(|pair| pair[0].production_date >= pair[1].production_date));

        let (service, ana) = setup(5, ActiveSelection::Specific(UnitId::from("prod-central"))).await;
        assert_eq!(service.list_batches(&ana).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn detail_links_task_and_recipe() {
        let (service, ana) = setup(5, ActiveSelection::Specific(UnitId::from("prod-central"))).await;
        let detail = service.get_batch(&ana, "B1721249501").await.unwrap();
        assert_eq!(detail.source_task.unwrap().id, "task1");
        assert_eq!(detail.recipe.unwrap().id, "salsa-roja");
        assert_eq!(detail.expiry_state, ExpiryState::Fresh);

        // Lote de Polanco fica fora do escopo
        assert!(matches!(
            service.get_batch(&ana, "B1721076701").await,
            Err(AppError::BatchNotFound(_))
        ));
    }

    #[tokio::test]
    async fn notes_require_edit() {
        let (service, ana) = setup(5, ActiveSelection::Specific(UnitId::from("prod-central"))).await;
        assert!(matches!(
            service.save_note(&ana, "B1721249501", "Bien").await,
            Err(AppError::PermissionDenied { .. })
        ));

        let (service, root) = setup(1, ActiveSelection::Global).await;
        let batch = service.save_note(&root, "B1721249501", "  Bien sazonada ").await.unwrap();
        assert_eq!(batch.notes.as_deref(), Some("Bien sazonada"));
        let batch = service.save_note(&root, "B1721249501", " ").await.unwrap();
        assert_eq!(batch.notes, None);
    }

    #[tokio::test]
    async fn marketing_override_hides_batches() {
        let (service, marketing) = setup(10, ActiveSelection::Global).await;
        assert!(matches!(
            service.list_batches(&marketing).await,
            Err(AppError::PermissionDenied { .. })
        ));
    }
}
