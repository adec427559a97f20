// src/services/checklist_service.rs

use validator::Validate;

use crate::{
    common::error::AppError,
    db::{new_record_id, ChecklistRepository, Store, Tables},
    models::{
        auth::Role,
        checklist::{ChecklistKind, ChecklistStatus, OperationalTask, OperationalTaskTemplate, TemplatePayload},
        rbac::{AppModule, RequiredLevel},
        session::Actor,
    },
    services::{
        rbac_service::{ensure_permission, load_actor},
        scope_service,
    },
};

/// Módulo que governa as tarefas de um cargo. Cargos sem quadro próprio ficam sob `produccion`.
pub fn module_for_role(role: Role) -> AppModule {
    ChecklistKind::for_role(role)
        .map(ChecklistKind::module)
        .unwrap_or(AppModule::Production)
}

#[derive(Clone)]
pub struct ChecklistService {
    checklist_repo: ChecklistRepository,
    store: Store,
}

impl ChecklistService {
    pub fn new(checklist_repo: ChecklistRepository, store: Store) -> Self {
        Self { checklist_repo, store }
    }

    // ---
    // Plantillas (admin_tareas_operativas)
    // ---
    pub async fn list_templates(&self, actor: &Actor) -> Result<Vec<OperationalTaskTemplate>, AppError> {
        let tx = self.store.read().await;
        ensure_permission(&tx, actor, AppModule::AdminTaskTemplates, RequiredLevel::View)?;
        Ok(self.checklist_repo.list_templates(&tx))
    }

    pub async fn create_template(
        &self,
        actor: &Actor,
        payload: TemplatePayload,
    ) -> Result<OperationalTaskTemplate, AppError> {
        payload.validate()?;

        let mut tx = self.store.begin().await;
        let (user, _) = ensure_permission(&tx, actor, AppModule::AdminTaskTemplates, RequiredLevel::Edit)?;

        let template = OperationalTaskTemplate {
            id: new_record_id("opt-"),
            name: payload.name.trim().to_string(),
            description: payload.description.trim().to_string(),
            frequency: payload.frequency,
            assigned_role: payload.assigned_role,
        };
        let template = self.checklist_repo.insert_template(&mut tx, template);

        tracing::info!("📋 Plantilla '{}' criada por {}", template.name, user.email);
        Ok(template)
    }

    // ---
    // Quadros
    // ---
    pub async fn list_board(&self, actor: &Actor, kind: ChecklistKind) -> Result<Vec<OperationalTask>, AppError> {
        let tx = self.store.read().await;
        let (user, session) = ensure_permission(&tx, actor, kind.module(), RequiredLevel::View)?;

        let role = kind.role();
        Ok(scope_service::scope(
            self.checklist_repo.list_tasks(&tx).iter().filter(|t| t.assigned_role == role),
            Some(&user),
            &session.selection,
        ))
    }

    /// Tarefas do próprio cargo, para quem não tem quadro (Cocina, Admin).
    pub async fn list_my_tasks(&self, actor: &Actor) -> Result<Vec<OperationalTask>, AppError> {
        let tx = self.store.read().await;
        let (user, session) = load_actor(&tx, actor)?;
        ensure_permission(&tx, actor, module_for_role(user.role), RequiredLevel::View)?;

        Ok(scope_service::scope(
            self.checklist_repo
                .list_tasks(&tx)
                .iter()
                .filter(|t| t.assigned_role == user.role),
            Some(&user),
            &session.selection,
        ))
    }

    pub async fn update_status(
        &self,
        actor: &Actor,
        id: &str,
        status: ChecklistStatus,
    ) -> Result<OperationalTask, AppError> {
        let mut tx = self.store.begin().await;
        let module = self.editable_module(&tx, actor, id)?;
        let (user, _) = ensure_permission(&tx, actor, module, RequiredLevel::Edit)?;

        let task = self.checklist_repo.find_task_mut(&mut tx, id)?;
        task.status = status;

        tracing::info!("✅ Tarefa {} -> {:?} por {}", task.id, status, user.email);
        Ok(task.clone())
    }

    /// Devolve `true` quando a ordem mudou.
    pub async fn reorder(&self, actor: &Actor, dragged_id: &str, target_id: &str) -> Result<bool, AppError> {
        let mut tx = self.store.begin().await;
        let module = self.editable_module(&tx, actor, dragged_id)?;
        ensure_permission(&tx, actor, module, RequiredLevel::Edit)?;

        Ok(self.checklist_repo.move_task(&mut tx, dragged_id, target_id))
    }

    // Tarefa fora do escopo conta como inexistente
    fn editable_module(&self, tx: &Tables, actor: &Actor, id: &str) -> Result<AppModule, AppError> {
        let (user, session) = load_actor(tx, actor)?;
        self.checklist_repo
            .find_task(tx, id)
            .filter(|t| scope_service::in_scope(*t, Some(&user), &session.selection))
            .map(|t| module_for_role(t.assigned_role))
            .ok_or_else(|| AppError::OperationalTaskNotFound(id.to_string()))
    }
}
