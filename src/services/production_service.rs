// src/services/production_service.rs

use chrono::Utc;
use std::time::Instant;
use validator::Validate;

use crate::{
    common::error::AppError,
    db::{new_record_id, CatalogRepository, ProductionRepository, Store, Tables, UserRepository},
    models::{
        auth::{Role, User, UserId},
        batches::{Batch, BatchStatus},
        production::{
            CompleteTaskPayload, CreateTaskPayload, ProductionStatus, ProductionTask, ReorderPayload,
            TaskTimer, TimerView,
        },
        rbac::{AppModule, RequiredLevel},
        session::{Actor, Session},
    },
    services::{rbac_service::ensure_permission, scope_service},
};

#[derive(Clone)]
pub struct ProductionService {
    production_repo: ProductionRepository,
    catalog_repo: CatalogRepository,
    user_repo: UserRepository,
    store: Store,
}

impl ProductionService {
    pub fn new(
        production_repo: ProductionRepository,
        catalog_repo: CatalogRepository,
        user_repo: UserRepository,
        store: Store,
    ) -> Self {
        Self {
            production_repo,
            catalog_repo,
            user_repo,
            store,
        }
    }

    /// Plano da unidade ativa, por prioridade.
    pub async fn list_tasks(&self, actor: &Actor) -> Result<Vec<ProductionTask>, AppError> {
        let tx = self.store.read().await;
        let (user, session) = ensure_permission(&tx, actor, AppModule::Production, RequiredLevel::View)?;

        let mut tasks = scope_service::scope(
            self.production_repo.list_tasks(&tx),
            Some(&user),
            &session.selection,
        );
        tasks.sort_by_key(|t| t.priority);
        Ok(tasks)
    }

    /// Quem pode receber tarefas: cargos Produção e Admin.
    pub async fn assignable_users(&self, actor: &Actor) -> Result<Vec<User>, AppError> {
        let tx = self.store.read().await;
        ensure_permission(&tx, actor, AppModule::Production, RequiredLevel::View)?;

        Ok(self
            .user_repo
            .list(&tx)
            .into_iter()
            .filter(|u| can_receive_tasks(u))
            .collect())
    }

    pub async fn create_task(&self, actor: &Actor, payload: CreateTaskPayload) -> Result<ProductionTask, AppError> {
        payload.validate()?;

        let mut tx = self.store.begin().await;
        let (user, session) = ensure_permission(&tx, actor, AppModule::Production, RequiredLevel::Edit)?;

        let unit_id = session
            .selection
            .concrete()
            .cloned()
            .ok_or(AppError::ConcreteUnitRequired)?;

        let recipe = self
            .catalog_repo
            .find_recipe(&tx, &payload.recipe_id)
            .cloned()
            .ok_or_else(|| AppError::RecipeNotFound(payload.recipe_id.clone()))?;

        let priority = self.production_repo.open_task_count(&tx, &unit_id) as u32 + 1;
        let task = ProductionTask {
            id: new_record_id("task"),
            recipe_id: recipe.id,
            recipe_name: recipe.name,
            quantity_to_produce: payload.quantity,
            unit: recipe.yield_unit,
            priority,
            status: ProductionStatus::Pendiente,
            assigned_user_id: None,
            unit_id,
        };

        let task = self.production_repo.insert_task(&mut tx, task);
        tracing::info!(
            "🧾 Tarefa '{}' adicionada em {} por {} (prioridade {})",
            task.recipe_name,
            task.unit_id,
            user.email,
            task.priority
        );
        Ok(task)
    }

    /// `None` remove a atribuição.
    pub async fn assign_task(
        &self,
        actor: &Actor,
        task_id: &str,
        assignee: Option<UserId>,
    ) -> Result<ProductionTask, AppError> {
        let mut tx = self.store.begin().await;
        let (user, session) = ensure_permission(&tx, actor, AppModule::Production, RequiredLevel::Edit)?;
        scoped_task(&tx, &user, &session, task_id)?;

        if let Some(assignee_id) = assignee {
            let assignee = self
                .user_repo
                .find_by_id(&tx, assignee_id)
                .ok_or(AppError::UserNotFound)?;
            if !can_receive_tasks(assignee) {
                return Err(AppError::InvalidAssignee(assignee_id));
            }
        }

        let task = self.production_repo.find_task_mut(&mut tx, task_id)?;
        task.assigned_user_id = assignee;
        Ok(task.clone())
    }

    /// Reordena as pendentes da unidade da tarefa arrastada. Devolve o plano atualizado.
    pub async fn reorder_tasks(&self, actor: &Actor, payload: ReorderPayload) -> Result<Vec<ProductionTask>, AppError> {
        let mut tx = self.store.begin().await;
        let (user, session) = ensure_permission(&tx, actor, AppModule::Production, RequiredLevel::Edit)?;

        if payload.dragged_id != payload.target_id {
            let unit_id = scoped_task(&tx, &user, &session, &payload.dragged_id)?.unit_id.clone();
            self.production_repo
                .reorder_pending(&mut tx, &unit_id, &payload.dragged_id, &payload.target_id);
        }

        let mut tasks = scope_service::scope(
            self.production_repo.list_tasks(&tx),
            Some(&user),
            &session.selection,
        );
        tasks.sort_by_key(|t| t.priority);
        Ok(tasks)
    }

    // ---
    // Cronômetros
    // ---

    /// Inicia (ou retoma) o cronômetro e marca a tarefa como em progresso.
    pub async fn start_timer(&self, actor: &Actor, task_id: &str) -> Result<TimerView, AppError> {
        let now = Instant::now();
        let mut tx = self.store.begin().await;
        let (user, session) = ensure_permission(&tx, actor, AppModule::Production, RequiredLevel::Edit)?;
        if scoped_task(&tx, &user, &session, task_id)?.is_completed() {
            return Err(AppError::TaskAlreadyCompleted(task_id.to_string()));
        }

        let timer = match self.production_repo.timer_mut(&mut tx, task_id) {
            Some(timer) => {
                timer.resume(now);
                *timer
            }
            None => {
                let timer = TaskTimer::started(now);
                self.production_repo.set_timer(&mut tx, task_id, timer);
                timer
            }
        };

        self.production_repo.find_task_mut(&mut tx, task_id)?.status = ProductionStatus::EnProgreso;
        Ok(timer_view(task_id, &timer, now))
    }

    pub async fn pause_timer(&self, actor: &Actor, task_id: &str) -> Result<TimerView, AppError> {
        let now = Instant::now();
        let mut tx = self.store.begin().await;
        let (user, session) = ensure_permission(&tx, actor, AppModule::Production, RequiredLevel::Edit)?;
        scoped_task(&tx, &user, &session, task_id)?;

        let timer = match self.production_repo.timer_mut(&mut tx, task_id) {
            Some(timer) => {
                timer.pause(now);
                *timer
            }
            None => TaskTimer::default(),
        };
        Ok(timer_view(task_id, &timer, now))
    }

    /// Cronômetros existentes das tarefas visíveis.
    pub async fn list_timers(&self, actor: &Actor) -> Result<Vec<TimerView>, AppError> {
        let now = Instant::now();
        let tx = self.store.read().await;
        let (user, session) = ensure_permission(&tx, actor, AppModule::Production, RequiredLevel::View)?;

        Ok(self
            .production_repo
            .list_tasks(&tx)
            .iter()
            .filter(|t| scope_service::in_scope(*t, Some(&user), &session.selection))
            .filter_map(|t| {
                self.production_repo
                    .timer(&tx, &t.id)
                    .map(|timer| timer_view(&t.id, timer, now))
            })
            .collect())
    }

    /// Conclui a tarefa e gera o lote com a duração medida pelo cronômetro.
    pub async fn complete_task(
        &self,
        actor: &Actor,
        task_id: &str,
        payload: CompleteTaskPayload,
    ) -> Result<Batch, AppError> {
        payload.validate()?;

        let now = Instant::now();
        let mut tx = self.store.begin().await;
        let (user, session) = ensure_permission(&tx, actor, AppModule::Production, RequiredLevel::Edit)?;

        let task = scoped_task(&tx, &user, &session, task_id)?.clone();
        if task.is_completed() {
            return Err(AppError::TaskAlreadyCompleted(task.id));
        }
        let recipe = self
            .catalog_repo
            .find_recipe(&tx, &task.recipe_id)
            .cloned()
            .ok_or_else(|| AppError::RecipeNotFound(task.recipe_id.clone()))?;

        let duration_seconds = self
            .production_repo
            .remove_timer(&mut tx, task_id)
            .map(|timer| timer.elapsed_seconds(now))
            .unwrap_or_default();

        let producer = payload
            .producer_name
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| user.name.clone());

        self.production_repo.find_task_mut(&mut tx, task_id)?.status = ProductionStatus::Completado;

        let batch = self.production_repo.insert_batch(
            &mut tx,
            Batch {
                id: new_record_id("B"),
                recipe_id: recipe.id,
                recipe_name: recipe.name,
                production_date: Utc::now(),
                responsible_user: producer,
                shelf_life_days: recipe.shelf_life_days,
                quantity: payload.actual_yield,
                unit: recipe.yield_unit,
                status: BatchStatus::Activo,
                duration_seconds,
                source_task_id: Some(task.id),
                notes: None,
                unit_id: task.unit_id,
            },
        );

        tracing::info!(
            "📦 Lote {} gerado ({} {}, {}s) por {}",
            batch.id,
            batch.quantity,
            batch.unit,
            batch.duration_seconds,
            user.email
        );
        Ok(batch)
    }
}

fn can_receive_tasks(user: &User) -> bool {
    matches!(user.role, Role::Produccion | Role::Admin)
}

fn timer_view(task_id: &str, timer: &TaskTimer, now: Instant) -> TimerView {
    TimerView {
        task_id: task_id.to_string(),
        running: timer.is_running(),
        elapsed_seconds: timer.elapsed_seconds(now),
    }
}

// Tarefas fora do escopo da sessão são tratadas como inexistentes
fn scoped_task<'t>(
    tx: &'t Tables,
    user: &User,
    session: &Session,
    task_id: &str,
) -> Result<&'t ProductionTask, AppError> {
    tx.tasks
        .iter()
        .find(|t| t.id == task_id)
        .filter(|t| scope_service::in_scope(*t, Some(user), &session.selection))
        .ok_or_else(|| AppError::TaskNotFound(task_id.to_string()))
}
