// src/db/production_repo.rs

use crate::{
    common::error::AppError,
    db::store::Tables,
    models::{
        batches::Batch,
        production::{ProductionTask, TaskTimer},
        tenancy::UnitId,
    },
};

// Tarefas do plano, cronômetros e os lotes que elas geram
#[derive(Clone, Default)]
pub struct ProductionRepository;

impl ProductionRepository {
    pub fn new() -> Self {
        Self
    }

    // --- Tarefas ---

    pub fn list_tasks<'t>(&self, tx: &'t Tables) -> &'t [ProductionTask] {
        &tx.tasks
    }

    pub fn find_task<'t>(&self, tx: &'t Tables, id: &str) -> Option<&'t ProductionTask> {
        tx.tasks.iter().find(|t| t.id == id)
    }

    pub fn find_task_mut<'t>(&self, tx: &'t mut Tables, id: &str) -> Result<&'t mut ProductionTask, AppError> {
        tx.tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| AppError::TaskNotFound(id.to_string()))
    }

    pub fn open_task_count(&self, tx: &Tables, unit_id: &UnitId) -> usize {
        tx.tasks
            .iter()
            .filter(|t| !t.is_completed() && &t.unit_id == unit_id)
            .count()
    }

    pub fn insert_task(&self, tx: &mut Tables, task: ProductionTask) -> ProductionTask {
        tx.tasks.push(task.clone());
        tx.tasks.sort_by_key(|t| t.priority);
        task
    }

    /// Arrasta uma tarefa pendente sobre outra da mesma unidade e renumera as prioridades 1..n.
    /// Se o alvo não estiver entre as pendentes, a arrastada vai para o fim.
    /// Tarefas concluídas e de outras unidades não mudam.
    pub fn reorder_pending(&self, tx: &mut Tables, unit_id: &UnitId, dragged_id: &str, target_id: &str) -> bool {
        let mut pending: Vec<ProductionTask> = tx
            .tasks
            .iter()
            .filter(|t| !t.is_completed() && &t.unit_id == unit_id)
            .cloned()
            .collect();
        pending.sort_by_key(|t| t.priority);

        let Some(dragged_index) = pending.iter().position(|t| t.id == dragged_id) else {
            return false;
        };
        let dragged = pending.remove(dragged_index);
        match pending.iter().position(|t| t.id == target_id) {
            Some(target_index) => pending.insert(target_index, dragged),
            None => pending.push(dragged),
        }

        for (index, reordered) in pending.iter().enumerate() {
            if let Some(task) = tx.tasks.iter_mut().find(|t| t.id == reordered.id) {
                task.priority = index as u32 + 1;
            }
        }
        tx.tasks.sort_by_key(|t| t.priority);
        true
    }

    // --- Cronômetros ---

    pub fn timer<'t>(&self, tx: &'t Tables, task_id: &str) -> Option<&'t TaskTimer> {
        tx.timers.get(task_id)
    }

    pub fn timer_mut<'t>(&self, tx: &'t mut Tables, task_id: &str) -> Option<&'t mut TaskTimer> {
        tx.timers.get_mut(task_id)
    }

    pub fn set_timer(&self, tx: &mut Tables, task_id: &str, timer: TaskTimer) {
        tx.timers.insert(task_id.to_string(), timer);
    }

    pub fn remove_timer(&self, tx: &mut Tables, task_id: &str) -> Option<TaskTimer> {
        tx.timers.remove(task_id)
    }

    // --- Lotes ---

    pub fn list_batches<'t>(&self, tx: &'t Tables) -> &'t [Batch] {
        &tx.batches
    }

    pub fn find_batch_mut<'t>(&self, tx: &'t mut Tables, id: &str) -> Result<&'t mut Batch, AppError> {
        tx.batches
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or_else(|| AppError::BatchNotFound(id.to_string()))
    }

    // O lote mais recente vem primeiro
    pub fn insert_batch(&self, tx: &mut Tables, batch: Batch) -> Batch {
        tx.batches.insert(0, batch.clone());
        batch
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::seed::demo_tables;

    fn priorities(tables: &Tables, unit: &str) -> Vec<(String, u32)> {
        let mut tasks: Vec<(String, u32)> = tables
            .tasks
            .iter()
            .filter(|t| t.unit_id.as_str() == unit && !t.is_completed())
            .map(|t| (t.id.clone(), t.priority))
            .collect();
        tasks.sort_by_key(|(_, p)| *p);
        tasks
    }

    #[test]
    fn dragged_task_is_inserted_at_target_and_renumbered() {
        let mut tables = demo_tables();
        let repo = ProductionRepository::new();
        let central = UnitId::from("prod-central");

        assert!(repo.reorder_pending(&mut tables, &central, "task4", "task1"));
        assert_eq!(
            priorities(&tables, "prod-central"),
            [("task4".to_string(), 1), ("task1".to_string(), 2), ("task2".to_string(), 3)]
        );
    }

    #[test]
    fn missing_target_appends_and_completed_tasks_stay() {
        let mut tables = demo_tables();
        let repo = ProductionRepository::new();
        let central = UnitId::from("prod-central");

        assert!(repo.reorder_pending(&mut tables, &central, "task1", "task3"));
        assert_eq!(
            priorities(&tables, "prod-central"),
            [("task2".to_string(), 1), ("task4".to_string(), 2), ("task1".to_string(), 3)]
        );
        let completed = tables.tasks.iter().find(|t| t.id == "task3").unwrap();
        assert_eq!(completed.priority, 3);
    }

    #[test]
    fn open_tasks_are_counted_per_unit() {
        let tables = demo_tables();
        let repo = ProductionRepository::new();
        assert_eq!(repo.open_task_count(&tables, &UnitId::from("prod-central")), 3);
        assert_eq!(repo.open_task_count(&tables, &UnitId::from("polanco")), 0);
    }
}
