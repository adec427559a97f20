// src/db/checklist_repo.rs

use crate::{
    common::error::AppError,
    db::store::Tables,
    models::checklist::{OperationalTask, OperationalTaskTemplate},
};

// Plantillas (admin) e tarefas operacionais por unidade
#[derive(Clone, Default)]
pub struct ChecklistRepository;

impl ChecklistRepository {
    pub fn new() -> Self {
        Self
    }

    pub fn list_templates(&self, tx: &Tables) -> Vec<OperationalTaskTemplate> {
        tx.task_templates.clone()
    }

    pub fn insert_template(&self, tx: &mut Tables, template: OperationalTaskTemplate) -> OperationalTaskTemplate {
        tx.task_templates.push(template.clone());
        template
    }

    pub fn list_tasks<'t>(&self, tx: &'t Tables) -> &'t [OperationalTask] {
        &tx.operational_tasks
    }

    pub fn find_task<'t>(&self, tx: &'t Tables, id: &str) -> Option<&'t OperationalTask> {
        tx.operational_tasks.iter().find(|t| t.id == id)
    }

    pub fn find_task_mut<'t>(&self, tx: &'t mut Tables, id: &str) -> Result<&'t mut OperationalTask, AppError> {
        tx.operational_tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| AppError::OperationalTaskNotFound(id.to_string()))
    }

    /// Move `dragged` para a posição de `target`. Ids desconhecidos deixam a lista intacta.
    pub fn move_task(&self, tx: &mut Tables, dragged_id: &str, target_id: &str) -> bool {
        if dragged_id == target_id {
            return false;
        }
        let tasks = &mut tx.operational_tasks;
        let Some(dragged_index) = tasks.iter().position(|t| t.id == dragged_id) else {
            return false;
        };
        if !tasks.iter().any(|t| t.id == target_id) {
            return false;
        }

        let dragged = tasks.remove(dragged_index);
        // O alvo é procurado de novo depois da remoção
        let target_index = tasks.iter().position(|t| t.id == target_id).unwrap_or(tasks.len());
        tasks.insert(target_index, dragged);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::seed::demo_tables;

    fn ids(tables: &Tables) -> Vec<&str> {
        tables.operational_tasks.iter().map(|t| t.id.as_str()).collect()
    }

    #[test]
    fn dragged_task_takes_target_position() {
        let mut tables = demo_tables();
        let repo = ChecklistRepository::new();
        assert!(repo.move_task(&mut tables, "ot3", "ot1"));
        assert_eq!(&ids(&tables)[..4], &["ot3", "ot1", "ot2", "ot4"]);
    }

    #[test]
    fn unknown_ids_leave_order_unchanged() {
        let mut tables = demo_tables();
        let repo = ChecklistRepository::new();
        let before: Vec<String> = ids(&tables).into_iter().map(String::from).collect();

        assert!(!repo.move_task(&mut tables, "ot1", "missing"));
        assert!(!repo.move_task(&mut tables, "missing", "ot1"));
        assert!(!repo.move_task(&mut tables, "ot1", "ot1"));
        assert_eq!(ids(&tables), before.iter().map(String::as_str).collect::<Vec<_>>());
    }
}
