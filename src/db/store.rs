// src/db/store.rs

use std::{collections::HashMap, sync::Arc};
use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use uuid::Uuid;

use crate::models::{
    auth::User,
    batches::Batch,
    checklist::{OperationalTask, OperationalTaskTemplate},
    production::{ProductionTask, TaskTimer},
    rbac::RolePermissions,
    recipes::{MasterIngredient, Recipe},
    session::Session,
    tenancy::BusinessUnit,
    waste::Waste,
};

/// Todas as coleções da aplicação. As listas preservam a ordem canônica de inserção.
#[derive(Debug, Default)]
pub struct Tables {
    pub units: Vec<BusinessUnit>,
    pub users: Vec<User>,
    pub role_permissions: RolePermissions,
    pub sessions: HashMap<Uuid, Session>,
    pub recipes: Vec<Recipe>,
    pub master_ingredients: Vec<MasterIngredient>,
    pub tasks: Vec<ProductionTask>,
    pub timers: HashMap<String, TaskTimer>,
    pub batches: Vec<Batch>,
    pub waste_records: Vec<Waste>,
    pub task_templates: Vec<OperationalTaskTemplate>,
    pub operational_tasks: Vec<OperationalTask>,
}

// O "banco" em memória.
// `begin()` devolve o guard de escrita: tudo que acontece enquanto ele vive é atômico
// para os demais requests. Os serviços validam antes de escrever, já que não há rollback.
#[derive(Clone, Default)]
pub struct Store {
    inner: Arc<RwLock<Tables>>,
}

impl Store {
    pub fn new(tables: Tables) -> Self {
        Self {
            inner: Arc::new(RwLock::new(tables)),
        }
    }

    pub async fn read(&self) -> RwLockReadGuard<'_, Tables> {
        self.inner.read().await
    }

    pub async fn begin(&self) -> RwLockWriteGuard<'_, Tables> {
        self.inner.write().await
    }
}

/// Id de registro no formato `<prefixo><uuid>`.
pub fn new_record_id(prefix: &str) -> String {
    format!("{prefix}{}", Uuid::new_v4().simple())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn writes_are_visible_to_later_reads() {
        let store = Store::default();
        {
            let mut tx = store.begin().await;
            tx.units.push(BusinessUnit::new(
                "polanco",
                "Sucursal Polanco",
                crate::models::tenancy::UnitKind::Branch,
            ));
        }
        assert_eq!(store.read().await.units.len(), 1);
    }

    #[test]
    fn record_ids_keep_prefix() {
        let id = new_record_id("task");
        assert!(id.starts_with("task"));
        assert_eq!(id.len(), "task".len() + 32);
    }
}
