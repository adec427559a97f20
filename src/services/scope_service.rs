// src/services/scope_service.rs

// Recorte dos dados operacionais pela unidade ativa da sessão.
// Com unidade concreta ela é o filtro; na visão global vale o escopo do usuário.

use crate::{
    db::Tables,
    models::{
        auth::User,
        batches::Batch,
        checklist::OperationalTask,
        production::ProductionTask,
        session::FilteredData,
        tenancy::{ActiveSelection, UnitId},
        waste::Waste,
    },
};

/// Tudo que pertence a uma unidade de negócio.
pub trait UnitScoped {
    fn unit_id(&self) -> &UnitId;
}

impl UnitScoped for ProductionTask {
    fn unit_id(&self) -> &UnitId {
        &self.unit_id
    }
}

impl UnitScoped for Batch {
    fn unit_id(&self) -> &UnitId {
        &self.unit_id
    }
}

impl UnitScoped for Waste {
    fn unit_id(&self) -> &UnitId {
        &self.unit_id
    }
}

impl UnitScoped for OperationalTask {
    fn unit_id(&self) -> &UnitId {
        &self.unit_id
    }
}

/// Um item é visível para a combinação usuário + seleção?
pub fn in_scope<T: UnitScoped>(item: &T, user: Option<&User>, selection: &ActiveSelection) -> bool {
    let Some(user) = user else {
        return false;
    };

    match selection {
        ActiveSelection::Specific(unit_id) => item.unit_id() == unit_id,
        // Sem seleção cai no mesmo ramo da visão global
        ActiveSelection::Global | ActiveSelection::Unset => {
            user.accessible_unit_ids.contains(item.unit_id())
        }
    }
}

pub fn scope<'a, T, I>(items: I, user: Option<&User>, selection: &ActiveSelection) -> Vec<T>
where
    T: UnitScoped + Clone + 'a,
    I: IntoIterator<Item = &'a T>,
{
    items
        .into_iter()
        .filter(|item| in_scope(*item, user, selection))
        .cloned()
        .collect()
}

pub fn filtered_data(tx: &Tables, user: Option<&User>, selection: &ActiveSelection) -> FilteredData {
    FilteredData {
        tasks: scope(&tx.tasks, user, selection),
        batches: scope(&tx.batches, user, selection),
        waste_records: scope(&tx.waste_records, user, selection),
        operational_tasks: scope(&tx.operational_tasks, user, selection),
    }
}
