// src/db/tenancy_repo.rs

use crate::{
    db::store::Tables,
    models::tenancy::{BusinessUnit, UnitId},
};

// Unidades de negócio: lista de referência, na ordem canônica
#[derive(Clone, Default)]
pub struct TenantRepository;

impl TenantRepository {
    pub fn new() -> Self {
        Self
    }

    pub fn list_units<'t>(&self, tx: &'t Tables) -> &'t [BusinessUnit] {
        &tx.units
    }

    pub fn find_unit<'t>(&self, tx: &'t Tables, id: &UnitId) -> Option<&'t BusinessUnit> {
        tx.units.iter().find(|u| &u.id == id)
    }

    pub fn unit_exists(&self, tx: &Tables, id: &UnitId) -> bool {
        self.find_unit(tx, id).is_some()
    }
}
