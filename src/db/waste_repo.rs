// src/db/waste_repo.rs

use crate::{db::store::Tables, models::waste::Waste};

#[derive(Clone, Default)]
pub struct WasteRepository;

impl WasteRepository {
    pub fn new() -> Self {
        Self
    }

    pub fn list<'t>(&self, tx: &'t Tables) -> &'t [Waste] {
        &tx.waste_records
    }

    pub fn insert(&self, tx: &mut Tables, record: Waste) -> Waste {
        tx.waste_records.insert(0, record.clone());
        record
    }
}
