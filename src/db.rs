pub mod store;
pub use store::{new_record_id, Store, Tables};
pub mod seed;
pub mod user_repo;
pub use user_repo::UserRepository;
pub mod tenancy_repo;
pub use tenancy_repo::TenantRepository;
pub mod rbac_repo;
pub use rbac_repo::RbacRepository;
pub mod session_repo;
pub use session_repo::SessionRepository;
pub mod catalog_repo;
pub use catalog_repo::CatalogRepository;
pub mod production_repo;
pub use production_repo::ProductionRepository;
pub mod waste_repo;
pub use waste_repo::WasteRepository;
pub mod checklist_repo;
pub use checklist_repo::ChecklistRepository;
