pub mod auth;
pub mod batch_service;
pub mod checklist_service;
pub mod dashboard_service;
pub mod document_service;
pub mod production_service;
pub mod rbac_service;
pub mod recipe_service;
pub mod scope_service;
pub mod tenancy_service;
pub mod user_service;
pub mod waste_service;
