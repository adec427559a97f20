pub mod auth;
pub mod batches;
pub mod checklist;
pub mod production;
pub mod rbac;
pub mod recipes;
pub mod reports;
pub mod session;
pub mod tenancy;
pub mod waste;
