pub mod auth;
pub mod batches;
pub mod checklists;
pub mod dashboard;
pub mod documents;
pub mod production;
pub mod rbac;
pub mod recipes;
pub mod tenancy;
pub mod users;
pub mod waste;
