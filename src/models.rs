pub mod auth;
pub mod ids;
pub mod inventory;
pub mod module;
pub mod operations;
pub mod rbac;
pub mod tenancy;
