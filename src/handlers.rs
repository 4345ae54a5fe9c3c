// src/handlers.rs

pub mod health;
pub mod inventory;
pub mod modules;
pub mod operations;
pub mod rbac;
pub mod tenancy;
pub mod users;
