pub mod store;
pub use store::{Store, StoreTx};

/// Traits dos repositórios, necessários para chamar os métodos na transação.
pub mod prelude {
    pub use super::store::*;
}

pub mod pg_store;
pub use pg_store::{PgStore, PgTx};
pub mod memory;
pub use memory::MemoryStore;

// Implementações Postgres dos repositórios
mod assignment_repo;
mod event_repo;
mod inventory_repo;
mod module_repo;
mod rbac_repo;
mod sequence_repo;
mod task_repo;
mod tenancy_repo;
mod user_repo;
