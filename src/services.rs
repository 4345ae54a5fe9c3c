pub mod access_service;
pub mod assignment_service;
pub mod auth;
pub mod event_service;
pub mod inventory_service;
pub mod module_service;
pub mod notification;
pub mod rbac_service;
pub mod task_service;
pub mod tenancy_service;
pub mod user_service;

pub use access_service::AccessService;
pub use auth::AuthService;
pub use event_service::EventService;
pub use inventory_service::InventoryService;
pub use module_service::ModuleService;
pub use notification::{LogNotifier, Notifier};
pub use rbac_service::RbacService;
pub use task_service::TaskService;
pub use tenancy_service::TenantService;
pub use user_service::UserService;
