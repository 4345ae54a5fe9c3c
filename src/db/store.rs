// src/db/store.rs
//
// Contratos de persistência. Cada repositório é um trait implementado pela
// transação do store (Postgres ou memória), então os serviços fazem todas as
// leituras e escritas de uma operação dentro da mesma transação.

use async_trait::async_trait;

use crate::common::error::AppError;
use crate::models::auth::User;
use crate::models::ids::{
    EventId, ItemKey, ItemKind, ModuleId, ProductId, RoleId, RoleKey, SequenceKind, TaskId,
    TenantId, UserId, UserKey,
};
use crate::models::inventory::Product;
use crate::models::module::Module;
use crate::models::operations::{Event, Task};
use crate::models::rbac::Role;
use crate::models::tenancy::{Tenant, TenantProfile};

#[async_trait]
pub trait SequenceRepository {
    /// Reserva o próximo id local de `kind` no tenant. O primeiro id é 0.
    async fn next_local_id(&mut self, tenant: TenantId, kind: SequenceKind) -> Result<i32, AppError>;
}

#[async_trait]
pub trait TenantRepository {
    async fn insert_tenant(&mut self, profile: &TenantProfile) -> Result<Tenant, AppError>;
    async fn find_tenant(&mut self, tenant: TenantId) -> Result<Option<Tenant>, AppError>;
    async fn update_tenant(&mut self, tenant: TenantId, profile: &TenantProfile) -> Result<Tenant, AppError>;
    /// Apaga o tenant e tudo o que pertence a ele.
    async fn delete_tenant(&mut self, tenant: TenantId) -> Result<bool, AppError>;
    /// Primeiro campo único (name, vatNumber, phone) já usado por outro tenant.
    async fn find_conflicting_field(
        &mut self,
        profile: &TenantProfile,
        exclude: Option<TenantId>,
    ) -> Result<Option<&'static str>, AppError>;
}

#[async_trait]
pub trait ModuleRepository {
    async fn list_modules(&mut self) -> Result<Vec<Module>, AppError>;
    async fn find_module(&mut self, module: ModuleId) -> Result<Option<Module>, AppError>;
    async fn list_active_modules(&mut self, tenant: TenantId) -> Result<Vec<Module>, AppError>;
    async fn is_module_active(&mut self, tenant: TenantId, module: ModuleId) -> Result<bool, AppError>;
    async fn insert_activation(&mut self, tenant: TenantId, module: ModuleId) -> Result<(), AppError>;
    /// Remove a ativação e as permissões dependentes dela.
    async fn delete_activation(&mut self, tenant: TenantId, module: ModuleId) -> Result<bool, AppError>;
}

#[async_trait]
pub trait RoleRepository {
    async fn insert_role(&mut self, role: &Role) -> Result<(), AppError>;
    async fn find_role(&mut self, key: RoleKey) -> Result<Option<Role>, AppError>;
    async fn list_roles(&mut self, tenant: TenantId) -> Result<Vec<Role>, AppError>;
    async fn update_role(&mut self, role: &Role) -> Result<(), AppError>;
    /// Remove o cargo com as suas permissões e associações.
    async fn delete_role(&mut self, key: RoleKey) -> Result<bool, AppError>;
}

#[async_trait]
pub trait PermissionRepository {
    async fn insert_permission(&mut self, role: RoleKey, module: ModuleId) -> Result<(), AppError>;
    async fn delete_permission(&mut self, role: RoleKey, module: ModuleId) -> Result<bool, AppError>;
    async fn delete_module_permissions(&mut self, tenant: TenantId, module: ModuleId) -> Result<(), AppError>;
    async fn module_grantees(&mut self, tenant: TenantId, module: ModuleId) -> Result<Vec<RoleId>, AppError>;
    /// Módulos ativos do tenant que não têm nenhum cargo autorizado.
    async fn modules_without_grantees(&mut self, tenant: TenantId) -> Result<Vec<ModuleId>, AppError>;
}

#[async_trait]
pub trait MembershipRepository {
    async fn insert_membership(&mut self, user: UserKey, role: RoleId) -> Result<(), AppError>;
    async fn delete_membership(&mut self, user: UserKey, role: RoleId) -> Result<bool, AppError>;
    async fn delete_role_memberships(&mut self, role: RoleKey) -> Result<(), AppError>;
    async fn delete_user_memberships(&mut self, user: UserKey) -> Result<(), AppError>;
    async fn user_roles(&mut self, user: UserKey) -> Result<Vec<RoleId>, AppError>;
    async fn role_members(&mut self, role: RoleKey) -> Result<Vec<UserId>, AppError>;
}

#[async_trait]
pub trait UserRepository {
    async fn insert_user(&mut self, user: &User) -> Result<(), AppError>;
    async fn find_user(&mut self, key: UserKey) -> Result<Option<User>, AppError>;
    async fn list_users(&mut self, tenant: TenantId) -> Result<Vec<User>, AppError>;
    async fn email_exists(&mut self, email: &str) -> Result<bool, AppError>;
    /// Remove o usuário, as suas associações, atribuições e os itens que criou.
    async fn delete_user(&mut self, key: UserKey) -> Result<bool, AppError>;
}

#[async_trait]
pub trait AssignmentRepository {
    async fn delete_assignments(&mut self, item: ItemKey) -> Result<u64, AppError>;
    async fn insert_assignment(&mut self, item: ItemKey, user: UserId) -> Result<(), AppError>;
    async fn assignees(&mut self, item: ItemKey) -> Result<Vec<UserId>, AppError>;
    /// Ids dos itens de `kind` atribuídos ao usuário.
    async fn assigned_items(&mut self, user: UserKey, kind: ItemKind) -> Result<Vec<i32>, AppError>;
}

#[async_trait]
pub trait TaskRepository {
    async fn insert_task(&mut self, task: &Task) -> Result<(), AppError>;
    async fn find_task(&mut self, tenant: TenantId, id: TaskId) -> Result<Option<Task>, AppError>;
    async fn update_task(&mut self, task: &Task) -> Result<(), AppError>;
    /// Remove a tarefa e as suas atribuições.
    async fn delete_task(&mut self, tenant: TenantId, id: TaskId) -> Result<bool, AppError>;
    async fn tasks_created_by(&mut self, user: UserKey) -> Result<Vec<Task>, AppError>;
    async fn purge_tasks(&mut self, tenant: TenantId) -> Result<u64, AppError>;
}

#[async_trait]
pub trait EventRepository {
    async fn insert_event(&mut self, event: &Event) -> Result<(), AppError>;
    async fn find_event(&mut self, tenant: TenantId, id: EventId) -> Result<Option<Event>, AppError>;
    async fn update_event(&mut self, event: &Event) -> Result<(), AppError>;
    /// Remove o evento e os seus participantes.
    async fn delete_event(&mut self, tenant: TenantId, id: EventId) -> Result<bool, AppError>;
    async fn purge_events(&mut self, tenant: TenantId) -> Result<u64, AppError>;
}

#[async_trait]
pub trait ProductRepository {
    async fn insert_product(&mut self, product: &Product) -> Result<(), AppError>;
    async fn find_product(&mut self, tenant: TenantId, id: ProductId) -> Result<Option<Product>, AppError>;
    async fn list_products(&mut self, tenant: TenantId) -> Result<Vec<Product>, AppError>;
    async fn update_product(&mut self, product: &Product) -> Result<(), AppError>;
    async fn delete_product(&mut self, tenant: TenantId, id: ProductId) -> Result<bool, AppError>;
    async fn purge_products(&mut self, tenant: TenantId) -> Result<u64, AppError>;
}

/// Uma unidade de trabalho. Sem `commit`, o drop desfaz tudo.
#[async_trait]
pub trait StoreTx:
    SequenceRepository
    + TenantRepository
    + ModuleRepository
    + RoleRepository
    + PermissionRepository
    + MembershipRepository
    + UserRepository
    + AssignmentRepository
    + TaskRepository
    + EventRepository
    + ProductRepository
    + Send
    + Sized
{
    async fn commit(self) -> Result<(), AppError>;
}

#[async_trait]
pub trait Store: Clone + Send + Sync + 'static {
    type Tx: StoreTx;

    async fn begin(&self) -> Result<Self::Tx, AppError>;
}
