// src/db/memory.rs
//
// Store em memória, para testes e desenvolvimento local.
// Uma transação trava o estado inteiro e trabalha sobre uma cópia;
// o commit publica a cópia, o drop descarta.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::common::error::AppError;
use crate::db::store::{
    AssignmentRepository, EventRepository, MembershipRepository, ModuleRepository,
    PermissionRepository, ProductRepository, RoleRepository, SequenceRepository, Store, StoreTx,
    TaskRepository, TenantRepository, UserRepository,
};
use crate::models::auth::User;
use crate::models::ids::{
    EventId, ItemKey, ItemKind, ModuleId, ProductId, RoleId, RoleKey, SequenceKind, TaskId,
    TenantId, UserId, UserKey,
};
use crate::models::inventory::Product;
use crate::models::module::{default_catalog, Module};
use crate::models::operations::{Event, Task};
use crate::models::rbac::Role;
use crate::models::tenancy::{Tenant, TenantProfile};

#[derive(Debug, Clone, Default)]
struct MemoryState {
    catalog: Vec<Module>,
    last_tenant_id: i32,
    tenants: BTreeMap<TenantId, Tenant>,
    sequences: BTreeMap<(TenantId, SequenceKind), i32>,
    activations: BTreeSet<(TenantId, ModuleId)>,
    roles: BTreeMap<RoleKey, Role>,
    // (tenant, role, module)
    permissions: BTreeSet<(TenantId, RoleId, ModuleId)>,
    // (tenant, user, role)
    memberships: BTreeSet<(TenantId, UserId, RoleId)>,
    users: BTreeMap<UserKey, User>,
    assignments: BTreeSet<(ItemKey, UserId)>,
    tasks: BTreeMap<(TenantId, TaskId), Task>,
    events: BTreeMap<(TenantId, EventId), Event>,
    products: BTreeMap<(TenantId, ProductId), Product>,
}

impl MemoryState {
    fn remove_item_assignments(&mut self, item: ItemKey) -> u64 {
        let before = self.assignments.len();
        self.assignments.retain(|(key, _)| *key != item);
        (before - self.assignments.len()) as u64
    }
}

#[derive(Clone)]
pub struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        let state = MemoryState {
            catalog: default_catalog(),
            ..Default::default()
        };
        Self { state: Arc::new(Mutex::new(state)) }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

pub struct MemoryTx {
    guard: OwnedMutexGuard<MemoryState>,
    work: MemoryState,
}

#[async_trait]
impl Store for MemoryStore {
    type Tx = MemoryTx;

    async fn begin(&self) -> Result<MemoryTx, AppError> {
        let guard = self.state.clone().lock_owned().await;
        let work = guard.clone();
        Ok(MemoryTx { guard, work })
    }
}

#[async_trait]
impl StoreTx for MemoryTx {
    async fn commit(mut self) -> Result<(), AppError> {
        *self.guard = self.work;
        Ok(())
    }
}

#[async_trait]
impl SequenceRepository for MemoryTx {
    async fn next_local_id(&mut self, tenant: TenantId, kind: SequenceKind) -> Result<i32, AppError> {
        let next = match self.work.sequences.get(&(tenant, kind)) {
            Some(last) => last + 1,
            None => 0,
        };
        self.work.sequences.insert((tenant, kind), next);
        Ok(next)
    }
}

#[async_trait]
impl TenantRepository for MemoryTx {
    async fn insert_tenant(&mut self, profile: &TenantProfile) -> Result<Tenant, AppError> {
        if let Some(field) = self.find_conflicting_field(profile, None).await? {
            return Err(AppError::UniquenessViolation { field });
        }

        self.work.last_tenant_id += 1;
        let tenant = Tenant {
            id: TenantId(self.work.last_tenant_id),
            name: profile.name.clone(),
            vat_number: profile.vat_number.clone(),
            address: profile.address.clone(),
            city: profile.city.clone(),
            postal_code: profile.postal_code.clone(),
            phone: profile.phone.clone(),
            logo: profile.logo.clone(),
            created_at: Utc::now(),
        };
        self.work.tenants.insert(tenant.id, tenant.clone());
        Ok(tenant)
    }

    async fn find_tenant(&mut self, tenant: TenantId) -> Result<Option<Tenant>, AppError> {
        Ok(self.work.tenants.get(&tenant).cloned())
    }

    async fn update_tenant(&mut self, tenant: TenantId, profile: &TenantProfile) -> Result<Tenant, AppError> {
        if let Some(field) = self.find_conflicting_field(profile, Some(tenant)).await? {
            return Err(AppError::UniquenessViolation { field });
        }

        let current = self
            .work
            .tenants
            .get_mut(&tenant)
            .ok_or_else(|| AppError::not_found("Tenant", tenant))?;
        current.name = profile.name.clone();
        current.vat_number = profile.vat_number.clone();
        current.address = profile.address.clone();
        current.city = profile.city.clone();
        current.postal_code = profile.postal_code.clone();
        current.phone = profile.phone.clone();
        current.logo = profile.logo.clone();
        Ok(current.clone())
    }

    async fn delete_tenant(&mut self, tenant: TenantId) -> Result<bool, AppError> {
        let w = &mut self.work;
        if w.tenants.remove(&tenant).is_none() {
            return Ok(false);
        }
        w.sequences.retain(|(t, _), _| *t != tenant);
        w.activations.retain(|(t, _)| *t != tenant);
        w.roles.retain(|key, _| key.tenant != tenant);
        w.permissions.retain(|(t, _, _)| *t != tenant);
        w.memberships.retain(|(t, _, _)| *t != tenant);
        w.users.retain(|key, _| key.tenant != tenant);
        w.assignments.retain(|(item, _)| item.tenant != tenant);
        w.tasks.retain(|(t, _), _| *t != tenant);
        w.events.retain(|(t, _), _| *t != tenant);
        w.products.retain(|(t, _), _| *t != tenant);
        Ok(true)
    }

    async fn find_conflicting_field(
        &mut self,
        profile: &TenantProfile,
        exclude: Option<TenantId>,
    ) -> Result<Option<&'static str>, AppError> {
        let others = self.work.tenants.values().filter(|t| Some(t.id) != exclude);
        for other in others {
            if other.name == profile.name {
                return Ok(Some("name"));
            }
            if other.vat_number == profile.vat_number {
                return Ok(Some("vatNumber"));
            }
            if other.phone == profile.phone {
                return Ok(Some("phone"));
            }
        }
        Ok(None)
    }
}

#[async_trait]
impl ModuleRepository for MemoryTx {
    async fn list_modules(&mut self) -> Result<Vec<Module>, AppError> {
        let mut modules = self.work.catalog.clone();
        modules.sort_by_key(|m| m.id);
        Ok(modules)
    }

    async fn find_module(&mut self, module: ModuleId) -> Result<Option<Module>, AppError> {
        Ok(self.work.catalog.iter().find(|m| m.id == module).cloned())
    }

    async fn list_active_modules(&mut self, tenant: TenantId) -> Result<Vec<Module>, AppError> {
        let mut modules: Vec<Module> = self
            .work
            .catalog
            .iter()
            .filter(|m| self.work.activations.contains(&(tenant, m.id)))
            .cloned()
            .collect();
        modules.sort_by_key(|m| m.id);
        Ok(modules)
    }

    async fn is_module_active(&mut self, tenant: TenantId, module: ModuleId) -> Result<bool, AppError> {
        Ok(self.work.activations.contains(&(tenant, module)))
    }

    async fn insert_activation(&mut self, tenant: TenantId, module: ModuleId) -> Result<(), AppError> {
        self.work.activations.insert((tenant, module));
        Ok(())
    }

    async fn delete_activation(&mut self, tenant: TenantId, module: ModuleId) -> Result<bool, AppError> {
        let removed = self.work.activations.remove(&(tenant, module));
        self.work.permissions.retain(|(t, _, m)| !(*t == tenant && *m == module));
        Ok(removed)
    }
}

#[async_trait]
impl RoleRepository for MemoryTx {
    async fn insert_role(&mut self, role: &Role) -> Result<(), AppError> {
        self.work.roles.insert(role.key(), role.clone());
        Ok(())
    }

    async fn find_role(&mut self, key: RoleKey) -> Result<Option<Role>, AppError> {
        Ok(self.work.roles.get(&key).cloned())
    }

    async fn list_roles(&mut self, tenant: TenantId) -> Result<Vec<Role>, AppError> {
        Ok(self.work.roles.values().filter(|r| r.tenant_id == tenant).cloned().collect())
    }

    async fn update_role(&mut self, role: &Role) -> Result<(), AppError> {
        if let Some(current) = self.work.roles.get_mut(&role.key()) {
            *current = role.clone();
        }
        Ok(())
    }

    async fn delete_role(&mut self, key: RoleKey) -> Result<bool, AppError> {
        let removed = self.work.roles.remove(&key).is_some();
        self.work.permissions.retain(|(t, r, _)| !(*t == key.tenant && *r == key.role));
        self.work.memberships.retain(|(t, _, r)| !(*t == key.tenant && *r == key.role));
        Ok(removed)
    }
}

#[async_trait]
impl PermissionRepository for MemoryTx {
    async fn insert_permission(&mut self, role: RoleKey, module: ModuleId) -> Result<(), AppError> {
        self.work.permissions.insert((role.tenant, role.role, module));
        Ok(())
    }

    async fn delete_permission(&mut self, role: RoleKey, module: ModuleId) -> Result<bool, AppError> {
        Ok(self.work.permissions.remove(&(role.tenant, role.role, module)))
    }

    async fn delete_module_permissions(&mut self, tenant: TenantId, module: ModuleId) -> Result<(), AppError> {
        self.work.permissions.retain(|(t, _, m)| !(*t == tenant && *m == module));
        Ok(())
    }

    async fn module_grantees(&mut self, tenant: TenantId, module: ModuleId) -> Result<Vec<RoleId>, AppError> {
        Ok(self
            .work
            .permissions
            .iter()
            .filter(|(t, _, m)| *t == tenant && *m == module)
            .map(|(_, r, _)| *r)
            .collect())
    }

    async fn modules_without_grantees(&mut self, tenant: TenantId) -> Result<Vec<ModuleId>, AppError> {
        Ok(self
            .work
            .activations
            .iter()
            .filter(|(t, _)| *t == tenant)
            .map(|(_, m)| *m)
            .filter(|m| !self.work.permissions.iter().any(|(t, _, pm)| *t == tenant && pm == m))
            .collect())
    }
}

#[async_trait]
impl MembershipRepository for MemoryTx {
    async fn insert_membership(&mut self, user: UserKey, role: RoleId) -> Result<(), AppError> {
        self.work.memberships.insert((user.tenant, user.user, role));
        Ok(())
    }

    async fn delete_membership(&mut self, user: UserKey, role: RoleId) -> Result<bool, AppError> {
        Ok(self.work.memberships.remove(&(user.tenant, user.user, role)))
    }

    async fn delete_role_memberships(&mut self, role: RoleKey) -> Result<(), AppError> {
        self.work.memberships.retain(|(t, _, r)| !(*t == role.tenant && *r == role.role));
        Ok(())
    }

    async fn delete_user_memberships(&mut self, user: UserKey) -> Result<(), AppError> {
        self.work.memberships.retain(|(t, u, _)| !(*t == user.tenant && *u == user.user));
        Ok(())
    }

    async fn user_roles(&mut self, user: UserKey) -> Result<Vec<RoleId>, AppError> {
        Ok(self
            .work
            .memberships
            .iter()
            .filter(|(t, u, _)| *t == user.tenant && *u == user.user)
            .map(|(_, _, r)| *r)
            .collect())
    }

    async fn role_members(&mut self, role: RoleKey) -> Result<Vec<UserId>, AppError> {
        let members: BTreeSet<UserId> = self
            .work
            .memberships
            .iter()
            .filter(|(t, _, r)| *t == role.tenant && *r == role.role)
            .map(|(_, u, _)| *u)
            .collect();
        Ok(members.into_iter().collect())
    }
}

#[async_trait]
impl UserRepository for MemoryTx {
    async fn insert_user(&mut self, user: &User) -> Result<(), AppError> {
        if self.email_exists(&user.email).await? {
            return Err(AppError::UniquenessViolation { field: "email" });
        }
        self.work.users.insert(user.key(), user.clone());
        Ok(())
    }

    async fn find_user(&mut self, key: UserKey) -> Result<Option<User>, AppError> {
        Ok(self.work.users.get(&key).cloned())
    }

    async fn list_users(&mut self, tenant: TenantId) -> Result<Vec<User>, AppError> {
        Ok(self.work.users.values().filter(|u| u.tenant_id == tenant).cloned().collect())
    }

    async fn email_exists(&mut self, email: &str) -> Result<bool, AppError> {
        Ok(self.work.users.values().any(|u| u.email == email))
    }

    async fn delete_user(&mut self, key: UserKey) -> Result<bool, AppError> {
        let w = &mut self.work;
        if w.users.remove(&key).is_none() {
            return Ok(false);
        }
        w.memberships.retain(|(t, u, _)| !(*t == key.tenant && *u == key.user));
        w.assignments.retain(|(item, u)| !(item.tenant == key.tenant && *u == key.user));

        // Itens criados pelo usuário, com as atribuições dos outros participantes
        let created_tasks: Vec<TaskId> = w
            .tasks
            .values()
            .filter(|t| t.tenant_id == key.tenant && t.created_by == key.user)
            .map(|t| t.id)
            .collect();
        for id in created_tasks {
            w.tasks.remove(&(key.tenant, id));
            w.remove_item_assignments(ItemKey::task(key.tenant, id));
        }

        let created_events: Vec<EventId> = w
            .events
            .values()
            .filter(|e| e.tenant_id == key.tenant && e.created_by == key.user)
            .map(|e| e.id)
            .collect();
        for id in created_events {
            w.events.remove(&(key.tenant, id));
            w.remove_item_assignments(ItemKey::event(key.tenant, id));
        }
        Ok(true)
    }
}

#[async_trait]
impl AssignmentRepository for MemoryTx {
    async fn delete_assignments(&mut self, item: ItemKey) -> Result<u64, AppError> {
        Ok(self.work.remove_item_assignments(item))
    }

    async fn insert_assignment(&mut self, item: ItemKey, user: UserId) -> Result<(), AppError> {
        self.work.assignments.insert((item, user));
        Ok(())
    }

    async fn assignees(&mut self, item: ItemKey) -> Result<Vec<UserId>, AppError> {
        Ok(self
            .work
            .assignments
            .iter()
            .filter(|(key, _)| *key == item)
            .map(|(_, user)| *user)
            .collect())
    }

    async fn assigned_items(&mut self, user: UserKey, kind: ItemKind) -> Result<Vec<i32>, AppError> {
        Ok(self
            .work
            .assignments
            .iter()
            .filter(|(item, u)| item.tenant == user.tenant && item.kind == kind && *u == user.user)
            .map(|(item, _)| item.id)
            .collect())
    }
}

#[async_trait]
impl TaskRepository for MemoryTx {
    async fn insert_task(&mut self, task: &Task) -> Result<(), AppError> {
        self.work.tasks.insert((task.tenant_id, task.id), task.clone());
        Ok(())
    }

    async fn find_task(&mut self, tenant: TenantId, id: TaskId) -> Result<Option<Task>, AppError> {
        Ok(self.work.tasks.get(&(tenant, id)).cloned())
    }

    async fn update_task(&mut self, task: &Task) -> Result<(), AppError> {
        if let Some(current) = self.work.tasks.get_mut(&(task.tenant_id, task.id)) {
            *current = task.clone();
        }
        Ok(())
    }

    async fn delete_task(&mut self, tenant: TenantId, id: TaskId) -> Result<bool, AppError> {
        let removed = self.work.tasks.remove(&(tenant, id)).is_some();
        self.work.remove_item_assignments(ItemKey::task(tenant, id));
        Ok(removed)
    }

    async fn tasks_created_by(&mut self, user: UserKey) -> Result<Vec<Task>, AppError> {
        Ok(self
            .work
            .tasks
            .values()
            .filter(|t| t.tenant_id == user.tenant && t.created_by == user.user)
            .cloned()
            .collect())
    }

    async fn purge_tasks(&mut self, tenant: TenantId) -> Result<u64, AppError> {
        let before = self.work.tasks.len();
        self.work.tasks.retain(|(t, _), _| *t != tenant);
        self.work
            .assignments
            .retain(|(item, _)| !(item.tenant == tenant && item.kind == ItemKind::Task));
        Ok((before - self.work.tasks.len()) as u64)
    }
}

#[async_trait]
impl EventRepository for MemoryTx {
    async fn insert_event(&mut self, event: &Event) -> Result<(), AppError> {
        self.work.events.insert((event.tenant_id, event.id), event.clone());
        Ok(())
    }

    async fn find_event(&mut self, tenant: TenantId, id: EventId) -> Result<Option<Event>, AppError> {
        Ok(self.work.events.get(&(tenant, id)).cloned())
    }

    async fn update_event(&mut self, event: &Event) -> Result<(), AppError> {
        if let Some(current) = self.work.events.get_mut(&(event.tenant_id, event.id)) {
            *current = event.clone();
        }
        Ok(())
    }

    async fn delete_event(&mut self, tenant: TenantId, id: EventId) -> Result<bool, AppError> {
        let removed = self.work.events.remove(&(tenant, id)).is_some();
        self.work.remove_item_assignments(ItemKey::event(tenant, id));
        Ok(removed)
    }

    async fn purge_events(&mut self, tenant: TenantId) -> Result<u64, AppError> {
        let before = self.work.events.len();
        self.work.events.retain(|(t, _), _| *t != tenant);
        self.work
            .assignments
            .retain(|(item, _)| !(item.tenant == tenant && item.kind == ItemKind::Event));
        Ok((before - self.work.events.len()) as u64)
    }
}

#[async_trait]
impl ProductRepository for MemoryTx {
    async fn insert_product(&mut self, product: &Product) -> Result<(), AppError> {
        self.work.products.insert((product.tenant_id, product.id), product.clone());
        Ok(())
    }

    async fn find_product(&mut self, tenant: TenantId, id: ProductId) -> Result<Option<Product>, AppError> {
        Ok(self.work.products.get(&(tenant, id)).cloned())
    }

    async fn list_products(&mut self, tenant: TenantId) -> Result<Vec<Product>, AppError> {
        let mut products: Vec<Product> = self
            .work
            .products
            .values()
            .filter(|p| p.tenant_id == tenant)
            .cloned()
            .collect();
        products.sort_by(|a, b| {
            (a.category.is_none(), &a.category, &a.name).cmp(&(b.category.is_none(), &b.category, &b.name))
        });
        Ok(products)
    }

    async fn update_product(&mut self, product: &Product) -> Result<(), AppError> {
        if let Some(current) = self.work.products.get_mut(&(product.tenant_id, product.id)) {
            *current = product.clone();
        }
        Ok(())
    }

    async fn delete_product(&mut self, tenant: TenantId, id: ProductId) -> Result<bool, AppError> {
        Ok(self.work.products.remove(&(tenant, id)).is_some())
    }

    async fn purge_products(&mut self, tenant: TenantId) -> Result<u64, AppError> {
        let before = self.work.products.len();
        self.work.products.retain(|(t, _), _| *t != tenant);
        Ok((before - self.work.products.len()) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn dropped_transaction_discards_changes() {
        let store = MemoryStore::new();
        let tenant = TenantId(1);

        {
            let mut tx = store.begin().await.unwrap();
            assert_eq!(tx.next_local_id(tenant, SequenceKind::Role).await.unwrap(), 0);
            // sem commit
        }

        let mut tx = store.begin().await.unwrap();
        assert_eq!(tx.next_local_id(tenant, SequenceKind::Role).await.unwrap(), 0);
        tx.commit().await.unwrap();

        let mut tx = store.begin().await.unwrap();
        assert_eq!(tx.next_local_id(tenant, SequenceKind::Role).await.unwrap(), 1);
        // cada tipo tem a sua própria sequência
        assert_eq!(tx.next_local_id(tenant, SequenceKind::Task).await.unwrap(), 0);
    }
}
