// src/models/ids.rs

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// Gera os ids numéricos. Todos são `i32` no banco (INTEGER).
macro_rules! numeric_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord,
            Serialize, Deserialize, sqlx::Type, ToSchema,
        )]
        #[serde(transparent)]
        #[sqlx(transparent)]
        pub struct $name(pub i32);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i32> for $name {
            fn from(value: i32) -> Self {
                Self(value)
            }
        }
    };
}

numeric_id!(
    /// Id global do tenant (gerado pelo banco).
    TenantId
);
numeric_id!(
    /// Id do módulo no catálogo global.
    ModuleId
);
numeric_id!(
    /// Id local do cargo, único apenas dentro do tenant.
    RoleId
);
numeric_id!(
    /// Id local do usuário, único apenas dentro do tenant.
    UserId
);
numeric_id!(TaskId);
numeric_id!(EventId);
numeric_id!(ProductId);

impl RoleId {
    pub const OWNER: RoleId = RoleId(0);
    pub const NEW_USER: RoleId = RoleId(1);
    pub const STANDARD_USER: RoleId = RoleId(2);

    /// Cargos de sistema: não podem ser apagados nem renomeados.
    pub fn is_protected(self) -> bool {
        (0..=2).contains(&self.0)
    }
}

impl ModuleId {
    pub const USER_MANAGEMENT: ModuleId = ModuleId(0);
    pub const ROLE_MANAGEMENT: ModuleId = ModuleId(1);
    pub const MODULE_ADMIN: ModuleId = ModuleId(2);
    pub const COMPANY_PROFILE: ModuleId = ModuleId(3);
    pub const CALENDAR: ModuleId = ModuleId(4);
    pub const TASKS: ModuleId = ModuleId(5);
    pub const WAREHOUSE: ModuleId = ModuleId(6);
    pub const STORE: ModuleId = ModuleId(9999);
}

// ---
// Identidades compostas
// ---

/// Referência a um usuário: (tenant, id local).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserKey {
    pub tenant: TenantId,
    pub user: UserId,
}

impl UserKey {
    pub fn new(tenant: TenantId, user: UserId) -> Self {
        Self { tenant, user }
    }
}

impl fmt::Display for UserKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.tenant, self.user)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleKey {
    pub tenant: TenantId,
    pub role: RoleId,
}

impl RoleKey {
    pub fn new(tenant: TenantId, role: RoleId) -> Self {
        Self { tenant, role }
    }

    pub fn owner(tenant: TenantId) -> Self {
        Self::new(tenant, RoleId::OWNER)
    }
}

impl fmt::Display for RoleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.tenant, self.role)
    }
}

/// Tipo de item operacional que recebe atribuições.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Task,
    Event,
}

impl ItemKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ItemKind::Task => "task",
            ItemKind::Event => "event",
        }
    }
}

/// Item operacional identificado por (tenant, tipo, id local).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemKey {
    pub tenant: TenantId,
    pub kind: ItemKind,
    pub id: i32,
}

impl ItemKey {
    pub fn task(tenant: TenantId, id: TaskId) -> Self {
        Self { tenant, kind: ItemKind::Task, id: id.0 }
    }

    pub fn event(tenant: TenantId, id: EventId) -> Self {
        Self { tenant, kind: ItemKind::Event, id: id.0 }
    }
}

impl fmt::Display for ItemKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}/{}", self.kind.as_str(), self.tenant, self.id)
    }
}

/// Sequências de ids locais mantidas por tenant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SequenceKind {
    Role,
    User,
    Task,
    Event,
    Product,
}

impl SequenceKind {
    pub fn as_str(self) -> &'static str {
        match self {
            SequenceKind::Role => "role",
            SequenceKind::User => "user",
            SequenceKind::Task => "task",
            SequenceKind::Event => "event",
            SequenceKind::Product => "product",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_roles_are_protected() {
        assert!(RoleId::OWNER.is_protected());
        assert!(RoleId::NEW_USER.is_protected());
        assert!(RoleId::STANDARD_USER.is_protected());
        assert!(!RoleId(3).is_protected());
        assert!(!RoleId(-1).is_protected());
    }

    #[test]
    fn same_local_id_in_different_tenants_are_distinct_keys() {
        let a = RoleKey::owner(TenantId(1));
        let b = RoleKey::owner(TenantId(2));
        assert_ne!(a, b);
        assert_eq!(a, RoleKey::new(TenantId(1), RoleId(0)));
    }

    #[test]
    fn ids_serialize_as_plain_numbers() {
        let json = serde_json::to_string(&UserId(7)).unwrap();
        assert_eq!(json, "7");
        let key = serde_json::to_value(UserKey::new(TenantId(1), UserId(2))).unwrap();
        assert_eq!(key, serde_json::json!({ "tenant": 1, "user": 2 }));
    }
}
