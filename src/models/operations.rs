// src/models/operations.rs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::models::ids::{EventId, ItemKey, RoleId, TaskId, TenantId, UserId};

// ---
// Alvos de atribuição
// ---

/// Destino de uma atribuição: um usuário ou um cargo inteiro.
/// Cargos são expandidos para os membros no momento do save.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(tag = "type", content = "id", rename_all = "lowercase")]
pub enum AssignmentTarget {
    User(UserId),
    Role(RoleId),
}

impl std::fmt::Display for AssignmentTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssignmentTarget::User(id) => write!(f, "usuário {}", id),
            AssignmentTarget::Role(id) => write!(f, "cargo {}", id),
        }
    }
}

// ---
// Tarefas
// ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Open,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    #[schema(ignore)]
    pub tenant_id: TenantId,

    #[schema(value_type = i32, example = 0)]
    pub id: TaskId,

    #[schema(value_type = i32)]
    pub created_by: UserId,

    #[schema(example = "Revisar o estoque")]
    pub title: String,

    #[schema(example = 3)]
    pub priority: i16,

    pub due_date: Option<NaiveDate>,
    pub created_on: NaiveDate,
    pub completed_on: Option<NaiveDate>,
}

impl Task {
    pub fn key(&self) -> ItemKey {
        ItemKey::task(self.tenant_id, self.id)
    }

    pub fn status(&self) -> TaskStatus {
        if self.completed_on.is_some() {
            TaskStatus::Completed
        } else {
            TaskStatus::Open
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskPayload {
    #[validate(length(min = 1, max = 200, message = "O título deve ter entre 1 e 200 caracteres."))]
    pub title: String,

    #[validate(range(min = 0, max = 5, message = "A prioridade deve estar entre 0 e 5."))]
    pub priority: i16,

    pub due_date: Option<NaiveDate>,

    #[serde(default)]
    pub targets: Vec<AssignmentTarget>,
}

// Edição completa. `completed = false` reabre uma tarefa concluída.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskPayload {
    #[validate(length(min = 1, max = 200, message = "O título deve ter entre 1 e 200 caracteres."))]
    pub title: String,

    #[validate(range(min = 0, max = 5, message = "A prioridade deve estar entre 0 e 5."))]
    pub priority: i16,

    pub due_date: Option<NaiveDate>,

    pub completed: bool,

    #[serde(default)]
    pub targets: Vec<AssignmentTarget>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TaskDetail {
    #[serde(flatten)]
    pub task: Task,
    pub status: TaskStatus,
    #[schema(value_type = Vec<i32>)]
    pub assignees: Vec<UserId>,
}

// ---
// Eventos do calendário
// ---

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    #[schema(ignore)]
    pub tenant_id: TenantId,

    #[schema(value_type = i32, example = 0)]
    pub id: EventId,

    #[schema(value_type = i32)]
    pub created_by: UserId,

    #[schema(example = "Reunião mensal")]
    pub name: String,

    pub location: Option<String>,
    pub starts_at: DateTime<Utc>,
    pub ends_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Event {
    pub fn key(&self) -> ItemKey {
        ItemKey::event(self.tenant_id, self.id)
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EventPayload {
    #[validate(length(min = 2, max = 200, message = "O nome deve ter entre 2 e 200 caracteres."))]
    pub name: String,

    #[validate(length(max = 200, message = "O local deve ter no máximo 200 caracteres."))]
    pub location: Option<String>,

    pub starts_at: DateTime<Utc>,
    pub ends_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub targets: Vec<AssignmentTarget>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EventDetail {
    #[serde(flatten)]
    pub event: Event,
    #[schema(value_type = Vec<i32>)]
    pub participants: Vec<UserId>,
}
