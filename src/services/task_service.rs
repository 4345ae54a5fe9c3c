// src/services/task_service.rs

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{Days, NaiveDate, Utc};
use validator::Validate;

use crate::common::error::AppError;
use crate::common::validation::invalid_field;
use crate::db::prelude::*;
use crate::models::ids::{ItemKey, ItemKind, ModuleId, SequenceKind, TaskId, UserId, UserKey};
use crate::models::operations::{CreateTaskPayload, Task, TaskDetail, TaskStatus, UpdateTaskPayload};
use crate::services::access_service::require_access;
use crate::services::assignment_service::{replace_assignments, resolve_targets};
use crate::services::notification::{notify_assigned, Notifier};

#[derive(Clone)]
pub struct TaskService<S> {
    store: S,
    notifier: Arc<dyn Notifier>,
}

impl<S: Store> TaskService<S> {
    pub fn new(store: S, notifier: Arc<dyn Notifier>) -> Self {
        Self { store, notifier }
    }

    pub async fn create_task(&self, actor: UserKey, payload: CreateTaskPayload) -> Result<TaskDetail, AppError> {
        payload.validate()?;
        let today = Utc::now().date_naive();
        if payload.due_date.is_some_and(|due| is_past_due(due, today)) {
            return Err(invalid_field("dueDate", "past_date", "A data de entrega não pode estar no passado."));
        }

        // 1. Inicia Transação
        let mut tx = self.store.begin().await?;
        require_access(&mut tx, actor, ModuleId::TASKS).await?;

        // 2. Resolve os alvos antes de qualquer escrita
        let assignees = resolve_targets(&mut tx, actor.tenant, &payload.targets).await?;

        // 3. Salva a tarefa e as atribuições juntas
        let id = tx.next_local_id(actor.tenant, SequenceKind::Task).await?;
        let task = Task {
            tenant_id: actor.tenant,
            id: TaskId(id),
            created_by: actor.user,
            title: payload.title,
            priority: payload.priority,
            due_date: payload.due_date,
            created_on: today,
            completed_on: None,
        };
        tx.insert_task(&task).await?;
        replace_assignments(&mut tx, task.key(), &assignees).await?;

        // 4. Commit
        tx.commit().await?;

        tracing::info!(task = %task.key(), assignees = assignees.len(), "📝 Tarefa criada");
        self.notify(task.key(), &assignees).await;
        Ok(detail(task, assignees.into_iter().collect()))
    }

    /// Edição completa (só o criador). Os alvos são resolvidos de novo e
    /// substituem todas as atribuições anteriores.
    pub async fn update_task(
        &self,
        actor: UserKey,
        id: TaskId,
        payload: UpdateTaskPayload,
    ) -> Result<TaskDetail, AppError> {
        payload.validate()?;
        let today = Utc::now().date_naive();

        let mut tx = self.store.begin().await?;
        require_access(&mut tx, actor, ModuleId::TASKS).await?;

        let mut task = find_task(&mut tx, actor, id).await?;
        if task.created_by != actor.user {
            return Err(AppError::Forbidden("Apenas o criador pode editar a tarefa.".into()));
        }
        if payload.due_date != task.due_date && payload.due_date.is_some_and(|due| is_past_due(due, today)) {
            return Err(invalid_field("dueDate", "past_date", "A data de entrega não pode estar no passado."));
        }

        let assignees = resolve_targets(&mut tx, actor.tenant, &payload.targets).await?;
        let previous: BTreeSet<UserId> = tx.assignees(task.key()).await?.into_iter().collect();

        task.title = payload.title;
        task.priority = payload.priority;
        task.due_date = payload.due_date;
        // Concluída -> Aberta só acontece aqui, limpando a conclusão
        task.completed_on = if payload.completed {
            task.completed_on.or(Some(today))
        } else {
            None
        };

        tx.update_task(&task).await?;
        replace_assignments(&mut tx, task.key(), &assignees).await?;

        tx.commit().await?;

        let added: BTreeSet<UserId> = assignees.difference(&previous).copied().collect();
        self.notify(task.key(), &added).await;
        Ok(detail(task, assignees.into_iter().collect()))
    }

    /// Aberta -> Concluída. Permitido ao criador e aos atribuídos.
    pub async fn complete_task(&self, actor: UserKey, id: TaskId) -> Result<TaskDetail, AppError> {
        let mut tx = self.store.begin().await?;
        require_access(&mut tx, actor, ModuleId::TASKS).await?;

        let mut task = find_task(&mut tx, actor, id).await?;
        let assignees = tx.assignees(task.key()).await?;
        if task.created_by != actor.user && !assignees.contains(&actor.user) {
            return Err(AppError::Forbidden("A tarefa não está atribuída a você.".into()));
        }
        if task.status() == TaskStatus::Completed {
            return Err(AppError::InvalidTransition(format!("a tarefa {} já está concluída", task.id)));
        }

        task.completed_on = Some(Utc::now().date_naive());
        tx.update_task(&task).await?;

        tx.commit().await?;

        tracing::info!(task = %task.key(), by = %actor.user, "✅ Tarefa concluída");
        Ok(detail(task, assignees))
    }

    pub async fn delete_task(&self, actor: UserKey, id: TaskId) -> Result<(), AppError> {
        let mut tx = self.store.begin().await?;
        require_access(&mut tx, actor, ModuleId::TASKS).await?;

        let task = find_task(&mut tx, actor, id).await?;
        if task.created_by != actor.user {
            return Err(AppError::Forbidden("Apenas o criador pode apagar a tarefa.".into()));
        }

        tx.delete_assignments(task.key()).await?;
        tx.delete_task(actor.tenant, id).await?;

        tx.commit().await?;

        tracing::info!(task = %task.key(), "🗑️ Tarefa removida");
        Ok(())
    }

    pub async fn get_task(&self, actor: UserKey, id: TaskId) -> Result<TaskDetail, AppError> {
        let mut tx = self.store.begin().await?;
        require_access(&mut tx, actor, ModuleId::TASKS).await?;

        let task = find_task(&mut tx, actor, id).await?;
        let assignees = tx.assignees(task.key()).await?;
        Ok(detail(task, assignees))
    }

    /// Tarefas criadas pelo usuário.
    pub async fn created_tasks(&self, actor: UserKey) -> Result<Vec<TaskDetail>, AppError> {
        let mut tx = self.store.begin().await?;
        require_access(&mut tx, actor, ModuleId::TASKS).await?;

        let mut result = Vec::new();
        for task in tx.tasks_created_by(actor).await? {
            let assignees = tx.assignees(task.key()).await?;
            result.push(detail(task, assignees));
        }
        Ok(result)
    }

    /// Tarefas atribuídas ao usuário.
    pub async fn assigned_tasks(&self, actor: UserKey) -> Result<Vec<TaskDetail>, AppError> {
        let mut tx = self.store.begin().await?;
        require_access(&mut tx, actor, ModuleId::TASKS).await?;

        let mut result = Vec::new();
        for id in tx.assigned_items(actor, ItemKind::Task).await? {
            if let Some(task) = tx.find_task(actor.tenant, TaskId(id)).await? {
                let assignees = tx.assignees(task.key()).await?;
                result.push(detail(task, assignees));
            }
        }
        Ok(result)
    }

    async fn notify(&self, item: ItemKey, users: &BTreeSet<UserId>) {
        notify_assigned(self.notifier.as_ref(), item, users).await;
    }
}

async fn find_task<T: StoreTx>(tx: &mut T, actor: UserKey, id: TaskId) -> Result<Task, AppError> {
    tx.find_task(actor.tenant, id)
        .await?
        .ok_or_else(|| AppError::not_found("Tarefa", id))
}

fn detail(task: Task, assignees: Vec<UserId>) -> TaskDetail {
    let status = task.status();
    TaskDetail { task, status, assignees }
}

// Ontem ainda é aceito como data de entrega.
fn is_past_due(due: NaiveDate, today: NaiveDate) -> bool {
    today.checked_sub_days(Days::new(1)).is_some_and(|limit| due < limit)
}
