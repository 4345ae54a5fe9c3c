mod common;

use std::sync::Arc;

use chrono::{Duration, Utc};

use backoffice::common::error::AppError;
use backoffice::models::ids::{ItemKey, ModuleId, RoleId, RoleKey, UserKey};
use backoffice::models::operations::{
    AssignmentTarget, CreateTaskPayload, EventPayload, TaskStatus, UpdateTaskPayload,
};

use common::{activate, add_user, onboard, state, state_with_notifier, FailingNotifier, RecordingNotifier};

fn task(title: &str, targets: Vec<AssignmentTarget>) -> CreateTaskPayload {
    CreateTaskPayload {
        title: title.to_string(),
        priority: 2,
        due_date: Some(Utc::now().date_naive() + Duration::days(3)),
        targets,
    }
}

fn edit(title: &str, completed: bool, targets: Vec<AssignmentTarget>) -> UpdateTaskPayload {
    UpdateTaskPayload {
        title: title.to_string(),
        priority: 4,
        due_date: None,
        completed,
        targets,
    }
}

fn event(name: &str, days_ahead: i64, targets: Vec<AssignmentTarget>) -> EventPayload {
    let starts_at = Utc::now() + Duration::days(days_ahead);
    EventPayload {
        name: name.to_string(),
        location: Some("Sala 2".to_string()),
        starts_at,
        ends_at: Some(starts_at + Duration::hours(1)),
        targets,
    }
}

// Dono + um membro com acesso às Tarefas e ao Calendário.
async fn team(state: &backoffice::config::AppState<backoffice::db::MemoryStore>) -> (UserKey, UserKey) {
    let owner = onboard(state, 1).await;
    let ana = add_user(state, owner.tenant, "ana").await;
    activate(state, owner.tenant, ModuleId::TASKS).await;
    activate(state, owner.tenant, ModuleId::CALENDAR).await;
    for module in [ModuleId::TASKS, ModuleId::CALENDAR] {
        state
            .rbac_service
            .grant_permission(RoleKey::new(owner.tenant, RoleId::NEW_USER), module)
            .await
            .unwrap();
    }
    (owner, ana)
}

// ---
// Tarefas
// ---

#[tokio::test]
async fn tasks_require_the_tasks_module() {
    let state = state();
    let owner = onboard(&state, 1).await;

    let err = state.task_service.create_task(owner, task("Inventário", vec![])).await.unwrap_err();
    assert!(matches!(err, AppError::PermissionDenied(ModuleId::TASKS)));
}

#[tokio::test]
async fn due_date_in_the_past_is_rejected() {
    let state = state();
    let (owner, _) = team(&state).await;

    let mut payload = task("Inventário", vec![]);
    payload.due_date = Some(Utc::now().date_naive() - Duration::days(2));
    let err = state.task_service.create_task(owner, payload).await.unwrap_err();
    assert!(matches!(err, AppError::ValidationError(_)));

    let mut payload = task("Inventário", vec![]);
    payload.due_date = Some(Utc::now().date_naive() - Duration::days(1));
    state.task_service.create_task(owner, payload).await.unwrap();
}

#[tokio::test]
async fn priority_out_of_range_is_rejected() {
    let state = state();
    let (owner, _) = team(&state).await;

    let mut payload = task("Inventário", vec![]);
    payload.priority = 6;
    let err = state.task_service.create_task(owner, payload).await.unwrap_err();
    assert!(matches!(err, AppError::ValidationError(_)));
}

#[tokio::test]
async fn unknown_target_aborts_the_whole_save() {
    let state = state();
    let (owner, _) = team(&state).await;

    let payload = task("Inventário", vec![AssignmentTarget::Role(RoleId(30))]);
    let err = state.task_service.create_task(owner, payload).await.unwrap_err();
    assert!(matches!(err, AppError::TargetNotFound(_)));

    assert!(state.task_service.created_tasks(owner).await.unwrap().is_empty());

    // A sequência também voltou: a próxima tarefa ainda é a 0
    let created = state.task_service.create_task(owner, task("Inventário", vec![])).await.unwrap();
    assert_eq!(created.task.id.0, 0);
}

#[tokio::test]
async fn assignees_see_the_task() {
    let state = state();
    let (owner, ana) = team(&state).await;

    let created = state
        .task_service
        .create_task(owner, task("Inventário", vec![AssignmentTarget::Role(RoleId::NEW_USER)]))
        .await
        .unwrap();
    assert_eq!(created.status, TaskStatus::Open);
    assert_eq!(created.assignees, vec![ana.user]);

    let assigned = state.task_service.assigned_tasks(ana).await.unwrap();
    assert_eq!(assigned.len(), 1);
    assert_eq!(assigned[0].task.title, "Inventário");

    assert!(state.task_service.assigned_tasks(owner).await.unwrap().is_empty());
    assert_eq!(state.task_service.created_tasks(owner).await.unwrap().len(), 1);
}

#[tokio::test]
async fn only_the_creator_edits_and_deletes() {
    let state = state();
    let (owner, ana) = team(&state).await;
    let created = state
        .task_service
        .create_task(owner, task("Inventário", vec![AssignmentTarget::User(ana.user)]))
        .await
        .unwrap();

    let err = state
        .task_service
        .update_task(ana, created.task.id, edit("Outro", false, vec![]))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));

    let err = state.task_service.delete_task(ana, created.task.id).await.unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));

    state.task_service.delete_task(owner, created.task.id).await.unwrap();
    assert!(state.task_service.assigned_tasks(ana).await.unwrap().is_empty());

    let err = state.task_service.get_task(owner, created.task.id).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound { .. }));
}

#[tokio::test]
async fn completion_and_reopening() {
    let state = state();
    let (owner, ana) = team(&state).await;
    let outsider = add_user(&state, owner.tenant, "bia").await;
    let created = state
        .task_service
        .create_task(owner, task("Inventário", vec![AssignmentTarget::User(ana.user)]))
        .await
        .unwrap();

    // Sem atribuição, sem conclusão
    let err = state.task_service.complete_task(outsider, created.task.id).await.unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));

    let done = state.task_service.complete_task(ana, created.task.id).await.unwrap();
    assert_eq!(done.status, TaskStatus::Completed);
    assert_eq!(done.task.completed_on, Some(Utc::now().date_naive()));

    let err = state.task_service.complete_task(owner, created.task.id).await.unwrap_err();
    assert!(matches!(err, AppError::InvalidTransition(_)));

    let reopened = state
        .task_service
        .update_task(owner, created.task.id, edit("Inventário", false, vec![AssignmentTarget::User(ana.user)]))
        .await
        .unwrap();
    assert_eq!(reopened.status, TaskStatus::Open);
    assert_eq!(reopened.task.completed_on, None);
    assert_eq!(reopened.task.priority, 4);
}

#[tokio::test]
async fn update_replaces_assignees() {
    let state = state();
    let (owner, ana) = team(&state).await;
    let created = state
        .task_service
        .create_task(owner, task("Inventário", vec![AssignmentTarget::User(ana.user)]))
        .await
        .unwrap();

    let updated = state
        .task_service
        .update_task(owner, created.task.id, edit("Inventário", false, vec![AssignmentTarget::User(owner.user)]))
        .await
        .unwrap();
    assert_eq!(updated.assignees, vec![owner.user]);
    assert!(state.task_service.assigned_tasks(ana).await.unwrap().is_empty());
}

#[tokio::test]
async fn notifications_go_to_newly_assigned_users_only() {
    let notifier = Arc::new(RecordingNotifier::default());
    let state = state_with_notifier(notifier.clone());
    let (owner, ana) = team(&state).await;

    let created = state
        .task_service
        .create_task(owner, task("Inventário", vec![AssignmentTarget::User(ana.user)]))
        .await
        .unwrap();
    let item = ItemKey::task(owner.tenant, created.task.id);
    assert_eq!(notifier.sent(), vec![(item, vec![ana.user])]);

    state
        .task_service
        .update_task(
            owner,
            created.task.id,
            edit("Inventário", false, vec![AssignmentTarget::User(ana.user), AssignmentTarget::User(owner.user)]),
        )
        .await
        .unwrap();
    assert_eq!(notifier.sent().last(), Some(&(item, vec![owner.user])));

    // Nada de novo: nenhum aviso
    let before = notifier.sent().len();
    state
        .task_service
        .update_task(owner, created.task.id, edit("Inventário", false, vec![AssignmentTarget::User(ana.user)]))
        .await
        .unwrap();
    assert_eq!(notifier.sent().len(), before);
}

#[tokio::test]
async fn notifier_failure_does_not_fail_the_save() {
    let state = state_with_notifier(Arc::new(FailingNotifier));
    let (owner, ana) = team(&state).await;

    let created = state
        .task_service
        .create_task(owner, task("Inventário", vec![AssignmentTarget::User(ana.user)]))
        .await
        .unwrap();
    assert_eq!(state.task_service.get_task(ana, created.task.id).await.unwrap().assignees, vec![ana.user]);
}

#[tokio::test]
async fn deactivating_tasks_purges_them() {
    let state = state();
    let (owner, ana) = team(&state).await;
    state
        .task_service
        .create_task(owner, task("Inventário", vec![AssignmentTarget::User(ana.user)]))
        .await
        .unwrap();

    state.module_service.deactivate_module(owner.tenant, ModuleId::TASKS).await.unwrap();
    activate(&state, owner.tenant, ModuleId::TASKS).await;

    assert!(state.task_service.created_tasks(owner).await.unwrap().is_empty());
}

#[tokio::test]
async fn removing_a_user_removes_their_tasks() {
    let state = state();
    let (owner, ana) = team(&state).await;
    state
        .task_service
        .create_task(ana, task("Da Ana", vec![AssignmentTarget::User(owner.user)]))
        .await
        .unwrap();
    assert_eq!(state.task_service.assigned_tasks(owner).await.unwrap().len(), 1);

    state.user_service.remove_user(ana).await.unwrap();

    assert!(state.task_service.assigned_tasks(owner).await.unwrap().is_empty());
}

// ---
// Eventos
// ---

#[tokio::test]
async fn creator_always_participates() {
    let state = state();
    let (owner, ana) = team(&state).await;

    let created = state
        .event_service
        .create_event(owner, event("Reunião", 1, vec![AssignmentTarget::User(ana.user)]))
        .await
        .unwrap();
    assert_eq!(created.participants, vec![owner.user, ana.user]);

    // Mesmo quando a edição remove todo mundo
    let updated = state
        .event_service
        .update_event(owner, created.event.id, event("Reunião", 2, vec![]))
        .await
        .unwrap();
    assert_eq!(updated.participants, vec![owner.user]);
    assert!(state.event_service.list_events(ana).await.unwrap().is_empty());
}

#[tokio::test]
async fn event_period_is_validated() {
    let state = state();
    let (owner, _) = team(&state).await;

    let mut backwards = event("Reunião", 1, vec![]);
    backwards.ends_at = Some(backwards.starts_at - Duration::hours(2));
    let err = state.event_service.create_event(owner, backwards).await.unwrap_err();
    assert!(matches!(err, AppError::ValidationError(_)));

    let past = event("Reunião", -1, vec![]);
    let err = state.event_service.create_event(owner, past).await.unwrap_err();
    assert!(matches!(err, AppError::ValidationError(_)));
}

#[tokio::test]
async fn agenda_is_sorted_by_start() {
    let state = state();
    let (owner, ana) = team(&state).await;

    state
        .event_service
        .create_event(owner, event("Depois", 5, vec![AssignmentTarget::User(ana.user)]))
        .await
        .unwrap();
    state
        .event_service
        .create_event(ana, event("Antes", 2, vec![]))
        .await
        .unwrap();

    let names: Vec<String> = state
        .event_service
        .list_events(ana)
        .await
        .unwrap()
        .into_iter()
        .map(|d| d.event.name)
        .collect();
    assert_eq!(names, vec!["Antes".to_string(), "Depois".to_string()]);
}

#[tokio::test]
async fn events_are_edited_by_their_creator_only() {
    let state = state();
    let (owner, ana) = team(&state).await;
    let created = state
        .event_service
        .create_event(owner, event("Reunião", 1, vec![AssignmentTarget::User(ana.user)]))
        .await
        .unwrap();

    let err = state
        .event_service
        .update_event(ana, created.event.id, event("Outra", 1, vec![]))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));

    let err = state.event_service.delete_event(ana, created.event.id).await.unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));

    state.event_service.delete_event(owner, created.event.id).await.unwrap();
    assert!(state.event_service.list_events(owner).await.unwrap().is_empty());
}

#[tokio::test]
async fn event_invitations_skip_the_creator() {
    let notifier = Arc::new(RecordingNotifier::default());
    let state = state_with_notifier(notifier.clone());
    let (owner, ana) = team(&state).await;

    let created = state
        .event_service
        .create_event(owner, event("Reunião", 1, vec![AssignmentTarget::Role(RoleId::OWNER), AssignmentTarget::User(ana.user)]))
        .await
        .unwrap();

    assert_eq!(
        notifier.sent(),
        vec![(ItemKey::event(owner.tenant, created.event.id), vec![ana.user])]
    );
}
