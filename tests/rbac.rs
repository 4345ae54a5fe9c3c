mod common;

use std::collections::BTreeSet;

use backoffice::common::error::AppError;
use backoffice::models::ids::{ModuleId, RoleId, RoleKey, TenantId, UserId};
use backoffice::models::rbac::{Role, RolePayload};

use common::{activate, add_user, onboard, state};

fn editors() -> RolePayload {
    RolePayload {
        name: "Editors".to_string(),
        color: "#1e88e5".to_string(),
        description: Some("Conteúdo".to_string()),
    }
}

async fn create_role(state: &backoffice::config::AppState<backoffice::db::MemoryStore>, tenant: TenantId) -> Role {
    state.rbac_service.create_role(tenant, editors()).await.unwrap()
}

#[tokio::test]
async fn concurrent_role_creation_never_reuses_an_id() {
    let state = state();
    let owner = onboard(&state, 1).await;

    let mut handles = Vec::new();
    for _ in 0..10 {
        let service = state.rbac_service.clone();
        handles.push(tokio::spawn(async move {
            service.create_role(owner.tenant, editors()).await.unwrap().id
        }));
    }

    let mut ids = BTreeSet::new();
    for handle in handles {
        ids.insert(handle.await.unwrap());
    }
    let expected: BTreeSet<RoleId> = (3..13).map(RoleId).collect();
    assert_eq!(ids, expected);
}

#[tokio::test]
async fn local_ids_are_independent_per_tenant() {
    let state = state();
    let first = onboard(&state, 1).await;
    let second = onboard(&state, 2).await;

    assert_eq!(create_role(&state, first.tenant).await.id, RoleId(3));
    assert_eq!(create_role(&state, first.tenant).await.id, RoleId(4));
    assert_eq!(create_role(&state, second.tenant).await.id, RoleId(3));
}

#[tokio::test]
async fn system_roles_cannot_be_edited_or_deleted() {
    let state = state();
    let owner = onboard(&state, 1).await;

    for role in [RoleId::OWNER, RoleId::NEW_USER, RoleId::STANDARD_USER] {
        let key = RoleKey::new(owner.tenant, role);
        let err = state.rbac_service.update_role(key, editors()).await.unwrap_err();
        assert!(matches!(err, AppError::ProtectedRoleViolation(r) if r == role));
        let err = state.rbac_service.delete_role(key).await.unwrap_err();
        assert!(matches!(err, AppError::ProtectedRoleViolation(r) if r == role));
    }
}

#[tokio::test]
async fn custom_role_can_be_renamed() {
    let state = state();
    let owner = onboard(&state, 1).await;
    let role = create_role(&state, owner.tenant).await;

    let mut payload = editors();
    payload.name = "Revisores".to_string();
    let updated = state.rbac_service.update_role(role.key(), payload).await.unwrap();
    assert_eq!(updated.name, "Revisores");

    let response = state.rbac_service.get_role(role.key()).await.unwrap();
    assert_eq!(response.role.name, "Revisores");
    assert!(response.members.is_empty());
}

#[tokio::test]
async fn deleting_the_only_grantee_hands_the_module_back_to_the_owner() {
    let state = state();
    let owner = onboard(&state, 1).await;
    activate(&state, owner.tenant, ModuleId::TASKS).await;
    let role = create_role(&state, owner.tenant).await;

    let grantees = state
        .rbac_service
        .set_module_grantees(owner.tenant, ModuleId::TASKS, &[role.id])
        .await
        .unwrap();
    assert_eq!(grantees, vec![role.id]);
    assert!(!state.access_service.is_accessible_module(owner, ModuleId::TASKS).await.unwrap());

    state.rbac_service.delete_role(role.key()).await.unwrap();

    let grantees = state.rbac_service.module_grantees(owner.tenant, ModuleId::TASKS).await.unwrap();
    assert_eq!(grantees, vec![RoleId::OWNER]);
    assert!(state.access_service.is_accessible_module(owner, ModuleId::TASKS).await.unwrap());
}

#[tokio::test]
async fn revoking_the_last_grant_restores_the_owner() {
    let state = state();
    let owner = onboard(&state, 1).await;
    activate(&state, owner.tenant, ModuleId::CALENDAR).await;

    state
        .rbac_service
        .revoke_permission(RoleKey::owner(owner.tenant), ModuleId::CALENDAR)
        .await
        .unwrap();

    let grantees = state.rbac_service.module_grantees(owner.tenant, ModuleId::CALENDAR).await.unwrap();
    assert_eq!(grantees, vec![RoleId::OWNER]);
}

#[tokio::test]
async fn revoking_one_of_several_grants_keeps_the_rest() {
    let state = state();
    let owner = onboard(&state, 1).await;
    activate(&state, owner.tenant, ModuleId::CALENDAR).await;
    state
        .rbac_service
        .grant_permission(RoleKey::new(owner.tenant, RoleId::STANDARD_USER), ModuleId::CALENDAR)
        .await
        .unwrap();

    state
        .rbac_service
        .revoke_permission(RoleKey::owner(owner.tenant), ModuleId::CALENDAR)
        .await
        .unwrap();

    let grantees = state.rbac_service.module_grantees(owner.tenant, ModuleId::CALENDAR).await.unwrap();
    assert_eq!(grantees, vec![RoleId::STANDARD_USER]);
}

#[tokio::test]
async fn empty_grantee_list_means_owner_only() {
    let state = state();
    let owner = onboard(&state, 1).await;

    let grantees = state
        .rbac_service
        .set_module_grantees(owner.tenant, ModuleId::USER_MANAGEMENT, &[])
        .await
        .unwrap();
    assert_eq!(grantees, vec![RoleId::OWNER]);
}

#[tokio::test]
async fn grantees_require_an_active_module_and_existing_roles() {
    let state = state();
    let owner = onboard(&state, 1).await;

    let err = state
        .rbac_service
        .set_module_grantees(owner.tenant, ModuleId::WAREHOUSE, &[RoleId::OWNER])
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::ModuleNotActive(ModuleId::WAREHOUSE)));

    activate(&state, owner.tenant, ModuleId::WAREHOUSE).await;
    let err = state
        .rbac_service
        .set_module_grantees(owner.tenant, ModuleId::WAREHOUSE, &[RoleId(77)])
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound { .. }));

    // A falha não mexeu nas permissões existentes
    let grantees = state.rbac_service.module_grantees(owner.tenant, ModuleId::WAREHOUSE).await.unwrap();
    assert_eq!(grantees, vec![RoleId::OWNER]);
}

#[tokio::test]
async fn assigning_users_replaces_the_member_list() {
    let state = state();
    let owner = onboard(&state, 1).await;
    let ana = add_user(&state, owner.tenant, "ana").await;
    let bia = add_user(&state, owner.tenant, "bia").await;
    let role = create_role(&state, owner.tenant).await;

    let members = state
        .rbac_service
        .assign_users_to_role(role.key(), &[ana.user, bia.user, ana.user])
        .await
        .unwrap();
    assert_eq!(members, vec![ana.user, bia.user]);

    state.rbac_service.assign_users_to_role(role.key(), &[bia.user]).await.unwrap();
    assert_eq!(state.rbac_service.role_members(role.key()).await.unwrap(), vec![bia.user]);
    assert_eq!(state.rbac_service.user_roles(ana).await.unwrap(), vec![RoleId::NEW_USER]);

    let err = state
        .rbac_service
        .assign_users_to_role(role.key(), &[UserId(50)])
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound { .. }));
}

#[tokio::test]
async fn first_login_moves_the_user_to_standard_user() {
    let state = state();
    let owner = onboard(&state, 1).await;
    let ana = add_user(&state, owner.tenant, "ana").await;

    assert_eq!(state.rbac_service.user_roles(ana).await.unwrap(), vec![RoleId::NEW_USER]);

    let roles = state.user_service.complete_first_login(ana).await.unwrap();
    assert_eq!(roles, vec![RoleId::STANDARD_USER]);

    // Segunda chamada não muda nada
    let roles = state.user_service.complete_first_login(ana).await.unwrap();
    assert_eq!(roles, vec![RoleId::STANDARD_USER]);
}

#[tokio::test]
async fn user_roles_can_be_replaced() {
    let state = state();
    let owner = onboard(&state, 1).await;
    let ana = add_user(&state, owner.tenant, "ana").await;
    let role = create_role(&state, owner.tenant).await;

    let roles = state
        .rbac_service
        .set_user_roles(ana, &[role.id, RoleId::STANDARD_USER])
        .await
        .unwrap();
    assert_eq!(roles, vec![RoleId::STANDARD_USER, role.id]);
    assert_eq!(state.rbac_service.role_members(role.key()).await.unwrap(), vec![ana.user]);
}
