mod common;

use std::collections::BTreeSet;

use backoffice::common::error::AppError;
use backoffice::db::store::AssignmentRepository;
use backoffice::db::{Store, StoreTx};
use backoffice::models::ids::{ItemKey, RoleId, RoleKey, TaskId, UserId};
use backoffice::models::operations::AssignmentTarget;
use backoffice::services::assignment_service::{replace_assignments, resolve_targets};

use common::{add_user, onboard, state};

#[tokio::test]
async fn role_and_user_targets_are_merged_without_duplicates() {
    let state = state();
    let owner = onboard(&state, 1).await;
    let ana = add_user(&state, owner.tenant, "ana").await;
    let bia = add_user(&state, owner.tenant, "bia").await;

    let mut tx = state.store.begin().await.unwrap();
    let users = resolve_targets(
        &mut tx,
        owner.tenant,
        &[
            AssignmentTarget::User(ana.user),
            AssignmentTarget::Role(RoleId::NEW_USER),
            AssignmentTarget::User(owner.user),
        ],
    )
    .await
    .unwrap();

    let expected: BTreeSet<UserId> = [owner.user, ana.user, bia.user].into_iter().collect();
    assert_eq!(users, expected);
}

#[tokio::test]
async fn resolution_ignores_order_and_repetition() {
    let state = state();
    let owner = onboard(&state, 1).await;
    let ana = add_user(&state, owner.tenant, "ana").await;

    let targets = [
        AssignmentTarget::Role(RoleId::OWNER),
        AssignmentTarget::User(ana.user),
        AssignmentTarget::Role(RoleId::NEW_USER),
    ];
    let mut reversed = targets;
    reversed.reverse();
    let doubled: Vec<AssignmentTarget> = targets.iter().chain(targets.iter()).copied().collect();

    let mut tx = state.store.begin().await.unwrap();
    let a = resolve_targets(&mut tx, owner.tenant, &targets).await.unwrap();
    let b = resolve_targets(&mut tx, owner.tenant, &reversed).await.unwrap();
    let c = resolve_targets(&mut tx, owner.tenant, &doubled).await.unwrap();
    assert_eq!(a, b);
    assert_eq!(a, c);
}

#[tokio::test]
async fn empty_role_resolves_to_nobody() {
    let state = state();
    let owner = onboard(&state, 1).await;

    let mut tx = state.store.begin().await.unwrap();
    let users = resolve_targets(&mut tx, owner.tenant, &[AssignmentTarget::Role(RoleId::STANDARD_USER)])
        .await
        .unwrap();
    assert!(users.is_empty());
}

#[tokio::test]
async fn unknown_targets_are_reported() {
    let state = state();
    let owner = onboard(&state, 1).await;

    let mut tx = state.store.begin().await.unwrap();

    let err = resolve_targets(
        &mut tx,
        owner.tenant,
        &[AssignmentTarget::User(owner.user), AssignmentTarget::Role(RoleId(40))],
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::TargetNotFound(AssignmentTarget::Role(RoleId(40)))));

    let err = resolve_targets(&mut tx, owner.tenant, &[AssignmentTarget::User(UserId(9))])
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::TargetNotFound(AssignmentTarget::User(UserId(9)))));
}

#[tokio::test]
async fn targets_from_another_tenant_are_not_found() {
    let state = state();
    let first = onboard(&state, 1).await;
    let second = onboard(&state, 2).await;
    let outsider = add_user(&state, second.tenant, "ana").await;

    let mut tx = state.store.begin().await.unwrap();
    let err = resolve_targets(&mut tx, first.tenant, &[AssignmentTarget::User(outsider.user)])
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::TargetNotFound(_)));
}

#[tokio::test]
async fn replace_overwrites_the_previous_set() {
    let state = state();
    let owner = onboard(&state, 1).await;
    let ana = add_user(&state, owner.tenant, "ana").await;
    let bia = add_user(&state, owner.tenant, "bia").await;
    let item = ItemKey::task(owner.tenant, TaskId(0));

    let mut tx = state.store.begin().await.unwrap();
    let first: BTreeSet<UserId> = [owner.user, ana.user].into_iter().collect();
    replace_assignments(&mut tx, item, &first).await.unwrap();
    let second: BTreeSet<UserId> = [bia.user].into_iter().collect();
    replace_assignments(&mut tx, item, &second).await.unwrap();
    replace_assignments(&mut tx, item, &second).await.unwrap();
    tx.commit().await.unwrap();

    let mut tx = state.store.begin().await.unwrap();
    assert_eq!(tx.assignees(item).await.unwrap(), vec![bia.user]);
}

#[tokio::test]
async fn role_expansion_is_a_snapshot() {
    let state = state();
    let owner = onboard(&state, 1).await;
    let ana = add_user(&state, owner.tenant, "ana").await;
    let item = ItemKey::task(owner.tenant, TaskId(0));

    let mut tx = state.store.begin().await.unwrap();
    let users = resolve_targets(&mut tx, owner.tenant, &[AssignmentTarget::Role(RoleId::NEW_USER)])
        .await
        .unwrap();
    replace_assignments(&mut tx, item, &users).await.unwrap();
    tx.commit().await.unwrap();

    // Quem entra no cargo depois não herda o item
    let bia = add_user(&state, owner.tenant, "bia").await;
    let members = state
        .rbac_service
        .role_members(RoleKey::new(owner.tenant, RoleId::NEW_USER))
        .await
        .unwrap();
    assert_eq!(members, vec![ana.user, bia.user]);

    let mut tx = state.store.begin().await.unwrap();
    assert_eq!(tx.assignees(item).await.unwrap(), vec![ana.user]);
}
