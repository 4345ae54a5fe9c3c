// src/lib.rs

use axum::{
    middleware as axum_middleware,
    routing::{delete, get, post, put},
    Router,
};

pub mod common;
pub mod config;
pub mod db;
pub mod docs;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;

use crate::config::AppState;
use crate::db::Store;
use crate::middleware::auth::auth_guard;

/// Monta o router completo. Tudo exceto cadastro, health e docs passa pelo `auth_guard`.
pub fn app<S: Store>(app_state: AppState<S>) -> Router {
    let tenant_routes = Router::new()
        .route("/tenant"
               ,get(handlers::tenancy::get_tenant::<S>)
               .put(handlers::tenancy::update_tenant::<S>)
               .delete(handlers::tenancy::delete_tenant::<S>)
        );

    let module_routes = Router::new()
        .route("/", get(handlers::modules::list_catalog::<S>))
        .route("/accessible", get(handlers::modules::list_accessible::<S>))
        .route("/store", get(handlers::modules::list_available::<S>))
        .route("/{id}/activate", post(handlers::modules::activate_module::<S>))
        .route("/{id}/deactivate", post(handlers::modules::deactivate_module::<S>))
        .route("/{id}/roles"
               ,get(handlers::modules::get_grantees::<S>)
               .put(handlers::modules::set_grantees::<S>)
        )
        .route("/{id}/roles/{role}"
               ,post(handlers::modules::grant_permission::<S>)
               .delete(handlers::modules::revoke_permission::<S>)
        );

    let role_routes = Router::new()
        .route("/"
               ,get(handlers::rbac::list_roles::<S>)
               .post(handlers::rbac::create_role::<S>)
        )
        .route("/{id}"
               ,get(handlers::rbac::get_role::<S>)
               .put(handlers::rbac::update_role::<S>)
               .delete(handlers::rbac::delete_role::<S>)
        )
        .route("/{id}/members", put(handlers::rbac::set_role_members::<S>));

    let user_routes = Router::new()
        .route("/"
               ,get(handlers::users::list_users::<S>)
               .post(handlers::users::add_user::<S>)
        )
        .route("/me", get(handlers::users::get_me::<S>))
        .route("/me/first-login", post(handlers::users::complete_first_login::<S>))
        .route("/{id}", delete(handlers::users::remove_user::<S>))
        .route("/{id}/roles"
               ,get(handlers::users::get_user_roles::<S>)
               .put(handlers::users::set_user_roles::<S>)
        );

    let task_routes = Router::new()
        .route("/"
               ,get(handlers::operations::list_created_tasks::<S>)
               .post(handlers::operations::create_task::<S>)
        )
        .route("/assigned", get(handlers::operations::list_assigned_tasks::<S>))
        .route("/{id}"
               ,get(handlers::operations::get_task::<S>)
               .put(handlers::operations::update_task::<S>)
               .delete(handlers::operations::delete_task::<S>)
        )
        .route("/{id}/complete", post(handlers::operations::complete_task::<S>));

    let event_routes = Router::new()
        .route("/"
               ,get(handlers::operations::list_events::<S>)
               .post(handlers::operations::create_event::<S>)
        )
        .route("/{id}"
               ,get(handlers::operations::get_event::<S>)
               .put(handlers::operations::update_event::<S>)
               .delete(handlers::operations::delete_event::<S>)
        );

    let product_routes = Router::new()
        .route("/"
               ,get(handlers::inventory::list_products::<S>)
               .post(handlers::inventory::create_product::<S>)
        )
        .route("/{id}"
               ,get(handlers::inventory::get_product::<S>)
               .put(handlers::inventory::update_product::<S>)
               .delete(handlers::inventory::delete_product::<S>)
        );

    // Rotas protegidas pelo middleware de autenticação
    let protected = Router::new()
        .merge(tenant_routes)
        .nest("/modules", module_routes)
        .nest("/roles", role_routes)
        .nest("/users", user_routes)
        .nest("/tasks", task_routes)
        .nest("/events", event_routes)
        .nest("/products", product_routes)
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard::<S>,
        ));

    let api = Router::new()
        .route("/health", get(handlers::health::health::<S>))
        .route("/openapi.json", get(handlers::health::openapi))
        .route("/tenants", post(handlers::tenancy::onboard_tenant::<S>))
        .merge(protected);

    Router::new()
        .nest("/api", api)
        .with_state(app_state)
}
