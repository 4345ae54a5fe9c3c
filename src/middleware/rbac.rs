// src/middleware/rbac.rs

use axum::{extract::FromRequestParts, http::request::Parts};
use std::marker::PhantomData;

use crate::{
    common::error::AppError,
    config::AppState,
    db::Store,
    middleware::auth::AuthenticatedUser,
    models::ids::ModuleId,
};

/// 1. O Trait que identifica o módulo exigido pela rota
pub trait ModuleDef: Send + Sync + 'static {
    const ID: ModuleId;
}

/// 2. O Extractor (Guardião)
pub struct RequireModule<M>(pub PhantomData<M>);

// 3. Implementação do FromRequestParts
impl<M, S> FromRequestParts<AppState<S>> for RequireModule<M>
where
    M: ModuleDef,
    S: Store,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState<S>) -> Result<Self, Self::Rejection> {
        // A. Extrai Usuário (colocado pelo auth_guard)
        let user = parts
            .extensions
            .get::<AuthenticatedUser>()
            .copied()
            .ok_or(AppError::InvalidToken)?;

        // B. Exige permissão do cargo no módulo, mesmo se essencial
        state.access_service.authorize_admin(user.0, M::ID).await?;

        Ok(RequireModule(PhantomData))
    }
}

// ---
// MÓDULOS EXIGIDOS (TIPOS)
// ---

pub struct UserManagement;
impl ModuleDef for UserManagement {
    const ID: ModuleId = ModuleId::USER_MANAGEMENT;
}

pub struct RoleManagement;
impl ModuleDef for RoleManagement {
    const ID: ModuleId = ModuleId::ROLE_MANAGEMENT;
}

pub struct ModuleAdmin;
impl ModuleDef for ModuleAdmin {
    const ID: ModuleId = ModuleId::MODULE_ADMIN;
}

pub struct CompanyProfile;
impl ModuleDef for CompanyProfile {
    const ID: ModuleId = ModuleId::COMPANY_PROFILE;
}

pub struct ModuleStore;
impl ModuleDef for ModuleStore {
    const ID: ModuleId = ModuleId::STORE;
}
