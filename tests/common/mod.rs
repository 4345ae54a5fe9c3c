// Utilitários compartilhados pelos testes de integração.
#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use backoffice::config::AppState;
use backoffice::db::MemoryStore;
use backoffice::models::auth::NewUserPayload;
use backoffice::models::ids::{ItemKey, ModuleId, TenantId, UserId, UserKey};
use backoffice::models::tenancy::{OnboardTenantPayload, TenantProfile};
use backoffice::services::{AuthService, LogNotifier, Notifier};

pub const JWT_SECRET: &str = "segredo-de-teste";

pub fn state() -> AppState<MemoryStore> {
    state_with_notifier(Arc::new(LogNotifier))
}

pub fn state_with_notifier(notifier: Arc<dyn Notifier>) -> AppState<MemoryStore> {
    AppState::with_store(MemoryStore::new(), AuthService::new(JWT_SECRET.to_string(), 1), notifier)
}

pub fn profile(n: u32) -> TenantProfile {
    TenantProfile {
        name: format!("Empresa {n}"),
        vat_number: format!("IT{n:09}"),
        address: "Via Roma 1".to_string(),
        city: "Firenze".to_string(),
        postal_code: "50100".to_string(),
        phone: format!("+39055{n:06}"),
        logo: None,
    }
}

pub fn new_user(email: &str) -> NewUserPayload {
    NewUserPayload {
        email: email.to_string(),
        first_name: "Mario".to_string(),
        last_name: "Rossi".to_string(),
        phone: None,
    }
}

pub fn onboarding(n: u32) -> OnboardTenantPayload {
    OnboardTenantPayload {
        tenant: profile(n),
        owner: new_user(&format!("owner{n}@example.com")),
    }
}

/// Cadastra a empresa `n` e devolve a chave do dono.
pub async fn onboard(state: &AppState<MemoryStore>, n: u32) -> UserKey {
    let (_, owner) = state.tenant_service.onboard_tenant(onboarding(n)).await.unwrap();
    owner.key()
}

pub async fn add_user(state: &AppState<MemoryStore>, tenant: TenantId, name: &str) -> UserKey {
    let email = format!("{name}@t{tenant}.example.com");
    state.user_service.add_user(tenant, new_user(&email)).await.unwrap().key()
}

pub async fn activate(state: &AppState<MemoryStore>, tenant: TenantId, module: ModuleId) {
    state.module_service.activate_module(tenant, module).await.unwrap();
}

/// Guarda cada aviso recebido.
#[derive(Default)]
pub struct RecordingNotifier {
    pub sent: Mutex<Vec<(ItemKey, Vec<UserId>)>>,
}

impl RecordingNotifier {
    pub fn sent(&self) -> Vec<(ItemKey, Vec<UserId>)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify_assigned(&self, item: ItemKey, users: &[UserId]) -> anyhow::Result<()> {
        self.sent.lock().unwrap().push((item, users.to_vec()));
        Ok(())
    }
}

pub struct FailingNotifier;

#[async_trait]
impl Notifier for FailingNotifier {
    async fn notify_assigned(&self, _item: ItemKey, _users: &[UserId]) -> anyhow::Result<()> {
        anyhow::bail!("serviço de e-mail fora do ar")
    }
}
