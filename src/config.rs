// src/config.rs

use std::{env, sync::Arc, time::Duration};

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;

use crate::db::{PgStore, Store};
use crate::services::{
    AccessService, AuthService, EventService, InventoryService, LogNotifier, ModuleService,
    Notifier, RbacService, TaskService, TenantService, UserService,
};

// Variáveis de ambiente lidas na inicialização
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub bind_addr: String,
    pub db_max_connections: u32,
    pub token_ttl_hours: i64,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").context("DATABASE_URL deve ser definida")?;
        let jwt_secret = env::var("JWT_SECRET").context("JWT_SECRET deve ser definido")?;
        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());

        let db_max_connections = match env::var("DB_MAX_CONNECTIONS") {
            Ok(value) => value.parse().context("DB_MAX_CONNECTIONS inválido")?,
            Err(_) => 5,
        };
        let token_ttl_hours = match env::var("TOKEN_TTL_HOURS") {
            Ok(value) => value.parse().context("TOKEN_TTL_HOURS inválido")?,
            Err(_) => 168,
        };

        Ok(Self {
            database_url,
            jwt_secret,
            bind_addr,
            db_max_connections,
            token_ttl_hours,
        })
    }
}

/// Estado compartilhado: o store e o gráfico de serviços montado sobre ele.
#[derive(Clone)]
pub struct AppState<S> {
    pub store: S,
    pub auth_service: AuthService,
    pub access_service: AccessService<S>,
    pub tenant_service: TenantService<S>,
    pub module_service: ModuleService<S>,
    pub rbac_service: RbacService<S>,
    pub user_service: UserService<S>,
    pub task_service: TaskService<S>,
    pub event_service: EventService<S>,
    pub inventory_service: InventoryService<S>,
}

impl AppState<PgStore> {
    pub async fn new(config: &Config) -> anyhow::Result<Self> {
        // Conecta ao banco de dados, usando '?' para propagar erros
        let db_pool = PgPoolOptions::new()
            .max_connections(config.db_max_connections)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&config.database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        // Roda as migrações na inicialização
        sqlx::migrate!().run(&db_pool).await?;
        tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

        let auth_service = AuthService::new(config.jwt_secret.clone(), config.token_ttl_hours);
        Ok(Self::with_store(PgStore::new(db_pool), auth_service, Arc::new(LogNotifier)))
    }
}

impl<S: Store> AppState<S> {
    // --- Monta o gráfico de dependências ---
    pub fn with_store(store: S, auth_service: AuthService, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            access_service: AccessService::new(store.clone()),
            tenant_service: TenantService::new(store.clone()),
            module_service: ModuleService::new(store.clone()),
            rbac_service: RbacService::new(store.clone()),
            user_service: UserService::new(store.clone()),
            task_service: TaskService::new(store.clone(), notifier.clone()),
            event_service: EventService::new(store.clone(), notifier),
            inventory_service: InventoryService::new(store.clone()),
            auth_service,
            store,
        }
    }
}
