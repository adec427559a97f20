// src/config.rs

use std::env;

use anyhow::Context;
use chrono::Duration;

use crate::{
    common::i18n::I18nStore,
    db::{
        seed, CatalogRepository, ChecklistRepository, ProductionRepository, RbacRepository, SessionRepository,
        Store, TenantRepository, UserRepository, WasteRepository,
    },
    services::{
        auth::AuthService, batch_service::BatchService, checklist_service::ChecklistService,
        dashboard_service::DashboardService, document_service::DocumentService,
        production_service::ProductionService, rbac_service::RbacService, recipe_service::RecipeService,
        tenancy_service::TenantService, user_service::UserService, waste_service::WasteService,
    },
};

// ---
// Configuração lida do ambiente (.env)
// ---
#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: String,
    pub jwt_secret: String,
    pub session_ttl_hours: i64,
    pub label_fonts_dir: String,
    pub seed_demo_data: bool,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let jwt_secret = env::var("JWT_SECRET").context("JWT_SECRET deve ser definido")?;

        let session_ttl_hours = match env::var("SESSION_TTL_HOURS") {
            Ok(raw) => raw
                .parse()
                .with_context(|| format!("SESSION_TTL_HOURS inválido: {raw}"))?,
            Err(_) => 12,
        };

        let seed_demo_data = match env::var("SEED_DEMO_DATA") {
            Ok(raw) => raw
                .parse()
                .with_context(|| format!("SEED_DEMO_DATA inválido: {raw}"))?,
            Err(_) => true,
        };

        Ok(Self {
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string()),
            jwt_secret,
            session_ttl_hours,
            label_fonts_dir: env::var("LABEL_FONTS_DIR").unwrap_or_else(|_| "./fonts".to_string()),
            seed_demo_data,
        })
    }
}

// ---
// Estado compartilhado entre os handlers
// ---
#[derive(Clone)]
pub struct AppState {
    pub store: Store,
    pub i18n_store: I18nStore,

    pub auth_service: AuthService,
    pub tenant_service: TenantService,
    pub rbac_service: RbacService,
    pub user_service: UserService,
    pub recipe_service: RecipeService,
    pub production_service: ProductionService,
    pub batch_service: BatchService,
    pub document_service: DocumentService,
    pub waste_service: WasteService,
    pub checklist_service: ChecklistService,
    pub dashboard_service: DashboardService,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        let tables = if config.seed_demo_data {
            seed::demo_tables()
        } else {
            seed::base_tables()
        };
        Self::with_store(config, Store::new(tables))
    }

    // --- Monta o gráfico de dependências ---
    pub fn with_store(config: &Config, store: Store) -> Self {
        let auth_service = AuthService::new(
            UserRepository::new(),
            SessionRepository::new(),
            TenantRepository::new(),
            config.jwt_secret.clone(),
            Duration::hours(config.session_ttl_hours),
            store.clone(),
        );
        let batch_service = BatchService::new(ProductionRepository::new(), CatalogRepository::new(), store.clone());

        Self {
            i18n_store: I18nStore::new(),
            auth_service,
            tenant_service: TenantService::new(TenantRepository::new(), store.clone()),
            rbac_service: RbacService::new(RbacRepository::new(), store.clone()),
            user_service: UserService::new(
                UserRepository::new(),
                SessionRepository::new(),
                TenantRepository::new(),
                store.clone(),
            ),
            recipe_service: RecipeService::new(CatalogRepository::new(), store.clone()),
            production_service: ProductionService::new(
                ProductionRepository::new(),
                CatalogRepository::new(),
                UserRepository::new(),
                store.clone(),
            ),
            document_service: DocumentService::new(batch_service.clone(), config.label_fonts_dir.clone()),
            batch_service,
            waste_service: WasteService::new(WasteRepository::new(), TenantRepository::new(), store.clone()),
            checklist_service: ChecklistService::new(ChecklistRepository::new(), store.clone()),
            dashboard_service: DashboardService::new(ProductionRepository::new(), store.clone()),
            store,
        }
    }
}
