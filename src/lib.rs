// src/lib.rs

use axum::{
    middleware as axum_middleware,
    routing::{get, post, put},
    Router,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub mod common;
pub mod config;
pub mod db;
pub mod docs;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;

use crate::config::AppState;
use crate::docs::ApiDoc;
use crate::middleware::{auth::auth_guard, tenancy::unit_guard};

/// Monta o router completo da API.
pub fn create_router(app_state: AppState) -> Router {
    // Autenticado, mas sem exigir unidade: é aqui que a unidade é escolhida
    let session_routes = Router::new()
        .route("/api/auth/logout", post(handlers::auth::logout))
        .route("/api/session", get(handlers::auth::get_session))
        .route("/api/session/unit", put(handlers::auth::select_unit))
        .route(
            "/api/permissions",
            get(handlers::rbac::get_role_permissions).put(handlers::rbac::update_role_permission),
        );

    // Dados e telas por unidade: exigem sessão ativa
    let unit_routes = Router::new()
        .route("/api/session/data", get(handlers::auth::get_filtered_data))
        // --- Usuários ---
        .route(
            "/api/users",
            get(handlers::users::list_users).post(handlers::users::create_user),
        )
        .route(
            "/api/users/{user_id}",
            put(handlers::users::update_user).delete(handlers::users::delete_user),
        )
        // --- Receitas e calculadora ---
        .route(
            "/api/recipes",
            get(handlers::recipes::list_recipes).post(handlers::recipes::create_recipe),
        )
        .route(
            "/api/recipes/{recipe_id}",
            get(handlers::recipes::get_recipe).put(handlers::recipes::update_recipe),
        )
        .route("/api/recipes/{recipe_id}/scale", post(handlers::recipes::scale_recipe))
        // --- Ingredientes e categorias ---
        .route(
            "/api/ingredients",
            get(handlers::recipes::list_ingredients).post(handlers::recipes::create_ingredient),
        )
        .route("/api/ingredients/{ingredient_id}", put(handlers::recipes::update_ingredient))
        .route("/api/categories", get(handlers::recipes::list_categories))
        .route(
            "/api/categories/{name}",
            put(handlers::recipes::rename_category).delete(handlers::recipes::delete_category),
        )
        // --- Produção ---
        .route(
            "/api/production/tasks",
            get(handlers::production::list_tasks).post(handlers::production::create_task),
        )
        .route("/api/production/tasks/reorder", post(handlers::production::reorder_tasks))
        .route(
            "/api/production/tasks/{task_id}/assignee",
            put(handlers::production::assign_task),
        )
        .route(
            "/api/production/tasks/{task_id}/timer/start",
            post(handlers::production::start_timer),
        )
        .route(
            "/api/production/tasks/{task_id}/timer/pause",
            post(handlers::production::pause_timer),
        )
        .route(
            "/api/production/tasks/{task_id}/complete",
            post(handlers::production::complete_task),
        )
        .route("/api/production/timers", get(handlers::production::list_timers))
        .route("/api/production/assignees", get(handlers::production::list_assignees))
        // --- Lotes ---
        .route("/api/batches", get(handlers::batches::list_batches))
        .route("/api/batches/{batch_id}", get(handlers::batches::get_batch))
        .route("/api/batches/{batch_id}/note", put(handlers::batches::save_note))
        .route("/api/batches/{batch_id}/qr.png", get(handlers::documents::batch_qr))
        .route("/api/batches/{batch_id}/label.pdf", get(handlers::documents::batch_label))
        // --- Mermas ---
        .route(
            "/api/waste",
            get(handlers::waste::list_waste).post(handlers::waste::log_waste),
        )
        .route("/api/waste/report", get(handlers::waste::weekly_report))
        // --- Checklists ---
        .route("/api/checklists/board/{kind}", get(handlers::checklists::list_board))
        .route("/api/checklists/mine", get(handlers::checklists::list_my_tasks))
        .route(
            "/api/checklists/tasks/{task_id}/status",
            put(handlers::checklists::update_status),
        )
        .route("/api/checklists/reorder", post(handlers::checklists::reorder))
        .route(
            "/api/templates",
            get(handlers::checklists::list_templates).post(handlers::checklists::create_template),
        )
        // --- Resumo e relatórios ---
        .route("/api/summary", get(handlers::dashboard::get_weekly_summary))
        .route("/api/reports/production", get(handlers::dashboard::get_production_report))
        .layer(axum_middleware::from_fn_with_state(app_state.clone(), unit_guard));

    // O auth_guard envolve o unit_guard: camadas adicionadas depois rodam antes
    let protected_routes = session_routes
        .merge(unit_routes)
        .layer(axum_middleware::from_fn_with_state(app_state.clone(), auth_guard));

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/api/health", get(|| async { "OK" }))
        .route("/api/units", get(handlers::tenancy::list_units))
        .route("/api/auth/login", post(handlers::auth::login))
        .merge(protected_routes)
        .with_state(app_state)
}
