// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth & Session ---
        handlers::auth::login,
        handlers::auth::logout,
        handlers::auth::get_session,
        handlers::auth::select_unit,
        handlers::auth::get_filtered_data,

        // --- Tenancy ---
        handlers::tenancy::list_units,

        // --- RBAC ---
        handlers::rbac::get_role_permissions,
        handlers::rbac::update_role_permission,

        // --- Users ---
        handlers::users::list_users,
        handlers::users::create_user,
        handlers::users::update_user,
        handlers::users::delete_user,

        // --- Recipes / Calculator ---
        handlers::recipes::list_recipes,
        handlers::recipes::get_recipe,
        handlers::recipes::create_recipe,
        handlers::recipes::update_recipe,
        handlers::recipes::scale_recipe,

        // --- Ingredients & Categories ---
        handlers::recipes::list_ingredients,
        handlers::recipes::create_ingredient,
        handlers::recipes::update_ingredient,
        handlers::recipes::list_categories,
        handlers::recipes::rename_category,
        handlers::recipes::delete_category,

        // --- Production ---
        handlers::production::list_tasks,
        handlers::production::list_assignees,
        handlers::production::create_task,
        handlers::production::assign_task,
        handlers::production::reorder_tasks,
        handlers::production::complete_task,
        handlers::production::list_timers,
        handlers::production::start_timer,
        handlers::production::pause_timer,

        // --- Batches ---
        handlers::batches::list_batches,
        handlers::batches::get_batch,
        handlers::batches::save_note,
        handlers::documents::batch_qr,
        handlers::documents::batch_label,

        // --- Waste ---
        handlers::waste::list_waste,
        handlers::waste::log_waste,
        handlers::waste::weekly_report,

        // --- Checklists ---
        handlers::checklists::list_board,
        handlers::checklists::list_my_tasks,
        handlers::checklists::update_status,
        handlers::checklists::reorder,
        handlers::checklists::list_templates,
        handlers::checklists::create_template,

        // --- Dashboard ---
        handlers::dashboard::get_weekly_summary,
        handlers::dashboard::get_production_report,
    ),
    components(
        schemas(
            // --- Auth & Session ---
            models::auth::Role,
            models::auth::User,
            models::auth::LoginUserPayload,
            models::auth::UserPayload,
            models::auth::AuthResponse,
            models::session::SessionPhase,
            models::session::SessionView,
            models::session::SelectUnitPayload,
            models::session::FilteredData,

            // --- Tenancy ---
            models::tenancy::UnitId,
            models::tenancy::UnitKind,
            models::tenancy::BusinessUnit,

            // --- RBAC ---
            models::rbac::AppModule,
            models::rbac::PermissionLevel,
            models::rbac::RequiredLevel,
            models::rbac::RolePermissions,
            models::rbac::UpdateRolePermissionPayload,
            models::rbac::ModuleInfo,
            models::rbac::RolePermissionsResponse,

            // --- Recipes ---
            models::recipes::RecipeType,
            models::recipes::MeasureUnit,
            models::recipes::Ingredient,
            models::recipes::RecipeStep,
            models::recipes::Recipe,
            models::recipes::MasterIngredient,
            models::recipes::CategorySummary,
            models::recipes::IngredientPayload,
            models::recipes::RecipePayload,
            models::recipes::ScaleRecipePayload,
            models::recipes::ScaledRecipe,
            models::recipes::MasterIngredientPayload,
            models::recipes::RenameCategoryPayload,
            models::recipes::DeleteCategoryPayload,

            // --- Production ---
            models::production::ProductionStatus,
            models::production::ProductionTask,
            models::production::TimerView,
            models::production::CreateTaskPayload,
            models::production::AssignTaskPayload,
            models::production::ReorderPayload,
            models::production::CompleteTaskPayload,

            // --- Batches ---
            models::batches::BatchStatus,
            models::batches::Batch,
            models::batches::ExpiryState,
            models::batches::BatchDetail,
            models::batches::BatchNotePayload,

            // --- Waste ---
            models::waste::WasteType,
            models::waste::Waste,
            models::waste::LogWastePayload,
            models::waste::WasteSummary,
            models::waste::UnitWasteSummary,
            models::waste::WasteReport,

            // --- Checklists ---
            models::checklist::TaskFrequency,
            models::checklist::ChecklistStatus,
            models::checklist::OperationalTaskTemplate,
            models::checklist::OperationalTask,
            models::checklist::ChecklistKind,
            models::checklist::TemplatePayload,
            models::checklist::ChecklistStatusPayload,

            // --- Dashboard ---
            models::reports::SummaryPeriod,
            models::reports::WeeklySummary,
            models::reports::ProductionByRecipe,
        )
    ),
    tags(
        (name = "Auth", description = "Login e logout"),
        (name = "Session", description = "Unidade ativa e dados recortados"),
        (name = "Tenancy", description = "Unidades de negócio"),
        (name = "RBAC", description = "Permissões por cargo"),
        (name = "Users", description = "Administração de usuários"),
        (name = "Recipes", description = "Catálogo de receitas"),
        (name = "Calculator", description = "Escala de receitas"),
        (name = "Ingredients", description = "Ingredientes mestre e categorias"),
        (name = "Production", description = "Plano de produção e cronômetros"),
        (name = "Batches", description = "Lotes, rastreabilidade e etiquetas"),
        (name = "Waste", description = "Registro e relatório de mermas"),
        (name = "Checklists", description = "Tarefas operacionais e plantillas"),
        (name = "Dashboard", description = "Resumo semanal e relatórios")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(
                Http::new(HttpAuthScheme::Bearer)
            ),
        );
    }
}
