// src/common/i18n.rs

use std::collections::HashMap;

pub const DEFAULT_LANG: &str = "es";

// (chave, espanhol, inglês)
const MESSAGES: &[(&str, &str, &str)] = &[
    ("validation_failed", "Uno o más campos son inválidos.", "One or more fields are invalid."),
    ("invalid_credentials", "Correo no encontrado. Por favor, intente de nuevo.", "Email not found. Please try again."),
    ("invalid_token", "Token de autenticación inválido o ausente.", "Missing or invalid authentication token."),
    ("user_not_found", "Usuario no encontrado.", "User not found."),
    ("email_already_exists", "Este correo ya está en uso.", "This email is already in use."),
    ("permission_denied", "Necesitas el permiso '{level}' en el módulo '{module}' para realizar esta acción.", "You need '{level}' permission on module '{module}' to perform this action."),
    ("super_admin_required", "Solo el super administrador puede gestionar permisos.", "Only the super administrator can manage permissions."),
    ("unit_selection_required", "Selecciona una unidad de negocio para continuar.", "Select a business unit to continue."),
    ("concrete_unit_required", "Por favor, selecciona una unidad específica para esta acción.", "Please select a specific unit for this action."),
    ("unit_not_accessible", "No tienes acceso a la unidad '{unit}'.", "You do not have access to unit '{unit}'."),
    ("global_view_not_allowed", "La vista global está reservada a administradores.", "The global view is reserved for administrators."),
    ("unknown_unit", "La unidad '{unit}' no existe.", "Unit '{unit}' does not exist."),
    ("empty_unit_scope", "El usuario debe tener al menos una unidad asignada.", "The user must have at least one assigned unit."),
    ("protected_module", "El módulo '{module}' no se puede modificar.", "Module '{module}' cannot be modified."),
    ("cannot_delete_self", "No puedes eliminar al usuario con el que has iniciado sesión.", "You cannot delete the user you are logged in with."),
    ("recipe_not_found", "Receta '{id}' no encontrada.", "Recipe '{id}' not found."),
    ("ingredient_not_found", "Ingrediente '{id}' no encontrado.", "Ingredient '{id}' not found."),
    ("category_not_found", "Categoría '{name}' no encontrada.", "Category '{name}' not found."),
    ("invalid_category_target", "Debe seleccionar una categoría de destino válida.", "You must choose a valid target category."),
    ("task_not_found", "Tarea '{id}' no encontrada.", "Task '{id}' not found."),
    ("task_already_completed", "La tarea '{id}' ya fue completada.", "Task '{id}' is already completed."),
    ("invalid_assignee", "El usuario {id} no puede recibir tareas de producción.", "User {id} cannot be assigned production tasks."),
    ("batch_not_found", "Lote '{id}' no encontrado.", "Batch '{id}' not found."),
    ("operational_task_not_found", "Tarea operativa '{id}' no encontrada.", "Operational task '{id}' not found."),
    ("internal_error", "Ocurrió un error inesperado.", "An unexpected error occurred."),
];

/// Catálogo de mensagens por idioma. Idiomas desconhecidos caem no espanhol.
#[derive(Debug, Clone)]
pub struct I18nStore {
    catalogs: HashMap<&'static str, HashMap<&'static str, &'static str>>,
}

impl I18nStore {
    pub fn new() -> Self {
        let mut es = HashMap::new();
        let mut en = HashMap::new();
        for (key, es_msg, en_msg) in MESSAGES {
            es.insert(*key, *es_msg);
            en.insert(*key, *en_msg);
        }

        let mut catalogs = HashMap::new();
        catalogs.insert("es", es);
        catalogs.insert("en", en);
        Self { catalogs }
    }

    pub fn translate(&self, lang: &str, key: &str, args: &[(&str, String)]) -> String {
        let template = self
            .catalogs
            .get(lang)
            .and_then(|catalog| catalog.get(key))
            .or_else(|| self.catalogs.get(DEFAULT_LANG).and_then(|c| c.get(key)))
            .copied()
            .unwrap_or(key);

        args.iter().fold(template.to_string(), |msg, (name, value)| {
            msg.replace(&format!("{{{name}}}"), value)
        })
    }
}

impl Default for I18nStore {
    fn default() -> Self {
        Self::new()
    }
}
