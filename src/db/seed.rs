// src/db/seed.rs

// Dados de demonstração: quatro unidades, dez usuários, o catálogo base e um dia de operação.

use chrono::{Duration, Utc};
use rust_decimal::Decimal;

use crate::{
    db::store::Tables,
    models::{
        auth::{Role, User},
        batches::{Batch, BatchStatus},
        checklist::{ChecklistStatus, OperationalTask, OperationalTaskTemplate, TaskFrequency},
        production::{ProductionStatus, ProductionTask},
        rbac::{AppModule, PermissionLevel, RolePermissions},
        recipes::{Ingredient, MasterIngredient, MeasureUnit, Recipe, RecipeStep, RecipeType},
        tenancy::{BusinessUnit, UnitId, UnitKind, UnitScope},
        waste::{Waste, WasteType},
    },
};

/// Unidades, contas e a tabela de permissões: o mínimo para alguém conseguir entrar.
pub fn base_tables() -> Tables {
    Tables {
        units: business_units(),
        users: users(),
        role_permissions: role_permissions(),
        ..Tables::default()
    }
}

pub fn demo_tables() -> Tables {
    Tables {
        recipes: recipes(),
        master_ingredients: master_ingredients(),
        tasks: production_plan(),
        batches: batches(),
        waste_records: waste_records(),
        task_templates: task_templates(),
        operational_tasks: operational_tasks(),
        ..base_tables()
    }
}

pub fn business_units() -> Vec<BusinessUnit> {
    vec![
        BusinessUnit::new("prod-central", "Producción Central", UnitKind::Production),
        BusinessUnit::new("polanco", "Sucursal Polanco", UnitKind::Branch),
        BusinessUnit::new("tecamachalco", "Sucursal Tecamachalco", UnitKind::Branch),
        BusinessUnit::new("santa-fe", "Sucursal Santa Fe", UnitKind::Branch),
    ]
}

pub fn users() -> Vec<User> {
    let branches = || UnitScope::units(["polanco", "tecamachalco", "santa-fe"]);
    vec![
        User::new(1, "Super Admin", "super@kitchen.com", Role::Admin, UnitScope::AllUnits),
        User::new(2, "Ulises (Jefe Prod)", "ulises@kitchen.com", Role::Produccion, UnitScope::units(["prod-central"])),
        User::new(3, "Servicio Polanco", "servicio.polanco@kitchen.com", Role::Servicio, UnitScope::units(["polanco"])),
        User::new(4, "Cocina Polanco", "cocina.polanco@kitchen.com", Role::Cocina, UnitScope::units(["polanco"])),
        User::new(5, "Ana (Producción)", "ana@kitchen.com", Role::Produccion, UnitScope::units(["prod-central"])),
        User::new(6, "Carlos (Producción)", "carlos@kitchen.com", Role::Produccion, UnitScope::units(["prod-central"])),
        User::new(7, "Chef Regional", "chef.regional@kitchen.com", Role::Cocina, UnitScope::units(["polanco", "tecamachalco"])),
        User::new(8, "Servicio Tecamachalco", "servicio.teca@kitchen.com", Role::Servicio, UnitScope::units(["tecamachalco"])),
        User::new(9, "Admin de Sucursales", "admin.sucursales@kitchen.com", Role::Admin, branches()),
        User::new(10, "Admin de Marketing", "marketing@kitchen.com", Role::Admin, branches())
            .with_override(AppModule::Production, PermissionLevel::None)
            .with_override(AppModule::Batches, PermissionLevel::None),
    ]
}

pub fn role_permissions() -> RolePermissions {
    use AppModule as M;
    use PermissionLevel as L;

    RolePermissions::new()
        .with(
            Role::Admin,
            &[
                (M::Recipes, L::Edit),
                (M::Calculator, L::Edit),
                (M::Production, L::Edit),
                (M::WeeklySummary, L::View),
                (M::Batches, L::Edit),
                (M::Waste, L::Edit),
                (M::ProductionChecklist, L::Edit),
                (M::ServiceChecklist, L::Edit),
                (M::AdminUsers, L::Edit),
                (M::AdminIngredients, L::Edit),
                (M::AdminTaskTemplates, L::Edit),
                (M::AdminReports, L::View),
                (M::AdminPermissions, L::Edit),
            ],
        )
        .with(
            Role::Produccion,
            &[
                (M::Recipes, L::View),
                (M::Calculator, L::Edit),
                (M::Production, L::Edit),
                (M::WeeklySummary, L::View),
                (M::Batches, L::View),
                (M::Waste, L::Edit),
                (M::ProductionChecklist, L::Edit),
                (M::ServiceChecklist, L::None),
                (M::AdminUsers, L::None),
                (M::AdminIngredients, L::None),
                (M::AdminTaskTemplates, L::None),
                (M::AdminReports, L::None),
                (M::AdminPermissions, L::None),
            ],
        )
        .with(
            Role::Servicio,
            &[
                (M::Recipes, L::View),
                (M::Calculator, L::None),
                (M::Production, L::None),
                (M::WeeklySummary, L::None),
                (M::Batches, L::None),
                (M::Waste, L::Edit),
                (M::ProductionChecklist, L::None),
                (M::ServiceChecklist, L::Edit),
                (M::AdminUsers, L::None),
                (M::AdminIngredients, L::None),
                (M::AdminTaskTemplates, L::None),
                (M::AdminReports, L::None),
                (M::AdminPermissions, L::None),
            ],
        )
        .with(
            Role::Cocina,
            &[
                (M::Recipes, L::Edit),
                (M::Calculator, L::Edit),
                (M::Production, L::View),
                (M::WeeklySummary, L::None),
                (M::Batches, L::View),
                (M::Waste, L::Edit),
                (M::ProductionChecklist, L::View),
                (M::ServiceChecklist, L::View),
                (M::AdminUsers, L::None),
                (M::AdminIngredients, L::None),
                (M::AdminTaskTemplates, L::None),
                (M::AdminReports, L::None),
                (M::AdminPermissions, L::None),
            ],
        )
}

fn master_ingredients() -> Vec<MasterIngredient> {
    [
        ("ing-1", "Tomate", "Vegetales", "kg"),
        ("ing-2", "Cebolla", "Vegetales", "kg"),
        ("ing-3", "Ajo", "Vegetales", "pzas"),
        ("ing-4", "Chile Serrano", "Chiles", "pzas"),
        ("ing-5", "Sal", "Condimentos", "kg"),
        ("ing-6", "Pasta Fettuccine", "Pastas", "kg"),
        ("ing-7", "Crema para batir", "Lácteos", "L"),
        ("ing-8", "Queso Parmesano", "Lácteos", "kg"),
        ("ing-9", "Mantequilla", "Lácteos", "kg"),
        ("ing-10", "Pechuga de Pollo", "Proteínas", "kg"),
        ("ing-11", "Jugo de Limón", "Frutas", "L"),
        ("ing-12", "Aceite de Oliva", "Aceites", "L"),
        ("ing-13", "Orégano seco", "Hierbas", "kg"),
        ("ing-14", "Pimienta", "Condimentos", "kg"),
    ]
    .into_iter()
    .map(|(id, name, category, unit)| MasterIngredient {
        id: id.into(),
        name: name.into(),
        category: category.into(),
        unit: unit.into(),
    })
    .collect()
}

fn ingredient(id: &str, name: &str, quantity: Decimal, unit: MeasureUnit) -> Ingredient {
    Ingredient {
        ingredient_id: id.into(),
        ingredient_name: name.into(),
        quantity,
        unit,
    }
}

fn steps(descriptions: &[&str]) -> Vec<RecipeStep> {
    descriptions
        .iter()
        .map(|d| RecipeStep { description: d.to_string() })
        .collect()
}

fn recipes() -> Vec<Recipe> {
    use MeasureUnit::*;

    vec![
        Recipe {
            id: "salsa-roja".into(),
            name: "Salsa Roja Clásica".into(),
            category: "Salsas".into(),
            recipe_type: RecipeType::Produccion,
            ingredients: vec![
                ingredient("ing-1", "Tomate", Decimal::ONE, Kilograms),
                ingredient("ing-2", "Cebolla", Decimal::new(2, 1), Kilograms),
                ingredient("ing-3", "Ajo", Decimal::TWO, Pieces),
                ingredient("ing-4", "Chile Serrano", Decimal::new(3, 0), Pieces),
                ingredient("ing-5", "Sal", Decimal::new(1, 2), Kilograms),
            ],
            steps: steps(&[
                "Asar los tomates, cebolla, ajo y chiles.",
                "Licuar todos los ingredientes asados con sal.",
                "Sazonar en una cacerola caliente por 10 minutos.",
            ]),
            prep_time_minutes: 30,
            expected_yield: Decimal::ONE,
            yield_unit: "L".into(),
            photo_url: Some("https://picsum.photos/seed/salsa/400/300".into()),
            video_url: None,
            shelf_life_days: 5,
        },
        Recipe {
            id: "pasta-alfredo".into(),
            name: "Pasta Alfredo".into(),
            category: "Pastas".into(),
            recipe_type: RecipeType::Servicio,
            ingredients: vec![
                ingredient("ing-6", "Pasta Fettuccine", Decimal::new(5, 1), Kilograms),
                ingredient("ing-7", "Crema para batir", Decimal::new(5, 1), Liters),
                ingredient("ing-8", "Queso Parmesano", Decimal::new(15, 2), Kilograms),
                ingredient("ing-9", "Mantequilla", Decimal::new(5, 2), Kilograms),
                ingredient("ing-3", "Ajo", Decimal::TWO, Pieces),
            ],
            steps: steps(&[
                "Cocer la pasta según las instrucciones del paquete.",
                "En un sartén, derretir la mantequilla y sofreír el ajo picado.",
                "Agregar la crema y el queso parmesano. Cocinar a fuego bajo hasta espesar.",
                "Mezclar la pasta con la salsa.",
            ]),
            prep_time_minutes: 25,
            expected_yield: Decimal::new(4, 0),
            yield_unit: "ord".into(),
            photo_url: Some("https://picsum.photos/seed/pasta/400/300".into()),
            video_url: None,
            shelf_life_days: 3,
        },
        Recipe {
            id: "pollo-parrilla".into(),
            name: "Pollo a la Parrilla Marinado".into(),
            category: "Proteínas".into(),
            recipe_type: RecipeType::Produccion,
            ingredients: vec![
                ingredient("ing-10", "Pechuga de Pollo", Decimal::ONE, Kilograms),
                ingredient("ing-11", "Jugo de Limón", Decimal::new(1, 1), Liters),
                ingredient("ing-12", "Aceite de Oliva", Decimal::new(5, 2), Liters),
                ingredient("ing-13", "Orégano seco", Decimal::new(1, 2), Kilograms),
                ingredient("ing-14", "Pimienta", Decimal::new(5, 3), Kilograms),
            ],
            steps: steps(&[
                "Mezclar jugo de limón, aceite, orégano y pimienta para el marinado.",
                "Marinar el pollo por al menos 30 minutos.",
                "Cocinar el pollo en la parrilla caliente hasta que esté bien cocido.",
            ]),
            prep_time_minutes: 50,
            expected_yield: Decimal::new(8, 1),
            yield_unit: "kg".into(),
            photo_url: Some("https://picsum.photos/seed/pollo/400/300".into()),
            video_url: None,
            shelf_life_days: 4,
        },
    ]
}

fn task(
    id: &str,
    recipe: (&str, &str),
    quantity: i64,
    unit: &str,
    priority: u32,
    status: ProductionStatus,
    assigned_user_id: Option<i64>,
    unit_id: &str,
) -> ProductionTask {
    ProductionTask {
        id: id.into(),
        recipe_id: recipe.0.into(),
        recipe_name: recipe.1.into(),
        quantity_to_produce: Decimal::new(quantity, 0),
        unit: unit.into(),
        priority,
        status,
        assigned_user_id,
        unit_id: UnitId::from(unit_id),
    }
}

fn production_plan() -> Vec<ProductionTask> {
    let salsa = ("salsa-roja", "Salsa Roja Clásica");
    let pollo = ("pollo-parrilla", "Pollo a la Parrilla Marinado");
    let pasta = ("pasta-alfredo", "Pasta Alfredo");
    vec![
        task("task1", salsa, 20, "L", 1, ProductionStatus::Pendiente, Some(2), "prod-central"),
        task("task2", pollo, 15, "kg", 2, ProductionStatus::Pendiente, Some(5), "prod-central"),
        task("task3", pasta, 10, "ord", 3, ProductionStatus::Completado, Some(4), "polanco"),
        task("task4", salsa, 5, "L", 4, ProductionStatus::Pendiente, None, "prod-central"),
    ]
}

fn batches() -> Vec<Batch> {
    let now = Utc::now();
    vec![
        Batch {
            id: "B1721249501".into(),
            recipe_id: "salsa-roja".into(),
            recipe_name: "Salsa Roja Clásica".into(),
            production_date: now - Duration::days(1),
            responsible_user: "Ulises (Jefe Prod)".into(),
            shelf_life_days: 5,
            quantity: Decimal::TEN,
            unit: "L".into(),
            status: BatchStatus::Activo,
            duration_seconds: 1680,
            source_task_id: Some("task1".into()),
            notes: None,
            unit_id: UnitId::from("prod-central"),
        },
        Batch {
            id: "B1721163101".into(),
            recipe_id: "pollo-parrilla".into(),
            recipe_name: "Pollo a la Parrilla Marinado".into(),
            production_date: now - Duration::days(2),
            responsible_user: "Ana (Producción)".into(),
            shelf_life_days: 4,
            quantity: Decimal::new(8, 0),
            unit: "kg".into(),
            status: BatchStatus::Activo,
            duration_seconds: 3300,
            source_task_id: Some("task2".into()),
            notes: Some("El pollo salió un poco seco, revisar tiempo en parrilla la próxima vez.".into()),
            unit_id: UnitId::from("prod-central"),
        },
        Batch {
            id: "B1721076701".into(),
            recipe_id: "pasta-alfredo".into(),
            recipe_name: "Pasta Alfredo".into(),
            production_date: now - Duration::days(3),
            responsible_user: "Cocina Polanco".into(),
            shelf_life_days: 3,
            quantity: Decimal::TEN,
            unit: "ord".into(),
            status: BatchStatus::Activo,
            duration_seconds: 1500,
            source_task_id: Some("task3".into()),
            notes: None,
            unit_id: UnitId::from("polanco"),
        },
    ]
}

fn waste_records() -> Vec<Waste> {
    let now = Utc::now();
    vec![
        Waste {
            id: "W1721310001".into(),
            date: now - Duration::days(1),
            unit_id: UnitId::from("prod-central"),
            waste_type: WasteType::Sobreproduccion,
            related_recipe_or_batch_id: Some("salsa-roja".into()),
            related_recipe_or_batch_name: Some("Salsa Roja Clásica".into()),
            description: None,
            quantity: Decimal::new(15, 1),
            unit: "L".into(),
            responsible_user: "Ulises (Jefe Prod)".into(),
        },
        Waste {
            id: "W1721310002".into(),
            date: now - Duration::days(2),
            unit_id: UnitId::from("polanco"),
            waste_type: WasteType::Caducidad,
            related_recipe_or_batch_id: Some("B1721163101".into()),
            related_recipe_or_batch_name: Some("Pollo a la Parrilla Marinado (Lote B1721163101)".into()),
            description: None,
            quantity: Decimal::new(5, 1),
            unit: "kg".into(),
            responsible_user: "Ana (Producción)".into(),
        },
        Waste {
            id: "W1721310003".into(),
            date: now,
            unit_id: UnitId::from("tecamachalco"),
            waste_type: WasteType::Preparacion,
            related_recipe_or_batch_id: None,
            related_recipe_or_batch_name: None,
            description: Some("Tomates magullados en recepción".into()),
            quantity: Decimal::TWO,
            unit: "kg".into(),
            responsible_user: "Carlos (Producción)".into(),
        },
    ]
}

fn task_templates() -> Vec<OperationalTaskTemplate> {
    use TaskFrequency::*;
    [
        ("opt1", "Limpiar y desinfectar mesas de trabajo", "Usar solución desinfectante en todas las superficies de acero inoxidable.", Diaria, Role::Produccion),
        ("opt2", "Verificar temperaturas de refrigeradores", "Anotar temperaturas de refrigerador 1, 2 y congelador en la bitácora.", Diaria, Role::Produccion),
        ("opt3", "Limpieza profunda de horno", "Ciclo de limpieza completo y revisión de quemadores.", Semanal, Role::Produccion),
        ("opt4", "Revisar y rotar etiquetados (FIFO)", "Asegurarse que todos los productos estén etiquetados y los más antiguos estén al frente.", Diaria, Role::Produccion),
        ("opt5", "Montar línea de servicio fría", "Rellenar todos los contenedores de la barra fría.", Diaria, Role::Servicio),
        ("opt6", "Rellenar salseros y toppings", "Verificar niveles y rellenar todos los dispensadores.", Diaria, Role::Servicio),
        ("opt7", "Limpieza de campana extractora", "Limpiar filtros y superficie de la campana.", Semanal, Role::Servicio),
        ("opt8", "Revisar mise en place de línea", "Verificar que toda la línea esté completa, con producto fresco y rotado.", Diaria, Role::Cocina),
        ("opt9", "Validar registro de mermas", "Revisar bitácora de mermas y validar que los registros del turno sean correctos.", Diaria, Role::Cocina),
    ]
    .into_iter()
    .map(|(id, name, description, frequency, assigned_role)| OperationalTaskTemplate {
        id: id.into(),
        name: name.into(),
        description: description.into(),
        frequency,
        assigned_role,
    })
    .collect()
}

// Instâncias de hoje, copiando nome/descrição/cargo da plantilla
fn operational_tasks() -> Vec<OperationalTask> {
    let templates = task_templates();
    let today = Utc::now();
    [
        ("ot1", "opt1", ChecklistStatus::Pendiente, "prod-central"),
        ("ot2", "opt2", ChecklistStatus::Pendiente, "prod-central"),
        ("ot3", "opt4", ChecklistStatus::EnProgreso, "prod-central"),
        ("ot4", "opt5", ChecklistStatus::Pendiente, "polanco"),
        ("ot5", "opt6", ChecklistStatus::Completado, "polanco"),
        ("ot6", "opt3", ChecklistStatus::Pendiente, "prod-central"),
        ("ot7", "opt5", ChecklistStatus::Pendiente, "tecamachalco"),
        ("ot8", "opt8", ChecklistStatus::Pendiente, "polanco"),
        ("ot9", "opt9", ChecklistStatus::Pendiente, "polanco"),
        ("ot10", "opt8", ChecklistStatus::Pendiente, "tecamachalco"),
    ]
    .into_iter()
    .filter_map(|(id, template_id, status, unit_id)| {
        let template = templates.iter().find(|t| t.id == template_id)?;
        Some(OperationalTask {
            id: id.into(),
            template_id: template.id.clone(),
            name: template.name.clone(),
            description: template.description.clone(),
            date: today,
            status,
            assigned_role: template.assigned_role,
            unit_id: UnitId::from(unit_id),
        })
    })
    .collect()
}
