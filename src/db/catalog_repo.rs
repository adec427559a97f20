// src/db/catalog_repo.rs

use std::collections::BTreeMap;

use crate::{
    common::error::AppError,
    db::store::Tables,
    models::recipes::{CategorySummary, MasterIngredient, Recipe},
};

// Receitas + ingredientes mestres (e as categorias derivadas deles)
#[derive(Clone, Default)]
pub struct CatalogRepository;

impl CatalogRepository {
    pub fn new() -> Self {
        Self
    }

    // --- Receitas ---

    pub fn list_recipes(&self, tx: &Tables) -> Vec<Recipe> {
        tx.recipes.clone()
    }

    pub fn find_recipe<'t>(&self, tx: &'t Tables, id: &str) -> Option<&'t Recipe> {
        tx.recipes.iter().find(|r| r.id == id)
    }

    // Novas receitas entram no topo da lista
    pub fn insert_recipe(&self, tx: &mut Tables, recipe: Recipe) -> Recipe {
        tx.recipes.insert(0, recipe.clone());
        recipe
    }

    pub fn update_recipe(&self, tx: &mut Tables, recipe: Recipe) -> Result<Recipe, AppError> {
        let slot = tx
            .recipes
            .iter_mut()
            .find(|r| r.id == recipe.id)
            .ok_or_else(|| AppError::RecipeNotFound(recipe.id.clone()))?;
        *slot = recipe.clone();
        Ok(recipe)
    }

    // --- Ingredientes mestres ---

    pub fn list_ingredients(&self, tx: &Tables) -> Vec<MasterIngredient> {
        let mut ingredients = tx.master_ingredients.clone();
        ingredients.sort_by(|a, b| a.name.cmp(&b.name));
        ingredients
    }

    pub fn insert_ingredient(&self, tx: &mut Tables, ingredient: MasterIngredient) -> MasterIngredient {
        tx.master_ingredients.push(ingredient.clone());
        ingredient
    }

    pub fn update_ingredient(
        &self,
        tx: &mut Tables,
        ingredient: MasterIngredient,
    ) -> Result<MasterIngredient, AppError> {
        let slot = tx
            .master_ingredients
            .iter_mut()
            .find(|i| i.id == ingredient.id)
            .ok_or_else(|| AppError::IngredientNotFound(ingredient.id.clone()))?;
        *slot = ingredient.clone();
        Ok(ingredient)
    }

    // --- Categorias ---

    /// `{nome, quantidade}` ordenado por nome.
    pub fn category_summaries(&self, tx: &Tables) -> Vec<CategorySummary> {
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for ingredient in &tx.master_ingredients {
            *counts.entry(ingredient.category.as_str()).or_default() += 1;
        }
        counts
            .into_iter()
            .map(|(name, count)| CategorySummary {
                name: name.to_string(),
                count,
            })
            .collect()
    }

    pub fn category_exists(&self, tx: &Tables, name: &str) -> bool {
        tx.master_ingredients.iter().any(|i| i.category == name)
    }

    /// Move todos os ingredientes de `from` para `to`. Devolve quantos mudaram.
    pub fn move_category(&self, tx: &mut Tables, from: &str, to: &str) -> usize {
        let mut moved = 0;
        for ingredient in tx.master_ingredients.iter_mut().filter(|i| i.category == from) {
            ingredient.category = to.to_string();
            moved += 1;
        }
        moved
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::seed::demo_tables;

    #[test]
    fn categories_are_counted_and_sorted() {
        let tables = demo_tables();
        let summaries = CatalogRepository::new().category_summaries(&tables);
        let names: Vec<&str> = summaries.iter().map(|c| c.name.as_str()).collect();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);

        let lacteos = summaries.iter().find(|c| c.name == "Lácteos").unwrap();
        assert_eq!(lacteos.count, 3);
    }

    #[test]
    fn move_category_reassigns_every_ingredient() {
        let mut tables = demo_tables();
        let repo = CatalogRepository::new();
        assert_eq!(repo.move_category(&mut tables, "Vegetales", "Verduras"), 3);
        assert!(!repo.category_exists(&tables, "Vegetales"));
        assert!(repo.category_exists(&tables, "Verduras"));
    }
}
