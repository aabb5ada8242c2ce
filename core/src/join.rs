//! Resolves the foreign references of raw recipes against the category and
//! ingredient catalogs.
//!
//! A reference with no matching catalog entry never fails the join: the
//! category falls back to [`UNCATEGORIZED`] and the ingredient name to
//! [`UNKNOWN_INGREDIENT`]. `join_all` and `join_one` share the same resolver.

use crate::models::{Category, Ingredient, Recipe, RecipeIngredient, RecipeRecord};

pub const UNCATEGORIZED: &str = "uncategorized";
pub const UNKNOWN_INGREDIENT: &str = "unknown ingredient";

/// Denormalize every recipe, preserving input order.
#[must_use]
pub fn join_all(
    recipes: &[RecipeRecord],
    ingredients: &[Ingredient],
    categories: &[Category],
) -> Vec<Recipe> {
    recipes
        .iter()
        .map(|r| join_one(r, ingredients, categories))
        .collect()
}

#[must_use]
pub fn join_one(recipe: &RecipeRecord, ingredients: &[Ingredient], categories: &[Category]) -> Recipe {
    Recipe {
        id: recipe.id.clone(),
        user_id: recipe.user_id.clone(),
        category_id: recipe.category_id.clone(),
        category: resolve_category(&recipe.id, &recipe.category_id, categories).to_string(),
        name: recipe.name.clone(),
        description: recipe.description.clone(),
        ingredients: recipe
            .ingredients
            .iter()
            .map(|line| RecipeIngredient {
                id: line.id.clone(),
                quantity: line.quantity.clone(),
                unit: line.unit.clone(),
                name: resolve_ingredient(&recipe.id, &line.id, ingredients).to_string(),
            })
            .collect(),
        steps: recipe.steps.clone(),
        difficulty: recipe.difficulty.clone(),
        cook_time: recipe.cook_time.clone(),
        prep_time: recipe.prep_time.clone(),
        image_url: recipe.image_url.clone(),
    }
}

/// Find a category by id, falling back to a case-insensitive name match.
#[must_use]
pub fn lookup_category<'a>(query: &str, categories: &'a [Category]) -> Option<&'a Category> {
    let query = query.trim();
    let lowered = query.to_lowercase();
    categories
        .iter()
        .find(|c| c.id == query)
        .or_else(|| categories.iter().find(|c| c.name.to_lowercase() == lowered))
}

/// Find a catalog ingredient by id, falling back to a case-insensitive name match.
#[must_use]
pub fn lookup_ingredient<'a>(query: &str, ingredients: &'a [Ingredient]) -> Option<&'a Ingredient> {
    let query = query.trim();
    let lowered = query.to_lowercase();
    ingredients
        .iter()
        .find(|i| i.id == query)
        .or_else(|| ingredients.iter().find(|i| i.name.to_lowercase() == lowered))
}

// Linear scans: catalogs are small and ids unique, so the first hit wins.
fn resolve_category<'a>(recipe_id: &str, category_id: &str, categories: &'a [Category]) -> &'a str {
    if let Some(c) = categories.iter().find(|c| c.id == category_id) {
        &c.name
    } else {
        tracing::warn!(recipe_id, category_id, "recipe references an unknown category");
        UNCATEGORIZED
    }
}

fn resolve_ingredient<'a>(
    recipe_id: &str,
    ingredient_id: &str,
    ingredients: &'a [Ingredient],
) -> &'a str {
    if let Some(i) = ingredients.iter().find(|i| i.id == ingredient_id) {
        &i.name
    } else {
        tracing::warn!(recipe_id, ingredient_id, "recipe references an unknown ingredient");
        UNKNOWN_INGREDIENT
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{IngredientLine, Step};

    fn categories() -> Vec<Category> {
        vec![
            Category {
                id: "c1".into(),
                name: "Soup".into(),
            },
            Category {
                id: "c2".into(),
                name: "Salad".into(),
            },
        ]
    }

    fn ingredients() -> Vec<Ingredient> {
        vec![
            Ingredient {
                id: "i1".into(),
                name: "Tomato".into(),
            },
            Ingredient {
                id: "i2".into(),
                name: "Onion".into(),
            },
        ]
    }

    fn record(id: &str, category_id: &str, ingredient_ids: &[&str]) -> RecipeRecord {
        RecipeRecord {
            id: id.into(),
            user_id: "u1".into(),
            category_id: category_id.into(),
            name: format!("Recipe {id}"),
            description: String::new(),
            ingredients: ingredient_ids
                .iter()
                .map(|i| IngredientLine {
                    id: (*i).to_string(),
                    quantity: "1".into(),
                    unit: "pc".into(),
                })
                .collect(),
            steps: vec![Step {
                order: 1,
                description: "Cook".into(),
            }],
            difficulty: "easy".into(),
            cook_time: "20".into(),
            prep_time: "5".into(),
            image_url: String::new(),
        }
    }

    #[test]
    fn test_join_all_empty() {
        assert!(join_all(&[], &ingredients(), &categories()).is_empty());
        assert!(join_all(&[], &[], &[]).is_empty());
    }

    #[test]
    fn test_join_all_resolves_names() {
        let recipes = vec![record("r1", "c1", &["i1", "i2"]), record("r2", "c2", &["i2"])];
        let joined = join_all(&recipes, &ingredients(), &categories());

        assert_eq!(joined.len(), 2);
        assert_eq!(joined[0].id, "r1");
        assert_eq!(joined[0].category, "Soup");
        assert_eq!(joined[0].ingredients[0].name, "Tomato");
        assert_eq!(joined[0].ingredients[1].name, "Onion");
        assert_eq!(joined[1].id, "r2");
        assert_eq!(joined[1].category, "Salad");
        assert_eq!(joined[1].ingredients[0].name, "Onion");
    }

    #[test]
    fn test_join_keeps_raw_fields() {
        let raw = record("r1", "c1", &["i1"]);
        let joined = join_one(&raw, &ingredients(), &categories());
        assert_eq!(joined.to_record(), raw);
    }

    #[test]
    fn test_missing_references_use_placeholders() {
        let raw = record("r1", "nope", &["i1", "missing"]);
        let joined = join_one(&raw, &ingredients(), &categories());
        assert_eq!(joined.category, UNCATEGORIZED);
        assert_eq!(joined.ingredients[0].name, "Tomato");
        assert_eq!(joined.ingredients[1].name, UNKNOWN_INGREDIENT);
    }

    #[test]
    fn test_join_all_and_join_one_agree_on_misses() {
        let raws = vec![record("r1", "nope", &["missing"]), record("r2", "c1", &["i1"])];
        let all = join_all(&raws, &ingredients(), &categories());
        for (raw, joined) in raws.iter().zip(&all) {
            assert_eq!(&join_one(raw, &ingredients(), &categories()), joined);
        }
        assert_eq!(all[0].category, UNCATEGORIZED);
        assert_eq!(all[0].ingredients[0].name, UNKNOWN_INGREDIENT);
        assert_eq!(all[1].category, "Soup");
    }

    #[test]
    fn test_lookup_by_id_or_name() {
        let cats = categories();
        assert_eq!(lookup_category("c2", &cats).unwrap().name, "Salad");
        assert_eq!(lookup_category("soup", &cats).unwrap().id, "c1");
        assert!(lookup_category("dessert", &cats).is_none());

        let ings = ingredients();
        assert_eq!(lookup_ingredient(" ONION ", &ings).unwrap().id, "i2");
        assert_eq!(lookup_ingredient("i1", &ings).unwrap().name, "Tomato");
        assert!(lookup_ingredient("garlic", &ings).is_none());
    }

    #[test]
    fn test_duplicate_ids_first_match_wins() {
        let mut cats = categories();
        cats.push(Category {
            id: "c1".into(),
            name: "Shadowed".into(),
        });
        let joined = join_one(&record("r1", "c1", &[]), &ingredients(), &cats);
        assert_eq!(joined.category, "Soup");
    }
}
