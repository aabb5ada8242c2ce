use crate::models::{Recipe, category_slug};

/// Keep recipes whose name contains `name_query` and whose category matches
/// `category_query` (empty matches everything). Both queries must already be
/// lowercased.
#[must_use]
pub fn filter_recipes(recipes: &[Recipe], name_query: &str, category_query: &str) -> Vec<Recipe> {
    recipes
        .iter()
        .filter(|r| r.name.to_lowercase().contains(name_query))
        .filter(|r| category_query.is_empty() || r.category.to_lowercase() == category_query)
        .cloned()
        .collect()
}

/// Searchable, category-filtered view over a loaded recipe collection.
///
/// Every setter recomputes `visible` before returning.
#[derive(Debug, Clone, Default)]
pub struct RecipeList {
    all_recipes: Vec<Recipe>,
    name_query: String,
    category_query: String,
    seeded: bool,
    visible: Vec<Recipe>,
}

impl RecipeList {
    #[must_use]
    pub fn new(recipes: Vec<Recipe>) -> Self {
        let mut list = Self::default();
        list.set_recipes(recipes);
        list
    }

    pub fn set_recipes(&mut self, recipes: Vec<Recipe>) {
        self.all_recipes = recipes;
        self.recompute();
    }

    pub fn set_name_query(&mut self, query: &str) {
        self.name_query = query.to_lowercase();
        self.recompute();
    }

    pub fn set_category_query(&mut self, query: &str) {
        self.category_query = category_slug(query);
        self.recompute();
    }

    pub fn reset_filters(&mut self) {
        self.name_query.clear();
        self.category_query.clear();
        self.recompute();
    }

    /// Apply a category coming from navigation (e.g. picked on the category
    /// overview). Only the first seed takes effect.
    pub fn seed_category_from_navigation(&mut self, slug: &str) {
        if self.seeded {
            return;
        }
        self.seeded = true;
        self.set_category_query(slug);
    }

    #[must_use]
    pub fn visible(&self) -> &[Recipe] {
        &self.visible
    }

    #[must_use]
    pub fn all(&self) -> &[Recipe] {
        &self.all_recipes
    }

    #[must_use]
    pub fn name_query(&self) -> &str {
        &self.name_query
    }

    #[must_use]
    pub fn category_query(&self) -> &str {
        &self.category_query
    }

    #[must_use]
    pub fn is_filtered(&self) -> bool {
        !self.name_query.is_empty() || !self.category_query.is_empty()
    }

    fn recompute(&mut self) {
        self.visible = filter_recipes(&self.all_recipes, &self.name_query, &self.category_query);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recipe(name: &str, category: &str) -> Recipe {
        Recipe {
            id: name.to_lowercase().replace(' ', "-"),
            user_id: "u1".into(),
            category_id: category.into(),
            category: category.into(),
            name: name.into(),
            description: String::new(),
            ingredients: vec![],
            steps: vec![],
            difficulty: String::new(),
            cook_time: String::new(),
            prep_time: String::new(),
            image_url: String::new(),
        }
    }

    fn names(list: &RecipeList) -> Vec<&str> {
        list.visible().iter().map(|r| r.name.as_str()).collect()
    }

    fn sample() -> RecipeList {
        RecipeList::new(vec![
            recipe("Tomato Soup", "soup"),
            recipe("Tomato Salad", "salad"),
        ])
    }

    #[test]
    fn test_unfiltered_shows_everything() {
        let list = sample();
        assert_eq!(names(&list), ["Tomato Soup", "Tomato Salad"]);
        assert!(!list.is_filtered());
    }

    #[test]
    fn test_name_then_category_then_reset() {
        let mut list = sample();
        list.set_name_query("tomato");
        assert_eq!(names(&list), ["Tomato Soup", "Tomato Salad"]);

        list.set_category_query("soup");
        assert_eq!(names(&list), ["Tomato Soup"]);

        list.reset_filters();
        assert_eq!(names(&list), ["Tomato Soup", "Tomato Salad"]);
        assert_eq!(list.name_query(), "");
        assert_eq!(list.category_query(), "");
    }

    #[test]
    fn test_queries_normalized_in_setter() {
        let mut list = sample();
        list.set_category_query("SOUP");
        assert_eq!(list.category_query(), "soup");
        assert_eq!(names(&list), ["Tomato Soup"]);

        list.set_name_query("SaLaD");
        assert_eq!(list.name_query(), "salad");
        assert!(list.visible().is_empty());
    }

    #[test]
    fn test_name_query_keeps_whitespace() {
        let mut list = RecipeList::new(vec![
            recipe("Pea Soup", "soup"),
            recipe("Soup Dumplings", "dumplings"),
        ]);
        list.set_name_query(" SOUP");
        assert_eq!(list.name_query(), " soup");
        assert_eq!(names(&list), ["Pea Soup"]);

        // The category query is a slug, so surrounding spaces are dropped
        list.set_name_query("");
        list.set_category_query(" Dumplings ");
        assert_eq!(names(&list), ["Soup Dumplings"]);
    }

    #[test]
    fn test_filter_function_compares_stored_values_verbatim() {
        let recipes = vec![recipe("Tomato Soup", "Soup")];
        // Uppercase queries are never normalized at comparison time
        assert!(filter_recipes(&recipes, "", "SOUP").is_empty());
        assert!(filter_recipes(&recipes, "TOMATO", "").is_empty());
        assert_eq!(filter_recipes(&recipes, "tomato", "soup").len(), 1);
    }

    #[test]
    fn test_category_is_exact_match() {
        let mut list = RecipeList::new(vec![
            recipe("Pea Soup", "soup"),
            recipe("Soup Dumplings", "soups and more"),
        ]);
        list.set_category_query("soup");
        assert_eq!(names(&list), ["Pea Soup"]);
    }

    #[test]
    fn test_seed_applies_once() {
        let mut list = sample();
        list.seed_category_from_navigation("Salad");
        assert_eq!(list.category_query(), "salad");
        assert_eq!(names(&list), ["Tomato Salad"]);

        list.seed_category_from_navigation("soup");
        assert_eq!(list.category_query(), "salad");

        list.set_category_query("soup");
        assert_eq!(names(&list), ["Tomato Soup"]);
    }

    #[test]
    fn test_recompute_idempotent() {
        let mut list = sample();
        list.set_name_query("soup");
        let first = list.visible().to_vec();
        list.set_name_query("soup");
        assert_eq!(list.visible(), first.as_slice());
    }

    #[test]
    fn test_new_recipes_respect_active_filters() {
        let mut list = sample();
        list.set_category_query("salad");
        list.set_recipes(vec![
            recipe("Green Salad", "salad"),
            recipe("Onion Soup", "soup"),
        ]);
        assert_eq!(names(&list), ["Green Salad"]);
    }
}
