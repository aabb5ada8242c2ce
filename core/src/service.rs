use anyhow::{Context, Result, bail};

use crate::forms::{LoginForm, RecipeForm, RegisterForm, new_id};
use crate::join::{join_all, join_one};
use crate::listing::RecipeList;
use crate::models::{Category, Ingredient, Recipe, RecipeRecord, SessionUser, User};
use crate::session::SessionStore;

/// Resource client for the REST data store.
///
/// The CLI implements this with reqwest; tests use an in-memory store.
/// Every method is a single request with no retry.
#[allow(async_fn_in_trait)]
pub trait RecipeStore {
    async fn list_recipes(&self) -> Result<Vec<RecipeRecord>>;
    async fn get_recipe(&self, id: &str) -> Result<RecipeRecord>;
    async fn create_recipe(&self, recipe: &RecipeRecord) -> Result<RecipeRecord>;
    async fn update_recipe(&self, recipe: &RecipeRecord) -> Result<RecipeRecord>;
    async fn delete_recipe(&self, id: &str) -> Result<()>;
    async fn list_categories(&self) -> Result<Vec<Category>>;
    async fn list_ingredients(&self) -> Result<Vec<Ingredient>>;
    /// Users matching `username`, and `password` when given.
    async fn find_users(&self, username: &str, password: Option<&str>) -> Result<Vec<User>>;
    async fn create_user(&self, user: &User) -> Result<User>;
}

pub struct CookbookService<S> {
    store: S,
    session: SessionStore,
}

impl<S: RecipeStore> CookbookService<S> {
    pub fn new(store: S, session: SessionStore) -> Self {
        Self { store, session }
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    // --- Catalog ---

    /// Fetch recipes, ingredients and categories together and join them.
    /// Fails as a whole if any of the three requests fails.
    pub async fn all_recipes(&self) -> Result<Vec<Recipe>> {
        let (recipes, ingredients, categories) = futures::try_join!(
            self.store.list_recipes(),
            self.store.list_ingredients(),
            self.store.list_categories(),
        )?;
        tracing::debug!(
            recipes = recipes.len(),
            ingredients = ingredients.len(),
            categories = categories.len(),
            "joining catalog"
        );
        Ok(join_all(&recipes, &ingredients, &categories))
    }

    pub async fn recipe(&self, id: &str) -> Result<Recipe> {
        let (recipe, ingredients, categories) = futures::try_join!(
            self.store.get_recipe(id),
            self.store.list_ingredients(),
            self.store.list_categories(),
        )?;
        Ok(join_one(&recipe, &ingredients, &categories))
    }

    /// Load the list view, optionally seeded with a category slug.
    pub async fn recipe_list(&self, category_seed: Option<&str>) -> Result<RecipeList> {
        let mut list = RecipeList::new(self.all_recipes().await?);
        if let Some(slug) = category_seed {
            list.seed_category_from_navigation(slug);
        }
        Ok(list)
    }

    pub async fn categories(&self) -> Result<Vec<Category>> {
        self.store.list_categories().await
    }

    pub async fn ingredients(&self) -> Result<Vec<Ingredient>> {
        self.store.list_ingredients().await
    }

    // --- Authentication ---

    pub async fn login(&mut self, form: &LoginForm) -> Result<SessionUser> {
        form.validate()?;
        let users = self
            .store
            .find_users(&form.username, Some(&form.password))
            .await
            .context("Could not reach the server")?;
        let Some(user) = users.into_iter().next() else {
            bail!("Invalid username or password");
        };
        let user = SessionUser::from(user);
        self.session.set_user(user.clone())?;
        tracing::info!(username = %user.username, "logged in");
        Ok(user)
    }

    pub async fn register(&mut self, form: &RegisterForm) -> Result<SessionUser> {
        form.validate()?;
        let existing = self
            .store
            .find_users(&form.username, None)
            .await
            .context("Could not reach the server")?;
        if !existing.is_empty() {
            bail!("Username '{}' is already taken", form.username);
        }

        let created = self
            .store
            .create_user(&User {
                id: new_id(),
                username: form.username.clone(),
                password: form.password.clone(),
            })
            .await
            .context("Registration failed")?;
        let user = SessionUser::from(created);
        self.session.set_user(user.clone())?;
        tracing::info!(username = %user.username, "registered");
        Ok(user)
    }

    pub fn logout(&mut self) -> Result<()> {
        self.session.clear_user()
    }

    // --- Recipe editing ---

    pub async fn create_recipe(&mut self, form: &RecipeForm) -> Result<RecipeRecord> {
        let user = self.require_user()?;
        if form.is_edit() {
            bail!("This form edits an existing recipe; use update instead");
        }
        let record = form.to_record(&user.id)?;
        self.store
            .create_recipe(&record)
            .await
            .context("Failed to save recipe")
    }

    pub async fn update_recipe(&mut self, form: &RecipeForm) -> Result<RecipeRecord> {
        let user = self.require_user()?;
        let existing = self.store.get_recipe(form.id()).await?;
        ensure_owner(&existing, user)?;
        let record = form.to_record(&user.id)?;
        self.store
            .update_recipe(&record)
            .await
            .context("Failed to save recipe")
    }

    pub async fn delete_recipe(&mut self, id: &str) -> Result<()> {
        let user = self.require_user()?;
        let existing = self.store.get_recipe(id).await?;
        ensure_owner(&existing, user)?;
        self.store
            .delete_recipe(id)
            .await
            .context("Failed to delete recipe")
    }

    fn require_user(&self) -> Result<&SessionUser> {
        self.session
            .current_user()
            .context("You must be logged in to do that")
    }
}

fn ensure_owner(recipe: &RecipeRecord, user: &SessionUser) -> Result<()> {
    if recipe.user_id != user.id {
        bail!("Only the author of '{}' can change it", recipe.name);
    }
    Ok(())
}
