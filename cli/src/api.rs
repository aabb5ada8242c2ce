use anyhow::{Context, Result, bail};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;

use cookbook_core::models::{Category, Ingredient, RecipeRecord, User};
use cookbook_core::service::RecipeStore;

pub const DEFAULT_API_URL: &str = "http://localhost:3000";

/// Client for the REST resource server (`/users`, `/recipes`, `/categories`,
/// `/ingredients`).
pub struct RestClient {
    client: reqwest::Client,
    base_url: String,
}

impl RestClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(format!(
                "cookbook-cli/{} (recipe catalog)",
                env!("CARGO_PKG_VERSION")
            ))
            .timeout(std::time::Duration::from_secs(10))
            .connect_timeout(std::time::Duration::from_secs(5))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, what: &str) -> Result<T> {
        tracing::debug!(path, "GET");
        let resp = self
            .client
            .get(self.url(path))
            .send()
            .await
            .with_context(|| format!("Failed to reach the recipe server for {what}"))?
            .error_for_status()
            .with_context(|| format!("Server rejected request for {what}"))?;
        resp.json()
            .await
            .with_context(|| format!("Failed to parse {what} response"))
    }
}

impl RecipeStore for RestClient {
    async fn list_recipes(&self) -> Result<Vec<RecipeRecord>> {
        self.get_json("recipes", "recipes").await
    }

    async fn get_recipe(&self, id: &str) -> Result<RecipeRecord> {
        tracing::debug!(id, "GET recipe");
        let resp = self
            .client
            .get(self.url(&format!("recipes/{id}")))
            .send()
            .await
            .context("Failed to reach the recipe server for recipe")?;
        if resp.status() == StatusCode::NOT_FOUND {
            bail!("Recipe '{id}' not found");
        }
        resp.error_for_status()
            .context("Server rejected request for recipe")?
            .json()
            .await
            .context("Failed to parse recipe response")
    }

    async fn create_recipe(&self, recipe: &RecipeRecord) -> Result<RecipeRecord> {
        tracing::debug!(id = %recipe.id, "POST recipe");
        self.client
            .post(self.url("recipes"))
            .json(recipe)
            .send()
            .await
            .context("Failed to reach the recipe server")?
            .error_for_status()
            .context("Server rejected the new recipe")?
            .json()
            .await
            .context("Failed to parse created recipe")
    }

    async fn update_recipe(&self, recipe: &RecipeRecord) -> Result<RecipeRecord> {
        tracing::debug!(id = %recipe.id, "PUT recipe");
        self.client
            .put(self.url(&format!("recipes/{}", recipe.id)))
            .json(recipe)
            .send()
            .await
            .context("Failed to reach the recipe server")?
            .error_for_status()
            .context("Server rejected the recipe update")?
            .json()
            .await
            .context("Failed to parse updated recipe")
    }

    async fn delete_recipe(&self, id: &str) -> Result<()> {
        tracing::debug!(id, "DELETE recipe");
        self.client
            .delete(self.url(&format!("recipes/{id}")))
            .send()
            .await
            .context("Failed to reach the recipe server")?
            .error_for_status()
            .context("Server rejected the delete")?;
        Ok(())
    }

    async fn list_categories(&self) -> Result<Vec<Category>> {
        self.get_json("categories", "categories").await
    }

    async fn list_ingredients(&self) -> Result<Vec<Ingredient>> {
        self.get_json("ingredients", "ingredients").await
    }

    async fn find_users(&self, username: &str, password: Option<&str>) -> Result<Vec<User>> {
        let mut query = vec![("username", username)];
        if let Some(p) = password {
            query.push(("password", p));
        }
        self.client
            .get(self.url("users"))
            .query(&query)
            .send()
            .await
            .context("Failed to reach the recipe server for users")?
            .error_for_status()
            .context("Server rejected user lookup")?
            .json()
            .await
            .context("Failed to parse users response")
    }

    async fn create_user(&self, user: &User) -> Result<User> {
        self.client
            .post(self.url("users"))
            .json(user)
            .send()
            .await
            .context("Failed to reach the recipe server")?
            .error_for_status()
            .context("Server rejected the new user")?
            .json()
            .await
            .context("Failed to parse created user")
    }
}
