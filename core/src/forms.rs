use anyhow::{Result, bail};

use crate::models::{IngredientLine, Recipe, RecipeRecord, Step};

pub const MIN_CREDENTIAL_LEN: usize = 3;

/// Fresh identifier for an entity created client-side.
#[must_use]
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Accumulates field errors so a form reports every problem at once.
#[derive(Debug, Default)]
struct Problems(Vec<String>);

impl Problems {
    fn required(&mut self, field: &str, value: &str) -> bool {
        if value.trim().is_empty() {
            self.0.push(format!("{field} is required"));
            false
        } else {
            true
        }
    }

    fn min_len(&mut self, field: &str, value: &str, min: usize) {
        if self.required(field, value) && value.chars().count() < min {
            self.0.push(format!("{field} must be at least {min} characters"));
        }
    }

    fn push(&mut self, problem: String) {
        self.0.push(problem);
    }

    fn finish(self) -> Result<()> {
        if self.0.is_empty() {
            Ok(())
        } else {
            bail!("{}", self.0.join("; "))
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

impl LoginForm {
    pub fn validate(&self) -> Result<()> {
        let mut p = Problems::default();
        p.min_len("username", &self.username, MIN_CREDENTIAL_LEN);
        p.min_len("password", &self.password, MIN_CREDENTIAL_LEN);
        p.finish()
    }
}

#[derive(Debug, Clone, Default)]
pub struct RegisterForm {
    pub username: String,
    pub password: String,
    pub confirm_password: String,
}

impl RegisterForm {
    pub fn validate(&self) -> Result<()> {
        let mut p = Problems::default();
        p.min_len("username", &self.username, MIN_CREDENTIAL_LEN);
        p.min_len("password", &self.password, MIN_CREDENTIAL_LEN);
        if p.required("password confirmation", &self.confirm_password)
            && self.password != self.confirm_password
        {
            p.push("passwords do not match".to_string());
        }
        p.finish()
    }
}

/// Editable recipe with ordered ingredient and step lists.
///
/// The record id is chosen when the form is created and never changes, so
/// submitting the same form twice targets the same record.
#[derive(Debug, Clone)]
pub struct RecipeForm {
    id: String,
    owner_id: Option<String>,
    pub category_id: String,
    pub name: String,
    pub description: String,
    pub difficulty: String,
    pub cook_time: String,
    pub prep_time: String,
    pub image_url: String,
    ingredients: Vec<IngredientLine>,
    steps: Vec<Step>,
}

impl Default for RecipeForm {
    fn default() -> Self {
        Self::new()
    }
}

impl RecipeForm {
    /// Blank form with one empty ingredient line and one empty step.
    #[must_use]
    pub fn new() -> Self {
        let mut form = Self {
            id: new_id(),
            owner_id: None,
            category_id: String::new(),
            name: String::new(),
            description: String::new(),
            difficulty: String::new(),
            cook_time: String::new(),
            prep_time: String::new(),
            image_url: String::new(),
            ingredients: Vec::new(),
            steps: Vec::new(),
        };
        form.add_ingredient(blank_line());
        form.add_step("");
        form
    }

    /// Pre-fill from an existing recipe for editing.
    #[must_use]
    pub fn from_recipe(recipe: &Recipe) -> Self {
        let record = recipe.to_record();
        let mut form = Self {
            id: record.id,
            owner_id: Some(record.user_id),
            category_id: record.category_id,
            name: record.name,
            description: record.description,
            difficulty: record.difficulty,
            cook_time: record.cook_time,
            prep_time: record.prep_time,
            image_url: record.image_url,
            ingredients: record.ingredients,
            steps: record.steps,
        };
        form.renumber_steps();
        form
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Owner of the recipe being edited; `None` for a new recipe.
    #[must_use]
    pub fn owner_id(&self) -> Option<&str> {
        self.owner_id.as_deref()
    }

    #[must_use]
    pub fn is_edit(&self) -> bool {
        self.owner_id.is_some()
    }

    #[must_use]
    pub fn ingredients(&self) -> &[IngredientLine] {
        &self.ingredients
    }

    #[must_use]
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn add_ingredient(&mut self, line: IngredientLine) {
        self.ingredients.push(line);
    }

    pub fn remove_ingredient(&mut self, index: usize) -> Result<IngredientLine> {
        if index >= self.ingredients.len() {
            bail!(
                "No ingredient line {} (recipe has {})",
                index + 1,
                self.ingredients.len()
            );
        }
        Ok(self.ingredients.remove(index))
    }

    pub fn replace_ingredients(&mut self, lines: Vec<IngredientLine>) {
        self.ingredients = lines;
    }

    pub fn add_step(&mut self, description: &str) {
        self.steps.push(Step {
            order: 0,
            description: description.to_string(),
        });
        self.renumber_steps();
    }

    pub fn remove_step(&mut self, index: usize) -> Result<Step> {
        if index >= self.steps.len() {
            bail!("No step {} (recipe has {})", index + 1, self.steps.len());
        }
        let removed = self.steps.remove(index);
        self.renumber_steps();
        Ok(removed)
    }

    pub fn replace_steps<S: AsRef<str>>(&mut self, descriptions: &[S]) {
        self.steps.clear();
        for d in descriptions {
            self.add_step(d.as_ref());
        }
    }

    pub fn validate(&self) -> Result<()> {
        let mut p = Problems::default();
        p.required("category", &self.category_id);
        p.required("name", &self.name);
        p.required("description", &self.description);

        if self.ingredients.is_empty() {
            p.push("at least one ingredient is required".to_string());
        }
        for (i, line) in self.ingredients.iter().enumerate() {
            let n = i + 1;
            p.required(&format!("ingredient {n} id"), &line.id);
            p.required(&format!("ingredient {n} quantity"), &line.quantity);
            p.required(&format!("ingredient {n} unit"), &line.unit);
        }

        if self.steps.is_empty() {
            p.push("at least one step is required".to_string());
        }
        for step in &self.steps {
            p.required(&format!("step {} description", step.order), &step.description);
        }
        p.finish()
    }

    /// Validate and flatten into the record the data store persists.
    ///
    /// `user_id` is stamped on new recipes; edits keep their original owner.
    pub fn to_record(&self, user_id: &str) -> Result<RecipeRecord> {
        self.validate()?;
        Ok(RecipeRecord {
            id: self.id.clone(),
            user_id: self
                .owner_id
                .clone()
                .unwrap_or_else(|| user_id.to_string()),
            category_id: self.category_id.trim().to_string(),
            name: self.name.trim().to_string(),
            description: self.description.trim().to_string(),
            ingredients: self
                .ingredients
                .iter()
                .map(|l| IngredientLine {
                    id: l.id.trim().to_string(),
                    quantity: l.quantity.trim().to_string(),
                    unit: l.unit.trim().to_string(),
                })
                .collect(),
            steps: self
                .steps
                .iter()
                .map(|s| Step {
                    order: s.order,
                    description: s.description.trim().to_string(),
                })
                .collect(),
            difficulty: self.difficulty.trim().to_string(),
            cook_time: self.cook_time.trim().to_string(),
            prep_time: self.prep_time.trim().to_string(),
            image_url: self.image_url.trim().to_string(),
        })
    }

    fn renumber_steps(&mut self) {
        for (i, step) in self.steps.iter_mut().enumerate() {
            step.order = u32::try_from(i + 1).unwrap_or(u32::MAX);
        }
    }
}

fn blank_line() -> IngredientLine {
    IngredientLine {
        id: String::new(),
        quantity: String::new(),
        unit: String::new(),
    }
}
