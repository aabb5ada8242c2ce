use anyhow::{Context, Result, bail};
use std::process;

use cookbook_core::forms::RecipeForm;
use cookbook_core::join::lookup_category;
use cookbook_core::models::{Category, Ingredient, Recipe, format_cooking_time};

use super::Service;
use super::helpers::{parse_ingredient_line, print_recipe_table};

/// Free-form recipe fields shared by `add` and `edit`.
#[derive(Debug, Default)]
pub(crate) struct RecipeFields {
    pub name: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub difficulty: Option<String>,
    pub cook_time: Option<String>,
    pub prep_time: Option<String>,
    pub image_url: Option<String>,
}

/// Changes to the ingredient and step lists of an existing recipe.
/// Positions are 1-based as displayed by `recipes show`.
#[derive(Debug, Default)]
pub(crate) struct ListEdits {
    pub add_ingredients: Vec<String>,
    pub remove_ingredients: Vec<usize>,
    pub add_steps: Vec<String>,
    pub remove_steps: Vec<usize>,
}

pub(crate) async fn cmd_recipe_list(
    svc: &Service,
    search: Option<&str>,
    category: Option<&str>,
    json: bool,
) -> Result<()> {
    let mut list = svc.recipe_list(category).await?;
    if let Some(q) = search {
        list.set_name_query(q);
    }

    let visible = list.visible();
    if visible.is_empty() {
        if json {
            println!("[]");
        } else if list.is_filtered() {
            eprintln!(
                "No recipes match (search: '{}', category: '{}')",
                list.name_query(),
                list.category_query()
            );
        } else {
            eprintln!("No recipes found");
        }
        process::exit(2);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(visible)?);
        return Ok(());
    }

    print_recipe_table(visible);
    if list.is_filtered() {
        eprintln!("{} of {} recipes", visible.len(), list.all().len());
    }
    Ok(())
}

pub(crate) async fn cmd_recipe_show(svc: &Service, id: &str, json: bool) -> Result<()> {
    let recipe = svc.recipe(id).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&recipe)?);
        return Ok(());
    }

    print_recipe_detail(&recipe, svc.session().current_user().map(|u| u.id.as_str()));
    Ok(())
}

fn print_recipe_detail(recipe: &Recipe, viewer_id: Option<&str>) {
    let name = &recipe.name;
    let category = &recipe.category;
    let prep = format_cooking_time(&recipe.prep_time);
    let cook = format_cooking_time(&recipe.cook_time);
    let difficulty = if recipe.difficulty.is_empty() {
        "-"
    } else {
        recipe.difficulty.as_str()
    };
    println!("=== {name} ===");
    println!("  Category: {category}  |  Difficulty: {difficulty}  |  Prep: {prep}  |  Cook: {cook}");
    if !recipe.description.is_empty() {
        println!("\n  {}", recipe.description);
    }

    println!("\n  INGREDIENTS:");
    for (i, ing) in recipe.ingredients.iter().enumerate() {
        let n = i + 1;
        let (iname, qty, unit) = (&ing.name, &ing.quantity, &ing.unit);
        println!("    {n}. {iname}: {qty} {unit}");
    }

    println!("\n  STEPS:");
    for step in &recipe.steps {
        println!("    {}. {}", step.order, step.description);
    }

    if !recipe.image_url.is_empty() {
        println!("\n  Image: {}", recipe.image_url);
    }
    if viewer_id.is_some_and(|v| recipe.is_owned_by(v)) {
        let id = &recipe.id;
        println!("\n  You wrote this recipe. Edit with: cookbook recipes edit {id}");
    }
}

pub(crate) async fn cmd_recipe_add(
    svc: &mut Service,
    fields: RecipeFields,
    ingredients: &[String],
    steps: &[String],
    json: bool,
) -> Result<()> {
    if !svc.session().is_authenticated() {
        bail!("You must be logged in to add recipes. Run: cookbook login <username>");
    }
    let (catalog, categories) = load_catalog(svc).await?;

    let mut form = RecipeForm::new();
    apply_fields(&mut form, fields, &categories)?;
    let lines = ingredients
        .iter()
        .map(|spec| parse_ingredient_line(spec, &catalog))
        .collect::<Result<Vec<_>>>()?;
    form.replace_ingredients(lines);
    form.replace_steps(steps);

    let created = svc.create_recipe(&form).await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&created)?);
    } else {
        let (name, id) = (&created.name, &created.id);
        println!("Created recipe: {name} (id: {id})");
    }
    Ok(())
}

pub(crate) async fn cmd_recipe_edit(
    svc: &mut Service,
    id: &str,
    fields: RecipeFields,
    edits: ListEdits,
    json: bool,
) -> Result<()> {
    if !svc.session().is_authenticated() {
        bail!("You must be logged in to edit recipes. Run: cookbook login <username>");
    }
    let recipe = svc.recipe(id).await?;
    let (catalog, categories) = load_catalog(svc).await?;

    let mut form = RecipeForm::from_recipe(&recipe);
    apply_fields(&mut form, fields, &categories)?;

    // Remove from the back so earlier positions stay valid
    let mut remove_ingredients = edits.remove_ingredients;
    remove_ingredients.sort_unstable_by(|a, b| b.cmp(a));
    remove_ingredients.dedup();
    for pos in remove_ingredients {
        form.remove_ingredient(to_index(pos)?)?;
    }
    let mut remove_steps = edits.remove_steps;
    remove_steps.sort_unstable_by(|a, b| b.cmp(a));
    remove_steps.dedup();
    for pos in remove_steps {
        form.remove_step(to_index(pos)?)?;
    }

    for spec in &edits.add_ingredients {
        form.add_ingredient(parse_ingredient_line(spec, &catalog)?);
    }
    for step in &edits.add_steps {
        form.add_step(step);
    }

    let updated = svc.update_recipe(&form).await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&updated)?);
    } else {
        let name = &updated.name;
        let (ni, ns) = (updated.ingredients.len(), updated.steps.len());
        println!("Updated recipe: {name} ({ni} ingredients, {ns} steps)");
    }
    Ok(())
}

pub(crate) async fn cmd_recipe_delete(svc: &mut Service, id: &str, json: bool) -> Result<()> {
    svc.delete_recipe(id).await?;
    if json {
        println!("{}", serde_json::json!({ "deleted": id }));
    } else {
        println!("Deleted recipe {id}");
    }
    Ok(())
}

async fn load_catalog(svc: &Service) -> Result<(Vec<Ingredient>, Vec<Category>)> {
    tokio::try_join!(svc.ingredients(), svc.categories())
}

fn apply_fields(
    form: &mut RecipeForm,
    fields: RecipeFields,
    categories: &[Category],
) -> Result<()> {
    if let Some(category) = fields.category {
        let found = lookup_category(&category, categories)
            .with_context(|| format!("Unknown category '{category}'. See: cookbook categories"))?;
        form.category_id.clone_from(&found.id);
    }
    if let Some(v) = fields.name {
        form.name = v;
    }
    if let Some(v) = fields.description {
        form.description = v;
    }
    if let Some(v) = fields.difficulty {
        form.difficulty = v;
    }
    if let Some(v) = fields.cook_time {
        form.cook_time = v;
    }
    if let Some(v) = fields.prep_time {
        form.prep_time = v;
    }
    if let Some(v) = fields.image_url {
        form.image_url = v;
    }
    Ok(())
}

fn to_index(position: usize) -> Result<usize> {
    position
        .checked_sub(1)
        .context("Positions start at 1")
}
