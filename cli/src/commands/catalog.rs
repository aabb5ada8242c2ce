use anyhow::Result;
use std::process;
use tabled::{Table, Tabled, settings::Style};

use cookbook_core::models::category_slug;

use super::Service;
use super::helpers::truncate;

pub(crate) async fn cmd_categories(svc: &Service, json: bool) -> Result<()> {
    #[derive(Tabled)]
    struct CategoryRow {
        #[tabled(rename = "ID")]
        id: String,
        #[tabled(rename = "Category")]
        name: String,
        #[tabled(rename = "Filter with")]
        filter: String,
    }

    let categories = svc.categories().await?;
    if categories.is_empty() {
        if json {
            println!("[]");
        } else {
            eprintln!("No categories found");
        }
        process::exit(2);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&categories)?);
        return Ok(());
    }

    let rows: Vec<CategoryRow> = categories
        .iter()
        .map(|c| CategoryRow {
            id: c.id.clone(),
            name: c.name.clone(),
            filter: format!("--category \"{}\"", category_slug(&c.name)),
        })
        .collect();
    let table = Table::new(&rows).with(Style::rounded()).to_string();
    println!("{table}");
    Ok(())
}

pub(crate) async fn cmd_ingredients(svc: &Service, search: Option<&str>, json: bool) -> Result<()> {
    #[derive(Tabled)]
    struct IngredientRow {
        #[tabled(rename = "ID")]
        id: String,
        #[tabled(rename = "Name")]
        name: String,
    }

    let needle = search.map(str::to_lowercase);
    let ingredients: Vec<_> = svc
        .ingredients()
        .await?
        .into_iter()
        .filter(|i| {
            needle
                .as_deref()
                .is_none_or(|n| i.name.to_lowercase().contains(n))
        })
        .collect();

    if ingredients.is_empty() {
        if json {
            println!("[]");
        } else {
            eprintln!("No ingredients found");
        }
        process::exit(2);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&ingredients)?);
        return Ok(());
    }

    let rows: Vec<IngredientRow> = ingredients
        .iter()
        .map(|i| IngredientRow {
            id: i.id.clone(),
            name: truncate(&i.name, 40),
        })
        .collect();
    let table = Table::new(&rows).with(Style::rounded()).to_string();
    println!("{table}");
    Ok(())
}
