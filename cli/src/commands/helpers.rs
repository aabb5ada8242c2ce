use anyhow::{Context, Result, bail};
use std::io::{self, BufRead, Write};
use tabled::{
    Table, Tabled,
    settings::{Alignment, Modify, Style, object::Columns},
};

use cookbook_core::join::lookup_ingredient;
use cookbook_core::models::{Ingredient, IngredientLine, Recipe, format_cooking_time};

/// Parse an ingredient line given as "INGREDIENT:QUANTITY:UNIT".
///
/// INGREDIENT is a catalog id or name; the unit may itself contain colons.
pub(crate) fn parse_ingredient_line(spec: &str, catalog: &[Ingredient]) -> Result<IngredientLine> {
    let parts: Vec<&str> = spec.splitn(3, ':').map(str::trim).collect();
    let [ingredient, quantity, unit] = parts.as_slice() else {
        bail!("Invalid ingredient '{spec}'. Use INGREDIENT:QUANTITY:UNIT (e.g. 'tomato:4:pcs')");
    };
    if quantity.is_empty() || unit.is_empty() {
        bail!("Invalid ingredient '{spec}'. Quantity and unit are required");
    }
    let found = lookup_ingredient(ingredient, catalog)
        .with_context(|| format!("Unknown ingredient '{ingredient}'. See: cookbook ingredients"))?;
    Ok(IngredientLine {
        id: found.id.clone(),
        quantity: (*quantity).to_string(),
        unit: (*unit).to_string(),
    })
}

/// Read a secret from `--password` or, failing that, a line on stdin.
pub(crate) fn password_or_prompt(given: Option<String>, label: &str) -> Result<String> {
    if let Some(p) = given {
        return Ok(p);
    }
    eprint!("{label}: ");
    io::stderr().flush()?;
    let stdin = io::stdin();
    let line = stdin.lock().lines().next().context("No input")??;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

pub(crate) fn print_recipe_table(recipes: &[Recipe]) {
    #[derive(Tabled)]
    struct RecipeRow {
        #[tabled(rename = "ID")]
        id: String,
        #[tabled(rename = "Name")]
        name: String,
        #[tabled(rename = "Category")]
        category: String,
        #[tabled(rename = "Difficulty")]
        difficulty: String,
        #[tabled(rename = "Prep")]
        prep: String,
        #[tabled(rename = "Cook")]
        cook: String,
    }

    let rows: Vec<RecipeRow> = recipes
        .iter()
        .map(|r| RecipeRow {
            id: truncate(&r.id, 12),
            name: truncate(&r.name, 35),
            category: truncate(&r.category, 20),
            difficulty: if r.difficulty.is_empty() {
                "-".to_string()
            } else {
                r.difficulty.clone()
            },
            prep: format_cooking_time(&r.prep_time),
            cook: format_cooking_time(&r.cook_time),
        })
        .collect();

    let table = Table::new(&rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::new(4..)).with(Alignment::right()))
        .to_string();
    println!("{table}");
}

pub(crate) fn json_error(message: &str) -> String {
    serde_json::json!({ "error": message }).to_string()
}

/// Shorten `s` to at most `max` characters, marking the cut with "...".
pub(crate) fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let kept: String = s.chars().take(max.saturating_sub(3)).collect();
    kept + "..."
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Vec<Ingredient> {
        vec![
            Ingredient {
                id: "10".into(),
                name: "Tomato".into(),
            },
            Ingredient {
                id: "11".into(),
                name: "Olive oil".into(),
            },
        ]
    }

    #[test]
    fn test_parse_ingredient_by_id_and_name() {
        let line = parse_ingredient_line("10:4:pcs", &catalog()).unwrap();
        assert_eq!(line.id, "10");
        assert_eq!(line.quantity, "4");
        assert_eq!(line.unit, "pcs");

        let line = parse_ingredient_line("olive oil : 2 : tbsp", &catalog()).unwrap();
        assert_eq!(line.id, "11");
        assert_eq!(line.quantity, "2");
        assert_eq!(line.unit, "tbsp");
    }

    #[test]
    fn test_parse_ingredient_unit_with_colon() {
        let line = parse_ingredient_line("tomato:1:ratio 1:2", &catalog()).unwrap();
        assert_eq!(line.unit, "ratio 1:2");
    }

    #[test]
    fn test_parse_ingredient_invalid() {
        assert!(parse_ingredient_line("tomato", &catalog()).is_err());
        assert!(parse_ingredient_line("tomato:4", &catalog()).is_err());
        assert!(parse_ingredient_line("tomato::pcs", &catalog()).is_err());
        let err = parse_ingredient_line("garlic:1:clove", &catalog()).unwrap_err();
        assert!(err.to_string().contains("Unknown ingredient 'garlic'"));
    }

    #[test]
    fn test_password_given_skips_prompt() {
        assert_eq!(
            password_or_prompt(Some("pw".into()), "Password").unwrap(),
            "pw"
        );
    }

    #[test]
    fn test_json_error() {
        assert_eq!(json_error("Not logged in"), r#"{"error":"Not logged in"}"#);
        assert_eq!(json_error(r#"bad "quote""#), r#"{"error":"bad \"quote\""}"#);
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("hello", 10), "hello");
        assert_eq!(truncate("hello world this is long", 10), "hello w...");
    }

    #[test]
    fn test_truncate_utf8() {
        assert_eq!(truncate("Crème brûlée maison", 10), "Crème b...");
        assert_eq!(truncate("Pâté", 10), "Pâté");
    }
}
