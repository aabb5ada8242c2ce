use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    #[serde(deserialize_with = "lenient_string")]
    pub id: String,
    #[serde(alias = "category")]
    pub name: String,
}

/// Catalog entry referenced by recipe ingredient lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    #[serde(deserialize_with = "lenient_string")]
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngredientLine {
    #[serde(deserialize_with = "lenient_string")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub quantity: String,
    #[serde(default)]
    pub unit: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    #[serde(deserialize_with = "lenient_order")]
    pub order: u32,
    pub description: String,
}

/// A recipe as stored by the data store: category and ingredients are ids only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeRecord {
    #[serde(deserialize_with = "lenient_string")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub user_id: String,
    #[serde(deserialize_with = "lenient_string")]
    pub category_id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub ingredients: Vec<IngredientLine>,
    #[serde(default)]
    pub steps: Vec<Step>,
    #[serde(default)]
    pub difficulty: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub cook_time: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub prep_time: String,
    #[serde(default, rename = "imageURL")]
    pub image_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeIngredient {
    pub id: String,
    pub quantity: String,
    pub unit: String,
    // Joined from the ingredient catalog
    pub name: String,
}

/// A recipe with its category and ingredient names resolved for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub id: String,
    pub user_id: String,
    pub category_id: String,
    pub category: String,
    pub name: String,
    pub description: String,
    pub ingredients: Vec<RecipeIngredient>,
    pub steps: Vec<Step>,
    pub difficulty: String,
    pub cook_time: String,
    pub prep_time: String,
    #[serde(rename = "imageURL")]
    pub image_url: String,
}

impl Recipe {
    /// Strip resolved names, returning the shape the data store persists.
    #[must_use]
    pub fn to_record(&self) -> RecipeRecord {
        RecipeRecord {
            id: self.id.clone(),
            user_id: self.user_id.clone(),
            category_id: self.category_id.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
            ingredients: self
                .ingredients
                .iter()
                .map(|i| IngredientLine {
                    id: i.id.clone(),
                    quantity: i.quantity.clone(),
                    unit: i.unit.clone(),
                })
                .collect(),
            steps: self.steps.clone(),
            difficulty: self.difficulty.clone(),
            cook_time: self.cook_time.clone(),
            prep_time: self.prep_time.clone(),
            image_url: self.image_url.clone(),
        }
    }

    #[must_use]
    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.user_id == user_id
    }
}

/// Wire shape of the `/users` collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(deserialize_with = "lenient_string")]
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// The authenticated user as kept client-side. Never carries credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: String,
    pub username: String,
}

impl From<&User> for SessionUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            username: user.username.clone(),
        }
    }
}

impl From<User> for SessionUser {
    fn from(user: User) -> Self {
        Self::from(&user)
    }
}

impl SessionUser {
    /// Uppercased first letter of the username, for avatars and prompts.
    #[must_use]
    pub fn initial(&self) -> String {
        self.username
            .chars()
            .next()
            .map(|c| c.to_uppercase().collect())
            .unwrap_or_default()
    }
}

/// Lowercased category name used as the navigation parameter for filtering.
#[must_use]
pub fn category_slug(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Render a duration in minutes: "45 min", "1h", "1h 30min".
///
/// Empty input and zero render as "-"; non-numeric input is returned
/// unchanged. Negative values stay in minutes ("-5 min").
#[must_use]
pub fn format_cooking_time(value: &str) -> String {
    let value = value.trim();
    if value.is_empty() {
        return "-".to_string();
    }
    let Some(minutes) = leading_integer(value) else {
        return value.to_string();
    };
    if minutes == 0 {
        return "-".to_string();
    }
    if minutes < 60 {
        return format!("{minutes} min");
    }
    let hours = minutes / 60;
    let mins = minutes % 60;
    if mins == 0 {
        format!("{hours}h")
    } else {
        format!("{hours}h {mins}min")
    }
}

// "90 minutes" reads as 90 and "-5" as -5, matching how free-text times are entered.
fn leading_integer(s: &str) -> Option<i64> {
    let digits = s.strip_prefix(['-', '+']).unwrap_or(s);
    let end = s.len() - digits.len()
        + digits
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(digits.len());
    s[..end].parse().ok()
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    String(String),
    Number(serde_json::Number),
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match StringOrNumber::deserialize(deserializer)? {
        StringOrNumber::String(s) => s,
        StringOrNumber::Number(n) => n.to_string(),
    })
}

fn lenient_order<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    match StringOrNumber::deserialize(deserializer)? {
        StringOrNumber::String(s) => s
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("invalid step order '{s}'"))),
        StringOrNumber::Number(n) => n
            .as_u64()
            .and_then(|v| u32::try_from(v).ok())
            .ok_or_else(|| serde::de::Error::custom(format!("invalid step order {n}"))),
    }
}
