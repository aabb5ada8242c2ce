mod api;
mod commands;
mod config;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

use crate::api::{DEFAULT_API_URL, RestClient};
use crate::commands::{
    ListEdits, RecipeFields, Service, cmd_categories, cmd_ingredients, cmd_login, cmd_logout,
    cmd_recipe_add, cmd_recipe_delete, cmd_recipe_edit, cmd_recipe_list, cmd_recipe_show,
    cmd_register, cmd_whoami,
};
use crate::config::Config;
use cookbook_core::session::SessionStore;

#[derive(Parser)]
#[command(
    name = "cookbook",
    version,
    about = "Browse, search and edit a shared recipe catalog"
)]
struct Cli {
    /// Base URL of the recipe REST server
    #[arg(long, global = true, env = "COOKBOOK_API_URL", default_value = DEFAULT_API_URL)]
    api_url: String,
    /// Directory for the saved session (default: platform data dir)
    #[arg(long, global = true, env = "COOKBOOK_DATA_DIR", value_name = "PATH")]
    data_dir: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List recipe categories
    Categories {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// List the ingredient catalog
    Ingredients {
        /// Only show ingredients whose name contains this text
        #[arg(short, long)]
        search: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Browse and edit recipes
    Recipes {
        #[command(subcommand)]
        command: RecipeCommands,
    },
    /// Log in to an existing account
    Login {
        /// Username
        username: String,
        /// Password (prompted on stdin when omitted)
        #[arg(long)]
        password: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Create an account and log in
    Register {
        /// Username (at least 3 characters)
        username: String,
        /// Password (prompted twice on stdin when omitted)
        #[arg(long)]
        password: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Forget the saved session
    Logout {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the logged-in user
    Whoami {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args)]
struct FieldArgs {
    /// Recipe name
    #[arg(long)]
    name: Option<String>,
    /// Category id or name
    #[arg(long)]
    category: Option<String>,
    /// Short description
    #[arg(long)]
    description: Option<String>,
    /// Difficulty (e.g. easy, medium, hard)
    #[arg(long)]
    difficulty: Option<String>,
    /// Cooking time in minutes
    #[arg(long)]
    cook_time: Option<String>,
    /// Preparation time in minutes
    #[arg(long)]
    prep_time: Option<String>,
    /// Image URL
    #[arg(long)]
    image_url: Option<String>,
}

impl From<FieldArgs> for RecipeFields {
    fn from(a: FieldArgs) -> Self {
        Self {
            name: a.name,
            category: a.category,
            description: a.description,
            difficulty: a.difficulty,
            cook_time: a.cook_time,
            prep_time: a.prep_time,
            image_url: a.image_url,
        }
    }
}

#[derive(Subcommand)]
enum RecipeCommands {
    /// List recipes, optionally filtered by name and category
    List {
        /// Only show recipes whose name contains this text
        #[arg(short, long)]
        search: Option<String>,
        /// Only show recipes in this category (see `cookbook categories`)
        #[arg(short, long)]
        category: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show a recipe with its ingredients and steps
    Show {
        /// Recipe ID
        id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Add a new recipe (requires login)
    Add {
        #[command(flatten)]
        fields: FieldArgs,
        /// Ingredient as INGREDIENT:QUANTITY:UNIT, repeatable (e.g. "tomato:4:pcs")
        #[arg(long = "ingredient", value_name = "SPEC")]
        ingredients: Vec<String>,
        /// Step description, repeatable, in order
        #[arg(long = "step", value_name = "TEXT")]
        steps: Vec<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Edit one of your recipes (requires login)
    Edit {
        /// Recipe ID
        id: String,
        #[command(flatten)]
        fields: FieldArgs,
        /// Append an ingredient as INGREDIENT:QUANTITY:UNIT, repeatable
        #[arg(long = "add-ingredient", value_name = "SPEC")]
        add_ingredients: Vec<String>,
        /// Remove the ingredient at this position (1-based), repeatable
        #[arg(long = "remove-ingredient", value_name = "N")]
        remove_ingredients: Vec<usize>,
        /// Append a step, repeatable
        #[arg(long = "add-step", value_name = "TEXT")]
        add_steps: Vec<String>,
        /// Remove the step at this position (1-based), repeatable
        #[arg(long = "remove-step", value_name = "N")]
        remove_steps: Vec<usize>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete one of your recipes (requires login)
    Delete {
        /// Recipe ID
        id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("COOKBOOK_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::load(&cli.api_url, cli.data_dir)?;
    tracing::debug!(api_url = %config.api_url, data_dir = %config.data_dir.display(), "starting");
    let session = SessionStore::open(&config.session_path)?;
    let mut svc: Service = Service::new(RestClient::new(&config.api_url)?, session);

    match cli.command {
        Commands::Categories { json } => cmd_categories(&svc, json).await,
        Commands::Ingredients { search, json } => {
            cmd_ingredients(&svc, search.as_deref(), json).await
        }
        Commands::Login {
            username,
            password,
            json,
        } => cmd_login(&mut svc, &username, password, json).await,
        Commands::Register {
            username,
            password,
            json,
        } => cmd_register(&mut svc, &username, password, json).await,
        Commands::Logout { json } => cmd_logout(&mut svc, json),
        Commands::Whoami { json } => cmd_whoami(&svc, json),
        Commands::Recipes { command } => match command {
            RecipeCommands::List {
                search,
                category,
                json,
            } => cmd_recipe_list(&svc, search.as_deref(), category.as_deref(), json).await,
            RecipeCommands::Show { id, json } => cmd_recipe_show(&svc, &id, json).await,
            RecipeCommands::Add {
                fields,
                ingredients,
                steps,
                json,
            } => cmd_recipe_add(&mut svc, fields.into(), &ingredients, &steps, json).await,
            RecipeCommands::Edit {
                id,
                fields,
                add_ingredients,
                remove_ingredients,
                add_steps,
                remove_steps,
                json,
            } => {
                let edits = ListEdits {
                    add_ingredients,
                    remove_ingredients,
                    add_steps,
                    remove_steps,
                };
                cmd_recipe_edit(&mut svc, &id, fields.into(), edits, json).await
            }
            RecipeCommands::Delete { id, json } => cmd_recipe_delete(&mut svc, &id, json).await,
        },
    }
}
