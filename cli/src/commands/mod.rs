mod auth;
mod catalog;
mod helpers;
mod recipe;

use crate::api::RestClient;
use cookbook_core::service::CookbookService;

pub(crate) type Service = CookbookService<RestClient>;

pub(crate) use auth::{cmd_login, cmd_logout, cmd_register, cmd_whoami};
pub(crate) use catalog::{cmd_categories, cmd_ingredients};
pub(crate) use recipe::{
    ListEdits, RecipeFields, cmd_recipe_add, cmd_recipe_delete, cmd_recipe_edit, cmd_recipe_list,
    cmd_recipe_show,
};
