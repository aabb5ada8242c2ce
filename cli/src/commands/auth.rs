use anyhow::Result;
use std::process;

use cookbook_core::forms::{LoginForm, RegisterForm};

use super::Service;
use super::helpers::{json_error, password_or_prompt};

pub(crate) async fn cmd_login(
    svc: &mut Service,
    username: &str,
    password: Option<String>,
    json: bool,
) -> Result<()> {
    let form = LoginForm {
        username: username.to_string(),
        password: password_or_prompt(password, "Password")?,
    };
    let user = svc.login(&form).await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&user)?);
    } else {
        let name = &user.username;
        println!("Logged in as {name}");
    }
    Ok(())
}

pub(crate) async fn cmd_register(
    svc: &mut Service,
    username: &str,
    password: Option<String>,
    json: bool,
) -> Result<()> {
    let given = password.is_some();
    let password = password_or_prompt(password, "Password")?;
    // A password passed as a flag is its own confirmation
    let confirm_password = if given {
        password.clone()
    } else {
        password_or_prompt(None, "Confirm password")?
    };
    let form = RegisterForm {
        username: username.to_string(),
        password,
        confirm_password,
    };
    let user = svc.register(&form).await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&user)?);
    } else {
        let name = &user.username;
        println!("Created account {name}. You are now logged in.");
    }
    Ok(())
}

pub(crate) fn cmd_logout(svc: &mut Service, json: bool) -> Result<()> {
    let was = svc.session().current_user().map(|u| u.username.clone());
    svc.logout()?;
    if json {
        println!("{}", serde_json::json!({ "logged_out": was }));
    } else if let Some(name) = was {
        println!("Logged out {name}");
    } else {
        println!("Not logged in");
    }
    Ok(())
}

pub(crate) fn cmd_whoami(svc: &Service, json: bool) -> Result<()> {
    let Some(user) = svc.session().current_user() else {
        if json {
            println!("{}", json_error("Not logged in"));
        } else {
            eprintln!("Not logged in");
        }
        process::exit(2);
    };
    if json {
        println!("{}", serde_json::to_string_pretty(user)?);
    } else {
        let (initial, name, id) = (user.initial(), &user.username, &user.id);
        println!("[{initial}] {name} (id: {id})");
    }
    Ok(())
}
