//! List users command handler

use crate::config::Config;
use crate::db::Store;

pub async fn cmd_list_users(config: &Config) -> anyhow::Result<()> {
    let store = Store::new(&config.general.database_path).await?;
    let users = store.list_users().await?;

    if users.is_empty() {
        println!("No users.");
        println!();
        println!("Create demo users with: email-engine seed");
        return Ok(());
    }

    println!("Users ({} total)", users.len());
    println!("{:-<70}", "");

    for user in users {
        let place = match (user.city.as_deref(), user.state.as_deref()) {
            (Some(city), Some(state)) => format!(" | {city}, {state}"),
            (Some(only), None) | (None, Some(only)) => format!(" | {only}"),
            (None, None) => String::new(),
        };
        println!("{:>4}  {} <{}>{}", user.user_id, user.user_name, user.user_email, place);
    }

    Ok(())
}
