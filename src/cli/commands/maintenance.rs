//! Seed and reset command handlers

use std::io::{self, BufRead, Write};

use crate::config::Config;
use crate::db::Store;

pub async fn cmd_seed(config: &Config) -> anyhow::Result<()> {
    let store = Store::new(&config.general.database_path).await?;
    let report = store.seed(&config.seed, &config.security).await?;

    if report.admin_created {
        println!("✓ Admin '{}' created", config.seed.admin_username);
    } else {
        println!("Admin already present, skipped");
    }

    if report.users_created > 0 {
        println!("✓ {} demo users created", report.users_created);
    } else {
        println!("Users already present or demo users disabled, skipped");
    }

    Ok(())
}

pub async fn cmd_reset(config: &Config, yes: bool) -> anyhow::Result<()> {
    if !yes && !confirm("Delete all admins, users and templates? Send history is kept. [y/N] ")? {
        println!("Aborted.");
        return Ok(());
    }

    let store = Store::new(&config.general.database_path).await?;
    store.reset().await?;
    println!("✓ Database cleared");
    Ok(())
}

fn confirm(prompt: &str) -> io::Result<bool> {
    print!("{prompt}");
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}
