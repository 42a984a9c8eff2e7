use crate::config::Config;
use crate::db::repositories::admin::hash_password;

pub fn cmd_hash_password(config: &Config, password: &str) -> anyhow::Result<()> {
    if password.is_empty() {
        anyhow::bail!("Password cannot be empty");
    }

    println!("{}", hash_password(password, Some(&config.security))?);
    Ok(())
}
