use crate::config::Config;
use crate::db::Store;
use crate::personalize::tokens_in;

pub async fn cmd_list_templates(config: &Config) -> anyhow::Result<()> {
    let store = Store::new(&config.general.database_path).await?;
    let templates = store.list_templates().await?;

    if templates.is_empty() {
        println!("No templates.");
        return Ok(());
    }

    println!("Templates ({} total)", templates.len());
    println!("{:-<70}", "");

    for template in templates {
        let tokens: Vec<String> = tokens_in(&template.template_body)
            .into_iter()
            .map(|t| if t.recognized { t.token } else { format!("{}?", t.token) })
            .collect();

        println!("{:>4}  {}", template.template_id, template.template_name);
        if !tokens.is_empty() {
            println!("      tokens: {}", tokens.join(", "));
        }
    }

    Ok(())
}
