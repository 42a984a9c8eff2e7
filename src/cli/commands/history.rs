use crate::config::Config;
use crate::db::Store;

pub async fn cmd_history(config: &Config, limit: u64) -> anyhow::Result<()> {
    let store = Store::new(&config.general.database_path).await?;
    let sends = store.recent_sends(limit).await?;

    if sends.is_empty() {
        println!("No emails sent yet.");
        return Ok(());
    }

    println!("Recent Sends (last {}):", sends.len());
    println!("{:-<70}", "");

    for send in sends {
        println!("• #{} {} (template {})", send.email_id, send.template_name, send.template_id);
        println!(
            "  {} sent, {} failed of {} | {}",
            send.success_count, send.failed_count, send.recipients_count, send.sent_at
        );
    }

    Ok(())
}
