use anyhow::Result;
use lutong_application::LutongServices;
use lutong_core::session::MessageLogRepository;

use super::sessions::print_message;

pub async fn show(services: &LutongServices) -> Result<()> {
    let messages = services.store.get_all_messages().await?;
    if messages.is_empty() {
        println!("Legacy history is empty");
    }
    for message in &messages {
        print_message(message);
    }
    Ok(())
}

pub async fn clear(services: &LutongServices) -> Result<()> {
    services.store.clear_messages().await?;
    println!("Legacy history cleared");
    Ok(())
}
