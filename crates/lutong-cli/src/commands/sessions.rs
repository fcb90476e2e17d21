use anyhow::{Result, bail};
use lutong_application::LutongServices;
use lutong_core::session::{ChatMessage, MessageRole, SessionRepository};

pub async fn list(services: &LutongServices) -> Result<()> {
    let sessions = services.sessions.list_sessions().await?;
    if sessions.is_empty() {
        println!("No chat sessions");
        return Ok(());
    }

    let active = services.store.get_active_session_id().await?;
    for session in sessions {
        let marker = if active.as_deref() == Some(session.id.as_str()) {
            "*"
        } else {
            " "
        };
        println!(
            "{} {}  {:<30}  {:>3} messages  updated {}",
            marker,
            session.id,
            session.title,
            session.messages.len(),
            session.updated_at
        );
    }
    Ok(())
}

pub async fn show(services: &LutongServices, id: &str) -> Result<()> {
    let Some(session) = services.store.get_session(id).await? else {
        bail!("session '{}' not found", id);
    };

    println!("{} ({})", session.title, session.id);
    println!("created {}  updated {}", session.created_at, session.updated_at);
    println!();
    for message in &session.messages {
        print_message(message);
    }
    Ok(())
}

pub async fn delete(services: &LutongServices, id: &str) -> Result<()> {
    services.sessions.delete(id).await?;
    println!("Deleted session {}", id);
    Ok(())
}

pub(crate) fn print_message(message: &ChatMessage) {
    let who = match message.role {
        MessageRole::User => "you",
        MessageRole::Assistant => "assistant",
    };
    println!("[{}] {}: {}", message.timestamp, who, message.content);
}
