use anyhow::Result;
use lutong_application::LutongServices;

pub async fn show(services: &LutongServices) -> Result<()> {
    match services.profiles.current().await? {
        Some(profile) => println!("{} (since {})", profile.name, profile.created_at),
        None => println!(
            "No profile registered; greeting as \"{}\"",
            services.config.user_display_fallback
        ),
    }
    Ok(())
}

pub async fn set(services: &LutongServices, name: &str) -> Result<()> {
    let profile = services.profiles.register(name).await?;
    println!("Registered {}", profile.name);
    Ok(())
}
