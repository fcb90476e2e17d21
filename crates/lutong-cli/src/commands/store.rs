use anyhow::Result;
use lutong_application::LutongServices;

pub async fn init(services: &LutongServices) -> Result<()> {
    let version = services.store.schema_version().await?;
    println!(
        "Store at {} is at schema version {}",
        services.store.paths().data_dir().display(),
        version
    );
    Ok(())
}
