use crate::app_config::AppConfig;
use crate::switch::DeviceRepository;
use std::fs;
use tracing::info;

mod app_config;
mod domain;
mod switch;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).init();

    info!("🔌 Starting {} v{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));

    let config = AppConfig::load();
    info!("✅  Loaded configuration");

    let switch = config.switch();
    let mut repository = DeviceRepository::new(switch.url().to_owned(), switch.username().to_owned(), switch.password().to_owned());

    let session = repository.logon().await?;
    repository.load_system_info(&session).await?;
    repository.load_ports_info(&session).await?;
    info!("✅  Collected {} ports from '{}'", repository.device().ports.len(), repository.device().description);

    let json = serde_json::to_string_pretty(&repository.into_device())?;
    println!("{json}");

    fs::write(config.output().file(), &json)?;
    info!("✅  Wrote {}", config.output().file());

    Ok(())
}
