use std::path::Path;

use anyhow::Context;
use redpin_config::RedpinConfig;
use redpin_db::service::RedpinService;

/// Shared application resources initialized once at startup.
pub struct AppContext {
    pub service: RedpinService,
    pub config: RedpinConfig,
}

impl AppContext {
    /// Open the store described by `config`, creating its directory.
    pub async fn init(config: RedpinConfig) -> anyhow::Result<Self> {
        if !config.store.is_in_memory() {
            if let Some(parent) = Path::new(&config.store.path).parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent).with_context(|| {
                        format!("failed to create store directory {}", parent.display())
                    })?;
                }
            }
        }

        let service = RedpinService::from_config(&config)
            .await
            .with_context(|| format!("failed to open store at {}", config.store.path))?;
        tracing::debug!(
            path = %config.store.path,
            policy = %config.sync.missing_location,
            "store ready"
        );
        Ok(Self { service, config })
    }
}

/// Load layered configuration, or a single explicit file.
pub fn load_config(explicit: Option<&str>) -> anyhow::Result<RedpinConfig> {
    let config = match explicit {
        Some(path) => RedpinConfig::load_from_file(path)
            .with_context(|| format!("failed to load config from {path}"))?,
        None => RedpinConfig::load_with_dotenv().context("failed to load redpin config")?,
    };
    Ok(config)
}
