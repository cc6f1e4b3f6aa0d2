//! Wiring shared by the subcommands: config, credentials, the enhancer and
//! the link to a live chat tab.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context as _};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use promptlift_config::{Config, ConfigLoader, ConfigValidator, CredentialStore, FileStore};
use promptlift_page::SiteRegistry;
use promptlift_page_cdp::{CdpClient, CdpPromptPage};
use promptlift_protocols::PromptPage;
use promptlift_provider_gemini::{GeminiClient, GeminiEnhancer};
use promptlift_relay::{channel, ContentScript, ControlSurface, RelayClient};

/// Load and validate the config file, falling back to defaults when it is missing.
pub(crate) fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let path = path
        .map(Path::to_path_buf)
        .unwrap_or_else(ConfigLoader::default_config_path);
    let config = ConfigLoader::load_or_default(&path)
        .with_context(|| format!("Failed to load config from {}", path.display()))?;

    let report = ConfigValidator::validate(&config)?;
    for warning in &report.warnings {
        warn!("Config {}: {}", warning.path, warning.message);
    }
    if let Some(error) = report.errors.first() {
        bail!("Invalid config {}: {}", error.path, error.message);
    }
    debug!("Loaded config from {}", path.display());
    Ok(config)
}

pub(crate) fn credential_store(config: &Config) -> CredentialStore<FileStore> {
    CredentialStore::new(FileStore::from_config(config.storage.path.as_deref()))
}

fn enhancer(config: &Config) -> anyhow::Result<Arc<GeminiEnhancer>> {
    let client = GeminiClient::new(Duration::from_secs(config.gemini.connect_timeout_seconds))?
        .with_base_url(config.gemini.base_url.clone())
        .with_model(config.gemini.model.clone());
    Ok(Arc::new(GeminiEnhancer::new(client)))
}

/// Control surface with its credential loaded.
pub(crate) fn surface(
    config: &Config,
    relay: RelayClient,
) -> anyhow::Result<ControlSurface<FileStore>> {
    let mut surface = ControlSurface::new(relay, enhancer(config)?, credential_store(config));
    surface.load_credential(config.gemini.api_key.as_deref())?;
    Ok(surface)
}

/// A chat tab served over the relay.
pub(crate) struct TabLink {
    pub relay: RelayClient,
    pub url: String,
    _serve: JoinHandle<()>,
}

impl TabLink {
    /// Attach to the tab and start answering relay requests for it.
    pub(crate) async fn open(config: &Config, tab: Option<&str>) -> anyhow::Result<Self> {
        let client = CdpClient::connect(&config.browser.debug_endpoint).await?;
        let page = CdpPromptPage::open(&client, tab, SiteRegistry::default()).await?;
        let url = page.url().await;
        info!("Attached to {}", url);

        let (relay, receiver) = channel();
        let serve = ContentScript::new(page).spawn(receiver);
        Ok(Self {
            relay,
            url,
            _serve: serve,
        })
    }
}

/// Relay with nothing on the far side, for actions that never reach a page.
pub(crate) fn detached_relay() -> RelayClient {
    let (relay, _receiver) = channel();
    relay
}
