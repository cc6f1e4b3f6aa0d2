//! [`PromptPage`] over a live browser tab.

use async_trait::async_trait;
use tracing::{debug, warn};

use promptlift_page::{RegisteredSite, SiteRegistry};
use promptlift_protocols::{PageError, PromptPage, PromptText};

use crate::cdp::{CdpClient, CdpError, PageSession};
use crate::script::{read_script, write_script, ScriptOutcome, LOCATION_SCRIPT};
use crate::tabs::select_page;

pub struct CdpPromptPage {
    session: PageSession,
    sites: SiteRegistry,
}

impl CdpPromptPage {
    pub fn new(session: PageSession, sites: SiteRegistry) -> Self {
        Self { session, sites }
    }

    /// Attach to the tab picked by [`select_page`].
    pub async fn open(
        client: &CdpClient,
        filter: Option<&str>,
        sites: SiteRegistry,
    ) -> Result<Self, CdpError> {
        let pages = client.list_pages().await?;
        let page = select_page(&pages, filter, &sites)?;
        let session = client.attach_page(page).await?;
        Ok(Self::new(session, sites))
    }

    pub fn session(&self) -> &PageSession {
        &self.session
    }

    async fn location(&self) -> Result<String, CdpError> {
        let value = self.session.evaluate(LOCATION_SCRIPT).await?;
        value
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| CdpError::InvalidResponse("location.href is not a string".to_string()))
    }

    async fn site(&self) -> Result<&RegisteredSite, PageError> {
        let url = self
            .location()
            .await
            .map_err(|e| PageError::ElementNotFound(e.to_string()))?;
        self.sites.resolve(&url)
    }
}

fn missing_input(site: &RegisteredSite) -> PageError {
    PageError::ElementNotFound(format!(
        "{} input ({})",
        site.adapter.display_name(),
        site.adapter.locator().css()
    ))
}

#[async_trait]
impl PromptPage for CdpPromptPage {
    async fn url(&self) -> String {
        match self.location().await {
            Ok(url) => url,
            Err(e) => {
                warn!("Could not read tab location: {}", e);
                String::new()
            }
        }
    }

    async fn read_prompt(&self) -> Result<PromptText, PageError> {
        let site = self.site().await?;
        let value = self
            .session
            .evaluate(&read_script(site))
            .await
            .map_err(|e| PageError::ElementNotFound(e.to_string()))?;
        let outcome =
            ScriptOutcome::parse(value).map_err(|e| PageError::ElementNotFound(e.to_string()))?;
        if !outcome.found {
            return Err(missing_input(site));
        }
        Ok(PromptText::new(outcome.text.unwrap_or_default()))
    }

    async fn write_prompt(&self, text: &str) -> Result<(), PageError> {
        let site = self.site().await?;
        let value = self
            .session
            .evaluate(&write_script(site, text))
            .await
            .map_err(|e| PageError::WriteRejected(e.to_string()))?;
        let outcome =
            ScriptOutcome::parse(value).map_err(|e| PageError::WriteRejected(e.to_string()))?;
        if !outcome.found {
            return Err(missing_input(site));
        }
        debug!(
            "Wrote {} chars into {} input on target {}",
            text.len(),
            site.adapter,
            self.session.target_id()
        );
        Ok(())
    }
}
