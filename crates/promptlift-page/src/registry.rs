//! Supported sites and the change signal each one uses.

use promptlift_protocols::{PageError, PromptText};

use crate::adapter::SiteAdapter;
use crate::document::{Document, NodeId};
use crate::signal::ChangeSignal;

/// An adapter paired with its change signal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisteredSite {
    pub adapter: SiteAdapter,
    pub signal: ChangeSignal,
}

impl RegisteredSite {
    pub fn new(adapter: SiteAdapter) -> Self {
        Self {
            adapter,
            signal: ChangeSignal::default(),
        }
    }

    /// Locate the input or fail with `ElementNotFound`.
    pub fn require_input(&self, doc: &Document) -> Result<NodeId, PageError> {
        self.adapter.locate(doc).ok_or_else(|| {
            PageError::ElementNotFound(format!(
                "{} input ({})",
                self.adapter.display_name(),
                self.adapter.locator().css()
            ))
        })
    }

    pub fn read(&self, doc: &Document) -> Result<PromptText, PageError> {
        let node = self.require_input(doc)?;
        Ok(self.adapter.read(doc, node))
    }

    /// Replace the input's text and fire the change signal.
    pub fn write(&self, doc: &mut Document, text: &str) -> Result<NodeId, PageError> {
        let node = self.require_input(doc)?;
        self.adapter
            .replace_content(doc, node, text)
            .map_err(|e| PageError::WriteRejected(e.to_string()))?;
        self.signal.fire(doc, node)?;
        Ok(node)
    }
}

/// Ordered set of supported sites.
#[derive(Debug, Clone)]
pub struct SiteRegistry {
    sites: Vec<RegisteredSite>,
}

impl Default for SiteRegistry {
    fn default() -> Self {
        Self {
            sites: SiteAdapter::ALL.into_iter().map(RegisteredSite::new).collect(),
        }
    }
}

impl SiteRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the change signal used for `adapter`.
    pub fn with_signal(mut self, adapter: SiteAdapter, signal: ChangeSignal) -> Self {
        if let Some(site) = self.sites.iter_mut().find(|s| s.adapter == adapter) {
            site.signal = signal;
        }
        self
    }

    pub fn sites(&self) -> &[RegisteredSite] {
        &self.sites
    }

    pub fn get(&self, adapter: SiteAdapter) -> Option<&RegisteredSite> {
        self.sites.iter().find(|s| s.adapter == adapter)
    }

    /// Site serving `url`, or `SiteUnsupported`.
    pub fn resolve(&self, url: &str) -> Result<&RegisteredSite, PageError> {
        self.sites
            .iter()
            .find(|s| s.adapter.matches(url))
            .ok_or_else(|| PageError::SiteUnsupported(url.to_string()))
    }
}
