//! [`PromptPage`] over an in-memory document.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::debug;

use promptlift_protocols::{PageError, PromptPage, PromptText};

use crate::document::Document;
use crate::registry::SiteRegistry;

/// Document shared between the page handler and its observers.
pub type SharedDocument = Arc<RwLock<Document>>;

pub fn shared(document: Document) -> SharedDocument {
    Arc::new(RwLock::new(document))
}

pub struct DocumentPage {
    document: SharedDocument,
    sites: SiteRegistry,
}

impl DocumentPage {
    pub fn new(document: SharedDocument) -> Self {
        Self::with_registry(document, SiteRegistry::default())
    }

    pub fn with_registry(document: SharedDocument, sites: SiteRegistry) -> Self {
        Self { document, sites }
    }

    pub fn document(&self) -> &SharedDocument {
        &self.document
    }

    pub fn sites(&self) -> &SiteRegistry {
        &self.sites
    }
}

#[async_trait]
impl PromptPage for DocumentPage {
    async fn url(&self) -> String {
        self.document.read().url().to_string()
    }

    async fn read_prompt(&self) -> Result<PromptText, PageError> {
        let doc = self.document.read();
        let site = self.sites.resolve(doc.url())?;
        site.read(&doc)
    }

    async fn write_prompt(&self, text: &str) -> Result<(), PageError> {
        let mut doc = self.document.write();
        let url = doc.url().to_string();
        let site = self.sites.resolve(&url)?;
        let node = site.write(&mut doc, text)?;
        debug!("Wrote {} chars into {} input {:?}", text.len(), site.adapter, node);
        Ok(())
    }
}
