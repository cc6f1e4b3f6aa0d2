//! Control surface: the user-facing actions that tie the relay, the
//! credential store and the enhancement service together.
//!
//! Every action takes `&mut self`, so one surface runs its actions strictly
//! one after another.

use std::sync::Arc;

use tracing::{debug, info, warn};

use promptlift_config::{CredentialStore, KeyValueStore};
use promptlift_page::SiteAdapter;
use promptlift_protocols::{
    Credential, EnhanceError, EnhancementRequest, PageError, PromptEnhancer, PromptText,
};

use crate::clipboard::Clipboard;
use crate::error::ControlError;
use crate::transport::RelayClient;

/// Result of an import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportOutcome {
    Imported(PromptText),
    /// The input exists but holds no text.
    Empty,
}

impl ImportOutcome {
    pub fn message(&self) -> &str {
        match self {
            ImportOutcome::Imported(text) => text.as_str(),
            ImportOutcome::Empty => "No text found in the input field",
        }
    }
}

pub struct ControlSurface<S: KeyValueStore> {
    relay: RelayClient,
    enhancer: Arc<dyn PromptEnhancer>,
    credentials: CredentialStore<S>,
    credential: Option<Credential>,
    imported: Option<PromptText>,
    enhanced: Option<String>,
}

impl<S: KeyValueStore> ControlSurface<S> {
    pub fn new(
        relay: RelayClient,
        enhancer: Arc<dyn PromptEnhancer>,
        credentials: CredentialStore<S>,
    ) -> Self {
        Self {
            relay,
            enhancer,
            credentials,
            credential: None,
            imported: None,
            enhanced: None,
        }
    }

    pub fn relay(&self) -> &RelayClient {
        &self.relay
    }

    pub fn credential(&self) -> Option<&Credential> {
        self.credential.as_ref()
    }

    pub fn imported(&self) -> Option<&PromptText> {
        self.imported.as_ref()
    }

    pub fn enhanced(&self) -> Option<&str> {
        self.enhanced.as_deref()
    }

    // ========================================================================
    // Credential
    // ========================================================================

    /// Resolve the key from the environment, `config_key` or storage.
    pub fn load_credential(
        &mut self,
        config_key: Option<&str>,
    ) -> Result<Option<&Credential>, ControlError> {
        self.credential = self.credentials.resolve(config_key)?;
        match &self.credential {
            Some(cred) => debug!("Using API key {}", cred.masked()),
            None => debug!("No API key configured"),
        }
        Ok(self.credential.as_ref())
    }

    /// Persist a new key. Blank input is rejected and the old key is kept.
    pub fn save_credential(&mut self, input: &str) -> Result<&Credential, ControlError> {
        let saved = self
            .credentials
            .save(input)
            .inspect_err(|e| warn!("Refusing to save API key: {}", e))?;
        info!("API key saved ({})", saved.masked());
        Ok(self.credential.insert(saved))
    }

    pub fn clear_credential(&mut self) -> Result<(), ControlError> {
        self.credentials.clear()?;
        self.credential = None;
        info!("API key cleared");
        Ok(())
    }

    // ========================================================================
    // Prompt actions
    // ========================================================================

    /// Read the prompt from the page open at `tab_url`.
    pub async fn import_prompt(&mut self, tab_url: &str) -> Result<ImportOutcome, ControlError> {
        let Some(site) = SiteAdapter::for_url(tab_url) else {
            warn!("Import refused, unsupported tab {}", tab_url);
            return Err(PageError::SiteUnsupported(tab_url.to_string()).into());
        };

        let text = self
            .relay
            .get_prompt()
            .await
            .inspect_err(|e| warn!("Import from {} failed: {}", site, e))?;
        let outcome = self.set_imported(text);
        info!("Imported prompt from {}: {:?}", site, outcome.message());
        Ok(outcome)
    }

    /// Use `text` as the imported prompt without asking the page.
    pub fn set_imported(&mut self, text: impl Into<PromptText>) -> ImportOutcome {
        let text = text.into();
        if text.is_empty() {
            self.imported = None;
            ImportOutcome::Empty
        } else {
            self.imported = Some(text.clone());
            ImportOutcome::Imported(text)
        }
    }

    /// Send the imported prompt to the enhancement service.
    pub async fn enhance(&mut self) -> Result<&str, ControlError> {
        let Some(credential) = self.credential.as_ref() else {
            return Err(EnhanceError::MissingCredential.into());
        };
        let Some(prompt) = self.imported.clone() else {
            return Err(ControlError::NothingImported);
        };

        info!(
            "Enhancing {} chars with {}",
            prompt.as_str().len(),
            self.enhancer.id()
        );
        let enhanced = self
            .enhancer
            .enhance(EnhancementRequest::new(prompt), credential)
            .await
            .inspect_err(|e| warn!("Enhancement failed: {}", e))?;
        Ok(self.enhanced.insert(enhanced).as_str())
    }

    /// Use `text` as the enhanced prompt, e.g. after editing it by hand.
    pub fn set_enhanced(&mut self, text: &str) -> Result<(), ControlError> {
        if text.trim().is_empty() {
            return Err(ControlError::NothingEnhanced);
        }
        self.enhanced = Some(text.to_string());
        Ok(())
    }

    pub fn copy_text(&mut self, clipboard: &mut dyn Clipboard) -> Result<(), ControlError> {
        let text = self.enhanced.as_deref().ok_or(ControlError::NothingEnhanced)?;
        clipboard
            .set_text(text)
            .map_err(ControlError::Clipboard)
            .inspect_err(|e| warn!("Copy failed: {}", e))?;
        info!("Enhanced prompt copied to clipboard");
        Ok(())
    }

    /// Write the enhanced prompt back into the page.
    pub async fn insert(&mut self) -> Result<(), ControlError> {
        let text = self.enhanced.as_deref().ok_or(ControlError::NothingEnhanced)?;
        self.relay
            .set_prompt(text)
            .await
            .inspect_err(|e| warn!("Insert failed: {}", e))?;
        info!("Enhanced prompt inserted");
        Ok(())
    }
}

#[cfg(test)]
#[path = "control_tests.rs"]
mod tests;
