//! Per-site knowledge: which pages we support and where their prompt input lives.

use serde::{Deserialize, Serialize};
use url::Url;

use promptlift_protocols::PromptText;

use crate::document::{Document, DomError, NodeId};

/// How to find a site's prompt input in the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Locator {
    /// Element with this `id`.
    ElementId(&'static str),
    /// First `tag` element whose attribute `name` equals `value`.
    Attribute {
        tag: &'static str,
        name: &'static str,
        value: &'static str,
    },
}

impl Locator {
    /// Connected element this locator points at.
    pub fn find(&self, doc: &Document) -> Option<NodeId> {
        match self {
            Locator::ElementId(id) => doc.get_element_by_id(id),
            Locator::Attribute { tag, name, value } => doc.query_attribute(Some(tag), name, value),
        }
    }

    /// Equivalent CSS selector, for engines that take one.
    pub fn css(&self) -> String {
        match self {
            Locator::ElementId(id) => format!("#{}", id),
            Locator::Attribute { tag, name, value } => format!("{}[{}=\"{}\"]", tag, name, value),
        }
    }
}

/// How new text replaces what is in the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteStyle {
    /// Clear the element, then append `<p>text</p>`.
    Paragraph,
    /// Set the element's text content.
    TextContent,
}

/// A supported chat site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SiteAdapter {
    ChatGpt,
    Gemini,
}

impl SiteAdapter {
    /// Every adapter, in match priority order.
    pub const ALL: [SiteAdapter; 2] = [SiteAdapter::ChatGpt, SiteAdapter::Gemini];

    pub fn name(&self) -> &'static str {
        match self {
            SiteAdapter::ChatGpt => "chatgpt",
            SiteAdapter::Gemini => "gemini",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            SiteAdapter::ChatGpt => "ChatGPT",
            SiteAdapter::Gemini => "Google Gemini",
        }
    }

    pub fn host(&self) -> &'static str {
        match self {
            SiteAdapter::ChatGpt => "chatgpt.com",
            SiteAdapter::Gemini => "gemini.google.com",
        }
    }

    /// Whether `url` is served by this site (host or any subdomain of it).
    pub fn matches(&self, url: &str) -> bool {
        let Ok(parsed) = Url::parse(url) else {
            return false;
        };
        let Some(host) = parsed.host_str() else {
            return false;
        };
        let host = host.to_ascii_lowercase();
        let wanted = self.host();
        host == wanted
            || host
                .strip_suffix(wanted)
                .is_some_and(|prefix| prefix.ends_with('.'))
    }

    /// First adapter whose predicate matches `url`.
    pub fn for_url(url: &str) -> Option<SiteAdapter> {
        Self::ALL.into_iter().find(|site| site.matches(url))
    }

    pub fn locator(&self) -> Locator {
        match self {
            SiteAdapter::ChatGpt => Locator::ElementId("prompt-textarea"),
            SiteAdapter::Gemini => Locator::Attribute {
                tag: "div",
                name: "role",
                value: "textbox",
            },
        }
    }

    pub fn write_style(&self) -> WriteStyle {
        match self {
            SiteAdapter::ChatGpt => WriteStyle::Paragraph,
            SiteAdapter::Gemini => WriteStyle::TextContent,
        }
    }

    pub fn locate(&self, doc: &Document) -> Option<NodeId> {
        self.locator().find(doc)
    }

    /// Trimmed visible text of the input.
    pub fn read(&self, doc: &Document, node: NodeId) -> PromptText {
        PromptText::new(doc.text_content(node))
    }

    /// Replace the input's content with `text`. Does not fire any change signal.
    pub fn replace_content(
        &self,
        doc: &mut Document,
        node: NodeId,
        text: &str,
    ) -> Result<(), DomError> {
        match self.write_style() {
            WriteStyle::Paragraph => {
                let paragraph = doc.create_element("p");
                let content = doc.create_text(text);
                doc.append_child(paragraph, content)?;
                doc.replace_children(node, vec![paragraph])
            }
            WriteStyle::TextContent => doc.set_text_content(node, text),
        }
    }
}

impl std::fmt::Display for SiteAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;

    #[test]
    fn test_matches_host_and_subdomains() {
        assert!(SiteAdapter::ChatGpt.matches("https://chatgpt.com/"));
        assert!(SiteAdapter::ChatGpt.matches("https://chatgpt.com/c/abc-123"));
        assert!(SiteAdapter::ChatGpt.matches("https://www.chatgpt.com/"));
        assert!(SiteAdapter::Gemini.matches("https://gemini.google.com/app"));

        assert!(!SiteAdapter::ChatGpt.matches("https://notchatgpt.com/"));
        assert!(!SiteAdapter::ChatGpt.matches("https://example.com/?q=chatgpt.com"));
        assert!(!SiteAdapter::Gemini.matches("https://google.com/"));
        assert!(!SiteAdapter::Gemini.matches("not a url"));
    }

    #[test]
    fn test_for_url() {
        assert_eq!(SiteAdapter::for_url("https://chatgpt.com/"), Some(SiteAdapter::ChatGpt));
        assert_eq!(
            SiteAdapter::for_url("https://gemini.google.com/app/1"),
            Some(SiteAdapter::Gemini)
        );
        assert_eq!(SiteAdapter::for_url("https://example.com/"), None);
    }

    #[test]
    fn test_locator_css() {
        assert_eq!(SiteAdapter::ChatGpt.locator().css(), "#prompt-textarea");
        assert_eq!(SiteAdapter::Gemini.locator().css(), "div[role=\"textbox\"]");
    }

    #[test]
    fn test_chatgpt_read_trims() {
        let doc = fixtures::chatgpt_page(Some("  Explain recursion  "));
        let node = SiteAdapter::ChatGpt.locate(&doc).unwrap();
        assert_eq!(SiteAdapter::ChatGpt.read(&doc, node).as_str(), "Explain recursion");
    }

    #[test]
    fn test_locate_missing_input() {
        let doc = fixtures::chatgpt_page(None);
        assert_eq!(SiteAdapter::ChatGpt.locate(&doc), None);
        let doc = fixtures::gemini_page(None);
        assert_eq!(SiteAdapter::Gemini.locate(&doc), None);
    }

    #[test]
    fn test_chatgpt_replace_writes_single_paragraph() {
        let mut doc = fixtures::chatgpt_page(Some("old"));
        let node = SiteAdapter::ChatGpt.locate(&doc).unwrap();
        SiteAdapter::ChatGpt.replace_content(&mut doc, node, "new text").unwrap();

        let children = doc.children(node).to_vec();
        assert_eq!(children.len(), 1);
        assert_eq!(doc.tag_name(children[0]), Some("p"));
        assert_eq!(doc.text_content(node), "new text");
    }

    #[test]
    fn test_gemini_replace_sets_text() {
        let mut doc = fixtures::gemini_page(Some("old"));
        let node = SiteAdapter::Gemini.locate(&doc).unwrap();
        SiteAdapter::Gemini.replace_content(&mut doc, node, "new text").unwrap();
        assert_eq!(doc.text_content(node), "new text");
    }
}
