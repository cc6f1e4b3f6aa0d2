//! Choosing which browser tab to drive.

use promptlift_page::SiteRegistry;

use crate::cdp::{CdpError, PageInfo};

/// Pick the tab to attach to.
///
/// With a `filter`, the first page target whose URL contains it. Without one,
/// the first page target on a supported site.
pub fn select_page<'a>(
    pages: &'a [PageInfo],
    filter: Option<&str>,
    sites: &SiteRegistry,
) -> Result<&'a PageInfo, CdpError> {
    let mut candidates = pages.iter().filter(|p| p.is_page());
    let found = match filter {
        Some(needle) => candidates.find(|p| p.url.contains(needle)),
        None => candidates.find(|p| sites.resolve(&p.url).is_ok()),
    };
    found.ok_or_else(|| {
        CdpError::TabNotFound(match filter {
            Some(needle) => format!("no tab matching '{}'", needle),
            None => "no ChatGPT or Gemini tab is open".to_string(),
        })
    })
}
