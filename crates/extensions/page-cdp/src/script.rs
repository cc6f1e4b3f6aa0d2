//! JavaScript evaluated inside the tab.
//!
//! Each script locates the site's prompt input the same way the in-memory
//! adapter does, and reports back `{found, text?}`.

use serde::Deserialize;
use serde_json::Value;

use promptlift_page::{ChangeSignal, Locator, RegisteredSite, WriteStyle};

use crate::cdp::CdpError;

/// Expression yielding the page's current location.
pub const LOCATION_SCRIPT: &str = "location.href";

/// What a read or write script reports back.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ScriptOutcome {
    pub found: bool,
    #[serde(default)]
    pub text: Option<String>,
}

impl ScriptOutcome {
    pub fn parse(value: Value) -> Result<Self, CdpError> {
        serde_json::from_value(value)
            .map_err(|e| CdpError::InvalidResponse(format!("script result: {}", e)))
    }
}

/// JS string literal for `s`.
fn js_string(s: &str) -> String {
    Value::from(s).to_string()
}

fn locate_expression(locator: &Locator) -> String {
    match locator {
        Locator::ElementId(id) => format!("document.getElementById({})", js_string(id)),
        Locator::Attribute { .. } => {
            format!("document.querySelector({})", js_string(&locator.css()))
        }
    }
}

fn replace_statements(style: WriteStyle) -> &'static str {
    match style {
        WriteStyle::Paragraph => {
            "const p = document.createElement(\"p\");\n  p.textContent = text;\n  el.replaceChildren(p);"
        }
        WriteStyle::TextContent => "el.textContent = text;",
    }
}

fn signal_statement(signal: &ChangeSignal) -> String {
    match signal {
        ChangeSignal::None => String::new(),
        ChangeSignal::InputEvent { bubbles, cancelable } => format!(
            "el.dispatchEvent(new InputEvent(\"input\", {{ bubbles: {}, cancelable: {} }}));",
            bubbles, cancelable
        ),
        ChangeSignal::Event { name, bubbles } => format!(
            "el.dispatchEvent(new Event({}, {{ bubbles: {} }}));",
            js_string(name),
            bubbles
        ),
    }
}

/// Read the trimmed text of the site's input.
pub fn read_script(site: &RegisteredSite) -> String {
    format!(
        "(() => {{\n  const el = {};\n  if (!el) return {{ found: false }};\n  return {{ found: true, text: (el.textContent || \"\").trim() }};\n}})()",
        locate_expression(&site.adapter.locator())
    )
}

/// Replace the input's content with `text` and fire the site's change signal.
pub fn write_script(site: &RegisteredSite, text: &str) -> String {
    format!(
        "(() => {{\n  const el = {};\n  if (!el) return {{ found: false }};\n  const text = {};\n  {}\n  {}\n  return {{ found: true }};\n}})()",
        locate_expression(&site.adapter.locator()),
        js_string(text),
        replace_statements(site.adapter.write_style()),
        signal_statement(&site.signal)
    )
}
