//! Ready-made documents shaped like the supported sites' composer markup.

use crate::document::{Document, DomError, NodeId};

pub const CHATGPT_URL: &str = "https://chatgpt.com/";
pub const GEMINI_URL: &str = "https://gemini.google.com/app";

/// A ChatGPT page. `None` leaves the composer unrendered.
pub fn chatgpt_page(prompt: Option<&str>) -> Document {
    let mut doc = Document::new(CHATGPT_URL);
    if let Some(text) = prompt {
        // Fresh document: every node exists and no hierarchy rule can fail.
        let _ = render_chatgpt_input(&mut doc, text);
    }
    doc
}

/// A Gemini page. `None` leaves the composer unrendered.
pub fn gemini_page(prompt: Option<&str>) -> Document {
    let mut doc = Document::new(GEMINI_URL);
    if let Some(text) = prompt {
        let _ = render_gemini_input(&mut doc, text);
    }
    doc
}

/// Append `main > form > div#prompt-textarea > p` to the body.
pub fn render_chatgpt_input(doc: &mut Document, text: &str) -> Result<NodeId, DomError> {
    let main = doc.create_element("main");
    let form = doc.create_element("form");
    let input = doc.create_element("div");
    doc.set_attribute(input, "id", "prompt-textarea")?;
    doc.set_attribute(input, "contenteditable", "true")?;
    let paragraph = doc.create_element("p");
    if !text.is_empty() {
        let content = doc.create_text(text);
        doc.append_child(paragraph, content)?;
    }
    doc.append_child(input, paragraph)?;
    doc.append_child(form, input)?;
    doc.append_child(main, form)?;
    let body = doc.body();
    doc.append_child(body, main)?;
    Ok(input)
}

/// Append `rich-textarea > div[role=textbox] > p` to the body.
pub fn render_gemini_input(doc: &mut Document, text: &str) -> Result<NodeId, DomError> {
    let wrapper = doc.create_element("rich-textarea");
    let input = doc.create_element("div");
    doc.set_attribute(input, "role", "textbox")?;
    doc.set_attribute(input, "contenteditable", "true")?;
    doc.set_attribute(input, "aria-label", "Enter a prompt here")?;
    let paragraph = doc.create_element("p");
    if !text.is_empty() {
        let content = doc.create_text(text);
        doc.append_child(paragraph, content)?;
    }
    doc.append_child(input, paragraph)?;
    doc.append_child(wrapper, input)?;
    let body = doc.body();
    doc.append_child(body, wrapper)?;
    Ok(input)
}

/// Simulate the user typing: replace the input's text in place.
pub fn type_into(doc: &mut Document, input: NodeId, text: &str) -> Result<(), DomError> {
    let paragraph = match doc.children(input).first().copied() {
        Some(p) if doc.is_element(p) => p,
        _ => {
            let p = doc.create_element("p");
            doc.replace_children(input, vec![p])?;
            p
        }
    };
    match doc.children(paragraph).first().copied() {
        Some(t) if !doc.is_element(t) => doc.set_character_data(t, text),
        _ => doc.set_text_content(paragraph, text),
    }
}
