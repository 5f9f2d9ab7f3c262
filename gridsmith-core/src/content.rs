//! Per-kind inner markup.
//!
//! The wrapper produced by the exporters carries all typography and color, so
//! these fragments only add structure and inherit the rest.

use crate::{Element, ElementKind};

/// Inner fragment for an element. Unknown kinds get an empty div.
#[must_use]
pub fn fragment(element: &Element) -> String {
    let text = |placeholder: &str| {
        if element.text_content.is_empty() {
            escape_html(placeholder)
        } else {
            escape_html(&element.text_content)
        }
    };

    match &element.kind {
        ElementKind::Container => centered(&text("Main Container")),
        ElementKind::Div => centered(&text("Division")),
        ElementKind::Circle => centered(&text("")),
        ElementKind::Text => format!(
            "<div class=\"w-full h-full flex items-center justify-start\">{}</div>",
            text("Sample Text")
        ),
        ElementKind::Button => format!(
            "<button type=\"button\" class=\"w-full h-full rounded border-0 bg-transparent\">{}</button>",
            text("Button")
        ),
        ElementKind::Image => match element.image_url.as_deref() {
            Some(url) if !url.is_empty() => format!(
                "<img src=\"{}\" alt=\"{}\" class=\"w-full h-full object-cover\" />",
                escape_html(url),
                text("Image")
            ),
            _ => format!(
                "<div class=\"w-full h-full flex items-center justify-center opacity-50\">{}</div>",
                text("Image")
            ),
        },
        ElementKind::Card => format!(
            "<div class=\"w-full h-full flex flex-col\">\
             <h3 class=\"font-semibold mb-2\">{}</h3>\
             <p class=\"text-sm opacity-75\">Card content goes here.</p>\
             </div>",
            text("Card Title")
        ),
        ElementKind::Navbar => format!(
            "<nav class=\"w-full h-full flex items-center justify-between\">\
             <span class=\"font-bold\">{}</span>\
             <ul class=\"flex gap-4\"><li>Home</li><li>About</li><li>Contact</li></ul>\
             </nav>",
            text("Brand")
        ),
        ElementKind::Tabs => format!(
            "<div class=\"w-full h-full flex items-end gap-2\" role=\"tablist\">\
             <button type=\"button\" role=\"tab\" class=\"px-3 py-2 border-b-2 border-current\">{}</button>\
             <button type=\"button\" role=\"tab\" class=\"px-3 py-2 opacity-60\">Tab 2</button>\
             <button type=\"button\" role=\"tab\" class=\"px-3 py-2 opacity-60\">Tab 3</button>\
             </div>",
            text("Tab 1")
        ),
        ElementKind::Modal => format!(
            "<div class=\"w-full h-full flex flex-col\" role=\"dialog\">\
             <h2 class=\"text-lg font-semibold mb-2\">{}</h2>\
             <p class=\"flex-1 text-sm opacity-75\">Modal content</p>\
             <div class=\"flex justify-end gap-2\">\
             <button type=\"button\" class=\"px-3 py-1 rounded border\">Cancel</button>\
             <button type=\"button\" class=\"px-3 py-1 rounded bg-blue-600 text-white\">Confirm</button>\
             </div></div>",
            text("Modal Title")
        ),
        ElementKind::Form => format!(
            "<form class=\"w-full h-full flex flex-col gap-3\">\
             <label class=\"text-sm font-medium\">{}</label>\
             <input type=\"text\" class=\"border rounded px-2 py-1\" placeholder=\"Your name\" />\
             <button type=\"submit\" class=\"rounded bg-blue-600 text-white px-3 py-1\">Submit</button>\
             </form>",
            text("Form")
        ),
        ElementKind::Hero => format!(
            "<section class=\"w-full h-full flex flex-col items-center justify-center\">\
             <h1>{}</h1>\
             <p class=\"mt-2 text-base opacity-75\">Supporting headline copy</p>\
             </section>",
            text("Hero Title")
        ),
        ElementKind::Other(_) => "<div class=\"w-full h-full\"></div>".to_string(),
    }
}

fn centered(inner: &str) -> String {
    format!("<div class=\"w-full h-full flex items-center justify-center\">{inner}</div>")
}

/// Escape text for HTML content and attribute values.
#[must_use]
pub fn escape_html(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
