//! Declaration-sheet export.
//!
//! One `#element-{id}` rule per element with every attribute written as a
//! literal declaration, so nothing depends on utility-class coverage.

use std::collections::BTreeSet;
use std::fmt::Write;
use std::path::Path;

use gridsmith_core::{
    AnimationKind, BorderStyle, Declaration, Display, Element, Position, StyleCompiler,
};

use crate::error::ExportResult;

/// Exports elements as a plain CSS stylesheet.
#[derive(Debug, Clone, Copy, Default)]
pub struct StylesheetExporter {
    compiler: StyleCompiler,
}

impl StylesheetExporter {
    /// Create an exporter.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            compiler: StyleCompiler::new(),
        }
    }

    /// Render the stylesheet for `elements`, including keyframes for any
    /// built-in animation in use.
    #[must_use]
    pub fn export(&self, elements: &[Element]) -> String {
        let mut css = String::with_capacity(elements.len() * 768);
        let mut animations = BTreeSet::new();
        for element in elements {
            css.push_str(&self.rule(element));
            css.push('\n');
            if element.animation.is_active() {
                animations.insert(element.animation.kind.as_str().to_string());
            }
        }
        for name in &animations {
            if let Some(frames) = keyframes(name) {
                css.push_str(frames);
                css.push('\n');
            }
        }
        tracing::debug!("Exported {} stylesheet rules", elements.len());
        css
    }

    /// Render the stylesheet and write it to `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn write_to(&self, elements: &[Element], path: &Path) -> ExportResult<()> {
        std::fs::write(path, self.export(elements))?;
        tracing::info!("Wrote stylesheet to {}", path.display());
        Ok(())
    }

    /// Render one element's rule block.
    #[must_use]
    pub fn rule(&self, element: &Element) -> String {
        let mut css = format!("#element-{} {{\n", selector_escape(element.id.as_str()));
        for declaration in self.declarations(element) {
            let _ = writeln!(css, "  {declaration}");
        }
        css.push_str("}\n");
        css
    }

    /// Every declaration for one element, in output order.
    #[must_use]
    pub fn declarations(&self, element: &Element) -> Vec<Declaration> {
        let mut out = vec![
            Declaration::new("display", display_value(&element.display)),
            Declaration::new("position", position_value(&element.position)),
        ];
        out.extend(self.compiler.compile(element).residual);
        out.extend([
            Declaration::new("border-style", border_style_value(&element.border_style)),
            Declaration::new("font-weight", element.font_weight.to_string()),
            Declaration::new("box-shadow", shadow_value(&element.shadow)),
        ]);
        if element.display == Display::Flex {
            out.extend([
                Declaration::new("flex-direction", flex_direction_value(&element.flex_direction)),
                Declaration::new("flex-wrap", element.flex_wrap.as_str()),
                Declaration::new(
                    "justify-content",
                    justify_content_value(&element.justify_content),
                ),
                Declaration::new("align-items", align_items_value(&element.align_items)),
            ]);
        }
        if element.animation.is_active() {
            out.push(Declaration::new(
                "animation-name",
                element.animation.kind.as_str(),
            ));
        }
        out
    }
}

fn display_value(display: &Display) -> String {
    match display {
        Display::Hidden => "none".to_string(),
        other => other.as_str().to_string(),
    }
}

fn position_value(position: &Position) -> String {
    position.as_str().to_string()
}

fn border_style_value(style: &BorderStyle) -> String {
    style.as_str().to_string()
}

/// Literal `box-shadow` for a named shadow size. Unknown names pass through.
#[must_use]
pub fn shadow_value(shadow: &str) -> String {
    let value = match shadow {
        "" | "none" => "none",
        "sm" => "0 1px 2px 0 rgb(0 0 0 / 0.05)",
        "md" => "0 4px 6px -1px rgb(0 0 0 / 0.1), 0 2px 4px -2px rgb(0 0 0 / 0.1)",
        "lg" => "0 10px 15px -3px rgb(0 0 0 / 0.1), 0 4px 6px -4px rgb(0 0 0 / 0.1)",
        "xl" => "0 20px 25px -5px rgb(0 0 0 / 0.1), 0 8px 10px -6px rgb(0 0 0 / 0.1)",
        "2xl" => "0 25px 50px -12px rgb(0 0 0 / 0.25)",
        "inner" => "inset 0 2px 4px 0 rgb(0 0 0 / 0.05)",
        other => other,
    };
    value.to_string()
}

fn flex_direction_value(direction: &str) -> String {
    match direction {
        "col" => "column",
        "col-reverse" => "column-reverse",
        other => other,
    }
    .to_string()
}

fn justify_content_value(justify: &str) -> String {
    match justify {
        "start" => "flex-start",
        "end" => "flex-end",
        "between" => "space-between",
        "around" => "space-around",
        "evenly" => "space-evenly",
        other => other,
    }
    .to_string()
}

fn align_items_value(align: &str) -> String {
    match align {
        "start" => "flex-start",
        "end" => "flex-end",
        other => other,
    }
    .to_string()
}

fn keyframes(name: &str) -> Option<&'static str> {
    match AnimationKind::from(name) {
        AnimationKind::Spin => Some("@keyframes spin {\n  to { transform: rotate(360deg); }\n}\n"),
        AnimationKind::Pulse => Some("@keyframes pulse {\n  50% { opacity: 0.5; }\n}\n"),
        AnimationKind::Bounce => Some(
            "@keyframes bounce {\n  0%, 100% { transform: translateY(-25%); animation-timing-function: cubic-bezier(0.8, 0, 1, 1); }\n  50% { transform: none; animation-timing-function: cubic-bezier(0, 0, 0.2, 1); }\n}\n",
        ),
        AnimationKind::None | AnimationKind::Other(_) => None,
    }
}

/// Escape characters that are not valid in a bare id selector.
fn selector_escape(id: &str) -> String {
    let mut out = String::with_capacity(id.len());
    for c in id.chars() {
        if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
            out.push(c);
        } else {
            out.push('\\');
            out.push(c);
        }
    }
    out
}
