//! Markup export.
//!
//! Renders a [`Project`] to HTML: every element becomes an absolutely placed
//! `<div id="element-{id}">` carrying its compiled class tokens and residual
//! inline style, inside a page grid with a visible column guide.

use std::fmt::Write;
use std::path::Path;

use gridsmith_core::{escape_html, Element, Project, StyleCompiler, COLUMN_RANGE};

use crate::error::{ExportError, ExportResult};

/// Script tag source for the utility-class runtime.
pub const DEFAULT_UTILITY_SCRIPT: &str = "https://cdn.tailwindcss.com";

/// Configuration for markup export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkupConfig {
    /// Document title (default: "Gridsmith Page").
    pub title: String,
    /// Wrap the page in a full HTML document (default: true).
    pub document_shell: bool,
    /// Optional stylesheet linked from the document head.
    pub stylesheet_href: Option<String>,
    /// Utility-class runtime loaded from the head. `None` omits the tag.
    pub utility_script: Option<String>,
}

impl Default for MarkupConfig {
    fn default() -> Self {
        Self {
            title: "Gridsmith Page".to_string(),
            document_shell: true,
            stylesheet_href: None,
            utility_script: Some(DEFAULT_UTILITY_SCRIPT.to_string()),
        }
    }
}

/// Exports projects as HTML.
#[derive(Debug, Clone)]
pub struct MarkupExporter {
    config: MarkupConfig,
    compiler: StyleCompiler,
}

impl MarkupExporter {
    /// Create a new exporter with the given configuration.
    #[must_use]
    pub fn new(config: MarkupConfig) -> Self {
        Self {
            config,
            compiler: StyleCompiler::new(),
        }
    }

    /// Create an exporter with default configuration.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(MarkupConfig::default())
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &MarkupConfig {
        &self.config
    }

    /// Render a project.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::InvalidColumns`] if the column count is outside
    /// `1..=12`.
    pub fn export(&self, project: &Project) -> ExportResult<String> {
        if !COLUMN_RANGE.contains(&project.columns) {
            return Err(ExportError::InvalidColumns(project.columns));
        }
        let page = self.page(&project.elements, project.columns);
        tracing::debug!("Exported {} elements to markup", project.elements.len());
        if self.config.document_shell {
            Ok(self.document(&page))
        } else {
            Ok(page)
        }
    }

    /// Render a project and write it to `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering or writing fails.
    pub fn write_to(&self, project: &Project, path: &Path) -> ExportResult<()> {
        let html = self.export(project)?;
        std::fs::write(path, html)?;
        tracing::info!("Wrote markup to {}", path.display());
        Ok(())
    }

    /// Render one element wrapper.
    #[must_use]
    pub fn element(&self, element: &Element) -> String {
        let style = self.compiler.compile(element);
        format!(
            "<div id=\"element-{}\" class=\"{}\" style=\"{}\">{}</div>",
            escape_html(element.id.as_str()),
            escape_html(&style.class_attr()),
            escape_html(&style.style_attr()),
            self.compiler.content(element),
        )
    }

    fn page(&self, elements: &[Element], columns: u8) -> String {
        let mut html = String::with_capacity(256 + elements.len() * 512);
        let _ = writeln!(
            html,
            "<div class=\"relative grid grid-cols-{columns} w-full min-h-screen\" style=\"{}\">",
            column_guide(columns)
        );
        for element in elements {
            let _ = writeln!(html, "  {}", self.element(element));
        }
        html.push_str("</div>\n");
        html
    }

    fn document(&self, body: &str) -> String {
        let mut html = String::with_capacity(body.len() + 512);
        html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
        html.push_str("  <meta charset=\"UTF-8\" />\n");
        html.push_str(
            "  <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\" />\n",
        );
        let _ = writeln!(html, "  <title>{}</title>", escape_html(&self.config.title));
        if let Some(src) = &self.config.utility_script {
            let _ = writeln!(html, "  <script src=\"{}\"></script>", escape_html(src));
        }
        if let Some(href) = &self.config.stylesheet_href {
            let _ = writeln!(
                html,
                "  <link rel=\"stylesheet\" href=\"{}\" />",
                escape_html(href)
            );
        }
        html.push_str("</head>\n<body>\n");
        html.push_str(body);
        html.push_str("</body>\n</html>\n");
        html
    }
}

impl Default for MarkupExporter {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Background style drawing one guide line per column.
#[must_use]
pub fn column_guide(columns: u8) -> String {
    let width = 100.0 / f64::from(columns.max(1));
    format!(
        "background-image: repeating-linear-gradient(90deg, transparent, transparent calc({width}% - 1px), #e5e7eb calc({width}% - 1px), #e5e7eb {width}%);"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridsmith_core::ElementKind;

    fn fragment_exporter() -> MarkupExporter {
        MarkupExporter::new(MarkupConfig {
            document_shell: false,
            ..MarkupConfig::default()
        })
    }

    #[test]
    fn test_element_wrapper() {
        let exporter = MarkupExporter::with_defaults();
        let element = Element::new(ElementKind::Div).with_id("abc");
        let html = exporter.element(&element);
        assert!(html.starts_with(
            "<div id=\"element-abc\" class=\"block absolute border-solid rounded border\" style=\"left: 0px; top: 0px;"
        ));
        assert!(html.ends_with(
            "<div class=\"w-full h-full flex items-center justify-center\">Division</div></div>"
        ));
    }

    #[test]
    fn test_fragment_has_grid_backdrop() {
        let project = Project::new(vec![Element::new(ElementKind::Text)], 4);
        let html = fragment_exporter().export(&project).expect("export");
        assert!(html.starts_with("<div class=\"relative grid grid-cols-4"));
        assert!(html.contains("calc(25% - 1px)"));
        assert!(!html.contains("<!DOCTYPE html>"));
        assert_eq!(html.matches("id=\"element-").count(), 1);
    }

    #[test]
    fn test_document_shell() {
        let exporter = MarkupExporter::new(MarkupConfig {
            title: "Launch <Page>".to_string(),
            stylesheet_href: Some("page.css".to_string()),
            ..MarkupConfig::default()
        });
        let html = exporter.export(&Project::default()).expect("export");
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Launch &lt;Page&gt;</title>"));
        assert!(html.contains("<script src=\"https://cdn.tailwindcss.com\"></script>"));
        assert!(html.contains("<link rel=\"stylesheet\" href=\"page.css\" />"));
        assert!(html.contains("grid-cols-12"));
    }

    #[test]
    fn test_rejects_out_of_range_columns() {
        let project = Project::new(Vec::new(), 13);
        assert!(matches!(
            MarkupExporter::with_defaults().export(&project),
            Err(ExportError::InvalidColumns(13))
        ));
    }

    #[test]
    fn test_column_guide_width() {
        assert!(column_guide(12).contains("calc(8.333333333333334% - 1px)"));
        assert!(column_guide(1).contains("#e5e7eb 100%"));
    }
}
