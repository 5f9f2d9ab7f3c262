//! # Gridsmith Export
//!
//! Output formats for Gridsmith projects:
//!
//! - [`MarkupExporter`]: HTML with utility-class tokens and residual inline style
//! - [`StylesheetExporter`]: a plain CSS sheet with one literal rule per element

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod markup;
pub mod stylesheet;

pub use error::{ExportError, ExportResult};
pub use markup::{column_guide, MarkupConfig, MarkupExporter, DEFAULT_UTILITY_SCRIPT};
pub use stylesheet::{shadow_value, StylesheetExporter};
