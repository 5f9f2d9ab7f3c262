//! Project file format and serializer.
//!
//! ```json
//! { "elements": [ { "id": "...", "type": "button", "x": 40, "y": 60, ... } ],
//!   "columns": 12,
//!   "version": "1.0.0" }
//! ```
//!
//! [`ProjectSerializer::validate`] is shallow: it checks the
//! envelope plus each element's `id`, `type`, `x` and `y`. Other fields are
//! decoded leniently: a value of the wrong type falls back to the global
//! default instead of rejecting the project.

use std::collections::HashSet;

use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::storage::{KeyValueStore, PROJECT_KEY};
use crate::{Element, ElementStore, HistoryEngine, StorageError, ValidationError};

/// Format version written into every saved project.
pub const FORMAT_VERSION: &str = "1.0.0";

/// Default grid column count.
pub const DEFAULT_COLUMNS: u8 = 12;

/// Valid column counts.
pub const COLUMN_RANGE: std::ops::RangeInclusive<u8> = 1..=12;

/// Suggested file name for a downloaded project.
pub const EXPORT_FILE_NAME: &str = "gridsmith-project.json";

/// A complete, portable project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    /// Elements in insertion order.
    #[serde(deserialize_with = "lenient_elements")]
    pub elements: Vec<Element>,
    /// Page grid column count, `1..=12`.
    #[serde(deserialize_with = "whole_columns")]
    pub columns: u8,
    /// Format version tag.
    #[serde(default = "Project::default_version")]
    pub version: String,
}

impl Project {
    /// Build a project stamped with the current format version.
    #[must_use]
    pub fn new(elements: Vec<Element>, columns: u8) -> Self {
        Self {
            elements,
            columns,
            version: FORMAT_VERSION.to_string(),
        }
    }

    fn default_version() -> String {
        FORMAT_VERSION.to_string()
    }

    /// Serialize to compact JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serialize to indented JSON, as written to project files.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl Default for Project {
    fn default() -> Self {
        Self::new(Vec::new(), DEFAULT_COLUMNS)
    }
}

/// Column count for a JSON number, if it is a whole number in [`COLUMN_RANGE`].
fn column_count(value: f64) -> Option<u8> {
    COLUMN_RANGE.find(|&columns| (f64::from(columns) - value).abs() < f64::EPSILON)
}

fn whole_columns<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let value = f64::deserialize(deserializer)?;
    column_count(value)
        .ok_or_else(|| de::Error::custom(format!("invalid column count {value}")))
}

fn lenient_elements<'de, D>(deserializer: D) -> Result<Vec<Element>, D::Error>
where
    D: Deserializer<'de>,
{
    Vec::<Value>::deserialize(deserializer)?
        .into_iter()
        .map(Element::from_value_lenient)
        .collect::<Result<_, _>>()
        .map_err(de::Error::custom)
}

/// Validates, loads, packages, and persists projects.
pub struct ProjectSerializer {
    storage: Box<dyn KeyValueStore>,
    key: String,
}

impl std::fmt::Debug for ProjectSerializer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProjectSerializer")
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}

impl ProjectSerializer {
    /// Create a serializer persisting under [`PROJECT_KEY`].
    #[must_use]
    pub fn new(storage: Box<dyn KeyValueStore>) -> Self {
        Self::with_key(storage, PROJECT_KEY)
    }

    /// Create a serializer persisting under a custom key.
    #[must_use]
    pub fn with_key(storage: Box<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    /// The persistence key.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Check the shape of a raw project payload.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] naming the first offending field.
    pub fn validate(raw: &Value) -> Result<(), ValidationError> {
        let object = raw.as_object().ok_or(ValidationError::NotAnObject)?;

        let elements = object
            .get("elements")
            .and_then(Value::as_array)
            .ok_or(ValidationError::ElementsNotAList)?;

        object
            .get("columns")
            .and_then(Value::as_f64)
            .and_then(column_count)
            .ok_or(ValidationError::InvalidColumns)?;

        let mut seen = HashSet::with_capacity(elements.len());
        for (index, element) in elements.iter().enumerate() {
            let fields = element
                .as_object()
                .ok_or(ValidationError::ElementNotAnObject { index })?;

            let id = match fields.get("id") {
                Some(Value::String(id)) if !id.is_empty() => id.clone(),
                Some(Value::Number(id)) => id.to_string(),
                Some(Value::Null | Value::String(_)) | None => {
                    return Err(ValidationError::MissingField { index, field: "id" })
                }
                Some(_) => return Err(ValidationError::InvalidId { index }),
            };
            if fields.get("type").and_then(Value::as_str).is_none() {
                return Err(ValidationError::MissingField {
                    index,
                    field: "type",
                });
            }
            for field in ["x", "y"] {
                if !fields.get(field).is_some_and(Value::is_number) {
                    return Err(ValidationError::NonNumeric { index, field });
                }
            }
            if seen.contains(&id) {
                return Err(ValidationError::DuplicateId { index, id });
            }
            seen.insert(id);
        }
        Ok(())
    }

    /// Validate and decode a raw JSON value.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if the shape is wrong.
    pub fn decode(raw: Value) -> Result<Project, ValidationError> {
        Self::validate(&raw)?;
        serde_json::from_value(raw).map_err(|e| ValidationError::InvalidElement(e.to_string()))
    }

    /// Parse project JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::Malformed`] for invalid JSON, or any other
    /// [`ValidationError`] from [`decode`](Self::decode).
    pub fn parse(text: &str) -> Result<Project, ValidationError> {
        let raw: Value =
            serde_json::from_str(text).map_err(|e| ValidationError::Malformed(e.to_string()))?;
        Self::decode(raw)
    }

    /// Package the current state into a project payload.
    ///
    /// Delivery (download, clipboard, ...) is up to the caller.
    #[must_use]
    pub fn save(elements: &[Element], columns: u8) -> Project {
        Project::new(elements.to_vec(), columns)
    }

    /// Replace store contents and history with `project`, then persist it.
    ///
    /// The in-memory state is always applied; the returned error only
    /// reports that persisting failed.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the project could not be persisted.
    pub fn load(
        &mut self,
        project: &Project,
        store: &mut ElementStore,
        history: &mut HistoryEngine,
    ) -> Result<(), StorageError> {
        let elements = store.set_all(project.elements.clone());
        history.reset(elements);
        store.clear_selection();
        tracing::info!(
            "Loaded project with {} elements, {} columns",
            store.len(),
            project.columns
        );
        self.persist(&Self::save(store.all(), project.columns))
    }

    /// Write a project under the persistence key.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if encoding or the backend fails.
    pub fn persist(&mut self, project: &Project) -> Result<(), StorageError> {
        let json = project.to_json()?;
        self.storage.set(&self.key, &json).inspect_err(|e| {
            tracing::warn!("Failed to persist project under {}: {e}", self.key);
        })
    }

    /// Read the persisted project, if there is a valid one.
    ///
    /// Missing, unreadable, or invalid data yields `None` and is logged.
    #[must_use]
    pub fn restore(&self) -> Option<Project> {
        let text = match self.storage.get(&self.key) {
            Ok(Some(text)) => text,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!("Failed to read saved project: {e}");
                return None;
            }
        };
        match Self::parse(&text) {
            Ok(project) => Some(project),
            Err(e) => {
                tracing::warn!("Ignoring invalid saved project: {e}");
                None
            }
        }
    }

    /// Remove the persisted project.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the backend fails.
    pub fn clear(&mut self) -> Result<(), StorageError> {
        self.storage.remove(&self.key)
    }
}
