//! Page elements - the building blocks of a composition.
//!
//! An [`Element`] is a flat, fully populated record: every attribute has a
//! value, with global defaults filling anything a caller or an imported
//! project leaves out. Kind-specific defaults are layered on top at creation
//! time by [`Element::new`].

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Unique identifier for an element.
///
/// Freshly created elements get a UUID v4; ids loaded from a project file are
/// kept verbatim, whatever their shape.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(String);

impl ElementId {
    /// Create a new unique element ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Create from an existing UUID.
    #[must_use]
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid.to_string())
    }

    /// The id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ElementId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ElementId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ElementId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Declares a string-backed keyword enum.
///
/// Known keywords get their own variant; anything else lands in `Other` so a
/// project survives a load/save cycle unchanged.
macro_rules! keyword_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $kw:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(from = "String", into = "String")]
        pub enum $name {
            $( $(#[$vmeta])* $variant, )+
            /// A keyword outside the known set, preserved verbatim.
            Other(String),
        }

        impl $name {
            /// The wire keyword for this value.
            #[must_use]
            pub fn as_str(&self) -> &str {
                match self {
                    $( Self::$variant => $kw, )+
                    Self::Other(other) => other,
                }
            }
        }

        impl From<&str> for $name {
            fn from(keyword: &str) -> Self {
                match keyword {
                    $( $kw => Self::$variant, )+
                    other => Self::Other(other.to_string()),
                }
            }
        }

        impl From<String> for $name {
            fn from(keyword: String) -> Self {
                Self::from(keyword.as_str())
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                match value {
                    $name::Other(other) => other,
                    known => known.as_str().to_string(),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

keyword_enum! {
    /// The kind of element, serialized as the `type` tag.
    ElementKind {
        /// A run of text.
        Text => "text",
        /// A clickable button.
        Button => "button",
        /// An image.
        Image => "image",
        /// A raised content card.
        Card => "card",
        /// A top-level page container.
        Container => "container",
        /// A generic division.
        Div => "div",
        /// A navigation bar.
        Navbar => "navbar",
        /// A tab strip.
        Tabs => "tabs",
        /// A modal dialog.
        Modal => "modal",
        /// A form.
        Form => "form",
        /// A hero banner.
        Hero => "hero",
        /// A circle; always fully rounded.
        Circle => "circle",
    }
}

keyword_enum! {
    /// CSS display mode.
    Display {
        /// `display: block`.
        Block => "block",
        /// `display: flex`.
        Flex => "flex",
        /// `display: grid`.
        Grid => "grid",
        /// `display: inline`.
        Inline => "inline",
        /// `display: inline-block`.
        InlineBlock => "inline-block",
        /// `display: none`.
        Hidden => "hidden",
    }
}

keyword_enum! {
    /// CSS positioning scheme.
    Position {
        /// `position: absolute`.
        Absolute => "absolute",
        /// `position: relative`.
        Relative => "relative",
        /// `position: fixed`.
        Fixed => "fixed",
        /// `position: sticky`.
        Sticky => "sticky",
    }
}

keyword_enum! {
    /// Border line style.
    BorderStyle {
        /// Solid line.
        Solid => "solid",
        /// Dashed line.
        Dashed => "dashed",
        /// Dotted line.
        Dotted => "dotted",
        /// Double line.
        Double => "double",
        /// No border line.
        None => "none",
    }
}

keyword_enum! {
    /// Named animation preset.
    AnimationKind {
        /// No animation.
        None => "none",
        /// Vertical bounce.
        Bounce => "bounce",
        /// Opacity pulse.
        Pulse => "pulse",
        /// Continuous rotation.
        Spin => "spin",
    }
}

/// Animation settings attached to an element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Animation {
    /// Which preset to play.
    #[serde(rename = "type")]
    pub kind: AnimationKind,
    /// Duration of one cycle in seconds.
    pub duration: f64,
    /// Delay before the first cycle in seconds.
    pub delay: f64,
    /// Whether the animation repeats forever.
    #[serde(rename = "loop")]
    pub looping: bool,
}

impl Animation {
    /// Whether a built-in preset is configured. Unrecognized types are
    /// kept on the wire but never rendered.
    #[must_use]
    pub fn is_active(&self) -> bool {
        matches!(
            self.kind,
            AnimationKind::Bounce | AnimationKind::Pulse | AnimationKind::Spin
        )
    }
}

impl Default for Animation {
    fn default() -> Self {
        Self {
            kind: AnimationKind::None,
            duration: 1.0,
            delay: 0.0,
            looping: false,
        }
    }
}

/// Resolved per-side box values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sides {
    /// Top edge.
    pub top: f64,
    /// Right edge.
    pub right: f64,
    /// Bottom edge.
    pub bottom: f64,
    /// Left edge.
    pub left: f64,
}

/// A positioned, styled element.
///
/// Missing fields in serialized input take the global defaults from
/// [`Element::default`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Element {
    /// Unique identifier.
    pub id: ElementId,
    /// Element kind.
    #[serde(rename = "type")]
    pub kind: ElementKind,

    /// X position (pixels from left).
    pub x: f64,
    /// Y position (pixels from top).
    pub y: f64,
    /// Width in pixels.
    pub width: f64,
    /// Height in pixels.
    pub height: f64,
    /// Rotation in degrees.
    pub angle: f64,
    /// Minimum width in pixels.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_width: Option<f64>,
    /// Maximum width in pixels.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_width: Option<f64>,

    /// Uniform padding.
    pub padding: f64,
    /// Top padding override.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub padding_top: Option<f64>,
    /// Right padding override.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub padding_right: Option<f64>,
    /// Bottom padding override.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub padding_bottom: Option<f64>,
    /// Left padding override.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub padding_left: Option<f64>,
    /// Uniform margin.
    pub margin: f64,
    /// Top margin override.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margin_top: Option<f64>,
    /// Right margin override.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margin_right: Option<f64>,
    /// Bottom margin override.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margin_bottom: Option<f64>,
    /// Left margin override.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margin_left: Option<f64>,

    /// Border width in pixels.
    pub border_width: f64,
    /// Border color.
    pub border_color: String,
    /// Corner radius in pixels (ignored for circles).
    pub border_radius: f64,
    /// Border line style.
    pub border_style: BorderStyle,

    /// Background color.
    pub background_color: String,
    /// Foreground text color.
    pub text_color: String,
    /// Font family.
    pub font_family: String,
    /// Font size in pixels.
    pub font_size: f64,
    /// Numeric font weight.
    pub font_weight: u16,
    /// Horizontal text alignment.
    pub text_align: String,
    /// Line height multiplier.
    pub line_height: f64,
    /// Text case transform.
    pub text_transform: String,

    /// Display mode.
    pub display: Display,
    /// Positioning scheme.
    pub position: Position,
    /// Float side, or `none`.
    pub float: String,
    /// Overflow behaviour.
    pub overflow: String,
    /// Main-axis distribution (flex only).
    pub justify_content: String,
    /// Cross-axis alignment (flex only).
    pub align_items: String,
    /// Main axis direction (flex only).
    pub flex_direction: String,
    /// Wrapping behaviour (flex only).
    pub flex_wrap: String,
    /// Gap between flex children in pixels.
    pub gap: f64,

    /// Named shadow size, or `none`.
    pub shadow: String,
    /// Opacity percent, 0-100.
    pub opacity: u8,
    /// Stacking order.
    pub z_index: i32,

    /// Text shown inside the element.
    pub text_content: String,
    /// Image source; only meaningful for [`ElementKind::Image`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,

    /// Animation settings.
    pub animation: Animation,
}

impl Default for Element {
    fn default() -> Self {
        Self {
            id: ElementId::new(),
            kind: ElementKind::Div,
            x: 0.0,
            y: 0.0,
            width: 200.0,
            height: 150.0,
            angle: 0.0,
            min_width: None,
            max_width: None,
            padding: 8.0,
            padding_top: None,
            padding_right: None,
            padding_bottom: None,
            padding_left: None,
            margin: 4.0,
            margin_top: None,
            margin_right: None,
            margin_bottom: None,
            margin_left: None,
            border_width: 1.0,
            border_color: "#e5e7eb".to_string(),
            border_radius: 0.0,
            border_style: BorderStyle::Solid,
            background_color: "#ffffff".to_string(),
            text_color: "#1f2937".to_string(),
            font_family: "system-ui".to_string(),
            font_size: 14.0,
            font_weight: 400,
            text_align: "left".to_string(),
            line_height: 1.5,
            text_transform: "none".to_string(),
            display: Display::Block,
            position: Position::Absolute,
            float: "none".to_string(),
            overflow: "visible".to_string(),
            justify_content: "start".to_string(),
            align_items: "stretch".to_string(),
            flex_direction: "row".to_string(),
            flex_wrap: "nowrap".to_string(),
            gap: 0.0,
            shadow: "none".to_string(),
            opacity: 100,
            z_index: 1,
            text_content: String::new(),
            image_url: None,
            animation: Animation::default(),
        }
    }
}

impl Element {
    /// Create a new element of the given kind with a fresh id.
    ///
    /// Kind defaults are applied over the global defaults.
    #[must_use]
    pub fn new(kind: ElementKind) -> Self {
        let mut element = Self {
            kind,
            ..Self::default()
        };
        element.apply_kind_defaults();
        element
    }

    /// Set the position.
    #[must_use]
    pub fn with_position(mut self, x: f64, y: f64) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    /// Set the size.
    #[must_use]
    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Replace the id.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<ElementId>) -> Self {
        self.id = id.into();
        self
    }

    /// Set the text content.
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text_content = text.into();
        self
    }

    /// Whether this element always renders fully rounded.
    #[must_use]
    pub fn is_circle(&self) -> bool {
        self.kind == ElementKind::Circle
    }

    /// Padding with per-side overrides resolved.
    #[must_use]
    pub fn padding_sides(&self) -> Sides {
        Sides {
            top: self.padding_top.unwrap_or(self.padding),
            right: self.padding_right.unwrap_or(self.padding),
            bottom: self.padding_bottom.unwrap_or(self.padding),
            left: self.padding_left.unwrap_or(self.padding),
        }
    }

    /// Margin with per-side overrides resolved.
    #[must_use]
    pub fn margin_sides(&self) -> Sides {
        Sides {
            top: self.margin_top.unwrap_or(self.margin),
            right: self.margin_right.unwrap_or(self.margin),
            bottom: self.margin_bottom.unwrap_or(self.margin),
            left: self.margin_left.unwrap_or(self.margin),
        }
    }

    /// Opacity as a fraction in `0.0..=1.0`.
    #[must_use]
    pub fn opacity_fraction(&self) -> f64 {
        f64::from(self.opacity.min(100)) / 100.0
    }

    /// Check if a point (in page coordinates) is within this element.
    #[must_use]
    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        x >= self.x && x <= self.x + self.width && y >= self.y && y <= self.y + self.height
    }

    /// Shallow-merge a patch into a copy of this element.
    ///
    /// `id` and `type` keys are ignored. `null` clears optional overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if a patched value does not fit the schema; `self`
    /// is never modified.
    pub fn merged(&self, patch: &ElementPatch) -> Result<Self, serde_json::Error> {
        let mut fields = match serde_json::to_value(self)? {
            Value::Object(fields) => fields,
            _ => Map::new(),
        };
        for (key, value) in &patch.0 {
            if ElementPatch::is_identity_key(key) {
                tracing::debug!("Ignoring identity field `{key}` in patch for {}", self.id);
                continue;
            }
            fields.insert(key.clone(), value.clone());
        }
        serde_json::from_value(Value::Object(fields))
    }

    /// Decode an imported element.
    ///
    /// Fields whose value does not fit the schema are dropped and fall back to
    /// the global defaults, so `"maxWidth": "none"` or `"opacity": null` leave
    /// the rest of the element intact. A numeric `id` is kept as its decimal
    /// text.
    ///
    /// # Errors
    ///
    /// Returns an error if `value` is not an object, or if `id` or `type`
    /// cannot be decoded.
    pub fn from_value_lenient(value: Value) -> Result<Self, serde_json::Error> {
        let mut fields = match value {
            Value::Object(fields) => fields,
            other => return serde_json::from_value(other),
        };
        let numeric_id = match fields.get("id") {
            Some(Value::Number(id)) => Some(id.to_string()),
            _ => None,
        };
        if let Some(id) = numeric_id {
            fields.insert("id".to_string(), Value::String(id));
        }

        let mut value = Value::Object(fields);
        if let Ok(element) = Self::deserialize(&value) {
            return Ok(element);
        }
        if let Value::Object(fields) = &mut value {
            let id = fields
                .get("id")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();
            fields.retain(|key, field| {
                let fits = ElementPatch::is_identity_key(key) || field_fits(key, field);
                if !fits {
                    tracing::warn!("Ignoring invalid `{key}` on element {id}: {field}");
                }
                fits
            });
        }
        Self::deserialize(&value)
    }

    fn apply_kind_defaults(&mut self) {
        match self.kind {
            ElementKind::Text => {
                self.width = 150.0;
                self.height = 40.0;
                self.font_size = 16.0;
                self.background_color = "transparent".to_string();
                self.text_content = "Sample Text".to_string();
            }
            ElementKind::Button => {
                self.width = 120.0;
                self.height = 40.0;
                self.border_width = 0.0;
                self.border_radius = 6.0;
                self.background_color = "#3b82f6".to_string();
                self.text_color = "#ffffff".to_string();
                self.font_size = 14.0;
                self.font_weight = 500;
                self.text_align = "center".to_string();
                self.display = Display::Flex;
                self.justify_content = "center".to_string();
                self.align_items = "center".to_string();
                self.text_content = "Button".to_string();
            }
            ElementKind::Image => {
                self.padding = 0.0;
                self.background_color = "#f3f4f6".to_string();
                self.text_content = "Image".to_string();
                self.image_url = Some("https://placehold.co/200x150".to_string());
            }
            ElementKind::Card => {
                self.width = 300.0;
                self.height = 200.0;
                self.padding = 16.0;
                self.border_radius = 8.0;
                self.shadow = "md".to_string();
                self.text_content = "Card Title".to_string();
            }
            ElementKind::Container => {
                self.width = 400.0;
                self.height = 300.0;
                self.border_radius = 8.0;
                self.font_size = 16.0;
                self.text_align = "center".to_string();
                self.background_color = "#f9fafb".to_string();
                self.text_content = "Main Container".to_string();
            }
            ElementKind::Div => {
                self.border_radius = 4.0;
                self.text_align = "center".to_string();
                self.text_content = "Division".to_string();
            }
            ElementKind::Navbar => {
                self.width = 800.0;
                self.height = 64.0;
                self.padding = 16.0;
                self.border_width = 0.0;
                self.background_color = "#1f2937".to_string();
                self.text_color = "#ffffff".to_string();
                self.display = Display::Flex;
                self.justify_content = "between".to_string();
                self.align_items = "center".to_string();
                self.text_content = "Brand".to_string();
            }
            ElementKind::Tabs => {
                self.width = 400.0;
                self.height = 48.0;
                self.display = Display::Flex;
                self.align_items = "end".to_string();
                self.gap = 8.0;
                self.text_content = "Tab 1".to_string();
            }
            ElementKind::Modal => {
                self.width = 400.0;
                self.height = 300.0;
                self.padding = 24.0;
                self.border_radius = 12.0;
                self.shadow = "xl".to_string();
                self.z_index = 50;
                self.text_content = "Modal Title".to_string();
            }
            ElementKind::Form => {
                self.width = 360.0;
                self.height = 280.0;
                self.padding = 16.0;
                self.border_radius = 8.0;
                self.display = Display::Flex;
                self.flex_direction = "col".to_string();
                self.gap = 12.0;
                self.text_content = "Form".to_string();
            }
            ElementKind::Hero => {
                self.width = 800.0;
                self.height = 400.0;
                self.border_width = 0.0;
                self.background_color = "#eef2ff".to_string();
                self.font_size = 36.0;
                self.font_weight = 700;
                self.text_align = "center".to_string();
                self.display = Display::Flex;
                self.justify_content = "center".to_string();
                self.align_items = "center".to_string();
                self.text_content = "Hero Title".to_string();
            }
            ElementKind::Circle => {
                self.width = 100.0;
                self.height = 100.0;
                self.border_width = 0.0;
                self.border_radius = 50.0;
                self.background_color = "#3b82f6".to_string();
            }
            ElementKind::Other(_) => {}
        }
    }
}

/// Whether `value` decodes as the field `key` on its own.
fn field_fits(key: &str, value: &Value) -> bool {
    let mut single = Map::new();
    single.insert(key.to_string(), value.clone());
    Element::deserialize(&Value::Object(single)).is_ok()
}

/// A shallow patch of element fields, keyed by wire (camelCase) name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ElementPatch(Map<String, Value>);

impl ElementPatch {
    /// Create an empty patch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace one field.
    #[must_use]
    pub fn set(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Build a patch from a JSON object. Returns `None` for any other value.
    #[must_use]
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(fields) => Some(Self(fields)),
            _ => None,
        }
    }

    /// Whether the patch carries no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn is_identity_key(key: &str) -> bool {
        key == "id" || key == "type"
    }
}

impl From<Map<String, Value>> for ElementPatch {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}

/// Round a coordinate to the nearest multiple of `quantum`.
///
/// A non-positive quantum leaves the value unchanged.
#[must_use]
pub fn snap_to_grid(value: f64, quantum: f64) -> f64 {
    if quantum <= 0.0 {
        return value;
    }
    (value / quantum).round() * quantum
}
