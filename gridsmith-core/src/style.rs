//! Deterministic style compilation.
//!
//! [`StyleCompiler::compile`] turns one element into an ordered list of
//! utility class tokens plus the residual declarations that have no token
//! equivalent. Output depends only on the element, so recompiling an
//! unchanged layout produces byte-identical markup.
//!
//! ## Token order
//!
//! | Step | Source | Example |
//! |------|--------|---------|
//! | 1 | display (always one) | `flex` |
//! | 2 | position | `absolute` |
//! | 3 | shadow | `shadow-md` |
//! | 4 | border style | `border-dashed` |
//! | 5 | flex direction, wrap, justify, align (flex only) | `flex-col`, `justify-between` |
//! | 6 | font weight bucket | `font-semibold` |
//! | 7 | border radius bucket | `rounded-lg` |
//! | 8 | border width | `border-2` |
//! | 9 | animation | `animate-spin` |
//!
//! Tokens are advisory. Residual declarations are authoritative: border width,
//! for instance, is written as a declaration whether or not a token was found.

use std::fmt;

use crate::content;
use crate::{BorderStyle, Display, Element, Position};

/// One literal style declaration, e.g. `width: 200px`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    /// CSS property name.
    pub property: &'static str,
    /// CSS value.
    pub value: String,
}

impl Declaration {
    /// Create a declaration.
    #[must_use]
    pub fn new(property: &'static str, value: impl Into<String>) -> Self {
        Self {
            property,
            value: value.into(),
        }
    }
}

impl fmt::Display for Declaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {};", self.property, self.value)
    }
}

/// Compiled form of one element.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CompiledStyle {
    /// Utility class tokens in emission order.
    pub class_tokens: Vec<String>,
    /// Declarations with no token equivalent, in fixed order.
    pub residual: Vec<Declaration>,
}

impl CompiledStyle {
    /// Tokens joined for a `class` attribute.
    #[must_use]
    pub fn class_attr(&self) -> String {
        self.class_tokens.join(" ")
    }

    /// Residual declarations joined for a `style` attribute.
    #[must_use]
    pub fn style_attr(&self) -> String {
        self.residual
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Whether a token was emitted.
    #[must_use]
    pub fn has_token(&self, token: &str) -> bool {
        self.class_tokens.iter().any(|t| t == token)
    }

    /// Look up a residual value by property name.
    #[must_use]
    pub fn residual_value(&self, property: &str) -> Option<&str> {
        self.residual
            .iter()
            .find(|d| d.property == property)
            .map(|d| d.value.as_str())
    }
}

/// Maps elements to class tokens, residual style, and inner content.
#[derive(Debug, Clone, Copy, Default)]
pub struct StyleCompiler;

impl StyleCompiler {
    /// Create a compiler.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Compile an element's attributes.
    #[must_use]
    pub fn compile(&self, element: &Element) -> CompiledStyle {
        CompiledStyle {
            class_tokens: class_tokens(element),
            residual: residual_style(element),
        }
    }

    /// Inner markup fragment for the element's kind.
    #[must_use]
    pub fn content(&self, element: &Element) -> String {
        content::fragment(element)
    }
}

fn class_tokens(element: &Element) -> Vec<String> {
    let mut tokens: Vec<String> = Vec::with_capacity(8);
    tokens.push(display_token(&element.display).to_string());
    tokens.extend(position_token(&element.position).map(str::to_string));
    tokens.extend(shadow_token(&element.shadow));
    tokens.extend(border_style_token(&element.border_style).map(str::to_string));
    if element.display == Display::Flex {
        tokens.extend(flex_tokens(element).into_iter().map(str::to_string));
    }
    tokens.extend(font_weight_token(element.font_weight).map(str::to_string));
    let radius = if element.is_circle() {
        Some("rounded-full")
    } else {
        border_radius_token(element.border_radius)
    };
    tokens.extend(radius.map(str::to_string));
    tokens.extend(border_width_token(element.border_width).map(str::to_string));
    if element.animation.is_active() {
        tokens.push(format!("animate-{}", element.animation.kind));
    }
    tokens
}

/// Display token. Unrecognized modes fall back to `block`.
#[must_use]
pub fn display_token(display: &Display) -> &'static str {
    match display {
        Display::Flex => "flex",
        Display::Grid => "grid",
        Display::Inline => "inline",
        Display::InlineBlock => "inline-block",
        Display::Hidden => "hidden",
        Display::Block | Display::Other(_) => "block",
    }
}

/// Position token, if the scheme is recognized.
#[must_use]
pub fn position_token(position: &Position) -> Option<&'static str> {
    match position {
        Position::Absolute => Some("absolute"),
        Position::Relative => Some("relative"),
        Position::Fixed => Some("fixed"),
        Position::Sticky => Some("sticky"),
        Position::Other(_) => None,
    }
}

/// `shadow-{value}` unless the shadow is `none` or empty.
#[must_use]
pub fn shadow_token(shadow: &str) -> Option<String> {
    (!shadow.is_empty() && shadow != "none").then(|| format!("shadow-{shadow}"))
}

/// Border style token. Anything but the three named styles and `none` is solid.
#[must_use]
pub fn border_style_token(style: &BorderStyle) -> Option<&'static str> {
    match style {
        BorderStyle::Dashed => Some("border-dashed"),
        BorderStyle::Dotted => Some("border-dotted"),
        BorderStyle::Double => Some("border-double"),
        BorderStyle::None => None,
        BorderStyle::Solid | BorderStyle::Other(_) => Some("border-solid"),
    }
}

fn flex_tokens(element: &Element) -> Vec<&'static str> {
    let direction = match element.flex_direction.as_str() {
        "row" => Some("flex-row"),
        "row-reverse" => Some("flex-row-reverse"),
        "col" | "column" => Some("flex-col"),
        "col-reverse" | "column-reverse" => Some("flex-col-reverse"),
        _ => None,
    };
    let wrap = match element.flex_wrap.as_str() {
        "wrap" => Some("flex-wrap"),
        "nowrap" => Some("flex-nowrap"),
        "wrap-reverse" => Some("flex-wrap-reverse"),
        _ => None,
    };
    let justify = match element.justify_content.as_str() {
        "start" | "flex-start" => Some("justify-start"),
        "end" | "flex-end" => Some("justify-end"),
        "center" => Some("justify-center"),
        "between" | "space-between" => Some("justify-between"),
        "around" | "space-around" => Some("justify-around"),
        "evenly" | "space-evenly" => Some("justify-evenly"),
        _ => None,
    };
    let align = match element.align_items.as_str() {
        "start" | "flex-start" => Some("items-start"),
        "end" | "flex-end" => Some("items-end"),
        "center" => Some("items-center"),
        "baseline" => Some("items-baseline"),
        "stretch" => Some("items-stretch"),
        _ => None,
    };
    [direction, wrap, justify, align].into_iter().flatten().collect()
}

/// Font weight token for the eight named buckets.
///
/// 400 and every unlisted weight produce nothing, and the compiler writes no
/// residual `font-weight` either. Such weights are lost in markup output.
#[must_use]
pub fn font_weight_token(weight: u16) -> Option<&'static str> {
    match weight {
        100 => Some("font-thin"),
        200 => Some("font-extralight"),
        300 => Some("font-light"),
        500 => Some("font-medium"),
        600 => Some("font-semibold"),
        700 => Some("font-bold"),
        800 => Some("font-extrabold"),
        900 => Some("font-black"),
        _ => None,
    }
}

/// Radius bucket by inclusive upper bound. Zero (or less) is unrounded.
#[must_use]
pub fn border_radius_token(radius: f64) -> Option<&'static str> {
    if radius <= 0.0 {
        None
    } else if radius <= 2.0 {
        Some("rounded-sm")
    } else if radius <= 4.0 {
        Some("rounded")
    } else if radius <= 6.0 {
        Some("rounded-md")
    } else if radius <= 8.0 {
        Some("rounded-lg")
    } else if radius <= 12.0 {
        Some("rounded-xl")
    } else {
        Some("rounded-2xl")
    }
}

/// Border width token for exactly 1, 2, 4 or 8 pixels.
#[must_use]
#[allow(clippy::float_cmp)]
pub fn border_width_token(width: f64) -> Option<&'static str> {
    if width == 1.0 {
        Some("border")
    } else if width == 2.0 {
        Some("border-2")
    } else if width == 4.0 {
        Some("border-4")
    } else if width == 8.0 {
        Some("border-8")
    } else {
        None
    }
}

/// Format a pixel length.
#[must_use]
pub fn px(value: f64) -> String {
    format!("{value}px")
}

fn residual_style(element: &Element) -> Vec<Declaration> {
    let mut out = vec![
        Declaration::new("left", px(element.x)),
        Declaration::new("top", px(element.y)),
        Declaration::new("width", px(element.width)),
        Declaration::new("height", px(element.height)),
    ];
    if let Some(min) = element.min_width {
        out.push(Declaration::new("min-width", px(min)));
    }
    if let Some(max) = element.max_width {
        out.push(Declaration::new("max-width", px(max)));
    }

    let padding = element.padding_sides();
    let margin = element.margin_sides();
    out.extend([
        Declaration::new("padding-top", px(padding.top)),
        Declaration::new("padding-right", px(padding.right)),
        Declaration::new("padding-bottom", px(padding.bottom)),
        Declaration::new("padding-left", px(padding.left)),
        Declaration::new("margin-top", px(margin.top)),
        Declaration::new("margin-right", px(margin.right)),
        Declaration::new("margin-bottom", px(margin.bottom)),
        Declaration::new("margin-left", px(margin.left)),
        Declaration::new("background-color", element.background_color.as_str()),
        Declaration::new("color", element.text_color.as_str()),
        Declaration::new("border-color", element.border_color.as_str()),
        Declaration::new("border-width", px(element.border_width)),
    ]);
    let radius = if element.is_circle() {
        "50%".to_string()
    } else {
        px(element.border_radius)
    };
    out.extend([
        Declaration::new("border-radius", radius),
        Declaration::new("font-family", element.font_family.as_str()),
        Declaration::new("font-size", px(element.font_size)),
        Declaration::new("line-height", element.line_height.to_string()),
        Declaration::new("text-align", element.text_align.as_str()),
        Declaration::new("text-transform", element.text_transform.as_str()),
        Declaration::new("overflow", element.overflow.as_str()),
    ]);
    if !element.float.is_empty() && element.float != "none" {
        out.push(Declaration::new("float", element.float.as_str()));
    }
    if element.display == Display::Flex {
        out.push(Declaration::new("gap", px(element.gap)));
    }
    out.extend([
        Declaration::new("z-index", element.z_index.to_string()),
        Declaration::new("opacity", element.opacity_fraction().to_string()),
        Declaration::new("transform", format!("rotate({}deg)", element.angle)),
    ]);

    let animation = &element.animation;
    if animation.is_active() {
        out.extend([
            Declaration::new("animation-duration", format!("{}s", animation.duration)),
            Declaration::new("animation-delay", format!("{}s", animation.delay)),
            Declaration::new(
                "animation-iteration-count",
                if animation.looping { "infinite" } else { "1" },
            ),
        ]);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AnimationKind, ElementKind, ElementPatch, ElementStore};

    fn div() -> Element {
        Element::new(ElementKind::Div).with_id("d1")
    }

    #[test]
    fn test_default_div_tokens() {
        let compiled = StyleCompiler::new().compile(&div());
        assert_eq!(
            compiled.class_tokens,
            ["block", "absolute", "border-solid", "rounded", "border"]
        );
    }

    #[test]
    fn test_display_always_one_token() {
        let mut element = div();
        element.display = Display::Other("table".to_string());
        let compiled = StyleCompiler::new().compile(&element);
        assert_eq!(compiled.class_tokens[0], "block");

        element.display = Display::InlineBlock;
        let compiled = StyleCompiler::new().compile(&element);
        assert_eq!(compiled.class_tokens[0], "inline-block");
    }

    #[test]
    fn test_position_unrecognized_has_no_token() {
        let mut element = div();
        element.position = Position::Other("static".to_string());
        let compiled = StyleCompiler::new().compile(&element);
        assert!(!compiled.has_token("absolute"));
        assert!(!compiled.has_token("static"));
    }

    #[test]
    fn test_shadow_tokens() {
        assert_eq!(shadow_token("lg").as_deref(), Some("shadow-lg"));
        assert_eq!(shadow_token("none"), None);
        assert_eq!(shadow_token(""), None);
    }

    #[test]
    fn test_border_style_fallback_is_solid() {
        assert_eq!(
            border_style_token(&BorderStyle::from("groove")),
            Some("border-solid")
        );
        assert_eq!(border_style_token(&BorderStyle::Dotted), Some("border-dotted"));
        assert_eq!(border_style_token(&BorderStyle::None), None);
    }

    #[test]
    fn test_flex_tokens_only_when_flex() {
        let mut element = div();
        element.justify_content = "between".to_string();
        element.flex_direction = "col".to_string();
        let block = StyleCompiler::new().compile(&element);
        assert!(!block.has_token("justify-between"));
        assert!(block.residual_value("gap").is_none());

        element.display = Display::Flex;
        let flex = StyleCompiler::new().compile(&element);
        assert_eq!(
            &flex.class_tokens[..7],
            [
                "flex",
                "absolute",
                "border-solid",
                "flex-col",
                "flex-nowrap",
                "justify-between",
                "items-stretch"
            ]
        );
        assert_eq!(flex.residual_value("gap"), Some("0px"));
    }

    #[test]
    fn test_font_weight_buckets() {
        for (weight, token) in [
            (100, "font-thin"),
            (200, "font-extralight"),
            (300, "font-light"),
            (500, "font-medium"),
            (600, "font-semibold"),
            (700, "font-bold"),
            (800, "font-extrabold"),
            (900, "font-black"),
        ] {
            assert_eq!(font_weight_token(weight), Some(token));
        }
    }

    #[test]
    fn test_font_weight_outside_buckets_is_dropped() {
        for weight in [400, 450, 550, 0, 1000] {
            let mut element = div();
            element.font_weight = weight;
            let compiled = StyleCompiler::new().compile(&element);
            assert!(
                !compiled.class_tokens.iter().any(|t| t.starts_with("font-")),
                "weight {weight} should emit no token"
            );
            assert!(compiled.residual_value("font-weight").is_none());
        }
    }

    #[test]
    fn test_border_radius_buckets() {
        let cases = [
            (0.0, None),
            (1.0, Some("rounded-sm")),
            (2.0, Some("rounded-sm")),
            (3.0, Some("rounded")),
            (4.0, Some("rounded")),
            (6.0, Some("rounded-md")),
            (7.0, Some("rounded-lg")),
            (8.0, Some("rounded-lg")),
            (12.0, Some("rounded-xl")),
            (12.5, Some("rounded-2xl")),
            (40.0, Some("rounded-2xl")),
        ];
        for (radius, token) in cases {
            assert_eq!(border_radius_token(radius), token, "radius {radius}");
        }
    }

    #[test]
    fn test_radius_patch_lands_in_lg_bucket() {
        let mut store = ElementStore::new();
        let element = store.create(ElementKind::Card, 0.0, 0.0);
        let id = element.id.clone();
        store.add(element).expect("add");
        store
            .update(&id, &ElementPatch::new().set("borderRadius", 7))
            .expect("update");

        let compiled = StyleCompiler::new().compile(store.get(&id).expect("exists"));
        assert!(compiled.has_token("rounded-lg"));
    }

    #[test]
    fn test_circle_is_always_fully_rounded() {
        let mut circle = Element::new(ElementKind::Circle);
        circle.border_radius = 3.0;
        let compiled = StyleCompiler::new().compile(&circle);
        assert!(compiled.has_token("rounded-full"));
        assert!(!compiled.has_token("rounded"));
        assert_eq!(compiled.residual_value("border-radius"), Some("50%"));
    }

    #[test]
    fn test_border_width_token_and_residual() {
        for (width, token) in [(1.0, Some("border")), (2.0, Some("border-2")), (3.0, None)] {
            let mut element = div();
            element.border_width = width;
            let compiled = StyleCompiler::new().compile(&element);
            assert_eq!(border_width_token(width), token);
            assert_eq!(compiled.residual_value("border-width"), Some(px(width).as_str()));
        }
    }

    #[test]
    fn test_residual_values() {
        let mut element = div().with_position(40.0, 60.0);
        element.opacity = 45;
        element.angle = -15.0;
        element.padding_top = Some(2.0);
        let compiled = StyleCompiler::new().compile(&element);

        assert_eq!(compiled.residual_value("left"), Some("40px"));
        assert_eq!(compiled.residual_value("top"), Some("60px"));
        assert_eq!(compiled.residual_value("padding-top"), Some("2px"));
        assert_eq!(compiled.residual_value("padding-left"), Some("8px"));
        assert_eq!(compiled.residual_value("opacity"), Some("0.45"));
        assert_eq!(compiled.residual_value("transform"), Some("rotate(-15deg)"));
        assert_eq!(compiled.residual_value("line-height"), Some("1.5"));
        assert!(compiled.residual_value("float").is_none());
        assert!(compiled.residual_value("min-width").is_none());
    }

    #[test]
    fn test_style_attr_format() {
        let compiled = StyleCompiler::new().compile(&div());
        assert!(compiled
            .style_attr()
            .starts_with("left: 0px; top: 0px; width: 200px; height: 150px;"));
    }

    #[test]
    fn test_animation_token_and_timing() {
        let mut element = div();
        element.animation.kind = AnimationKind::Spin;
        element.animation.looping = true;
        let compiled = StyleCompiler::new().compile(&element);
        assert_eq!(compiled.class_tokens.last().map(String::as_str), Some("animate-spin"));
        assert_eq!(
            compiled.residual_value("animation-iteration-count"),
            Some("infinite")
        );
    }

    #[test]
    fn test_unrecognized_animation_emits_nothing() {
        let mut element = div();
        element.animation.kind = AnimationKind::from("wiggle");
        element.animation.looping = true;
        let compiled = StyleCompiler::new().compile(&element);
        assert!(compiled.class_tokens.iter().all(|t| !t.starts_with("animate-")));
        assert_eq!(compiled.residual_value("animation-duration"), None);
        assert_eq!(compiled.residual_value("animation-iteration-count"), None);
    }

    #[test]
    fn test_compile_is_pure() {
        let compiler = StyleCompiler::new();
        let mut element = Element::new(ElementKind::Hero);
        element.shadow = "2xl".to_string();
        let first = compiler.compile(&element);
        let second = compiler.compile(&element);
        assert_eq!(first, second);
    }
}
