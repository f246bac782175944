//! Free-form style payload attached to a component.
//!
//! Purely descriptive: every field is optional and no invariants hold
//! beyond type-correctness. Defaults (background/foreground colors from
//! the region analysis) are resolved at serialization time, not here, so
//! partially-specified components remain valid.

use serde::{Deserialize, Serialize};

/// Nested style record for one component.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Style {
    pub position: Option<String>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub opacity: Option<f64>,
    #[serde(default)]
    pub background: BackgroundStyle,
    #[serde(default)]
    pub border: BorderStyle,
    #[serde(default)]
    pub shadow: ShadowStyle,
    #[serde(default)]
    pub typography: TypographyStyle,
    #[serde(default)]
    pub layout: LayoutStyle,
    #[serde(default)]
    pub image: ImageStyle,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BackgroundStyle {
    pub color: Option<String>,
    pub gradient: Option<String>,
    pub image: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BorderStyle {
    pub color: Option<String>,
    pub width: Option<f64>,
    pub radius: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShadowStyle {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub blur: Option<f64>,
    pub spread: Option<f64>,
    pub color: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TypographyStyle {
    pub text: Option<String>,
    pub color: Option<String>,
    pub font_family: Option<String>,
    pub font_size: Option<f64>,
    pub font_weight: Option<u32>,
    pub line_height: Option<f64>,
    pub letter_spacing: Option<f64>,
    pub align: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LayoutStyle {
    pub display: Option<String>,
    pub flex_direction: Option<String>,
    pub justify_content: Option<String>,
    pub align_items: Option<String>,
    pub gap: Option<f64>,
    pub padding: Option<String>,
    pub margin: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageStyle {
    pub src: Option<String>,
    pub fit: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_style_roundtrip() {
        let style = Style::default();
        let json = serde_json::to_string(&style).unwrap();
        let loaded: Style = serde_json::from_str(&json).unwrap();
        assert_eq!(style, loaded);
    }

    #[test]
    fn test_partial_style_deserializes() {
        // Missing nested records fall back to defaults.
        let json = r#"{"position":"absolute","width":120.0,"height":null,"opacity":null}"#;
        let style: Style = serde_json::from_str(json).unwrap();
        assert_eq!(style.position.as_deref(), Some("absolute"));
        assert_eq!(style.width, Some(120.0));
        assert_eq!(style.background, BackgroundStyle::default());
        assert_eq!(style.typography, TypographyStyle::default());
    }
}
