//! The annotated component: one rectangular region with metadata.

use serde::{Deserialize, Serialize};

use crate::analysis::RegionAnalysis;
use crate::geometry::BBox;
use crate::model::Style;

/// Kind of UI element a region is annotated as.
///
/// This is an open enumeration: unrecognized strings round-trip through
/// `Other` rather than failing to parse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ComponentType {
    Unknown,
    Text,
    Image,
    Button,
    Container,
    Other(String),
}

impl Default for ComponentType {
    fn default() -> Self {
        ComponentType::Unknown
    }
}

impl ComponentType {
    /// The serialized (lowercase) name of this type.
    pub fn as_str(&self) -> &str {
        match self {
            ComponentType::Unknown => "unknown",
            ComponentType::Text => "text",
            ComponentType::Image => "image",
            ComponentType::Button => "button",
            ComponentType::Container => "container",
            ComponentType::Other(s) => s,
        }
    }
}

impl From<String> for ComponentType {
    fn from(s: String) -> Self {
        match s.as_str() {
            "unknown" | "" => ComponentType::Unknown,
            "text" => ComponentType::Text,
            "image" => ComponentType::Image,
            "button" => ComponentType::Button,
            "container" => ComponentType::Container,
            _ => ComponentType::Other(s),
        }
    }
}

impl From<ComponentType> for String {
    fn from(t: ComponentType) -> Self {
        t.as_str().to_string()
    }
}

/// A single annotated region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    /// Unique identifier, stable for the component's lifetime. Never reused.
    pub id: String,
    /// Free-text label, default empty.
    #[serde(default)]
    pub name: String,
    /// Kind of element annotated.
    #[serde(rename = "type", default)]
    pub kind: ComponentType,
    /// Region in image-pixel coordinates.
    pub bbox: BBox,
    /// Last computed color analysis, or None before first analysis.
    #[serde(default)]
    pub analysis: Option<RegionAnalysis>,
    /// Free-form style payload.
    #[serde(default)]
    pub style: Style,
    /// Nested components. Always empty at authoring time; preserved on
    /// round-trip only.
    #[serde(default)]
    pub children: Vec<Component>,
    /// Rendering order, defaults to insertion index.
    pub z_index: u32,
}

impl Component {
    /// Create a new component for a freshly drawn region.
    pub fn new(id: String, bbox: BBox, analysis: Option<RegionAnalysis>, z_index: u32) -> Self {
        Self {
            id,
            name: String::new(),
            kind: ComponentType::Unknown,
            bbox,
            analysis,
            style: Style::default(),
            children: Vec::new(),
            z_index,
        }
    }

    /// Label shown in the overlay: the name when set, the id otherwise.
    pub fn label(&self) -> &str {
        if self.name.is_empty() {
            &self.id
        } else {
            &self.name
        }
    }
}

/// Partial update merged into a component by [`RegionStore::update`].
///
/// The id is never patched.
///
/// [`RegionStore::update`]: crate::store::RegionStore::update
#[derive(Debug, Clone, Default)]
pub struct ComponentPatch {
    pub name: Option<String>,
    pub kind: Option<ComponentType>,
    pub bbox: Option<BBox>,
    pub style: Option<Style>,
}

impl ComponentPatch {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn kind(mut self, kind: ComponentType) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn bbox(mut self, bbox: BBox) -> Self {
        self.bbox = Some(bbox);
        self
    }

    pub fn style(mut self, style: Style) -> Self {
        self.style = Some(style);
        self
    }
}
