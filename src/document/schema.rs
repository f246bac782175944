//! The versioned on-disk document format.
//!
//! A document captures one image plus its annotated components. Export
//! resolves style defaults from each component's analysis and recomputes the
//! normalized bbox, both deterministically, so export -> import -> export
//! yields byte-identical JSON.

use serde::{Deserialize, Serialize};

use crate::analysis::{RegionAnalysis, round6};
use crate::document::error::{DocumentError, Result};
use crate::geometry::BBox;
use crate::model::{Component, Style};
use crate::store::RegionStore;

/// Current document schema identifier. Bump the suffix on breaking changes.
pub const SCHEMA: &str = "ravt-document/1";

/// Metadata about the annotated image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageMeta {
    /// Display name (usually the file name).
    pub name: String,
    /// Origin of the image (path or URL); empty when unknown. Always a
    /// string on the wire, never null.
    #[serde(default)]
    pub source: String,
    pub width: u32,
    pub height: u32,
}

/// Bbox normalized to the image dimensions, each field in [0, 1].
///
/// Always recomputed from the pixel bbox on export; the pixel bbox is
/// authoritative on import.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormBBox {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl NormBBox {
    fn from_bbox(bbox: BBox, image_w: u32, image_h: u32) -> Self {
        let norm = |v: u32, extent: u32| {
            if extent == 0 {
                0.0
            } else {
                round6((f64::from(v) / f64::from(extent)).clamp(0.0, 1.0))
            }
        };
        Self {
            x: norm(bbox.x, image_w),
            y: norm(bbox.y, image_h),
            w: norm(bbox.w, image_w),
            h: norm(bbox.h, image_h),
        }
    }
}

/// One serialized component. Field order is part of the format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentEntry {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: crate::model::ComponentType,
    pub bbox: BBox,
    pub bbox_norm: NormBBox,
    pub z_index: u32,
    pub style: Style,
    pub analysis: Option<RegionAnalysis>,
    pub children: Vec<ComponentEntry>,
}

/// A complete annotation document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub schema: String,
    pub image: ImageMeta,
    pub components: Vec<ComponentEntry>,
}

impl Document {
    /// Build a document from the current store.
    ///
    /// Style defaults are resolved from the analysis here (background color
    /// from the suggested background, text color from the suggested
    /// foreground) and only when the author left them unset, so a second
    /// export of an imported document changes nothing.
    pub fn from_store(store: &RegionStore, image: ImageMeta) -> Self {
        let components = store
            .list()
            .iter()
            .map(|c| ComponentEntry::from_component(c, image.width, image.height))
            .collect();
        Self {
            schema: SCHEMA.to_string(),
            image,
            components,
        }
    }

    /// Validate the schema and rebuild the component store.
    ///
    /// Returns the image metadata and a store with order, ids, z_index, and
    /// children preserved verbatim.
    pub fn into_store(self) -> Result<(ImageMeta, RegionStore)> {
        if self.schema != SCHEMA {
            return Err(DocumentError::SchemaMismatch {
                expected: SCHEMA.to_string(),
                found: self.schema,
            });
        }
        let components = self
            .components
            .into_iter()
            .map(ComponentEntry::into_component)
            .collect();
        Ok((self.image, RegionStore::from_components(components)))
    }

    /// Serialize to the canonical JSON text (pretty, two-space indent).
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse a document from JSON text. The schema is not validated here;
    /// [`Document::into_store`] does that.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Write the document to a file.
    pub fn save_to_file(&self, path: &std::path::Path) -> Result<()> {
        let json = self.to_json()?;
        std::fs::write(path, json)?;
        log::info!("💾 Saved document to {}", path.display());
        Ok(())
    }

    /// Read a document from a file.
    pub fn load_from_file(path: &std::path::Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        log::info!("📂 Loaded document from {}", path.display());
        Self::from_json(&json)
    }
}

impl ComponentEntry {
    fn from_component(component: &Component, image_w: u32, image_h: u32) -> Self {
        let mut style = component.style.clone();
        if let Some(analysis) = &component.analysis {
            if style.background.color.is_none() {
                style.background.color = Some(analysis.suggested_bg_color.clone());
            }
            if style.typography.color.is_none() {
                style.typography.color = Some(analysis.suggested_fg_color.clone());
            }
        }
        Self {
            id: component.id.clone(),
            name: component.name.clone(),
            kind: component.kind.clone(),
            bbox: component.bbox,
            bbox_norm: NormBBox::from_bbox(component.bbox, image_w, image_h),
            z_index: component.z_index,
            style,
            analysis: component.analysis.clone(),
            children: component
                .children
                .iter()
                .map(|c| ComponentEntry::from_component(c, image_w, image_h))
                .collect(),
        }
    }

    fn into_component(self) -> Component {
        Component {
            id: self.id,
            name: self.name,
            kind: self.kind,
            bbox: self.bbox,
            analysis: self.analysis,
            style: self.style,
            children: self
                .children
                .into_iter()
                .map(ComponentEntry::into_component)
                .collect(),
            z_index: self.z_index,
        }
    }
}
