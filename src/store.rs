//! Component storage and selection.
//!
//! The store exclusively owns the ordered component list. Ids are generated
//! from a monotonic counter and never reused, even across remove/add cycles
//! or document imports.

use crate::analysis::RegionAnalysis;
use crate::geometry::{BBox, Point};
use crate::model::{Component, ComponentPatch};

/// Storage for the annotated components of one image.
#[derive(Debug, Clone, Default)]
pub struct RegionStore {
    /// Components in author-visible (insertion) order.
    components: Vec<Component>,
    /// Currently selected component id.
    selected: Option<String>,
    /// Counter for generating unique component ids.
    next_id: u64,
    /// Set when components or selection change.
    /// Used to avoid rebuilding the overlay when nothing moved.
    dirty: bool,
}

impl RegionStore {
    pub fn new() -> Self {
        Self {
            components: Vec::new(),
            selected: None,
            next_id: 1,
            dirty: true, // Start dirty so the first overlay build happens
        }
    }

    /// Rebuild a store from imported components.
    ///
    /// Order and z_index are preserved verbatim. The id counter is advanced
    /// past the largest numeric id so future components never collide.
    pub fn from_components(components: Vec<Component>) -> Self {
        let max_numeric = components
            .iter()
            .filter_map(|c| c.id.strip_prefix('c').and_then(|n| n.parse::<u64>().ok()))
            .max()
            .unwrap_or(0);
        Self {
            next_id: max_numeric.max(components.len() as u64) + 1,
            components,
            selected: None,
            dirty: true,
        }
    }

    /// Check if the store has been modified since last `clear_dirty()`.
    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Clear the dirty flag. Call after rebuilding the overlay.
    #[inline]
    pub fn clear_dirty(&mut self) {
        self.dirty = false;
    }

    /// Mark the store as dirty.
    #[inline]
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Add a component and return its id. The new component is appended
    /// with `z_index` = current length and becomes the selection.
    pub fn add(&mut self, bbox: BBox, analysis: Option<RegionAnalysis>) -> String {
        let id = format!("c{}", self.next_id);
        self.next_id += 1;
        let z_index = self.components.len() as u32;
        self.components
            .push(Component::new(id.clone(), bbox, analysis, z_index));
        self.selected = Some(id.clone());
        self.mark_dirty();
        log::debug!("✅ Added component {} at {:?}", id, bbox);
        id
    }

    /// Remove a component by id. Clears the selection if it pointed at it.
    pub fn remove(&mut self, id: &str) -> Option<Component> {
        let idx = self.components.iter().position(|c| c.id == id)?;
        let removed = self.components.remove(idx);
        if self.selected.as_deref() == Some(id) {
            self.selected = None;
        }
        self.mark_dirty();
        log::debug!("🗑️ Removed component {}", id);
        Some(removed)
    }

    /// Merge a patch into a component. The id is never mutated.
    pub fn update(&mut self, id: &str, patch: ComponentPatch) -> bool {
        let Some(component) = self.components.iter_mut().find(|c| c.id == id) else {
            return false;
        };
        if let Some(name) = patch.name {
            component.name = name;
        }
        if let Some(kind) = patch.kind {
            component.kind = kind;
        }
        if let Some(bbox) = patch.bbox {
            component.bbox = bbox;
        }
        if let Some(style) = patch.style {
            component.style = style;
        }
        self.mark_dirty();
        true
    }

    /// Replace a component's bbox (already clamped by the caller).
    pub fn move_bbox(&mut self, id: &str, bbox: BBox) -> bool {
        let Some(component) = self.components.iter_mut().find(|c| c.id == id) else {
            return false;
        };
        if component.bbox != bbox {
            component.bbox = bbox;
            self.mark_dirty();
        }
        true
    }

    /// Store a freshly computed analysis for a component.
    ///
    /// Callers pass the analyzer output directly; a `None` result keeps the
    /// prior analysis rather than clearing it.
    pub fn set_analysis(&mut self, id: &str, analysis: Option<RegionAnalysis>) {
        if let Some(fresh) = analysis {
            if let Some(component) = self.components.iter_mut().find(|c| c.id == id) {
                component.analysis = Some(fresh);
                self.mark_dirty();
            }
        }
    }

    /// Select a component. Selecting an unknown id results in nothing
    /// selected, not an error.
    pub fn select(&mut self, id: Option<&str>) {
        let next = id
            .filter(|id| self.components.iter().any(|c| c.id == *id))
            .map(str::to_string);
        if self.selected != next {
            self.selected = next;
            self.mark_dirty();
        }
    }

    /// The selected component id, if any.
    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// All components in author-visible order.
    pub fn list(&self) -> &[Component] {
        &self.components
    }

    /// Find a component by id.
    pub fn find(&self, id: &str) -> Option<&Component> {
        self.components.iter().find(|c| c.id == id)
    }

    /// Mutable lookup. Marks the store dirty; callers must not change the id.
    pub fn find_mut(&mut self, id: &str) -> Option<&mut Component> {
        let found = self.components.iter_mut().find(|c| c.id == id);
        if found.is_some() {
            self.dirty = true;
        }
        found
    }

    /// Find the topmost component at a world-space point.
    ///
    /// Highest z_index wins; insertion order breaks ties.
    pub fn hit_test(&self, point: Point) -> Option<&str> {
        self.components
            .iter()
            .enumerate()
            .filter(|(_, c)| c.bbox.contains(point))
            .max_by_key(|&(idx, c)| (c.z_index, idx))
            .map(|(_, c)| c.id.as_str())
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Remove all components and clear the selection.
    pub fn clear(&mut self) {
        if !self.components.is_empty() || self.selected.is_some() {
            self.mark_dirty();
        }
        self.components.clear();
        self.selected = None;
    }
}
