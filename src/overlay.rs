//! Overlay frame construction.
//!
//! Builds a complete, host-agnostic description of everything drawn on top
//! of the image: region rectangles in screen space, their labels, the
//! in-progress draw preview, and the side-panel listing. Rendering is a pure
//! function of the store, the viewport, and the preview; each call produces
//! a full replacement frame, never an incremental patch.

use crate::geometry::BBox;
use crate::model::ComponentType;
use crate::store::RegionStore;
use crate::viewport::Viewport;

use crate::constants::overlay::LABEL_OFFSET;

/// One region rectangle, in screen coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayRect {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
    pub selected: bool,
}

/// A text label anchored just above its region.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayLabel {
    pub id: String,
    pub text: String,
    pub x: f64,
    pub y: f64,
}

/// One row of the component side panel.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelEntry {
    pub id: String,
    pub name: String,
    pub kind: ComponentType,
    pub selected: bool,
}

/// A full overlay frame. Replaces the previous frame wholesale.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OverlayFrame {
    /// Region rectangles in render order (store order; z_index is carried
    /// by the store, not re-sorted here).
    pub rects: Vec<OverlayRect>,
    /// Labels for the rectangles, same order.
    pub labels: Vec<OverlayLabel>,
    /// In-progress draw rectangle, if a draw gesture is active.
    pub preview: Option<OverlayRect>,
    /// Side-panel rows, one per component, store order.
    pub panel: Vec<PanelEntry>,
}

/// Build the overlay frame for the current state.
///
/// Pure and idempotent: the same store, viewport, and preview always produce
/// an equal frame.
pub fn render(store: &RegionStore, viewport: &Viewport, preview: Option<BBox>) -> OverlayFrame {
    let mut frame = OverlayFrame::default();

    for component in store.list() {
        let selected = store.selected() == Some(component.id.as_str());
        let rect = screen_rect(
            component.id.clone(),
            component.bbox,
            viewport,
            selected,
        );
        frame.labels.push(OverlayLabel {
            id: component.id.clone(),
            text: component.label().to_string(),
            x: rect.x,
            y: rect.y - LABEL_OFFSET,
        });
        frame.rects.push(rect);
        frame.panel.push(PanelEntry {
            id: component.id.clone(),
            name: component.name.clone(),
            kind: component.kind.clone(),
            selected,
        });
    }

    frame.preview =
        preview.map(|bbox| screen_rect(String::new(), bbox, viewport, false));

    frame
}

fn screen_rect(id: String, bbox: BBox, viewport: &Viewport, selected: bool) -> OverlayRect {
    let origin = viewport.world_to_screen(crate::geometry::Point::new(
        f64::from(bbox.x),
        f64::from(bbox.y),
    ));
    OverlayRect {
        id,
        x: origin.x,
        y: origin.y,
        w: f64::from(bbox.w) * viewport.scale,
        h: f64::from(bbox.h) * viewport.scale,
        selected,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;

    fn store_with_two() -> RegionStore {
        let mut store = RegionStore::new();
        store.add(BBox::new(10, 10, 100, 50), None);
        store.add(BBox::new(200, 100, 40, 40), None);
        store
    }

    #[test]
    fn test_render_is_idempotent() {
        let store = store_with_two();
        let viewport = Viewport::default();
        let a = render(&store, &viewport, None);
        let b = render(&store, &viewport, None);
        assert_eq!(a, b);
    }

    #[test]
    fn test_render_is_full_replacement() {
        let mut store = store_with_two();
        let viewport = Viewport::default();
        let before = render(&store, &viewport, None);
        assert_eq!(before.rects.len(), 2);
        assert_eq!(before.panel.len(), 2);

        let first = store.list()[0].id.clone();
        store.remove(&first);
        let after = render(&store, &viewport, None);
        // No stale entries linger from the previous frame.
        assert_eq!(after.rects.len(), 1);
        assert_eq!(after.labels.len(), 1);
        assert_eq!(after.panel.len(), 1);
        assert_ne!(after.rects[0].id, first);
    }

    #[test]
    fn test_rects_follow_viewport_transform() {
        let store = store_with_two();
        let mut viewport = Viewport::default();
        viewport.zoom_at(Point::new(0.0, 0.0), 2.0);
        viewport.pan(5.0, 7.0);

        let frame = render(&store, &viewport, None);
        let rect = &frame.rects[0]; // bbox (10, 10, 100, 50)
        assert!((rect.x - 25.0).abs() < 1e-9);
        assert!((rect.y - 27.0).abs() < 1e-9);
        assert!((rect.w - 200.0).abs() < 1e-9);
        assert!((rect.h - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_labels_anchor_above_rects() {
        let store = store_with_two();
        let viewport = Viewport::default();
        let frame = render(&store, &viewport, None);
        for (rect, label) in frame.rects.iter().zip(&frame.labels) {
            assert_eq!(rect.id, label.id);
            assert!((label.y - (rect.y - LABEL_OFFSET)).abs() < 1e-9);
        }
        // Default labels fall back to the id.
        assert_eq!(frame.labels[0].text, frame.labels[0].id);
    }

    #[test]
    fn test_selection_marks_rect_and_panel() {
        let mut store = store_with_two();
        let second = store.list()[1].id.clone();
        store.select(Some(&second));
        let frame = render(&store, &Viewport::default(), None);
        assert!(!frame.rects[0].selected);
        assert!(frame.rects[1].selected);
        assert!(!frame.panel[0].selected);
        assert!(frame.panel[1].selected);
    }

    #[test]
    fn test_preview_rendered_when_present() {
        let store = RegionStore::new();
        let viewport = Viewport::default();
        let frame = render(&store, &viewport, Some(BBox::new(5, 5, 20, 20)));
        let preview = frame.preview.unwrap();
        assert!((preview.x - 5.0).abs() < 1e-9);
        assert!((preview.w - 20.0).abs() < 1e-9);
        assert!(!preview.selected);

        let frame = render(&store, &viewport, None);
        assert!(frame.preview.is_none());
    }
}
