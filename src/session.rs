//! One annotation session: image + store + viewport + interaction.
//!
//! The session owns the whole mutable state for a single image and forwards
//! host events into the interaction controller. External I/O (save, upload,
//! clipboard) goes through the `remote` traits; failures become a transient
//! status message and never leave the session in a half-mutated state.

use crate::controller::{InteractionController, Key, PointerId};
use crate::document::{Document, error::Result as DocumentResult};
use crate::geometry::Point;
use crate::loader::LoadedImage;
use crate::overlay::{self, OverlayFrame};
use crate::remote::{Clipboard, SaveEndpoint, UploadEndpoint};
use crate::store::RegionStore;
use crate::viewport::Viewport;

/// Application state for annotating one image.
#[derive(Debug)]
pub struct Session {
    image: LoadedImage,
    pub store: RegionStore,
    pub viewport: Viewport,
    pub controller: InteractionController,
    status_message: Option<String>,
}

impl Session {
    /// Start a fresh session over a decoded image.
    pub fn new(image: LoadedImage) -> Self {
        log::info!(
            "🎨 New session: {} ({}x{})",
            image.name,
            image.width,
            image.height
        );
        Self {
            image,
            store: RegionStore::new(),
            viewport: Viewport::default(),
            controller: InteractionController::new(),
            status_message: None,
        }
    }

    /// Resume a session from an imported document.
    ///
    /// The document's schema is validated; its components replace the store
    /// wholesale. The decoded image stays authoritative for dimensions.
    pub fn from_document(image: LoadedImage, document: Document) -> DocumentResult<Self> {
        let (meta, store) = document.into_store()?;
        if meta.width != image.width || meta.height != image.height {
            log::warn!(
                "⚠️ Document was annotated at {}x{}, image is {}x{}",
                meta.width,
                meta.height,
                image.width,
                image.height
            );
        }
        let mut session = Self::new(image);
        session.store = store;
        Ok(session)
    }

    pub fn image(&self) -> &LoadedImage {
        &self.image
    }

    /// The transient status line, if one is pending.
    pub fn status(&self) -> Option<&str> {
        self.status_message.as_deref()
    }

    /// Take (and clear) the pending status line.
    pub fn take_status(&mut self) -> Option<String> {
        self.status_message.take()
    }

    fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    /// Fit the image into a viewport of the given size and center it.
    pub fn fit_view(&mut self, viewport_w: f64, viewport_h: f64) {
        self.viewport
            .fit_to_viewport(viewport_w, viewport_h, self.image.width, self.image.height);
    }

    // Event forwarding. The pixel buffer borrows the image while the
    // controller mutates the store and viewport; the fields are disjoint.

    pub fn pointer_down(&mut self, pointer: PointerId, screen: Point) {
        self.controller
            .pointer_down(pointer, screen, &self.viewport, &mut self.store);
    }

    pub fn pointer_move(&mut self, pointer: PointerId, screen: Point) -> bool {
        let pixels = self.image.pixels();
        self.controller.pointer_move(
            pointer,
            screen,
            &mut self.viewport,
            &mut self.store,
            &pixels,
        )
    }

    pub fn pointer_up(&mut self, pointer: PointerId, screen: Point) {
        let pixels = self.image.pixels();
        self.controller
            .pointer_up(pointer, screen, &self.viewport, &mut self.store, &pixels);
    }

    pub fn pointer_cancel(&mut self, pointer: PointerId) {
        self.controller.pointer_cancel(pointer);
    }

    pub fn wheel(&mut self, screen: Point, delta_y: f64) {
        self.controller.wheel(screen, delta_y, &mut self.viewport);
    }

    pub fn key_down(&mut self, key: Key) -> bool {
        self.controller.key_down(key, &mut self.store)
    }

    pub fn key_up(&mut self, key: Key) {
        self.controller.key_up(key);
    }

    /// Build the overlay frame for the current state and clear the store's
    /// dirty flag.
    pub fn render_overlay(&mut self) -> OverlayFrame {
        let preview = self
            .controller
            .draw_preview(self.image.width, self.image.height);
        let frame = overlay::render(&self.store, &self.viewport, preview);
        self.store.clear_dirty();
        frame
    }

    /// The current state as an export document.
    pub fn document(&self) -> Document {
        Document::from_store(&self.store, self.image.meta())
    }

    /// The current state as canonical JSON.
    pub fn export_json(&self) -> DocumentResult<String> {
        self.document().to_json()
    }

    /// Push the document to a save endpoint. Failures become a status
    /// message; the store is untouched either way.
    pub fn save_document(&mut self, endpoint: &mut dyn SaveEndpoint) {
        let json = match self.export_json() {
            Ok(json) => json,
            Err(e) => {
                log::error!("Failed to serialize document: {e}");
                self.set_status(format!("Export failed: {e}"));
                return;
            }
        };
        let name = self.image.name.clone();
        match endpoint.save_document(&name, &json) {
            Ok(()) => {
                log::info!("💾 Document saved remotely");
                self.set_status("Document saved");
            }
            Err(e) => {
                log::warn!("Save failed: {e}");
                self.set_status(format!("Save failed: {e} (retry when ready)"));
            }
        }
    }

    /// Copy the document JSON to the host clipboard. A missing or failing
    /// clipboard degrades to a "copy manually" hint.
    pub fn copy_json(&mut self, clipboard: &mut dyn Clipboard) {
        let json = match self.export_json() {
            Ok(json) => json,
            Err(e) => {
                log::error!("Failed to serialize document: {e}");
                self.set_status(format!("Export failed: {e}"));
                return;
            }
        };
        match clipboard.copy_text(&json) {
            Ok(()) => self.set_status("Document copied to clipboard"),
            Err(e) => {
                log::warn!("Clipboard failed: {e}");
                self.set_status("Clipboard unavailable, copy the JSON manually");
            }
        }
    }

    /// Upload the image to the host and record the assigned source.
    pub fn upload_image(&mut self, endpoint: &mut dyn UploadEndpoint) {
        let name = self.image.name.clone();
        match endpoint.upload_image(&name, &self.image.rgba) {
            Ok(source) => {
                log::info!("📤 Image uploaded as {source}");
                self.image.source = Some(source);
                self.set_status("Image uploaded");
            }
            Err(e) => {
                log::warn!("Upload failed: {e}");
                self.set_status(format!("Upload failed: {e} (retry when ready)"));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::BBox;
    use crate::remote::RemoteError;

    fn red_session(w: u32, h: u32) -> Session {
        let rgba = vec![255u8, 0, 0, 255]
            .into_iter()
            .cycle()
            .take(w as usize * h as usize * 4)
            .collect();
        Session::new(LoadedImage {
            name: "red.png".to_string(),
            source: None,
            width: w,
            height: h,
            rgba,
        })
    }

    fn drag(session: &mut Session, from: (f64, f64), to: (f64, f64)) {
        session.pointer_down(1, Point::new(from.0, from.1));
        session.pointer_move(1, Point::new(to.0, to.1));
        session.pointer_up(1, Point::new(to.0, to.1));
    }

    struct RecordingSave {
        saved: Vec<(String, String)>,
        fail: bool,
    }

    impl SaveEndpoint for RecordingSave {
        fn save_document(&mut self, name: &str, json: &str) -> Result<(), RemoteError> {
            if self.fail {
                return Err(RemoteError::Endpoint {
                    status: 503,
                    message: "unavailable".to_string(),
                });
            }
            self.saved.push((name.to_string(), json.to_string()));
            Ok(())
        }
    }

    struct NoClipboard;

    impl Clipboard for NoClipboard {
        fn copy_text(&mut self, _text: &str) -> Result<(), RemoteError> {
            Err(RemoteError::ClipboardUnavailable)
        }
    }

    #[test]
    fn test_drag_creates_component_end_to_end() {
        let mut session = red_session(800, 600);
        drag(&mut session, (10.0, 10.0), (110.0, 60.0));
        assert_eq!(session.store.len(), 1);
        assert_eq!(session.store.list()[0].bbox, BBox::new(10, 10, 100, 50));

        let frame = session.render_overlay();
        assert_eq!(frame.rects.len(), 1);
        assert!(!session.store.is_dirty());
    }

    #[test]
    fn test_save_failure_sets_status_and_keeps_store() {
        let mut session = red_session(100, 100);
        drag(&mut session, (0.0, 0.0), (50.0, 50.0));
        let mut endpoint = RecordingSave {
            saved: Vec::new(),
            fail: true,
        };
        session.save_document(&mut endpoint);
        assert!(session.status().unwrap().contains("Save failed"));
        assert_eq!(session.store.len(), 1);

        endpoint.fail = false;
        session.save_document(&mut endpoint);
        assert_eq!(session.take_status().as_deref(), Some("Document saved"));
        assert_eq!(endpoint.saved.len(), 1);
        assert_eq!(endpoint.saved[0].0, "red.png");
    }

    #[test]
    fn test_clipboard_failure_degrades_to_hint() {
        let mut session = red_session(100, 100);
        session.copy_json(&mut NoClipboard);
        assert_eq!(
            session.status(),
            Some("Clipboard unavailable, copy the JSON manually")
        );
        // The session keeps working afterwards.
        drag(&mut session, (0.0, 0.0), (20.0, 20.0));
        assert_eq!(session.store.len(), 1);
    }

    #[test]
    fn test_from_document_roundtrip() {
        let mut session = red_session(200, 200);
        drag(&mut session, (10.0, 10.0), (60.0, 60.0));
        let doc = session.document();

        let resumed = Session::from_document(
            LoadedImage {
                name: "red.png".to_string(),
                source: None,
                width: 200,
                height: 200,
                rgba: session.image().rgba.clone(),
            },
            doc,
        )
        .unwrap();
        assert_eq!(resumed.store.len(), 1);
        assert_eq!(resumed.store.list()[0].bbox, BBox::new(10, 10, 50, 50));
    }
}
