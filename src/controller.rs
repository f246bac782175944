//! Pointer/keyboard interaction state machine.
//!
//! Translates pointer events into viewport and store mutations:
//! `idle -> {pan, draw, move} -> idle`. Exactly one pointer is tracked at a
//! time; pointer-downs while an interaction is active are ignored until the
//! first pointer releases or cancels. Wheel zoom is orthogonal to the
//! click-drag machine and works in any state.

use crate::analysis::{self, PixelBuffer};
use crate::constants::{analysis as analysis_const, draw, zoom};
use crate::geometry::{BBox, Point};
use crate::store::RegionStore;
use crate::viewport::Viewport;

/// Identifier of a pointer device/contact, as reported by the host.
pub type PointerId = u64;

/// Keyboard keys the controller reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Delete,
    Backspace,
    /// The designated pan modifier (held to make drags pan the viewport).
    PanModifier,
}

/// The active interaction, if any.
///
/// Ephemeral per-gesture fields live inside the variants, so an anchor or
/// pre-drag bbox cannot exist outside the state that uses it.
#[derive(Debug, Clone, PartialEq)]
pub enum Interaction {
    Idle,
    /// Screen-space viewport drag.
    Pan { pointer: PointerId, last: Point },
    /// Growing a new rectangle between `anchor` and `current` (world space).
    Draw {
        pointer: PointerId,
        anchor: Point,
        current: Point,
    },
    /// Dragging an existing component by a world-space delta.
    Move {
        pointer: PointerId,
        id: String,
        start_bbox: BBox,
        anchor: Point,
    },
}

impl Interaction {
    fn pointer(&self) -> Option<PointerId> {
        match self {
            Interaction::Idle => None,
            Interaction::Pan { pointer, .. }
            | Interaction::Draw { pointer, .. }
            | Interaction::Move { pointer, .. } => Some(*pointer),
        }
    }
}

/// Finite-state machine over pointer and keyboard input.
#[derive(Debug, Clone, Default)]
pub struct InteractionController {
    interaction: Interaction,
    pan_key: bool,
}

impl Default for Interaction {
    fn default() -> Self {
        Interaction::Idle
    }
}

impl InteractionController {
    pub fn new() -> Self {
        Self::default()
    }

    /// The current interaction state (mainly for overlays and tests).
    pub fn interaction(&self) -> &Interaction {
        &self.interaction
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.interaction, Interaction::Idle)
    }

    /// Handle pointer-down. Starts a pan, move, or draw depending on the
    /// pan modifier and what lies under the cursor. A second pointer while
    /// an interaction is active is ignored entirely.
    pub fn pointer_down(
        &mut self,
        pointer: PointerId,
        screen: Point,
        viewport: &Viewport,
        store: &mut RegionStore,
    ) {
        if !self.is_idle() {
            log::debug!("Ignoring pointer {} down while interaction active", pointer);
            return;
        }

        if self.pan_key {
            self.interaction = Interaction::Pan {
                pointer,
                last: screen,
            };
            log::debug!("🖐️ Pan started at ({:.1}, {:.1})", screen.x, screen.y);
            return;
        }

        let world = viewport.screen_to_world(screen);
        let hit = store.hit_test(world).map(str::to_string);
        if let Some(start_bbox) = hit.as_deref().and_then(|id| store.find(id)).map(|c| c.bbox) {
            let id = hit.unwrap_or_default();
            store.select(Some(&id));
            log::debug!("🔍 Move started on {} from {:?}", id, start_bbox);
            self.interaction = Interaction::Move {
                pointer,
                id,
                start_bbox,
                anchor: world,
            };
        } else {
            self.interaction = Interaction::Draw {
                pointer,
                anchor: world,
                current: world,
            };
            log::debug!("✏️ Draw started at ({:.1}, {:.1})", world.x, world.y);
        }
    }

    /// Handle pointer-move for the tracked pointer.
    ///
    /// Returns true when something changed and the overlay should re-render
    /// (viewport pan, draw preview growth, or a component move).
    pub fn pointer_move(
        &mut self,
        pointer: PointerId,
        screen: Point,
        viewport: &mut Viewport,
        store: &mut RegionStore,
        pixels: &PixelBuffer<'_>,
    ) -> bool {
        if self.interaction.pointer() != Some(pointer) {
            return false;
        }
        match &mut self.interaction {
            Interaction::Idle => false,
            Interaction::Pan { last, .. } => {
                // Screen-space drag: raw delta, no scale involved.
                viewport.pan(screen.x - last.x, screen.y - last.y);
                *last = screen;
                true
            }
            Interaction::Draw { current, .. } => {
                *current = viewport.screen_to_world(screen);
                true
            }
            Interaction::Move {
                id,
                start_bbox,
                anchor,
                ..
            } => {
                let world = viewport.screen_to_world(screen);
                let moved = start_bbox.translated(
                    world.x - anchor.x,
                    world.y - anchor.y,
                    pixels.width(),
                    pixels.height(),
                );
                let id = id.clone();
                store.move_bbox(&id, moved);
                if analysis_const::REANALYZE_EVERY_MOVE {
                    store.set_analysis(&id, analysis::analyze(pixels, moved));
                }
                true
            }
        }
    }

    /// Handle pointer-up for the tracked pointer: commit the gesture and
    /// return to idle.
    ///
    /// A draw smaller than the 8x8 world-unit minimum is discarded. A move
    /// always ends with a final analysis matching the final bbox.
    pub fn pointer_up(
        &mut self,
        pointer: PointerId,
        screen: Point,
        viewport: &Viewport,
        store: &mut RegionStore,
        pixels: &PixelBuffer<'_>,
    ) {
        if self.interaction.pointer() != Some(pointer) {
            return;
        }
        let finished = std::mem::take(&mut self.interaction);
        match finished {
            Interaction::Idle => {}
            Interaction::Pan { .. } => {
                log::debug!("Pan ended");
            }
            Interaction::Draw { anchor, .. } => {
                let current = viewport.screen_to_world(screen);
                match BBox::from_world_corners(anchor, current, pixels.width(), pixels.height()) {
                    Some(bbox)
                        if f64::from(bbox.w) >= draw::MIN_SIZE
                            && f64::from(bbox.h) >= draw::MIN_SIZE =>
                    {
                        let analysis = analysis::analyze(pixels, bbox);
                        let id = store.add(bbox, analysis);
                        log::info!("✅ Created component {} at {:?}", id, bbox);
                    }
                    _ => {
                        log::debug!("Draw below minimum size, discarded");
                    }
                }
            }
            Interaction::Move { id, .. } => {
                // Guarantee the final analysis matches the final bbox.
                if let Some(bbox) = store.find(&id).map(|c| c.bbox) {
                    store.set_analysis(&id, analysis::analyze(pixels, bbox));
                }
                log::debug!("Move of {} ended", id);
            }
        }
    }

    /// Handle pointer-cancel: discard any in-progress gesture.
    ///
    /// A cancelled draw creates no component; already-applied move steps
    /// remain (the store is modified only up to the last completed step).
    pub fn pointer_cancel(&mut self, pointer: PointerId) {
        if self.interaction.pointer() != Some(pointer) {
            return;
        }
        log::debug!("❌ Interaction cancelled");
        self.interaction = Interaction::Idle;
    }

    /// Wheel zoom, anchored at the cursor. Orthogonal to the drag machine:
    /// works in every state.
    pub fn wheel(&self, screen: Point, delta_y: f64, viewport: &mut Viewport) {
        if delta_y == 0.0 {
            return;
        }
        let factor = if delta_y < 0.0 {
            zoom::FACTOR
        } else {
            1.0 / zoom::FACTOR
        };
        viewport.zoom_at(screen, factor);
    }

    /// Handle key-down. Returns true when the store changed.
    pub fn key_down(&mut self, key: Key, store: &mut RegionStore) -> bool {
        match key {
            Key::Delete | Key::Backspace => {
                if let Some(id) = store.selected().map(str::to_string) {
                    store.remove(&id);
                    log::info!("🗑️ Deleted component {}", id);
                    true
                } else {
                    false
                }
            }
            Key::PanModifier => {
                self.pan_key = true;
                false
            }
        }
    }

    /// Handle key-up (only the pan modifier is stateful).
    pub fn key_up(&mut self, key: Key) {
        if key == Key::PanModifier {
            self.pan_key = false;
        }
    }

    /// The in-progress draw rectangle, for overlay preview. Not a component.
    pub fn draw_preview(&self, image_w: u32, image_h: u32) -> Option<BBox> {
        match &self.interaction {
            Interaction::Draw {
                anchor, current, ..
            } => BBox::from_world_corners(*anchor, *current, image_w, image_h),
            _ => None,
        }
    }
}
