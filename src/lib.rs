//! RAVT - Region Annotation & Visual-analysis Tool
//!
//! A headless engine for annotating rectangular regions of a raster image:
//! pan/zoom viewport math, an interaction state machine for drawing and
//! moving regions, per-region color and contrast analysis, and a versioned
//! JSON document format. Embedding applications supply the pixels and the
//! pointer/keyboard events; the engine supplies everything in between.

pub mod analysis;
pub mod constants;
pub mod controller;
pub mod document;
pub mod geometry;
pub mod loader;
pub mod model;
pub mod overlay;
pub mod remote;
pub mod session;
pub mod store;
pub mod viewport;

pub use controller::{InteractionController, Key};
pub use document::Document;
pub use loader::LoadedImage;
pub use session::Session;
pub use store::RegionStore;
pub use viewport::Viewport;
