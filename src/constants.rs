//! Engine constants for consistent behavior across the application.
//!
//! This module centralizes all hardcoded values for zoom limits, drawing
//! thresholds, analysis tuning, and overlay layout.

/// Zoom and viewport constants.
pub mod zoom {
    /// Zoom increment/decrement factor per wheel notch
    pub const FACTOR: f64 = 1.2;
    /// Maximum zoom level
    pub const MAX: f64 = 16.0;
    /// Minimum zoom level
    pub const MIN: f64 = 0.05;
    /// Fraction of the viewport the image may fill when fitting
    pub const FIT_MARGIN: f64 = 0.95;
}

/// Drawing and move-interaction constants.
pub mod draw {
    /// Minimum width/height (world units) for a drawn rectangle to become
    /// a component. Smaller drags are treated as accidental and discarded.
    pub const MIN_SIZE: f64 = 8.0;
}

/// Color analysis tuning.
pub mod analysis {
    /// Region area (pixels) above which the coarsest sampling stride is used
    pub const COARSE_AREA: u64 = 260_000;
    /// Region area (pixels) above which the medium sampling stride is used
    pub const MEDIUM_AREA: u64 = 120_000;
    /// Manhattan RGB distance between consecutive samples that counts as an edge
    pub const EDGE_THRESHOLD: u32 = 120;
    /// Minimum Manhattan RGB distance from the background for a bucket to
    /// qualify as the foreground color
    pub const FG_DISTANCE: u32 = 140;
    /// Number of dominant color buckets reported
    pub const DOMINANT_COUNT: usize = 8;
    /// Recompute analysis on every move tick rather than only at gesture end.
    /// The final analysis always matches the final bbox either way; this only
    /// controls how fresh the intermediate values are.
    pub const REANALYZE_EVERY_MOVE: bool = true;
}

/// Overlay layout constants.
pub mod overlay {
    /// Vertical gap between a component's top edge and its label (screen px)
    pub const LABEL_OFFSET: f64 = 6.0;
}
