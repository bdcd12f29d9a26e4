use glam::Vec2;

/// Fraction of the remaining distance the camera covers toward its target per frame.
pub const CAMERA_SMOOTHING: f32 = 0.03;
/// Share of the window the start-to-end bounding box fills on level entry.
pub const FIT_MARGIN: f32 = 0.8;
/// Upper bound for the fitted entry zoom.
pub const MAX_FIT_ZOOM: f32 = 2.0;

/// Camera into the stage: smoothed zoom and pan offset plus the derived
/// visible box.
///
/// The offset is measured from the stage centre, so an offset of zero shows
/// the middle of the stage. `origin`/`extent` describe the part of the stage
/// covering the window (`extent * zoom == window size`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub zoom: f32,
    pub target_zoom: f32,
    pub offset: Vec2,
    pub target_offset: Vec2,
    /// Top-left of the visible box in stage units.
    pub origin: Vec2,
    /// Size of the visible box in stage units.
    pub extent: Vec2,
}

impl Viewport {
    pub fn new() -> Self {
        Self {
            zoom: 1.0,
            target_zoom: 1.0,
            offset: Vec2::ZERO,
            target_offset: Vec2::ZERO,
            origin: Vec2::ZERO,
            extent: Vec2::ZERO,
        }
    }

    /// Jump straight to a zoom and offset, cancelling any easing.
    pub fn snap_to(&mut self, zoom: f32, offset: Vec2) {
        self.zoom = zoom;
        self.target_zoom = zoom;
        self.offset = offset;
        self.target_offset = offset;
    }

    /// Set a new camera goal; `update` eases toward it.
    pub fn retarget(&mut self, zoom: f32, offset: Vec2) {
        self.target_zoom = zoom;
        self.target_offset = offset;
    }

    /// Aim at a stage point: the offset that puts `point` at the window centre.
    pub fn focus(&mut self, point: Vec2, stage: Vec2, zoom: f32) {
        self.retarget(zoom, offset_for(point, stage));
    }

    /// Move both current and target offset, used by drag panning.
    pub fn pan_to(&mut self, offset: Vec2) {
        self.offset = offset;
        self.target_offset = offset;
    }

    /// Ease zoom and offset toward their targets by `smoothing`.
    pub fn ease(&mut self, smoothing: f32) {
        self.zoom += (self.target_zoom - self.zoom) * smoothing;
        self.offset += (self.target_offset - self.offset) * smoothing;
    }

    /// Recompute the visible box for the given window and stage sizes.
    pub fn fit(&mut self, window: Vec2, stage: Vec2) {
        self.extent = window / self.zoom;
        self.origin = (stage - self.extent) * 0.5 + self.offset;
    }

    /// One frame of camera motion: ease, then recompute the visible box.
    pub fn update(&mut self, window: Vec2, stage: Vec2, smoothing: f32) {
        self.ease(smoothing);
        self.fit(window, stage);
    }

    pub fn stage_to_screen(&self, stage: Vec2) -> Vec2 {
        (stage - self.origin) * self.zoom
    }

    pub fn screen_to_stage(&self, screen: Vec2) -> Vec2 {
        screen / self.zoom + self.origin
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new()
    }
}

/// Offset (from stage centre) that centres the view on `point`.
pub fn offset_for(point: Vec2, stage: Vec2) -> Vec2 {
    point - stage * 0.5
}

/// Entry zoom: fit a bounding box of size `bounds` into `window` at
/// [`FIT_MARGIN`], never exceeding [`MAX_FIT_ZOOM`].
///
/// A degenerate axis (all lights in a line) contributes an infinite ratio and
/// so never limits the zoom.
pub fn fit_zoom(window: Vec2, bounds: Vec2) -> f32 {
    let ratio = (window.y / bounds.y).min(window.x / bounds.x);
    (ratio * FIT_MARGIN).min(MAX_FIT_ZOOM)
}
