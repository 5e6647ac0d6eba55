//! Pointer interaction model for the plate preview.
//!
//! This is the single source of truth for tilt, highlight tracking, and
//! zoom. Pointer events are mapped through the pure `PointerTransform`
//! and folded into `InteractionState`; the compositor only ever reads.

/// Maximum tilt in either axis, in degrees.
pub const MAX_TILT_DEGREES: f32 = 25.0;

pub const ZOOM_MIN: f32 = 0.5;
pub const ZOOM_MAX: f32 = 2.5;
pub const ZOOM_STEP: f32 = 0.25;

/// Scale multiplier while the pointer is held down.
pub const PRESSED_SCALE: f32 = 0.98;
/// Scale multiplier while hovering without pressing.
pub const HOVER_SCALE: f32 = 1.02;

/// Pure mapping from a pointer position within the preview surface to a
/// tilt rotation and a normalized highlight position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerTransform {
    /// Degrees; positive tilts the plate top away from the viewer.
    pub rotate_x: f32,
    /// Degrees; positive tilts the plate right edge away.
    pub rotate_y: f32,
    /// Highlight center, percent of surface width [0, 100].
    pub shine_x: f32,
    /// Highlight center, percent of surface height [0, 100].
    pub shine_y: f32,
}

impl PointerTransform {
    /// `x`/`y` are pointer coordinates relative to the surface rectangle's
    /// top-left corner; `width`/`height` are the rectangle dimensions.
    pub fn from_pointer(x: f32, y: f32, width: f32, height: f32) -> Self {
        if width <= 0.0 || height <= 0.0 {
            return Self::neutral();
        }

        let center_x = width / 2.0;
        let center_y = height / 2.0;

        // Inverted X so a pointer above center tilts the plate back
        let rotate_x = ((y - center_y) / center_y) * -MAX_TILT_DEGREES;
        let rotate_y = ((x - center_x) / center_x) * MAX_TILT_DEGREES;

        Self {
            rotate_x,
            rotate_y,
            shine_x: (x / width) * 100.0,
            shine_y: (y / height) * 100.0,
        }
    }

    pub fn neutral() -> Self {
        Self {
            rotate_x: 0.0,
            rotate_y: 0.0,
            shine_x: 50.0,
            shine_y: 50.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rotation {
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shine {
    pub x: f32,
    pub y: f32,
    pub opacity: f32,
}

impl Default for Shine {
    fn default() -> Self {
        Self {
            x: 50.0,
            y: 50.0,
            opacity: 0.0,
        }
    }
}

/// Ephemeral per-frame view state. Never persisted, never exported.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InteractionState {
    pub rotation: Rotation,
    pub shine: Shine,
    pub is_hovering: bool,
    pub is_pressed: bool,
    pub zoom: f32,
}

impl InteractionState {
    pub fn new() -> Self {
        Self {
            rotation: Rotation::default(),
            shine: Shine::default(),
            is_hovering: false,
            is_pressed: false,
            zoom: 1.0,
        }
    }

    /// Fold a pointer-move event into the state.
    pub fn pointer_move(&mut self, x: f32, y: f32, width: f32, height: f32) {
        let transform = PointerTransform::from_pointer(x, y, width, height);
        self.rotation = Rotation {
            x: transform.rotate_x,
            y: transform.rotate_y,
        };
        self.shine = Shine {
            x: transform.shine_x,
            y: transform.shine_y,
            opacity: 1.0,
        };
        self.is_hovering = true;
    }

    /// Pointer left the surface: rotation snaps to neutral and the
    /// highlight fades out, regardless of prior state.
    pub fn pointer_leave(&mut self) {
        self.rotation = Rotation::default();
        self.shine.opacity = 0.0;
        self.is_hovering = false;
        self.is_pressed = false;
    }

    pub fn set_pressed(&mut self, pressed: bool) {
        self.is_pressed = pressed;
    }

    pub fn zoom_in(&mut self) {
        self.zoom = (self.zoom + ZOOM_STEP).min(ZOOM_MAX);
    }

    pub fn zoom_out(&mut self) {
        self.zoom = (self.zoom - ZOOM_STEP).max(ZOOM_MIN);
    }

    pub fn reset_zoom(&mut self) {
        self.zoom = 1.0;
    }

    /// Final scale applied by the compositor:
    /// `zoom * pressed_or_hover_multiplier`.
    pub fn scale(&self) -> f32 {
        let multiplier = if self.is_pressed {
            PRESSED_SCALE
        } else if self.is_hovering {
            HOVER_SCALE
        } else {
            1.0
        };
        self.zoom * multiplier
    }
}

impl Default for InteractionState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_center_is_neutral() {
        let t = PointerTransform::from_pointer(200.0, 150.0, 400.0, 300.0);
        assert_eq!(t.rotate_x, 0.0);
        assert_eq!(t.rotate_y, 0.0);
        assert_eq!(t.shine_x, 50.0);
        assert_eq!(t.shine_y, 50.0);
    }

    #[test]
    fn test_top_left_tilts_back_and_left() {
        let t = PointerTransform::from_pointer(0.0, 0.0, 400.0, 300.0);
        assert!(t.rotate_x > 0.0);
        assert!(t.rotate_y < 0.0);
        assert_eq!(t.shine_x, 0.0);
        assert_eq!(t.shine_y, 0.0);
    }

    #[test]
    fn test_corners_reach_max_tilt() {
        let t = PointerTransform::from_pointer(400.0, 300.0, 400.0, 300.0);
        assert_eq!(t.rotate_x, -MAX_TILT_DEGREES);
        assert_eq!(t.rotate_y, MAX_TILT_DEGREES);
    }

    #[test]
    fn test_degenerate_surface_is_neutral() {
        let t = PointerTransform::from_pointer(10.0, 10.0, 0.0, 0.0);
        assert_eq!(t, PointerTransform::neutral());
    }

    #[test]
    fn test_pointer_leave_resets() {
        let mut state = InteractionState::new();
        state.pointer_move(390.0, 10.0, 400.0, 300.0);
        state.set_pressed(true);
        assert!(state.is_hovering);
        assert_eq!(state.shine.opacity, 1.0);
        assert_ne!(state.rotation, Rotation::default());

        state.pointer_leave();
        assert_eq!(state.rotation, Rotation::default());
        assert_eq!(state.shine.opacity, 0.0);
        assert!(!state.is_hovering);
        assert!(!state.is_pressed);
    }

    #[test]
    fn test_zoom_clamps_at_both_bounds() {
        let mut state = InteractionState::new();
        for _ in 0..20 {
            state.zoom_in();
        }
        assert_eq!(state.zoom, ZOOM_MAX);
        state.zoom_in();
        assert_eq!(state.zoom, ZOOM_MAX);

        for _ in 0..20 {
            state.zoom_out();
        }
        assert_eq!(state.zoom, ZOOM_MIN);
        state.zoom_out();
        assert_eq!(state.zoom, ZOOM_MIN);

        state.reset_zoom();
        assert_eq!(state.zoom, 1.0);
    }

    #[test]
    fn test_scale_combines_zoom_and_pointer_state() {
        let mut state = InteractionState::new();
        assert_eq!(state.scale(), 1.0);

        state.pointer_move(200.0, 150.0, 400.0, 300.0);
        assert_eq!(state.scale(), HOVER_SCALE);

        state.set_pressed(true);
        assert_eq!(state.scale(), PRESSED_SCALE);

        state.zoom_in();
        assert_eq!(state.scale(), 1.25 * PRESSED_SCALE);

        state.pointer_leave();
        assert_eq!(state.scale(), 1.25);
    }
}
