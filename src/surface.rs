use crate::model::Color;
use crate::settings::CanvasSettings;

pub const MIN_STROKE_WIDTH: f32 = 1.0;
pub const MAX_STROKE_WIDTH: f32 = 50.0;
pub const DEFAULT_STROKE_WIDTH: f32 = 3.0;
pub const DEFAULT_ERASER_WIDTH: f32 = 20.0;

/// Tool state the drawing surface exposes to its host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceState {
    pub stroke_color: Color,
    pub base_width: f32,
    pub eraser_active: bool,
    pub palette_open: bool,
}

impl SurfaceState {
    pub fn new(defaults: &SurfaceDefaults) -> Self {
        SurfaceState {
            stroke_color: defaults.pen_color,
            base_width: defaults.pen_width,
            eraser_active: false,
            palette_open: false,
        }
    }
}

/// Baseline pen and eraser values the reducer falls back to when a tool
/// toggle resets the brush.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceDefaults {
    pub pen_color: Color,
    pub pen_width: f32,
    pub eraser_width: f32,
    pub background: Color,
}

impl Default for SurfaceDefaults {
    fn default() -> Self {
        SurfaceDefaults {
            pen_color: Color::WHITE,
            pen_width: DEFAULT_STROKE_WIDTH,
            eraser_width: DEFAULT_ERASER_WIDTH,
            background: Color::BLACK,
        }
    }
}

impl SurfaceDefaults {
    pub fn from_settings(settings: &CanvasSettings) -> Self {
        SurfaceDefaults {
            pen_color: settings.stroke_color,
            pen_width: settings.stroke_width,
            eraser_width: settings.eraser_width,
            background: settings.background_color,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SurfaceAction {
    SelectColor(Color),
    SetWidth(f32),
    ToggleEraser,
    SetPaletteOpen(bool),
}

/// Applies one tool action and returns the next state.
///
/// The eraser and the palette are mutually exclusive: activating either
/// one dismisses the other, and picking a color always returns to the pen.
pub fn reduce(state: SurfaceState, action: SurfaceAction, defaults: &SurfaceDefaults) -> SurfaceState {
    let mut next = state;
    match action {
        SurfaceAction::SelectColor(color) => {
            if next.eraser_active {
                next.eraser_active = false;
                next.base_width = defaults.pen_width;
            }
            next.stroke_color = color;
        }
        SurfaceAction::SetWidth(width) => {
            next.base_width = width.clamp(MIN_STROKE_WIDTH, MAX_STROKE_WIDTH);
        }
        SurfaceAction::ToggleEraser => {
            if next.eraser_active {
                next.eraser_active = false;
                next.stroke_color = defaults.pen_color;
                next.base_width = defaults.pen_width;
            } else {
                next.eraser_active = true;
                next.palette_open = false;
                next.stroke_color = defaults.background;
                next.base_width = defaults.eraser_width;
            }
        }
        SurfaceAction::SetPaletteOpen(open) => {
            if open && next.eraser_active {
                next.eraser_active = false;
                next.stroke_color = defaults.pen_color;
                next.base_width = defaults.pen_width;
            }
            next.palette_open = open;
        }
    }
    next
}

#[cfg(test)]
mod tests {
    use super::{reduce, SurfaceAction, SurfaceDefaults, SurfaceState};
    use crate::model::Color;

    const RED: Color = Color::rgba(255, 0, 0, 255);

    fn base() -> (SurfaceState, SurfaceDefaults) {
        let defaults = SurfaceDefaults::default();
        (SurfaceState::new(&defaults), defaults)
    }

    #[test]
    fn select_color_turns_the_eraser_off() {
        let (state, defaults) = base();
        let erasing = reduce(state, SurfaceAction::ToggleEraser, &defaults);
        assert!(erasing.eraser_active);
        let picked = reduce(erasing, SurfaceAction::SelectColor(RED), &defaults);
        assert!(!picked.eraser_active);
        assert_eq!(picked.stroke_color, RED);
        assert_eq!(picked.base_width, defaults.pen_width);
    }

    #[test]
    fn set_width_clamps_to_the_slider_range() {
        let (state, defaults) = base();
        assert_eq!(reduce(state, SurfaceAction::SetWidth(0.0), &defaults).base_width, 1.0);
        assert_eq!(reduce(state, SurfaceAction::SetWidth(400.0), &defaults).base_width, 50.0);
        assert_eq!(reduce(state, SurfaceAction::SetWidth(7.5), &defaults).base_width, 7.5);
    }

    #[test]
    fn toggle_eraser_swaps_to_background_ink() {
        let (state, defaults) = base();
        let erasing = reduce(state, SurfaceAction::ToggleEraser, &defaults);
        assert!(erasing.eraser_active);
        assert_eq!(erasing.stroke_color, defaults.background);
        assert_eq!(erasing.base_width, defaults.eraser_width);
    }

    #[test]
    fn toggle_eraser_twice_restores_pen_defaults() {
        let (state, defaults) = base();
        let custom = reduce(state, SurfaceAction::SetWidth(12.0), &defaults);
        let erasing = reduce(custom, SurfaceAction::ToggleEraser, &defaults);
        let back = reduce(erasing, SurfaceAction::ToggleEraser, &defaults);
        assert!(!back.eraser_active);
        assert_eq!(back.stroke_color, defaults.pen_color);
        assert_eq!(back.base_width, defaults.pen_width);
    }

    #[test]
    fn opening_the_palette_disables_the_eraser() {
        let (state, defaults) = base();
        let erasing = reduce(state, SurfaceAction::ToggleEraser, &defaults);
        let open = reduce(erasing, SurfaceAction::SetPaletteOpen(true), &defaults);
        assert!(open.palette_open);
        assert!(!open.eraser_active);
    }

    #[test]
    fn toggling_the_eraser_closes_the_palette() {
        let (state, defaults) = base();
        let open = reduce(state, SurfaceAction::SetPaletteOpen(true), &defaults);
        let erasing = reduce(open, SurfaceAction::ToggleEraser, &defaults);
        assert!(!erasing.palette_open);
        assert!(erasing.eraser_active);
    }
}
