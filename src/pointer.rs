use crate::geometry::Point;

/// Touch contacts wider than this are treated as an incidental palm or
/// heel resting on the surface rather than intentional input.
pub const MAX_TOUCH_CONTACT_WIDTH: f32 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    Mouse,
    Touch,
    Pen,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub id: u64,
    pub position: Point,
    pub pressure: f32,
    pub kind: PointerKind,
    pub is_primary: bool,
    pub contact_width: f32,
}

/// Palm-rejection filter applied to pointer-down and pointer-move events
/// before any drawing state changes. Stylus and mouse input is always
/// accepted; touch input only when it is the primary contact and small
/// enough to be a fingertip.
pub fn accepts(event: &PointerEvent) -> bool {
    match event.kind {
        PointerKind::Touch => event.is_primary && event.contact_width <= MAX_TOUCH_CONTACT_WIDTH,
        PointerKind::Mouse | PointerKind::Pen => true,
    }
}
