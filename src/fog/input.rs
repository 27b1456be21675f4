// input.rs - Pointer input, host-agnostic
//
// Mouse and touch both reduce to Down / Move / Up in surface-local
// coordinates. Hosts do the client -> local conversion with `Point::local`.

/// Position in surface-local pixels (origin at the surface's top-left)
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Convert client (viewport) coordinates to surface-local ones by
    /// subtracting the surface's offset within the viewport.
    pub fn local(client_x: f64, client_y: f64, offset_left: f64, offset_top: f64) -> Self {
        Self::new(client_x - offset_left, client_y - offset_top)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PointerEvent {
    /// Press. None for a touch-start that reported no touch points.
    Down(Option<Point>),
    Move(Point),
    /// Release or cancel
    Up,
}

impl PointerEvent {
    /// Touch-start from the first active touch, if any. Always starts a
    /// stroke; without a touch point it just has no anchor yet.
    pub fn touch_start(first: Option<Point>) -> Self {
        PointerEvent::Down(first)
    }

    /// Touch-move from the first active touch. None when the event carried
    /// no touch points, so the host drops it.
    pub fn touch_move(first: Option<Point>) -> Option<Self> {
        first.map(PointerEvent::Move)
    }
}
