// fog/ - Erasable fog overlay
//
// A surface filled once with the fog image at fixed translucency. Dragging
// a pointer strokes transparent channels through it with destination-out
// compositing. Erasing is switched on at pointer-down and off at pointer-up,
// so nothing outside a drag ever erases.

mod asset;
mod input;

pub use asset::ImageAsset;
pub use input::{Point, PointerEvent};

use crate::Viewport;
use crate::render::{Composite, Surface};

/// Opacity of the fog image layer
pub const FOG_ALPHA: f64 = 0.9;
/// Width of the erase stroke (round caps and joins)
pub const ERASE_WIDTH: f64 = 40.0;

// Source colour of erase strokes. Only coverage matters for destination-out.
const ERASE_INK: [u8; 3] = [0, 0, 0];

pub struct FogSurface {
    surface: Surface,
    asset: Option<ImageAsset>,

    // Stroke state
    erasing: bool,
    anchor: Option<Point>,

    // Pixels changed since the host last presented them
    dirty: bool,
}

impl FogSurface {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            surface: Surface::new(viewport),
            asset: None,
            erasing: false,
            anchor: None,
            dirty: true,
        }
    }

    /// Asset finished loading: draw the base layer.
    pub fn load(&mut self, asset: ImageAsset) {
        self.asset = Some(asset);
        self.render_base();
    }

    pub fn resize(&mut self, viewport: Viewport) {
        self.surface.resize(viewport);
        self.render_base();
        self.dirty = true;
    }

    pub fn handle(&mut self, event: PointerEvent) {
        match event {
            PointerEvent::Down(at) => self.begin_stroke(at),
            PointerEvent::Move(to) => self.extend_stroke(to),
            PointerEvent::Up => self.end_stroke(),
        }
    }

    pub fn begin_stroke(&mut self, at: Option<Point>) {
        self.erasing = true;
        self.anchor = at;
        self.surface.set_line_width(ERASE_WIDTH);
        self.surface.set_composite(Composite::DestinationOut);
    }

    /// Erase from the previous stroke point to `to`, then re-anchor at `to`.
    /// Ignored outside a stroke.
    pub fn extend_stroke(&mut self, to: Point) {
        if !self.erasing { return; }

        if let Some(from) = self.anchor {
            self.surface.stroke_line(from.x, from.y, to.x, to.y, ERASE_INK, 1.0);
            self.dirty = true;
        }
        self.anchor = Some(to);
    }

    pub fn end_stroke(&mut self) {
        self.erasing = false;
        self.anchor = None;
        self.surface.set_composite(Composite::SourceOver);
    }

    pub fn is_erasing(&self) -> bool { self.erasing }

    /// Last stroke point, only while erasing
    pub fn stroke_point(&self) -> Option<Point> {
        if self.erasing { self.anchor } else { None }
    }

    pub fn has_asset(&self) -> bool { self.asset.is_some() }

    pub fn surface(&self) -> &Surface { &self.surface }

    /// Returns whether the pixels changed since the last call.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    // Base layer always paints source-over, even mid-stroke after a resize.
    fn render_base(&mut self) {
        let Some(asset) = &self.asset else { return };

        let mode = self.surface.composite();
        self.surface.set_composite(Composite::SourceOver);
        self.surface.set_global_alpha(FOG_ALPHA);
        self.surface.draw_image(asset.width(), asset.height(), asset.rgba());
        self.surface.set_global_alpha(1.0);
        self.surface.set_composite(mode);
        self.dirty = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fogged(w: u32, h: u32) -> FogSurface {
        let mut fog = FogSurface::new(Viewport::new(w, h));
        fog.load(ImageAsset::flat(4, 4, [200, 200, 210, 255]).unwrap());
        fog
    }

    fn is_fog(alpha: u8) -> bool {
        alpha == 229 || alpha == 230
    }

    #[test]
    fn test_load_draws_translucent_base() {
        let fog = fogged(64, 48);
        assert!(is_fog(fog.surface().alpha_at(0, 0)));
        assert!(is_fog(fog.surface().alpha_at(63, 47)));
        assert_eq!(fog.surface().composite(), Composite::SourceOver);
    }

    #[test]
    fn test_erase_mode_spans_exactly_down_to_up() {
        let mut fog = fogged(200, 200);
        assert_eq!(fog.surface().composite(), Composite::SourceOver);

        fog.handle(PointerEvent::Down(Some(Point::new(10.0, 10.0))));
        assert!(fog.is_erasing());
        assert_eq!(fog.surface().composite(), Composite::DestinationOut);
        assert_eq!(fog.surface().line_width(), ERASE_WIDTH);

        for i in 1..10 {
            fog.handle(PointerEvent::Move(Point::new(10.0 + i as f64 * 5.0, 10.0)));
            assert!(fog.is_erasing());
            assert_eq!(fog.surface().composite(), Composite::DestinationOut);
        }

        fog.handle(PointerEvent::Up);
        assert!(!fog.is_erasing());
        assert_eq!(fog.surface().composite(), Composite::SourceOver);
        assert_eq!(fog.stroke_point(), None);
    }

    #[test]
    fn test_move_without_press_does_nothing() {
        let mut fog = fogged(100, 100);
        fog.take_dirty();
        fog.handle(PointerEvent::Move(Point::new(10.0, 10.0)));
        fog.handle(PointerEvent::Move(Point::new(60.0, 10.0)));

        assert!(!fog.take_dirty());
        assert!(is_fog(fog.surface().alpha_at(30, 10)));
    }

    #[test]
    fn test_drag_clears_channel() {
        let mut fog = fogged(800, 600);
        fog.handle(PointerEvent::Down(Some(Point::new(100.0, 100.0))));
        fog.handle(PointerEvent::Move(Point::new(150.0, 100.0)));
        fog.handle(PointerEvent::Up);

        let s = fog.surface();
        // Along and around the line
        for x in [100, 125, 149] {
            assert_eq!(s.alpha_at(x, 100), 0);
        }
        assert_eq!(s.alpha_at(125, 85), 0);
        assert_eq!(s.alpha_at(125, 114), 0);
        // Round caps reach past the endpoints
        assert_eq!(s.alpha_at(85, 100), 0);
        assert_eq!(s.alpha_at(165, 100), 0);
        // Outside the 40px channel
        assert!(is_fog(s.alpha_at(125, 125)));
        assert!(is_fog(s.alpha_at(125, 75)));
        assert!(is_fog(s.alpha_at(175, 100)));
        assert!(is_fog(s.alpha_at(400, 300)));
    }

    #[test]
    fn test_touch_start_without_points_only_anchors_on_move() {
        let mut fog = fogged(100, 100);
        fog.handle(PointerEvent::Down(None));
        assert!(fog.is_erasing());
        assert_eq!(fog.stroke_point(), None);

        fog.take_dirty();
        fog.handle(PointerEvent::Move(Point::new(50.0, 50.0)));
        assert!(!fog.take_dirty());
        assert_eq!(fog.stroke_point(), Some(Point::new(50.0, 50.0)));
    }

    #[test]
    fn test_missing_asset_stays_transparent() {
        let mut fog = FogSurface::new(Viewport::new(120, 80));
        assert!(!fog.has_asset());

        fog.handle(PointerEvent::Down(Some(Point::new(10.0, 10.0))));
        assert!(fog.is_erasing());
        fog.handle(PointerEvent::Move(Point::new(60.0, 40.0)));
        fog.handle(PointerEvent::Up);
        assert!(!fog.is_erasing());

        assert!(fog.surface().pixels().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_resize_restores_fog_and_clears_erasure() {
        let mut fog = fogged(100, 100);
        fog.handle(PointerEvent::Down(Some(Point::new(10.0, 50.0))));
        fog.handle(PointerEvent::Move(Point::new(90.0, 50.0)));
        fog.handle(PointerEvent::Up);
        assert_eq!(fog.surface().alpha_at(50, 50), 0);

        fog.resize(Viewport::new(120, 90));
        assert_eq!(fog.surface().width(), 120);
        assert_eq!(fog.surface().height(), 90);
        assert!(is_fog(fog.surface().alpha_at(50, 50)));
        assert!(is_fog(fog.surface().alpha_at(119, 89)));
    }

    #[test]
    fn test_resize_mid_stroke_paints_base_then_keeps_erasing() {
        let mut fog = fogged(100, 100);
        fog.handle(PointerEvent::Down(Some(Point::new(10.0, 50.0))));
        fog.resize(Viewport::new(100, 100));

        assert!(is_fog(fog.surface().alpha_at(10, 50)));
        assert!(fog.is_erasing());
        assert_eq!(fog.surface().composite(), Composite::DestinationOut);

        fog.handle(PointerEvent::Move(Point::new(90.0, 50.0)));
        assert_eq!(fog.surface().alpha_at(50, 50), 0);
    }

    #[test]
    fn test_take_dirty_resets() {
        let mut fog = fogged(10, 10);
        assert!(fog.take_dirty());
        assert!(!fog.take_dirty());
    }
}
