// droplet.rs - Falling droplets
//
// Each droplet falls straight down at its own speed. When its top edge
// passes the bottom of the viewport it is re-rolled in place above the top.

use super::Rng;
use crate::render::Surface;

// Spawn ranges
const SPAWN_HEIGHT: f64 = 200.0;  // y in [-SPAWN_HEIGHT, 0)
const RADIUS_MIN: f64 = 2.0;
const RADIUS_SPAN: f64 = 3.0;     // radius in [2, 5)
const SPEED_MIN: f64 = 1.0;
const SPEED_SPAN: f64 = 2.0;      // speed in [1, 3)

// Look
const DROP_RGB: [u8; 3] = [255, 255, 255];
const DROP_ALPHA: f64 = 0.7;

#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Droplet {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    pub speed: f64,
}

impl Droplet {
    /// Fresh droplet somewhere above the top edge
    pub fn spawn(screen_w: f64, rng: &mut Rng) -> Self {
        Self {
            x: rng.next() * screen_w,
            y: -SPAWN_HEIGHT * (1.0 - rng.next()),
            radius: RADIUS_MIN + rng.next() * RADIUS_SPAN,
            speed: SPEED_MIN + rng.next() * SPEED_SPAN,
        }
    }

    /// Fall one frame, re-roll once fully below the bottom edge
    pub fn update(&mut self, screen_w: f64, screen_h: f64, rng: &mut Rng) {
        self.y += self.speed;
        if self.y - self.radius > screen_h {
            *self = Self::spawn(screen_w, rng);
        }
    }

    pub fn draw(&self, surface: &mut Surface) {
        surface.fill_circle(self.x, self.y, self.radius, DROP_RGB, DROP_ALPHA);
    }
}
