// sim/ - Droplet animation
//
// A fixed set of droplets falling over the viewport forever, redrawn from
// scratch each frame on a surface of their own.

mod droplet;
mod rng;

pub use droplet::Droplet;
pub use rng::Rng;

use crate::Viewport;
use crate::render::Surface;

/// Number of droplets alive at any time
pub const DROP_COUNT: usize = 30;

/// "Call me again on the next display refresh." The browser host backs
/// this with requestAnimationFrame.
pub trait FrameScheduler {
    fn request_frame(&mut self);
}

pub struct DropletField {
    viewport: Viewport,
    drops: [Droplet; DROP_COUNT],
    surface: Surface,
    rng: Rng,
}

impl DropletField {
    pub fn new(viewport: Viewport, seed: u32) -> Self {
        let mut rng = Rng::new(seed);
        let w = viewport.width as f64;
        let drops = std::array::from_fn(|_| Droplet::spawn(w, &mut rng));

        Self {
            viewport,
            drops,
            surface: Surface::new(viewport),
            rng,
        }
    }

    /// Droplets keep their state; only the bounds they fall within change.
    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.surface.resize(viewport);
    }

    /// One frame: clear, advance every droplet, draw every droplet.
    pub fn step(&mut self) {
        self.surface.clear();

        let w = self.viewport.width as f64;
        let h = self.viewport.height as f64;

        for drop in self.drops.iter_mut() {
            drop.update(w, h, &mut self.rng);
            drop.draw(&mut self.surface);
        }
    }

    /// Step once and ask for the next frame.
    pub fn run<S: FrameScheduler>(&mut self, scheduler: &mut S) {
        self.step();
        scheduler.request_frame();
    }

    pub fn droplets(&self) -> &[Droplet] { &self.drops }
    pub fn surface(&self) -> &Surface { &self.surface }
    pub fn viewport(&self) -> Viewport { self.viewport }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Counter(usize);

    impl FrameScheduler for Counter {
        fn request_frame(&mut self) {
            self.0 += 1;
        }
    }

    fn assert_ranges(field: &DropletField) {
        let w = field.viewport().width as f64;
        for d in field.droplets() {
            assert!((0.0..w).contains(&d.x), "x out of range: {}", d.x);
            assert!((2.0..5.0).contains(&d.radius), "radius out of range: {}", d.radius);
            assert!((1.0..3.0).contains(&d.speed), "speed out of range: {}", d.speed);
        }
    }

    #[test]
    fn test_start_800x600() {
        let field = DropletField::new(Viewport::new(800, 600), 1);
        assert_eq!(field.droplets().len(), 30);
        for d in field.droplets() {
            assert!((0.0..800.0).contains(&d.x));
            assert!((-200.0..0.0).contains(&d.y));
        }
        assert_ranges(&field);
    }

    #[test]
    fn test_ranges_hold_over_many_frames() {
        let mut field = DropletField::new(Viewport::new(320, 240), 99);
        for _ in 0..3_000 {
            field.step();
            assert_ranges(&field);
            for d in field.droplets() {
                assert!(d.y - d.radius <= 240.0 + 3.0);
            }
        }
    }

    #[test]
    fn test_exited_droplet_is_reset() {
        let mut field = DropletField::new(Viewport::new(800, 600), 5);
        field.drops[7] = Droplet { x: 400.0, y: 650.0, radius: 3.0, speed: 1.5 };
        field.step();

        let d = field.droplets()[7];
        assert!((-200.0..0.0).contains(&d.y), "respawn y: {}", d.y);
        assert!((0.0..800.0).contains(&d.x));
    }

    #[test]
    fn test_reset_uses_fresh_values() {
        let mut field = DropletField::new(Viewport::new(800, 600), 5);
        let old = Droplet { x: 400.0, y: 650.0, radius: 3.0, speed: 1.5 };
        field.drops[0] = old;
        field.step();
        assert_ne!(field.droplets()[0], old);
    }

    #[test]
    fn test_step_clears_previous_frame() {
        let mut field = DropletField::new(Viewport::new(50, 50), 11);
        for d in field.drops.iter_mut() {
            *d = Droplet { x: 25.0, y: -100.0, radius: 3.0, speed: 1.0 };
        }
        field.drops[0] = Droplet { x: 25.0, y: 20.0, radius: 3.0, speed: 1.0 };
        field.step();
        assert!(field.surface().alpha_at(25, 21) > 0);

        // Move it away; old disc must not leave a trail
        field.drops[0] = Droplet { x: 25.0, y: -100.0, radius: 3.0, speed: 1.0 };
        field.step();
        assert!(field.surface().pixels().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_droplet_colour() {
        let mut field = DropletField::new(Viewport::new(50, 50), 11);
        for d in field.drops.iter_mut() {
            *d = Droplet { x: 25.0, y: -100.0, radius: 3.0, speed: 1.0 };
        }
        field.drops[0] = Droplet { x: 25.5, y: 24.5, radius: 4.0, speed: 1.0 };
        field.step();

        let p = field.surface().pixel(25, 25);
        assert_eq!(&p[..3], &[255, 255, 255]);
        assert!((p[3] as i32 - 178).abs() <= 1);
    }

    #[test]
    fn test_run_requests_next_frame() {
        let mut field = DropletField::new(Viewport::new(100, 100), 2);
        let mut scheduler = Counter::default();
        for _ in 0..5 {
            field.run(&mut scheduler);
        }
        assert_eq!(scheduler.0, 5);
    }

    #[test]
    fn test_resize_is_idempotent() {
        let mut field = DropletField::new(Viewport::new(800, 600), 2);
        field.resize(Viewport::new(1024, 768));
        let drops = field.drops;
        field.resize(Viewport::new(1024, 768));

        assert_eq!(field.viewport(), Viewport::new(1024, 768));
        assert_eq!(field.droplets().len(), DROP_COUNT);
        assert_eq!(field.droplets(), &drops[..]);
        assert_eq!(field.surface().len(), 1024 * 768 * 4);
    }

    #[test]
    fn test_same_seed_same_animation() {
        let mut a = DropletField::new(Viewport::new(200, 200), 77);
        let mut b = DropletField::new(Viewport::new(200, 200), 77);
        for _ in 0..50 {
            a.step();
            b.step();
        }
        assert_eq!(a.droplets(), b.droplets());
        assert_eq!(a.surface().pixels(), b.surface().pixels());
    }
}
