// compose.rs - Flatten the effect's layers into one image
//
// Stack, bottom to top: backdrop (what the fog hides), fog, droplets.
// Surfaces are straight RGBA, so each layer is blended source-over.

use fog_window::{FogWindow, Surface};
use image::{Rgba, RgbaImage};

// Backdrop gradient, top to bottom
const SKY_TOP: [f32; 3] = [24.0, 44.0, 78.0];
const SKY_BOTTOM: [f32; 3] = [230.0, 150.0, 90.0];

pub fn flatten(app: &FogWindow) -> RgbaImage {
    let viewport = app.viewport();
    let mut img = backdrop(viewport.width, viewport.height);
    blend_layer(&mut img, app.fog().surface());
    blend_layer(&mut img, app.droplets().surface());
    img
}

fn backdrop(w: u32, h: u32) -> RgbaImage {
    RgbaImage::from_fn(w, h, |_, y| {
        let t = if h > 1 { y as f32 / (h - 1) as f32 } else { 0.0 };
        let c = |i: usize| (SKY_TOP[i] + (SKY_BOTTOM[i] - SKY_TOP[i]) * t) as u8;
        Rgba([c(0), c(1), c(2), 255])
    })
}

fn blend_layer(img: &mut RgbaImage, layer: &Surface) {
    for (x, y, dst) in img.enumerate_pixels_mut() {
        let src = layer.pixel(x, y);
        let a = src[3] as f32 / 255.0;
        if a == 0.0 { continue; }
        for c in 0..3 {
            dst[c] = (src[c] as f32 * a + dst[c] as f32 * (1.0 - a)).round() as u8;
        }
    }
}
