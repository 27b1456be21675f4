// fogpreview - Render a still of the fog window effect to PNG
//
// Pipeline:
//   1. Load the fog image (flat grey fog if it can't be read)
//   2. Build the effect at the requested size
//   3. Wipe a diagonal stroke across the fog
//   4. Run the droplet animation for N frames
//   5. Composite backdrop + fog + droplets and save
//
// Usage: cargo run --bin fogpreview -- <image> [--width N] [--height N] [--frames N] [--seed N] [--out PATH]

mod compose;

use fog_window::{FogWindow, FrameScheduler, ImageAsset, Point, PointerEvent};
use std::env;
use std::path::Path;

// Drag script
const DRAG_STEPS: usize = 24;

/// Stands in for requestAnimationFrame: counts requests, nothing more.
#[derive(Default)]
struct FrameCounter {
    requested: usize,
}

impl FrameScheduler for FrameCounter {
    fn request_frame(&mut self) {
        self.requested += 1;
    }
}

fn main() {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <image> [--width N] [--height N] [--frames N] [--seed N] [--out PATH]", args[0]);
        std::process::exit(1);
    }

    // Parse arguments
    let image_path = &args[1];
    let mut width = 800u32;
    let mut height = 600u32;
    let mut frames = 240usize;
    let mut seed = 0x5EEDu32;
    let mut out = String::from("fogpreview.png");

    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "--width" => { width = args.get(i+1).and_then(|s| s.parse().ok()).unwrap_or(800); i += 2; }
            "--height" => { height = args.get(i+1).and_then(|s| s.parse().ok()).unwrap_or(600); i += 2; }
            "--frames" => { frames = args.get(i+1).and_then(|s| s.parse().ok()).unwrap_or(240); i += 2; }
            "--seed" => { seed = args.get(i+1).and_then(|s| s.parse().ok()).unwrap_or(0x5EED); i += 2; }
            "--out" => { if let Some(p) = args.get(i+1) { out = p.clone(); } i += 2; }
            _ => i += 1,
        }
    }

    println!("Rendering {} ({}x{}, {} frames)...", image_path, width, height, frames);

    let mut app = FogWindow::new(width, height, seed);

    // Fog image
    println!("  Loading fog image...");
    let asset = load_asset(Path::new(image_path));
    if let Err(e) = app.load_image(asset.width(), asset.height(), asset.rgba().to_vec()) {
        eprintln!("    Fog image rejected: {}", e);
    }

    // Diagonal wipe through the middle third
    println!("  Wiping...");
    let (w, h) = (width as f64, height as f64);
    let from = Point::new(w / 3.0, h / 3.0);
    let to = Point::new(w * 2.0 / 3.0, h * 2.0 / 3.0);
    app.handle_pointer(PointerEvent::Down(Some(from)));
    for step in 1..=DRAG_STEPS {
        let t = step as f64 / DRAG_STEPS as f64;
        let at = Point::new(from.x + (to.x - from.x) * t, from.y + (to.y - from.y) * t);
        app.handle_pointer(PointerEvent::Move(at));
    }
    app.handle_pointer(PointerEvent::Up);

    // Droplets
    println!("  Animating droplets...");
    let mut scheduler = FrameCounter::default();
    for _ in 0..frames {
        app.droplets_mut().run(&mut scheduler);
    }
    println!("    {} frames requested", scheduler.requested);

    // Composite + save
    println!("  Compositing...");
    let image = compose::flatten(&app);
    match image.save(&out) {
        Ok(()) => println!("Done! Wrote {}", out),
        Err(e) => {
            eprintln!("Failed to write {}: {}", out, e);
            std::process::exit(1);
        }
    }
}

fn load_asset(path: &Path) -> ImageAsset {
    match image::open(path) {
        Ok(img) => {
            let rgba = img.to_rgba8();
            let (w, h) = rgba.dimensions();
            match ImageAsset::from_rgba(w, h, rgba.into_raw()) {
                Ok(asset) => return asset,
                Err(e) => eprintln!("    {}, using flat fog", e),
            }
        }
        Err(e) => eprintln!("    Could not read {} ({}), using flat fog", path.display(), e),
    }
    flat_fog()
}

fn flat_fog() -> ImageAsset {
    ImageAsset::flat(1, 1, [206, 212, 218, 255]).expect("1x1 flat fog")
}
