use wasm_bindgen::prelude::*;

// ============================================================================
// FOG WINDOW - Wipeable fogged glass with falling droplets
// ============================================================================
//
// Two layers, each rendered in software to its own RGBA buffer:
//   fog/    - translucent image overlay, erased along pointer drags
//   sim/    - droplets falling forever, redrawn every frame
//
// The page stacks two canvases and blits the buffers with putImageData.
// It can drive `FogWindow` itself, or call `mount` (wasm32 only) and let the
// crate wire events, image loading and requestAnimationFrame.

pub mod error;
pub mod fog;
pub mod render;
pub mod sim;

#[cfg(target_arch = "wasm32")]
mod web;

pub use error::Error;
pub use fog::{FogSurface, ImageAsset, Point, PointerEvent};
pub use render::{Composite, Surface};
pub use sim::{Droplet, DropletField, FrameScheduler};

/// Size of both surfaces, in pixels
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Bytes in an RGBA8 buffer of this size
    pub fn byte_len(&self) -> usize {
        self.width as usize * self.height as usize * 4
    }
}

#[wasm_bindgen]
pub struct FogWindow {
    viewport: Viewport,
    fog: FogSurface,
    droplets: DropletField,
}

#[wasm_bindgen]
impl FogWindow {
    #[wasm_bindgen(constructor)]
    pub fn new(w: u32, h: u32, seed: u32) -> Self {
        let viewport = Viewport::new(w, h);
        Self {
            viewport,
            fog: FogSurface::new(viewport),
            droplets: DropletField::new(viewport, seed),
        }
    }

    pub fn resize(&mut self, w: u32, h: u32) {
        self.viewport = Viewport::new(w, h);
        self.fog.resize(self.viewport);
        self.droplets.resize(self.viewport);
    }

    /// Hand over the decoded fog image (straight RGBA8).
    pub fn load_image(&mut self, w: u32, h: u32, rgba: Vec<u8>) -> Result<(), Error> {
        let asset = ImageAsset::from_rgba(w, h, rgba)?;
        self.fog.load(asset);
        Ok(())
    }

    // Pointer input, surface-local coordinates
    pub fn pointer_down(&mut self, x: f64, y: f64) {
        self.fog.handle(PointerEvent::Down(Some(Point::new(x, y))));
    }

    pub fn pointer_move(&mut self, x: f64, y: f64) {
        self.fog.handle(PointerEvent::Move(Point::new(x, y)));
    }

    pub fn pointer_up(&mut self) {
        self.fog.handle(PointerEvent::Up);
    }

    /// Advance and redraw the droplet layer by one frame.
    pub fn tick(&mut self) {
        self.droplets.step();
    }

    pub fn is_erasing(&self) -> bool { self.fog.is_erasing() }

    /// True when the fog buffer changed since the last call and needs a blit.
    pub fn take_fog_dirty(&mut self) -> bool { self.fog.take_dirty() }

    // Accessors for WASM
    pub fn fog_ptr(&self) -> *const u8 { self.fog.surface().ptr() }
    pub fn fog_len(&self) -> usize { self.fog.surface().len() }
    pub fn droplets_ptr(&self) -> *const u8 { self.droplets.surface().ptr() }
    pub fn droplets_len(&self) -> usize { self.droplets.surface().len() }
    pub fn width(&self) -> u32 { self.viewport.width }
    pub fn height(&self) -> u32 { self.viewport.height }
}

// Rust-side access for hosts in this crate
impl FogWindow {
    pub fn handle_pointer(&mut self, event: PointerEvent) {
        self.fog.handle(event);
    }

    pub fn fog(&self) -> &FogSurface { &self.fog }

    pub fn droplets(&self) -> &DropletField { &self.droplets }

    pub fn droplets_mut(&mut self) -> &mut DropletField { &mut self.droplets }

    pub fn viewport(&self) -> Viewport { self.viewport }
}
