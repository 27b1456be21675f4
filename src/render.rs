// render.rs - RGBA pixel surfaces
//
// Output layout (for canvas blitting):
//   width * height * 4 bytes, row-major, straight (non-premultiplied) RGBA8.
//   Same layout as the browser's ImageData, so the host can hand the buffer
//   to putImageData without conversion.
//
// A Surface carries a small canvas-like drawing state: composite mode,
// line width and global alpha. Every draw call goes through `blend`.

use crate::Viewport;

/// How a draw call combines with what is already on the surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Composite {
    /// Paint over existing content.
    #[default]
    SourceOver,
    /// Remove existing content where the source covers it.
    DestinationOut,
}

pub struct Surface {
    w: u32,
    h: u32,
    px: Vec<u8>,

    // Drawing state
    composite: Composite,
    line_width: f64,
    global_alpha: f64,
}

impl Surface {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            w: viewport.width,
            h: viewport.height,
            px: vec![0; viewport.byte_len()],
            composite: Composite::SourceOver,
            line_width: 1.0,
            global_alpha: 1.0,
        }
    }

    /// Re-establish the buffer at a new size. Pixels are cleared, drawing
    /// state is kept.
    pub fn resize(&mut self, viewport: Viewport) {
        self.w = viewport.width;
        self.h = viewport.height;
        self.px.clear();
        self.px.resize(viewport.byte_len(), 0);
    }

    pub fn clear(&mut self) {
        self.px.fill(0);
    }

    pub fn width(&self) -> u32 { self.w }
    pub fn height(&self) -> u32 { self.h }
    pub fn pixels(&self) -> &[u8] { &self.px }
    pub fn ptr(&self) -> *const u8 { self.px.as_ptr() }
    pub fn len(&self) -> usize { self.px.len() }
    pub fn is_empty(&self) -> bool { self.px.is_empty() }

    /// RGBA at pixel (x, y), transparent black when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        if x >= self.w || y >= self.h { return [0; 4]; }
        let i = self.index(x, y);
        [self.px[i], self.px[i + 1], self.px[i + 2], self.px[i + 3]]
    }

    pub fn alpha_at(&self, x: u32, y: u32) -> u8 {
        self.pixel(x, y)[3]
    }

    pub fn composite(&self) -> Composite { self.composite }
    pub fn set_composite(&mut self, mode: Composite) { self.composite = mode; }

    pub fn line_width(&self) -> f64 { self.line_width }
    pub fn set_line_width(&mut self, width: f64) { self.line_width = width.max(0.0); }

    pub fn global_alpha(&self) -> f64 { self.global_alpha }
    pub fn set_global_alpha(&mut self, alpha: f64) { self.global_alpha = alpha.clamp(0.0, 1.0); }

    /// Draw an RGBA8 image stretched to cover the whole surface.
    /// Nearest-neighbour sampling at pixel centres.
    pub fn draw_image(&mut self, src_w: u32, src_h: u32, src: &[u8]) {
        if src_w == 0 || src_h == 0 || src.len() < (src_w as usize * src_h as usize * 4) {
            return;
        }

        let sx_scale = src_w as f64 / self.w.max(1) as f64;
        let sy_scale = src_h as f64 / self.h.max(1) as f64;

        for y in 0..self.h {
            let sy = (((y as f64 + 0.5) * sy_scale) as u32).min(src_h - 1);
            for x in 0..self.w {
                let sx = (((x as f64 + 0.5) * sx_scale) as u32).min(src_w - 1);
                let s = (sy as usize * src_w as usize + sx as usize) * 4;
                let rgb = [src[s], src[s + 1], src[s + 2]];
                let alpha = src[s + 3] as f64 / 255.0;
                let i = self.index(x, y);
                self.blend(i, rgb, alpha);
            }
        }
    }

    /// Fill an anti-aliased circle.
    pub fn fill_circle(&mut self, cx: f64, cy: f64, radius: f64, rgb: [u8; 3], alpha: f64) {
        if radius <= 0.0 { return; }

        let Some((x0, y0, x1, y1)) = self.clip(cx - radius - 1.0, cy - radius - 1.0, cx + radius + 1.0, cy + radius + 1.0) else {
            return;
        };

        for y in y0..y1 {
            for x in x0..x1 {
                let dx = x as f64 + 0.5 - cx;
                let dy = y as f64 + 0.5 - cy;
                let cov = coverage((dx * dx + dy * dy).sqrt(), radius);
                if cov > 0.0 {
                    let i = self.index(x, y);
                    self.blend(i, rgb, alpha * cov);
                }
            }
        }
    }

    /// Stroke a straight segment at the current line width with round caps.
    /// Consecutive segments sharing an endpoint therefore join round as well.
    pub fn stroke_line(&mut self, ax: f64, ay: f64, bx: f64, by: f64, rgb: [u8; 3], alpha: f64) {
        let half = self.line_width / 2.0;
        if half <= 0.0 { return; }

        let pad = half + 1.0;
        let Some((x0, y0, x1, y1)) = self.clip(
            ax.min(bx) - pad,
            ay.min(by) - pad,
            ax.max(bx) + pad,
            ay.max(by) + pad,
        ) else {
            return;
        };

        for y in y0..y1 {
            for x in x0..x1 {
                let d = segment_distance(x as f64 + 0.5, y as f64 + 0.5, ax, ay, bx, by);
                let cov = coverage(d, half);
                if cov > 0.0 {
                    let i = self.index(x, y);
                    self.blend(i, rgb, alpha * cov);
                }
            }
        }
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        (y as usize * self.w as usize + x as usize) * 4
    }

    /// Clamp a float bounding box to pixel bounds, None when empty.
    fn clip(&self, left: f64, top: f64, right: f64, bottom: f64) -> Option<(u32, u32, u32, u32)> {
        let x0 = left.floor().max(0.0);
        let y0 = top.floor().max(0.0);
        let x1 = right.ceil().min(self.w as f64);
        let y1 = bottom.ceil().min(self.h as f64);
        if x0 >= x1 || y0 >= y1 { return None; }
        Some((x0 as u32, y0 as u32, x1 as u32, y1 as u32))
    }

    fn blend(&mut self, i: usize, rgb: [u8; 3], src_alpha: f64) {
        let sa = (src_alpha * self.global_alpha).clamp(0.0, 1.0);
        if sa <= 0.0 { return; }
        let da = self.px[i + 3] as f64 / 255.0;

        match self.composite {
            Composite::SourceOver => {
                let oa = sa + da * (1.0 - sa);
                for c in 0..3 {
                    let src = rgb[c] as f64;
                    let dst = self.px[i + c] as f64;
                    self.px[i + c] = ((src * sa + dst * da * (1.0 - sa)) / oa).round() as u8;
                }
                self.px[i + 3] = (oa * 255.0).round() as u8;
            }
            Composite::DestinationOut => {
                let oa = da * (1.0 - sa);
                let a = (oa * 255.0).round() as u8;
                if a == 0 {
                    self.px[i..i + 4].fill(0);
                } else {
                    self.px[i + 3] = a;
                }
            }
        }
    }
}

/// Fraction of a pixel covered by a shape edge at distance `dist` from its
/// centre line, for a shape of half-extent `radius`. One pixel of falloff.
#[inline]
fn coverage(dist: f64, radius: f64) -> f64 {
    (radius + 0.5 - dist).clamp(0.0, 1.0)
}

/// Distance from (px, py) to the segment a-b.
#[inline]
fn segment_distance(px: f64, py: f64, ax: f64, ay: f64, bx: f64, by: f64) -> f64 {
    let (abx, aby) = (bx - ax, by - ay);
    let len_sq = abx * abx + aby * aby;
    let t = if len_sq > 0.0 {
        (((px - ax) * abx + (py - ay) * aby) / len_sq).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let (cx, cy) = (ax + abx * t, ay + aby * t);
    ((px - cx).powi(2) + (py - cy).powi(2)).sqrt()
}
