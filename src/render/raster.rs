use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    /// The output surface is unavailable; the frame is skipped and the
    /// scheduler retries on its next tick.
    #[error("render target has zero size ({width}x{height})")]
    EmptyTarget { width: usize, height: usize },
    #[error("failed to encode frame: {0}")]
    Encode(#[from] image::ImageError),
}

/// RGBA8 raster target of fixed pixel dimensions, redrawn in place each
/// frame.
pub struct Raster {
    width: usize,
    height: usize,
    pixels: Vec<u8>,
}

impl Raster {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width * height * 4],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn pixel(&self, x: usize, y: usize) -> [u8; 4] {
        let at = (y * self.width + x) * 4;
        [
            self.pixels[at],
            self.pixels[at + 1],
            self.pixels[at + 2],
            self.pixels[at + 3],
        ]
    }

    pub fn clear(&mut self, rgb: [f32; 3]) {
        let [r, g, b] = to_bytes(rgb);
        for px in self.pixels.chunks_exact_mut(4) {
            px.copy_from_slice(&[r, g, b, 255]);
        }
    }

    /// Source-over blend of one pixel; out-of-bounds writes are dropped.
    pub fn blend(&mut self, x: i32, y: i32, rgb: [f32; 3], alpha: f32) {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return;
        }
        let alpha = alpha.clamp(0.0, 1.0);
        if alpha <= 0.0 {
            return;
        }
        let at = (y as usize * self.width + x as usize) * 4;
        for c in 0..3 {
            let src = (rgb[c].clamp(0.0, 1.0) * 255.0) as f32;
            let dst = self.pixels[at + c] as f32;
            self.pixels[at + c] = (dst + (src - dst) * alpha) as u8;
        }
        self.pixels[at + 3] = 255;
    }

    /// Additive blend used by the lighting pass.
    pub fn add(&mut self, x: i32, y: i32, rgb: [f32; 3], strength: f32) {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return;
        }
        let at = (y as usize * self.width + x as usize) * 4;
        for c in 0..3 {
            let boost = rgb[c].clamp(0.0, 1.0) * strength.max(0.0) * 255.0;
            self.pixels[at + c] = (self.pixels[at + c] as f32 + boost).min(255.0) as u8;
        }
    }

    pub fn blend_rect(&mut self, x: i32, y: i32, w: i32, h: i32, rgb: [f32; 3], alpha: f32) {
        for yy in y..y + h {
            for xx in x..x + w {
                self.blend(xx, yy, rgb, alpha);
            }
        }
    }

    /// Bresenham segment.
    pub fn line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, rgb: [f32; 3], alpha: f32) {
        let (mut x, mut y) = (x0, y0);
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        loop {
            self.blend(x, y, rgb, alpha);
            if x == x1 && y == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    pub fn disc(&mut self, cx: i32, cy: i32, radius: i32, rgb: [f32; 3], alpha: f32) {
        for y in -radius..=radius {
            for x in -radius..=radius {
                if x * x + y * y <= radius * radius {
                    self.blend(cx + x, cy + y, rgb, alpha);
                }
            }
        }
    }

    /// Filled triangle via edge functions over the bounding box.
    pub fn fill_triangle(&mut self, a: [f32; 2], b: [f32; 2], c: [f32; 2], rgb: [f32; 3], alpha: f32) {
        let min_x = a[0].min(b[0]).min(c[0]).floor().max(0.0) as i32;
        let max_x = (a[0].max(b[0]).max(c[0]).ceil() as i32).min(self.width as i32 - 1);
        let min_y = a[1].min(b[1]).min(c[1]).floor().max(0.0) as i32;
        let max_y = (a[1].max(b[1]).max(c[1]).ceil() as i32).min(self.height as i32 - 1);

        let area = edge(a, b, c);
        if area.abs() < f32::EPSILON {
            return;
        }
        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let p = [x as f32 + 0.5, y as f32 + 0.5];
                let w0 = edge(b, c, p) / area;
                let w1 = edge(c, a, p) / area;
                let w2 = edge(a, b, p) / area;
                if w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0 {
                    self.blend(x, y, rgb, alpha);
                } else if w0 <= 0.0 && w1 <= 0.0 && w2 <= 0.0 {
                    self.blend(x, y, rgb, alpha);
                }
            }
        }
    }

    pub fn save_png(&self, path: &Path) -> Result<(), RenderError> {
        let img = image::RgbaImage::from_raw(self.width as u32, self.height as u32, self.pixels.clone())
            .ok_or(RenderError::EmptyTarget {
                width: self.width,
                height: self.height,
            })?;
        img.save(path)?;
        Ok(())
    }
}

fn edge(a: [f32; 2], b: [f32; 2], p: [f32; 2]) -> f32 {
    (b[0] - a[0]) * (p[1] - a[1]) - (b[1] - a[1]) * (p[0] - a[0])
}

fn to_bytes(rgb: [f32; 3]) -> [u8; 3] {
    [
        (rgb[0].clamp(0.0, 1.0) * 255.0) as u8,
        (rgb[1].clamp(0.0, 1.0) * 255.0) as u8,
        (rgb[2].clamp(0.0, 1.0) * 255.0) as u8,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blend_is_bounds_checked() {
        let mut raster = Raster::new(4, 4);
        raster.blend(-1, 0, [1.0, 1.0, 1.0], 1.0);
        raster.blend(4, 4, [1.0, 1.0, 1.0], 1.0);
        assert!(raster.pixels().iter().all(|&b| b == 0));
    }

    #[test]
    fn clear_fills_opaque() {
        let mut raster = Raster::new(2, 2);
        raster.clear([0.5, 0.25, 0.0]);
        let px = raster.pixel(1, 1);
        assert_eq!(px[3], 255);
        assert!(px[0] > px[1] && px[1] > px[2]);
    }

    #[test]
    fn triangle_covers_its_interior() {
        let mut raster = Raster::new(16, 16);
        raster.fill_triangle([1.0, 1.0], [14.0, 1.0], [1.0, 14.0], [1.0, 0.0, 0.0], 1.0);
        assert_eq!(raster.pixel(4, 4)[0], 255);
        assert_eq!(raster.pixel(15, 15)[0], 0);
    }
}
