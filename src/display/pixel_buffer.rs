use crate::backend::Backend;
use crate::color::{rgb555_to_888, BLACK};
use crate::config::{DEFAULT_HEIGHT, DEFAULT_WIDTH};

// ============================================================================
// PixelBuffer
// ============================================================================

/// RGB555 pixel buffer for software rendering
///
/// This is the canvas the pipeline draws into. Lines are clipped to the
/// buffer, so off-screen coordinates are safe.
pub struct PixelBuffer {
    pixels: Vec<u16>,
    width: u32,
    height: u32,
    clear_color: u16,
}

impl PixelBuffer {
    /// Create a pixel buffer at the default logical resolution (240x160)
    pub fn new() -> Self {
        Self::with_size(u32::from(DEFAULT_WIDTH), u32::from(DEFAULT_HEIGHT))
    }

    /// Create a pixel buffer with custom resolution, cleared to black
    pub fn with_size(width: u32, height: u32) -> Self {
        Self {
            pixels: vec![BLACK; (width * height) as usize],
            width,
            height,
            clear_color: BLACK,
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Color used by `Backend::clear`
    pub fn set_clear_color(&mut self, color: u16) {
        self.clear_color = color;
    }

    /// Check if coordinates are within bounds
    #[inline]
    fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.width as i32 && y >= 0 && y < self.height as i32
    }

    #[inline]
    fn pixel_index(&self, x: u32, y: u32) -> usize {
        (y * self.width + x) as usize
    }

    /// Fill the whole buffer with one color
    pub fn fill(&mut self, color: u16) {
        self.pixels.fill(color);
    }

    /// Set a single pixel (bounds checked)
    #[inline]
    pub fn set_pixel(&mut self, x: i32, y: i32, color: u16) {
        if self.in_bounds(x, y) {
            let idx = self.pixel_index(x as u32, y as u32);
            self.pixels[idx] = color;
        }
    }

    /// Read a pixel. Returns None if coordinates are out of bounds
    #[inline]
    pub fn get_pixel(&self, x: i32, y: i32) -> Option<u16> {
        if self.in_bounds(x, y) {
            Some(self.pixels[self.pixel_index(x as u32, y as u32)])
        } else {
            None
        }
    }

    /// Number of pixels that differ from the clear color
    pub fn lit_pixels(&self) -> usize {
        self.pixels.iter().filter(|&&p| p != self.clear_color).count()
    }

    /// Draw a line using Bresenham's algorithm with Cohen-Sutherland clipping
    ///
    /// Clips to the buffer first, so the stepping loop never leaves it.
    pub fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: u16) {
        let Some((cx0, cy0, cx1, cy1)) = self.clip_line(x0, y0, x1, y1) else {
            return;
        };

        let dx = (cx1 - cx0).abs();
        let dy = -((cy1 - cy0).abs());
        let sx = if cx0 < cx1 { 1i32 } else { -1i32 };
        let sy = if cy0 < cy1 { 1i32 } else { -1i32 };
        let mut err = dx + dy;
        let mut x = cx0;
        let mut y = cy0;

        loop {
            let idx = self.pixel_index(x as u32, y as u32);
            self.pixels[idx] = color;
            if x == cx1 && y == cy1 {
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

    /// Cohen-Sutherland line clipping against the buffer rectangle
    fn clip_line(
        &self,
        mut x0: i32,
        mut y0: i32,
        mut x1: i32,
        mut y1: i32,
    ) -> Option<(i32, i32, i32, i32)> {
        const INSIDE: u8 = 0;
        const LEFT: u8 = 1;
        const RIGHT: u8 = 2;
        const BOTTOM: u8 = 4;
        const TOP: u8 = 8;
        // Converges in at most 4 steps for valid input
        const MAX_ITERATIONS: u32 = 16;

        if self.width == 0 || self.height == 0 {
            return None;
        }
        let w = self.width as i32;
        let h = self.height as i32;

        let outcode = |x: i32, y: i32| -> u8 {
            let mut code = INSIDE;
            if x < 0 {
                code |= LEFT;
            } else if x >= w {
                code |= RIGHT;
            }
            if y < 0 {
                code |= TOP;
            } else if y >= h {
                code |= BOTTOM;
            }
            code
        };

        let mut code0 = outcode(x0, y0);
        let mut code1 = outcode(x1, y1);

        for _ in 0..MAX_ITERATIONS {
            if (code0 | code1) == 0 {
                return Some((x0, y0, x1, y1));
            }
            if (code0 & code1) != 0 {
                return None;
            }

            let code_out = if code0 != 0 { code0 } else { code1 };
            let dy = i64::from(y1 - y0);
            let dx = i64::from(x1 - x0);
            let (x0w, y0w) = (i64::from(x0), i64::from(y0));

            // dx/dy cannot be zero on the axis being crossed: the endpoints
            // sit on opposite sides of it
            let (x, y) = if (code_out & BOTTOM) != 0 {
                let y = i64::from(h - 1);
                (x0w + dx * (y - y0w) / dy, y)
            } else if (code_out & TOP) != 0 {
                (x0w + dx * (0 - y0w) / dy, 0)
            } else if (code_out & RIGHT) != 0 {
                let x = i64::from(w - 1);
                (x, y0w + dy * (x - x0w) / dx)
            } else {
                (0, y0w + dy * (0 - x0w) / dx)
            };
            let (x, y) = (x as i32, y as i32);

            if code_out == code0 {
                x0 = x;
                y0 = y;
                code0 = outcode(x0, y0);
            } else {
                x1 = x;
                y1 = y;
                code1 = outcode(x1, y1);
            }
        }

        None
    }

    /// Expand to RGBA8888 bytes in SDL's little-endian order (A, B, G, R)
    pub fn write_rgba8888(&self, out: &mut Vec<u8>) {
        out.clear();
        out.reserve(self.pixels.len() * 4);
        for &p in &self.pixels {
            let [r, g, b, a] = rgb555_to_888(p);
            out.extend_from_slice(&[a, b, g, r]);
        }
    }
}

impl Default for PixelBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl Backend for PixelBuffer {
    fn plot(&mut self, x: i32, y: i32, color: u16) {
        self.set_pixel(x, y, color);
    }

    fn line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: u16) {
        self.draw_line(x0, y0, x1, y1, color);
    }

    fn clear(&mut self) {
        self.fill(self.clear_color);
    }
}
