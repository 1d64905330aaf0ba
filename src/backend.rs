//! Drawing backend seam
//!
//! The pipeline only ever calls [`Backend::line`]. `plot`, `clear` and
//! `present` are there for the application's frame loop.

/// Pixel sink for pipeline output. Colors are packed RGB555.
pub trait Backend {
    fn plot(&mut self, x: i32, y: i32, color: u16);

    /// Draw a line between two pixel positions, both endpoints included.
    ///
    /// The default steps with Bresenham and calls `plot` for every pixel.
    /// A zero-length line plots a single pixel.
    fn line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: u16) {
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        let (mut x, mut y) = (x0, y0);

        loop {
            self.plot(x, y, color);
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

    fn clear(&mut self);

    fn present(&mut self) -> Result<(), String> {
        Ok(())
    }
}
