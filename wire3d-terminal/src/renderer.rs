/// Raster surface and line rasterizer for terminal and file output
use crossterm::{
    style::{Color as TermColor, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use std::io::{self, Write};
use std::path::Path;
use wire3d_core::{Color, EdgeList};

/// Character ramp by lit-pixel coverage of a terminal cell (empty to full)
const COVERAGE_RAMP: &[char] = &[' ', '.', ':', '+', '#', '@'];

/// Fixed-size RGB pixel grid. Row 0 is the top of the image.
#[derive(Debug, Clone, PartialEq)]
pub struct Raster {
    width: usize,
    height: usize,
    background: Color,
    pixels: Vec<Color>,
}

impl Raster {
    pub fn new(width: usize, height: usize, background: Color) -> Self {
        Self {
            width,
            height,
            background,
            pixels: vec![background; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Pixel at image coordinates (row 0 at the top)
    pub fn pixel(&self, x: usize, y: usize) -> Option<Color> {
        (x < self.width && y < self.height).then(|| self.pixels[y * self.width + x])
    }

    /// Plot in scene coordinates: +y is up, so the row is flipped.
    /// Points off the surface are clipped.
    pub fn plot(&mut self, x: i64, y: i64, color: Color) {
        let row = self.height as i64 - 1 - y;
        if x < 0 || row < 0 || x >= self.width as i64 || row >= self.height as i64 {
            return;
        }
        self.pixels[row as usize * self.width + x as usize] = color;
    }

    /// Bresenham line between two scene-coordinate pixels, all octants
    pub fn draw_line(&mut self, x0: i64, y0: i64, x1: i64, y1: i64, color: Color) {
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

    /// Orthographic projection: z is dropped and x/y truncate to pixels.
    /// Segments are clipped to the surface first, so Bresenham only walks
    /// visible pixels.
    pub fn draw_edges(&mut self, edges: &EdgeList, color: Color) {
        for edge in edges {
            let segment = (edge.start.x, edge.start.y, edge.end.x, edge.end.y);
            let Some((x0, y0, x1, y1)) = self.clip_segment(segment) else {
                log::trace!("skipping off-surface edge {segment:?}");
                continue;
            };
            self.draw_line(x0 as i64, y0 as i64, x1 as i64, y1 as i64, color);
        }
    }

    /// Cohen-Sutherland clip of a scene-space segment to
    /// `[0, width-1] x [0, height-1]`.
    ///
    /// `None` when the segment misses the surface or has a non-finite
    /// coordinate. Clipped endpoints land exactly on the crossed boundary, so
    /// a horizontal edge spanning +-1e19 still keeps its row.
    fn clip_segment(&self, segment: (f64, f64, f64, f64)) -> Option<(f64, f64, f64, f64)> {
        const LEFT: u8 = 1;
        const RIGHT: u8 = 2;
        const BOTTOM: u8 = 4;
        const TOP: u8 = 8;

        if self.width == 0 || self.height == 0 {
            return None;
        }
        let (mut x0, mut y0, mut x1, mut y1) = segment;
        if ![x0, y0, x1, y1, x1 - x0, y1 - y0].iter().all(|v| v.is_finite()) {
            return None;
        }

        let (max_x, max_y) = ((self.width - 1) as f64, (self.height - 1) as f64);
        let outcode = |x: f64, y: f64| {
            let mut code = 0;
            if x < 0.0 {
                code |= LEFT;
            } else if x > max_x {
                code |= RIGHT;
            }
            if y < 0.0 {
                code |= BOTTOM;
            } else if y > max_y {
                code |= TOP;
            }
            code
        };

        let mut c0 = outcode(x0, y0);
        let mut c1 = outcode(x1, y1);
        // Each pass moves one endpoint onto a boundary; four per endpoint is plenty.
        for _ in 0..8 {
            if c0 | c1 == 0 {
                return Some((x0, y0, x1, y1));
            }
            if c0 & c1 != 0 {
                return None;
            }
            let out = if c0 != 0 { c0 } else { c1 };
            let (dx, dy) = (x1 - x0, y1 - y0);
            // The ratios stay in [0, 1], so the products cannot overflow.
            let (x, y) = if out & TOP != 0 {
                (x0 + dx * ((max_y - y0) / dy), max_y)
            } else if out & BOTTOM != 0 {
                (x0 + dx * (-y0 / dy), 0.0)
            } else if out & RIGHT != 0 {
                (max_x, y0 + dy * ((max_x - x0) / dx))
            } else {
                (0.0, y0 + dy * (-x0 / dx))
            };
            if out == c0 {
                (x0, y0) = (x, y);
                c0 = outcode(x0, y0);
            } else {
                (x1, y1) = (x, y);
                c1 = outcode(x1, y1);
            }
        }
        None
    }

    /// Downsample into `cols` x `rows` terminal cells and write them out
    pub fn draw<W: Write>(&self, writer: &mut W, cols: usize, rows: usize) -> io::Result<()> {
        let cols = cols.clamp(1, self.width.max(1));
        let rows = rows.clamp(1, self.height.max(1));

        for row in 0..rows {
            let y_range = (row * self.height / rows)..((row + 1) * self.height / rows);
            for col in 0..cols {
                let x_range = (col * self.width / cols)..((col + 1) * self.width / cols);

                let mut lit = 0;
                let mut total = 0;
                let mut color = self.background;
                for y in y_range.clone() {
                    for x in x_range.clone() {
                        total += 1;
                        let p = self.pixels[y * self.width + x];
                        if p != self.background {
                            lit += 1;
                            color = p;
                        }
                    }
                }

                let c = if lit == 0 {
                    ' '
                } else {
                    // any lit pixel shows at least the first visible glyph
                    let idx = 1 + lit * (COVERAGE_RAMP.len() - 2) / total.max(1);
                    COVERAGE_RAMP[idx.min(COVERAGE_RAMP.len() - 1)]
                };

                writer.queue(SetForegroundColor(TermColor::Rgb {
                    r: color.r,
                    g: color.g,
                    b: color.b,
                }))?;
                writer.queue(Print(c))?;
            }
            writer.queue(Print('\n'))?;
        }
        writer.queue(ResetColor)?;
        Ok(())
    }

    /// Write an image file. The format follows the extension, PNG otherwise.
    pub fn save(&self, path: &Path) -> io::Result<()> {
        let img = image::RgbImage::from_fn(self.width as u32, self.height as u32, |x, y| {
            let p = self.pixels[y as usize * self.width + x as usize];
            image::Rgb([p.r, p.g, p.b])
        });
        let format = image::ImageFormat::from_path(path).unwrap_or(image::ImageFormat::Png);
        img.save_with_format(path, format).map_err(io::Error::other)
    }
}
