/// Seam between the interpreter and whatever turns edges into pixels
use std::io;

use crate::geometry::EdgeList;

/// 8-bit RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Color = Color::new(255, 255, 255);
    pub const BLACK: Color = Color::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

/// Render collaborator driven by `display` and `save`.
///
/// Each call starts from [`Renderer::clear_surface`], draws the full edge
/// list once, and then presents or persists the result.
pub trait Renderer {
    type Surface;

    fn clear_surface(&mut self) -> Self::Surface;

    fn draw_lines(&mut self, surface: &mut Self::Surface, edges: &EdgeList, color: Color);

    fn display(&mut self, surface: &Self::Surface) -> io::Result<()>;

    fn save_to_file(&mut self, surface: &Self::Surface, name: &str) -> io::Result<()>;
}
