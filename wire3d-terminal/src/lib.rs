/// Terminal and image-file renderer for wire3d scripts
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute, queue,
    style::{Color as TermColor, Print, ResetColor, SetForegroundColor},
    terminal,
};
use std::io::{self, stdout, Write};
use std::path::Path;
use wire3d_core::{Color, EdgeList, Renderer};

pub mod logging;
pub mod renderer;

pub use renderer::Raster;

/// Fallback terminal size when stdout is not a terminal
const FALLBACK_TERMINAL: (u16, u16) = (80, 40);

/// Surface size and presentation options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderConfig {
    pub width: usize,
    pub height: usize,
    pub background: Color,
    /// Show `display` output on the alternate screen and wait for a key
    pub interactive: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 500,
            height: 500,
            background: Color::BLACK,
            interactive: false,
        }
    }
}

/// Renderer that rasterizes into a [`Raster`], prints it to the terminal on
/// `display` and writes image files on `save`
pub struct TerminalRenderer {
    config: RenderConfig,
    frames_shown: u32,
}

impl TerminalRenderer {
    pub fn new(config: RenderConfig) -> Self {
        Self {
            config,
            frames_shown: 0,
        }
    }

    pub fn frames_shown(&self) -> u32 {
        self.frames_shown
    }

    /// Terminal cells for the raster, keeping its aspect with 2:1 cells
    fn cell_grid(&self, raster: &Raster) -> (usize, usize) {
        let (cols, rows) = terminal::size().unwrap_or(FALLBACK_TERMINAL);
        let max_cols = cols.max(1) as usize;
        let max_rows = (rows.max(3) - 2) as usize;

        let aspect = raster.height() as f64 / raster.width().max(1) as f64 / 2.0;
        let mut out_cols = max_cols;
        let mut out_rows = (out_cols as f64 * aspect).round().max(1.0) as usize;
        if out_rows > max_rows {
            out_rows = max_rows;
            out_cols = ((out_rows as f64 / aspect).round() as usize).clamp(1, max_cols);
        }
        (out_cols, out_rows)
    }

    fn show_inline(&self, raster: &Raster) -> io::Result<()> {
        let (cols, rows) = self.cell_grid(raster);
        let mut stdout = stdout();
        raster.draw(&mut stdout, cols, rows)?;
        stdout.flush()
    }

    fn show_interactive(&self, raster: &Raster) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;

        let result = self.present(raster);

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(stdout(), terminal::LeaveAlternateScreen, cursor::Show)?;

        result
    }

    fn present(&self, raster: &Raster) -> io::Result<()> {
        let (cols, rows) = self.cell_grid(raster);

        // Raw mode does not translate '\n', so rows are positioned explicitly.
        let mut frame = Vec::new();
        raster.draw(&mut frame, cols, rows)?;
        let text = String::from_utf8_lossy(&frame);

        let mut stdout = stdout();
        queue!(stdout, terminal::Clear(terminal::ClearType::All))?;
        for (row, line) in text.split('\n').enumerate() {
            queue!(stdout, cursor::MoveTo(0, row as u16 + 1), Print(line))?;
        }
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            SetForegroundColor(TermColor::Yellow),
            Print(format!(
                "wire3d | frame {} | {}x{} | Press Q, Esc or Enter to continue",
                self.frames_shown,
                raster.width(),
                raster.height()
            )),
            ResetColor
        )?;
        stdout.flush()?;

        loop {
            if let Event::Key(KeyEvent { code, kind, .. }) = event::read()? {
                if kind != KeyEventKind::Press {
                    continue;
                }
                if matches!(code, KeyCode::Char('q') | KeyCode::Esc | KeyCode::Enter) {
                    return Ok(());
                }
            }
        }
    }
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self::new(RenderConfig::default())
    }
}

impl Renderer for TerminalRenderer {
    type Surface = Raster;

    fn clear_surface(&mut self) -> Raster {
        Raster::new(self.config.width, self.config.height, self.config.background)
    }

    fn draw_lines(&mut self, surface: &mut Raster, edges: &EdgeList, color: Color) {
        log::debug!("rasterizing {} edges", edges.len());
        surface.draw_edges(edges, color);
    }

    fn display(&mut self, surface: &Raster) -> io::Result<()> {
        self.frames_shown += 1;
        if self.config.interactive {
            self.show_interactive(surface)
        } else {
            self.show_inline(surface)
        }
    }

    fn save_to_file(&mut self, surface: &Raster, name: &str) -> io::Result<()> {
        let path = Path::new(name);
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        surface.save(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wire3d_core::{Interpreter, Point3};

    #[test]
    fn test_clear_surface_uses_config() {
        let mut renderer = TerminalRenderer::new(RenderConfig {
            width: 30,
            height: 20,
            ..RenderConfig::default()
        });
        let surface = renderer.clear_surface();
        assert_eq!(surface.width(), 30);
        assert_eq!(surface.height(), 20);
        assert_eq!(surface.pixel(0, 0), Some(Color::BLACK));
    }

    #[test]
    fn test_draw_lines_into_surface() {
        let mut renderer = TerminalRenderer::default();
        let mut surface = renderer.clear_surface();
        let mut edges = EdgeList::new();
        edges.add_edge(Point3::new(10.0, 10.0, 0.0), Point3::new(20.0, 10.0, 0.0));
        renderer.draw_lines(&mut surface, &edges, Color::WHITE);
        assert_eq!(surface.pixel(15, 489), Some(Color::WHITE));
    }

    #[test]
    fn test_script_save_writes_image() {
        let dir = std::env::temp_dir().join(format!("wire3d-term-{}", std::process::id()));
        let file = dir.join("nested").join("box.png");
        let script = format!("box\n10 40 0 20 20 20\nsave\n{}\n", file.display());

        let renderer = TerminalRenderer::new(RenderConfig {
            width: 50,
            height: 50,
            ..RenderConfig::default()
        });
        let mut interp = Interpreter::new(renderer);
        interp.run(script.as_bytes()).unwrap();

        let img = image::open(&file).unwrap().to_rgb8();
        assert_eq!(img.dimensions(), (50, 50));
        // top-left corner of the front face: scene (10, 40) is row 9
        assert_eq!(img.get_pixel(10, 9).0, [255, 255, 255]);
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
