/// wire3d - run a scene script and draw its edges
///
/// Reads the script named on the command line (or standard input) and
/// executes it. `display` prints the current edges to the terminal; `save`
/// writes an image file whose format follows the extension.
///
/// Usage:
///   wire3d scene.mdl
///   wire3d --interactive --steps 24 scene.mdl
///   cat scene.mdl | wire3d
use anyhow::Context as _;
use clap::Parser;
use wire3d_core::{
    open_script, Color, Interpreter, InterpreterConfig, TessellationConfig,
};
use wire3d_terminal::logging::{init_logging, LoggingConfig};
use wire3d_terminal::{RenderConfig, TerminalRenderer};

#[derive(Parser, Debug)]
#[command(name = "wire3d", version, about = "Interpret a wireframe scene script")]
struct Cli {
    /// Script to run; `stdin` or `-` reads standard input.
    #[arg(default_value = "stdin")]
    script: String,

    /// Surface width in pixels.
    #[arg(long, default_value_t = 500)]
    width: usize,

    /// Surface height in pixels.
    #[arg(long, default_value_t = 500)]
    height: usize,

    /// Default step count for every curved primitive.
    #[arg(long, default_value_t = wire3d_core::config::DEFAULT_STEPS)]
    steps: usize,

    /// Step count for circles (overrides --steps).
    #[arg(long)]
    circle_steps: Option<usize>,

    /// Step count for hermite and bezier curves (overrides --steps).
    #[arg(long)]
    curve_steps: Option<usize>,

    /// Step count for spheres (overrides --steps).
    #[arg(long)]
    sphere_steps: Option<usize>,

    /// Step count for tori (overrides --steps).
    #[arg(long)]
    torus_steps: Option<usize>,

    /// Fail on unknown commands instead of skipping them.
    #[arg(long)]
    strict: bool,

    /// Show each `display` on the alternate screen and wait for a key.
    #[arg(long)]
    interactive: bool,

    /// Log filter, e.g. `info` or `wire3d_core=debug`.
    #[arg(long)]
    log: Option<String>,
}

impl Cli {
    fn interpreter_config(&self) -> InterpreterConfig {
        let tessellation = TessellationConfig {
            circle_steps: self.circle_steps.unwrap_or(self.steps),
            curve_steps: self.curve_steps.unwrap_or(self.steps),
            sphere_steps: self.sphere_steps.unwrap_or(self.steps),
            torus_steps: self.torus_steps.unwrap_or(self.steps),
        };
        InterpreterConfig {
            tessellation,
            line_color: Color::WHITE,
            strict: self.strict,
        }
    }

    fn render_config(&self) -> RenderConfig {
        RenderConfig {
            width: self.width,
            height: self.height,
            background: Color::BLACK,
            interactive: self.interactive,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(LoggingConfig {
        env_filter: cli.log.clone(),
        ..LoggingConfig::default()
    });

    let source =
        open_script(&cli.script).with_context(|| format!("open script '{}'", cli.script))?;

    let renderer = TerminalRenderer::new(cli.render_config());
    let mut interpreter = Interpreter::with_config(renderer, cli.interpreter_config());
    let halt = interpreter
        .run(source)
        .with_context(|| format!("run script '{}'", cli.script))?;

    log::info!(
        "{halt:?}: {} edges, {} frames displayed",
        interpreter.session().edges().len(),
        interpreter.renderer().frames_shown()
    );
    Ok(())
}
