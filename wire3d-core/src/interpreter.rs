/// Script interpreter: session state and command dispatch
use std::io::BufRead;

use nalgebra::Matrix4;

use crate::config::InterpreterConfig;
use crate::error::{Error, Result};
use crate::geometry::EdgeList;
use crate::primitives;
use crate::render::Renderer;
use crate::script::{Command, ScriptReader, Statement};
use crate::transform::Transform;

/// Interpreter loop state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Running,
    Halted,
}

/// Why a run stopped without error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Halt {
    Quit,
    EndOfInput,
}

/// The current transform and edge list owned by one script run
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    transform: Matrix4<f64>,
    edges: EdgeList,
}

impl Session {
    pub fn new() -> Self {
        Self {
            transform: Transform::identity(),
            edges: EdgeList::new(),
        }
    }

    pub fn transform(&self) -> &Matrix4<f64> {
        &self.transform
    }

    pub fn edges(&self) -> &EdgeList {
        &self.edges
    }

    pub fn edges_mut(&mut self) -> &mut EdgeList {
        &mut self.edges
    }

    pub fn reset_transform(&mut self) {
        self.transform = Transform::identity();
    }

    /// Compose `m` onto the current transform; see [`Transform::compose`]
    pub fn compose(&mut self, m: &Matrix4<f64>) {
        self.transform = Transform::compose(m, &self.transform);
    }

    /// Multiply the current transform into every edge. The transform itself is kept.
    pub fn apply(&mut self) {
        self.edges.apply_transform(&self.transform);
    }

    pub fn clear_edges(&mut self) {
        self.edges.clear();
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

/// Executes scripts against a session, handing edges to `R` on `display`/`save`
pub struct Interpreter<R: Renderer> {
    session: Session,
    renderer: R,
    config: InterpreterConfig,
    state: State,
}

impl<R: Renderer> Interpreter<R> {
    pub fn new(renderer: R) -> Self {
        Self::with_config(renderer, InterpreterConfig::default())
    }

    pub fn with_config(renderer: R, config: InterpreterConfig) -> Self {
        Self {
            session: Session::new(),
            renderer,
            config,
            state: State::Running,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn into_parts(self) -> (Session, R) {
        (self.session, self.renderer)
    }

    /// Run a whole script.
    ///
    /// The source is consumed and dropped before returning on every path.
    /// Errors are fatal: whatever earlier commands committed stays in the
    /// session, and nothing after the failing line runs.
    pub fn run<B: BufRead>(&mut self, source: B) -> Result<Halt> {
        self.state = State::Running;
        let mut reader = ScriptReader::new(source);

        let halt = loop {
            let statement = match reader.next_statement() {
                Ok(Some(statement)) => statement,
                Ok(None) => break Halt::EndOfInput,
                Err(err) => {
                    self.state = State::Halted;
                    return Err(err);
                }
            };

            let result = match statement {
                Statement::Command { line, command } => {
                    log::debug!("line {line}: {command:?}");
                    self.execute(command)
                }
                Statement::Unknown { line, token } => self.unknown(line, token),
            };

            match result {
                Ok(State::Running) => {}
                Ok(State::Halted) => break Halt::Quit,
                Err(err) => {
                    self.state = State::Halted;
                    return Err(err);
                }
            }
        };

        self.state = State::Halted;
        log::info!("script halted ({halt:?}) after {} lines", reader.line_no());
        Ok(halt)
    }

    fn unknown(&mut self, line: usize, token: String) -> Result<State> {
        if self.config.strict {
            return Err(Error::UnknownCommand { line, token });
        }
        log::warn!("line {line}: skipping unknown command `{token}`");
        Ok(State::Running)
    }

    /// Execute one parsed command
    pub fn execute(&mut self, command: Command) -> Result<State> {
        let steps = self.config.tessellation;
        let edges = self.session.edges_mut();

        match command {
            Command::Line { start, end } => primitives::add_line(edges, start, end),
            Command::Circle {
                center,
                radius,
                steps: n,
            } => primitives::add_circle(edges, center, radius, n.unwrap_or(steps.circle_steps))?,
            Command::Curve {
                kind,
                inputs,
                steps: n,
            } => primitives::add_curve(edges, inputs, n.unwrap_or(steps.curve_steps), kind)?,
            Command::Box {
                corner,
                width,
                height,
                depth,
            } => primitives::add_box(edges, corner, width, height, depth),
            Command::Sphere {
                center,
                radius,
                steps: n,
            } => primitives::add_sphere(edges, center, radius, n.unwrap_or(steps.sphere_steps))?,
            Command::Torus {
                center,
                tube_radius,
                ring_radius,
                steps: n,
            } => primitives::add_torus(
                edges,
                center,
                tube_radius,
                ring_radius,
                n.unwrap_or(steps.torus_steps),
            )?,
            Command::Scale(s) => self
                .session
                .compose(&Transform::scale_matrix(s.x, s.y, s.z)),
            Command::Move(t) => self
                .session
                .compose(&Transform::translation_matrix(t.x, t.y, t.z)),
            Command::Rotate { axis, degrees } => self
                .session
                .compose(&Transform::rotation_matrix(axis, degrees.to_radians())),
            Command::Ident => self.session.reset_transform(),
            Command::Apply => self.session.apply(),
            Command::Clear => self.session.clear_edges(),
            Command::Display => {
                let surface = self.draw();
                self.renderer
                    .display(&surface)
                    .map_err(|source| Error::collaborator("display", source))?;
            }
            Command::Save(name) => {
                let surface = self.draw();
                self.renderer
                    .save_to_file(&surface, &name)
                    .map_err(|source| Error::collaborator("save", source))?;
                log::info!("saved {name}");
            }
            Command::Quit => return Ok(State::Halted),
        }
        Ok(State::Running)
    }

    fn draw(&mut self) -> R::Surface {
        let mut surface = self.renderer.clear_surface();
        self.renderer
            .draw_lines(&mut surface, self.session.edges(), self.config.line_color);
        surface
    }
}
