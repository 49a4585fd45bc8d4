/// wire3d Core Library - Script interpreter and wireframe geometry
///
/// This library turns a line-oriented scene script into a list of 3D edges:
/// transform composition, tessellation of curved primitives, and the command
/// loop that drives a pluggable renderer.

pub mod config;
pub mod error;
pub mod geometry;
pub mod interpreter;
pub mod primitives;
pub mod render;
pub mod script;
pub mod transform;

// Re-export commonly used types
pub use config::{InterpreterConfig, TessellationConfig};
pub use error::{Error, Result};
pub use geometry::{Edge, EdgeList};
pub use interpreter::{Halt, Interpreter, Session, State};
pub use nalgebra::{Matrix4, Point3};
pub use primitives::CurveKind;
pub use render::{Color, Renderer};
pub use script::{open_script, Command, Keyword};
pub use transform::{Axis, Transform};
