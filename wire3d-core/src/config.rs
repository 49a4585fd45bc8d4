/// Interpreter configuration
use crate::render::Color;

/// Step count used when a script does not give one.
pub const DEFAULT_STEPS: usize = 10;

/// Default sample counts for each curved primitive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TessellationConfig {
    pub circle_steps: usize,
    pub curve_steps: usize,
    pub sphere_steps: usize,
    pub torus_steps: usize,
}

impl TessellationConfig {
    /// Same step count for every primitive
    pub fn uniform(steps: usize) -> Self {
        Self {
            circle_steps: steps,
            curve_steps: steps,
            sphere_steps: steps,
            torus_steps: steps,
        }
    }
}

impl Default for TessellationConfig {
    fn default() -> Self {
        Self::uniform(DEFAULT_STEPS)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InterpreterConfig {
    pub tessellation: TessellationConfig,
    /// Color handed to the renderer on `display` and `save`
    pub line_color: Color,
    /// Reject unknown command tokens instead of skipping them
    pub strict: bool,
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        Self {
            tessellation: TessellationConfig::default(),
            line_color: Color::WHITE,
            strict: false,
        }
    }
}
