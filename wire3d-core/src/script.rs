/// Line-oriented script reader and argument line parser
///
/// A script alternates command lines and, for commands that need them, a
/// single argument line:
///
/// ```text
/// # comment
/// scale
/// 2 2 2
/// rotate
/// z 45
/// apply
/// ```
use std::fs::File;
use std::io::{self, BufRead, BufReader};

use nalgebra::{Point3, Vector3};
use nom::{
    character::complete::{satisfy, space0, space1},
    combinator::all_consuming,
    multi::separated_list0,
    number::complete::double,
    sequence::{delimited, separated_pair},
    IResult,
};

use crate::error::{Error, Result};
use crate::primitives::{CurveKind, MAX_STEPS};
use crate::transform::Axis;

/// Recognized command tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    Line,
    Circle,
    Hermite,
    Bezier,
    Box,
    Sphere,
    Torus,
    Scale,
    Move,
    Rotate,
    Ident,
    Apply,
    Display,
    Save,
    Clear,
    Quit,
}

impl Keyword {
    pub fn from_token(token: &str) -> Option<Self> {
        let keyword = match token {
            "line" => Keyword::Line,
            "circle" => Keyword::Circle,
            "hermite" => Keyword::Hermite,
            "bezier" => Keyword::Bezier,
            "box" => Keyword::Box,
            "sphere" => Keyword::Sphere,
            "torus" => Keyword::Torus,
            "scale" => Keyword::Scale,
            "move" | "translate" => Keyword::Move,
            "rotate" => Keyword::Rotate,
            "ident" => Keyword::Ident,
            "apply" => Keyword::Apply,
            "display" => Keyword::Display,
            "save" => Keyword::Save,
            "clear" => Keyword::Clear,
            "quit" => Keyword::Quit,
            _ => return None,
        };
        Some(keyword)
    }

    pub fn name(self) -> &'static str {
        match self {
            Keyword::Line => "line",
            Keyword::Circle => "circle",
            Keyword::Hermite => "hermite",
            Keyword::Bezier => "bezier",
            Keyword::Box => "box",
            Keyword::Sphere => "sphere",
            Keyword::Torus => "torus",
            Keyword::Scale => "scale",
            Keyword::Move => "move",
            Keyword::Rotate => "rotate",
            Keyword::Ident => "ident",
            Keyword::Apply => "apply",
            Keyword::Display => "display",
            Keyword::Save => "save",
            Keyword::Clear => "clear",
            Keyword::Quit => "quit",
        }
    }

    /// Whether the next line holds this command's arguments
    pub fn takes_arguments(self) -> bool {
        !matches!(
            self,
            Keyword::Ident | Keyword::Apply | Keyword::Display | Keyword::Clear | Keyword::Quit
        )
    }
}

/// A fully parsed command, ready to execute
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Line {
        start: Point3<f64>,
        end: Point3<f64>,
    },
    Circle {
        center: Point3<f64>,
        radius: f64,
        steps: Option<usize>,
    },
    Curve {
        kind: CurveKind,
        inputs: [Point3<f64>; 4],
        steps: Option<usize>,
    },
    Box {
        corner: Point3<f64>,
        width: f64,
        height: f64,
        depth: f64,
    },
    Sphere {
        center: Point3<f64>,
        radius: f64,
        steps: Option<usize>,
    },
    Torus {
        center: Point3<f64>,
        tube_radius: f64,
        ring_radius: f64,
        steps: Option<usize>,
    },
    Scale(Vector3<f64>),
    Move(Vector3<f64>),
    Rotate {
        axis: Axis,
        degrees: f64,
    },
    Ident,
    Apply,
    Display,
    Save(String),
    Clear,
    Quit,
}

impl Command {
    /// Build a command from its keyword and argument line.
    ///
    /// `args` must be `Some` exactly when [`Keyword::takes_arguments`] holds.
    /// `line` is the 1-based position of the argument line, used in errors.
    pub fn parse(keyword: Keyword, args: Option<&str>, line: usize) -> Result<Self> {
        let name = keyword.name();
        let args = match (keyword.takes_arguments(), args) {
            (false, _) => "",
            (true, Some(args)) => args,
            (true, None) => return Err(Error::malformed(line, name, "missing argument line")),
        };

        let command = match keyword {
            Keyword::Line => {
                let [x0, y0, z0, x1, y1, z1] = exact::<6>(line, name, args)?;
                Command::Line {
                    start: Point3::new(x0, y0, z0),
                    end: Point3::new(x1, y1, z1),
                }
            }
            Keyword::Circle => {
                let ([cx, cy, cz, r], steps) = with_optional_steps::<4>(line, name, args)?;
                Command::Circle {
                    center: Point3::new(cx, cy, cz),
                    radius: r,
                    steps,
                }
            }
            Keyword::Hermite | Keyword::Bezier => {
                let (v, steps) = with_optional_steps::<8>(line, name, args)?;
                let kind = if keyword == Keyword::Hermite {
                    CurveKind::Hermite
                } else {
                    CurveKind::Bezier
                };
                Command::Curve {
                    kind,
                    inputs: [
                        Point3::new(v[0], v[1], 0.0),
                        Point3::new(v[2], v[3], 0.0),
                        Point3::new(v[4], v[5], 0.0),
                        Point3::new(v[6], v[7], 0.0),
                    ],
                    steps,
                }
            }
            Keyword::Box => {
                let [x, y, z, width, height, depth] = exact::<6>(line, name, args)?;
                Command::Box {
                    corner: Point3::new(x, y, z),
                    width,
                    height,
                    depth,
                }
            }
            Keyword::Sphere => {
                let ([cx, cy, cz, r], steps) = with_optional_steps::<4>(line, name, args)?;
                Command::Sphere {
                    center: Point3::new(cx, cy, cz),
                    radius: r,
                    steps,
                }
            }
            Keyword::Torus => {
                let ([cx, cy, cz, r0, r1], steps) = with_optional_steps::<5>(line, name, args)?;
                Command::Torus {
                    center: Point3::new(cx, cy, cz),
                    tube_radius: r0,
                    ring_radius: r1,
                    steps,
                }
            }
            Keyword::Scale => Command::Scale(Vector3::from(exact::<3>(line, name, args)?)),
            Keyword::Move => Command::Move(Vector3::from(exact::<3>(line, name, args)?)),
            Keyword::Rotate => {
                let (_, (axis_char, degrees)) = rotation_fields(args).map_err(|_| {
                    Error::malformed(line, name, format!("expected `<axis> <degrees>`, got {args:?}"))
                })?;
                let axis = Axis::from_char(axis_char).ok_or(Error::UnsupportedRotationAxis {
                    line,
                    axis: axis_char,
                })?;
                Command::Rotate { axis, degrees }
            }
            Keyword::Save => {
                let file = args.trim();
                if file.is_empty() {
                    return Err(Error::malformed(line, name, "missing file name"));
                }
                Command::Save(file.to_string())
            }
            Keyword::Ident => Command::Ident,
            Keyword::Apply => Command::Apply,
            Keyword::Display => Command::Display,
            Keyword::Clear => Command::Clear,
            Keyword::Quit => Command::Quit,
        };
        Ok(command)
    }
}

fn number_list(input: &str) -> IResult<&str, Vec<f64>> {
    all_consuming(delimited(space0, separated_list0(space1, double), space0))(input)
}

fn rotation_fields(input: &str) -> IResult<&str, (char, f64)> {
    all_consuming(delimited(
        space0,
        separated_pair(satisfy(|c| !c.is_whitespace()), space1, double),
        space0,
    ))(input)
}

fn numbers(line: usize, command: &'static str, input: &str) -> Result<Vec<f64>> {
    number_list(input).map(|(_, values)| values).map_err(|_| {
        Error::malformed(
            line,
            command,
            format!("expected whitespace-separated numbers, got {input:?}"),
        )
    })
}

fn exact<const N: usize>(line: usize, command: &'static str, input: &str) -> Result<[f64; N]> {
    let values = numbers(line, command, input)?;
    if values.len() != N {
        return Err(Error::malformed(
            line,
            command,
            format!("expected {N} numbers, found {}", values.len()),
        ));
    }
    let mut fields = [0.0; N];
    fields.copy_from_slice(&values);
    Ok(fields)
}

/// `N` required fields plus an optional trailing step count
fn with_optional_steps<const N: usize>(
    line: usize,
    command: &'static str,
    input: &str,
) -> Result<([f64; N], Option<usize>)> {
    let values = numbers(line, command, input)?;
    let steps = match values.len() {
        n if n == N => None,
        n if n == N + 1 => Some(step_count(line, command, values[N])?),
        n => {
            return Err(Error::malformed(
                line,
                command,
                format!("expected {N} or {} numbers, found {n}", N + 1),
            ))
        }
    };
    let mut fields = [0.0; N];
    fields.copy_from_slice(&values[..N]);
    Ok((fields, steps))
}

fn step_count(line: usize, command: &'static str, raw: f64) -> Result<usize> {
    if !(raw.is_finite() && raw >= 0.0 && raw.fract() == 0.0) {
        return Err(Error::malformed(
            line,
            command,
            format!("step count must be a whole number, got {raw}"),
        ));
    }
    // Compared as f64 so huge values never reach the integer cast.
    if raw > MAX_STEPS as f64 {
        return Err(Error::malformed(
            line,
            command,
            format!("step count must be at most {MAX_STEPS}, got {raw}"),
        ));
    }
    Ok(raw as usize)
}

/// One logical unit read from a script
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Command { line: usize, command: Command },
    /// A command line whose token is not in the vocabulary
    Unknown { line: usize, token: String },
}

/// Reads statements from a script source, tracking line numbers
pub struct ScriptReader<R> {
    lines: io::Lines<R>,
    line_no: usize,
}

impl<R: BufRead> ScriptReader<R> {
    pub fn new(source: R) -> Self {
        Self {
            lines: source.lines(),
            line_no: 0,
        }
    }

    /// Number of physical lines consumed so far
    pub fn line_no(&self) -> usize {
        self.line_no
    }

    fn read_line(&mut self) -> Result<Option<String>> {
        match self.lines.next() {
            Some(Ok(text)) => {
                self.line_no += 1;
                Ok(Some(text.trim().to_string()))
            }
            Some(Err(source)) => Err(Error::UnreadableSource { source }),
            None => Ok(None),
        }
    }

    /// Next statement, or `None` at end of input.
    ///
    /// Blank lines and `#` comments are skipped. A command that takes
    /// arguments consumes exactly one further line.
    pub fn next_statement(&mut self) -> Result<Option<Statement>> {
        loop {
            let Some(text) = self.read_line()? else {
                return Ok(None);
            };
            if text.is_empty() || text.starts_with('#') {
                continue;
            }

            let line = self.line_no;
            let Some(keyword) = Keyword::from_token(&text) else {
                return Ok(Some(Statement::Unknown { line, token: text }));
            };

            let command = if keyword.takes_arguments() {
                let args = self.read_line()?;
                Command::parse(keyword, args.as_deref(), line + 1)?
            } else {
                Command::parse(keyword, None, line)?
            };
            return Ok(Some(Statement::Command { line, command }));
        }
    }
}

/// Open a script by name; `stdin` or `-` read standard input
pub fn open_script(name: &str) -> Result<Box<dyn BufRead>> {
    if name == "stdin" || name == "-" {
        return Ok(Box::new(io::stdin().lock()));
    }
    let file = File::open(name).map_err(|source| Error::UnreadableSource { source })?;
    Ok(Box::new(BufReader::new(file)))
}
