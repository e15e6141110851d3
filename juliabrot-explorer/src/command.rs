//! Textual navigation commands for the headless driver.

use std::fmt;
use std::str::FromStr;

use juliabrot_render::BrushKind;

use crate::explorer::Explorer;
use crate::state::RenderState;

/// One explorer command, parsed from forms like `in`, `julia:120,80` or
/// `rect:10,10,80,60`.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Left,
    Right,
    Up,
    Down,
    ZoomIn,
    ZoomOut,
    Undo,
    Reset,
    Julia { px: f64, py: f64 },
    Mandelbrot,
    Brush(BrushKind),
    Offset(f32),
    Iterations(u32),
    Rect { x: u32, y: u32, width: u32, height: u32 },
}

impl Command {
    /// Run the command. Returns the Julia seed label when one was produced.
    pub fn apply(&self, explorer: &mut Explorer) -> crate::Result<Option<String>> {
        let state: RenderState = match *self {
            Self::Left => explorer.move_left()?,
            Self::Right => explorer.move_right()?,
            Self::Up => explorer.move_up()?,
            Self::Down => explorer.move_down()?,
            Self::ZoomIn => explorer.zoom_in()?,
            Self::ZoomOut => explorer.zoom_out()?,
            Self::Undo => explorer.undo()?,
            Self::Reset => explorer.reset_view()?,
            Self::Julia { px, py } => return explorer.enable_julia(px, py),
            Self::Mandelbrot => explorer.disable_julia()?,
            Self::Brush(kind) => explorer.set_brush(kind)?,
            Self::Offset(offset) => explorer.set_color_offset(offset)?,
            Self::Iterations(n) => explorer.set_max_iterations(n)?,
            Self::Rect {
                x,
                y,
                width,
                height,
            } => explorer.zoom_into_rect(x, y, width, height)?,
        };
        tracing::debug!(command = %self, state = state.label(), "Command applied");
        Ok(None)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Left => f.write_str("left"),
            Self::Right => f.write_str("right"),
            Self::Up => f.write_str("up"),
            Self::Down => f.write_str("down"),
            Self::ZoomIn => f.write_str("in"),
            Self::ZoomOut => f.write_str("out"),
            Self::Undo => f.write_str("undo"),
            Self::Reset => f.write_str("reset"),
            Self::Julia { px, py } => write!(f, "julia:{px},{py}"),
            Self::Mandelbrot => f.write_str("mandelbrot"),
            Self::Brush(kind) => write!(f, "brush:{}", kind.label().to_lowercase()),
            Self::Offset(offset) => write!(f, "offset:{offset}"),
            Self::Iterations(n) => write!(f, "iterations:{n}"),
            Self::Rect {
                x,
                y,
                width,
                height,
            } => write!(f, "rect:{x},{y},{width},{height}"),
        }
    }
}

impl FromStr for Command {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, arg) = match s.split_once(':') {
            Some((name, arg)) => (name, Some(arg)),
            None => (s, None),
        };
        let command = match (name.to_ascii_lowercase().as_str(), arg) {
            ("left", None) => Self::Left,
            ("right", None) => Self::Right,
            ("up", None) => Self::Up,
            ("down", None) => Self::Down,
            ("in", None) => Self::ZoomIn,
            ("out", None) => Self::ZoomOut,
            ("undo", None) => Self::Undo,
            ("reset", None) => Self::Reset,
            ("mandelbrot", None) => Self::Mandelbrot,
            ("julia", Some(arg)) => {
                let [px, py] = numbers::<f64, 2>(arg)?;
                Self::Julia { px, py }
            }
            ("brush", Some(arg)) => Self::Brush(arg.parse()?),
            ("offset", Some(arg)) => {
                let [offset] = numbers::<f32, 1>(arg)?;
                Self::Offset(offset)
            }
            ("iterations", Some(arg)) => {
                let [n] = numbers::<u32, 1>(arg)?;
                Self::Iterations(n)
            }
            ("rect", Some(arg)) => {
                let [x, y, width, height] = numbers::<u32, 4>(arg)?;
                Self::Rect {
                    x,
                    y,
                    width,
                    height,
                }
            }
            _ => return Err(format!("unknown command '{s}'")),
        };
        Ok(command)
    }
}

/// Parse exactly `N` comma-separated numbers.
fn numbers<T: FromStr + Copy + Default, const N: usize>(arg: &str) -> Result<[T; N], String> {
    let parts: Vec<&str> = arg.split(',').map(str::trim).collect();
    if parts.len() != N {
        return Err(format!("expected {N} comma-separated values, got '{arg}'"));
    }
    let mut out = [T::default(); N];
    for (slot, part) in out.iter_mut().zip(parts) {
        *slot = part
            .parse()
            .map_err(|_| format!("'{part}' is not a valid number"))?;
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_form() {
        let cases = [
            ("left", Command::Left),
            ("RIGHT", Command::Right),
            ("up", Command::Up),
            ("down", Command::Down),
            ("in", Command::ZoomIn),
            ("out", Command::ZoomOut),
            ("undo", Command::Undo),
            ("reset", Command::Reset),
            ("mandelbrot", Command::Mandelbrot),
            ("julia:120,80.5", Command::Julia { px: 120.0, py: 80.5 }),
            ("brush:tropical", Command::Brush(BrushKind::Tropical)),
            ("offset:0.25", Command::Offset(0.25)),
            ("iterations:500", Command::Iterations(500)),
            (
                "rect:1, 2, 30, 40",
                Command::Rect {
                    x: 1,
                    y: 2,
                    width: 30,
                    height: 40,
                },
            ),
        ];
        for (text, expected) in cases {
            assert_eq!(text.parse::<Command>(), Ok(expected), "{text}");
        }
    }

    #[test]
    fn display_parses_back() {
        for command in [
            Command::Julia { px: 3.5, py: 4.0 },
            Command::Brush(BrushKind::Graydient),
            Command::Rect {
                x: 0,
                y: 5,
                width: 8,
                height: 6,
            },
        ] {
            assert_eq!(command.to_string().parse::<Command>(), Ok(command));
        }
    }

    #[test]
    fn rejects_malformed_commands() {
        for text in [
            "sideways",
            "left:1",
            "julia",
            "julia:1",
            "rect:1,2,3",
            "iterations:-4",
            "brush:plaid",
            "offset:abc",
        ] {
            assert!(text.parse::<Command>().is_err(), "{text}");
        }
    }
}
