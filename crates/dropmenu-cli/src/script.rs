//! Input scripts: `;`-separated steps such as `hover:Submenu;click:Option 3`.

use dropmenu::Key;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// One scripted input.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// Move the pointer onto a row, searching from the deepest popup
    Hover(String),
    /// Move onto a row and press it
    Click(String),
    /// Press a key
    Key(Key),
    /// Scroll the popup under the pointer by wheel notches
    Scroll(f32),
    /// Advance the settle timer by milliseconds
    Wait(u64),
    /// Press outside every popup
    Outside,
    /// Resize the container
    Resize(f32, f32),
}

/// Script parse failure.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScriptError {
    /// Step name not recognized
    #[error("unknown step '{0}'")]
    UnknownStep(String),
    /// Step needs an argument after `:`
    #[error("step '{0}' needs an argument")]
    MissingArgument(String),
    /// Argument could not be parsed
    #[error("invalid argument '{arg}' for step '{step}'")]
    InvalidArgument {
        /// Step name
        step: String,
        /// Offending argument
        arg: String,
    },
}

impl FromStr for Step {
    type Err = ScriptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, arg) = match s.split_once(':') {
            Some((name, arg)) => (name.trim(), Some(arg.trim())),
            None => (s.trim(), None),
        };
        let need = || arg.ok_or_else(|| ScriptError::MissingArgument(name.to_string()));
        let invalid = |arg: &str| ScriptError::InvalidArgument {
            step: name.to_string(),
            arg: arg.to_string(),
        };
        match name {
            "hover" => Ok(Self::Hover(need()?.to_string())),
            "click" => Ok(Self::Click(need()?.to_string())),
            "key" => {
                let arg = need()?;
                parse_key(arg).map(Self::Key).ok_or_else(|| invalid(arg))
            }
            "scroll" => {
                let arg = need()?;
                arg.parse().map(Self::Scroll).map_err(|_| invalid(arg))
            }
            "wait" => {
                let arg = need()?;
                arg.parse().map(Self::Wait).map_err(|_| invalid(arg))
            }
            "outside" => Ok(Self::Outside),
            "resize" => {
                let arg = need()?;
                let (w, h) = arg.split_once(',').ok_or_else(|| invalid(arg))?;
                match (w.trim().parse(), h.trim().parse()) {
                    (Ok(w), Ok(h)) => Ok(Self::Resize(w, h)),
                    _ => Err(invalid(arg)),
                }
            }
            other => Err(ScriptError::UnknownStep(other.to_string())),
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hover(label) => write!(f, "hover:{label}"),
            Self::Click(label) => write!(f, "click:{label}"),
            Self::Key(key) => write!(f, "key:{key:?}"),
            Self::Scroll(notches) => write!(f, "scroll:{notches}"),
            Self::Wait(ms) => write!(f, "wait:{ms}"),
            Self::Outside => write!(f, "outside"),
            Self::Resize(w, h) => write!(f, "resize:{w},{h}"),
        }
    }
}

fn parse_key(name: &str) -> Option<Key> {
    let key = match name.to_ascii_lowercase().as_str() {
        "escape" | "esc" => Key::Escape,
        "enter" | "return" => Key::Enter,
        "space" => Key::Space,
        "up" => Key::Up,
        "down" => Key::Down,
        "left" => Key::Left,
        "right" => Key::Right,
        "home" => Key::Home,
        "end" => Key::End,
        "pageup" => Key::PageUp,
        "pagedown" => Key::PageDown,
        "tab" => Key::Tab,
        _ => return None,
    };
    Some(key)
}

/// Parse a whole script. Empty segments are skipped.
pub fn parse_script(script: &str) -> Result<Vec<Step>, ScriptError> {
    script
        .split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::parse)
        .collect()
}
