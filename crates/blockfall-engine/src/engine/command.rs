use std::{fmt, str::FromStr, time::Duration};

use crate::RotationDirection;

/// A discrete input accepted by [`GameSession::apply`](super::GameSession::apply).
///
/// Commands have a compact text form used by scripted runs:
///
/// | Command              | Token       |
/// |----------------------|-------------|
/// | `Start`              | `start`     |
/// | `MoveLeft`           | `left`      |
/// | `MoveRight`          | `right`     |
/// | `SoftDrop`           | `down`      |
/// | `HardDrop`           | `drop`      |
/// | `RotateCw`           | `cw`        |
/// | `RotateCcw`          | `ccw`       |
/// | `Tick(250ms)`        | `tick:250`  |
///
/// ```
/// use std::time::Duration;
///
/// use blockfall_engine::{Command, parse_script};
///
/// let commands = parse_script("start left cw tick:250 drop").unwrap();
/// assert_eq!(
///     commands,
///     [
///         Command::Start,
///         Command::MoveLeft,
///         Command::RotateCw,
///         Command::Tick(Duration::from_millis(250)),
///         Command::HardDrop,
///     ]
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum Command {
    Start,
    MoveLeft,
    MoveRight,
    SoftDrop,
    HardDrop,
    RotateCw,
    RotateCcw,
    /// Advances the drop timer by the given time.
    Tick(Duration),
}

impl Command {
    /// Returns the rotation direction of a rotate command.
    #[must_use]
    pub fn rotation(self) -> Option<RotationDirection> {
        match self {
            Command::RotateCw => Some(RotationDirection::Clockwise),
            Command::RotateCcw => Some(RotationDirection::CounterClockwise),
            _ => None,
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Start => f.write_str("start"),
            Command::MoveLeft => f.write_str("left"),
            Command::MoveRight => f.write_str("right"),
            Command::SoftDrop => f.write_str("down"),
            Command::HardDrop => f.write_str("drop"),
            Command::RotateCw => f.write_str("cw"),
            Command::RotateCcw => f.write_str("ccw"),
            Command::Tick(delta) => write!(f, "tick:{}", delta.as_millis()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("unknown command {token:?}")]
pub struct CommandParseError {
    token: String,
}

impl FromStr for Command {
    type Err = CommandParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let command = match s {
            "start" => Command::Start,
            "left" => Command::MoveLeft,
            "right" => Command::MoveRight,
            "down" => Command::SoftDrop,
            "drop" => Command::HardDrop,
            "cw" => Command::RotateCw,
            "ccw" => Command::RotateCcw,
            _ => {
                let millis = s
                    .strip_prefix("tick:")
                    .and_then(|ms| ms.parse::<u64>().ok())
                    .ok_or_else(|| CommandParseError {
                        token: s.to_owned(),
                    })?;
                Command::Tick(Duration::from_millis(millis))
            }
        };
        Ok(command)
    }
}

/// Parses whitespace-separated command tokens.
pub fn parse_script(script: &str) -> Result<Vec<Command>, CommandParseError> {
    script.split_whitespace().map(str::parse).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_parses_back() {
        let commands = [
            Command::Start,
            Command::MoveLeft,
            Command::MoveRight,
            Command::SoftDrop,
            Command::HardDrop,
            Command::RotateCw,
            Command::RotateCcw,
            Command::Tick(Duration::from_millis(16)),
        ];
        for command in commands {
            assert_eq!(command.to_string().parse::<Command>(), Ok(command));
        }
    }

    #[test]
    fn test_parse_errors() {
        assert!("jump".parse::<Command>().is_err());
        assert!("tick".parse::<Command>().is_err());
        assert!("tick:".parse::<Command>().is_err());
        assert!("tick:-5".parse::<Command>().is_err());
        assert!("LEFT".parse::<Command>().is_err());

        let err = parse_script("start left hop").unwrap_err();
        assert_eq!(err.to_string(), "unknown command \"hop\"");
    }

    #[test]
    fn test_empty_script() {
        assert_eq!(parse_script("  \n "), Ok(vec![]));
    }

    #[test]
    fn test_rotation() {
        assert_eq!(
            Command::RotateCw.rotation(),
            Some(RotationDirection::Clockwise)
        );
        assert_eq!(
            Command::RotateCcw.rotation(),
            Some(RotationDirection::CounterClockwise)
        );
        assert_eq!(Command::HardDrop.rotation(), None);
    }
}
