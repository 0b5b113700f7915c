//! Inbound commands for the standalone daemon.
//!
//! One command per line:
//!
//! | Line | Effect |
//! |------|--------|
//! | `port <device>/<port> up` | enable a port |
//! | `port <device>/<port> down` | disable a port |
//! | `links` | dump the link table |
//! | `down` | dump the down-link set |
//! | `device <device>` | show a device and its ports |
//! | `role <device> master\|standby\|none` | deliver a mastership role |
//! | `quit` | stop the daemon |
//!
//! Blank lines and lines starting with `#` are ignored.

use std::str::FromStr;

use synthtopo_types::{ConnectPoint, DeviceId, MastershipRole};
use thiserror::Error;

/// A parsed command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Administrative port enable/disable.
    PortState {
        connect_point: ConnectPoint,
        enable: bool,
    },
    ShowLinks,
    ShowDownLinks,
    ShowDevice(DeviceId),
    Role {
        device_id: DeviceId,
        role: MastershipRole,
    },
    Quit,
}

/// Errors from parsing a command line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandParseError {
    #[error("unknown command '{0}'")]
    UnknownCommand(String),

    #[error("usage: port <device>/<port> up|down")]
    Usage,

    #[error("invalid connect point '{0}'")]
    InvalidConnectPoint(String),

    #[error("invalid port state '{0}' (expected up or down)")]
    InvalidState(String),

    #[error("invalid device id '{0}'")]
    InvalidDevice(String),

    #[error("invalid mastership role '{0}' (expected master, standby or none)")]
    InvalidRole(String),

    #[error("usage: {0}")]
    Missing(&'static str),
}

impl Command {
    /// Parses a line; `Ok(None)` for blank lines and comments.
    pub fn parse_line(line: &str) -> Result<Option<Command>, CommandParseError> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(None);
        }
        line.parse().map(Some)
    }
}

impl FromStr for Command {
    type Err = CommandParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut words = s.split_whitespace();
        let Some(verb) = words.next() else {
            return Err(CommandParseError::UnknownCommand(String::new()));
        };

        let command = match verb.to_lowercase().as_str() {
            "port" => {
                let (Some(cp), Some(state), None) = (words.next(), words.next(), words.next())
                else {
                    return Err(CommandParseError::Usage);
                };
                let connect_point = cp
                    .parse::<ConnectPoint>()
                    .map_err(|_| CommandParseError::InvalidConnectPoint(cp.to_string()))?;
                let enable = match state.to_lowercase().as_str() {
                    "up" | "enable" => true,
                    "down" | "disable" => false,
                    _ => return Err(CommandParseError::InvalidState(state.to_string())),
                };
                return Ok(Command::PortState {
                    connect_point,
                    enable,
                });
            }
            "device" => {
                let id = words.next().ok_or(CommandParseError::Missing("device <device>"))?;
                Command::ShowDevice(parse_device(id)?)
            }
            "role" => {
                let usage = CommandParseError::Missing("role <device> master|standby|none");
                let (Some(id), Some(role)) = (words.next(), words.next()) else {
                    return Err(usage);
                };
                Command::Role {
                    device_id: parse_device(id)?,
                    role: role
                        .parse()
                        .map_err(|_| CommandParseError::InvalidRole(role.to_string()))?,
                }
            }
            "links" => Command::ShowLinks,
            "down" => Command::ShowDownLinks,
            "quit" | "exit" => Command::Quit,
            other => return Err(CommandParseError::UnknownCommand(other.to_string())),
        };

        match words.next() {
            None => Ok(command),
            Some(_) => Err(CommandParseError::UnknownCommand(s.to_string())),
        }
    }
}

fn parse_device(id: &str) -> Result<DeviceId, CommandParseError> {
    id.parse()
        .map_err(|_| CommandParseError::InvalidDevice(id.to_string()))
}
