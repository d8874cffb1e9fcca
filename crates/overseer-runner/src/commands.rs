//! Thin chat-command parsing.
//!
//! Text goes in, a typed [`Command`] with an addressing [`Target`] comes
//! out; everything interesting happens in the agent dispatch. Verbs are
//! accepted in English and Portuguese, matching the conventional zone
//! names.

use overseer_types::Direction;

/// Which agents a command addresses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// Every launched agent.
    All,
    /// The named agent only.
    Named(String),
}

/// A parsed player command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Enable or disable a profession by name.
    Profession {
        /// Role name (English or Portuguese).
        role: String,
        /// True to enable.
        on: bool,
    },
    /// Queue a craft order by item name or tier alias.
    Craft {
        /// Item name or alias.
        item: String,
        /// Units requested.
        amount: u32,
    },
    /// Mine a vein of the aliased ore in the given direction.
    Mine {
        /// Ore alias.
        ore: String,
        /// Digging direction.
        direction: Direction,
    },
    /// Walk to a named location.
    Goto {
        /// Location name.
        location: String,
    },
    /// Record the agent's position as a named place.
    SetLocation {
        /// Location name.
        name: String,
        /// Optional region width.
        width: Option<u32>,
        /// Optional region depth.
        depth: Option<u32>,
    },
    /// Report enabled roles and position.
    Status,
    /// Disable every role and cancel movement.
    Stop,
}

/// Parse one chat line into a target and a command.
///
/// Lines starting with `!name` address that agent (`!all` addresses
/// everyone); unprefixed lines address everyone.
pub fn parse(line: &str) -> Option<(Target, Command)> {
    let mut words = line.split_whitespace().peekable();
    let first = words.peek()?;

    let target = if let Some(name) = first.strip_prefix('!') {
        let name = name.to_ascii_lowercase();
        words.next();
        if name == "all" {
            Target::All
        } else {
            Target::Named(name)
        }
    } else {
        Target::All
    };

    let verb = words.next()?.to_ascii_lowercase();
    let command = match verb.as_str() {
        "profession" | "profissao" | "profiss\u{e3}o" => {
            let role = words.next()?.to_ascii_lowercase();
            let on = match words.next()?.to_ascii_lowercase().as_str() {
                "on" | "ligar" => true,
                "off" | "desligar" => false,
                _ => return None,
            };
            Command::Profession { role, on }
        }
        "craft" | "craftar" => {
            let item = words.next()?.to_owned();
            let amount = words
                .next()
                .and_then(|raw| raw.parse().ok())
                .unwrap_or(1);
            Command::Craft { item, amount }
        }
        "mine" | "minerar" => {
            let ore = words.next()?.to_owned();
            let direction = Direction::from_name(words.next()?)?;
            Command::Mine { ore, direction }
        }
        "goto" | "ir" => Command::Goto {
            location: words.next()?.to_ascii_lowercase(),
        },
        "local" | "setlocal" => {
            let name = words.next()?.to_ascii_lowercase();
            let width = words.next().and_then(|raw| raw.parse().ok());
            let depth = words.next().and_then(|raw| raw.parse().ok());
            Command::SetLocation { name, width, depth }
        }
        "status" => Command::Status,
        "stop" | "parar" => Command::Stop,
        _ => return None,
    };

    Some((target, command))
}
