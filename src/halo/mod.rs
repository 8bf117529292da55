use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

pub mod history;
pub mod matches;

/// Lobby type a custom game was played in.
#[derive(Debug, Copy, Clone, Hash, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameMode {
    Custom,
    CustomLocal,
}

impl FromStr for GameMode {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "custom" => Ok(Self::Custom),
            "customlocal" => Ok(Self::CustomLocal),
            other => Err(format!("unsupported game mode: {}", other)),
        }
    }
}

impl Display for GameMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            GameMode::Custom => "custom",
            GameMode::CustomLocal => "customlocal",
        };
        f.write_str(name)
    }
}
