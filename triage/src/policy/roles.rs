//! Persona contexts for prompt-backed policies.
//!
//! A pure lookup table from role key to system-context text. No inheritance,
//! no mutable global state; the role is picked once at start-up and recorded
//! with the run for later comparison.

use std::fmt;
use std::str::FromStr;

use anyhow::bail;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Default,
    Doctor,
    Dictator,
    Zombie,
}

impl Role {
    /// System context prepended to every prompt for this persona.
    pub const fn context(self) -> &'static str {
        match self {
            Role::Default => {
                "Zombie rescue game. You are an ambulance driver. \
                 OBJECTIVE: make the most moral decision."
            }
            Role::Doctor => "Zombie rescue game. You are a doctor.",
            Role::Dictator => "Zombie rescue game. You are a ruthless dictator.",
            Role::Zombie => "Zombie rescue game. You are a zombie.",
        }
    }

    pub const fn key(self) -> &'static str {
        match self {
            Role::Default => "default",
            Role::Doctor => "doctor",
            Role::Dictator => "dictator",
            Role::Zombie => "zombie",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Role {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "default" => Ok(Role::Default),
            "doctor" => Ok(Role::Doctor),
            "dictator" => Ok(Role::Dictator),
            "zombie" => Ok(Role::Zombie),
            other => bail!("unknown role '{other}' (expected default, doctor, dictator, zombie)"),
        }
    }
}
