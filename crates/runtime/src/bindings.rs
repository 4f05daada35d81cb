//! Input symbol to command mapping.
//!
//! The core never interprets raw input; hosts feed symbols through a
//! binding table and the player controller queues the mapped command. The
//! table is plain serde data so front ends can ship their own layouts.

use std::collections::BTreeMap;
use std::path::Path;

use outpost_core::Command;
use serde::{Deserialize, Serialize};

use crate::error::{Result, RuntimeError};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bindings {
    map: BTreeMap<char, Command>,
}

impl Bindings {
    pub fn new(map: BTreeMap<char, Command>) -> Self {
        Self { map }
    }

    /// Classic roguelike movement keys plus wait and grab.
    pub fn roguelike() -> Self {
        Self::new(BTreeMap::from([
            ('h', Command::walk(-1, 0)),
            ('l', Command::walk(1, 0)),
            ('k', Command::walk(0, -1)),
            ('j', Command::walk(0, 1)),
            ('y', Command::walk(-1, -1)),
            ('u', Command::walk(1, -1)),
            ('b', Command::walk(-1, 1)),
            ('n', Command::walk(1, 1)),
            ('.', Command::Wait),
            ('g', Command::Grab),
        ]))
    }

    pub fn from_json(data: &str) -> Result<Self> {
        serde_json::from_str(data).map_err(|source| RuntimeError::Parse {
            what: "bindings",
            source,
        })
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path).map_err(|source| RuntimeError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&data)
    }

    pub fn command_for(&self, symbol: char) -> Option<Command> {
        self.map.get(&symbol).copied()
    }

    pub fn as_map(&self) -> &BTreeMap<char, Command> {
        &self.map
    }
}

impl Default for Bindings {
    fn default() -> Self {
        Self::roguelike()
    }
}
