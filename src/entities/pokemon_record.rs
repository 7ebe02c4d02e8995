// SPDX-License-Identifier: GPL-3.0-only

use std::fmt::Debug;

use serde::{Deserialize, Serialize};

use crate::utils::capitalize_string;

/// Main Pokémon structure with all the info we want to display about it
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PokemonRecord {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub types: Vec<String>,
    /// Meters
    #[serde(default)]
    pub height: f64,
    /// Kilograms
    #[serde(default)]
    pub weight: f64,
    #[serde(default)]
    pub abilities: Vec<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub stats: PokemonStats,
}

impl Debug for PokemonRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PokemonRecord")
            .field("id", &self.id)
            .field("name", &self.name)
            .finish()
    }
}

impl PokemonRecord {
    /// Returns the total value of all the stats of the Pokémon
    pub fn total_stats(&self) -> u32 {
        self.stats.hp
            + self.stats.attack
            + self.stats.defense
            + self.stats.special_attack
            + self.stats.special_defense
            + self.stats.speed
    }

    /// The upstream kebab-case name as capitalized words, `mr-mime` => `Mr Mime`
    pub fn display_name(&self) -> String {
        capitalize_string(&self.name)
    }
}

/// Pokémon base statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PokemonStats {
    pub hp: u32,
    pub attack: u32,
    pub defense: u32,
    pub special_attack: u32,
    pub special_defense: u32,
    pub speed: u32,
}
