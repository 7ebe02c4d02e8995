// SPDX-License-Identifier: GPL-3.0-only

use std::fmt::Debug;

use serde::{Deserialize, Serialize};

use super::PokemonRecord;

/// Simple owned data structure, for displaying the Pokémon in the list page
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PokemonInfo {
    pub id: i64,
    pub name: String,
    pub image: String,
}

impl Debug for PokemonInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PokemonInfo").field("id", &self.id).finish()
    }
}

impl From<&PokemonRecord> for PokemonInfo {
    fn from(record: &PokemonRecord) -> Self {
        PokemonInfo {
            id: record.id,
            name: record.name.clone(),
            image: record.image.clone(),
        }
    }
}

/// One page of fully loaded Pokémon
#[derive(Debug, Clone, Default)]
pub struct PokemonPage {
    pub pokemon: Vec<PokemonRecord>,
    /// The upstream listing advertised a next page
    pub has_more: bool,
    pub next_offset: i64,
}
