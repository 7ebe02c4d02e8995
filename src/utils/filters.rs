// SPDX-License-Identifier: GPL-3.0-only

use serde::{Deserialize, Serialize};

use crate::entities::PokemonInfo;

/// Ordering of the Pokémon list
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub enum SortBy {
    #[default]
    Number,
    Name,
}

impl std::str::FromStr for SortBy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "number" | "id" => Ok(SortBy::Number),
            "name" => Ok(SortBy::Name),
            other => Err(format!("unknown sort order: {other}")),
        }
    }
}

/// Keeps the Pokémon whose name contains the term (ignoring case) or whose id contains it
pub fn filter_pokemon(pokemon: &[PokemonInfo], search_term: &str) -> Vec<PokemonInfo> {
    if search_term.is_empty() {
        return pokemon.to_vec();
    }

    let search_lower = search_term.to_lowercase();
    pokemon
        .iter()
        .filter(|p| {
            p.name.to_lowercase().contains(&search_lower) || p.id.to_string().contains(search_term)
        })
        .cloned()
        .collect()
}

/// Returns a sorted copy of the list, equal keys keep their relative order
pub fn sort_pokemon(pokemon: &[PokemonInfo], sort_by: SortBy) -> Vec<PokemonInfo> {
    let mut sorted = pokemon.to_vec();
    match sort_by {
        SortBy::Number => sorted.sort_by_key(|p| p.id),
        SortBy::Name => sorted.sort_by_cached_key(|p| p.name.to_lowercase()),
    }
    sorted
}
