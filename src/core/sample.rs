// SPDX-License-Identifier: GPL-3.0-only

//! A handful of Pokémon bundled with the binary, for browsing without network.
//! `dexgen` regenerates the file from PokéApi.

use crate::{entities::PokemonInfo, error::DexResult};

const SAMPLE_POKEMON: &str = include_str!("../../assets/sample_pokemon.ron");

/// The bundled sample list, ordered by id
pub fn sample_pokemon() -> DexResult<Vec<PokemonInfo>> {
    let mut pokemon: Vec<PokemonInfo> = ron::from_str(SAMPLE_POKEMON)?;
    pokemon.sort_by_key(|p| p.id);
    Ok(pokemon)
}
