// SPDX-License-Identifier: GPL-3.0-only

mod api_response;
mod pokemon_info;
mod pokemon_record;

pub use api_response::{
    ApiAbilitySlot, ApiArtwork, ApiFlavorTextEntry, ApiListEntry, ApiNamedResource,
    ApiOtherSprites, ApiPokemon, ApiPokemonListing, ApiSpecies, ApiSprites, ApiStat, ApiTypeSlot,
};
pub use pokemon_info::{PokemonInfo, PokemonPage};
pub use pokemon_record::{PokemonRecord, PokemonStats};
