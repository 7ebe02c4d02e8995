// SPDX-License-Identifier: GPL-3.0-only

//! PokéAPI payloads, only the parts we read.
//!
//! Everything but the `id` and `name` of a Pokémon is optional upstream, so
//! those fields default instead of failing the whole response.

use serde::{Deserialize, Serialize};

/// `GET /pokemon/{id}`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiPokemon {
    pub id: i64,
    pub name: String,
    /// Decimeters
    #[serde(default)]
    pub height: i64,
    /// Hectograms
    #[serde(default)]
    pub weight: i64,
    #[serde(default)]
    pub sprites: ApiSprites,
    #[serde(default)]
    pub types: Vec<ApiTypeSlot>,
    #[serde(default)]
    pub abilities: Vec<ApiAbilitySlot>,
    #[serde(default)]
    pub stats: Vec<ApiStat>,
    #[serde(default)]
    pub species: Option<ApiNamedResource>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiSprites {
    #[serde(default)]
    pub front_default: Option<String>,
    #[serde(default)]
    pub other: Option<ApiOtherSprites>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiOtherSprites {
    #[serde(default, rename = "official-artwork")]
    pub official_artwork: Option<ApiArtwork>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiArtwork {
    #[serde(default)]
    pub front_default: Option<String>,
}

/// A `{name, url}` reference to another resource
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiNamedResource {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiTypeSlot {
    #[serde(rename = "type")]
    pub type_: ApiNamedResource,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiAbilitySlot {
    pub ability: ApiNamedResource,
    #[serde(default)]
    pub is_hidden: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiStat {
    pub base_stat: u32,
    pub stat: ApiNamedResource,
}

/// `GET /pokemon-species/{id}`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiSpecies {
    #[serde(default)]
    pub flavor_text_entries: Vec<ApiFlavorTextEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiFlavorTextEntry {
    pub flavor_text: String,
    pub language: ApiNamedResource,
}

/// `GET /pokemon?offset=..&limit=..`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiPokemonListing {
    #[serde(default)]
    pub count: i64,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
    pub results: Vec<ApiListEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiListEntry {
    pub name: String,
    pub url: String,
}
