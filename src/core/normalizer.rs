// SPDX-License-Identifier: GPL-3.0-only

//! Turns PokéAPI payloads into our own flat data structures.

use std::collections::HashMap;

use serde::Deserialize;

use crate::{
    entities::{ApiPokemon, ApiPokemonListing, ApiSpecies, ApiStat, PokemonRecord, PokemonStats},
    error::{DexError, DexResult},
    utils::{scale_numbers, validate_pokemon_id},
};

/// Language code of the flavor text we show
const DESCRIPTION_LANGUAGE: &str = "en";

/// Maps an upstream Pokémon (and its species, when we have it) to a [`PokemonRecord`]
pub fn normalize(detail: &ApiPokemon, species: Option<&ApiSpecies>) -> DexResult<PokemonRecord> {
    validate_pokemon_id(detail.id).into_result()?;
    if detail.name.trim().is_empty() {
        return Err(DexError::invalid("Invalid Pokémon data: the name is empty"));
    }

    Ok(PokemonRecord {
        id: detail.id,
        name: detail.name.clone(),
        image: select_image(detail),
        types: detail
            .types
            .iter()
            .map(|slot| slot.type_.name.clone())
            .collect(),
        height: scale_numbers(detail.height),
        weight: scale_numbers(detail.weight),
        abilities: detail
            .abilities
            .iter()
            .map(|slot| slot.ability.name.clone())
            .collect(),
        description: species.and_then(english_flavor_text).unwrap_or_default(),
        stats: parse_pokemon_stats(&detail.stats),
    })
}

/// Same as [`normalize`] for an untyped JSON value, anything that is not a
/// well formed Pokémon object is rejected as invalid input
pub fn normalize_json(
    detail: &serde_json::Value,
    species: Option<&ApiSpecies>,
) -> DexResult<PokemonRecord> {
    if !detail.is_object() {
        return Err(DexError::invalid("Invalid Pokémon data: expected an object"));
    }

    let detail = ApiPokemon::deserialize(detail)
        .map_err(|e| DexError::invalid(format!("Invalid Pokémon data: {e}")))?;
    normalize(&detail, species)
}

/// Decodes the body of `GET /pokemon/{id}`
pub fn parse_detail(body: &str) -> DexResult<ApiPokemon> {
    let detail: ApiPokemon =
        serde_json::from_str(body).map_err(|e| DexError::InvalidPayload(e.to_string()))?;

    if detail.id <= 0 {
        return Err(DexError::InvalidPayload(format!(
            "Pokémon payload without a valid id ({})",
            detail.id
        )));
    }

    Ok(detail)
}

/// Decodes the body of a species resource
pub fn parse_species(body: &str) -> DexResult<ApiSpecies> {
    serde_json::from_str(body).map_err(|e| DexError::InvalidPayload(e.to_string()))
}

/// Decodes the body of the paginated list endpoint
pub fn parse_listing(body: &str) -> DexResult<ApiPokemonListing> {
    serde_json::from_str(body).map_err(|e| DexError::InvalidPayload(e.to_string()))
}

/// Parses the stats into a map keyed by stat name (the first entry of a name
/// wins) and reads our six stats out of it, missing ones are 0
pub fn parse_pokemon_stats(stats: &[ApiStat]) -> PokemonStats {
    let mut by_name: HashMap<&str, u32> = HashMap::with_capacity(stats.len());
    for stat in stats {
        by_name.entry(stat.stat.name.as_str()).or_insert(stat.base_stat);
    }

    let get = |key: &str| by_name.get(key).copied().unwrap_or(0);

    PokemonStats {
        hp: get("hp"),
        attack: get("attack"),
        defense: get("defense"),
        special_attack: get("special-attack"),
        special_defense: get("special-defense"),
        speed: get("speed"),
    }
}

/// Default sprite, then the official artwork, then nothing
fn select_image(detail: &ApiPokemon) -> String {
    let official_artwork = detail
        .sprites
        .other
        .as_ref()
        .and_then(|other| other.official_artwork.as_ref())
        .and_then(|artwork| artwork.front_default.as_deref());

    detail
        .sprites
        .front_default
        .as_deref()
        .filter(|url| !url.is_empty())
        .or(official_artwork.filter(|url| !url.is_empty()))
        .unwrap_or_default()
        .to_string()
}

/// First English flavor text, with the form feeds and line breaks PokéAPI
/// keeps from the games folded into single spaces
fn english_flavor_text(species: &ApiSpecies) -> Option<String> {
    species
        .flavor_text_entries
        .iter()
        .find(|entry| entry.language.name == DESCRIPTION_LANGUAGE)
        .map(|entry| {
            entry
                .flavor_text
                .chars()
                .map(|c| if c.is_control() { ' ' } else { c })
                .collect::<String>()
                .split_whitespace()
                .collect::<Vec<&str>>()
                .join(" ")
        })
}

/// Resource URLs end with the id, `https://pokeapi.co/api/v2/pokemon/25/` => 25
pub fn id_from_resource_url(url: &str) -> DexResult<i64> {
    let id = url
        .split('/')
        .filter(|segment| !segment.is_empty())
        .next_back()
        .and_then(|segment| segment.parse::<i64>().ok())
        .filter(|id| *id > 0);

    id.ok_or_else(|| DexError::invalid(format!("Invalid Pokémon ID in URL: {url}")))
}

/// Official artwork for an id, used when we did not fetch the Pokémon details
pub fn official_artwork_url(artwork_base_url: &str, id: i64) -> String {
    format!("{}/{id}.png", artwork_base_url.trim_end_matches('/'))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn species(entries: serde_json::Value) -> ApiSpecies {
        serde_json::from_value(json!({ "flavor_text_entries": entries })).unwrap()
    }

    #[test]
    fn normalizes_the_pikachu_example() {
        let detail = json!({
            "id": 25,
            "name": "pikachu",
            "height": 4,
            "weight": 60,
            "types": [{"type": {"name": "electric"}}],
            "stats": [{"stat": {"name": "speed"}, "base_stat": 90}]
        });

        let record = normalize_json(&detail, None).unwrap();

        assert_eq!(record.id, 25);
        assert_eq!(record.name, "pikachu");
        assert_eq!(record.height, 0.4);
        assert_eq!(record.weight, 6.0);
        assert_eq!(record.types, vec!["electric"]);
        assert_eq!(record.stats.speed, 90);
        assert_eq!(record.stats.hp, 0);
        assert_eq!(record.stats.special_attack, 0);
        assert!(record.abilities.is_empty());
        assert_eq!(record.image, "");
        assert_eq!(record.description, "");
    }

    #[test]
    fn missing_id_is_invalid_input() {
        let detail = json!({ "name": "missingno", "height": 10, "weight": 100 });
        assert!(normalize_json(&detail, None).unwrap_err().is_invalid_input());
    }

    #[test]
    fn non_objects_are_invalid_input() {
        for value in [json!(null), json!(25), json!("pikachu"), json!([1, 2])] {
            assert!(normalize_json(&value, None).unwrap_err().is_invalid_input());
        }
    }

    #[test]
    fn zero_id_and_empty_name_are_invalid_input() {
        let zero = json!({ "id": 0, "name": "zero" });
        let unnamed = json!({ "id": 3, "name": "" });
        assert!(normalize_json(&zero, None).unwrap_err().is_invalid_input());
        assert!(normalize_json(&unnamed, None).unwrap_err().is_invalid_input());
    }

    #[test]
    fn image_prefers_default_sprite_then_artwork() {
        let both = json!({
            "id": 1, "name": "bulbasaur",
            "sprites": {
                "front_default": "https://img/1.png",
                "other": {"official-artwork": {"front_default": "https://art/1.png"}}
            }
        });
        let artwork_only = json!({
            "id": 1, "name": "bulbasaur",
            "sprites": {
                "front_default": null,
                "other": {"official-artwork": {"front_default": "https://art/1.png"}}
            }
        });

        assert_eq!(normalize_json(&both, None).unwrap().image, "https://img/1.png");
        assert_eq!(
            normalize_json(&artwork_only, None).unwrap().image,
            "https://art/1.png"
        );
    }

    #[test]
    fn empty_image_urls_count_as_missing() {
        let empty_sprite = json!({
            "id": 1, "name": "bulbasaur",
            "sprites": {
                "front_default": "",
                "other": {"official-artwork": {"front_default": "https://art/1.png"}}
            }
        });
        let all_empty = json!({
            "id": 1, "name": "bulbasaur",
            "sprites": {
                "front_default": "",
                "other": {"official-artwork": {"front_default": ""}}
            }
        });

        assert_eq!(
            normalize_json(&empty_sprite, None).unwrap().image,
            "https://art/1.png"
        );
        assert_eq!(normalize_json(&all_empty, None).unwrap().image, "");
    }

    #[test]
    fn keeps_upstream_order_of_types_and_abilities() {
        let detail = json!({
            "id": 6, "name": "charizard",
            "types": [{"type": {"name": "fire"}}, {"type": {"name": "flying"}}],
            "abilities": [
                {"ability": {"name": "blaze"}, "is_hidden": false},
                {"ability": {"name": "solar-power"}, "is_hidden": true}
            ]
        });

        let record = normalize_json(&detail, None).unwrap();
        assert_eq!(record.types, vec!["fire", "flying"]);
        assert_eq!(record.abilities, vec!["blaze", "solar-power"]);
    }

    #[test]
    fn stats_match_exact_names_and_first_entry_wins() {
        let detail = json!({
            "id": 150, "name": "mewtwo",
            "stats": [
                {"stat": {"name": "hp"}, "base_stat": 106},
                {"stat": {"name": "special-attack"}, "base_stat": 154},
                {"stat": {"name": "Special-Defense"}, "base_stat": 90},
                {"stat": {"name": "hp"}, "base_stat": 1}
            ]
        });

        let stats = normalize_json(&detail, None).unwrap().stats;
        assert_eq!(stats.hp, 106);
        assert_eq!(stats.special_attack, 154);
        assert_eq!(stats.special_defense, 0);
    }

    #[test]
    fn description_is_the_first_english_entry_cleaned_up() {
        let detail = parse_detail(r#"{"id": 25, "name": "pikachu"}"#).unwrap();
        let species = species(json!([
            {"flavor_text": "Quand plusieurs", "language": {"name": "fr"}},
            {"flavor_text": "When several of\nthese POKéMON\u{c}gather", "language": {"name": "en"}},
            {"flavor_text": "Another one", "language": {"name": "en"}}
        ]));

        let record = normalize(&detail, Some(&species)).unwrap();
        assert_eq!(record.description, "When several of these POKéMON gather");
    }

    #[test]
    fn no_english_entry_means_empty_description() {
        let detail = parse_detail(r#"{"id": 25, "name": "pikachu"}"#).unwrap();
        let species = species(json!([
            {"flavor_text": "ピカチュウ", "language": {"name": "ja"}}
        ]));

        assert_eq!(normalize(&detail, Some(&species)).unwrap().description, "");
    }

    #[test]
    fn parse_detail_rejects_garbage() {
        assert!(matches!(
            parse_detail("<html>502</html>"),
            Err(DexError::InvalidPayload(_))
        ));
        assert!(matches!(
            parse_detail(r#"{"id": 0, "name": "x"}"#),
            Err(DexError::InvalidPayload(_))
        ));
    }

    #[test]
    fn ids_come_from_the_last_url_segment() {
        assert_eq!(
            id_from_resource_url("https://pokeapi.co/api/v2/pokemon/25/").unwrap(),
            25
        );
        assert_eq!(id_from_resource_url("/pokemon/10001").unwrap(), 10001);
        assert!(id_from_resource_url("https://pokeapi.co/api/v2/pokemon/").is_err());
        assert!(id_from_resource_url("https://pokeapi.co/api/v2/pokemon/-1/").is_err());
    }

    #[test]
    fn artwork_url_is_templated_on_the_id() {
        assert_eq!(
            official_artwork_url("https://art.example/official-artwork/", 25),
            "https://art.example/official-artwork/25.png"
        );
    }
}
