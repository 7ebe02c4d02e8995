// SPDX-License-Identifier: GPL-3.0-only

use std::time::Duration;

use futures::StreamExt;
use log::{debug, error, warn};

use crate::{
    config::DexConfig,
    core::normalizer::{
        id_from_resource_url, normalize, official_artwork_url, parse_detail, parse_listing,
        parse_species,
    },
    entities::{
        ApiListEntry, ApiPokemon, ApiPokemonListing, ApiSpecies, PokemonInfo, PokemonPage,
        PokemonRecord,
    },
    error::{DexError, DexResult},
    utils::{
        is_valid_url, sanitize_input, validate_pagination, validate_pokemon_id,
        validate_search_term,
    },
};

/// Read-only client of the PokéApi
#[derive(Debug, Clone)]
pub struct DexApi {
    client: reqwest::Client,
    base_url: String,
    artwork_base_url: String,
    max_concurrent_requests: usize,
}

impl DexApi {
    pub fn new(config: &DexConfig) -> DexResult<Self> {
        let mut builder = reqwest::Client::builder().pool_max_idle_per_host(10);
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            client: builder.build()?,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            artwork_base_url: config.artwork_base_url.clone(),
            max_concurrent_requests: config.max_concurrent_requests.max(1),
        })
    }

    /// Client for another PokéApi deployment, defaults for everything else
    pub fn with_base_url(base_url: &str) -> DexResult<Self> {
        Self::new(&DexConfig {
            api_base_url: base_url.to_string(),
            ..Default::default()
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    //
    // RAW ENDPOINTS
    //

    /// One page of `{name, url}` entries, the parameters are validated before any request
    pub async fn get_pokemon_listing(
        &self,
        offset: i64,
        limit: i64,
    ) -> DexResult<ApiPokemonListing> {
        validate_pagination(offset, limit).into_result()?;

        let url = format!("{}/pokemon?offset={offset}&limit={limit}", self.base_url);
        let body = self
            .get_text(&url)
            .await
            .inspect_err(|e| error!("Error fetching pokemons: {e}"))?;

        parse_listing(&body)
    }

    pub async fn get_pokemon_by_id(&self, id: i64) -> DexResult<ApiPokemon> {
        validate_pokemon_id(id).into_result()?;

        let url = format!("{}/pokemon/{id}", self.base_url);
        let body = self
            .get_text(&url)
            .await
            .inspect_err(|e| error!("Error fetching pokemon by id {id}: {e}"))?;

        parse_detail(&body)
    }

    pub async fn get_pokemon_by_name(&self, name: &str) -> DexResult<ApiPokemon> {
        let name = pokemon_slug(name)?;

        let url = format!("{}/pokemon/{name}", self.base_url);
        let body = self
            .get_text(&url)
            .await
            .inspect_err(|e| error!("Error fetching pokemon by name {name}: {e}"))?;

        parse_detail(&body)
    }

    /// Species resources are referenced by absolute URL from the Pokémon details
    pub async fn get_species(&self, url: &str) -> DexResult<ApiSpecies> {
        if !is_valid_url(url) {
            return Err(DexError::invalid(format!("Invalid species URL: {url}")));
        }

        let body = self.get_text(url).await?;
        parse_species(&body)
    }

    //
    // RECORDS
    //

    /// Normalizes the details, fetching the species for the description. If
    /// that fails the record is still built, just without a description.
    pub async fn transform(&self, detail: &ApiPokemon) -> DexResult<PokemonRecord> {
        let species_url = detail
            .species
            .as_ref()
            .map(|species| species.url.as_str())
            .filter(|url| !url.is_empty());

        let species = match species_url {
            Some(url) => match self.get_species(url).await {
                Ok(species) => Some(species),
                Err(e) => {
                    warn!("Error fetching species description for {}: {e}", detail.name);
                    None
                }
            },
            None => None,
        };

        normalize(detail, species.as_ref())
    }

    /// Retrieve a single Pokémon from PokéApi and parse it to our own data structure
    pub async fn load_pokemon(&self, id: i64) -> DexResult<PokemonRecord> {
        let detail = self.get_pokemon_by_id(id).await?;
        self.transform(&detail).await
    }

    pub async fn load_pokemon_by_name(&self, name: &str) -> DexResult<PokemonRecord> {
        let detail = self.get_pokemon_by_name(name).await?;
        self.transform(&detail).await
    }

    /// A page of list items without fetching any details, images point to
    /// the official artwork of each id
    pub async fn fetch_page(&self, offset: i64, limit: i64) -> DexResult<Vec<PokemonInfo>> {
        let listing = self.get_pokemon_listing(offset, limit).await?;

        Ok(listing_ids(&listing)
            .into_iter()
            .map(|(id, entry)| PokemonInfo {
                id,
                name: entry.name.clone(),
                image: official_artwork_url(&self.artwork_base_url, id),
            })
            .collect())
    }

    /// Like [`DexApi::fetch_page`], but asks for the details of every entry to
    /// use the artwork PokéApi reports. An entry whose details fail keeps the
    /// templated artwork URL.
    pub async fn fetch_page_with_artwork(
        &self,
        offset: i64,
        limit: i64,
    ) -> DexResult<Vec<PokemonInfo>> {
        let listing = self.get_pokemon_listing(offset, limit).await?;
        let entries = listing_ids(&listing);

        let ids: Vec<i64> = entries.iter().map(|(id, _)| *id).collect();
        let details = self.fetch_details(&ids).await;

        Ok(entries
            .into_iter()
            .zip(details)
            .map(|((id, entry), detail)| {
                let artwork = detail
                    .as_ref()
                    .and_then(|d| d.sprites.other.as_ref())
                    .and_then(|other| other.official_artwork.as_ref())
                    .and_then(|artwork| artwork.front_default.clone())
                    .filter(|url| !url.is_empty())
                    .unwrap_or_else(|| official_artwork_url(&self.artwork_base_url, id));

                PokemonInfo {
                    id,
                    name: entry.name.clone(),
                    image: artwork,
                }
            })
            .collect())
    }

    /// Fetches the details of every id concurrently. The result has one slot
    /// per id, in the same order, `None` where that fetch failed.
    pub async fn fetch_details(&self, ids: &[i64]) -> Vec<Option<ApiPokemon>> {
        futures::stream::iter(ids.iter().copied())
            .map(|id| async move {
                match self.get_pokemon_by_id(id).await {
                    Ok(detail) => Some(detail),
                    Err(e) => {
                        warn!("Failed to fetch details for id={id}: {e}");
                        None
                    }
                }
            })
            .buffered(self.max_concurrent_requests)
            .collect()
            .await
    }

    /// Same as [`DexApi::fetch_details`] but with the fully normalized records
    pub async fn fetch_records(&self, ids: &[i64]) -> Vec<Option<PokemonRecord>> {
        futures::stream::iter(ids.iter().copied())
            .map(|id| async move {
                match self.load_pokemon(id).await {
                    Ok(record) => Some(record),
                    Err(e) => {
                        warn!("Pokémon {id} is unavailable: {e}");
                        None
                    }
                }
            })
            .buffered(self.max_concurrent_requests)
            .collect()
            .await
    }

    /// One page of full records. Entries that fail to load are left out, the
    /// page itself only fails when the listing does.
    pub async fn load_pokemon_list(&self, offset: i64, limit: i64) -> DexResult<PokemonPage> {
        let listing = self.get_pokemon_listing(offset, limit).await?;

        let ids: Vec<i64> = listing_ids(&listing).into_iter().map(|(id, _)| id).collect();
        let pokemon: Vec<PokemonRecord> = self
            .fetch_records(&ids)
            .await
            .into_iter()
            .flatten()
            .collect();

        debug!(
            "Loaded {} of {} Pokémon at offset {offset}",
            pokemon.len(),
            listing.results.len()
        );

        Ok(PokemonPage {
            pokemon,
            has_more: listing.next.is_some(),
            next_offset: offset.saturating_add(listing.results.len() as i64),
        })
    }

    async fn get_text(&self, url: &str) -> DexResult<String> {
        debug!("GET {url}");

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(DexError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        Ok(response.text().await?)
    }
}

/// Pairs every listing entry with the id at the end of its URL, entries
/// without one are skipped
fn listing_ids(listing: &ApiPokemonListing) -> Vec<(i64, &ApiListEntry)> {
    listing
        .results
        .iter()
        .filter_map(|entry| match id_from_resource_url(&entry.url) {
            Ok(id) => Some((id, entry)),
            Err(e) => {
                warn!("Skipping Pokémon {}: {e}", entry.name);
                None
            }
        })
        .collect()
}

/// Turns user input into the name PokéApi expects, `Mr Mime` => `mr-mime`
fn pokemon_slug(name: &str) -> DexResult<String> {
    let sanitized = sanitize_input(name);
    if sanitized.is_empty() {
        return Err(DexError::invalid("Invalid name: it cannot be empty"));
    }

    validate_search_term(&sanitized).into_result()?;

    Ok(sanitized
        .split_whitespace()
        .collect::<Vec<&str>>()
        .join("-")
        .to_lowercase())
}
