// SPDX-License-Identifier: GPL-3.0-only

use std::path::{Path, PathBuf};

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::{APP_ID, error::DexResult, utils::SortBy, utils::write_atomically};

pub const DEFAULT_API_BASE_URL: &str = "https://pokeapi.co/api/v2";
pub const DEFAULT_ARTWORK_BASE_URL: &str =
    "https://raw.githubusercontent.com/PokeAPI/sprites/master/sprites/pokemon/other/official-artwork";

/// User configuration, stored as RON in the platform config directory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DexConfig {
    pub api_base_url: String,
    pub artwork_base_url: String,
    pub items_per_page: i64,
    /// Upper bound of simultaneous requests when fetching a batch of Pokémon
    pub max_concurrent_requests: usize,
    /// No timeout besides the transport defaults when unset
    pub request_timeout_secs: Option<u64>,
    pub default_sort: SortBy,
    /// Overrides the favorites file location
    pub favorites_path: Option<PathBuf>,
}

impl Default for DexConfig {
    fn default() -> Self {
        Self {
            api_base_url: String::from(DEFAULT_API_BASE_URL),
            artwork_base_url: String::from(DEFAULT_ARTWORK_BASE_URL),
            items_per_page: 30,
            max_concurrent_requests: 30,
            request_timeout_secs: None,
            default_sort: SortBy::default(),
            favorites_path: None,
        }
    }
}

impl DexConfig {
    /// `<config dir>/<APP_ID>/config.ron`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_ID).join("config.ron"))
    }

    /// Loads the user configuration, falling back to the defaults when the file
    /// is missing or can't be read
    pub fn load() -> Self {
        let Some(path) = Self::default_path() else {
            warn!("No config directory available, using the default configuration");
            return Self::default();
        };

        if !path.exists() {
            debug!("No config file at {}, using defaults", path.display());
            return Self::default();
        }

        Self::load_from(&path).unwrap_or_else(|e| {
            warn!("Failed to load config from {}: {e}", path.display());
            Self::default()
        })
    }

    pub fn load_from(path: &Path) -> DexResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: DexConfig = ron::from_str(&contents)?;
        Ok(config.sanitized())
    }

    pub fn save_to(&self, path: &Path) -> DexResult<()> {
        let pretty = ron::ser::PrettyConfig::default();
        let contents = ron::ser::to_string_pretty(self, pretty)?;
        write_atomically(path, contents.as_bytes())?;
        Ok(())
    }

    /// Where favorites are stored, honoring the `favorites_path` override
    pub fn favorites_file(&self) -> Option<PathBuf> {
        self.favorites_path.clone().or_else(|| {
            dirs::data_dir().map(|dir| dir.join(APP_ID).join("pokemon-favorites.json"))
        })
    }

    /// Clamps values that would make every request fail
    fn sanitized(mut self) -> Self {
        if self.max_concurrent_requests == 0 {
            warn!("max_concurrent_requests can't be 0, using 1");
            self.max_concurrent_requests = 1;
        }
        if !(1..=crate::utils::MAX_PAGE_SIZE).contains(&self.items_per_page) {
            warn!(
                "items_per_page {} is out of range, using the default",
                self.items_per_page
            );
            self.items_per_page = Self::default().items_per_page;
        }
        self
    }
}
