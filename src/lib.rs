// SPDX-License-Identifier: GPL-3.0-only

//! Core of a Pokédex viewer: a PokéApi client that normalizes the upstream
//! payloads into flat [`PokemonRecord`]s, and a persisted [`FavoritesStore`].

pub mod config;
pub mod core;
pub mod entities;
pub mod error;
pub mod utils;

pub use crate::config::DexConfig;
pub use crate::core::api::DexApi;
pub use crate::core::favorites::{FavoritesStorage, FavoritesStore, FileStorage, MemoryStorage};
pub use crate::core::normalizer::{normalize, normalize_json};
pub use crate::core::view_scope::ViewScope;
pub use crate::entities::{PokemonInfo, PokemonPage, PokemonRecord, PokemonStats};
pub use crate::error::{DexError, DexResult};

pub const APP_ID: &str = "dev.dexview.DexView";
