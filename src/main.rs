// SPDX-License-Identifier: GPL-3.0-only

use std::path::PathBuf;

use anywho::{Error, anywho};
use clap::{Parser, Subcommand};
use log::warn;

use dexview::{
    DexApi, DexConfig, DexError, DexResult, FavoritesStore, FileStorage, PokemonInfo,
    PokemonRecord, ViewScope,
    core::sample::sample_pokemon,
    utils::{SortBy, filter_pokemon, sort_pokemon, validate_search_term},
};

#[derive(Parser)]
#[command(name = "dexview")]
#[command(about = "Browse PokéApi from the terminal and keep a list of favorites", long_about = None)]
struct Cli {
    /// PokéApi base URL (overrides the config file)
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Favorites file (overrides the config file)
    #[arg(long, global = true)]
    favorites: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List one page of Pokémon
    List {
        #[arg(short, long, default_value_t = 0)]
        offset: i64,

        /// Page size, the config's items_per_page when omitted
        #[arg(short, long)]
        limit: Option<i64>,

        /// Only show Pokémon whose name or number contains this
        #[arg(short, long)]
        search: Option<String>,

        /// number or name
        #[arg(long)]
        sort: Option<SortBy>,

        /// Fetch every Pokémon of the page for its official artwork
        #[arg(long)]
        artwork: bool,

        /// Use the bundled sample instead of PokéApi
        #[arg(long)]
        offline: bool,
    },

    /// Show the details of a Pokémon
    Show {
        /// Number or name
        pokemon: String,

        /// Print the record as JSON
        #[arg(long)]
        json: bool,
    },

    /// Fetch several Pokémon at once
    Batch {
        #[arg(required = true, allow_negative_numbers = true)]
        ids: Vec<i64>,
    },

    /// Manage favorites
    Fav {
        #[command(subcommand)]
        action: FavAction,
    },

    /// Inspect the configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum FavAction {
    /// Add a Pokémon (number or name)
    Add { pokemon: String },
    /// Remove a Pokémon by number
    Remove { id: i64 },
    /// Add the Pokémon if it is not a favorite, remove it otherwise
    Toggle { pokemon: String },
    /// List favorites in the order they were added
    List {
        #[arg(long)]
        json: bool,
    },
    /// Number of favorites
    Count,
    /// Whether a Pokémon is a favorite
    Check { id: i64 },
    /// Remove every favorite
    Clear,
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the configuration in use
    Show,
    /// Print the config file location
    Path,
    /// Write the default configuration if there is no config file yet
    Init,
}

/// A Pokémon given on the command line, by number or by name
enum PokemonRef {
    Id(i64),
    Name(String),
}

impl From<&str> for PokemonRef {
    fn from(value: &str) -> Self {
        match value.trim().parse::<i64>() {
            Ok(id) => PokemonRef::Id(id),
            Err(_) => PokemonRef::Name(value.to_string()),
        }
    }
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Error> {
    let mut config = DexConfig::load();
    if let Some(base_url) = cli.base_url {
        config.api_base_url = base_url;
    }
    if let Some(favorites) = cli.favorites {
        config.favorites_path = Some(favorites);
    }

    match cli.command {
        Commands::List {
            offset,
            limit,
            search,
            sort,
            artwork,
            offline,
        } => {
            let search = search.unwrap_or_default();
            let validation = validate_search_term(&search);
            if !validation.is_valid() {
                for message in &validation.errors {
                    eprintln!("  - {message}");
                }
                return Err(anywho!("Invalid search term"));
            }

            let limit = limit.unwrap_or(config.items_per_page);
            let pokemon = if offline {
                sample_pokemon()?
            } else {
                let api = DexApi::new(&config)?;
                if artwork {
                    fetch_for_view(api.fetch_page_with_artwork(offset, limit)).await?
                } else {
                    fetch_for_view(api.fetch_page(offset, limit)).await?
                }
            };

            let shown = sort_pokemon(
                &filter_pokemon(&pokemon, &search),
                sort.unwrap_or(config.default_sort),
            );
            print_list(&shown, open_favorites(&config).ok().as_ref());
        }
        Commands::Show { pokemon, json } => {
            let api = DexApi::new(&config)?;
            let pokemon = PokemonRef::from(pokemon.as_str());
            let record = fetch_for_view(load_record(&api, pokemon)).await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&record)?);
            } else {
                let is_favorite = open_favorites(&config)
                    .map(|store| store.is_favorite(record.id))
                    .unwrap_or(false);
                print_record(&record, is_favorite);
            }
        }
        Commands::Batch { ids } => {
            let api = DexApi::new(&config)?;
            let records = fetch_for_view(async { Ok(api.fetch_records(&ids).await) }).await?;

            for (id, record) in ids.iter().zip(records) {
                match record {
                    Some(record) => println!("#{:03} {}", record.id, record.display_name()),
                    None => println!("#{id:03} unavailable"),
                }
            }
        }
        Commands::Fav { action } => run_favorites(&config, action).await?,
        Commands::Config { action } => match action {
            ConfigAction::Show => {
                let pretty = ron::ser::PrettyConfig::default();
                println!("{}", ron::ser::to_string_pretty(&config, pretty)?);
            }
            ConfigAction::Path => match DexConfig::default_path() {
                Some(path) => println!("{}", path.display()),
                None => return Err(anywho!("No config directory available")),
            },
            ConfigAction::Init => {
                let path = DexConfig::default_path()
                    .ok_or_else(|| anywho!("No config directory available"))?;
                if path.exists() {
                    println!("Config already exists at {}", path.display());
                } else {
                    DexConfig::default().save_to(&path)?;
                    println!("Config written to {}", path.display());
                }
            }
        },
    }

    Ok(())
}

async fn run_favorites(config: &DexConfig, action: FavAction) -> Result<(), Error> {
    let mut store = open_favorites(config)?;

    match action {
        FavAction::Add { pokemon } => {
            let api = DexApi::new(config)?;
            let pokemon = PokemonRef::from(pokemon.as_str());
            let record = fetch_for_view(load_record(&api, pokemon)).await?;
            let name = record.display_name();

            if store.add(record)? {
                println!("{name} added to favorites");
            } else {
                println!("{name} is already a favorite");
            }
        }
        FavAction::Remove { id } => {
            if store.remove(id)? {
                println!("#{id:03} removed from favorites");
            } else {
                println!("#{id:03} was not a favorite");
            }
        }
        FavAction::Toggle { pokemon } => {
            let pokemon = PokemonRef::from(pokemon.as_str());

            // Removing needs no network when we already have it
            if let PokemonRef::Id(id) = pokemon {
                if store.remove(id)? {
                    println!("#{id:03} removed from favorites");
                    return Ok(());
                }
            }

            let api = DexApi::new(config)?;
            let record = fetch_for_view(load_record(&api, pokemon)).await?;
            let name = record.display_name();
            if store.toggle(record)? {
                println!("{name} added to favorites");
            } else {
                println!("{name} removed from favorites");
            }
        }
        FavAction::List { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(store.favorites())?);
            } else if store.count() == 0 {
                println!("No favorites yet");
            } else {
                for record in store.favorites() {
                    println!(
                        "#{:03} {:<16} {}",
                        record.id,
                        record.display_name(),
                        record.types.join("/")
                    );
                }
            }
        }
        FavAction::Count => println!("{}", store.count()),
        FavAction::Check { id } => println!("{}", store.is_favorite(id)),
        FavAction::Clear => {
            store.clear()?;
            println!("Favorites cleared");
        }
    }

    Ok(())
}

fn open_favorites(config: &DexConfig) -> Result<FavoritesStore<FileStorage>, Error> {
    let path = config
        .favorites_file()
        .ok_or_else(|| anywho!("No data directory available for the favorites"))?;

    FavoritesStore::open(FileStorage::new(path)).map_err(|e| {
        warn!("Failed to open favorites: {e}");
        e.into()
    })
}

async fn load_record(api: &DexApi, pokemon: PokemonRef) -> DexResult<PokemonRecord> {
    match pokemon {
        PokemonRef::Id(id) => api.load_pokemon(id).await,
        PokemonRef::Name(name) => api.load_pokemon_by_name(&name).await,
    }
}

/// Runs a fetch for the view being printed. Ctrl-C closes the view, and the
/// fetch result is discarded instead of printed.
async fn fetch_for_view<T>(fetch: impl Future<Output = DexResult<T>>) -> DexResult<T> {
    let scope = ViewScope::new();
    let pending = scope.run(fetch);
    tokio::pin!(pending);

    tokio::select! {
        result = &mut pending => result.map_err(|_| DexError::Cancelled)?,
        _ = tokio::signal::ctrl_c() => {
            scope.close();
            pending.await.map_err(|_| DexError::Cancelled)?
        }
    }
}

fn print_list(pokemon: &[PokemonInfo], favorites: Option<&FavoritesStore<FileStorage>>) {
    if pokemon.is_empty() {
        println!("No Pokémon found");
        return;
    }

    for p in pokemon {
        let star = match favorites {
            Some(store) if store.is_favorite(p.id) => "★",
            _ => " ",
        };
        println!(
            "{star} #{:03} {:<16} {}",
            p.id,
            dexview::utils::capitalize_string(&p.name),
            p.image
        );
    }
}

fn print_record(record: &PokemonRecord, is_favorite: bool) {
    let star = if is_favorite { " ★" } else { "" };
    println!("#{:03} {}{star}", record.id, record.display_name());
    if !record.image.is_empty() {
        println!("{}", record.image);
    }
    println!();
    println!("Types:     {}", record.types.join(", "));
    println!("Height:    {} m", record.height);
    println!("Weight:    {} Kg", record.weight);
    println!("Abilities: {}", record.abilities.join(", "));
    if !record.description.is_empty() {
        println!();
        println!("{}", record.description);
    }
    println!();

    let stats = &record.stats;
    for (name, value) in [
        ("HP", stats.hp),
        ("Attack", stats.attack),
        ("Defense", stats.defense),
        ("Sp. Attack", stats.special_attack),
        ("Sp. Defense", stats.special_defense),
        ("Speed", stats.speed),
    ] {
        println!("{name:<12}{value:>4}");
    }
    println!("{:<12}{:>4}", "Total", record.total_stats());
}
