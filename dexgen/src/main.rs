// SPDX-License-Identifier: GPL-3.0-only

use std::path::Path;

use anywho::{Error, anywho};
use dexview::{DexApi, DexConfig, PokemonInfo};
use log::info;

/// Pokémon bundled with dexview unless told otherwise
const DEFAULT_SAMPLE_IDS: &[i64] = &[1, 4, 7, 12, 25, 92, 94, 132, 151, 304];
const SAMPLE_PATH: &str = "assets/sample_pokemon.ron";

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().collect();

    let ids = match args.get(1).map(String::as_str) {
        None | Some("-d") if args.len() <= 2 => DEFAULT_SAMPLE_IDS.to_vec(),
        Some("-i") if args.len() == 3 => match parse_ids(&args[2]) {
            Ok(ids) => ids,
            Err(e) => {
                println!("{e}");
                print_help();
                return;
            }
        },
        _ => {
            print_help();
            return;
        }
    };

    let api = match DexApi::new(&DexConfig::load()) {
        Ok(api) => api,
        Err(e) => {
            println!("Failed to create the PokéApi client: {e}");
            return;
        }
    };

    match generate_sample(&api, &ids, Path::new(SAMPLE_PATH)).await {
        Ok(count) => println!("Sample with {count} Pokémon written to {SAMPLE_PATH}"),
        Err(e) => println!("Failed to generate the sample: {e}"),
    }
}

fn print_help() {
    println!(
        "Usage: {} [FLAG]",
        std::env::args()
            .next()
            .unwrap_or_else(|| "dexgen".to_string())
    );
    println!();
    println!("FLAGS:");
    println!("  -d           Regenerate the default sample (the default)");
    println!("  -i 1,4,7     Generate the sample from these Pokémon numbers");
    println!();
    println!("The sample is written to {SAMPLE_PATH}.");
}

fn parse_ids(list: &str) -> Result<Vec<i64>, Error> {
    let ids = list
        .split(',')
        .map(|id| {
            id.trim()
                .parse::<i64>()
                .map_err(|_| anywho!("Invalid Pokémon number: {id}"))
        })
        .collect::<Result<Vec<i64>, Error>>()?;

    if ids.is_empty() {
        return Err(anywho!("No Pokémon numbers given"));
    }

    Ok(ids)
}

/// Fetches the Pokémon and writes them as the bundled sample, Pokémon that
/// fail to load are left out. Returns how many were written.
async fn generate_sample(api: &DexApi, ids: &[i64], path: &Path) -> Result<usize, Error> {
    info!("Downloading {} Pokémon", ids.len());

    let sample: Vec<PokemonInfo> = api
        .fetch_records(ids)
        .await
        .iter()
        .flatten()
        .map(PokemonInfo::from)
        .collect();

    if sample.is_empty() {
        return Err(anywho!("None of the Pokémon could be downloaded"));
    }

    let pretty = ron::ser::PrettyConfig::default();
    let ron_data = ron::ser::to_string_pretty(&sample, pretty)?;

    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, ron_data).await?;

    Ok(sample.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_comma_separated_ids() {
        assert_eq!(parse_ids("1, 4,7").unwrap(), vec![1, 4, 7]);
        assert!(parse_ids("1,pikachu").is_err());
    }
}
