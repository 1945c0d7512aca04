//! PokeAPI client

use std::sync::OnceLock;

use serde::Deserialize;

use crate::sprite::{self, SpriteData};
use crate::state::{Ability, CatalogEntry, PokemonDetail};

#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("{url} returned {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },
    #[error("response parse error: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("image decode error: {0}")]
    Image(#[from] image::ImageError),
    #[error("background task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

#[derive(Clone, Debug, Deserialize)]
struct NamedResource {
    name: String,
    url: String,
}

#[derive(Clone, Debug, Deserialize)]
struct ListResponse {
    results: Vec<NamedResource>,
}

#[derive(Clone, Debug, Deserialize)]
struct PokemonResponse {
    id: u32,
    name: String,
    height: u32,
    weight: u32,
    abilities: Vec<PokemonAbilitySlot>,
}

#[derive(Clone, Debug, Deserialize)]
struct PokemonAbilitySlot {
    ability: AbilityRef,
}

#[derive(Clone, Debug, Deserialize)]
struct AbilityRef {
    name: String,
}

/// Fetches the catalog listing from a `.../pokemon?limit=N` URL.
pub async fn fetch_catalog(url: &str) -> Result<Vec<CatalogEntry>, ApiError> {
    let bytes = fetch_bytes(url).await?;
    parse_catalog(&bytes)
}

pub async fn fetch_pokemon_detail(url: &str) -> Result<PokemonDetail, ApiError> {
    let bytes = fetch_bytes(url).await?;
    parse_pokemon_detail(&bytes)
}

pub async fn fetch_sprite(url: &str) -> Result<SpriteData, ApiError> {
    let bytes = fetch_bytes(url).await?;
    let sprite = tokio::task::spawn_blocking(move || sprite::decode_sprite(&bytes)).await??;
    Ok(sprite)
}

pub fn parse_catalog(bytes: &[u8]) -> Result<Vec<CatalogEntry>, ApiError> {
    let response: ListResponse = serde_json::from_slice(bytes)?;
    Ok(response
        .results
        .into_iter()
        .map(|entry| CatalogEntry {
            name: entry.name,
            url: entry.url,
        })
        .collect())
}

pub fn parse_pokemon_detail(bytes: &[u8]) -> Result<PokemonDetail, ApiError> {
    let response: PokemonResponse = serde_json::from_slice(bytes)?;
    Ok(PokemonDetail {
        id: response.id,
        name: response.name,
        height: response.height,
        weight: response.weight,
        abilities: response
            .abilities
            .into_iter()
            .map(|slot| Ability {
                name: slot.ability.name,
            })
            .collect(),
    })
}

async fn fetch_bytes(url: &str) -> Result<Vec<u8>, ApiError> {
    let response = http_client().get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(ApiError::Status {
            url: url.to_string(),
            status,
        });
    }
    Ok(response.bytes().await?.to_vec())
}

fn http_client() -> &'static reqwest::Client {
    static CLIENT: OnceLock<reqwest::Client> = OnceLock::new();
    CLIENT.get_or_init(reqwest::Client::new)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_catalog_keeps_order() {
        let body = br#"{
            "count": 1302,
            "next": null,
            "results": [
                {"name": "bulbasaur", "url": "https://pokeapi.co/api/v2/pokemon/1/"},
                {"name": "ivysaur", "url": "https://pokeapi.co/api/v2/pokemon/2/"}
            ]
        }"#;

        let entries = parse_catalog(body).expect("catalog");
        assert_eq!(
            entries,
            vec![
                CatalogEntry {
                    name: "bulbasaur".into(),
                    url: "https://pokeapi.co/api/v2/pokemon/1/".into(),
                },
                CatalogEntry {
                    name: "ivysaur".into(),
                    url: "https://pokeapi.co/api/v2/pokemon/2/".into(),
                },
            ]
        );
    }

    #[test]
    fn test_parse_catalog_rejects_missing_results() {
        let err = parse_catalog(br#"{"detail": "Not found."}"#).unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[test]
    fn test_parse_detail() {
        let body = br#"{
            "id": 25,
            "name": "pikachu",
            "height": 4,
            "weight": 60,
            "base_experience": 112,
            "abilities": [
                {"ability": {"name": "static", "url": "https://pokeapi.co/api/v2/ability/9/"}, "is_hidden": false, "slot": 1},
                {"ability": {"name": "lightning-rod", "url": "https://pokeapi.co/api/v2/ability/31/"}, "is_hidden": true, "slot": 3}
            ]
        }"#;

        let detail = parse_pokemon_detail(body).expect("detail");
        assert_eq!(detail.id, 25);
        assert_eq!(detail.display_name(), "Pikachu");
        assert_eq!(detail.height_label(), "0.4 m");
        assert_eq!(detail.weight_label(), "6 kg");
        assert_eq!(detail.abilities_label(), "static, lightning-rod");
    }

    #[test]
    fn test_parse_detail_rejects_malformed_body() {
        assert!(parse_pokemon_detail(b"<html>").is_err());
        assert!(parse_pokemon_detail(br#"{"id": 25, "name": "pikachu"}"#).is_err());
    }

    #[test]
    fn test_error_messages() {
        let err = ApiError::Status {
            url: "https://pokeapi.co/api/v2/pokemon/0/".into(),
            status: reqwest::StatusCode::NOT_FOUND,
        };
        assert_eq!(
            err.to_string(),
            "https://pokeapi.co/api/v2/pokemon/0/ returned 404 Not Found"
        );
    }
}
