//! Runtime endpoints and limits

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub const DEFAULT_API_BASE: &str = "https://pokeapi.co/api/v2";
pub const DEFAULT_SPRITE_BASE: &str =
    "https://raw.githubusercontent.com/PokeAPI/sprites/master/sprites/pokemon";
pub const DEFAULT_CATALOG_LIMIT: u32 = 5000;

/// Where the catalog, details and artwork come from.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct Config {
    pub api_base: String,
    pub catalog_limit: u32,
    pub sprite_base: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            catalog_limit: DEFAULT_CATALOG_LIMIT,
            sprite_base: DEFAULT_SPRITE_BASE.to_string(),
        }
    }
}

impl Config {
    pub fn catalog_url(&self) -> String {
        format!(
            "{}/pokemon?limit={}",
            self.api_base.trim_end_matches('/'),
            self.catalog_limit
        )
    }

    pub fn sprite_url(&self, id: &str) -> String {
        crate::catalog::sprite_url(&self.sprite_base, id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog_url() {
        assert_eq!(
            Config::default().catalog_url(),
            "https://pokeapi.co/api/v2/pokemon?limit=5000"
        );
    }

    #[test]
    fn test_catalog_url_ignores_trailing_slash() {
        let config = Config {
            api_base: "http://localhost:8080/api/".into(),
            catalog_limit: 10,
            ..Default::default()
        };
        assert_eq!(config.catalog_url(), "http://localhost:8080/api/pokemon?limit=10");
    }
}
