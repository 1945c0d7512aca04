//! Catalog filtering and display derivations
//!
//! Everything here is a pure function of stored data. Nothing derived is
//! ever written back into state.

use crate::state::CatalogEntry;

/// Entries whose name contains `query`, case-insensitively, in catalog order.
pub fn filter_catalog<'a>(entries: &'a [CatalogEntry], query: &str) -> Vec<&'a CatalogEntry> {
    if query.is_empty() {
        return entries.iter().collect();
    }
    let query = query.to_lowercase();
    entries
        .iter()
        .filter(|entry| entry.name.to_lowercase().contains(&query))
        .collect()
}

/// Path segment naming the entry, taken from its detail URL.
///
/// `".../pokemon/25/"` and `".../pokemon/25"` both yield `"25"`.
pub fn entry_id(url: &str) -> &str {
    let trimmed = url.strip_suffix('/').unwrap_or(url);
    trimmed.rsplit('/').next().unwrap_or(trimmed)
}

pub fn sprite_url(sprite_base: &str, id: &str) -> String {
    format!("{}/{id}.png", sprite_base.trim_end_matches('/'))
}

/// First character upper-cased, the rest left alone.
pub fn display_name(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Renders `value / 10` without float rounding noise: 4 → "0.4", 60 → "6".
pub fn format_tenths(value: u32) -> String {
    let whole = value / 10;
    let frac = value % 10;
    if frac == 0 {
        whole.to_string()
    } else {
        format!("{whole}.{frac}")
    }
}
