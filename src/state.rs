//! Application state - single source of truth

use std::collections::HashMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tui_dispatch::DataResource;

use crate::catalog;
use crate::config::Config;
use crate::sprite::SpriteData;

/// One catalog item as listed by the API.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CatalogEntry {
    pub name: String,
    pub url: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Ability {
    pub name: String,
}

/// Full record for one entry, fetched on demand.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PokemonDetail {
    pub id: u32,
    pub name: String,
    /// Decimetres.
    pub height: u32,
    /// Hectograms.
    pub weight: u32,
    pub abilities: Vec<Ability>,
}

impl PokemonDetail {
    pub fn display_name(&self) -> String {
        catalog::display_name(&self.name)
    }

    pub fn height_label(&self) -> String {
        format!("{} m", catalog::format_tenths(self.height))
    }

    pub fn weight_label(&self) -> String {
        format!("{} kg", catalog::format_tenths(self.weight))
    }

    pub fn abilities_label(&self) -> String {
        self.abilities
            .iter()
            .map(|ability| ability.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Overlay state.
///
/// `visible` and `detail` change together: the overlay is shown exactly when a
/// detail is stored.
#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct SelectionState {
    /// Last issued detail request token.
    pub request_seq: u64,
    /// Token whose response may still be applied.
    pub pending: Option<u64>,
    pub detail: Option<PokemonDetail>,
    pub visible: bool,
    pub sprite: DataResource<SpriteData>,
}

impl Default for SelectionState {
    fn default() -> Self {
        Self {
            request_seq: 0,
            pending: None,
            detail: None,
            visible: false,
            sprite: DataResource::Empty,
        }
    }
}

impl SelectionState {
    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    pub fn displayed(&self) -> Option<&PokemonDetail> {
        if self.visible {
            self.detail.as_ref()
        } else {
            None
        }
    }
}

/// Card footprint in terminal cells, borders included.
pub const CARD_WIDTH: u16 = 22;
pub const CARD_HEIGHT: u16 = 4;
/// Card height with three rows of artwork above the badge and name.
pub const CARD_ART_HEIGHT: u16 = 7;
pub const CARD_ART_ROWS: u16 = 3;

/// Rows taken by the title, search box and status bar around the grid.
pub const GRID_CHROME_ROWS: u16 = 9;

pub const SPINNER_TICK_MS: u64 = 120;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum FocusArea {
    #[default]
    Search,
    Grid,
}

/// Application state - everything the UI needs to render
#[derive(Clone, Debug, tui_dispatch::DebugState, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AppState {
    #[debug(section = "Config", label = "Endpoints", debug_fmt)]
    pub config: Config,

    /// Catalog lifecycle: Empty → Loading → Loaded/Failed
    #[debug(skip)]
    pub catalog: DataResource<Vec<CatalogEntry>>,

    #[debug(section = "Search", label = "Query")]
    pub query: String,

    #[debug(section = "Search", label = "Cursor")]
    pub cursor: usize,

    #[debug(section = "Search", label = "Focus", debug_fmt)]
    pub focus: FocusArea,

    #[debug(section = "Grid", label = "Card art")]
    pub card_art: bool,

    /// Card artwork by entry id, requested once per id for cards near the cursor
    #[debug(skip)]
    #[serde(skip)]
    pub card_sprites: HashMap<String, DataResource<SpriteData>>,

    #[debug(skip)]
    pub selection: SelectionState,

    #[debug(skip)]
    pub terminal_size: (u16, u16),

    #[debug(skip)]
    pub tick: u64,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            catalog: DataResource::Empty,
            query: String::new(),
            cursor: 0,
            focus: FocusArea::default(),
            card_art: true,
            card_sprites: HashMap::new(),
            selection: SelectionState::default(),
            terminal_size: (80, 24),
            tick: 0,
        }
    }

    /// The fetched catalog, or nothing if it is not loaded.
    pub fn catalog_entries(&self) -> &[CatalogEntry] {
        self.catalog.data().map(Vec::as_slice).unwrap_or(&[])
    }

    /// Entries matching the current query, recomputed on every call.
    pub fn visible_entries(&self) -> Vec<&CatalogEntry> {
        catalog::filter_catalog(self.catalog_entries(), &self.query)
    }

    pub fn visible_count(&self) -> usize {
        self.visible_entries().len()
    }

    pub fn entry_under_cursor(&self) -> Option<&CatalogEntry> {
        self.visible_entries().get(self.cursor).copied()
    }

    pub fn sprite_url_for(&self, id: &str) -> String {
        self.config.sprite_url(id)
    }

    /// Cards per grid row for the current terminal width.
    pub fn grid_columns(&self) -> usize {
        (self.terminal_size.0.saturating_sub(2) / CARD_WIDTH).max(1) as usize
    }

    pub fn card_height(&self) -> u16 {
        if self.card_art {
            CARD_ART_HEIGHT
        } else {
            CARD_HEIGHT
        }
    }

    /// Whole card rows visible at once.
    pub fn grid_page_rows(&self) -> usize {
        (self.terminal_size.1.saturating_sub(GRID_CHROME_ROWS) / self.card_height()).max(1) as usize
    }

    pub fn card_sprite(&self, id: &str) -> Option<&SpriteData> {
        self.card_sprites.get(id).and_then(DataResource::data)
    }

    pub fn overlay_open(&self) -> bool {
        self.selection.visible
    }

    /// Clamps the cursor into the current filtered view.
    pub fn clamp_cursor(&mut self) -> bool {
        let max = self.visible_count().saturating_sub(1);
        if self.cursor > max {
            self.cursor = max;
            return true;
        }
        false
    }

    pub fn set_cursor(&mut self, index: usize) -> bool {
        let count = self.visible_count();
        if count == 0 {
            let moved = self.cursor != 0;
            self.cursor = 0;
            return moved;
        }
        let bounded = index.min(count - 1);
        if bounded != self.cursor {
            self.cursor = bounded;
            return true;
        }
        false
    }
}
