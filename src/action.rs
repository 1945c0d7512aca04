//! Actions: user intents and async results

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::sprite::SpriteData;
use crate::state::{CatalogEntry, FocusArea, PokemonDetail};

#[derive(tui_dispatch::Action, Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[action(infer_categories)]
pub enum Action {
    /// Startup: requests the catalog once
    Init,

    // ===== Catalog category =====
    CatalogDidLoad(Vec<CatalogEntry>),
    CatalogDidError(String),

    // ===== Search category =====
    /// Search text changed (full new value)
    SearchQueryChange(String),
    /// Leave the search box and move into the grid
    SearchSubmit,

    // ===== Grid category =====
    /// Move the cursor by whole cards
    GridMove(i16),
    /// Move the cursor by whole rows
    GridMoveRow(i16),
    GridPage(i16),
    GridJumpTop,
    GridJumpBottom,
    /// Put the cursor on a card picked with the mouse
    GridSelect(usize),
    /// Show or hide artwork on cards
    GridToggleArt,

    // ===== Focus category =====
    FocusNext,
    FocusSet(FocusArea),

    // ===== Detail category =====
    /// Intent: show the entry behind this detail URL
    DetailOpen(String),
    DetailDidLoad { seq: u64, detail: PokemonDetail },
    DetailDidError { seq: u64, error: String },
    DetailClose,

    // ===== Sprite category =====
    SpriteDidLoad { id: u32, sprite: SpriteData },
    SpriteDidError { id: u32, error: String },

    // ===== Card category =====
    CardSpriteDidLoad { id: String, sprite: SpriteData },
    CardSpriteDidError { id: String, error: String },

    // ===== UI category =====
    UiTerminalResize(u16, u16),
    /// Force a re-render (for cursor movement, etc.)
    Render,

    // ===== Uncategorized (global) =====
    Tick,
    Quit,
}
