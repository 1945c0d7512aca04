pub mod catalog_grid;
pub mod detail_overlay;
pub mod search_bar;
pub mod status_line;
pub mod theme;

// Re-export core Component trait
pub use tui_dispatch::Component;

pub use catalog_grid::{CatalogGrid, CatalogGridProps};
pub use detail_overlay::{overlay_area, DetailOverlay, DetailOverlayProps};
pub use search_bar::{SearchBar, SearchBarProps};
pub use status_line::{StatusLine, StatusLineProps};
