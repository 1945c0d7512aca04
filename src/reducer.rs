//! Reducer - pure function: (state, action) -> DispatchResult

use tui_dispatch::{DataResource, DispatchResult};

use crate::action::Action;
use crate::catalog;
use crate::effect::Effect;
use crate::state::{AppState, FocusArea};

pub fn reducer(state: &mut AppState, action: Action) -> DispatchResult<Effect> {
    match action {
        // ===== Catalog =====
        Action::Init => {
            if !state.catalog.is_empty() {
                return DispatchResult::unchanged();
            }
            state.catalog = DataResource::Loading;
            DispatchResult::changed_with(Effect::LoadCatalog {
                url: state.config.catalog_url(),
            })
        }

        Action::CatalogDidLoad(entries) => {
            tracing::info!(count = entries.len(), "catalog loaded");
            state.catalog = DataResource::Loaded(entries);
            state.clamp_cursor();
            with_card_sprites(state, true)
        }

        Action::CatalogDidError(error) => {
            state.catalog = DataResource::Failed(error);
            state.cursor = 0;
            DispatchResult::changed()
        }

        // ===== Search =====
        Action::SearchQueryChange(query) => {
            if query == state.query {
                return DispatchResult::unchanged();
            }
            state.query = query;
            state.cursor = 0;
            with_card_sprites(state, true)
        }

        Action::SearchSubmit => {
            if state.visible_count() == 0 {
                return DispatchResult::unchanged();
            }
            state.focus = FocusArea::Grid;
            DispatchResult::changed()
        }

        // ===== Grid =====
        Action::GridMove(delta) => move_cursor(state, delta as isize),

        Action::GridMoveRow(delta) => {
            let columns = state.grid_columns() as isize;
            move_cursor(state, delta as isize * columns)
        }

        Action::GridPage(delta) => {
            let page = (state.grid_columns() * state.grid_page_rows()) as isize;
            move_cursor(state, delta as isize * page)
        }

        Action::GridJumpTop => {
            let moved = state.set_cursor(0);
            with_card_sprites(state, moved)
        }

        Action::GridJumpBottom => {
            let last = state.visible_count().saturating_sub(1);
            let moved = state.set_cursor(last);
            with_card_sprites(state, moved)
        }

        Action::GridSelect(index) => {
            let moved = state.set_cursor(index);
            let refocused = state.focus != FocusArea::Grid;
            state.focus = FocusArea::Grid;
            with_card_sprites(state, moved || refocused)
        }

        Action::GridToggleArt => {
            state.card_art = !state.card_art;
            with_card_sprites(state, true)
        }

        // ===== Focus =====
        Action::FocusNext => {
            state.focus = match state.focus {
                FocusArea::Search => FocusArea::Grid,
                FocusArea::Grid => FocusArea::Search,
            };
            DispatchResult::changed()
        }

        Action::FocusSet(area) => {
            if state.focus == area {
                return DispatchResult::unchanged();
            }
            state.focus = area;
            DispatchResult::changed()
        }

        // ===== Detail =====
        Action::DetailOpen(url) => {
            state.selection.request_seq += 1;
            let seq = state.selection.request_seq;
            state.selection.pending = Some(seq);
            DispatchResult::changed_with(Effect::LoadDetail { seq, url })
        }

        Action::DetailDidLoad { seq, detail } => {
            if state.selection.pending != Some(seq) {
                tracing::debug!(seq, name = %detail.name, "discarding stale detail");
                return DispatchResult::unchanged();
            }
            let id = detail.id;
            let url = state.sprite_url_for(&id.to_string());
            state.selection.pending = None;
            state.selection.detail = Some(detail);
            state.selection.visible = true;
            state.selection.sprite = DataResource::Loading;
            DispatchResult::changed_with(Effect::LoadSprite { id, url })
        }

        Action::DetailDidError { seq, error } => {
            if state.selection.pending != Some(seq) {
                tracing::debug!(seq, %error, "discarding stale detail error");
                return DispatchResult::unchanged();
            }
            state.selection.pending = None;
            DispatchResult::changed()
        }

        Action::DetailClose => {
            let had_work = state.selection.pending.is_some() || state.selection.sprite.is_loading();
            let was_open = state.selection.visible || state.selection.detail.is_some();
            state.selection.visible = false;
            state.selection.detail = None;
            state.selection.pending = None;
            state.selection.sprite = DataResource::Empty;
            match (was_open, had_work) {
                (_, true) => DispatchResult::changed_with(Effect::CancelDetail),
                (true, false) => DispatchResult::changed(),
                (false, false) => DispatchResult::unchanged(),
            }
        }

        // ===== Sprite =====
        Action::SpriteDidLoad { id, sprite } => {
            if !sprite_is_current(state, id) {
                return DispatchResult::unchanged();
            }
            state.selection.sprite = DataResource::Loaded(sprite);
            DispatchResult::changed()
        }

        Action::SpriteDidError { id, error } => {
            if !sprite_is_current(state, id) {
                return DispatchResult::unchanged();
            }
            state.selection.sprite = DataResource::Failed(error);
            DispatchResult::changed()
        }

        Action::CardSpriteDidLoad { id, sprite } => match state.card_sprites.get_mut(&id) {
            Some(slot) => {
                *slot = DataResource::Loaded(sprite);
                DispatchResult::changed()
            }
            None => DispatchResult::unchanged(),
        },

        Action::CardSpriteDidError { id, error } => {
            tracing::debug!(%id, %error, "card artwork unavailable");
            match state.card_sprites.get_mut(&id) {
                Some(slot) => {
                    *slot = DataResource::Failed(error);
                    DispatchResult::changed()
                }
                None => DispatchResult::unchanged(),
            }
        }

        // ===== UI =====
        Action::UiTerminalResize(width, height) => {
            if state.terminal_size == (width, height) {
                return DispatchResult::unchanged();
            }
            state.terminal_size = (width, height);
            with_card_sprites(state, true)
        }

        Action::Render => DispatchResult::changed(),

        // ===== Global =====
        Action::Tick => {
            if state.catalog.is_loading() || state.selection.is_loading() {
                state.tick = state.tick.wrapping_add(1);
                DispatchResult::changed()
            } else {
                DispatchResult::unchanged()
            }
        }

        Action::Quit => DispatchResult::unchanged(),
    }
}

fn move_cursor(state: &mut AppState, delta: isize) -> DispatchResult<Effect> {
    let target = (state.cursor as isize + delta).max(0) as usize;
    let moved = state.set_cursor(target);
    with_card_sprites(state, moved)
}

/// Requests artwork for cards within one page of the cursor row, once per id.
fn card_sprite_requests(state: &mut AppState) -> Vec<Effect> {
    if !state.card_art {
        return Vec::new();
    }
    let columns = state.grid_columns();
    let page_rows = state.grid_page_rows();
    let cursor_row = state.cursor / columns;
    let first = cursor_row.saturating_sub(page_rows) * columns;
    let last = (cursor_row + page_rows + 1) * columns;

    let ids: Vec<String> = state
        .visible_entries()
        .into_iter()
        .take(last)
        .skip(first)
        .map(|entry| catalog::entry_id(&entry.url).to_string())
        .filter(|id| !id.is_empty())
        .collect();

    let mut effects = Vec::new();
    for id in ids {
        if state.card_sprites.contains_key(&id) {
            continue;
        }
        state.card_sprites.insert(id.clone(), DataResource::Loading);
        let url = state.sprite_url_for(&id);
        effects.push(Effect::LoadCardSprite { id, url });
    }
    effects
}

fn with_card_sprites(state: &mut AppState, changed: bool) -> DispatchResult<Effect> {
    let effects = card_sprite_requests(state);
    DispatchResult {
        changed: changed || !effects.is_empty(),
        effects,
    }
}

fn sprite_is_current(state: &AppState, id: u32) -> bool {
    state
        .selection
        .displayed()
        .is_some_and(|detail| detail.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{Ability, CatalogEntry, PokemonDetail};

    fn entry(name: &str, id: u32) -> CatalogEntry {
        CatalogEntry {
            name: name.to_string(),
            url: format!("https://pokeapi.co/api/v2/pokemon/{id}/"),
        }
    }

    fn detail(id: u32, name: &str) -> PokemonDetail {
        PokemonDetail {
            id,
            name: name.to_string(),
            height: 4,
            weight: 60,
            abilities: vec![Ability {
                name: "static".into(),
            }],
        }
    }

    fn loaded_state() -> AppState {
        let mut state = AppState::default();
        state.catalog = DataResource::Loaded(vec![
            entry("bulbasaur", 1),
            entry("ivysaur", 2),
            entry("venusaur", 3),
            entry("pikachu", 25),
            entry("raichu", 26),
        ]);
        state
    }

    #[test]
    fn test_init_requests_catalog_once() {
        let mut state = AppState::default();

        let result = reducer(&mut state, Action::Init);
        assert!(result.changed);
        assert!(state.catalog.is_loading());
        assert_eq!(
            result.effects,
            vec![Effect::LoadCatalog {
                url: "https://pokeapi.co/api/v2/pokemon?limit=5000".into()
            }]
        );

        let again = reducer(&mut state, Action::Init);
        assert!(!again.changed);
        assert!(again.effects.is_empty());
    }

    #[test]
    fn test_init_after_failure_does_not_retry() {
        let mut state = AppState::default();
        reducer(&mut state, Action::Init);
        reducer(&mut state, Action::CatalogDidError("offline".into()));

        let result = reducer(&mut state, Action::Init);
        assert!(result.effects.is_empty());
        assert!(state.catalog.is_failed());
        assert!(state.catalog_entries().is_empty());
    }

    #[test]
    fn test_query_change_resets_cursor() {
        let mut state = loaded_state();
        state.cursor = 3;

        let result = reducer(&mut state, Action::SearchQueryChange("saur".into()));
        assert!(result.changed);
        assert_eq!(state.cursor, 0);
        assert_eq!(state.visible_count(), 3);

        let same = reducer(&mut state, Action::SearchQueryChange("saur".into()));
        assert!(!same.changed);
    }

    #[test]
    fn test_grid_move_clamps_to_view() {
        let mut state = loaded_state();
        reducer(&mut state, Action::SearchQueryChange("chu".into()));

        assert!(reducer(&mut state, Action::GridMove(1)).changed);
        assert_eq!(state.cursor, 1);
        assert!(!reducer(&mut state, Action::GridMove(5)).changed);
        assert_eq!(state.cursor, 1);
        assert!(reducer(&mut state, Action::GridMove(-9)).changed);
        assert_eq!(state.cursor, 0);
    }

    #[test]
    fn test_grid_row_moves_by_columns() {
        let mut state = loaded_state();
        // 46 wide fits two cards per row
        state.terminal_size = (46, 40);
        assert_eq!(state.grid_columns(), 2);

        reducer(&mut state, Action::GridMoveRow(1));
        assert_eq!(state.cursor, 2);
        reducer(&mut state, Action::GridJumpBottom);
        assert_eq!(state.cursor, 4);
        reducer(&mut state, Action::GridJumpTop);
        assert_eq!(state.cursor, 0);
    }

    #[test]
    fn test_search_submit_moves_focus_when_results_exist() {
        let mut state = loaded_state();
        reducer(&mut state, Action::SearchQueryChange("zzz".into()));
        assert!(!reducer(&mut state, Action::SearchSubmit).changed);
        assert_eq!(state.focus, FocusArea::Search);

        reducer(&mut state, Action::SearchQueryChange("pika".into()));
        reducer(&mut state, Action::SearchSubmit);
        assert_eq!(state.focus, FocusArea::Grid);
    }

    #[test]
    fn test_detail_open_then_load_shows_overlay() {
        let mut state = loaded_state();
        let url = state
            .entry_under_cursor()
            .map(|entry| entry.url.clone())
            .expect("entry under cursor");

        let result = reducer(&mut state, Action::DetailOpen(url.clone()));
        assert_eq!(result.effects, vec![Effect::LoadDetail { seq: 1, url }]);
        assert!(!state.overlay_open());
        assert!(state.selection.is_loading());

        let result = reducer(
            &mut state,
            Action::DetailDidLoad {
                seq: 1,
                detail: detail(1, "bulbasaur"),
            },
        );
        assert!(state.overlay_open());
        assert_eq!(state.selection.displayed().map(|d| d.id), Some(1));
        assert!(state.selection.sprite.is_loading());
        assert!(matches!(
            result.effects.as_slice(),
            [Effect::LoadSprite { id: 1, url }] if url.ends_with("/1.png")
        ));
    }

    #[test]
    fn test_latest_selection_wins() {
        let mut state = loaded_state();
        reducer(&mut state, Action::DetailOpen("x".into()));
        reducer(&mut state, Action::DetailOpen("y".into()));

        // y resolves first, then the stale x arrives
        reducer(
            &mut state,
            Action::DetailDidLoad {
                seq: 2,
                detail: detail(26, "raichu"),
            },
        );
        let stale = reducer(
            &mut state,
            Action::DetailDidLoad {
                seq: 1,
                detail: detail(25, "pikachu"),
            },
        );

        assert!(!stale.changed);
        assert_eq!(
            state.selection.displayed().map(|d| d.name.as_str()),
            Some("raichu")
        );
    }

    #[test]
    fn test_stale_result_before_latest_is_ignored() {
        let mut state = loaded_state();
        reducer(&mut state, Action::DetailOpen("x".into()));
        reducer(&mut state, Action::DetailOpen("y".into()));

        reducer(
            &mut state,
            Action::DetailDidLoad {
                seq: 1,
                detail: detail(25, "pikachu"),
            },
        );
        assert!(!state.overlay_open());
        assert!(state.selection.detail.is_none());
    }

    #[test]
    fn test_close_is_sticky_against_in_flight_fetch() {
        let mut state = loaded_state();
        reducer(&mut state, Action::DetailOpen("x".into()));

        let close = reducer(&mut state, Action::DetailClose);
        assert_eq!(close.effects, vec![Effect::CancelDetail]);

        let late = reducer(
            &mut state,
            Action::DetailDidLoad {
                seq: 1,
                detail: detail(25, "pikachu"),
            },
        );
        assert!(!late.changed);
        assert!(!state.overlay_open());
        assert!(state.selection.detail.is_none());
    }

    #[test]
    fn test_failed_fetch_keeps_current_detail() {
        let mut state = loaded_state();
        reducer(&mut state, Action::DetailOpen("x".into()));
        reducer(
            &mut state,
            Action::DetailDidLoad {
                seq: 1,
                detail: detail(25, "pikachu"),
            },
        );

        reducer(&mut state, Action::DetailOpen("y".into()));
        reducer(
            &mut state,
            Action::DetailDidError {
                seq: 2,
                error: "500".into(),
            },
        );

        assert!(state.overlay_open());
        assert_eq!(state.selection.displayed().map(|d| d.id), Some(25));
        assert!(!state.selection.is_loading());
    }

    #[test]
    fn test_failed_fetch_does_not_open_overlay() {
        let mut state = loaded_state();
        reducer(&mut state, Action::DetailOpen("x".into()));
        reducer(
            &mut state,
            Action::DetailDidError {
                seq: 1,
                error: "timeout".into(),
            },
        );
        assert!(!state.overlay_open());
        assert!(state.selection.detail.is_none());
    }

    #[test]
    fn test_close_twice_is_idempotent() {
        let mut state = loaded_state();
        reducer(&mut state, Action::DetailOpen("x".into()));
        reducer(
            &mut state,
            Action::DetailDidLoad {
                seq: 1,
                detail: detail(25, "pikachu"),
            },
        );
        reducer(
            &mut state,
            Action::SpriteDidError {
                id: 25,
                error: "404".into(),
            },
        );

        let first = reducer(&mut state, Action::DetailClose);
        assert!(first.changed);
        let after_first = state.selection.clone();

        let second = reducer(&mut state, Action::DetailClose);
        assert!(!second.changed);
        assert!(second.effects.is_empty());
        assert_eq!(state.selection.visible, after_first.visible);
        assert_eq!(state.selection.detail, after_first.detail);
        assert_eq!(state.selection.pending, after_first.pending);
        assert!(state.selection.sprite.is_empty());
    }

    #[test]
    fn test_sprite_for_other_detail_is_ignored() {
        let mut state = loaded_state();
        reducer(&mut state, Action::DetailOpen("x".into()));
        reducer(
            &mut state,
            Action::DetailDidLoad {
                seq: 1,
                detail: detail(25, "pikachu"),
            },
        );

        let sprite = crate::sprite::SpriteData {
            width: 1,
            height: 1,
            pixels: vec![[1, 2, 3, 255]],
        };
        let other = reducer(
            &mut state,
            Action::SpriteDidLoad {
                id: 26,
                sprite: sprite.clone(),
            },
        );
        assert!(!other.changed);
        assert!(state.selection.sprite.is_loading());

        reducer(&mut state, Action::SpriteDidLoad { id: 25, sprite });
        assert!(state.selection.sprite.is_loaded());
    }

    #[test]
    fn test_tick_only_rerenders_while_loading() {
        let mut state = AppState::default();
        assert!(!reducer(&mut state, Action::Tick).changed);

        reducer(&mut state, Action::Init);
        assert!(reducer(&mut state, Action::Tick).changed);
        assert_eq!(state.tick, 1);
    }

    #[test]
    fn test_grid_select_moves_cursor_and_focus() {
        let mut state = loaded_state();
        assert_eq!(state.focus, FocusArea::Search);

        assert!(reducer(&mut state, Action::GridSelect(3)).changed);
        assert_eq!(state.cursor, 3);
        assert_eq!(state.focus, FocusArea::Grid);

        reducer(&mut state, Action::GridSelect(99));
        assert_eq!(state.cursor, 4);
    }

    #[test]
    fn test_card_sprites_requested_once_per_id() {
        let mut state = loaded_state();

        let result = reducer(&mut state, Action::SearchQueryChange("chu".into()));
        let ids: Vec<_> = result
            .effects
            .iter()
            .filter_map(|effect| match effect {
                Effect::LoadCardSprite { id, url } => {
                    assert!(url.ends_with(&format!("/{id}.png")));
                    Some(id.as_str())
                }
                _ => None,
            })
            .collect();
        assert_eq!(ids, vec!["25", "26"]);
        assert!(state.card_sprites["25"].is_loading());

        let again = reducer(&mut state, Action::GridMove(1));
        assert!(again.effects.is_empty());
    }

    #[test]
    fn test_card_sprites_stay_near_cursor() {
        let entries = (1..=60).map(|id| entry(&format!("mon{id}"), id)).collect();
        let mut state = AppState {
            catalog: DataResource::Loaded(entries),
            terminal_size: (46, 23),
            ..Default::default()
        };
        // two columns, two rows per page
        assert_eq!(state.grid_page_rows(), 2);

        let first = reducer(&mut state, Action::GridJumpTop);
        assert_eq!(first.effects.len(), 6);
        assert!(!state.card_sprites.contains_key("7"));

        // a taller terminal widens the window by one row
        let result = reducer(&mut state, Action::UiTerminalResize(46, 30));
        assert_eq!(result.effects.len(), 2);

        reducer(&mut state, Action::GridJumpBottom);
        assert!(state.card_sprites.contains_key("60"));
        assert!(!state.card_sprites.contains_key("30"));
    }

    #[test]
    fn test_card_art_off_requests_nothing() {
        let mut state = loaded_state();
        reducer(&mut state, Action::GridToggleArt);
        assert!(!state.card_art);

        let result = reducer(&mut state, Action::SearchQueryChange("saur".into()));
        assert!(result.effects.is_empty());
        assert!(state.card_sprites.is_empty());

        let on = reducer(&mut state, Action::GridToggleArt);
        assert_eq!(on.effects.len(), 3);
    }

    #[test]
    fn test_card_sprite_result_without_request_is_ignored() {
        let mut state = loaded_state();
        let sprite = crate::sprite::SpriteData {
            width: 1,
            height: 1,
            pixels: vec![[1, 2, 3, 255]],
        };

        let result = reducer(
            &mut state,
            Action::CardSpriteDidLoad {
                id: "25".into(),
                sprite: sprite.clone(),
            },
        );
        assert!(!result.changed);
        assert!(state.card_sprite("25").is_none());

        reducer(&mut state, Action::SearchQueryChange("pika".into()));
        reducer(
            &mut state,
            Action::CardSpriteDidLoad {
                id: "25".into(),
                sprite,
            },
        );
        assert!(state.card_sprite("25").is_some());
    }
}
