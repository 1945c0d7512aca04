//! Screen layout and event routing

use std::cell::RefCell;
use std::rc::Rc;

use crossterm::event::{KeyCode, KeyModifiers};
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Paragraph},
    Frame,
};
use tui_dispatch::{
    EventBus, EventContext, EventKind, EventRoutingState, HandlerResponse, RenderContext,
};

use crate::action::Action;
use crate::components::theme::{title_style, BG_BASE};
use crate::components::{
    overlay_area, CatalogGrid, CatalogGridProps, Component, DetailOverlay, DetailOverlayProps,
    SearchBar, SearchBarProps, StatusLine, StatusLineProps,
};
use crate::state::{AppState, FocusArea};

pub const APP_TITLE: &str = "Pokémon Finder";

#[derive(tui_dispatch::ComponentId, Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum FinderComponentId {
    Search,
    Grid,
    Overlay,
}

#[derive(tui_dispatch::BindingContext, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FinderContext {
    Search,
    Grid,
    Overlay,
}

pub type FinderBus = EventBus<AppState, Action, FinderComponentId, FinderContext>;

impl EventRoutingState<FinderComponentId, FinderContext> for AppState {
    fn focused(&self) -> Option<FinderComponentId> {
        if self.overlay_open() {
            return Some(FinderComponentId::Overlay);
        }
        match self.focus {
            FocusArea::Search => Some(FinderComponentId::Search),
            FocusArea::Grid => Some(FinderComponentId::Grid),
        }
    }

    fn modal(&self) -> Option<FinderComponentId> {
        if self.overlay_open() {
            Some(FinderComponentId::Overlay)
        } else {
            None
        }
    }

    fn binding_context(&self, id: FinderComponentId) -> FinderContext {
        match id {
            FinderComponentId::Search => FinderContext::Search,
            FinderComponentId::Grid => FinderContext::Grid,
            FinderComponentId::Overlay => FinderContext::Overlay,
        }
    }

    fn default_context(&self) -> FinderContext {
        FinderContext::Search
    }
}

pub struct FinderUi {
    search: SearchBar,
    grid: CatalogGrid,
    overlay: DetailOverlay,
    status: StatusLine,
}

impl Default for FinderUi {
    fn default() -> Self {
        Self::new()
    }
}

impl FinderUi {
    pub fn new() -> Self {
        Self {
            search: SearchBar::new(),
            grid: CatalogGrid::new(),
            overlay: DetailOverlay::new(),
            status: StatusLine::new(),
        }
    }

    pub fn render(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        state: &AppState,
        render_ctx: RenderContext,
        event_ctx: &mut EventContext<FinderComponentId>,
    ) {
        frame.render_widget(Block::default().style(Style::default().bg(BG_BASE)), area);

        let chunks = Layout::vertical([
            Constraint::Length(1), // Title
            Constraint::Length(3), // Search box
            Constraint::Min(1),    // Grid
            Constraint::Length(3), // Status bar
        ])
        .split(area);

        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(APP_TITLE, title_style())))
                .alignment(Alignment::Center),
            chunks[0],
        );

        let overlay_open = state.overlay_open();
        let focused = render_ctx.is_focused() && !overlay_open;

        event_ctx.set_component_area(FinderComponentId::Search, chunks[1]);
        self.search.render(
            frame,
            chunks[1],
            SearchBarProps {
                query: &state.query,
                is_focused: focused && state.focus == FocusArea::Search,
                on_change: Action::SearchQueryChange,
            },
        );

        event_ctx.set_component_area(FinderComponentId::Grid, chunks[2]);
        self.grid.render(
            frame,
            chunks[2],
            CatalogGridProps {
                state,
                is_focused: focused && state.focus == FocusArea::Grid,
            },
        );

        self.status
            .render(frame, chunks[3], StatusLineProps { state });

        if let Some(detail) = state.selection.displayed() {
            event_ctx.set_component_area(FinderComponentId::Overlay, overlay_area(area));
            self.overlay.render(
                frame,
                area,
                DetailOverlayProps {
                    detail,
                    sprite: &state.selection.sprite,
                    loading: state.selection.is_loading(),
                    tick: state.tick,
                    area,
                    is_focused: render_ctx.is_focused(),
                },
            );
        } else {
            event_ctx
                .component_areas
                .remove(&FinderComponentId::Overlay);
        }
    }

    fn handle_search_event(&mut self, event: &EventKind, state: &AppState) -> HandlerResponse<Action> {
        let props = SearchBarProps {
            query: &state.query,
            is_focused: true,
            on_change: Action::SearchQueryChange,
        };
        handler_response(self.search.handle_event(event, props).into_iter().collect())
    }

    fn handle_grid_event(&mut self, event: &EventKind, state: &AppState) -> HandlerResponse<Action> {
        let props = CatalogGridProps {
            state,
            is_focused: true,
        };
        handler_response(self.grid.handle_event(event, props).into_iter().collect())
    }

    fn handle_overlay_event(
        &mut self,
        event: &EventKind,
        state: &AppState,
    ) -> HandlerResponse<Action> {
        let Some(detail) = state.selection.displayed() else {
            return HandlerResponse::ignored();
        };
        let (width, height) = state.terminal_size;
        let props = DetailOverlayProps {
            detail,
            sprite: &state.selection.sprite,
            loading: state.selection.is_loading(),
            tick: state.tick,
            area: Rect::new(0, 0, width, height),
            is_focused: true,
        };
        let actions: Vec<_> = self.overlay.handle_event(event, props).into_iter().collect();
        // unused global keys still reach the global handlers
        if actions.is_empty() && event.is_global() {
            return HandlerResponse::ignored();
        }
        HandlerResponse {
            actions,
            consumed: true,
            needs_render: false,
        }
    }
}

fn handler_response(actions: Vec<Action>) -> HandlerResponse<Action> {
    if actions.is_empty() {
        HandlerResponse::ignored()
    } else {
        HandlerResponse {
            actions,
            consumed: true,
            needs_render: false,
        }
    }
}

/// Registers the search, grid and overlay handlers plus the global keys.
pub fn build_bus(ui: &Rc<RefCell<FinderUi>>) -> FinderBus {
    let mut bus = FinderBus::new();

    let ui_search = Rc::clone(ui);
    bus.register(FinderComponentId::Search, move |event, state| {
        ui_search
            .borrow_mut()
            .handle_search_event(&event.kind, state)
    });

    let ui_grid = Rc::clone(ui);
    bus.register(FinderComponentId::Grid, move |event, state| {
        ui_grid.borrow_mut().handle_grid_event(&event.kind, state)
    });

    let ui_overlay = Rc::clone(ui);
    bus.register(FinderComponentId::Overlay, move |event, state| {
        ui_overlay
            .borrow_mut()
            .handle_overlay_event(&event.kind, state)
    });

    bus.register_global(|event, _state| match event.kind {
        EventKind::Resize(width, height) => {
            HandlerResponse::action(Action::UiTerminalResize(width, height)).with_render()
        }
        EventKind::Key(key)
            if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) =>
        {
            HandlerResponse::action(Action::Quit)
        }
        _ => HandlerResponse::ignored(),
    });

    bus
}
