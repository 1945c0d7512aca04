use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::Span,
    widgets::Borders,
    Frame,
};
use tui_dispatch::EventKind;
use tui_dispatch_components::style::BorderStyle;
use tui_dispatch_components::{
    BaseStyle, Padding, StatusBar, StatusBarHint, StatusBarItem, StatusBarProps,
    StatusBarSection, StatusBarStyle,
};

use super::theme::{spinner, ACCENT_GOLD, ACCENT_TEAL, BG_PANEL, TEXT_DIM, TEXT_MAIN};
use super::Component;
use crate::action::Action;
use crate::state::{AppState, FocusArea};

pub struct StatusLineProps<'a> {
    pub state: &'a AppState,
}

/// Footer with key hints and load progress
#[derive(Default)]
pub struct StatusLine {
    bar: StatusBar,
}

impl StatusLine {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Progress text for the right side of the footer.
pub fn status_text(state: &AppState) -> String {
    if state.catalog.is_loading() {
        format!("{} Loading catalog...", spinner(state.tick))
    } else if state.selection.is_loading() {
        format!("{} Loading Pokémon...", spinner(state.tick))
    } else if state.catalog.is_loaded() {
        format!(
            "{}/{} shown",
            state.visible_count(),
            state.catalog_entries().len()
        )
    } else {
        String::new()
    }
}

fn status_hints(state: &AppState) -> Vec<StatusBarHint<'static>> {
    if state.overlay_open() {
        return vec![
            StatusBarHint::new("Esc/Enter", "Close"),
            StatusBarHint::new("Ctrl+C", "Quit"),
        ];
    }
    match state.focus {
        FocusArea::Search => vec![
            StatusBarHint::new("Enter/Down", "Browse"),
            StatusBarHint::new("Esc", "Clear"),
            StatusBarHint::new("Tab", "Focus"),
            StatusBarHint::new("Ctrl+C", "Quit"),
        ],
        FocusArea::Grid => vec![
            StatusBarHint::new("←↑↓→", "Move"),
            StatusBarHint::new("Enter", "Open"),
            StatusBarHint::new("/", "Search"),
            StatusBarHint::new("v", "Art"),
            StatusBarHint::new("q", "Quit"),
        ],
    }
}

impl Component<Action> for StatusLine {
    type Props<'a> = StatusLineProps<'a>;

    fn handle_event(
        &mut self,
        _event: &EventKind,
        _props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        None
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let hints = status_hints(props.state);
        let status = status_text(props.state);
        let status_items = [StatusBarItem::span(Span::styled(
            status.as_str(),
            Style::default().fg(ACCENT_GOLD),
        ))];

        let style = StatusBarStyle {
            base: BaseStyle {
                border: Some(BorderStyle {
                    borders: Borders::ALL,
                    style: Style::default().fg(TEXT_DIM),
                    focused_style: None,
                }),
                padding: Padding::xy(1, 0),
                bg: Some(BG_PANEL),
                fg: Some(TEXT_MAIN),
            },
            text: Style::default().fg(TEXT_DIM),
            hint_key: Style::default()
                .fg(ACCENT_TEAL)
                .add_modifier(Modifier::BOLD),
            hint_label: Style::default().fg(TEXT_DIM),
            separator: Style::default().fg(TEXT_DIM),
        };

        let bar_props = StatusBarProps {
            left: StatusBarSection::hints(&hints).with_separator("  "),
            center: StatusBarSection::empty(),
            right: StatusBarSection::items(&status_items),
            style,
            is_focused: false,
        };
        Component::<Action>::render(&mut self.bar, frame, area, bar_props);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::CatalogEntry;
    use tui_dispatch::testing::*;
    use tui_dispatch::DataResource;

    #[test]
    fn test_status_text() {
        let mut state = AppState {
            catalog: DataResource::Loading,
            ..Default::default()
        };
        assert!(status_text(&state).ends_with("Loading catalog..."));

        state.catalog = DataResource::Loaded(vec![
            CatalogEntry {
                name: "pikachu".into(),
                url: "https://pokeapi.co/api/v2/pokemon/25/".into(),
            },
            CatalogEntry {
                name: "eevee".into(),
                url: "https://pokeapi.co/api/v2/pokemon/133/".into(),
            },
        ]);
        state.query = "pika".into();
        assert_eq!(status_text(&state), "1/2 shown");

        state.selection.pending = Some(1);
        assert!(status_text(&state).ends_with("Loading Pokémon..."));

        state.selection.pending = None;
        state.catalog = DataResource::Failed("offline".into());
        assert_eq!(status_text(&state), "");
    }

    #[test]
    fn test_render_hints_follow_focus() {
        let mut state = AppState::default();
        let mut render = RenderHarness::new(80, 3);
        let mut line = StatusLine::new();

        let output = render.render_to_string_plain(|frame| {
            line.render(frame, frame.area(), StatusLineProps { state: &state });
        });
        assert!(output.contains("Browse"));

        state.focus = FocusArea::Grid;
        let output = render.render_to_string_plain(|frame| {
            line.render(frame, frame.area(), StatusLineProps { state: &state });
        });
        assert!(output.contains("Open"));
    }
}
