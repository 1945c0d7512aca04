//! Wrapping grid of catalog cards

use crossterm::event::{KeyCode, MouseButton, MouseEventKind};
use ratatui::{
    layout::{Alignment, Rect},
    style::Style,
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use tui_dispatch::EventKind;
use tui_dispatch_components::highlight_substring;

use super::theme::{
    border_style, match_style, spinner, ACCENT_GOLD, ACCENT_TEAL, BG_HIGHLIGHT, BG_PANEL,
    TEXT_DIM, TEXT_MAIN,
};
use super::Component;
use crate::action::Action;
use crate::catalog;
use crate::sprite::SpriteData;
use crate::state::{AppState, CatalogEntry, FocusArea, CARD_ART_ROWS, CARD_WIDTH};

pub struct CatalogGridProps<'a> {
    pub state: &'a AppState,
    pub is_focused: bool,
}

/// Card placement from the last render, used to hit-test clicks.
#[derive(Clone, Copy, Debug)]
struct GridLayout {
    inner: Rect,
    columns: usize,
    rows: usize,
    card_height: u16,
}

/// Keeps the first visible card row between renders.
#[derive(Default)]
pub struct CatalogGrid {
    offset_row: usize,
    layout: Option<GridLayout>,
}

impl CatalogGrid {
    pub fn new() -> Self {
        Self::default()
    }

    fn scroll_to(&mut self, cursor_row: usize, visible_rows: usize) {
        if cursor_row < self.offset_row {
            self.offset_row = cursor_row;
        } else if cursor_row >= self.offset_row + visible_rows {
            self.offset_row = cursor_row + 1 - visible_rows;
        }
    }

    /// Index into the filtered view of the card drawn at this cell.
    fn card_at(&self, column: u16, row: u16) -> Option<usize> {
        let layout = self.layout?;
        let inner = layout.inner;
        if column < inner.x || column >= inner.right() || row < inner.y || row >= inner.bottom() {
            return None;
        }
        let col = ((column - inner.x) / CARD_WIDTH) as usize;
        let row = ((row - inner.y) / layout.card_height) as usize;
        if col >= layout.columns || row >= layout.rows {
            return None;
        }
        Some((self.offset_row + row) * layout.columns + col)
    }

    /// `art` is `None` when cards have no artwork row.
    fn render_card(
        frame: &mut Frame,
        area: Rect,
        entry: &CatalogEntry,
        query: &str,
        selected: bool,
        is_focused: bool,
        art: Option<Option<&SpriteData>>,
    ) {
        let border = match (selected, is_focused) {
            (true, true) => Style::default().fg(ACCENT_TEAL),
            (true, false) => Style::default().fg(ACCENT_GOLD),
            _ => Style::default().fg(TEXT_DIM),
        };
        let bg = if selected { BG_HIGHLIGHT } else { BG_PANEL };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border)
            .style(Style::default().bg(bg).fg(TEXT_MAIN));

        let inner = block.inner(area);
        frame.render_widget(block, area);

        let mut text_area = inner;
        if let Some(sprite) = art.filter(|_| inner.height > CARD_ART_ROWS) {
            if let Some(sprite) = sprite {
                let (cols, rows) = sprite.fit(inner.width, CARD_ART_ROWS);
                let x = inner.x + (inner.width - cols) / 2;
                let y = inner.y + (CARD_ART_ROWS - rows) / 2;
                frame.render_widget(
                    Paragraph::new(sprite.to_lines(cols, rows)),
                    Rect::new(x, y, cols, rows),
                );
            }
            text_area.y += CARD_ART_ROWS;
            text_area.height -= CARD_ART_ROWS;
        }

        let name = catalog::display_name(&entry.name);
        let text = Text::from(vec![
            Line::from(Span::styled(
                format!("#{}", catalog::entry_id(&entry.url)),
                Style::default().fg(TEXT_DIM),
            )),
            highlight_substring(&name, query, Style::default().fg(TEXT_MAIN), match_style()),
        ]);
        frame.render_widget(Paragraph::new(text), text_area);
    }

    fn render_notice(frame: &mut Frame, area: Rect, text: String) {
        let paragraph = Paragraph::new(Line::from(Span::styled(
            text,
            Style::default().fg(TEXT_DIM),
        )))
        .alignment(Alignment::Center);
        let y = area.y + area.height / 2;
        frame.render_widget(paragraph, Rect::new(area.x, y, area.width, 1));
    }
}

impl Component<Action> for CatalogGrid {
    type Props<'a> = CatalogGridProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        let state = props.state;
        let key = match event {
            EventKind::Mouse(mouse) => {
                if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
                    return Vec::new();
                }
                let Some(index) = self.card_at(mouse.column, mouse.row) else {
                    return Vec::new();
                };
                return match state.visible_entries().get(index) {
                    Some(entry) => vec![
                        Action::GridSelect(index),
                        Action::DetailOpen(entry.url.clone()),
                    ],
                    None => Vec::new(),
                };
            }
            EventKind::Scroll { delta, .. } if *delta != 0 => {
                return vec![Action::GridMoveRow(delta.signum() as i16)];
            }
            EventKind::Key(key) if props.is_focused => key,
            _ => return Vec::new(),
        };

        let action = match key.code {
            KeyCode::Left | KeyCode::Char('h') => Some(Action::GridMove(-1)),
            KeyCode::Right | KeyCode::Char('l') => Some(Action::GridMove(1)),
            KeyCode::Up | KeyCode::Char('k') => {
                if state.cursor < state.grid_columns() {
                    Some(Action::FocusSet(FocusArea::Search))
                } else {
                    Some(Action::GridMoveRow(-1))
                }
            }
            KeyCode::Down | KeyCode::Char('j') => Some(Action::GridMoveRow(1)),
            KeyCode::PageUp => Some(Action::GridPage(-1)),
            KeyCode::PageDown => Some(Action::GridPage(1)),
            KeyCode::Home | KeyCode::Char('g') => Some(Action::GridJumpTop),
            KeyCode::End | KeyCode::Char('G') => Some(Action::GridJumpBottom),
            KeyCode::Enter | KeyCode::Char(' ') => state
                .entry_under_cursor()
                .map(|entry| Action::DetailOpen(entry.url.clone())),
            KeyCode::Char('/') | KeyCode::Esc => Some(Action::FocusSet(FocusArea::Search)),
            KeyCode::Tab | KeyCode::BackTab => Some(Action::FocusNext),
            KeyCode::Char('v') => Some(Action::GridToggleArt),
            KeyCode::Char('q') => Some(Action::Quit),
            _ => None,
        };
        action.into_iter().collect()
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        self.layout = None;
        let state = props.state;
        let visible = state.visible_entries();
        let total = state.catalog_entries().len();

        let title = if state.catalog.is_loaded() {
            format!(" {} of {} ", visible.len(), total)
        } else {
            String::new()
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border_style(props.is_focused))
            .style(Style::default().bg(BG_PANEL).fg(TEXT_MAIN))
            .title(title);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        if inner.width == 0 || inner.height == 0 {
            return;
        }
        if state.catalog.is_loading() {
            Self::render_notice(
                frame,
                inner,
                format!("{} Loading catalog...", spinner(state.tick)),
            );
            return;
        }
        if visible.is_empty() {
            if state.catalog.is_loaded() && !state.query.is_empty() {
                Self::render_notice(frame, inner, format!("No Pokémon match \"{}\"", state.query));
            }
            return;
        }

        let card_height = state.card_height();
        let columns = (inner.width / CARD_WIDTH).max(1) as usize;
        let visible_rows = (inner.height / card_height).max(1) as usize;
        self.scroll_to(state.cursor / columns, visible_rows);
        self.layout = Some(GridLayout {
            inner,
            columns,
            rows: visible_rows,
            card_height,
        });

        let first = self.offset_row * columns;
        let last = (first + visible_rows * columns).min(visible.len());
        for (index, entry) in visible.iter().enumerate().take(last).skip(first) {
            let slot = index - first;
            let x = inner.x + (slot % columns) as u16 * CARD_WIDTH;
            let y = inner.y + (slot / columns) as u16 * card_height;
            let width = CARD_WIDTH.min(inner.right().saturating_sub(x));
            let height = card_height.min(inner.bottom().saturating_sub(y));
            if width == 0 || height == 0 {
                continue;
            }
            Self::render_card(
                frame,
                Rect::new(x, y, width, height),
                entry,
                &state.query,
                index == state.cursor,
                props.is_focused,
                state
                    .card_art
                    .then(|| state.card_sprite(catalog::entry_id(&entry.url))),
            );
        }
    }
}
