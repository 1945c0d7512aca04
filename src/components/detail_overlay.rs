//! Modal card for the selected Pokémon

use crossterm::event::{KeyCode, KeyEventKind, KeyModifiers, MouseEventKind};
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use tui_dispatch::{DataResource, EventKind};
use tui_dispatch_components::{
    centered_rect, BaseStyle, Modal, ModalBehavior, ModalProps, ModalStyle, Padding,
};

use super::theme::{spinner, title_style, ACCENT_GOLD, ACCENT_TEAL, BG_MODAL, TEXT_DIM, TEXT_MAIN};
use super::Component;
use crate::action::Action;
use crate::sprite::SpriteData;
use crate::state::PokemonDetail;

const OVERLAY_WIDTH: u16 = 48;
const OVERLAY_HEIGHT: u16 = 22;

pub const CLOSE_LABEL: &str = "[ Close ]";

/// Where the overlay sits inside the full frame.
pub fn overlay_area(area: Rect) -> Rect {
    centered_rect(
        OVERLAY_WIDTH.min(area.width),
        OVERLAY_HEIGHT.min(area.height),
        area,
    )
}

/// Row of the `[ Close ]` control inside the framed content.
fn close_row(overlay: Rect) -> Rect {
    Rect::new(
        overlay.x + 1,
        overlay.bottom().saturating_sub(2),
        overlay.width.saturating_sub(2),
        overlay.height.min(1),
    )
}

pub struct DetailOverlayProps<'a> {
    pub detail: &'a PokemonDetail,
    pub sprite: &'a DataResource<SpriteData>,
    /// A newer selection is still being fetched.
    pub loading: bool,
    pub tick: u64,
    /// Full frame; the modal centers itself inside it.
    pub area: Rect,
    pub is_focused: bool,
}

#[derive(Default)]
pub struct DetailOverlay {
    modal: Modal,
}

impl DetailOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    fn modal_style() -> ModalStyle {
        ModalStyle {
            base: BaseStyle {
                bg: Some(BG_MODAL),
                padding: Padding::default(),
                border: None,
                fg: Some(TEXT_MAIN),
            },
            ..Default::default()
        }
    }

    fn behavior() -> ModalBehavior {
        ModalBehavior {
            close_on_esc: true,
            close_on_backdrop: true,
        }
    }

    fn header(props: &DetailOverlayProps<'_>) -> Line<'static> {
        let mut spans = vec![
            Span::styled(props.detail.display_name(), title_style()),
            Span::styled(
                format!("  #{}", props.detail.id),
                Style::default().fg(TEXT_DIM),
            ),
        ];
        if props.loading {
            spans.push(Span::styled(
                format!("  {}", spinner(props.tick)),
                Style::default().fg(ACCENT_GOLD),
            ));
        }
        Line::from(spans)
    }

    fn facts(detail: &PokemonDetail) -> Text<'static> {
        let label = Style::default().fg(TEXT_DIM);
        let value = Style::default().fg(TEXT_MAIN);
        Text::from(vec![
            Line::from(vec![
                Span::styled("Height: ", label),
                Span::styled(detail.height_label(), value),
            ]),
            Line::from(vec![
                Span::styled("Weight: ", label),
                Span::styled(detail.weight_label(), value),
            ]),
            Line::from(vec![
                Span::styled("Abilities: ", label),
                Span::styled(detail.abilities_label(), value),
            ]),
        ])
    }

    fn render_sprite(frame: &mut Frame, area: Rect, sprite: &DataResource<SpriteData>) {
        let placeholder = |text: &'static str| {
            Paragraph::new(Line::from(Span::styled(text, Style::default().fg(TEXT_DIM))))
                .alignment(Alignment::Center)
        };
        let middle = Rect::new(area.x, area.y + area.height / 2, area.width, area.height.min(1));
        match sprite {
            DataResource::Loaded(data) => {
                let (cols, rows) = data.fit(area.width, area.height);
                let x = area.x + (area.width - cols) / 2;
                let y = area.y + (area.height - rows) / 2;
                let lines = data.to_lines(cols, rows);
                frame.render_widget(Paragraph::new(lines), Rect::new(x, y, cols, rows));
            }
            DataResource::Loading => frame.render_widget(placeholder("[loading sprite]"), middle),
            DataResource::Failed(_) | DataResource::Empty => {
                frame.render_widget(placeholder("[no sprite]"), middle)
            }
        }
    }

    fn render_content(frame: &mut Frame, area: Rect, props: &DetailOverlayProps<'_>) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(ACCENT_TEAL))
            .title(" Pokémon ");
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let chunks = Layout::vertical([
            Constraint::Length(1), // Name
            Constraint::Min(1),    // Sprite
            Constraint::Length(3), // Height / weight / abilities
            Constraint::Length(1), // Close control
        ])
        .split(inner);

        frame.render_widget(
            Paragraph::new(Self::header(props)).alignment(Alignment::Center),
            chunks[0],
        );
        Self::render_sprite(frame, chunks[1], props.sprite);
        frame.render_widget(
            Paragraph::new(Self::facts(props.detail))
                .wrap(Wrap { trim: true })
                .block(Block::default().padding(ratatui::widgets::Padding::horizontal(1))),
            chunks[2],
        );
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                CLOSE_LABEL,
                Style::default()
                    .fg(ACCENT_GOLD)
                    .add_modifier(Modifier::BOLD),
            )))
            .alignment(Alignment::Center),
            chunks[3],
        );
    }
}

impl Component<Action> for DetailOverlay {
    type Props<'a> = DetailOverlayProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        if !props.is_focused {
            return Vec::new();
        }
        // pointer motion would count as a backdrop click
        if let EventKind::Mouse(mouse) = event {
            if !matches!(mouse.kind, MouseEventKind::Down(_)) {
                return Vec::new();
            }
        }

        let area = overlay_area(props.area);
        let mut noop_render = |_frame: &mut Frame, _area: Rect| {};
        let modal_props = ModalProps {
            is_open: true,
            is_focused: true,
            area,
            style: Self::modal_style(),
            behavior: Self::behavior(),
            on_close: || Action::DetailClose,
            render_content: &mut noop_render,
        };
        let modal_actions: Vec<_> = self
            .modal
            .handle_event(event, modal_props)
            .into_iter()
            .collect();
        if !modal_actions.is_empty() {
            return modal_actions;
        }

        if let EventKind::Mouse(mouse) = event {
            let close = close_row(area);
            if mouse.row == close.y && mouse.column >= close.x && mouse.column < close.right() {
                return vec![Action::DetailClose];
            }
        }
        if let EventKind::Key(key) = event {
            if key.kind != KeyEventKind::Press || key.modifiers.contains(KeyModifiers::CONTROL) {
                return Vec::new();
            }
            if matches!(
                key.code,
                KeyCode::Esc | KeyCode::Enter | KeyCode::Char('c') | KeyCode::Char('q')
            ) {
                return vec![Action::DetailClose];
            }
        }
        Vec::new()
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        if area.width < 20 || area.height < 8 {
            return;
        }

        let mut render_content = |frame: &mut Frame, content_area: Rect| {
            Self::render_content(frame, content_area, &props);
        };
        self.modal.render(
            frame,
            area,
            ModalProps {
                is_open: true,
                is_focused: props.is_focused,
                area: overlay_area(area),
                style: Self::modal_style(),
                behavior: Self::behavior(),
                on_close: || Action::DetailClose,
                render_content: &mut render_content,
            },
        );
    }
}
