use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::page::card::CardView;
use crate::tui::theme::Theme;

/// Border (2) + URL, username and password blocks of two lines each.
pub const CARD_HEIGHT: u16 = 8;

pub fn render_card(f: &mut Frame, area: Rect, card: &CardView, selected: bool, theme: &Theme) {
    let border_style = if selected {
        theme.selection_style()
    } else {
        theme.muted_style()
    };
    let actions = if selected { " e=edit d=delete " } else { "" };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(Line::from(card.name().to_string()).style(theme.title_style()))
        .title(Line::from(actions).right_aligned().style(theme.muted_style()));

    let mut password_line = vec![Span::styled(card.password_display(), theme.normal_style())];
    if card.has_reveal_control() {
        let hint = match (card.is_revealed(), card.password_withheld()) {
            (true, true) => "  (not in list; open editor)",
            (true, false) => "  [v] hide",
            (false, _) => "  [v] reveal",
        };
        password_line.push(Span::styled(hint, theme.muted_style()));
    }

    let lines = vec![
        Line::from(Span::styled("URL", theme.label_style())),
        Line::from(Span::styled(card.url().to_string(), theme.normal_style())),
        Line::from(Span::styled("Username", theme.label_style())),
        Line::from(vec![
            Span::styled(card.username().to_string(), theme.normal_style()),
            Span::styled("  [u] copy", theme.muted_style()),
        ]),
        Line::from(Span::styled("Password", theme.label_style())),
        Line::from(password_line),
    ];

    f.render_widget(Paragraph::new(lines).block(block), area);
}
