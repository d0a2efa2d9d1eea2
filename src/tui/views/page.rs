use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::page::PageView;
use crate::tui::app::{App, Mode};
use crate::tui::theme::Theme;
use crate::tui::views::card::{render_card, CARD_HEIGHT};
use crate::tui::views::dialog::render_dialog;

/// Responsive grid: one column on narrow terminals, up to three on wide ones.
pub fn columns_for(width: u16) -> usize {
    match width {
        0..=69 => 1,
        70..=119 => 2,
        _ => 3,
    }
}

pub fn render_page(f: &mut Frame, app: &App) {
    let theme = Theme::default();
    let page = &app.page;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // title
            Constraint::Length(3), // search
            Constraint::Min(1),    // cards
            Constraint::Length(1), // footer/toast
        ])
        .split(f.area());

    let mut title = vec![
        Span::styled("Password Manager", theme.title_style()),
        Span::styled("   a=Add Password", theme.muted_style()),
    ];
    if page.cache().is_fetching() && page.cache().is_stale() {
        title.push(Span::styled("   Refreshing...", theme.muted_style()));
    }
    let title = Line::from(title);
    f.render_widget(Paragraph::new(title), chunks[0]);

    let search_text = match (app.mode, page.search_query().is_empty()) {
        (Mode::Search, _) => Line::from(Span::styled(
            format!("{}▏", page.search_query()),
            theme.selection_style(),
        )),
        (Mode::Normal, true) => {
            Line::from(Span::styled("Search passwords... (/)", theme.muted_style()))
        }
        (Mode::Normal, false) => {
            Line::from(Span::styled(page.search_query().to_string(), theme.normal_style()))
        }
    };
    let search_border = if app.mode == Mode::Search {
        theme.selection_style()
    } else {
        theme.muted_style()
    };
    let search = Paragraph::new(search_text).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(search_border)
            .title("Search"),
    );
    f.render_widget(search, chunks[1]);

    match page.view() {
        PageView::Loading => render_centered(f, chunks[2], "Loading...", theme.muted_style()),
        PageView::LoadFailed => render_centered(
            f,
            chunks[2],
            "Failed to load passwords (r to retry)",
            theme.danger_style(),
        ),
        PageView::NoResults => {
            render_centered(f, chunks[2], "No passwords found", theme.muted_style())
        }
        PageView::Cards(cards) => {
            let columns = columns_for(chunks[2].width);
            let visible_rows = usize::from((chunks[2].height / CARD_HEIGHT).max(1));
            let selected_row = page.selected() / columns;
            let first_row = (selected_row + 1).saturating_sub(visible_rows);
            let col_width = chunks[2].width / columns as u16;

            for (i, card) in cards.iter().enumerate() {
                let row = i / columns;
                if row < first_row || row >= first_row + visible_rows {
                    continue;
                }
                let col = i % columns;
                let area = Rect {
                    x: chunks[2].x + col as u16 * col_width,
                    y: chunks[2].y + (row - first_row) as u16 * CARD_HEIGHT,
                    width: col_width,
                    height: CARD_HEIGHT.min(chunks[2].height),
                };
                render_card(f, area, card, i == page.selected(), &theme);
            }
        }
    }

    let footer = match page.notification() {
        Some(n) => Paragraph::new(n.message.clone()).style(theme.notification_style(n.level)),
        None => Paragraph::new(
            "q=quit  /=search  a=add  e=edit  d=delete  v=reveal  u=copy user  r=refresh",
        )
        .style(theme.muted_style()),
    };
    f.render_widget(footer, chunks[3]);

    if let Some(dialog) = page.dialog() {
        render_dialog(f, dialog, &theme);
    }
}

fn render_centered(f: &mut Frame, area: Rect, text: &str, style: Style) {
    let para = Paragraph::new(text.to_string())
        .style(style)
        .alignment(Alignment::Center);
    let y = area.y + area.height / 2;
    f.render_widget(
        para,
        Rect {
            x: area.x,
            y,
            width: area.width,
            height: 1.min(area.height),
        },
    );
}
