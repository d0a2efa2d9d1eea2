use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::page::dialog::{EditDialog, Hydration};
use crate::records::Field;
use crate::tui::theme::Theme;

const DIALOG_WIDTH: u16 = 64;
const DIALOG_HEIGHT: u16 = 12;

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    Rect {
        x: area.x + (area.width - w) / 2,
        y: area.y + (area.height - h) / 2,
        width: w,
        height: h,
    }
}

fn field_line<'a>(dialog: &EditDialog, field: Field, theme: &Theme) -> Line<'a> {
    let value = match field {
        Field::Password => dialog.password_display(),
        other => dialog.value(other).to_string(),
    };
    let focused = dialog.focus() == field && dialog.is_editable();
    let style = if !dialog.is_editable() {
        theme.muted_style()
    } else if focused {
        theme.selection_style()
    } else {
        theme.normal_style()
    };
    let marker = if focused { "> " } else { "  " };
    let mut spans = vec![
        Span::styled(format!("{marker}{:<9}", format!("{}:", field.label())), style),
        Span::styled(value, style),
    ];
    if field == Field::Password {
        let eye = if dialog.show_password() { "hide" } else { "show" };
        spans.push(Span::styled(
            format!("  ^R {eye}  ^Y copy"),
            theme.muted_style(),
        ));
    }
    Line::from(spans)
}

pub fn render_dialog(f: &mut Frame, dialog: &EditDialog, theme: &Theme) {
    let area = centered(f.area(), DIALOG_WIDTH, DIALOG_HEIGHT);
    f.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.selection_style())
        .title(Line::from(dialog.title()).style(theme.title_style()));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let status = match dialog.hydration() {
        Hydration::Pending => Line::from(Span::styled("Loading...", theme.muted_style())),
        Hydration::Failed => Line::from(Span::styled(
            "Could not load this password. Esc to close.",
            theme.danger_style(),
        )),
        Hydration::Ready if dialog.is_saving() => {
            Line::from(Span::styled("Saving...", theme.muted_style()))
        }
        Hydration::Ready => Line::from(""),
    };

    let mut lines = vec![status, Line::from("")];
    for field in Field::ALL {
        lines.push(field_line(dialog, field, theme));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled(format!("Enter={}", dialog.submit_label()), theme.title_style()),
        Span::styled("  Tab/Shift-Tab=switch  Esc=cancel", theme.muted_style()),
    ]));

    f.render_widget(Paragraph::new(lines), inner);
}
