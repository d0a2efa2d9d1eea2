use ratatui::style::{Color, Modifier, Style};

use crate::page::notify::Level;

#[derive(Clone, Debug)]
pub struct Theme {
    pub fg: Color,
    pub primary: Color,
    pub success: Color,
    pub danger: Color,
    pub muted: Color,
    pub selection: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            fg: Color::White,
            primary: Color::Blue,
            success: Color::Green,
            danger: Color::Red,
            muted: Color::DarkGray,
            selection: Color::Cyan,
        }
    }
}

impl Theme {
    pub fn title_style(&self) -> Style {
        Style::default().fg(self.primary).add_modifier(Modifier::BOLD)
    }
    pub fn normal_style(&self) -> Style { Style::default().fg(self.fg) }
    pub fn muted_style(&self) -> Style { Style::default().fg(self.muted) }
    pub fn label_style(&self) -> Style {
        Style::default().fg(self.muted).add_modifier(Modifier::BOLD)
    }
    pub fn selection_style(&self) -> Style { Style::default().fg(self.selection).add_modifier(Modifier::BOLD) }
    pub fn danger_style(&self) -> Style { Style::default().fg(self.danger) }
    pub fn notification_style(&self, level: Level) -> Style {
        let color = match level {
            Level::Success => self.success,
            Level::Error => self.danger,
        };
        Style::default().fg(color).add_modifier(Modifier::BOLD)
    }
}
