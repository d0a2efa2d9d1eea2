use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::page::{Effect, MainPage};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Mode {
    Normal,
    Search,
}

/// What a key press asks of the event loop.
#[derive(Debug, Default)]
pub struct KeyResult {
    pub effects: Vec<Effect>,
    pub quit: bool,
}

impl From<Vec<Effect>> for KeyResult {
    fn from(effects: Vec<Effect>) -> Self {
        Self {
            effects,
            quit: false,
        }
    }
}

pub struct App {
    pub page: MainPage,
    pub mode: Mode,
    /// Card columns of the last drawn frame; up/down move by this much.
    pub columns: usize,
}

impl App {
    pub fn new(page: MainPage) -> Self {
        Self {
            page,
            mode: Mode::Normal,
            columns: 1,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> KeyResult {
        if self.page.is_dialog_open() {
            return self.dialog_key(key);
        }
        match self.mode {
            Mode::Search => {
                match key.code {
                    KeyCode::Esc | KeyCode::Enter => self.mode = Mode::Normal,
                    KeyCode::Backspace => self.page.pop_search(),
                    KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                        self.page.push_search(c)
                    }
                    _ => {}
                }
                KeyResult::default()
            }
            Mode::Normal => self.list_key(key),
        }
    }

    fn list_key(&mut self, key: KeyEvent) -> KeyResult {
        let columns = self.columns.max(1) as isize;
        match key.code {
            KeyCode::Char('q') => {
                return KeyResult {
                    effects: Vec::new(),
                    quit: true,
                }
            }
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                return KeyResult {
                    effects: Vec::new(),
                    quit: true,
                }
            }
            KeyCode::Right | KeyCode::Char('l') => self.page.move_selection(1),
            KeyCode::Left | KeyCode::Char('h') => self.page.move_selection(-1),
            KeyCode::Down | KeyCode::Char('j') => self.page.move_selection(columns),
            KeyCode::Up | KeyCode::Char('k') => self.page.move_selection(-columns),
            KeyCode::Char('/') => self.mode = Mode::Search,
            KeyCode::Esc => self.page.set_search(""),
            KeyCode::Char('v') => self.page.toggle_selected_reveal(),
            KeyCode::Char('u') => self.page.copy_selected_username(),
            KeyCode::Char('a') => return self.page.open_add().into(),
            KeyCode::Char('e') | KeyCode::Enter => return self.page.open_edit_selected().into(),
            KeyCode::Char('d') | KeyCode::Delete => return self.page.delete_selected().into(),
            KeyCode::Char('r') => return self.page.refresh().into(),
            _ => {}
        }
        KeyResult::default()
    }

    fn dialog_key(&mut self, key: KeyEvent) -> KeyResult {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => self.page.close_dialog(),
            KeyCode::Enter => return self.page.submit_dialog().into(),
            KeyCode::Char('r') if ctrl => {
                if let Some(d) = self.page.dialog_mut() {
                    d.toggle_reveal();
                }
            }
            KeyCode::Char('y') if ctrl => self.page.copy_dialog_password(),
            _ => {
                if let Some(d) = self.page.dialog_mut() {
                    match key.code {
                        KeyCode::Tab | KeyCode::Down => d.focus_next(),
                        KeyCode::BackTab | KeyCode::Up => d.focus_prev(),
                        KeyCode::Backspace => d.backspace(),
                        KeyCode::Char(c) if !ctrl => d.insert_char(c),
                        _ => {}
                    }
                }
            }
        }
        KeyResult::default()
    }
}
