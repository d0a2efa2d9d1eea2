pub mod app;
pub mod theme;
pub mod views;

use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc::{unbounded_channel, UnboundedSender};
use tracing::{debug, warn};

use crate::clipboard::{resolve_ttl, Clipboard, SystemClipboard};
use crate::config::app_config::Config;
use crate::page::{run_effect, Effect, MainPage, Outcome, PageOptions};
use crate::records::RecordService;

use self::app::App;
use self::views::page::{columns_for, render_page};

/// Runs each effect on its own task; outcomes come back over `tx`.
fn dispatch(service: &Arc<RecordService>, tx: &UnboundedSender<Outcome>, effects: Vec<Effect>) {
    for effect in effects {
        debug!(?effect, "dispatching");
        let svc = service.clone();
        let tx = tx.clone();
        tokio::spawn(async move {
            let outcome = run_effect(&svc, effect).await;
            // The loop may already be gone on quit.
            let _ = tx.send(outcome);
        });
    }
}

pub async fn launch(config: &Config, service: Arc<RecordService>) -> Result<()> {
    let clipboard = match SystemClipboard::open() {
        Ok(engine) => Some(Clipboard::new(Arc::new(engine), resolve_ttl(config, None))),
        Err(e) => {
            warn!(error = %e, "clipboard unavailable");
            None
        }
    };
    let page = MainPage::new(PageOptions {
        reveal_control: config.reveal_in_cards,
        clipboard,
    });
    let mut app = App::new(page);
    let (tx, mut rx) = unbounded_channel::<Outcome>();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    crossterm::execute!(stdout, crossterm::terminal::EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    dispatch(&service, &tx, app.page.mount());

    let mut last_tick = Instant::now();
    let tick_rate = Duration::from_millis(200);

    let res: Result<()> = loop {
        while let Ok(outcome) = rx.try_recv() {
            let follow_up = app.page.apply(outcome);
            dispatch(&service, &tx, follow_up);
        }

        app.columns = columns_for(terminal.size()?.width);
        terminal.draw(|f| render_page(f, &app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::from_millis(0));

        if event::poll(timeout)? {
            if let Event::Key(k) = event::read()? {
                if k.kind == KeyEventKind::Press {
                    let result = app.handle_key(k);
                    dispatch(&service, &tx, result.effects);
                    if result.quit {
                        break Ok(());
                    }
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            app.page.tick();
            last_tick = Instant::now();
        }
    };

    // Restore terminal
    disable_raw_mode()?;
    crossterm::execute!(
        terminal.backend_mut(),
        crossterm::terminal::LeaveAlternateScreen,
        crossterm::cursor::Show
    )?;
    terminal.show_cursor()?;

    res
}
