use std::io;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, SetTitle},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc;

use brightwave_core::contact::{ContactPayload, EmailDelivery, EmailJsClient};
use brightwave_core::{AppConfig, Route};
use brightwave_tui::{
    app::{App, Effect},
    event::{AppEvent, EventHandler, SubmissionResult},
    input::{handle_key_event, Action},
};

type Backend = CrosstermBackend<io::Stdout>;

pub async fn run(config: Arc<AppConfig>, path: &str) -> Result<()> {
    let delivery: Arc<dyn EmailDelivery> = Arc::new(EmailJsClient::new(&config.email)?);
    let route = Route::parse(path);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture, SetTitle("Brightwave"))?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(&mut terminal, config, route, delivery);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn event_loop(
    terminal: &mut Terminal<Backend>,
    config: Arc<AppConfig>,
    route: Route,
    delivery: Arc<dyn EmailDelivery>,
) -> Result<()> {
    let (width, height) = crossterm::terminal::size()?;
    let mut app = App::new(config.clone(), route, width, height, Instant::now());

    // Create event handler with animation FPS support
    let event_handler = EventHandler::with_animation_fps(
        config.ui.tick_rate_ms,
        config.ui.scroll.animation_fps,
    );

    // Create channel for background submission results
    let (submit_tx, mut submit_rx) = mpsc::unbounded_channel::<SubmissionResult>();

    // Checked at the end of each iteration to pick the next poll timeout
    let mut needs_fast_update = true;

    // Main loop
    loop {
        // Process any finished submissions (non-blocking)
        while let Ok(result) = submit_rx.try_recv() {
            app.on_submission_result(result.outcome, Instant::now());
        }

        app.tick(Instant::now());
        terminal.draw(|frame| app.render(frame))?;

        // Handle events (use faster tick rate while anything is moving)
        let event = if needs_fast_update {
            event_handler.next_animation()?
        } else {
            event_handler.next()?
        };
        if let Some(event) = event {
            let now = Instant::now();
            match event {
                AppEvent::Key(key) => {
                    let action = handle_key_event(key, &app);
                    if let Some(effect) = app.apply(action, now) {
                        spawn_effect(effect, delivery.clone(), submit_tx.clone());
                    }
                }
                AppEvent::Scroll(notches) => {
                    let action = if notches > 0 { Action::ScrollDown } else { Action::ScrollUp };
                    for _ in 0..notches.unsigned_abs() {
                        app.apply(action.clone(), now);
                    }
                }
                AppEvent::Resize(w, h) => app.resize(w, h, now),
                AppEvent::Tick => {}
            }
        }

        needs_fast_update = app.needs_frame();

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

fn spawn_effect(
    effect: Effect,
    delivery: Arc<dyn EmailDelivery>,
    tx: mpsc::UnboundedSender<SubmissionResult>,
) {
    match effect {
        Effect::Submit(payload) => spawn_submission(payload, delivery, tx),
    }
}

/// Deliver in the background; the result comes back through `tx`
fn spawn_submission(
    payload: ContactPayload,
    delivery: Arc<dyn EmailDelivery>,
    tx: mpsc::UnboundedSender<SubmissionResult>,
) {
    tokio::spawn(async move {
        let outcome = delivery.send(&payload).await;
        let _ = tx.send(SubmissionResult { outcome });
    });
}
