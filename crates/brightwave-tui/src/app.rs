use std::sync::Arc;
use std::time::Instant;

use brightwave_core::contact::ContactPayload;
use brightwave_core::{AppConfig, Route};
use ratatui::{
    layout::{Constraint, Direction, Layout},
    Frame,
};

use crate::input::Action;
use crate::motion::{ListenerKind, ListenerRegistry, SmoothScroll, ThemeStack, Viewport};
use crate::pages::{ContactPage, Cycle, FrameContext, MountContext, Page};
use crate::theme::Theme;
use crate::widgets::{NavBarWidget, StatusBarWidget};

/// Rows taken by the navigation and status bars
const CHROME_ROWS: u16 = 2;

/// Application mode
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    /// Normal browsing mode
    Normal,
    /// Typing a path after ':'
    PathInput(String),
}

/// Work the event loop must do outside the UI thread
#[derive(Debug)]
pub enum Effect {
    /// Deliver a validated contact submission
    Submit(ContactPayload),
}

/// Application state
pub struct App {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Current route
    pub route: Route,
    /// Mounted page for the current route
    pub page: Page,
    /// Current application mode
    pub mode: Mode,
    /// Every listener registered by the mounted page
    pub registry: ListenerRegistry,
    /// Base palette plus section overrides
    pub themes: ThemeStack<Theme>,
    /// Page scroll position
    pub scroll: SmoothScroll,
    /// Size of the page area (terminal minus chrome)
    pub viewport: Viewport,
    /// Pending key for multi-key sequences (e.g., 'gg')
    pub pending_key: Option<char>,
    /// Status message
    pub status_message: Option<String>,
    /// Whether the app should quit
    pub should_quit: bool,
}

impl App {
    pub fn new(config: Arc<AppConfig>, route: Route, width: u16, height: u16, now: Instant) -> Self {
        let registry = ListenerRegistry::new();
        let themes = ThemeStack::new(Theme::from_palette(&config.ui.palette));
        let viewport = content_viewport(width, height);
        let page = Page::mount(
            &route,
            &MountContext {
                registry: &registry,
                config: &config,
                viewport,
                now,
            },
        );
        let scroll = SmoothScroll::new(config.ui.scroll.clone()).with_reduced_motion(config.motion.reduced_motion);
        tracing::info!(route = %route, width, height, "App started");

        Self {
            config,
            route,
            page,
            mode: Mode::Normal,
            registry,
            themes,
            scroll,
            viewport,
            pending_key: None,
            status_message: None,
            should_quit: false,
        }
    }

    /// Mount the page for `route`. The previous page is dropped, which
    /// releases its listeners and theme overrides.
    pub fn navigate(&mut self, route: Route, now: Instant) {
        if route == self.route {
            return;
        }
        tracing::info!(from = %self.route, to = %route, "Navigating");

        let page = Page::mount(
            &route,
            &MountContext {
                registry: &self.registry,
                config: &self.config,
                viewport: self.viewport,
                now,
            },
        );
        self.page = page;
        self.route = route;
        self.scroll.set(0);
        tracing::debug!(listeners = self.registry.count(), "Page mounted");
    }

    /// Terminal resized to `width` x `height` cells
    pub fn resize(&mut self, width: u16, height: u16, now: Instant) {
        self.viewport = content_viewport(width, height);
        self.page.on_resize(self.viewport, now);
        let max = self.max_scroll();
        if self.scroll.target() > max {
            self.scroll.set(max);
        }
    }

    /// Advance scrolling and every animation on the page
    pub fn tick(&mut self, now: Instant) {
        let max = self.max_scroll();
        let scroll = self.scroll.update(max, now);
        let ctx = FrameContext {
            now,
            scroll: scroll as f64,
            viewport: self.viewport,
            themes: &self.themes,
        };
        self.page.update(&ctx);
    }

    /// Something is moving and the loop should run at frame rate
    pub fn needs_frame(&self) -> bool {
        self.registry.count_kind(ListenerKind::Frame) > 0
            || self.registry.count_kind(ListenerKind::Timer) > 0
            || self.scroll.needs_update()
            || self.page.as_contact().is_some_and(|p| p.form().has_pending_timer())
    }

    pub fn max_scroll(&self) -> u16 {
        self.page.document_height().saturating_sub(self.viewport.height.max(0.0) as u16)
    }

    /// The contact form is taking keystrokes
    pub fn is_editing(&self) -> bool {
        self.mode == Mode::Normal && self.page.as_contact().is_some_and(|p| p.is_editing())
    }

    /// Set a status message
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    /// Clear the status message
    pub fn clear_status(&mut self) {
        self.status_message = None;
    }

    /// Apply an input action
    pub fn apply(&mut self, action: Action, now: Instant) -> Option<Effect> {
        if action != Action::PendingG {
            self.pending_key = None;
        }
        let max = self.max_scroll();
        let page_height = self.viewport.height.max(0.0) as u16;

        match action {
            Action::Quit => self.should_quit = true,
            Action::ScrollDown => self.scroll.scroll_down(max),
            Action::ScrollUp => self.scroll.scroll_up(max),
            Action::PageDown => self.scroll.page_down(page_height, max),
            Action::PageUp => self.scroll.page_up(page_height, max),
            Action::JumpToTop => self.scroll.scroll_to(0, max, now),
            Action::JumpToBottom => self.scroll.scroll_to(max, max, now),
            Action::PendingG => self.pending_key = Some('g'),
            Action::GoHome => self.navigate(Route::Home, now),
            Action::GoContact => self.navigate(Route::Contact, now),
            Action::StartPathInput => {
                self.clear_status();
                self.mode = Mode::PathInput(String::new());
            }
            Action::NextItem | Action::PrevItem => {
                if let Some(home) = self.page.as_home_mut() {
                    if action == Action::NextItem {
                        home.select_next();
                    } else {
                        home.select_prev();
                    }
                    let offset = home.work_offset();
                    self.scroll.scroll_to(offset, max, now);
                }
            }
            Action::Select => {
                if let Some(route) = self.page.as_home_mut().and_then(|home| home.selected_route()) {
                    self.navigate(route, now);
                } else if let Some(contact) = self.page.as_contact_mut() {
                    contact.start_editing();
                }
            }
            Action::StartEditing => {
                if let Some(contact) = self.page.as_contact_mut() {
                    contact.start_editing();
                }
            }
            Action::StopEditing => {
                if let Some(contact) = self.page.as_contact_mut() {
                    contact.stop_editing();
                }
            }
            Action::NextField => self.with_contact(|c| c.next_field()),
            Action::PrevField => self.with_contact(|c| c.prev_field()),
            Action::CycleNext => self.with_contact(|c| c.cycle(Cycle::Next)),
            Action::CyclePrev => self.with_contact(|c| c.cycle(Cycle::Prev)),
            Action::Back => self.with_contact(|c| c.back(now)),
            Action::ReopenForm => self.with_contact(|c| c.reopen()),
            Action::Submit => {
                let payload = self.page.as_contact_mut().and_then(|c| c.submit());
                return self.start_submission(payload);
            }
            Action::Confirm => {
                if let Mode::PathInput(input) = &self.mode {
                    let route = Route::parse(input);
                    self.mode = Mode::Normal;
                    self.navigate(route, now);
                } else {
                    let payload = self.page.as_contact_mut().and_then(|c| c.confirm(now));
                    return self.start_submission(payload);
                }
            }
            Action::Cancel => self.mode = Mode::Normal,
            Action::InputChar(c) => match &mut self.mode {
                Mode::PathInput(input) => input.push(c),
                Mode::Normal => self.with_contact(|page| page.input_char(c)),
            },
            Action::Backspace => match &mut self.mode {
                Mode::PathInput(input) => {
                    input.pop();
                }
                Mode::Normal => self.with_contact(|page| page.backspace()),
            },
            Action::None => {}
        }
        None
    }

    fn with_contact(&mut self, f: impl FnOnce(&mut ContactPage)) {
        if let Some(contact) = self.page.as_contact_mut() {
            f(contact);
        }
    }

    fn start_submission(&mut self, payload: Option<ContactPayload>) -> Option<Effect> {
        let payload = payload?;
        tracing::info!(email = %payload.email, "Submitting contact form");
        self.set_status("Sending…");
        Some(Effect::Submit(payload))
    }

    /// Deliver a background submission outcome to the contact page
    pub fn on_submission_result(&mut self, outcome: brightwave_core::Result<()>, now: Instant) {
        match &outcome {
            Ok(()) => {
                tracing::info!("Contact submission delivered");
                self.set_status("Message sent");
            }
            Err(e) => {
                tracing::warn!(error = %e, "Contact submission failed");
                self.set_status(format!("Send failed: {}", e));
            }
        }
        match self.page.as_contact_mut() {
            Some(contact) => contact.finish(&outcome, now),
            None => tracing::debug!("Submission finished after leaving the contact page"),
        }
    }

    pub fn render(&self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(0), Constraint::Length(1)])
            .split(frame.area());

        let theme = self.themes.current();
        NavBarWidget::render(frame, chunks[0], self);
        self.page.render(frame.buffer_mut(), chunks[1], &theme);
        StatusBarWidget::render(frame, chunks[2], self);
    }
}

fn content_viewport(width: u16, height: u16) -> Viewport {
    Viewport::new(width as f64, height.saturating_sub(CHROME_ROWS) as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use brightwave_core::contact::{Field, SubmitStatus};
    use std::time::Duration;

    fn app(route: Route) -> App {
        App::new(Arc::new(AppConfig::default()), route, 80, 26, Instant::now())
    }

    fn type_str(app: &mut App, text: &str, now: Instant) {
        for c in text.chars() {
            app.apply(Action::InputChar(c), now);
        }
    }

    #[test]
    fn test_navigation_releases_previous_page() {
        let now = Instant::now();
        let mut app = app(Route::Home);
        app.tick(now);
        assert!(app.registry.count() > 0);

        app.navigate(Route::parse("/nowhere"), now);
        assert_eq!(app.route, Route::NotFound { path: "/nowhere".to_string() });
        assert_eq!(app.registry.count_kind(ListenerKind::Scroll), 0);
        assert_eq!(app.registry.count_kind(ListenerKind::Resize), 0);

        app.tick(now + Duration::from_secs(1));
        assert_eq!(app.registry.count(), 0);
        assert!(!app.themes.is_overridden());
        assert!(!app.needs_frame());
    }

    #[test]
    fn test_path_input_navigates() {
        let now = Instant::now();
        let mut app = app(Route::Home);
        app.apply(Action::StartPathInput, now);
        type_str(&mut app, "/case-studies/halcyon", now);
        app.apply(Action::Confirm, now);

        assert_eq!(app.mode, Mode::Normal);
        assert_eq!(
            app.route,
            Route::CaseStudy {
                slug: "halcyon".to_string()
            }
        );
        assert_eq!(app.scroll.target(), 0);
    }

    #[test]
    fn test_pending_g_clears_on_next_action() {
        let now = Instant::now();
        let mut app = app(Route::Home);
        app.apply(Action::PendingG, now);
        assert_eq!(app.pending_key, Some('g'));
        app.apply(Action::GoContact, now);
        assert_eq!(app.pending_key, None);
        assert_eq!(app.route, Route::Contact);
    }

    #[test]
    fn test_contact_submission_round_trip() {
        let now = Instant::now();
        let mut app = app(Route::Contact);

        for value in ["Ada", "Lovelace", "ada@example.com", "+44 20 7946 0000", "Engines"] {
            type_str(&mut app, value, now);
            assert!(app.apply(Action::Confirm, now).is_none());
        }
        app.apply(Action::CycleNext, now);
        assert!(app.apply(Action::Confirm, now).is_none());
        app.apply(Action::CycleNext, now);

        let effect = app.apply(Action::Confirm, now);
        let Some(Effect::Submit(payload)) = effect else {
            panic!("expected a submission");
        };
        assert_eq!(payload.first_name, "Ada");
        assert!(!app.is_editing());

        app.on_submission_result(Ok(()), now);
        let form = app.page.as_contact().map(|c| c.form().clone()).expect("contact page");
        assert_eq!(form.status(), &SubmitStatus::Success);
        assert_eq!(form.value(Field::Email), "");
        // Keys go back to page navigation until the form closes
        assert!(!app.is_editing());
        app.apply(Action::StartEditing, now);
        assert!(!app.is_editing());
    }

    #[test]
    fn test_select_opens_case_study() {
        let now = Instant::now();
        let mut app = app(Route::Home);
        app.apply(Action::NextItem, now);
        app.apply(Action::Select, now);
        assert_eq!(
            app.route,
            Route::CaseStudy {
                slug: brightwave_core::content::CASE_STUDIES[0].slug.to_string()
            }
        );
    }
}
