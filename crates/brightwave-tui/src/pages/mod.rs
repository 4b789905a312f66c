//! Site pages. Each route mounts a fresh page; dropping the page releases
//! every listener and theme override its motion components hold.

use std::time::Instant;

use brightwave_core::{AppConfig, Route};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
};

use crate::motion::{ListenerRegistry, ThemeStack, Viewport, VisualState};
use crate::theme::Theme;
use crate::widgets::surface::{blit, canvas};

mod case_study;
mod contact;
mod home;
mod not_found;

pub use case_study::CaseStudyPage;
pub use contact::{ContactPage, Cycle};
pub use home::{measure_marquee, services_track_width, HomePage, MARQUEE_SEPARATOR};
pub use not_found::NotFoundPage;

/// What a page needs when it is mounted
pub struct MountContext<'a> {
    pub registry: &'a ListenerRegistry,
    pub config: &'a AppConfig,
    pub viewport: Viewport,
    pub now: Instant,
}

/// Per-frame inputs
pub struct FrameContext<'a> {
    pub now: Instant,
    pub scroll: f64,
    pub viewport: Viewport,
    pub themes: &'a ThemeStack<Theme>,
}

#[derive(Debug)]
pub enum Page {
    Home(Box<HomePage>),
    Contact(ContactPage),
    CaseStudy(CaseStudyPage),
    NotFound(NotFoundPage),
}

impl Page {
    pub fn mount(route: &Route, ctx: &MountContext) -> Self {
        match route {
            Route::Home => Page::Home(Box::new(HomePage::new(ctx))),
            Route::Contact => Page::Contact(ContactPage::new(ctx)),
            Route::CaseStudy { slug } => Page::CaseStudy(CaseStudyPage::new(ctx, slug)),
            Route::NotFound { path } => Page::NotFound(NotFoundPage::new(ctx, path)),
        }
    }

    /// Scrollable height in rows
    pub fn document_height(&self) -> u16 {
        match self {
            Page::Home(page) => page.document_height(),
            Page::Contact(page) => page.document_height(),
            Page::CaseStudy(page) => page.document_height(),
            Page::NotFound(page) => page.document_height(),
        }
    }

    pub fn update(&mut self, ctx: &FrameContext) {
        match self {
            Page::Home(page) => page.update(ctx),
            Page::Contact(page) => page.update(ctx),
            Page::CaseStudy(page) => page.update(ctx),
            Page::NotFound(page) => page.update(ctx),
        }
    }

    pub fn on_resize(&mut self, viewport: Viewport, now: Instant) {
        match self {
            Page::Home(page) => page.on_resize(viewport, now),
            Page::Contact(page) => page.on_resize(viewport),
            Page::CaseStudy(page) => page.on_resize(viewport),
            Page::NotFound(page) => page.on_resize(viewport),
        }
    }

    /// Draw into `area` of `buf`; pages draw in their own coordinates
    pub fn render(&self, buf: &mut Buffer, area: Rect, theme: &Theme) {
        let mut surface = canvas(area.width, area.height, theme.base());
        match self {
            Page::Home(page) => page.render(&mut surface, theme),
            Page::Contact(page) => page.render(&mut surface, theme),
            Page::CaseStudy(page) => page.render(&mut surface, theme),
            Page::NotFound(page) => page.render(&mut surface, theme),
        }
        blit(buf, area, &surface, 0, 0);
    }

    pub fn as_contact(&self) -> Option<&ContactPage> {
        match self {
            Page::Contact(page) => Some(page),
            _ => None,
        }
    }

    pub fn as_contact_mut(&mut self) -> Option<&mut ContactPage> {
        match self {
            Page::Contact(page) => Some(page),
            _ => None,
        }
    }

    pub fn as_home_mut(&mut self) -> Option<&mut HomePage> {
        match self {
            Page::Home(page) => Some(page),
            _ => None,
        }
    }
}

/// Text style for an animated element: opacity fades towards the
/// background, a visible scale-up reads as bold
pub(crate) fn animated_style(theme: &Theme, color: Color, state: &VisualState) -> Style {
    let mut style = Style::default().fg(theme.fade(color, state.opacity)).bg(theme.bg);
    if state.scale > 1.02 {
        style = style.add_modifier(Modifier::BOLD);
    }
    style
}

/// Offset of an element's resting row/column by its state, in cells
pub(crate) fn cell_offset(value: f64) -> i32 {
    value.round() as i32
}
