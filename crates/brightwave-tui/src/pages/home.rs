use std::time::{Duration, Instant};

use brightwave_core::content::{self, CaseStudy};
use brightwave_core::{EasingType, Route};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    widgets::{Block, Paragraph, Widget, Wrap},
};

use super::{animated_style, cell_offset, FrameContext, MountContext};
use crate::motion::{
    Anchor, AnimationHandle, Animator, Bounds, Direction, Edge, HoverStyle, IntersectionWatcher,
    LoopingTrack, OverrideGuard, PinPhase, PinnedFrame, PinnedSection, Repeat, Ring, RingCarousel,
    ScrollProgress, ScrollRange, Spin, SubjectId, Timeline, TrackOptions, Variant, Viewport,
    VisualState, WatchConfig,
};
use crate::theme::Theme;
use crate::widgets::surface::{blit, canvas, centered, put_str, text_width};

pub const MARQUEE_SEPARATOR: &str = "  ✦  ";
const SERVICE_CARD_WIDTH: u16 = 26;
const SERVICE_CARD_GAP: u16 = 2;
const RINGS_HEIGHT: u16 = 17;
const RING_SPEEDS: [f64; 3] = [24.0, 16.0, 10.0];
const STATS: [(&str, u32); 3] = [
    ("campaigns launched", 240),
    ("brands grown", 85),
    ("countries reached", 31),
];

/// Column span of one pass over the marquee items
pub fn measure_marquee(items: &[&str]) -> f64 {
    items
        .iter()
        .map(|item| text_width(item) + text_width(MARQUEE_SEPARATOR))
        .sum::<usize>() as f64
}

pub fn services_track_width() -> f64 {
    let cards = content::SERVICES.len() as u16;
    (cards * (SERVICE_CARD_WIDTH + SERVICE_CARD_GAP) + SERVICE_CARD_GAP * 2) as f64
}

/// Document position of every home section
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sections {
    pub hero: Bounds,
    pub marquee: Bounds,
    pub about: Bounds,
    pub services: Bounds,
    pub rings: Bounds,
    pub stats: Bounds,
    pub work: Bounds,
    pub footer: Bounds,
}

impl Sections {
    pub fn compute(viewport: &Viewport, services_height: f64) -> Self {
        let mut top = 0.0;
        let mut next = |height: f64| {
            let bounds = Bounds::new(top, height).with_width(0.0, viewport.width);
            top += height;
            bounds
        };

        Self {
            hero: next(viewport.height.max(10.0)),
            marquee: next(4.0),
            about: next(8.0),
            services: next(services_height),
            rings: next(RINGS_HEIGHT as f64),
            stats: next(8.0),
            work: next(3.0 + 4.0 * content::CASE_STUDIES.len() as f64),
            footer: next(7.0),
        }
    }

    pub fn document_height(&self) -> f64 {
        self.footer.bottom()
    }
}

#[derive(Debug)]
struct Subjects {
    title: SubjectId,
    subtitle: SubjectId,
    hero_wave: SubjectId,
    about: SubjectId,
    stats: SubjectId,
    work: SubjectId,
    cta: SubjectId,
}

#[derive(Debug)]
pub struct HomePage {
    viewport: Viewport,
    sections: Sections,
    scroll: f64,
    animator: Animator,
    subjects: Subjects,
    hero_scrub: Option<AnimationHandle>,
    stats_scrub: Option<AnimationHandle>,
    hero_progress: ScrollProgress,
    stats_progress: ScrollProgress,
    clients: LoopingTrack<&'static str>,
    services_marquee: LoopingTrack<&'static str>,
    marquee_offsets: (f64, f64),
    about_watch: IntersectionWatcher,
    work_watch: IntersectionWatcher,
    rings_watch: IntersectionWatcher,
    pinned: PinnedSection,
    pinned_frame: PinnedFrame,
    rings: RingCarousel,
    inverted: Theme,
    rings_theme: Option<OverrideGuard<Theme>>,
    selected: Option<usize>,
}

impl HomePage {
    pub fn new(ctx: &MountContext) -> Self {
        let registry = ctx.registry;
        let motion = &ctx.config.motion;
        let reduced = motion.reduced_motion;
        let viewport = ctx.viewport;

        let mut pinned = PinnedSection::new(registry, 0.0, services_track_width(), viewport);
        let sections = Sections::compute(&viewport, pinned.document_height());
        pinned.set_section_top(sections.services.top);
        let pinned_frame = pinned.frame(0.0);

        let mut animator = Animator::new(registry).with_reduced_motion(reduced);
        let hidden = VisualState::IDENTITY.with_opacity(0.0);
        let subjects = Subjects {
            title: animator.mount(hidden.with_y(2.0)),
            subtitle: animator.mount(hidden),
            hero_wave: animator.mount(VisualState::IDENTITY),
            about: animator.mount(hidden.with_y(2.0)),
            stats: animator.mount(VisualState::IDENTITY.with_opacity(0.3)),
            work: animator.mount(hidden.with_x(-4.0)),
            cta: animator.mount(VisualState::IDENTITY),
        };

        animator.play(subjects.title, hero_title_intro(), ctx.now);
        animator.play(subjects.subtitle, hero_subtitle_intro(), ctx.now);
        animator.play(subjects.cta, cta_nudge(), ctx.now);
        let hero_scrub = animator.scrub(
            subjects.hero_wave,
            Timeline::new(VisualState::IDENTITY).to(
                VisualState::IDENTITY.with_x(-24.0).with_opacity(0.2),
                Duration::from_secs(1),
                EasingType::Linear,
            ),
        );
        let stats_scrub = animator.scrub(
            subjects.stats,
            Timeline::new(VisualState::IDENTITY.with_opacity(0.3).with_x(-6.0)).to(
                VisualState::IDENTITY,
                Duration::from_secs(1),
                EasingType::QuadOut,
            ),
        );

        // Hero fades out as it leaves the top of the viewport
        let mut hero_progress = ScrollProgress::new(
            registry,
            ScrollRange::new(Anchor::new(Edge::Top, 0.0), Anchor::new(Edge::Bottom, 0.0)),
            viewport,
        );
        hero_progress.mount(sections.hero);

        let mut stats_progress = ScrollProgress::new(
            registry,
            ScrollRange::new(Anchor::new(Edge::Top, 0.8), Anchor::new(Edge::Bottom, 0.2)),
            viewport,
        );
        stats_progress.mount(sections.stats);

        let options = TrackOptions {
            copies: 3,
            retry_delay: motion.measure_retry(),
            resize_debounce: motion.resize_debounce(),
        };
        let clients = LoopingTrack::new(
            registry,
            content::CLIENTS.to_vec(),
            motion.marquee_speed,
            Direction::Left,
            options,
        )
        .with_reduced_motion(reduced);
        let services_marquee = LoopingTrack::new(
            registry,
            content::SERVICES.to_vec(),
            motion.marquee_speed * 0.75,
            Direction::Right,
            options,
        )
        .with_reduced_motion(reduced);

        let mut about_watch = IntersectionWatcher::new(registry, WatchConfig::once(0.3));
        about_watch.mount(sections.about);
        // Start the reveal a few rows before the list scrolls into view
        let mut work_watch =
            IntersectionWatcher::new(registry, WatchConfig::once(0.15).with_margin(4.0));
        work_watch.mount(sections.work);
        let mut rings_watch = IntersectionWatcher::new(registry, WatchConfig::continuous(0.5));
        rings_watch.mount(sections.rings);

        let rings = content::RING_ITEMS
            .iter()
            .enumerate()
            .map(|(i, items)| {
                let spin = if i % 2 == 0 {
                    Spin::Clockwise
                } else {
                    Spin::CounterClockwise
                };
                Ring::new(items.iter().copied(), RING_SPEEDS[i % RING_SPEEDS.len()], spin)
            })
            .collect();
        let rings = RingCarousel::new(registry, rings, &motion.rings).with_reduced_motion(reduced);

        Self {
            viewport,
            sections,
            scroll: 0.0,
            animator,
            subjects,
            hero_scrub,
            stats_scrub,
            hero_progress,
            stats_progress,
            clients,
            services_marquee,
            marquee_offsets: (0.0, 0.0),
            about_watch,
            work_watch,
            rings_watch,
            pinned,
            pinned_frame,
            rings,
            inverted: Theme::inverted_from(&ctx.config.ui.palette),
            rings_theme: None,
            selected: None,
        }
    }

    pub fn sections(&self) -> &Sections {
        &self.sections
    }

    pub fn document_height(&self) -> u16 {
        self.sections.document_height().ceil().min(u16::MAX as f64) as u16
    }

    pub fn is_inverted(&self) -> bool {
        self.rings_theme.is_some()
    }

    pub fn pinned_frame(&self) -> PinnedFrame {
        self.pinned_frame
    }

    pub fn marquee(&self) -> &LoopingTrack<&'static str> {
        &self.clients
    }

    pub fn update(&mut self, ctx: &FrameContext) {
        let now = ctx.now;
        let scroll = ctx.scroll;
        self.scroll = scroll;

        let hero = self.hero_progress.set_scroll(scroll);
        if let Some(handle) = self.hero_scrub {
            self.animator.set_progress(handle, hero);
        }
        let stats = self.stats_progress.set_scroll(scroll);
        if let Some(handle) = self.stats_scrub {
            self.animator.set_progress(handle, stats);
        }

        self.pinned_frame = self.pinned.update(scroll);

        if let Some(true) = self.about_watch.update(scroll, &self.viewport) {
            self.animator.play(self.subjects.about, reveal(), now);
        }
        if let Some(true) = self.work_watch.update(scroll, &self.viewport) {
            self.animator.play(
                self.subjects.work,
                Timeline::new(VisualState::IDENTITY.with_opacity(0.0).with_x(-4.0)).to(
                    VisualState::IDENTITY,
                    Duration::from_millis(500),
                    EasingType::Cubic,
                ),
                now,
            );
        }
        match self.rings_watch.update(scroll, &self.viewport) {
            Some(true) => self.rings_theme = Some(ctx.themes.push("rings", self.inverted.clone())),
            Some(false) => self.rings_theme = None,
            None => {}
        }

        self.rings.on_scroll(scroll, now);
        self.rings.tick(now);

        // An empty viewport means the terminal has not been laid out yet
        let settled = !self.viewport.is_empty();
        let measure = |items: &[&str]| if settled { measure_marquee(items) } else { 0.0 };
        self.marquee_offsets = (
            self.clients.tick(now, measure),
            self.services_marquee.tick(now, measure),
        );

        self.animator.tick(now);
    }

    pub fn on_resize(&mut self, viewport: Viewport, now: Instant) {
        self.viewport = viewport;
        self.pinned.set_viewport(viewport);
        self.sections = Sections::compute(&viewport, self.pinned.document_height());
        self.pinned.set_section_top(self.sections.services.top);

        self.hero_progress.set_viewport(viewport);
        self.hero_progress.mount(self.sections.hero);
        self.stats_progress.set_viewport(viewport);
        self.stats_progress.mount(self.sections.stats);

        self.about_watch.mount(self.sections.about);
        self.work_watch.mount(self.sections.work);
        self.rings_watch.mount(self.sections.rings);

        self.clients.on_resize(now);
        self.services_marquee.on_resize(now);
    }

    /// Move the case-study selection (hover/focus)
    pub fn select_next(&mut self) {
        let count = content::CASE_STUDIES.len();
        self.selected = Some(match self.selected {
            Some(i) => (i + 1) % count,
            None => 0,
        });
    }

    pub fn select_prev(&mut self) {
        let count = content::CASE_STUDIES.len();
        self.selected = Some(match self.selected {
            Some(0) | None => count - 1,
            Some(i) => i - 1,
        });
    }

    pub fn selected(&self) -> Option<&'static CaseStudy> {
        self.selected.and_then(|i| content::CASE_STUDIES.get(i))
    }

    /// Scroll offset that brings the case studies into view
    pub fn work_offset(&self) -> u16 {
        self.sections.work.top as u16
    }

    pub fn selected_route(&self) -> Option<Route> {
        self.selected().map(|case| Route::CaseStudy {
            slug: case.slug.to_string(),
        })
    }

    pub fn render(&self, buf: &mut Buffer, theme: &Theme) {
        let area = buf.area;
        let width = area.width;
        let section = |bounds: &Bounds| {
            let top = bounds.top - self.scroll;
            let visible = top < area.height as f64 && top + bounds.height > 0.0;
            (visible, top.round() as i32)
        };

        let draws: [(&Bounds, fn(&Self, &mut Buffer, &Theme)); 7] = [
            (&self.sections.hero, Self::draw_hero),
            (&self.sections.marquee, Self::draw_marquee),
            (&self.sections.about, Self::draw_about),
            (&self.sections.rings, Self::draw_rings),
            (&self.sections.stats, Self::draw_stats),
            (&self.sections.work, Self::draw_work),
            (&self.sections.footer, Self::draw_footer),
        ];
        for (bounds, draw) in draws {
            let (visible, top) = section(bounds);
            if visible {
                let mut surface = canvas(width, bounds.height as u16, theme.base());
                draw(self, &mut surface, theme);
                blit(buf, area, &surface, 0, top);
            }
        }

        if section(&self.sections.services).0 {
            self.draw_services(buf, area, theme);
        }
    }

    fn draw_hero(&self, buf: &mut Buffer, theme: &Theme) {
        let area = buf.area;
        let mid = area.height as i32 / 2;

        let title = self.state(self.subjects.title);
        let style = animated_style(theme, theme.fg, &title).add_modifier(Modifier::BOLD);
        put_str(
            buf,
            centered(content::HERO_TITLE, area.width) + cell_offset(title.x),
            mid - 2 + cell_offset(title.y),
            content::HERO_TITLE,
            style,
        );

        let subtitle = self.state(self.subjects.subtitle);
        put_str(
            buf,
            centered(content::HERO_SUBTITLE, area.width),
            mid + cell_offset(subtitle.y),
            content::HERO_SUBTITLE,
            animated_style(theme, theme.muted, &subtitle),
        );

        let wave = self.state(self.subjects.hero_wave);
        let pattern = "∿ ".repeat(area.width as usize);
        put_str(
            buf,
            cell_offset(wave.x) - 2,
            mid + 3,
            &pattern,
            animated_style(theme, theme.accent, &wave),
        );

        let hint = "scroll ↓";
        put_str(
            buf,
            centered(hint, area.width),
            area.height as i32 - 2,
            hint,
            Style::default().fg(theme.muted).bg(theme.bg),
        );
    }

    fn draw_marquee(&self, buf: &mut Buffer, theme: &Theme) {
        let rows = [
            (&self.clients, self.marquee_offsets.0, 1, theme.fg),
            (&self.services_marquee, self.marquee_offsets.1, 2, theme.accent),
        ];
        for (track, offset, row, color) in rows {
            let span = track.span().unwrap_or(0.0);
            // Right-moving tracks start one span to the left so the gap
            // behind the content is always covered
            let start = match track.direction() {
                Direction::Left => offset,
                Direction::Right => offset - span,
            };
            let style = Style::default().fg(color).bg(theme.bg);
            let mut x = start.round() as i32;
            for item in track.track_items() {
                x = put_str(buf, x, row, item, style.add_modifier(Modifier::BOLD));
                x = put_str(buf, x, row, MARQUEE_SEPARATOR, Style::default().fg(theme.muted).bg(theme.bg));
                if x >= buf.area.width as i32 {
                    break;
                }
            }
        }
    }

    fn draw_about(&self, buf: &mut Buffer, theme: &Theme) {
        let area = buf.area;
        let state = self.state(self.subjects.about);
        let style = animated_style(theme, theme.fg, &state);
        let dy = cell_offset(state.y);

        put_str(buf, 4, 1 + dy, "About", style.add_modifier(Modifier::BOLD));
        let body_top = (3 + dy).clamp(0, area.height as i32) as u16;
        let body = Rect::new(
            area.x + 4,
            area.y + body_top,
            area.width.saturating_sub(8),
            area.height.saturating_sub(body_top),
        );
        Paragraph::new(content::ABOUT_TEXT)
            .style(style)
            .wrap(Wrap { trim: true })
            .render(body, buf);
    }

    fn draw_services(&self, buf: &mut Buffer, area: Rect, theme: &Theme) {
        let frame = self.pinned_frame;
        let box_height = self.viewport.height.max(1.0) as u16;
        let top = frame.top.round() as i32;

        let mut heading = canvas(area.width, 3, theme.base());
        let bold = theme.base().add_modifier(Modifier::BOLD);
        put_str(&mut heading, 4, 1, "What we do", bold);
        let marker = match frame.phase {
            PinPhase::Before => "",
            PinPhase::Pinned => "  ⟷",
            PinPhase::After => "",
        };
        let progress = format!("{:>3.0}%{}", frame.progress * 100.0, marker);
        put_str(
            &mut heading,
            area.width as i32 - text_width(&progress) as i32 - 4,
            1,
            &progress,
            Style::default().fg(theme.muted).bg(theme.bg),
        );
        blit(buf, area, &heading, 0, top);

        let track_width = services_track_width() as u16;
        let card_height = box_height.saturating_sub(5).clamp(3, 9);
        let mut track = canvas(track_width, card_height, theme.base());
        for (i, service) in content::SERVICES.iter().enumerate() {
            let x = SERVICE_CARD_GAP * 2 + i as u16 * (SERVICE_CARD_WIDTH + SERVICE_CARD_GAP);
            let card = Rect::new(x, 0, SERVICE_CARD_WIDTH, card_height);
            Block::bordered()
                .title(format!(" {:02} ", i + 1))
                .border_style(Style::default().fg(theme.accent).bg(theme.bg))
                .render(card, &mut track);
            put_str(&mut track, x as i32 + 2, card_height as i32 / 2, service, bold);
        }
        blit(buf, area, &track, frame.translate_x.round() as i32, top + 3);
    }

    fn draw_rings(&self, buf: &mut Buffer, theme: &Theme) {
        let area = buf.area;
        let cx = area.width as f64 / 2.0;
        let cy = area.height as f64 / 2.0;

        let label = format!("in orbit ×{:.1}", self.rings.multiplier());
        put_str(
            buf,
            centered(&label, area.width),
            cy as i32,
            &label,
            Style::default().fg(theme.accent).bg(theme.bg).add_modifier(Modifier::BOLD),
        );

        for (i, ring) in self.rings.rings().iter().enumerate() {
            let ry = 2.6 * (i as f64 + 1.0);
            let rx = ry * 2.2;
            let color = if i == 0 { theme.accent } else { theme.fg };
            for (item, angle) in ring.item_angles() {
                let rad = angle.to_radians();
                let x = cx + rx * rad.cos() - text_width(item) as f64 / 2.0;
                let y = cy + ry * rad.sin();
                put_str(buf, x.round() as i32, y.round() as i32, item, Style::default().fg(color).bg(theme.bg));
            }
        }
    }

    fn draw_stats(&self, buf: &mut Buffer, theme: &Theme) {
        let area = buf.area;
        let state = self.state(self.subjects.stats);
        let progress = self.stats_progress.progress();
        let column = (area.width / STATS.len() as u16).max(1);

        for (i, (label, target)) in STATS.iter().enumerate() {
            let value = (*target as f64 * progress).round() as u32;
            let number = value.to_string();
            let x = i as i32 * column as i32 + cell_offset(state.x);
            let center = |text: &str| x + (column as i32 - text_width(text) as i32) / 2;
            put_str(
                buf,
                center(&number),
                3,
                &number,
                animated_style(theme, theme.accent, &state).add_modifier(Modifier::BOLD),
            );
            put_str(buf, center(label), 4, label, animated_style(theme, theme.muted, &state));
        }
    }

    fn draw_work(&self, buf: &mut Buffer, theme: &Theme) {
        let state = self.state(self.subjects.work);
        let style = animated_style(theme, theme.fg, &state);
        let dx = cell_offset(state.x);
        put_str(buf, 4 + dx, 1, "Selected work", style.add_modifier(Modifier::BOLD));

        for (i, case) in content::CASE_STUDIES.iter().enumerate() {
            let variant = Variant::from_active(self.selected == Some(i));
            let card = HoverStyle::CARD.state(variant);
            let row = 3 + i as i32 * 4 + cell_offset(card.y);
            let marker = if variant == Variant::Active { "▶ " } else { "  " };
            let color = if variant == Variant::Active { theme.accent } else { theme.fg };

            let x = put_str(buf, 2 + dx, row, marker, Style::default().fg(theme.accent).bg(theme.bg));
            put_str(buf, x, row, case.client, animated_style(theme, color, &card).add_modifier(Modifier::BOLD));
            put_str(buf, x, row + 1, case.title, style);
            put_str(buf, x, row + 2, case.summary, animated_style(theme, theme.muted, &state));
        }
    }

    fn draw_footer(&self, buf: &mut Buffer, theme: &Theme) {
        let area = buf.area;
        let prompt = "Have a project in mind?";
        put_str(
            buf,
            centered(prompt, area.width),
            2,
            prompt,
            theme.base().add_modifier(Modifier::BOLD),
        );

        let cta = "Press c to start a conversation";
        let arrow = self.state(self.subjects.cta);
        let x = put_str(buf, centered(cta, area.width) - 2, 4, cta, Style::default().fg(theme.accent).bg(theme.bg));
        put_str(buf, x + 1 + cell_offset(arrow.x), 4, "→", Style::default().fg(theme.accent).bg(theme.bg));
    }

    fn state(&self, id: SubjectId) -> VisualState {
        self.animator.state(id).unwrap_or_default()
    }
}

fn hero_title_intro() -> Timeline {
    Timeline::new(VisualState::IDENTITY.with_opacity(0.0).with_y(2.0))
        .hold(Duration::from_millis(150))
        .to(
            VisualState::IDENTITY.with_scale(1.05),
            Duration::from_millis(600),
            EasingType::Cubic,
        )
        .to(VisualState::IDENTITY, Duration::from_millis(250), EasingType::SineInOut)
}

fn hero_subtitle_intro() -> Timeline {
    Timeline::new(VisualState::IDENTITY.with_opacity(0.0))
        .hold(Duration::from_millis(500))
        .to(VisualState::IDENTITY, Duration::from_millis(600), EasingType::QuadOut)
}

fn reveal() -> Timeline {
    Timeline::new(VisualState::IDENTITY.with_opacity(0.0).with_y(2.0)).to(
        VisualState::IDENTITY,
        Duration::from_millis(500),
        EasingType::EaseOut,
    )
}

fn cta_nudge() -> Timeline {
    Timeline::new(VisualState::IDENTITY)
        .to(VisualState::IDENTITY.with_x(2.0), Duration::from_millis(600), EasingType::SineInOut)
        .seamless(Duration::from_millis(600), EasingType::SineInOut)
        .repeat(Repeat::Infinite)
}
