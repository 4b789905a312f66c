use std::time::Duration;

use brightwave_core::content::{self, CaseStudy};
use brightwave_core::EasingType;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    widgets::{Paragraph, Widget, Wrap},
};

use super::{animated_style, cell_offset, FrameContext, MountContext};
use crate::motion::{Animator, SubjectId, Timeline, Viewport, VisualState};
use crate::theme::Theme;
use crate::widgets::surface::put_str;

/// A case study page. The slug is shown as given; a catalog entry with the
/// same slug only adds a title and summary.
#[derive(Debug)]
pub struct CaseStudyPage {
    slug: String,
    study: Option<&'static CaseStudy>,
    animator: Animator,
    intro: SubjectId,
    viewport: Viewport,
}

impl CaseStudyPage {
    pub fn new(ctx: &MountContext, slug: &str) -> Self {
        let mut animator = Animator::new(ctx.registry).with_reduced_motion(ctx.config.motion.reduced_motion);
        let hidden = VisualState::IDENTITY.with_opacity(0.0).with_y(2.0);
        let intro = animator.mount(hidden);
        animator.play(
            intro,
            Timeline::new(hidden).to(VisualState::IDENTITY, Duration::from_millis(500), EasingType::EaseOut),
            ctx.now,
        );

        let study = content::case_study(slug);
        tracing::debug!(slug, known = study.is_some(), "Mounted case study");

        Self {
            slug: slug.to_string(),
            study,
            animator,
            intro,
            viewport: ctx.viewport,
        }
    }

    pub fn slug(&self) -> &str {
        &self.slug
    }

    pub fn heading(&self) -> String {
        format!("Case study: {}", self.slug)
    }

    pub fn document_height(&self) -> u16 {
        self.viewport.height.max(0.0) as u16
    }

    pub fn update(&mut self, ctx: &FrameContext) {
        self.animator.tick(ctx.now);
    }

    pub fn on_resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    pub fn render(&self, buf: &mut Buffer, theme: &Theme) {
        let area = buf.area;
        let state = self.animator.state(self.intro).unwrap_or_default();
        let top = 2 + cell_offset(state.y);
        let muted = Style::default().fg(theme.muted).bg(theme.bg);

        put_str(
            buf,
            4,
            top,
            &self.heading(),
            animated_style(theme, theme.fg, &state).add_modifier(Modifier::BOLD),
        );

        match self.study {
            Some(study) => {
                put_str(buf, 4, top + 2, study.client, animated_style(theme, theme.accent, &state));
                put_str(buf, 4, top + 3, study.title, animated_style(theme, theme.fg, &state));
                let body_top = (top + 5).clamp(0, area.height as i32) as u16;
                let body = Rect::new(
                    area.x + 4,
                    area.y + body_top,
                    area.width.saturating_sub(8),
                    area.height.saturating_sub(body_top),
                );
                Paragraph::new(study.summary)
                    .style(animated_style(theme, theme.fg, &state))
                    .wrap(Wrap { trim: true })
                    .render(body, buf);
            }
            None => {
                put_str(buf, 4, top + 2, "The full write-up is on its way.", muted);
            }
        }

        put_str(buf, 4, area.height as i32 - 2, "gh: home   gc: contact", muted);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::motion::ListenerRegistry;
    use crate::widgets::surface::row_text;
    use brightwave_core::AppConfig;
    use std::time::Instant;

    fn mount(registry: &ListenerRegistry, config: &AppConfig, slug: &str) -> CaseStudyPage {
        CaseStudyPage::new(
            &MountContext {
                registry,
                config,
                viewport: Viewport::new(80.0, 24.0),
                now: Instant::now(),
            },
            slug,
        )
    }

    fn screen(page: &CaseStudyPage) -> String {
        let mut buf = Buffer::empty(Rect::new(0, 0, 80, 24));
        page.render(&mut buf, &Theme::default());
        (0..24).map(|y| row_text(&buf, y)).collect::<Vec<_>>().join("\n")
    }

    #[test]
    fn test_unknown_slug_is_echoed() {
        let registry = ListenerRegistry::new();
        let mut config = AppConfig::default();
        config.motion.reduced_motion = true;
        let page = mount(&registry, &config, "some-new-client");

        assert_eq!(page.slug(), "some-new-client");
        let text = screen(&page);
        assert!(text.contains("Case study: some-new-client"));
        assert!(text.contains("on its way"));
    }

    #[test]
    fn test_catalog_entry_decorates() {
        let registry = ListenerRegistry::new();
        let mut config = AppConfig::default();
        config.motion.reduced_motion = true;
        let page = mount(&registry, &config, "atlas-outdoor");

        let text = screen(&page);
        assert!(text.contains("Case study: atlas-outdoor"));
        assert!(text.contains("Taking a heritage brand off-trail"));
    }

    #[test]
    fn test_drop_releases_listeners() {
        let registry = ListenerRegistry::new();
        let config = AppConfig::default();
        let page = mount(&registry, &config, "halcyon");
        drop(page);
        assert_eq!(registry.count(), 0);
    }
}
