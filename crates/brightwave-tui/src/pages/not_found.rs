use std::time::Duration;

use brightwave_core::EasingType;
use ratatui::{
    buffer::Buffer,
    style::{Modifier, Style},
};

use super::{animated_style, FrameContext, MountContext};
use crate::motion::{Animator, SubjectId, Timeline, Viewport, VisualState};
use crate::theme::Theme;
use crate::widgets::surface::{centered, put_str};

#[derive(Debug)]
pub struct NotFoundPage {
    path: String,
    animator: Animator,
    glyph: SubjectId,
    viewport: Viewport,
}

impl NotFoundPage {
    pub fn new(ctx: &MountContext, path: &str) -> Self {
        let mut animator = Animator::new(ctx.registry).with_reduced_motion(ctx.config.motion.reduced_motion);
        let glyph = animator.mount(VisualState::IDENTITY.with_scale(0.8).with_opacity(0.0));
        animator.play(
            glyph,
            Timeline::new(VisualState::IDENTITY.with_scale(0.8).with_opacity(0.0))
                .to(VisualState::IDENTITY.with_scale(1.1), Duration::from_millis(250), EasingType::EaseOut)
                .to(VisualState::IDENTITY, Duration::from_millis(150), EasingType::SineInOut),
            ctx.now,
        );
        tracing::info!(path, "No page for path");

        Self {
            path: path.to_string(),
            animator,
            glyph,
            viewport: ctx.viewport,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
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
        let width = buf.area.width;
        let mid = buf.area.height as i32 / 2;
        let state = self.animator.state(self.glyph).unwrap_or_default();
        let muted = Style::default().fg(theme.muted).bg(theme.bg);

        put_str(
            buf,
            centered("404", width),
            mid - 2,
            "404",
            animated_style(theme, theme.accent, &state).add_modifier(Modifier::BOLD),
        );
        let message = format!("Nothing lives at {}", self.path);
        put_str(buf, centered(&message, width), mid, &message, theme.base());
        let hint = "gh: home   :  go to a path";
        put_str(buf, centered(hint, width), mid + 2, hint, muted);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::motion::{ListenerRegistry, ListenerKind, ThemeStack};
    use crate::widgets::surface::row_text;
    use brightwave_core::AppConfig;
    use ratatui::layout::Rect;
    use std::time::Instant;

    #[test]
    fn test_shows_path_and_settles() {
        let registry = ListenerRegistry::new();
        let config = AppConfig::default();
        let themes = ThemeStack::new(Theme::default());
        let now = Instant::now();
        let mut page = NotFoundPage::new(
            &MountContext {
                registry: &registry,
                config: &config,
                viewport: Viewport::new(80.0, 24.0),
                now,
            },
            "/pricing",
        );
        assert_eq!(registry.count_kind(ListenerKind::Frame), 1);

        page.update(&FrameContext {
            now: now + Duration::from_millis(500),
            scroll: 0.0,
            viewport: Viewport::new(80.0, 24.0),
            themes: &themes,
        });
        assert_eq!(registry.count(), 0);

        let mut buf = Buffer::empty(Rect::new(0, 0, 80, 24));
        page.render(&mut buf, &Theme::default());
        assert!(row_text(&buf, 10).contains("404"));
        assert!(row_text(&buf, 12).contains("Nothing lives at /pricing"));
    }
}
