use std::time::{Duration, Instant};

use brightwave_core::contact::{ContactForm, ContactPayload, Field, FormStep, SubmitStatus};
use brightwave_core::{content, EasingType, Error};
use ratatui::{
    buffer::Buffer,
    style::{Color, Modifier, Style},
};

use super::{animated_style, cell_offset, FrameContext, MountContext};
use crate::motion::{Animator, SubjectId, Timeline, Viewport, VisualState};
use crate::theme::Theme;
use crate::widgets::surface::put_str;

/// Which way a choice field cycles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cycle {
    Next,
    Prev,
}

fn choices(field: Field) -> Option<&'static [&'static str]> {
    match field {
        Field::ServiceInterest => Some(content::SERVICES),
        Field::Budget => Some(content::BUDGETS),
        _ => None,
    }
}

#[derive(Debug)]
pub struct ContactPage {
    form: ContactForm,
    focus: usize,
    editing: bool,
    animator: Animator,
    heading: SubjectId,
    step_panel: SubjectId,
    viewport: Viewport,
}

impl ContactPage {
    pub fn new(ctx: &MountContext) -> Self {
        let mut animator = Animator::new(ctx.registry).with_reduced_motion(ctx.config.motion.reduced_motion);
        let heading = animator.mount(VisualState::IDENTITY.with_opacity(0.0));
        let step_panel = animator.mount(VisualState::IDENTITY);
        animator.play(
            heading,
            Timeline::new(VisualState::IDENTITY.with_opacity(0.0).with_y(1.0)).to(
                VisualState::IDENTITY,
                Duration::from_millis(400),
                EasingType::EaseOut,
            ),
            ctx.now,
        );

        Self {
            form: ContactForm::new(ctx.config.form.clone()),
            focus: 0,
            editing: true,
            animator,
            heading,
            step_panel,
            viewport: ctx.viewport,
        }
    }

    pub fn form(&self) -> &ContactForm {
        &self.form
    }

    /// Input is captured only while the form can still change
    pub fn is_editing(&self) -> bool {
        self.editing
            && self.form.is_open()
            && !matches!(self.form.status(), SubmitStatus::Submitting | SubmitStatus::Success)
    }

    pub fn start_editing(&mut self) {
        self.editing = true;
    }

    pub fn stop_editing(&mut self) {
        self.editing = false;
    }

    pub fn focused_field(&self) -> Field {
        let fields = self.form.step().fields();
        fields[self.focus.min(fields.len() - 1)]
    }

    pub fn next_field(&mut self) {
        let count = self.form.step().fields().len();
        self.focus = (self.focus + 1) % count;
    }

    pub fn prev_field(&mut self) {
        let count = self.form.step().fields().len();
        self.focus = (self.focus + count - 1) % count;
    }

    pub fn input_char(&mut self, c: char) {
        let field = self.focused_field();
        if choices(field).is_none() {
            self.form.push_char(field, c);
        }
    }

    pub fn backspace(&mut self) {
        let field = self.focused_field();
        if choices(field).is_some() {
            self.form.set(field, "");
        } else {
            self.form.pop_char(field);
        }
    }

    /// Step through the catalog options of a choice field
    pub fn cycle(&mut self, direction: Cycle) {
        let field = self.focused_field();
        let Some(options) = choices(field) else {
            return;
        };
        let current = options.iter().position(|o| *o == self.form.value(field));
        let index = match (current, direction) {
            (None, Cycle::Next) => 0,
            (None, Cycle::Prev) => options.len() - 1,
            (Some(i), Cycle::Next) => (i + 1) % options.len(),
            (Some(i), Cycle::Prev) => (i + options.len() - 1) % options.len(),
        };
        self.form.set(field, options[index]);
    }

    /// Enter: move through the step's fields, then advance the step, then
    /// submit. Returns the payload when a submission starts.
    pub fn confirm(&mut self, now: Instant) -> Option<ContactPayload> {
        let count = self.form.step().fields().len();
        if self.focus + 1 < count {
            self.focus += 1;
            return None;
        }
        if self.form.step().is_last() {
            return self.submit();
        }
        self.advance(now);
        None
    }

    fn advance(&mut self, now: Instant) {
        let before = self.form.step();
        match self.form.next_step() {
            Ok(step) if step != before => {
                self.focus = 0;
                self.animate_step(Cycle::Next, now);
            }
            Ok(_) => {}
            Err(errors) => {
                if let Some(field) = errors.fields().next() {
                    self.focus_field(field);
                }
            }
        }
    }

    pub fn back(&mut self, now: Instant) {
        let before = self.form.step();
        if self.form.prev_step() != before {
            self.focus = 0;
            self.animate_step(Cycle::Prev, now);
        }
    }

    /// Validate everything; on success the form is `Submitting` and the
    /// payload must be delivered by the caller
    pub fn submit(&mut self) -> Option<ContactPayload> {
        match self.form.begin_submit() {
            Ok(payload) => Some(payload),
            Err(Error::Validation(errors)) => {
                if let Some(field) = errors.fields().next() {
                    self.focus_field(field);
                }
                None
            }
            Err(e) => {
                tracing::debug!(error = %e, "Submit ignored");
                None
            }
        }
    }

    /// Record the delivery outcome
    pub fn finish(&mut self, outcome: &brightwave_core::Result<()>, now: Instant) {
        self.form.finish_submit(outcome, now);
        if outcome.is_ok() {
            self.focus = 0;
        }
    }

    /// Open a fresh form after it closed
    pub fn reopen(&mut self) {
        if !self.form.is_open() {
            self.form.open();
            self.focus = 0;
            self.editing = true;
        }
    }

    fn focus_field(&mut self, field: Field) {
        if let Some(i) = self.form.step().fields().iter().position(|f| *f == field) {
            self.focus = i;
        }
    }

    fn animate_step(&mut self, direction: Cycle, now: Instant) {
        let from_x = match direction {
            Cycle::Next => 6.0,
            Cycle::Prev => -6.0,
        };
        self.animator.play(
            self.step_panel,
            Timeline::new(VisualState::IDENTITY.with_x(from_x).with_opacity(0.0)).to(
                VisualState::IDENTITY,
                Duration::from_millis(300),
                EasingType::Cubic,
            ),
            now,
        );
    }

    pub fn document_height(&self) -> u16 {
        (self.viewport.height as u16).max(24)
    }

    pub fn update(&mut self, ctx: &FrameContext) {
        self.form.tick(ctx.now);
        self.animator.tick(ctx.now);
    }

    pub fn on_resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    pub fn render(&self, buf: &mut Buffer, theme: &Theme) {
        let left = 4;
        let top = 0;
        let base = theme.base();
        let muted = Style::default().fg(theme.muted).bg(theme.bg);
        let accent = Style::default().fg(theme.accent).bg(theme.bg);

        let heading = self.state(self.heading);
        put_str(
            buf,
            left,
            top + 1 + cell_offset(heading.y),
            "Let's talk",
            animated_style(theme, theme.fg, &heading).add_modifier(Modifier::BOLD),
        );

        if !self.form.is_open() {
            put_str(buf, left, top + 4, "Thanks! We'll be in touch within two working days.", accent);
            put_str(buf, left, top + 6, "o: new message   gh: home", muted);
            return;
        }

        let step = self.form.step();
        let progress: String = FormStep::ALL
            .iter()
            .map(|s| if s.number() <= step.number() { "●" } else { "○" })
            .collect::<Vec<_>>()
            .join(" ");
        let x = put_str(buf, left, top + 3, &progress, accent);
        put_str(
            buf,
            x + 2,
            top + 3,
            &format!("Step {} of {}: {}", step.number(), FormStep::ALL.len(), step.title()),
            base.add_modifier(Modifier::BOLD),
        );

        let panel = self.state(self.step_panel);
        let panel_left = left + cell_offset(panel.x);
        let mut row = top + 5;
        for (i, field) in step.fields().iter().enumerate() {
            let focused = i == self.focus;
            let label_style = if focused {
                animated_style(theme, theme.accent, &panel).add_modifier(Modifier::BOLD)
            } else {
                animated_style(theme, theme.fg, &panel)
            };
            let marker = if focused { "› " } else { "  " };
            let x = put_str(buf, panel_left - 2, row, marker, accent);
            put_str(buf, x, row, &capitalize(field.label()), label_style);

            let value = self.form.value(*field);
            let shown = match (value.is_empty(), choices(*field)) {
                (true, Some(_)) => "‹ choose with ←/→ ›".to_string(),
                (false, Some(_)) => format!("‹ {} ›", value),
                (_, None) if focused && self.is_editing() => format!("{}▏", value),
                (_, None) => value.to_string(),
            };
            let value_style = if value.is_empty() { muted } else { base };
            put_str(buf, panel_left, row + 1, &shown, animated_style(theme, fg_of(value_style, theme), &panel));

            if let Some(error) = self.form.field_error(*field) {
                put_str(
                    buf,
                    panel_left,
                    row + 2,
                    &format!("{} {}", capitalize(field.label()), error.message()),
                    Style::default().fg(theme.error).bg(theme.bg),
                );
            }
            row += 4;
        }

        let status = match self.form.status() {
            SubmitStatus::Idle => None,
            SubmitStatus::Submitting => Some(("Sending…".to_string(), muted)),
            SubmitStatus::Success => Some(("Message sent.".to_string(), Style::default().fg(theme.success).bg(theme.bg))),
            SubmitStatus::Error(message) => Some((
                format!("Could not send your message: {}", message),
                Style::default().fg(theme.bg).bg(theme.error),
            )),
        };
        if let Some((text, style)) = status {
            put_str(buf, left, row, &text, style);
        }

        let hint = if step.is_last() {
            "enter: next/submit   ctrl-s: submit   esc: stop editing   ctrl-b: back"
        } else {
            "enter: next   tab: field   esc: stop editing   ctrl-b: back"
        };
        put_str(buf, left, row + 2, hint, muted);
    }

    fn state(&self, id: SubjectId) -> VisualState {
        self.animator.state(id).unwrap_or_default()
    }
}

fn fg_of(style: Style, theme: &Theme) -> Color {
    style.fg.unwrap_or(theme.fg)
}

fn capitalize(label: &str) -> String {
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::motion::{ListenerRegistry, ThemeStack};
    use ratatui::layout::Rect;
    use crate::widgets::surface::row_text;
    use brightwave_core::AppConfig;

    fn page(registry: &ListenerRegistry, config: &AppConfig) -> ContactPage {
        ContactPage::new(&MountContext {
            registry,
            config,
            viewport: Viewport::new(80.0, 24.0),
            now: Instant::now(),
        })
    }

    fn type_str(page: &mut ContactPage, text: &str) {
        for c in text.chars() {
            page.input_char(c);
        }
    }

    #[test]
    fn test_walks_steps_and_submits() {
        let registry = ListenerRegistry::new();
        let config = AppConfig::default();
        let mut page = page(&registry, &config);
        let now = Instant::now();

        type_str(&mut page, "Ada");
        assert!(page.confirm(now).is_none());
        type_str(&mut page, "Lovelace");
        assert!(page.confirm(now).is_none());
        assert_eq!(page.form().step(), FormStep::ContactDetails);

        type_str(&mut page, "ada@example.com");
        page.confirm(now);
        type_str(&mut page, "+44 20 7946 0000");
        page.confirm(now);
        type_str(&mut page, "Analytical Engines");
        page.confirm(now);
        assert_eq!(page.form().step(), FormStep::Project);

        // Choice fields ignore typing and cycle through the catalog
        type_str(&mut page, "xyz");
        page.cycle(Cycle::Next);
        assert_eq!(page.form().value(Field::ServiceInterest), content::SERVICES[0]);
        page.confirm(now);
        page.cycle(Cycle::Prev);
        assert_eq!(page.form().value(Field::Budget), content::BUDGETS[content::BUDGETS.len() - 1]);

        let payload = page.confirm(now).expect("submission should start");
        assert_eq!(payload.email, "ada@example.com");
        assert_eq!(page.form().status(), &SubmitStatus::Submitting);
        assert!(!page.is_editing());

        // A second submit while in flight is ignored
        assert!(page.submit().is_none());
    }

    #[test]
    fn test_invalid_step_keeps_step_and_focuses_error() {
        let registry = ListenerRegistry::new();
        let config = AppConfig::default();
        let mut page = page(&registry, &config);
        let now = Instant::now();

        type_str(&mut page, "Ada");
        page.confirm(now);
        page.confirm(now);
        assert_eq!(page.form().step(), FormStep::AboutYou);
        assert_eq!(page.focused_field(), Field::LastName);
        assert!(page.form().field_error(Field::LastName).is_some());
    }

    #[test]
    fn test_failure_banner_then_success_closes() {
        let registry = ListenerRegistry::new();
        let config = AppConfig::default();
        let mut page = page(&registry, &config);
        let themes = ThemeStack::new(Theme::default());
        let now = Instant::now();

        for field in Field::ALL {
            page.form.set(field, "x");
        }
        page.form.set(Field::Email, "x@example.com");
        page.form.set(Field::ServiceInterest, content::SERVICES[1]);
        assert!(page.submit().is_some());

        page.finish(&Err(Error::Delivery("503: unavailable".to_string())), now);
        assert!(page.form().error_banner().is_some());
        assert_eq!(page.form().value(Field::FirstName), "x");

        let mut buf = Buffer::empty(Rect::new(0, 0, 80, 24));
        page.render(&mut buf, &Theme::default());
        let text: String = (0..24).map(|y| row_text(&buf, y)).collect();
        assert!(text.contains("Could not send your message"));

        page.update(&FrameContext {
            now: now + Duration::from_millis(5000),
            scroll: 0.0,
            viewport: Viewport::new(80.0, 24.0),
            themes: &themes,
        });
        assert!(page.form().error_banner().is_none());

        assert!(page.submit().is_some());
        page.finish(&Ok(()), now);
        assert_eq!(page.form().value(Field::FirstName), "");
        // The thank-you state is read-only until the form closes
        assert!(page.form().is_open());
        assert!(!page.is_editing());
        page.update(&FrameContext {
            now: now + Duration::from_millis(2000),
            scroll: 0.0,
            viewport: Viewport::new(80.0, 24.0),
            themes: &themes,
        });
        assert!(!page.form().is_open());

        page.reopen();
        assert!(page.form().is_open());
        assert!(page.is_editing());
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("service interest"), "Service interest");
        assert_eq!(capitalize(""), "");
    }
}
