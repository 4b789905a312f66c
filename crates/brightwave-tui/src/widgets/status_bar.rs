use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::app::{App, Mode};
use crate::widgets::surface::text_width;

pub struct StatusBarWidget;

impl StatusBarWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let theme = app.themes.current();
        let bar = Style::default().fg(theme.bg).bg(theme.muted);

        let status_text = match &app.mode {
            Mode::PathInput(input) => format!(" :{}▏", input),
            Mode::Normal => {
                let mode_str = if app.is_editing() { "EDIT" } else { "NORMAL" };
                if let Some(msg) = &app.status_message {
                    format!(" {} | {}", mode_str, msg)
                } else {
                    format!(
                        " {} | {} | {}/{} | Listeners: {}",
                        mode_str,
                        app.route,
                        app.scroll.current(),
                        app.max_scroll(),
                        app.registry.count()
                    )
                }
            }
        };

        let help_hint = match &app.mode {
            Mode::PathInput(_) => " enter:go esc:cancel ",
            Mode::Normal if app.is_editing() => " esc:stop editing enter:next ",
            Mode::Normal => " q:quit j/k:scroll gh/gc:pages :path ",
        };
        let padding_len = (area.width as usize)
            .saturating_sub(text_width(&status_text) + text_width(help_hint));

        let line = Line::from(vec![
            Span::styled(status_text, bar),
            Span::styled(" ".repeat(padding_len), bar),
            Span::styled(help_hint, Style::default().fg(theme.bg).bg(theme.muted)),
        ]);

        frame.render_widget(Paragraph::new(line), area);
    }
}
